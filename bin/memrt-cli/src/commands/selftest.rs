// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `memrt selftest` command: end-to-end checks against a live runtime.

use anyhow::{bail, ensure};
use memory_manager::allocator::{align_alloc, align_free};
use raw_memory::{copy, move_bytes};
use runtime::{Runtime, RuntimeConfig, RuntimeGuard};
use runtime_error::ErrorCode;

type Check = fn(&RuntimeGuard) -> anyhow::Result<()>;

const CHECKS: [(&str, Check); 5] = [
    ("dynamic block lifecycle", dynamic_block_lifecycle),
    ("unaligned copy", unaligned_copy),
    ("overlapping move", overlapping_move),
    ("aligned allocation", aligned_allocation),
    ("error slot", error_slot),
];

pub fn execute(config: RuntimeConfig) -> anyhow::Result<()> {
    let config = RuntimeConfig { track_allocations: true, ..config };
    let guard = Runtime::new(config)?.install();

    println!("╔══════════════════════════════════════════════════╗");
    println!("║  memrt self test                                 ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    let mut failed = 0;
    for (name, check) in CHECKS {
        match check(&guard) {
            Ok(()) => println!("  ✓ {}", name),
            Err(e) => {
                failed += 1;
                println!("  ✗ {}: {:#}", name, e);
            }
        }
    }

    if let Some(stats) = guard.stats() {
        println!();
        println!("  {:<22} {:>8}", "Allocations", stats.total_allocations);
        println!("  {:<22} {:>8}", "Deallocations", stats.total_deallocations);
        println!("  {:<22} {:>8}", "Peak live bytes", stats.peak_live_bytes);
        println!("  {:<22} {:>8}", "Live bytes", stats.live_bytes);
    }
    println!();

    if failed > 0 {
        bail!("{} of {} checks failed", failed, CHECKS.len());
    }
    println!("  All {} checks passed.", CHECKS.len());
    Ok(())
}

fn dynamic_block_lifecycle(runtime: &RuntimeGuard) -> anyhow::Result<()> {
    let mut block = runtime.dynamic_block(4)?;
    block.resize(0)?;
    ensure!(block.reserve(3), "reserve(3) failed");
    ensure!(block.capacity() >= 3 && block.size() == 0, "reserve changed the size");

    block.resize(3)?;
    ensure!(block.size() == 3, "resize(3) gave size {}", block.size());
    for (i, value) in [7i32, -1, 42].into_iter().enumerate() {
        block.get_mut(i)?.copy_from_slice(&value.to_le_bytes());
    }
    block.shrink()?;
    ensure!(block.capacity() == 3, "shrink left capacity {}", block.capacity());

    let last = block.get(2)?;
    ensure!(
        i32::from_le_bytes([last[0], last[1], last[2], last[3]]) == 42,
        "contents lost across shrink"
    );
    Ok(())
}

fn unaligned_copy(_: &RuntimeGuard) -> anyhow::Result<()> {
    let src: Vec<u8> = (0..64u8).map(|b| b.wrapping_mul(37)).collect();
    for offset in 0..8 {
        let mut dst = [0u8; 64];
        let mut reference = [0u8; 64];
        for i in 0..37 {
            reference[offset + i] = src[offset + i];
        }
        // SAFETY: both sub-ranges lie inside their 64-byte buffers.
        unsafe {
            let d = dst.as_mut_ptr().add(offset);
            let s = src.as_ptr().add(offset);
            copy(d, d.add(37), s, s.add(37))?;
        }
        ensure!(dst == reference, "copy at offset {} differs from byte loop", offset);
    }
    Ok(())
}

fn overlapping_move(_: &RuntimeGuard) -> anyhow::Result<()> {
    let mut buf: Vec<u8> = (0..32u8).collect();
    let mut reference = buf.clone();
    for i in (0..20).rev() {
        reference[i + 5] = reference[i];
    }
    // SAFETY: `buf[0..25]` covers source and destination.
    unsafe {
        let base = buf.as_mut_ptr();
        move_bytes(base.add(5), base.add(25), base, base.add(20))?;
    }
    ensure!(buf == reference, "forward-overlapping move corrupted the buffer");
    Ok(())
}

fn aligned_allocation(runtime: &RuntimeGuard) -> anyhow::Result<()> {
    let allocator = &**runtime.allocator();
    let mut range = align_alloc(allocator, 100, 64)?;
    ensure!(range.begin() as usize % 64 == 0, "address {:p} is not 64-aligned", range.begin());
    ensure!(range.total_size() == 100, "range holds {} bytes", range.total_size());
    // SAFETY: `range` was just returned by `align_alloc` with this allocator.
    unsafe { align_free(allocator, &mut range)? };
    ensure!(range.is_empty(), "align_free left the range populated");

    match align_alloc(allocator, 100, 3) {
        Err(e) if e.code() == ErrorCode::NotPowerOfTwo => Ok(()),
        Err(e) => bail!("alignment 3 failed with {:?}", e.code()),
        Ok(_) => bail!("alignment 3 was accepted"),
    }
}

fn error_slot(runtime: &RuntimeGuard) -> anyhow::Result<()> {
    let mut block = runtime.dynamic_block(8)?;
    ensure!(!block.reserve(usize::MAX), "oversized reserve succeeded");
    let code = runtime.take_error().map(|e| e.code());
    ensure!(code == Some(ErrorCode::ExceedsMaxSize), "error slot held {:?}", code);
    ensure!(runtime.last_error().is_none(), "take_error did not clear the slot");
    Ok(())
}
