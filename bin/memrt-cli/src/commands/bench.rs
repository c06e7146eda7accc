// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `memrt bench` command: wall-clock timing of the raw engine.
//!
//! Each lane width is forced explicitly so the table shows what the
//! dispatcher gains over byte-at-a-time loops on this machine.

use std::hint::black_box;
use std::time::{Duration, Instant};

use raw_memory::ops::{compare_with, copy_with, set_with};
use raw_memory::{find_slice, move_within, simd_available, Lane, Wide};

struct Row {
    label: String,
    elapsed: Duration,
}

pub fn execute(size: usize, iterations: u32) -> anyhow::Result<()> {
    anyhow::ensure!(size > 0, "--size must be greater than zero");
    anyhow::ensure!(iterations > 0, "--iterations must be greater than zero");

    println!("╔══════════════════════════════════════════════════╗");
    println!("║  memrt raw engine benchmark                      ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();
    println!("  Buffer size:      {} bytes", size);
    println!("  Iterations:       {}", iterations);
    println!("  128-bit SIMD:     {}", if simd_available() { "yes" } else { "no (u128)" });
    println!();

    let src: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();
    let mut dst = vec![0u8; size];

    let mut rows = Vec::new();
    rows.extend(width_rows::<u8>(&src, &mut dst, iterations));
    rows.extend(width_rows::<u16>(&src, &mut dst, iterations));
    rows.extend(width_rows::<u32>(&src, &mut dst, iterations));
    rows.extend(width_rows::<u64>(&src, &mut dst, iterations));
    rows.extend(width_rows::<Wide>(&src, &mut dst, iterations));
    rows.extend(dispatched_rows(&src, iterations)?);

    println!("  {:<22} {:>12} {:>10}", "Operation", "Per iter", "GiB/s");
    println!("  {}", "─".repeat(46));
    for row in &rows {
        let per_iter = row.elapsed / iterations;
        let secs = row.elapsed.as_secs_f64();
        let throughput = if secs > 0.0 {
            (size as f64 * iterations as f64) / secs / (1024.0 * 1024.0 * 1024.0)
        } else {
            0.0
        };
        println!(
            "  {:<22} {:>12} {:>10.2}",
            row.label,
            format!("{:.2?}", per_iter),
            throughput
        );
    }
    println!();

    Ok(())
}

fn time<F: FnMut()>(iterations: u32, mut f: F) -> Duration {
    // One warm-up pass so page faults are not billed to the first row.
    f();
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    start.elapsed()
}

fn width_rows<L: Lane>(src: &[u8], dst: &mut [u8], iterations: u32) -> Vec<Row> {
    let n = src.len().min(dst.len());
    let mut rows = Vec::with_capacity(3);

    let elapsed = time(iterations, || {
        // SAFETY: both buffers hold at least `n` bytes and do not overlap.
        unsafe { copy_with::<L>(dst.as_mut_ptr(), src.as_ptr(), n) };
        black_box(&mut *dst);
    });
    rows.push(Row { label: format!("copy {}", L::NAME), elapsed });

    let elapsed = time(iterations, || {
        // SAFETY: both buffers hold at least `n` bytes.
        let mismatch = unsafe { compare_with::<L>(dst.as_ptr(), src.as_ptr(), n) };
        black_box(mismatch);
    });
    rows.push(Row { label: format!("compare {}", L::NAME), elapsed });

    let elapsed = time(iterations, || {
        // SAFETY: `dst` holds at least `n` bytes.
        unsafe { set_with::<L>(dst.as_mut_ptr(), 0xA5, n) };
        black_box(&mut *dst);
    });
    rows.push(Row { label: format!("fill {}", L::NAME), elapsed });

    tracing::debug!(lane = L::NAME, "width measured");
    rows
}

fn dispatched_rows(src: &[u8], iterations: u32) -> anyhow::Result<Vec<Row>> {
    let mut buf = src.to_vec();
    let len = buf.len();
    let span = len.saturating_sub(5);

    let mut failure = None;
    let elapsed = time(iterations, || {
        if let Err(e) = move_within(&mut buf, 0..span, len - span) {
            failure = Some(e);
        }
        black_box(&mut buf);
    });
    if let Some(e) = failure {
        return Err(e.into());
    }
    let moved = Row { label: "move (overlap)".to_string(), elapsed };

    let needle_at = len - len.min(8);
    let needle = src[needle_at..].to_vec();
    let elapsed = time(iterations, || {
        black_box(find_slice(black_box(src), &needle));
    });
    let found = Row { label: "find (tail needle)".to_string(), elapsed };

    Ok(vec![moved, found])
}
