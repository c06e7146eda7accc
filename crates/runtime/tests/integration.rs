// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Integration tests: configuration → runtime → blocks → error slot.
//!
//! These exercise the layered data flow end to end: a dynamic block grows
//! through its unified storage, the allocator copies old bytes with the raw
//! engine, and failures surface in the thread's error scope.

use memory_manager::{runtime_allocator, DynamicBlock};
use runtime::{Runtime, RuntimeConfig};
use runtime_error::{scope, ErrorCode, Result};

// ── Helpers ────────────────────────────────────────────────────

fn tracked_runtime(alignment: usize) -> Runtime {
    Runtime::new(RuntimeConfig {
        default_alignment: alignment,
        track_allocations: true,
        ..Default::default()
    })
    .unwrap()
}

fn fill(block: &mut DynamicBlock, count: u32) -> Result<()> {
    for i in 0..count {
        block.push(&i.to_le_bytes())?;
    }
    Ok(())
}

fn read_u32(block: &DynamicBlock, index: usize) -> u32 {
    let bytes = block.get(index).unwrap();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

// ── Tests ──────────────────────────────────────────────────────

#[test]
fn test_growth_preserves_contents_plain_and_aligned() {
    for alignment in [0usize, 64] {
        let runtime = tracked_runtime(alignment);
        let mut block = runtime.dynamic_block(4).unwrap();
        fill(&mut block, 1000).unwrap();
        assert_eq!(block.size(), 1000);
        for i in [0usize, 1, 499, 999] {
            assert_eq!(read_u32(&block, i), i as u32);
        }
        if alignment > 0 {
            assert_eq!(block.storage().block().begin() as usize % alignment, 0);
        }

        let stats = runtime.stats().unwrap();
        assert!(stats.total_allocations > 1);
        assert!(stats.total_allocations < 30, "growth should be geometric");
    }
}

#[test]
fn test_installed_runtime_is_thread_default() {
    let guard = tracked_runtime(0).install();
    let mut block = DynamicBlock::new(4).unwrap();
    fill(&mut block, 10).unwrap();
    assert!(guard.stats().unwrap().live_bytes >= 40);

    block.delete().unwrap();
    assert_eq!(guard.stats().unwrap().live_bytes, 0);
    drop(guard);
    assert!(runtime_allocator().stats().is_none());
}

#[test]
fn test_block_outlives_guard() {
    let guard = tracked_runtime(0).install();
    let mut block = guard.dynamic_block(4).unwrap();
    drop(guard);
    fill(&mut block, 100).unwrap();
    assert_eq!(read_u32(&block, 99), 99);
}

#[test]
fn test_try_region_observes_failure_once() {
    let _guard = tracked_runtime(0).install();
    let mut resumed = 0;

    let result = scope::try_current(|| {
        let mut block = DynamicBlock::new(4)?;
        block.resize(2)?;
        let _ = block.get(5)?;
        Ok(())
    });
    if result.is_err() {
        resumed += 1;
    }

    assert_eq!(resumed, 1);
    assert_eq!(scope::current_depth(), 0);
    assert_eq!(scope::get_code_and_clear(), ErrorCode::OutOfRange);
    assert_eq!(scope::get_code_and_clear(), ErrorCode::None);
}

#[test]
fn test_nested_regions_stay_balanced() {
    let _guard = tracked_runtime(0).install();
    let depth = scope::current_depth();
    let outcome: Result<u32> = scope::try_current(|| {
        let inner = scope::try_current(|| Ok(2))?;
        let failed = scope::try_current(|| -> Result<u32> {
            Err(scope::throw(ErrorCode::DivisionByZero, Some("nested")))
        });
        assert!(failed.is_err());
        Ok(inner * 21)
    });
    assert_eq!(outcome.unwrap(), 42);
    assert_eq!(scope::current_depth(), depth);
    let error = scope::current_error();
    assert_eq!(error.code(), ErrorCode::DivisionByZero);
    assert_eq!(error.description(), Some("nested"));
}

#[test]
fn test_reserve_failure_is_recoverable() {
    let guard = tracked_runtime(0).install();
    let mut block = guard.dynamic_block(16).unwrap();
    assert!(!block.reserve(usize::MAX / 2));
    assert_eq!(
        guard.take_error().map(|e| e.code()),
        Some(ErrorCode::ExceedsMaxSize)
    );
    assert!(block.reserve(4));
    assert!(guard.last_error().is_none());
}
