// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! End-to-end behaviour of the block hierarchy and the allocator layer.

use std::sync::Arc;

use memory_manager::allocator::{align_alloc, align_free};
use memory_manager::{
    runtime_allocator, set_runtime_allocator, DynamicBlock, FnAllocator, MemoryRange,
    SystemAllocator, TrackingAllocator, UnifiedBlock,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use runtime_error::{scope, ErrorCode};

#[test]
fn test_dynamic_block_of_ints() {
    let mut block = DynamicBlock::new(4).unwrap();
    block.resize(0).unwrap();
    assert!(block.reserve(3));
    assert!(block.capacity() >= 3);
    assert_eq!(block.size(), 0);

    block.resize(3).unwrap();
    assert_eq!(block.size(), 3);
    for (i, value) in [10i32, -20, 30].into_iter().enumerate() {
        block.get_mut(i).unwrap().copy_from_slice(&value.to_ne_bytes());
    }

    block.shrink().unwrap();
    assert_eq!(block.capacity(), 3);
    let values: Vec<i32> = block
        .as_bytes()
        .chunks_exact(4)
        .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    assert_eq!(values, [10, -20, 30]);
}

#[test]
fn test_align_alloc_64() {
    let allocator = SystemAllocator;
    let mut range = align_alloc(&allocator, 100, 64).unwrap();
    assert_eq!(range.begin() as usize % 64, 0);
    assert_eq!(range.total_size(), 100);
    unsafe { align_free(&allocator, &mut range) }.unwrap();
    assert_eq!(range, MemoryRange::empty());

    let err = align_alloc(&allocator, 100, 3).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotPowerOfTwo);
}

#[test]
fn test_range_validity_law() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut buf = [0u8; 64];
    let base = buf.as_mut_ptr();
    for _ in 0..500 {
        let null_begin = rng.gen_bool(0.1);
        let b = if null_begin {
            std::ptr::null_mut()
        } else {
            base.wrapping_add(rng.gen_range(0..64))
        };
        let e = base.wrapping_add(rng.gen_range(0..64));
        let range = MemoryRange::from_raw_parts(b, e);
        let expected = b == e || (!b.is_null() && b <= e);
        assert_eq!(range.is_valid(), expected);
        assert_eq!(range.is_empty(), b == e);
    }
}

#[test]
fn test_resize_round_trip() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut block = DynamicBlock::new(3).unwrap();
    for _ in 0..100 {
        let n = rng.gen_range(0..500);
        block.resize(n).unwrap();
        assert_eq!(block.size(), n);
        assert!(block.capacity() >= n);
    }
}

#[test]
fn test_growth_is_monotonic() {
    let mut rng = StdRng::seed_from_u64(17);
    let mut block = DynamicBlock::new(2).unwrap();
    let mut requested = 0usize;
    let mut last_capacity = 0usize;
    for _ in 0..200 {
        let k = rng.gen_range(1..16);
        assert!(block.reserve(k));
        requested += k;
        block.resize(requested).unwrap();
        assert!(block.capacity() >= last_capacity);
        assert!(block.capacity() >= requested);
        last_capacity = block.capacity();
    }
}

#[test]
fn test_shrink_is_idempotent() {
    let mut block = DynamicBlock::aligned(8, 32).unwrap();
    assert!(block.reserve(40));
    block.resize(9).unwrap();
    block.shrink().unwrap();
    assert_eq!(block.capacity(), block.size());
    let begin = block.storage().block().begin();
    block.shrink().unwrap();
    assert_eq!(block.capacity(), 9);
    assert_eq!(block.storage().block().begin(), begin);
}

#[test]
fn test_blocks_use_the_runtime_allocator() {
    let tracker = Arc::new(TrackingAllocator::new(FnAllocator::system()));
    let previous = set_runtime_allocator(tracker.clone());
    {
        let mut block = DynamicBlock::new(16).unwrap();
        for i in 0u8..50 {
            block.push(&[i; 16]).unwrap();
        }
        let stats = tracker.snapshot();
        assert!(stats.total_allocations > 1);
        assert_eq!(stats.live_bytes, block.capacity() * 16);
    }
    set_runtime_allocator(previous);
    assert_eq!(tracker.snapshot().live_bytes, 0);
    assert_eq!(runtime_allocator().name(), "system");
}

#[test]
fn test_allocation_failure_surfaces_in_error_slot() {
    fn refuse(_: usize) -> *mut u8 {
        std::ptr::null_mut()
    }
    let previous = set_runtime_allocator(Arc::new(FnAllocator {
        alloc_fn: Some(refuse),
        dealloc_fn: None,
    }));
    scope::clear_error();
    let mut block = DynamicBlock::new(4).unwrap();
    assert!(!block.reserve(8));
    assert_eq!(scope::current_error().code(), ErrorCode::MemoryNotAllocated);
    assert_eq!(scope::get_code_and_clear(), ErrorCode::MemoryNotAllocated);
    assert!(scope::current_error().is_none());
    drop(block);
    set_runtime_allocator(previous);
}

#[test]
fn test_unified_storage_backs_dynamic_block() {
    let tracker = Arc::new(TrackingAllocator::new(SystemAllocator));
    let storage = UnifiedBlock::with_alignment(2, 32, tracker.clone()).unwrap();
    assert_eq!(storage.alignment(), Some(32));

    let mut block = DynamicBlock::from_storage(storage);
    for i in 0u16..50 {
        block.push(&i.to_le_bytes()).unwrap();
    }
    assert_eq!(block.storage().block().begin() as usize % 32, 0);
    assert_eq!(block.get(49).unwrap(), &49u16.to_le_bytes());
    assert!(tracker.snapshot().total_allocations > 1);

    drop(block);
    assert_eq!(tracker.snapshot().live_bytes, 0);
}
