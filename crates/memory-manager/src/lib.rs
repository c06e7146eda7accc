// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! Memory ranges, element blocks and the allocator capability behind them.
//!
//! # Key Components
//!
//! - [`MemoryAllocator`]: a swappable allocate/deallocate capability, with
//!   [`SystemAllocator`], [`FnAllocator`] and the statistics-keeping
//!   [`TrackingAllocator`]. Range-level `alloc`/`realloc`/`align_alloc`
//!   and friends live in [`allocator`].
//! - [`MemoryRange`] / [`MemoryBlock`]: non-owning views with validated
//!   byte and element indexing.
//! - [`AllocatedBlock`] / [`AlignedBlock`]: owning blocks with plain or
//!   aligned storage, unified by [`UnifiedBlock`].
//! - [`DynamicBlock`]: a growable array on top of a unified block.
//!
//! # Ownership Model
//!
//! ```text
//! DynamicBlock::reserve(n)
//!       │
//!       ▼
//!   UnifiedBlock::resize  ──► Plain(AllocatedBlock) ──► realloc
//!                         └─► Aligned(AlignedBlock) ──► align_realloc
//!                                                          │
//!                                     Arc<dyn MemoryAllocator> (captured)
//! ```
//!
//! Owning blocks hold an `Arc` to the allocator they were created with and
//! release their storage through it on drop.
//!
//! # Example
//! ```
//! use memory_manager::DynamicBlock;
//!
//! let mut block = DynamicBlock::new(4).unwrap();
//! assert!(block.reserve(3));
//! assert!(block.capacity() >= 3);
//!
//! block.resize(3).unwrap();
//! block.get_mut(1).unwrap().copy_from_slice(&7u32.to_le_bytes());
//! block.shrink().unwrap();
//! assert_eq!(block.capacity(), 3);
//! ```

pub mod allocator;
mod aligned;
mod allocated;
mod block;
mod dynamic;
mod range;
pub mod runtime_allocator;
mod stats;
mod unified;

pub use aligned::AlignedBlock;
pub use allocated::AllocatedBlock;
pub use allocator::{FnAllocator, MemoryAllocator, SystemAllocator, TrackingAllocator};
pub use block::MemoryBlock;
pub use dynamic::{DynamicBlock, DEFAULT_GROWTH_FACTOR};
pub use range::MemoryRange;
pub use runtime_allocator::{runtime_allocator, set_runtime_allocator, SharedAllocator};
pub use stats::AllocationStats;
pub use unified::UnifiedBlock;
