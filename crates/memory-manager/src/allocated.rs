// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owning block with plain (unaligned) storage.

use std::ops::Deref;

use runtime_error::{ensure, ErrorCode, Result};

use crate::allocator::{free, realloc};
use crate::runtime_allocator::{runtime_allocator, SharedAllocator};
use crate::MemoryBlock;

/// A [`MemoryBlock`] whose storage comes from, and returns to, an allocator.
///
/// Dereferences to the underlying block for read access; the bounds can
/// only change through [`resize`](Self::resize). Storage is released when
/// the block is dropped.
pub struct AllocatedBlock {
    block: MemoryBlock,
    allocator: SharedAllocator,
}

impl AllocatedBlock {
    /// An empty block using the thread's runtime allocator.
    pub fn new(element_size: usize) -> Result<Self> {
        Self::with_allocator(element_size, runtime_allocator())
    }

    pub fn with_allocator(element_size: usize, allocator: SharedAllocator) -> Result<Self> {
        Ok(Self {
            block: MemoryBlock::make_empty(element_size)?,
            allocator,
        })
    }

    pub fn block(&self) -> &MemoryBlock {
        &self.block
    }

    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    /// Reallocates storage for exactly `n` elements, keeping the leading
    /// `min(old, n)` of them.
    pub fn resize(&mut self, n: usize) -> Result<()> {
        ensure!(n <= self.block.max_size(), ErrorCode::ExceedsMaxSize);
        let bytes = n * self.block.element_size();
        // SAFETY: the range is either null or was produced by `realloc`
        // with this allocator.
        unsafe { realloc(&*self.allocator, self.block.range_mut(), bytes) }
    }

    /// Releases all storage.
    pub fn clear(&mut self) -> Result<()> {
        self.resize(0)
    }

    pub fn is_equal(&self, other: &AllocatedBlock) -> bool {
        self.block.is_equal(&other.block)
    }
}

impl Deref for AllocatedBlock {
    type Target = MemoryBlock;

    fn deref(&self) -> &MemoryBlock {
        &self.block
    }
}

impl Drop for AllocatedBlock {
    fn drop(&mut self) {
        // SAFETY: see `resize`.
        if let Err(error) = unsafe { free(&*self.allocator, self.block.range_mut()) } {
            tracing::warn!(%error, "failed to release block storage");
        }
    }
}

impl std::fmt::Debug for AllocatedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllocatedBlock")
            .field("block", &self.block)
            .field("allocator", &self.allocator.name())
            .finish()
    }
}
