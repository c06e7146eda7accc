// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! One storage type for both allocation strategies.

use raw_memory::align::is_strict_alignment;
use runtime_error::Result;

use crate::runtime_allocator::{runtime_allocator, SharedAllocator};
use crate::{AlignedBlock, AllocatedBlock, MemoryBlock};

/// Plain or aligned storage, picked once at construction.
///
/// Every resize is dispatched on the variant, so growth logic built on top
/// (see [`DynamicBlock`](crate::DynamicBlock)) has a single code path.
#[derive(Debug)]
pub enum UnifiedBlock {
    Plain(AllocatedBlock),
    Aligned(AlignedBlock),
}

impl UnifiedBlock {
    pub fn plain(element_size: usize) -> Result<Self> {
        Ok(Self::Plain(AllocatedBlock::new(element_size)?))
    }

    /// Storage on the thread's runtime allocator aligned to `alignment`.
    ///
    /// Follows [`with_alignment`](Self::with_alignment): `0` and `1` give
    /// plain storage.
    pub fn aligned(element_size: usize, alignment: usize) -> Result<Self> {
        Self::with_alignment(element_size, alignment, runtime_allocator())
    }

    /// Aligned storage when `alignment` is a power of two above 1, plain
    /// storage when it is `0` or `1`.
    ///
    /// Any other value is rejected by [`AlignedBlock`].
    pub fn with_alignment(
        element_size: usize,
        alignment: usize,
        allocator: SharedAllocator,
    ) -> Result<Self> {
        if alignment <= 1 {
            return Ok(Self::Plain(AllocatedBlock::with_allocator(
                element_size,
                allocator,
            )?));
        }
        let block = AlignedBlock::with_allocator(element_size, alignment, allocator)?;
        debug_assert!(is_strict_alignment(block.alignment()));
        Ok(Self::Aligned(block))
    }

    /// [`with_alignment`](Self::with_alignment) on the thread's runtime
    /// allocator.
    pub fn new(element_size: usize, alignment: usize) -> Result<Self> {
        Self::with_alignment(element_size, alignment, runtime_allocator())
    }

    pub fn block(&self) -> &MemoryBlock {
        match self {
            Self::Plain(b) => b.block(),
            Self::Aligned(b) => b.block(),
        }
    }

    /// Requested alignment, `None` for plain storage.
    pub fn alignment(&self) -> Option<usize> {
        match self {
            Self::Plain(_) => None,
            Self::Aligned(b) => Some(b.alignment()),
        }
    }

    pub fn is_aligned(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }

    pub fn allocator(&self) -> &SharedAllocator {
        match self {
            Self::Plain(b) => b.allocator(),
            Self::Aligned(b) => b.allocator(),
        }
    }

    pub fn resize(&mut self, n: usize) -> Result<()> {
        match self {
            Self::Plain(b) => b.resize(n),
            Self::Aligned(b) => b.resize(n),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.resize(0)
    }
}
