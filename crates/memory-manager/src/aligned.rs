// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Owning block whose storage starts on a power-of-two boundary.

use std::ops::Deref;

use raw_memory::align::is_power_of_two;
use runtime_error::{ensure, ErrorCode, Result};

use crate::allocator::{align_free, align_realloc};
use crate::runtime_allocator::{runtime_allocator, SharedAllocator};
use crate::MemoryBlock;

pub struct AlignedBlock {
    block: MemoryBlock,
    alignment: usize,
    allocator: SharedAllocator,
}

impl AlignedBlock {
    /// An empty block using the thread's runtime allocator.
    pub fn new(element_size: usize, alignment: usize) -> Result<Self> {
        Self::with_allocator(element_size, alignment, runtime_allocator())
    }

    pub fn with_allocator(
        element_size: usize,
        alignment: usize,
        allocator: SharedAllocator,
    ) -> Result<Self> {
        ensure!(alignment != 0, ErrorCode::ZeroAlignmentSize);
        ensure!(is_power_of_two(alignment), ErrorCode::NotPowerOfTwo);
        Ok(Self {
            block: MemoryBlock::make_empty(element_size)?,
            alignment,
            allocator,
        })
    }

    pub fn block(&self) -> &MemoryBlock {
        &self.block
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }

    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    /// Reallocates aligned storage for exactly `n` elements, keeping the
    /// leading `min(old, n)` of them.
    pub fn resize(&mut self, n: usize) -> Result<()> {
        ensure!(n <= self.block.max_size(), ErrorCode::ExceedsMaxSize);
        let bytes = n * self.block.element_size();
        // SAFETY: the range is either null or was produced by
        // `align_realloc` with this allocator.
        unsafe {
            align_realloc(
                &*self.allocator,
                self.block.range_mut(),
                bytes,
                self.alignment,
            )
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.resize(0)
    }

    pub fn has_same_alignment(&self, other: &AlignedBlock) -> bool {
        self.alignment == other.alignment
    }

    /// Same alignment, element size and bounds.
    pub fn is_equal(&self, other: &AlignedBlock) -> bool {
        self.has_same_alignment(other) && self.block.is_equal(&other.block)
    }
}

impl Deref for AlignedBlock {
    type Target = MemoryBlock;

    fn deref(&self) -> &MemoryBlock {
        &self.block
    }
}

impl Drop for AlignedBlock {
    fn drop(&mut self) {
        // SAFETY: see `resize`.
        if let Err(error) = unsafe { align_free(&*self.allocator, self.block.range_mut()) } {
            tracing::warn!(%error, "failed to release aligned block storage");
        }
    }
}

impl std::fmt::Debug for AlignedBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignedBlock")
            .field("block", &self.block)
            .field("alignment", &self.alignment)
            .field("allocator", &self.allocator.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alignment_validation() {
        assert_eq!(
            AlignedBlock::new(4, 0).unwrap_err().code(),
            ErrorCode::ZeroAlignmentSize
        );
        assert_eq!(
            AlignedBlock::new(4, 24).unwrap_err().code(),
            ErrorCode::NotPowerOfTwo
        );
        assert_eq!(
            AlignedBlock::new(0, 16).unwrap_err().code(),
            ErrorCode::ZeroElementSize
        );
    }

    #[test]
    fn test_resize_stays_aligned() {
        let mut b = AlignedBlock::new(3, 64).unwrap();
        for n in [1usize, 7, 100, 2] {
            b.resize(n).unwrap();
            assert_eq!(b.begin() as usize % 64, 0);
            assert_eq!(b.size().unwrap(), n);
        }
        b.clear().unwrap();
        assert!(b.begin().is_null());
    }

    #[test]
    fn test_resize_preserves_prefix() {
        let mut b = AlignedBlock::new(1, 32).unwrap();
        b.resize(4).unwrap();
        unsafe { b.range().as_bytes_mut().copy_from_slice(b"wxyz") };
        b.resize(40).unwrap();
        assert_eq!(unsafe { &b.range().as_bytes()[..4] }, b"wxyz");
    }

    #[test]
    fn test_equality() {
        let a = AlignedBlock::new(4, 16).unwrap();
        let b = AlignedBlock::new(4, 16).unwrap();
        let c = AlignedBlock::new(4, 32).unwrap();
        assert!(a.is_equal(&b));
        assert!(!a.is_equal(&c));
        assert!(!a.has_same_alignment(&c));
    }
}
