// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element-indexed views: a [`MemoryRange`] plus an element size.

use runtime_error::{ensure, ErrorCode, Result};

use crate::MemoryRange;

/// A non-owning range of fixed-size elements.
///
/// The block is valid when its range is valid, its element size is non-zero
/// and its byte span is an exact multiple of the element size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryBlock {
    range: MemoryRange,
    element_size: usize,
}

impl MemoryBlock {
    /// An empty block of `element_size`-byte elements.
    pub fn make_empty(element_size: usize) -> Result<Self> {
        ensure!(element_size != 0, ErrorCode::ZeroElementSize);
        Ok(Self {
            range: MemoryRange::empty(),
            element_size,
        })
    }

    /// A validated block over `[begin, end)`.
    pub fn make(begin: *mut u8, end: *mut u8, element_size: usize) -> Result<Self> {
        Self::from_range(MemoryRange::make(begin, end)?, element_size)
    }

    pub fn from_range(range: MemoryRange, element_size: usize) -> Result<Self> {
        ensure!(element_size != 0, ErrorCode::ZeroElementSize);
        let block = Self {
            range,
            element_size,
        };
        ensure!(block.is_valid(), ErrorCode::InvalidMemoryBlock);
        Ok(block)
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub(crate) fn range_mut(&mut self) -> &mut MemoryRange {
        &mut self.range
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn begin(&self) -> *mut u8 {
        self.range.begin()
    }

    pub fn end(&self) -> *mut u8 {
        self.range.end()
    }

    pub fn total_size(&self) -> usize {
        self.range.total_size()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        self.range.is_valid()
            && self.element_size != 0
            && self.range.total_size() % self.element_size == 0
    }

    /// Number of elements.
    pub fn size(&self) -> Result<usize> {
        ensure!(self.element_size != 0, ErrorCode::DivisionByZero);
        let total = self.range.total_size();
        ensure!(
            total % self.element_size == 0,
            ErrorCode::InvalidMemoryBlock
        );
        Ok(total / self.element_size)
    }

    /// Largest element count whose byte size fits in `usize`.
    pub fn max_size(&self) -> usize {
        usize::MAX / self.element_size.max(1)
    }

    /// Pointer to element `index`, counted from the front, or from the back
    /// when `reversed`.
    pub fn at(&self, index: usize, reversed: bool) -> Result<*mut u8> {
        ensure!(index < self.size()?, ErrorCode::OutOfRange);
        let offset = index * self.element_size;
        Ok(if reversed {
            self.range.end().wrapping_sub(offset + self.element_size)
        } else {
            self.range.begin().wrapping_add(offset)
        })
    }

    pub fn at_from_begin(&self, index: usize) -> Result<*mut u8> {
        self.at(index, false)
    }

    pub fn at_from_end(&self, index: usize) -> Result<*mut u8> {
        self.at(index, true)
    }

    pub fn front(&self) -> Result<*mut u8> {
        self.at(0, false)
    }

    pub fn back(&self) -> Result<*mut u8> {
        self.at(0, true)
    }

    /// `length` elements starting at element `index`.
    pub fn slice(&self, index: usize, length: usize) -> Result<Self> {
        let size = self.size()?;
        ensure!(
            index <= size && length <= size - index,
            ErrorCode::OutOfRange
        );
        let range = self
            .range
            .slice(index * self.element_size, length * self.element_size)?;
        Ok(Self {
            range,
            element_size: self.element_size,
        })
    }

    fn check_same_element_size(&self, other: &MemoryBlock) -> Result<()> {
        ensure!(
            self.element_size == other.element_size,
            ErrorCode::DifferentElementSize
        );
        Ok(())
    }

    pub fn swap(&mut self, other: &mut MemoryBlock) -> Result<()> {
        self.check_same_element_size(other)?;
        self.range.swap(&mut other.range);
        Ok(())
    }

    /// Takes `other`'s range and leaves `other` empty.
    pub fn exchange(&mut self, other: &mut MemoryBlock) -> Result<()> {
        self.check_same_element_size(other)?;
        self.range.exchange(&mut other.range);
        Ok(())
    }

    /// Same element size and same bounds.
    pub fn is_equal(&self, other: &MemoryBlock) -> bool {
        self == other
    }

    pub fn clear(&mut self) {
        self.range.clear();
    }
}
