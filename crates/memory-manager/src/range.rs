// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! A non-owning `[begin, end)` view over bytes.
//!
//! [`MemoryRange`] is where all pointer arithmetic of the block hierarchy
//! is validated. It never dereferences on its own: only the `unsafe`
//! accessors do, so building or inspecting a range is always safe.

use runtime_error::{ensure, ErrorCode, Result};

/// A half-open byte interval.
///
/// A range is *valid* when it is empty (`begin == end`, including the
/// `{null, null}` range) or when `begin` is non-null and `begin <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryRange {
    begin: *mut u8,
    end: *mut u8,
}

impl Default for MemoryRange {
    fn default() -> Self {
        Self::empty()
    }
}

impl MemoryRange {
    /// The `{null, null}` range.
    pub const fn empty() -> Self {
        Self {
            begin: std::ptr::null_mut(),
            end: std::ptr::null_mut(),
        }
    }

    /// Builds a range without validating it.
    pub const fn from_raw_parts(begin: *mut u8, end: *mut u8) -> Self {
        Self { begin, end }
    }

    /// Builds a validated range.
    pub fn make(begin: *mut u8, end: *mut u8) -> Result<Self> {
        let range = Self { begin, end };
        ensure!(range.is_valid(), ErrorCode::InvalidMemoryRange);
        Ok(range)
    }

    /// A range over a mutable slice.
    pub fn from_slice(bytes: &mut [u8]) -> Self {
        let span = bytes.as_mut_ptr_range();
        Self::from_raw_parts(span.start, span.end)
    }

    pub fn begin(&self) -> *mut u8 {
        self.begin
    }

    pub fn end(&self) -> *mut u8 {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn is_valid(&self) -> bool {
        self.is_empty() || (!self.begin.is_null() && self.begin <= self.end)
    }

    /// `end - begin` in bytes; `0` for empty or inverted ranges.
    pub fn diff(&self) -> usize {
        (self.end as usize).saturating_sub(self.begin as usize)
    }

    pub fn total_size(&self) -> usize {
        self.diff()
    }

    /// `true` if `ptr` lies in `[begin, end)`, or `[begin, end]` when
    /// `inclusive`.
    pub fn has_ptr(&self, ptr: *const u8, inclusive: bool) -> bool {
        let ptr = ptr as *mut u8;
        if inclusive {
            self.begin <= ptr && ptr <= self.end
        } else {
            self.begin <= ptr && ptr < self.end
        }
    }

    /// `true` if `[begin, end)` is a well-formed sub-interval of this range.
    ///
    /// With `inclusive` the sub-interval may touch this range's end;
    /// otherwise it must stop strictly before it.
    pub fn has_range(&self, begin: *const u8, end: *const u8, inclusive: bool) -> bool {
        begin <= end && self.has_ptr(begin, true) && self.has_ptr(end, inclusive)
    }

    /// Replaces both ends without validation.
    pub fn set(&mut self, begin: *mut u8, end: *mut u8) {
        self.begin = begin;
        self.end = end;
    }

    pub fn assign(&mut self, other: &MemoryRange) {
        *self = *other;
    }

    /// Assigns `other` only if it is valid.
    pub fn assign_with_validate(&mut self, other: &MemoryRange) -> Result<()> {
        ensure!(other.is_valid(), ErrorCode::InvalidMemoryRange);
        *self = *other;
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    pub fn swap(&mut self, other: &mut MemoryRange) {
        std::mem::swap(self, other);
    }

    /// Takes `other`'s bounds and leaves `other` empty.
    pub fn exchange(&mut self, other: &mut MemoryRange) {
        self.clear();
        self.swap(other);
    }

    /// Pointer `offset` bytes from the front, or from the back when
    /// `reversed` (offset `0` reversed is the last byte).
    pub fn at(&self, offset: usize, reversed: bool) -> Result<*mut u8> {
        ensure!(self.is_valid(), ErrorCode::InvalidMemoryRange);
        ensure!(offset < self.total_size(), ErrorCode::OutOfRange);
        Ok(if reversed {
            self.end.wrapping_sub(offset + 1)
        } else {
            self.begin.wrapping_add(offset)
        })
    }

    pub fn front(&self) -> Result<*mut u8> {
        self.at(0, false)
    }

    pub fn back(&self) -> Result<*mut u8> {
        self.at(0, true)
    }

    /// The sub-range `[begin, end)`, which must lie inside this range.
    pub fn make_subrange(&self, begin: *mut u8, end: *mut u8) -> Result<Self> {
        ensure!(self.is_valid(), ErrorCode::InvalidMemoryRange);
        ensure!(
            self.has_range(begin, end, true),
            ErrorCode::InvalidMemoryRange,
            "sub-range is not contained in its parent"
        );
        Ok(Self { begin, end })
    }

    /// `length` bytes starting `offset` bytes into this range.
    pub fn slice(&self, offset: usize, length: usize) -> Result<Self> {
        ensure!(self.is_valid(), ErrorCode::InvalidMemoryRange);
        let stop = offset.checked_add(length);
        ensure!(
            matches!(stop, Some(stop) if stop <= self.total_size()),
            ErrorCode::OutOfRange
        );
        let begin = self.begin.wrapping_add(offset);
        Ok(Self {
            begin,
            end: begin.wrapping_add(length),
        })
    }

    /// Views the range as a byte slice.
    ///
    /// # Safety
    /// The range must be valid, readable and initialized for the returned
    /// lifetime, with no concurrent writers.
    pub unsafe fn as_bytes<'a>(&self) -> &'a [u8] {
        if self.begin.is_null() {
            return &[];
        }
        std::slice::from_raw_parts(self.begin, self.total_size())
    }

    /// Views the range as a mutable byte slice.
    ///
    /// # Safety
    /// As [`as_bytes`](Self::as_bytes), and no other reference may alias it.
    pub unsafe fn as_bytes_mut<'a>(&self) -> &'a mut [u8] {
        if self.begin.is_null() {
            return &mut [];
        }
        std::slice::from_raw_parts_mut(self.begin, self.total_size())
    }
}
