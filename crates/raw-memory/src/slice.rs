// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Safe slice front-ends over the pointer primitives.
//!
//! The borrow checker already guarantees non-null, well-ordered and (for
//! two-slice calls) non-overlapping ranges, so these skip range validation
//! and call straight into the width-dispatched loops.

use std::ops::Range;

use crate::ops::compare::compare_unchecked;
use crate::ops::copy::{copy_unchecked, move_unchecked};
use crate::ops::find::{find_from_end_unchecked, find_unchecked};
use crate::ops::set::{set_pattern_unchecked, set_unchecked};
use crate::ops::shift::{shift_left_unchecked, shift_right_unchecked};
use runtime_error::{ensure, ErrorCode, Result};

/// Copies `min(dst.len(), src.len())` bytes; returns the count.
pub fn copy_slice(dst: &mut [u8], src: &[u8]) -> usize {
    let n = dst.len().min(src.len());
    // SAFETY: both slices are valid for `n` bytes and cannot alias.
    unsafe { copy_unchecked(dst.as_mut_ptr(), src.as_ptr(), n) };
    n
}

/// Moves `buf[src]` to `buf[dest..]`, handling overlap.
pub fn move_within(buf: &mut [u8], src: Range<usize>, dest: usize) -> Result<()> {
    ensure!(
        src.start <= src.end && src.end <= buf.len(),
        ErrorCode::OutOfRange,
        "move source is outside the buffer"
    );
    let n = src.end - src.start;
    ensure!(
        dest <= buf.len() - n,
        ErrorCode::OutOfRange,
        "move destination is outside the buffer"
    );
    let base = buf.as_mut_ptr();
    // SAFETY: both sub-ranges were bounds-checked above.
    unsafe { move_unchecked(base.add(dest), base.add(src.start), n) };
    Ok(())
}

/// Index of the first mismatch within the shorter length, or `None`.
pub fn compare_slices(lhs: &[u8], rhs: &[u8]) -> Option<usize> {
    let n = lhs.len().min(rhs.len());
    // SAFETY: both slices are readable for `n` bytes.
    unsafe { compare_unchecked(lhs.as_ptr(), rhs.as_ptr(), n) }
}

/// Index of the first occurrence of `needle` in `haystack`.
pub fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    // SAFETY: lengths come from the slices themselves.
    unsafe { find_unchecked(haystack.as_ptr(), haystack.len(), needle.as_ptr(), needle.len()) }
}

/// Index of the last occurrence of `needle` in `haystack`.
pub fn rfind_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    // SAFETY: lengths come from the slices themselves.
    unsafe {
        find_from_end_unchecked(haystack.as_ptr(), haystack.len(), needle.as_ptr(), needle.len())
    }
}

pub fn fill_slice(buf: &mut [u8], byte: u8) {
    // SAFETY: the slice is writable for its whole length.
    unsafe { set_unchecked(buf.as_mut_ptr(), byte, buf.len()) }
}

/// Tiles `pattern` over `buf`, truncating the last copy.
pub fn fill_pattern(buf: &mut [u8], pattern: &[u8]) {
    // SAFETY: `pattern` is a shared borrow and cannot alias `buf`.
    unsafe { set_pattern_unchecked(buf.as_mut_ptr(), buf.len(), pattern.as_ptr(), pattern.len()) }
}

/// Shifts the contents left by `shift`; returns the length of the kept data.
pub fn shift_slice_left(buf: &mut [u8], shift: usize) -> usize {
    // SAFETY: the slice is readable and writable for its whole length.
    unsafe { shift_left_unchecked(buf.as_mut_ptr(), buf.len(), shift) }
}

/// Shifts the contents right by `shift`, filling the vacated head with
/// `fill` when given; returns the length of the vacated head.
pub fn shift_slice_right(buf: &mut [u8], shift: usize, fill: Option<u8>) -> usize {
    // SAFETY: the slice is readable and writable for its whole length.
    unsafe {
        let vacated = shift_right_unchecked(buf.as_mut_ptr(), buf.len(), shift);
        if let Some(byte) = fill {
            set_unchecked(buf.as_mut_ptr(), byte, vacated);
        }
        vacated
    }
}
