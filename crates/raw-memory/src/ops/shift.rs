// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! In-place shifts of a byte range.
//!
//! A shift moves the contents of `[begin, end)` by `shift` bytes without
//! growing the range: bytes pushed past either edge are dropped, and the
//! vacated bytes keep their old values (or the fill byte, for
//! [`shift_right_and_fill`]).

use super::check_range;
use super::copy::move_unchecked;
use super::set::set_unchecked;
use runtime_error::Result;

pub(crate) unsafe fn shift_left_unchecked(begin: *mut u8, n: usize, shift: usize) -> usize {
    if shift >= n {
        return 0;
    }
    let kept = n - shift;
    move_unchecked(begin, begin.add(shift), kept);
    kept
}

pub(crate) unsafe fn shift_right_unchecked(begin: *mut u8, n: usize, shift: usize) -> usize {
    if shift >= n {
        return n;
    }
    move_unchecked(begin.add(shift), begin, n - shift);
    shift
}

/// Moves `[begin + shift, end)` to `begin`.
///
/// Returns the end of the shifted data, `end - shift` (or `begin` when
/// `shift` covers the whole range).
///
/// # Safety
/// The range must be readable and writable.
pub unsafe fn shift_left(begin: *mut u8, end: *mut u8, shift: usize) -> Result<*mut u8> {
    let n = check_range(begin, end, "shift range is null")?;
    Ok(begin.add(shift_left_unchecked(begin, n, shift)))
}

/// Moves `[begin, end - shift)` to `begin + shift`.
///
/// Returns the start of the shifted data, `begin + shift` (or `end` when
/// `shift` covers the whole range).
///
/// # Safety
/// The range must be readable and writable.
pub unsafe fn shift_right(begin: *mut u8, end: *mut u8, shift: usize) -> Result<*mut u8> {
    let n = check_range(begin, end, "shift range is null")?;
    Ok(begin.add(shift_right_unchecked(begin, n, shift)))
}

/// [`shift_right`], then fills the vacated head with `fill`.
///
/// # Safety
/// The range must be readable and writable.
pub unsafe fn shift_right_and_fill(
    begin: *mut u8,
    end: *mut u8,
    shift: usize,
    fill: u8,
) -> Result<*mut u8> {
    let n = check_range(begin, end, "shift range is null")?;
    let vacated = shift_right_unchecked(begin, n, shift);
    set_unchecked(begin, fill, vacated);
    Ok(begin.add(vacated))
}
