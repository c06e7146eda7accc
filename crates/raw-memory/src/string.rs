// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! NUL-terminated byte strings stored inside bounded ranges.
//!
//! Unlike the C string functions these never read past `end`: a range that
//! holds no NUL byte is reported as [`ErrorCode::NoNullTerminator`] instead
//! of being scanned further.

use crate::ops::check_range;
use crate::ops::copy::copy_unchecked;
use crate::ops::find::find_unchecked;
use runtime_error::{ensure, ErrorCode, Result, RuntimeError};

const NUL: u8 = 0;

unsafe fn terminator(begin: *const u8, n: usize) -> Result<usize> {
    find_unchecked(begin, n, &NUL, 1).ok_or(RuntimeError::with_description(
        ErrorCode::NoNullTerminator,
        "string is not terminated within its range",
    ))
}

/// Length of the string at `begin`, excluding the terminator.
///
/// # Safety
/// `[begin, end)` must be readable.
pub unsafe fn str_length(begin: *const u8, end: *const u8) -> Result<usize> {
    let n = check_range(begin, end, "string is null")?;
    terminator(begin, n)
}

/// Copies the string in `[src, src_end)`, terminator included, to `dst`.
///
/// Returns a pointer to the terminator written into the destination.
/// Fails with [`ErrorCode::OutOfRange`] when the destination cannot hold
/// the string and its terminator.
///
/// # Safety
/// The source must be readable, the destination writable, and the two must
/// not overlap.
pub unsafe fn str_copy(
    dst: *mut u8,
    dst_end: *mut u8,
    src: *const u8,
    src_end: *const u8,
) -> Result<*mut u8> {
    let capacity = check_range(dst, dst_end, "string destination is null")?;
    let len = str_length(src, src_end)?;
    ensure!(
        len < capacity,
        ErrorCode::OutOfRange,
        "string destination is too small"
    );
    copy_unchecked(dst, src, len + 1);
    Ok(dst.add(len))
}

/// Appends the string in `[src, src_end)` to the string already stored in
/// `[dst, dst_end)`; returns a pointer to the new terminator.
///
/// # Safety
/// Same requirements as [`str_copy`].
pub unsafe fn str_concat(
    dst: *mut u8,
    dst_end: *mut u8,
    src: *const u8,
    src_end: *const u8,
) -> Result<*mut u8> {
    let capacity = check_range(dst, dst_end, "string destination is null")?;
    let head = terminator(dst, capacity)?;
    str_copy(dst.add(head), dst_end, src, src_end)
}
