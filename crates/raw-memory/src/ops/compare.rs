// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Mismatch scans from either end.

use super::check_range;
use crate::lane::{dispatch_width, select_width, Lane};
use runtime_error::Result;

/// Offset of the first differing byte among the first `n`, or `None`.
///
/// # Safety
/// `lhs..lhs + n` and `rhs..rhs + n` must be readable.
#[inline]
pub unsafe fn compare_with<L: Lane>(lhs: *const u8, rhs: *const u8, n: usize) -> Option<usize> {
    let mut offset = 0;
    while offset + L::WIDTH <= n {
        if !L::load(lhs.add(offset)).lane_eq(L::load(rhs.add(offset))) {
            break;
        }
        offset += L::WIDTH;
    }
    while offset < n {
        if *lhs.add(offset) != *rhs.add(offset) {
            return Some(offset);
        }
        offset += 1;
    }
    None
}

/// Offset of the last differing byte among the first `n`, or `None`.
///
/// # Safety
/// `lhs..lhs + n` and `rhs..rhs + n` must be readable.
#[inline]
pub unsafe fn compare_from_end_with<L: Lane>(
    lhs: *const u8,
    rhs: *const u8,
    n: usize,
) -> Option<usize> {
    let mut remaining = n;
    while remaining >= L::WIDTH {
        let at = remaining - L::WIDTH;
        if !L::load(lhs.add(at)).lane_eq(L::load(rhs.add(at))) {
            break;
        }
        remaining = at;
    }
    while remaining > 0 {
        remaining -= 1;
        if *lhs.add(remaining) != *rhs.add(remaining) {
            return Some(remaining);
        }
    }
    None
}

pub(crate) unsafe fn compare_unchecked(lhs: *const u8, rhs: *const u8, n: usize) -> Option<usize> {
    dispatch_width!(select_width(lhs as usize, rhs as usize), L => compare_with::<L>(lhs, rhs, n))
}

pub(crate) unsafe fn compare_from_end_unchecked(
    lhs: *const u8,
    rhs: *const u8,
    n: usize,
) -> Option<usize> {
    let (lhs_end, rhs_end) = (lhs as usize + n, rhs as usize + n);
    dispatch_width!(select_width(lhs_end, rhs_end), L => compare_from_end_with::<L>(lhs, rhs, n))
}

/// Compares the leading `min(lhs_len, rhs_len)` bytes of both ranges.
///
/// Returns a pointer into `[lhs, lhs_end)` at the first mismatch, or `None`
/// when the compared prefix is identical. Only the shorter length is
/// scanned, so a range always "matches" its own prefix.
///
/// # Safety
/// Both ranges must be readable.
pub unsafe fn compare(
    lhs: *const u8,
    lhs_end: *const u8,
    rhs: *const u8,
    rhs_end: *const u8,
) -> Result<Option<*const u8>> {
    let lhs_len = check_range(lhs, lhs_end, "compare lhs is null")?;
    let rhs_len = check_range(rhs, rhs_end, "compare rhs is null")?;
    Ok(compare_unchecked(lhs, rhs, lhs_len.min(rhs_len)).map(|at| lhs.add(at)))
}

/// Compares the trailing `min(lhs_len, rhs_len)` bytes of both ranges.
///
/// Returns a pointer into `[lhs, lhs_end)` at the last mismatch, or `None`.
///
/// # Safety
/// Both ranges must be readable.
pub unsafe fn compare_from_end(
    lhs: *const u8,
    lhs_end: *const u8,
    rhs: *const u8,
    rhs_end: *const u8,
) -> Result<Option<*const u8>> {
    let lhs_len = check_range(lhs, lhs_end, "compare lhs is null")?;
    let rhs_len = check_range(rhs, rhs_end, "compare rhs is null")?;
    let n = lhs_len.min(rhs_len);
    let (lhs_tail, rhs_tail) = (lhs_end.sub(n), rhs_end.sub(n));
    Ok(compare_from_end_unchecked(lhs_tail, rhs_tail, n).map(|at| lhs_tail.add(at)))
}
