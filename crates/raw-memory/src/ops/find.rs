// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sliding-window substring search built on the compare primitive.
//!
//! Both directions are the naive O(n·m) scan: every window start is tried
//! in turn and checked with a full compare. There is no skip table.

use super::check_range;
use super::compare::compare_unchecked;
use runtime_error::Result;

pub(crate) unsafe fn find_unchecked(
    haystack: *const u8,
    haystack_len: usize,
    needle: *const u8,
    needle_len: usize,
) -> Option<usize> {
    if needle_len > haystack_len {
        return None;
    }
    (0..=haystack_len - needle_len)
        .find(|&at| compare_unchecked(haystack.add(at), needle, needle_len).is_none())
}

pub(crate) unsafe fn find_from_end_unchecked(
    haystack: *const u8,
    haystack_len: usize,
    needle: *const u8,
    needle_len: usize,
) -> Option<usize> {
    if needle_len > haystack_len {
        return None;
    }
    (0..=haystack_len - needle_len)
        .rev()
        .find(|&at| compare_unchecked(haystack.add(at), needle, needle_len).is_none())
}

/// First occurrence of `[rhs, rhs_end)` inside `[lhs, lhs_end)`.
///
/// An empty needle matches at `lhs`.
///
/// # Safety
/// Both ranges must be readable.
pub unsafe fn find(
    lhs: *const u8,
    lhs_end: *const u8,
    rhs: *const u8,
    rhs_end: *const u8,
) -> Result<Option<*const u8>> {
    let lhs_len = check_range(lhs, lhs_end, "find haystack is null")?;
    let rhs_len = check_range(rhs, rhs_end, "find needle is null")?;
    Ok(find_unchecked(lhs, lhs_len, rhs, rhs_len).map(|at| lhs.add(at)))
}

/// Last occurrence of `[rhs, rhs_end)` inside `[lhs, lhs_end)`.
///
/// An empty needle matches at `lhs_end`.
///
/// # Safety
/// Both ranges must be readable.
pub unsafe fn find_from_end(
    lhs: *const u8,
    lhs_end: *const u8,
    rhs: *const u8,
    rhs_end: *const u8,
) -> Result<Option<*const u8>> {
    let lhs_len = check_range(lhs, lhs_end, "find haystack is null")?;
    let rhs_len = check_range(rhs, rhs_end, "find needle is null")?;
    Ok(find_from_end_unchecked(lhs, lhs_len, rhs, rhs_len).map(|at| lhs.add(at)))
}
