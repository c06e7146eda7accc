// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pointer-range primitives.
//!
//! Every public function takes half-open `[begin, end)` ranges as raw
//! pointers, validates them, and then dispatches to a width-specialized
//! loop picked from the alignment of the addresses involved.

pub mod compare;
pub mod copy;
pub mod find;
pub mod set;
pub mod shift;

pub use compare::{compare, compare_from_end, compare_from_end_with, compare_with};
pub use copy::{copy, copy_reverse, copy_reverse_with, copy_with, is_overlapped, move_bytes};
pub use find::{find, find_from_end};
pub use set::{set, set_value, set_with};
pub use shift::{shift_left, shift_right, shift_right_and_fill};

use runtime_error::{ensure, ErrorCode, Result};

/// Validates a `[begin, end)` range and returns its length.
pub(crate) fn check_range(begin: *const u8, end: *const u8, desc: &'static str) -> Result<usize> {
    ensure!(!begin.is_null(), ErrorCode::NullPointer, desc);
    ensure!(
        end >= begin,
        ErrorCode::InvalidMemoryRange,
        "range end precedes its begin"
    );
    Ok(end as usize - begin as usize)
}
