// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # raw-memory
//!
//! Width-specialised byte primitives used by every block type in memrt.
//!
//! This crate provides:
//! - Pointer-range primitives in [`ops`]: copy, reverse copy, overlap-aware
//!   move, compare, find, fill and shift over `[begin, end)` pairs.
//! - [`Lane`] implementations for 8/16/32/64/128-bit words (SSE2 on
//!   `x86_64`) and the [`select_width`] dispatcher.
//! - Safe slice wrappers such as [`copy_slice`] and [`find_slice`].
//! - Bounded NUL-terminated string helpers.
//!
//! # Design Goals
//! - Results never depend on which width was selected.
//! - Null or inverted ranges surface as [`runtime_error::RuntimeError`],
//!   never as undefined behaviour inside the engine.

pub mod align;
mod lane;
pub mod ops;
mod slice;
mod string;

pub use lane::{select_width, simd_available, Lane, Wide, Width};
pub use ops::{
    compare, compare_from_end, copy, copy_reverse, find, find_from_end, is_overlapped,
    move_bytes, set, set_value, shift_left, shift_right, shift_right_and_fill,
};
pub use slice::{
    compare_slices, copy_slice, fill_pattern, fill_slice, find_slice, move_within, rfind_slice,
    shift_slice_left, shift_slice_right,
};
pub use string::{str_concat, str_copy, str_length};
