// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Power-of-two and address alignment arithmetic.

/// Largest alignment the engine distinguishes (one SSE register).
pub const MAX_LANE_ALIGNMENT: usize = 16;

/// `true` if exactly one bit of `value` is set.
#[inline]
pub const fn is_power_of_two(value: usize) -> bool {
    value != 0 && value & (value - 1) == 0
}

/// `true` if `alignment` requests a real boundary: a power of two above 1.
///
/// `0` and `1` both mean "no special alignment".
#[inline]
pub const fn is_strict_alignment(alignment: usize) -> bool {
    alignment > 1 && is_power_of_two(alignment)
}

/// `true` if `address` is a multiple of `alignment` (a power of two).
#[inline]
pub const fn is_aligned(address: usize, alignment: usize) -> bool {
    address & (alignment - 1) == 0
}

/// `true` if both addresses are multiples of `alignment`.
#[inline]
pub const fn are_aligned(lhs: usize, rhs: usize, alignment: usize) -> bool {
    (lhs | rhs) & (alignment - 1) == 0
}

/// Rounds `address` up to the next multiple of `alignment`.
///
/// Returns `None` on overflow.
#[inline]
pub const fn align_up(address: usize, alignment: usize) -> Option<usize> {
    let mask = alignment - 1;
    match address.checked_add(mask) {
        Some(v) => Some(v & !mask),
        None => None,
    }
}

/// Rounds `address` down to a multiple of `alignment`.
#[inline]
pub const fn align_down(address: usize, alignment: usize) -> usize {
    address & !(alignment - 1)
}

/// Largest power of two (capped at [`MAX_LANE_ALIGNMENT`]) dividing `address`.
#[inline]
pub fn alignment_of(address: usize) -> usize {
    if address == 0 {
        return MAX_LANE_ALIGNMENT;
    }
    (1usize << address.trailing_zeros()).min(MAX_LANE_ALIGNMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_of_two() {
        assert!(!is_power_of_two(0));
        assert!(is_power_of_two(1));
        assert!(is_power_of_two(64));
        assert!(!is_power_of_two(3));
        assert!(!is_power_of_two(usize::MAX));
        assert!(is_power_of_two(1 << (usize::BITS - 1)));
    }

    #[test]
    fn test_strict_alignment() {
        assert!(!is_strict_alignment(0));
        assert!(!is_strict_alignment(1));
        assert!(is_strict_alignment(2));
        assert!(!is_strict_alignment(12));
    }

    #[test]
    fn test_align_up_down() {
        assert_eq!(align_up(0, 16), Some(0));
        assert_eq!(align_up(1, 16), Some(16));
        assert_eq!(align_up(32, 16), Some(32));
        assert_eq!(align_up(usize::MAX, 16), None);
        assert_eq!(align_down(31, 16), 16);
    }

    #[test]
    fn test_are_aligned() {
        assert!(are_aligned(64, 128, 8));
        assert!(!are_aligned(64, 129, 8));
        assert!(is_aligned(48, 16));
        assert!(!is_aligned(50, 4));
    }

    #[test]
    fn test_alignment_of() {
        assert_eq!(alignment_of(0x1001), 1);
        assert_eq!(alignment_of(0x1002), 2);
        assert_eq!(alignment_of(0x1008), 8);
        assert_eq!(alignment_of(0x1000), MAX_LANE_ALIGNMENT);
    }
}
