// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Byte and pattern fills.

use super::check_range;
use super::copy::copy_unchecked;
use crate::lane::{dispatch_width, select_width, Lane};
use runtime_error::Result;

/// Writes `byte` to `n` bytes at `dst`, one splatted `L` lane at a time.
///
/// # Safety
/// `dst..dst + n` must be writable.
#[inline]
pub unsafe fn set_with<L: Lane>(dst: *mut u8, byte: u8, n: usize) {
    let lane = L::splat(byte);
    let words = n / L::WIDTH;
    let mut offset = 0;
    for _ in 0..words {
        lane.store(dst.add(offset));
        offset += L::WIDTH;
    }
    while offset < n {
        *dst.add(offset) = byte;
        offset += 1;
    }
}

pub(crate) unsafe fn set_unchecked(dst: *mut u8, byte: u8, n: usize) {
    let address = dst as usize;
    dispatch_width!(select_width(address, address), L => set_with::<L>(dst, byte, n))
}

/// Repeats `pattern` over `n` bytes at `dst`, truncating the last copy.
///
/// The first copy comes from `pattern`; every later step copies the
/// already-filled prefix, doubling the filled span each time.
pub(crate) unsafe fn set_pattern_unchecked(
    dst: *mut u8,
    n: usize,
    pattern: *const u8,
    pattern_len: usize,
) {
    if pattern_len == 0 || n == 0 {
        return;
    }
    let mut filled = pattern_len.min(n);
    copy_unchecked(dst, pattern, filled);
    while filled < n {
        let chunk = filled.min(n - filled);
        copy_unchecked(dst.add(filled), dst, chunk);
        filled += chunk;
    }
}

/// Fills `[begin, end)` with `byte`; returns `end`.
///
/// # Safety
/// The range must be writable.
pub unsafe fn set(begin: *mut u8, end: *mut u8, byte: u8) -> Result<*mut u8> {
    let n = check_range(begin, end, "fill destination is null")?;
    set_unchecked(begin, byte, n);
    Ok(end)
}

/// Fills `[begin, end)` with repeated copies of `[value, value_end)`,
/// truncating the last one; returns `end`.
///
/// An empty value leaves the destination untouched. The value must not
/// overlap the destination.
///
/// # Safety
/// The destination must be writable and the value readable.
pub unsafe fn set_value(
    begin: *mut u8,
    end: *mut u8,
    value: *const u8,
    value_end: *const u8,
) -> Result<*mut u8> {
    let n = check_range(begin, end, "fill destination is null")?;
    let value_len = check_range(value, value_end, "fill value is null")?;
    set_pattern_unchecked(begin, n, value, value_len);
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_unaligned_span() {
        let mut buf = vec![0u8; 64];
        let p = buf.as_mut_ptr();
        let end = unsafe { set(p.add(3), p.add(50), 0xA5) }.unwrap();
        assert_eq!(end, unsafe { p.add(50) });
        assert!(buf[..3].iter().all(|&b| b == 0));
        assert!(buf[3..50].iter().all(|&b| b == 0xA5));
        assert!(buf[50..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_with_each_lane() {
        for n in [0usize, 1, 15, 16, 17, 33] {
            let mut a = vec![0u8; n];
            let mut b = vec![0u8; n];
            let mut c = vec![0u8; n];
            unsafe {
                set_with::<u8>(a.as_mut_ptr(), 9, n);
                set_with::<u64>(b.as_mut_ptr(), 9, n);
                set_with::<crate::lane::Wide>(c.as_mut_ptr(), 9, n);
            }
            assert_eq!(a, vec![9u8; n]);
            assert_eq!(a, b);
            assert_eq!(a, c);
        }
    }

    #[test]
    fn test_set_value_repeats_pattern() {
        let mut buf = vec![0u8; 11];
        let pattern = [1u8, 2, 3, 4];
        let p = buf.as_mut_ptr();
        unsafe {
            set_value(p, p.add(11), pattern.as_ptr(), pattern.as_ptr().add(4)).unwrap();
        }
        assert_eq!(buf, [1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3]);
    }

    #[test]
    fn test_set_value_empty_pattern_is_noop() {
        let mut buf = vec![5u8; 4];
        let pattern: [u8; 0] = [];
        let p = buf.as_mut_ptr();
        unsafe {
            set_value(p, p.add(4), pattern.as_ptr(), pattern.as_ptr()).unwrap();
        }
        assert_eq!(buf, [5; 4]);
    }

    #[test]
    fn test_set_null() {
        let err = unsafe { set(std::ptr::null_mut(), std::ptr::null_mut(), 0) }.unwrap_err();
        assert_eq!(err.code(), runtime_error::ErrorCode::NullPointer);
    }
}
