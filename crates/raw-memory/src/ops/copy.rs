// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Forward copy, reverse copy and overlap-aware move.

use super::check_range;
use crate::lane::{dispatch_width, select_width, Lane};
use runtime_error::Result;

/// Copies `n` bytes front to back, one `L` lane at a time, then the tail.
///
/// Correct for disjoint ranges and for overlapping ranges with `dst < src`.
///
/// # Safety
/// `src..src + n` must be readable and `dst..dst + n` writable.
#[inline]
pub unsafe fn copy_with<L: Lane>(dst: *mut u8, src: *const u8, n: usize) {
    let words = n / L::WIDTH;
    let mut offset = 0;
    for _ in 0..words {
        L::load(src.add(offset)).store(dst.add(offset));
        offset += L::WIDTH;
    }
    while offset < n {
        *dst.add(offset) = *src.add(offset);
        offset += 1;
    }
}

/// Copies `n` bytes back to front, one `L` lane at a time, then the head.
///
/// Correct for disjoint ranges and for overlapping ranges with `dst > src`.
///
/// # Safety
/// `src..src + n` must be readable and `dst..dst + n` writable.
#[inline]
pub unsafe fn copy_reverse_with<L: Lane>(dst: *mut u8, src: *const u8, n: usize) {
    let mut remaining = n;
    while remaining >= L::WIDTH {
        remaining -= L::WIDTH;
        L::load(src.add(remaining)).store(dst.add(remaining));
    }
    while remaining > 0 {
        remaining -= 1;
        *dst.add(remaining) = *src.add(remaining);
    }
}

pub(crate) unsafe fn copy_unchecked(dst: *mut u8, src: *const u8, n: usize) {
    dispatch_width!(select_width(dst as usize, src as usize), L => copy_with::<L>(dst, src, n))
}

pub(crate) unsafe fn copy_reverse_unchecked(dst: *mut u8, src: *const u8, n: usize) {
    let (dst_end, src_end) = (dst as usize + n, src as usize + n);
    dispatch_width!(select_width(dst_end, src_end), L => copy_reverse_with::<L>(dst, src, n))
}

/// `true` when `lhs_begin` lies strictly inside `(rhs_begin, rhs_end)`.
///
/// With `lhs` the destination and `rhs` the source this is exactly the
/// case where a forward copy would overwrite source bytes before reading
/// them.
#[inline]
pub fn is_overlapped(lhs_begin: *const u8, rhs_begin: *const u8, rhs_end: *const u8) -> bool {
    !(lhs_begin <= rhs_begin || rhs_end <= lhs_begin)
}

pub(crate) unsafe fn move_unchecked(dst: *mut u8, src: *const u8, n: usize) {
    if is_overlapped(dst, src, src.add(n)) {
        copy_reverse_unchecked(dst, src, n);
    } else {
        copy_unchecked(dst, src, n);
    }
}

/// Copies `min(dst_len, src_len)` bytes from `[src, src_end)` to
/// `[dst, dst_end)` and returns the end of the written region.
///
/// The ranges must not overlap unless `dst < src`; use [`move_bytes`] when
/// in doubt.
///
/// # Safety
/// Both ranges must be valid for the accessed bytes.
pub unsafe fn copy(
    dst: *mut u8,
    dst_end: *mut u8,
    src: *const u8,
    src_end: *const u8,
) -> Result<*mut u8> {
    let dst_len = check_range(dst, dst_end, "copy destination is null")?;
    let src_len = check_range(src, src_end, "copy source is null")?;
    let n = dst_len.min(src_len);
    copy_unchecked(dst, src, n);
    Ok(dst.add(n))
}

/// Like [`copy`] but walks from the last byte to the first; returns `dst`.
///
/// # Safety
/// Both ranges must be valid for the accessed bytes.
pub unsafe fn copy_reverse(
    dst: *mut u8,
    dst_end: *mut u8,
    src: *const u8,
    src_end: *const u8,
) -> Result<*mut u8> {
    let dst_len = check_range(dst, dst_end, "copy destination is null")?;
    let src_len = check_range(src, src_end, "copy source is null")?;
    copy_reverse_unchecked(dst, src, dst_len.min(src_len));
    Ok(dst)
}

/// Overlap-aware copy of `min(dst_len, src_len)` bytes; returns the end of
/// the written region.
///
/// # Safety
/// Both ranges must be valid for the accessed bytes.
pub unsafe fn move_bytes(
    dst: *mut u8,
    dst_end: *mut u8,
    src: *const u8,
    src_end: *const u8,
) -> Result<*mut u8> {
    let dst_len = check_range(dst, dst_end, "move destination is null")?;
    let src_len = check_range(src, src_end, "move source is null")?;
    let n = dst_len.min(src_len);
    if is_overlapped(dst, src, src.add(n)) {
        tracing::trace!(n, "overlapping move, copying in reverse");
        let begin = copy_reverse(dst, dst.add(n), src, src.add(n))?;
        return Ok(begin.add(n));
    }
    copy(dst, dst.add(n), src, src.add(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use runtime_error::ErrorCode;

    fn pattern(n: usize) -> Vec<u8> {
        (0..n).map(|i| (i * 7 + 3) as u8).collect()
    }

    #[test]
    fn test_copy_returns_written_end() {
        let src = pattern(37);
        let mut dst = vec![0u8; 40];
        let end = unsafe {
            copy(
                dst.as_mut_ptr(),
                dst.as_mut_ptr().add(40),
                src.as_ptr(),
                src.as_ptr().add(37),
            )
        }
        .unwrap();
        assert_eq!(end as usize - dst.as_ptr() as usize, 37);
        assert_eq!(&dst[..37], &src[..]);
        assert!(dst[37..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_copy_null_is_error() {
        let src = pattern(4);
        let err = unsafe {
            copy(
                std::ptr::null_mut(),
                std::ptr::null_mut(),
                src.as_ptr(),
                src.as_ptr().add(4),
            )
        }
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NullPointer);
    }

    #[test]
    fn test_every_lane_copies_the_same() {
        let src = pattern(61);
        let expected = &src[1..58];
        let mut outputs = Vec::new();
        unsafe {
            let mut d = vec![0u8; 57];
            copy_with::<u8>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
            let mut d = vec![0u8; 57];
            copy_with::<u16>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
            let mut d = vec![0u8; 57];
            copy_with::<u32>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
            let mut d = vec![0u8; 57];
            copy_with::<u64>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
            let mut d = vec![0u8; 57];
            copy_with::<crate::lane::Wide>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
            let mut d = vec![0u8; 57];
            copy_reverse_with::<u64>(d.as_mut_ptr(), src.as_ptr().add(1), 57);
            outputs.push(d);
        }
        for out in outputs {
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_is_overlapped_is_one_sided() {
        let buf = [0u8; 32];
        let p = buf.as_ptr();
        unsafe {
            // dst inside (src, src_end): forward copy would clobber.
            assert!(is_overlapped(p.add(5), p, p.add(20)));
            // dst before src: forward copy is safe, test is false.
            assert!(!is_overlapped(p, p.add(5), p.add(25)));
            // identical start and disjoint ranges.
            assert!(!is_overlapped(p, p, p.add(20)));
            assert!(!is_overlapped(p.add(20), p, p.add(20)));
        }
    }

    #[test]
    fn test_move_forward_overlap() {
        let mut buf = pattern(32);
        let original = buf.clone();
        let p = buf.as_mut_ptr();
        unsafe {
            let end = move_bytes(p.add(5), p.add(25), p, p.add(20)).unwrap();
            assert_eq!(end, p.add(25));
        }
        assert_eq!(&buf[5..25], &original[0..20]);
        assert_eq!(&buf[..5], &original[..5]);
    }

    #[test]
    fn test_move_backward_overlap() {
        let mut buf = pattern(32);
        let original = buf.clone();
        let p = buf.as_mut_ptr();
        unsafe {
            move_bytes(p, p.add(20), p.add(7), p.add(27)).unwrap();
        }
        assert_eq!(&buf[0..20], &original[7..27]);
        assert_eq!(&buf[27..], &original[27..]);
    }
}
