// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Register-width lanes and the width dispatcher.
//!
//! Every primitive of the engine is written once, generic over [`Lane`], and
//! instantiated for 8/16/32/64-bit integers plus a 128-bit lane. On
//! `x86_64` the 128-bit lane is an SSE2 register; elsewhere it is `u128`.
//!
//! Lane loads and stores are unaligned-safe, so every specialisation is
//! correct for any address. Alignment only decides which one is *fast*:
//! [`select_width`] picks the widest lane both addresses are aligned to.

use crate::align::are_aligned;

/// One machine word the engine moves or compares at a time.
pub trait Lane: Copy {
    /// Lane size in bytes.
    const WIDTH: usize;
    const NAME: &'static str;

    /// Reads one lane from `src`.
    ///
    /// # Safety
    /// `src..src + WIDTH` must be readable.
    unsafe fn load(src: *const u8) -> Self;

    /// Writes this lane to `dst`.
    ///
    /// # Safety
    /// `dst..dst + WIDTH` must be writable.
    unsafe fn store(self, dst: *mut u8);

    /// A lane with every byte set to `byte`.
    fn splat(byte: u8) -> Self;

    fn lane_eq(self, other: Self) -> bool;
}

macro_rules! int_lane {
    ($ty:ty, $name:literal) => {
        impl Lane for $ty {
            const WIDTH: usize = std::mem::size_of::<$ty>();
            const NAME: &'static str = $name;

            #[inline(always)]
            unsafe fn load(src: *const u8) -> Self {
                (src as *const $ty).read_unaligned()
            }

            #[inline(always)]
            unsafe fn store(self, dst: *mut u8) {
                (dst as *mut $ty).write_unaligned(self)
            }

            #[inline(always)]
            fn splat(byte: u8) -> Self {
                <$ty>::from_ne_bytes([byte; std::mem::size_of::<$ty>()])
            }

            #[inline(always)]
            fn lane_eq(self, other: Self) -> bool {
                self == other
            }
        }
    };
}

int_lane!(u8, "u8");
int_lane!(u16, "u16");
int_lane!(u32, "u32");
int_lane!(u64, "u64");
int_lane!(u128, "u128");

#[cfg(target_arch = "x86_64")]
mod sse {
    use super::Lane;
    use std::arch::x86_64::*;

    /// One SSE2 register. SSE2 is part of the `x86_64` baseline, so these
    /// intrinsics need no runtime feature check.
    #[derive(Clone, Copy)]
    pub struct Sse128(__m128i);

    impl Lane for Sse128 {
        const WIDTH: usize = 16;
        const NAME: &'static str = "sse2";

        #[inline(always)]
        unsafe fn load(src: *const u8) -> Self {
            Sse128(_mm_loadu_si128(src as *const __m128i))
        }

        #[inline(always)]
        unsafe fn store(self, dst: *mut u8) {
            _mm_storeu_si128(dst as *mut __m128i, self.0)
        }

        #[inline(always)]
        fn splat(byte: u8) -> Self {
            // SAFETY: SSE2 is always available on x86_64.
            unsafe { Sse128(_mm_set1_epi8(byte as i8)) }
        }

        #[inline(always)]
        fn lane_eq(self, other: Self) -> bool {
            // SAFETY: SSE2 is always available on x86_64.
            unsafe { _mm_movemask_epi8(_mm_cmpeq_epi8(self.0, other.0)) == 0xFFFF }
        }
    }
}

/// The 128-bit lane used by the dispatcher on this target.
#[cfg(target_arch = "x86_64")]
pub type Wide = sse::Sse128;
#[cfg(not(target_arch = "x86_64"))]
pub type Wide = u128;

/// `true` when the 128-bit lane is backed by SIMD registers.
pub fn simd_available() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("sse2")
    }
    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// The lane widths the dispatcher chooses between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
    W128,
}

impl Width {
    /// Widest first, the order the dispatcher tries them in.
    pub const ALL: [Width; 5] = [Width::W128, Width::W64, Width::W32, Width::W16, Width::W8];

    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
            Width::W64 => 8,
            Width::W128 => 16,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Width::W8 => "8-bit",
            Width::W16 => "16-bit",
            Width::W32 => "32-bit",
            Width::W64 => "64-bit",
            Width::W128 => "128-bit",
        }
    }
}

/// Widest lane for which `lhs` and `rhs` are simultaneously aligned.
#[inline]
pub fn select_width(lhs: usize, rhs: usize) -> Width {
    for width in Width::ALL {
        if are_aligned(lhs, rhs, width.bytes()) {
            return width;
        }
    }
    Width::W8
}

/// Expands `$body` once with `$lane` bound to the lane type for `$width`.
macro_rules! dispatch_width {
    ($width:expr, $lane:ident => $body:expr) => {
        match $width {
            $crate::lane::Width::W128 => {
                type $lane = $crate::lane::Wide;
                $body
            }
            $crate::lane::Width::W64 => {
                type $lane = u64;
                $body
            }
            $crate::lane::Width::W32 => {
                type $lane = u32;
                $body
            }
            $crate::lane::Width::W16 => {
                type $lane = u16;
                $body
            }
            $crate::lane::Width::W8 => {
                type $lane = u8;
                $body
            }
        }
    };
}
pub(crate) use dispatch_width;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_width() {
        assert_eq!(select_width(0x1000, 0x2000), Width::W128);
        assert_eq!(select_width(0x1008, 0x2000), Width::W64);
        assert_eq!(select_width(0x1004, 0x2008), Width::W32);
        assert_eq!(select_width(0x1002, 0x2000), Width::W16);
        assert_eq!(select_width(0x1001, 0x2000), Width::W8);
    }

    #[test]
    fn test_splat() {
        assert_eq!(<u32 as Lane>::splat(0xAB), 0xABAB_ABAB);
        assert_eq!(<u16 as Lane>::splat(0x01), 0x0101);
        assert!(Wide::splat(7).lane_eq(Wide::splat(7)));
        assert!(!Wide::splat(7).lane_eq(Wide::splat(8)));
    }

    #[test]
    fn test_wide_load_store_unaligned() {
        let src: Vec<u8> = (0..40).collect();
        let mut dst = vec![0u8; 40];
        unsafe {
            let lane = Wide::load(src.as_ptr().add(3));
            lane.store(dst.as_mut_ptr().add(5));
        }
        assert_eq!(&dst[5..21], &src[3..19]);
    }

    #[test]
    fn test_width_bytes() {
        assert_eq!(Width::W128.bytes(), <Wide as Lane>::WIDTH);
        assert_eq!(Width::W64.bytes(), <u64 as Lane>::WIDTH);
        assert_eq!(Width::ALL[0], Width::W128);
    }
}
