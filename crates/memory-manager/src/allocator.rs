// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The allocator capability and the range-level operations derived from it.
//!
//! A [`MemoryAllocator`] only knows how to hand out and take back untyped
//! byte regions. Everything the block types need on top of that (resizing
//! with content preservation, over-aligned storage) is expressed here as
//! free functions over `&dyn MemoryAllocator` and a [`MemoryRange`], so any
//! allocator gets them for free.
//!
//! # Aligned storage
//!
//! [`align_alloc`] over-allocates by `alignment - 1` plus one pointer-sized
//! header, rounds the start up, and stores the original pointer in the
//! header just before the aligned address:
//!
//! ```text
//!  raw                       aligned
//!   │  padding  │ header(raw) │ size bytes ...           │
//!   └───────────┴─────────────┴──────────────────────────┘
//! ```
//!
//! [`align_free`] reads the header back to release the original region.

use std::alloc::{self, Layout};
use std::collections::HashMap;
use std::mem::size_of;
use std::ptr::NonNull;
use std::sync::Mutex;

use raw_memory::align::{align_up, is_power_of_two};
use runtime_error::{ensure, ErrorCode, Result, RuntimeError};

use crate::{AllocationStats, MemoryRange};

/// A swappable source of raw memory.
///
/// Implementations are capability objects: they do not own what they hand
/// out. Memory returned by [`allocate`](Self::allocate) must be released
/// through the same allocator.
pub trait MemoryAllocator: Send + Sync {
    /// Returns `size` writable bytes.
    fn allocate(&self, size: usize) -> Result<NonNull<u8>>;

    /// Releases memory obtained from [`allocate`](Self::allocate).
    ///
    /// # Safety
    /// `ptr` must come from this allocator and not have been released yet.
    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> Result<()>;

    fn name(&self) -> &str;

    /// Statistics, for allocators that keep them.
    fn stats(&self) -> Option<AllocationStats> {
        None
    }
}

/// Bytes reserved in front of every [`SystemAllocator`] region. Sized to the
/// widest lane so the returned pointer keeps the header's alignment.
const SIZE_HEADER: usize = 16;

fn system_layout(total: usize) -> Option<Layout> {
    Layout::from_size_align(total, SIZE_HEADER).ok()
}

/// `malloc`-style allocation on top of the global allocator.
///
/// Returns null on failure. The region is prefixed by a size header so
/// [`system_free`] needs only the pointer.
pub fn system_malloc(size: usize) -> *mut u8 {
    let Some(total) = size.checked_add(SIZE_HEADER) else {
        return std::ptr::null_mut();
    };
    let Some(layout) = system_layout(total) else {
        return std::ptr::null_mut();
    };
    // SAFETY: `layout` has a non-zero size.
    unsafe {
        let base = alloc::alloc(layout);
        if base.is_null() {
            return base;
        }
        (base as *mut usize).write(total);
        base.add(SIZE_HEADER)
    }
}

/// `free`-style release for pointers from [`system_malloc`]. Null is ignored.
pub fn system_free(ptr: *mut u8) {
    if ptr.is_null() {
        return;
    }
    // SAFETY: `ptr` came from `system_malloc`, which wrote the total size
    // `SIZE_HEADER` bytes in front of it.
    unsafe {
        let base = ptr.sub(SIZE_HEADER);
        let total = (base as *const usize).read();
        if let Some(layout) = system_layout(total) {
            alloc::dealloc(base, layout);
        }
    }
}

/// The default allocator: the Rust global allocator behind a size header.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl MemoryAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>> {
        NonNull::new(system_malloc(size)).ok_or(RuntimeError::new(ErrorCode::MemoryNotAllocated))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> Result<()> {
        system_free(ptr.as_ptr());
        Ok(())
    }

    fn name(&self) -> &str {
        "system"
    }
}

pub type AllocFn = fn(usize) -> *mut u8;
pub type DeallocFn = fn(*mut u8);

/// An allocator assembled from a pair of plain function pointers.
///
/// Either half may be missing; using a missing half fails with
/// [`ErrorCode::AllocatorFunctionNotInitialized`] or
/// [`ErrorCode::DeallocatorFunctionNotInitialized`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FnAllocator {
    pub alloc_fn: Option<AllocFn>,
    pub dealloc_fn: Option<DeallocFn>,
}

impl FnAllocator {
    pub const fn new(alloc_fn: AllocFn, dealloc_fn: DeallocFn) -> Self {
        Self {
            alloc_fn: Some(alloc_fn),
            dealloc_fn: Some(dealloc_fn),
        }
    }

    /// [`system_malloc`] / [`system_free`].
    pub const fn system() -> Self {
        Self::new(system_malloc, system_free)
    }
}

impl MemoryAllocator for FnAllocator {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>> {
        let alloc_fn = self
            .alloc_fn
            .ok_or(RuntimeError::new(ErrorCode::AllocatorFunctionNotInitialized))?;
        NonNull::new(alloc_fn(size)).ok_or(RuntimeError::new(ErrorCode::MemoryNotAllocated))
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> Result<()> {
        let dealloc_fn = self
            .dealloc_fn
            .ok_or(RuntimeError::new(ErrorCode::DeallocatorFunctionNotInitialized))?;
        dealloc_fn(ptr.as_ptr());
        Ok(())
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// Wraps an allocator and records [`AllocationStats`] for it.
#[derive(Debug, Default)]
pub struct TrackingAllocator<A> {
    inner: A,
    /// Live allocation sizes keyed by address.
    sizes: Mutex<HashMap<usize, usize>>,
    stats: Mutex<AllocationStats>,
}

impl<A: MemoryAllocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            sizes: Mutex::new(HashMap::new()),
            stats: Mutex::new(AllocationStats::default()),
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Returns a snapshot of the statistics.
    pub fn snapshot(&self) -> AllocationStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl<A: MemoryAllocator> MemoryAllocator for TrackingAllocator<A> {
    fn allocate(&self, size: usize) -> Result<NonNull<u8>> {
        let result = self.inner.allocate(size);
        if let Ok(mut stats) = self.stats.lock() {
            match &result {
                Ok(ptr) => {
                    stats.record_allocation(size);
                    if let Ok(mut sizes) = self.sizes.lock() {
                        sizes.insert(ptr.as_ptr() as usize, size);
                    }
                }
                Err(_) => stats.record_failure(),
            }
        }
        result
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>) -> Result<()> {
        self.inner.deallocate(ptr)?;
        let size = self
            .sizes
            .lock()
            .ok()
            .and_then(|mut sizes| sizes.remove(&(ptr.as_ptr() as usize)))
            .unwrap_or(0);
        if let Ok(mut stats) = self.stats.lock() {
            stats.record_deallocation(size);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn stats(&self) -> Option<AllocationStats> {
        Some(self.snapshot())
    }
}

/// Allocates `size` bytes and returns them as a range.
///
/// A zero size yields the empty `{null, null}` range without touching the
/// allocator.
pub fn alloc(allocator: &dyn MemoryAllocator, size: usize) -> Result<MemoryRange> {
    if size == 0 {
        return Ok(MemoryRange::empty());
    }
    let begin = allocator.allocate(size)?.as_ptr();
    Ok(MemoryRange::from_raw_parts(begin, begin.wrapping_add(size)))
}

/// Releases the storage behind `range` and clears it.
///
/// # Safety
/// `range` must be empty with a null begin, or come from [`alloc`] or
/// [`realloc`] with the same allocator.
pub unsafe fn free(allocator: &dyn MemoryAllocator, range: &mut MemoryRange) -> Result<()> {
    if let Some(begin) = NonNull::new(range.begin()) {
        allocator.deallocate(begin)?;
    }
    range.clear();
    Ok(())
}

/// Resizes the storage behind `range` to `size` bytes, preserving the
/// leading `min(old, size)` bytes. Bytes past that prefix are zeroed, so
/// storage that only ever grows through `realloc` is fully initialized.
///
/// On failure `range` still describes the old, intact storage.
///
/// # Safety
/// Same as [`free`]. Every byte of `range` must be initialized.
pub unsafe fn realloc(
    allocator: &dyn MemoryAllocator,
    range: &mut MemoryRange,
    size: usize,
) -> Result<()> {
    ensure!(
        range.is_valid(),
        ErrorCode::InvalidMemoryRange,
        "cannot reallocate an invalid range"
    );
    if size == 0 {
        return free(allocator, range);
    }
    let fresh = alloc(allocator, size)?;
    transfer(&fresh, range)?;
    if !range.begin().is_null() {
        free(allocator, range)?;
    }
    *range = fresh;
    Ok(())
}

/// Copies the leading `min(old, fresh)` bytes of `old` into `fresh` and
/// zeroes the rest of `fresh`.
unsafe fn transfer(fresh: &MemoryRange, old: &MemoryRange) -> Result<()> {
    let n = if old.begin().is_null() {
        0
    } else {
        old.total_size().min(fresh.total_size())
    };
    if n > 0 {
        raw_memory::copy(fresh.begin(), fresh.end(), old.begin(), old.begin().add(n))?;
    }
    raw_memory::set(fresh.begin().add(n), fresh.end(), 0)?;
    Ok(())
}

const ALIGN_HEADER: usize = size_of::<*mut u8>();

fn check_alignment(alignment: usize) -> Result<()> {
    ensure!(alignment != 0, ErrorCode::ZeroAlignmentSize);
    ensure!(
        is_power_of_two(alignment),
        ErrorCode::NotPowerOfTwo,
        "alignment must be a power of two"
    );
    Ok(())
}

/// Allocates `size` bytes starting at a multiple of `alignment`.
pub fn align_alloc(
    allocator: &dyn MemoryAllocator,
    size: usize,
    alignment: usize,
) -> Result<MemoryRange> {
    check_alignment(alignment)?;
    if size == 0 {
        return Ok(MemoryRange::empty());
    }
    let total = size
        .checked_add(alignment - 1)
        .and_then(|n| n.checked_add(ALIGN_HEADER))
        .ok_or(RuntimeError::with_description(
            ErrorCode::ExceedsMaxSize,
            "aligned allocation size overflows",
        ))?;
    let block = allocator.allocate(total)?;
    let raw = block.as_ptr();
    let raw_address = raw as usize;
    let Some(aligned_address) = raw_address
        .checked_add(ALIGN_HEADER)
        .and_then(|address| align_up(address, alignment))
    else {
        // SAFETY: `block` was just allocated and nothing else refers to it.
        unsafe { allocator.deallocate(block)? };
        return Err(RuntimeError::with_description(
            ErrorCode::ExceedsMaxSize,
            "aligned address overflows",
        ));
    };
    // SAFETY: `aligned - ALIGN_HEADER .. aligned + size` lies inside the
    // `total` bytes just allocated.
    unsafe {
        let aligned = raw.add(aligned_address - raw_address);
        (aligned.sub(ALIGN_HEADER) as *mut *mut u8).write_unaligned(raw);
        Ok(MemoryRange::from_raw_parts(aligned, aligned.add(size)))
    }
}

/// Releases storage obtained from [`align_alloc`] and clears `range`.
///
/// # Safety
/// `range` must be empty with a null begin, or come from [`align_alloc`] or
/// [`align_realloc`] with the same allocator.
pub unsafe fn align_free(allocator: &dyn MemoryAllocator, range: &mut MemoryRange) -> Result<()> {
    let begin = range.begin();
    if !begin.is_null() {
        let raw = (begin.sub(ALIGN_HEADER) as *const *mut u8).read_unaligned();
        let raw = NonNull::new(raw).ok_or(RuntimeError::with_description(
            ErrorCode::NullPointer,
            "aligned block header is corrupt",
        ))?;
        allocator.deallocate(raw)?;
    }
    range.clear();
    Ok(())
}

/// Aligned counterpart of [`realloc`]; bytes past the preserved prefix are
/// zeroed.
///
/// # Safety
/// Same as [`align_free`]. Every byte of `range` must be initialized.
pub unsafe fn align_realloc(
    allocator: &dyn MemoryAllocator,
    range: &mut MemoryRange,
    size: usize,
    alignment: usize,
) -> Result<()> {
    check_alignment(alignment)?;
    ensure!(
        range.is_valid(),
        ErrorCode::InvalidMemoryRange,
        "cannot reallocate an invalid range"
    );
    if size == 0 {
        return align_free(allocator, range);
    }
    let fresh = align_alloc(allocator, size, alignment)?;
    transfer(&fresh, range)?;
    if !range.begin().is_null() {
        align_free(allocator, range)?;
    }
    *range = fresh;
    Ok(())
}
