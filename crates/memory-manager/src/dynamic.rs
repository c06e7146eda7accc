// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Growable array of fixed-size elements.
//!
//! [`DynamicBlock`] separates its logical size from the capacity of its
//! [`UnifiedBlock`] storage and offers two growth policies:
//!
//! - [`reserve`](DynamicBlock::reserve) grows geometrically by the growth
//!   factor (permille), for append-heavy use.
//! - [`resize`](DynamicBlock::resize) grows to exactly the requested size
//!   and never gives capacity back.
//!
//! Capacity only goes down through [`shrink`](DynamicBlock::shrink) and
//! [`delete`](DynamicBlock::delete).

use raw_memory::{compare_slices, copy_slice, fill_slice};
use runtime_error::{ensure, scope, ErrorCode, Result, RuntimeError};

use crate::UnifiedBlock;

/// Default growth factor in permille: capacity grows by 1.5x.
pub const DEFAULT_GROWTH_FACTOR: usize = 1500;

#[derive(Debug)]
pub struct DynamicBlock {
    storage: UnifiedBlock,
    len: usize,
    growth_factor: usize,
}

impl DynamicBlock {
    /// An empty plain block on the thread's runtime allocator.
    pub fn new(element_size: usize) -> Result<Self> {
        Ok(Self::from_storage(UnifiedBlock::plain(element_size)?))
    }

    /// An empty block whose storage is aligned to `alignment`.
    pub fn aligned(element_size: usize, alignment: usize) -> Result<Self> {
        Ok(Self::from_storage(UnifiedBlock::aligned(
            element_size,
            alignment,
        )?))
    }

    /// Wraps existing storage; its current capacity is kept and the
    /// logical size starts at zero.
    pub fn from_storage(storage: UnifiedBlock) -> Self {
        Self {
            storage,
            len: 0,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    /// Sets the growth factor in permille; it must exceed 1000.
    pub fn with_growth_factor(mut self, permille: usize) -> Result<Self> {
        ensure!(
            permille > 1000,
            ErrorCode::OutOfRange,
            "growth factor must exceed 1000 permille"
        );
        self.growth_factor = permille;
        Ok(self)
    }

    pub fn growth_factor(&self) -> usize {
        self.growth_factor
    }

    pub fn storage(&self) -> &UnifiedBlock {
        &self.storage
    }

    pub fn element_size(&self) -> usize {
        self.storage.block().element_size()
    }

    /// Logical number of elements.
    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Elements the current storage can hold.
    pub fn capacity(&self) -> usize {
        self.storage.block().total_size() / self.element_size()
    }

    /// Bytes covered by the logical elements.
    pub fn total_size(&self) -> usize {
        self.len * self.element_size()
    }

    pub fn max_size(&self) -> usize {
        self.storage.block().max_size()
    }

    /// Elements that can still be added before hitting
    /// [`max_size`](Self::max_size).
    pub fn available_size(&self) -> usize {
        self.max_size() - self.len
    }

    /// Makes room for `additional` more elements.
    ///
    /// Returns `false` on failure; the error is left in the thread's error
    /// slot. See [`try_reserve`](Self::try_reserve) for the `Result` form.
    pub fn reserve(&mut self, additional: usize) -> bool {
        match self.try_reserve(additional) {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(%error, additional, "dynamic block reserve failed");
                scope::record(&error);
                false
            }
        }
    }

    /// Makes room for `additional` more elements, growing capacity
    /// geometrically.
    ///
    /// The new capacity is `capacity * growth_factor / 1000`, or exactly
    /// the target when empty, and is never below `size + additional`.
    pub fn try_reserve(&mut self, additional: usize) -> Result<()> {
        let target = self
            .len
            .checked_add(additional)
            .filter(|&target| target <= self.max_size())
            .ok_or(RuntimeError::new(ErrorCode::ExceedsMaxSize))?;
        let capacity = self.capacity();
        if capacity >= target {
            return Ok(());
        }
        let grown = if capacity == 0 {
            target
        } else {
            (capacity.saturating_mul(self.growth_factor) / 1000).min(self.max_size())
        };
        let new_capacity = grown.max(target);
        tracing::trace!(capacity, new_capacity, "growing dynamic block");
        self.storage.resize(new_capacity)
    }

    /// Sets the logical size to `n`, growing storage to exactly `n` when it
    /// is too small. New elements are zeroed. Capacity is never reduced.
    pub fn resize(&mut self, n: usize) -> Result<()> {
        if self.capacity() < n {
            self.storage.resize(n)?;
        }
        if n > self.len {
            let es = self.element_size();
            // SAFETY: storage is zeroed whenever it grows, so every byte
            // up to capacity is initialized, and `n <= capacity`.
            let storage = unsafe { self.storage.block().range().as_bytes_mut() };
            fill_slice(&mut storage[self.len * es..n * es], 0);
        }
        self.len = n;
        Ok(())
    }

    /// Drops the logical elements; capacity is untouched.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Releases capacity beyond the logical size.
    pub fn shrink(&mut self) -> Result<()> {
        if self.len < self.capacity() {
            self.storage.resize(self.len)?;
        }
        Ok(())
    }

    /// Clears and releases all storage.
    pub fn delete(&mut self) -> Result<()> {
        self.clear();
        self.shrink()
    }

    /// Appends one element given as its raw bytes.
    pub fn push(&mut self, element: &[u8]) -> Result<()> {
        ensure!(
            element.len() == self.element_size(),
            ErrorCode::DifferentElementSize,
            "pushed element has the wrong size"
        );
        self.try_reserve(1)?;
        let es = self.element_size();
        let at = self.len * es;
        // SAFETY: `try_reserve` guaranteed room for one more element and
        // grown storage is zeroed.
        let storage = unsafe { self.storage.block().range().as_bytes_mut() };
        copy_slice(&mut storage[at..at + es], element);
        self.len += 1;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<&[u8]> {
        ensure!(index < self.len, ErrorCode::OutOfRange);
        let es = self.element_size();
        Ok(&self.as_bytes()[index * es..(index + 1) * es])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        ensure!(index < self.len, ErrorCode::OutOfRange);
        let es = self.element_size();
        Ok(&mut self.as_bytes_mut()[index * es..(index + 1) * es])
    }

    /// The logical elements as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let total = self.total_size();
        // SAFETY: the first `len` elements are always initialized, and
        // the borrow of `self` keeps the storage alive and unmoved.
        unsafe { &self.storage.block().range().as_bytes()[..total] }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let total = self.total_size();
        // SAFETY: as `as_bytes`, with `&mut self` ruling out aliases.
        unsafe { &mut self.storage.block().range().as_bytes_mut()[..total] }
    }
}

/// Same logical size, same alignment and same element bytes.
impl PartialEq for DynamicBlock {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self.storage.alignment() == other.storage.alignment()
            && self.as_bytes().len() == other.as_bytes().len()
            && compare_slices(self.as_bytes(), other.as_bytes()).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserve_grows_geometrically() {
        let mut d = DynamicBlock::new(1).unwrap();
        assert!(d.reserve(10));
        assert_eq!(d.capacity(), 10);
        assert_eq!(d.size(), 0);

        d.resize(10).unwrap();
        assert!(d.reserve(1));
        assert_eq!(d.capacity(), 15);

        assert!(d.reserve(20));
        assert_eq!(d.capacity(), 30);
    }

    #[test]
    fn test_reserve_clamps_to_target() {
        let mut d = DynamicBlock::new(4).unwrap().with_growth_factor(1001).unwrap();
        d.resize(3).unwrap();
        assert!(d.reserve(1));
        assert_eq!(d.capacity(), 4);
    }

    #[test]
    fn test_reserve_failure_records_error() {
        scope::clear_error();
        let mut d = DynamicBlock::new(8).unwrap();
        assert!(!d.reserve(usize::MAX));
        assert_eq!(scope::get_code_and_clear(), ErrorCode::ExceedsMaxSize);
        assert_eq!(d.capacity(), 0);
    }

    #[test]
    fn test_resize_is_exact_and_never_shrinks() {
        let mut d = DynamicBlock::new(2).unwrap();
        d.resize(7).unwrap();
        assert_eq!((d.size(), d.capacity()), (7, 7));
        assert!(d.as_bytes().iter().all(|&b| b == 0));

        d.resize(2).unwrap();
        assert_eq!((d.size(), d.capacity()), (2, 7));
    }

    #[test]
    fn test_shrink_and_delete() {
        let mut d = DynamicBlock::new(4).unwrap();
        d.resize(5).unwrap();
        d.resize(2).unwrap();
        d.shrink().unwrap();
        assert_eq!(d.capacity(), 2);
        d.shrink().unwrap();
        assert_eq!(d.capacity(), 2);

        d.delete().unwrap();
        assert_eq!((d.size(), d.capacity()), (0, 0));
    }

    #[test]
    fn test_push_and_get() {
        let mut d = DynamicBlock::new(2).unwrap();
        for i in 0u16..20 {
            d.push(&i.to_le_bytes()).unwrap();
        }
        assert_eq!(d.size(), 20);
        assert!(d.capacity() >= 20);
        assert_eq!(d.get(13).unwrap(), &13u16.to_le_bytes());
        assert_eq!(d.get(20).unwrap_err().code(), ErrorCode::OutOfRange);
        assert_eq!(
            d.push(&[1, 2, 3]).unwrap_err().code(),
            ErrorCode::DifferentElementSize
        );

        d.get_mut(0).unwrap().copy_from_slice(&[0xFF, 0xFF]);
        assert_eq!(d.get(0).unwrap(), &[0xFF, 0xFF]);
    }

    #[test]
    fn test_equality() {
        let mut a = DynamicBlock::new(1).unwrap();
        let mut b = DynamicBlock::new(1).unwrap();
        a.push(b"x").unwrap();
        b.reserve(100);
        b.push(b"x").unwrap();
        assert_eq!(a, b);

        b.push(b"y").unwrap();
        assert_ne!(a, b);

        let c = DynamicBlock::aligned(1, 16).unwrap();
        assert_ne!(DynamicBlock::new(1).unwrap(), c);
    }

    #[test]
    fn test_growth_factor_validation() {
        let err = DynamicBlock::new(1).unwrap().with_growth_factor(1000).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfRange);
    }

    #[test]
    fn test_growth_keeps_storage_initialized() {
        for mut d in [DynamicBlock::new(1).unwrap(), DynamicBlock::aligned(1, 32).unwrap()] {
            assert!(d.reserve(8));
            d.push(b"a").unwrap();
            assert!(d.reserve(64));
            assert!(d.capacity() >= 65);

            // SAFETY: the block is alive and not mutably borrowed.
            let storage = unsafe { d.storage().block().range().as_bytes() };
            assert_eq!(storage[0], b'a');
            assert!(storage[1..].iter().all(|&b| b == 0));

            d.resize(d.capacity()).unwrap();
            assert_eq!(d.get(0).unwrap(), b"a");
        }
    }

    #[test]
    fn test_trivial_alignment_is_plain() {
        let d = DynamicBlock::aligned(4, 1).unwrap();
        assert_eq!(d.storage().alignment(), None);
    }

    #[test]
    fn test_aligned_dynamic_block() {
        let mut d = DynamicBlock::aligned(8, 64).unwrap();
        for i in 0u64..33 {
            d.push(&i.to_ne_bytes()).unwrap();
            assert_eq!(d.storage().block().begin() as usize % 64, 0);
        }
        assert_eq!(d.get(32).unwrap(), &32u64.to_ne_bytes());
    }
}
