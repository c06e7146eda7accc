// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-thread default allocator.
//!
//! Blocks built without an explicit allocator capture the calling thread's
//! runtime allocator at construction and keep using it for their whole
//! lifetime, so swapping the default never strands live storage.

use std::cell::RefCell;
use std::sync::Arc;

use crate::{MemoryAllocator, SystemAllocator};

/// Shared handle to an allocator.
pub type SharedAllocator = Arc<dyn MemoryAllocator>;

thread_local! {
    static RUNTIME_ALLOCATOR: RefCell<SharedAllocator> = RefCell::new(Arc::new(SystemAllocator));
}

/// The calling thread's current default allocator.
pub fn runtime_allocator() -> SharedAllocator {
    RUNTIME_ALLOCATOR.with(|slot| Arc::clone(&slot.borrow()))
}

/// Installs `allocator` as the calling thread's default and returns the
/// previous one.
pub fn set_runtime_allocator(allocator: SharedAllocator) -> SharedAllocator {
    tracing::debug!(allocator = allocator.name(), "installing runtime allocator");
    RUNTIME_ALLOCATOR.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), allocator))
}
