// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime
//!
//! The explicit context object that ties the memrt crates together.
//!
//! A [`Runtime`] is built from a [`RuntimeConfig`] and owns:
//! - the allocator every block it creates will use (optionally wrapped in a
//!   statistics-keeping tracker), and
//! - the settings those blocks inherit (growth factor, default alignment).
//!
//! # Lifecycle
//! ```text
//! RuntimeConfig ──validate──► Runtime ──install()──► RuntimeGuard
//!                                                        │ drop
//!                                                        ▼
//!                                      previous allocator + error scope
//! ```
//! Installing a runtime swaps in its allocator and a fresh error scope on
//! the calling thread; the guard restores the previous ones on drop.
//!
//! # Example
//! ```
//! use runtime::{Runtime, RuntimeConfig};
//!
//! let runtime = Runtime::new(RuntimeConfig::default()).unwrap();
//! let guard = runtime.install();
//! let mut block = guard.dynamic_block(8).unwrap();
//! block.push(&42u64.to_le_bytes()).unwrap();
//! assert_eq!(block.size(), 1);
//! ```

mod config;
mod context;
mod error;

pub use config::RuntimeConfig;
pub use context::{Runtime, RuntimeGuard};
pub use error::ContextError;
