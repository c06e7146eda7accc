// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # runtime-error
//!
//! The error model shared by every memrt crate.
//!
//! # Key Components
//!
//! - [`ErrorCode`] / [`RuntimeError`]: a flat failure taxonomy. Every
//!   fallible operation in the workspace returns `Result<T, RuntimeError>`.
//! - [`ErrorValue`]: the `{code, description}` slot describing the most
//!   recent failure of a thread.
//! - [`FrameStack`]: a bounded stack of active try regions.
//! - [`ErrorScope`]: slot + stack, providing try/throw/rethrow/catch on top
//!   of ordinary `?` propagation.
//!
//! # Example
//! ```
//! use runtime_error::{ErrorCode, ErrorScope, Result};
//!
//! fn checked_index(scope: &mut ErrorScope, len: usize, i: usize) -> Result<usize> {
//!     if i >= len {
//!         return Err(scope.throw(ErrorCode::OutOfRange, None));
//!     }
//!     Ok(i)
//! }
//!
//! let mut scope = ErrorScope::default();
//! let r = scope.try_scope(|s| checked_index(s, 4, 9));
//! assert!(r.is_err());
//! assert_eq!(scope.frames().depth(), 0);
//! assert_eq!(scope.error_mut().get_code_and_clear(), ErrorCode::OutOfRange);
//! ```

mod error;
pub mod frame;
pub mod scope;
mod value;

pub use error::{ErrorCode, Result, RuntimeError};
pub use frame::{FrameId, FrameStack, DEFAULT_FRAME_DEPTH};
pub use scope::ErrorScope;
pub use value::ErrorValue;
