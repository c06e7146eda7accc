// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The flat error code space shared by every memrt crate.

use std::fmt;

/// Every failure the runtime can report.
///
/// The code space is flat on purpose: there is no error hierarchy, only a
/// code and an optional static description. [`ErrorCode::None`] is the
/// "no error" state of an [`ErrorValue`](crate::ErrorValue) and is never
/// carried by a [`RuntimeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    #[default]
    None = 0,
    NullPointer,
    ZeroElementSize,
    ZeroAlignmentSize,
    DivisionByZero,
    NotPowerOfTwo,
    InvalidMemoryRange,
    InvalidMemoryBlock,
    ExceedsMaxSize,
    OutOfRange,
    DifferentElementSize,
    MemoryNotAllocated,
    AllocatorFunctionNotInitialized,
    DeallocatorFunctionNotInitialized,
    NoNullTerminator,
}

impl ErrorCode {
    /// All failure codes, in declaration order (excludes `None`).
    pub const FAILURES: [ErrorCode; 14] = [
        ErrorCode::NullPointer,
        ErrorCode::ZeroElementSize,
        ErrorCode::ZeroAlignmentSize,
        ErrorCode::DivisionByZero,
        ErrorCode::NotPowerOfTwo,
        ErrorCode::InvalidMemoryRange,
        ErrorCode::InvalidMemoryBlock,
        ErrorCode::ExceedsMaxSize,
        ErrorCode::OutOfRange,
        ErrorCode::DifferentElementSize,
        ErrorCode::MemoryNotAllocated,
        ErrorCode::AllocatorFunctionNotInitialized,
        ErrorCode::DeallocatorFunctionNotInitialized,
        ErrorCode::NoNullTerminator,
    ];

    /// Stable upper-case identifier, e.g. `"OUT_OF_RANGE"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::None => "NONE",
            ErrorCode::NullPointer => "NULL_POINTER",
            ErrorCode::ZeroElementSize => "ZERO_ELEMENT_SIZE",
            ErrorCode::ZeroAlignmentSize => "ZERO_ALIGNMENT_SIZE",
            ErrorCode::DivisionByZero => "DIVISION_BY_ZERO",
            ErrorCode::NotPowerOfTwo => "NOT_POWER_OF_TWO",
            ErrorCode::InvalidMemoryRange => "INVALID_MEMORY_RANGE",
            ErrorCode::InvalidMemoryBlock => "INVALID_MEMORY_BLOCK",
            ErrorCode::ExceedsMaxSize => "EXCEEDS_MAX_SIZE",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::DifferentElementSize => "DIFFERENT_ELEMENT_SIZE",
            ErrorCode::MemoryNotAllocated => "MEMORY_NOT_ALLOCATED",
            ErrorCode::AllocatorFunctionNotInitialized => "ALLOCATOR_FUNCTION_NOT_INITIALIZED",
            ErrorCode::DeallocatorFunctionNotInitialized => {
                "DEALLOCATOR_FUNCTION_NOT_INITIALIZED"
            }
            ErrorCode::NoNullTerminator => "NO_NULL_TERMINATOR",
        }
    }

    /// Default human-readable description used when a throw site does not
    /// supply its own.
    pub fn default_description(self) -> &'static str {
        match self {
            ErrorCode::None => "no error",
            ErrorCode::NullPointer => "null pointer",
            ErrorCode::ZeroElementSize => "element size is zero",
            ErrorCode::ZeroAlignmentSize => "alignment size is zero",
            ErrorCode::DivisionByZero => "division by zero",
            ErrorCode::NotPowerOfTwo => "value is not a power of two",
            ErrorCode::InvalidMemoryRange => "invalid memory range",
            ErrorCode::InvalidMemoryBlock => "memory block span is not a multiple of its element size",
            ErrorCode::ExceedsMaxSize => "requested size exceeds the maximum size",
            ErrorCode::OutOfRange => "index out of range",
            ErrorCode::DifferentElementSize => "blocks have different element sizes",
            ErrorCode::MemoryNotAllocated => "memory could not be allocated",
            ErrorCode::AllocatorFunctionNotInitialized => "allocation function is not initialized",
            ErrorCode::DeallocatorFunctionNotInitialized => {
                "deallocation function is not initialized"
            }
            ErrorCode::NoNullTerminator => "no null terminator within range",
        }
    }

    /// Returns `true` for [`ErrorCode::None`].
    pub fn is_none(self) -> bool {
        self == ErrorCode::None
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised runtime failure: a code plus an optional static description.
///
/// This is the `Err` side of every fallible operation in the workspace.
/// Propagate it with `?`; record it in the thread's error slot at API
/// boundaries with [`ErrorScope::catch`](crate::ErrorScope::catch).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct RuntimeError {
    code: ErrorCode,
    description: Option<&'static str>,
    message: &'static str,
}

impl RuntimeError {
    /// Creates an error with the code's default description.
    pub fn new(code: ErrorCode) -> Self {
        debug_assert!(!code.is_none(), "ErrorCode::None is not an error");
        Self {
            code,
            description: None,
            message: code.default_description(),
        }
    }

    /// Creates an error with a call-site description.
    pub fn with_description(code: ErrorCode, description: &'static str) -> Self {
        debug_assert!(!code.is_none(), "ErrorCode::None is not an error");
        Self {
            code,
            description: Some(description),
            message: description,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// The call-site description, if one was given.
    pub fn description(&self) -> Option<&'static str> {
        self.description
    }

    /// The call-site description, falling back to the code's default.
    pub fn message(&self) -> &'static str {
        self.message
    }
}

impl From<ErrorCode> for RuntimeError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Convenience alias used across the workspace.
pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;

/// Returns `Err(RuntimeError)` from the enclosing function unless `cond` holds.
///
/// ```
/// use runtime_error::{ensure, ErrorCode, Result};
///
/// fn checked_div(a: usize, b: usize) -> Result<usize> {
///     ensure!(b != 0, ErrorCode::DivisionByZero);
///     Ok(a / b)
/// }
/// assert_eq!(checked_div(6, 3), Ok(2));
/// assert_eq!(checked_div(1, 0).unwrap_err().code(), ErrorCode::DivisionByZero);
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $code:expr) => {
        if !$cond {
            return Err($crate::RuntimeError::new($code));
        }
    };
    ($cond:expr, $code:expr, $desc:expr) => {
        if !$cond {
            return Err($crate::RuntimeError::with_description($code, $desc));
        }
    };
}
