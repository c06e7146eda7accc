// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The per-thread "current error" slot.

use crate::{ErrorCode, RuntimeError};

/// A `{code, description}` pair describing the most recent failure.
///
/// Invariant: `code() == ErrorCode::None` iff no error is active, and an
/// inactive value never carries a description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ErrorValue {
    code: ErrorCode,
    description: Option<&'static str>,
}

impl ErrorValue {
    /// Creates an empty (no error) value.
    pub const fn new() -> Self {
        Self {
            code: ErrorCode::None,
            description: None,
        }
    }

    /// Returns the active error, if any.
    pub fn get(&self) -> Option<RuntimeError> {
        if self.code.is_none() {
            return None;
        }
        Some(match self.description {
            Some(desc) => RuntimeError::with_description(self.code, desc),
            None => RuntimeError::new(self.code),
        })
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn description(&self) -> Option<&'static str> {
        self.description
    }

    /// Sets code and description. Setting `ErrorCode::None` clears the value.
    pub fn set(&mut self, code: ErrorCode, description: Option<&'static str>) {
        if code.is_none() {
            self.clear();
            return;
        }
        self.code = code;
        self.description = description;
    }

    /// Records a raised error.
    pub fn set_error(&mut self, error: &RuntimeError) {
        self.set(error.code(), error.description());
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn swap(&mut self, other: &mut ErrorValue) {
        std::mem::swap(self, other);
    }

    pub fn is_none(&self) -> bool {
        self.code.is_none()
    }

    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    /// Returns the current code and resets the value to "no error".
    pub fn get_code_and_clear(&mut self) -> ErrorCode {
        let code = self.code;
        self.clear();
        code
    }
}

impl From<RuntimeError> for ErrorValue {
    fn from(error: RuntimeError) -> Self {
        let mut value = Self::new();
        value.set_error(&error);
        value
    }
}
