// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for building a runtime context.

/// Errors that can occur while loading or validating a [`RuntimeConfig`](crate::RuntimeConfig).
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    /// A configuration value is out of its accepted range.
    #[error("configuration error: {0}")]
    InvalidConfig(String),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialise error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
