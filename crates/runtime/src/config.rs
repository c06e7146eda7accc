// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime configuration parsed from TOML or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! growth_factor_permille = 1500
//! frame_stack_depth = 64
//! default_alignment = 0
//! track_allocations = true
//! ```
//!
//! Every key is optional; missing keys take the defaults shown above,
//! except `track_allocations`, which defaults to `false`.

use memory_manager::DEFAULT_GROWTH_FACTOR;
use raw_memory::align::is_power_of_two;
use runtime_error::DEFAULT_FRAME_DEPTH;

use crate::ContextError;

/// Configuration for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Dynamic block growth factor in permille; must exceed 1000.
    pub growth_factor_permille: usize,
    /// Capacity of the per-thread try-region stack; must be non-zero.
    pub frame_stack_depth: usize,
    /// Storage alignment for blocks built by the runtime. `0` means plain
    /// storage; anything else must be a power of two.
    pub default_alignment: usize,
    /// Whether to wrap the allocator in a statistics-keeping tracker.
    pub track_allocations: bool,
}

impl RuntimeConfig {
    /// Parses configuration from a TOML string and validates it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ContextError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ContextError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks every value against its accepted range.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.growth_factor_permille <= 1000 {
            return Err(ContextError::InvalidConfig(format!(
                "growth_factor_permille must exceed 1000, got {}",
                self.growth_factor_permille
            )));
        }
        if self.frame_stack_depth == 0 {
            return Err(ContextError::InvalidConfig(
                "frame_stack_depth must be non-zero".into(),
            ));
        }
        if self.default_alignment != 0 && !is_power_of_two(self.default_alignment) {
            return Err(ContextError::InvalidConfig(format!(
                "default_alignment must be 0 or a power of two, got {}",
                self.default_alignment
            )));
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            growth_factor_permille: DEFAULT_GROWTH_FACTOR,
            frame_stack_depth: DEFAULT_FRAME_DEPTH,
            default_alignment: 0,
            track_allocations: false,
        }
    }
}
