// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The runtime context object and its per-thread installation guard.

use std::ops::Deref;
use std::sync::Arc;

use memory_manager::{
    set_runtime_allocator, AlignedBlock, AllocatedBlock, AllocationStats, DynamicBlock,
    SharedAllocator, SystemAllocator, TrackingAllocator, UnifiedBlock,
};
use runtime_error::{scope, ErrorScope, ErrorValue, Result, RuntimeError};

use crate::{ContextError, RuntimeConfig};

/// A validated configuration plus the allocator built from it.
///
/// Blocks created through the factory methods use this runtime's allocator
/// and settings directly, whether or not the runtime is installed. Install
/// it with [`Runtime::install`] to also make it the calling thread's
/// default for code that only knows the thread-local state.
pub struct Runtime {
    config: RuntimeConfig,
    allocator: SharedAllocator,
}

impl Runtime {
    /// Creates a runtime from a validated configuration.
    pub fn new(config: RuntimeConfig) -> Result<Self, ContextError> {
        config.validate()?;
        let allocator: SharedAllocator = if config.track_allocations {
            Arc::new(TrackingAllocator::new(SystemAllocator))
        } else {
            Arc::new(SystemAllocator)
        };
        tracing::info!(
            growth = config.growth_factor_permille,
            frames = config.frame_stack_depth,
            alignment = config.default_alignment,
            tracking = config.track_allocations,
            "runtime created"
        );
        Ok(Self { config, allocator })
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn allocator(&self) -> &SharedAllocator {
        &self.allocator
    }

    /// Makes this runtime the calling thread's context until the returned
    /// guard is dropped.
    ///
    /// Installs the allocator as the thread's runtime allocator and replaces
    /// the thread's error scope with a fresh one of
    /// [`frame_stack_depth`](RuntimeConfig::frame_stack_depth) frames.
    pub fn install(self) -> RuntimeGuard {
        let previous_allocator = set_runtime_allocator(Arc::clone(&self.allocator));
        let previous_scope = scope::reset_current(self.config.frame_stack_depth);
        tracing::debug!("runtime installed on current thread");
        RuntimeGuard {
            runtime: self,
            previous_allocator: Some(previous_allocator),
            previous_scope: Some(previous_scope),
        }
    }

    /// An empty dynamic block with the configured growth factor and
    /// alignment.
    pub fn dynamic_block(&self, element_size: usize) -> Result<DynamicBlock> {
        let storage = UnifiedBlock::with_alignment(
            element_size,
            self.config.default_alignment,
            Arc::clone(&self.allocator),
        )?;
        DynamicBlock::from_storage(storage).with_growth_factor(self.config.growth_factor_permille)
    }

    pub fn aligned_block(&self, element_size: usize, alignment: usize) -> Result<AlignedBlock> {
        AlignedBlock::with_allocator(element_size, alignment, Arc::clone(&self.allocator))
    }

    pub fn allocated_block(&self, element_size: usize) -> Result<AllocatedBlock> {
        AllocatedBlock::with_allocator(element_size, Arc::clone(&self.allocator))
    }

    /// Allocation statistics, when tracking is enabled.
    pub fn stats(&self) -> Option<AllocationStats> {
        self.allocator.stats()
    }

    /// The calling thread's error slot.
    pub fn last_error(&self) -> ErrorValue {
        scope::current_error()
    }

    /// Returns and clears the calling thread's recorded error.
    pub fn take_error(&self) -> Option<RuntimeError> {
        let error = scope::current_error().get();
        scope::clear_error();
        error
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.config)
            .field("allocator", &self.allocator.name())
            .finish()
    }
}

/// Keeps a [`Runtime`] installed on the current thread.
///
/// Dropping the guard reinstalls the previous allocator and error scope.
/// Blocks created while installed keep their own handle to the runtime's
/// allocator, so they remain usable after teardown.
pub struct RuntimeGuard {
    runtime: Runtime,
    previous_allocator: Option<SharedAllocator>,
    previous_scope: Option<ErrorScope>,
}

impl Deref for RuntimeGuard {
    type Target = Runtime;

    fn deref(&self) -> &Runtime {
        &self.runtime
    }
}

impl std::fmt::Debug for RuntimeGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeGuard")
            .field("runtime", &self.runtime)
            .field("installed", &self.previous_scope.is_some())
            .finish()
    }
}

impl Drop for RuntimeGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.previous_scope.take() {
            let leaked = scope::current_depth();
            if leaked > 0 {
                tracing::warn!(leaked, "runtime torn down with active try regions");
            }
            scope::restore_current(previous);
        }
        if let Some(previous) = self.previous_allocator.take() {
            set_runtime_allocator(previous);
        }
        if let Some(stats) = self.runtime.stats() {
            tracing::info!("{}", stats.summary());
        }
        tracing::debug!("runtime uninstalled from current thread");
    }
}
