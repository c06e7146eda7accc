// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Allocation statistics for profiling and diagnostics.
//!
//! [`AllocationStats`] is filled in by
//! [`TrackingAllocator`](crate::TrackingAllocator): request counts, failures,
//! live bytes and the high-water mark. Useful when tuning a dynamic block's
//! growth factor.

/// Cumulative statistics about one allocator.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AllocationStats {
    /// Successful allocation requests.
    pub total_allocations: u64,
    /// Allocation requests the underlying allocator refused.
    pub failed_allocations: u64,
    pub total_deallocations: u64,
    /// Bytes currently handed out and not yet returned.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_live_bytes: usize,
    /// Total bytes ever handed out, including freed ones.
    pub cumulative_allocated_bytes: u64,
}

impl AllocationStats {
    /// Fraction of requests that failed, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` if nothing has been requested.
    pub fn failure_ratio(&self) -> f64 {
        let total = self.total_allocations + self.failed_allocations;
        if total == 0 {
            return 0.0;
        }
        self.failed_allocations as f64 / total as f64
    }

    /// Allocations not yet matched by a deallocation.
    pub fn outstanding(&self) -> u64 {
        self.total_allocations.saturating_sub(self.total_deallocations)
    }

    pub(crate) fn record_allocation(&mut self, size: usize) {
        self.total_allocations += 1;
        self.cumulative_allocated_bytes += size as u64;
        self.live_bytes += size;
        self.update_peak();
    }

    pub(crate) fn record_failure(&mut self) {
        self.failed_allocations += 1;
    }

    pub(crate) fn record_deallocation(&mut self, size: usize) {
        self.total_deallocations += 1;
        self.live_bytes = self.live_bytes.saturating_sub(size);
    }

    fn update_peak(&mut self) {
        if self.live_bytes > self.peak_live_bytes {
            self.peak_live_bytes = self.live_bytes;
        }
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        let peak_kb = self.peak_live_bytes as f64 / 1024.0;
        format!(
            "Allocations: {} ok, {} failed ({:.0}% failure rate), \
             {} deallocations, {} bytes live, peak {:.2} KB",
            self.total_allocations,
            self.failed_allocations,
            self.failure_ratio() * 100.0,
            self.total_deallocations,
            self.live_bytes,
            peak_kb,
        )
    }
}
