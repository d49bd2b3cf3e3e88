// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Heap Memory Resource Monitors
//!
//! Reads the heap counters kept by the [`TrackingAllocator`](crate::TrackingAllocator).

use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};

use vista_core::memory;
use vista_core::telemetry::{ResourceMonitor, ResourceUsageReport};

/// Heap memory monitor.
///
/// Reports the bytes currently allocated through the tracking allocator and
/// the peak seen since this monitor was created. When no tracking allocator
/// is installed the report is `None`, so the controller keeps its last known
/// value instead of seeing zeros.
#[derive(Debug)]
pub struct HeapMemoryMonitor {
    id: String,
    last_report: Mutex<Option<ResourceUsageReport>>,
    peak_bytes: Mutex<usize>,
}

impl HeapMemoryMonitor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            last_report: Mutex::new(None),
            peak_bytes: Mutex::new(memory::currently_allocated_bytes()),
        }
    }
}

impl ResourceMonitor for HeapMemoryMonitor {
    fn monitor_id(&self) -> Cow<'static, str> {
        Cow::Owned(self.id.clone())
    }

    fn usage_report(&self) -> Option<ResourceUsageReport> {
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self) {
        let report = if memory::is_tracking() {
            let current = memory::currently_allocated_bytes();
            let mut peak = self.peak_bytes.lock().unwrap_or_else(PoisonError::into_inner);
            *peak = (*peak).max(current);
            Some(ResourceUsageReport {
                current_bytes: current as u64,
                peak_bytes: Some(*peak as u64),
                total_capacity_bytes: None,
            })
        } else {
            log::trace!("Monitor '{}': no tracking allocator installed.", self.id);
            None
        };
        *self.last_report.lock().unwrap_or_else(PoisonError::into_inner) = report;
    }
}

/// A monitor that always reports the same usage.
///
/// Used to replay sessions with a known memory footprint.
#[derive(Debug, Clone)]
pub struct StaticMemoryMonitor {
    usage_bytes: Option<u64>,
}

impl StaticMemoryMonitor {
    /// Reports `usage_mb` megabytes on every read.
    pub fn new(usage_mb: f32) -> Self {
        Self {
            usage_bytes: Some((usage_mb.max(0.0) as f64 * 1024.0 * 1024.0) as u64),
        }
    }

    /// A monitor whose resource is never readable.
    pub fn unavailable() -> Self {
        Self { usage_bytes: None }
    }
}

impl ResourceMonitor for StaticMemoryMonitor {
    fn monitor_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("static-memory")
    }

    fn usage_report(&self) -> Option<ResourceUsageReport> {
        self.usage_bytes.map(|current_bytes| ResourceUsageReport {
            current_bytes,
            peak_bytes: Some(current_bytes),
            total_capacity_bytes: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_monitor_without_allocator_reports_nothing() {
        // This test binary runs on the plain system allocator.
        let monitor = HeapMemoryMonitor::new("TestHeap");
        assert_eq!(monitor.monitor_id(), "TestHeap");
        assert!(monitor.usage_report().is_none());
        monitor.update();
        assert!(monitor.usage_report().is_none());
    }

    #[test]
    fn static_monitor_reports_fixed_value() {
        let monitor = StaticMemoryMonitor::new(40.0);
        monitor.update();
        assert_eq!(monitor.usage_report().unwrap().current_mb(), 40.0);
        assert!(StaticMemoryMonitor::unavailable().usage_report().is_none());
    }
}
