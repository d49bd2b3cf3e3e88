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

//! Provides the contract for actively polled resource monitors.
//!
//! "Monitoring" is distinct from "metrics" in that it involves polling a
//! system resource (like heap usage) for a snapshot of its state,
//! whereas metrics are pushed by the render loop every frame.

use std::borrow::Cow;
use std::fmt::Debug;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// The core trait for a resource monitor.
///
/// A `ResourceMonitor` knows how to query one system resource. The quality
/// controller calls [`update`](ResourceMonitor::update) on its memory interval
/// and then reads [`usage_report`](ResourceMonitor::usage_report). A monitor
/// that cannot read its resource returns `None` rather than inventing data.
pub trait ResourceMonitor: Send + Sync + Debug + 'static {
    /// Returns a unique, human-readable identifier for this monitor instance.
    fn monitor_id(&self) -> Cow<'static, str>;

    /// Returns the latest usage snapshot, or `None` if the resource is unreadable.
    fn usage_report(&self) -> Option<ResourceUsageReport>;

    /// Polls the resource and refreshes internal state.
    /// This default implementation does nothing, for monitors that update passively.
    fn update(&self) {}
}

/// A generic report of resource usage in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceUsageReport {
    /// The number of bytes currently in use.
    pub current_bytes: u64,
    /// The peak number of bytes ever in use, if tracked.
    pub peak_bytes: Option<u64>,
    /// The total capacity of the resource in bytes, if known.
    pub total_capacity_bytes: Option<u64>,
}

impl ResourceUsageReport {
    /// Returns the current usage in megabytes.
    pub fn current_mb(&self) -> f32 {
        (self.current_bytes as f64 / BYTES_PER_MB) as f32
    }

    /// Returns the peak usage in megabytes, if tracked.
    pub fn peak_mb(&self) -> Option<f32> {
        self.peak_bytes.map(|b| (b as f64 / BYTES_PER_MB) as f32)
    }
}
