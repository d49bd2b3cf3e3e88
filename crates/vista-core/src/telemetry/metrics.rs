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

//! Sampled performance metrics.

use serde::{Deserialize, Serialize};

/// A snapshot of recent rendering performance.
///
/// Frame fields are refreshed every rendered frame, memory fields on the
/// memory sampling interval. `average_fps` is the mean of the retained
/// per-frame fps samples and is what adjustment decisions are based on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// `1000 / mean(frame_time)` over the retained window.
    pub fps: f32,
    /// The most recent frame time in milliseconds.
    pub frame_time_ms: f32,
    /// Mean of the per-frame fps samples in the retained window.
    pub average_fps: f32,
    /// Number of frame samples currently retained (at most the window size).
    pub frame_samples: usize,
    /// Last known memory usage in megabytes.
    pub memory_usage_mb: f32,
    /// Last reported texture memory in megabytes.
    pub texture_memory_mb: f32,
    pub draw_calls: u32,
    pub triangle_count: u64,
}

impl PerformanceMetrics {
    /// Returns `true` if at least `min_samples` frames back the fps readings.
    pub fn has_frame_samples(&self, min_samples: usize) -> bool {
        self.frame_samples > 0 && self.frame_samples >= min_samples
    }
}
