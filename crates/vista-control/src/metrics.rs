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

//! Rolling frame-time storage and the runtime metrics sampler.

use vista_core::PerformanceMetrics;

/// Number of frame samples retained for smoothing.
pub const FRAME_HISTORY: usize = 60;

/// A fixed-size circular buffer for storing numerical samples.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    index: usize,
    count: usize,
}

impl<T: Default + Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a new, empty ring buffer.
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            index: 0,
            count: 0,
        }
    }

    /// Pushes a new value, returning the value it overwrote once the buffer is full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = (self.count == N).then(|| self.data[self.index]);
        self.data[self.index] = value;
        self.index = (self.index + 1) % N;
        if self.count < N {
            self.count += 1;
        }
        evicted
    }

    /// Returns the number of elements currently in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T: Default + Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// A ring buffer of `f32` samples with an O(1) running mean.
#[derive(Debug, Clone, Default)]
struct RollingWindow<const N: usize> {
    samples: RingBuffer<f32, N>,
    // f64 keeps the running sum from drifting over long sessions.
    sum: f64,
}

impl<const N: usize> RollingWindow<N> {
    fn push(&mut self, value: f32) {
        if let Some(evicted) = self.samples.push(value) {
            self.sum -= evicted as f64;
        }
        self.sum += value as f64;
    }

    fn mean(&self) -> f32 {
        match self.samples.count() {
            0 => 0.0,
            n => (self.sum / n as f64) as f32,
        }
    }

    fn count(&self) -> usize {
        self.samples.count()
    }
}

/// Consumes frame timestamps and memory readings and derives smoothed metrics.
///
/// `record_frame` runs on the render path: it is O(1) and never allocates.
#[derive(Debug, Clone, Default)]
pub struct FrameSampler {
    frame_times: RollingWindow<FRAME_HISTORY>,
    frame_rates: RollingWindow<FRAME_HISTORY>,
    last_frame_ms: Option<f64>,
    metrics: PerformanceMetrics,
}

impl FrameSampler {
    /// Creates an empty sampler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a rendered frame at `timestamp_ms`.
    ///
    /// The first call only primes the clock. Timestamps that do not move
    /// forward are ignored.
    pub fn record_frame(&mut self, timestamp_ms: f64) {
        let Some(last) = self.last_frame_ms.replace(timestamp_ms) else {
            return;
        };
        let frame_time = (timestamp_ms - last) as f32;
        if !(frame_time > 0.0) {
            log::trace!("Ignoring non-increasing frame timestamp {timestamp_ms}.");
            self.last_frame_ms = Some(last.max(timestamp_ms));
            return;
        }

        self.frame_times.push(frame_time);
        self.frame_rates.push(1000.0 / frame_time);

        let mean_frame_time = self.frame_times.mean();
        self.metrics.frame_time_ms = frame_time;
        self.metrics.fps = if mean_frame_time > 0.0 {
            1000.0 / mean_frame_time
        } else {
            0.0
        };
        self.metrics.average_fps = self.frame_rates.mean();
        self.metrics.frame_samples = self.frame_rates.count();
    }

    /// Records a memory reading. `None` keeps the last known value.
    pub fn record_memory(&mut self, usage_mb: Option<f32>) {
        match usage_mb {
            Some(mb) => self.metrics.memory_usage_mb = mb,
            None => log::trace!("Memory reading unavailable; keeping last known value."),
        }
    }

    /// Records the renderer's per-frame counters.
    pub fn record_render_stats(&mut self, draw_calls: u32, triangle_count: u64) {
        self.metrics.draw_calls = draw_calls;
        self.metrics.triangle_count = triangle_count;
    }

    /// Records the current texture memory footprint.
    pub fn record_texture_memory(&mut self, texture_memory_mb: f32) {
        self.metrics.texture_memory_mb = texture_memory_mb;
    }

    /// Returns a snapshot of the current metrics.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.metrics
    }

    /// Number of frame-time samples used for smoothing. Never exceeds [`FRAME_HISTORY`].
    pub fn frame_sample_count(&self) -> usize {
        self.frame_times.count()
    }
}
