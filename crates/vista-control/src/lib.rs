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

//! Frame sampling, the quality policy table and the adaptive adjustment loop.
//!
//! The pieces, in data-flow order:
//! - [`policy`] maps a [`DeviceCapabilities`](vista_core::DeviceCapabilities)
//!   snapshot to the initial tier.
//! - [`metrics`] keeps the rolling frame window and derives smoothed fps.
//! - [`analysis`] decides, once per tick, whether to step quality up or down.
//! - [`optimizer`] owns all of the above plus the single writer of the shared
//!   settings, and runs the tick and memory schedules cooperatively.
//! - [`service`] runs an optimizer on its own thread for hosts whose render
//!   loop should only push frame timestamps.

pub mod analysis;
pub mod handle;
pub mod metrics;
pub mod optimizer;
pub mod policy;
pub mod schedule;
pub mod service;

pub use analysis::{AdaptiveAdjuster, AdjustmentOutcome, Decision};
pub use handle::QualityHandle;
pub use metrics::{FrameSampler, RingBuffer, FRAME_HISTORY};
pub use optimizer::PerformanceOptimizer;
pub use policy::{initial_settings, initial_tier};
pub use service::{FrameEvent, FrameRecorder, OptimizerService, QualityEvent, ServiceConfig};
