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

//! Telemetry types shared between the sampler, the adjuster and diagnostics.
//!
//! `metrics` describes what the controller knows about recent frames;
//! `monitoring` is the contract for actively polled resources such as
//! heap usage. Concrete monitors live in `vista-infra`.

pub mod metrics;
pub mod monitoring;

pub use self::metrics::PerformanceMetrics;
pub use self::monitoring::{ResourceMonitor, ResourceUsageReport};
