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

//! Foundational crate for Vista's adaptive render-quality control.
//!
//! This crate holds the "common language" shared by every other Vista crate:
//! the device capability snapshot, the quality settings and their tiers, the
//! performance metrics model, the resource monitoring contract, heap
//! accounting and the controller configuration. It contains no policy and no
//! platform code: `vista-control` decides, `vista-infra` measures.

pub mod capabilities;
pub mod config;
pub mod memory;
pub mod quality;
pub mod telemetry;

pub use capabilities::{CapabilityProbe, DeviceCapabilities, FixedProbe, GraphicsApiVersion};
pub use config::{ConfigError, OptimizerConfig};
pub use quality::{QualitySettings, QualityTier, ShadowQuality, TextureQuality};
pub use telemetry::{PerformanceMetrics, ResourceMonitor, ResourceUsageReport};
