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

//! The device capability snapshot and the contract for producing it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The generation of graphics API the device exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum GraphicsApiVersion {
    /// No usable graphics context could be created.
    #[default]
    None,
    /// A legacy, GL-class context without the full modern feature set.
    V1,
    /// A modern context (WebGPU-compliant or native Vulkan/Metal/DX12).
    V2,
}

impl GraphicsApiVersion {
    /// Returns the numeric version (`0`, `1` or `2`).
    pub fn as_number(self) -> u8 {
        match self {
            GraphicsApiVersion::None => 0,
            GraphicsApiVersion::V1 => 1,
            GraphicsApiVersion::V2 => 2,
        }
    }
}

impl fmt::Display for GraphicsApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_number())
    }
}

/// An immutable snapshot of what the rendering device can do.
///
/// Computed once when the rendering surface is first created and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceCapabilities {
    /// Whether the device passed every high-end check (GPU family, CPU cores, memory).
    pub is_high_end: bool,
    /// Whether the host looks like a phone or tablet.
    pub is_mobile: bool,
    /// Graphics API generation.
    pub graphics_api_version: GraphicsApiVersion,
    /// Largest supported 2D texture dimension, in texels.
    pub max_texture_size: u32,
    /// Number of textures a single shader stage may sample.
    pub max_texture_units: u32,
    /// Whether float32 textures can be filtered.
    pub has_float_textures: bool,
    /// Whether 4x multisampling is available on the default color format.
    pub has_multisampling: bool,
    /// Total device memory in gigabytes.
    pub memory_gb: f32,
    /// Adapter name as reported by the driver. Empty when unknown.
    pub gpu_name: String,
    /// Logical CPU cores. Zero when unknown.
    pub cpu_cores: usize,
}

impl DeviceCapabilities {
    /// The record used when nothing can be probed: the weakest capable device.
    pub fn lowest() -> Self {
        Self {
            is_high_end: false,
            is_mobile: true,
            graphics_api_version: GraphicsApiVersion::None,
            max_texture_size: 2048,
            max_texture_units: 8,
            has_float_textures: false,
            has_multisampling: false,
            memory_gb: 0.0,
            gpu_name: String::new(),
            cpu_cores: 0,
        }
    }

    /// Returns `true` if no graphics context was available at probe time.
    pub fn is_degraded(&self) -> bool {
        self.graphics_api_version == GraphicsApiVersion::None
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self::lowest()
    }
}

/// Produces a [`DeviceCapabilities`] snapshot.
///
/// Implementations live in `vista-infra`. A probe never fails: anything it
/// cannot determine falls back to the values of [`DeviceCapabilities::lowest`].
pub trait CapabilityProbe {
    /// Probes the device. Called once per rendering session.
    fn probe(&self) -> DeviceCapabilities;
}

/// A probe that always answers with a fixed snapshot.
///
/// Useful for replaying a known device and for tests.
#[derive(Debug, Clone)]
pub struct FixedProbe(pub DeviceCapabilities);

impl CapabilityProbe for FixedProbe {
    fn probe(&self) -> DeviceCapabilities {
        self.0.clone()
    }
}
