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

//! wgpu-backed capability probe.
//!
//! A throwaway instance and adapter are created, queried and dropped inside
//! a single call. No device, surface or queue is ever created.

use anyhow::{anyhow, Result};
use vista_core::{CapabilityProbe, DeviceCapabilities, GraphicsApiVersion};

use super::classify::{api_version_for, is_high_end_host};
use crate::platform::{detect_mobile, HostInfo};

/// What the adapter reported, before host information is merged in.
#[derive(Debug, Clone)]
struct AdapterReport {
    name: String,
    api_version: GraphicsApiVersion,
    max_texture_size: u32,
    max_texture_units: u32,
    has_float_textures: bool,
    has_multisampling: bool,
}

/// Probes the best available adapter through wgpu.
#[derive(Debug, Clone, Default)]
pub struct WgpuCapabilityProbe {
    user_agent: Option<String>,
}

impl WgpuCapabilityProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a user-agent string for mobile detection instead of the build target.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    fn query_adapter() -> Result<AdapterReport> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::new_without_display_handle());
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None, // No surface needed for probing
            force_fallback_adapter: false,
        }))
        .map_err(|e| anyhow!("No suitable graphics adapter: {}", e))?;

        let info = adapter.get_info();
        let limits = adapter.limits();
        let features = adapter.features();
        let downlevel = adapter.get_downlevel_capabilities();
        let color_format_flags = adapter
            .get_texture_format_features(wgpu::TextureFormat::Rgba8Unorm)
            .flags;

        log::debug!(
            "Probe adapter: \"{}\" ({:?}, {:?})",
            info.name,
            info.backend,
            info.device_type
        );

        Ok(AdapterReport {
            api_version: api_version_for(info.backend, downlevel.is_webgpu_compliant()),
            max_texture_size: limits.max_texture_dimension_2d,
            max_texture_units: limits.max_sampled_textures_per_shader_stage,
            has_float_textures: features.contains(wgpu::Features::FLOAT32_FILTERABLE),
            has_multisampling: color_format_flags
                .contains(wgpu::TextureFormatFeatureFlags::MULTISAMPLE_X4),
            name: info.name,
        })
        // `adapter` and `instance` are released here.
    }
}

impl CapabilityProbe for WgpuCapabilityProbe {
    fn probe(&self) -> DeviceCapabilities {
        let report = match Self::query_adapter() {
            Ok(report) => report,
            Err(e) => {
                log::warn!("Capability probe failed, assuming the weakest device: {e}");
                return DeviceCapabilities::lowest();
            }
        };

        let host = HostInfo::detect();
        let is_mobile = detect_mobile(self.user_agent.as_deref());
        let is_high_end = is_high_end_host(&report.name, host.cpu_cores, host.memory_gb);

        let capabilities = DeviceCapabilities {
            is_high_end,
            is_mobile,
            graphics_api_version: report.api_version,
            max_texture_size: report.max_texture_size,
            max_texture_units: report.max_texture_units,
            has_float_textures: report.has_float_textures,
            has_multisampling: report.has_multisampling,
            memory_gb: host.memory_gb,
            gpu_name: report.name,
            cpu_cores: host.cpu_cores,
        };

        log::info!(
            "Probed \"{}\": api {}, max texture {}, {} cores, {:.1}GB, high_end={}, mobile={}",
            capabilities.gpu_name,
            capabilities.graphics_api_version,
            capabilities.max_texture_size,
            capabilities.cpu_cores,
            capabilities.memory_gb,
            capabilities.is_high_end,
            capabilities.is_mobile
        );

        capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_never_panics_and_is_consistent() {
        // Runs on machines with or without a GPU; both outcomes are valid.
        let caps = WgpuCapabilityProbe::new()
            .with_user_agent("Mozilla/5.0 (X11; Linux x86_64)")
            .probe();

        if caps.is_degraded() {
            assert_eq!(caps, DeviceCapabilities::lowest());
            println!("No adapter available: probe fell back to the lowest tier.");
            return;
        }

        assert!(!caps.is_mobile, "desktop user agent must not be mobile");
        assert!(caps.max_texture_size >= 2048);
        assert!(caps.max_texture_units > 0);
        if caps.is_high_end {
            assert!(caps.cpu_cores >= 8 && caps.memory_gb >= 8.0);
        }
    }
}
