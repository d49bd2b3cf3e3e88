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

//! Device classification heuristics.
//!
//! The GPU check is a name match against known high-performance families.
//! Unknown names classify as not high end.

use regex::Regex;
use std::sync::LazyLock;
use vista_core::GraphicsApiVersion;

/// Minimum logical CPU cores for a high-end host.
const HIGH_END_MIN_CORES: usize = 8;
/// Minimum device memory (GB) for a high-end host.
const HIGH_END_MIN_MEMORY_GB: f32 = 8.0;

static HIGH_END_GPU: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(rtx|gtx\s*1[06-9]\d0|radeon\s*(rx\s*[5-9]\d{3}|pro)|apple\s*m[1-9]|quadro|arc\s*a[57]\d{2})",
    )
    .expect("high-end GPU pattern is valid")
});

/// Returns `true` if the adapter name belongs to a known high-performance family.
pub fn is_high_end_gpu(gpu_name: &str) -> bool {
    HIGH_END_GPU.is_match(gpu_name)
}

/// Conjunctive high-end test: GPU family AND cores AND memory.
///
/// Any single failing condition disqualifies the device.
pub fn is_high_end_host(gpu_name: &str, cpu_cores: usize, memory_gb: f32) -> bool {
    is_high_end_gpu(gpu_name)
        && cpu_cores >= HIGH_END_MIN_CORES
        && memory_gb >= HIGH_END_MIN_MEMORY_GB
}

/// Maps an adapter backend to the coarse API generation.
///
/// GL adapters that are not WebGPU compliant count as the legacy generation.
pub fn api_version_for(backend: wgpu::Backend, webgpu_compliant: bool) -> GraphicsApiVersion {
    match backend {
        wgpu::Backend::Noop => GraphicsApiVersion::None,
        wgpu::Backend::Gl if !webgpu_compliant => GraphicsApiVersion::V1,
        _ => GraphicsApiVersion::V2,
    }
}
