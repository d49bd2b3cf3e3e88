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

use anyhow::Result;
use vista_control::{initial_settings, initial_tier};
use vista_core::CapabilityProbe;
use vista_infra::WgpuCapabilityProbe;

pub fn run(user_agent: Option<String>, json: bool) -> Result<()> {
    let mut probe = WgpuCapabilityProbe::new();
    if let Some(user_agent) = user_agent {
        probe = probe.with_user_agent(user_agent);
    }
    let capabilities = probe.probe();

    if json {
        println!("{}", serde_json::to_string_pretty(&capabilities)?);
        return Ok(());
    }

    let tier = initial_tier(&capabilities);
    println!("GPU:              {}", capabilities.gpu_name);
    println!("Graphics API:     {}", capabilities.graphics_api_version);
    println!("Max texture size: {}", capabilities.max_texture_size);
    println!("Texture units:    {}", capabilities.max_texture_units);
    println!("Float textures:   {}", capabilities.has_float_textures);
    println!("Multisampling:    {}", capabilities.has_multisampling);
    println!("CPU cores:        {}", capabilities.cpu_cores);
    println!("Memory:           {:.1} GB", capabilities.memory_gb);
    println!("High end:         {}", capabilities.is_high_end);
    println!("Mobile:           {}", capabilities.is_mobile);
    if capabilities.is_degraded() {
        println!("(no graphics context; lowest-capability record)");
    }
    println!("Initial tier:     {:?}", tier);
    println!("Settings:         {}", initial_settings(&capabilities));
    Ok(())
}
