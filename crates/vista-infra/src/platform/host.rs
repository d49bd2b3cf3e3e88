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

//! sysinfo-based host information.

use sysinfo::System;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// CPU and memory facts used by the high-end classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostInfo {
    /// Logical CPU cores. Zero when unknown.
    pub cpu_cores: usize,
    /// Total physical memory in gigabytes. Zero when unknown.
    pub memory_gb: f32,
}

impl HostInfo {
    /// Reads the host once.
    pub fn detect() -> Self {
        let mut system = System::new_all();
        system.refresh_all();

        let mut cpu_cores = system.cpus().len();
        if cpu_cores == 0 {
            cpu_cores = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(0);
        }
        let memory_gb = (system.total_memory() as f64 / BYTES_PER_GB) as f32;

        log::debug!("Host: {} logical cores, {:.1}GB memory.", cpu_cores, memory_gb);
        Self {
            cpu_cores,
            memory_gb,
        }
    }
}
