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

//! Concrete implementations of Vista's platform contracts.
//!
//! - [`graphics`]: the wgpu-backed [`CapabilityProbe`](vista_core::CapabilityProbe).
//! - [`memory`]: the tracking global allocator behind heap monitoring.
//! - [`platform`]: host CPU/memory detection and mobile detection.
//! - [`telemetry`]: [`ResourceMonitor`](vista_core::ResourceMonitor) implementations.

pub mod graphics;
pub mod memory;
pub mod platform;
pub mod telemetry;

pub use graphics::WgpuCapabilityProbe;
pub use memory::TrackingAllocator;
pub use platform::HostInfo;
pub use telemetry::{HeapMemoryMonitor, StaticMemoryMonitor};
