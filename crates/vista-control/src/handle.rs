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

//! The shared quality settings: one writer, many readers.
//!
//! Rendering and material code hold a [`QualityHandle`], which can only
//! read. The only [`QualityWriter`] belongs to the optimizer that created it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use vista_core::{DeviceCapabilities, QualitySettings, TextureQuality};

#[derive(Debug)]
struct Shared {
    settings: RwLock<QualitySettings>,
    generation: AtomicU64,
    capabilities: DeviceCapabilities,
}

/// Read-only, cloneable view of the active quality settings.
#[derive(Debug, Clone)]
pub struct QualityHandle {
    shared: Arc<Shared>,
}

impl QualityHandle {
    /// Returns a copy of the active settings.
    pub fn settings(&self) -> QualitySettings {
        self.shared
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the active texture tier without copying the whole bundle.
    pub fn texture_quality(&self) -> TextureQuality {
        self.shared
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .texture_quality
    }

    /// A counter bumped every time the settings change.
    ///
    /// Readers that cache derived state can compare generations instead of
    /// comparing settings.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::Acquire)
    }

    /// The device snapshot the settings were derived from.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.shared.capabilities
    }

    /// Texture size to allocate for an asset authored at `base_size`.
    pub fn texture_resolution_for(&self, base_size: u32) -> u32 {
        self.shared
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .texture_resolution_for(base_size, self.shared.capabilities.max_texture_size)
    }

    /// Geometry LOD factor for an object `distance` units from the camera.
    pub fn geometry_lod_for(&self, distance: f32) -> f32 {
        self.shared
            .settings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .geometry_lod_for(distance)
    }
}

/// The single writer of the shared settings. Not cloneable.
#[derive(Debug)]
pub(crate) struct QualityWriter {
    shared: Arc<Shared>,
}

impl QualityWriter {
    pub(crate) fn new(capabilities: DeviceCapabilities, initial: QualitySettings) -> Self {
        Self {
            shared: Arc::new(Shared {
                settings: RwLock::new(initial),
                generation: AtomicU64::new(0),
                capabilities,
            }),
        }
    }

    pub(crate) fn handle(&self) -> QualityHandle {
        QualityHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub(crate) fn capabilities(&self) -> &DeviceCapabilities {
        &self.shared.capabilities
    }

    /// Replaces the settings. Returns `true` (and bumps the generation) if they changed.
    pub(crate) fn publish(&self, settings: &QualitySettings) -> bool {
        let mut guard = self
            .shared
            .settings
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if *guard == *settings {
            return false;
        }
        *guard = settings.clone();
        self.shared.generation.fetch_add(1, Ordering::AcqRel);
        true
    }
}
