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

//! Quality settings, their tiers and the accessors derived from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Texture resolution tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum TextureQuality {
    /// Half resolution.
    #[default]
    Low,
    /// Three-quarter resolution.
    Medium,
    /// Native resolution.
    High,
    /// Supersampled resolution (1.5x).
    Ultra,
}

impl TextureQuality {
    /// Multiplier applied to a base texture size for this tier.
    pub fn resolution_multiplier(self) -> f32 {
        match self {
            TextureQuality::Low => 0.5,
            TextureQuality::Medium => 0.75,
            TextureQuality::High => 1.0,
            TextureQuality::Ultra => 1.5,
        }
    }

    /// The next tier down, or `self` at the floor.
    pub fn step_down(self) -> Self {
        match self {
            TextureQuality::Ultra => TextureQuality::High,
            TextureQuality::High => TextureQuality::Medium,
            TextureQuality::Medium | TextureQuality::Low => TextureQuality::Low,
        }
    }

    /// The next tier up, or `self` at the ceiling.
    pub fn step_up(self) -> Self {
        match self {
            TextureQuality::Low => TextureQuality::Medium,
            TextureQuality::Medium => TextureQuality::High,
            TextureQuality::High | TextureQuality::Ultra => TextureQuality::Ultra,
        }
    }

    /// Lower-case name, as used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            TextureQuality::Low => "low",
            TextureQuality::Medium => "medium",
            TextureQuality::High => "high",
            TextureQuality::Ultra => "ultra",
        }
    }
}

impl fmt::Display for TextureQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shadow map tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ShadowQuality {
    /// Shadows disabled.
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl ShadowQuality {
    /// Lower-case name, as used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ShadowQuality::None => "none",
            ShadowQuality::Low => "low",
            ShadowQuality::Medium => "medium",
            ShadowQuality::High => "high",
        }
    }
}

impl fmt::Display for ShadowQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four named tiers produced by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    Low,
    Medium,
    High,
    Ultra,
}

impl QualityTier {
    /// All tiers, weakest first.
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Low,
        QualityTier::Medium,
        QualityTier::High,
        QualityTier::Ultra,
    ];

    /// The full settings bundle for this tier.
    ///
    /// | Tier | Texture | LOD | Shadows | Particles | AA | Aniso |
    /// |---|---|---|---|---|---|---|
    /// | Ultra | ultra | 1.0 | high | 200 | on | 16 |
    /// | High | high | 0.8 | medium | 100 | on | 8 |
    /// | Medium | medium | 0.6 | low | 50 | off | 4 |
    /// | Low | low | 0.4 | none | 20 | off | 2 |
    pub fn settings(self) -> QualitySettings {
        match self {
            QualityTier::Ultra => QualitySettings {
                texture_quality: TextureQuality::Ultra,
                geometry_lod: 1.0,
                shadow_quality: ShadowQuality::High,
                particle_count: 200,
                anti_aliasing: true,
                anisotropic_filtering: 16,
            },
            QualityTier::High => QualitySettings {
                texture_quality: TextureQuality::High,
                geometry_lod: 0.8,
                shadow_quality: ShadowQuality::Medium,
                particle_count: 100,
                anti_aliasing: true,
                anisotropic_filtering: 8,
            },
            QualityTier::Medium => QualitySettings {
                texture_quality: TextureQuality::Medium,
                geometry_lod: 0.6,
                shadow_quality: ShadowQuality::Low,
                particle_count: 50,
                anti_aliasing: false,
                anisotropic_filtering: 4,
            },
            QualityTier::Low => QualitySettings {
                texture_quality: TextureQuality::Low,
                geometry_lod: 0.4,
                shadow_quality: ShadowQuality::None,
                particle_count: 20,
                anti_aliasing: false,
                anisotropic_filtering: 2,
            },
        }
    }

    /// Returns the tier whose bundle equals `settings` exactly, if any.
    pub fn matching(settings: &QualitySettings) -> Option<QualityTier> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.settings() == *settings)
    }
}

/// Distance below which geometry is drawn at the full configured LOD.
const LOD_NEAR_DISTANCE: f32 = 5.0;
/// Distance below which geometry is drawn at the mid band.
const LOD_MID_DISTANCE: f32 = 15.0;
const LOD_MID_FACTOR: f32 = 0.7;
const LOD_FAR_FACTOR: f32 = 0.4;

/// The active rendering quality configuration.
///
/// Texture and shadow tiers move independently, so any mix reachable from a
/// [`QualityTier`] bundle by single-field steps is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySettings {
    pub texture_quality: TextureQuality,
    /// Geometry level-of-detail factor in `(0, 1]`.
    pub geometry_lod: f32,
    pub shadow_quality: ShadowQuality,
    pub particle_count: u32,
    pub anti_aliasing: bool,
    /// Anisotropic filtering level (2, 4, 8 or 16).
    pub anisotropic_filtering: u8,
}

impl QualitySettings {
    /// Scales `base_size` by the texture tier multiplier, clamped to `max_texture_size`.
    pub fn texture_resolution_for(&self, base_size: u32, max_texture_size: u32) -> u32 {
        let scaled = (base_size as f32 * self.texture_quality.resolution_multiplier()).round();
        (scaled as u32).min(max_texture_size)
    }

    /// Returns the LOD factor for geometry at `distance` from the camera.
    ///
    /// Banded, not continuous: full LOD below 5 units, 70% below 15, 40% beyond.
    pub fn geometry_lod_for(&self, distance: f32) -> f32 {
        if distance < LOD_NEAR_DISTANCE {
            self.geometry_lod
        } else if distance < LOD_MID_DISTANCE {
            self.geometry_lod * LOD_MID_FACTOR
        } else {
            self.geometry_lod * LOD_FAR_FACTOR
        }
    }
}

impl Default for QualitySettings {
    fn default() -> Self {
        QualityTier::Low.settings()
    }
}

impl fmt::Display for QualitySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "texture={} lod={:.2} shadows={} particles={} aa={} aniso={}x",
            self.texture_quality,
            self.geometry_lod,
            self.shadow_quality,
            self.particle_count,
            if self.anti_aliasing { "on" } else { "off" },
            self.anisotropic_filtering
        )
    }
}
