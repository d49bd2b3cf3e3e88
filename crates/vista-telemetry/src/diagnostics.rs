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

//! Performance grading and advisory recommendations.

use serde::Serialize;
use std::fmt;
use vista_core::{
    DeviceCapabilities, OptimizerConfig, PerformanceMetrics, QualitySettings, ShadowQuality,
    TextureQuality,
};

/// Letter grade for smoothed frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum PerformanceGrade {
    A,
    B,
    C,
    D,
}

impl PerformanceGrade {
    /// A at 55 fps and up, B at 45, C at 30, D below.
    pub fn from_fps(fps: f32) -> Self {
        if fps >= 55.0 {
            PerformanceGrade::A
        } else if fps >= 45.0 {
            PerformanceGrade::B
        } else if fps >= 30.0 {
            PerformanceGrade::C
        } else {
            PerformanceGrade::D
        }
    }
}

impl fmt::Display for PerformanceGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            PerformanceGrade::A => "A",
            PerformanceGrade::B => "B",
            PerformanceGrade::C => "C",
            PerformanceGrade::D => "D",
        };
        f.write_str(letter)
    }
}

/// Compares metrics and settings against the controller thresholds and
/// describes what would help. Purely advisory.
pub fn recommendations(
    metrics: &PerformanceMetrics,
    settings: &QualitySettings,
    capabilities: &DeviceCapabilities,
    config: &OptimizerConfig,
) -> Vec<String> {
    let mut out = Vec::new();
    let fps = metrics.average_fps;
    let has_frames = metrics.has_frame_samples(config.min_frame_samples);

    if has_frames && fps < config.severe_fps {
        out.push(format!(
            "Frame rate is critically low ({fps:.1} fps): use low textures and disable shadows."
        ));
    } else if has_frames && fps < config.moderate_fps {
        out.push(format!(
            "Frame rate is below target ({fps:.1} fps): lower texture quality."
        ));
        if settings.anti_aliasing {
            out.push("Disable anti-aliasing to recover frame time.".to_string());
        }
        if settings.shadow_quality > ShadowQuality::Low {
            out.push(format!(
                "Reduce shadow quality from {}.",
                settings.shadow_quality
            ));
        }
    }

    if metrics.memory_usage_mb > config.memory_budget_mb {
        out.push(format!(
            "Memory usage {:.1}MB exceeds the {:.0}MB budget: lower texture resolution.",
            metrics.memory_usage_mb, config.memory_budget_mb
        ));
    } else if metrics.memory_usage_mb >= config.upgrade_memory_mb() {
        out.push(format!(
            "Memory usage {:.1}MB is close to the {:.0}MB budget.",
            metrics.memory_usage_mb, config.memory_budget_mb
        ));
    }

    if metrics.draw_calls > config.draw_call_warning {
        out.push(format!(
            "{} draw calls per frame: batch or instance repeated meshes.",
            metrics.draw_calls
        ));
    }
    if metrics.triangle_count > config.triangle_warning {
        out.push(format!(
            "{} triangles per frame: lower the geometry LOD.",
            metrics.triangle_count
        ));
    }

    let headroom = has_frames
        && fps >= config.upgrade_fps
        && metrics.memory_usage_mb < config.upgrade_memory_mb();
    if headroom {
        if settings.texture_quality == TextureQuality::Medium && !capabilities.is_mobile {
            out.push("Headroom available: texture quality can be raised to high.".to_string());
        } else if settings.texture_quality == TextureQuality::High && capabilities.is_high_end {
            out.push("Headroom available: texture quality can be raised to ultra.".to_string());
        }
    }

    out
}

/// A serialisable snapshot of the controller's state for diagnostics surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsReport {
    pub grade: PerformanceGrade,
    pub metrics: PerformanceMetrics,
    pub settings: QualitySettings,
    pub capabilities: DeviceCapabilities,
    pub recommendations: Vec<String>,
}

impl DiagnosticsReport {
    /// Grades the smoothed fps and collects recommendations.
    pub fn build(
        metrics: &PerformanceMetrics,
        settings: &QualitySettings,
        capabilities: &DeviceCapabilities,
        config: &OptimizerConfig,
    ) -> Self {
        Self {
            grade: PerformanceGrade::from_fps(metrics.average_fps),
            metrics: *metrics,
            settings: settings.clone(),
            capabilities: capabilities.clone(),
            recommendations: recommendations(metrics, settings, capabilities, config),
        }
    }

    /// Pretty JSON rendering of the report.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vista_core::QualityTier;

    fn metrics(average_fps: f32, memory_usage_mb: f32) -> PerformanceMetrics {
        PerformanceMetrics {
            fps: average_fps,
            average_fps,
            frame_samples: 60,
            memory_usage_mb,
            ..Default::default()
        }
    }

    fn desktop() -> DeviceCapabilities {
        DeviceCapabilities {
            is_mobile: false,
            memory_gb: 8.0,
            ..DeviceCapabilities::lowest()
        }
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(PerformanceGrade::from_fps(60.0), PerformanceGrade::A);
        assert_eq!(PerformanceGrade::from_fps(55.0), PerformanceGrade::A);
        assert_eq!(PerformanceGrade::from_fps(54.9), PerformanceGrade::B);
        assert_eq!(PerformanceGrade::from_fps(45.0), PerformanceGrade::B);
        assert_eq!(PerformanceGrade::from_fps(44.9), PerformanceGrade::C);
        assert_eq!(PerformanceGrade::from_fps(30.0), PerformanceGrade::C);
        assert_eq!(PerformanceGrade::from_fps(29.9), PerformanceGrade::D);
        assert_eq!(PerformanceGrade::from_fps(0.0), PerformanceGrade::D);
    }

    #[test]
    fn test_healthy_session_has_no_recommendations() {
        let recs = recommendations(
            &metrics(50.0, 40.0),
            &QualityTier::High.settings(),
            &desktop(),
            &OptimizerConfig::default(),
        );
        assert!(recs.is_empty(), "{recs:?}");
    }

    #[test]
    fn test_low_fps_recommendations() {
        let config = OptimizerConfig::default();
        let severe = recommendations(&metrics(20.0, 40.0), &QualityTier::High.settings(), &desktop(), &config);
        assert!(severe.iter().any(|r| r.contains("critically low")));

        let moderate = recommendations(&metrics(40.0, 40.0), &QualityTier::Ultra.settings(), &desktop(), &config);
        assert!(moderate.iter().any(|r| r.contains("below target")));
        assert!(moderate.iter().any(|r| r.contains("anti-aliasing")));
        assert!(moderate.iter().any(|r| r.contains("shadow")));
    }

    #[test]
    fn test_memory_recommendations() {
        let config = OptimizerConfig::default();
        let over = recommendations(&metrics(50.0, 120.0), &QualityTier::Low.settings(), &desktop(), &config);
        assert!(over.iter().any(|r| r.contains("exceeds")));
        let near = recommendations(&metrics(50.0, 80.0), &QualityTier::Low.settings(), &desktop(), &config);
        assert!(near.iter().any(|r| r.contains("close to")));
    }

    #[test]
    fn test_headroom_recommendation() {
        let recs = recommendations(
            &metrics(62.0, 30.0),
            &QualityTier::Medium.settings(),
            &desktop(),
            &OptimizerConfig::default(),
        );
        assert!(recs.iter().any(|r| r.contains("raised to high")));
    }

    #[test]
    fn test_render_counter_recommendations() {
        let m = PerformanceMetrics {
            draw_calls: 5000,
            triangle_count: 3_000_000,
            ..metrics(50.0, 10.0)
        };
        let recs = recommendations(&m, &QualityTier::Low.settings(), &desktop(), &OptimizerConfig::default());
        assert!(recs.iter().any(|r| r.contains("draw calls")));
        assert!(recs.iter().any(|r| r.contains("triangles")));
    }

    #[test]
    fn test_report_serialises() {
        let report = DiagnosticsReport::build(
            &metrics(58.0, 40.0),
            &QualityTier::High.settings(),
            &desktop(),
            &OptimizerConfig::default(),
        );
        assert_eq!(report.grade, PerformanceGrade::A);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"grade\": \"A\""));
        assert!(json.contains("\"texture_quality\": \"High\""));
    }
}
