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

//! The adaptive adjuster.
//!
//! Once per tick, `AdaptiveAdjuster::tick` compares the smoothed metrics
//! against fixed thresholds and returns the next settings. Degrading is fast
//! (one tier per tick, or straight to the floor when performance collapses);
//! upgrading is slow and conditional, and must be earned across the whole
//! frame window.

use crate::metrics::FRAME_HISTORY;
use vista_core::{
    DeviceCapabilities, OptimizerConfig, PerformanceMetrics, QualitySettings, ShadowQuality,
    TextureQuality,
};

/// Particle floor applied by the severe branch.
const SEVERE_PARTICLE_FLOOR: u32 = 10;
/// Particle floor applied by the moderate branch.
const MODERATE_PARTICLE_FLOOR: u32 = 20;
/// Particle scale applied when the moderate branch leaves the High tier.
const MODERATE_PARTICLE_SCALE: f32 = 0.7;

/// Which branch of the decision table fired on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Smoothed fps collapsed or memory is over budget: drop to the floor.
    SevereDegradation,
    /// Smoothed fps is below target: step texture quality down one tier.
    ModerateDegradation,
    /// Sustained headroom: step texture quality up one tier if allowed.
    Upgrade,
    /// No branch applied.
    Hold,
}

impl Decision {
    /// Short label used in logs and events.
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::SevereDegradation => "severe-degradation",
            Decision::ModerateDegradation => "moderate-degradation",
            Decision::Upgrade => "upgrade",
            Decision::Hold => "hold",
        }
    }
}

/// The result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustmentOutcome {
    /// The branch that fired.
    pub decision: Decision,
    /// Settings before the tick.
    pub previous: QualitySettings,
    /// Settings after the tick.
    pub settings: QualitySettings,
    /// Human-readable findings for logs and diagnostics.
    pub alerts: Vec<String>,
}

impl AdjustmentOutcome {
    /// A tick that changed nothing.
    pub fn hold(current: &QualitySettings) -> Self {
        Self {
            decision: Decision::Hold,
            previous: current.clone(),
            settings: current.clone(),
            alerts: Vec::new(),
        }
    }

    /// Returns `true` if the tick produced different settings.
    pub fn changed(&self) -> bool {
        self.previous != self.settings
    }
}

/// Stateless decision table over metrics, capabilities and current settings.
#[derive(Debug, Clone)]
pub struct AdaptiveAdjuster {
    severe_fps: f32,
    moderate_fps: f32,
    upgrade_fps: f32,
    memory_budget_mb: f32,
    upgrade_memory_mb: f32,
    min_frame_samples: usize,
}

impl AdaptiveAdjuster {
    /// Builds an adjuster from the configured thresholds.
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            severe_fps: config.severe_fps,
            moderate_fps: config.moderate_fps,
            upgrade_fps: config.upgrade_fps,
            memory_budget_mb: config.memory_budget_mb,
            upgrade_memory_mb: config.upgrade_memory_mb(),
            min_frame_samples: config.min_frame_samples,
        }
    }

    /// Computes the settings for the next interval.
    ///
    /// Branches are evaluated in order and at most one fires:
    /// 1. **Severe**: fps below `severe_fps` or memory above budget.
    /// 2. **Moderate**: fps below `moderate_fps`.
    /// 3. **Upgrade**: fps at or above `upgrade_fps` over a full window, with
    ///    memory under the upgrade ceiling.
    ///
    /// fps conditions only count once `min_frame_samples` frames are retained;
    /// the memory condition of the severe branch always counts.
    pub fn tick(
        &self,
        metrics: &PerformanceMetrics,
        capabilities: &DeviceCapabilities,
        current: &QualitySettings,
    ) -> AdjustmentOutcome {
        let fps_ready = metrics.has_frame_samples(self.min_frame_samples);
        let fps = metrics.average_fps;
        let memory = metrics.memory_usage_mb;
        let mut outcome = AdjustmentOutcome::hold(current);

        let fps_collapsed = fps_ready && fps < self.severe_fps;
        let over_budget = memory > self.memory_budget_mb;

        // ── 1. Severe Degradation ────────────────────────────────────────
        if fps_collapsed || over_budget {
            outcome.decision = Decision::SevereDegradation;
            if fps_collapsed {
                outcome.alerts.push(format!(
                    "FPS: CRITICAL - avg {:.1} below {:.0}.",
                    fps, self.severe_fps
                ));
            }
            if over_budget {
                outcome.alerts.push(format!(
                    "Memory: CRITICAL - {:.1}MB exceeds {:.0}MB budget.",
                    memory, self.memory_budget_mb
                ));
            }
            let next = &mut outcome.settings;
            next.texture_quality = TextureQuality::Low;
            next.particle_count = (next.particle_count / 2)
                .max(SEVERE_PARTICLE_FLOOR)
                .min(next.particle_count);
            next.shadow_quality = ShadowQuality::None;
            next.anti_aliasing = false;
            return outcome;
        }

        if !fps_ready {
            log::trace!(
                "Adjuster: {} frame samples, waiting for {}.",
                metrics.frame_samples,
                self.min_frame_samples
            );
            return outcome;
        }

        // ── 2. Moderate Degradation ──────────────────────────────────────
        if fps < self.moderate_fps {
            outcome.decision = Decision::ModerateDegradation;
            outcome.alerts.push(format!(
                "FPS: Below target - avg {:.1} under {:.0}.",
                fps, self.moderate_fps
            ));
            let next = &mut outcome.settings;
            // This branch never goes below Medium.
            if next.texture_quality > TextureQuality::Medium {
                next.texture_quality = next.texture_quality.step_down();
                if next.texture_quality == TextureQuality::Medium {
                    let scaled = (next.particle_count as f32 * MODERATE_PARTICLE_SCALE) as u32;
                    next.particle_count = scaled
                        .max(MODERATE_PARTICLE_FLOOR)
                        .min(next.particle_count);
                }
            }
            return outcome;
        }

        // ── 3. Upgrade ───────────────────────────────────────────────────
        // Headroom has to hold across a full window, not just the first frames.
        let window_full = metrics.frame_samples >= FRAME_HISTORY;
        if window_full && fps >= self.upgrade_fps && memory < self.upgrade_memory_mb {
            outcome.decision = Decision::Upgrade;
            let next = &mut outcome.settings;
            let allowed = match next.texture_quality {
                TextureQuality::High => capabilities.is_high_end,
                TextureQuality::Medium => !capabilities.is_mobile,
                TextureQuality::Low | TextureQuality::Ultra => false,
            };
            if allowed {
                next.texture_quality = next.texture_quality.step_up();
            }
            if outcome.changed() {
                outcome.alerts.push(format!(
                    "Headroom: avg {:.1} fps, {:.1}MB - raising textures to {}.",
                    fps, memory, outcome.settings.texture_quality
                ));
            }
        }

        outcome
    }
}
