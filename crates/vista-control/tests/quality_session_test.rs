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

//! End-to-end sessions through the optimizer: frames in, quality decisions out.

use approx::assert_relative_eq;
use vista_control::{AdjustmentOutcome, Decision, PerformanceOptimizer, FRAME_HISTORY};
use vista_core::{
    DeviceCapabilities, FixedProbe, GraphicsApiVersion, OptimizerConfig, QualityTier,
    ShadowQuality, TextureQuality,
};

/// Drives an optimizer with a synthetic clock, polling after every frame.
struct Session {
    optimizer: PerformanceOptimizer,
    now_ms: f64,
}

impl Session {
    fn new(capabilities: DeviceCapabilities) -> Self {
        Self {
            optimizer: PerformanceOptimizer::from_probe(
                OptimizerConfig::default(),
                &FixedProbe(capabilities),
            ),
            now_ms: 0.0,
        }
    }

    /// Renders frames of `frame_ms` for `duration_ms`, returning every tick outcome.
    fn run(&mut self, frame_ms: f64, duration_ms: f64) -> Vec<AdjustmentOutcome> {
        let end = self.now_ms + duration_ms;
        let mut outcomes = Vec::new();
        while self.now_ms < end {
            self.frame();
            outcomes.extend(self.optimizer.poll(self.now_ms, None));
            self.now_ms += frame_ms;
        }
        outcomes
    }

    fn frame(&mut self) {
        self.optimizer.record_frame(self.now_ms);
    }
}

fn changes(outcomes: &[AdjustmentOutcome]) -> Vec<Decision> {
    outcomes
        .iter()
        .filter(|o| o.changed())
        .map(|o| o.decision)
        .collect()
}

fn desktop_8gb() -> DeviceCapabilities {
    DeviceCapabilities {
        is_high_end: false,
        is_mobile: false,
        graphics_api_version: GraphicsApiVersion::V2,
        max_texture_size: 4096,
        max_texture_units: 16,
        has_float_textures: true,
        has_multisampling: true,
        memory_gb: 8.0,
        gpu_name: "Integrated GPU".to_string(),
        cpu_cores: 4,
    }
}

fn high_end() -> DeviceCapabilities {
    DeviceCapabilities {
        is_high_end: true,
        memory_gb: 16.0,
        cpu_cores: 16,
        max_texture_size: 16384,
        gpu_name: "NVIDIA GeForce RTX 4070".to_string(),
        ..desktop_8gb()
    }
}

#[test]
fn test_desktop_8gb_starts_at_high_and_holds_at_target() {
    // --- 1. ARRANGE ---
    let mut session = Session::new(desktop_8gb());
    let handle = session.optimizer.handle();

    let settings = handle.settings();
    assert_eq!(settings.texture_quality, TextureQuality::High);
    assert_relative_eq!(settings.geometry_lod, 0.8);
    assert_eq!(settings.shadow_quality, ShadowQuality::Medium);
    assert_eq!(settings.particle_count, 100);
    assert!(settings.anti_aliasing);
    assert_eq!(settings.anisotropic_filtering, 8);

    // --- 2. ACT ---
    // 62.5 fps for ten seconds.
    let outcomes = session.run(16.0, 10_000.0);

    // --- 3. ASSERT ---
    assert!(outcomes.len() >= 4, "ticks should run every two seconds");
    assert!(
        changes(&outcomes).is_empty(),
        "a non high-end desktop never goes above High"
    );
    assert_eq!(handle.settings(), QualityTier::High.settings());
}

#[test]
fn test_moderate_slowdown_then_recovery() {
    let mut session = Session::new(desktop_8gb());
    let handle = session.optimizer.handle();

    // 40 fps: one step down, then held at Medium.
    let slow = session.run(25.0, 4_100.0);
    assert_eq!(changes(&slow), vec![Decision::ModerateDegradation]);
    assert_eq!(handle.texture_quality(), TextureQuality::Medium);
    assert_eq!(handle.settings().particle_count, 70);

    // Back to 62.5 fps: one step up to High.
    let fast = session.run(16.0, 8_000.0);
    assert_eq!(changes(&fast), vec![Decision::Upgrade]);
    assert_eq!(handle.texture_quality(), TextureQuality::High);
    // Upgrades only touch textures.
    assert_eq!(handle.settings().particle_count, 70);
}

#[test]
fn test_collapsed_frame_rate_converges_to_floor() {
    let mut session = Session::new(high_end());
    assert_eq!(session.optimizer.settings().particle_count, 200);

    // 20 fps for fifteen seconds: seven severe ticks.
    let outcomes = session.run(50.0, 15_000.0);

    let particles: Vec<u32> = outcomes.iter().map(|o| o.settings.particle_count).collect();
    assert_eq!(&particles[..6], &[100, 50, 25, 12, 10, 10]);
    assert!(particles.windows(2).all(|w| w[1] <= w[0]));
    assert!(outcomes
        .iter()
        .all(|o| o.decision == Decision::SevereDegradation));

    let settings = session.optimizer.settings();
    assert_eq!(settings.texture_quality, TextureQuality::Low);
    assert_eq!(settings.shadow_quality, ShadowQuality::None);
    assert!(!settings.anti_aliasing);
    assert_eq!(settings.particle_count, 10);

    // At the floor further severe ticks are no-ops.
    let generation = session.optimizer.handle().generation();
    session.run(50.0, 4_000.0);
    assert_eq!(session.optimizer.handle().generation(), generation);
}

#[test]
fn test_memory_over_budget_degrades_without_frames() {
    let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop_8gb());
    optimizer.record_memory(Some(150.0));

    assert!(optimizer.poll(0.0, None).is_none());
    let outcome = optimizer
        .poll(2_000.0, None)
        .expect("tick due after one interval");

    assert_eq!(outcome.decision, Decision::SevereDegradation);
    assert_eq!(optimizer.settings().texture_quality, TextureQuality::Low);
}

#[test]
fn test_single_spike_is_absorbed() {
    let mut session = Session::new(desktop_8gb());

    let mut outcomes = session.run(16.0, 3_000.0);
    // One 500ms hitch.
    session.frame();
    session.now_ms += 500.0;
    outcomes.extend(session.run(16.0, 3_000.0));

    assert!(changes(&outcomes).is_empty());
    assert_eq!(
        session.optimizer.settings().texture_quality,
        TextureQuality::High
    );
}

#[test]
fn test_long_session_keeps_bounded_history() {
    let mut session = Session::new(desktop_8gb());
    session.run(16.0, 16.0 * 1000.0);

    let metrics = session.optimizer.metrics();
    assert_eq!(metrics.frame_samples, FRAME_HISTORY);
    assert_relative_eq!(metrics.fps, 62.5, epsilon = 1e-3);
    assert_relative_eq!(metrics.frame_time_ms, 16.0, epsilon = 1e-3);
}

#[test]
fn test_texture_resolution_clamped_to_device_limit() {
    let caps = DeviceCapabilities {
        max_texture_size: 1024,
        ..high_end()
    };
    let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), caps);
    let handle = optimizer.handle();

    // Ultra would ask for 3072.
    assert_eq!(handle.texture_resolution_for(2048), 1024);
    assert_eq!(handle.texture_resolution_for(512), 768);

    optimizer.record_memory(Some(500.0));
    optimizer.poll(0.0, None);
    optimizer.poll(2_000.0, None);
    assert_eq!(handle.texture_resolution_for(2048), 1024);
    assert_eq!(handle.texture_resolution_for(1024), 512);
}

#[test]
fn test_force_optimization_restores_policy_tier() {
    let mut session = Session::new(high_end());
    session.run(50.0, 4_100.0);
    assert_eq!(session.optimizer.settings().texture_quality, TextureQuality::Low);

    let restored = session.optimizer.force_optimization();

    assert_eq!(restored, QualityTier::Ultra.settings());
    assert_eq!(session.optimizer.handle().settings(), restored);
    assert_relative_eq!(session.optimizer.geometry_lod_for(10.0), 0.7);
}
