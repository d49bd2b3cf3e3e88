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

//! The cooperative, single-threaded quality controller.

use crate::analysis::{AdaptiveAdjuster, AdjustmentOutcome};
use crate::handle::{QualityHandle, QualityWriter};
use crate::metrics::FrameSampler;
use crate::policy;
use crate::schedule::Schedule;
use std::time::Duration;
use vista_core::{
    CapabilityProbe, DeviceCapabilities, OptimizerConfig, PerformanceMetrics, QualitySettings,
    ResourceMonitor,
};

/// Owns one rendering session's quality state.
///
/// The render loop calls [`record_frame`](Self::record_frame) every frame and
/// [`poll`](Self::poll) whenever convenient (typically once per frame as well);
/// `poll` runs the memory and adjustment schedules when they are due. Readers
/// get a [`QualityHandle`] and never see the writer.
#[derive(Debug)]
pub struct PerformanceOptimizer {
    config: OptimizerConfig,
    sampler: FrameSampler,
    adjuster: AdaptiveAdjuster,
    writer: QualityWriter,
    settings: QualitySettings,
    tick_schedule: Schedule,
    memory_schedule: Schedule,
    adaptive: bool,
}

impl PerformanceOptimizer {
    /// Creates an optimizer for a device, starting from the policy tier.
    pub fn new(config: OptimizerConfig, capabilities: DeviceCapabilities) -> Self {
        let tier = policy::initial_tier(&capabilities);
        let settings = tier.settings();
        log::info!(
            "Quality: initial tier {:?} for \"{}\" (high_end={}, mobile={}, {:.1}GB) - {}",
            tier,
            capabilities.gpu_name,
            capabilities.is_high_end,
            capabilities.is_mobile,
            capabilities.memory_gb,
            settings
        );

        Self {
            adjuster: AdaptiveAdjuster::new(&config),
            tick_schedule: Schedule::delayed(Duration::from_millis(config.tick_interval_ms)),
            memory_schedule: Schedule::immediate(Duration::from_millis(config.memory_interval_ms)),
            adaptive: config.adaptive,
            writer: QualityWriter::new(capabilities, settings.clone()),
            sampler: FrameSampler::new(),
            settings,
            config,
        }
    }

    /// Probes the device once and creates an optimizer for it.
    pub fn from_probe(config: OptimizerConfig, probe: &dyn CapabilityProbe) -> Self {
        Self::new(config, probe.probe())
    }

    /// A read-only handle on the shared settings, for rendering code.
    pub fn handle(&self) -> QualityHandle {
        self.writer.handle()
    }

    /// The active settings.
    pub fn settings(&self) -> &QualitySettings {
        &self.settings
    }

    /// The device snapshot this session was configured for.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        self.writer.capabilities()
    }

    /// The thresholds and intervals this optimizer was built with.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// A snapshot of the sampled metrics.
    pub fn metrics(&self) -> PerformanceMetrics {
        self.sampler.metrics()
    }

    /// Records a rendered frame. O(1); safe to call on the render path.
    pub fn record_frame(&mut self, timestamp_ms: f64) {
        self.sampler.record_frame(timestamp_ms);
    }

    /// Records the renderer's draw call and triangle counters for the last frame.
    pub fn record_render_stats(&mut self, draw_calls: u32, triangle_count: u64) {
        self.sampler.record_render_stats(draw_calls, triangle_count);
    }

    /// Records the current texture memory footprint.
    pub fn record_texture_memory(&mut self, texture_memory_mb: f32) {
        self.sampler.record_texture_memory(texture_memory_mb);
    }

    /// Polls `monitor` and records its reading. An unreadable monitor keeps the last value.
    pub fn sample_memory(&mut self, monitor: &dyn ResourceMonitor) {
        monitor.update();
        let reading = monitor.usage_report().map(|report| report.current_mb());
        if reading.is_none() {
            log::debug!("Monitor '{}' returned no reading.", monitor.monitor_id());
        }
        self.sampler.record_memory(reading);
    }

    /// Records a memory reading taken by the caller.
    pub fn record_memory(&mut self, usage_mb: Option<f32>) {
        self.sampler.record_memory(usage_mb);
    }

    /// Runs one adjustment step now and publishes the result.
    ///
    /// With adaptation disabled this is always a hold.
    pub fn tick(&mut self) -> AdjustmentOutcome {
        if !self.adaptive {
            log::trace!("Quality: adaptation paused, holding.");
            return AdjustmentOutcome::hold(&self.settings);
        }

        let metrics = self.sampler.metrics();
        let outcome = self
            .adjuster
            .tick(&metrics, self.writer.capabilities(), &self.settings);

        for alert in &outcome.alerts {
            log::warn!("Quality analysis: {}", alert);
        }

        if outcome.changed() {
            log::info!(
                "Quality: {} ({:.1} fps avg, {:.1}MB) {} -> {}",
                outcome.decision.as_str(),
                metrics.average_fps,
                metrics.memory_usage_mb,
                outcome.previous,
                outcome.settings
            );
            self.apply(outcome.settings.clone());
        } else {
            log::trace!("Quality: {} with no change.", outcome.decision.as_str());
        }

        outcome
    }

    /// Runs whatever schedules are due at `now_ms`.
    ///
    /// Memory is sampled first so that a tick due at the same instant sees
    /// the fresh reading. Returns the tick outcome if the adjustment ran.
    pub fn poll(
        &mut self,
        now_ms: f64,
        monitor: Option<&dyn ResourceMonitor>,
    ) -> Option<AdjustmentOutcome> {
        if self.memory_schedule.poll(now_ms) {
            if let Some(monitor) = monitor {
                self.sample_memory(monitor);
            }
        }
        self.tick_schedule.poll(now_ms).then(|| self.tick())
    }

    /// Discards adaptive changes and reapplies the policy tier for this device.
    ///
    /// The adjustment schedule restarts so the next tick gets a full interval
    /// of fresh frames.
    pub fn force_optimization(&mut self) -> QualitySettings {
        let settings = policy::initial_settings(self.writer.capabilities());
        log::info!("Quality: reset to recommended settings - {}", settings);
        self.apply(settings.clone());
        self.tick_schedule.reset();
        settings
    }

    /// Pauses or resumes periodic adjustment.
    pub fn set_adaptive(&mut self, adaptive: bool) {
        if self.adaptive != adaptive {
            log::info!(
                "Quality: adaptation {}.",
                if adaptive { "resumed" } else { "paused" }
            );
        }
        self.adaptive = adaptive;
    }

    /// Returns `false` while periodic adjustment is paused.
    pub fn is_adaptive(&self) -> bool {
        self.adaptive
    }

    /// See [`QualityHandle::texture_resolution_for`].
    pub fn texture_resolution_for(&self, base_size: u32) -> u32 {
        self.settings
            .texture_resolution_for(base_size, self.writer.capabilities().max_texture_size)
    }

    /// See [`QualityHandle::geometry_lod_for`].
    pub fn geometry_lod_for(&self, distance: f32) -> f32 {
        self.settings.geometry_lod_for(distance)
    }

    fn apply(&mut self, settings: QualitySettings) {
        self.writer.publish(&settings);
        self.settings = settings;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Decision;
    use std::borrow::Cow;
    use std::sync::Mutex;
    use vista_core::telemetry::ResourceUsageReport;
    use vista_core::{FixedProbe, QualityTier, TextureQuality};

    #[derive(Debug)]
    struct StubMonitor {
        readings: Mutex<Vec<Option<u64>>>,
        current: Mutex<Option<u64>>,
    }

    impl StubMonitor {
        fn new(mut readings_mb: Vec<Option<u64>>) -> Self {
            readings_mb.reverse();
            Self {
                readings: Mutex::new(readings_mb),
                current: Mutex::new(None),
            }
        }
    }

    impl ResourceMonitor for StubMonitor {
        fn monitor_id(&self) -> Cow<'static, str> {
            Cow::Borrowed("stub")
        }
        fn usage_report(&self) -> Option<ResourceUsageReport> {
            self.current.lock().unwrap().map(|mb| ResourceUsageReport {
                current_bytes: mb * 1024 * 1024,
                ..Default::default()
            })
        }
        fn update(&self) {
            let next = self.readings.lock().unwrap().pop().flatten();
            *self.current.lock().unwrap() = next;
        }
    }

    fn desktop() -> DeviceCapabilities {
        DeviceCapabilities {
            is_mobile: false,
            memory_gb: 8.0,
            max_texture_size: 4096,
            ..DeviceCapabilities::lowest()
        }
    }

    fn feed(optimizer: &mut PerformanceOptimizer, start_ms: f64, frame_ms: f64, frames: usize) -> f64 {
        let mut t = start_ms;
        for _ in 0..frames {
            optimizer.record_frame(t);
            t += frame_ms;
        }
        t
    }

    #[test]
    fn test_initial_settings_from_policy() {
        let optimizer = PerformanceOptimizer::from_probe(
            OptimizerConfig::default(),
            &FixedProbe(desktop()),
        );
        assert_eq!(*optimizer.settings(), QualityTier::High.settings());
        assert_eq!(optimizer.handle().settings(), QualityTier::High.settings());
    }

    #[test]
    fn test_poll_ticks_every_interval() {
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());
        assert!(optimizer.poll(0.0, None).is_none());
        assert!(optimizer.poll(1999.0, None).is_none());
        assert!(optimizer.poll(2000.0, None).is_some());
        assert!(optimizer.poll(3000.0, None).is_none());
        assert!(optimizer.poll(4000.0, None).is_some());
    }

    #[test]
    fn test_memory_sampled_on_its_own_interval() {
        let monitor = StubMonitor::new(vec![Some(30), None, Some(50)]);
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());

        optimizer.poll(0.0, Some(&monitor));
        assert_eq!(optimizer.metrics().memory_usage_mb, 30.0);
        optimizer.poll(500.0, Some(&monitor));
        assert_eq!(optimizer.metrics().memory_usage_mb, 30.0);
        optimizer.poll(1000.0, Some(&monitor));
        // Unreadable: last value kept.
        assert_eq!(optimizer.metrics().memory_usage_mb, 30.0);
        optimizer.poll(2000.0, Some(&monitor));
        assert_eq!(optimizer.metrics().memory_usage_mb, 50.0);
    }

    #[test]
    fn test_sustained_headroom_upgrades_once_and_stays() {
        let caps = desktop();
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), caps);
        optimizer.apply(QualityTier::Medium.settings());
        optimizer.record_memory(Some(40.0));

        let mut t = 0.0;
        let mut decisions = Vec::new();
        for _ in 0..5 {
            t = feed(&mut optimizer, t, 16.0, 125);
            decisions.push(optimizer.tick());
        }

        assert!(decisions[0].changed());
        assert_eq!(decisions[0].decision, Decision::Upgrade);
        assert!(decisions[1..].iter().all(|d| !d.changed()));
        assert_eq!(optimizer.settings().texture_quality, TextureQuality::High);
    }

    #[test]
    fn test_late_frames_do_not_earn_an_upgrade() {
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());
        optimizer.apply(QualityTier::Medium.settings());
        optimizer.record_memory(Some(40.0));

        assert!(optimizer.poll(0.0, None).is_none());
        // Rendering only starts just before the tick is due.
        let mut t = 1800.0;
        for _ in 0..13 {
            optimizer.record_frame(t);
            t += 16.0;
        }
        let outcome = optimizer.poll(2000.0, None).expect("tick due");

        assert_eq!(optimizer.metrics().frame_samples, 12);
        assert_eq!(outcome.decision, Decision::Hold);
        assert_eq!(optimizer.settings().texture_quality, TextureQuality::Medium);
    }

    #[test]
    fn test_upgrade_threshold_is_sixty_unless_configured() {
        // 17ms frames: about 58.8 fps.
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());
        optimizer.apply(QualityTier::Medium.settings());
        feed(&mut optimizer, 0.0, 17.0, 120);
        assert_eq!(optimizer.tick().decision, Decision::Hold);
        assert_eq!(optimizer.settings().texture_quality, TextureQuality::Medium);

        let config = OptimizerConfig::from_ron_str("(upgrade_fps: 58.0)").unwrap();
        let mut optimizer = PerformanceOptimizer::new(config, desktop());
        optimizer.apply(QualityTier::Medium.settings());
        feed(&mut optimizer, 0.0, 17.0, 120);
        assert_eq!(optimizer.tick().decision, Decision::Upgrade);
        assert_eq!(optimizer.settings().texture_quality, TextureQuality::High);
    }

    #[test]
    fn test_force_optimization_restores_policy_tier() {
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());
        let handle = optimizer.handle();
        feed(&mut optimizer, 0.0, 50.0, 60);
        optimizer.tick();
        assert_eq!(handle.texture_quality(), TextureQuality::Low);

        let restored = optimizer.force_optimization();
        assert_eq!(restored, QualityTier::High.settings());
        assert_eq!(handle.settings(), QualityTier::High.settings());
        assert_eq!(handle.generation(), 2);
    }

    #[test]
    fn test_paused_adaptation_holds() {
        let mut optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), desktop());
        optimizer.set_adaptive(false);
        feed(&mut optimizer, 0.0, 50.0, 60);
        let outcome = optimizer.tick();
        assert_eq!(outcome.decision, Decision::Hold);
        assert_eq!(*optimizer.settings(), QualityTier::High.settings());

        optimizer.set_adaptive(true);
        assert!(optimizer.tick().changed());
    }

    #[test]
    fn test_accessors_follow_settings() {
        let caps = DeviceCapabilities {
            max_texture_size: 1024,
            ..desktop()
        };
        let optimizer = PerformanceOptimizer::new(OptimizerConfig::default(), caps);
        assert_eq!(optimizer.texture_resolution_for(2048), 1024);
        assert_eq!(optimizer.texture_resolution_for(512), 512);
        assert_eq!(optimizer.geometry_lod_for(20.0), 0.8 * 0.4);
    }
}
