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

//! Deterministic replay of a synthetic frame trace.

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use vista_control::PerformanceOptimizer;
use vista_core::{CapabilityProbe, DeviceCapabilities, GraphicsApiVersion};
use vista_infra::{StaticMemoryMonitor, WgpuCapabilityProbe};
use vista_telemetry::DiagnosticsReport;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Optimizer configuration (RON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Device profile to simulate; `probe` uses the real adapter
    #[arg(long, value_enum, default_value_t = DeviceProfile::Desktop)]
    pub device: DeviceProfile,

    /// Steady frame time in milliseconds
    #[arg(long, default_value_t = 16.0)]
    pub frame_ms: f64,

    /// Switch to this frame time halfway through the session
    #[arg(long)]
    pub slow_frame_ms: Option<f64>,

    /// Insert a spike every N frames
    #[arg(long)]
    pub spike_every: Option<u32>,

    /// Length of each spike in milliseconds
    #[arg(long, default_value_t = 500.0)]
    pub spike_ms: f64,

    /// Heap usage reported by the monitor, in megabytes
    #[arg(long, default_value_t = 40.0)]
    pub memory_mb: f32,

    /// Simulated session length in seconds
    #[arg(short, long, default_value_t = 20)]
    pub seconds: u64,

    /// Print the final diagnostics report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Canned capability records for reproducible sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeviceProfile {
    HighEnd,
    Desktop,
    Mobile,
    Lowest,
    Probe,
}

impl DeviceProfile {
    fn capabilities(self) -> DeviceCapabilities {
        let desktop = DeviceCapabilities {
            is_high_end: false,
            is_mobile: false,
            graphics_api_version: GraphicsApiVersion::V2,
            max_texture_size: 8192,
            max_texture_units: 16,
            has_float_textures: true,
            has_multisampling: true,
            memory_gb: 8.0,
            gpu_name: "Simulated desktop GPU".to_string(),
            cpu_cores: 4,
        };
        match self {
            DeviceProfile::HighEnd => DeviceCapabilities {
                is_high_end: true,
                max_texture_size: 16384,
                memory_gb: 16.0,
                gpu_name: "Simulated RTX GPU".to_string(),
                cpu_cores: 12,
                ..desktop
            },
            DeviceProfile::Desktop => desktop,
            DeviceProfile::Mobile => DeviceCapabilities {
                is_mobile: true,
                max_texture_size: 4096,
                memory_gb: 4.0,
                gpu_name: "Simulated mobile GPU".to_string(),
                ..desktop
            },
            DeviceProfile::Lowest => DeviceCapabilities::lowest(),
            DeviceProfile::Probe => WgpuCapabilityProbe::new().probe(),
        }
    }
}

/// Frame times for a synthetic session.
#[derive(Debug, Clone)]
pub struct SyntheticTrace {
    frame_ms: f64,
    slow_frame_ms: Option<f64>,
    spike_every: Option<u32>,
    spike_ms: f64,
    duration_ms: f64,
}

impl SyntheticTrace {
    pub fn from_args(args: &SimulateArgs) -> Self {
        Self {
            frame_ms: args.frame_ms.max(0.1),
            slow_frame_ms: args.slow_frame_ms.map(|ms| ms.max(0.1)),
            spike_every: args.spike_every.filter(|n| *n > 0),
            spike_ms: args.spike_ms.max(0.1),
            duration_ms: args.seconds as f64 * 1000.0,
        }
    }

    /// Frame timestamps in milliseconds, starting at zero.
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        let mut now = 0.0;
        let mut frame: u64 = 0;
        std::iter::from_fn(move || {
            if now > self.duration_ms {
                return None;
            }
            let current = now;
            frame += 1;
            now += self.frame_time(frame, current);
            Some(current)
        })
    }

    fn frame_time(&self, frame: u64, now: f64) -> f64 {
        if let Some(every) = self.spike_every {
            if frame % every as u64 == 0 {
                return self.spike_ms;
            }
        }
        match self.slow_frame_ms {
            Some(slow) if now >= self.duration_ms / 2.0 => slow,
            _ => self.frame_ms,
        }
    }
}

pub fn run(args: &SimulateArgs) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let capabilities = args.device.capabilities();
    let monitor = StaticMemoryMonitor::new(args.memory_mb);
    let trace = SyntheticTrace::from_args(args);

    let mut optimizer = PerformanceOptimizer::new(config, capabilities);
    println!("start     {}", optimizer.settings());

    let mut changes = 0;
    for timestamp in trace.timestamps() {
        optimizer.record_frame(timestamp);
        if let Some(outcome) = optimizer.poll(timestamp, Some(&monitor)) {
            if outcome.changed() {
                changes += 1;
                println!(
                    "{:>7.1}s  {:<22} {}",
                    timestamp / 1000.0,
                    outcome.decision.as_str(),
                    outcome.settings
                );
            }
        }
    }
    println!("end       {} ({} changes)", optimizer.settings(), changes);

    let report = DiagnosticsReport::build(
        &optimizer.metrics(),
        optimizer.settings(),
        optimizer.capabilities(),
        optimizer.config(),
    );
    if args.json {
        println!("{}", report.to_json()?);
    } else {
        let metrics = &report.metrics;
        println!(
            "grade {}  ({:.1} fps avg, {:.2} ms/frame, {:.1} MB)",
            report.grade, metrics.average_fps, metrics.frame_time_ms, metrics.memory_usage_mb
        );
        for recommendation in &report.recommendations {
            println!("  - {}", recommendation);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(frame_ms: f64, seconds: u64) -> SyntheticTrace {
        SyntheticTrace {
            frame_ms,
            slow_frame_ms: None,
            spike_every: None,
            spike_ms: 500.0,
            duration_ms: seconds as f64 * 1000.0,
        }
    }

    #[test]
    fn test_steady_trace_is_evenly_spaced() {
        let stamps: Vec<f64> = trace(20.0, 1).timestamps().collect();
        assert_eq!(stamps.len(), 51);
        assert_eq!(stamps[0], 0.0);
        assert!(stamps.windows(2).all(|w| (w[1] - w[0] - 20.0).abs() < 1e-9));
    }

    #[test]
    fn test_spikes_are_inserted() {
        let t = SyntheticTrace {
            spike_every: Some(10),
            ..trace(10.0, 1)
        };
        let stamps: Vec<f64> = t.timestamps().collect();
        let spikes = stamps
            .windows(2)
            .filter(|w| (w[1] - w[0] - 500.0).abs() < 1e-9)
            .count();
        assert!(spikes >= 1);
    }

    #[test]
    fn test_slow_second_half() {
        let t = SyntheticTrace {
            slow_frame_ms: Some(40.0),
            ..trace(10.0, 2)
        };
        let stamps: Vec<f64> = t.timestamps().collect();
        let last = stamps.len() - 1;
        assert!((stamps[1] - stamps[0] - 10.0).abs() < 1e-9);
        assert!((stamps[last] - stamps[last - 1] - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_slow_desktop_session_degrades() {
        let args = SimulateArgs {
            config: None,
            device: DeviceProfile::Desktop,
            frame_ms: 16.0,
            slow_frame_ms: Some(50.0),
            spike_every: None,
            spike_ms: 500.0,
            memory_mb: 40.0,
            seconds: 20,
            json: false,
        };
        let mut optimizer =
            PerformanceOptimizer::new(Default::default(), args.device.capabilities());
        let monitor = StaticMemoryMonitor::new(args.memory_mb);
        for timestamp in SyntheticTrace::from_args(&args).timestamps() {
            optimizer.record_frame(timestamp);
            optimizer.poll(timestamp, Some(&monitor));
        }
        assert_eq!(
            optimizer.settings().texture_quality,
            vista_core::TextureQuality::Low
        );
        assert_eq!(
            optimizer.settings().shadow_quality,
            vista_core::ShadowQuality::None
        );
    }

    #[test]
    fn test_profiles_map_to_expected_tiers() {
        use vista_control::initial_tier;
        use vista_core::QualityTier;
        assert_eq!(initial_tier(&DeviceProfile::HighEnd.capabilities()), QualityTier::Ultra);
        assert_eq!(initial_tier(&DeviceProfile::Desktop.capabilities()), QualityTier::High);
        assert_eq!(initial_tier(&DeviceProfile::Mobile.capabilities()), QualityTier::Medium);
        assert_eq!(initial_tier(&DeviceProfile::Lowest.capabilities()), QualityTier::Low);
    }
}
