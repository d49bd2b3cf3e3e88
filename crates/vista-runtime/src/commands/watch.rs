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

//! Live session: a paced render loop feeding the background service.

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use vista_control::{OptimizerService, PerformanceOptimizer, QualityEvent, ServiceConfig};
use vista_core::ResourceMonitor;
use vista_infra::{HeapMemoryMonitor, WgpuCapabilityProbe};
use vista_telemetry::DiagnosticsReport;

pub fn run(config_path: Option<&Path>, seconds: u64, frame_ms: f64) -> Result<()> {
    let config = super::load_config(config_path)?;
    let optimizer = PerformanceOptimizer::from_probe(config, &WgpuCapabilityProbe::new());
    let monitor: Arc<dyn ResourceMonitor> = Arc::new(HeapMemoryMonitor::new("vista-heap"));

    let (mut service, events) =
        OptimizerService::new(ServiceConfig::default(), optimizer, Some(Arc::clone(&monitor)));
    let recorder = service.frame_recorder();
    let handle = service.handle();
    service.start();

    let frame = Duration::from_secs_f64(frame_ms.max(1.0) / 1000.0);
    let epoch = Instant::now();
    let deadline = Duration::from_secs(seconds);
    let mut seen_generation = handle.generation();

    while epoch.elapsed() < deadline {
        let frame_start = Instant::now();
        recorder.record_frame(epoch.elapsed().as_secs_f64() * 1000.0);

        // Readers only re-fetch the settings when the generation moves.
        let generation = handle.generation();
        if generation != seen_generation {
            seen_generation = generation;
            log::debug!(
                "Render loop picked up settings: {} (textures at {}px)",
                handle.settings(),
                handle.texture_resolution_for(2048)
            );
        }

        for event in events.try_iter() {
            match event {
                QualityEvent::Changed {
                    decision, current, ..
                } => println!(
                    "{:>7.1}s  {:<22} {}",
                    epoch.elapsed().as_secs_f64(),
                    decision.as_str(),
                    current
                ),
                QualityEvent::Reset(settings) => println!("reset     {}", settings),
            }
        }

        if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
            thread::sleep(rest);
        }
    }

    service.stop();
    if recorder.dropped() > 0 {
        log::warn!("{} frame events dropped by a full buffer.", recorder.dropped());
    }

    if let Some(peak_mb) = monitor.usage_report().and_then(|report| report.peak_mb()) {
        log::info!("Peak heap usage: {:.1} MB", peak_mb);
    }

    if let Some(optimizer) = service.optimizer() {
        let report = DiagnosticsReport::build(
            &optimizer.metrics(),
            optimizer.settings(),
            optimizer.capabilities(),
            optimizer.config(),
        );
        println!("{}", report.to_json()?);
    }
    Ok(())
}
