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

//! A background session owner for hosts that only push frame events.

use crate::analysis::Decision;
use crate::handle::QualityHandle;
use crate::optimizer::PerformanceOptimizer;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread;
use std::time::{Duration, Instant};
use vista_core::{PerformanceMetrics, QualitySettings, ResourceMonitor};

/// Configuration for the [`OptimizerService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// How often the background thread wakes to drain events and poll schedules.
    pub poll_interval_ms: u64,
    /// Maximum number of frame events to buffer.
    /// If the buffer is full, new events are dropped.
    pub frame_buffer_size: usize,
    /// Maximum number of quality events to buffer for listeners.
    pub event_buffer_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 16,
            frame_buffer_size: 1024,
            event_buffer_size: 64,
        }
    }
}

/// Input sent from the render thread to the service.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    /// A frame was presented at this timestamp (milliseconds, any monotonic epoch).
    Frame { timestamp_ms: f64 },
    /// Renderer counters for the last frame.
    RenderStats { draw_calls: u32, triangle_count: u64 },
    /// Current texture memory footprint in megabytes.
    TextureMemory(f32),
    /// Reset to the recommended settings for this device.
    ForceOptimization,
    /// Pause or resume periodic adjustment.
    SetAdaptive(bool),
}

/// Notifications emitted by the service.
#[derive(Debug, Clone, PartialEq)]
pub enum QualityEvent {
    /// A tick changed the active settings.
    Changed {
        decision: Decision,
        previous: QualitySettings,
        current: QualitySettings,
    },
    /// The settings were reset to the policy tier.
    Reset(QualitySettings),
}

/// Cheap, cloneable sender used on the render path.
///
/// Every method is a non-blocking `try_send`; when the buffer is full the
/// event is dropped and counted.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    tx: Sender<FrameEvent>,
    dropped: Arc<AtomicU64>,
}

impl FrameRecorder {
    /// Records a presented frame.
    pub fn record_frame(&self, timestamp_ms: f64) {
        self.send(FrameEvent::Frame { timestamp_ms });
    }

    /// Records renderer counters for the last frame.
    pub fn record_render_stats(&self, draw_calls: u32, triangle_count: u64) {
        self.send(FrameEvent::RenderStats {
            draw_calls,
            triangle_count,
        });
    }

    /// Records the current texture memory footprint.
    pub fn record_texture_memory(&self, texture_memory_mb: f32) {
        self.send(FrameEvent::TextureMemory(texture_memory_mb));
    }

    /// Requests a reset to the recommended settings.
    pub fn force_optimization(&self) {
        self.send(FrameEvent::ForceOptimization);
    }

    /// Pauses or resumes adaptation.
    pub fn set_adaptive(&self, adaptive: bool) {
        self.send(FrameEvent::SetAdaptive(adaptive));
    }

    /// Number of events dropped because the buffer was full.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn send(&self, event: FrameEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err(TrySendError::Disconnected(_)) => {
                log::trace!("FrameRecorder: service gone, event discarded.");
            }
        }
    }
}

/// Runs a [`PerformanceOptimizer`] on a background thread.
///
/// The service owns the session lifecycle: [`start`](Self::start) spawns the
/// thread, [`stop`](Self::stop) (or dropping the service) joins it and takes
/// the optimizer back, so no timer outlives the rendering session.
pub struct OptimizerService {
    config: ServiceConfig,
    optimizer: Option<PerformanceOptimizer>,
    monitor: Option<Arc<dyn ResourceMonitor>>,
    handle: QualityHandle,
    metrics: Arc<RwLock<PerformanceMetrics>>,
    running: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<PerformanceOptimizer>>,
    frame_tx: Sender<FrameEvent>,
    frame_rx: Receiver<FrameEvent>,
    event_tx: Sender<QualityEvent>,
    dropped: Arc<AtomicU64>,
}

impl OptimizerService {
    /// Wraps an optimizer. Returns the service and the receiver of quality events.
    pub fn new(
        config: ServiceConfig,
        optimizer: PerformanceOptimizer,
        monitor: Option<Arc<dyn ResourceMonitor>>,
    ) -> (Self, Receiver<QualityEvent>) {
        let (frame_tx, frame_rx) = crossbeam_channel::bounded(config.frame_buffer_size);
        let (event_tx, event_rx) = crossbeam_channel::bounded(config.event_buffer_size);
        let service = Self {
            handle: optimizer.handle(),
            metrics: Arc::new(RwLock::new(optimizer.metrics())),
            optimizer: Some(optimizer),
            monitor,
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
            frame_tx,
            frame_rx,
            event_tx,
            dropped: Arc::new(AtomicU64::new(0)),
            config,
        };
        (service, event_rx)
    }

    /// Starts the background thread. Does nothing if already running.
    pub fn start(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            return;
        }
        let Some(mut optimizer) = self.optimizer.take() else {
            log::warn!("OptimizerService: no optimizer to run.");
            return;
        };

        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let metrics = Arc::clone(&self.metrics);
        let monitor = self.monitor.clone();
        let frame_rx = self.frame_rx.clone();
        let event_tx = self.event_tx.clone();
        let poll_interval = Duration::from_millis(self.config.poll_interval_ms.max(1));

        let handle = thread::spawn(move || {
            let epoch = Instant::now();
            log::info!("Quality service thread started.");

            while running.load(Ordering::Relaxed) {
                let start_time = Instant::now();

                // 1. Ingest all pending frame events
                while let Ok(event) = frame_rx.try_recv() {
                    match event {
                        FrameEvent::Frame { timestamp_ms } => optimizer.record_frame(timestamp_ms),
                        FrameEvent::RenderStats {
                            draw_calls,
                            triangle_count,
                        } => optimizer.record_render_stats(draw_calls, triangle_count),
                        FrameEvent::TextureMemory(mb) => optimizer.record_texture_memory(mb),
                        FrameEvent::ForceOptimization => {
                            let settings = optimizer.force_optimization();
                            notify(&event_tx, QualityEvent::Reset(settings));
                        }
                        FrameEvent::SetAdaptive(adaptive) => optimizer.set_adaptive(adaptive),
                    }
                }

                // 2. Run due schedules
                let now_ms = epoch.elapsed().as_secs_f64() * 1000.0;
                if let Some(outcome) = optimizer.poll(now_ms, monitor.as_deref()) {
                    if outcome.changed() {
                        notify(
                            &event_tx,
                            QualityEvent::Changed {
                                decision: outcome.decision,
                                previous: outcome.previous,
                                current: outcome.settings,
                            },
                        );
                    }
                }

                // 3. Publish metrics for readers
                *metrics.write().unwrap_or_else(PoisonError::into_inner) = optimizer.metrics();

                // 4. Sleep until next poll
                let elapsed = start_time.elapsed();
                if elapsed < poll_interval {
                    thread::sleep(poll_interval - elapsed);
                }
            }
            log::info!("Quality service thread stopped.");
            optimizer
        });

        self.thread = Some(handle);
    }

    /// Stops the background thread and takes the optimizer back.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread.take() {
            match handle.join() {
                Ok(optimizer) => self.optimizer = Some(optimizer),
                Err(_) => log::error!("Quality service thread panicked; session state lost."),
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Returns a recorder for the render thread.
    pub fn frame_recorder(&self) -> FrameRecorder {
        FrameRecorder {
            tx: self.frame_tx.clone(),
            dropped: Arc::clone(&self.dropped),
        }
    }

    /// A read-only handle on the shared settings.
    pub fn handle(&self) -> QualityHandle {
        self.handle.clone()
    }

    /// The metrics as of the last poll.
    pub fn metrics(&self) -> PerformanceMetrics {
        *self.metrics.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// The optimizer, when the service is stopped.
    pub fn optimizer(&self) -> Option<&PerformanceOptimizer> {
        self.optimizer.as_ref()
    }
}

impl Drop for OptimizerService {
    fn drop(&mut self) {
        self.stop();
    }
}

fn notify(tx: &Sender<QualityEvent>, event: QualityEvent) {
    if let Err(TrySendError::Full(_)) = tx.try_send(event) {
        log::debug!("Quality event buffer full; event dropped.");
    }
}
