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

//! Interval schedules driven by an external clock.

use std::time::Duration;

/// A fixed-period schedule polled with millisecond timestamps.
///
/// The schedule never bursts: if a poll arrives late, it fires once and
/// re-arms relative to that poll.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval_ms: f64,
    next_due_ms: Option<f64>,
    fire_on_first_poll: bool,
}

impl Schedule {
    /// A schedule whose first firing is one interval after the first poll.
    pub fn delayed(interval: Duration) -> Self {
        Self {
            interval_ms: interval.as_secs_f64() * 1000.0,
            next_due_ms: None,
            fire_on_first_poll: false,
        }
    }

    /// A schedule that fires on the first poll, then every interval.
    pub fn immediate(interval: Duration) -> Self {
        Self {
            fire_on_first_poll: true,
            ..Self::delayed(interval)
        }
    }

    /// Returns `true` if the schedule fires at `now_ms`.
    pub fn poll(&mut self, now_ms: f64) -> bool {
        match self.next_due_ms {
            None => {
                self.next_due_ms = Some(now_ms + self.interval_ms);
                self.fire_on_first_poll
            }
            Some(due) if now_ms >= due => {
                self.next_due_ms = Some(now_ms + self.interval_ms);
                true
            }
            Some(_) => false,
        }
    }

    /// Forgets the arming so the next poll behaves like the first one.
    pub fn reset(&mut self) {
        self.next_due_ms = None;
    }
}
