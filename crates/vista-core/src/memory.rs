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

//! Heap accounting shared between the tracking allocator and the monitors.
//!
//! A global allocator installed by the binary reports every allocation here,
//! and any thread can read the totals. Without such an allocator the counters
//! stay at zero and [`is_tracking`] returns `false`.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

static CURRENTLY_ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);
static PEAK_ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);
static TOTAL_ALLOCATIONS: AtomicU64 = AtomicU64::new(0);

/// Accounts for a new allocation of `size` bytes.
pub fn record_allocation(size: usize) {
    let previous = CURRENTLY_ALLOCATED_BYTES.fetch_add(size, Ordering::Relaxed);
    PEAK_ALLOCATED_BYTES.fetch_max(previous.saturating_add(size), Ordering::Relaxed);
    TOTAL_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
}

/// Accounts for a release of `size` bytes. Never underflows.
pub fn record_deallocation(size: usize) {
    let _ = CURRENTLY_ALLOCATED_BYTES.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_sub(size))
    });
}

/// Accounts for a block resized from `old_size` to `new_size` bytes.
pub fn record_reallocation(old_size: usize, new_size: usize) {
    if new_size >= old_size {
        let grown = new_size - old_size;
        let previous = CURRENTLY_ALLOCATED_BYTES.fetch_add(grown, Ordering::Relaxed);
        PEAK_ALLOCATED_BYTES.fetch_max(previous.saturating_add(grown), Ordering::Relaxed);
    } else {
        record_deallocation(old_size - new_size);
    }
}

/// Bytes currently allocated on the heap.
pub fn currently_allocated_bytes() -> usize {
    CURRENTLY_ALLOCATED_BYTES.load(Ordering::Relaxed)
}

/// The highest value [`currently_allocated_bytes`] has reached.
pub fn peak_allocated_bytes() -> usize {
    PEAK_ALLOCATED_BYTES.load(Ordering::Relaxed)
}

/// Returns `true` once a tracking allocator has reported any allocation.
pub fn is_tracking() -> bool {
    TOTAL_ALLOCATIONS.load(Ordering::Relaxed) > 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // The only test in this crate that touches the counters; no tracking
    // allocator is installed in the test binary.
    #[test]
    fn test_counters_follow_allocation_lifecycle() {
        let base = currently_allocated_bytes();

        record_allocation(4096);
        assert!(is_tracking());
        assert_eq!(currently_allocated_bytes(), base + 4096);

        record_reallocation(4096, 8192);
        assert_eq!(currently_allocated_bytes(), base + 8192);
        assert!(peak_allocated_bytes() >= base + 8192);

        record_reallocation(8192, 1024);
        assert_eq!(currently_allocated_bytes(), base + 1024);

        record_deallocation(1024);
        assert_eq!(currently_allocated_bytes(), base);
        assert!(peak_allocated_bytes() >= base + 8192);

        // Releasing more than is tracked clamps at zero.
        record_deallocation(usize::MAX);
        assert_eq!(currently_allocated_bytes(), 0);
    }
}
