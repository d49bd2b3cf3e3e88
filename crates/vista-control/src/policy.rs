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

//! The quality policy table: capabilities in, initial tier out.

use vista_core::{DeviceCapabilities, QualitySettings, QualityTier};

/// Memory a desktop needs for the High tier.
const DESKTOP_HIGH_MEMORY_GB: f32 = 6.0;
/// Memory a mobile device needs for the Medium tier.
const MOBILE_MEDIUM_MEMORY_GB: f32 = 4.0;

/// Picks the initial tier for a device. First matching rule wins.
pub fn initial_tier(capabilities: &DeviceCapabilities) -> QualityTier {
    if capabilities.is_high_end {
        QualityTier::Ultra
    } else if !capabilities.is_mobile && capabilities.memory_gb >= DESKTOP_HIGH_MEMORY_GB {
        QualityTier::High
    } else if capabilities.is_mobile && capabilities.memory_gb >= MOBILE_MEDIUM_MEMORY_GB {
        QualityTier::Medium
    } else {
        QualityTier::Low
    }
}

/// Returns the settings bundle of [`initial_tier`].
pub fn initial_settings(capabilities: &DeviceCapabilities) -> QualitySettings {
    initial_tier(capabilities).settings()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(is_high_end: bool, is_mobile: bool, memory_gb: f32) -> DeviceCapabilities {
        DeviceCapabilities {
            is_high_end,
            is_mobile,
            memory_gb,
            ..DeviceCapabilities::lowest()
        }
    }

    #[test]
    fn test_high_end_gets_ultra() {
        assert_eq!(initial_tier(&device(true, false, 32.0)), QualityTier::Ultra);
        // High-end wins even when the other rules would match.
        assert_eq!(initial_tier(&device(true, true, 2.0)), QualityTier::Ultra);
    }

    #[test]
    fn test_desktop_with_eight_gigabytes_gets_high() {
        let settings = initial_settings(&device(false, false, 8.0));
        assert_eq!(settings, QualityTier::High.settings());
        assert_eq!(settings.particle_count, 100);
        assert!(settings.anti_aliasing);
        assert_eq!(settings.anisotropic_filtering, 8);
        assert_eq!(settings.geometry_lod, 0.8);
    }

    #[test]
    fn test_rule_boundaries() {
        assert_eq!(initial_tier(&device(false, false, 6.0)), QualityTier::High);
        assert_eq!(initial_tier(&device(false, false, 5.9)), QualityTier::Low);
        assert_eq!(initial_tier(&device(false, true, 4.0)), QualityTier::Medium);
        assert_eq!(initial_tier(&device(false, true, 3.9)), QualityTier::Low);
        // A desktop never lands on the mobile Medium rule.
        assert_eq!(initial_tier(&device(false, false, 4.0)), QualityTier::Low);
    }

    #[test]
    fn test_lowest_device_gets_low() {
        assert_eq!(
            initial_settings(&DeviceCapabilities::lowest()),
            QualityTier::Low.settings()
        );
    }

    #[test]
    fn test_policy_is_total_and_deterministic() {
        let memories = [0.0, 1.0, 3.99, 4.0, 5.99, 6.0, 8.0, 64.0, f32::NAN];
        for is_high_end in [false, true] {
            for is_mobile in [false, true] {
                for memory_gb in memories {
                    let caps = device(is_high_end, is_mobile, memory_gb);
                    let first = initial_settings(&caps);
                    assert_eq!(first, initial_settings(&caps));
                    assert!(QualityTier::matching(&first).is_some());
                }
            }
        }
    }
}
