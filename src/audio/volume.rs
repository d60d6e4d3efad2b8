// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Energy to volume mapping.

use serde::{Deserialize, Serialize};

use crate::sequencer::ClipThresholds;

/// Volume range used by one clip tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    /// Volume at the bottom of the tier
    pub min: f32,
    /// Volume at the top of the tier
    pub max: f32,
}

impl VolumeRange {
    /// Create a range
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }
}

/// Per-tier volume ranges.
///
/// Each tier linearly rescales its slice of the energy scale onto its own
/// volume range: low covers `[0, med]`, medium `[med, high]` and high
/// `[high, category_max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeCurve {
    #[serde(default = "default_low")]
    pub low: VolumeRange,
    #[serde(default = "default_med")]
    pub med: VolumeRange,
    #[serde(default = "default_high")]
    pub high: VolumeRange,
}

fn default_low() -> VolumeRange {
    VolumeRange::new(0.0, 0.4)
}
fn default_med() -> VolumeRange {
    VolumeRange::new(0.5, 0.85)
}
fn default_high() -> VolumeRange {
    VolumeRange::new(0.97, 1.0)
}

impl Default for VolumeCurve {
    fn default() -> Self {
        Self {
            low: default_low(),
            med: default_med(),
            high: default_high(),
        }
    }
}

impl VolumeCurve {
    /// Target volume for a category level, in `[0, 1]`
    pub fn volume_for(&self, level: f32, thresholds: &ClipThresholds, category_max: f32) -> f32 {
        let volume = if level < thresholds.med {
            rescale(level, 0.0, thresholds.med, self.low.min, self.low.max)
        } else if level < thresholds.high {
            rescale(level, thresholds.med, thresholds.high, self.med.min, self.med.max)
        } else {
            rescale(level, thresholds.high, category_max, self.high.min, self.high.max)
        };
        volume.clamp(0.0, 1.0)
    }
}

/// Map `value` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// Values at or past `old_max` return `new_max`, which also covers degenerate
/// ranges.
pub fn rescale(value: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    if value >= old_max {
        return new_max;
    }
    let fraction = (value - old_min) / (old_max - old_min);
    new_min + (new_max - new_min) * fraction
}

/// Linear interpolation with `t` clamped to `[0, 1]`
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
