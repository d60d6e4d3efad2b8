// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Clip tier selection with hysteresis.
//!
//! Modelled on a Schmitt trigger: rising through `med` or `high` switches
//! tier at once, while falling back only switches once energy drops below the
//! matching lower threshold. Inside a band the currently playing clip decides
//! which side of the band we are on.

use serde::{Deserialize, Serialize};

use crate::arrangement::{AudioClip, ClipTier, MusicNode};

/// Tier thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipThresholds {
    /// Energy at which the medium clip takes over from the low clip
    #[serde(default = "default_med")]
    pub med: f32,
    /// Energy below which a playing medium clip falls back to low
    #[serde(default = "default_med_lower")]
    pub med_lower: f32,
    /// Energy at which the high clip takes over from the medium clip
    #[serde(default = "default_high")]
    pub high: f32,
    /// Energy below which a playing high clip falls back to medium
    #[serde(default = "default_high_lower")]
    pub high_lower: f32,
}

fn default_med() -> f32 {
    1.3
}
fn default_med_lower() -> f32 {
    0.95
}
fn default_high() -> f32 {
    3.0
}
fn default_high_lower() -> f32 {
    2.7
}

impl Default for ClipThresholds {
    fn default() -> Self {
        Self {
            med: default_med(),
            med_lower: default_med_lower(),
            high: default_high(),
            high_lower: default_high_lower(),
        }
    }
}

impl ClipThresholds {
    /// Pick the tier for `node` at `energy`.
    ///
    /// `previous` is the node that supplied `current` (the previous section's
    /// node for the same instrument at a section boundary); when `None` the
    /// node itself is used.
    pub fn select_tier(
        &self,
        node: &MusicNode,
        previous: Option<&MusicNode>,
        energy: f32,
        current: Option<&AudioClip>,
    ) -> ClipTier {
        let previous = previous.unwrap_or(node);
        let playing = |clip: &AudioClip| current == Some(clip);

        if energy >= self.high {
            ClipTier::High
        } else if energy >= self.high_lower {
            if playing(previous.high()) {
                ClipTier::High
            } else {
                ClipTier::Med
            }
        } else if energy >= self.med {
            ClipTier::Med
        } else if energy >= self.med_lower {
            if playing(previous.med()) {
                ClipTier::Med
            } else {
                ClipTier::Low
            }
        } else {
            ClipTier::Low
        }
    }

    /// Pick the clip for `node` at `energy`
    pub fn select<'a>(
        &self,
        node: &'a MusicNode,
        previous: Option<&MusicNode>,
        energy: f32,
        current: Option<&AudioClip>,
    ) -> &'a AudioClip {
        node.clip(self.select_tier(node, previous, energy, current))
    }
}
