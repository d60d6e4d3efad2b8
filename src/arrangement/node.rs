// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music nodes: one instrument's clips within one song section.

use super::instrument::{AudioClip, Instrument};

/// Energy tier of a node clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipTier {
    /// Played at low energy
    Low,
    /// Played at average energy
    Med,
    /// Played at high energy
    High,
}

impl Default for ClipTier {
    fn default() -> Self {
        ClipTier::Low
    }
}

impl ClipTier {
    /// Short label for logs and status output
    pub fn label(&self) -> &'static str {
        match self {
            ClipTier::Low => "low",
            ClipTier::Med => "med",
            ClipTier::High => "high",
        }
    }
}

/// A single instrument's audio within a single section of a song.
///
/// The three clips must share the section's length so that switching tiers
/// mid-section keeps the music aligned.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicNode {
    /// Section index within the owning song
    section: usize,
    /// Instrument this node plays
    instrument: Instrument,
    low: AudioClip,
    med: AudioClip,
    high: AudioClip,
}

impl MusicNode {
    /// Create a new node
    pub fn new(
        section: usize,
        instrument: Instrument,
        low: AudioClip,
        med: AudioClip,
        high: AudioClip,
    ) -> Self {
        Self {
            section,
            instrument,
            low,
            med,
            high,
        }
    }

    /// Create a node that plays the same clip at every tier (background beds)
    pub fn single(section: usize, instrument: Instrument, clip: AudioClip) -> Self {
        Self::new(section, instrument, clip.clone(), clip.clone(), clip)
    }

    /// Get section index
    pub fn section(&self) -> usize {
        self.section
    }

    /// Get instrument
    pub fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    /// Get low energy clip
    pub fn low(&self) -> &AudioClip {
        &self.low
    }

    /// Get medium energy clip
    pub fn med(&self) -> &AudioClip {
        &self.med
    }

    /// Get high energy clip
    pub fn high(&self) -> &AudioClip {
        &self.high
    }

    /// Get the clip for a tier
    pub fn clip(&self, tier: ClipTier) -> &AudioClip {
        match tier {
            ClipTier::Low => &self.low,
            ClipTier::Med => &self.med,
            ClipTier::High => &self.high,
        }
    }

    /// Tier of a clip if it belongs to this node.
    ///
    /// When tiers share a clip the lowest matching tier is reported.
    pub fn tier_of(&self, clip: &AudioClip) -> Option<ClipTier> {
        [ClipTier::Low, ClipTier::Med, ClipTier::High]
            .into_iter()
            .find(|tier| self.clip(*tier) == clip)
    }

    /// Canonical length of this node (the low clip's length)
    pub fn length(&self) -> f32 {
        self.low.length()
    }

    /// Check that all three clips share the low clip's length
    pub fn has_uniform_length(&self) -> bool {
        let len = self.low.length();
        (self.med.length() - len).abs() < 1e-3 && (self.high.length() - len).abs() < 1e-3
    }
}
