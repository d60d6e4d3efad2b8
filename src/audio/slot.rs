// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback slots: the logical audio channels the engine drives.

use std::fmt;

use serde::Serialize;

use crate::arrangement::AudioClip;
use crate::energy::Category;

/// Identifies a playback slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotId {
    Mobility,
    Offense,
    Defense,
    /// Plays regardless of equipped abilities
    Background,
    /// Cutscenes, boss intros, transitions
    SetPiece,
}

impl SlotId {
    /// All slots in mixer order
    pub const ALL: [SlotId; 5] = [
        SlotId::Mobility,
        SlotId::Offense,
        SlotId::Defense,
        SlotId::Background,
        SlotId::SetPiece,
    ];

    /// Slot driven by a category
    pub fn for_category(category: Category) -> Self {
        match category {
            Category::Mobility => SlotId::Mobility,
            Category::Offense => SlotId::Offense,
            Category::Defense => SlotId::Defense,
        }
    }

    /// Index into the mixer's slot array
    pub fn index(&self) -> usize {
        match self {
            SlotId::Mobility => 0,
            SlotId::Offense => 1,
            SlotId::Defense => 2,
            SlotId::Background => 3,
            SlotId::SetPiece => 4,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            SlotId::Mobility => "mobility",
            SlotId::Offense => "offense",
            SlotId::Defense => "defense",
            SlotId::Background => "background",
            SlotId::SetPiece => "set_piece",
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State of one audio channel
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSlot {
    clip: Option<AudioClip>,
    /// Playback position in seconds
    time: f32,
    playing: bool,
    pitch: f32,
    /// Live volume
    volume: f32,
    /// Volume the live value is lerped toward
    target_volume: f32,
}

impl Default for PlaybackSlot {
    fn default() -> Self {
        Self {
            clip: None,
            time: 0.0,
            playing: false,
            pitch: 1.0,
            volume: 0.0,
            target_volume: 0.0,
        }
    }
}

impl PlaybackSlot {
    /// Create an empty, silent slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Get loaded clip
    pub fn clip(&self) -> Option<&AudioClip> {
        self.clip.as_ref()
    }

    /// Get playback position
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Get pitch
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get live volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Get target volume
    pub fn target_volume(&self) -> f32 {
        self.target_volume
    }

    /// Load a clip. Loading interrupts playback and rewinds.
    pub(crate) fn assign(&mut self, clip: Option<AudioClip>) {
        self.clip = clip;
        self.playing = false;
        self.time = 0.0;
    }

    /// Start playing at `offset`. Offsets past the clip's end start from the
    /// beginning. Returns the position actually used, or `None` without a clip.
    pub(crate) fn play_from(&mut self, offset: f32) -> Option<f32> {
        let length = self.clip.as_ref()?.length();
        self.time = if (0.0..=length).contains(&offset) { offset } else { 0.0 };
        self.playing = true;
        Some(self.time)
    }

    pub(crate) fn stop(&mut self) {
        self.playing = false;
    }

    pub(crate) fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub(crate) fn set_target_volume(&mut self, volume: f32) {
        self.target_volume = volume.clamp(0.0, 1.0);
    }

    /// Advance playback by one frame; a clip that reaches its end stops
    pub(crate) fn advance(&mut self, dt: f32) {
        if !self.playing {
            return;
        }
        let Some(clip) = &self.clip else {
            self.playing = false;
            return;
        };
        self.time += dt * self.pitch;
        if self.time >= clip.length() {
            self.time = clip.length();
            self.playing = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_ids() {
        for (i, slot) in SlotId::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
        assert_eq!(SlotId::for_category(Category::Defense), SlotId::Defense);
        assert_eq!(SlotId::SetPiece.to_string(), "set_piece");
    }

    #[test]
    fn test_assign_interrupts_playback() {
        let mut slot = PlaybackSlot::new();
        slot.assign(Some(AudioClip::new("a", 4.0)));
        slot.play_from(1.0);
        slot.advance(0.5);
        assert_eq!(slot.time(), 1.5);

        slot.assign(Some(AudioClip::new("b", 4.0)));
        assert!(!slot.is_playing());
        assert_eq!(slot.time(), 0.0);
    }

    #[test]
    fn test_play_past_end_restarts() {
        let mut slot = PlaybackSlot::new();
        assert_eq!(slot.play_from(1.0), None);

        slot.assign(Some(AudioClip::new("a", 4.0)));
        assert_eq!(slot.play_from(9.0), Some(0.0));
        assert!(slot.is_playing());
    }

    #[test]
    fn test_clip_end_stops() {
        let mut slot = PlaybackSlot::new();
        slot.assign(Some(AudioClip::new("a", 1.0)));
        slot.play_from(0.9);
        slot.advance(0.2);
        assert!(!slot.is_playing());
        assert_eq!(slot.time(), 1.0);
    }

    #[test]
    fn test_volume_clamped() {
        let mut slot = PlaybackSlot::new();
        slot.set_volume(1.5);
        slot.set_target_volume(-0.3);
        assert_eq!(slot.volume(), 1.0);
        assert_eq!(slot.target_volume(), 0.0);
    }
}
