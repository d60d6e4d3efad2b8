// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Detached fade-out emitters.
//!
//! Replacing or removing a clip hands the old audio to an emitter that keeps
//! playing a private copy while its volume falls linearly, then disposes of
//! itself. Emitters share nothing, so overlapping fades never interfere, and
//! there is no way to cut one short.

use serde::Serialize;

use super::slot::{PlaybackSlot, SlotId};
use crate::arrangement::AudioClip;

/// Identifies a fade-out emitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FadeId(pub u64);

/// A self-disposing copy of a slot's audio
#[derive(Debug, Clone, PartialEq)]
pub struct FadeOut {
    id: FadeId,
    /// Slot the audio was taken from
    source: SlotId,
    clip: AudioClip,
    time: f32,
    pitch: f32,
    volume: f32,
    /// Volume lost per second
    speed: f32,
}

impl FadeOut {
    /// Get id
    pub fn id(&self) -> FadeId {
        self.id
    }

    /// Get originating slot
    pub fn source(&self) -> SlotId {
        self.source
    }

    /// Get the fading clip
    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    /// Get playback position
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Get pitch
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get current volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Advance one frame. Returns false once the emitter has fallen silent.
    fn advance(&mut self, dt: f32) -> bool {
        self.time = (self.time + dt * self.pitch).min(self.clip.length());
        self.volume -= self.speed * dt;
        self.volume > 0.0
    }
}

/// Pool of live fade-out emitters
#[derive(Debug, Default)]
pub struct FadeOutPool {
    fades: Vec<FadeOut>,
    next_id: u64,
}

impl FadeOutPool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Start fading a copy of `slot`'s audio.
    ///
    /// Nothing is spawned for a slot that is silent, stopped or empty.
    pub fn spawn(&mut self, source: SlotId, slot: &PlaybackSlot, speed: f32) -> Option<&FadeOut> {
        let clip = slot.clip()?;
        if !slot.is_playing() || slot.volume() <= 0.0 {
            return None;
        }
        let id = FadeId(self.next_id);
        self.next_id += 1;
        self.fades.push(FadeOut {
            id,
            source,
            clip: clip.clone(),
            time: slot.time(),
            pitch: slot.pitch(),
            volume: slot.volume(),
            speed: speed.max(f32::EPSILON),
        });
        self.fades.last()
    }

    /// Advance every emitter and remove the silent ones, returning their ids
    pub fn advance(&mut self, dt: f32) -> Vec<FadeId> {
        let mut finished = Vec::new();
        self.fades.retain_mut(|fade| {
            let alive = fade.advance(dt);
            if !alive {
                finished.push(fade.id);
            }
            alive
        });
        finished
    }

    /// Iterate live emitters
    pub fn iter(&self) -> impl Iterator<Item = &FadeOut> {
        self.fades.iter()
    }

    /// Number of live emitters
    pub fn len(&self) -> usize {
        self.fades.len()
    }

    /// Check if no emitter is live
    pub fn is_empty(&self) -> bool {
        self.fades.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_slot(volume: f32) -> PlaybackSlot {
        let mut slot = PlaybackSlot::new();
        slot.assign(Some(AudioClip::new("lead", 8.0)));
        slot.play_from(2.0);
        slot.set_volume(volume);
        slot
    }

    #[test]
    fn test_spawn_copies_slot() {
        let mut pool = FadeOutPool::new();
        let fade = pool.spawn(SlotId::Offense, &playing_slot(0.8), 0.5).unwrap();

        assert_eq!(fade.source(), SlotId::Offense);
        assert_eq!(fade.clip().name(), "lead");
        assert_eq!(fade.time(), 2.0);
        assert_eq!(fade.volume(), 0.8);
        assert_eq!(fade.pitch(), 1.0);
    }

    #[test]
    fn test_silent_slots_not_faded() {
        let mut pool = FadeOutPool::new();
        assert!(pool.spawn(SlotId::Mobility, &PlaybackSlot::new(), 0.5).is_none());
        assert!(pool.spawn(SlotId::Mobility, &playing_slot(0.0), 0.5).is_none());

        let mut stopped = playing_slot(0.5);
        stopped.stop();
        assert!(pool.spawn(SlotId::Mobility, &stopped, 0.5).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_fade_runs_to_completion() {
        let mut pool = FadeOutPool::new();
        pool.spawn(SlotId::Defense, &playing_slot(1.0), 0.5);

        let mut frames = 0;
        let mut finished = Vec::new();
        while finished.is_empty() {
            finished = pool.advance(0.1);
            frames += 1;
            assert!(frames < 100);
        }
        // 1.0 volume at 0.5 per second
        assert!((19..=21).contains(&frames));
        assert_eq!(finished, vec![FadeId(0)]);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_overlapping_fades_independent() {
        let mut pool = FadeOutPool::new();
        pool.spawn(SlotId::Offense, &playing_slot(0.2), 1.0);
        pool.spawn(SlotId::Offense, &playing_slot(0.9), 1.0);
        assert_eq!(pool.len(), 2);

        let finished = pool.advance(0.3);
        assert_eq!(finished, vec![FadeId(0)]);
        assert_eq!(pool.len(), 1);

        let remaining = pool.iter().next().unwrap();
        assert_eq!(remaining.id(), FadeId(1));
        assert!((remaining.volume() - 0.6).abs() < 1e-5);
    }
}
