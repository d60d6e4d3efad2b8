// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Audio layer of the music engine.
//!
//! This module provides:
//! - Playback slots for the categories, background and set pieces
//! - Self-disposing fade-out emitters
//! - The energy to volume curve
//! - The sink boundary to a real audio device

pub mod fade;
pub mod sink;
pub mod slot;
pub mod volume;

pub use fade::{FadeId, FadeOut, FadeOutPool};
pub use sink::{AudioSink, NullSink, RecordingSink, SlotCommand};
pub use slot::{PlaybackSlot, SlotId};
pub use volume::{lerp, rescale, VolumeCurve, VolumeRange};

use crate::arrangement::AudioClip;

/// Volume changes smaller than this are not reported to the sink
const VOLUME_EPSILON: f32 = 1e-4;

/// Slot model plus the detached fades, mirrored onto an `AudioSink`
pub struct Mixer<S: AudioSink = NullSink> {
    slots: [PlaybackSlot; 5],
    fades: FadeOutPool,
    /// Master music volume in decibels
    master_db: f32,
    sink: S,
}

impl Mixer<NullSink> {
    /// Create a mixer that drives no device
    pub fn new() -> Self {
        Self::with_sink(NullSink)
    }
}

impl Default for Mixer<NullSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AudioSink> Mixer<S> {
    /// Create a mixer driving `sink`
    pub fn with_sink(sink: S) -> Self {
        Self {
            slots: Default::default(),
            fades: FadeOutPool::new(),
            master_db: 0.0,
            sink,
        }
    }

    /// Get sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Get mutable sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Get a slot
    pub fn slot(&self, id: SlotId) -> &PlaybackSlot {
        &self.slots[id.index()]
    }

    fn slot_mut(&mut self, id: SlotId) -> &mut PlaybackSlot {
        &mut self.slots[id.index()]
    }

    /// Get live fades
    pub fn fades(&self) -> &FadeOutPool {
        &self.fades
    }

    /// Get master volume in dB
    pub fn master_db(&self) -> f32 {
        self.master_db
    }

    /// Set master volume in dB
    pub fn set_master_db(&mut self, db: f32) {
        self.master_db = db;
        self.sink.apply(SlotCommand::MasterVolume { db });
    }

    /// Move master volume toward `target_db` by at most `step` dB
    pub fn ease_master(&mut self, target_db: f32, step: f32) {
        let diff = target_db - self.master_db;
        if diff.abs() <= f32::EPSILON {
            return;
        }
        let db = if diff.abs() <= step {
            target_db
        } else {
            self.master_db + step.copysign(diff)
        };
        self.set_master_db(db);
    }

    /// Hand the slot's current audio to a fade emitter.
    ///
    /// The slot itself is untouched.
    pub fn fade_out(&mut self, id: SlotId, speed: f32) -> Option<FadeId> {
        let fade = self.fades.spawn(id, &self.slots[id.index()], speed)?;
        let fade_id = fade.id();
        let command = SlotCommand::FadeStarted {
            id: fade_id,
            slot: fade.source(),
            clip: fade.clip().clone(),
            offset: fade.time(),
            pitch: fade.pitch(),
            volume: fade.volume(),
        };
        self.sink.apply(command);
        Some(fade_id)
    }

    /// Load a clip into a slot, interrupting playback
    pub fn assign(&mut self, id: SlotId, clip: Option<AudioClip>) {
        self.slot_mut(id).assign(clip.clone());
        self.sink.apply(SlotCommand::Assign { slot: id, clip });
    }

    /// Start the slot's clip at `offset` seconds
    pub fn play(&mut self, id: SlotId, offset: f32) {
        if let Some(offset) = self.slot_mut(id).play_from(offset) {
            self.sink.apply(SlotCommand::Play { slot: id, offset });
        }
    }

    /// Load and start a clip in one step
    pub fn assign_and_play(&mut self, id: SlotId, clip: AudioClip, offset: f32) {
        self.assign(id, Some(clip));
        self.play(id, offset);
    }

    /// Stop playback, keeping the clip loaded
    pub fn stop(&mut self, id: SlotId) {
        let slot = self.slot_mut(id);
        if slot.is_playing() {
            slot.stop();
            self.sink.apply(SlotCommand::Stop { slot: id });
        }
    }

    /// Stop playback and unload the clip
    pub fn clear(&mut self, id: SlotId) {
        self.stop(id);
        if self.slot(id).clip().is_some() {
            self.assign(id, None);
        }
    }

    /// Set live volume immediately
    pub fn set_volume(&mut self, id: SlotId, volume: f32) {
        let slot = self.slot_mut(id);
        let before = slot.volume();
        slot.set_volume(volume);
        let after = slot.volume();
        if (after - before).abs() > VOLUME_EPSILON || (after <= 0.0 && before > 0.0) {
            self.sink.apply(SlotCommand::Volume { slot: id, volume: after });
        }
    }

    /// Set the volume the live value is morphed toward
    pub fn set_target_volume(&mut self, id: SlotId, volume: f32) {
        self.slot_mut(id).set_target_volume(volume);
    }

    /// Lerp every slot's live volume toward its target by `t`
    pub fn morph_volumes(&mut self, t: f32) {
        for id in SlotId::ALL {
            let slot = self.slot(id);
            let next = lerp(slot.volume(), slot.target_volume(), t);
            self.set_volume(id, next);
        }
    }

    /// Advance every playing slot and fade emitter by one frame
    pub fn advance(&mut self, dt: f32) {
        for slot in &mut self.slots {
            slot.advance(dt);
        }
        let finished = self.fades.advance(dt);
        for fade in self.fades.iter() {
            self.sink.apply(SlotCommand::FadeVolume {
                id: fade.id(),
                volume: fade.volume(),
            });
        }
        for id in finished {
            self.sink.apply(SlotCommand::FadeFinished { id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip() -> AudioClip {
        AudioClip::new("pad", 8.0)
    }

    #[test]
    fn test_assign_and_play() {
        let mut mixer = Mixer::with_sink(RecordingSink::new());
        mixer.assign_and_play(SlotId::Offense, clip(), 2.5);

        let slot = mixer.slot(SlotId::Offense);
        assert!(slot.is_playing());
        assert_eq!(slot.time(), 2.5);
        assert_eq!(
            mixer.sink().commands(),
            &[
                SlotCommand::Assign { slot: SlotId::Offense, clip: Some(clip()) },
                SlotCommand::Play { slot: SlotId::Offense, offset: 2.5 },
            ]
        );
    }

    #[test]
    fn test_clear_reports_once() {
        let mut mixer = Mixer::with_sink(RecordingSink::new());
        mixer.assign_and_play(SlotId::Mobility, clip(), 0.0);
        mixer.sink_mut().take();

        mixer.clear(SlotId::Mobility);
        mixer.clear(SlotId::Mobility);
        assert_eq!(
            mixer.sink().commands(),
            &[
                SlotCommand::Stop { slot: SlotId::Mobility },
                SlotCommand::Assign { slot: SlotId::Mobility, clip: None },
            ]
        );
    }

    #[test]
    fn test_fade_out_leaves_slot() {
        let mut mixer = Mixer::new();
        mixer.assign_and_play(SlotId::Defense, clip(), 1.0);
        mixer.set_volume(SlotId::Defense, 0.7);

        assert!(mixer.fade_out(SlotId::Defense, 0.2).is_some());
        assert_eq!(mixer.fades().len(), 1);
        assert!(mixer.slot(SlotId::Defense).is_playing());

        // Silent slot: no emitter
        assert!(mixer.fade_out(SlotId::Background, 0.2).is_none());
    }

    #[test]
    fn test_fade_reports_finish() {
        let mut mixer = Mixer::with_sink(RecordingSink::new());
        mixer.assign_and_play(SlotId::Defense, clip(), 0.0);
        mixer.set_volume(SlotId::Defense, 0.1);
        let id = mixer.fade_out(SlotId::Defense, 1.0).unwrap();

        mixer.advance(0.2);
        assert!(mixer.fades().is_empty());
        assert_eq!(
            mixer.sink().commands().last(),
            Some(&SlotCommand::FadeFinished { id })
        );
    }

    #[test]
    fn test_morph_volumes() {
        let mut mixer = Mixer::new();
        mixer.set_target_volume(SlotId::Offense, 1.0);
        mixer.morph_volumes(0.5);
        assert!((mixer.slot(SlotId::Offense).volume() - 0.5).abs() < 1e-6);
        mixer.morph_volumes(0.5);
        assert!((mixer.slot(SlotId::Offense).volume() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_ease_master_never_overshoots() {
        let mut mixer = Mixer::new();
        mixer.set_master_db(-60.0);

        mixer.ease_master(0.0, 25.0);
        assert_eq!(mixer.master_db(), -35.0);
        mixer.ease_master(0.0, 25.0);
        assert_eq!(mixer.master_db(), -10.0);
        mixer.ease_master(0.0, 25.0);
        assert_eq!(mixer.master_db(), 0.0);

        mixer.ease_master(-6.0, 2.0);
        assert_eq!(mixer.master_db(), -2.0);
    }
}
