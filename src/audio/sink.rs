// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Output side of the mixer.
//!
//! The engine keeps the authoritative slot model and describes every change
//! to an `AudioSink`, which forwards it to whatever plays the audio.

use super::fade::FadeId;
use super::slot::SlotId;
use crate::arrangement::AudioClip;

/// A change to apply on the audio device
#[derive(Debug, Clone, PartialEq)]
pub enum SlotCommand {
    /// Load a clip into a slot (or unload with `None`); stops playback
    Assign { slot: SlotId, clip: Option<AudioClip> },
    /// Start playback at `offset` seconds
    Play { slot: SlotId, offset: f32 },
    /// Stop playback
    Stop { slot: SlotId },
    /// Set slot volume (0.0 - 1.0)
    Volume { slot: SlotId, volume: f32 },
    /// A detached emitter started playing a copy of a slot's audio
    FadeStarted {
        id: FadeId,
        slot: SlotId,
        clip: AudioClip,
        offset: f32,
        pitch: f32,
        volume: f32,
    },
    /// Emitter volume changed
    FadeVolume { id: FadeId, volume: f32 },
    /// Emitter fell silent and should be disposed of
    FadeFinished { id: FadeId },
    /// Master dynamic-music volume in decibels
    MasterVolume { db: f32 },
}

/// Receives mixer commands
pub trait AudioSink {
    /// Apply one command
    fn apply(&mut self, command: SlotCommand);
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn apply(&mut self, command: SlotCommand) {
        (**self).apply(command);
    }
}

/// Discards every command
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn apply(&mut self, _command: SlotCommand) {}
}

/// Keeps every command for inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    commands: Vec<SlotCommand>,
}

impl RecordingSink {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Get recorded commands
    pub fn commands(&self) -> &[SlotCommand] {
        &self.commands
    }

    /// Take recorded commands, leaving the recorder empty
    pub fn take(&mut self) -> Vec<SlotCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl AudioSink for RecordingSink {
    fn apply(&mut self, command: SlotCommand) {
        self.commands.push(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.apply(SlotCommand::Stop { slot: SlotId::Background });
        sink.apply(SlotCommand::MasterVolume { db: -60.0 });
        assert_eq!(sink.commands().len(), 2);

        let taken = sink.take();
        assert_eq!(taken[0], SlotCommand::Stop { slot: SlotId::Background });
        assert!(sink.commands().is_empty());
    }

    #[test]
    fn test_boxed_sink() {
        let mut sink: Box<dyn AudioSink> = Box::new(NullSink);
        sink.apply(SlotCommand::Stop { slot: SlotId::Mobility });
    }
}
