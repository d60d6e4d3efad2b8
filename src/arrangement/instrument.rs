// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instruments and audio clip handles.

use std::fmt;
use std::sync::Arc;

/// A musical role within a song ("drums", "lead", "background").
///
/// Instruments carry no behaviour. Two instruments are the same role when
/// their names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instrument {
    name: Arc<str>,
}

impl Instrument {
    /// Create a new instrument
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self { name: name.into() }
    }

    /// Get instrument name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Handle to a piece of authored audio.
///
/// Only the name and the length matter to the engine; decoding and output
/// belong to the audio backend.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    name: Arc<str>,
    length: f32,
}

impl AudioClip {
    /// Create a clip handle with a length in seconds
    pub fn new(name: impl Into<Arc<str>>, length: f32) -> Self {
        Self {
            name: name.into(),
            length: length.max(0.0),
        }
    }

    /// Get clip name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get clip length in seconds
    pub fn length(&self) -> f32 {
        self.length
    }
}

impl fmt::Display for AudioClip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.name, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_identity() {
        let a = Instrument::new("drums");
        let b = Instrument::new(String::from("drums"));
        assert_eq!(a, b);
        assert_ne!(a, Instrument::new("bass"));
        assert_eq!(a.to_string(), "drums");
    }

    #[test]
    fn test_clip_length_never_negative() {
        let clip = AudioClip::new("broken", -3.0);
        assert_eq!(clip.length(), 0.0);
    }

    #[test]
    fn test_clip_equality() {
        assert_eq!(AudioClip::new("a_low", 8.0), AudioClip::new("a_low", 8.0));
        assert_ne!(AudioClip::new("a_low", 8.0), AudioClip::new("a_med", 8.0));
    }
}
