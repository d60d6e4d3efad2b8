// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Musical decision making.
//!
//! This module provides:
//! - Clip tier selection with hysteresis bands
//! - Section routing through the forward-link graph

pub mod router;
pub mod selector;

pub use router::{Route, RouteKind, RoutingMode, SectionRouter};
pub use selector::ClipThresholds;

/// Section timing for the engine's frame loop
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SectionClock {
    /// Length of the current section in seconds
    length: f32,
    /// Time spent in the current section
    elapsed: f32,
}

impl SectionClock {
    /// Restart the clock for a section of `length` seconds
    pub fn restart(&mut self, length: f32) {
        self.length = length.max(0.0);
        self.elapsed = 0.0;
    }

    /// Get section length
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Get elapsed time in the section
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Check whether the section has played completely.
    ///
    /// While it has not, the clock advances by `dt` and this returns false.
    pub fn done_playing(&mut self, dt: f32) -> bool {
        if self.length > self.elapsed {
            self.elapsed += dt.max(0.0);
            false
        } else {
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_clock() {
        let mut clock = SectionClock::default();
        clock.restart(0.5);

        let mut frames = 0;
        while !clock.done_playing(0.1) {
            frames += 1;
            assert!(frames < 100);
        }
        // 0.1 f32 steps reach 0.5 after five or six frames
        assert!((5..=6).contains(&frames));
        assert!(clock.elapsed() >= 0.5);

        // Stays done until restarted
        assert!(clock.done_playing(0.1));
        clock.restart(1.0);
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.done_playing(0.1));
    }

    #[test]
    fn test_empty_section_is_done_immediately() {
        let mut clock = SectionClock::default();
        clock.restart(0.0);
        assert!(clock.done_playing(0.016));
    }
}
