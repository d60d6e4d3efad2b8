// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Serialisable snapshot of the engine for diagnostics and visualisation.

use std::fmt;

use serde::Serialize;

use crate::audio::SlotId;

/// Per-category levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryLevels {
    pub mobility: f32,
    pub offense: f32,
    pub defense: f32,
}

/// One playback slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStatus {
    pub slot: SlotId,
    pub clip: Option<String>,
    pub playing: bool,
    pub time: f32,
    pub volume: f32,
    pub target_volume: f32,
}

/// Engine state at one point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineStatus {
    pub song: Option<String>,
    pub section: usize,
    pub section_energy: Option<f32>,
    pub section_elapsed: f32,
    pub section_length: f32,
    pub levels: CategoryLevels,
    pub playstyle_energy: f32,
    /// Playstyle energy used by the most recent routing decision
    pub routed_energy: f32,
    pub decay_rate: f32,
    pub slots: Vec<SlotStatus>,
    pub active_fades: usize,
    pub master_db: f32,
}

impl EngineStatus {
    /// Get a slot's status
    pub fn slot(&self, id: SlotId) -> Option<&SlotStatus> {
        self.slots.iter().find(|s| s.slot == id)
    }
}

impl fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} s{} [{:.1}/{:.1}s] M {:.2} O {:.2} D {:.2} E {:.2} decay {:.2} fades {} master {:.1}dB",
            self.song.as_deref().unwrap_or("-"),
            self.section,
            self.section_elapsed,
            self.section_length,
            self.levels.mobility,
            self.levels.offense,
            self.levels.defense,
            self.playstyle_energy,
            self.decay_rate,
            self.active_fades,
            self.master_db,
        )
    }
}
