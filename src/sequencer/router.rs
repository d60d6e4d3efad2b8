// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Section routing through a song's forward-link graph.
//!
//! The router never halts: every decision names a section to load next, even
//! if that is the section that just finished.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::arrangement::Song;

/// How the next section is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Walk sections in index order, wrapping at the end
    Sequential,
    /// Follow forward links toward the playstyle energy
    EnergyMatched,
}

impl Default for RoutingMode {
    fn default() -> Self {
        RoutingMode::EnergyMatched
    }
}

/// Why a section was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Sequential mode advance
    Sequential,
    /// Already at the lowest section and the player is calmer still
    HoldLowest,
    /// Already at the highest section and the player is hotter still
    HoldHighest,
    /// Link with the highest energy below the playstyle energy
    ClosestBelow,
    /// Every link was too energetic; took the calmest one
    CalmestLink,
    /// Nowhere to go (no links or no section details); reload
    Stuck,
}

/// Outcome of a routing decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    /// Section to load
    pub section: usize,
    /// Rule that produced it
    pub kind: RouteKind,
}

impl Route {
    pub(crate) fn new(section: usize, kind: RouteKind) -> Self {
        Self { section, kind }
    }

    /// Check if the route reloads the current section
    pub fn is_reload(&self, current: usize) -> bool {
        self.section == current
    }
}

/// Chooses the section that follows the current one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionRouter {
    mode: RoutingMode,
}

impl SectionRouter {
    /// Create a router
    pub fn new(mode: RoutingMode) -> Self {
        Self { mode }
    }

    /// Get routing mode
    pub fn mode(&self) -> RoutingMode {
        self.mode
    }

    /// Set routing mode
    pub fn set_mode(&mut self, mode: RoutingMode) {
        self.mode = mode;
    }

    /// Decide the next section. A pure function of its inputs.
    pub fn next(&self, song: &Song, current: usize, energy: f32) -> Route {
        match self.mode {
            RoutingMode::Sequential => {
                Route::new((current + 1) % song.section_count(), RouteKind::Sequential)
            }
            RoutingMode::EnergyMatched => energy_matched(song, current, energy),
        }
    }
}

fn energy_matched(song: &Song, current: usize, energy: f32) -> Route {
    let Some(info) = song.section(current) else {
        warn!(song = song.name(), section = current, "no section details, reloading section");
        return Route::new(current, RouteKind::Stuck);
    };

    if current == song.lowest_section() && info.energy() > energy {
        return Route::new(current, RouteKind::HoldLowest);
    }
    if current == song.highest_section() && info.energy() < energy {
        return Route::new(current, RouteKind::HoldHighest);
    }

    // Links whose details are missing cannot be rated and are skipped
    let rated: Vec<(usize, f32)> = info
        .forward_links()
        .iter()
        .filter_map(|&link| song.section_energy(link).map(|e| (link, e)))
        .collect();

    if rated.is_empty() {
        warn!(song = song.name(), section = current, "section has no usable forward links, reloading");
        return Route::new(current, RouteKind::Stuck);
    }

    let mut closest_below: Option<(usize, f32)> = None;
    for &(link, link_energy) in &rated {
        if link_energy < energy {
            match closest_below {
                Some((_, best)) if !(best < link_energy) => {}
                _ => closest_below = Some((link, link_energy)),
            }
        }
    }
    if let Some((link, _)) = closest_below {
        return Route::new(link, RouteKind::ClosestBelow);
    }

    let mut calmest = rated[0];
    for &(link, link_energy) in &rated[1..] {
        if link_energy < calmest.1 {
            calmest = (link, link_energy);
        }
    }
    Route::new(calmest.0, RouteKind::CalmestLink)
}
