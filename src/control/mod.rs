// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Gameplay side of the engine.
//!
//! This module provides:
//! - Abilities and the equipped loadout
//! - Scored actions and their energy deltas
//! - Ability cooldown phases for external level control

pub mod ability;
pub mod actions;

pub use ability::{Ability, Loadout};
pub use actions::{AbilityPhase, ActionTable, PhaseLevels, ScoredAction};
