// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Gameplay events that feed the energy tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::energy::Category;

/// A scored gameplay event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoredAction {
    DashPlain,
    DashPastEnemy,
    DashThroughEnemy,
    ShotBullet,
    ShotEnemy,
    TripleKill,
    /// Scored per second while the shield is up
    ShieldPresent,
    ShieldBlockedEnemy,
    ShieldSavedPlayer,
}

impl ScoredAction {
    /// Every action
    pub const ALL: [ScoredAction; 9] = [
        ScoredAction::DashPlain,
        ScoredAction::DashPastEnemy,
        ScoredAction::DashThroughEnemy,
        ScoredAction::ShotBullet,
        ScoredAction::ShotEnemy,
        ScoredAction::TripleKill,
        ScoredAction::ShieldPresent,
        ScoredAction::ShieldBlockedEnemy,
        ScoredAction::ShieldSavedPlayer,
    ];

    /// Category the action scores for
    pub fn category(&self) -> Category {
        match self {
            ScoredAction::DashPlain | ScoredAction::DashPastEnemy | ScoredAction::DashThroughEnemy => {
                Category::Mobility
            }
            ScoredAction::ShotBullet | ScoredAction::ShotEnemy | ScoredAction::TripleKill => {
                Category::Offense
            }
            ScoredAction::ShieldPresent
            | ScoredAction::ShieldBlockedEnemy
            | ScoredAction::ShieldSavedPlayer => Category::Defense,
        }
    }

    /// Skilful plays that also reset the decay rate
    pub fn is_special(&self) -> bool {
        !matches!(
            self,
            ScoredAction::DashPlain | ScoredAction::ShotBullet | ScoredAction::ShieldPresent
        )
    }

    /// Continuous actions are scaled by frame time
    pub fn is_continuous(&self) -> bool {
        matches!(self, ScoredAction::ShieldPresent)
    }

    /// Get display name
    pub fn name(&self) -> &'static str {
        match self {
            ScoredAction::DashPlain => "dash",
            ScoredAction::DashPastEnemy => "dash past enemy",
            ScoredAction::DashThroughEnemy => "dash through enemy",
            ScoredAction::ShotBullet => "shot",
            ScoredAction::ShotEnemy => "shot enemy",
            ScoredAction::TripleKill => "triple kill",
            ScoredAction::ShieldPresent => "shield up",
            ScoredAction::ShieldBlockedEnemy => "shield blocked enemy",
            ScoredAction::ShieldSavedPlayer => "shield saved player",
        }
    }
}

impl fmt::Display for ScoredAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Energy awarded per action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTable {
    #[serde(default = "default_dash_plain")]
    pub dash_plain: f32,
    #[serde(default = "default_dash_past_enemy")]
    pub dash_past_enemy: f32,
    #[serde(default = "default_dash_through_enemy")]
    pub dash_through_enemy: f32,
    #[serde(default = "default_shot_bullet")]
    pub shot_bullet: f32,
    #[serde(default = "default_shot_enemy")]
    pub shot_enemy: f32,
    #[serde(default = "default_triple_kill")]
    pub triple_kill: f32,
    /// Per second
    #[serde(default = "default_shield_present")]
    pub shield_present: f32,
    #[serde(default = "default_shield_blocked_enemy")]
    pub shield_blocked_enemy: f32,
    #[serde(default = "default_shield_saved_player")]
    pub shield_saved_player: f32,
}

fn default_dash_plain() -> f32 {
    0.1
}
fn default_dash_past_enemy() -> f32 {
    0.3
}
fn default_dash_through_enemy() -> f32 {
    0.45
}
fn default_shot_bullet() -> f32 {
    0.1
}
fn default_shot_enemy() -> f32 {
    0.3
}
fn default_triple_kill() -> f32 {
    0.6
}
fn default_shield_present() -> f32 {
    0.1
}
fn default_shield_blocked_enemy() -> f32 {
    0.3
}
fn default_shield_saved_player() -> f32 {
    0.55
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            dash_plain: default_dash_plain(),
            dash_past_enemy: default_dash_past_enemy(),
            dash_through_enemy: default_dash_through_enemy(),
            shot_bullet: default_shot_bullet(),
            shot_enemy: default_shot_enemy(),
            triple_kill: default_triple_kill(),
            shield_present: default_shield_present(),
            shield_blocked_enemy: default_shield_blocked_enemy(),
            shield_saved_player: default_shield_saved_player(),
        }
    }
}

impl ActionTable {
    /// Energy delta for an action over a frame of `dt` seconds
    pub fn delta(&self, action: ScoredAction, dt: f32) -> f32 {
        let base = match action {
            ScoredAction::DashPlain => self.dash_plain,
            ScoredAction::DashPastEnemy => self.dash_past_enemy,
            ScoredAction::DashThroughEnemy => self.dash_through_enemy,
            ScoredAction::ShotBullet => self.shot_bullet,
            ScoredAction::ShotEnemy => self.shot_enemy,
            ScoredAction::TripleKill => self.triple_kill,
            ScoredAction::ShieldPresent => self.shield_present,
            ScoredAction::ShieldBlockedEnemy => self.shield_blocked_enemy,
            ScoredAction::ShieldSavedPlayer => self.shield_saved_player,
        };
        if action.is_continuous() {
            base * dt.max(0.0)
        } else {
            base
        }
    }
}

/// Cooldown phase of a category's ability
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilityPhase {
    Recharging,
    #[default]
    Ready,
    InUse,
}

/// Level a category is pinned to in each cooldown phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseLevels {
    #[serde(default = "default_recharging")]
    pub recharging: f32,
    #[serde(default = "default_ready")]
    pub ready: f32,
    #[serde(default = "default_in_use")]
    pub in_use: f32,
}

fn default_recharging() -> f32 {
    0.76
}
fn default_ready() -> f32 {
    1.5
}
fn default_in_use() -> f32 {
    2.99
}

impl Default for PhaseLevels {
    fn default() -> Self {
        Self {
            recharging: default_recharging(),
            ready: default_ready(),
            in_use: default_in_use(),
        }
    }
}

impl PhaseLevels {
    /// Get level for a phase
    pub fn level(&self, phase: AbilityPhase) -> f32 {
        match phase {
            AbilityPhase::Recharging => self.recharging,
            AbilityPhase::Ready => self.ready,
            AbilityPhase::InUse => self.in_use,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let mobility = ScoredAction::ALL
            .iter()
            .filter(|a| a.category() == Category::Mobility)
            .count();
        assert_eq!(mobility, 3);
        assert_eq!(ScoredAction::TripleKill.category(), Category::Offense);
        assert_eq!(ScoredAction::ShieldPresent.category(), Category::Defense);
    }

    #[test]
    fn test_special_actions() {
        assert!(!ScoredAction::DashPlain.is_special());
        assert!(ScoredAction::DashThroughEnemy.is_special());
        assert!(ScoredAction::ShieldSavedPlayer.is_special());
        assert!(!ScoredAction::ShieldPresent.is_special());
    }

    #[test]
    fn test_deltas() {
        let table = ActionTable::default();
        assert_eq!(table.delta(ScoredAction::TripleKill, 0.016), 0.6);
        assert!((table.delta(ScoredAction::ShieldPresent, 0.5) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_partial_table_yaml() {
        let table: ActionTable = serde_yaml::from_str("triple_kill: 1.0\n").unwrap();
        assert_eq!(table.triple_kill, 1.0);
        assert_eq!(table.shot_enemy, 0.3);
    }

    #[test]
    fn test_phase_levels() {
        let levels = PhaseLevels::default();
        assert_eq!(levels.level(AbilityPhase::Recharging), 0.76);
        assert_eq!(levels.level(AbilityPhase::Ready), 1.5);
        assert_eq!(levels.level(AbilityPhase::InUse), 2.99);
        assert_eq!(AbilityPhase::default(), AbilityPhase::Ready);
    }
}
