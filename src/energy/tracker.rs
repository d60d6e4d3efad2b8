// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Category energy levels with clamping and decay.
//!
//! Levels are only ever written through clamp-on-write operations, so every
//! observable level lies in `[min_level, max_level]`. Levels may sit above
//! `category_max` (the headroom keeps a maxed-out category from dropping a
//! tier the instant decay starts) but never contribute more than
//! `category_max` to the playstyle energy.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::category::Category;

/// Level range and decay behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Lowest value any category can sink to
    #[serde(default = "default_min_level")]
    pub min_level: f32,
    /// Highest value any category can rise to
    #[serde(default = "default_max_level")]
    pub max_level: f32,
    /// Value at which a category hits full energy and volume
    #[serde(default = "default_category_max")]
    pub category_max: f32,
    /// Level each category starts a session at
    #[serde(default = "default_initial_level")]
    pub initial_level: f32,
    /// Decay rate (levels per second) right after a scored event
    #[serde(default = "default_base_decay_rate")]
    pub base_decay_rate: f32,
    /// Growth of the decay rate per second without scored events
    #[serde(default = "default_decay_acceleration")]
    pub decay_acceleration: f32,
    /// Ceiling for the decay rate
    #[serde(default = "default_max_decay_rate")]
    pub max_decay_rate: f32,
}

fn default_min_level() -> f32 {
    0.25
}
fn default_max_level() -> f32 {
    2.99
}
fn default_category_max() -> f32 {
    2.0
}
fn default_initial_level() -> f32 {
    1.0
}
fn default_base_decay_rate() -> f32 {
    0.2
}
fn default_decay_acceleration() -> f32 {
    0.1
}
fn default_max_decay_rate() -> f32 {
    0.5
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            min_level: default_min_level(),
            max_level: default_max_level(),
            category_max: default_category_max(),
            initial_level: default_initial_level(),
            base_decay_rate: default_base_decay_rate(),
            decay_acceleration: default_decay_acceleration(),
            max_decay_rate: default_max_decay_rate(),
        }
    }
}

impl EnergyConfig {
    /// Repair inverted or negative ranges so clamping can never panic
    fn sanitized(mut self) -> Self {
        if self.min_level > self.max_level {
            warn!(
                min = self.min_level,
                max = self.max_level,
                "min_level above max_level, swapping"
            );
            std::mem::swap(&mut self.min_level, &mut self.max_level);
        }
        self.category_max = self.category_max.max(0.0);
        self.base_decay_rate = self.base_decay_rate.max(0.0);
        self.decay_acceleration = self.decay_acceleration.max(0.0);
        self.max_decay_rate = self.max_decay_rate.max(self.base_decay_rate);
        self
    }
}

/// Tracks the Mobility, Offense and Defense levels
#[derive(Debug, Clone)]
pub struct EnergyTracker {
    config: EnergyConfig,
    /// Levels indexed by `Category::index`
    levels: [f32; 3],
    /// Current decay rate (levels per second)
    decay_rate: f32,
    /// Levels are driven by an external cooldown system; no natural decay
    external_cooldown: bool,
}

impl EnergyTracker {
    /// Create a tracker with every category at the initial level
    pub fn new(config: EnergyConfig) -> Self {
        let config = config.sanitized();
        let initial = config
            .initial_level
            .clamp(config.min_level, config.max_level);
        Self {
            levels: [initial; 3],
            decay_rate: config.base_decay_rate,
            external_cooldown: false,
            config,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &EnergyConfig {
        &self.config
    }

    /// Get a category level
    pub fn level(&self, category: Category) -> f32 {
        self.levels[category.index()]
    }

    /// Get all levels indexed by `Category::index`
    pub fn levels(&self) -> [f32; 3] {
        self.levels
    }

    /// Adjust a level by `delta`, clamped to the level range
    pub fn adjust(&mut self, category: Category, delta: f32) {
        if !delta.is_finite() {
            warn!(%category, delta, "ignoring non-finite level adjustment");
            return;
        }
        let level = &mut self.levels[category.index()];
        *level = (*level + delta).clamp(self.config.min_level, self.config.max_level);
    }

    /// Set a level, clamped to the level range
    pub fn set(&mut self, category: Category, value: f32) {
        if !value.is_finite() {
            warn!(%category, value, "ignoring non-finite level");
            return;
        }
        self.levels[category.index()] = value.clamp(self.config.min_level, self.config.max_level);
    }

    /// Apply one frame of natural decay to every category.
    ///
    /// Suppressed in external-cooldown mode. The decay rate itself ramps up
    /// toward `max_decay_rate` until `reset_rate_of_decay` is called.
    pub fn decay_tick(&mut self, dt: f32) {
        if self.external_cooldown || dt <= 0.0 {
            return;
        }
        let step = -self.decay_rate * dt;
        for category in Category::ALL {
            self.adjust(category, step);
        }
        self.decay_rate = (self.decay_rate + self.config.decay_acceleration * dt)
            .min(self.config.max_decay_rate);
    }

    /// Sum of the three levels, each capped to `[0, category_max]`
    pub fn playstyle_energy(&self) -> f32 {
        let cap = self.config.category_max;
        self.levels.iter().map(|level| level.clamp(0.0, cap)).sum()
    }

    /// Get the current decay rate
    pub fn decay_rate(&self) -> f32 {
        self.decay_rate
    }

    /// Return the decay rate to its baseline after a notable scored event
    pub fn reset_rate_of_decay(&mut self) {
        self.decay_rate = self.config.base_decay_rate;
    }

    /// Toggle external-cooldown mode
    pub fn set_external_cooldown(&mut self, enabled: bool) {
        self.external_cooldown = enabled;
    }

    /// Check external-cooldown mode
    pub fn is_external_cooldown(&self) -> bool {
        self.external_cooldown
    }

    /// Reset levels and decay for a new session
    pub fn reset(&mut self) {
        let initial = self
            .config
            .initial_level
            .clamp(self.config.min_level, self.config.max_level);
        self.levels = [initial; 3];
        self.decay_rate = self.config.base_decay_rate;
    }
}

impl Default for EnergyTracker {
    fn default() -> Self {
        Self::new(EnergyConfig::default())
    }
}
