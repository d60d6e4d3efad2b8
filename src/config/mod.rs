// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for the music engine.
//!
//! Engine tuning lives in a TOML file; authored content (songs and
//! abilities) lives in YAML files that can be hot-reloaded.

pub mod song_file;
pub mod watcher;

pub use song_file::{AbilitiesFile, AbilityConfig, ClipConfig, NodeConfig, SectionConfig, SongFile, SongMeta};
pub use watcher::{validate_song_file, ConfigEvent, ConfigWatcher};

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::VolumeCurve;
use crate::control::{ActionTable, PhaseLevels};
use crate::energy::EnergyConfig;
use crate::sequencer::{ClipThresholds, RoutingMode};

/// Root engine configuration. Every field has a default, so an empty file is
/// a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Level range and decay
    #[serde(default)]
    pub energy: EnergyConfig,
    /// Clip tier thresholds
    #[serde(default)]
    pub thresholds: ClipThresholds,
    /// Per-tier volume ranges
    #[serde(default)]
    pub volume: VolumeCurve,
    #[serde(default)]
    pub fade: FadeConfig,
    #[serde(default)]
    pub master: MasterConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Energy awarded per scored action
    #[serde(default)]
    pub actions: ActionTable,
    /// Levels used while cooldowns drive the categories
    #[serde(default)]
    pub phases: PhaseLevels,
}

impl EngineConfig {
    /// Load engine configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read engine config: {:?}", path.as_ref()))?;
        Self::from_toml(&contents)
    }

    /// Parse engine configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).context("Failed to parse engine configuration")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize engine configuration")
    }
}

/// Fade and volume morph speeds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FadeConfig {
    /// Volume lost per second by fade-out emitters. Also scales the master
    /// fade-in (x100 dB per second).
    #[serde(default = "default_music_fade_speed")]
    pub music_fade_speed: f32,
    /// Lerp factor per second for slot volumes
    #[serde(default = "default_volume_morph_speed")]
    pub volume_morph_speed: f32,
}

fn default_music_fade_speed() -> f32 {
    0.2
}
fn default_volume_morph_speed() -> f32 {
    0.2
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            music_fade_speed: default_music_fade_speed(),
            volume_morph_speed: default_volume_morph_speed(),
        }
    }
}

/// Master music volume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MasterConfig {
    /// Configured listening level in dB
    #[serde(default)]
    pub volume_db: f32,
    /// Level a new song starts from before fading in
    #[serde(default = "default_floor_db")]
    pub floor_db: f32,
}

fn default_floor_db() -> f32 {
    -60.0
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            volume_db: 0.0,
            floor_db: default_floor_db(),
        }
    }
}

/// Playback behaviour switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaybackConfig {
    #[serde(default)]
    pub routing: RoutingMode,
    /// Swap clip tiers mid-section as levels change
    #[serde(default = "default_true")]
    pub node_levels: bool,
    /// Levels are set by ability cooldowns instead of decaying
    #[serde(default)]
    pub external_cooldown: bool,
    /// Instrument played on the background slot, if any
    #[serde(default)]
    pub background_instrument: Option<String>,
    /// Volume of the background slot
    #[serde(default = "default_background_volume")]
    pub background_volume: f32,
}

fn default_true() -> bool {
    true
}
fn default_background_volume() -> f32 {
    1.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            routing: RoutingMode::default(),
            node_levels: true,
            external_cooldown: false,
            background_instrument: None,
            background_volume: default_background_volume(),
        }
    }
}
