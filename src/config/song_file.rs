// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! YAML content files: songs and abilities.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::arrangement::{AudioClip, Instrument, MusicNode, SectionInfo, Song};
use crate::control::Ability;
use crate::energy::Category;
use crate::error::SongError;

/// Root of a song file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongFile {
    pub song: SongMeta,
    /// Section details, indexed by position
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
    /// One entry per (instrument, section)
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

impl SongFile {
    /// Load a song from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read song file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse a song from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse song YAML")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize song to YAML")
    }

    /// Save to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write song file: {:?}", path.as_ref()))
    }

    /// Build the runtime song
    pub fn into_song(self) -> Result<Song, SongError> {
        let sections = self
            .sections
            .into_iter()
            .map(|s| {
                let info = SectionInfo::new(s.energy).with_links(s.links);
                match s.name {
                    Some(name) => info.with_name(name),
                    None => info,
                }
            })
            .collect();

        let nodes = self
            .nodes
            .into_iter()
            .map(|n| {
                let low = n.low.to_clip();
                let med = n.med.as_ref().map_or_else(|| low.clone(), ClipConfig::to_clip);
                let high = n.high.as_ref().map_or_else(|| med.clone(), ClipConfig::to_clip);
                MusicNode::new(n.section, Instrument::new(n.instrument), low, med, high)
            })
            .collect();

        Song::new(self.song.name, nodes, sections)
    }
}

/// Song-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongMeta {
    /// Song name, also the key abilities map instruments by
    pub name: String,
}

/// A section's energy rating and outgoing links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub energy: f32,
    /// Indices of sections that may follow this one
    #[serde(default)]
    pub links: Vec<usize>,
}

/// One instrument's clips for one section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeConfig {
    pub instrument: String,
    pub section: usize,
    pub low: ClipConfig,
    /// Defaults to the low clip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub med: Option<ClipConfig>,
    /// Defaults to the medium clip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<ClipConfig>,
}

/// Clip reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipConfig {
    pub name: String,
    /// Duration in seconds
    pub length: f32,
}

impl ClipConfig {
    fn to_clip(&self) -> AudioClip {
        AudioClip::new(self.name.as_str(), self.length)
    }
}

/// Root of an abilities file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AbilitiesFile {
    #[serde(default)]
    pub abilities: Vec<AbilityConfig>,
}

impl AbilitiesFile {
    /// Load abilities from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read abilities file: {:?}", path.as_ref()))?;
        Self::from_yaml(&contents)
    }

    /// Parse abilities from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse abilities YAML")
    }

    /// Build runtime abilities
    pub fn into_abilities(self) -> Vec<Ability> {
        self.abilities
            .into_iter()
            .map(|config| {
                config
                    .songs
                    .into_iter()
                    .fold(Ability::new(config.name, config.category), |ability, (song, instrument)| {
                        ability.with_instrument(song, Instrument::new(instrument))
                    })
            })
            .collect()
    }
}

/// An ability and the instrument it plays per song
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AbilityConfig {
    pub name: String,
    pub category: Category,
    /// Song name to instrument name
    #[serde(default)]
    pub songs: BTreeMap<String, String>,
}
