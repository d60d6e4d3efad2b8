// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Songs as a directed graph of loopable sections.
//!
//! A song owns an unordered set of music nodes and one `SectionInfo` per
//! section. Construction sorts the nodes into a dense instrument × section
//! table and caches the lowest and highest energy sections.

use tracing::warn;

use super::instrument::Instrument;
use super::node::MusicNode;
use crate::error::SongError;

/// Highest number of sections a song may span
pub const MAX_SECTIONS: usize = 1024;

/// Energy rating and outgoing edges of one section
#[derive(Debug, Clone, PartialEq)]
pub struct SectionInfo {
    /// Display name
    name: String,
    /// Overall energy of the section (speed, volume, complexity), usually 0-5
    energy: f32,
    /// Sections this one can flow into. Self-loops are allowed.
    forward_links: Vec<usize>,
}

impl SectionInfo {
    /// Create a section with an energy rating and no links
    pub fn new(energy: f32) -> Self {
        Self {
            name: String::new(),
            energy,
            forward_links: Vec::new(),
        }
    }

    /// Get section name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get energy rating
    pub fn energy(&self) -> f32 {
        self.energy
    }

    /// Get forward links
    pub fn forward_links(&self) -> &[usize] {
        &self.forward_links
    }

    /// Builder: set name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set forward links
    pub fn with_links(mut self, links: impl Into<Vec<usize>>) -> Self {
        self.forward_links = links.into();
        self
    }
}

/// A complete song with its sorted node table
#[derive(Debug, Clone)]
pub struct Song {
    /// Song name, also the key abilities use to find their instrument
    name: String,
    /// Nodes in authored order
    nodes: Vec<MusicNode>,
    /// Section details, indexed by section
    sections: Vec<SectionInfo>,
    /// Distinct instruments in first-seen order; row order of `sorted`
    instruments: Vec<Instrument>,
    /// `sorted[instrument][section]` -> index into `nodes`
    sorted: Vec<Vec<Option<usize>>>,
    /// Highest section index referenced by any node
    final_section: usize,
    /// Canonical length per section (0 when the section has no nodes)
    section_lengths: Vec<f32>,
    lowest_section: usize,
    highest_section: usize,
}

impl Song {
    /// Build and initialise a song.
    ///
    /// Integrity problems (section count mismatch, dangling links, uneven clip
    /// lengths, duplicate nodes) are logged and tolerated. A song without
    /// nodes, or with a node past `MAX_SECTIONS`, is rejected.
    pub fn new(
        name: impl Into<String>,
        nodes: Vec<MusicNode>,
        mut sections: Vec<SectionInfo>,
    ) -> Result<Self, SongError> {
        let name = name.into();
        if nodes.is_empty() {
            return Err(SongError::EmptySong(name));
        }
        if let Some(node) = nodes.iter().find(|n| n.instrument().name().is_empty()) {
            return Err(SongError::UnnamedInstrument {
                song: name,
                section: node.section(),
            });
        }

        if let Some(node) = nodes.iter().find(|n| n.section() >= MAX_SECTIONS) {
            return Err(SongError::SectionOutOfRange {
                song: name,
                section: node.section(),
                limit: MAX_SECTIONS,
            });
        }

        // Distinct instruments, first-seen order
        let mut instruments: Vec<Instrument> = Vec::new();
        for node in &nodes {
            if !instruments.contains(node.instrument()) {
                instruments.push(node.instrument().clone());
            }
        }

        let final_section = nodes.iter().map(|n| n.section()).max().unwrap_or(0);
        let section_count = final_section + 1;

        let mut sorted = vec![vec![None; section_count]; instruments.len()];
        for (index, node) in nodes.iter().enumerate() {
            let row = instruments
                .iter()
                .position(|i| i == node.instrument())
                .unwrap_or_default();
            let cell = &mut sorted[row][node.section()];
            if cell.is_some() {
                warn!(
                    song = %name,
                    instrument = %node.instrument(),
                    section = node.section(),
                    "duplicate music node, keeping the later one"
                );
            }
            *cell = Some(index);
        }

        if sections.len() != section_count {
            warn!(
                song = %name,
                details = sections.len(),
                expected = section_count,
                "section detail count does not match the sections referenced by nodes"
            );
        }

        for (index, section) in sections.iter_mut().enumerate() {
            let before = section.forward_links.len();
            section.forward_links.retain(|&link| link < section_count);
            if section.forward_links.len() != before {
                warn!(
                    song = %name,
                    section = index,
                    "dropped forward links pointing outside 0..={}",
                    final_section
                );
            }
        }

        let mut section_lengths = vec![0.0; section_count];
        for (section, length) in section_lengths.iter_mut().enumerate() {
            let column: Vec<&MusicNode> = sorted
                .iter()
                .filter_map(|row| row[section].map(|i| &nodes[i]))
                .collect();
            match column.first() {
                Some(first) => {
                    *length = first.length();
                    let uneven = column
                        .iter()
                        .any(|n| !n.has_uniform_length() || (n.length() - *length).abs() > 1e-3);
                    if uneven {
                        warn!(song = %name, section, "clips within section differ in length");
                    }
                }
                None => warn!(song = %name, section, "section has no music nodes"),
            }
        }

        let (lowest_section, highest_section) = energy_extremes(&sections);

        Ok(Self {
            name,
            nodes,
            sections,
            instruments,
            sorted,
            final_section,
            section_lengths,
            lowest_section,
            highest_section,
        })
    }

    /// Get song name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all nodes in authored order
    pub fn nodes(&self) -> &[MusicNode] {
        &self.nodes
    }

    /// Get all section details
    pub fn sections(&self) -> &[SectionInfo] {
        &self.sections
    }

    /// Get section details
    pub fn section(&self, index: usize) -> Option<&SectionInfo> {
        self.sections.get(index)
    }

    /// Get energy rating of a section
    pub fn section_energy(&self, index: usize) -> Option<f32> {
        self.sections.get(index).map(|s| s.energy())
    }

    /// Get instruments in row order
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Row index of an instrument in the sorted table
    pub fn instrument_index(&self, instrument: &Instrument) -> Option<usize> {
        self.instruments.iter().position(|i| i == instrument)
    }

    /// Node for an instrument row and section. `None` is a hole: the
    /// instrument is silent in that section.
    pub fn node(&self, instrument: usize, section: usize) -> Option<&MusicNode> {
        self.sorted
            .get(instrument)
            .and_then(|row| row.get(section).copied().flatten())
            .map(|index| &self.nodes[index])
    }

    /// Highest section index
    pub fn final_section(&self) -> usize {
        self.final_section
    }

    /// Number of sections (`final_section + 1`)
    pub fn section_count(&self) -> usize {
        self.final_section + 1
    }

    /// Length of a section in seconds
    pub fn section_length(&self, section: usize) -> f32 {
        self.section_lengths.get(section).copied().unwrap_or(0.0)
    }

    /// Index of the lowest energy section
    pub fn lowest_section(&self) -> usize {
        self.lowest_section
    }

    /// Index of the highest energy section
    pub fn highest_section(&self) -> usize {
        self.highest_section
    }
}

/// Lowest and highest energy sections; the first found wins ties
fn energy_extremes(sections: &[SectionInfo]) -> (usize, usize) {
    let mut lowest = 0;
    let mut highest = 0;
    for (index, section) in sections.iter().enumerate() {
        if section.energy() < sections[lowest].energy() {
            lowest = index;
        }
        if section.energy() > sections[highest].energy() {
            highest = index;
        }
    }
    (lowest, highest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::AudioClip;

    fn node(section: usize, instrument: &str) -> MusicNode {
        let clip = |tier: &str| AudioClip::new(format!("{instrument}_{section}_{tier}"), 4.0);
        MusicNode::new(
            section,
            Instrument::new(instrument),
            clip("low"),
            clip("med"),
            clip("high"),
        )
    }

    #[test]
    fn test_instruments_first_seen_order() {
        let song = Song::new(
            "Test",
            vec![node(0, "lead"), node(0, "drums"), node(1, "lead"), node(1, "bass")],
            vec![SectionInfo::new(1.0), SectionInfo::new(2.0)],
        )
        .unwrap();

        let names: Vec<&str> = song.instruments().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["lead", "drums", "bass"]);
        assert_eq!(song.instrument_index(&Instrument::new("bass")), Some(2));
        assert_eq!(song.instrument_index(&Instrument::new("flute")), None);
    }

    #[test]
    fn test_gap_leaves_hole() {
        let song = Song::new(
            "Gappy",
            vec![node(0, "lead"), node(1, "lead"), node(3, "lead")],
            vec![
                SectionInfo::new(1.0),
                SectionInfo::new(2.0),
                SectionInfo::new(3.0),
                SectionInfo::new(4.0),
            ],
        )
        .unwrap();

        assert_eq!(song.final_section(), 3);
        assert_eq!(song.section_count(), 4);
        assert!(song.node(0, 2).is_none());
        assert_eq!(song.node(0, 3).unwrap().section(), 3);
        assert_eq!(song.section_length(2), 0.0);
        assert_eq!(song.section_length(3), 4.0);
    }

    #[test]
    fn test_section_count_mismatch_is_tolerated() {
        let song = Song::new(
            "Short",
            vec![node(0, "lead"), node(1, "lead"), node(2, "lead")],
            vec![SectionInfo::new(1.0)],
        )
        .unwrap();

        assert_eq!(song.section_count(), 3);
        assert_eq!(song.sections().len(), 1);
        assert!(song.section(2).is_none());
    }

    #[test]
    fn test_energy_extremes_first_found_wins() {
        let song = Song::new(
            "Ties",
            vec![node(0, "lead"), node(1, "lead"), node(2, "lead"), node(3, "lead")],
            vec![
                SectionInfo::new(2.0),
                SectionInfo::new(1.0),
                SectionInfo::new(4.0),
                SectionInfo::new(1.0),
            ],
        )
        .unwrap();

        assert_eq!(song.lowest_section(), 1);
        assert_eq!(song.highest_section(), 2);
    }

    #[test]
    fn test_dangling_links_dropped() {
        let song = Song::new(
            "Links",
            vec![node(0, "lead"), node(1, "lead")],
            vec![
                SectionInfo::new(1.0).with_links(vec![1, 7, 0]),
                SectionInfo::new(2.0).with_links(vec![0]),
            ],
        )
        .unwrap();

        assert_eq!(song.section(0).unwrap().forward_links(), &[1, 0]);
    }

    #[test]
    fn test_empty_song_rejected() {
        let result = Song::new("Nothing", Vec::new(), vec![SectionInfo::new(1.0)]);
        assert_eq!(result.unwrap_err(), SongError::EmptySong("Nothing".to_string()));
    }

    #[test]
    fn test_huge_section_index_rejected() {
        for section in [MAX_SECTIONS, 1_000_000_000, usize::MAX] {
            let result = Song::new("Huge", vec![node(0, "lead"), node(section, "lead")], Vec::new());
            assert_eq!(
                result.unwrap_err(),
                SongError::SectionOutOfRange {
                    song: "Huge".to_string(),
                    section,
                    limit: MAX_SECTIONS,
                }
            );
        }

        let song = Song::new("Edge", vec![node(MAX_SECTIONS - 1, "lead")], Vec::new()).unwrap();
        assert_eq!(song.section_count(), MAX_SECTIONS);
    }

    #[test]
    fn test_duplicate_node_later_wins() {
        let base = node(0, "lead");
        let later = MusicNode::new(
            0,
            base.instrument().clone(),
            AudioClip::new("replacement", 4.0),
            base.med().clone(),
            base.high().clone(),
        );
        let song = Song::new("Dup", vec![node(0, "lead"), later], vec![SectionInfo::new(1.0)])
            .unwrap();

        assert_eq!(song.node(0, 0).unwrap().low().name(), "replacement");
    }

    #[test]
    fn test_section_builder() {
        let section = SectionInfo::new(2.5).with_name("Chorus").with_links(vec![0, 2]);
        assert_eq!(section.name(), "Chorus");
        assert_eq!(section.energy(), 2.5);
        assert_eq!(section.forward_links(), &[0, 2]);
    }
}
