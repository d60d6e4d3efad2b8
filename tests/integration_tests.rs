// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Integration tests for Alchemy
//!
//! These tests drive the engine through the public API the way a game would.

use std::fs;
use std::sync::Arc;

use alchemy::config::validate_song_file;
use alchemy::energy::EnergyConfig;
use alchemy::{
    AbilitiesFile, Ability, AbilityPhase, AudioClip, Category, ClipThresholds, EngineConfig,
    EnergyTracker, Instrument, MusicEngine, MusicNode, RecordingSink, RouteKind, RoutingMode,
    ScoredAction, SectionInfo, SectionRouter, SlotCommand, SlotId, Song, SongFile,
};
use tempfile::tempdir;

const SONG: &str = r#"
song:
  name: Ruins
sections:
  - { energy: 1.0, links: [1, 2] }
  - { energy: 2.0, links: [0, 2] }
  - { energy: 3.0, links: [0, 1] }
nodes:
  - instrument: Drums
    section: 0
    low: { name: drums_0_low, length: 1.0 }
    med: { name: drums_0_med, length: 1.0 }
    high: { name: drums_0_high, length: 1.0 }
  - instrument: Drums
    section: 1
    low: { name: drums_1_low, length: 1.0 }
    med: { name: drums_1_med, length: 1.0 }
    high: { name: drums_1_high, length: 1.0 }
  - instrument: Drums
    section: 2
    low: { name: drums_2_low, length: 1.0 }
    med: { name: drums_2_med, length: 1.0 }
    high: { name: drums_2_high, length: 1.0 }
"#;

const ABILITIES: &str = r#"
abilities:
  - name: Blaster
    category: offense
    songs:
      Ruins: Drums
  - name: Grapple
    category: mobility
    songs:
      Caves: Harp
"#;

fn ruins() -> Arc<Song> {
    Arc::new(SongFile::from_yaml(SONG).unwrap().into_song().unwrap())
}

fn abilities() -> Vec<Ability> {
    AbilitiesFile::from_yaml(ABILITIES).unwrap().into_abilities()
}

/// Levels never leave the configured range whatever the input
#[test]
fn test_levels_stay_in_range() {
    let mut tracker = EnergyTracker::new(EnergyConfig::default());
    let deltas = [5.0, -12.0, 0.3, 100.0, -0.01, f32::MAX, -f32::MAX];

    for category in Category::ALL {
        for delta in deltas {
            tracker.adjust(category, delta);
            let level = tracker.level(category);
            assert!((0.25..=2.99).contains(&level), "{} out of range", level);

            tracker.set(category, delta);
            let level = tracker.level(category);
            assert!((0.25..=2.99).contains(&level), "{} out of range", level);

            let energy = tracker.playstyle_energy();
            assert!((0.0..=6.0).contains(&energy));
        }
    }
}

/// Playing high, 2.8 and 2.75 hold high; 2.6 drops to medium
#[test]
fn test_clip_hysteresis() {
    let node = MusicNode::new(
        0,
        Instrument::new("Lead"),
        AudioClip::new("low", 4.0),
        AudioClip::new("med", 4.0),
        AudioClip::new("high", 4.0),
    );
    let thresholds = ClipThresholds::default();

    let mut playing = thresholds.select(&node, None, 3.2, None).clone();
    assert_eq!(playing.name(), "high");
    for (energy, expected) in [(2.8, "high"), (2.75, "high"), (2.6, "med"), (2.75, "med")] {
        playing = thresholds.select(&node, None, energy, Some(&playing)).clone();
        assert_eq!(playing.name(), expected, "at energy {}", energy);
    }
}

/// Nodes in sections {0, 1, 3} leave a hole at 2
#[test]
fn test_song_with_gap() {
    let clip = AudioClip::new("pad", 2.0);
    let nodes = [0, 1, 3]
        .into_iter()
        .map(|s| MusicNode::single(s, Instrument::new("Pad"), clip.clone()))
        .collect();
    let sections = (0..4).map(|e| SectionInfo::new(e as f32)).collect();
    let song = Song::new("Gap", nodes, sections).unwrap();

    assert_eq!(song.final_section(), 3);
    assert!(song.node(0, 2).is_none());
    assert!(song.node(0, 3).is_some());
}

/// Links rated {0.5, 1.5} at energy 1.8 lead to the 1.5 section, every time
#[test]
fn test_routing_closest_below() {
    let nodes = (0..3)
        .map(|s| MusicNode::single(s, Instrument::new("Pad"), AudioClip::new("pad", 2.0)))
        .collect();
    let sections = vec![
        SectionInfo::new(1.0).with_links(vec![1, 2]),
        SectionInfo::new(0.5).with_links(vec![0]),
        SectionInfo::new(1.5).with_links(vec![0]),
    ];
    let song = Song::new("Links", nodes, sections).unwrap();
    let router = SectionRouter::new(RoutingMode::EnergyMatched);

    for _ in 0..10 {
        let route = router.next(&song, 0, 1.8);
        assert_eq!(route.section, 2);
        assert_eq!(route.kind, RouteKind::ClosestBelow);
    }
}

/// A full session: content from files, abilities equipped, sections routed
#[test]
fn test_session_from_files() {
    let dir = tempdir().unwrap();
    let song_path = dir.path().join("ruins.yaml");
    let abilities_path = dir.path().join("abilities.yaml");
    fs::write(&song_path, SONG).unwrap();
    fs::write(&abilities_path, ABILITIES).unwrap();

    let song = validate_song_file(&song_path).unwrap().into_song().unwrap();
    let abilities = AbilitiesFile::load(&abilities_path).unwrap().into_abilities();

    let mut config = EngineConfig::default();
    config.playback.external_cooldown = true;
    let mut engine = MusicEngine::new(config);
    engine.load_song(Arc::new(song));
    for ability in abilities {
        engine.equip(ability);
    }

    // Grapple has no instrument in this song
    assert!(engine.slot(SlotId::Mobility).clip().is_none());
    assert!(engine.slot(SlotId::Offense).is_playing());

    // E = 3 * 1.0: section 0 routes to section 1
    let mut sections = vec![engine.current_section()];
    for _ in 0..(60 * 3) {
        engine.tick(1.0 / 60.0);
        if engine.section_clock().elapsed() == 0.0 {
            sections.push(engine.current_section());
        }
    }
    assert_eq!(&sections[..2], &[0, 1]);
    // From 1 the 3.0 link is not below E, so section 0 wins
    assert_eq!(sections[2], 0);

    // Ability cooldowns drive the energy while external mode is on
    engine.set_ability_phase(Category::Offense, AbilityPhase::InUse);
    engine.set_ability_phase(Category::Mobility, AbilityPhase::InUse);
    engine.set_ability_phase(Category::Defense, AbilityPhase::InUse);
    let route = engine.next_section();
    assert_eq!(engine.routed_energy(), 6.0);
    assert_eq!(route.section, 2);
}

/// Equip then unequip leaves the slot stopped and empty
#[test]
fn test_equip_unequip_round_trip() {
    let mut engine = MusicEngine::with_sink(EngineConfig::default(), RecordingSink::new());
    engine.load_song(ruins());

    let blaster = abilities().remove(0);
    engine.equip(blaster.clone());
    for _ in 0..30 {
        engine.tick(1.0 / 60.0);
    }
    engine.unequip_ability(&blaster);

    let slot = engine.slot(SlotId::Offense);
    assert!(!slot.is_playing());
    assert!(slot.clip().is_none());

    let commands = engine.sink().commands();
    assert!(commands
        .iter()
        .any(|c| matches!(c, SlotCommand::FadeStarted { clip, .. } if clip.name() == "drums_0_low")));
    assert_eq!(
        &commands[commands.len() - 3..],
        &[
            SlotCommand::Stop { slot: SlotId::Offense },
            SlotCommand::Assign { slot: SlotId::Offense, clip: None },
            SlotCommand::Volume { slot: SlotId::Offense, volume: 0.0 },
        ]
    );
}

/// Fades started by rapid swaps run independently to completion
#[test]
fn test_overlapping_fades_complete() {
    let mut config = EngineConfig::default();
    config.playback.external_cooldown = true;
    config.fade.volume_morph_speed = 60.0;
    let mut engine = MusicEngine::with_sink(config, RecordingSink::new());
    engine.load_song(ruins());
    engine.set(Category::Offense, 2.0);

    let blaster = abilities().remove(0);
    for _ in 0..3 {
        engine.equip(blaster.clone());
        for _ in 0..60 {
            engine.tick(1.0 / 60.0);
        }
    }
    let live = engine.mixer().fades().len();
    assert_eq!(live, 2);

    // Each fade starts below 0.7 and loses 0.2 per second
    for _ in 0..(60 * 10) {
        engine.tick(1.0 / 60.0);
    }
    assert!(engine.mixer().fades().is_empty());

    let finished = engine
        .sink()
        .commands()
        .iter()
        .filter(|c| matches!(c, SlotCommand::FadeFinished { .. }))
        .count();
    assert_eq!(finished, 2);
}

/// Scored actions raise their category and reward skill with slower decay
#[test]
fn test_scored_actions_drive_music() {
    let mut engine = MusicEngine::new(EngineConfig::default());
    engine.load_song(ruins());
    engine.equip(abilities().remove(0));

    for _ in 0..3 {
        engine.record_action(ScoredAction::TripleKill, 1.0 / 60.0);
    }
    assert_eq!(engine.energy().decay_rate(), 0.2);
    engine.tick(1.0 / 60.0);

    // 1.0 + 3 * 0.6, less one frame of decay
    assert!(engine.level(Category::Offense) > 2.7);
    let clip = engine.slot(SlotId::Offense).clip().map(|c| c.name().to_string());
    assert_eq!(clip.as_deref(), Some("drums_0_med"));
}

/// Swapping songs fades the old stems out while the new song fades in
#[test]
fn test_song_swap_fades_stems() {
    let caves = SONG.replace("Ruins", "Caves").replace("Drums", "Harp").replace("drums", "harp");
    let caves = Arc::new(SongFile::from_yaml(&caves).unwrap().into_song().unwrap());

    let mut engine = MusicEngine::with_sink(EngineConfig::default(), RecordingSink::new());
    engine.load_song(ruins());
    for ability in abilities() {
        engine.equip(ability);
    }
    for _ in 0..90 {
        engine.tick(1.0 / 60.0);
    }
    let drums = engine.slot(SlotId::Offense).clip().cloned().unwrap();
    engine.sink_mut().take();

    engine.load_song(caves);
    let commands = engine.sink_mut().take();
    assert!(commands.iter().any(|c| matches!(
        c,
        SlotCommand::FadeStarted { slot: SlotId::Offense, clip, volume, .. }
            if *clip == drums && *volume > 0.0
    )));
    assert_eq!(commands.last(), Some(&SlotCommand::MasterVolume { db: -60.0 }));

    // Blaster is silent in Caves; Grapple picks up the harp from silence
    assert!(engine.slot(SlotId::Offense).clip().is_none());
    let harp = engine.slot(SlotId::Mobility);
    assert!(harp.is_playing());
    assert_eq!(harp.volume(), 0.0);

    for _ in 0..(60 * 10) {
        engine.tick(1.0 / 60.0);
    }
    assert!(engine.mixer().fades().is_empty());
    assert!(engine.slot(SlotId::Mobility).volume() > 0.0);
    assert_eq!(engine.mixer().master_db(), 0.0);
}

#[test]
fn test_song_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("copy.yaml");
    let file = SongFile::from_yaml(SONG).unwrap();
    file.save(&path).unwrap();

    let song = SongFile::load(&path).unwrap().into_song().unwrap();
    assert_eq!(song.name(), "Ruins");
    assert_eq!(song.section_count(), 3);
    assert_eq!(song.highest_section(), 2);
    assert_eq!(song.lowest_section(), 0);
}
