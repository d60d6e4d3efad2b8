// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! The adaptive music engine.
//!
//! `MusicEngine` owns the energy tracker, the loadout and the mixer, and is
//! driven by a single `tick` per frame. Gameplay code holds the engine (or a
//! handle to whatever owns it) and calls the adjust/equip operations, which
//! apply immediately.
//!
//! Per-frame order:
//! 1. advance playing slots and fade emitters
//! 2. apply energy decay
//! 3. route to the next section once the current one has played out
//! 4. swap clip tiers in place when node levels are enabled
//! 5. morph slot volumes toward their energy targets
//! 6. ease the master volume toward its configured level

pub mod status;

pub use status::{CategoryLevels, EngineStatus, SlotStatus};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::arrangement::{AudioClip, Instrument, Song};
use crate::audio::{AudioSink, Mixer, NullSink, PlaybackSlot, SlotId};
use crate::config::EngineConfig;
use crate::control::{Ability, AbilityPhase, Loadout, ScoredAction};
use crate::energy::{Category, EnergyTracker};
use crate::sequencer::{Route, RouteKind, RoutingMode, SectionClock, SectionRouter};

/// Gameplay-reactive music engine
pub struct MusicEngine<S: AudioSink = NullSink> {
    config: EngineConfig,
    energy: EnergyTracker,
    router: SectionRouter,
    /// Swap clip tiers mid-section
    node_levels: bool,
    song: Option<Arc<Song>>,
    section: usize,
    clock: SectionClock,
    loadout: Loadout,
    /// Song row of each category's instrument, indexed by `Category::index`
    instrument_rows: [Option<usize>; 3],
    background_row: Option<usize>,
    routed_energy: f32,
    mixer: Mixer<S>,
}

impl MusicEngine<NullSink> {
    /// Create an engine that drives no audio device
    pub fn new(config: EngineConfig) -> Self {
        Self::with_sink(config, NullSink)
    }
}

impl Default for MusicEngine<NullSink> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: AudioSink> MusicEngine<S> {
    /// Create an engine driving `sink`
    pub fn with_sink(config: EngineConfig, sink: S) -> Self {
        let mut energy = EnergyTracker::new(config.energy.clone());
        energy.set_external_cooldown(config.playback.external_cooldown);
        let mut mixer = Mixer::with_sink(sink);
        mixer.set_master_db(config.master.floor_db);

        Self {
            router: SectionRouter::new(config.playback.routing),
            node_levels: config.playback.node_levels,
            energy,
            song: None,
            section: 0,
            clock: SectionClock::default(),
            loadout: Loadout::new(),
            instrument_rows: [None; 3],
            background_row: None,
            routed_energy: 0.0,
            mixer,
            config,
        }
    }

    /// Get configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get the energy tracker
    pub fn energy(&self) -> &EnergyTracker {
        &self.energy
    }

    /// Get a category level
    pub fn level(&self, category: Category) -> f32 {
        self.energy.level(category)
    }

    /// Get current playstyle energy
    pub fn playstyle_energy(&self) -> f32 {
        self.energy.playstyle_energy()
    }

    /// Playstyle energy used by the most recent routing decision
    pub fn routed_energy(&self) -> f32 {
        self.routed_energy
    }

    /// Get the current song
    pub fn song(&self) -> Option<&Arc<Song>> {
        self.song.as_ref()
    }

    /// Get current section index
    pub fn current_section(&self) -> usize {
        self.section
    }

    /// Get section timing
    pub fn section_clock(&self) -> &SectionClock {
        &self.clock
    }

    /// Get equipped abilities
    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    /// Get the mixer
    pub fn mixer(&self) -> &Mixer<S> {
        &self.mixer
    }

    /// Get a playback slot
    pub fn slot(&self, id: SlotId) -> &PlaybackSlot {
        self.mixer.slot(id)
    }

    /// Get the audio sink
    pub fn sink(&self) -> &S {
        self.mixer.sink()
    }

    /// Get the mutable audio sink
    pub fn sink_mut(&mut self) -> &mut S {
        self.mixer.sink_mut()
    }

    /// Get routing mode
    pub fn routing_mode(&self) -> RoutingMode {
        self.router.mode()
    }

    /// Set routing mode
    pub fn set_routing_mode(&mut self, mode: RoutingMode) {
        self.router.set_mode(mode);
    }

    /// Check whether clip tiers follow energy mid-section
    pub fn node_levels(&self) -> bool {
        self.node_levels
    }

    /// Enable or disable mid-section clip tier swaps
    pub fn set_node_levels(&mut self, enabled: bool) {
        self.node_levels = enabled;
    }

    /// Check external-cooldown mode
    pub fn is_external_cooldown(&self) -> bool {
        self.energy.is_external_cooldown()
    }

    /// Toggle external-cooldown mode: levels stop decaying and are set
    /// through `set_ability_phase` instead of scored actions
    pub fn set_external_cooldown(&mut self, enabled: bool) {
        self.energy.set_external_cooldown(enabled);
    }

    // Energy

    /// Adjust a category level by `delta`
    pub fn adjust(&mut self, category: Category, delta: f32) {
        self.energy.adjust(category, delta);
    }

    /// Set a category level
    pub fn set(&mut self, category: Category, value: f32) {
        self.energy.set(category, value);
    }

    /// Return the decay rate to its baseline
    pub fn reset_rate_of_decay(&mut self) {
        self.energy.reset_rate_of_decay();
    }

    /// Score a gameplay event. Continuous actions are scaled by `dt`.
    pub fn record_action(&mut self, action: ScoredAction, dt: f32) {
        if self.energy.is_external_cooldown() {
            debug!(%action, "external cooldown mode, ignoring scored action");
            return;
        }
        let delta = self.config.actions.delta(action, dt);
        self.energy.adjust(action.category(), delta);
        if action.is_special() {
            self.energy.reset_rate_of_decay();
        }
    }

    /// Pin a category to the level for its ability's cooldown phase
    pub fn set_ability_phase(&mut self, category: Category, phase: AbilityPhase) {
        if !self.energy.is_external_cooldown() {
            debug!(%category, ?phase, "ability phase set outside external cooldown mode");
        }
        let level = self.config.phases.level(phase);
        self.energy.set(category, level);
    }

    // Song and sections

    /// Install a song and start it from section 0.
    ///
    /// Equipped abilities are re-mapped to the new song's instruments and
    /// the master volume drops to its floor so the song fades in.
    pub fn load_song(&mut self, song: Arc<Song>) {
        info!(
            song = song.name(),
            sections = song.section_count(),
            instruments = song.instruments().len(),
            "loading song"
        );

        for category in Category::ALL {
            self.instrument_rows[category.index()] = self
                .loadout
                .get(category)
                .and_then(|ability| resolve_row(&song, ability));
        }

        // Old song's stems hand over to fades and the new song comes in from silence
        for category in Category::ALL {
            let slot = SlotId::for_category(category);
            self.mixer.fade_out(slot, self.config.fade.music_fade_speed);
            self.mixer.set_volume(slot, 0.0);
        }
        if self.mixer.slot(SlotId::Background).is_playing() {
            self.mixer.fade_out(SlotId::Background, self.config.fade.music_fade_speed);
        }
        self.background_row = self
            .config
            .playback
            .background_instrument
            .as_deref()
            .and_then(|name| {
                let row = song.instrument_index(&Instrument::new(name));
                if row.is_none() {
                    warn!(song = song.name(), instrument = name, "background instrument not in song");
                }
                row
            });

        self.song = Some(song);
        self.routed_energy = self.energy.playstyle_energy();
        self.enter_section(0, None);
        self.mixer.set_master_db(self.config.master.floor_db);
    }

    /// Start a fresh session: levels and decay return to their initial
    /// values and every ability is unequipped
    pub fn reset_session(&mut self) {
        info!("resetting session");
        for category in Category::ALL {
            if self.loadout.get(category).is_some() {
                self.unequip(category);
            }
        }
        self.energy.reset();
        self.routed_energy = self.energy.playstyle_energy();
    }

    /// Load a section directly, using the current section for clip
    /// continuity
    pub fn load_section(&mut self, section: usize) {
        let previous = self.song.as_ref().map(|_| self.section);
        self.enter_section(section, previous);
    }

    /// Check whether the current section has played out, advancing its
    /// clock by `dt` while it has not
    pub fn section_done_playing(&mut self, dt: f32) -> bool {
        self.clock.done_playing(dt)
    }

    /// Route to and load the section that follows the current one
    pub fn next_section(&mut self) -> Route {
        let Some(song) = self.song.clone() else {
            warn!("no song loaded, cannot route");
            return Route::new(self.section, RouteKind::Stuck);
        };

        self.routed_energy = self.energy.playstyle_energy();
        let route = self.router.next(&song, self.section, self.routed_energy);
        debug!(
            from = self.section,
            to = route.section,
            kind = ?route.kind,
            reload = route.is_reload(self.section),
            energy = self.routed_energy,
            "section transition"
        );

        let previous = self.section;
        self.enter_section(route.section, Some(previous));
        route
    }

    fn enter_section(&mut self, section: usize, previous: Option<usize>) {
        let Some(song) = self.song.clone() else {
            warn!(section, "no song loaded, cannot load section");
            return;
        };
        if section > song.final_section() {
            warn!(
                song = song.name(),
                section,
                final_section = song.final_section(),
                "section out of range"
            );
            return;
        }

        self.section = section;
        self.clock.restart(song.section_length(section));

        for category in Category::ALL {
            let slot = SlotId::for_category(category);
            let Some(row) = self.instrument_rows[category.index()] else {
                self.mixer.clear(slot);
                continue;
            };
            let Some(node) = song.node(row, section) else {
                debug!(%category, section, "instrument absent from section");
                self.mixer.clear(slot);
                continue;
            };
            let previous_node = previous.and_then(|p| song.node(row, p));
            let clip = self
                .config
                .thresholds
                .select(
                    node,
                    previous_node,
                    self.energy.level(category),
                    self.mixer.slot(slot).clip(),
                )
                .clone();
            self.mixer.assign_and_play(slot, clip, 0.0);
        }

        match self.background_row.and_then(|row| song.node(row, section)) {
            Some(node) => {
                let volume = self.config.playback.background_volume;
                self.mixer.assign_and_play(SlotId::Background, node.low().clone(), 0.0);
                self.mixer.set_volume(SlotId::Background, volume);
                self.mixer.set_target_volume(SlotId::Background, volume);
            }
            None => self.mixer.clear(SlotId::Background),
        }

        debug!(
            song = song.name(),
            section,
            length = self.clock.length(),
            "entered section"
        );
    }

    // Loadout

    /// Equip an ability in its category, replacing whatever was there
    pub fn equip(&mut self, ability: Ability) {
        let category = ability.category();
        let slot = SlotId::for_category(category);

        self.mixer.fade_out(slot, self.config.fade.music_fade_speed);
        self.mixer.set_volume(slot, 0.0);

        let row = self.song.as_ref().and_then(|song| resolve_row(song, &ability));
        debug!(ability = ability.name(), %category, row = ?row, "equip");
        if let Some(replaced) = self.loadout.equip(ability) {
            debug!(ability = replaced.name(), %category, "replaced ability");
        }
        self.instrument_rows[category.index()] = row;

        let node = match (&self.song, row) {
            (Some(song), Some(row)) => song.node(row, self.section).cloned(),
            _ => None,
        };
        match node {
            Some(node) => {
                let clip = self
                    .config
                    .thresholds
                    .select(&node, None, self.energy.level(category), self.mixer.slot(slot).clip())
                    .clone();
                self.mixer.assign_and_play(slot, clip, self.clock.elapsed());
            }
            // Silent until a section that contains the instrument
            None => self.mixer.clear(slot),
        }
    }

    /// Unequip whatever is in a category
    pub fn unequip(&mut self, category: Category) {
        let Some(ability) = self.loadout.remove(category) else {
            warn!(%category, "unequip with nothing equipped");
            return;
        };
        debug!(ability = ability.name(), %category, "unequip");

        let slot = SlotId::for_category(category);
        self.mixer.fade_out(slot, self.config.fade.music_fade_speed);
        self.mixer.clear(slot);
        self.mixer.set_volume(slot, 0.0);
        self.mixer.set_target_volume(slot, 0.0);
        self.instrument_rows[category.index()] = None;
    }

    /// Unequip a specific ability; ignored unless it is the one equipped
    pub fn unequip_ability(&mut self, ability: &Ability) {
        if !self.loadout.is_equipped(ability) {
            warn!(ability = ability.name(), category = %ability.category(), "unequip of an ability that is not equipped");
            return;
        }
        self.unequip(ability.category());
    }

    // Set pieces

    /// Play a one-off clip on the set-piece slot at full volume
    pub fn play_set_piece(&mut self, clip: AudioClip) {
        debug!(clip = clip.name(), "set piece");
        self.mixer.fade_out(SlotId::SetPiece, self.config.fade.music_fade_speed);
        self.mixer.assign_and_play(SlotId::SetPiece, clip, 0.0);
        self.mixer.set_volume(SlotId::SetPiece, 1.0);
        self.mixer.set_target_volume(SlotId::SetPiece, 1.0);
    }

    /// Fade out and clear the set-piece slot
    pub fn stop_set_piece(&mut self) {
        self.mixer.fade_out(SlotId::SetPiece, self.config.fade.music_fade_speed);
        self.mixer.clear(SlotId::SetPiece);
        self.mixer.set_volume(SlotId::SetPiece, 0.0);
        self.mixer.set_target_volume(SlotId::SetPiece, 0.0);
    }

    // Frame

    /// Advance the engine by one frame of `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.mixer.advance(dt);
        self.energy.decay_tick(dt);

        if self.song.is_none() {
            return;
        }
        if self.section_done_playing(dt) {
            self.next_section();
        }
        if self.node_levels {
            self.refresh_clips();
        }
        self.update_volumes(dt);

        let step = dt * self.config.fade.music_fade_speed * 100.0;
        self.mixer.ease_master(self.config.master.volume_db, step);
    }

    /// Re-select each category's clip in place, resuming a changed or
    /// finished clip at the section offset
    fn refresh_clips(&mut self) {
        let Some(song) = self.song.clone() else {
            return;
        };
        let elapsed = self.clock.elapsed();
        // Section has played out; the next frame routes
        if elapsed >= self.clock.length() {
            return;
        }
        for category in Category::ALL {
            let Some(row) = self.instrument_rows[category.index()] else {
                continue;
            };
            let Some(node) = song.node(row, self.section) else {
                continue;
            };
            let slot = SlotId::for_category(category);
            let state = self.mixer.slot(slot);
            let tier = self
                .config
                .thresholds
                .select_tier(node, None, self.energy.level(category), state.clip());
            let clip = node.clip(tier);
            if state.clip() == Some(clip) && state.is_playing() {
                continue;
            }
            if elapsed >= clip.length() {
                continue;
            }
            if state.clip() != Some(clip) {
                debug!(
                    %category,
                    from = state.clip().and_then(|c| node.tier_of(c)).map(|t| t.label()),
                    to = tier.label(),
                    "clip tier changed"
                );
            }
            let clip = clip.clone();
            self.mixer.assign_and_play(slot, clip, elapsed);
        }
    }

    fn update_volumes(&mut self, dt: f32) {
        let category_max = self.energy.config().category_max;
        for category in Category::ALL {
            let target = if self.instrument_rows[category.index()].is_some() {
                self.config.volume.volume_for(
                    self.energy.level(category),
                    &self.config.thresholds,
                    category_max,
                )
            } else {
                0.0
            };
            self.mixer.set_target_volume(SlotId::for_category(category), target);
        }
        self.mixer.morph_volumes(self.config.fade.volume_morph_speed * dt);
    }

    /// Snapshot of the engine state
    pub fn status(&self) -> EngineStatus {
        let [mobility, offense, defense] = self.energy.levels();
        let slots = SlotId::ALL
            .iter()
            .map(|&id| {
                let slot = self.mixer.slot(id);
                SlotStatus {
                    slot: id,
                    clip: slot.clip().map(|c| c.name().to_string()),
                    playing: slot.is_playing(),
                    time: slot.time(),
                    volume: slot.volume(),
                    target_volume: slot.target_volume(),
                }
            })
            .collect();

        EngineStatus {
            song: self.song.as_ref().map(|s| s.name().to_string()),
            section: self.section,
            section_energy: self.song.as_ref().and_then(|s| s.section_energy(self.section)),
            section_elapsed: self.clock.elapsed(),
            section_length: self.clock.length(),
            levels: CategoryLevels {
                mobility,
                offense,
                defense,
            },
            playstyle_energy: self.energy.playstyle_energy(),
            routed_energy: self.routed_energy,
            decay_rate: self.energy.decay_rate(),
            slots,
            active_fades: self.mixer.fades().len(),
            master_db: self.mixer.master_db(),
        }
    }
}

/// Song row of the instrument an ability plays in `song`
fn resolve_row(song: &Song, ability: &Ability) -> Option<usize> {
    let Some(instrument) = ability.instrument_for(song.name()) else {
        warn!(ability = ability.name(), song = song.name(), "ability has no instrument for song");
        return None;
    };
    let row = song.instrument_index(instrument);
    if row.is_none() {
        warn!(
            ability = ability.name(),
            song = song.name(),
            instrument = instrument.name(),
            "instrument does not appear in song"
        );
    }
    row
}
