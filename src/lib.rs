// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Alchemy - a gameplay-reactive music engine.
//!
//! Three playstyle categories (Mobility, Offense, Defense) carry decaying
//! energy levels fed by gameplay events. Each equipped ability plays one
//! instrument of the current song; its clip tier and volume follow its
//! category's level, and the song walks a graph of sections toward the
//! player's overall energy.

pub mod arrangement;
pub mod audio;
pub mod config;
pub mod control;
pub mod energy;
pub mod engine;
pub mod error;
pub mod sequencer;

pub use arrangement::{AudioClip, ClipTier, Instrument, MusicNode, SectionInfo, Song};
pub use audio::{AudioSink, NullSink, RecordingSink, SlotCommand, SlotId};
pub use config::{AbilitiesFile, EngineConfig, SongFile};
pub use control::{Ability, AbilityPhase, ScoredAction};
pub use energy::{Category, EnergyTracker};
pub use engine::{EngineStatus, MusicEngine};
pub use error::SongError;
pub use sequencer::{ClipThresholds, Route, RouteKind, RoutingMode, SectionRouter};
