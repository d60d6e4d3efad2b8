// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Song graph model.
//!
//! This module provides:
//! - Instruments and clip handles
//! - Music nodes: per-instrument, per-section clip tiers
//! - Songs: section graph with a sorted instrument × section table

pub mod instrument;
pub mod node;
pub mod song;

pub use instrument::{AudioClip, Instrument};
pub use node::{ClipTier, MusicNode};
pub use song::{SectionInfo, Song, MAX_SECTIONS};
