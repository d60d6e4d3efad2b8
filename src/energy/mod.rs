// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playstyle energy tracking.

pub mod category;
pub mod tracker;

pub use category::Category;
pub use tracker::{EnergyConfig, EnergyTracker};
