// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playstyle categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis of player behaviour tracked as a decaying energy level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Jumps, dashes, slides
    Mobility,
    /// Hits, shots, damage dealt
    Offense,
    /// Blocks, evades, parries
    Defense,
}

impl Category {
    /// All categories in slot order
    pub const ALL: [Category; 3] = [Category::Mobility, Category::Offense, Category::Defense];

    /// Index into per-category arrays
    pub fn index(&self) -> usize {
        match self {
            Category::Mobility => 0,
            Category::Offense => 1,
            Category::Defense => 2,
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Mobility => "Mobility",
            Category::Offense => "Offense",
            Category::Defense => "Defense",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
