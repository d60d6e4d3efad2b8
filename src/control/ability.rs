// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Abilities and the equipped loadout.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::arrangement::Instrument;
use crate::energy::Category;

/// A player ability and the instrument it plays in each song
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    name: Arc<str>,
    category: Category,
    /// Song name to instrument
    instruments: HashMap<String, Instrument>,
}

impl Ability {
    /// Create an ability with no song mappings
    pub fn new(name: impl Into<Arc<str>>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            instruments: HashMap::new(),
        }
    }

    /// Map a song to the instrument this ability plays in it
    pub fn with_instrument(mut self, song: impl Into<String>, instrument: Instrument) -> Self {
        self.instruments.insert(song.into(), instrument);
        self
    }

    /// Get name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Get the instrument for a song
    pub fn instrument_for(&self, song: &str) -> Option<&Instrument> {
        self.instruments.get(song)
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

/// At most one equipped ability per category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Loadout {
    slots: [Option<Ability>; 3],
}

impl Loadout {
    /// Create an empty loadout
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the ability equipped in a category
    pub fn get(&self, category: Category) -> Option<&Ability> {
        self.slots[category.index()].as_ref()
    }

    /// Equip an ability in its category, returning the one it replaced
    pub fn equip(&mut self, ability: Ability) -> Option<Ability> {
        let index = ability.category().index();
        self.slots[index].replace(ability)
    }

    /// Remove and return the ability in a category
    pub fn remove(&mut self, category: Category) -> Option<Ability> {
        self.slots[category.index()].take()
    }

    /// Check whether this exact ability is equipped
    pub fn is_equipped(&self, ability: &Ability) -> bool {
        self.get(ability.category()) == Some(ability)
    }

    /// Iterate equipped abilities in category order
    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.slots.iter().flatten()
    }

    /// Number of equipped abilities
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check if nothing is equipped
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
