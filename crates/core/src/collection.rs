// SPDX-License-Identifier: MIT

//!
//! A collection: the ordered list of spells picked for export
//!

use crate::{Spell, SpellKey};

/// The name used for a collection that hasn't been given one
pub const DEFAULT_COLLECTION_NAME: &str = "MyCollection";

/// An ordered list of spells selected for export.  Membership is by
/// [`SpellKey`], so a spell can only appear once.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    spells: Vec<Spell>,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new(DEFAULT_COLLECTION_NAME)
    }
}

impl Collection {
    /// Create an empty collection
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            spells: Vec::new(),
        }
    }

    /// Create a collection from spells (later duplicates are dropped)
    pub fn from_spells<S: Into<String>>(name: S, spells: Vec<Spell>) -> Self {
        let mut collection = Self::new(name);
        for spell in spells {
            collection.add(spell);
        }
        collection
    }

    /// The collection's name (used when naming exported files)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// The spells, in the order they were added
    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spell> {
        self.spells.iter()
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Whether a spell with the key is in the collection
    pub fn contains(&self, key: &SpellKey) -> bool {
        self.spells.iter().any(|spell| &spell.key() == key)
    }

    /// Add a spell to the end of the collection.  Returns `false` if it was
    /// already present.
    pub fn add(&mut self, spell: Spell) -> bool {
        if self.contains(&spell.key()) {
            return false;
        }
        self.spells.push(spell);
        true
    }

    /// Remove the spell with the key.  Returns the removed spell, if any.
    pub fn remove(&mut self, key: &SpellKey) -> Option<Spell> {
        let index = self.spells.iter().position(|spell| &spell.key() == key)?;
        Some(self.spells.remove(index))
    }

    /// Add the spell if it's absent, remove it if it's present.  Returns whether
    /// the spell is in the collection afterwards.
    pub fn toggle(&mut self, spell: &Spell) -> bool {
        let key = spell.key();
        if self.remove(&key).is_some() {
            false
        } else {
            self.spells.push(spell.clone());
            true
        }
    }

    pub fn clear(&mut self) {
        self.spells.clear()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Name, School, SpellLevel};

    fn spell(name: &str, source: &str) -> Spell {
        Spell::new(Name::from(name).unwrap(), SpellLevel::CANTRIP, School::Evocation)
            .with_source(source)
    }

    #[test]
    fn toggle_membership() {
        let mut collection = Collection::default();
        assert_eq!(collection.name(), DEFAULT_COLLECTION_NAME);
        assert!(collection.toggle(&spell("Light", "Core")));
        assert!(collection.toggle(&spell("Fire Bolt", "Core")));
        assert_eq!(collection.len(), 2);
        assert!(!collection.toggle(&spell("LIGHT", "core")));
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.spells()[0].name().as_str(), "Fire Bolt");
    }

    #[test]
    fn same_name_different_source() {
        let mut collection = Collection::new("Test");
        assert!(collection.add(spell("Light", "Core")));
        assert!(collection.add(spell("Light", "Homebrew")));
        assert!(!collection.add(spell("light", "homebrew")));
        assert_eq!(collection.len(), 2);
        assert!(collection.contains(&SpellKey::new("light", "HOMEBREW")));
    }

    #[test]
    fn keeps_order() {
        let collection = Collection::from_spells(
            "Ordered",
            vec![spell("C", "Core"), spell("A", "Core"), spell("c", "core")],
        );
        let names: Vec<&str> = collection.iter().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
    }

    #[test]
    fn remove() {
        let mut collection = Collection::from_spells("x", vec![spell("A", "Core")]);
        assert!(collection.remove(&SpellKey::new("b", "core")).is_none());
        assert!(collection.remove(&SpellKey::new("a", "core")).is_some());
        assert!(collection.is_empty());
    }
}
