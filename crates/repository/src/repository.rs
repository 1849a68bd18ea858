// SPDX-License-Identifier: GPL-3.0-or-later

//!
//! The in-memory spell repository
//!

use crate::{RepositoryError, files};
use log::{debug, info};
use spellcards_core::{CORE_SOURCE, HOMEBREW_SOURCE, Name, School, Spell, SpellKey, SpellLevel};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Which spells to show.  An empty selection doesn't constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellFilter {
    /// A spell matches if it belongs to any of these classes
    pub classes: Vec<String>,

    /// A spell matches if it's of any of these schools
    pub schools: Vec<School>,

    /// A spell matches if it's of any of these levels
    pub levels: Vec<SpellLevel>,
}

impl SpellFilter {
    /// A filter that matches everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_classes<S: Into<String>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_schools(mut self, schools: impl IntoIterator<Item = School>) -> Self {
        self.schools = schools.into_iter().collect();
        self
    }

    pub fn with_levels(mut self, levels: impl IntoIterator<Item = SpellLevel>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Whether the spell passes the filter
    pub fn matches(&self, spell: &Spell) -> bool {
        let class_ok =
            self.classes.is_empty() || self.classes.iter().any(|class| spell.has_class(class));
        let school_ok = self.schools.is_empty() || self.schools.contains(&spell.school());
        let level_ok = self.levels.is_empty() || self.levels.contains(&spell.level());
        class_ok && school_ok && level_ok
    }
}

/// All known spells (the built-in list merged with user-authored spells)
#[derive(Debug, Clone, Default)]
pub struct SpellRepository {
    /// Sorted by lower-cased name, unique by key
    spells: Vec<Spell>,

    /// The built-in spells, as loaded
    core: Vec<Spell>,

    /// The user-authored spells, as stored on disk
    custom: Vec<Spell>,
}

impl SpellRepository {
    /// Merge the built-in and user-authored spells.  Spells without a source
    /// are given `Core` or `Homebrew` respectively.  When two spells share a
    /// key the later one wins (so custom spells override core spells).
    pub fn merge(core: Vec<Spell>, custom: Vec<Spell>) -> Self {
        let custom: Vec<Spell> = custom
            .into_iter()
            .map(|mut spell| {
                spell.set_source_if_missing(HOMEBREW_SOURCE);
                spell
            })
            .collect();
        let core_count = core.len();
        let custom_count = custom.len();
        let spells = merge_spells(core.clone(), custom.clone());
        info!(
            "Merged {core_count} core and {custom_count} custom spells into {}",
            spells.len()
        );
        Self {
            spells,
            core,
            custom,
        }
    }

    /// Load the built-in spells and any user-authored spells (a missing custom
    /// file counts as no custom spells)
    pub fn load(core_path: &Path, custom_path: &Path) -> Result<Self, RepositoryError> {
        let core = Self::load_core_from_path(core_path)?;
        let custom = Self::load_custom_from_path(custom_path)?;
        Ok(Self::merge(core, custom))
    }

    /// Load the built-in spell list
    pub fn load_core_from_path(path: &Path) -> Result<Vec<Spell>, RepositoryError> {
        files::load_spells(path)
    }

    /// Load the user-authored spells (empty if the file doesn't exist)
    pub fn load_custom_from_path(path: &Path) -> Result<Vec<Spell>, RepositoryError> {
        files::load_spells_if_exists(path)
    }

    /// Every spell, sorted by name
    pub fn spells(&self) -> &[Spell] {
        &self.spells
    }

    /// The user-authored spells
    pub fn custom_spells(&self) -> &[Spell] {
        &self.custom
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    /// Get the spell with the key
    pub fn get(&self, key: &SpellKey) -> Option<&Spell> {
        self.spells.iter().find(|spell| &spell.key() == key)
    }

    /// Get a spell by (case-insensitive) name, preferring the given source
    /// and then the core list
    pub fn find_by_name(&self, name: &str, source: Option<&str>) -> Result<&Spell, RepositoryError> {
        let name_lower = name.trim().to_lowercase();
        let mut matches = self
            .spells
            .iter()
            .filter(|spell| spell.name().to_lowercase() == name_lower);
        let found = match source {
            Some(source) => {
                let key = SpellKey::new(name, source);
                matches.find(|spell| spell.key() == key)
            }
            None => {
                let candidates: Vec<&Spell> = matches.collect();
                candidates
                    .iter()
                    .find(|spell| spell.source().eq_ignore_ascii_case(CORE_SOURCE))
                    .or(candidates.first())
                    .copied()
            }
        };
        found.ok_or_else(|| RepositoryError::SpellNotFound(name.to_string()))
    }

    /// The spells passing the filter, sorted by name
    pub fn filter(&self, filter: &SpellFilter) -> Vec<&Spell> {
        let spells: Vec<&Spell> = self
            .spells
            .iter()
            .filter(|spell| filter.matches(spell))
            .collect();
        debug!("{} of {} spells pass {filter:?}", spells.len(), self.spells.len());
        spells
    }

    /// Every class named by any spell (lower-cased, sorted, unique)
    pub fn class_options(&self) -> Vec<String> {
        let classes: BTreeSet<String> = self
            .spells
            .iter()
            .flat_map(|spell| spell.classes().iter())
            .map(|class| class.trim().to_lowercase())
            .filter(|class| !class.is_empty())
            .collect();
        classes.into_iter().collect()
    }

    /// Every school of any spell (lower-cased, sorted, unique)
    pub fn school_options(&self) -> Vec<String> {
        let schools: BTreeSet<String> = self
            .spells
            .iter()
            .map(|spell| spell.school().as_str().to_string())
            .collect();
        schools.into_iter().collect()
    }

    /// The first spell passing the filter whose name starts with the query
    /// (case-insensitive).  An empty query matches nothing.
    pub fn find_by_prefix(&self, query: &str, filter: &SpellFilter) -> Option<&Spell> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.filter(filter)
            .into_iter()
            .find(|spell| spell.name().to_lowercase().starts_with(&query))
    }

    /// A copy of an existing spell to start a new custom spell from.  The copy
    /// is renamed and marked as homebrew.
    pub fn spell_from_template(&self, template: &str, name: Name) -> Result<Spell, RepositoryError> {
        let spell = self
            .find_by_name(template, None)?
            .clone()
            .with_name(name)
            .with_source(HOMEBREW_SOURCE);
        debug!("New spell {:?} from template {template:?}", spell.name().as_str());
        Ok(spell)
    }

    /// Add (or replace, by name) a user-authored spell, write the custom
    /// spells to disk, and re-merge
    pub fn save_custom_spell(&mut self, spell: Spell, path: &Path) -> Result<(), RepositoryError> {
        self.save_custom_spells(vec![spell], path)
    }

    /// Add (or replace, by name) several user-authored spells, write the
    /// custom spells to disk once, and re-merge
    pub fn save_custom_spells(&mut self, spells: Vec<Spell>, path: &Path) -> Result<(), RepositoryError> {
        for mut spell in spells {
            spell.set_source_if_missing(HOMEBREW_SOURCE);
            let name = spell.name().to_lowercase();
            self.custom
                .retain(|existing| existing.name().to_lowercase() != name);
            self.custom.push(spell);
        }
        files::save_spells(path, &self.custom)?;
        self.spells = merge_spells(self.core.clone(), self.custom.clone());
        info!("Custom spells saved ({} custom spells)", self.custom.len());
        Ok(())
    }
}

/// Concatenate, de-duplicate (last one wins), and sort by lower-cased name
fn merge_spells(core: Vec<Spell>, custom: Vec<Spell>) -> Vec<Spell> {
    let mut index: HashMap<SpellKey, usize> = HashMap::new();
    let mut spells: Vec<Spell> = Vec::new();
    for mut spell in core.into_iter() {
        spell.set_source_if_missing(CORE_SOURCE);
        insert_or_replace(&mut spells, &mut index, spell);
    }
    for spell in custom.into_iter() {
        insert_or_replace(&mut spells, &mut index, spell);
    }
    spells.sort_by_key(|spell| spell.name().to_lowercase());
    spells
}

fn insert_or_replace(spells: &mut Vec<Spell>, index: &mut HashMap<SpellKey, usize>, spell: Spell) {
    let key = spell.key();
    match index.get(&key) {
        Some(&i) => spells[i] = spell,
        None => {
            index.insert(key, spells.len());
            spells.push(spell);
        }
    }
}
