// SPDX-License-Identifier: MIT

//!
//! The spell type
//!

use crate::{DamageDice, Name, School, SpellLevel, extract_damage_dice};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The source assumed for spells that don't name one (the built-in spell list)
pub const CORE_SOURCE: &str = "Core";

/// The source given to user-authored spells that don't name one
pub const HOMEBREW_SOURCE: &str = "Homebrew";

/// A spell's identity: its name and source, both lower-cased.  Two spells
/// with the same name can coexist if they come from different sources.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpellKey {
    name: String,
    source: String,
}

impl SpellKey {
    /// Create a key from a name and source (case is ignored)
    pub fn new(name: &str, source: &str) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            source: source.trim().to_lowercase(),
        }
    }

    /// The lower-cased name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The lower-cased source
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for SpellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.source)
    }
}

/// A spell's components.  Data files hold either the raw text or flags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Components {
    /// e.g. `"V, S, M (a tiny ball of bat guano and sulfur)"`
    Raw(String),

    /// Individual flags, optionally with the raw text
    Flags {
        #[serde(default)]
        verbal: bool,
        #[serde(default)]
        somatic: bool,
        #[serde(default)]
        material: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw: Option<String>,
    },
}

impl Default for Components {
    fn default() -> Self {
        Components::Raw(String::new())
    }
}

impl fmt::Display for Components {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Components::Raw(raw) => write!(f, "{raw}"),
            Components::Flags { raw: Some(raw), .. } => write!(f, "{raw}"),
            Components::Flags {
                verbal,
                somatic,
                material,
                raw: None,
            } => {
                let letters: Vec<&str> = [(*verbal, "V"), (*somatic, "S"), (*material, "M")]
                    .into_iter()
                    .filter_map(|(set, letter)| set.then_some(letter))
                    .collect();
                write!(f, "{}", letters.join(", "))
            }
        }
    }
}

/// Abbreviate a saving throw ability (`dexterity` -> `DEX`).  Anything else is
/// returned unchanged.
pub fn abbreviate_save(save: &str) -> String {
    match save.trim().to_lowercase().as_str() {
        "dexterity" => String::from("DEX"),
        "constitution" => String::from("CON"),
        "strength" => String::from("STR"),
        "intelligence" => String::from("INT"),
        "wisdom" => String::from("WIS"),
        "charisma" => String::from("CHA"),
        _ => save.trim().to_string(),
    }
}

/// A spell
#[derive(Serialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Spell {
    name: Name,
    level: SpellLevel,
    school: School,
    classes: Vec<String>,
    casting_time: String,
    range: String,
    duration: String,
    ritual: bool,
    description: String,
    components: Components,

    #[serde(skip_serializing_if = "Option::is_none")]
    area_of_effect: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    attack_save: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    damage_dice: Vec<DamageDice>,

    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl Spell {
    /// Create a spell with the required fields (everything else is empty)
    pub fn new(name: Name, level: SpellLevel, school: School) -> Self {
        Self {
            name,
            level,
            school,
            classes: Vec::new(),
            casting_time: String::new(),
            range: String::new(),
            duration: String::new(),
            ritual: false,
            description: String::new(),
            components: Components::default(),
            area_of_effect: None,
            attack_save: None,
            damage_dice: Vec::new(),
            source: None,
        }
    }

    pub fn with_name(mut self, name: Name) -> Self {
        self.name = name;
        self
    }

    pub fn with_level(mut self, level: SpellLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_school(mut self, school: School) -> Self {
        self.school = school;
        self
    }

    pub fn with_classes<S: Into<String>>(mut self, classes: impl IntoIterator<Item = S>) -> Self {
        self.classes = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_casting_time<S: Into<String>>(mut self, casting_time: S) -> Self {
        self.casting_time = casting_time.into();
        self
    }

    pub fn with_range<S: Into<String>>(mut self, range: S) -> Self {
        self.range = range.into();
        self
    }

    pub fn with_duration<S: Into<String>>(mut self, duration: S) -> Self {
        self.duration = duration.into();
        self
    }

    pub fn with_ritual(mut self, ritual: bool) -> Self {
        self.ritual = ritual;
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_components(mut self, components: Components) -> Self {
        self.components = components;
        self
    }

    pub fn with_area_of_effect<S: Into<String>>(mut self, area_of_effect: S) -> Self {
        self.area_of_effect = non_empty(area_of_effect.into());
        self
    }

    pub fn with_attack_save<S: Into<String>>(mut self, attack_save: S) -> Self {
        self.attack_save = non_empty(attack_save.into());
        self
    }

    pub fn with_damage_dice(mut self, damage_dice: Vec<DamageDice>) -> Self {
        self.damage_dice = damage_dice;
        self
    }

    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = non_empty(source.into());
        self
    }

    /// The spell's identity
    pub fn key(&self) -> SpellKey {
        SpellKey::new(self.name.as_str(), self.source())
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn level(&self) -> SpellLevel {
        self.level
    }

    pub fn school(&self) -> School {
        self.school
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// The first class listed (used when colouring by class)
    pub fn first_class(&self) -> Option<&str> {
        self.classes.first().map(String::as_str)
    }

    /// Whether the spell is available to the class (case is ignored)
    pub fn has_class(&self, class: &str) -> bool {
        self.classes
            .iter()
            .any(|known| known.eq_ignore_ascii_case(class.trim()))
    }

    pub fn casting_time(&self) -> &str {
        &self.casting_time
    }

    pub fn range(&self) -> &str {
        &self.range
    }

    pub fn duration(&self) -> &str {
        &self.duration
    }

    pub fn ritual(&self) -> bool {
        self.ritual
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    pub fn area_of_effect(&self) -> Option<&str> {
        self.area_of_effect.as_deref()
    }

    /// The raw attack/save text (e.g. `"Dexterity"`, `"Spell Attack"`)
    pub fn attack_save(&self) -> Option<&str> {
        self.attack_save.as_deref()
    }

    /// The attack/save as shown on a card (saving throws abbreviated)
    pub fn attack_save_abbreviated(&self) -> Option<String> {
        self.attack_save.as_deref().map(abbreviate_save)
    }

    /// The structured damage dice (may be empty)
    pub fn damage_dice(&self) -> &[DamageDice] {
        &self.damage_dice
    }

    /// The damage dice to show on a card: the structured damage dice if there
    /// are any, otherwise those found in the description
    pub fn damage_dice_for_card(&self) -> Vec<DamageDice> {
        if self.damage_dice.is_empty() {
            extract_damage_dice(&self.description)
        } else {
            self.damage_dice.clone()
        }
    }

    /// Whether casting requires concentration
    pub fn is_concentration(&self) -> bool {
        self.duration.to_lowercase().contains("concentration")
    }

    /// The spell's source (`Core` if none was given)
    pub fn source(&self) -> &str {
        self.source.as_deref().unwrap_or(CORE_SOURCE)
    }

    /// Whether the source was given explicitly
    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Set the source if the spell doesn't already have one
    pub fn set_source_if_missing(&mut self, source: &str) {
        if self.source.is_none() {
            self.source = non_empty(source.to_string());
        }
    }

    /// A multi-line, human readable summary of the spell
    pub fn details(&self) -> String {
        let mut text = format!("Source: {}\n", self.source());
        text += &format!("Name: {}\n", self.name);
        text += &format!("Level: {}\n", self.level);
        text += &format!("School: {}\n", self.school);
        text += &format!("Classes: {}\n", self.classes.join(", "));
        text += &format!("Casting time: {}\n", self.casting_time);
        text += &format!("Range: {}\n", self.range);
        text += &format!("Components: {}\n", self.components);
        text += &format!("Duration: {}\n", self.duration);
        text += &format!("Ritual: {}\n", if self.ritual { "Yes" } else { "No" });
        text += &format!("\nDescription:\n{}\n", self.description);
        if let Some(area_of_effect) = &self.area_of_effect {
            text += &format!("\nArea of effect: {area_of_effect}\n");
        }
        if let Some(attack_save) = &self.attack_save {
            text += &format!("Attack/Save: {attack_save}\n");
        }
        if !self.damage_dice.is_empty() {
            text += "Damage:\n";
            for damage in &self.damage_dice {
                text += &format!("  {} {}\n", damage.dice, damage.display_type());
            }
        }
        text
    }
}

/// `None` for empty or "None" strings
fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Damage dice are either a list, or (in older files) a single string like
/// `"8d6 fire"`
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum RawDamageDice {
    List(Vec<DamageDice>),
    Text(String),
}

/// Used only by the custom deserialiser (to accept the older field names)
#[derive(Deserialize, Debug)]
struct RawSpell {
    name: Name,
    #[serde(default)]
    level: SpellLevel,
    school: School,
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    casting_time: String,
    #[serde(default)]
    range: String,
    #[serde(default)]
    duration: String,
    #[serde(default)]
    ritual: bool,
    #[serde(default)]
    description: String,
    #[serde(default)]
    components: Components,
    #[serde(default, alias = "AreaOfEffect")]
    area_of_effect: Option<String>,
    #[serde(default, alias = "AttackSave", alias = "save_dc")]
    attack_save: Option<String>,
    #[serde(default, alias = "DmgDice")]
    damage_dice: Option<RawDamageDice>,
    #[serde(default)]
    source: Option<String>,
}

impl<'de> Deserialize<'de> for Spell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSpell::deserialize(deserializer)?;

        let damage_dice = match raw.damage_dice {
            None => Vec::new(),
            Some(RawDamageDice::List(list)) => list
                .into_iter()
                .filter(|damage| !damage.dice.trim().is_empty())
                .collect(),
            Some(RawDamageDice::Text(text)) => DamageDice::parse(&text).into_iter().collect(),
        };

        Ok(Spell {
            name: raw.name,
            level: raw.level,
            school: raw.school,
            classes: raw.classes,
            casting_time: raw.casting_time,
            range: raw.range,
            duration: raw.duration,
            ritual: raw.ritual,
            description: raw.description,
            components: raw.components,
            area_of_effect: raw.area_of_effect.and_then(non_empty),
            attack_save: raw.attack_save.and_then(non_empty),
            damage_dice,
            source: raw.source.and_then(non_empty),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fireball() -> Spell {
        Spell::new(
            Name::from("Fireball").unwrap(),
            SpellLevel::from(3).unwrap(),
            School::Evocation,
        )
        .with_classes(["Sorcerer", "Wizard"])
        .with_duration("Instantaneous")
        .with_description("Each creature takes 8d6 fire damage.")
    }

    #[test]
    fn key_ignores_case() {
        let spell = fireball().with_source("PHB");
        assert_eq!(spell.key(), SpellKey::new("FIREBALL", "phb"));
        assert_ne!(spell.key(), fireball().key());
        assert_eq!(fireball().source(), CORE_SOURCE);
    }

    #[test]
    fn source_defaults() {
        let mut spell = fireball();
        assert!(!spell.has_source());
        spell.set_source_if_missing(HOMEBREW_SOURCE);
        assert_eq!(spell.source(), HOMEBREW_SOURCE);
        spell.set_source_if_missing(CORE_SOURCE);
        assert_eq!(spell.source(), HOMEBREW_SOURCE);
    }

    #[test]
    fn components_display() {
        let flags = Components::Flags {
            verbal: true,
            somatic: false,
            material: true,
            raw: None,
        };
        assert_eq!(flags.to_string(), "V, M");
        let with_raw = Components::Flags {
            verbal: true,
            somatic: true,
            material: true,
            raw: Some(String::from("V, S, M (sulfur)")),
        };
        assert_eq!(with_raw.to_string(), "V, S, M (sulfur)");
        assert_eq!(Components::Raw(String::from("V")).to_string(), "V");
    }

    #[test]
    fn save_abbreviation() {
        assert_eq!(abbreviate_save("Dexterity"), "DEX");
        assert_eq!(abbreviate_save("wisdom"), "WIS");
        assert_eq!(abbreviate_save("Spell Attack"), "Spell Attack");
        let spell = fireball().with_attack_save("None");
        assert_eq!(spell.attack_save_abbreviated(), None);
        let spell = fireball().with_attack_save("constitution");
        assert_eq!(spell.attack_save_abbreviated().as_deref(), Some("CON"));
    }

    #[test]
    fn damage_dice_prefers_structured() {
        let spell = fireball();
        assert_eq!(spell.damage_dice_for_card(), vec![DamageDice::new("8d6", "fire")]);
        let spell = fireball().with_damage_dice(vec![DamageDice::new("10d6", "Fire")]);
        assert_eq!(spell.damage_dice_for_card(), vec![DamageDice::new("10d6", "Fire")]);
    }

    #[test]
    fn concentration() {
        assert!(!fireball().is_concentration());
        let spell = fireball().with_duration("Concentration, up to 1 minute");
        assert!(spell.is_concentration());
    }

    #[test]
    fn has_class() {
        assert!(fireball().has_class("wizard"));
        assert!(!fireball().has_class("cleric"));
        assert_eq!(fireball().first_class(), Some("Sorcerer"));
    }

    #[test]
    fn deserialize_legacy_fields() {
        let json = r#"{
            "name": "Burning Hands",
            "level": 1,
            "school": "Evocation",
            "classes": ["Sorcerer", "Wizard"],
            "components": {"verbal": true, "somatic": true, "material": false},
            "AreaOfEffect": "15 ft cone",
            "AttackSave": "DEX Save",
            "DmgDice": [{"dice": "3d6", "type": "Fire"}, {"dice": "", "type": "Acid"}]
        }"#;
        let spell: Spell = serde_json::from_str(json).unwrap();
        assert_eq!(spell.area_of_effect(), Some("15 ft cone"));
        assert_eq!(spell.attack_save(), Some("DEX Save"));
        assert_eq!(spell.damage_dice(), &[DamageDice::new("3d6", "Fire")]);
        assert_eq!(spell.components().to_string(), "V, S");
        assert!(!spell.has_source());
    }

    #[test]
    fn deserialize_damage_dice_string_and_save_dc() {
        let json = r#"{
            "name": "Ray of Frost",
            "level": "cantrip",
            "school": "evocation",
            "save_dc": "constitution",
            "damage_dice": "1d8 cold",
            "source": "PHB"
        }"#;
        let spell: Spell = serde_json::from_str(json).unwrap();
        assert!(spell.level().is_cantrip());
        assert_eq!(spell.damage_dice(), &[DamageDice::new("1d8", "cold")]);
        assert_eq!(spell.attack_save_abbreviated().as_deref(), Some("CON"));
        assert_eq!(spell.source(), "PHB");
    }

    #[test]
    fn deserialize_rejects_invalid() {
        let bad_school = r#"{"name": "X", "level": 1, "school": "Pyromancy"}"#;
        assert!(serde_json::from_str::<Spell>(bad_school).is_err());
        let bad_level = r#"{"name": "X", "level": 11, "school": "Illusion"}"#;
        assert!(serde_json::from_str::<Spell>(bad_level).is_err());
        let bad_name = r#"{"name": " ", "level": 1, "school": "Illusion"}"#;
        assert!(serde_json::from_str::<Spell>(bad_name).is_err());
    }

    #[test]
    fn serialize_round_trip_keeps_source() {
        let spell = fireball().with_source("Homebrew").with_area_of_effect("20 ft sphere");
        let json = serde_json::to_string(&spell).unwrap();
        let back: Spell = serde_json::from_str(&json).unwrap();
        assert_eq!(spell, back);
    }

    #[test]
    fn details_mentions_damage() {
        let spell = fireball().with_damage_dice(vec![DamageDice::new("8d6", "fire")]);
        let details = spell.details();
        assert!(details.contains("Name: Fireball"));
        assert!(details.contains("  8d6 Fire"));
    }
}
