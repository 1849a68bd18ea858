// SPDX-License-Identifier: MIT

//!
//! Colour palettes and how an element's colour is chosen
//!

use crate::colour::Colour;
use log::warn;
use spellcards_core::{ColourMode, ElementConfig, School, Spell};

/// Colours for classes (matched against lower-cased class names)
pub const CLASS_COLOURS: [(&str, &str); 13] = [
    ("wizard", "#5e7eff"),
    ("sorcerer", "#ff66cc"),
    ("cleric", "#ccccff"),
    ("paladin", "#ffe680"),
    ("druid", "#88cc88"),
    ("bard", "#ff99cc"),
    ("warlock", "#9900cc"),
    ("ranger", "#66cc66"),
    ("fighter", "#cc9966"),
    ("rogue", "#999999"),
    ("monk", "#ccffcc"),
    ("barbarian", "#ff6666"),
    ("artificer", "#ccffff"),
];

/// Colours for the schools of magic
pub const SCHOOL_COLOURS: [(School, &str); 8] = [
    (School::Abjuration, "#006699"),
    (School::Conjuration, "#00cc99"),
    (School::Divination, "#9999ff"),
    (School::Enchantment, "#ff99cc"),
    (School::Evocation, "#ff3300"),
    (School::Illusion, "#cc66ff"),
    (School::Necromancy, "#333333"),
    (School::Transmutation, "#ffcc00"),
];

/// Get the palette colour for a class (case is ignored)
pub fn class_colour(class: &str) -> Option<&'static str> {
    let class = class.trim().to_lowercase();
    CLASS_COLOURS
        .iter()
        .find(|(name, _)| *name == class)
        .map(|(_, hex)| *hex)
}

/// Get the palette colour for a school
pub fn school_colour(school: School) -> &'static str {
    SCHOOL_COLOURS
        .iter()
        .find(|(known, _)| *known == school)
        .map(|(_, hex)| *hex)
        .unwrap_or("#000000")
}

/// The hex colour an element should be drawn in for the spell.  Elements in
/// `class` or `school` mode use the palette when it has an entry and the
/// configured colour otherwise.
pub fn resolve_hex(config: &ElementConfig, spell: Option<&Spell>) -> String {
    let configured = config.colour().to_string();
    let Some(spell) = spell else {
        return configured;
    };
    match config.mode() {
        ColourMode::Single => configured,
        ColourMode::Class => spell
            .first_class()
            .and_then(class_colour)
            .map(str::to_string)
            .unwrap_or(configured),
        ColourMode::School => school_colour(spell.school()).to_string(),
    }
}

/// The colour an element should be drawn in for the spell (see
/// [`resolve_hex`]).  Invalid hex colours are drawn black.
pub fn resolve_colour(config: &ElementConfig, spell: Option<&Spell>) -> Colour {
    let hex = resolve_hex(config, spell);
    Colour::from_hex(&hex).unwrap_or_else(|error| {
        warn!("{error}, using black");
        Colour::BLACK
    })
}
