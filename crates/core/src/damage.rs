// SPDX-License-Identifier: MIT

//!
//! Damage dice, and pulling them out of free-text spell descriptions
//!

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// e.g. "8d6 fire", "1d10 force"
    static ref DAMAGE_DICE_REGEX: Regex = Regex::new(r"\b(\d+d\d+\s+\w+)\b").unwrap();
}

/// The damage "type" matched when a description reads "...1d6 when you cast
/// this spell using a higher level slot"
const HIGHER_LEVEL_DAMAGE_TYPE: &str = "when";

/// A number of dice and the type of damage they deal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageDice {
    /// e.g. `8d6`
    pub dice: String,

    /// e.g. `fire`
    #[serde(rename = "type", default)]
    pub damage_type: String,
}

impl DamageDice {
    /// Create new damage dice
    pub fn new<S: Into<String>, T: Into<String>>(dice: S, damage_type: T) -> Self {
        Self {
            dice: dice.into(),
            damage_type: damage_type.into(),
        }
    }

    /// Parse `"<dice> <type>"` (e.g. `"8d6 fire"`).  Anything after the type is
    /// ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split_whitespace();
        let dice = parts.next()?;
        let damage_type = parts.next()?;
        Some(DamageDice::new(dice, damage_type))
    }

    /// The damage type with a capital first letter (e.g. `Fire`)
    pub fn display_type(&self) -> String {
        let lower = self.damage_type.to_lowercase();
        let mut chars = lower.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// The text drawn in place of a damage type icon when there isn't one
    pub fn fallback_label(&self) -> String {
        let lower = self.damage_type.to_lowercase();
        if lower == HIGHER_LEVEL_DAMAGE_TYPE {
            String::from("[incr.w.lvl.]")
        } else {
            format!("[{lower}]")
        }
    }

    /// The name of the icon for this damage type (without extension)
    pub fn icon_name(&self) -> String {
        format!("dmg_{}", self.damage_type.to_lowercase())
    }
}

/// Extract all damage dice mentioned in a description, in order.  This is a
/// best-effort parse: `"takes 8d6 fire damage"` gives `8d6` & `fire`.
pub fn extract_damage_dice(description: &str) -> Vec<DamageDice> {
    let description = description.to_lowercase();
    DAMAGE_DICE_REGEX
        .captures_iter(&description)
        .filter_map(|captures| captures.get(1))
        .filter_map(|found| DamageDice::parse(found.as_str()))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn extract_from_description() {
        let description = "Each creature takes 8d6 Fire damage on a failed save. \
            The damage increases by 1d6 when you cast it using a slot of 4th level";
        let found = extract_damage_dice(description);
        assert_eq!(
            found,
            vec![DamageDice::new("8d6", "fire"), DamageDice::new("1d6", "when")]
        );
    }

    #[test]
    fn extract_nothing() {
        assert!(extract_damage_dice("You gain 5 temporary hit points.").is_empty());
        assert!(extract_damage_dice("").is_empty());
        // Dice must be followed by a word
        assert!(extract_damage_dice("roll 2d4.").is_empty());
    }

    #[test]
    fn labels() {
        assert_eq!(DamageDice::new("1d6", "when").fallback_label(), "[incr.w.lvl.]");
        assert_eq!(DamageDice::new("2d8", "Radiant").fallback_label(), "[radiant]");
        assert_eq!(DamageDice::new("2d8", "rADIANT").display_type(), "Radiant");
        assert_eq!(DamageDice::new("2d8", "Cold").icon_name(), "dmg_cold");
    }

    #[test]
    fn parse() {
        assert_eq!(
            DamageDice::parse("3d10 necrotic extra"),
            Some(DamageDice::new("3d10", "necrotic"))
        );
        assert_eq!(DamageDice::parse("3d10"), None);
    }
}
