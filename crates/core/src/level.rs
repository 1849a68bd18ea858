// SPDX-License-Identifier: MIT

//!
//! Spell levels (0 is a cantrip)
//!

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// The highest spell level
pub const MAX_SPELL_LEVEL: u8 = 9;

/// Errors that can arise in relation to a [`SpellLevel`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpellLevelError {
    #[error("Spell level must be between 0 and 9 (got {0})")]
    OutOfRange(i64),

    #[error("Invalid spell level: {0:?}")]
    Invalid(String),
}

/// A spell level between 0 (cantrip) and 9
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SpellLevel(u8);

impl SpellLevel {
    /// The cantrip level
    pub const CANTRIP: SpellLevel = SpellLevel(0);

    /// Create a spell level if it's in range
    pub fn from(level: i64) -> Result<Self, SpellLevelError> {
        if (0..=i64::from(MAX_SPELL_LEVEL)).contains(&level) {
            Ok(SpellLevel(level as u8))
        } else {
            Err(SpellLevelError::OutOfRange(level))
        }
    }

    /// Parse `"cantrip"` or a number
    pub fn parse(level: &str) -> Result<Self, SpellLevelError> {
        let level = level.trim();
        if level.eq_ignore_ascii_case("cantrip") {
            return Ok(SpellLevel::CANTRIP);
        }
        let number: i64 = level
            .parse()
            .map_err(|_| SpellLevelError::Invalid(level.to_string()))?;
        SpellLevel::from(number)
    }

    /// Get the level as a number
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Whether this is a cantrip
    pub fn is_cantrip(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SpellLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_cantrip() {
            write!(f, "Cantrip")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The JSON may hold either a number or a string
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSpellLevel {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for SpellLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawSpellLevel::deserialize(deserializer)? {
            RawSpellLevel::Number(number) => SpellLevel::from(number),
            RawSpellLevel::Text(text) => SpellLevel::parse(&text),
        }
        .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn range() {
        assert!(SpellLevel::from(-1).is_err());
        assert!(SpellLevel::from(10).is_err());
        assert_eq!(SpellLevel::from(9).unwrap().value(), 9);
    }

    #[test]
    fn parse() {
        assert_eq!(SpellLevel::parse("Cantrip"), Ok(SpellLevel::CANTRIP));
        assert_eq!(SpellLevel::parse(" 3 ").unwrap().value(), 3);
        assert!(SpellLevel::parse("third").is_err());
    }

    #[test]
    fn deserialize_number_or_string() {
        let level: SpellLevel = serde_json::from_str("4").unwrap();
        assert_eq!(level.value(), 4);
        let level: SpellLevel = serde_json::from_str(r#""cantrip""#).unwrap();
        assert!(level.is_cantrip());
        assert!(serde_json::from_str::<SpellLevel>("12").is_err());
        assert_eq!(level.to_string(), "Cantrip");
    }
}
