// SPDX-License-Identifier: MIT

//!
//! The eight schools of magic
//!

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can arise when parsing a [`School`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchoolError {
    #[error("Unknown school of magic: {0:?}")]
    Unknown(String),
}

/// A school of magic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum School {
    Abjuration,
    Conjuration,
    Divination,
    Enchantment,
    Evocation,
    Illusion,
    Necromancy,
    Transmutation,
}

impl School {
    /// All schools, in alphabetical order
    pub const ALL: [School; 8] = [
        School::Abjuration,
        School::Conjuration,
        School::Divination,
        School::Enchantment,
        School::Evocation,
        School::Illusion,
        School::Necromancy,
        School::Transmutation,
    ];

    /// The lower case name (as used in data files and for palette lookups)
    pub fn as_str(&self) -> &'static str {
        match self {
            School::Abjuration => "abjuration",
            School::Conjuration => "conjuration",
            School::Divination => "divination",
            School::Enchantment => "enchantment",
            School::Evocation => "evocation",
            School::Illusion => "illusion",
            School::Necromancy => "necromancy",
            School::Transmutation => "transmutation",
        }
    }
}

impl FromStr for School {
    type Err = SchoolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        School::ALL
            .into_iter()
            .find(|school| school.as_str() == lower)
            .ok_or_else(|| SchoolError::Unknown(s.to_string()))
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}

impl Serialize for School {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for School {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let string = String::deserialize(deserializer)?;
        School::from_str(&string).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(School::from_str("Evocation"), Ok(School::Evocation));
        assert_eq!(School::from_str(" NECROMANCY "), Ok(School::Necromancy));
        assert!(School::from_str("pyromancy").is_err());
    }

    #[test]
    fn display_and_serde() {
        assert_eq!(School::Illusion.to_string(), "Illusion");
        let json = serde_json::to_string(&School::Divination).unwrap();
        assert_eq!(json, r#""divination""#);
        let school: School = serde_json::from_str(r#""Abjuration""#).unwrap();
        assert_eq!(school, School::Abjuration);
    }
}
