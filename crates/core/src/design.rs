// SPDX-License-Identifier: MIT

//!
//! The card design configuration: per-element position, size, font and colour
//! settings, expressed as percentages of the card
//!

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The elements a card can be made of.  A design may hold other element names
/// too (they're kept, but ignored when drawing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardElement {
    BackgroundImage,
    Frame,
    SpellName,
    SpellLevel,
    CastingTime,
    Duration,
    Range,
    AreaOfEffect,
    Components,
    SaveDc,
    Description,
    DamageDice,
    SchoolIcon,
    AreaIcon,
    ConcentrationIcon,
}

impl CardElement {
    /// All elements, in drawing order
    pub const ALL: [CardElement; 15] = [
        CardElement::BackgroundImage,
        CardElement::Frame,
        CardElement::SpellName,
        CardElement::SpellLevel,
        CardElement::CastingTime,
        CardElement::Duration,
        CardElement::Range,
        CardElement::AreaOfEffect,
        CardElement::Components,
        CardElement::SaveDc,
        CardElement::Description,
        CardElement::DamageDice,
        CardElement::SchoolIcon,
        CardElement::AreaIcon,
        CardElement::ConcentrationIcon,
    ];

    /// The text elements, in drawing order
    pub const TEXT: [CardElement; 9] = [
        CardElement::SpellName,
        CardElement::SpellLevel,
        CardElement::CastingTime,
        CardElement::Duration,
        CardElement::Range,
        CardElement::AreaOfEffect,
        CardElement::Components,
        CardElement::SaveDc,
        CardElement::Description,
    ];

    /// The icon elements, in drawing order
    pub const ICONS: [CardElement; 3] = [
        CardElement::SchoolIcon,
        CardElement::AreaIcon,
        CardElement::ConcentrationIcon,
    ];

    /// The key used in design files
    pub fn key(&self) -> &'static str {
        match self {
            CardElement::BackgroundImage => "background_image",
            CardElement::Frame => "frame",
            CardElement::SpellName => "spell_name",
            CardElement::SpellLevel => "spell_level",
            CardElement::CastingTime => "casting_time",
            CardElement::Duration => "duration",
            CardElement::Range => "range",
            CardElement::AreaOfEffect => "area_of_effect",
            CardElement::Components => "components",
            CardElement::SaveDc => "save_dc",
            CardElement::Description => "description",
            CardElement::DamageDice => "damage_dice",
            CardElement::SchoolIcon => "school_icon",
            CardElement::AreaIcon => "area_icon",
            CardElement::ConcentrationIcon => "concentration_icon",
        }
    }

    /// Whether text drawn for this element wraps
    pub fn wraps(&self) -> bool {
        !matches!(
            self,
            CardElement::SpellName | CardElement::SpellLevel | CardElement::Range
        )
    }
}

impl FromStr for CardElement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CardElement::ALL
            .into_iter()
            .find(|element| element.key() == s)
            .ok_or_else(|| format!("Unknown card element: {s}"))
    }
}

impl fmt::Display for CardElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// How an element's colour is chosen
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourMode {
    /// Always the configured colour
    #[default]
    Single,

    /// The colour of the spell's first class
    Class,

    /// The colour of the spell's school
    School,
}

impl FromStr for ColourMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" => Ok(ColourMode::Single),
            "class" => Ok(ColourMode::Class),
            "school" => Ok(ColourMode::School),
            other => Err(format!("Unknown colour mode: {other}")),
        }
    }
}

/// Default values used for options missing from an element's config
pub mod defaults {
    pub const POSITION: f64 = 0.0;
    pub const SIZE: f64 = 10.0;
    pub const FONT_SIZE: f64 = 10.0;
    pub const MIN_FONT_SIZE: f64 = 1.0;
    pub const COLOUR: &str = "#000000";
    pub const OPACITY: f64 = 100.0;
    pub const THICKNESS: f64 = 1.0;
    pub const ROUNDNESS: f64 = 0.0;
}

/// The configuration of a single element.  Any JSON object is accepted: known
/// options are read with a fallback to defaults, unknown ones are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementConfig(Map<String, Value>);

impl ElementConfig {
    /// Create an empty config (all defaults)
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Read a number, falling back to `default` if it's missing or not a number
    fn number(&self, key: &str, default: f64) -> f64 {
        match self.0.get(key) {
            None => default,
            Some(value) => value.as_f64().unwrap_or_else(|| {
                warn!("Design option {key:?} is not a number ({value}), using {default}");
                default
            }),
        }
    }

    /// Read a string, falling back to `default` if it's missing or not a string
    fn string<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.0.get(key) {
            None => default,
            Some(Value::String(string)) => string,
            Some(value) => {
                warn!("Design option {key:?} is not a string ({value}), using {default:?}");
                default
            }
        }
    }

    /// Horizontal position (% of card width)
    pub fn x(&self) -> f64 {
        self.number("x", defaults::POSITION)
    }

    /// Vertical position (% of card height, from the top)
    pub fn y(&self) -> f64 {
        self.number("y", defaults::POSITION)
    }

    /// Width (% of card width)
    pub fn width(&self) -> f64 {
        self.number("width", defaults::SIZE)
    }

    /// Height (% of card height)
    pub fn height(&self) -> f64 {
        self.number("height", defaults::SIZE)
    }

    /// Text wrap width (% of card width) if set
    pub fn max_width(&self) -> Option<f64> {
        self.0
            .contains_key("max_width")
            .then(|| self.number("max_width", defaults::SIZE))
    }

    /// Font size (never below [`defaults::MIN_FONT_SIZE`])
    pub fn font_size(&self) -> f64 {
        self.number("font_size", defaults::FONT_SIZE)
            .max(defaults::MIN_FONT_SIZE)
    }

    /// The configured colour as a hex string
    pub fn colour(&self) -> &str {
        self.string("color", defaults::COLOUR)
    }

    pub fn mode(&self) -> ColourMode {
        let mode = self.string("mode", "single");
        ColourMode::from_str(mode).unwrap_or_else(|error| {
            warn!("{error}, using single");
            ColourMode::Single
        })
    }

    /// Opacity in percent (0-100)
    pub fn opacity(&self) -> f64 {
        self.number("opacity", defaults::OPACITY).clamp(0.0, 100.0)
    }

    /// Line thickness
    pub fn thickness(&self) -> f64 {
        self.number("thickness", defaults::THICKNESS).max(0.0)
    }

    /// Corner radius
    pub fn roundness(&self) -> f64 {
        self.number("roundness", defaults::ROUNDNESS).max(0.0)
    }

    /// An image path (empty strings count as unset)
    pub fn path(&self) -> Option<&str> {
        let path = self.string("path", "");
        (!path.trim().is_empty()).then_some(path)
    }

    /// Get a raw option
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a raw option
    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }

    /// Set an option from user input.  Numbers are stored as numbers (integers
    /// where possible), everything else as a string.
    pub fn set_from_str(&mut self, key: &str, input: &str) {
        let input = input.trim();
        let value = match input.parse::<f64>() {
            Ok(number) if number.fract() == 0.0 && number.abs() < i64::MAX as f64 => {
                Value::from(number as i64)
            }
            Ok(number) => Number::from_f64(number)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(input.to_string())),
            Err(_) => Value::String(input.to_string()),
        };
        self.set(key, value);
    }

    /// Remove an option (it falls back to its default)
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }
}

/// A card design: element name -> element config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DesignConfig(BTreeMap<String, ElementConfig>);

impl DesignConfig {
    /// Create an empty design (only the frame and damage dice are drawn, with
    /// default settings)
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Get the config of an element (if it's in the design)
    pub fn element(&self, element: CardElement) -> Option<&ElementConfig> {
        self.0.get(element.key())
    }

    /// Get the config of an element by name
    pub fn element_by_name(&self, name: &str) -> Option<&ElementConfig> {
        self.0.get(name)
    }

    /// Get the config of an element, or an all-defaults config if it's not in
    /// the design
    pub fn element_or_default(&self, element: CardElement) -> ElementConfig {
        self.element(element).cloned().unwrap_or_default()
    }

    /// Get a mutable config of an element by name, creating it if need be
    pub fn element_mut(&mut self, name: &str) -> &mut ElementConfig {
        self.0.entry(name.to_string()).or_default()
    }

    /// Remove an element (it won't be drawn)
    pub fn remove_element(&mut self, name: &str) -> Option<ElementConfig> {
        self.0.remove(name)
    }

    /// The number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        let value = json!({
            "background_image": {"path": "", "opacity": 100},
            "frame": {"color": "#333333", "mode": "school", "thickness": 2, "roundness": 6},
            "spell_name": {"x": 6, "y": 4, "font_size": 12, "color": "#000000"},
            "spell_level": {"x": 72, "y": 4.5, "font_size": 8, "color": "#444444"},
            "casting_time": {"x": 6, "y": 12, "font_size": 7, "max_width": 42},
            "range": {"x": 52, "y": 12, "font_size": 7},
            "duration": {"x": 6, "y": 17, "font_size": 7, "max_width": 42},
            "components": {"x": 52, "y": 17, "font_size": 7, "max_width": 42},
            "area_of_effect": {"x": 6, "y": 22, "font_size": 7, "max_width": 42},
            "save_dc": {"x": 52, "y": 22, "font_size": 7, "max_width": 42},
            "description": {"x": 6, "y": 29, "font_size": 7, "max_width": 88},
            "damage_dice": {"x": 6, "y": 80, "font_size": 7},
            "school_icon": {"x": 80, "y": 86, "width": 12, "height": 9, "opacity": 100},
            "area_icon": {"x": 68, "y": 88, "width": 8, "height": 6, "opacity": 60},
            "concentration_icon": {"x": 58, "y": 88, "width": 8, "height": 6, "opacity": 60}
        });
        serde_json::from_value(value).unwrap_or_else(|_| DesignConfig::empty())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_for_missing_options() {
        let config = ElementConfig::new();
        assert_eq!(config.x(), 0.0);
        assert_eq!(config.y(), 0.0);
        assert_eq!(config.width(), 10.0);
        assert_eq!(config.height(), 10.0);
        assert_eq!(config.max_width(), None);
        assert_eq!(config.font_size(), 10.0);
        assert_eq!(config.colour(), "#000000");
        assert_eq!(config.mode(), ColourMode::Single);
        assert_eq!(config.opacity(), 100.0);
        assert_eq!(config.thickness(), 1.0);
        assert_eq!(config.roundness(), 0.0);
        assert_eq!(config.path(), None);
    }

    #[test]
    fn wrong_types_fall_back() {
        let config: ElementConfig =
            serde_json::from_str(r#"{"x": "left", "mode": "rainbow", "color": 7, "opacity": 250}"#)
                .unwrap();
        assert_eq!(config.x(), 0.0);
        assert_eq!(config.mode(), ColourMode::Single);
        assert_eq!(config.colour(), "#000000");
        assert_eq!(config.opacity(), 100.0);
    }

    #[test]
    fn font_size_has_a_minimum() {
        let zero: ElementConfig = serde_json::from_str(r#"{"font_size": 0}"#).unwrap();
        assert_eq!(zero.font_size(), defaults::MIN_FONT_SIZE);
        let negative: ElementConfig = serde_json::from_str(r#"{"font_size": -4}"#).unwrap();
        assert_eq!(negative.font_size(), defaults::MIN_FONT_SIZE);
        let small: ElementConfig = serde_json::from_str(r#"{"font_size": 1.5}"#).unwrap();
        assert_eq!(small.font_size(), 1.5);
    }

    #[test]
    fn reads_values() {
        let config: ElementConfig = serde_json::from_str(
            r##"{"x": 12.5, "y": 40, "max_width": 80, "mode": "class", "color": "#ff0000", "custom": true}"##,
        )
        .unwrap();
        assert_eq!(config.x(), 12.5);
        assert_eq!(config.y(), 40.0);
        assert_eq!(config.max_width(), Some(80.0));
        assert_eq!(config.mode(), ColourMode::Class);
        assert_eq!(config.colour(), "#ff0000");
        assert_eq!(config.get("custom"), Some(&Value::Bool(true)));
    }

    #[test]
    fn set_from_str() {
        let mut config = ElementConfig::new();
        config.set_from_str("x", "15");
        config.set_from_str("y", "12.5");
        config.set_from_str("color", "#123456");
        assert_eq!(config.get("x"), Some(&Value::from(15)));
        assert_eq!(config.y(), 12.5);
        assert_eq!(config.colour(), "#123456");
    }

    #[test]
    fn edit_elements() {
        let mut design = DesignConfig::default();
        design.element_mut("spell_name").set_from_str("font_size", "14");
        assert_eq!(design.element_or_default(CardElement::SpellName).font_size(), 14.0);
        assert_eq!(
            design.element_mut("spell_name").remove("font_size"),
            Some(Value::from(14))
        );
        assert_eq!(design.element_or_default(CardElement::SpellName).font_size(), 10.0);
        assert!(design.remove_element("area_icon").is_some());
        assert!(design.element(CardElement::AreaIcon).is_none());
        assert!(design.remove_element("area_icon").is_none());
    }

    #[test]
    fn unknown_elements_are_kept() {
        let json = r#"{"frame": {"thickness": 3}, "sparkles": {"x": 1}}"#;
        let design: DesignConfig = serde_json::from_str(json).unwrap();
        assert_eq!(design.len(), 2);
        assert!(design.element_by_name("sparkles").is_some());
        assert_eq!(design.element_or_default(CardElement::Frame).thickness(), 3.0);
        assert_eq!(design.element_or_default(CardElement::SpellName).font_size(), 10.0);
        let back: DesignConfig =
            serde_json::from_str(&serde_json::to_string(&design).unwrap()).unwrap();
        assert_eq!(design, back);
    }

    #[test]
    fn default_design_has_every_element() {
        let design = DesignConfig::default();
        for element in CardElement::ALL {
            assert!(design.element(element).is_some(), "{element} missing");
        }
    }

    #[test]
    fn element_keys_round_trip() {
        for element in CardElement::ALL {
            assert_eq!(CardElement::from_str(element.key()), Ok(element));
        }
        assert!(!CardElement::SpellName.wraps());
        assert!(CardElement::Description.wraps());
    }
}
