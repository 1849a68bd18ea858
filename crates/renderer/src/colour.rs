// SPDX-License-Identifier: MIT

//!
//! Parse, manipulate, and format colours used when drawing a card
//!

use eframe::egui;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A hex colour couldn't be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid hex colour: {0:?}")]
pub struct HexColourError(pub String);

/// The `Colour` type
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Colour {
    r: u8,
    g: u8,
    b: u8,
}

impl From<Colour> for egui::Color32 {
    fn from(value: Colour) -> Self {
        egui::Color32::from_rgb(value.r, value.g, value.b)
    }
}

impl Colour {
    pub const BLACK: Colour = Colour { r: 0, g: 0, b: 0 };
    pub const WHITE: Colour = Colour {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Create a colour from RGB values
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Colour { r, g, b }
    }

    /// Create a colour from a hex colour (e.g. `#ab66ef`, `ab66ef`, `#ab66efff`).
    /// If the hex value has an alpha component, it is removed.
    pub fn from_hex<S: AsRef<str>>(hex_colour: S) -> Result<Self, HexColourError> {
        let original = hex_colour.as_ref();
        let invalid = || HexColourError(original.to_string());
        let hex_colour = original.trim();
        let hex_colour = hex_colour.strip_prefix('#').unwrap_or(hex_colour);
        if !hex_colour.is_ascii() {
            return Err(invalid());
        }

        // Drop the alpha part
        let hex_colour = match hex_colour.len() {
            6 => hex_colour,
            8 => &hex_colour[0..6],
            _ => return Err(invalid()),
        };

        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex_colour[range], 16).map_err(|_| invalid())
        };
        Ok(Colour::from_rgb(
            component(0..2)?,
            component(2..4)?,
            component(4..6)?,
        ))
    }

    /// Get a colour as RGB values
    pub fn as_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Get the colour as RGB fractions (0.0 to 1.0)
    pub fn as_rgb_f32(&self) -> (f32, f32, f32) {
        (
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        )
    }

    /// Get the colour as, say, `#0affc3`
    pub fn to_hex(&self) -> String {
        // {:02x} means print as hex, requesting 2 chars (pad left with "0" if only 1 char otherwise)
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Simulate opacity by blending towards white.  `100` leaves the colour
    /// unchanged and `0` gives white.
    pub fn with_opacity(&self, percent: f64) -> Colour {
        let percent = percent.clamp(0.0, 100.0);
        let blend = |c: u8| {
            let c = f64::from(c);
            (c + (255.0 - c) * (100.0 - percent) / 100.0) as u8
        };
        Colour::from_rgb(blend(self.r), blend(self.g), blend(self.b))
    }
}
