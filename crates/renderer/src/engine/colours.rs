// SPDX-License-Identifier: MIT

//!
//! Fixed colours & line styles used when laying out a card
//!

use crate::colour::Colour;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub colour: Colour,
    pub thickness: f64,
}

/// Colours that aren't part of a design (backgrounds & placeholders)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardColours {
    /// The background of a printed card without a background image
    pub print_background: Colour,

    /// The preview background (faded by the background opacity)
    pub preview_background: Colour,

    /// Placeholder for the school icon
    pub school_icon: Colour,

    /// Placeholder for the area of effect icon
    pub area_icon: Colour,

    /// Placeholder for the concentration icon
    pub concentration_icon: Colour,

    /// Outline of the icon placeholders
    pub icon_outline: LineStyle,

    /// Placeholder for a damage type icon
    pub damage_icon: Colour,

    /// Outline of the damage type icon placeholders
    pub damage_icon_outline: LineStyle,
}

impl Default for CardColours {
    fn default() -> Self {
        Self {
            print_background: Colour::WHITE,
            preview_background: Colour::from_rgb(0xdd, 0xdd, 0xdd),
            school_icon: Colour::from_rgb(0x88, 0x88, 0xff),
            area_icon: Colour::from_rgb(0x88, 0xcc, 0x88),
            concentration_icon: Colour::from_rgb(0xff, 0x88, 0x88),
            icon_outline: LineStyle {
                colour: Colour::from_rgb(0x22, 0x22, 0x22),
                thickness: 1.0,
            },
            damage_icon: Colour::from_rgb(0xff, 0xaa, 0xaa),
            damage_icon_outline: LineStyle {
                colour: Colour::from_rgb(0x66, 0x00, 0x00),
                thickness: 1.0,
            },
        }
    }
}
