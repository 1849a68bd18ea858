// SPDX-License-Identifier: MIT

//!
//! Card geometry: mapping a design's percentages to surface units
//!

use crate::{Point, Position};
use serde::Serialize;
use spellcards_core::ElementConfig;
use std::fmt::Debug;

/// Points per millimetre
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// The printed card width
pub const CARD_WIDTH_MM: f64 = 63.0;

/// The printed card height
pub const CARD_HEIGHT_MM: f64 = 88.0;

/// Convert millimetres to points
pub fn mm_to_points(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// A box that specifies the location and size of something (e.g. the location
/// and size of an icon on a card)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositionAndSize {
    /// The smallest x/y values (boxes grow down and to the right from here)
    pub position: Position,

    /// The width of the box (from which the largest x value can be derived)
    pub width: f64,

    /// The height of the box (from which the largest y value can be derived)
    pub height: f64,
}

impl PositionAndSize {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Point { x, y },
            width,
            height,
        }
    }

    pub fn add_offset(&mut self, x_offset: f64, y_offset: f64) {
        self.position.x += x_offset;
        self.position.y += y_offset;
    }

    /// Calculate the largest x value of the box
    pub fn max_x(&self) -> f64 {
        self.position.x + self.width
    }

    /// Calculate the largest y value of the box (i.e. how far the box grows
    /// downwards)
    pub fn max_y(&self) -> f64 {
        self.position.y + self.height
    }
}

/// The size of a card on a surface (points for PDF, pixels for the preview).
/// Everything on a card is positioned relative to its top-left corner, with y
/// growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardGeometry {
    pub width: f64,
    pub height: f64,
}

impl CardGeometry {
    /// A printed card (63 x 88 mm, in points)
    pub fn pdf() -> Self {
        Self {
            width: mm_to_points(CARD_WIDTH_MM),
            height: mm_to_points(CARD_HEIGHT_MM),
        }
    }

    /// A preview card of the given pixel width (same aspect ratio as a printed
    /// card)
    pub fn preview(width_px: f64) -> Self {
        Self {
            width: width_px,
            height: width_px * CARD_HEIGHT_MM / CARD_WIDTH_MM,
        }
    }

    /// Horizontal position of an element
    pub fn px(&self, config: &ElementConfig) -> f64 {
        config.x() / 100.0 * self.width
    }

    /// Vertical position of an element
    pub fn py(&self, config: &ElementConfig) -> f64 {
        config.y() / 100.0 * self.height
    }

    /// The position of an element
    pub fn position(&self, config: &ElementConfig) -> Point {
        Point {
            x: self.px(config),
            y: self.py(config),
        }
    }

    /// A width given as a percentage of the card width
    pub fn fw(&self, percent: f64) -> f64 {
        percent / 100.0 * self.width
    }

    /// A height given as a percentage of the card height
    pub fn fh(&self, percent: f64) -> f64 {
        percent / 100.0 * self.height
    }

    /// The box of a sized element (e.g. an icon)
    pub fn position_and_size(&self, config: &ElementConfig) -> PositionAndSize {
        PositionAndSize {
            position: self.position(config),
            width: self.fw(config.width()),
            height: self.fh(config.height()),
        }
    }

    /// The whole card
    pub fn bounds(&self) -> PositionAndSize {
        PositionAndSize::new(0.0, 0.0, self.width, self.height)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(json: &str) -> ElementConfig {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn pdf_card_size() {
        let card = CardGeometry::pdf();
        assert!((card.width - 178.583).abs() < 0.001);
        assert!((card.height - 249.449).abs() < 0.001);
    }

    #[test]
    fn preview_card_size() {
        let card = CardGeometry::preview(300.0);
        assert_eq!(card.width, 300.0);
        assert!((card.height - 419.047).abs() < 0.001);
    }

    #[test]
    fn percentages() {
        let card = CardGeometry::preview(200.0);
        let config = config(r#"{"x": 10, "y": 50, "width": 25, "height": 5}"#);
        assert_eq!(card.px(&config), 20.0);
        assert!((card.py(&config) - card.height / 2.0).abs() < 1e-9);
        let bounds = card.position_and_size(&config);
        assert_eq!(bounds.width, 50.0);
        assert!((bounds.height - card.height * 0.05).abs() < 1e-9);
        assert_eq!(bounds.max_x(), 70.0);
    }

    #[test]
    fn missing_values_use_defaults() {
        let card = CardGeometry::preview(300.0);
        let bounds = card.position_and_size(&ElementConfig::new());
        assert_eq!(bounds.position, Point::default());
        assert_eq!(bounds.width, 30.0);
        assert!((bounds.height - card.height / 10.0).abs() < 1e-9);
    }
}
