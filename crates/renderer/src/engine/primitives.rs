// SPDX-License-Identifier: MIT

//!
//! Primitives
//!

use crate::{LineStyle, Point, PositionAndSize, colour::Colour};
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;

/// Information needed to draw text (one line, anchored at its top-left)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOut {
    pub top_left: Point,
    pub text: String,
    pub colour: Colour,
    pub font_size: f64,
}

impl TextOut {
    pub fn add_offset(&mut self, x_offset: f64, y_offset: f64) {
        self.top_left.x += x_offset;
        self.top_left.y += y_offset;
    }
}

/// Information needed to draw a box (filled, outlined, or both)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardBox {
    pub position_and_size: PositionAndSize,
    pub fill_colour: Option<Colour>,
    pub border_style: Option<LineStyle>,

    /// Corner radius (0 for square corners)
    pub roundness: f64,
}

/// Information needed to draw an ellipse inside a box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardEllipse {
    pub position_and_size: PositionAndSize,
    pub fill_colour: Colour,
    pub border_style: Option<LineStyle>,
}

/// What to draw in place of an image that can't be (or isn't) loaded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ImageFallback {
    /// Draw a box in the image's place
    Box(CardBox),

    /// Draw an ellipse in the image's place
    Ellipse(CardEllipse),

    /// Write a label instead
    Text(TextOut),
}

/// How an image is scaled into its box
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ImageFit {
    /// Fill the box exactly (the aspect ratio may change)
    Stretch,

    /// As large as fits, keeping the aspect ratio, anchored top-left
    #[default]
    Contain,
}

/// Information needed to draw an image scaled into a box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardImage {
    pub position_and_size: PositionAndSize,
    pub path: PathBuf,
    pub fit: ImageFit,

    /// 0 to 100
    pub opacity: f64,

    pub fallback: ImageFallback,
}

/// Something to draw on a card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CardPrimitive {
    Box(CardBox),
    Image(CardImage),
    Text(TextOut),
}

impl CardPrimitive {
    /// Move the primitive (e.g. from card-local to page coordinates)
    pub fn add_offset(&mut self, x_offset: f64, y_offset: f64) {
        match self {
            CardPrimitive::Box(card_box) => card_box.position_and_size.add_offset(x_offset, y_offset),
            CardPrimitive::Image(image) => {
                image.position_and_size.add_offset(x_offset, y_offset);
                match &mut image.fallback {
                    ImageFallback::Box(card_box) => {
                        card_box.position_and_size.add_offset(x_offset, y_offset)
                    }
                    ImageFallback::Ellipse(ellipse) => {
                        ellipse.position_and_size.add_offset(x_offset, y_offset)
                    }
                    ImageFallback::Text(text) => text.add_offset(x_offset, y_offset),
                }
            }
            CardPrimitive::Text(text) => text.add_offset(x_offset, y_offset),
        }
    }

    /// Get the text, if this is text
    pub fn as_text(&self) -> Option<&TextOut> {
        match self {
            CardPrimitive::Text(text) => Some(text),
            _ => None,
        }
    }
}
