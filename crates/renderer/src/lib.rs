// SPDX-License-Identifier: MIT

//!
//! *Part of the wider spell cards project*
//!
//! This crate draws spell cards.  The core of the crate is a platform
//! independent layout engine responsible for:
//!
//! - Turning a card design (percentages of the card) into absolute coordinates
//!   for the surface being drawn on
//! - Working out the colour of each element (single, class, or school colours)
//! - Producing the text shown on a card (labels, truncation, wrapping)
//!
//! The engine produces a list of drawing primitives which frontends draw.  The
//! 2 currently offered frontends are:
//!
//! - `egui` for the interactive preview
//! - PDF for printable sheets (nine cards to an A4 page, with optional
//!   backsides and cut marks)
//!

pub mod colour;
pub mod colours;
pub mod engine;
pub mod frontends;

pub use colour::*;
pub use colours::*;
pub use engine::*;
pub use frontends::desktop_egui::SpellCardPreviewEgui;
pub use frontends::pdf::{Backside, ExportError, PdfExportOptions, SpellCardRendererPdf};
