// SPDX-License-Identifier: MIT

//!
//! Constants
//!

/// Descriptions longer than this (in characters) are cut short
pub const DESCRIPTION_MAX_CHARS: usize = 800;

/// Text without a `max_width` wraps at this percentage of the card width
pub const DEFAULT_WRAP_WIDTH_PERCENT: f64 = 90.0;

/// A damage dice icon is this much bigger than the font size
pub const DAMAGE_ICON_EXTRA_SIZE: f64 = 4.0;

/// Space between a damage dice icon and its text, and between rows
pub const DAMAGE_ROW_SPACING: f64 = 5.0;

/// The label written above the damage dice rows
pub const DAMAGE_LABEL: &str = "Damage:";

/// Text used to measure the height of a line of text
pub const LINE_HEIGHT_SAMPLE: &str = "lpfHT";

/// Directory (under the assets directory) holding school icons
pub const SCHOOL_ICONS_DIR: &str = "school";

/// Directory (under the assets directory) holding damage type icons
pub const DAMAGE_ICONS_DIR: &str = "dmg";

/// The area of effect icon (under the assets directory)
pub const AREA_ICON_FILE: &str = "icons/area.png";

/// The concentration icon (under the assets directory)
pub const CONCENTRATION_ICON_FILE: &str = "icons/concentration.png";

/// The default directory holding icons & backdrops
pub const DEFAULT_ASSETS_DIR: &str = "assets";
