// SPDX-License-Identifier: MIT

//!
//! The `spellcards-renderer` engine
//!

mod colours;
mod consts;
mod geometry;
mod helpers;
mod point;
mod primitives;

pub(crate) use helpers::{truncate_with_ellipsis, wrap_text};

pub use colours::*;
pub use consts::*;
pub use geometry::*;
pub use helpers::{ellipse_points, rounded_rect_points};
pub use point::*;
pub use primitives::*;

use crate::colours::resolve_colour;
use log::debug;
use spellcards_core::{CardElement, DesignConfig, ElementConfig, Spell};
use std::path::{Path, PathBuf};

/// The surface a layout is for.  This only affects the background and how
/// missing damage icons are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutTarget {
    /// The on-screen preview (images aren't loaded)
    Preview,

    /// A printed (PDF) card
    #[default]
    Print,
}

/// Everything to draw for one card, in drawing order, relative to the card's
/// top-left corner (y grows downwards)
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub geometry: CardGeometry,
    pub primitives: Vec<CardPrimitive>,
}

impl CardLayout {
    /// All lines of text on the card
    pub fn texts(&self) -> impl Iterator<Item = &TextOut> {
        self.primitives.iter().filter_map(CardPrimitive::as_text)
    }

    /// Move everything (e.g. to where the card sits on a page)
    pub fn add_offset(&mut self, x_offset: f64, y_offset: f64) {
        for primitive in &mut self.primitives {
            primitive.add_offset(x_offset, y_offset);
        }
    }
}

/// Resolves a design for a spell into a [`CardLayout`].  The same engine is
/// used by the preview and PDF frontends, which supply their own text
/// measurement.
pub struct CardLayoutEngine {
    /// The function supplied to the engine that it can use to measure text.
    ///
    /// The engine passes the function the font size and the string, and the
    /// function returns the width and height of the text.
    ///
    /// i.e. `function(font_size, text) -> (width, height)`
    measure_text_fn: Box<dyn Fn(f64, String) -> (f64, f64)>,

    /// The size of the cards being laid out
    geometry: CardGeometry,

    /// The surface the cards are for
    target: LayoutTarget,

    /// Where icons & backdrops are found
    assets_dir: PathBuf,

    /// Backgrounds & placeholders
    colours: CardColours,
}

impl CardLayoutEngine {
    /// Create a new engine for printed cards.  Pass in a function that the
    /// engine can call to measure text
    pub fn new<T>(measure_text_fn: T) -> Self
    where
        T: 'static + Fn(f64, String) -> (f64, f64),
    {
        Self {
            measure_text_fn: Box::new(measure_text_fn),
            geometry: CardGeometry::pdf(),
            target: LayoutTarget::Print,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            colours: CardColours::default(),
        }
    }

    pub fn with_geometry(mut self, geometry: CardGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_target(mut self, target: LayoutTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_assets_dir<P: Into<PathBuf>>(mut self, assets_dir: P) -> Self {
        self.assets_dir = assets_dir.into();
        self
    }

    pub fn geometry(&self) -> CardGeometry {
        self.geometry
    }

    pub fn set_geometry(&mut self, geometry: CardGeometry) {
        self.geometry = geometry;
    }

    pub fn target(&self) -> LayoutTarget {
        self.target
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn colours(&self) -> CardColours {
        self.colours
    }

    pub fn set_colours(&mut self, colours: CardColours) {
        self.colours = colours;
    }

    /// Calculate the width of the string
    fn str_width(&self, font_size: f64, str: &str) -> f64 {
        (self.measure_text_fn)(font_size, str.to_string()).0
    }

    /// Calculate the height of a line of text
    fn line_height(&self, font_size: f64) -> f64 {
        (self.measure_text_fn)(font_size, LINE_HEIGHT_SAMPLE.to_string()).1
    }

    /// Lay out the card for a spell.  Primitives are in drawing order:
    /// background, frame, text, damage dice, then icons.
    pub fn resolve(&self, design: &DesignConfig, spell: &Spell) -> CardLayout {
        let mut primitives = Vec::new();
        self.layout_background(design, &mut primitives);
        self.layout_frame(design, spell, &mut primitives);
        self.layout_texts(design, spell, &mut primitives);
        self.layout_damage_dice(design, spell, &mut primitives);
        self.layout_icons(design, spell, &mut primitives);
        debug!(
            "Resolved {} primitives for {:?}",
            primitives.len(),
            spell.name().as_str()
        );
        CardLayout {
            geometry: self.geometry,
            primitives,
        }
    }

    fn layout_background(&self, design: &DesignConfig, primitives: &mut Vec<CardPrimitive>) {
        let config = design.element_or_default(CardElement::BackgroundImage);
        let fill_colour = match self.target {
            LayoutTarget::Print => self.colours.print_background,
            LayoutTarget::Preview => self.colours.preview_background.with_opacity(config.opacity()),
        };
        let background = CardBox {
            position_and_size: self.geometry.bounds(),
            fill_colour: Some(fill_colour),
            border_style: None,
            roundness: 0.0,
        };
        match config.path().map(Path::new).filter(|path| path.exists()) {
            Some(path) => primitives.push(CardPrimitive::Image(CardImage {
                position_and_size: self.geometry.bounds(),
                path: path.to_path_buf(),
                fit: ImageFit::Stretch,
                opacity: config.opacity(),
                fallback: ImageFallback::Box(background),
            })),
            None => primitives.push(CardPrimitive::Box(background)),
        }
    }

    fn layout_frame(&self, design: &DesignConfig, spell: &Spell, primitives: &mut Vec<CardPrimitive>) {
        let config = design.element_or_default(CardElement::Frame);
        primitives.push(CardPrimitive::Box(CardBox {
            position_and_size: self.geometry.bounds(),
            fill_colour: None,
            border_style: Some(LineStyle {
                colour: resolve_colour(&config, Some(spell)),
                thickness: config.thickness(),
            }),
            roundness: config.roundness(),
        }));
    }

    fn layout_texts(&self, design: &DesignConfig, spell: &Spell, primitives: &mut Vec<CardPrimitive>) {
        for element in CardElement::TEXT {
            let Some(config) = design.element(element) else {
                continue;
            };
            let Some(text) = card_text(element, spell) else {
                continue;
            };
            let max_width = element.wraps().then(|| {
                config
                    .max_width()
                    .map(|percent| self.geometry.fw(percent))
                    .unwrap_or_else(|| self.geometry.fw(DEFAULT_WRAP_WIDTH_PERCENT))
            });
            self.layout_text(config, spell, &text, max_width, primitives);
        }
    }

    /// Lay out (possibly wrapped) text with its top-left at the element's
    /// position
    fn layout_text(
        &self,
        config: &ElementConfig,
        spell: &Spell,
        text: &str,
        max_width: Option<f64>,
        primitives: &mut Vec<CardPrimitive>,
    ) {
        let font_size = config.font_size();
        let colour = resolve_colour(config, Some(spell));
        let lines = match max_width {
            Some(max_width) => wrap_text(text, max_width, |line| self.str_width(font_size, line)),
            None => vec![text.replace('\n', " ")],
        };
        let line_height = self.line_height(font_size);
        let top_left = self.geometry.position(config);
        for (i, line) in lines.into_iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            primitives.push(CardPrimitive::Text(TextOut {
                top_left: Point::new(top_left.x, top_left.y + i as f64 * line_height),
                text: line,
                colour,
                font_size,
            }));
        }
    }

    fn layout_damage_dice(
        &self,
        design: &DesignConfig,
        spell: &Spell,
        primitives: &mut Vec<CardPrimitive>,
    ) {
        let damage_dice = spell.damage_dice_for_card();
        if damage_dice.is_empty() {
            return;
        }
        let config = design.element_or_default(CardElement::DamageDice);
        let font_size = config.font_size();
        let colour = resolve_colour(&config, Some(spell));
        let icon_size = font_size + DAMAGE_ICON_EXTRA_SIZE;
        let Point { x, y } = self.geometry.position(&config);

        primitives.push(CardPrimitive::Text(TextOut {
            top_left: Point::new(x, y),
            text: DAMAGE_LABEL.to_string(),
            colour,
            font_size,
        }));

        let mut row_y = y + icon_size;
        for damage in &damage_dice {
            let icon_box = PositionAndSize::new(x, row_y, icon_size, icon_size);
            let (fallback, slot_width) = match self.target {
                LayoutTarget::Preview => (
                    ImageFallback::Ellipse(CardEllipse {
                        position_and_size: icon_box,
                        fill_colour: self.colours.damage_icon,
                        border_style: Some(self.colours.damage_icon_outline),
                    }),
                    icon_size,
                ),
                LayoutTarget::Print => {
                    let label = damage.fallback_label();
                    let label_width = self.str_width(font_size, &label);
                    (
                        ImageFallback::Text(TextOut {
                            top_left: Point::new(x, row_y),
                            text: label,
                            colour,
                            font_size,
                        }),
                        icon_size.max(label_width),
                    )
                }
            };
            primitives.push(CardPrimitive::Image(CardImage {
                position_and_size: icon_box,
                path: self
                    .assets_dir
                    .join(DAMAGE_ICONS_DIR)
                    .join(format!("{}.png", damage.icon_name())),
                fit: ImageFit::Contain,
                opacity: 100.0,
                fallback,
            }));
            primitives.push(CardPrimitive::Text(TextOut {
                top_left: Point::new(x + slot_width + DAMAGE_ROW_SPACING, row_y),
                text: format!("{} {}", damage.dice, damage.display_type()),
                colour,
                font_size,
            }));
            row_y += icon_size + DAMAGE_ROW_SPACING;
        }
    }

    fn layout_icons(&self, design: &DesignConfig, spell: &Spell, primitives: &mut Vec<CardPrimitive>) {
        for element in CardElement::ICONS {
            let Some(config) = design.element(element) else {
                continue;
            };
            let (shown, path, placeholder) = match element {
                CardElement::SchoolIcon => (
                    true,
                    self.assets_dir
                        .join(SCHOOL_ICONS_DIR)
                        .join(format!("{}.png", spell.school().as_str())),
                    self.colours.school_icon,
                ),
                CardElement::AreaIcon => (
                    spell.area_of_effect().is_some(),
                    self.assets_dir.join(AREA_ICON_FILE),
                    self.colours.area_icon,
                ),
                CardElement::ConcentrationIcon => (
                    spell.is_concentration(),
                    self.assets_dir.join(CONCENTRATION_ICON_FILE),
                    self.colours.concentration_icon,
                ),
                _ => continue,
            };
            if !shown {
                continue;
            }
            let position_and_size = self.geometry.position_and_size(config);
            let opacity = config.opacity();
            primitives.push(CardPrimitive::Image(CardImage {
                position_and_size,
                path,
                fit: ImageFit::Contain,
                opacity,
                fallback: ImageFallback::Box(CardBox {
                    position_and_size,
                    fill_colour: Some(placeholder.with_opacity(opacity)),
                    border_style: Some(self.colours.icon_outline),
                    roundness: 0.0,
                }),
            }));
        }
    }
}

/// The text a card shows for an element (`None` if there's nothing to show)
pub fn card_text(element: CardElement, spell: &Spell) -> Option<String> {
    let non_empty = |text: &str| {
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    };
    match element {
        CardElement::SpellName => Some(spell.name().as_str().to_string()),
        CardElement::SpellLevel => Some(format!("Level {}", spell.level().value())),
        CardElement::CastingTime => non_empty(spell.casting_time()),
        CardElement::Duration => non_empty(spell.duration()),
        CardElement::Range => non_empty(spell.range()).map(|range| format!("Range: {range}")),
        CardElement::AreaOfEffect => spell.area_of_effect().and_then(non_empty),
        CardElement::Components => non_empty(&spell.components().to_string())
            .map(|components| format!("Components: {components}")),
        CardElement::SaveDc => spell
            .attack_save_abbreviated()
            .as_deref()
            .and_then(non_empty)
            .map(|save| format!("Attack/Save: {save}")),
        CardElement::Description => non_empty(spell.description())
            .map(|description| truncate_with_ellipsis(&description, DESCRIPTION_MAX_CHARS)),
        _ => None,
    }
}
