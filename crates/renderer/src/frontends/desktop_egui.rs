// SPDX-License-Identifier: MIT

//!
//! The egui frontend (the interactive preview)
//!

use crate::{
    CardBox, CardEllipse, CardGeometry, CardLayoutEngine, CardPrimitive, ImageFallback,
    LayoutTarget, PositionAndSize, ellipse_points,
};
use eframe::egui::{
    Align2, Color32, Context, FontId, Pos2, Rect, Response, Sense, Shape, Stroke, StrokeKind, Ui,
    Vec2,
};
use log::*;
use spellcards_core::{DesignConfig, Spell};
use std::path::PathBuf;

/// The default width of a preview card (pixels)
pub const PREVIEW_CARD_WIDTH: f64 = 300.0;

/// Offset of the first card from the top-left of the canvas
const PREVIEW_ORIGIN: f32 = 10.0;

/// Horizontal space between cards
const PREVIEW_GAP: f32 = 40.0;

/// Space between a card and its caption
const CAPTION_OFFSET: f32 = 10.0;

const CAPTION_FONT_SIZE: f32 = 12.0;

/// Room left under the cards for the captions
const CAPTION_SPACE: f32 = 30.0;

/// Draws preview cards in an `egui` application
pub struct SpellCardPreviewEgui {
    /// The underlying layout [`CardLayoutEngine`].
    engine: CardLayoutEngine,
}

impl SpellCardPreviewEgui {
    /// Create a new preview renderer
    pub fn new(ctx: &Context) -> Self {
        info!("Constructing a new egui preview renderer");
        let ctx_clone = ctx.clone();
        let text_measurer =
            move |font_size, text| measure_text_fn(ctx_clone.clone(), font_size, text);
        Self {
            engine: CardLayoutEngine::new(text_measurer)
                .with_geometry(CardGeometry::preview(PREVIEW_CARD_WIDTH))
                .with_target(LayoutTarget::Preview),
        }
    }

    /// Set where icons & backdrops are found
    pub fn with_assets_dir<P: Into<PathBuf>>(mut self, assets_dir: P) -> Self {
        self.engine = self.engine.with_assets_dir(assets_dir);
        self
    }

    /// Set the width of each preview card (the height follows)
    pub fn set_card_width(&mut self, width_px: f64) {
        self.engine.set_geometry(CardGeometry::preview(width_px));
    }

    pub fn card_geometry(&self) -> CardGeometry {
        self.engine.geometry()
    }

    /// Draw a card per spell, side by side, each captioned with the spell's
    /// name
    pub fn draw(&mut self, ui: &mut Ui, design: &DesignConfig, spells: &[Spell]) -> Response {
        let geometry = self.engine.geometry();
        let card_width = geometry.width as f32;
        let card_height = geometry.height as f32;
        let count = spells.len().max(1) as f32;
        let size = Vec2::new(
            PREVIEW_ORIGIN + count * (card_width + PREVIEW_GAP),
            PREVIEW_ORIGIN + card_height + CAPTION_SPACE,
        );
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let canvas_min = response.rect.min.to_vec2();

        for (i, spell) in spells.iter().enumerate() {
            let x0 = PREVIEW_ORIGIN + i as f32 * (card_width + PREVIEW_GAP);
            let y0 = PREVIEW_ORIGIN;
            let mut layout = self.engine.resolve(design, spell);
            layout.add_offset(f64::from(x0 + canvas_min.x), f64::from(y0 + canvas_min.y));
            for primitive in &layout.primitives {
                draw_primitive(&painter, primitive);
            }

            // Caption
            painter.text(
                Pos2::new(x0 + card_width / 2.0, y0 + card_height + CAPTION_OFFSET) + canvas_min,
                Align2::CENTER_TOP,
                spell.name().as_str(),
                FontId::proportional(CAPTION_FONT_SIZE),
                Color32::BLACK,
            );
        }
        response
    }
}

/// Function supplied to the [`CardLayoutEngine`] so that it can measure text
/// (used in its calculations)
fn measure_text_fn(ctx: Context, font_size: f64, text: String) -> (f64, f64) {
    let text_galley = ctx.fonts_mut(|f| {
        f.layout_no_wrap(text, FontId::proportional(font_size as f32), Color32::BLACK)
    });
    let text_width: f64 = text_galley.rect.width().into();
    let text_height: f64 = text_galley.rect.height().into();
    (text_width, text_height)
}

/// Draw one primitive.  Images aren't loaded in the preview, so their fallback
/// is drawn instead.
fn draw_primitive(painter: &eframe::egui::Painter, primitive: &CardPrimitive) {
    match primitive {
        CardPrimitive::Box(card_box) => draw_box(painter, card_box),
        CardPrimitive::Image(image) => match &image.fallback {
            ImageFallback::Box(card_box) => draw_box(painter, card_box),
            ImageFallback::Ellipse(ellipse) => draw_ellipse(painter, ellipse),
            ImageFallback::Text(text) => {
                draw_primitive(painter, &CardPrimitive::Text(text.clone()))
            }
        },
        CardPrimitive::Text(text) => {
            let pos = Pos2::new(text.top_left.x as f32, text.top_left.y as f32);
            painter.text(
                pos,
                Align2::LEFT_TOP,
                &text.text,
                FontId::proportional(text.font_size as f32),
                Color32::from(text.colour),
            );
        }
    }
}

fn draw_box(painter: &eframe::egui::Painter, card_box: &CardBox) {
    let rect = position_and_size_to_egui_rect(&card_box.position_and_size);
    let fill = card_box
        .fill_colour
        .map(Color32::from)
        .unwrap_or(Color32::TRANSPARENT);
    let stroke = card_box
        .border_style
        .map(|style| {
            Stroke::new(
                style.thickness as f32,
                Color32::from(style.colour),
            )
        })
        .unwrap_or(Stroke::NONE);
    painter.rect(
        rect,
        card_box.roundness as f32,
        fill,
        stroke,
        StrokeKind::Inside,
    );
}

fn draw_ellipse(painter: &eframe::egui::Painter, ellipse: &CardEllipse) {
    let bounds = &ellipse.position_and_size;
    let points: Vec<Pos2> = ellipse_points(bounds.position, bounds.width, bounds.height)
        .into_iter()
        .map(|point| Pos2::new(point.x as f32, point.y as f32))
        .collect();
    let stroke = ellipse
        .border_style
        .map(|style| {
            Stroke::new(
                style.thickness as f32,
                Color32::from(style.colour),
            )
        })
        .unwrap_or(Stroke::NONE);
    painter.add(Shape::convex_polygon(
        points,
        Color32::from(ellipse.fill_colour),
        stroke,
    ));
}

/// Convert a [`PositionAndSize`] into an egui [`Rect`]
fn position_and_size_to_egui_rect(position_and_size: &PositionAndSize) -> Rect {
    let min = Pos2::new(
        position_and_size.position.x as f32,
        position_and_size.position.y as f32,
    );
    let max = Pos2::new(
        position_and_size.max_x() as f32,
        position_and_size.max_y() as f32,
    );
    Rect::from_two_pos(min, max)
}

#[cfg(test)]
mod test {
    use super::*;
    use eframe::egui::{CentralPanel, RawInput};
    use spellcards_core::{Name, School, SpellLevel};

    fn spells() -> Vec<Spell> {
        vec![
            Spell::new(
                Name::from("Fireball").unwrap(),
                SpellLevel::from(3).unwrap(),
                School::Evocation,
            )
            .with_description("Each creature takes 8d6 fire damage."),
            Spell::new(
                Name::from("Bless").unwrap(),
                SpellLevel::from(1).unwrap(),
                School::Enchantment,
            )
            .with_duration("Concentration, up to 1 minute"),
        ]
    }

    #[test]
    fn draws_cards_headless() {
        let ctx = Context::default();
        let mut preview = SpellCardPreviewEgui::new(&ctx);
        let design = DesignConfig::default();
        let spells = spells();
        let mut drawn_size = Vec2::ZERO;
        let output = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                drawn_size = preview.draw(ui, &design, &spells).rect.size();
            });
        });
        assert!(!output.shapes.is_empty());
        assert!(drawn_size.x >= 2.0 * PREVIEW_CARD_WIDTH as f32);
    }

    #[test]
    fn zero_font_size_draws() {
        let ctx = Context::default();
        let mut preview = SpellCardPreviewEgui::new(&ctx);
        let mut design = DesignConfig::default();
        design.element_mut("spell_name").set_from_str("font_size", "0");
        design.element_mut("damage_dice").set_from_str("font_size", "-3");
        let spells = spells();
        let output = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                preview.draw(ui, &design, &spells);
            });
        });
        assert!(!output.shapes.is_empty());
    }

    #[test]
    fn card_width() {
        let ctx = Context::default();
        let mut preview = SpellCardPreviewEgui::new(&ctx);
        assert_eq!(preview.card_geometry().width, PREVIEW_CARD_WIDTH);
        preview.set_card_width(150.0);
        assert_eq!(preview.card_geometry(), CardGeometry::preview(150.0));
    }

    #[test]
    fn rect_conversion() {
        let rect = position_and_size_to_egui_rect(&PositionAndSize::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(rect.min, Pos2::new(1.0, 2.0));
        assert_eq!(rect.max, Pos2::new(4.0, 6.0));
    }
}
