// SPDX-License-Identifier: MIT

//!
//! The PDF frontend (printable sheets of cards)
//!

mod times;

pub use times::{ascent, line_height, measure_text, text_width};

use crate::{
    CARD_HEIGHT_MM, CARD_WIDTH_MM, CardBox, CardEllipse, CardGeometry, CardImage, CardLayoutEngine,
    CardPrimitive, Colour, ImageFallback, ImageFit, LayoutTarget, LineStyle, Point, PositionAndSize,
    TextOut, ellipse_points, mm_to_points, rounded_rect_points,
};
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbImage};
use log::{debug, info, warn};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Polygon, Px,
    Rgb,
};
use spellcards_core::{Collection, DesignConfig, Spell};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A4 width
pub const PAGE_WIDTH_MM: f64 = 210.0;

/// A4 height
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Space above the first row of cards
pub const MARGIN_MM: f64 = 10.0;

/// Space between neighbouring cards
pub const SPACING_MM: f64 = 5.0;

pub const CARDS_PER_ROW: usize = 3;
pub const CARDS_PER_COLUMN: usize = 3;
pub const CARDS_PER_PAGE: usize = CARDS_PER_ROW * CARDS_PER_COLUMN;

/// Length of each cut mark line
pub const CUT_MARK_LENGTH_MM: f64 = 2.0;

/// Cut mark line thickness (points)
pub const CUT_MARK_THICKNESS: f64 = 0.2;

/// Cut mark grey level (0 is black, 1 is white)
pub const CUT_MARK_GREY: f32 = 0.5;

/// The bundled backside image (in the assets directory)
pub const PRESET_BACKSIDE_FILE: &str = "backdrop_1.png";

/// Raster resolution images are resized to for backsides
const BACKSIDE_DPI: f64 = 300.0;

/// Resolution assumed for images before scaling them into their box
const IMAGE_DPI: f32 = 300.0;

const LAYER_NAME: &str = "Cards";

/// Errors that can occur when exporting cards
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no spells to export
    #[error("Nothing to export: the collection is empty")]
    NothingToExport,

    /// An error occured when working with a file or directory
    #[error(transparent)]
    StdIo(#[from] std::io::Error),

    /// The PDF couldn't be created or written
    #[error("Failed to create PDF: {0}")]
    Pdf(String),

    /// An image couldn't be loaded
    #[error("Failed to load image {path}: {message}")]
    Image { path: PathBuf, message: String },
}

/// What's printed on the back of the cards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Backside {
    /// No backside pages
    #[default]
    None,

    /// The bundled backdrop
    Preset,

    /// An image of the user's choosing
    Custom(PathBuf),
}

impl Backside {
    /// The image to print, if any
    pub fn image_path(&self, assets_dir: &Path) -> Option<PathBuf> {
        match self {
            Backside::None => None,
            Backside::Preset => Some(assets_dir.join(PRESET_BACKSIDE_FILE)),
            Backside::Custom(path) => Some(path.clone()),
        }
    }
}

/// How cards are exported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfExportOptions {
    /// The document title
    pub title: String,

    /// Where icons & backdrops are found
    pub assets_dir: PathBuf,

    pub backside: Backside,

    /// Whether to print cut marks at the corners of each card
    pub cut_marks: bool,
}

impl Default for PdfExportOptions {
    fn default() -> Self {
        Self {
            title: String::from("Spell cards"),
            assets_dir: PathBuf::from(crate::DEFAULT_ASSETS_DIR),
            backside: Backside::None,
            cut_marks: false,
        }
    }
}

/// The page width in points
pub fn page_width() -> f64 {
    mm_to_points(PAGE_WIDTH_MM)
}

/// The page height in points
pub fn page_height() -> f64 {
    mm_to_points(PAGE_HEIGHT_MM)
}

/// The number of pages needed for the cards (fronts only)
pub fn page_count(card_count: usize) -> usize {
    card_count.div_ceil(CARDS_PER_PAGE)
}

/// A printed page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sheet {
    /// The fronts of the cards at these indices
    Fronts(Range<usize>),

    /// A full page of card backs
    Backs,
}

impl Sheet {
    /// The number of card slots filled on the page
    pub fn slots(&self) -> usize {
        match self {
            Sheet::Fronts(range) => range.len(),
            Sheet::Backs => CARDS_PER_PAGE,
        }
    }
}

/// The pages printed for the cards: the fronts nine to a page, then (with a
/// backside) one page of backs per page of fronts
pub fn sheet_plan(card_count: usize, backside: bool) -> Vec<Sheet> {
    let fronts = page_count(card_count);
    let mut sheets: Vec<Sheet> = (0..fronts)
        .map(|page| {
            let start = page * CARDS_PER_PAGE;
            Sheet::Fronts(start..card_count.min(start + CARDS_PER_PAGE))
        })
        .collect();
    if backside {
        sheets.extend(std::iter::repeat_n(Sheet::Backs, fronts));
    }
    sheets
}

/// Every cut mark line on the page (one set per filled slot)
pub fn sheet_cut_marks(sheet: &Sheet, geometry: CardGeometry) -> Vec<(Point, Point)> {
    (0..sheet.slots())
        .flat_map(|slot| cut_mark_segments(card_origin(slot), geometry))
        .collect()
}

/// The top-left corner (points, measured from the top of the page) of the card
/// in the slot.  The grid is centred horizontally.
pub fn card_origin(slot: usize) -> Point {
    let slot = slot % CARDS_PER_PAGE;
    let column = (slot % CARDS_PER_ROW) as f64;
    let row = (slot / CARDS_PER_ROW) as f64;
    let grid_width = CARDS_PER_ROW as f64 * CARD_WIDTH_MM + (CARDS_PER_ROW - 1) as f64 * SPACING_MM;
    let x = (PAGE_WIDTH_MM - grid_width) / 2.0 + column * (CARD_WIDTH_MM + SPACING_MM);
    let top = MARGIN_MM + row * (CARD_HEIGHT_MM + SPACING_MM);
    Point::new(mm_to_points(x), mm_to_points(top))
}

/// The cut mark lines for a card (points, measured from the top of the page):
/// two short lines along the edges at each corner
pub fn cut_mark_segments(top_left: Point, geometry: CardGeometry) -> Vec<(Point, Point)> {
    let length = mm_to_points(CUT_MARK_LENGTH_MM);
    let Point { x, y } = top_left;
    let (w, h) = (geometry.width, geometry.height);
    vec![
        // Top
        (Point::new(x, y), Point::new(x + length, y)),
        (Point::new(x + w - length, y), Point::new(x + w, y)),
        // Bottom
        (Point::new(x, y + h), Point::new(x + length, y + h)),
        (Point::new(x + w - length, y + h), Point::new(x + w, y + h)),
        // Left
        (Point::new(x, y), Point::new(x, y + length)),
        (Point::new(x, y + h - length), Point::new(x, y + h)),
        // Right
        (Point::new(x + w, y), Point::new(x + w, y + length)),
        (Point::new(x + w, y + h - length), Point::new(x + w, y + h)),
    ]
}

/// The file a collection is exported to
pub fn output_path(output_dir: &Path, collection_name: &str) -> PathBuf {
    output_dir.join(format!("spellcards_{collection_name}.pdf"))
}

/// Flip a y value measured from the top of the page to one measured from the
/// bottom (PDF's origin is bottom-left)
pub fn flip_y(y: f64) -> f64 {
    page_height() - y
}

/// Convert points to the units `printpdf` positions things in
fn pt_to_mm(pt: f64) -> Mm {
    Mm((pt * 25.4 / 72.0) as f32)
}

/// A `printpdf` point from a point measured from the top of the page
fn pdf_point(point: Point) -> printpdf::Point {
    printpdf::Point::new(pt_to_mm(point.x), pt_to_mm(flip_y(point.y)))
}

fn pdf_colour(colour: Colour) -> Color {
    let (r, g, b) = colour.as_rgb_f32();
    Color::Rgb(Rgb::new(r, g, b, None))
}

/// Load an image from disk
fn load_image(path: &Path) -> Result<DynamicImage, ExportError> {
    image::open(path).map_err(|error| ExportError::Image {
        path: path.to_path_buf(),
        message: error.to_string(),
    })
}

/// Images loaded during one export (failures are remembered too)
#[derive(Default)]
struct ImageCache(HashMap<PathBuf, Option<DynamicImage>>);

impl ImageCache {
    fn get(&mut self, path: &Path) -> Option<&DynamicImage> {
        self.0
            .entry(path.to_path_buf())
            .or_insert_with(|| match load_image(path) {
                Ok(image) => Some(image),
                Err(error) => {
                    warn!("{error}");
                    None
                }
            })
            .as_ref()
    }
}

/// Composite an image against white, fading it by the opacity (0 to 100)
fn flatten_onto_white(image: &DynamicImage, opacity: f64) -> RgbImage {
    let rgba_image = image.to_rgba8();
    let (width_px, height_px) = rgba_image.dimensions();
    let opacity = (opacity.clamp(0.0, 100.0) / 100.0) as f32;
    let mut rgb_image = RgbImage::new(width_px, height_px);
    for (x, y, pixel) in rgba_image.enumerate_pixels() {
        let Rgba([r, g, b, a]) = *pixel;
        let alpha = a as f32 / 255.0 * opacity;
        let bg = 255.0;
        let out_r = (r as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_g = (g as f32 * alpha + bg * (1.0 - alpha)) as u8;
        let out_b = (b as f32 * alpha + bg * (1.0 - alpha)) as u8;
        rgb_image.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }
    rgb_image
}

/// The size an image of the given pixel dimensions is drawn at inside the box
fn fitted_size(width_px: u32, height_px: u32, bounds: &PositionAndSize, fit: ImageFit) -> (f64, f64) {
    match fit {
        ImageFit::Stretch => (bounds.width, bounds.height),
        ImageFit::Contain => {
            let aspect_ratio = f64::from(width_px) / f64::from(height_px.max(1));
            if bounds.width / bounds.height.max(f64::EPSILON) > aspect_ratio {
                // Height-constrained
                (bounds.height * aspect_ratio, bounds.height)
            } else {
                // Width-constrained
                (bounds.width, bounds.width / aspect_ratio)
            }
        }
    }
}

/// Writes cards to PDF
pub struct SpellCardRendererPdf {
    /// The underlying layout [`CardLayoutEngine`].
    engine: CardLayoutEngine,

    options: PdfExportOptions,
}

impl SpellCardRendererPdf {
    pub fn new(options: PdfExportOptions) -> Self {
        info!("Constructing a new PDF renderer");
        Self {
            engine: CardLayoutEngine::new(measure_text)
                .with_geometry(CardGeometry::pdf())
                .with_target(LayoutTarget::Print)
                .with_assets_dir(options.assets_dir.clone()),
            options,
        }
    }

    pub fn options(&self) -> &PdfExportOptions {
        &self.options
    }

    /// Export the collection to `<output_dir>/spellcards_<name>.pdf`,
    /// returning the path written
    pub fn export_collection(
        &self,
        design: &DesignConfig,
        collection: &Collection,
        output_dir: &Path,
    ) -> Result<PathBuf, ExportError> {
        let path = output_path(output_dir, collection.name());
        self.export(design, collection.spells(), &path)?;
        Ok(path)
    }

    /// Export the spells to a PDF file (parent directories are created)
    pub fn export(
        &self,
        design: &DesignConfig,
        spells: &[Spell],
        path: &Path,
    ) -> Result<(), ExportError> {
        let doc = self.render(design, spells)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        info!("Exported {} cards to {}", spells.len(), path.display());
        Ok(())
    }

    /// Export the spells to PDF bytes
    pub fn export_to_bytes(
        &self,
        design: &DesignConfig,
        spells: &[Spell],
    ) -> Result<Vec<u8>, ExportError> {
        self.render(design, spells)?
            .save_to_bytes()
            .map_err(|e| ExportError::Pdf(e.to_string()))
    }

    /// Build the document: the card fronts (nine to a page), then a backside
    /// page per front page if a backside is wanted
    pub fn render(
        &self,
        design: &DesignConfig,
        spells: &[Spell],
    ) -> Result<PdfDocumentReference, ExportError> {
        if spells.is_empty() {
            return Err(ExportError::NothingToExport);
        }
        let backside_path = self.options.backside.image_path(&self.options.assets_dir);
        let sheets = sheet_plan(spells.len(), backside_path.is_some());
        info!("Exporting {} cards on {} page(s)", spells.len(), sheets.len());

        let (doc, page1, layer1) = PdfDocument::new(
            &self.options.title,
            Mm(PAGE_WIDTH_MM as f32),
            Mm(PAGE_HEIGHT_MM as f32),
            LAYER_NAME,
        );
        let font = doc
            .add_builtin_font(BuiltinFont::TimesRoman)
            .map_err(|e| ExportError::Pdf(e.to_string()))?;
        let mut images = ImageCache::default();
        let geometry = self.engine.geometry();
        let backside = backside_path.and_then(|path| load_backside(&path));

        for (page_index, sheet) in sheets.iter().enumerate() {
            let layer = if page_index == 0 {
                doc.get_page(page1).get_layer(layer1)
            } else {
                new_page(&doc)
            };
            match sheet {
                Sheet::Fronts(range) => {
                    for (slot, spell) in spells[range.clone()].iter().enumerate() {
                        let origin = card_origin(slot);
                        let mut layout = self.engine.resolve(design, spell);
                        layout.add_offset(origin.x, origin.y);
                        for primitive in &layout.primitives {
                            draw_primitive(&layer, &font, &mut images, primitive);
                        }
                    }
                }
                Sheet::Backs => {
                    if let Some(backside) = &backside {
                        for slot in 0..CARDS_PER_PAGE {
                            let origin = card_origin(slot);
                            let bounds = PositionAndSize::new(
                                origin.x,
                                origin.y,
                                geometry.width,
                                geometry.height,
                            );
                            add_image(&layer, backside.clone(), &bounds, ImageFit::Stretch);
                        }
                    }
                }
            }
            if self.options.cut_marks {
                draw_cut_marks(&layer, &sheet_cut_marks(sheet, geometry));
            }
            debug!("Page {} ({sheet:?}) done", page_index + 1);
        }
        Ok(doc)
    }
}

/// Load the backside image at card size.  If it can't be loaded the backside
/// pages are left blank (with cut marks if wanted).
fn load_backside(path: &Path) -> Option<RgbImage> {
    let width_px = (CARD_WIDTH_MM / 25.4 * BACKSIDE_DPI).round() as u32;
    let height_px = (CARD_HEIGHT_MM / 25.4 * BACKSIDE_DPI).round() as u32;
    match load_image(path) {
        Ok(image) => Some(flatten_onto_white(
            &image.resize_exact(width_px, height_px, FilterType::Triangle),
            100.0,
        )),
        Err(error) => {
            warn!("{error}, leaving the backsides blank");
            None
        }
    }
}

fn new_page(doc: &PdfDocumentReference) -> PdfLayerReference {
    let (page, layer) = doc.add_page(
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        LAYER_NAME,
    );
    doc.get_page(page).get_layer(layer)
}

fn draw_primitive(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    images: &mut ImageCache,
    primitive: &CardPrimitive,
) {
    match primitive {
        CardPrimitive::Box(card_box) => draw_box(layer, card_box),
        CardPrimitive::Image(image) => draw_image(layer, font, images, image),
        CardPrimitive::Text(text) => draw_text(layer, font, text),
    }
}

fn draw_text(layer: &PdfLayerReference, font: &IndirectFontRef, text: &TextOut) {
    let baseline = text.top_left.y + ascent(text.font_size);
    layer.set_fill_color(pdf_colour(text.colour));
    layer.use_text(
        text.text.clone(),
        text.font_size as f32,
        pt_to_mm(text.top_left.x),
        pt_to_mm(flip_y(baseline)),
        font,
    );
}

/// Fill and/or outline a closed shape given by its outline points
fn draw_shape(
    layer: &PdfLayerReference,
    points: Vec<Point>,
    fill_colour: Option<Colour>,
    border_style: Option<LineStyle>,
) {
    let points: Vec<(printpdf::Point, bool)> = points
        .into_iter()
        .map(|point| (pdf_point(point), false))
        .collect();
    if let Some(fill_colour) = fill_colour {
        layer.set_fill_color(pdf_colour(fill_colour));
        layer.add_polygon(Polygon {
            rings: vec![points.clone()],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }
    if let Some(border_style) = border_style {
        if border_style.thickness > 0.0 {
            layer.set_outline_color(pdf_colour(border_style.colour));
            layer.set_outline_thickness(border_style.thickness as f32);
            layer.add_line(Line {
                points,
                is_closed: true,
            });
        }
    }
}

fn draw_box(layer: &PdfLayerReference, card_box: &CardBox) {
    let bounds = &card_box.position_and_size;
    let points = rounded_rect_points(bounds.position, bounds.width, bounds.height, card_box.roundness);
    draw_shape(layer, points, card_box.fill_colour, card_box.border_style);
}

fn draw_ellipse(layer: &PdfLayerReference, ellipse: &CardEllipse) {
    let bounds = &ellipse.position_and_size;
    let points = ellipse_points(bounds.position, bounds.width, bounds.height);
    draw_shape(layer, points, Some(ellipse.fill_colour), ellipse.border_style);
}

/// Draw an image, or its fallback if it can't be loaded
fn draw_image(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    images: &mut ImageCache,
    image: &CardImage,
) {
    match images.get(&image.path) {
        Some(loaded) => {
            let flattened = flatten_onto_white(loaded, image.opacity);
            add_image(layer, flattened, &image.position_and_size, image.fit);
        }
        None => match &image.fallback {
            ImageFallback::Box(card_box) => draw_box(layer, card_box),
            ImageFallback::Ellipse(ellipse) => draw_ellipse(layer, ellipse),
            ImageFallback::Text(text) => draw_text(layer, font, text),
        },
    }
}

/// Embed an RGB image scaled into the box (anchored at its top-left)
fn add_image(layer: &PdfLayerReference, rgb_image: RgbImage, bounds: &PositionAndSize, fit: ImageFit) {
    let (width_px, height_px) = rgb_image.dimensions();
    if width_px == 0 || height_px == 0 {
        return;
    }
    let (width, height) = fitted_size(width_px, height_px, bounds, fit);

    // Size of the image at IMAGE_DPI, which is then scaled to fit
    let natural_width = f64::from(width_px) / f64::from(IMAGE_DPI) * 72.0;
    let natural_height = f64::from(height_px) / f64::from(IMAGE_DPI) * 72.0;

    let image = Image::from(ImageXObject {
        width: Px(width_px as usize),
        height: Px(height_px as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: rgb_image.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(pt_to_mm(bounds.position.x)),
            translate_y: Some(pt_to_mm(flip_y(bounds.position.y + height))),
            scale_x: Some((width / natural_width) as f32),
            scale_y: Some((height / natural_height) as f32),
            dpi: Some(IMAGE_DPI),
            ..Default::default()
        },
    );
}

fn draw_cut_marks(layer: &PdfLayerReference, segments: &[(Point, Point)]) {
    layer.set_outline_color(Color::Rgb(Rgb::new(
        CUT_MARK_GREY,
        CUT_MARK_GREY,
        CUT_MARK_GREY,
        None,
    )));
    layer.set_outline_thickness(CUT_MARK_THICKNESS as f32);
    for (start, end) in segments {
        layer.add_line(Line {
            points: vec![(pdf_point(*start), false), (pdf_point(*end), false)],
            is_closed: false,
        });
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use spellcards_core::{DamageDice, Name, School, SpellLevel};
    use tempdir::TempDir;

    fn spells(count: usize) -> Vec<Spell> {
        (0..count)
            .map(|i| {
                Spell::new(
                    Name::from(format!("Spell {i}")).unwrap(),
                    SpellLevel::from((i % 10) as i64).unwrap(),
                    School::ALL[i % 8],
                )
                .with_classes(["Wizard"])
                .with_duration("Concentration, up to 1 minute")
                .with_area_of_effect("10-foot cube")
                .with_damage_dice(vec![DamageDice::new("2d6", "fire")])
                .with_description("A long description of what happens. ".repeat(10))
            })
            .collect()
    }

    /// The number of page objects in a saved document
    fn count_pages(bytes: &[u8]) -> usize {
        let marker = b"/Type/Page";
        bytes
            .windows(marker.len() + 1)
            .filter(|window| window.starts_with(marker) && window[marker.len()] != b's')
            .count()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} != {b}");
    }

    #[test]
    fn pages() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(9), 1);
        assert_eq!(page_count(10), 2);
        assert_eq!(page_count(27), 3);
    }

    #[test]
    fn sheets_with_and_without_backsides() {
        let fronts_only = sheet_plan(11, false);
        assert_eq!(fronts_only, vec![Sheet::Fronts(0..9), Sheet::Fronts(9..11)]);

        let with_backs = sheet_plan(11, true);
        assert_eq!(with_backs.len(), 4);
        assert_eq!(&with_backs[..2], &fronts_only[..]);
        assert_eq!(&with_backs[2..], &[Sheet::Backs, Sheet::Backs]);

        assert_eq!(sheet_plan(9, true).len(), 2);
        assert!(sheet_plan(0, true).is_empty());
    }

    #[test]
    fn backs_have_cut_marks_in_every_slot() {
        let geometry = CardGeometry::pdf();
        let sheets = sheet_plan(11, true);
        let counts: Vec<usize> = sheets
            .iter()
            .map(|sheet| sheet_cut_marks(sheet, geometry).len())
            .collect();
        assert_eq!(counts, vec![9 * 8, 2 * 8, 9 * 8, 9 * 8]);

        // The backs line up with the full front page
        assert_eq!(
            sheet_cut_marks(&Sheet::Backs, geometry),
            sheet_cut_marks(&sheets[0], geometry)
        );
    }

    #[test]
    fn grid_is_centred() {
        // (210 - (3 * 63 + 2 * 5)) / 2 = 5.5
        let first = card_origin(0);
        assert_close(first.x, mm_to_points(5.5));
        assert_close(first.y, mm_to_points(10.0));

        let last = card_origin(8);
        assert_close(last.x, mm_to_points(5.5 + 2.0 * 68.0));
        assert_close(last.y, mm_to_points(10.0 + 2.0 * 93.0));

        // The grid is symmetric
        let right_edge = last.x + CardGeometry::pdf().width;
        assert_close(page_width() - right_edge, first.x);

        // Slots repeat on the next page
        assert_eq!(card_origin(9), first);
    }

    #[test]
    fn cut_marks() {
        let geometry = CardGeometry::pdf();
        let segments = cut_mark_segments(Point::new(10.0, 20.0), geometry);
        assert_eq!(segments.len(), 8);
        for (start, end) in &segments {
            let length = ((end.x - start.x).powi(2) + (end.y - start.y).powi(2)).sqrt();
            assert_close(length, mm_to_points(CUT_MARK_LENGTH_MM));
        }
        assert_eq!(segments[0].0, Point::new(10.0, 20.0));
        assert_close(segments[7].1.x, 10.0 + geometry.width);
        assert_close(segments[7].1.y, 20.0 + geometry.height);
    }

    #[test]
    fn y_is_flipped() {
        assert_close(flip_y(0.0), page_height());
        assert_close(flip_y(page_height()), 0.0);
    }

    #[test]
    fn backside_paths() {
        let assets = Path::new("/assets");
        assert_eq!(Backside::None.image_path(assets), None);
        assert_eq!(
            Backside::Preset.image_path(assets),
            Some(PathBuf::from("/assets/backdrop_1.png"))
        );
        assert_eq!(
            Backside::Custom(PathBuf::from("/tmp/back.png")).image_path(assets),
            Some(PathBuf::from("/tmp/back.png"))
        );
    }

    #[test]
    fn image_fitting() {
        let bounds = PositionAndSize::new(0.0, 0.0, 20.0, 10.0);
        assert_eq!(fitted_size(100, 100, &bounds, ImageFit::Contain), (10.0, 10.0));
        assert_eq!(fitted_size(400, 100, &bounds, ImageFit::Contain), (20.0, 5.0));
        assert_eq!(fitted_size(100, 100, &bounds, ImageFit::Stretch), (20.0, 10.0));
    }

    #[test]
    fn flatten_respects_alpha_and_opacity() {
        let mut rgba = image::RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 0]));
        let image = DynamicImage::ImageRgba8(rgba);
        let opaque = flatten_onto_white(&image, 100.0);
        assert_eq!(opaque.get_pixel(0, 0), &image::Rgb([0, 0, 0]));
        assert_eq!(opaque.get_pixel(1, 0), &image::Rgb([255, 255, 255]));
        let faded = flatten_onto_white(&image, 0.0);
        assert_eq!(faded.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }

    #[test]
    fn nothing_to_export() {
        let renderer = SpellCardRendererPdf::new(PdfExportOptions::default());
        assert!(matches!(
            renderer.export_to_bytes(&DesignConfig::default(), &[]),
            Err(ExportError::NothingToExport)
        ));
    }

    #[test]
    fn export_to_bytes() {
        let renderer = SpellCardRendererPdf::new(PdfExportOptions {
            assets_dir: PathBuf::from("/nonexistent-assets"),
            cut_marks: true,
            ..Default::default()
        });
        let bytes = renderer
            .export_to_bytes(&DesignConfig::default(), &spells(11))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn rendered_page_count() {
        let dir = TempDir::new("spellcards").unwrap();
        let backside = dir.path().join("back.png");
        image::RgbaImage::new(4, 4).save(&backside).unwrap();

        let fronts_only = SpellCardRendererPdf::new(PdfExportOptions {
            assets_dir: PathBuf::from("/nonexistent-assets"),
            cut_marks: true,
            ..Default::default()
        });
        let bytes = fronts_only
            .export_to_bytes(&DesignConfig::default(), &spells(11))
            .unwrap();
        assert_eq!(count_pages(&bytes), 2);

        let with_backs = SpellCardRendererPdf::new(PdfExportOptions {
            assets_dir: PathBuf::from("/nonexistent-assets"),
            backside: Backside::Custom(backside),
            cut_marks: true,
            ..Default::default()
        });
        let bytes = with_backs
            .export_to_bytes(&DesignConfig::default(), &spells(11))
            .unwrap();
        assert_eq!(count_pages(&bytes), 4);
    }

    #[test]
    fn export_collection_with_images() {
        let dir = TempDir::new("spellcards").unwrap();
        let assets = dir.path().join("assets");
        fs::create_dir_all(assets.join("school")).unwrap();
        fs::create_dir_all(assets.join("dmg")).unwrap();
        let mut icon = image::RgbaImage::new(8, 8);
        icon.put_pixel(3, 3, Rgba([200, 0, 0, 128]));
        icon.save(assets.join("school/abjuration.png")).unwrap();
        icon.save(assets.join("dmg/dmg_fire.png")).unwrap();
        icon.save(assets.join(PRESET_BACKSIDE_FILE)).unwrap();

        let renderer = SpellCardRendererPdf::new(PdfExportOptions {
            assets_dir: assets.clone(),
            backside: Backside::Preset,
            cut_marks: true,
            ..Default::default()
        });
        let collection = Collection::from_spells("Test Set", spells(3));
        let output_dir = dir.path().join("output/nested");
        let path = renderer
            .export_collection(&DesignConfig::default(), &collection, &output_dir)
            .unwrap();
        assert_eq!(path, output_dir.join("spellcards_Test Set.pdf"));
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn missing_backside_degrades() {
        let renderer = SpellCardRendererPdf::new(PdfExportOptions {
            backside: Backside::Custom(PathBuf::from("/nonexistent/back.png")),
            ..Default::default()
        });
        assert!(
            renderer
                .export_to_bytes(&DesignConfig::default(), &spells(1))
                .is_ok()
        );
    }
}
