// SPDX-License-Identifier: MIT

//!
//! Times-Roman metrics (the built-in PDF font used for cards)
//!

/// Advance widths (1/1000 em) for the printable ASCII characters, starting at
/// the space (32)
const ASCII_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // space to /
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, // 0 to 9
    278, 278, 564, 564, 564, 444, 921, // : to @
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, // A to M
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, // N to Z
    333, 278, 333, 469, 500, 333, // [ to `
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, // a to m
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, // n to z
    480, 200, 480, 541, // { to ~
];

/// Width used for characters outside printable ASCII
const DEFAULT_WIDTH: u16 = 500;

/// Height of the ascender above the baseline (1/1000 em)
const ASCENT: f64 = 683.0;

/// Line height as a multiple of the font size
const LINE_SPACING: f64 = 1.15;

fn char_width(c: char) -> u16 {
    let code = c as u32;
    if (32..127).contains(&code) {
        ASCII_WIDTHS[(code - 32) as usize]
    } else {
        DEFAULT_WIDTH
    }
}

/// The width of text set in Times-Roman at the font size (points)
pub fn text_width(font_size: f64, text: &str) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    f64::from(units) * font_size / 1000.0
}

/// The height of a line of Times-Roman at the font size (points)
pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_SPACING
}

/// How far the baseline sits below the top of a line (points)
pub fn ascent(font_size: f64) -> f64 {
    font_size * ASCENT / 1000.0
}

/// Text measurement for the layout engine: `(width, height)`
pub fn measure_text(font_size: f64, text: String) -> (f64, f64) {
    (text_width(font_size, &text), line_height(font_size))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn widths() {
        assert_eq!(text_width(10.0, ""), 0.0);
        // W (944) + i (278) = 1222
        assert!((text_width(10.0, "Wi") - 12.22).abs() < 1e-9);
        assert_eq!(text_width(1000.0, " "), 250.0);
        assert_eq!(text_width(1000.0, "~"), 541.0);
        assert_eq!(text_width(1000.0, "é"), 500.0);
    }

    #[test]
    fn table_alignment() {
        assert_eq!(char_width('0'), 500);
        assert_eq!(char_width('A'), 722);
        assert_eq!(char_width('M'), 889);
        assert_eq!(char_width('Z'), 611);
        assert_eq!(char_width('a'), 444);
        assert_eq!(char_width('m'), 778);
        assert_eq!(char_width('z'), 444);
        assert_eq!(char_width('|'), 200);
    }

    #[test]
    fn measure() {
        let (width, height) = measure_text(10.0, String::from("ab"));
        assert!((width - 9.44).abs() < 1e-9);
        assert!((height - 11.5).abs() < 1e-9);
    }
}
