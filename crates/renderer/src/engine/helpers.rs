// SPDX-License-Identifier: MIT

//!
//! Helper functions
//!

use crate::Point;
use std::f64::consts::{FRAC_PI_2, PI};

/// Number of straight segments used per quarter circle
const SEGMENTS_PER_QUARTER: usize = 8;

/// Shorten text to at most `max_chars` characters, ending it with "..." if it
/// was cut
pub(crate) fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Greedily break text into lines no wider than `max_width`.  Explicit line
/// breaks are kept, and a single word wider than `max_width` gets a line to
/// itself.
pub(crate) fn wrap_text<F>(text: &str, max_width: f64, measure_width: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
                continue;
            }
            let candidate = format!("{line} {word}");
            if measure_width(&candidate) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::take(&mut line));
                line.push_str(word);
            }
        }
        lines.push(line);
    }
    lines
}

/// The outline of a box with rounded corners, as a closed polygon (clockwise
/// with y growing downwards, starting at the top-left corner's arc)
pub fn rounded_rect_points(top_left: Point, width: f64, height: f64, radius: f64) -> Vec<Point> {
    let radius = radius.max(0.0).min(width / 2.0).min(height / 2.0);
    if radius <= 0.0 {
        return vec![
            top_left,
            Point::new(top_left.x + width, top_left.y),
            Point::new(top_left.x + width, top_left.y + height),
            Point::new(top_left.x, top_left.y + height),
        ];
    }

    // Corner centres with the angle each arc starts at
    let corners = [
        (Point::new(top_left.x + radius, top_left.y + radius), PI),
        (
            Point::new(top_left.x + width - radius, top_left.y + radius),
            PI + FRAC_PI_2,
        ),
        (
            Point::new(top_left.x + width - radius, top_left.y + height - radius),
            0.0,
        ),
        (
            Point::new(top_left.x + radius, top_left.y + height - radius),
            FRAC_PI_2,
        ),
    ];

    let mut points = Vec::with_capacity(4 * (SEGMENTS_PER_QUARTER + 1));
    for (centre, start) in corners {
        for step in 0..=SEGMENTS_PER_QUARTER {
            let angle = start + FRAC_PI_2 * step as f64 / SEGMENTS_PER_QUARTER as f64;
            points.push(Point::new(
                centre.x + radius * angle.cos(),
                centre.y + radius * angle.sin(),
            ));
        }
    }
    points
}

/// The outline of the ellipse that fits the box, as a closed polygon
pub fn ellipse_points(top_left: Point, width: f64, height: f64) -> Vec<Point> {
    let centre = Point::new(top_left.x + width / 2.0, top_left.y + height / 2.0);
    let segments = 4 * SEGMENTS_PER_QUARTER;
    (0..segments)
        .map(|step| {
            let angle = 2.0 * PI * step as f64 / segments as f64;
            Point::new(
                centre.x + width / 2.0 * angle.cos(),
                centre.y + height / 2.0 * angle.sin(),
            )
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn char_width(text: &str) -> f64 {
        text.chars().count() as f64
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 800), "short");
        let long = "a".repeat(801);
        let truncated = truncate_with_ellipsis(&long, 800);
        assert_eq!(truncated.chars().count(), 800);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_with_ellipsis(&"b".repeat(800), 800), "b".repeat(800));
    }

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("the quick brown fox jumps", 10.0, char_width);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_wrap_text_long_word_and_newlines() {
        let lines = wrap_text("a incomprehensibilities b\nc", 5.0, char_width);
        assert_eq!(lines, vec!["a", "incomprehensibilities", "b", "c"]);
        assert!(wrap_text("", 5.0, char_width).is_empty());
    }

    #[test]
    fn test_rounded_rect_points() {
        let square = rounded_rect_points(Point::new(1.0, 2.0), 10.0, 20.0, 0.0);
        assert_eq!(square.len(), 4);
        assert_eq!(square[2], Point::new(11.0, 22.0));

        let rounded = rounded_rect_points(Point::new(0.0, 0.0), 10.0, 20.0, 3.0);
        assert_eq!(rounded.len(), 4 * (SEGMENTS_PER_QUARTER + 1));
        for point in &rounded {
            assert!(point.x >= -1e-9 && point.x <= 10.0 + 1e-9);
            assert!(point.y >= -1e-9 && point.y <= 20.0 + 1e-9);
        }
        // First point is the left end of the top-left arc
        assert!((rounded[0].x - 0.0).abs() < 1e-9);
        assert!((rounded[0].y - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_ellipse_points() {
        let points = ellipse_points(Point::new(0.0, 0.0), 10.0, 4.0);
        assert_eq!(points.len(), 4 * SEGMENTS_PER_QUARTER);
        assert!((points[0].x - 10.0).abs() < 1e-9);
        assert!((points[0].y - 2.0).abs() < 1e-9);
    }
}
