// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting a word to a target width and drawing it glyph by glyph.
//!
//! Every letter gets the same box. Its width `w` is solved from
//!
//! ```text
//! target_width = w * (letters + (letters - 1) * letter_spacing + spaces * space_width)
//! ```
//!
//! and its height is `w / ASPECT_RATIO`. The run is then centered horizontally on the anchor
//! point, and every letter shares the anchor's vertical center.

use crate::context::DrawContext;
use crate::glyph::{DESIGN_SIZE, Letter, geometry};
use crate::kurbo::{Cap, Join, Point, Size};
use crate::peniko::Color;

/// Letter width divided by letter height.
pub const ASPECT_RATIO: f64 = 0.6;

/// How a character of input text takes part in layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    /// Drawn with a glyph and advanced past.
    Letter(Letter),
    /// Advances by the space width, draws nothing.
    Space,
    /// Neither drawn nor advanced past.
    Ignored,
}

/// Classify one character of input text.
pub fn classify(ch: char) -> CharClass {
    if ch == ' ' {
        CharClass::Space
    } else if let Some(letter) = Letter::from_char(ch) {
        CharClass::Letter(letter)
    } else {
        CharClass::Ignored
    }
}

/// The parameters for drawing one word.
#[derive(Clone, Debug)]
pub struct LayoutRequest {
    pub text: String,
    /// Total width of the run, from the left edge of the first letter to the right edge of
    /// the last, including spaces.
    pub target_width: f64,
    pub color: Color,
    /// Gap between adjacent letters, as a fraction of the letter width.
    pub letter_spacing: f64,
    /// Center of the run. Defaults to the center of the drawing surface.
    pub center: Option<Point>,
    /// Advance of a space, as a fraction of the letter width.
    pub space_width: f64,
    /// Stroke width, in glyph design units.
    pub line_width: f64,
}

impl LayoutRequest {
    pub const DEFAULT_LETTER_SPACING: f64 = 0.1;
    pub const DEFAULT_SPACE_WIDTH: f64 = 0.5;
    pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

    pub fn new(text: impl Into<String>, target_width: f64, color: Color) -> Self {
        Self {
            text: text.into(),
            target_width,
            color,
            letter_spacing: Self::DEFAULT_LETTER_SPACING,
            center: None,
            space_width: Self::DEFAULT_SPACE_WIDTH,
            line_width: Self::DEFAULT_LINE_WIDTH,
        }
    }

    pub fn with_letter_spacing(mut self, letter_spacing: f64) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn with_center(mut self, center: impl Into<Point>) -> Self {
        self.center = Some(center.into());
        self
    }

    pub fn with_space_width(mut self, space_width: f64) -> Self {
        self.space_width = space_width;
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    /// Measure the text. Returns `None` if it contains no letters.
    pub fn metrics(&self) -> Option<Metrics> {
        let (mut letter_count, mut space_count) = (0_usize, 0_usize);
        for ch in self.text.chars() {
            match classify(ch) {
                CharClass::Letter(_) => letter_count += 1,
                CharClass::Space => space_count += 1,
                CharClass::Ignored => {}
            }
        }
        if letter_count == 0 {
            return None;
        }
        let letters = letter_count as f64;
        let units = letters
            + (letters - 1.0) * self.letter_spacing
            + space_count as f64 * self.space_width;
        if units.is_nan() || units <= 0.0 {
            log::warn!("Spacing fractions leave no room for \"{}\"", self.text);
            return None;
        }
        let letter_width = self.target_width / units;
        let total_width = letters * letter_width
            + (letters - 1.0) * self.letter_spacing * letter_width
            + space_count as f64 * letter_width * self.space_width;
        Some(Metrics {
            letter_count,
            space_count,
            letter_width,
            letter_height: letter_width / ASPECT_RATIO,
            total_width,
        })
    }

    /// Compute where each letter goes on a surface of the given size.
    ///
    /// Returns the placements in input order; spaces and ignored characters produce none.
    pub fn placements(&self, surface: Size) -> Vec<Placement> {
        let Some(metrics) = self.metrics() else {
            return Vec::new();
        };
        let center = self
            .center
            .unwrap_or_else(|| Point::new(surface.width / 2.0, surface.height / 2.0));
        let w = metrics.letter_width;
        let size = Size::new(w, metrics.letter_height);

        let mut placements = Vec::with_capacity(metrics.letter_count);
        let mut x = center.x - metrics.total_width / 2.0 + w / 2.0;
        for ch in self.text.chars() {
            match classify(ch) {
                CharClass::Space => x += w * self.space_width,
                CharClass::Letter(letter) => {
                    placements.push(Placement {
                        letter,
                        center: Point::new(x, center.y),
                        size,
                    });
                    if placements.len() < metrics.letter_count {
                        x += w + self.letter_spacing * w;
                    }
                }
                CharClass::Ignored => {}
            }
        }
        placements
    }
}

/// The measured dimensions of a [`LayoutRequest`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metrics {
    pub letter_count: usize,
    pub space_count: usize,
    pub letter_width: f64,
    pub letter_height: f64,
    /// Width of the whole run. Equal to the target width, up to rounding.
    pub total_width: f64,
}

/// Where one letter of a word is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub letter: Letter,
    pub center: Point,
    pub size: Size,
}

impl Placement {
    pub fn left(&self) -> f64 {
        self.center.x - self.size.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.size.width / 2.0
    }
}

/// Stroke the glyph for `ch` so its design square fills a `size` box centered at `center`.
///
/// Returns `false`, drawing nothing, if `ch` has no glyph. `line_width` is in design units,
/// so it scales along with the glyph.
pub fn draw_glyph<C: DrawContext + ?Sized>(
    ctx: &mut C,
    ch: char,
    center: Point,
    size: Size,
    color: Color,
    line_width: f64,
) -> bool {
    let Some(glyph) = geometry(ch) else {
        log::trace!("No glyph for {ch:?}");
        return false;
    };

    ctx.save();
    ctx.translate(center.x, center.y);
    ctx.scale(size.width / DESIGN_SIZE, size.height / DESIGN_SIZE);
    ctx.translate(-DESIGN_SIZE / 2.0, -DESIGN_SIZE / 2.0);

    ctx.set_stroke_color(color);
    ctx.set_fill_color(color);
    ctx.set_line_width(line_width);
    ctx.set_line_cap(Cap::Round);
    ctx.set_line_join(Join::Round);

    ctx.begin_path();
    for subpath in glyph.subpaths() {
        let mut points = subpath;
        if let Some(start) = points.next() {
            ctx.move_to(start);
        }
        for point in points {
            ctx.line_to(point);
        }
    }
    ctx.stroke();

    ctx.restore();
    true
}

/// Lay out `request` and draw each of its letters.
///
/// Returns the placements that were drawn; empty when the text has no letters.
pub fn draw_word<C: DrawContext + ?Sized>(ctx: &mut C, request: &LayoutRequest) -> Vec<Placement> {
    let placements = request.placements(ctx.size());
    for placement in &placements {
        draw_glyph(
            ctx,
            placement.letter.to_char(),
            placement.center,
            placement.size,
            request.color,
            request.line_width,
        );
    }
    if let Some(first) = placements.first() {
        log::debug!(
            "Drew \"{}\" as {} letters of {:.2}x{:.2} at y {:.1}",
            request.text,
            placements.len(),
            first.size.width,
            first.size.height,
            first.center.y,
        );
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::{ASPECT_RATIO, CharClass, LayoutRequest, classify};
    use crate::glyph::Letter;
    use crate::kurbo::Size;
    use crate::peniko::color::palette;

    fn request(text: &str, width: f64) -> LayoutRequest {
        LayoutRequest::new(text, width, palette::css::WHITE)
    }

    #[test]
    fn classification() {
        assert_eq!(classify(' '), CharClass::Space);
        assert_eq!(classify('a'), CharClass::Letter(Letter::from_char('A').unwrap()));
        assert_eq!(classify('\t'), CharClass::Ignored);
        assert_eq!(classify('7'), CharClass::Ignored);
        assert_eq!(classify('Ä'), CharClass::Ignored);
    }

    #[test]
    fn letter_width_solves_the_width_equation() {
        // 4 letters, 1 space: 4 + 3 * 0.1 + 1 * 0.5 = 4.8 units.
        let metrics = request("AB CD", 480.0).metrics().unwrap();
        assert_eq!(metrics.letter_count, 4);
        assert_eq!(metrics.space_count, 1);
        assert!((metrics.letter_width - 100.0).abs() < 1e-9);
        assert!((metrics.letter_height - 100.0 / ASPECT_RATIO).abs() < 1e-9);
        assert!((metrics.total_width - 480.0).abs() < 1e-9);
    }

    #[test]
    fn no_letters_means_no_metrics() {
        assert!(request("", 100.0).metrics().is_none());
        assert!(request("   ", 100.0).metrics().is_none());
        assert!(request("123", 100.0).metrics().is_none());
    }

    #[test]
    fn degenerate_spacing_does_not_divide_by_zero() {
        // 2 + 1 * -1 = 1 unit is still a valid layout.
        assert!(request("AB", 100.0).with_letter_spacing(-1.0).metrics().is_some());
        // 2 + 1 * -2 = 0 units, and 2 + 1 * -3 = -1.
        for spacing in [-2.0, -3.0, f64::NAN] {
            let request = request("AB", 100.0).with_letter_spacing(spacing);
            assert!(request.metrics().is_none(), "{spacing}");
            assert!(request.placements(Size::new(10.0, 10.0)).is_empty(), "{spacing}");
        }
    }

    #[test]
    fn default_center_is_the_surface_center() {
        let placements = request("A", 60.0).placements(Size::new(200.0, 100.0));
        assert_eq!(placements.len(), 1);
        assert!((placements[0].center.x - 100.0).abs() < 1e-9);
        assert!((placements[0].center.y - 50.0).abs() < 1e-9);
        assert!((placements[0].size.width - 60.0).abs() < 1e-9);
    }

    #[test]
    fn explicit_center_wins() {
        let placements = request("AB", 210.0)
            .with_center((30.0, 40.0))
            .placements(Size::new(800.0, 600.0));
        let left = placements[0].left();
        let right = placements[1].right();
        assert!(((left + right) / 2.0 - 30.0).abs() < 1e-9);
        assert!(placements.iter().all(|p| p.center.y == 40.0));
    }
}
