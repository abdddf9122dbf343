// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Turning a raster back into vector outlines.
//!
//! The sketch only needs one capability from a tracer: take a rendered [`Pixmap`] and some
//! configuration, and eventually produce an SVG document. [`Tracer`] is that capability.
//! [`RunTracer`] is a simple built-in implementation which outlines ink pixels as axis-aligned
//! rectangles, so the feedback loop degrades curves into stairs.

use core::fmt::Write as _;
use core::future::Future;
use std::collections::BTreeMap;

use clap::{Args, ValueEnum};
use thiserror::Error;
use vello_cpu::Pixmap;
use vello_cpu::peniko::color::PremulRgba8;

/// How ambiguous corners are resolved when decomposing a bitmap into paths.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum TurnPolicy {
    Black,
    White,
    Left,
    Right,
    #[default]
    Minority,
    Majority,
}

/// Tracing parameters, following Potrace's naming.
///
/// `threshold` and `turd_size` are honored by [`RunTracer`]; the remaining fields are passed
/// through for tracers which fit curves.
#[derive(Args, Clone, Debug, PartialEq)]
pub struct TraceConfig {
    #[arg(help_heading = "Potrace Config")]
    #[arg(long = "turdsize", default_value_t = 2)]
    /// Suppress speckles of up to this many pixels
    pub turd_size: u32,
    #[arg(help_heading = "Potrace Config")]
    #[arg(long = "turnpolicy", value_enum, default_value_t = TurnPolicy::Minority)]
    /// How to resolve ambiguities in path decomposition
    pub turn_policy: TurnPolicy,
    #[arg(help_heading = "Potrace Config")]
    #[arg(long = "alphamax", default_value_t = 1.0)]
    /// Corner threshold, from 0 (sharp) to 1.334 (smooth)
    pub alpha_max: f64,
    #[arg(help_heading = "Potrace Config")]
    #[arg(long = "optcurve", default_value_t = true, action = clap::ArgAction::Set)]
    /// Whether to join adjacent Bézier segments
    pub opt_curve: bool,
    #[arg(help_heading = "Potrace Config")]
    #[arg(long = "opttolerance", default_value_t = 0.2)]
    /// How far curve optimization may stray from the pixel outline
    pub opt_tolerance: f64,
    #[arg(help_heading = "Potrace Config")]
    #[arg(long, default_value_t = 128)]
    /// Luminance separating ink from background
    pub threshold: u8,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            turd_size: 2,
            turn_policy: TurnPolicy::Minority,
            alpha_max: 1.0,
            opt_curve: true,
            opt_tolerance: 0.2,
            threshold: 128,
        }
    }
}

/// Errors produced by a [`Tracer`].
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum TraceError {
    #[error("Nothing to trace, the raster is empty")]
    EmptyRaster,
    /// An external tracing backend reported a failure.
    #[error("Tracing backend failed: {0}")]
    Backend(String),
}

/// Converts a raster into an SVG document.
pub trait Tracer {
    fn trace(
        &self,
        raster: &Pixmap,
        config: &TraceConfig,
    ) -> impl Future<Output = Result<String, TraceError>>;
}

/// A 1-bit image of which pixels count as ink.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    ink: Vec<bool>,
}

impl Bitmap {
    /// Threshold `pixmap` by luminance.
    ///
    /// Whichever side of the threshold covers the majority of pixels is taken to be the
    /// background, so both light-on-dark and dark-on-light rasters trace their foreground.
    pub fn from_pixmap(pixmap: &Pixmap, threshold: u8) -> Self {
        let light: Vec<bool> = pixmap
            .data()
            .iter()
            .map(|&p| luminance(p) >= f32::from(threshold))
            .collect();
        let light_count = light.iter().filter(|&&l| l).count();
        let light_background = light_count * 2 > light.len();
        Self {
            width: usize::from(pixmap.width()),
            height: usize::from(pixmap.height()),
            ink: light.into_iter().map(|l| l != light_background).collect(),
        }
    }

    /// Build a bitmap from text rows, where `#` is ink.
    ///
    /// # Panics
    ///
    /// If the rows don't all have the same length.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.len());
        assert!(
            rows.iter().all(|row| row.len() == width),
            "bitmap rows must all be {width} long"
        );
        let ink = rows
            .iter()
            .flat_map(|row| row.bytes().map(|b| b == b'#'))
            .collect();
        Self { width, height, ink }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.ink[y * self.width + x]
    }

    pub fn ink_count(&self) -> usize {
        self.ink.iter().filter(|&&i| i).count()
    }

    /// Clear 4-connected groups of ink of at most `turd_size` pixels.
    pub fn despeckle(&mut self, turd_size: u32) {
        if turd_size == 0 {
            return;
        }
        let limit = turd_size as usize;
        let mut seen = vec![false; self.ink.len()];
        let mut stack = Vec::new();
        let mut component = Vec::new();
        for start in 0..self.ink.len() {
            if !self.ink[start] || seen[start] {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            component.clear();
            while let Some(idx) = stack.pop() {
                component.push(idx);
                let (x, y) = (idx % self.width, idx / self.width);
                let mut visit = |n: usize| {
                    if self.ink[n] && !seen[n] {
                        seen[n] = true;
                        stack.push(n);
                    }
                };
                if x > 0 {
                    visit(idx - 1);
                }
                if x + 1 < self.width {
                    visit(idx + 1);
                }
                if y > 0 {
                    visit(idx - self.width);
                }
                if y + 1 < self.height {
                    visit(idx + self.width);
                }
            }
            if component.len() <= limit {
                for &idx in &component {
                    self.ink[idx] = false;
                }
            }
        }
    }

    /// Cover the ink with rectangles `(x0, y0, x1, y1)`, end-exclusive.
    ///
    /// Each row is split into horizontal runs, and a run continues the rectangle above it when
    /// both span exactly the same columns.
    pub fn rects(&self) -> Vec<(usize, usize, usize, usize)> {
        let mut rects = Vec::new();
        // (x0, x1) -> y0
        let mut open: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for y in 0..self.height {
            let runs = self.runs(y);
            open.retain(|&(x0, x1), &mut y0| {
                let continues = runs.contains(&(x0, x1));
                if !continues {
                    rects.push((x0, y0, x1, y));
                }
                continues
            });
            for run in runs {
                open.entry(run).or_insert(y);
            }
        }
        rects.extend(
            open.into_iter()
                .map(|((x0, x1), y0)| (x0, y0, x1, self.height)),
        );
        rects.sort_unstable_by_key(|&(x0, y0, _, _)| (y0, x0));
        rects
    }

    fn runs(&self, y: usize) -> Vec<(usize, usize)> {
        let row = &self.ink[y * self.width..(y + 1) * self.width];
        let mut runs = Vec::new();
        let mut start = None;
        for (x, &ink) in row.iter().enumerate() {
            match (ink, start) {
                (true, None) => start = Some(x),
                (false, Some(x0)) => {
                    runs.push((x0, x));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(x0) = start {
            runs.push((x0, self.width));
        }
        runs
    }
}

/// A tracer which outlines ink as pixel-aligned rectangles.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunTracer;

impl RunTracer {
    /// Trace synchronously.
    pub fn trace_now(&self, raster: &Pixmap, config: &TraceConfig) -> Result<String, TraceError> {
        if raster.width() == 0 || raster.height() == 0 {
            return Err(TraceError::EmptyRaster);
        }
        let mut bitmap = Bitmap::from_pixmap(raster, config.threshold);
        bitmap.despeckle(config.turd_size);
        let ink = ink_color(raster, &bitmap);
        let rects = bitmap.rects();
        log::debug!(
            "Traced {} ink pixels into {} rectangles",
            bitmap.ink_count(),
            rects.len()
        );
        Ok(to_svg(bitmap.width(), bitmap.height(), &rects, ink))
    }
}

impl Tracer for RunTracer {
    fn trace(
        &self,
        raster: &Pixmap,
        config: &TraceConfig,
    ) -> impl Future<Output = Result<String, TraceError>> {
        core::future::ready(self.trace_now(raster, config))
    }
}

fn luminance(p: PremulRgba8) -> f32 {
    // Rec. 709 weights on the premultiplied values, which is fine for an opaque canvas.
    0.2126 * f32::from(p.r) + 0.7152 * f32::from(p.g) + 0.0722 * f32::from(p.b)
}

/// The average color of the ink pixels, as `[r, g, b]`.
fn ink_color(raster: &Pixmap, bitmap: &Bitmap) -> [u8; 3] {
    let mut sum = [0_u64; 3];
    let mut count = 0_u64;
    for (idx, p) in raster.data().iter().enumerate() {
        if bitmap.ink[idx] {
            sum[0] += u64::from(p.r);
            sum[1] += u64::from(p.g);
            sum[2] += u64::from(p.b);
            count += 1;
        }
    }
    if count == 0 {
        return [0, 0, 0];
    }
    sum.map(|s| u8::try_from(s / count).unwrap_or(u8::MAX))
}

fn to_svg(
    width: usize,
    height: usize,
    rects: &[(usize, usize, usize, usize)],
    [r, g, b]: [u8; 3],
) -> String {
    let mut svg = String::new();
    // Writing to a String can't fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    if !rects.is_empty() {
        let _ = write!(svg, r##"<path fill="#{r:02x}{g:02x}{b:02x}" d=""##);
        for (i, &(x0, y0, x1, y1)) in rects.iter().enumerate() {
            if i > 0 {
                svg.push(' ');
            }
            let _ = write!(svg, "M{x0} {y0} L{x1} {y0} L{x1} {y1} L{x0} {y1} Z");
        }
        svg.push_str(r#""/>"#);
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::{Bitmap, RunTracer, TraceConfig, Tracer, to_svg};
    use vello_cpu::Pixmap;
    use vello_cpu::peniko::color::PremulRgba8;

    const WHITE: PremulRgba8 = PremulRgba8 {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
    const BLACK: PremulRgba8 = PremulRgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    fn pixmap(rows: &[&str], ink: PremulRgba8, background: PremulRgba8) -> Pixmap {
        let width = rows[0].len();
        let mut pixmap = Pixmap::new(width as u16, rows.len() as u16);
        for (y, row) in rows.iter().enumerate() {
            for (x, b) in row.bytes().enumerate() {
                pixmap.data_mut()[y * width + x] = if b == b'#' { ink } else { background };
            }
        }
        pixmap
    }

    #[test]
    fn light_ink_on_dark_background() {
        let rows = ["....", ".##.", "...."];
        let bitmap = Bitmap::from_pixmap(&pixmap(&rows, WHITE, BLACK), 128);
        assert_eq!(bitmap, Bitmap::from_rows(&rows));
    }

    #[test]
    fn dark_ink_on_light_background() {
        let rows = ["#...", "....", "...#"];
        let bitmap = Bitmap::from_pixmap(&pixmap(&rows, BLACK, WHITE), 128);
        assert_eq!(bitmap, Bitmap::from_rows(&rows));
    }

    #[test]
    fn despeckle_removes_only_small_components() {
        let mut bitmap = Bitmap::from_rows(&[
            "#.....", //
            "...###",
            "#..#..",
            "#.....",
        ]);
        bitmap.despeckle(2);
        assert_eq!(
            bitmap,
            Bitmap::from_rows(&[
                "......", //
                "...###",
                "...#..",
                "......",
            ])
        );
    }

    #[test]
    fn zero_turd_size_keeps_everything() {
        let mut bitmap = Bitmap::from_rows(&["#.#"]);
        bitmap.despeckle(0);
        assert_eq!(bitmap.ink_count(), 2);
    }

    #[test]
    fn identical_runs_merge_vertically() {
        let bitmap = Bitmap::from_rows(&[
            ".##.", //
            ".##.",
            "####",
            "#..#",
        ]);
        assert_eq!(
            bitmap.rects(),
            vec![(1, 0, 3, 2), (0, 2, 4, 3), (0, 3, 1, 4), (3, 3, 4, 4)]
        );
    }

    #[test]
    fn empty_bitmap_has_no_rects() {
        assert!(Bitmap::from_rows(&["...", "..."]).rects().is_empty());
    }

    #[test]
    fn svg_output() {
        let svg = to_svg(4, 3, &[(1, 1, 3, 2)], [255, 128, 0]);
        assert_eq!(
            svg,
            r##"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="4" height="3" viewBox="0 0 4 3"><path fill="#ff8000" d="M1 1 L3 1 L3 2 L1 2 Z"/></svg>"##
        );
    }

    #[test]
    fn trace_uses_the_ink_color() {
        let rows = ["......", ".####.", ".####.", "......"];
        let raster = pixmap(&rows, WHITE, BLACK);
        let svg = pollster::block_on(RunTracer.trace(&raster, &TraceConfig::default())).unwrap();
        assert!(svg.contains(r##"fill="#ffffff""##), "{svg}");
        assert!(svg.contains("M1 1 L5 1 L5 3 L1 3 Z"), "{svg}");
    }

    #[test]
    #[should_panic(expected = "bitmap rows must all be 3 long")]
    fn ragged_rows_are_rejected() {
        let _ = Bitmap::from_rows(&["###", "#"]);
    }
}
