// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The raster → vector → raster feedback loop.
//!
//! Each [`Sketch::iterate`] draws the word (once at the center, or scattered copies of it),
//! rasterizes the canvas, hands the raster to a [`Tracer`], and composites the traced
//! outlines back over the canvas. Repeating this slowly erodes the letters.

use std::path::Path;

use clap::Args;
use rand::Rng;
use vello_cpu::Pixmap;

use crate::Result;
use crate::canvas::Canvas;
use crate::export;
use crate::kurbo::Point;
use crate::layout::{LayoutRequest, Placement, draw_word};
use crate::peniko::Color;
use crate::peniko::color::{Srgb, palette, parse_color};
use crate::spread::{Mode, Spread};
use crate::svg::TracedSvg;
use crate::trace::{TraceConfig, Tracer};

/// Parse a CSS color such as `#fff`, `rgb(0 0 0)` or `aliceblue`.
pub fn parse_css_color(text: &str) -> Result<Color, String> {
    parse_color(text)
        .map(|c| c.to_alpha_color::<Srgb>())
        .map_err(|err| format!("invalid color {text:?}: {err}"))
}

/// Everything that controls a sketch.
#[derive(Args, Clone, Debug)]
pub struct Params {
    #[arg(help_heading = "Canvas")]
    #[arg(long, default_value_t = 800)]
    /// Canvas width in pixels
    pub width: u32,
    #[arg(help_heading = "Canvas")]
    #[arg(long, default_value_t = 600)]
    /// Canvas height in pixels
    pub height: u32,
    #[arg(help_heading = "Canvas")]
    #[arg(long, default_value = "#000", value_parser = parse_css_color)]
    /// Background color, in CSS syntax
    pub background: Color,
    #[arg(help_heading = "Canvas")]
    #[arg(long, default_value = "#fff", value_parser = parse_css_color)]
    /// Color of the letters, in CSS syntax
    pub foreground: Color,
    #[arg(help_heading = "Word Settings")]
    #[arg(long, default_value = "IDENTITY")]
    /// The text to draw
    pub word: String,
    #[arg(help_heading = "Word Settings")]
    #[arg(long)]
    /// Width of the whole word in pixels [default: half the canvas width]
    pub word_width: Option<f64>,
    #[arg(help_heading = "Word Settings")]
    #[arg(long, default_value_t = LayoutRequest::DEFAULT_SPACE_WIDTH)]
    /// Advance of a space, as a fraction of the letter width
    pub space_width: f64,
    #[arg(help_heading = "Word Settings")]
    #[arg(long, default_value_t = LayoutRequest::DEFAULT_LINE_WIDTH)]
    /// Stroke width in glyph design units
    pub line_width: f64,
    #[arg(help_heading = "Word Settings")]
    #[arg(long, default_value_t = LayoutRequest::DEFAULT_LETTER_SPACING)]
    /// Gap between letters, as a fraction of the letter width
    pub letter_spacing: f64,
    #[arg(help_heading = "Mode Settings")]
    #[arg(long, value_enum, default_value_t = Mode::SpreadAccumulation)]
    /// What each iteration draws before tracing
    pub mode: Mode,
    #[command(flatten)]
    pub spread: Spread,
    #[command(flatten)]
    pub trace: TraceConfig,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: palette::css::BLACK,
            foreground: palette::css::WHITE,
            word: "IDENTITY".into(),
            word_width: None,
            space_width: LayoutRequest::DEFAULT_SPACE_WIDTH,
            line_width: LayoutRequest::DEFAULT_LINE_WIDTH,
            letter_spacing: LayoutRequest::DEFAULT_LETTER_SPACING,
            mode: Mode::SpreadAccumulation,
            spread: Spread::default(),
            trace: TraceConfig::default(),
        }
    }
}

impl Params {
    /// Keep the word width and horizontal jitter within the canvas width, and the vertical
    /// jitter within its height.
    pub fn clamp_to_canvas(&mut self) {
        let width = f64::from(self.width);
        let height = f64::from(self.height);
        if let Some(word_width) = &mut self.word_width {
            *word_width = word_width.min(width);
        }
        self.spread.jitter_x = self.spread.jitter_x.min(width);
        self.spread.jitter_y = self.spread.jitter_y.min(height);
    }

    pub fn effective_word_width(&self) -> f64 {
        self.word_width
            .unwrap_or_else(|| f64::from(self.width) / 2.0)
    }

    /// The request for one copy of the word, centered on `center` or on the canvas.
    pub fn request(&self, center: Option<Point>) -> LayoutRequest {
        let mut request =
            LayoutRequest::new(self.word.clone(), self.effective_word_width(), self.foreground)
                .with_letter_spacing(self.letter_spacing)
                .with_space_width(self.space_width)
                .with_line_width(self.line_width);
        request.center = center;
        request
    }
}

/// A canvas plus the state of the feedback loop.
#[derive(Debug)]
pub struct Sketch {
    params: Params,
    canvas: Canvas,
    iteration: usize,
    last_svg: Option<String>,
}

impl Sketch {
    /// Create a sketch with a cleared canvas. The parameters are clamped to the canvas first.
    pub fn new(mut params: Params) -> Result<Self> {
        params.clamp_to_canvas();
        let canvas = Canvas::new(params.width, params.height, params.background)?;
        Ok(Self {
            params,
            canvas,
            iteration: 0,
            last_svg: None,
        })
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The document produced by the most recent successful trace.
    pub fn last_svg(&self) -> Option<&str> {
        self.last_svg.as_deref()
    }

    /// Paint the canvas with the background color.
    pub fn clear(&mut self) {
        self.canvas.clear();
    }

    /// Draw the word once, centered on the canvas.
    pub fn draw_base_word(&mut self) -> Vec<Placement> {
        let request = self.params.request(None);
        draw_word(&mut self.canvas.context(), &request)
    }

    /// Draw jittered copies of the word around the canvas center.
    ///
    /// Returns the centers the copies were drawn at.
    pub fn draw_spread_words<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<Point> {
        let center = Point::new(
            f64::from(self.canvas.width()) / 2.0,
            f64::from(self.canvas.height()) / 2.0,
        );
        let centers = self.params.spread.centers(rng, center);
        let mut ctx = self.canvas.context();
        for &center in &centers {
            draw_word(&mut ctx, &self.params.request(Some(center)));
        }
        centers
    }

    /// Run one pass of the loop.
    ///
    /// Returns whether the traced outlines made it back onto the canvas. Tracing and parsing
    /// failures are logged; the words drawn in this pass stay on the canvas either way.
    ///
    /// The canvas is baked before tracing and again at the end, so a pass costs the same no
    /// matter how many passes came before it.
    pub async fn iterate<T, R>(&mut self, tracer: &T, rng: &mut R) -> bool
    where
        T: Tracer + ?Sized,
        R: Rng + ?Sized,
    {
        match self.params.mode {
            Mode::CenterOverwrite => {
                self.draw_base_word();
            }
            Mode::SpreadAccumulation => {
                self.draw_spread_words(rng);
            }
        }
        let raster = self.canvas.bake();
        let traced = tracer.trace(raster, &self.params.trace).await;
        let composited = match traced {
            Ok(svg) => match TracedSvg::parse(&svg) {
                Ok(doc) => {
                    doc.draw(&mut self.canvas);
                    log::debug!(
                        "Iteration {}: composited {} traced paths",
                        self.iteration + 1,
                        doc.items.len()
                    );
                    self.last_svg = Some(svg);
                    true
                }
                Err(err) => {
                    log::error!("Couldn't read traced SVG: {err}");
                    false
                }
            },
            Err(err) => {
                log::error!("Tracing failed: {err}");
                false
            }
        };
        self.canvas.bake();
        self.iteration += 1;
        composited
    }

    /// Rasterize the canvas.
    pub fn render(&mut self) -> Pixmap {
        self.canvas.render()
    }

    /// Render the canvas and write it to `path`, in the format implied by its extension.
    pub fn export(&mut self, path: &Path) -> Result<()> {
        let pixmap = self.canvas.render();
        export::save(path, &pixmap, self.params.background)
    }
}
