// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Letterloop draws block-letter words out of hand-authored stroke glyphs, and feeds the
//! rasterized result through a tracer back into vector form, over and over.
//!
//! The interesting part is small:
//!
//! - [`glyph`] holds the stroke geometry for the 26 uppercase Latin letters, authored in a
//!   100×100 design square.
//! - [`layout`] fits an arbitrary string to a target width, centers it on a point, and issues
//!   one scaled glyph draw per letter against a [`DrawContext`].
//!
//! Everything else is the machinery around the sketch:
//!
//! - [`context`] defines the immediate-mode drawing contract (a canvas-style transform stack
//!   and path builder) on top of a minimal [`Surface`], plus a [`Recorder`] surface for tests.
//! - [`canvas`] is a raster [`Surface`] backed by Vello CPU.
//! - [`trace`] is the raster to vector capability ([`Tracer`]) with a built-in [`RunTracer`].
//! - [`svg`] reads traced documents back so they can be composited onto the canvas.
//! - [`spread`] scatters word placements for the accumulation mode.
//! - [`sketch`] ties the loop together, and [`export`] writes the result to PNG or JPEG.
//!
//! # Example
//!
//! ```
//! use letterloop::{LayoutRequest, Recorder, draw_word};
//! use letterloop::peniko::color::palette;
//!
//! let mut recorder = Recorder::new(800.0, 600.0);
//! let request = LayoutRequest::new("Hello World", 400.0, palette::css::WHITE);
//! let placements = draw_word(&mut recorder.context(), &request);
//!
//! assert_eq!(placements.len(), 10);
//! assert_eq!(recorder.ops().len(), 10);
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![forbid(unsafe_code)]

pub mod canvas;
pub mod context;
mod error;
pub mod export;
pub mod glyph;
pub mod layout;
pub mod sketch;
pub mod spread;
pub mod svg;
pub mod trace;

pub use vello_cpu::{kurbo, peniko};

pub use canvas::Canvas;
pub use context::{DrawContext, GraphicsState, PathContext, Recorder, Surface};
pub use error::{Error, Result};
pub use glyph::{Glyph, Letter, geometry};
pub use layout::{LayoutRequest, Metrics, Placement, draw_glyph, draw_word};
pub use sketch::{Params, Sketch};
pub use spread::{Mode, Spread};
pub use trace::{RunTracer, TraceConfig, TraceError, Tracer};
