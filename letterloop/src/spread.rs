// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scattering copies of a word around the canvas center.

use clap::{Args, ValueEnum};
use rand::Rng;

use crate::kurbo::Point;

/// What an iteration draws before tracing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Draw [`Spread::count`] jittered copies of the word.
    #[default]
    SpreadAccumulation,
    /// Redraw the word once, at the canvas center.
    CenterOverwrite,
}

#[derive(Args, Clone, Debug, PartialEq)]
pub struct Spread {
    #[arg(help_heading = "Mode Settings")]
    #[arg(long = "spread-count", default_value_t = 10)]
    /// Number of copies drawn per spread iteration
    pub count: u32,
    #[arg(help_heading = "Mode Settings")]
    #[arg(long = "jitter-x", default_value_t = 120.0)]
    /// Maximum horizontal offset of a copy from the center
    pub jitter_x: f64,
    #[arg(help_heading = "Mode Settings")]
    #[arg(long = "jitter-y", default_value_t = 120.0)]
    /// Maximum vertical offset of a copy from the center
    pub jitter_y: f64,
}

impl Default for Spread {
    fn default() -> Self {
        Self {
            count: 10,
            jitter_x: 120.0,
            jitter_y: 120.0,
        }
    }
}

impl Spread {
    /// Sample the centers of one iteration's copies.
    ///
    /// Each offset is uniform in `[-jitter, jitter)` on its axis.
    pub fn centers<R: Rng + ?Sized>(&self, rng: &mut R, center: Point) -> Vec<Point> {
        (0..self.count)
            .map(|_| {
                let dx = (rng.gen::<f64>() * 2.0 - 1.0) * self.jitter_x;
                let dy = (rng.gen::<f64>() * 2.0 - 1.0) * self.jitter_y;
                Point::new(center.x + dx, center.y + dy)
            })
            .collect()
    }
}
