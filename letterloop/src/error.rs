// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::kurbo::SvgParseError;
use crate::trace::TraceError;

/// Errors that can occur in Letterloop.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Canvas dimensions must both be in `1..=u16::MAX`.
    #[error("Invalid canvas size {0}x{1}")]
    InvalidCanvasSize(u32, u32),
    /// The traced document is not well-formed XML.
    #[error("Couldn't parse SVG document")]
    Svg(#[from] roxmltree::Error),
    /// A `d` attribute could not be parsed as path data.
    #[error("Couldn't parse SVG path data: {0}")]
    SvgPath(#[from] SvgParseError),
    /// A required attribute was missing from an SVG element.
    #[error("SVG element <{0}> is missing the '{1}' attribute")]
    SvgMissingAttribute(&'static str, &'static str),
    /// The tracer failed.
    #[error("Tracing failed")]
    Trace(#[from] TraceError),
    /// Failed to encode an exported image.
    #[error("Couldn't encode image")]
    Image(#[from] image::ImageError),
    /// Failed to write an exported file.
    #[error("I/O error")]
    Io(#[from] std::io::Error),
    /// The export format could not be inferred from the file name.
    #[error("Unknown image format for '{0}', expected .png, .jpg or .jpeg")]
    UnknownFormat(String),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
