// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A raster drawing surface backed by Vello CPU.

use vello_cpu::{Pixmap, RenderContext};

use crate::context::{GraphicsState, PathContext, Surface};
use crate::kurbo::{Affine, BezPath, Size};
use crate::peniko::Color;
use crate::peniko::color::PremulRgba8;
use crate::{Error, Result};

/// An RGBA raster canvas with an opaque background.
///
/// The canvas is a baked raster plus the paths drawn since it was last baked. Those paths are
/// retained in a render context, and [`render`](Self::render) composites them over the baked
/// raster. [`bake`](Self::bake) folds them in, so rendering costs only as much as the drawing
/// done since.
pub struct Canvas {
    width: u16,
    height: u16,
    background: Color,
    base: Pixmap,
    ctx: RenderContext,
    pending: usize,
}

impl Canvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color) -> Result<Self> {
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(Error::InvalidCanvasSize(width, height));
        };
        if w == 0 || h == 0 {
            return Err(Error::InvalidCanvasSize(width, height));
        }
        Ok(Self {
            width: w,
            height: h,
            background,
            base: filled(w, h, background),
            ctx: RenderContext::new(w, h),
            pending: 0,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Number of paths drawn since the canvas was last baked or cleared.
    pub fn pending_draws(&self) -> usize {
        self.pending
    }

    /// Discard everything drawn and repaint the background.
    pub fn clear(&mut self) {
        self.base = filled(self.width, self.height, self.background);
        self.reset_pending();
    }

    /// Draw into this canvas through the [`DrawContext`](crate::DrawContext) API.
    pub fn context(&mut self) -> PathContext<&mut Self> {
        PathContext::new(self)
    }

    /// Fill `path` with a solid color.
    pub fn fill_path_with(&mut self, path: &BezPath, transform: Affine, color: Color) {
        self.ctx.set_transform(transform);
        self.ctx.set_paint(color);
        self.ctx.fill_path(path);
        self.pending += 1;
    }

    /// Rasterize everything drawn so far.
    pub fn render(&mut self) -> Pixmap {
        let mut pixmap = Pixmap::new(self.width, self.height);
        pixmap.data_mut().copy_from_slice(self.base.data());
        if self.pending == 0 {
            return pixmap;
        }
        let mut layer = Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut layer);
        for (dst, &src) in pixmap.data_mut().iter_mut().zip(layer.data()) {
            *dst = source_over(src, *dst);
        }
        pixmap
    }

    /// Rasterize the pending paths into the baked raster and drop them.
    ///
    /// Returns the baked raster, which is what [`render`](Self::render) would have produced.
    pub fn bake(&mut self) -> &Pixmap {
        if self.pending > 0 {
            self.base = self.render();
            self.reset_pending();
        }
        &self.base
    }

    fn reset_pending(&mut self) {
        self.ctx = RenderContext::new(self.width, self.height);
        self.pending = 0;
    }
}

fn filled(width: u16, height: u16, color: Color) -> Pixmap {
    let mut pixmap = Pixmap::new(width, height);
    pixmap.data_mut().fill(color.premultiply().to_rgba8());
    pixmap
}

/// Premultiplied `src` over `dst`.
fn source_over(src: PremulRgba8, dst: PremulRgba8) -> PremulRgba8 {
    let rest = 255 - u16::from(src.a);
    let over = |s: u8, d: u8| {
        u8::try_from(u16::from(s) + (u16::from(d) * rest + 127) / 255).unwrap_or(u8::MAX)
    };
    PremulRgba8 {
        r: over(src.r, dst.r),
        g: over(src.g, dst.g),
        b: over(src.b, dst.b),
        a: over(src.a, dst.a),
    }
}

impl core::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Surface for Canvas {
    fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    fn stroke_path(&mut self, path: &BezPath, state: &GraphicsState) {
        self.ctx.set_transform(state.transform);
        self.ctx.set_stroke(state.stroke.clone());
        self.ctx.set_paint(state.stroke_color);
        self.ctx.stroke_path(path);
        self.pending += 1;
    }

    fn fill_path(&mut self, path: &BezPath, state: &GraphicsState) {
        self.fill_path_with(path, state.transform, state.fill_color);
    }
}
