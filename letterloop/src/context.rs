// Copyright 2025 the Letterloop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing contract glyphs are rendered against.
//!
//! [`DrawContext`] is a small canvas-style immediate-mode API: a save/restore stack for the
//! transform and style, a path builder, and `stroke`/`fill`. Backends don't implement it
//! directly; they implement [`Surface`], which only has to paint finished paths, and
//! [`PathContext`] provides the rest.

use crate::kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape, Size, Stroke};
use crate::peniko::Color;
use crate::peniko::color::palette;

/// The immediate-mode drawing operations used by [`draw_glyph`](crate::draw_glyph).
///
/// Points passed to [`move_to`](Self::move_to) and [`line_to`](Self::line_to) are in user
/// space, mapped through the transform current at the time they are added, matching the
/// behavior of an HTML canvas.
pub trait DrawContext {
    /// The size of the drawing surface, in device pixels.
    fn size(&self) -> Size;
    /// Push a copy of the current transform and style.
    fn save(&mut self);
    /// Pop the most recently saved transform and style. Does nothing if none were saved.
    fn restore(&mut self);
    fn translate(&mut self, tx: f64, ty: f64);
    fn scale(&mut self, sx: f64, sy: f64);
    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: Cap);
    fn set_line_join(&mut self, join: Join);
    /// Discard the current path.
    fn begin_path(&mut self);
    /// Start a new subpath at `p`.
    fn move_to(&mut self, p: Point);
    /// Extend the current subpath to `p`, or start one if there is none.
    fn line_to(&mut self, p: Point);
    /// Stroke the current path with the current stroke color and style.
    fn stroke(&mut self);
    /// Fill the current path with the current fill color.
    fn fill(&mut self);
}

/// Transform and style state affected by [`DrawContext::save`] and [`DrawContext::restore`].
#[derive(Clone, Debug)]
pub struct GraphicsState {
    pub transform: Affine,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke: Stroke,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            stroke_color: palette::css::BLACK,
            fill_color: palette::css::BLACK,
            // Canvas defaults, not kurbo's.
            stroke: Stroke::new(1.0).with_caps(Cap::Butt).with_join(Join::Miter),
        }
    }
}

/// Something finished paths can be painted onto.
pub trait Surface {
    /// The size of the surface, in device pixels.
    fn size(&self) -> Size;
    /// Stroke `path`, given in user space, using `state`.
    fn stroke_path(&mut self, path: &BezPath, state: &GraphicsState);
    /// Fill `path`, given in user space, using `state`.
    fn fill_path(&mut self, path: &BezPath, state: &GraphicsState);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn size(&self) -> Size {
        (**self).size()
    }

    fn stroke_path(&mut self, path: &BezPath, state: &GraphicsState) {
        (**self).stroke_path(path, state);
    }

    fn fill_path(&mut self, path: &BezPath, state: &GraphicsState) {
        (**self).fill_path(path, state);
    }
}

/// A [`DrawContext`] over any [`Surface`].
#[derive(Debug)]
pub struct PathContext<S> {
    surface: S,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    /// The path under construction, in device space.
    path: BezPath,
}

impl<S: Surface> PathContext<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: BezPath::new(),
        }
    }

    /// The current transform and style.
    pub fn state(&self) -> &GraphicsState {
        &self.state
    }

    /// How many states are currently saved.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn into_inner(self) -> S {
        self.surface
    }

    /// The current path, mapped back into the current user space.
    ///
    /// Returns `None` if the path is empty or the transform can't be inverted, in which case
    /// there is nothing visible to paint.
    fn user_path(&self) -> Option<BezPath> {
        if self.path.elements().is_empty() || self.state.transform.determinant() == 0.0 {
            return None;
        }
        let mut path = self.path.clone();
        path.apply_affine(self.state.transform.inverse());
        Some(path)
    }
}

impl<S: Surface> DrawContext for PathContext<S> {
    fn size(&self) -> Size {
        self.surface.size()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform *= Affine::translate((tx, ty));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        // Canvas ignores non-positive and non-finite widths.
        if width > 0.0 && width.is_finite() {
            self.state.stroke.width = width;
        }
    }

    fn set_line_cap(&mut self, cap: Cap) {
        self.state.stroke.start_cap = cap;
        self.state.stroke.end_cap = cap;
    }

    fn set_line_join(&mut self, join: Join) {
        self.state.stroke.join = join;
    }

    fn begin_path(&mut self) {
        self.path.truncate(0);
    }

    fn move_to(&mut self, p: Point) {
        self.path.move_to(self.state.transform * p);
    }

    fn line_to(&mut self, p: Point) {
        let p = self.state.transform * p;
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    fn stroke(&mut self) {
        if let Some(path) = self.user_path() {
            self.surface.stroke_path(&path, &self.state);
        }
    }

    fn fill(&mut self) {
        if let Some(path) = self.user_path() {
            self.surface.fill_path(&path, &self.state);
        }
    }
}

/// Whether a recorded operation was a stroke or a fill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaintKind {
    Stroke,
    Fill,
}

/// One painted path captured by a [`Recorder`].
#[derive(Clone, Debug)]
pub struct DrawOp {
    pub kind: PaintKind,
    /// The path in the user space of `transform`.
    pub path: BezPath,
    pub transform: Affine,
    pub color: Color,
    pub stroke: Stroke,
}

impl DrawOp {
    /// The bounds of the path on the surface, ignoring stroke width.
    pub fn device_bounds(&self) -> Rect {
        let mut path = self.path.clone();
        path.apply_affine(self.transform);
        path.bounding_box()
    }
}

/// A [`Surface`] that keeps every painted path instead of rasterizing it.
#[derive(Clone, Debug)]
pub struct Recorder {
    size: Size,
    ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            ops: Vec::new(),
        }
    }

    /// Draw into this recorder.
    pub fn context(&mut self) -> PathContext<&mut Self> {
        PathContext::new(self)
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl Surface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn stroke_path(&mut self, path: &BezPath, state: &GraphicsState) {
        self.ops.push(DrawOp {
            kind: PaintKind::Stroke,
            path: path.clone(),
            transform: state.transform,
            color: state.stroke_color,
            stroke: state.stroke.clone(),
        });
    }

    fn fill_path(&mut self, path: &BezPath, state: &GraphicsState) {
        self.ops.push(DrawOp {
            kind: PaintKind::Fill,
            path: path.clone(),
            transform: state.transform,
            color: state.fill_color,
            stroke: state.stroke.clone(),
        });
    }
}
