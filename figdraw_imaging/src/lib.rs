// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Imaging: the immediate-mode canvas seam.
//!
//! This crate defines the narrow drawing surface every figdraw target
//! speaks: a stateful, call-ordered 2D API modelled on the HTML canvas
//! (`save`/`restore`, path building, `fill`/`stroke`/`clip`, text and
//! image placement). Renderers translate retained draw commands into
//! these calls; targets turn the calls into pixels, SVG markup or PDF
//! content streams.
//!
//! # Core concepts
//!
//! - [`Canvas2d`]: the immediate-mode surface trait. Coordinates are in
//!   raster space (origin top-left, y down).
//! - [`CanvasCall`]: a POD description of a single canvas call, used for
//!   recordings and for replaying a call log onto another surface via
//!   [`replay`].
//! - [`emit_path`](emit::emit_path): lowers a [`BezPath`] under an affine
//!   transform into `begin_path` + one primitive per segment, dropping
//!   non-finite segments.
//! - [`RasterImage`](image::RasterImage) / [`RgbaImage`](image::RgbaImage):
//!   bottom-up figure images and the top-down RGBA buffers a surface blits.
//!
//! # Example
//!
//! ```
//! use figdraw_imaging::{Affine, BezPath, Canvas2d, CanvasCall, emit::emit_path};
//! # use figdraw_imaging::{LineCap, LineJoin, image::RgbaImage};
//! # #[derive(Default)]
//! # struct Log(Vec<CanvasCall>);
//! # impl Canvas2d for Log {
//! #     fn width(&self) -> f64 { 100.0 }
//! #     fn height(&self) -> f64 { 100.0 }
//! #     fn save(&mut self) {}
//! #     fn restore(&mut self) {}
//! #     fn translate(&mut self, _: f64, _: f64) {}
//! #     fn rotate(&mut self, _: f64) {}
//! #     fn begin_path(&mut self) { self.0.push(CanvasCall::BeginPath) }
//! #     fn move_to(&mut self, x: f64, y: f64) { self.0.push(CanvasCall::MoveTo { x, y }) }
//! #     fn line_to(&mut self, x: f64, y: f64) { self.0.push(CanvasCall::LineTo { x, y }) }
//! #     fn quadratic_curve_to(&mut self, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn bezier_curve_to(&mut self, _: f64, _: f64, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn close_path(&mut self) { self.0.push(CanvasCall::ClosePath) }
//! #     fn rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn clip(&mut self) {}
//! #     fn fill(&mut self) {}
//! #     fn stroke(&mut self) {}
//! #     fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn stroke_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn clear_rect(&mut self, _: f64, _: f64, _: f64, _: f64) {}
//! #     fn set_fill_style(&mut self, _: &str) {}
//! #     fn set_stroke_style(&mut self, _: &str) {}
//! #     fn set_line_width(&mut self, _: f64) {}
//! #     fn set_line_cap(&mut self, _: LineCap) {}
//! #     fn set_line_join(&mut self, _: LineJoin) {}
//! #     fn set_line_dash(&mut self, _: &[f64]) {}
//! #     fn set_line_dash_offset(&mut self, _: f64) {}
//! #     fn set_font(&mut self, _: &str) {}
//! #     fn fill_text(&mut self, _: &str, _: f64, _: f64) {}
//! #     fn draw_image(&mut self, _: &RgbaImage, _: f64, _: f64) {}
//! # }
//! let mut canvas = Log::default();
//! let mut path = BezPath::new();
//! path.move_to((0.0, 0.0));
//! path.line_to((10.0, 0.0));
//! path.close_path();
//!
//! emit_path(&mut canvas, &path, Affine::IDENTITY, None);
//! assert_eq!(canvas.0.len(), 4);
//! ```

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

pub mod emit;
pub mod image;

pub use kurbo::{Affine, BezPath, PathEl, Point, Rect, Vec2};
pub use peniko::Color;

use image::RgbaImage;

/// Line end decoration, mirroring the canvas `lineCap` property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end exactly at the endpoint.
    #[default]
    Butt,
    /// Semicircular end.
    Round,
    /// Flat end extended by half the line width.
    Square,
}

impl LineCap {
    /// Keyword understood by the HTML canvas and SVG.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Line corner decoration, mirroring the canvas `lineJoin` property.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

impl LineJoin {
    /// Keyword understood by the HTML canvas and SVG.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// An immediate-mode 2D drawing surface.
///
/// The method set follows `CanvasRenderingContext2d`: state changes apply to
/// subsequent calls, path building accumulates into a single current path,
/// and `save`/`restore` push and pop the full style, transform and clip state.
///
/// Implementations must tolerate unbalanced `restore` calls (ignore them) so
/// that a failed frame cannot corrupt the surface for the next one.
pub trait Canvas2d {
    /// Backing-store width in pixels.
    fn width(&self) -> f64;
    /// Backing-store height in pixels.
    fn height(&self) -> f64;

    /// Push the current drawing state.
    fn save(&mut self);
    /// Pop the most recently saved drawing state.
    fn restore(&mut self);
    /// Append a translation to the current transform.
    fn translate(&mut self, tx: f64, ty: f64);
    /// Append a rotation (radians, clockwise in raster space).
    fn rotate(&mut self, radians: f64);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);
    /// Start a new subpath.
    fn move_to(&mut self, x: f64, y: f64);
    /// Straight segment to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);
    /// Quadratic Bézier segment.
    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64);
    /// Cubic Bézier segment.
    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64);
    /// Close the current subpath.
    fn close_path(&mut self);
    /// Append a closed rectangle subpath.
    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Intersect the clip region with the current path.
    fn clip(&mut self);
    /// Fill the current path with the fill style.
    fn fill(&mut self);
    /// Stroke the current path with the stroke style.
    fn stroke(&mut self);

    /// Fill a rectangle without touching the current path.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Stroke a rectangle without touching the current path.
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Reset a rectangle to transparent.
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);

    /// Set the fill style to a CSS color string.
    fn set_fill_style(&mut self, css: &str);
    /// Set the stroke style to a CSS color string.
    fn set_stroke_style(&mut self, css: &str);
    /// Set the line width in pixels.
    fn set_line_width(&mut self, width: f64);
    /// Set the line cap.
    fn set_line_cap(&mut self, cap: LineCap);
    /// Set the line join.
    fn set_line_join(&mut self, join: LineJoin);
    /// Set the dash pattern in pixels; an empty slice means solid.
    fn set_line_dash(&mut self, segments: &[f64]);
    /// Set the dash phase in pixels.
    fn set_line_dash_offset(&mut self, offset: f64);

    /// Set the CSS font shorthand used by [`fill_text`](Self::fill_text).
    fn set_font(&mut self, font: &str);
    /// Fill `text` with its alphabetic baseline at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);

    /// Blit a top-down RGBA image with its top-left corner at `(x, y)`.
    ///
    /// Surfaces stage the pixels in an in-memory surface and copy it at
    /// its natural size, so the current transform and clip apply.
    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64);
}

/// A single recorded canvas call.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs, reason = "Variants mirror the `Canvas2d` methods one to one.")]
pub enum CanvasCall {
    Save,
    Restore,
    Translate { tx: f64, ty: f64 },
    Rotate { radians: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    QuadraticCurveTo { cx: f64, cy: f64, x: f64, y: f64 },
    BezierCurveTo { c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64 },
    ClosePath,
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Clip,
    Fill,
    Stroke,
    FillRect { x: f64, y: f64, w: f64, h: f64 },
    StrokeRect { x: f64, y: f64, w: f64, h: f64 },
    ClearRect { x: f64, y: f64, w: f64, h: f64 },
    SetFillStyle(String),
    SetStrokeStyle(String),
    SetLineWidth(f64),
    SetLineCap(LineCap),
    SetLineJoin(LineJoin),
    SetLineDash(Vec<f64>),
    SetLineDashOffset(f64),
    SetFont(String),
    FillText { text: String, x: f64, y: f64 },
    DrawImage { image: RgbaImage, x: f64, y: f64 },
}

impl CanvasCall {
    /// True for calls that build the current path.
    pub fn is_path_segment(&self) -> bool {
        matches!(
            self,
            Self::MoveTo { .. }
                | Self::LineTo { .. }
                | Self::QuadraticCurveTo { .. }
                | Self::BezierCurveTo { .. }
                | Self::ClosePath
                | Self::Rect { .. }
        )
    }
}

impl fmt::Display for CanvasCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Save => f.write_str("save"),
            Self::Restore => f.write_str("restore"),
            Self::Translate { tx, ty } => write!(f, "translate({tx}, {ty})"),
            Self::Rotate { radians } => write!(f, "rotate({radians})"),
            Self::BeginPath => f.write_str("beginPath"),
            Self::MoveTo { x, y } => write!(f, "moveTo({x}, {y})"),
            Self::LineTo { x, y } => write!(f, "lineTo({x}, {y})"),
            Self::QuadraticCurveTo { cx, cy, x, y } => {
                write!(f, "quadraticCurveTo({cx}, {cy}, {x}, {y})")
            }
            Self::BezierCurveTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => write!(f, "bezierCurveTo({c1x}, {c1y}, {c2x}, {c2y}, {x}, {y})"),
            Self::ClosePath => f.write_str("closePath"),
            Self::Rect { x, y, w, h } => write!(f, "rect({x}, {y}, {w}, {h})"),
            Self::Clip => f.write_str("clip"),
            Self::Fill => f.write_str("fill"),
            Self::Stroke => f.write_str("stroke"),
            Self::FillRect { x, y, w, h } => write!(f, "fillRect({x}, {y}, {w}, {h})"),
            Self::StrokeRect { x, y, w, h } => write!(f, "strokeRect({x}, {y}, {w}, {h})"),
            Self::ClearRect { x, y, w, h } => write!(f, "clearRect({x}, {y}, {w}, {h})"),
            Self::SetFillStyle(s) => write!(f, "fillStyle = {s}"),
            Self::SetStrokeStyle(s) => write!(f, "strokeStyle = {s}"),
            Self::SetLineWidth(w) => write!(f, "lineWidth = {w}"),
            Self::SetLineCap(c) => write!(f, "lineCap = {}", c.as_css()),
            Self::SetLineJoin(j) => write!(f, "lineJoin = {}", j.as_css()),
            Self::SetLineDash(d) => write!(f, "setLineDash({d:?})"),
            Self::SetLineDashOffset(o) => write!(f, "lineDashOffset = {o}"),
            Self::SetFont(s) => write!(f, "font = {s}"),
            Self::FillText { text, x, y } => write!(f, "fillText({text:?}, {x}, {y})"),
            Self::DrawImage { image, x, y } => {
                write!(f, "drawImage({}x{}, {x}, {y})", image.width, image.height)
            }
        }
    }
}

/// Apply a single recorded call to a surface.
pub fn apply_call<C: Canvas2d + ?Sized>(canvas: &mut C, call: &CanvasCall) {
    match call {
        CanvasCall::Save => canvas.save(),
        CanvasCall::Restore => canvas.restore(),
        CanvasCall::Translate { tx, ty } => canvas.translate(*tx, *ty),
        CanvasCall::Rotate { radians } => canvas.rotate(*radians),
        CanvasCall::BeginPath => canvas.begin_path(),
        CanvasCall::MoveTo { x, y } => canvas.move_to(*x, *y),
        CanvasCall::LineTo { x, y } => canvas.line_to(*x, *y),
        CanvasCall::QuadraticCurveTo { cx, cy, x, y } => {
            canvas.quadratic_curve_to(*cx, *cy, *x, *y);
        }
        CanvasCall::BezierCurveTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        } => canvas.bezier_curve_to(*c1x, *c1y, *c2x, *c2y, *x, *y),
        CanvasCall::ClosePath => canvas.close_path(),
        CanvasCall::Rect { x, y, w, h } => canvas.rect(*x, *y, *w, *h),
        CanvasCall::Clip => canvas.clip(),
        CanvasCall::Fill => canvas.fill(),
        CanvasCall::Stroke => canvas.stroke(),
        CanvasCall::FillRect { x, y, w, h } => canvas.fill_rect(*x, *y, *w, *h),
        CanvasCall::StrokeRect { x, y, w, h } => canvas.stroke_rect(*x, *y, *w, *h),
        CanvasCall::ClearRect { x, y, w, h } => canvas.clear_rect(*x, *y, *w, *h),
        CanvasCall::SetFillStyle(s) => canvas.set_fill_style(s),
        CanvasCall::SetStrokeStyle(s) => canvas.set_stroke_style(s),
        CanvasCall::SetLineWidth(w) => canvas.set_line_width(*w),
        CanvasCall::SetLineCap(c) => canvas.set_line_cap(*c),
        CanvasCall::SetLineJoin(j) => canvas.set_line_join(*j),
        CanvasCall::SetLineDash(d) => canvas.set_line_dash(d),
        CanvasCall::SetLineDashOffset(o) => canvas.set_line_dash_offset(*o),
        CanvasCall::SetFont(s) => canvas.set_font(s),
        CanvasCall::FillText { text, x, y } => canvas.fill_text(text, *x, *y),
        CanvasCall::DrawImage { image, x, y } => canvas.draw_image(image, *x, *y),
    }
}

/// Replay a call log onto a surface, in order.
pub fn replay<C: Canvas2d + ?Sized>(canvas: &mut C, calls: &[CanvasCall]) {
    for call in calls {
        apply_call(canvas, call);
    }
}

/// Parse a CSS color string (`#rrggbb`, `rgba(...)`, named colors).
///
/// Returns `None` for strings the CSS color grammar rejects.
pub fn parse_css_color(css: &str) -> Option<Color> {
    peniko::color::parse_color(css)
        .ok()
        .map(|c| c.to_alpha_color::<peniko::color::Srgb>())
}
