// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Imaging Reference Surface.
//!
//! This crate provides [`RecordingCanvas`], a stateful implementation of
//! [`Canvas2d`] for **call recording and state tracing**.
//!
//! It is intentionally *not* a rasterizer:
//! - It does **not** produce pixels.
//! - It tracks the drawing state the way a browser canvas would (style,
//!   transform and the `save`/`restore` stack) so tests can assert on the
//!   state in effect when each call was made.
//! - Hosts without a real surface (headless export, tests) use it as the
//!   content and overlay layers.

#![no_std]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use figdraw_imaging::image::RgbaImage;
use figdraw_imaging::{Affine, Canvas2d, CanvasCall, LineCap, LineJoin, Vec2};

/// Snapshot of the drawing state inside the surface.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSnapshot {
    /// Current transform.
    pub transform: Affine,
    /// Number of entries on the save stack.
    pub save_depth: u32,
    /// Current fill style.
    pub fill_style: String,
    /// Current stroke style.
    pub stroke_style: String,
    /// Current line width in pixels.
    pub line_width: f64,
    /// Current line cap.
    pub line_cap: LineCap,
    /// Current line join.
    pub line_join: LineJoin,
    /// Current dash pattern.
    pub line_dash: Vec<f64>,
    /// Current dash offset.
    pub line_dash_offset: f64,
    /// Current font shorthand.
    pub font: String,
    /// Number of `clip` calls in effect.
    pub clip_depth: u32,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            save_depth: 0,
            fill_style: "#000000".to_string(),
            stroke_style: "#000000".to_string(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            line_dash: Vec::new(),
            line_dash_offset: 0.0,
            font: "10px sans-serif".to_string(),
            clip_depth: 0,
        }
    }
}

/// Call recorded by the surface, paired with the state after applying it.
#[derive(Clone, Debug)]
pub struct Event {
    /// The call that was made.
    pub call: CanvasCall,
    /// Snapshot after applying the call.
    pub state: StateSnapshot,
}

/// Recording implementation of [`Canvas2d`].
///
/// This surface:
/// - Records every call as an [`Event`] in order,
/// - Tracks the current drawing state and the save stack,
/// - Ignores unbalanced `restore` calls, counting them in
///   [`unbalanced_restores`](Self::unbalanced_restores).
#[derive(Debug)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    events: Vec<Event>,
    state: StateSnapshot,
    stack: Vec<StateSnapshot>,
    unbalanced_restores: u32,
}

impl RecordingCanvas {
    /// Create a surface with the given backing-store size in pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            events: Vec::new(),
            state: StateSnapshot::default(),
            stack: Vec::new(),
            unbalanced_restores: 0,
        }
    }

    /// Returns the recorded events.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the recorded calls, without state.
    pub fn calls(&self) -> Vec<CanvasCall> {
        self.events.iter().map(|e| e.call.clone()).collect()
    }

    /// Current drawing state.
    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }

    /// Number of `restore` calls made with an empty save stack.
    pub fn unbalanced_restores(&self) -> u32 {
        self.unbalanced_restores
    }

    /// Clears recorded events but keeps the drawing state.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Reset the backing store, as assigning `canvas.width` does in a browser.
    ///
    /// Drops all state, the save stack, and the recorded events.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.events.clear();
        self.state = StateSnapshot::default();
        self.stack.clear();
        self.unbalanced_restores = 0;
    }

    fn depth(&self) -> u32 {
        u32::try_from(self.stack.len()).unwrap_or(u32::MAX)
    }

    fn record(&mut self, call: CanvasCall) {
        self.events.push(Event {
            call,
            state: self.state.clone(),
        });
    }
}

impl Canvas2d for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.state.save_depth = self.depth();
        self.record(CanvasCall::Save);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(prev) => {
                self.state = prev;
                self.state.save_depth = self.depth();
            }
            None => self.unbalanced_restores += 1,
        }
        self.record(CanvasCall::Restore);
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform *= Affine::translate(Vec2::new(tx, ty));
        self.record(CanvasCall::Translate { tx, ty });
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
        self.record(CanvasCall::Rotate { radians });
    }

    fn begin_path(&mut self) {
        self.record(CanvasCall::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.record(CanvasCall::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.record(CanvasCall::LineTo { x, y });
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.record(CanvasCall::QuadraticCurveTo { cx, cy, x, y });
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.record(CanvasCall::BezierCurveTo {
            c1x,
            c1y,
            c2x,
            c2y,
            x,
            y,
        });
    }

    fn close_path(&mut self) {
        self.record(CanvasCall::ClosePath);
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.record(CanvasCall::Rect { x, y, w, h });
    }

    fn clip(&mut self) {
        self.state.clip_depth += 1;
        self.record(CanvasCall::Clip);
    }

    fn fill(&mut self) {
        self.record(CanvasCall::Fill);
    }

    fn stroke(&mut self) {
        self.record(CanvasCall::Stroke);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.record(CanvasCall::FillRect { x, y, w, h });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.record(CanvasCall::StrokeRect { x, y, w, h });
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.record(CanvasCall::ClearRect { x, y, w, h });
    }

    fn set_fill_style(&mut self, css: &str) {
        self.state.fill_style = css.to_string();
        self.record(CanvasCall::SetFillStyle(css.to_string()));
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.state.stroke_style = css.to_string();
        self.record(CanvasCall::SetStrokeStyle(css.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.record(CanvasCall::SetLineWidth(width));
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
        self.record(CanvasCall::SetLineCap(cap));
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
        self.record(CanvasCall::SetLineJoin(join));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.line_dash = segments.to_vec();
        self.record(CanvasCall::SetLineDash(segments.to_vec()));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.state.line_dash_offset = offset;
        self.record(CanvasCall::SetLineDashOffset(offset));
    }

    fn set_font(&mut self, font: &str) {
        self.state.font = font.to_string();
        self.record(CanvasCall::SetFont(font.to_string()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.record(CanvasCall::FillText {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        self.record(CanvasCall::DrawImage {
            image: image.clone(),
            x,
            y,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use figdraw_imaging::{BezPath, emit::emit_path, replay};

    #[test]
    fn save_restore_tracks_state() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.save();
        canvas.set_fill_style("#ff0000");
        canvas.translate(2.0, 3.0);
        assert_eq!(canvas.state().save_depth, 1);
        assert_eq!(canvas.state().fill_style, "#ff0000");

        canvas.restore();
        assert_eq!(canvas.state().save_depth, 0);
        assert_eq!(canvas.state().fill_style, "#000000", "restore pops the style");
        assert_eq!(canvas.state().transform, Affine::IDENTITY);
    }

    #[test]
    fn unbalanced_restore_is_counted_not_fatal() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.restore();
        assert_eq!(canvas.unbalanced_restores(), 1);
        assert_eq!(canvas.state().save_depth, 0);
    }

    #[test]
    fn events_snapshot_state_at_call_time() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.set_line_width(3.0);
        canvas.stroke();
        canvas.set_line_width(1.0);
        let stroke = &canvas.events()[1];
        assert_eq!(stroke.call, CanvasCall::Stroke);
        assert_eq!(stroke.state.line_width, 3.0);
    }

    #[test]
    fn replay_reproduces_calls() {
        let mut path = BezPath::new();
        path.move_to((1.0, 1.0));
        path.line_to((2.0, 2.0));

        let mut first = RecordingCanvas::new(10.0, 10.0);
        emit_path(&mut first, &path, Affine::IDENTITY, None);
        first.set_line_dash(&[2.0, 2.0]);
        first.stroke();

        let mut second = RecordingCanvas::new(10.0, 10.0);
        replay(&mut second, &first.calls());
        assert_eq!(first.calls(), second.calls());
        assert_eq!(second.state().line_dash, vec![2.0, 2.0]);
    }

    #[test]
    fn resize_resets_everything() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        canvas.save();
        canvas.clip();
        canvas.resize(20.0, 30.0);
        assert_eq!(canvas.width(), 20.0);
        assert_eq!(canvas.height(), 30.0);
        assert!(canvas.events().is_empty());
        assert_eq!(canvas.state(), &StateSnapshot::default());
    }
}
