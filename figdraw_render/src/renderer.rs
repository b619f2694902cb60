// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw commands to canvas calls.
//!
//! Figure coordinates are in display space: pixels with the origin at the
//! bottom-left and y up. The surface is y down, so every path goes through
//! a vertical flip about the surface height, and text and image positions
//! are mirrored explicitly.

use figdraw_imaging::emit::emit_path;
use figdraw_imaging::image::RasterImage;
use figdraw_imaging::Canvas2d;
use figdraw_text::{
    FontCache, FontProperties, FontRegistrar, MathError, MathTextEngine, TextExtents,
};
use kurbo::{Affine, BezPath, Rect};

use crate::color::{format_g, to_css_color, ColorValue};
use crate::command::DrawCommand;
use crate::error::RenderError;
use crate::gc::GraphicsContext;
use crate::scope::SaveScope;

/// Convert points to pixels at `dpi`.
pub fn points_to_pixels(points: f64, dpi: f64) -> f64 {
    points / 72.0 * dpi
}

/// The display to surface transform for a surface `height` pixels tall.
pub fn flip_transform(height: f64) -> Affine {
    Affine::FLIP_Y.then_translate((0.0, height).into())
}

/// Where the renderer is within a frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FrameState {
    /// No frame in progress.
    #[default]
    Idle,
    /// Commands are being issued.
    Drawing,
    /// The last frame stopped on an error.
    Failed,
}

/// Issues canvas calls for draw commands.
///
/// A renderer borrows its surface and text services for the duration of a
/// frame. The surface size is read once at construction; a surface resize
/// requires a new renderer.
pub struct Renderer<'a> {
    canvas: &'a mut dyn Canvas2d,
    fonts: &'a mut FontCache,
    math: Option<&'a dyn MathTextEngine>,
    registrar: Option<&'a mut dyn FontRegistrar>,
    dpi: f64,
    width: f64,
    height: f64,
    state: FrameState,
}

impl core::fmt::Debug for Renderer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Renderer")
            .field("dpi", &self.dpi)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> Renderer<'a> {
    /// Render onto `canvas` at `dpi`, resolving fonts through `fonts`.
    pub fn new(canvas: &'a mut dyn Canvas2d, fonts: &'a mut FontCache, dpi: f64) -> Self {
        let width = canvas.width();
        let height = canvas.height();
        Self {
            canvas,
            fonts,
            math: None,
            registrar: None,
            dpi,
            width,
            height,
            state: FrameState::Idle,
        }
    }

    /// Lay out math text with `engine`.
    pub fn with_math(mut self, engine: &'a dyn MathTextEngine) -> Self {
        self.math = Some(engine);
        self
    }

    /// Hand fonts used for text to `registrar` before first use.
    pub fn with_registrar(mut self, registrar: &'a mut dyn FontRegistrar) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Output resolution.
    pub fn dpi(&self) -> f64 {
        self.dpi
    }

    /// Surface width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Frame progress.
    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Convert points to pixels at this renderer's resolution.
    pub fn points_to_pixels(&self, points: f64) -> f64 {
        points_to_pixels(points, self.dpi)
    }

    /// Stroke, and optionally fill, `path` under `transform`.
    ///
    /// Fill uses `fill`, stroke uses the context color and is skipped for a
    /// zero line width. Paths with neither fill nor hatch are clipped to the
    /// figure so off-screen line runs do not reach the surface.
    pub fn draw_path(
        &mut self,
        gc: &GraphicsContext,
        path: &BezPath,
        transform: Affine,
        fill: Option<ColorValue>,
    ) -> Result<(), RenderError> {
        let (width, height, dpi) = (self.width, self.height, self.dpi);
        let mut scope = open_gc_scope(&mut *self.canvas, gc, height, dpi);
        if let Some(face) = fill {
            scope.set_fill_style(&to_css_color(face, gc.alpha(), gc.forced_alpha()));
        }
        scope.set_line_cap(gc.capstyle().to_line_cap());
        scope.set_stroke_style(&to_css_color(gc.rgb(), gc.alpha(), gc.forced_alpha()));
        scope.set_line_width(points_to_pixels(gc.linewidth(), dpi));

        let clip = (fill.is_none() && gc.hatch().is_none())
            .then(|| Rect::new(0.0, 0.0, width, height));
        emit_path(&mut *scope, path, flip_transform(height) * transform, clip);

        if fill.is_some() {
            scope.fill();
            scope.set_fill_style("#000000");
        }
        if gc.stroke() {
            scope.stroke();
        }
        Ok(())
    }

    /// Draw `marker` at every vertex of `path`.
    ///
    /// `marker_transform` maps the marker to pixels around the origin;
    /// `transform` maps `path` to display space.
    pub fn draw_markers(
        &mut self,
        gc: &GraphicsContext,
        marker: &BezPath,
        marker_transform: Affine,
        path: &BezPath,
        transform: Affine,
        fill: Option<ColorValue>,
    ) -> Result<(), RenderError> {
        for el in path.elements() {
            let Some(vertex) = el.end_point() else {
                continue;
            };
            let at = transform * vertex;
            if !(at.x.is_finite() && at.y.is_finite()) {
                continue;
            }
            let placed = marker_transform.then_translate(at.to_vec2());
            self.draw_path(gc, marker, placed, fill)?;
        }
        Ok(())
    }

    /// Draw a bottom-up image with its lower-left corner at `(x, y)`.
    pub fn draw_image(
        &mut self,
        gc: &GraphicsContext,
        x: f64,
        y: f64,
        image: &RasterImage,
    ) -> Result<(), RenderError> {
        let rgba = image.to_rgba();
        let top = self.height - y - f64::from(image.height());
        let mut scope = open_gc_scope(&mut *self.canvas, gc, self.height, self.dpi);
        scope.draw_image(&rgba, x, top);
        Ok(())
    }

    /// Draw `text` with its anchor at `(x, y)`, rotated by `angle` degrees
    /// counter-clockwise.
    ///
    /// Plain text is filled with the surface's text API after registering
    /// its font. Math text is drawn from glyph outlines; if that fails the
    /// expression is rasterized and blitted instead.
    #[allow(clippy::too_many_arguments, reason = "mirrors the figure text call")]
    pub fn draw_text(
        &mut self,
        gc: &GraphicsContext,
        x: f64,
        y: f64,
        text: &str,
        props: &FontProperties,
        angle: f64,
        is_math: bool,
    ) -> Result<(), RenderError> {
        if is_math {
            self.draw_math_text(gc, x, y, text, props, angle)
        } else {
            self.draw_plain_text(gc, x, y, text, props, angle)
        }
    }

    /// Extents of `text` in pixels at this renderer's resolution.
    ///
    /// Math text is laid out at 72 dpi, matching how figures size math
    /// labels in points.
    pub fn get_text_width_height_descent(
        &mut self,
        text: &str,
        props: &FontProperties,
        is_math: bool,
    ) -> Result<TextExtents, RenderError> {
        if is_math {
            let engine = self.math.ok_or(RenderError::MathUnavailable)?;
            let layout = engine
                .parse(text, 72.0, props)
                .map_err(RenderError::MathRenderFailed)?;
            return Ok(TextExtents {
                width: layout.width,
                height: layout.height,
                descent: layout.depth,
            });
        }
        Ok(self.fonts.measure_text(text, props, self.dpi)?)
    }

    /// Execute one draw command.
    pub fn draw_command(&mut self, command: &DrawCommand) -> Result<(), RenderError> {
        match command {
            DrawCommand::Path {
                gc,
                path,
                transform,
                fill,
            } => self.draw_path(gc, path, *transform, *fill),
            DrawCommand::Markers {
                gc,
                marker,
                marker_transform,
                path,
                transform,
                fill,
            } => self.draw_markers(gc, marker, *marker_transform, path, *transform, *fill),
            DrawCommand::Text {
                gc,
                position,
                text,
                props,
                angle,
                is_math,
            } => self.draw_text(gc, position.x, position.y, text, props, *angle, *is_math),
            DrawCommand::Image {
                gc,
                position,
                image,
            } => self.draw_image(gc, position.x, position.y, image),
        }
    }

    /// Execute a frame's commands in order.
    ///
    /// The first failing command stops the frame; its error is returned as
    /// [`RenderError::RenderFailed`].
    pub fn render_frame(&mut self, commands: &[DrawCommand]) -> Result<(), RenderError> {
        self.begin_frame();
        let result = commands.iter().try_for_each(|c| self.draw_command(c));
        self.end_frame(result)
    }

    /// Mark the start of a frame.
    pub fn begin_frame(&mut self) {
        self.state = FrameState::Drawing;
    }

    /// Mark the end of a frame, wrapping any error as a frame failure.
    pub fn end_frame(&mut self, result: Result<(), RenderError>) -> Result<(), RenderError> {
        match result {
            Ok(()) => {
                self.state = FrameState::Idle;
                Ok(())
            }
            Err(err) => {
                self.state = FrameState::Failed;
                Err(err.into_frame_failure())
            }
        }
    }

    fn draw_plain_text(
        &mut self,
        gc: &GraphicsContext,
        x: f64,
        y: f64,
        text: &str,
        props: &FontProperties,
        angle: f64,
    ) -> Result<(), RenderError> {
        let extents = self.fonts.measure_text(text, props, self.dpi)?;
        let font = self.fonts.resolve_font(props)?;
        if let Some(registrar) = self.registrar.as_deref_mut() {
            self.fonts
                .ensure_registered(&font, font.family_name(), registrar);
        }

        let radians = angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        let x = x - sin * extents.descent;
        let y = self.height - y - cos * extents.descent;
        let css_font = format!(
            "{} {} {}px {}, {}",
            props.style.as_css(),
            props.weight,
            format_g(self.points_to_pixels(props.size_pt), 3),
            font.family_name(),
            props.primary_family(),
        );

        let mut scope = open_gc_scope(&mut *self.canvas, gc, self.height, self.dpi);
        if radians != 0.0 {
            scope.push();
            scope.translate(x, y);
            scope.rotate(-radians);
            scope.translate(-x, -y);
        }
        scope.set_font(&css_font);
        scope.set_fill_style(&to_css_color(gc.rgb(), gc.alpha(), gc.forced_alpha()));
        scope.fill_text(text, x, y);
        scope.set_fill_style("#000000");
        Ok(())
    }

    fn draw_math_text(
        &mut self,
        gc: &GraphicsContext,
        x: f64,
        y: f64,
        text: &str,
        props: &FontProperties,
        angle: f64,
    ) -> Result<(), RenderError> {
        let engine = self.math.ok_or(RenderError::MathUnavailable)?;
        let Err(err) = self.draw_math_outlines(engine, gc, x, y, text, props, angle) else {
            return Ok(());
        };
        log::warn!(
            "math text {text:?} failed as paths ({}: {err}); using raster fallback",
            err.kind()
        );

        let raster = engine
            .rasterize(text, props, gc.rgb().rgb(), self.dpi)
            .map_err(RenderError::MathRenderFailed)?;
        let rgba = raster.image.to_rgba();
        let (cx, cy) = (x, self.height - y);
        let top = self.height - (y - raster.depth) - f64::from(rgba.height);

        let mut scope = open_gc_scope(&mut *self.canvas, gc, self.height, self.dpi);
        if angle != 0.0 {
            scope.push();
            scope.translate(cx, cy);
            scope.rotate(-angle.to_radians());
            scope.translate(-cx, -cy);
        }
        scope.draw_image(&rgba, x, top);
        Ok(())
    }

    #[allow(clippy::too_many_arguments, reason = "internal helper of draw_math_text")]
    fn draw_math_outlines(
        &mut self,
        engine: &dyn MathTextEngine,
        gc: &GraphicsContext,
        x: f64,
        y: f64,
        text: &str,
        props: &FontProperties,
        angle: f64,
    ) -> Result<(), MathError> {
        let layout = engine.parse(text, self.dpi, props)?;
        let mut scope = open_gc_scope(&mut *self.canvas, gc, self.height, self.dpi);
        scope.translate(x, self.height - y);
        if angle != 0.0 {
            scope.rotate(-angle.to_radians());
        }
        scope.set_fill_style(&to_css_color(gc.rgb(), gc.alpha(), gc.forced_alpha()));

        for glyph in &layout.glyphs {
            let face = glyph.font.face();
            let outline = face
                .glyph_outline(glyph.glyph)
                .ok_or_else(|| MathError::MissingGlyph {
                    glyph: glyph.glyph,
                    family: glyph.font.family_name().to_string(),
                })?;
            let scale = glyph.size / face.units_per_em();
            scope.push();
            scope.translate(glyph.offset.x, -glyph.offset.y);
            emit_path(
                &mut *scope,
                &outline,
                Affine::scale_non_uniform(scale, -scale),
                None,
            );
            scope.fill();
            scope.pop();
        }
        for rule in &layout.rects {
            scope.fill_rect(rule.x0, -rule.y1, rule.width(), rule.height());
        }
        Ok(())
    }
}

/// Open a save scope and apply the context's clip and dash state.
fn open_gc_scope<'c, C: Canvas2d + ?Sized>(
    canvas: &'c mut C,
    gc: &GraphicsContext,
    height: f64,
    dpi: f64,
) -> SaveScope<'c, C> {
    let mut scope = SaveScope::open(canvas);
    if let Some(rect) = gc.clip_rectangle() {
        scope.push();
        let x = rect.x0.round_ties_even();
        let y = rect.y0.round_ties_even();
        let w = rect.width().round_ties_even();
        let h = rect.height().round_ties_even();
        scope.begin_path();
        scope.rect(x, height - y - h, w, h);
        scope.clip();
    }
    if let Some(clip) = gc.clip_path() {
        scope.push();
        emit_path(
            &mut *scope,
            &clip.path,
            flip_transform(height) * clip.transform,
            None,
        );
        scope.clip();
    }
    let dashes = gc.dashes();
    if let Some(offset) = dashes.offset {
        scope.set_line_dash_offset(points_to_pixels(offset, dpi));
    }
    match &dashes.lengths {
        Some(lengths) => {
            let pixels: Vec<f64> = lengths.iter().map(|l| points_to_pixels(*l, dpi)).collect();
            scope.set_line_dash(&pixels);
        }
        None => scope.set_line_dash(&[]),
    }
    scope.set_line_join(gc.joinstyle().to_line_join());
    scope
}
