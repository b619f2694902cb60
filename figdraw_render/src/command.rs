// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained draw commands and the figure seam.

use figdraw_imaging::image::RasterImage;
use figdraw_text::FontProperties;
use kurbo::{Affine, BezPath, Point, Rect, Size};

use crate::color::ColorValue;
use crate::error::RenderError;
use crate::gc::GraphicsContext;
use crate::renderer::Renderer;

/// One figure draw command, in display space (y up, pixels).
#[derive(Clone, Debug)]
pub enum DrawCommand {
    /// Stroke, and optionally fill, a path.
    Path {
        /// Style.
        gc: GraphicsContext,
        /// Outline in path space.
        path: BezPath,
        /// Path to display transform.
        transform: Affine,
        /// Fill color.
        fill: Option<ColorValue>,
    },
    /// Draw a marker at each vertex of a path.
    Markers {
        /// Style.
        gc: GraphicsContext,
        /// Marker outline.
        marker: BezPath,
        /// Marker to pixel transform, centered on the origin.
        marker_transform: Affine,
        /// Vertex positions.
        path: BezPath,
        /// Vertex to display transform.
        transform: Affine,
        /// Marker fill color.
        fill: Option<ColorValue>,
    },
    /// Draw a text run.
    Text {
        /// Style.
        gc: GraphicsContext,
        /// Anchor position.
        position: Point,
        /// Content.
        text: String,
        /// Font request.
        props: FontProperties,
        /// Counter-clockwise rotation in degrees.
        angle: f64,
        /// Lay out as a math expression.
        is_math: bool,
    },
    /// Draw an image.
    Image {
        /// Style.
        gc: GraphicsContext,
        /// Lower-left corner.
        position: Point,
        /// Pixels, bottom row first.
        image: RasterImage,
    },
}

impl DrawCommand {
    /// The same command for output at `scale` times the authored resolution.
    ///
    /// Positions and transforms scale; line widths and font sizes are in
    /// points and follow the renderer's dpi on their own. Image pixels are
    /// placed unscaled.
    pub fn scaled(&self, scale: f64) -> Self {
        let s = Affine::scale(scale);
        match self.clone() {
            Self::Path {
                gc,
                path,
                transform,
                fill,
            } => Self::Path {
                gc: scale_clip(gc, scale),
                path,
                transform: s * transform,
                fill,
            },
            Self::Markers {
                gc,
                marker,
                marker_transform,
                path,
                transform,
                fill,
            } => Self::Markers {
                gc: scale_clip(gc, scale),
                marker,
                marker_transform: s * marker_transform,
                path,
                transform: s * transform,
                fill,
            },
            Self::Text {
                gc,
                position,
                text,
                props,
                angle,
                is_math,
            } => Self::Text {
                gc: scale_clip(gc, scale),
                position: s * position,
                text,
                props,
                angle,
                is_math,
            },
            Self::Image {
                gc,
                position,
                image,
            } => Self::Image {
                gc: scale_clip(gc, scale),
                position: s * position,
                image,
            },
        }
    }
}

fn scale_clip(mut gc: GraphicsContext, scale: f64) -> GraphicsContext {
    if let Some(rect) = gc.clip_rectangle() {
        gc.set_clip_rectangle(Some(Rect::new(
            rect.x0 * scale,
            rect.y0 * scale,
            rect.x1 * scale,
            rect.y1 * scale,
        )));
    }
    if let Some(clip) = gc.clip_path().cloned() {
        gc.set_clip_path(Some(crate::gc::ClipPath {
            path: clip.path,
            transform: Affine::scale(scale) * clip.transform,
        }));
    }
    gc
}

/// A navigation step requested by the toolbar or pointer tools.
#[derive(Clone, Debug, PartialEq)]
pub enum NavigationRequest {
    /// Return to the initial view.
    Home,
    /// Previous view in the history.
    Back,
    /// Next view in the history.
    Forward,
    /// Drag the view from `from` to `to`, in display pixels.
    Pan {
        /// Drag start.
        from: Point,
        /// Current drag position.
        to: Point,
    },
    /// Zoom to a display-space rectangle.
    ZoomToRect {
        /// Selected region.
        rect: Rect,
        /// Zoom in (primary button) or out (secondary button).
        zoom_in: bool,
    },
    /// Open subplot spacing controls.
    ConfigureSubplots,
}

/// A drawable figure.
///
/// The figure owns its resolution. Surfaces temporarily scale it for
/// high-density displays and restore it after each frame.
pub trait Figure {
    /// Resolution in dots per inch.
    fn dpi(&self) -> f64;

    /// Change the resolution.
    fn set_dpi(&mut self, dpi: f64);

    /// Physical size in inches.
    fn size_inches(&self) -> Size;

    /// Change the physical size.
    fn set_size_inches(&mut self, size: Size);

    /// Logical size in pixels at the current resolution.
    fn width_height(&self) -> Size {
        let s = self.size_inches();
        Size::new(s.width * self.dpi(), s.height * self.dpi())
    }

    /// Issue this figure's draw commands at the current resolution.
    fn draw(&mut self, renderer: &mut Renderer<'_>) -> Result<(), RenderError>;

    /// Apply a navigation step. Returns `true` when the view changed.
    fn navigate(&mut self, request: &NavigationRequest) -> bool {
        let _ = request;
        false
    }
}

/// A figure made of retained commands authored at a fixed resolution.
#[derive(Clone, Debug)]
pub struct CommandFigure {
    size_inches: Size,
    dpi: f64,
    authored_dpi: f64,
    commands: Vec<DrawCommand>,
}

impl CommandFigure {
    /// A figure `size_inches` large whose commands are authored at `dpi`.
    pub fn new(size_inches: Size, dpi: f64) -> Self {
        Self {
            size_inches,
            dpi,
            authored_dpi: dpi,
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Append a command, builder style.
    pub fn with(mut self, command: DrawCommand) -> Self {
        self.push(command);
        self
    }

    /// The authored commands.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

impl Figure for CommandFigure {
    fn dpi(&self) -> f64 {
        self.dpi
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.dpi = dpi;
    }

    fn size_inches(&self) -> Size {
        self.size_inches
    }

    fn set_size_inches(&mut self, size: Size) {
        self.size_inches = size;
    }

    fn draw(&mut self, renderer: &mut Renderer<'_>) -> Result<(), RenderError> {
        let scale = self.dpi / self.authored_dpi;
        if scale == 1.0 {
            return self
                .commands
                .iter()
                .try_for_each(|c| renderer.draw_command(c));
        }
        self.commands
            .iter()
            .try_for_each(|c| renderer.draw_command(&c.scaled(scale)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_height_follows_dpi() {
        let mut fig = CommandFigure::new(Size::new(4.0, 3.0), 100.0);
        assert_eq!(fig.width_height(), Size::new(400.0, 300.0));
        fig.set_dpi(200.0);
        assert_eq!(fig.width_height(), Size::new(800.0, 600.0));
    }

    #[test]
    fn scaling_moves_positions_and_clips() {
        let mut gc = GraphicsContext::new();
        gc.set_clip_rectangle(Some(Rect::new(1.0, 2.0, 3.0, 4.0)));
        let cmd = DrawCommand::Text {
            gc,
            position: Point::new(10.0, 20.0),
            text: "a".into(),
            props: FontProperties::default(),
            angle: 0.0,
            is_math: false,
        };
        let DrawCommand::Text { gc, position, .. } = cmd.scaled(2.0) else {
            panic!("variant is preserved");
        };
        assert_eq!(position, Point::new(20.0, 40.0));
        assert_eq!(gc.clip_rectangle(), Some(Rect::new(2.0, 4.0, 6.0, 8.0)));
    }
}
