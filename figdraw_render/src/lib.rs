// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Render: figure draw commands onto an immediate-mode canvas.
//!
//! A figure describes itself as paths, markers, text and images in display
//! space (pixels, origin bottom-left, y up), each with a
//! [`GraphicsContext`] carrying its style. The [`Renderer`] turns those into
//! [`Canvas2d`](figdraw_imaging::Canvas2d) calls:
//!
//! - every draw is bracketed by `save`/`restore`, with the context's clip
//!   rectangle, clip path, dashes and join applied inside the bracket;
//! - paths are flipped into raster space and emitted segment by segment;
//! - plain text goes through the surface text API, after the font file has
//!   been handed to a [`FontRegistrar`](figdraw_text::FontRegistrar);
//! - math text is drawn from glyph outlines supplied by a
//!   [`MathTextEngine`](figdraw_text::MathTextEngine), with a raster
//!   fallback.
//!
//! ## Usage
//!
//! ```
//! use figdraw_imaging_ref::RecordingCanvas;
//! use figdraw_render::{ColorValue, GraphicsContext, Renderer};
//! use figdraw_text::{FileFontLoader, FontCache, DirectoryFontLocator};
//! use kurbo::{Affine, BezPath};
//!
//! let mut canvas = RecordingCanvas::new(100.0, 100.0);
//! let mut fonts = FontCache::new(
//!     Box::new(DirectoryFontLocator::default()),
//!     Box::new(FileFontLoader),
//! );
//! let mut renderer = Renderer::new(&mut canvas, &mut fonts, 72.0);
//!
//! let mut square = BezPath::new();
//! square.move_to((10.0, 10.0));
//! square.line_to((20.0, 10.0));
//! square.line_to((20.0, 20.0));
//! square.close_path();
//!
//! let fill = ColorValue::Rgb([1.0, 0.0, 0.0]);
//! renderer
//!     .draw_path(&GraphicsContext::new(), &square, Affine::IDENTITY, Some(fill))
//!     .unwrap();
//! assert_eq!(canvas.state().save_depth, 0);
//! ```

mod color;
mod command;
mod error;
mod gc;
mod renderer;
mod scope;

pub use color::{format_g, to_css_color, ColorValue};
pub use command::{CommandFigure, DrawCommand, Figure, NavigationRequest};
pub use error::{RenderError, StyleKind};
pub use gc::{CapStyle, ClipPath, Dashes, GraphicsContext, JoinStyle};
pub use renderer::{flip_transform, points_to_pixels, FrameState, Renderer};
