// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Canvas: an interactive figure surface over an abstract host.
//!
//! [`FigureCanvas`] binds a [`Figure`](figdraw_render::Figure) to three host
//! capabilities:
//!
//! - a [`SurfaceProvider`] for the element tree and its drawing layers,
//! - a [`TaskQueue`] for deferred redraws and timers,
//! - optionally a [`FontRegistrar`](figdraw_text::FontRegistrar) that loads
//!   font files into the surface.
//!
//! On top of those it provides the surface lifecycle (show, destroy, idle
//! redraws at device pixel ratio), input normalization, the navigation
//! toolbar with pan and zoom, timers, and export to PNG, SVG and PDF.
//!
//! Everything is single threaded. The host calls back into the canvas with
//! the [`Task`] values it was given, through [`FigureCanvas::dispatch`].
//!
//! ## Usage
//!
//! ```
//! use figdraw_canvas::{CanvasConfig, FigureCanvas, ManualTaskQueue, MemorySurfaceProvider};
//! use figdraw_render::CommandFigure;
//! use figdraw_text::{DirectoryFontLocator, FileFontLoader, FontCache};
//! use kurbo::Size;
//!
//! let figure = CommandFigure::new(Size::new(4.0, 3.0), 100.0);
//! let fonts = FontCache::new(
//!     Box::new(DirectoryFontLocator::default()),
//!     Box::new(FileFontLoader),
//! );
//! let mut canvas = FigureCanvas::new(
//!     figure,
//!     MemorySurfaceProvider::new(),
//!     ManualTaskQueue::new(),
//!     fonts,
//!     None,
//!     CanvasConfig::default(),
//! );
//! canvas.set_window_title("Figure 1");
//! canvas.show().unwrap();
//! assert_eq!(canvas.window_title(), "Figure 1");
//!
//! canvas.draw_idle();
//! canvas.draw_idle();
//! assert_eq!(canvas.run_for(1).unwrap(), 1);
//!
//! canvas.destroy();
//! canvas.destroy();
//! ```

mod canvas;
mod config;
mod error;
mod export;
mod input;
mod memory;
mod provider;
mod tasks;
mod timer;
mod toolbar;

pub use canvas::{FigureCanvas, TimerCallback, TOOLBAR_BUTTON_CLASS, TOOLBAR_TEXT_CLASS};
pub use config::{CanvasConfig, Metadata};
pub use error::ExportError;
pub use export::{ExportFormat, RenderTarget};
pub use input::{
    convert_pointer, key_name, CanvasEvent, Cursor, InputOutcome, KeyInput, PointerInput,
    ScrollInput,
};
pub use memory::{MemoryFontRegistrar, MemoryNode, MemorySurfaceProvider, RegisteredFont};
pub use provider::{
    resolve_dpr, Element, ElementKind, NodeId, Parent, PixelRatioProbe, SurfaceProvider,
    BACKING_STORE_PROPERTIES,
};
pub use tasks::{ManualTaskQueue, Task, TaskHandle, TaskQueue};
pub use timer::{Timer, TimerId};
pub use toolbar::{
    icon_class, toolbar_layout, NavMode, ToolItem, ToolbarCommand, ToolbarEntry, TOOL_ITEMS,
};
