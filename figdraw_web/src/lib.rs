// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Web: a browser host for [`FigureCanvas`](figdraw_canvas::FigureCanvas).
//!
//! Everything in this crate is only available on `wasm32`. It supplies the
//! host capabilities the canvas is written against:
//!
//! - [`WebCanvas`]: [`Canvas2d`](figdraw_imaging::Canvas2d) over a
//!   `CanvasRenderingContext2d`.
//! - [`DomSurfaceProvider`]: the element tree in the live document. Figures
//!   are mounted under `document.figdrawTarget` when a page sets it, and
//!   under the body otherwise.
//! - [`WebTaskQueue`]: `setTimeout` and `setInterval`.
//! - [`WebFontRegistrar`]: `FontFace` loading through `document.fonts`.
//!
//! [`WebFigure`] ties them together and forwards DOM events to the canvas.
//!
//! ```no_run
//! #[cfg(target_arch = "wasm32")]
//! fn open(
//!     figure: figdraw_render::CommandFigure,
//!     fonts: figdraw_text::FontCache,
//! ) -> Result<figdraw_web::WebFigure<figdraw_render::CommandFigure>, wasm_bindgen::JsValue> {
//!     figdraw_web::init_logging(log::Level::Info);
//!     let web = figdraw_web::WebFigure::open(
//!         figure,
//!         fonts,
//!         figdraw_canvas::CanvasConfig::default(),
//!         |event| log::debug!("{event:?}"),
//!     )?;
//!     web.show()?;
//!     Ok(web)
//! }
//! ```

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod fonts;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod tasks;

#[cfg(target_arch = "wasm32")]
pub use canvas::WebCanvas;
#[cfg(target_arch = "wasm32")]
pub use dom::{DomSurfaceProvider, MOUNT_PROPERTY};
#[cfg(target_arch = "wasm32")]
pub use fonts::WebFontRegistrar;
#[cfg(target_arch = "wasm32")]
pub use host::{init_logging, WebFigure};
#[cfg(target_arch = "wasm32")]
pub use tasks::{Dispatch, WebTaskQueue};
