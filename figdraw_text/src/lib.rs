// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figdraw Text: fonts for an immediate-mode figure renderer.
//!
//! This crate resolves font requests to decoded outline fonts, caches
//! them, measures text, and tracks the one-time registration of each font
//! file with the drawing surface. It does **not** lay out math; instead it
//! defines the [`MathTextEngine`] seam that an external math typesetter
//! implements.
//!
//! # Core concepts
//!
//! - [`FontProperties`]: the request (families, style, weight, size). Its
//!   [`FontKey`] is everything but the size, so one decoded font serves all
//!   sizes.
//! - [`OutlineFont`]: glyph metrics and outlines for one face, implemented
//!   over `skrifa` by [`SkrifaFont`].
//! - [`FontCache`]: a bounded least-recently-used cache in front of a
//!   [`FontLocator`] and a [`FontLoader`], plus plain-text measurement.
//! - Registration: [`FontCache::ensure_registered`] hands each font file to
//!   a [`FontRegistrar`] exactly once and returns a [`RegistrationTicket`];
//!   completing the ticket tells the caller to redraw.
//!
//! # Example
//!
//! ```no_run
//! use figdraw_text::{DirectoryFontLocator, FileFontLoader, FontCache, FontProperties};
//!
//! let locator = DirectoryFontLocator::scan(["/usr/share/fonts"]).unwrap();
//! let mut fonts = FontCache::new(Box::new(locator), Box::new(FileFontLoader));
//! let props = FontProperties::new("sans-serif").with_size(12.0);
//! let extents = fonts.measure_text("Hello", &props, 72.0).unwrap();
//! assert!(extents.width > 0.0);
//! ```

mod cache;
mod error;
mod loader;
mod math;
mod outline;
mod props;

pub use cache::{
    FontCache, FontCacheConfig, FontHandle, FontRegistrar, LoadedFont, RegistrationRequest,
    RegistrationTicket,
};
pub use error::{FontError, MathError, MathErrorKind};
pub use loader::{DirectoryFontLocator, FileFontLoader, FontLoader, FontLocator};
pub use math::{MathGlyph, MathLayout, MathRaster, MathTextEngine};
pub use outline::{FixedExtents, OutlineFont, SkrifaFont, TextExtents};
pub use props::{FontKey, FontProperties, FontStyle, FontVariant, FontWeight};
