// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Math-expression layout seam.
//!
//! Typesetting is external. An engine turns an expression into positioned
//! glyphs and filled rules; the renderer draws each glyph from its outline.

use figdraw_imaging::image::RasterImage;
use kurbo::{Point, Rect};

use crate::cache::FontHandle;
use crate::props::FontProperties;
use crate::MathError;

/// One positioned glyph of a laid-out expression.
#[derive(Clone, Debug)]
pub struct MathGlyph {
    /// Font the glyph comes from.
    pub font: FontHandle,
    /// Size in pixels.
    pub size: f64,
    /// Character to draw.
    pub glyph: char,
    /// Origin relative to the expression's baseline origin (y up).
    pub offset: Point,
}

/// Laid-out math expression.
#[derive(Clone, Debug, Default)]
pub struct MathLayout {
    /// Advance width in pixels.
    pub width: f64,
    /// Total height in pixels.
    pub height: f64,
    /// Depth below the baseline in pixels.
    pub depth: f64,
    /// Positioned glyphs.
    pub glyphs: Vec<MathGlyph>,
    /// Filled rules (fraction bars, radicals), y up relative to the baseline.
    pub rects: Vec<Rect>,
}

/// A rasterized expression, for surfaces where glyph paths failed.
#[derive(Clone, Debug)]
pub struct MathRaster {
    /// Pixels, bottom row first.
    pub image: RasterImage,
    /// Depth below the baseline in pixels.
    pub depth: f64,
}

/// External math typesetter.
pub trait MathTextEngine {
    /// Lay out `text` at `dpi`.
    fn parse(&self, text: &str, dpi: f64, props: &FontProperties)
    -> Result<MathLayout, MathError>;

    /// Render `text` to an image in color `rgb` at `dpi`.
    fn rasterize(
        &self,
        text: &str,
        props: &FontProperties,
        rgb: [f64; 3],
        dpi: f64,
    ) -> Result<MathRaster, MathError>;
}
