// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fakes for renderer tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use figdraw_imaging::image::{PixelLayout, RasterImage};
use figdraw_imaging_ref::RecordingCanvas;
use figdraw_imaging::CanvasCall;
use figdraw_text::{
    FixedExtents, FontCache, FontError, FontLoader, FontLocator, FontProperties, FontRegistrar,
    MathError, MathGlyph, MathLayout, MathRaster, MathTextEngine, OutlineFont,
    RegistrationRequest,
};
use kurbo::{BezPath, Point, Rect};

/// A face whose glyphs are all a unit-em square; `?` has no outline.
#[derive(Debug)]
pub struct BoxFace;

impl OutlineFont for BoxFace {
    fn family_name(&self) -> &str {
        "Box Sans"
    }

    fn units_per_em(&self) -> f64 {
        1000.0
    }

    fn glyph_outline(&self, ch: char) -> Option<BezPath> {
        if ch == '?' {
            return None;
        }
        let mut p = BezPath::new();
        p.move_to((0.0, 0.0));
        p.line_to((1000.0, 0.0));
        p.line_to((1000.0, 1000.0));
        p.close_path();
        Some(p)
    }

    fn layout_extents(&self, text: &str, size_px: f64) -> FixedExtents {
        // Half-em advance, one em tall, a fifth of an em of descent.
        #[allow(clippy::cast_possible_truncation, reason = "test metrics are small")]
        let em = (size_px * 64.0) as i64;
        let n = i64::try_from(text.chars().count()).unwrap();
        FixedExtents {
            width: n * em / 2,
            height: em,
            descent: em / 5,
        }
    }
}

pub struct BoxLocator;

impl FontLocator for BoxLocator {
    fn find_font(&self, props: &FontProperties) -> Option<PathBuf> {
        (props.primary_family() != "missing").then(|| PathBuf::from("/fonts/BoxSans.ttf"))
    }
}

pub struct BoxLoader;

impl FontLoader for BoxLoader {
    fn load(&self, _path: &Path) -> Result<Arc<dyn OutlineFont>, FontError> {
        Ok(Arc::new(BoxFace))
    }
}

pub fn font_cache() -> FontCache {
    FontCache::new(Box::new(BoxLocator), Box::new(BoxLoader))
}

#[derive(Default)]
pub struct Registrations(pub Vec<(String, String)>);

impl FontRegistrar for Registrations {
    fn register(&mut self, request: RegistrationRequest<'_>) {
        self.0
            .push((request.family.to_string(), request.source.to_string()));
    }
}

/// A math engine that lays out each character as a glyph 10px apart and
/// draws one rule under the expression.
pub struct LinearMath {
    pub fonts: std::cell::RefCell<FontCache>,
    pub raster_fails: bool,
}

impl LinearMath {
    pub fn new() -> Self {
        Self {
            fonts: std::cell::RefCell::new(font_cache()),
            raster_fails: false,
        }
    }
}

impl MathTextEngine for LinearMath {
    fn parse(
        &self,
        text: &str,
        dpi: f64,
        props: &FontProperties,
    ) -> Result<MathLayout, MathError> {
        let body = text.trim_matches('$');
        if body.is_empty() {
            return Err(MathError::Parse {
                text: text.to_string(),
                message: "empty expression".to_string(),
            });
        }
        let font = self.fonts.borrow_mut().resolve_font(props)?;
        let size = props.size_px(dpi);
        let glyphs: Vec<MathGlyph> = body
            .chars()
            .enumerate()
            .map(|(i, glyph)| MathGlyph {
                font: font.clone(),
                size,
                glyph,
                offset: Point::new(10.0 * i as f64, 0.0),
            })
            .collect();
        let width = 10.0 * glyphs.len() as f64;
        Ok(MathLayout {
            width,
            height: size,
            depth: 2.0,
            glyphs,
            rects: vec![Rect::new(0.0, -2.0, width, -1.0)],
        })
    }

    fn rasterize(
        &self,
        text: &str,
        _props: &FontProperties,
        _rgb: [f64; 3],
        _dpi: f64,
    ) -> Result<MathRaster, MathError> {
        if self.raster_fails {
            return Err(MathError::Raster(format!("cannot rasterize {text:?}")));
        }
        let image = RasterImage::new(4, 2, PixelLayout::Rgba8, vec![0; 4 * 2 * 4])
            .map_err(|e| MathError::Raster(e.to_string()))?;
        Ok(MathRaster { image, depth: 1.0 })
    }
}

/// Calls issued after the last `clear_events`.
pub fn calls(canvas: &RecordingCanvas) -> Vec<CanvasCall> {
    canvas.calls()
}

/// Only the path-building calls.
pub fn segments(canvas: &RecordingCanvas) -> Vec<CanvasCall> {
    canvas
        .calls()
        .into_iter()
        .filter(CanvasCall::is_path_segment)
        .collect()
}

pub fn unit_square() -> BezPath {
    let mut p = BezPath::new();
    p.move_to((0.0, 0.0));
    p.line_to((1.0, 0.0));
    p.line_to((1.0, 1.0));
    p.line_to((0.0, 1.0));
    p.close_path();
    p
}
