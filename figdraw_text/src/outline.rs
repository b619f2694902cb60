// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::sync::Arc;

use kurbo::BezPath;
use skrifa::attribute::Style;
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::raw::TableProvider;
use skrifa::string::StringId;
use skrifa::{FontRef, GlyphId, MetadataProvider};

use crate::FontError;
use crate::props::{FontStyle, FontWeight};

/// Ink extents of a run of text, in 26.6 fixed point (64 units per pixel).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedExtents {
    /// Sum of glyph advances.
    pub width: i64,
    /// Ascent plus descent.
    pub height: i64,
    /// Distance from the baseline to the lowest ink, non-negative.
    pub descent: i64,
}

impl FixedExtents {
    /// Convert to floating point pixels.
    pub fn to_pixels(self) -> TextExtents {
        TextExtents {
            width: self.width as f64 / 64.0,
            height: self.height as f64 / 64.0,
            descent: self.descent as f64 / 64.0,
        }
    }
}

/// Width, height and descent of a run of text.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextExtents {
    /// Advance width.
    pub width: f64,
    /// Ascent plus descent.
    pub height: f64,
    /// Distance from the baseline to the lowest ink.
    pub descent: f64,
}

/// A decoded outline face.
///
/// Sizes are supplied per call; implementations hold no "current size".
pub trait OutlineFont: fmt::Debug + Send + Sync {
    /// Family name from the naming table.
    fn family_name(&self) -> &str;

    /// Design units per em.
    fn units_per_em(&self) -> f64;

    /// Weight class of the face.
    fn weight(&self) -> FontWeight {
        FontWeight::NORMAL
    }

    /// Slant of the face.
    fn style(&self) -> FontStyle {
        FontStyle::Normal
    }

    /// Outline of the glyph mapped to `ch`, in unscaled font units (y up).
    fn glyph_outline(&self, ch: char) -> Option<BezPath>;

    /// Extents of `text` laid out on one line at `size_px`, unhinted.
    fn layout_extents(&self, text: &str, size_px: f64) -> FixedExtents;
}

/// [`OutlineFont`] over raw font bytes, backed by `skrifa`.
pub struct SkrifaFont {
    data: Arc<[u8]>,
    index: u32,
    family: String,
    units_per_em: f64,
    weight: FontWeight,
    style: FontStyle,
}

impl fmt::Debug for SkrifaFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkrifaFont")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .field("bytes", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl SkrifaFont {
    /// Decode the first face in `data`.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self, FontError> {
        Self::from_index(data, 0)
    }

    /// Decode face `index` of a font collection.
    pub fn from_index(data: impl Into<Arc<[u8]>>, index: u32) -> Result<Self, FontError> {
        let data = data.into();
        let font = FontRef::from_index(&data, index).map_err(|e| FontError::Decode {
            name: format!("face {index}"),
            message: e.to_string(),
        })?;
        let units_per_em = font
            .head()
            .map(|h| f64::from(h.units_per_em()))
            .map_err(|e| FontError::Decode {
                name: format!("face {index}"),
                message: e.to_string(),
            })?
            .max(1.0);
        let family = font
            .localized_strings(StringId::FAMILY_NAME)
            .english_or_first()
            .map(|s| s.chars().collect::<String>())
            .unwrap_or_default();
        let attributes = font.attributes();
        let style = match attributes.style {
            Style::Normal => FontStyle::Normal,
            Style::Italic => FontStyle::Italic,
            Style::Oblique(_) => FontStyle::Oblique,
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "weights are clamped to the 1..=1000 CSS range first"
        )]
        let weight = FontWeight(attributes.weight.value().round().clamp(1.0, 1000.0) as u16);
        Ok(Self {
            data,
            index,
            family,
            units_per_em,
            weight,
            style,
        })
    }

    fn font_ref(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index).ok()
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "26.6 values of realistic text extents fit comfortably in i64"
)]
fn to_26_6(v: f32) -> i64 {
    (f64::from(v) * 64.0).round() as i64
}

impl OutlineFont for SkrifaFont {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn units_per_em(&self) -> f64 {
        self.units_per_em
    }

    fn weight(&self) -> FontWeight {
        self.weight
    }

    fn style(&self) -> FontStyle {
        self.style
    }

    fn glyph_outline(&self, ch: char) -> Option<BezPath> {
        let font = self.font_ref()?;
        let gid = font.charmap().map(ch)?;
        let outline = font.outline_glyphs().get(gid)?;
        let mut pen = BezPen::default();
        outline
            .draw((Size::unscaled(), LocationRef::default()), &mut pen)
            .ok()?;
        Some(pen.path)
    }

    fn layout_extents(&self, text: &str, size_px: f64) -> FixedExtents {
        let Some(font) = self.font_ref() else {
            return FixedExtents::default();
        };
        #[allow(
            clippy::cast_possible_truncation,
            reason = "font sizes are well within f32 range"
        )]
        let size = Size::new(size_px as f32);
        let metrics = GlyphMetrics::new(&font, size, LocationRef::default());
        let charmap = font.charmap();

        let mut advance = 0.0_f32;
        let mut ascent = 0.0_f32;
        let mut descent = 0.0_f32;
        for ch in text.chars() {
            let gid = charmap.map(ch).unwrap_or(GlyphId::NOTDEF);
            advance += metrics.advance_width(gid).unwrap_or(0.0);
            if let Some(bounds) = metrics.bounds(gid) {
                ascent = ascent.max(bounds.y_max);
                descent = descent.max(-bounds.y_min);
            }
        }
        FixedExtents {
            width: to_26_6(advance),
            height: to_26_6(ascent + descent),
            descent: to_26_6(descent),
        }
    }
}

#[derive(Default)]
struct BezPen {
    path: BezPath,
}

impl OutlinePen for BezPen {
    fn move_to(&mut self, x: f32, y: f32) {
        self.path.move_to((f64::from(x), f64::from(y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.line_to((f64::from(x), f64::from(y)));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.path
            .quad_to((f64::from(x1), f64::from(y1)), (f64::from(x), f64::from(y)));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.path.curve_to(
            (f64::from(x1), f64::from(y1)),
            (f64::from(x2), f64::from(y2)),
            (f64::from(x), f64::from(y)),
        );
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}
