// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use smallvec::SmallVec;

/// Slant of a face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Designed italic.
    Italic,
    /// Slanted upright.
    Oblique,
}

impl FontStyle {
    /// CSS keyword.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

/// Small-caps selection.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontVariant {
    /// Regular glyphs.
    #[default]
    Normal,
    /// Small capitals.
    SmallCaps,
}

/// Numeric weight, 100 (thin) to 900 (black).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Regular weight.
    pub const NORMAL: Self = Self(400);
    /// Bold weight.
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font request: what to look for, and at which size.
#[derive(Clone, Debug, PartialEq)]
pub struct FontProperties {
    families: SmallVec<[String; 2]>,
    /// Slant.
    pub style: FontStyle,
    /// Small-caps selection.
    pub variant: FontVariant,
    /// Weight.
    pub weight: FontWeight,
    /// Width as a percentage of normal (50 to 200).
    pub stretch: u16,
    /// Size in points.
    pub size_pt: f64,
}

impl Default for FontProperties {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

impl FontProperties {
    /// Request a single family at the default 10pt size.
    pub fn new(family: impl Into<String>) -> Self {
        let mut families = SmallVec::new();
        families.push(family.into());
        Self {
            families,
            style: FontStyle::Normal,
            variant: FontVariant::Normal,
            weight: FontWeight::NORMAL,
            stretch: 100,
            size_pt: 10.0,
        }
    }

    /// Append a fallback family.
    pub fn with_fallback(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// Set the size in points.
    pub fn with_size(mut self, size_pt: f64) -> Self {
        self.size_pt = size_pt;
        self
    }

    /// Set the slant.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    /// Requested families, in preference order.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// First requested family.
    pub fn primary_family(&self) -> &str {
        self.families.first().map(String::as_str).unwrap_or("sans-serif")
    }

    /// Size in pixels at `dpi`.
    pub fn size_px(&self, dpi: f64) -> f64 {
        self.size_pt * dpi / 72.0
    }

    /// Cache key: every property except the size.
    pub fn key(&self) -> FontKey {
        FontKey {
            families: self.families.iter().map(|f| f.to_ascii_lowercase()).collect(),
            style: self.style,
            variant: self.variant,
            weight: self.weight,
            stretch: self.stretch,
        }
    }
}

/// Size-independent identity of a [`FontProperties`] request.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FontKey {
    families: SmallVec<[String; 2]>,
    style: FontStyle,
    variant: FontVariant,
    weight: FontWeight,
    stretch: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_size_and_family_case() {
        let a = FontProperties::new("DejaVu Sans").with_size(8.0);
        let b = FontProperties::new("dejavu sans").with_size(20.0);
        assert_eq!(a.key(), b.key());
    }

    #[test]
    fn key_distinguishes_style_and_weight() {
        let base = FontProperties::new("serif");
        assert_ne!(base.key(), base.clone().with_weight(FontWeight::BOLD).key());
        assert_ne!(base.key(), base.clone().with_style(FontStyle::Italic).key());
    }

    #[test]
    fn size_in_pixels() {
        let props = FontProperties::new("serif").with_size(12.0);
        assert_eq!(props.size_px(72.0), 12.0);
        assert_eq!(props.size_px(144.0), 24.0);
    }

    #[test]
    fn fallbacks_keep_order() {
        let props = FontProperties::new("Foo").with_fallback("sans-serif");
        assert_eq!(props.families(), ["Foo", "sans-serif"]);
        assert_eq!(props.primary_family(), "Foo");
    }
}
