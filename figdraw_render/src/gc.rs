// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-draw style state.

use core::str::FromStr;

use figdraw_imaging::{LineCap, LineJoin};
use kurbo::{Affine, BezPath, Rect};

use crate::color::ColorValue;
use crate::error::{RenderError, StyleKind};

/// Line end style, by its figure-level name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CapStyle {
    /// `butt`
    #[default]
    Butt,
    /// `round`
    Round,
    /// `projecting`, drawn as a square cap.
    Projecting,
}

impl CapStyle {
    /// The surface cap this style maps to.
    pub fn to_line_cap(self) -> LineCap {
        match self {
            Self::Butt => LineCap::Butt,
            Self::Round => LineCap::Round,
            Self::Projecting => LineCap::Square,
        }
    }
}

impl FromStr for CapStyle {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "butt" => Ok(Self::Butt),
            "round" => Ok(Self::Round),
            "projecting" => Ok(Self::Projecting),
            _ => Err(RenderError::InvalidStyleValue {
                kind: StyleKind::Cap,
                value: s.to_string(),
            }),
        }
    }
}

/// Line join style, by its figure-level name.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum JoinStyle {
    /// `miter`
    Miter,
    /// `round`
    #[default]
    Round,
    /// `bevel`
    Bevel,
}

impl JoinStyle {
    /// The surface join this style maps to.
    pub fn to_line_join(self) -> LineJoin {
        match self {
            Self::Miter => LineJoin::Miter,
            Self::Round => LineJoin::Round,
            Self::Bevel => LineJoin::Bevel,
        }
    }
}

impl FromStr for JoinStyle {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "miter" => Ok(Self::Miter),
            "round" => Ok(Self::Round),
            "bevel" => Ok(Self::Bevel),
            _ => Err(RenderError::InvalidStyleValue {
                kind: StyleKind::Join,
                value: s.to_string(),
            }),
        }
    }
}

/// Dash pattern in points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dashes {
    /// Phase, in points.
    pub offset: Option<f64>,
    /// On/off lengths, in points. `None` draws solid lines.
    pub lengths: Option<Vec<f64>>,
}

/// A clip path and the transform that maps it to display space (y up).
#[derive(Clone, Debug, PartialEq)]
pub struct ClipPath {
    /// Outline.
    pub path: BezPath,
    /// Path to display transform.
    pub transform: Affine,
}

/// Style state for one draw call.
///
/// A context is plain data; the renderer reads it when issuing surface
/// calls and never mutates it.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsContext {
    rgb: ColorValue,
    alpha: Option<f64>,
    forced_alpha: bool,
    linewidth: f64,
    dashes: Dashes,
    capstyle: CapStyle,
    joinstyle: JoinStyle,
    clip_rect: Option<Rect>,
    clip_path: Option<ClipPath>,
    hatch: Option<String>,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self {
            rgb: ColorValue::BLACK,
            alpha: None,
            forced_alpha: false,
            linewidth: 1.0,
            dashes: Dashes::default(),
            capstyle: CapStyle::default(),
            joinstyle: JoinStyle::default(),
            clip_rect: None,
            clip_path: None,
            hatch: None,
        }
    }
}

impl GraphicsContext {
    /// A context with default styles: black, 1pt, butt caps, round joins.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke color.
    pub fn rgb(&self) -> ColorValue {
        self.rgb
    }

    /// Set the stroke color.
    pub fn set_foreground(&mut self, color: impl Into<ColorValue>) {
        self.rgb = color.into();
    }

    /// Explicit alpha, if one was set.
    pub fn alpha(&self) -> Option<f64> {
        self.alpha
    }

    /// Whether the explicit alpha overrides color channels.
    pub fn forced_alpha(&self) -> bool {
        self.forced_alpha
    }

    /// Set or clear the explicit alpha. A set alpha is forced.
    pub fn set_alpha(&mut self, alpha: Option<f64>) {
        self.alpha = alpha;
        self.forced_alpha = alpha.is_some();
    }

    /// Line width in points.
    pub fn linewidth(&self) -> f64 {
        self.linewidth
    }

    /// Set the line width in points.
    pub fn set_linewidth(&mut self, points: f64) {
        self.linewidth = points;
    }

    /// True when paths drawn with this context are stroked.
    pub fn stroke(&self) -> bool {
        self.linewidth != 0.0
    }

    /// Dash pattern.
    pub fn dashes(&self) -> &Dashes {
        &self.dashes
    }

    /// Set the dash pattern, in points.
    pub fn set_dashes(&mut self, offset: Option<f64>, lengths: Option<Vec<f64>>) {
        self.dashes = Dashes { offset, lengths };
    }

    /// Cap style.
    pub fn capstyle(&self) -> CapStyle {
        self.capstyle
    }

    /// Set the cap style.
    pub fn set_capstyle(&mut self, style: CapStyle) {
        self.capstyle = style;
    }

    /// Set the cap style by name: `butt`, `round` or `projecting`.
    pub fn set_capstyle_name(&mut self, name: &str) -> Result<(), RenderError> {
        self.capstyle = name.parse()?;
        Ok(())
    }

    /// Join style.
    pub fn joinstyle(&self) -> JoinStyle {
        self.joinstyle
    }

    /// Set the join style.
    pub fn set_joinstyle(&mut self, style: JoinStyle) {
        self.joinstyle = style;
    }

    /// Set the join style by name: `miter`, `round` or `bevel`.
    pub fn set_joinstyle_name(&mut self, name: &str) -> Result<(), RenderError> {
        self.joinstyle = name.parse()?;
        Ok(())
    }

    /// Clip rectangle in display space (y up).
    pub fn clip_rectangle(&self) -> Option<Rect> {
        self.clip_rect
    }

    /// Set or clear the clip rectangle.
    pub fn set_clip_rectangle(&mut self, rect: Option<Rect>) {
        self.clip_rect = rect;
    }

    /// Clip path.
    pub fn clip_path(&self) -> Option<&ClipPath> {
        self.clip_path.as_ref()
    }

    /// Set or clear the clip path.
    pub fn set_clip_path(&mut self, clip: Option<ClipPath>) {
        self.clip_path = clip;
    }

    /// Hatch pattern name.
    pub fn hatch(&self) -> Option<&str> {
        self.hatch.as_deref()
    }

    /// Set or clear the hatch pattern.
    pub fn set_hatch(&mut self, hatch: Option<String>) {
        self.hatch = hatch;
    }
}
