// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Figure colors and their CSS spelling.

use peniko::Color;

/// An RGB or RGBA color with components in `0..=1`.
///
/// The channel count matters for CSS conversion: an explicit alpha always
/// applies to a 3-channel color, but only overrides a 4th channel when the
/// alpha is forced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorValue {
    /// Three channels.
    Rgb([f64; 3]),
    /// Four channels, straight alpha.
    Rgba([f64; 4]),
}

impl ColorValue {
    /// Opaque black, the default foreground.
    pub const BLACK: Self = Self::Rgba([0.0, 0.0, 0.0, 1.0]);

    /// The color channels without alpha.
    pub fn rgb(self) -> [f64; 3] {
        match self {
            Self::Rgb(c) => c,
            Self::Rgba([r, g, b, _]) => [r, g, b],
        }
    }

    /// The 4th channel, when present.
    pub fn channel_alpha(self) -> Option<f64> {
        match self {
            Self::Rgb(_) => None,
            Self::Rgba(c) => Some(c[3]),
        }
    }
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<Color> for ColorValue {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.components;
        Self::Rgba([f64::from(r), f64::from(g), f64::from(b), f64::from(a)])
    }
}

impl From<[f64; 3]> for ColorValue {
    fn from(c: [f64; 3]) -> Self {
        Self::Rgb(c)
    }
}

impl From<[f64; 4]> for ColorValue {
    fn from(c: [f64; 4]) -> Self {
        Self::Rgba(c)
    }
}

/// Convert a figure color to a CSS color string.
///
/// - A 4-channel color with no `alpha` takes its own 4th channel as alpha.
/// - With no alpha at all the result is `#rrggbb`.
/// - Otherwise the result is `rgba(R, G, B, A)`. `A` is `alpha` for
///   3-channel colors or when `alpha_overrides` is set, else the 4th
///   channel. `A` is printed with 3 significant digits.
pub fn to_css_color(color: ColorValue, alpha: Option<f64>, alpha_overrides: bool) -> String {
    let alpha = alpha.or(color.channel_alpha());
    let [r, g, b] = color.rgb();
    let Some(alpha) = alpha else {
        return format!("#{:02x}{:02x}{:02x}", hex_byte(r), hex_byte(g), hex_byte(b));
    };
    let a = match color.channel_alpha() {
        Some(own) if !alpha_overrides => own,
        _ => alpha,
    };
    format!(
        "rgba({}, {}, {}, {})",
        trunc_byte(r),
        trunc_byte(g),
        trunc_byte(b),
        format_g(a, 3)
    )
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is clamped to [0, 255] before casting"
)]
fn hex_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round_ties_even() as u8
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "value is clamped to [0, 255] before casting; truncation is intended"
)]
fn trunc_byte(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0) as u8
}

/// Format `v` like C's `%.{precision}g`.
///
/// Trailing zeros are removed; scientific notation is used when the
/// exponent is below -4 or at least `precision`.
pub fn format_g(v: f64, precision: usize) -> String {
    if v == 0.0 {
        return if v.is_sign_negative() { "-0" } else { "0" }.to_string();
    }
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    let p_i32 = i32::try_from(p).unwrap_or(i32::MAX);
    if exp < -4 || exp >= p_i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exp.unsigned_abs())
    } else {
        let decimals = usize::try_from(p_i32 - 1 - exp).unwrap_or(0);
        trim_fraction(&format!("{v:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
