// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer and keyboard normalization.
//!
//! Hosts deliver raw readings (offsets in CSS pixels, 0-based buttons,
//! legacy key codes) and get back [`CanvasEvent`]s in figure coordinates:
//! y up, 1-based buttons and matplotlib-style key names such as
//! `"ctrl+alt+f5"`.
//!
//! ## Usage
//!
//! ```
//! use figdraw_canvas::{key_name, KeyInput};
//!
//! assert_eq!(key_name(&KeyInput::new(65)), "a");
//! assert_eq!(key_name(&KeyInput::new(65).with_shift()), "A");
//! assert_eq!(key_name(&KeyInput::new(49).with_shift()), "!");
//! assert_eq!(key_name(&KeyInput::new(116).with_ctrl()), "ctrl+f5");
//! ```

use kurbo::Point;

/// A raw pointer reading.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Horizontal offset from the layer's left edge.
    pub offset_x: f64,
    /// Vertical offset from the layer's top edge.
    pub offset_y: f64,
    /// 0-based button index.
    pub button: i16,
}

impl PointerInput {
    /// A reading at `(offset_x, offset_y)` with `button`.
    pub fn new(offset_x: f64, offset_y: f64, button: i16) -> Self {
        Self {
            offset_x,
            offset_y,
            button,
        }
    }
}

/// A raw wheel reading.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ScrollInput {
    /// Pointer position and button state.
    pub pointer: PointerInput,
    /// Horizontal wheel delta.
    pub delta_x: f64,
}

/// A raw key reading.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyInput {
    /// Legacy key code (`which`).
    pub which: u32,
    /// Shift held.
    pub shift: bool,
    /// Control held.
    pub ctrl: bool,
    /// Alt held.
    pub alt: bool,
}

impl KeyInput {
    /// Key `which` with no modifiers.
    pub fn new(which: u32) -> Self {
        Self {
            which,
            ..Self::default()
        }
    }

    /// With shift held.
    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// With control held.
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// With alt held.
    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// A normalized input event, in figure pixels with y up.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    /// Pointer moved.
    Motion {
        /// Position.
        position: Point,
    },
    /// Button pressed.
    ButtonPress {
        /// Position.
        position: Point,
        /// 1-based button.
        button: i32,
    },
    /// Button released.
    ButtonRelease {
        /// Position.
        position: Point,
        /// 1-based button.
        button: i32,
    },
    /// Wheel turned.
    Scroll {
        /// Position.
        position: Point,
        /// Horizontal wheel delta.
        step: f64,
    },
    /// Key pressed.
    KeyPress {
        /// Key name.
        key: String,
    },
    /// Key released.
    KeyRelease {
        /// Key name.
        key: String,
    },
    /// Pointer entered the figure.
    Enter,
    /// Pointer left the figure.
    Leave,
}

/// Result of handling one raw input.
#[derive(Clone, Debug, PartialEq)]
pub struct InputOutcome {
    /// The normalized event.
    pub event: CanvasEvent,
    /// The host should cancel the default action (the context menu).
    pub prevent_default: bool,
}

impl From<CanvasEvent> for InputOutcome {
    fn from(event: CanvasEvent) -> Self {
        Self {
            event,
            prevent_default: false,
        }
    }
}

/// Pointer cursors the toolbar asks for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cursor {
    /// Hand.
    Hand,
    /// Arrow.
    Pointer,
    /// Region selection.
    SelectRegion,
    /// Move.
    Move,
}

impl Cursor {
    /// CSS `cursor` value.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Hand => "pointer",
            Self::Pointer => "default",
            Self::SelectRegion => "crosshair",
            Self::Move => "move",
        }
    }
}

/// Convert a pointer reading on a figure `height` pixels tall.
///
/// Returns the position with y up, the 1-based button, and whether the
/// default action should be suppressed. The right button (index 2) is
/// button 3 and suppresses the context menu; the middle button (index 1)
/// is reported as 3 as well.
pub fn convert_pointer(input: &PointerInput, height: f64) -> (Point, i32, bool) {
    let position = Point::new(input.offset_x, height - input.offset_y);
    let mut button = i32::from(input.button) + 1;
    let prevent_default = button == 3;
    if button == 2 {
        button = 3;
    }
    (position, button, prevent_default)
}

const SHIFTED_DIGITS: [char; 10] = [')', '!', '@', '#', '$', '%', '^', '&', '*', '('];

fn shifted_key(code: u32) -> Option<&'static str> {
    Some(match code {
        59 | 186 => ":",
        61 | 187 => "+",
        173 | 189 => "_",
        188 => "<",
        190 => ">",
        191 => "?",
        192 => "~",
        219 => "{",
        220 => "|",
        221 => "}",
        222 => "\"",
        _ => return None,
    })
}

fn named_key(code: u32) -> Option<&'static str> {
    Some(match code {
        8 => "backspace",
        9 => "tab",
        13 => "enter",
        16 => "shift",
        17 => "control",
        18 => "alt",
        19 => "pause",
        20 => "caps",
        27 => "escape",
        32 => " ",
        33 => "pageup",
        34 => "pagedown",
        35 => "end",
        36 => "home",
        37 => "left",
        38 => "up",
        39 => "right",
        40 => "down",
        45 => "insert",
        46 => "delete",
        91 | 92 => "super",
        93 => "select",
        106 => "*",
        107 => "+",
        109 => "-",
        110 => ".",
        111 => "/",
        144 => "num_lock",
        145 => "scroll_lock",
        186 => ":",
        187 => "=",
        188 => ",",
        189 => "-",
        190 => ".",
        191 => "/",
        192 => "`",
        219 => "[",
        220 => "\\",
        221 => "]",
        222 => "'",
        _ => return None,
    })
}

/// Normalized name of a key reading.
///
/// A modifier is not listed for its own key (`shift` alone is `"shift"`).
/// Shift is folded into letters, digits and punctuation it changes, and
/// remaining modifiers prefix the key in the order shift, ctrl, alt.
pub fn key_name(input: &KeyInput) -> String {
    let code = input.which;
    let mut shift = input.shift && code != 16;
    let ctrl = input.ctrl && code != 17;
    let alt = input.alt && code != 18;

    let value = match code {
        65..=90 => {
            let letter = char::from_u32(code).map(String::from).unwrap_or_default();
            if shift {
                shift = false;
                letter
            } else {
                letter.to_lowercase()
            }
        }
        48..=57 if shift => {
            shift = false;
            SHIFTED_DIGITS[(code - 48) as usize].to_string()
        }
        112..=123 => format!("f{}", code - 111),
        96..=105 => (code - 96).to_string(),
        _ => match shifted_key(code).filter(|_| shift) {
            Some(symbol) => {
                shift = false;
                symbol.to_string()
            }
            None => named_key(code).map(str::to_string).unwrap_or_else(|| {
                char::from_u32(code).map(String::from).unwrap_or_default()
            }),
        },
    };

    let mut parts: Vec<&str> = Vec::with_capacity(4);
    if shift {
        parts.push("shift");
    }
    if ctrl {
        parts.push("ctrl");
    }
    if alt {
        parts.push("alt");
    }
    parts.push(&value);
    parts.join("+")
}
