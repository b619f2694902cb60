// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use figdraw_text::{FontError, MathError};
use thiserror::Error;

/// Which graphics-context style a bad value was given for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StyleKind {
    /// Line cap.
    Cap,
    /// Line join.
    Join,
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cap => "cap",
            Self::Join => "join",
        })
    }
}

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A cap or join style name was not recognized.
    #[error("unrecognized {kind} style {value:?}")]
    InvalidStyleValue {
        /// Style being set.
        kind: StyleKind,
        /// Rejected value.
        value: String,
    },
    /// Font resolution or decoding failed.
    #[error(transparent)]
    Font(#[from] FontError),
    /// Both the math path and its raster fallback failed.
    #[error("math text could not be rendered")]
    MathRenderFailed(#[source] MathError),
    /// Math text was requested but no engine is configured.
    #[error("no math text engine is configured")]
    MathUnavailable,
    /// A frame failed; the cause is attached.
    #[error("frame rendering failed")]
    RenderFailed(#[source] Box<RenderError>),
}

impl RenderError {
    /// Wrap as a frame failure, unless it already is one.
    pub fn into_frame_failure(self) -> Self {
        match self {
            Self::RenderFailed(_) => self,
            other => Self::RenderFailed(Box::new(other)),
        }
    }
}
