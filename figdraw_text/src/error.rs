// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Font resolution errors.
#[derive(Debug, Error)]
pub enum FontError {
    /// Discovery found no font file for the requested families.
    #[error("no font found for families [{families}]")]
    FontNotFound {
        /// Comma-separated requested families.
        families: String,
    },
    /// The font file could not be read.
    #[error("failed to read font file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The font file is not a usable outline font.
    #[error("failed to decode font {name}: {message}")]
    Decode {
        /// File name or other identity of the font.
        name: String,
        /// Decoder message.
        message: String,
    },
}

/// Broad classification of a [`MathError`], for logging.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MathErrorKind {
    /// The expression could not be parsed.
    Parse,
    /// A glyph had no outline in its font.
    MissingGlyph,
    /// Font resolution failed.
    Font,
    /// Raster fallback failed.
    Raster,
}

impl fmt::Display for MathErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parse => "parse",
            Self::MissingGlyph => "missing-glyph",
            Self::Font => "font",
            Self::Raster => "raster",
        })
    }
}

/// Math layout and rendering errors.
#[derive(Debug, Error)]
pub enum MathError {
    /// The expression could not be parsed.
    #[error("cannot parse math expression {text:?}: {message}")]
    Parse {
        /// Source expression.
        text: String,
        /// Parser message.
        message: String,
    },
    /// A glyph had no outline in its font.
    #[error("glyph {glyph:?} has no outline in {family}")]
    MissingGlyph {
        /// Requested character.
        glyph: char,
        /// Font family searched.
        family: String,
    },
    /// Font resolution failed.
    #[error(transparent)]
    Font(#[from] FontError),
    /// Raster fallback failed.
    #[error("math raster fallback failed: {0}")]
    Raster(String),
}

impl MathError {
    /// Classification for logging.
    pub fn kind(&self) -> MathErrorKind {
        match self {
            Self::Parse { .. } => MathErrorKind::Parse,
            Self::MissingGlyph { .. } => MathErrorKind::MissingGlyph,
            Self::Font(_) => MathErrorKind::Font,
            Self::Raster(_) => MathErrorKind::Raster,
        }
    }
}
