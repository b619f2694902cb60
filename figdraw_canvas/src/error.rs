// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::io;

use figdraw_render::RenderError;
use thiserror::Error;

/// Failure to export or download a figure.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Rendering into the export target failed.
    #[error("rendering for export failed")]
    Render(#[from] RenderError),
    /// The surface snapshot could not be decoded.
    #[error("failed to decode surface snapshot")]
    PngDecode(#[from] png::DecodingError),
    /// The PNG output could not be encoded.
    #[error("failed to encode PNG")]
    PngEncode(#[from] png::EncodingError),
    /// Writing the output failed.
    #[error("failed to write export")]
    Io(#[from] io::Error),
    /// A raster export was requested before the surface was shown.
    #[error("the figure has no content surface")]
    MissingSurface,
}
