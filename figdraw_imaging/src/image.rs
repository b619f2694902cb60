// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster images exchanged between figures and surfaces.
//!
//! Figures hand over images in *figure order* (the first row is the
//! bottom of the image, matching the y-up figure space). Surfaces consume
//! top-down RGBA8, so [`RasterImage::to_rgba`] flips the rows and expands
//! the pixel layout in one pass.

use alloc::vec::Vec;
use core::fmt;

/// Channel layout of a [`RasterImage`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelLayout {
    /// Three bytes per pixel.
    Rgb8,
    /// Four bytes per pixel, straight alpha.
    Rgba8,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Error returned when pixel data does not match the declared shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMismatch {
    /// Expected byte length (`height * width * channels`).
    pub expected: usize,
    /// Actual byte length.
    pub actual: usize,
}

impl fmt::Display for ShapeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pixel buffer has {} bytes, expected {}",
            self.actual, self.expected
        )
    }
}

impl core::error::Error for ShapeMismatch {}

/// A `height × width × channels` byte image, rows stored bottom-up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wrap pixel bytes, validating the buffer length.
    pub fn new(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> Result<Self, ShapeMismatch> {
        let expected = width as usize * height as usize * layout.channels();
        if data.len() != expected {
            return Err(ShapeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Raw bytes, bottom row first.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Flip rows and expand to a top-down RGBA8 buffer.
    pub fn to_rgba(&self) -> RgbaImage {
        let channels = self.layout.channels();
        let row_len = self.width as usize * channels;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        if row_len > 0 {
            for row in self.data.chunks_exact(row_len).rev() {
                match self.layout {
                    PixelLayout::Rgba8 => out.extend_from_slice(row),
                    PixelLayout::Rgb8 => {
                        for px in row.chunks_exact(3) {
                            out.extend_from_slice(&[px[0], px[1], px[2], u8::MAX]);
                        }
                    }
                }
            }
        }
        RgbaImage {
            width: self.width,
            height: self.height,
            data: out,
        }
    }
}

/// Top-down straight-alpha RGBA8 pixels, ready to blit.
#[derive(Clone, PartialEq, Eq)]
pub struct RgbaImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes, top row first.
    pub data: Vec<u8>,
}

impl fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl RgbaImage {
    /// The alpha channel on its own.
    pub fn alpha(&self) -> Vec<u8> {
        self.data.chunks_exact(4).map(|px| px[3]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn rejects_mismatched_buffers() {
        let err = RasterImage::new(2, 2, PixelLayout::Rgb8, vec![0; 11]).unwrap_err();
        assert_eq!(err.expected, 12);
        assert_eq!(err.actual, 11);
    }

    #[test]
    fn to_rgba_flips_rows_and_adds_alpha() {
        // Bottom row red, top row blue.
        let img = RasterImage::new(
            1,
            2,
            PixelLayout::Rgb8,
            vec![255, 0, 0, /* top */ 0, 0, 255],
        )
        .unwrap();
        let rgba = img.to_rgba();
        assert_eq!(rgba.data, vec![0, 0, 255, 255, 255, 0, 0, 255], "top row first");
    }

    #[test]
    fn empty_images_are_fine() {
        let img = RasterImage::new(0, 3, PixelLayout::Rgba8, Vec::new()).unwrap();
        assert!(img.to_rgba().data.is_empty());
    }

    #[test]
    fn alpha_channel_is_split_out() {
        let rgba = RgbaImage {
            width: 2,
            height: 1,
            data: vec![0, 0, 0, 0, 0, 0, 0, 255],
        };
        assert_eq!(rgba.alpha(), vec![0, 255]);
    }
}
