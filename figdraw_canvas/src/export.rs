// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Saving and downloading figures.
//!
//! Each [`ExportFormat`] is served by one [`RenderTarget`]:
//!
//! - raster (PNG): the content layer's own pixels, round-tripped through a
//!   PNG decode so the output matches what the surface shows, then
//!   re-encoded with metadata and physical resolution;
//! - vector (SVG) and paginated (PDF): the figure is drawn again into an
//!   [`SvgCanvas`] or [`PdfCanvas`].

use std::io;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use figdraw_imaging::Canvas2d;
use figdraw_pdf::PdfCanvas;
use figdraw_render::{Figure, RenderError, Renderer};
use figdraw_svg::SvgCanvas;
use png::{PixelDimensions, Transformations, Unit};

use crate::canvas::FigureCanvas;
use crate::config::Metadata;
use crate::error::ExportError;
use crate::provider::{Element, ElementKind, Parent, SurfaceProvider};
use crate::tasks::TaskQueue;

/// A file format the toolbar can export.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Portable Document Format.
    Pdf,
    /// Portable Network Graphics.
    Png,
    /// Scalable Vector Graphics.
    Svg,
}

/// How a format is produced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RenderTarget {
    /// Pixels of the on-screen surface.
    Raster,
    /// An XML vector document.
    Vector,
    /// A paginated document.
    Paginated,
}

impl ExportFormat {
    /// All formats, sorted by extension.
    pub const ALL: [Self; 3] = [Self::Pdf, Self::Png, Self::Svg];

    /// File extension.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// MIME type.
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    /// The target that produces this format.
    pub const fn target(self) -> RenderTarget {
        match self {
            Self::Pdf => RenderTarget::Paginated,
            Self::Png => RenderTarget::Raster,
            Self::Svg => RenderTarget::Vector,
        }
    }

    /// The format for a file extension, ignoring case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(extension))
    }
}

fn software() -> String {
    format!("figdraw version {}", env!("CARGO_PKG_VERSION"))
}

impl<F: Figure, P: SurfaceProvider, Q: TaskQueue> FigureCanvas<F, P, Q> {
    /// Write the figure to `dest` in `format`.
    ///
    /// `metadata` entries are added to the output, replacing defaults with
    /// the same key.
    pub fn print_format(
        &mut self,
        dest: &mut dyn io::Write,
        format: ExportFormat,
        metadata: Option<&Metadata>,
    ) -> Result<(), ExportError> {
        let metadata = metadata.cloned().unwrap_or_default();
        match format.target() {
            RenderTarget::Raster => self.print_png(dest, &metadata),
            RenderTarget::Vector => self.print_svg(dest, &metadata),
            RenderTarget::Paginated => self.print_pdf(dest, &metadata),
        }
    }

    /// Write the content layer as PNG.
    ///
    /// Requires a shown surface. The image carries a `Software` text chunk
    /// and a physical resolution equal to the figure's dpi.
    pub fn print_png(
        &mut self,
        dest: &mut dyn io::Write,
        metadata: &Metadata,
    ) -> Result<(), ExportError> {
        let node = self.element("canvas").ok_or(ExportError::MissingSurface)?;
        let snapshot = self
            .provider
            .snapshot_png(node)
            .ok_or(ExportError::MissingSurface)?;
        let metadata = metadata.over(&Metadata::new().with("Software", software()));
        reencode_png(&snapshot, dest, &metadata, self.figure.dpi())
    }

    /// Write the figure as an SVG document at its own resolution.
    pub fn print_svg(
        &mut self,
        dest: &mut dyn io::Write,
        metadata: &Metadata,
    ) -> Result<(), ExportError> {
        let size = self.figure.width_height();
        let metadata = metadata.over(&Metadata::new().with("Creator", software()));
        let mut svg = SvgCanvas::new(size.width, size.height).with_metadata(metadata.iter());
        let dpi = self.figure.dpi();
        self.render_into(&mut svg, dpi)?;
        svg.write_to(dest)?;
        Ok(())
    }

    /// Write the figure as a one-page PDF, laid out in points.
    pub fn print_pdf(
        &mut self,
        dest: &mut dyn io::Write,
        metadata: &Metadata,
    ) -> Result<(), ExportError> {
        let inches = self.figure.size_inches();
        let metadata = metadata.over(
            &Metadata::new()
                .with("Creator", software())
                .with("Producer", software()),
        );
        let mut pdf = metadata.iter().fold(
            PdfCanvas::new(inches.width * 72.0, inches.height * 72.0),
            |pdf, (k, v)| pdf.with_info(k, v),
        );
        self.render_into(&mut pdf, 72.0)?;
        pdf.write_to(dest)?;
        Ok(())
    }

    /// Trigger a browser download of the figure in `format`.
    ///
    /// The file travels as a `data:` URI on a hidden anchor that is clicked
    /// once and removed.
    pub fn download(&mut self, format: ExportFormat) -> Result<(), ExportError> {
        let mut bytes = Vec::new();
        self.print_format(&mut bytes, format, None)?;
        let href = format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(&bytes));
        let anchor = self.provider.create_element(
            Parent::Body,
            Element::new(ElementKind::Anchor)
                .with_attribute("href", href)
                .with_attribute(
                    "download",
                    format!("{}.{}", self.config.download_basename, format.extension()),
                )
                .with_style("display: none"),
        );
        self.provider.click(anchor);
        self.provider.remove(anchor);
        log::debug!("downloaded {} bytes as {}", bytes.len(), format.extension());
        Ok(())
    }

    /// Draw the figure into an export target at `dpi`, restoring the
    /// figure's resolution afterwards.
    fn render_into(&mut self, target: &mut dyn Canvas2d, dpi: f64) -> Result<(), RenderError> {
        let original_dpi = self.figure.dpi();
        self.figure.set_dpi(dpi);
        let mut renderer = Renderer::new(target, &mut self.fonts, dpi);
        if let Some(math) = self.math.as_deref() {
            renderer = renderer.with_math(math);
        }
        renderer.begin_frame();
        let result = self.figure.draw(&mut renderer);
        let result = renderer.end_frame(result);
        self.figure.set_dpi(original_dpi);
        result
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "pixels per meter for any real dpi fit in u32"
)]
fn pixels_per_meter(dpi: f64) -> u32 {
    (dpi / 0.0254).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Decode `snapshot` and encode it again with text chunks and a physical
/// resolution.
fn reencode_png(
    snapshot: &[u8],
    dest: &mut dyn io::Write,
    metadata: &Metadata,
    dpi: f64,
) -> Result<(), ExportError> {
    let mut decoder = png::Decoder::new(snapshot);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut pixels = vec![0_u8; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut pixels)?;
    pixels.truncate(frame.buffer_size());
    let (color_type, bit_depth) = reader.output_color_type();

    let mut encoder = png::Encoder::new(dest, frame.width, frame.height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let ppm = pixels_per_meter(dpi);
    encoder.set_pixel_dims(Some(PixelDimensions {
        xppu: ppm,
        yppu: ppm,
        unit: Unit::Meter,
    }));
    for (key, value) in metadata.iter() {
        encoder.add_text_chunk(key.to_string(), value.to_string())?;
    }
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&pixels)?;
    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_are_sorted_by_extension() {
        let exts: Vec<_> = ExportFormat::ALL.iter().map(|f| f.extension()).collect();
        let mut sorted = exts.clone();
        sorted.sort_unstable();
        assert_eq!(exts, sorted);
    }

    #[test]
    fn each_format_has_one_target() {
        assert_eq!(ExportFormat::Png.target(), RenderTarget::Raster);
        assert_eq!(ExportFormat::Svg.target(), RenderTarget::Vector);
        assert_eq!(ExportFormat::Pdf.target(), RenderTarget::Paginated);
        assert_eq!(ExportFormat::Svg.mime_type(), "image/svg+xml");
    }

    #[test]
    fn extensions_parse_case_insensitively() {
        assert_eq!(ExportFormat::from_extension("PNG"), Some(ExportFormat::Png));
        assert_eq!(ExportFormat::from_extension("jpeg"), None);
    }

    #[test]
    fn dpi_becomes_pixels_per_meter() {
        assert_eq!(pixels_per_meter(72.0), 2835);
        assert_eq!(pixels_per_meter(100.0), 3937);
    }
}
