// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-page PDF target for the figdraw canvas seam.
//!
//! [`PdfCanvas`] implements [`Canvas2d`] by writing a PDF content stream.
//! The page CTM flips y once at the start of the stream, so canvas
//! coordinates (origin top-left, y down, one unit per point) are used
//! as-is.
//!
//! - `save`/`restore` map to `q`/`Q`; unbalanced restores are dropped.
//! - The current path is kept as canvas calls and written out when it is
//!   filled, stroked or used as a clip, so a path can be painted more than
//!   once. Quadratic segments are raised to cubics.
//! - Colors are written as `rg`/`RG`; alpha goes through `ExtGState`
//!   resources.
//! - Text uses the standard Helvetica faces, picked from the CSS font
//!   shorthand (bold, oblique). Glyphs outside Latin-1 become `?`.
//! - Images become RGB image XObjects with a soft mask for alpha.
//!
//! ## Usage
//!
//! ```
//! use figdraw_imaging::Canvas2d;
//! use figdraw_pdf::PdfCanvas;
//!
//! let mut pdf = PdfCanvas::new(200.0, 100.0);
//! pdf.set_fill_style("#0000ff");
//! pdf.fill_rect(10.0, 10.0, 50.0, 20.0);
//! let bytes = pdf.finish();
//! assert!(bytes.starts_with(b"%PDF-1.4"));
//! ```

mod document;

use std::fmt::Write as _;
use std::io;

use figdraw_imaging::image::RgbaImage;
use figdraw_imaging::{Canvas2d, LineCap, LineJoin, parse_css_color};
use kurbo::Point;

use crate::document::{ObjectWriter, num, pdf_string};

/// Standard 14 faces used for text.
const FONT_NAMES: [&str; 4] = [
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
];

#[derive(Clone, Debug)]
struct PdfState {
    fill: ([f64; 3], f64),
    stroke: ([f64; 3], f64),
    line_width: f64,
    cap: LineCap,
    join: LineJoin,
    dash: Vec<f64>,
    dash_offset: f64,
    font_face: usize,
    font_size: f64,
}

impl Default for PdfState {
    fn default() -> Self {
        Self {
            fill: ([0.0; 3], 1.0),
            stroke: ([0.0; 3], 1.0),
            line_width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            dash: Vec::new(),
            dash_offset: 0.0,
            font_face: 0,
            font_size: 10.0,
        }
    }
}

#[derive(Clone, Debug)]
struct EmbeddedImage {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

/// A [`Canvas2d`] that produces a one-page PDF document.
#[derive(Debug)]
pub struct PdfCanvas {
    width: f64,
    height: f64,
    content: String,
    state: PdfState,
    stack: Vec<PdfState>,
    path: String,
    current: Option<Point>,
    subpath_start: Option<Point>,
    alphas: Vec<(char, u64)>,
    fonts_used: [bool; 4],
    images: Vec<EmbeddedImage>,
    info: Vec<(String, String)>,
}

impl PdfCanvas {
    /// A page of `width` by `height` points.
    pub fn new(width: f64, height: f64) -> Self {
        let mut canvas = Self {
            width,
            height,
            content: String::new(),
            state: PdfState::default(),
            stack: Vec::new(),
            path: String::new(),
            current: None,
            subpath_start: None,
            alphas: Vec::new(),
            fonts_used: [false; 4],
            images: Vec::new(),
            info: Vec::new(),
        };
        canvas.write_prolog();
        canvas
    }

    /// Add an entry to the document information dictionary.
    ///
    /// Keys are PDF info keys such as `Title`, `Author` or `Creator`.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.push((key.into(), value.into()));
        self
    }

    /// The content stream written so far.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Serialize the document.
    pub fn finish(&self) -> Vec<u8> {
        // 1 catalog, 2 pages, 3 page, 4 content, 5 info, then fonts,
        // alpha states and images (two objects each).
        let font_ids: Vec<(usize, usize)> = {
            let mut next = 6;
            self.fonts_used
                .iter()
                .enumerate()
                .filter(|(_, used)| **used)
                .map(|(face, _)| {
                    let id = next;
                    next += 1;
                    (face, id)
                })
                .collect()
        };
        let gs_base = 6 + font_ids.len();
        let image_base = gs_base + self.alphas.len();
        let object_count = image_base + 2 * self.images.len() - 1;

        let mut w = ObjectWriter::new(object_count);
        w.object(1, "<< /Type /Catalog /Pages 2 0 R >>");
        w.object(2, "<< /Type /Pages /Kids [3 0 R] /Count 1 >>");

        let mut resources = String::from("<< /ProcSet [/PDF /Text /ImageB /ImageC]");
        if !font_ids.is_empty() {
            resources.push_str(" /Font <<");
            for (face, id) in &font_ids {
                let _ = write!(resources, " /F{face} {id} 0 R");
            }
            resources.push_str(" >>");
        }
        if !self.alphas.is_empty() {
            resources.push_str(" /ExtGState <<");
            for i in 0..self.alphas.len() {
                let _ = write!(resources, " /A{i} {} 0 R", gs_base + i);
            }
            resources.push_str(" >>");
        }
        if !self.images.is_empty() {
            resources.push_str(" /XObject <<");
            for i in 0..self.images.len() {
                let _ = write!(resources, " /Im{i} {} 0 R", image_base + 2 * i);
            }
            resources.push_str(" >>");
        }
        resources.push_str(" >>");
        w.object(
            3,
            &format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Resources {resources} /Contents 4 0 R >>",
                num(self.width),
                num(self.height)
            ),
        );

        let mut content = self.content.clone();
        for _ in 0..self.stack.len() {
            content.push_str("Q\n");
        }
        content.push_str("Q\n");
        w.stream(4, "", content.as_bytes());

        let mut info = String::from("<<");
        for (key, value) in &self.info {
            let key: String = key.chars().filter(char::is_ascii_alphanumeric).collect();
            let _ = write!(info, " /{key} {}", pdf_string(value));
        }
        info.push_str(" >>");
        w.object(5, &info);

        for (face, id) in &font_ids {
            w.object(
                *id,
                &format!(
                    "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                    FONT_NAMES[*face]
                ),
            );
        }
        for (i, (kind, bits)) in self.alphas.iter().enumerate() {
            let key = if *kind == 'f' { "ca" } else { "CA" };
            w.object(
                gs_base + i,
                &format!("<< /Type /ExtGState /{key} {} >>", num(f64::from_bits(*bits))),
            );
        }
        for (i, image) in self.images.iter().enumerate() {
            let id = image_base + 2 * i;
            let mask = image.alpha.as_ref().map(|_| id + 1);
            let mut dict = format!(
                "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceRGB /BitsPerComponent 8",
                image.width, image.height
            );
            if let Some(mask) = mask {
                let _ = write!(dict, " /SMask {mask} 0 R");
            }
            w.stream(id, &dict, &image.rgb);
            if let Some(alpha) = &image.alpha {
                let dict = format!(
                    "/Type /XObject /Subtype /Image /Width {} /Height {} /ColorSpace /DeviceGray /BitsPerComponent 8",
                    image.width, image.height
                );
                w.stream(id + 1, &dict, alpha);
            }
        }
        w.finish(1, 5)
    }

    /// Serialize the document into `out`.
    pub fn write_to(&self, out: &mut dyn io::Write) -> io::Result<()> {
        out.write_all(&self.finish())
    }

    fn write_prolog(&mut self) {
        let _ = writeln!(self.content, "q\n1 0 0 -1 0 {} cm", num(self.height));
    }

    fn op(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    fn alpha_resource(&mut self, kind: char, alpha: f64) -> usize {
        let key = (kind, alpha.clamp(0.0, 1.0).to_bits());
        if let Some(i) = self.alphas.iter().position(|a| *a == key) {
            return i;
        }
        self.alphas.push(key);
        self.alphas.len() - 1
    }

    fn apply_fill_paint(&mut self) {
        let ([r, g, b], a) = self.state.fill;
        let gs = self.alpha_resource('f', a);
        let line = format!("{} {} {} rg /A{gs} gs", num(r), num(g), num(b));
        self.op(&line);
    }

    fn apply_stroke_paint(&mut self) {
        let ([r, g, b], a) = self.state.stroke;
        let gs = self.alpha_resource('s', a);
        let mut line = format!(
            "{} {} {} RG /A{gs} gs {} w {} J {} j",
            num(r),
            num(g),
            num(b),
            num(self.state.line_width),
            cap_code(self.state.cap),
            join_code(self.state.join),
        );
        let dashes: Vec<String> = self.state.dash.iter().map(|d| num(*d)).collect();
        let _ = write!(
            line,
            " [{}] {} d",
            dashes.join(" "),
            num(self.state.dash_offset)
        );
        self.op(&line);
    }

    fn push_segment(&mut self, segment: String) {
        self.path.push_str(&segment);
        self.path.push('\n');
    }

    fn rect_ops(x: f64, y: f64, w: f64, h: f64) -> String {
        format!("{} {} {} {} re", num(x), num(y), num(w), num(h))
    }
}

impl Canvas2d for PdfCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.op("q");
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
            self.op("Q");
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        let line = format!("1 0 0 1 {} {} cm", num(tx), num(ty));
        self.op(&line);
    }

    fn rotate(&mut self, radians: f64) {
        let (sin, cos) = radians.sin_cos();
        let line = format!("{} {} {} {} 0 0 cm", num(cos), num(sin), num(-sin), num(cos));
        self.op(&line);
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push_segment(format!("{} {} m", num(x), num(y)));
        self.current = Some(Point::new(x, y));
        self.subpath_start = self.current;
    }

    fn line_to(&mut self, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        self.push_segment(format!("{} {} l", num(x), num(y)));
        self.current = Some(Point::new(x, y));
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let p0 = match self.current {
            Some(p) => p,
            None => {
                self.move_to(cx, cy);
                Point::new(cx, cy)
            }
        };
        let c = Point::new(cx, cy);
        let p = Point::new(x, y);
        let c1 = p0 + (c - p0) * (2.0 / 3.0);
        let c2 = p + (c - p) * (2.0 / 3.0);
        self.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, x, y);
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        if self.current.is_none() {
            self.move_to(c1x, c1y);
        }
        self.push_segment(format!(
            "{} {} {} {} {} {} c",
            num(c1x),
            num(c1y),
            num(c2x),
            num(c2y),
            num(x),
            num(y)
        ));
        self.current = Some(Point::new(x, y));
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            self.push_segment("h".to_string());
            self.current = self.subpath_start;
        }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push_segment(Self::rect_ops(x, y, w, h));
        self.current = Some(Point::new(x, y));
        self.subpath_start = self.current;
    }

    fn clip(&mut self) {
        if self.path.is_empty() {
            return;
        }
        let ops = format!("{}W n", self.path);
        self.op(&ops);
    }

    fn fill(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.apply_fill_paint();
        let ops = format!("{}f", self.path);
        self.op(&ops);
    }

    fn stroke(&mut self) {
        if self.path.is_empty() {
            return;
        }
        self.apply_stroke_paint();
        let ops = format!("{}S", self.path);
        self.op(&ops);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.apply_fill_paint();
        let ops = format!("{} f", Self::rect_ops(x, y, w, h));
        self.op(&ops);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.apply_stroke_paint();
        let ops = format!("{} S", Self::rect_ops(x, y, w, h));
        self.op(&ops);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let covers_page = self.stack.is_empty()
            && x <= 0.0
            && y <= 0.0
            && x + w >= self.width
            && y + h >= self.height;
        if covers_page {
            self.content.clear();
            self.write_prolog();
        } else {
            log::debug!("partial clear_rect is not representable in PDF; ignored");
        }
    }

    fn set_fill_style(&mut self, css: &str) {
        if let Some(paint) = parse_paint(css) {
            self.state.fill = paint;
        }
    }

    fn set_stroke_style(&mut self, css: &str) {
        if let Some(paint) = parse_paint(css) {
            self.state.stroke = paint;
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.join = join;
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.state.dash = segments.to_vec();
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.state.dash_offset = offset;
    }

    fn set_font(&mut self, font: &str) {
        let (face, size) = parse_font(font);
        self.state.font_face = face;
        if let Some(size) = size {
            self.state.font_size = size;
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let face = self.state.font_face;
        self.fonts_used[face] = true;
        self.apply_fill_paint();
        let line = format!(
            "BT /F{face} {} Tf 1 0 0 -1 {} {} Tm {} Tj ET",
            num(self.state.font_size),
            num(x),
            num(y),
            pdf_string(text)
        );
        self.op(&line);
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        let alpha = image.alpha();
        let opaque = alpha.iter().all(|a| *a == u8::MAX);
        let rgb: Vec<u8> = image
            .data
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        self.images.push(EmbeddedImage {
            width: image.width,
            height: image.height,
            rgb,
            alpha: (!opaque).then_some(alpha),
        });
        let index = self.images.len() - 1;
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        let line = format!(
            "q {} 0 0 {} {} {} cm /Im{index} Do Q",
            num(w),
            num(-h),
            num(x),
            num(y + h)
        );
        self.op(&line);
    }
}

fn cap_code(cap: LineCap) -> u8 {
    match cap {
        LineCap::Butt => 0,
        LineCap::Round => 1,
        LineCap::Square => 2,
    }
}

fn join_code(join: LineJoin) -> u8 {
    match join {
        LineJoin::Miter => 0,
        LineJoin::Round => 1,
        LineJoin::Bevel => 2,
    }
}

fn parse_paint(css: &str) -> Option<([f64; 3], f64)> {
    let color = parse_css_color(css)?;
    let [r, g, b, a] = color.components;
    Some(([f64::from(r), f64::from(g), f64::from(b)], f64::from(a)))
}

/// Pick a Helvetica face and a pixel size out of a CSS font shorthand.
fn parse_font(font: &str) -> (usize, Option<f64>) {
    let mut bold = false;
    let mut oblique = false;
    let mut size = None;
    for token in font.split(|c: char| c.is_whitespace() || c == ',') {
        match token {
            "bold" | "bolder" => bold = true,
            "italic" | "oblique" => oblique = true,
            _ => {
                if let Ok(weight) = token.parse::<u16>() {
                    bold |= weight >= 600;
                } else if let Some(px) = token.strip_suffix("px") {
                    size = px.parse::<f64>().ok().or(size);
                }
            }
        }
        if size.is_some() && token.ends_with("px") {
            // Everything after the size is the family list.
            break;
        }
    }
    (usize::from(bold) + 2 * usize::from(oblique), size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(pdf: &PdfCanvas) -> String {
        String::from_utf8_lossy(&pdf.finish()).into_owned()
    }

    #[test]
    fn page_flips_y_once() {
        let pdf = PdfCanvas::new(200.0, 100.0);
        assert!(pdf.content().starts_with("q\n1 0 0 -1 0 100 cm\n"));
        let doc = text(&pdf);
        assert!(doc.contains("/MediaBox [0 0 200 100]"));
    }

    #[test]
    fn path_is_painted_with_fill_paint_and_alpha() {
        let mut pdf = PdfCanvas::new(10.0, 10.0);
        pdf.set_fill_style("rgba(255, 0, 0, 0.5)");
        pdf.begin_path();
        pdf.move_to(0.0, 0.0);
        pdf.line_to(5.0, 0.0);
        pdf.close_path();
        pdf.fill();

        assert!(pdf.content().contains("1 0 0 rg /A0 gs\n0 0 m\n5 0 l\nh\nf\n"));
        let doc = text(&pdf);
        assert!(doc.contains("/ExtGState << /A0 6 0 R >>"));
        assert!(doc.contains("<< /Type /ExtGState /ca 0.5 >>"));
    }

    #[test]
    fn stroke_carries_line_state() {
        let mut pdf = PdfCanvas::new(10.0, 10.0);
        pdf.set_line_width(2.0);
        pdf.set_line_cap(LineCap::Round);
        pdf.set_line_join(LineJoin::Bevel);
        pdf.set_line_dash(&[3.0, 1.0]);
        pdf.stroke_rect(1.0, 1.0, 2.0, 2.0);
        assert!(pdf
            .content()
            .contains("0 0 0 RG /A0 gs 2 w 1 J 2 j [3 1] 0 d\n1 1 2 2 re S\n"));
    }

    #[test]
    fn quadratic_segments_are_raised_to_cubics() {
        let mut pdf = PdfCanvas::new(10.0, 10.0);
        pdf.begin_path();
        pdf.move_to(0.0, 0.0);
        pdf.quadratic_curve_to(3.0, 3.0, 6.0, 0.0);
        pdf.stroke();
        assert!(pdf.content().contains("2 2 4 2 6 0 c\n"));
    }

    #[test]
    fn clip_keeps_the_path_and_restore_is_balanced() {
        let mut pdf = PdfCanvas::new(10.0, 10.0);
        pdf.restore();
        pdf.save();
        pdf.begin_path();
        pdf.rect(0.0, 0.0, 5.0, 5.0);
        pdf.clip();
        pdf.fill();
        let content = pdf.content().to_string();
        assert!(content.contains("0 0 5 5 re\nW n\n"));
        assert!(content.contains("0 0 5 5 re\nf\n"));
        assert_eq!(content.matches("\nQ\n").count(), 0, "unbalanced restore is dropped");

        // An open save is closed when the document is written.
        let doc = text(&pdf);
        assert!(doc.contains("f\nQ\nQ\n"));
    }

    #[test]
    fn text_selects_helvetica_faces() {
        let mut pdf = PdfCanvas::new(100.0, 100.0);
        pdf.set_font("normal 700 12px DejaVu Sans, sans-serif");
        pdf.fill_text("Hi (x)", 10.0, 20.0);
        assert!(pdf
            .content()
            .contains("BT /F1 12 Tf 1 0 0 -1 10 20 Tm (Hi \\(x\\)) Tj ET"));
        let doc = text(&pdf);
        assert!(doc.contains("/BaseFont /Helvetica-Bold"));
        assert!(!doc.contains("/BaseFont /Helvetica "));
    }

    #[test]
    fn font_shorthand_parsing() {
        assert_eq!(parse_font("italic 400 9.5px serif"), (2, Some(9.5)));
        assert_eq!(parse_font("oblique bold 10px a"), (3, Some(10.0)));
        assert_eq!(parse_font("10px sans-serif"), (0, Some(10.0)));
    }

    #[test]
    fn translucent_images_get_a_soft_mask() {
        let mut pdf = PdfCanvas::new(10.0, 10.0);
        let image = RgbaImage {
            width: 1,
            height: 2,
            data: vec![255, 0, 0, 255, 0, 0, 255, 128],
        };
        pdf.draw_image(&image, 2.0, 3.0);
        assert!(pdf.content().contains("q 1 0 0 -2 2 5 cm /Im0 Do Q"));
        let doc = text(&pdf);
        assert!(doc.contains("/SMask"));
        assert!(doc.contains("/ColorSpace /DeviceGray"));
    }

    #[test]
    fn info_dictionary_is_written() {
        let pdf = PdfCanvas::new(1.0, 1.0).with_info("Creator", "figdraw (test)");
        let doc = text(&pdf);
        assert!(doc.contains("/Creator (figdraw \\(test\\))"));
        assert!(doc.contains("/Info 5 0 R"));
    }
}
