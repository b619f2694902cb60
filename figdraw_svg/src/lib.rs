// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG document target for the figdraw canvas seam.
//!
//! [`SvgCanvas`] implements [`Canvas2d`] by interpreting calls the way a
//! browser canvas would (current transform, save stack, current path,
//! nested clips) and writing each fill, stroke, text run and image as an SVG
//! element.
//!
//! - Paths are transformed to device space when they are built, so the
//!   current transform at `fill`/`stroke` time only affects line widths.
//! - Each `clip` becomes a `<clipPath>` that is itself clipped by the clip
//!   in effect, so nested clips intersect.
//! - Colors with alpha are split into a hex color and an opacity attribute.
//! - Images are embedded as base64 PNG data URIs.
//!
//! ## Usage
//!
//! ```
//! use figdraw_imaging::Canvas2d;
//! use figdraw_svg::SvgCanvas;
//!
//! let mut svg = SvgCanvas::new(100.0, 50.0);
//! svg.set_fill_style("#ff0000");
//! svg.fill_rect(10.0, 10.0, 20.0, 20.0);
//! let doc = svg.to_svg();
//! assert!(doc.contains("fill=\"#ff0000\""));
//! ```

use std::fmt::Write as _;
use std::io;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use figdraw_imaging::image::RgbaImage;
use figdraw_imaging::{Canvas2d, LineCap, LineJoin, parse_css_color};
use kurbo::{Affine, BezPath, PathEl, Point, Rect, Shape};

#[derive(Clone, Debug)]
struct SvgState {
    transform: Affine,
    fill: String,
    stroke: String,
    line_width: f64,
    cap: LineCap,
    join: LineJoin,
    dash: Vec<f64>,
    dash_offset: f64,
    font: String,
    clip: Option<u64>,
}

impl Default for SvgState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            fill: "#000000".to_string(),
            stroke: "#000000".to_string(),
            line_width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            dash: Vec::new(),
            dash_offset: 0.0,
            font: "10px sans-serif".to_string(),
            clip: None,
        }
    }
}

/// A [`Canvas2d`] that accumulates an SVG document.
#[derive(Debug)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    state: SvgState,
    stack: Vec<SvgState>,
    path: BezPath,
    defs: String,
    body: String,
    clip_counter: u64,
    metadata: Vec<(String, String)>,
}

impl SvgCanvas {
    /// A blank document of `width` by `height` pixels.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            state: SvgState::default(),
            stack: Vec::new(),
            path: BezPath::new(),
            defs: String::new(),
            body: String::new(),
            clip_counter: 0,
            metadata: Vec::new(),
        }
    }

    /// Attach document metadata.
    ///
    /// `Title`, `Creator`, `Date` and `Description` map to Dublin Core
    /// elements; other keys are written as `dc:subject` entries.
    pub fn with_metadata<K, V>(mut self, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.metadata
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Serialize the document.
    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        svg.push_str("<?xml version=\"1.0\" encoding=\"utf-8\" standalone=\"no\"?>\n");
        let (w, h) = (fmt_num(self.width), fmt_num(self.height));
        let _ = writeln!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" version=\"1.1\">"
        );
        if !self.metadata.is_empty() {
            write_metadata(&mut svg, &self.metadata);
        }
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>\n");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>\n");
        svg
    }

    /// Write the document to `out`.
    pub fn write_to(&self, out: &mut dyn io::Write) -> io::Result<()> {
        out.write_all(self.to_svg().as_bytes())
    }

    fn device(&self, x: f64, y: f64) -> Point {
        self.state.transform * Point::new(x, y)
    }

    fn clip_attr(&self) -> String {
        match self.state.clip {
            Some(id) => format!(" clip-path=\"url(#clip{id})\""),
            None => String::new(),
        }
    }

    /// Uniform scale of the current transform, for line widths.
    fn scale(&self) -> f64 {
        self.state.transform.determinant().abs().sqrt()
    }

    fn write_fill(&mut self, path: &BezPath) {
        let d = path_data(path);
        if d.is_empty() {
            return;
        }
        let paint = paint_attrs("fill", &self.state.fill);
        let clip = self.clip_attr();
        let _ = writeln!(self.body, "<path d=\"{d}\"{paint} stroke=\"none\"{clip}/>");
    }

    fn write_stroke(&mut self, path: &BezPath) {
        let d = path_data(path);
        if d.is_empty() {
            return;
        }
        let scale = self.scale();
        let mut attrs = paint_attrs("stroke", &self.state.stroke);
        let _ = write!(
            attrs,
            " stroke-width=\"{}\" stroke-linecap=\"{}\" stroke-linejoin=\"{}\"",
            fmt_num(self.state.line_width * scale),
            self.state.cap.as_css(),
            self.state.join.as_css(),
        );
        if !self.state.dash.is_empty() {
            let dashes: Vec<String> = self
                .state
                .dash
                .iter()
                .map(|d| fmt_num(d * scale))
                .collect();
            let _ = write!(attrs, " stroke-dasharray=\"{}\"", dashes.join(","));
            if self.state.dash_offset != 0.0 {
                let _ = write!(
                    attrs,
                    " stroke-dashoffset=\"{}\"",
                    fmt_num(self.state.dash_offset * scale)
                );
            }
        }
        let clip = self.clip_attr();
        let _ = writeln!(self.body, "<path d=\"{d}\" fill=\"none\"{attrs}{clip}/>");
    }

    fn device_rect(&self, x: f64, y: f64, w: f64, h: f64) -> BezPath {
        self.state.transform * Rect::new(x, y, x + w, y + h).to_path(0.1)
    }
}

impl Canvas2d for SvgCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform *= Affine::translate((tx, ty));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    fn begin_path(&mut self) {
        self.path.truncate(0);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        let p = self.device(x, y);
        if self.path.elements().is_empty() {
            self.path.move_to(p);
        } else {
            self.path.line_to(p);
        }
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        let (c, p) = (self.device(cx, cy), self.device(x, y));
        if self.path.elements().is_empty() {
            self.path.move_to(c);
        }
        self.path.quad_to(c, p);
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        let (c1, c2, p) = (
            self.device(c1x, c1y),
            self.device(c2x, c2y),
            self.device(x, y),
        );
        if self.path.elements().is_empty() {
            self.path.move_to(c1);
        }
        self.path.curve_to(c1, c2, p);
    }

    fn close_path(&mut self) {
        if !self.path.elements().is_empty() {
            self.path.close_path();
        }
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let rect = self.device_rect(x, y, w, h);
        self.path.extend(rect);
    }

    fn clip(&mut self) {
        self.clip_counter += 1;
        let id = self.clip_counter;
        let parent = self.clip_attr();
        let _ = write!(
            self.defs,
            "<clipPath id=\"clip{id}\"{parent}><path d=\"{}\"/></clipPath>",
            path_data(&self.path)
        );
        self.state.clip = Some(id);
    }

    fn fill(&mut self) {
        let path = self.path.clone();
        self.write_fill(&path);
    }

    fn stroke(&mut self) {
        let path = self.path.clone();
        self.write_stroke(&path);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let rect = self.device_rect(x, y, w, h);
        self.write_fill(&rect);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let rect = self.device_rect(x, y, w, h);
        self.write_stroke(&rect);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let cleared = self.device_rect(x, y, w, h).bounding_box();
        let covers_page = cleared.x0 <= 0.0
            && cleared.y0 <= 0.0
            && cleared.x1 >= self.width
            && cleared.y1 >= self.height;
        if covers_page {
            self.body.clear();
        } else {
            log::debug!("partial clear_rect is not representable in SVG; ignored");
        }
    }

    fn set_fill_style(&mut self, css: &str) {
        self.state.fill = css.to_string();
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.state.stroke = css.to_string();
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
        self.state.font = font.to_string();
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        let transform = transform_attr(self.state.transform);
        let paint = paint_attrs("fill", &self.state.fill);
        let clip = self.clip_attr();
        let _ = writeln!(
            self.body,
            "<text x=\"{}\" y=\"{}\"{transform}{paint}{clip} style=\"font: {}; white-space: pre\">{}</text>",
            fmt_num(x),
            fmt_num(y),
            escape_xml(&self.state.font),
            escape_xml(text),
        );
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        let encoded = match encode_png(image) {
            Ok(bytes) => STANDARD.encode(bytes),
            Err(err) => {
                log::warn!("dropping {}x{} image: {err}", image.width, image.height);
                return;
            }
        };
        let transform = transform_attr(self.state.transform);
        let clip = self.clip_attr();
        let _ = writeln!(
            self.body,
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"{transform}{clip} xlink:href=\"data:image/png;base64,{encoded}\"/>",
            fmt_num(x),
            fmt_num(y),
            image.width,
            image.height,
        );
    }
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, png::EncodingError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width, image.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&image.data)?;
        writer.finish()?;
    }
    Ok(bytes)
}

fn write_metadata(svg: &mut String, entries: &[(String, String)]) {
    svg.push_str("<metadata><rdf:RDF xmlns:dc=\"http://purl.org/dc/elements/1.1/\" xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\"><rdf:Description>");
    for (key, value) in entries {
        let element = match key.as_str() {
            "Title" => "dc:title",
            "Creator" => "dc:creator",
            "Date" => "dc:date",
            "Description" => "dc:description",
            _ => "dc:subject",
        };
        let value = if element == "dc:subject" {
            format!("{key}: {value}")
        } else {
            value.clone()
        };
        let _ = write!(svg, "<{element}>{}</{element}>", escape_xml(&value));
    }
    svg.push_str("</rdf:Description></rdf:RDF></metadata>\n");
}

/// Paint attribute pair for a CSS color: `#rrggbb` plus an opacity when
/// the color is translucent. Unparseable colors are passed through.
fn paint_attrs(kind: &str, css: &str) -> String {
    let Some(color) = parse_css_color(css) else {
        return format!(" {kind}=\"{}\"", escape_xml(css));
    };
    let rgba = color.to_rgba8();
    let mut attrs = format!(" {kind}=\"#{:02x}{:02x}{:02x}\"", rgba.r, rgba.g, rgba.b);
    let alpha = f64::from(color.components[3]);
    if alpha < 1.0 {
        let _ = write!(attrs, " {kind}-opacity=\"{}\"", fmt_num(alpha));
    }
    attrs
}

fn transform_attr(xf: Affine) -> String {
    if xf == Affine::IDENTITY {
        return String::new();
    }
    let c = xf.as_coeffs();
    format!(
        " transform=\"matrix({} {} {} {} {} {})\"",
        fmt_num(c[0]),
        fmt_num(c[1]),
        fmt_num(c[2]),
        fmt_num(c[3]),
        fmt_num(c[4]),
        fmt_num(c[5]),
    )
}

fn path_data(path: &BezPath) -> String {
    let mut d = String::new();
    for el in path.elements() {
        if !d.is_empty() {
            d.push(' ');
        }
        let _ = match *el {
            PathEl::MoveTo(p) => write!(d, "M{} {}", fmt_num(p.x), fmt_num(p.y)),
            PathEl::LineTo(p) => write!(d, "L{} {}", fmt_num(p.x), fmt_num(p.y)),
            PathEl::QuadTo(c, p) => write!(
                d,
                "Q{} {} {} {}",
                fmt_num(c.x),
                fmt_num(c.y),
                fmt_num(p.x),
                fmt_num(p.y)
            ),
            PathEl::CurveTo(c1, c2, p) => write!(
                d,
                "C{} {} {} {} {} {}",
                fmt_num(c1.x),
                fmt_num(c1.y),
                fmt_num(c2.x),
                fmt_num(c2.y),
                fmt_num(p.x),
                fmt_num(p.y)
            ),
            PathEl::ClosePath => write!(d, "Z"),
        };
    }
    d
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn fmt_num(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    if v.fract() == 0.0 && v.abs() < 1e15 {
        return format!("{:.0}", v + 0.0);
    }
    let mut s = format!("{v:.3}");
    while s.contains('.') && s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_path_is_written_in_device_space() {
        let mut svg = SvgCanvas::new(100.0, 80.0);
        svg.translate(10.0, 5.0);
        svg.begin_path();
        svg.move_to(0.0, 0.0);
        svg.line_to(10.0, 0.0);
        svg.line_to(10.0, 10.0);
        svg.close_path();
        svg.set_fill_style("rgba(255, 0, 0, 0.5)");
        svg.fill();

        let doc = svg.to_svg();
        assert!(doc.contains("width=\"100\" height=\"80\""));
        assert!(doc.contains("d=\"M10 5 L20 5 L20 15 Z\""), "{doc}");
        assert!(doc.contains("fill=\"#ff0000\" fill-opacity=\"0.5\""));
    }

    #[test]
    fn stroke_carries_width_cap_join_and_dashes() {
        let mut svg = SvgCanvas::new(10.0, 10.0);
        svg.set_line_width(2.5);
        svg.set_line_cap(LineCap::Square);
        svg.set_line_join(LineJoin::Bevel);
        svg.set_line_dash(&[4.0, 2.0]);
        svg.stroke_rect(1.0, 1.0, 5.0, 5.0);

        let doc = svg.to_svg();
        assert!(doc.contains("stroke-width=\"2.5\""));
        assert!(doc.contains("stroke-linecap=\"square\""));
        assert!(doc.contains("stroke-linejoin=\"bevel\""));
        assert!(doc.contains("stroke-dasharray=\"4,2\""));
    }

    #[test]
    fn nested_clips_chain_and_restore_drops_them() {
        let mut svg = SvgCanvas::new(10.0, 10.0);
        svg.save();
        svg.begin_path();
        svg.rect(0.0, 0.0, 5.0, 5.0);
        svg.clip();
        svg.save();
        svg.begin_path();
        svg.rect(1.0, 1.0, 5.0, 5.0);
        svg.clip();
        svg.fill_rect(0.0, 0.0, 10.0, 10.0);
        svg.restore();
        svg.restore();
        svg.fill_rect(0.0, 0.0, 1.0, 1.0);

        let doc = svg.to_svg();
        assert!(doc.contains("<clipPath id=\"clip2\" clip-path=\"url(#clip1)\">"));
        assert_eq!(doc.matches("clip-path=\"url(#clip2)\"").count(), 1);
        let last = doc.lines().rev().find(|l| l.starts_with("<path")).unwrap();
        assert!(!last.contains("clip-path"), "clip ends with its save scope");
    }

    #[test]
    fn text_is_escaped_and_positioned() {
        let mut svg = SvgCanvas::new(10.0, 10.0);
        svg.set_font("normal 400 12px DejaVu Sans, sans-serif");
        svg.fill_text("a < b & c", 1.0, 9.0);
        let doc = svg.to_svg();
        assert!(doc.contains(">a &lt; b &amp; c</text>"));
        assert!(doc.contains("x=\"1\" y=\"9\""));
        assert!(doc.contains("font: normal 400 12px DejaVu Sans, sans-serif"));
    }

    #[test]
    fn images_embed_png_data() {
        let mut svg = SvgCanvas::new(10.0, 10.0);
        let image = RgbaImage {
            width: 1,
            height: 1,
            data: vec![255, 0, 0, 255],
        };
        svg.draw_image(&image, 2.0, 3.0);
        let doc = svg.to_svg();
        assert!(doc.contains("xlink:href=\"data:image/png;base64,iVBORw0KGgo"));
        assert!(doc.contains("width=\"1\" height=\"1\""));
    }

    #[test]
    fn full_clear_discards_earlier_drawing() {
        let mut svg = SvgCanvas::new(10.0, 10.0);
        svg.fill_rect(0.0, 0.0, 1.0, 1.0);
        svg.clear_rect(0.0, 0.0, 10.0, 10.0);
        svg.fill_rect(2.0, 2.0, 1.0, 1.0);
        let doc = svg.to_svg();
        assert_eq!(doc.matches("<path").count(), 1);
    }

    #[test]
    fn metadata_maps_to_dublin_core() {
        let svg = SvgCanvas::new(1.0, 1.0).with_metadata([("Title", "a & b"), ("Software", "x")]);
        let doc = svg.to_svg();
        assert!(doc.contains("<dc:title>a &amp; b</dc:title>"));
        assert!(doc.contains("<dc:subject>Software: x</dc:subject>"));
    }

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(0.125), "0.125");
        assert_eq!(fmt_num(1.0 / 3.0), "0.333");
        assert_eq!(fmt_num(-0.0001), "0");
    }
}
