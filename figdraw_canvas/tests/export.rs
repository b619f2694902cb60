// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Printing to PNG, SVG and PDF, and browser downloads.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use common::{canvas, canvas_at_ratio, TestFigure};
use figdraw_canvas::{ElementKind, ExportError, ExportFormat, Metadata, ToolbarCommand};
use figdraw_render::Figure;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn print(c: &mut common::TestCanvas, format: ExportFormat) -> Vec<u8> {
    let mut out = Vec::new();
    c.print_format(&mut out, format, None).unwrap();
    out
}

#[test]
fn png_carries_software_and_resolution() {
    let mut c = canvas(TestFigure::new().with_square());
    c.show().unwrap();
    let png = print(&mut c, ExportFormat::Png);

    assert!(png.starts_with(b"\x89PNG"));
    assert!(contains(&png, b"tEXtSoftware\0figdraw version"));
    // 100 dpi is 3937 pixels per meter on both axes, unit meter.
    assert!(contains(
        &png,
        b"pHYs\x00\x00\x0f\x61\x00\x00\x0f\x61\x01"
    ));

    let reader = png::Decoder::new(png.as_slice()).read_info().unwrap();
    assert_eq!((reader.info().width, reader.info().height), (400, 300));
}

#[test]
fn png_is_taken_at_device_resolution() {
    let mut c = canvas_at_ratio(TestFigure::new(), 2.0);
    c.show().unwrap();
    let png = print(&mut c, ExportFormat::Png);
    let reader = png::Decoder::new(png.as_slice()).read_info().unwrap();
    assert_eq!((reader.info().width, reader.info().height), (800, 600));
}

#[test]
fn caller_metadata_replaces_defaults() {
    let mut c = canvas(TestFigure::new());
    c.show().unwrap();
    let metadata = Metadata::new()
        .with("Software", "custom")
        .with("Title", "Sales");
    let mut png = Vec::new();
    c.print_format(&mut png, ExportFormat::Png, Some(&metadata))
        .unwrap();

    assert!(contains(&png, b"tEXtSoftware\0custom"));
    assert!(!contains(&png, b"figdraw version"));
    assert!(contains(&png, b"tEXtTitle\0Sales"));
}

#[test]
fn png_needs_a_shown_surface() {
    let mut c = canvas(TestFigure::new());
    let err = c
        .print_format(&mut Vec::new(), ExportFormat::Png, None)
        .unwrap_err();
    assert!(matches!(err, ExportError::MissingSurface), "got {err:?}");
}

#[test]
fn svg_is_drawn_at_figure_resolution() {
    let mut c = canvas_at_ratio(TestFigure::new().with_square(), 2.0);
    c.show().unwrap();
    let svg = String::from_utf8(print(&mut c, ExportFormat::Svg)).unwrap();

    assert!(svg.contains("<svg"));
    assert!(svg.contains("width=\"400\" height=\"300\""));
    assert!(svg.contains("<dc:creator>figdraw version"));
    assert_eq!(c.figure().frame_dpis, [200.0, 100.0]);
    assert_eq!(c.figure().dpi(), 100.0);
}

#[test]
fn pdf_page_is_sized_in_points() {
    let mut c = canvas(TestFigure::new().with_square());
    let pdf = print(&mut c, ExportFormat::Pdf);
    let text = String::from_utf8_lossy(&pdf);

    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert!(text.contains("/MediaBox [0 0 288 216]"));
    assert!(text.contains("/Producer (figdraw version"));
    assert!(text.contains("/Creator (figdraw version"));
    assert_eq!(c.figure().frame_dpis, [72.0]);
    assert_eq!(c.figure().dpi(), 100.0, "dpi is restored after export");
}

#[test]
fn failed_export_restores_resolution() {
    let mut figure = TestFigure::new();
    figure.fail = true;
    let mut c = canvas(figure);
    let err = c
        .print_format(&mut Vec::new(), ExportFormat::Svg, None)
        .unwrap_err();
    assert!(matches!(err, ExportError::Render(_)), "got {err:?}");
    assert_eq!(c.figure().dpi(), 100.0);
}

#[test]
fn download_clicks_a_hidden_anchor() {
    let mut c = canvas(TestFigure::new());
    c.show().unwrap();
    let root = c.element("").unwrap();
    c.activate(ToolbarCommand::Download(ExportFormat::Svg))
        .unwrap();

    let clicked = c.provider().clicked();
    assert_eq!(clicked.len(), 1);
    let anchor = &clicked[0];
    assert_eq!(anchor.kind, ElementKind::Anchor);
    assert_eq!(anchor.attribute("download"), Some("plot.svg"));
    assert_eq!(anchor.style.as_deref(), Some("display: none"));

    let href = anchor.attribute("href").unwrap();
    let payload = href
        .strip_prefix("data:image/svg+xml;base64,")
        .expect("svg data uri");
    let svg = STANDARD.decode(payload).unwrap();
    assert!(contains(&svg, b"<svg"));

    assert_eq!(c.provider().body(), [root], "the anchor is removed");
}

#[test]
fn save_button_downloads_png() {
    let mut c = canvas(TestFigure::new());
    c.show().unwrap();
    c.activate(ToolbarCommand::SaveFigure).unwrap();
    let anchor = &c.provider().clicked()[0];
    assert_eq!(anchor.attribute("download"), Some("plot.png"));
    assert!(anchor
        .attribute("href")
        .unwrap()
        .starts_with("data:image/png;base64,"));
}

#[test]
fn format_buttons_download_their_format() {
    let mut c = canvas(TestFigure::new());
    c.show().unwrap();
    let pdf_button = c
        .toolbar_buttons()
        .iter()
        .find(|(_, command)| *command == ToolbarCommand::Download(ExportFormat::Pdf))
        .map(|(node, _)| *node)
        .unwrap();
    let label = c.provider().node(pdf_button).unwrap().element.text.clone();
    assert_eq!(label.as_deref(), Some("pdf"));

    assert!(c.on_toolbar_click(pdf_button).unwrap());
    let anchor = &c.provider().clicked()[0];
    assert_eq!(anchor.attribute("download"), Some("plot.pdf"));
}
