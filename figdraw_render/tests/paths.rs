// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Path, marker and image emission.

mod common;

use common::{font_cache, segments, unit_square};
use figdraw_imaging::image::{PixelLayout, RasterImage};
use figdraw_imaging::{Canvas2d, CanvasCall, LineCap};
use figdraw_imaging_ref::RecordingCanvas;
use figdraw_render::{ColorValue, GraphicsContext, Renderer};
use kurbo::{Affine, BezPath, Rect};

fn count(calls: &[CanvasCall], wanted: &CanvasCall) -> usize {
    calls.iter().filter(|c| *c == wanted).count()
}

#[test]
fn filled_unit_square_without_stroke() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut gc = GraphicsContext::new();
    gc.set_linewidth(0.0);
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(&gc, &unit_square(), Affine::IDENTITY, Some(ColorValue::Rgb([1.0, 0.0, 0.0])))
        .unwrap();

    assert_eq!(
        segments(&canvas),
        vec![
            CanvasCall::MoveTo { x: 0.0, y: 100.0 },
            CanvasCall::LineTo { x: 1.0, y: 100.0 },
            CanvasCall::LineTo { x: 1.0, y: 99.0 },
            CanvasCall::LineTo { x: 0.0, y: 99.0 },
            CanvasCall::ClosePath,
        ]
    );
    let calls = canvas.calls();
    assert_eq!(count(&calls, &CanvasCall::BeginPath), 1);
    assert_eq!(count(&calls, &CanvasCall::Fill), 1);
    assert_eq!(count(&calls, &CanvasCall::Stroke), 0);
    assert_eq!(canvas.state().save_depth, 0);
}

#[test]
fn fill_style_is_set_then_reset() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(
            &GraphicsContext::new(),
            &unit_square(),
            Affine::IDENTITY,
            Some(ColorValue::Rgb([0.0, 0.5, 1.0])),
        )
        .unwrap();

    let styles: Vec<_> = canvas
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            CanvasCall::SetFillStyle(s) => Some(s),
            _ => None,
        })
        .collect();
    assert_eq!(styles, ["#0080ff", "#000000"]);
    assert_eq!(count(&canvas.calls(), &CanvasCall::Stroke), 1);
}

#[test]
fn stroke_style_uses_forced_alpha_and_line_width_scales_with_dpi() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut gc = GraphicsContext::new();
    gc.set_foreground(ColorValue::Rgba([1.0, 0.0, 0.0, 1.0]));
    gc.set_alpha(Some(0.5));
    gc.set_linewidth(2.0);
    Renderer::new(&mut canvas, &mut fonts, 144.0)
        .draw_path(&gc, &unit_square(), Affine::IDENTITY, None)
        .unwrap();

    let calls = canvas.calls();
    assert!(calls.contains(&CanvasCall::SetStrokeStyle("rgba(255, 0, 0, 0.5)".into())));
    assert!(calls.contains(&CanvasCall::SetLineWidth(4.0)));
}

#[test]
fn cap_join_and_dashes_are_applied() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut gc = GraphicsContext::new();
    gc.set_capstyle_name("projecting").unwrap();
    gc.set_joinstyle_name("bevel").unwrap();
    gc.set_dashes(Some(1.0), Some(vec![6.0, 3.0]));
    Renderer::new(&mut canvas, &mut fonts, 144.0)
        .draw_path(&gc, &unit_square(), Affine::IDENTITY, None)
        .unwrap();

    let calls = canvas.calls();
    assert!(calls.contains(&CanvasCall::SetLineCap(LineCap::Square)));
    assert!(calls.contains(&CanvasCall::SetLineDash(vec![12.0, 6.0])));
    assert!(calls.contains(&CanvasCall::SetLineDashOffset(2.0)));
    // State is restored after the draw.
    assert_eq!(canvas.state().line_cap, LineCap::Butt);
    assert!(canvas.state().line_dash.is_empty());
}

#[test]
fn missing_dash_lengths_draw_solid() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    canvas.set_line_dash(&[4.0, 4.0]);
    let mut fonts = font_cache();
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(&GraphicsContext::new(), &unit_square(), Affine::IDENTITY, None)
        .unwrap();

    let calls = canvas.calls();
    let solid = calls
        .iter()
        .position(|c| *c == CanvasCall::SetLineDash(Vec::new()))
        .expect("an empty dash pattern is set");
    let stroke = calls
        .iter()
        .position(|c| *c == CanvasCall::Stroke)
        .expect("the outline is stroked");
    assert!(solid < stroke, "the pattern is cleared before stroking");
}

#[test]
fn clip_rectangle_is_rounded_and_flipped() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut gc = GraphicsContext::new();
    gc.set_clip_rectangle(Some(Rect::new(10.4, 20.5, 40.4, 60.5)));
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(&gc, &unit_square(), Affine::IDENTITY, None)
        .unwrap();

    let calls = canvas.calls();
    let rect = calls.iter().position(|c| {
        *c == CanvasCall::Rect {
            x: 10.0,
            y: 40.0,
            w: 30.0,
            h: 40.0,
        }
    });
    let rect = rect.expect("clip rectangle is emitted");
    assert_eq!(calls[rect + 1], CanvasCall::Clip);
    // One save for the draw, one for the clip; both are restored.
    assert_eq!(count(&calls, &CanvasCall::Save), 2);
    assert_eq!(count(&calls, &CanvasCall::Restore), 2);
    assert_eq!(canvas.state().clip_depth, 0);
}

#[test]
fn unfilled_lines_off_the_figure_become_moves() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut path = BezPath::new();
    path.move_to((-10.0, -10.0));
    path.line_to((-20.0, -20.0));
    path.line_to((50.0, 50.0));
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(&GraphicsContext::new(), &path, Affine::IDENTITY, None)
        .unwrap();

    assert_eq!(
        segments(&canvas),
        vec![
            CanvasCall::MoveTo { x: -10.0, y: 110.0 },
            CanvasCall::MoveTo { x: -20.0, y: 120.0 },
            CanvasCall::LineTo { x: 50.0, y: 50.0 },
        ]
    );
}

#[test]
fn filled_paths_are_never_clipped_to_the_figure() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut path = BezPath::new();
    path.move_to((-10.0, -10.0));
    path.line_to((-20.0, -20.0));
    path.line_to((50.0, 50.0));
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_path(
            &GraphicsContext::new(),
            &path,
            Affine::IDENTITY,
            Some(ColorValue::BLACK),
        )
        .unwrap();

    let moves = segments(&canvas)
        .iter()
        .filter(|c| matches!(c, CanvasCall::MoveTo { .. }))
        .count();
    assert_eq!(moves, 1);
}

#[test]
fn markers_are_drawn_at_each_vertex() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut vertices = BezPath::new();
    vertices.move_to((10.0, 10.0));
    vertices.line_to((20.0, 20.0));
    vertices.line_to((f64::NAN, 30.0));
    vertices.line_to((30.0, 30.0));

    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_markers(
            &GraphicsContext::new(),
            &unit_square(),
            Affine::scale(2.0),
            &vertices,
            Affine::IDENTITY,
            Some(ColorValue::BLACK),
        )
        .unwrap();

    let calls = canvas.calls();
    assert_eq!(count(&calls, &CanvasCall::Fill), 3, "the NaN vertex is skipped");
    let first_moves: Vec<_> = calls
        .iter()
        .filter(|c| matches!(c, CanvasCall::MoveTo { .. }))
        .cloned()
        .collect();
    assert_eq!(
        first_moves,
        vec![
            CanvasCall::MoveTo { x: 10.0, y: 90.0 },
            CanvasCall::MoveTo { x: 20.0, y: 80.0 },
            CanvasCall::MoveTo { x: 30.0, y: 70.0 },
        ]
    );
}

#[test]
fn images_are_flipped_and_placed_from_the_top() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    // Bottom row red, top row blue.
    let image = RasterImage::new(
        1,
        2,
        PixelLayout::Rgb8,
        vec![255, 0, 0, 0, 0, 255],
    )
    .unwrap();
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_image(&GraphicsContext::new(), 5.0, 10.0, &image)
        .unwrap();

    let drawn = canvas
        .calls()
        .into_iter()
        .find_map(|c| match c {
            CanvasCall::DrawImage { image, x, y } => Some((image, x, y)),
            _ => None,
        })
        .expect("image is drawn");
    assert_eq!((drawn.1, drawn.2), (5.0, 88.0));
    assert_eq!(drawn.0.data, vec![0, 0, 255, 255, 255, 0, 0, 255]);
    assert_eq!(canvas.state().save_depth, 0);
}
