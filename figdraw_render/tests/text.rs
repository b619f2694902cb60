// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain and math text.

mod common;

use std::f64::consts::FRAC_PI_2;

use common::{font_cache, LinearMath, Registrations};
use figdraw_imaging::CanvasCall;
use figdraw_imaging_ref::RecordingCanvas;
use figdraw_render::{
    CommandFigure, DrawCommand, Figure, FrameState, GraphicsContext, RenderError, Renderer,
};
use figdraw_text::{FontError, FontProperties};
use kurbo::{Point, Rect, Size};

fn fill_text(calls: &[CanvasCall]) -> (String, f64, f64) {
    calls
        .iter()
        .find_map(|c| match c {
            CanvasCall::FillText { text, x, y } => Some((text.clone(), *x, *y)),
            _ => None,
        })
        .expect("text is filled")
}

#[test]
fn plain_text_sits_on_the_descent_corrected_baseline() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut registrations = Registrations::default();
    let props = FontProperties::default().with_size(10.0);
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .with_registrar(&mut registrations)
        .draw_text(&GraphicsContext::new(), 10.0, 20.0, "hi", &props, 0.0, false)
        .unwrap();

    let calls = canvas.calls();
    // 10px font, descent is a fifth of the em.
    assert_eq!(fill_text(&calls), ("hi".to_string(), 10.0, 78.0));
    assert!(calls.contains(&CanvasCall::SetFont(
        "normal 400 10px Box Sans, sans-serif".into()
    )));
    assert!(!calls.iter().any(|c| matches!(c, CanvasCall::Rotate { .. })));
    assert_eq!(
        registrations.0,
        vec![("Box Sans".to_string(), "url(/fonts/BoxSans.ttf)".to_string())]
    );
    assert_eq!(canvas.state().save_depth, 0);
    assert_eq!(canvas.state().fill_style, "#000000");
}

#[test]
fn fonts_are_registered_once_across_draws() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut registrations = Registrations::default();
    let mut renderer = Renderer::new(&mut canvas, &mut fonts, 72.0).with_registrar(&mut registrations);
    let gc = GraphicsContext::new();
    for size in [8.0, 10.0, 12.0] {
        let props = FontProperties::default().with_size(size);
        renderer
            .draw_text(&gc, 0.0, 0.0, "x", &props, 0.0, false)
            .unwrap();
    }
    drop(renderer);
    assert_eq!(registrations.0.len(), 1);
}

#[test]
fn rotated_text_rotates_about_its_anchor() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let props = FontProperties::default().with_size(10.0);
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_text(&GraphicsContext::new(), 10.0, 20.0, "up", &props, 90.0, false)
        .unwrap();

    let calls = canvas.calls();
    let (_, x, y) = fill_text(&calls);
    // The descent shifts the anchor along the rotated baseline normal.
    assert!((x - 8.0).abs() < 1e-9);
    assert!((y - 80.0).abs() < 1e-9);
    let rotate = calls
        .iter()
        .find_map(|c| match c {
            CanvasCall::Rotate { radians } => Some(*radians),
            _ => None,
        })
        .expect("rotation is applied");
    assert!((rotate + FRAC_PI_2).abs() < 1e-12);
    assert_eq!(canvas.state().save_depth, 0);
}

#[test]
fn text_extents_follow_dpi() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let math = LinearMath::new();
    let mut renderer = Renderer::new(&mut canvas, &mut fonts, 144.0).with_math(&math);
    let props = FontProperties::default().with_size(10.0);

    let plain = renderer
        .get_text_width_height_descent("abcd", &props, false)
        .unwrap();
    assert_eq!((plain.width, plain.height, plain.descent), (40.0, 20.0, 4.0));

    // Math is measured at 72 dpi regardless of the output resolution.
    let math = renderer
        .get_text_width_height_descent("$ab$", &props, true)
        .unwrap();
    assert_eq!((math.width, math.height, math.descent), (20.0, 10.0, 2.0));
}

#[test]
fn math_text_is_drawn_from_glyph_outlines() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let math = LinearMath::new();
    let props = FontProperties::default().with_size(10.0);
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .with_math(&math)
        .draw_text(&GraphicsContext::new(), 10.0, 20.0, "$ab$", &props, 0.0, true)
        .unwrap();

    let calls = canvas.calls();
    assert!(calls.contains(&CanvasCall::Translate { tx: 10.0, ty: 80.0 }));
    assert!(calls.contains(&CanvasCall::Translate { tx: 10.0, ty: -0.0 }));
    assert_eq!(calls.iter().filter(|c| **c == CanvasCall::Fill).count(), 2);
    // Glyph outlines are scaled from font units and flipped.
    assert!(calls.contains(&CanvasCall::LineTo { x: 10.0, y: 0.0 }));
    assert!(calls.contains(&CanvasCall::LineTo { x: 10.0, y: -10.0 }));
    // The rule below the expression.
    assert!(calls.contains(&CanvasCall::FillRect {
        x: 0.0,
        y: 1.0,
        w: 20.0,
        h: 1.0
    }));
    assert!(!calls.iter().any(|c| matches!(c, CanvasCall::DrawImage { .. })));
    assert_eq!(canvas.state().save_depth, 0);
}

#[test]
fn missing_glyph_falls_back_to_raster() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let math = LinearMath::new();
    let props = FontProperties::default().with_size(10.0);
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .with_math(&math)
        .draw_text(&GraphicsContext::new(), 10.0, 20.0, "$a?$", &props, 0.0, true)
        .unwrap();

    let placed = canvas
        .calls()
        .into_iter()
        .find_map(|c| match c {
            CanvasCall::DrawImage { x, y, .. } => Some((x, y)),
            _ => None,
        })
        .expect("raster fallback is drawn");
    // Bottom edge sits `depth` below the anchor.
    assert_eq!(placed, (10.0, 79.0));
    assert_eq!(canvas.state().save_depth, 0);
    assert_eq!(canvas.unbalanced_restores(), 0);
}

#[test]
fn raster_fallback_honors_the_clip_rectangle() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let math = LinearMath::new();
    let mut gc = GraphicsContext::new();
    gc.set_clip_rectangle(Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
    Renderer::new(&mut canvas, &mut fonts, 72.0)
        .with_math(&math)
        .draw_text(&gc, 10.0, 20.0, "$a?$", &FontProperties::default(), 30.0, true)
        .unwrap();

    let calls = canvas.calls();
    let clip = calls
        .iter()
        .position(|c| {
            *c == CanvasCall::Rect {
                x: 0.0,
                y: 50.0,
                w: 50.0,
                h: 50.0,
            }
        })
        .expect("clip rectangle is emitted");
    let image = calls
        .iter()
        .position(|c| matches!(c, CanvasCall::DrawImage { .. }))
        .expect("raster fallback is drawn");
    assert_eq!(calls[clip + 1], CanvasCall::Clip);
    assert!(clip < image, "the clip is in place before the image");
    assert_eq!(canvas.state().save_depth, 0);
    assert_eq!(canvas.unbalanced_restores(), 0);
}

#[test]
fn failed_fallback_is_math_render_failed() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let mut math = LinearMath::new();
    math.raster_fails = true;
    let err = Renderer::new(&mut canvas, &mut fonts, 72.0)
        .with_math(&math)
        .draw_text(
            &GraphicsContext::new(),
            0.0,
            0.0,
            "$$",
            &FontProperties::default(),
            0.0,
            true,
        )
        .unwrap_err();
    assert!(matches!(err, RenderError::MathRenderFailed(_)));
    assert_eq!(canvas.state().save_depth, 0);
}

#[test]
fn math_without_engine_is_an_error() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let err = Renderer::new(&mut canvas, &mut fonts, 72.0)
        .draw_text(
            &GraphicsContext::new(),
            0.0,
            0.0,
            "$x$",
            &FontProperties::default(),
            0.0,
            true,
        )
        .unwrap_err();
    assert!(matches!(err, RenderError::MathUnavailable));
}

#[test]
fn a_failing_command_fails_the_frame_with_balanced_state() {
    let mut canvas = RecordingCanvas::new(100.0, 100.0);
    let mut fonts = font_cache();
    let text = |family: &str| DrawCommand::Text {
        gc: GraphicsContext::new(),
        position: Point::new(1.0, 1.0),
        text: "t".into(),
        props: FontProperties::new(family),
        angle: 0.0,
        is_math: false,
    };
    let mut renderer = Renderer::new(&mut canvas, &mut fonts, 72.0);
    let err = renderer
        .render_frame(&[text("sans-serif"), text("missing"), text("sans-serif")])
        .unwrap_err();
    assert_eq!(renderer.state(), FrameState::Failed);
    drop(renderer);

    let RenderError::RenderFailed(cause) = err else {
        panic!("frame errors are wrapped");
    };
    assert!(matches!(*cause, RenderError::Font(FontError::FontNotFound { .. })));
    let filled = canvas
        .calls()
        .iter()
        .filter(|c| matches!(c, CanvasCall::FillText { .. }))
        .count();
    assert_eq!(filled, 1, "commands after the failure are not issued");
    assert_eq!(canvas.state().save_depth, 0);
}

#[test]
fn command_figures_scale_with_dpi() {
    let mut canvas = RecordingCanvas::new(200.0, 200.0);
    let mut fonts = font_cache();
    let mut figure = CommandFigure::new(Size::new(1.0, 1.0), 100.0).with(DrawCommand::Text {
        gc: GraphicsContext::new(),
        position: Point::new(10.0, 20.0),
        text: "t".into(),
        props: FontProperties::default().with_size(36.0),
        angle: 0.0,
        is_math: false,
    });
    figure.set_dpi(200.0);
    let mut renderer = Renderer::new(&mut canvas, &mut fonts, figure.dpi());
    figure.draw(&mut renderer).unwrap();
    drop(renderer);

    // 36pt at 200 dpi is 100px; descent is 20px.
    let (_, x, y) = fill_text(&canvas.calls());
    assert_eq!((x, y), (20.0, 200.0 - 40.0 - 20.0));
}
