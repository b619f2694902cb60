// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for canvas tests.

#![allow(dead_code, reason = "not every test binary uses every helper")]

use std::path::Path;

use figdraw_canvas::{
    CanvasConfig, FigureCanvas, ManualTaskQueue, MemoryFontRegistrar, MemorySurfaceProvider,
    PixelRatioProbe,
};
use figdraw_imaging::CanvasCall;
use figdraw_render::{
    ColorValue, CommandFigure, DrawCommand, Figure, GraphicsContext, NavigationRequest,
    RenderError, Renderer,
};
use figdraw_text::{DirectoryFontLocator, FileFontLoader, FontCache, FontProperties};
use kurbo::{Affine, BezPath, Point, Size};

pub type TestCanvas = FigureCanvas<TestFigure, MemorySurfaceProvider, ManualTaskQueue>;

/// A 4 × 3 inch, 100 dpi figure that records how it is drawn and
/// navigated.
#[derive(Debug)]
pub struct TestFigure {
    pub inner: CommandFigure,
    pub frames: u32,
    pub frame_dpis: Vec<f64>,
    pub requests: Vec<NavigationRequest>,
    pub fail: bool,
}

impl TestFigure {
    pub fn new() -> Self {
        Self {
            inner: CommandFigure::new(Size::new(4.0, 3.0), 100.0),
            frames: 0,
            frame_dpis: Vec::new(),
            requests: Vec::new(),
            fail: false,
        }
    }

    /// A filled square in the lower-left quarter.
    pub fn with_square(mut self) -> Self {
        let mut square = BezPath::new();
        square.move_to((10.0, 10.0));
        square.line_to((60.0, 10.0));
        square.line_to((60.0, 60.0));
        square.line_to((10.0, 60.0));
        square.close_path();
        self.inner.push(DrawCommand::Path {
            gc: GraphicsContext::new(),
            path: square,
            transform: Affine::IDENTITY,
            fill: Some(ColorValue::Rgb([0.0, 0.5, 1.0])),
        });
        self
    }

    /// A plain-text label in the bundled sans-serif face.
    pub fn with_label(mut self, text: &str, at: Point) -> Self {
        self.inner.push(DrawCommand::Text {
            gc: GraphicsContext::new(),
            position: at,
            text: text.to_string(),
            props: FontProperties::new("sans-serif").with_size(12.0),
            angle: 0.0,
            is_math: false,
        });
        self
    }
}

impl Figure for TestFigure {
    fn dpi(&self) -> f64 {
        self.inner.dpi()
    }

    fn set_dpi(&mut self, dpi: f64) {
        self.inner.set_dpi(dpi);
    }

    fn size_inches(&self) -> Size {
        self.inner.size_inches()
    }

    fn set_size_inches(&mut self, size: Size) {
        self.inner.set_size_inches(size);
    }

    fn draw(&mut self, renderer: &mut Renderer<'_>) -> Result<(), RenderError> {
        self.frames += 1;
        self.frame_dpis.push(renderer.dpi());
        if self.fail {
            return Err(RenderError::MathUnavailable);
        }
        self.inner.draw(renderer)
    }

    fn navigate(&mut self, request: &NavigationRequest) -> bool {
        self.requests.push(request.clone());
        true
    }
}

/// A font cache over the bundled fonts.
pub fn fonts() -> FontCache {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/fonts");
    let locator = DirectoryFontLocator::scan([dir]).expect("bundled fonts are readable");
    FontCache::new(Box::new(locator), Box::new(FileFontLoader))
}

pub fn canvas_with(figure: TestFigure, provider: MemorySurfaceProvider) -> TestCanvas {
    FigureCanvas::new(
        figure,
        provider,
        ManualTaskQueue::new(),
        fonts(),
        None,
        CanvasConfig::default(),
    )
    .with_id("fig_")
}

pub fn canvas(figure: TestFigure) -> TestCanvas {
    canvas_with(figure, MemorySurfaceProvider::new())
}

/// A canvas on a display with `device_pixel_ratio`.
pub fn canvas_at_ratio(figure: TestFigure, device_pixel_ratio: f64) -> TestCanvas {
    let probe = PixelRatioProbe {
        device_pixel_ratio: Some(device_pixel_ratio),
        ..PixelRatioProbe::default()
    };
    canvas_with(figure, MemorySurfaceProvider::new().with_probe(probe))
}

/// A canvas whose fonts are registered through a shared recording
/// registrar.
pub fn canvas_with_registrar(figure: TestFigure) -> (TestCanvas, MemoryFontRegistrar) {
    let registrar = MemoryFontRegistrar::new();
    let canvas = canvas(figure).with_registrar(Box::new(registrar.clone()));
    (canvas, registrar)
}

/// Calls recorded on the layer with id suffix `suffix`.
pub fn layer_calls(canvas: &TestCanvas, suffix: &str) -> Vec<CanvasCall> {
    canvas
        .provider()
        .layer(&format!("{}{suffix}", canvas.id()))
        .map(|layer| layer.calls())
        .unwrap_or_default()
}

/// Text content of the element with id suffix `suffix`.
pub fn element_text(canvas: &TestCanvas, suffix: &str) -> Option<String> {
    let node = canvas.element(suffix)?;
    canvas.provider().node(node)?.element.text.clone()
}
