// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`Canvas2d`] over a browser 2D context.

use core::fmt;

use figdraw_imaging::image::RgbaImage;
use figdraw_imaging::{Canvas2d, LineCap, LineJoin};
use js_sys::Array;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("missing 2d context"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

/// A `<canvas>` element and its 2D context.
#[derive(Clone)]
pub struct WebCanvas {
    element: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl fmt::Debug for WebCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebCanvas")
            .field("width", &self.element.width())
            .field("height", &self.element.height())
            .finish_non_exhaustive()
    }
}

impl WebCanvas {
    /// Draw into `element`.
    pub fn new(element: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = context_2d(&element)?;
        Ok(Self { element, ctx })
    }

    /// The canvas element.
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.element
    }

    /// The 2D context.
    pub fn context(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    /// Copy `image` into a detached canvas of the same size.
    fn stage(&self, image: &RgbaImage) -> Result<HtmlCanvasElement, JsValue> {
        let document = self
            .element
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas has no document"))?;
        let staging = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        staging.set_width(image.width);
        staging.set_height(image.height);
        let data = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(image.data.as_slice()),
            image.width,
            image.height,
        )?;
        context_2d(&staging)?.put_image_data(&data, 0.0, 0.0)?;
        Ok(staging)
    }
}

impl Canvas2d for WebCanvas {
    fn width(&self) -> f64 {
        f64::from(self.element.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.element.height())
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        let _ = self.ctx.translate(tx, ty);
    }

    fn rotate(&mut self, radians: f64) {
        let _ = self.ctx.rotate(radians);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn quadratic_curve_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cx, cy, x, y);
    }

    fn bezier_curve_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) {
        self.ctx.bezier_curve_to(c1x, c1y, c2x, c2y, x, y);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.rect(x, y, w, h);
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.clear_rect(x, y, w, h);
    }

    fn set_fill_style(&mut self, css: &str) {
        self.ctx.set_fill_style_str(css);
    }

    fn set_stroke_style(&mut self, css: &str) {
        self.ctx.set_stroke_style_str(css);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_css());
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(join.as_css());
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let dash = Array::new();
        for v in segments {
            dash.push(&JsValue::from_f64(*v));
        }
        let _ = self.ctx.set_line_dash(&dash);
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.ctx.set_line_dash_offset(offset);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        if let Err(err) = self.ctx.fill_text(text, x, y) {
            log::warn!("fillText failed: {err:?}");
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let result = self.stage(image).and_then(|staging| {
            self.ctx
                .draw_image_with_html_canvas_element(&staging, x, y)
        });
        if let Err(err) = result {
            log::warn!("drawImage failed: {err:?}");
        }
    }
}
