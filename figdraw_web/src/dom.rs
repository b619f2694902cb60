// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live document as a [`SurfaceProvider`].

use core::cell::{Cell, RefCell};
use core::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use figdraw_canvas::{
    BACKING_STORE_PROPERTIES, Element, ElementKind, NodeId, Parent, PixelRatioProbe,
    SurfaceProvider,
};
use figdraw_imaging::Canvas2d;
use hashbrown::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window};

use crate::canvas::WebCanvas;

/// Document property naming the element figures are mounted under.
pub const MOUNT_PROPERTY: &str = "figdrawTarget";

/// A [`SurfaceProvider`] over the browser document.
///
/// Elements are tracked by [`NodeId`]. Elements found through
/// [`lookup`](SurfaceProvider::lookup) that this provider did not create are
/// adopted under a fresh id.
pub struct DomSurfaceProvider {
    window: Window,
    document: Document,
    mount: Option<web_sys::Element>,
    nodes: RefCell<HashMap<NodeId, web_sys::Element>>,
    layers: HashMap<NodeId, WebCanvas>,
    next_node: Cell<u64>,
}

impl fmt::Debug for DomSurfaceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomSurfaceProvider")
            .field("nodes", &self.nodes.borrow().len())
            .field("layers", &self.layers.len())
            .finish_non_exhaustive()
    }
}

impl DomSurfaceProvider {
    /// The current window's document.
    ///
    /// If the page has set `document.figdrawTarget` to an element, figures
    /// are mounted there instead of in the body.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let mount = js_sys::Reflect::get(&document, &JsValue::from_str(MOUNT_PROPERTY))
            .ok()
            .and_then(|target| target.dyn_into::<web_sys::Element>().ok());
        Ok(Self {
            window,
            document,
            mount,
            nodes: RefCell::new(HashMap::new()),
            layers: HashMap::new(),
            next_node: Cell::new(0),
        })
    }

    /// Mount figures under `target`.
    pub fn with_mount(mut self, target: web_sys::Element) -> Self {
        self.mount = Some(target);
        self
    }

    /// The window.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The DOM element behind `node`.
    pub fn dom_element(&self, node: NodeId) -> Option<web_sys::Element> {
        self.nodes.borrow().get(&node).cloned()
    }

    fn track(&self, element: web_sys::Element) -> NodeId {
        let node = NodeId(self.next_node.get());
        self.next_node.set(node.0 + 1);
        self.nodes.borrow_mut().insert(node, element);
        node
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.dom_element(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn parent_element(&self, parent: Parent) -> Option<web_sys::Node> {
        match parent {
            Parent::Head => self.document.head().map(Into::into),
            Parent::Body => match &self.mount {
                Some(mount) => Some(mount.clone().into()),
                None => self.document.body().map(Into::into),
            },
            Parent::Node(node) => self.dom_element(node).map(Into::into),
        }
    }

    fn build(&self, parent: Parent, element: &Element) -> Result<web_sys::Element, JsValue> {
        let dom = self.document.create_element(element.kind.tag())?;
        if let Some(id) = &element.id {
            dom.set_id(id);
        }
        if let Some(style) = &element.style {
            dom.set_attribute("style", style)?;
        }
        if !element.classes.is_empty() {
            dom.set_attribute("class", &element.classes.join(" "))?;
        }
        for (name, value) in &element.attributes {
            dom.set_attribute(name, value)?;
        }
        if let Some(text) = &element.text {
            dom.set_text_content(Some(text));
        }
        let parent = self
            .parent_element(parent)
            .ok_or_else(|| JsValue::from_str("missing parent element"))?;
        parent.append_child(&dom)?;
        Ok(dom)
    }

    fn probe_backing_store(&self) -> Result<[Option<f64>; 6], JsValue> {
        let probe = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        let ctx = WebCanvas::new(probe)?;
        let mut readings = [None; 6];
        for (reading, name) in readings.iter_mut().zip(BACKING_STORE_PROPERTIES) {
            *reading = js_sys::Reflect::get(ctx.context(), &JsValue::from_str(name))
                .ok()
                .and_then(|v| v.as_f64());
        }
        Ok(readings)
    }
}

impl SurfaceProvider for DomSurfaceProvider {
    fn create_element(&mut self, parent: Parent, element: Element) -> NodeId {
        let dom = match self.build(parent, &element) {
            Ok(dom) => dom,
            Err(err) => {
                log::warn!("could not create <{}>: {err:?}", element.kind.tag());
                // An id that refers to nothing; operations on it are ignored.
                let node = NodeId(self.next_node.get());
                self.next_node.set(node.0 + 1);
                return node;
            }
        };
        let layer = (element.kind == ElementKind::Layer)
            .then(|| dom.clone().dyn_into::<HtmlCanvasElement>().ok())
            .flatten();
        let node = self.track(dom);
        if let Some(layer) = layer {
            match WebCanvas::new(layer) {
                Ok(canvas) => {
                    self.layers.insert(node, canvas);
                }
                Err(err) => log::warn!("layer {node:?} has no 2d context: {err:?}"),
            }
        }
        node
    }

    fn lookup(&self, id: &str) -> Option<NodeId> {
        let dom = self.document.get_element_by_id(id)?;
        let known = self
            .nodes
            .borrow()
            .iter()
            .find(|(_, e)| **e == dom)
            .map(|(node, _)| *node);
        Some(known.unwrap_or_else(|| self.track(dom)))
    }

    fn remove(&mut self, node: NodeId) {
        let Some(dom) = self.dom_element(node) else {
            return;
        };
        dom.remove();
        self.nodes.borrow_mut().retain(|_, e| e.is_connected());
        let nodes = self.nodes.borrow();
        self.layers.retain(|n, _| nodes.contains_key(n));
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.dom_element(node)?.text_content()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(dom) = self.dom_element(node) {
            dom.set_text_content(Some(text));
        }
    }

    fn set_style(&mut self, node: NodeId, style: &str) {
        if let Some(dom) = self.dom_element(node) {
            let _ = dom.set_attribute("style", style);
        }
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if let Some(dom) = self.dom_element(node) {
            dom.scroll_into_view();
        }
    }

    fn focus(&mut self, node: NodeId) {
        if let Some(html) = self.html(node) {
            let _ = html.focus();
        }
    }

    fn blur(&mut self, node: NodeId) {
        if let Some(html) = self.html(node) {
            let _ = html.blur();
        }
    }

    fn set_cursor(&mut self, node: NodeId, cursor: &str) {
        if let Some(html) = self.html(node) {
            let _ = html.style().set_property("cursor", cursor);
        }
    }

    fn click(&mut self, node: NodeId) {
        if let Some(html) = self.html(node) {
            html.click();
        }
    }

    fn canvas(&mut self, node: NodeId) -> Option<&mut dyn Canvas2d> {
        self.layers
            .get_mut(&node)
            .map(|canvas| canvas as &mut dyn Canvas2d)
    }

    fn resize_layer(&mut self, node: NodeId, width: u32, height: u32) {
        if let Some(canvas) = self.layers.get(&node) {
            canvas.element().set_width(width);
            canvas.element().set_height(height);
        }
    }

    fn snapshot_png(&mut self, node: NodeId) -> Option<Vec<u8>> {
        let url = self.layers.get(&node)?.element().to_data_url().ok()?;
        let payload = url.strip_prefix("data:image/png;base64,")?;
        match STANDARD.decode(payload) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::warn!("layer snapshot is not valid base64: {err}");
                None
            }
        }
    }

    fn pixel_ratio_probe(&mut self) -> PixelRatioProbe {
        let backing_store = self.probe_backing_store().unwrap_or_else(|err| {
            log::warn!("could not probe backing store ratio: {err:?}");
            [None; 6]
        });
        PixelRatioProbe {
            device_pixel_ratio: Some(self.window.device_pixel_ratio()),
            backing_store,
        }
    }
}
