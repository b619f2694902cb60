// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory host.
//!
//! [`MemorySurfaceProvider`] keeps an element tree in a map and backs every
//! layer with a [`RecordingCanvas`], so a canvas can be shown, driven and
//! inspected without a browser. [`MemoryFontRegistrar`] records font
//! registrations for the caller to complete.

use std::cell::RefCell;
use std::rc::Rc;

use figdraw_imaging::Canvas2d;
use figdraw_imaging_ref::RecordingCanvas;
use figdraw_text::{FontRegistrar, RegistrationRequest, RegistrationTicket};
use hashbrown::HashMap;

use crate::provider::{Element, ElementKind, NodeId, Parent, PixelRatioProbe, SurfaceProvider};

/// Default layer size, as for an HTML canvas without size attributes.
const DEFAULT_LAYER_SIZE: (u32, u32) = (300, 150);

/// One element of a [`MemorySurfaceProvider`].
#[derive(Debug)]
pub struct MemoryNode {
    /// The element as created, with later text and style edits applied.
    pub element: Element,
    /// Parent element; `None` under the head or body.
    pub parent: Option<NodeId>,
    /// Children in order.
    pub children: Vec<NodeId>,
    /// CSS cursor, if set.
    pub cursor: Option<String>,
    layer: Option<Layer>,
}

#[derive(Debug)]
struct Layer {
    canvas: RecordingCanvas,
    width: u32,
    height: u32,
}

impl MemoryNode {
    /// Recording surface of a layer element.
    pub fn canvas(&self) -> Option<&RecordingCanvas> {
        self.layer.as_ref().map(|l| &l.canvas)
    }

    /// Backing-store size of a layer element.
    pub fn layer_size(&self) -> Option<(u32, u32)> {
        self.layer.as_ref().map(|l| (l.width, l.height))
    }
}

/// A [`SurfaceProvider`] over an in-memory element tree.
#[derive(Debug, Default)]
pub struct MemorySurfaceProvider {
    nodes: HashMap<NodeId, MemoryNode>,
    head: Vec<NodeId>,
    body: Vec<NodeId>,
    next_node: u64,
    probe: PixelRatioProbe,
    focused: Option<NodeId>,
    scrolled: Vec<NodeId>,
    clicked: Vec<Element>,
}

impl MemorySurfaceProvider {
    /// An empty document at pixel ratio 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `probe` as the host's pixel-density readings.
    pub fn with_probe(mut self, probe: PixelRatioProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Element `node`.
    pub fn node(&self, node: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(&node)
    }

    /// Number of attached elements, head and body included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the document holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level elements under the head.
    pub fn head(&self) -> &[NodeId] {
        &self.head
    }

    /// Top-level elements under the body.
    pub fn body(&self) -> &[NodeId] {
        &self.body
    }

    /// The element holding keyboard focus.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Elements scrolled into view, in order.
    pub fn scrolled(&self) -> &[NodeId] {
        &self.scrolled
    }

    /// Elements clicked, as they were when clicked.
    pub fn clicked(&self) -> &[Element] {
        &self.clicked
    }

    /// Recording surface of the layer with id `id`.
    pub fn layer(&self, id: &str) -> Option<&RecordingCanvas> {
        self.lookup(id).and_then(|n| self.nodes.get(&n)?.canvas())
    }

    fn detach(&mut self, node: NodeId) {
        let Some(removed) = self.nodes.remove(&node) else {
            return;
        };
        if self.focused == Some(node) {
            self.focused = None;
        }
        for child in removed.children {
            self.detach(child);
        }
    }
}

fn layer_size(element: &Element) -> (u32, u32) {
    let read = |name: &str, default: u32| {
        element
            .attribute(name)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    (
        read("width", DEFAULT_LAYER_SIZE.0),
        read("height", DEFAULT_LAYER_SIZE.1),
    )
}

impl SurfaceProvider for MemorySurfaceProvider {
    fn create_element(&mut self, parent: Parent, element: Element) -> NodeId {
        let node = NodeId(self.next_node);
        self.next_node += 1;
        let layer = (element.kind == ElementKind::Layer).then(|| {
            let (width, height) = layer_size(&element);
            Layer {
                canvas: RecordingCanvas::new(f64::from(width), f64::from(height)),
                width,
                height,
            }
        });
        let parent_node = match parent {
            Parent::Head => {
                self.head.push(node);
                None
            }
            Parent::Body => {
                self.body.push(node);
                None
            }
            Parent::Node(p) => match self.nodes.get_mut(&p) {
                Some(parent) => {
                    parent.children.push(node);
                    Some(p)
                }
                None => {
                    log::warn!("creating element under missing parent {p:?}");
                    self.body.push(node);
                    None
                }
            },
        };
        self.nodes.insert(
            node,
            MemoryNode {
                element,
                parent: parent_node,
                children: Vec::new(),
                cursor: None,
                layer,
            },
        );
        node
    }

    fn lookup(&self, id: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.element.id.as_deref() == Some(id))
            .map(|(node, _)| *node)
            .min()
    }

    fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(&node).map(|n| n.parent) else {
            return;
        };
        match parent {
            Some(p) => {
                if let Some(parent) = self.nodes.get_mut(&p) {
                    parent.children.retain(|c| *c != node);
                }
            }
            None => {
                self.head.retain(|c| *c != node);
                self.body.retain(|c| *c != node);
            }
        }
        self.detach(node);
    }

    fn text(&self, node: NodeId) -> Option<String> {
        self.nodes.get(&node)?.element.text.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.text = Some(text.to_string());
        }
    }

    fn set_style(&mut self, node: NodeId, style: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.element.style = Some(style.to_string());
        }
    }

    fn scroll_into_view(&mut self, node: NodeId) {
        if self.nodes.contains_key(&node) {
            self.scrolled.push(node);
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.nodes.contains_key(&node) {
            self.focused = Some(node);
        }
    }

    fn blur(&mut self, node: NodeId) {
        if self.focused == Some(node) {
            self.focused = None;
        }
    }

    fn set_cursor(&mut self, node: NodeId, cursor: &str) {
        if let Some(n) = self.nodes.get_mut(&node) {
            n.cursor = Some(cursor.to_string());
        }
    }

    fn click(&mut self, node: NodeId) {
        if let Some(n) = self.nodes.get(&node) {
            self.clicked.push(n.element.clone());
        }
    }

    fn canvas(&mut self, node: NodeId) -> Option<&mut dyn Canvas2d> {
        let layer = self.nodes.get_mut(&node)?.layer.as_mut()?;
        Some(&mut layer.canvas)
    }

    fn resize_layer(&mut self, node: NodeId, width: u32, height: u32) {
        let Some(n) = self.nodes.get_mut(&node) else {
            return;
        };
        if let Some(layer) = n.layer.as_mut() {
            layer.canvas.resize(f64::from(width), f64::from(height));
            layer.width = width;
            layer.height = height;
        }
        for (name, value) in [("width", width), ("height", height)] {
            match n.element.attributes.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value.to_string(),
                None => n
                    .element
                    .attributes
                    .push((name.to_string(), value.to_string())),
            }
        }
    }

    /// A recording surface has no pixels; the snapshot is a transparent
    /// image of the layer's size.
    fn snapshot_png(&mut self, node: NodeId) -> Option<Vec<u8>> {
        let layer = self.nodes.get(&node)?.layer.as_ref()?;
        match blank_png(layer.width, layer.height) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::warn!("failed to encode layer snapshot: {err}");
                None
            }
        }
    }

    fn pixel_ratio_probe(&mut self) -> PixelRatioProbe {
        self.probe
    }
}

fn blank_png(width: u32, height: u32) -> Result<Vec<u8>, png::EncodingError> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, width.max(1), height.max(1));
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    let len = 4 * width.max(1) as usize * height.max(1) as usize;
    writer.write_image_data(&vec![0_u8; len])?;
    writer.finish()?;
    Ok(out)
}

/// A registration seen by a [`MemoryFontRegistrar`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisteredFont {
    /// Ticket to complete.
    pub ticket: RegistrationTicket,
    /// Family name.
    pub family: String,
    /// CSS source descriptor.
    pub source: String,
}

/// A [`FontRegistrar`] that only records requests.
///
/// Clones share the record, so a test can keep one clone while the canvas
/// owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryFontRegistrar {
    requests: Rc<RefCell<Vec<RegisteredFont>>>,
}

impl MemoryFontRegistrar {
    /// A registrar with an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests so far.
    pub fn requests(&self) -> Vec<RegisteredFont> {
        self.requests.borrow().clone()
    }
}

impl FontRegistrar for MemoryFontRegistrar {
    fn register(&mut self, request: RegistrationRequest<'_>) {
        self.requests.borrow_mut().push(RegisteredFont {
            ticket: request.ticket,
            family: request.family.to_string(),
            source: request.source.to_string(),
        });
    }
}
