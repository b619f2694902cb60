// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host document seam.
//!
//! A [`SurfaceProvider`] is the only way the canvas touches its host: it
//! creates and removes elements, edits their text, moves keyboard focus and
//! hands out drawing surfaces for layer elements. Elements are addressed by
//! [`NodeId`] once created and can be looked up by their string id, the way
//! a document is queried.

use figdraw_imaging::Canvas2d;

/// A host element handle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Where to attach a new element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Parent {
    /// The document head.
    Head,
    /// The mount point for figures, usually the document body.
    Body,
    /// An existing element.
    Node(NodeId),
}

/// The kind of element to create.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    /// Block container.
    Container,
    /// Inline container.
    Span,
    /// Drawable layer; its backing-store size comes from the `width` and
    /// `height` attributes.
    Layer,
    /// Push button.
    Button,
    /// Hyperlink.
    Anchor,
    /// Style sheet; its text is CSS.
    Style,
}

impl ElementKind {
    /// The HTML tag for this kind.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Container => "div",
            Self::Span => "span",
            Self::Layer => "canvas",
            Self::Button => "button",
            Self::Anchor => "a",
            Self::Style => "style",
        }
    }
}

/// Description of an element to create.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    /// Element kind.
    pub kind: ElementKind,
    /// Document-unique id.
    pub id: Option<String>,
    /// Inline style.
    pub style: Option<String>,
    /// Text content.
    pub text: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
    /// Other attributes, in order.
    pub attributes: Vec<(String, String)>,
}

impl Element {
    /// A bare element of `kind`.
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            style: None,
            text: None,
            classes: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// A drawable layer with a `width` × `height` pixel backing store.
    pub fn layer(width: u32, height: u32) -> Self {
        Self::new(ElementKind::Layer)
            .with_attribute("width", width.to_string())
            .with_attribute("height", height.to_string())
    }

    /// Set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the inline style.
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a class.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Value of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Backing-store ratio properties, in the order they are consulted.
pub const BACKING_STORE_PROPERTIES: [&str; 6] = [
    "backingStorePixelRatio",
    "webkitBackingStorePixel",
    "mozBackingStorePixelRatio",
    "msBackingStorePixelRatio",
    "oBackingStorePixelRatio",
    "backendStorePixelRatio",
];

/// Raw pixel-density readings from the host.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PixelRatioProbe {
    /// The window's device pixel ratio, when the host has one.
    pub device_pixel_ratio: Option<f64>,
    /// Readings of [`BACKING_STORE_PROPERTIES`] on a 2D context, same order.
    pub backing_store: [Option<f64>; 6],
}

/// Physical pixels per logical pixel.
///
/// The backing-store ratio is the first usable reading of the vendor
/// chain. Missing, zero or non-finite readings count as absent and both
/// factors default to 1.
pub fn resolve_dpr(probe: &PixelRatioProbe) -> f64 {
    let usable = |v: &f64| v.is_finite() && *v > 0.0;
    let device = probe.device_pixel_ratio.filter(usable).unwrap_or(1.0);
    let backing = probe
        .backing_store
        .iter()
        .flatten()
        .copied()
        .find(usable)
        .unwrap_or(1.0);
    device / backing
}

/// Host document capability used by [`FigureCanvas`](crate::FigureCanvas).
pub trait SurfaceProvider {
    /// Create `element` as the last child of `parent`.
    fn create_element(&mut self, parent: Parent, element: Element) -> NodeId;

    /// Find an attached element by id.
    fn lookup(&self, id: &str) -> Option<NodeId>;

    /// Detach and drop `node` and everything under it. Unknown nodes are
    /// ignored.
    fn remove(&mut self, node: NodeId);

    /// Text content of `node`.
    fn text(&self, node: NodeId) -> Option<String>;

    /// Replace the text content of `node`.
    fn set_text(&mut self, node: NodeId, text: &str);

    /// Replace the inline style of `node`.
    fn set_style(&mut self, node: NodeId, style: &str);

    /// Scroll the page so `node` is visible.
    fn scroll_into_view(&mut self, node: NodeId);

    /// Give `node` keyboard focus.
    fn focus(&mut self, node: NodeId);

    /// Take keyboard focus away from `node`.
    fn blur(&mut self, node: NodeId);

    /// Set the CSS cursor shown over `node`.
    fn set_cursor(&mut self, node: NodeId, cursor: &str);

    /// Activate `node` as if clicked.
    fn click(&mut self, node: NodeId);

    /// Drawing surface of a layer element.
    fn canvas(&mut self, node: NodeId) -> Option<&mut dyn Canvas2d>;

    /// Reallocate a layer's backing store. This resets its drawing state.
    fn resize_layer(&mut self, node: NodeId, width: u32, height: u32);

    /// The pixels of a layer, PNG encoded.
    fn snapshot_png(&mut self, node: NodeId) -> Option<Vec<u8>>;

    /// Read the host's pixel-density properties.
    fn pixel_ratio_probe(&mut self) -> PixelRatioProbe;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_defaults_to_one() {
        assert_eq!(resolve_dpr(&PixelRatioProbe::default()), 1.0);
    }

    #[test]
    fn ratio_divides_device_by_backing_store() {
        let mut probe = PixelRatioProbe {
            device_pixel_ratio: Some(3.0),
            ..PixelRatioProbe::default()
        };
        assert_eq!(resolve_dpr(&probe), 3.0);
        probe.backing_store[2] = Some(2.0);
        assert_eq!(resolve_dpr(&probe), 1.5);
    }

    #[test]
    fn first_nonzero_backing_store_reading_wins() {
        let probe = PixelRatioProbe {
            device_pixel_ratio: Some(2.0),
            backing_store: [Some(0.0), None, Some(4.0), Some(8.0), None, None],
        };
        assert_eq!(resolve_dpr(&probe), 0.5, "zero readings are skipped");
    }

    #[test]
    fn layer_carries_backing_store_size() {
        let layer = Element::layer(300, 200).with_id("c");
        assert_eq!(layer.kind.tag(), "canvas");
        assert_eq!(layer.attribute("width"), Some("300"));
        assert_eq!(layer.attribute("height"), Some("200"));
    }
}
