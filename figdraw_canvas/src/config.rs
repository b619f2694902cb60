// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas configuration.

/// Settings for a [`FigureCanvas`](crate::FigureCanvas).
///
/// Construct with struct update syntax or the `with_*` builders:
///
/// ```
/// use figdraw_canvas::CanvasConfig;
///
/// let config = CanvasConfig {
///     idle_delay_ms: 4,
///     ..CanvasConfig::default()
/// }
/// .with_download_basename("figure");
/// assert_eq!(config.id_prefix, "figdraw_");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct CanvasConfig {
    /// Prefix for the element ids of a surface.
    pub id_prefix: String,
    /// Delay of the deferred idle redraw, in milliseconds.
    pub idle_delay_ms: u32,
    /// Dash pattern of the zoom rubberband, in device pixels.
    pub rubberband_dash: Vec<f64>,
    /// Id of the shared style element; injected once per document.
    pub style_element_id: String,
    /// File name, without extension, offered for downloads.
    pub download_basename: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            id_prefix: "figdraw_".to_string(),
            idle_delay_ms: 1,
            rubberband_dash: vec![2.0, 2.0],
            style_element_id: "figdraw-figure-styles".to_string(),
            download_basename: "plot".to_string(),
        }
    }
}

impl CanvasConfig {
    /// Set the element id prefix.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// Set the idle redraw delay.
    pub fn with_idle_delay_ms(mut self, delay: u32) -> Self {
        self.idle_delay_ms = delay;
        self
    }

    /// Set the rubberband dash pattern.
    pub fn with_rubberband_dash(mut self, dash: impl Into<Vec<f64>>) -> Self {
        self.rubberband_dash = dash.into();
        self
    }

    /// Set the style element id.
    pub fn with_style_element_id(mut self, id: impl Into<String>) -> Self {
        self.style_element_id = id.into();
        self
    }

    /// Set the download file name.
    pub fn with_download_basename(mut self, name: impl Into<String>) -> Self {
        self.download_basename = name.into();
        self
    }
}

/// Ordered key/value metadata for exported files.
///
/// PNG output writes each entry as a text chunk. SVG output maps entries to
/// Dublin Core fields and PDF output to the document information
/// dictionary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    entries: Vec<(String, String)>,
}

impl Metadata {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an entry, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace an entry. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `self` laid over `defaults`: caller entries win, defaults come first.
    pub fn over(&self, defaults: &Self) -> Self {
        let mut merged = defaults.clone();
        for (k, v) in self.iter() {
            merged.insert(k, v);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_metadata_overrides_defaults_in_place() {
        let defaults = Metadata::new().with("Software", "figdraw").with("Author", "");
        let caller = Metadata::new().with("Title", "T").with("Software", "mine");
        let merged = caller.over(&defaults);
        let keys: Vec<_> = merged.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Software", "Author", "Title"], "defaults keep their order");
        assert_eq!(merged.get("Software"), Some("mine"));
    }
}
