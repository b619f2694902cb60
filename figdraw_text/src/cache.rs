// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Font cache and surface registration bookkeeping.
//!
//! ## Usage
//!
//! 1) Build a [`FontCache`] over a [`FontLocator`] and a [`FontLoader`].
//! 2) Call [`FontCache::resolve_font`] (or [`FontCache::measure_text`]) per
//!    text draw; repeated requests hit the cache.
//! 3) Before drawing text with a font the surface has never seen, call
//!    [`FontCache::ensure_registered`]. The first call for a font file
//!    returns a [`RegistrationTicket`] and hands the file to the
//!    [`FontRegistrar`]; later calls return `None`.
//! 4) When the surface reports the font as loaded, call
//!    [`FontCache::complete_registration`]. A `true` result means text was
//!    drawn with a fallback face and the frame should be redrawn.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::{HashMap, HashSet};

use crate::loader::{FontLoader, FontLocator};
use crate::outline::{OutlineFont, TextExtents};
use crate::props::{FontKey, FontProperties};
use crate::FontError;

/// A resolved font file and its decoded face.
pub struct LoadedFont {
    path: PathBuf,
    file_name: String,
    face: Arc<dyn OutlineFont>,
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("path", &self.path)
            .field("family", &self.face.family_name())
            .finish_non_exhaustive()
    }
}

impl LoadedFont {
    /// Pair a font file with its decoded face.
    pub fn new(path: impl Into<PathBuf>, face: Arc<dyn OutlineFont>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            face,
        }
    }

    /// Font file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last path component of the font file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Family name reported by the face.
    pub fn family_name(&self) -> &str {
        self.face.family_name()
    }

    /// The decoded face.
    pub fn face(&self) -> &dyn OutlineFont {
        self.face.as_ref()
    }
}

/// Shared handle to a cached font.
pub type FontHandle = Arc<LoadedFont>;

/// [`FontCache`] settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontCacheConfig {
    /// Maximum number of cached fonts; the least recently used is evicted.
    pub capacity: usize,
    /// URL prefix under which the host serves font files.
    pub base_url: String,
}

impl Default for FontCacheConfig {
    fn default() -> Self {
        Self {
            capacity: 50,
            base_url: "/fonts/".to_string(),
        }
    }
}

impl FontCacheConfig {
    /// Set the cache capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the font URL prefix.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Identifies one in-flight font registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationTicket(pub u64);

/// What a [`FontRegistrar`] needs to load a font into the surface.
#[derive(Copy, Clone, Debug)]
pub struct RegistrationRequest<'a> {
    /// Ticket to report back on completion.
    pub ticket: RegistrationTicket,
    /// Family name the surface should register the face under.
    pub family: &'a str,
    /// CSS `src` descriptor, `url(<base><file>)`.
    pub source: &'a str,
    /// The font being registered.
    pub font: &'a LoadedFont,
}

/// Hands font files to the drawing surface.
///
/// Registration is asynchronous: implementations start the load and
/// later report the ticket back through
/// [`FontCache::complete_registration`].
pub trait FontRegistrar {
    /// Begin loading a font into the surface.
    fn register(&mut self, request: RegistrationRequest<'_>);
}

#[derive(Debug)]
struct CacheEntry {
    handle: FontHandle,
    last_used: u64,
}

/// Least-recently-used font cache with registration tracking.
///
/// The cache is keyed by [`FontKey`]; sizes are applied per call, so one
/// entry serves every size of a face.
pub struct FontCache {
    config: FontCacheConfig,
    locator: Box<dyn FontLocator>,
    loader: Box<dyn FontLoader>,
    entries: HashMap<FontKey, CacheEntry>,
    clock: u64,
    registered: HashSet<String>,
    pending: HashMap<RegistrationTicket, String>,
    next_ticket: u64,
}

impl fmt::Debug for FontCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontCache")
            .field("config", &self.config)
            .field("entries", &self.entries.len())
            .field("registered", &self.registered.len())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl FontCache {
    /// Create a cache with the default configuration.
    pub fn new(locator: Box<dyn FontLocator>, loader: Box<dyn FontLoader>) -> Self {
        Self::with_config(locator, loader, FontCacheConfig::default())
    }

    /// Create a cache with an explicit configuration.
    pub fn with_config(
        locator: Box<dyn FontLocator>,
        loader: Box<dyn FontLoader>,
        config: FontCacheConfig,
    ) -> Self {
        Self {
            config,
            locator,
            loader,
            entries: HashMap::new(),
            clock: 0,
            registered: HashSet::new(),
            pending: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &FontCacheConfig {
        &self.config
    }

    /// Number of cached fonts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a request to a font, consulting the cache first.
    pub fn resolve_font(&mut self, props: &FontProperties) -> Result<FontHandle, FontError> {
        self.clock += 1;
        let key = props.key();
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.last_used = self.clock;
            return Ok(entry.handle.clone());
        }

        let path = self
            .locator
            .find_font(props)
            .ok_or_else(|| FontError::FontNotFound {
                families: props.families().join(", "),
            })?;
        let face = self.loader.load(&path)?;
        let handle = Arc::new(LoadedFont::new(path, face));

        let capacity = self.config.capacity.max(1);
        while self.entries.len() >= capacity {
            let Some(oldest) = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.entries.insert(
            key,
            CacheEntry {
                handle: handle.clone(),
                last_used: self.clock,
            },
        );
        Ok(handle)
    }

    /// Measure plain text at `dpi`.
    ///
    /// Metrics are computed in 26.6 fixed point at the pixel size implied
    /// by `props.size_pt` and `dpi`, then divided down by 64.
    pub fn measure_text(
        &mut self,
        text: &str,
        props: &FontProperties,
        dpi: f64,
    ) -> Result<TextExtents, FontError> {
        let font = self.resolve_font(props)?;
        Ok(font
            .face()
            .layout_extents(text, props.size_px(dpi))
            .to_pixels())
    }

    /// Surface identity of a font: `url(<base_url><file_name>)`.
    pub fn source_url(&self, font: &LoadedFont) -> String {
        format!("url({}{})", self.config.base_url, font.file_name())
    }

    /// Make sure the surface has been asked to load `font`.
    ///
    /// Returns a ticket for the first request of a font file. Requests for a
    /// font that is already registered or in flight return `None` and do
    /// not reach the registrar.
    pub fn ensure_registered(
        &mut self,
        font: &LoadedFont,
        family: &str,
        registrar: &mut dyn FontRegistrar,
    ) -> Option<RegistrationTicket> {
        let source = self.source_url(font);
        if self.registered.contains(&source) {
            return None;
        }
        let ticket = RegistrationTicket(self.next_ticket);
        self.next_ticket += 1;
        log::debug!("registering font {family} from {source}");
        registrar.register(RegistrationRequest {
            ticket,
            family,
            source: &source,
            font,
        });
        self.registered.insert(source.clone());
        self.pending.insert(ticket, source);
        Some(ticket)
    }

    /// Record that the surface finished loading a font.
    ///
    /// Returns `true` when the ticket was pending, meaning a redraw is due.
    pub fn complete_registration(&mut self, ticket: RegistrationTicket) -> bool {
        match self.pending.remove(&ticket) {
            Some(source) => {
                log::debug!("font {source} is ready");
                true
            }
            None => false,
        }
    }

    /// Number of registrations still in flight.
    pub fn pending_registrations(&self) -> usize {
        self.pending.len()
    }

    /// True once a font has been handed to the surface.
    pub fn is_registered(&self, font: &LoadedFont) -> bool {
        self.registered.contains(&self.source_url(font))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::FixedExtents;
    use kurbo::BezPath;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Debug)]
    struct FixedFace;

    impl OutlineFont for FixedFace {
        fn family_name(&self) -> &str {
            "Fixed"
        }
        fn units_per_em(&self) -> f64 {
            1000.0
        }
        fn glyph_outline(&self, _ch: char) -> Option<BezPath> {
            None
        }
        fn layout_extents(&self, text: &str, size_px: f64) -> FixedExtents {
            // Every glyph is a half-em wide, 0.8 em tall with 0.2 em descent.
            #[allow(clippy::cast_possible_truncation, reason = "test metrics are small")]
            let em = (size_px * 64.0) as i64;
            let n = i64::try_from(text.chars().count()).unwrap();
            FixedExtents {
                width: n * em / 2,
                height: em,
                descent: em / 5,
            }
        }
    }

    struct CountingLocator(Rc<Cell<u32>>);

    impl FontLocator for CountingLocator {
        fn find_font(&self, props: &FontProperties) -> Option<PathBuf> {
            self.0.set(self.0.get() + 1);
            (props.primary_family() != "missing")
                .then(|| PathBuf::from(format!("/fonts/{}.ttf", props.primary_family())))
        }
    }

    struct FixedLoader;

    impl FontLoader for FixedLoader {
        fn load(&self, _path: &Path) -> Result<Arc<dyn OutlineFont>, FontError> {
            Ok(Arc::new(FixedFace))
        }
    }

    #[derive(Default)]
    struct Registrar(Vec<(RegistrationTicket, String, String)>);

    impl FontRegistrar for Registrar {
        fn register(&mut self, request: RegistrationRequest<'_>) {
            self.0.push((
                request.ticket,
                request.family.to_string(),
                request.source.to_string(),
            ));
        }
    }

    fn cache(capacity: usize) -> (FontCache, Rc<Cell<u32>>) {
        let lookups = Rc::new(Cell::new(0));
        let cache = FontCache::with_config(
            Box::new(CountingLocator(lookups.clone())),
            Box::new(FixedLoader),
            FontCacheConfig::default().with_capacity(capacity),
        );
        (cache, lookups)
    }

    #[test]
    fn repeated_requests_hit_the_cache_across_sizes() {
        let (mut fonts, lookups) = cache(50);
        let a = fonts.resolve_font(&FontProperties::new("a").with_size(8.0)).unwrap();
        let b = fonts.resolve_font(&FontProperties::new("a").with_size(30.0)).unwrap();
        assert!(Arc::ptr_eq(&a, &b), "size is not part of the key");
        assert_eq!(lookups.get(), 1);
        assert_eq!(a.file_name(), "a.ttf");
    }

    #[test]
    fn least_recently_used_entry_is_evicted() {
        let (mut fonts, lookups) = cache(2);
        fonts.resolve_font(&FontProperties::new("a")).unwrap();
        fonts.resolve_font(&FontProperties::new("b")).unwrap();
        fonts.resolve_font(&FontProperties::new("a")).unwrap();
        fonts.resolve_font(&FontProperties::new("c")).unwrap();
        assert_eq!(fonts.len(), 2);
        assert_eq!(lookups.get(), 3);

        // `a` was touched after `b`, so `b` went and `a` stayed.
        fonts.resolve_font(&FontProperties::new("a")).unwrap();
        assert_eq!(lookups.get(), 3);
        fonts.resolve_font(&FontProperties::new("b")).unwrap();
        assert_eq!(lookups.get(), 4);
    }

    #[test]
    fn discovery_miss_is_font_not_found() {
        let (mut fonts, _) = cache(50);
        let err = fonts.resolve_font(&FontProperties::new("missing")).unwrap_err();
        assert!(matches!(err, FontError::FontNotFound { ref families } if families == "missing"));
        assert!(fonts.is_empty());
    }

    #[test]
    fn measure_divides_fixed_point_down() {
        let (mut fonts, _) = cache(50);
        let props = FontProperties::new("a").with_size(10.0);
        let ext = fonts.measure_text("abcd", &props, 144.0).unwrap();
        // 10pt at 144 dpi is 20px.
        assert_eq!(ext.width, 40.0);
        assert_eq!(ext.height, 20.0);
        assert_eq!(ext.descent, 4.0);
    }

    #[test]
    fn duplicate_registration_requests_collapse() {
        let (mut fonts, _) = cache(50);
        let mut registrar = Registrar::default();
        let font = fonts.resolve_font(&FontProperties::new("a")).unwrap();

        let ticket = fonts
            .ensure_registered(&font, "Fixed", &mut registrar)
            .expect("first request registers");
        assert!(fonts.ensure_registered(&font, "Fixed", &mut registrar).is_none());
        assert_eq!(registrar.0.len(), 1, "exactly one registration reaches the surface");
        assert_eq!(registrar.0[0].2, "url(/fonts/a.ttf)");
        assert_eq!(fonts.pending_registrations(), 1);

        assert!(fonts.complete_registration(ticket), "first completion requests a redraw");
        assert!(!fonts.complete_registration(ticket));
        assert_eq!(fonts.pending_registrations(), 0);
        assert!(fonts.ensure_registered(&font, "Fixed", &mut registrar).is_none());
        assert!(fonts.is_registered(&font));
    }

    #[test]
    fn base_url_is_configurable() {
        let mut fonts = FontCache::with_config(
            Box::new(CountingLocator(Rc::new(Cell::new(0)))),
            Box::new(FixedLoader),
            FontCacheConfig::default().with_base_url("https://cdn.example/f/"),
        );
        let font = fonts.resolve_font(&FontProperties::new("b")).unwrap();
        assert_eq!(fonts.source_url(&font), "url(https://cdn.example/f/b.ttf)");
    }
}
