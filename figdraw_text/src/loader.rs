// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hashbrown::HashMap;

use crate::outline::{OutlineFont, SkrifaFont};
use crate::props::{FontProperties, FontStyle};
use crate::FontError;

/// Font discovery: map a request to a font file.
pub trait FontLocator {
    /// Best matching font file, or `None` when nothing matches.
    fn find_font(&self, props: &FontProperties) -> Option<PathBuf>;
}

/// Font decoding: turn a font file into an [`OutlineFont`].
pub trait FontLoader {
    /// Decode the font at `path`.
    fn load(&self, path: &Path) -> Result<Arc<dyn OutlineFont>, FontError>;
}

/// Loads font files from the local file system with [`SkrifaFont`].
#[derive(Copy, Clone, Debug, Default)]
pub struct FileFontLoader;

impl FontLoader for FileFontLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn OutlineFont>, FontError> {
        let data = fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = SkrifaFont::from_bytes(data).map_err(|err| match err {
            FontError::Decode { message, .. } => FontError::Decode {
                name: path.display().to_string(),
                message,
            },
            other => other,
        })?;
        Ok(Arc::new(font))
    }
}

#[derive(Clone, Debug)]
struct IndexedFace {
    path: PathBuf,
    family: String,
    style: FontStyle,
    weight: u16,
}

/// A [`FontLocator`] over font files found in a set of directories.
///
/// Directories are scanned once at construction. Generic families
/// (`sans-serif`, `serif`, `monospace`, ...) resolve through a configurable
/// alias table before matching face family names case-insensitively.
/// Among faces of the matched family, the closest style and weight wins.
#[derive(Clone, Debug, Default)]
pub struct DirectoryFontLocator {
    faces: Vec<IndexedFace>,
    aliases: HashMap<String, Vec<String>>,
}

impl DirectoryFontLocator {
    /// Scan `dirs` recursively for `.ttf` and `.otf` files.
    ///
    /// Files that fail to decode are skipped and logged at `debug`.
    pub fn scan<I, P>(dirs: I) -> io::Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut locator = Self::default().with_default_aliases();
        for dir in dirs {
            locator.scan_dir(dir.as_ref())?;
        }
        log::debug!("indexed {} font faces", locator.faces.len());
        Ok(locator)
    }

    /// Add one decoded face to the index.
    pub fn add_face(&mut self, path: impl Into<PathBuf>, font: &dyn OutlineFont) {
        self.faces.push(IndexedFace {
            path: path.into(),
            family: font.family_name().to_string(),
            style: font.style(),
            weight: font.weight().0,
        });
    }

    /// Map a generic family to concrete families, in preference order.
    pub fn with_alias(mut self, generic: &str, families: &[&str]) -> Self {
        self.aliases.insert(
            generic.to_ascii_lowercase(),
            families.iter().map(|f| (*f).to_string()).collect(),
        );
        self
    }

    /// The stock aliases for the CSS generic families.
    pub fn with_default_aliases(self) -> Self {
        self.with_alias("sans-serif", &["DejaVu Sans", "Bitstream Vera Sans", "Arial"])
            .with_alias("sans", &["DejaVu Sans", "Bitstream Vera Sans", "Arial"])
            .with_alias("serif", &["DejaVu Serif", "Bitstream Vera Serif", "Times New Roman"])
            .with_alias("monospace", &["DejaVu Sans Mono", "Bitstream Vera Sans Mono", "Courier New"])
            .with_alias("cursive", &["Comic Neue", "Comic Sans MS"])
            .with_alias("fantasy", &["xkcd", "Impact"])
    }

    /// Number of indexed faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// True when no faces were indexed.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn scan_dir(&mut self, dir: &Path) -> io::Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                self.scan_dir(&path)?;
                continue;
            }
            let is_font = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"));
            if !is_font {
                continue;
            }
            match FileFontLoader.load(&path) {
                Ok(font) => self.add_face(path, font.as_ref()),
                Err(err) => log::debug!("skipping font {}: {err}", path.display()),
            }
        }
        Ok(())
    }

    fn candidates<'a>(&'a self, family: &'a str) -> Vec<&'a str> {
        match self.aliases.get(&family.to_ascii_lowercase()) {
            Some(list) => list.iter().map(String::as_str).collect(),
            None => vec![family],
        }
    }
}

fn match_score(face: &IndexedFace, props: &FontProperties) -> u32 {
    let style_penalty = if face.style == props.style { 0 } else { 1000 };
    style_penalty + u32::from(face.weight.abs_diff(props.weight.0))
}

impl FontLocator for DirectoryFontLocator {
    fn find_font(&self, props: &FontProperties) -> Option<PathBuf> {
        for requested in props.families() {
            for family in self.candidates(requested) {
                let best = self
                    .faces
                    .iter()
                    .filter(|f| f.family.eq_ignore_ascii_case(family))
                    .min_by_key(|f| match_score(f, props));
                if let Some(face) = best {
                    return Some(face.path.clone());
                }
            }
        }
        None
    }
}
