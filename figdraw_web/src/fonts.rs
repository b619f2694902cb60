// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading figure fonts into the document.

use core::fmt;

use figdraw_canvas::Task;
use figdraw_text::{FontRegistrar, RegistrationRequest, RegistrationTicket};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, FontFace};

use crate::tasks::Dispatch;

/// A [`FontRegistrar`] that adds a `FontFace` to `document.fonts`.
///
/// Once the face has loaded, [`Task::FontLoaded`] is dispatched with the
/// request's ticket so the canvas can redraw with the real glyphs.
pub struct WebFontRegistrar {
    document: Document,
    dispatch: Dispatch,
}

impl fmt::Debug for WebFontRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebFontRegistrar").finish_non_exhaustive()
    }
}

impl WebFontRegistrar {
    /// Register faces in `document`, reporting completion to `dispatch`.
    pub fn new(document: Document, dispatch: Dispatch) -> Self {
        Self { document, dispatch }
    }

    fn start(&self, family: &str, source: &str, ticket: RegistrationTicket) -> Result<(), JsValue> {
        let face = FontFace::new_with_str(family, source)?;
        self.document.fonts().add(&face)?;
        let loading = JsFuture::from(face.load()?);
        let dispatch = self.dispatch.clone();
        let family = family.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match loading.await {
                Ok(_) => dispatch(Task::FontLoaded(ticket)),
                Err(err) => log::warn!("font {family} failed to load: {err:?}"),
            }
        });
        Ok(())
    }
}

impl FontRegistrar for WebFontRegistrar {
    fn register(&mut self, request: RegistrationRequest<'_>) {
        if let Err(err) = self.start(request.family, request.source, request.ticket) {
            log::warn!(
                "could not register font {} from {}: {err:?}",
                request.family,
                request.source
            );
        }
    }
}
