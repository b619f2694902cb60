// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wiring a canvas to the page.

use core::cell::RefCell;
use core::fmt;
use std::rc::{Rc, Weak};

use figdraw_canvas::{
    CanvasConfig, CanvasEvent, FigureCanvas, InputOutcome, KeyInput, NodeId, PointerInput,
    ScrollInput,
};
use figdraw_render::{Figure, RenderError};
use figdraw_text::FontCache;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, KeyboardEvent, MouseEvent, WheelEvent};

use crate::dom::DomSurfaceProvider;
use crate::fonts::WebFontRegistrar;
use crate::tasks::{Dispatch, WebTaskQueue};

type WebCanvasOf<F> = FigureCanvas<F, DomSurfaceProvider, WebTaskQueue>;
type Shared<F> = Rc<RefCell<WebCanvasOf<F>>>;
type EventSink = Rc<dyn Fn(&CanvasEvent)>;

/// Install the console logger and panic hook. Safe to call more than once.
pub fn init_logging(level: log::Level) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(level).is_err() {
        log::debug!("a logger is already installed");
    }
}

/// An event listener that is removed when dropped.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        kind: &'static str,
        callback: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(callback);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// A figure shown in the browser.
///
/// Owns the canvas and the DOM listeners that feed it. Normalized events
/// are handed to the sink given to [`open`](Self::open) after the canvas
/// has routed them to the toolbar.
pub struct WebFigure<F: Figure + 'static> {
    canvas: Shared<F>,
    sink: EventSink,
    listeners: RefCell<Vec<Listener>>,
}

impl<F: Figure + 'static> fmt::Debug for WebFigure<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebFigure")
            .field("canvas", &self.canvas)
            .field("listeners", &self.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

fn dispatcher<F: Figure + 'static>(canvas: Weak<RefCell<WebCanvasOf<F>>>) -> Dispatch {
    Rc::new(move |task| {
        let Some(canvas) = canvas.upgrade() else {
            return;
        };
        let Ok(mut canvas) = canvas.try_borrow_mut() else {
            log::warn!("canvas is busy, dropping {task:?}");
            return;
        };
        if let Err(err) = canvas.dispatch(task) {
            log::warn!("{task:?} failed: {err}");
        }
    })
}

impl<F: Figure + 'static> WebFigure<F> {
    /// Bind `figure` to the current document.
    ///
    /// Nothing is shown until [`show`](Self::show).
    pub fn open(
        figure: F,
        fonts: FontCache,
        config: CanvasConfig,
        sink: impl Fn(&CanvasEvent) + 'static,
    ) -> Result<Self, JsValue> {
        let provider = DomSurfaceProvider::new()?;
        let window = provider.window().clone();
        let document = provider.document().clone();
        let canvas = Rc::new_cyclic(|weak| {
            let dispatch = dispatcher(weak.clone());
            let registrar = WebFontRegistrar::new(document, dispatch.clone());
            RefCell::new(
                FigureCanvas::new(
                    figure,
                    provider,
                    WebTaskQueue::new(window, dispatch),
                    fonts,
                    None,
                    config,
                )
                .with_registrar(Box::new(registrar)),
            )
        });
        Ok(Self {
            canvas,
            sink: Rc::new(sink),
            listeners: RefCell::new(Vec::new()),
        })
    }

    /// The canvas. Do not hold the borrow across an `await` or an event.
    pub fn canvas(&self) -> &RefCell<WebCanvasOf<F>> {
        &self.canvas
    }

    /// Show the figure and start listening for input.
    pub fn show(&self) -> Result<(), JsValue> {
        self.canvas
            .borrow_mut()
            .show()
            .map_err(|err: RenderError| JsValue::from_str(&err.to_string()))?;
        if self.listeners.borrow().is_empty() {
            self.listen()?;
        }
        Ok(())
    }

    /// Stop listening and remove the figure from the page.
    pub fn close(&self) {
        self.listeners.borrow_mut().clear();
        self.canvas.borrow_mut().destroy();
    }

    fn element(&self, suffix: &str) -> Result<EventTarget, JsValue> {
        let canvas = self.canvas.borrow();
        canvas
            .element(suffix)
            .and_then(|node| canvas.provider().dom_element(node))
            .map(Into::into)
            .ok_or_else(|| JsValue::from_str("figure is not shown"))
    }

    fn listen(&self) -> Result<(), JsValue> {
        let root = self.element("")?;
        let overlay = self.element("rubberband")?;
        let mut listeners = Vec::new();

        listeners.push(Listener::attach(root, "contextmenu", |event| {
            event.prevent_default();
        })?);

        let mouse = |handler: fn(&mut WebCanvasOf<F>, PointerInput) -> InputOutcome| {
            self.route(move |canvas, event: Event| {
                let event = event.dyn_into::<MouseEvent>().ok()?;
                let input = PointerInput::new(
                    f64::from(event.offset_x()),
                    f64::from(event.offset_y()),
                    event.button(),
                );
                Some((handler(canvas, input), event.into()))
            })
        };
        let handlers: [(&'static str, fn(&mut WebCanvasOf<F>, PointerInput) -> InputOutcome); 3] = [
            ("mousemove", FigureCanvas::on_mouse_move),
            ("mousedown", FigureCanvas::on_mouse_down),
            ("mouseup", FigureCanvas::on_mouse_up),
        ];
        for (kind, handler) in handlers {
            listeners.push(Listener::attach(overlay.clone(), kind, mouse(handler))?);
        }

        listeners.push(Listener::attach(
            overlay.clone(),
            "wheel",
            self.route(|canvas, event: Event| {
                let event = event.dyn_into::<WheelEvent>().ok()?;
                let input = ScrollInput {
                    pointer: PointerInput::new(
                        f64::from(event.offset_x()),
                        f64::from(event.offset_y()),
                        event.button(),
                    ),
                    delta_x: event.delta_x(),
                };
                Some((canvas.on_scroll(input), event.into()))
            }),
        )?);

        listeners.push(Listener::attach(
            overlay.clone(),
            "mouseenter",
            self.route(|canvas, event: Event| Some((canvas.on_mouse_enter(), event))),
        )?);
        listeners.push(Listener::attach(
            overlay.clone(),
            "mouseleave",
            self.route(|canvas, event: Event| Some((canvas.on_mouse_leave(), event))),
        )?);

        let key = |handler: fn(&mut WebCanvasOf<F>, KeyInput) -> InputOutcome| {
            self.route(move |canvas, event: Event| {
                let event = event.dyn_into::<KeyboardEvent>().ok()?;
                let input = KeyInput {
                    which: event.which(),
                    shift: event.shift_key(),
                    ctrl: event.ctrl_key(),
                    alt: event.alt_key(),
                };
                Some((handler(canvas, input), event.into()))
            })
        };
        listeners.push(Listener::attach(
            overlay.clone(),
            "keydown",
            key(FigureCanvas::on_key_down),
        )?);
        listeners.push(Listener::attach(
            overlay,
            "keyup",
            key(FigureCanvas::on_key_up),
        )?);

        let buttons: Vec<NodeId> = self
            .canvas
            .borrow()
            .toolbar_buttons()
            .iter()
            .map(|(node, _)| *node)
            .collect();
        for node in buttons {
            let Some(button) = self.canvas.borrow().provider().dom_element(node) else {
                continue;
            };
            let canvas = Rc::downgrade(&self.canvas);
            listeners.push(Listener::attach(button.into(), "click", move |_| {
                let Some(canvas) = canvas.upgrade() else {
                    return;
                };
                let result = canvas.borrow_mut().on_toolbar_click(node);
                if let Err(err) = result {
                    log::warn!("toolbar action failed: {err}");
                }
            })?);
        }

        *self.listeners.borrow_mut() = listeners;
        Ok(())
    }

    /// Build a listener that feeds one DOM event through `handle`, applies
    /// the outcome to the DOM event and forwards the normalized event to the
    /// sink.
    fn route(
        &self,
        handle: impl Fn(&mut WebCanvasOf<F>, Event) -> Option<(InputOutcome, Event)> + 'static,
    ) -> impl FnMut(Event) + 'static {
        let canvas = Rc::downgrade(&self.canvas);
        let sink = self.sink.clone();
        move |event| {
            let Some(canvas) = canvas.upgrade() else {
                return;
            };
            let handled = {
                let Ok(mut canvas) = canvas.try_borrow_mut() else {
                    return;
                };
                handle(&mut canvas, event)
            };
            let Some((outcome, event)) = handled else {
                return;
            };
            if outcome.prevent_default {
                event.prevent_default();
                event.stop_propagation();
            }
            sink(&outcome.event);
        }
    }
}

impl<F: Figure + 'static> Drop for WebFigure<F> {
    fn drop(&mut self) {
        self.listeners.get_mut().clear();
    }
}
