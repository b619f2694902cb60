// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The interactive figure surface.
//!
//! A shown canvas is this element tree, with ids derived from the canvas id:
//!
//! ```text
//! div#<id>                 root, logical width
//!   div#<id>top            title
//!   div                    position: relative
//!     canvas#<id>canvas    content layer
//!     canvas#<id>rubberband overlay layer, focusable, stacked on top
//!   div
//!     span                 toolbar
//!     div#<id>message      status line
//! ```
//!
//! Both layers have a backing store of `logical size × ratio` pixels, where
//! the ratio comes from [`resolve_dpr`]. Frames are drawn with the figure's
//! resolution scaled by the same ratio, so lines and text stay sharp on
//! high-density displays.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use figdraw_render::{Figure, NavigationRequest, RenderError, Renderer};
use figdraw_text::{FontCache, FontRegistrar, MathTextEngine};
use hashbrown::HashMap;
use kurbo::{Point, Size};

use crate::config::CanvasConfig;
use crate::error::ExportError;
use crate::export::ExportFormat;
use crate::input::{
    convert_pointer, key_name, CanvasEvent, Cursor, InputOutcome, KeyInput, PointerInput,
    ScrollInput,
};
use crate::provider::{resolve_dpr, Element, ElementKind, NodeId, Parent, SurfaceProvider};
use crate::tasks::{ManualTaskQueue, Task, TaskQueue};
use crate::timer::{Timer, TimerId};
use crate::toolbar::{toolbar_layout, NavEffect, NavMode, Navigation, ToolbarCommand, ToolbarEntry};

/// Class shared by all toolbar buttons.
pub const TOOLBAR_BUTTON_CLASS: &str = "figdraw-toolbar-button";

/// Class of the text (format) toolbar buttons.
pub const TOOLBAR_TEXT_CLASS: &str = "figdraw-toolbar-text";

const STYLE_SHEET: &str = "
button.figdraw-toolbar-button {
    font-size: 14px;
    color: #495057;
    text-transform: uppercase;
    background: #e9ecef;
    padding: 9px 18px;
    border: 1px solid #fff;
    border-radius: 4px;
    transition-duration: 0.4s;
}

button.figdraw-toolbar-button.figdraw-toolbar-text {
    font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto,
        Oxygen, Ubuntu, Cantarell, \"Fira Sans\", \"Droid Sans\",
        \"Helvetica Neue\", Arial, sans-serif;
}

button.figdraw-toolbar-button:hover {
    color: #fff;
    background: #495057;
}
";

static NEXT_SURFACE: AtomicU64 = AtomicU64::new(1);

/// A timer callback. Returning `true` requests a redraw.
pub type TimerCallback<F> = Box<dyn FnMut(&mut F) -> bool>;

struct TimerSlot<F> {
    timer: Timer,
    callbacks: Vec<TimerCallback<F>>,
}

/// A figure bound to a host surface.
///
/// The canvas owns the figure, the host capabilities and the font cache.
/// Nothing is created in the host until [`show`](Self::show), apart from
/// the shared style sheet.
pub struct FigureCanvas<F, P, Q> {
    pub(crate) figure: F,
    pub(crate) provider: P,
    queue: Q,
    pub(crate) fonts: FontCache,
    pub(crate) math: Option<Box<dyn MathTextEngine>>,
    registrar: Option<Box<dyn FontRegistrar>>,
    pub(crate) config: CanvasConfig,
    id: String,
    title: String,
    ratio: f64,
    idle_scheduled: bool,
    navigation: Navigation,
    toolbar: Vec<(NodeId, ToolbarCommand)>,
    timers: HashMap<TimerId, TimerSlot<F>>,
    next_timer: u64,
}

impl<F, P, Q> fmt::Debug for FigureCanvas<F, P, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FigureCanvas")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("ratio", &self.ratio)
            .field("idle_scheduled", &self.idle_scheduled)
            .field("fonts", &self.fonts)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<F: Figure, P: SurfaceProvider, Q: TaskQueue> FigureCanvas<F, P, Q> {
    /// Bind `figure` to a host.
    ///
    /// Injects the toolbar style sheet unless an element with the
    /// configured style id already exists.
    pub fn new(
        figure: F,
        mut provider: P,
        queue: Q,
        fonts: FontCache,
        math: Option<Box<dyn MathTextEngine>>,
        config: CanvasConfig,
    ) -> Self {
        if provider.lookup(&config.style_element_id).is_none() {
            provider.create_element(
                Parent::Head,
                Element::new(ElementKind::Style)
                    .with_id(config.style_element_id.clone())
                    .with_text(STYLE_SHEET),
            );
        }
        let id = format!(
            "{}{:x}",
            config.id_prefix,
            NEXT_SURFACE.fetch_add(1, Ordering::Relaxed)
        );
        Self {
            figure,
            provider,
            queue,
            fonts,
            math,
            registrar: None,
            config,
            id,
            title: String::new(),
            ratio: 1.0,
            idle_scheduled: false,
            navigation: Navigation::default(),
            toolbar: Vec::new(),
            timers: HashMap::new(),
            next_timer: 0,
        }
    }

    /// Hand fonts used by plain text to `registrar` before first use.
    pub fn with_registrar(mut self, registrar: Box<dyn FontRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Use `id` for the root element instead of a generated one.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Root element id; other elements append a suffix to it.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The figure.
    pub fn figure(&self) -> &F {
        &self.figure
    }

    /// The figure, mutably. Call [`draw_idle`](Self::draw_idle) after
    /// changing it.
    pub fn figure_mut(&mut self) -> &mut F {
        &mut self.figure
    }

    /// The host document.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The host document, mutably.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// The host task queue.
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// The host task queue, mutably.
    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    /// The font cache.
    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Physical pixels per logical pixel, fixed when the surface is shown.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    /// True while an idle redraw is pending or a frame is being drawn.
    pub fn is_idle_scheduled(&self) -> bool {
        self.idle_scheduled
    }

    /// Active navigation mode.
    pub fn nav_mode(&self) -> NavMode {
        self.navigation.mode()
    }

    /// Toolbar buttons created by [`show`](Self::show) and their commands.
    pub fn toolbar_buttons(&self) -> &[(NodeId, ToolbarCommand)] {
        &self.toolbar
    }

    /// Look up one of this canvas's elements by id suffix (`""`, `"top"`,
    /// `"canvas"`, `"rubberband"` or `"message"`).
    pub fn element(&self, suffix: &str) -> Option<NodeId> {
        self.provider.lookup(&format!("{}{suffix}", self.id))
    }

    /// Create the surface and draw the first frame.
    ///
    /// If the surface already exists it is reused: a redraw is scheduled
    /// and it is scrolled into view.
    pub fn show(&mut self) -> Result<(), RenderError> {
        if let Some(root) = self.element("") {
            self.draw_idle();
            self.provider.scroll_into_view(root);
            return Ok(());
        }

        self.ratio = resolve_dpr(&self.provider.pixel_ratio_probe());
        let logical = self.figure.width_height();
        let (width, height) = self.device_size();
        log::debug!(
            "creating surface {} at {}x{} (ratio {})",
            self.id,
            width,
            height,
            self.ratio
        );

        let root = self.provider.create_element(
            Parent::Body,
            Element::new(ElementKind::Container)
                .with_id(self.id.clone())
                .with_style(root_style(logical)),
        );
        self.provider.create_element(
            Parent::Node(root),
            Element::new(ElementKind::Container)
                .with_id(format!("{}top", self.id))
                .with_style("font-weight: bold; text-align: center")
                .with_text(self.title.clone()),
        );

        let stack = self.provider.create_element(
            Parent::Node(root),
            Element::new(ElementKind::Container).with_style("position: relative"),
        );
        self.provider.create_element(
            Parent::Node(stack),
            Element::layer(width, height)
                .with_id(format!("{}canvas", self.id))
                .with_style(content_style(logical)),
        );
        let overlay = self.provider.create_element(
            Parent::Node(stack),
            Element::layer(width, height)
                .with_id(format!("{}rubberband", self.id))
                .with_style(overlay_style(logical))
                .with_attribute("tabindex", "0"),
        );
        self.configure_overlay(overlay);

        let bottom = self.provider.create_element(
            Parent::Node(root),
            Element::new(ElementKind::Container),
        );
        self.build_toolbar(bottom);
        self.provider.create_element(
            Parent::Node(bottom),
            Element::new(ElementKind::Container)
                .with_id(format!("{}message", self.id))
                .with_style("min-height: 1.5em"),
        );

        self.draw()
    }

    /// Remove the surface from the host. Does nothing if it is not shown.
    pub fn destroy(&mut self) {
        let Some(root) = self.element("") else {
            log::debug!("surface {} is already gone", self.id);
            return;
        };
        self.provider.remove(root);
        self.toolbar.clear();
    }

    /// Draw a frame now.
    ///
    /// The figure's resolution is scaled by the pixel ratio for the frame
    /// and restored afterwards, whether or not drawing succeeds. Without a
    /// content layer this does nothing. A failure is reported as
    /// [`RenderError::RenderFailed`]; what was drawn before it stays on the
    /// surface.
    pub fn draw(&mut self) -> Result<(), RenderError> {
        let pending = self.idle_scheduled;
        self.idle_scheduled = true;
        let original_dpi = self.figure.dpi();
        if self.ratio != 1.0 {
            self.figure.set_dpi(original_dpi * self.ratio);
        }
        let result = self.render_content();
        self.figure.set_dpi(original_dpi);
        self.idle_scheduled = pending;
        result
    }

    fn render_content(&mut self) -> Result<(), RenderError> {
        let Some(node) = self.element("canvas") else {
            return Ok(());
        };
        let dpi = self.figure.dpi();
        let Some(canvas) = self.provider.canvas(node) else {
            log::warn!("content layer of {} has no drawing surface", self.id);
            return Ok(());
        };
        let mut renderer = Renderer::new(canvas, &mut self.fonts, dpi);
        if let Some(math) = self.math.as_deref() {
            renderer = renderer.with_math(math);
        }
        if let Some(registrar) = self.registrar.as_deref_mut() {
            renderer = renderer.with_registrar(registrar);
        }
        renderer.begin_frame();
        let result = self.figure.draw(&mut renderer);
        renderer.end_frame(result)
    }

    /// Request a redraw on the next turn of the event loop.
    ///
    /// Requests made while one is pending are merged into it.
    pub fn draw_idle(&mut self) {
        if self.idle_scheduled {
            return;
        }
        self.idle_scheduled = true;
        log::debug!("scheduling idle redraw of {}", self.id);
        self.queue
            .set_timeout(Task::IdleRedraw, self.config.idle_delay_ms);
    }

    /// Run a task delivered by the host's queue.
    pub fn dispatch(&mut self, task: Task) -> Result<(), RenderError> {
        match task {
            Task::IdleRedraw => {
                self.idle_scheduled = false;
                self.draw()
            }
            Task::Timer(id) => {
                let Some(slot) = self.timers.get_mut(&id) else {
                    return Ok(());
                };
                slot.timer.fired();
                let mut redraw = false;
                for callback in &mut slot.callbacks {
                    redraw |= callback(&mut self.figure);
                }
                if redraw {
                    self.draw_idle();
                }
                Ok(())
            }
            Task::FontLoaded(ticket) => {
                if self.fonts.complete_registration(ticket) {
                    self.draw_idle();
                }
                Ok(())
            }
        }
    }

    /// Set the title shown above the figure.
    pub fn set_window_title(&mut self, title: &str) {
        self.title = title.to_string();
        if let Some(top) = self.element("top") {
            self.provider.set_text(top, title);
        }
    }

    /// The title shown above the figure.
    pub fn window_title(&self) -> String {
        self.element("top")
            .and_then(|top| self.provider.text(top))
            .unwrap_or_else(|| self.title.clone())
    }

    /// Show `message` in the status line.
    pub fn set_message(&mut self, message: &str) {
        if let Some(node) = self.element("message") {
            self.provider.set_text(node, message);
        }
    }

    /// Set the cursor shown over the figure.
    pub fn set_cursor(&mut self, cursor: Cursor) {
        if let Some(node) = self.element("rubberband") {
            self.provider.set_cursor(node, cursor.as_css());
        }
    }

    /// Resize the figure to `width` × `height` logical pixels.
    ///
    /// The layers are reallocated and a redraw is scheduled.
    pub fn resize(&mut self, width: f64, height: f64) {
        let dpi = self.figure.dpi();
        self.figure
            .set_size_inches(Size::new(width / dpi, height / dpi));
        let logical = self.figure.width_height();
        let (device_width, device_height) = self.device_size();
        if let Some(root) = self.element("") {
            self.provider.set_style(root, &root_style(logical));
        }
        if let Some(content) = self.element("canvas") {
            self.provider
                .resize_layer(content, device_width, device_height);
            self.provider.set_style(content, &content_style(logical));
        }
        if let Some(overlay) = self.element("rubberband") {
            self.provider
                .resize_layer(overlay, device_width, device_height);
            self.provider.set_style(overlay, &overlay_style(logical));
            self.configure_overlay(overlay);
        }
        self.draw_idle();
    }

    /// Create a stopped timer.
    pub fn new_timer(&mut self, interval_ms: u32, single_shot: bool) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        self.timers.insert(
            id,
            TimerSlot {
                timer: Timer::new(id, interval_ms, single_shot),
                callbacks: Vec::new(),
            },
        );
        id
    }

    /// Run `callback` on every tick of timer `id`. Returns `false` for an
    /// unknown timer.
    pub fn add_timer_callback(
        &mut self,
        id: TimerId,
        callback: impl FnMut(&mut F) -> bool + 'static,
    ) -> bool {
        match self.timers.get_mut(&id) {
            Some(slot) => {
                slot.callbacks.push(Box::new(callback));
                true
            }
            None => false,
        }
    }

    /// Timer `id`.
    pub fn timer(&self, id: TimerId) -> Option<&Timer> {
        self.timers.get(&id).map(|slot| &slot.timer)
    }

    /// Start timer `id`, restarting it if running.
    pub fn start_timer(&mut self, id: TimerId) {
        if let Some(slot) = self.timers.get_mut(&id) {
            slot.timer.start(&mut self.queue);
        }
    }

    /// Stop timer `id`.
    pub fn stop_timer(&mut self, id: TimerId) {
        if let Some(slot) = self.timers.get_mut(&id) {
            slot.timer.stop(&mut self.queue);
        }
    }

    /// Change the interval of timer `id`.
    pub fn set_timer_interval(&mut self, id: TimerId, interval_ms: u32) {
        if let Some(slot) = self.timers.get_mut(&id) {
            slot.timer.set_interval(interval_ms, &mut self.queue);
        }
    }

    /// Stop and drop timer `id`.
    pub fn remove_timer(&mut self, id: TimerId) {
        if let Some(mut slot) = self.timers.remove(&id) {
            slot.timer.stop(&mut self.queue);
        }
    }

    /// Pointer moved over the figure.
    pub fn on_mouse_move(&mut self, input: PointerInput) -> InputOutcome {
        let (position, _, prevent_default) = self.pointer_event(&input);
        self.route(CanvasEvent::Motion { position }, prevent_default)
    }

    /// Button pressed over the figure.
    pub fn on_mouse_down(&mut self, input: PointerInput) -> InputOutcome {
        let (position, button, prevent_default) = self.pointer_event(&input);
        self.route(CanvasEvent::ButtonPress { position, button }, prevent_default)
    }

    /// Button released over the figure.
    pub fn on_mouse_up(&mut self, input: PointerInput) -> InputOutcome {
        let (position, button, prevent_default) = self.pointer_event(&input);
        self.route(CanvasEvent::ButtonRelease { position, button }, prevent_default)
    }

    /// Wheel turned over the figure.
    pub fn on_scroll(&mut self, input: ScrollInput) -> InputOutcome {
        let (position, _, prevent_default) = self.pointer_event(&input.pointer);
        self.route(
            CanvasEvent::Scroll {
                position,
                step: input.delta_x,
            },
            prevent_default,
        )
    }

    /// Pointer entered the figure; the overlay takes keyboard focus.
    pub fn on_mouse_enter(&mut self) -> InputOutcome {
        if let Some(overlay) = self.element("rubberband") {
            self.provider.focus(overlay);
        }
        self.route(CanvasEvent::Enter, false)
    }

    /// Pointer left the figure; the overlay gives up keyboard focus.
    pub fn on_mouse_leave(&mut self) -> InputOutcome {
        if let Some(overlay) = self.element("rubberband") {
            self.provider.blur(overlay);
        }
        self.route(CanvasEvent::Leave, false)
    }

    /// Key pressed while the figure has focus.
    pub fn on_key_down(&mut self, input: KeyInput) -> InputOutcome {
        let key = key_name(&input);
        self.route(CanvasEvent::KeyPress { key }, false)
    }

    /// Key released while the figure has focus.
    pub fn on_key_up(&mut self, input: KeyInput) -> InputOutcome {
        let key = key_name(&input);
        self.route(CanvasEvent::KeyRelease { key }, false)
    }

    /// Outline the rectangle between two display points on the overlay.
    ///
    /// Corners snap to pixel centers so the one-pixel dash stays crisp.
    pub fn draw_rubberband(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let Some(overlay) = self.element("rubberband") else {
            return;
        };
        let size = self.figure.width_height();
        let snap = |v: f64| v.floor() + 0.5;
        let (mut x0, mut x1) = (snap(x0), snap(x1));
        let (mut y0, mut y1) = (snap(size.height - y0), snap(size.height - y1));
        if x1 < x0 {
            core::mem::swap(&mut x0, &mut x1);
        }
        if y1 < y0 {
            core::mem::swap(&mut y0, &mut y1);
        }
        let ratio = self.ratio;
        let Some(canvas) = self.provider.canvas(overlay) else {
            return;
        };
        canvas.clear_rect(0.0, 0.0, size.width * ratio, size.height * ratio);
        canvas.stroke_rect(
            x0 * ratio,
            y0 * ratio,
            (x1 - x0) * ratio,
            (y1 - y0) * ratio,
        );
    }

    /// Clear the overlay.
    pub fn remove_rubberband(&mut self) {
        let Some(overlay) = self.element("rubberband") else {
            return;
        };
        let size = self.figure.width_height();
        let ratio = self.ratio;
        if let Some(canvas) = self.provider.canvas(overlay) {
            canvas.clear_rect(0.0, 0.0, size.width * ratio, size.height * ratio);
        }
    }

    /// Run a toolbar command.
    pub fn activate(&mut self, command: ToolbarCommand) -> Result<(), ExportError> {
        match command {
            ToolbarCommand::Home => self.navigate(&NavigationRequest::Home),
            ToolbarCommand::Back => self.navigate(&NavigationRequest::Back),
            ToolbarCommand::Forward => self.navigate(&NavigationRequest::Forward),
            ToolbarCommand::ConfigureSubplots => {
                self.navigate(&NavigationRequest::ConfigureSubplots);
            }
            ToolbarCommand::Pan => self.toggle_mode(NavMode::Pan),
            ToolbarCommand::Zoom => self.toggle_mode(NavMode::Zoom),
            ToolbarCommand::SaveFigure => {
                return self.download(ExportFormat::Png);
            }
            ToolbarCommand::Download(format) => return self.download(format),
        }
        Ok(())
    }

    /// Run the command bound to a clicked toolbar button. Returns `false`
    /// when `node` is not one of this canvas's buttons.
    pub fn on_toolbar_click(&mut self, node: NodeId) -> Result<bool, ExportError> {
        let Some(&(_, command)) = self.toolbar.iter().find(|(n, _)| *n == node) else {
            return Ok(false);
        };
        self.activate(command)?;
        Ok(true)
    }

    fn navigate(&mut self, request: &NavigationRequest) {
        if self.figure.navigate(request) {
            self.draw_idle();
        }
    }

    fn toggle_mode(&mut self, mode: NavMode) {
        let mode = self.navigation.toggle(mode);
        self.remove_rubberband();
        self.set_message(mode.message());
        self.set_cursor(mode.cursor());
    }

    fn route(&mut self, event: CanvasEvent, prevent_default: bool) -> InputOutcome {
        match self.navigation.handle(&event) {
            Some(NavEffect::DrawRubberband { from, to }) => {
                self.draw_rubberband(from.x, from.y, to.x, to.y);
            }
            Some(NavEffect::ClearRubberband) => self.remove_rubberband(),
            Some(NavEffect::Navigate {
                request,
                clear_rubberband,
            }) => {
                if clear_rubberband {
                    self.remove_rubberband();
                }
                self.navigate(&request);
            }
            None => {}
        }
        InputOutcome {
            event,
            prevent_default,
        }
    }

    fn pointer_event(&self, input: &PointerInput) -> (Point, i32, bool) {
        convert_pointer(input, self.figure.width_height().height)
    }

    fn configure_overlay(&mut self, overlay: NodeId) {
        let dash = self.config.rubberband_dash.clone();
        if let Some(canvas) = self.provider.canvas(overlay) {
            canvas.set_stroke_style("#000000");
            canvas.set_line_dash(&dash);
        }
    }

    fn build_toolbar(&mut self, parent: NodeId) {
        let bar = self
            .provider
            .create_element(Parent::Node(parent), Element::new(ElementKind::Span));
        self.toolbar.clear();
        for entry in toolbar_layout() {
            match entry {
                ToolbarEntry::Button {
                    command,
                    icon_class,
                    tooltip,
                } => {
                    let button = self.provider.create_element(
                        Parent::Node(bar),
                        Element::new(ElementKind::Button)
                            .with_class("fa")
                            .with_class(icon_class)
                            .with_class(TOOLBAR_BUTTON_CLASS)
                            .with_attribute("title", tooltip),
                    );
                    self.toolbar.push((button, command));
                }
                ToolbarEntry::Spacer => {
                    self.provider.create_element(
                        Parent::Node(bar),
                        Element::new(ElementKind::Span)
                            .with_style("min-width: 16px")
                            .with_text("\u{a0}"),
                    );
                }
                ToolbarEntry::Format(format) => {
                    let button = self.provider.create_element(
                        Parent::Node(bar),
                        Element::new(ElementKind::Button)
                            .with_class("fa")
                            .with_class(TOOLBAR_BUTTON_CLASS)
                            .with_class(TOOLBAR_TEXT_CLASS)
                            .with_text(format.extension()),
                    );
                    self.toolbar
                        .push((button, ToolbarCommand::Download(format)));
                }
            }
        }
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "layer sizes are rounded, non-negative and far below u32::MAX"
    )]
    fn device_size(&self) -> (u32, u32) {
        let logical = self.figure.width_height();
        let px = |v: f64| (v * self.ratio).round().max(0.0) as u32;
        (px(logical.width), px(logical.height))
    }
}

impl<F: Figure, P: SurfaceProvider> FigureCanvas<F, P, ManualTaskQueue> {
    /// Advance the virtual clock by `ms` and dispatch every task that comes
    /// due. Returns the number of tasks run.
    ///
    /// Every due task is dispatched even if an earlier one fails; the first
    /// failure is returned afterwards.
    pub fn run_for(&mut self, ms: u64) -> Result<usize, RenderError> {
        let tasks = self.queue.advance(ms);
        let mut first_error = None;
        for task in &tasks {
            if let Err(err) = self.dispatch(*task) {
                log::warn!("{task:?} failed: {err}");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(tasks.len()),
        }
    }
}

fn root_style(logical: Size) -> String {
    format!(
        "margin: 0 auto; text-align: center;width: {}px",
        logical.width
    )
}

fn content_style(logical: Size) -> String {
    format!(
        "left: 0; top: 0; z-index: 0; outline: 0;width: {}px; height: {}px",
        logical.width, logical.height
    )
}

fn overlay_style(logical: Size) -> String {
    format!(
        "position: absolute; left: 0; top: 0; z-index: 0; outline: 0; width: {}px; height: {}px",
        logical.width, logical.height
    )
}
