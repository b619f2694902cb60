// Copyright 2025 the Figdraw Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation toolbar.
//!
//! The toolbar is a fixed list of [`ToolItem`]s. Items whose icon has a
//! known CSS class become buttons, everything else becomes a spacer, and one
//! text button per [`ExportFormat`] follows.
//!
//! Pan and zoom are modes: while one is active, drags over the figure turn
//! into [`NavigationRequest`]s for the figure, and a zoom drag shows the
//! rubberband.

use figdraw_render::NavigationRequest;
use kurbo::{Point, Rect, Vec2};

use crate::export::ExportFormat;
use crate::input::{CanvasEvent, Cursor};

/// Something a toolbar button does.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToolbarCommand {
    /// Reset to the initial view.
    Home,
    /// Previous view.
    Back,
    /// Next view.
    Forward,
    /// Toggle pan mode.
    Pan,
    /// Toggle zoom mode.
    Zoom,
    /// Open subplot spacing controls.
    ConfigureSubplots,
    /// Save the figure as PNG.
    SaveFigure,
    /// Download the figure in a format.
    Download(ExportFormat),
}

/// One entry of the tool list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ToolItem {
    /// Label.
    pub text: &'static str,
    /// Tooltip.
    pub tooltip: &'static str,
    /// Icon identifier.
    pub icon: Option<&'static str>,
    /// Bound command; `None` for separators.
    pub command: Option<ToolbarCommand>,
}

const fn separator() -> ToolItem {
    ToolItem {
        text: "",
        tooltip: "",
        icon: None,
        command: None,
    }
}

/// The tool list, in display order.
pub const TOOL_ITEMS: [ToolItem; 9] = [
    ToolItem {
        text: "Home",
        tooltip: "Reset original view",
        icon: Some("home"),
        command: Some(ToolbarCommand::Home),
    },
    ToolItem {
        text: "Back",
        tooltip: "Back to previous view",
        icon: Some("back"),
        command: Some(ToolbarCommand::Back),
    },
    ToolItem {
        text: "Forward",
        tooltip: "Forward to next view",
        icon: Some("forward"),
        command: Some(ToolbarCommand::Forward),
    },
    separator(),
    ToolItem {
        text: "Pan",
        tooltip: "Left button pans, Right button zooms",
        icon: Some("move"),
        command: Some(ToolbarCommand::Pan),
    },
    ToolItem {
        text: "Zoom",
        tooltip: "Zoom to rectangle",
        icon: Some("zoom_to_rect"),
        command: Some(ToolbarCommand::Zoom),
    },
    ToolItem {
        text: "Subplots",
        tooltip: "Configure subplots",
        icon: Some("subplots"),
        command: Some(ToolbarCommand::ConfigureSubplots),
    },
    separator(),
    ToolItem {
        text: "Save",
        tooltip: "Save the figure",
        icon: Some("filesave"),
        command: Some(ToolbarCommand::SaveFigure),
    },
];

/// Icon font class for an icon identifier.
pub fn icon_class(icon: &str) -> Option<&'static str> {
    Some(match icon {
        "home" => "fa-home",
        "back" => "fa-arrow-left",
        "forward" => "fa-arrow-right",
        "zoom_to_rect" => "fa-search-plus",
        "move" => "fa-arrows",
        "download" => "fa-download",
        _ => return None,
    })
}

/// A laid-out toolbar element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToolbarEntry {
    /// Icon button.
    Button {
        /// Command run on click.
        command: ToolbarCommand,
        /// Icon font class.
        icon_class: &'static str,
        /// Tooltip.
        tooltip: &'static str,
    },
    /// Fixed-width gap.
    Spacer,
    /// Text button downloading one format.
    Format(ExportFormat),
}

/// The toolbar entries in display order.
pub fn toolbar_layout() -> Vec<ToolbarEntry> {
    let tools = TOOL_ITEMS.iter().map(|item| {
        match (item.command, item.icon.and_then(icon_class)) {
            (Some(command), Some(icon_class)) => ToolbarEntry::Button {
                command,
                icon_class,
                tooltip: item.tooltip,
            },
            _ => ToolbarEntry::Spacer,
        }
    });
    tools
        .chain(ExportFormat::ALL.into_iter().map(ToolbarEntry::Format))
        .collect()
}

/// The active navigation mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NavMode {
    /// Events pass through.
    #[default]
    None,
    /// Drags pan.
    Pan,
    /// Drags select a zoom rectangle.
    Zoom,
}

impl NavMode {
    /// Status line text for the mode.
    pub const fn message(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Pan => "pan/zoom",
            Self::Zoom => "zoom rect",
        }
    }

    /// Cursor shown over the figure in the mode.
    pub const fn cursor(self) -> Cursor {
        match self {
            Self::None => Cursor::Pointer,
            Self::Pan => Cursor::Move,
            Self::Zoom => Cursor::SelectRegion,
        }
    }
}

/// What the canvas should do in response to a navigation event.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NavEffect {
    /// Show the rubberband between two display points.
    DrawRubberband { from: Point, to: Point },
    /// Hide the rubberband.
    ClearRubberband,
    /// Ask the figure to change its view.
    Navigate {
        request: NavigationRequest,
        clear_rubberband: bool,
    },
}

/// Zoom drags shorter than this in either direction are ignored.
const MIN_ZOOM_EXTENT: f64 = 5.0;

#[derive(Copy, Clone, Debug, Default)]
struct Drag {
    start: Point,
    last: Point,
    button: i32,
}

/// Mode and drag tracking for pan and zoom.
#[derive(Debug, Default)]
pub(crate) struct Navigation {
    mode: NavMode,
    drag: Option<Drag>,
}

impl Navigation {
    pub(crate) fn mode(&self) -> NavMode {
        self.mode
    }

    /// Switch to `mode`, or back to no mode if it is already active.
    pub(crate) fn toggle(&mut self, mode: NavMode) -> NavMode {
        self.mode = if self.mode == mode { NavMode::None } else { mode };
        self.drag = None;
        self.mode
    }

    pub(crate) fn handle(&mut self, event: &CanvasEvent) -> Option<NavEffect> {
        if self.mode == NavMode::None {
            return None;
        }
        match *event {
            CanvasEvent::ButtonPress { position, button } if button == 1 || button == 3 => {
                self.drag = Some(Drag {
                    start: position,
                    last: position,
                    button,
                });
                None
            }
            CanvasEvent::Motion { position } => {
                let drag = self.drag.as_mut()?;
                let from = drag.last;
                drag.last = position;
                match self.mode {
                    NavMode::Pan => Some(NavEffect::Navigate {
                        request: NavigationRequest::Pan { from, to: position },
                        clear_rubberband: false,
                    }),
                    NavMode::Zoom => Some(NavEffect::DrawRubberband {
                        from: drag.start,
                        to: position,
                    }),
                    NavMode::None => None,
                }
            }
            CanvasEvent::ButtonRelease { position, .. } => {
                let drag = self.drag.take()?;
                if self.mode != NavMode::Zoom {
                    return None;
                }
                let extent: Vec2 = position - drag.start;
                if extent.x.abs() < MIN_ZOOM_EXTENT || extent.y.abs() < MIN_ZOOM_EXTENT {
                    return Some(NavEffect::ClearRubberband);
                }
                Some(NavEffect::Navigate {
                    request: NavigationRequest::ZoomToRect {
                        rect: Rect::from_points(drag.start, position),
                        zoom_in: drag.button == 1,
                    },
                    clear_rubberband: true,
                })
            }
            _ => None,
        }
    }
}
