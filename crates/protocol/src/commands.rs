use serde::{Deserialize, Serialize};

use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for the panel. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle. `action` marks it as an interactive region
    /// (for hit-testing / activation).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        corner_radius: f64,
        action: Option<PanelAction>,
    },

    /// Draw a text string at a position. `position.y` is the vertical
    /// centre of the line.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Draw an open polyline through `points`.
    DrawPolyline {
        points: Vec<Point>,
        color: ThemeToken,
        width: f64,
    },

    /// Begin a logical group. Groups with an `action` are activatable
    /// controls; renderers that support focus should make them focusable.
    BeginGroup {
        id: String,
        label: Option<String>,
        action: Option<PanelAction>,
    },

    /// End the current group.
    EndGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// User actions a panel region can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelAction {
    Copy,
}

impl PanelAction {
    /// Stable identifier used in DOM attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            PanelAction::Copy => "copy",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "copy" => Some(PanelAction::Copy),
            _ => None,
        }
    }
}
