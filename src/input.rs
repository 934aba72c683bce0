//! Input model: tools, modifier keys, mouse buttons, and the gesture state machine.
//!
//! `Tool` and `Modifiers` capture the user's intent at the time of a pointer
//! event. `InputState` is the gesture being tracked between pointer-down and
//! pointer-up (or, for click-built polygons, across several clicks), carrying
//! the samples needed to emit a finished element on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::classify::Stroke;
use crate::consts::DEFAULT_PEN_WIDTH;
use crate::doc::ElementId;
use crate::geom::Point;
use crate::overlay::GridSettings;
use crate::projection::ProjectionMode;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    /// Drag to move the view.
    Pan,
    /// Drag a smoothed terrain outline.
    Terrain,
    /// Drag a smoothed faction border.
    Border,
    /// Drag out a circle from its centre.
    Circle,
    /// Drag out a rectangle between two corners.
    Rectangle,
    /// Click vertices; secondary click closes.
    Polygon,
    /// Draw by hand and let the classifier pick the shape.
    Freehand,
    /// Raw annotation strokes. Stays active after each stroke.
    Pen,
}

impl Tool {
    /// Whether pointer drags with this tool collect a sample stroke.
    #[must_use]
    pub fn is_stroke(self) -> bool {
        matches!(self, Self::Terrain | Self::Border | Self::Freehand | Self::Pen)
    }

    /// Whether this tool drags out a parametric shape from an anchor.
    #[must_use]
    pub fn is_shape(self) -> bool {
        matches!(self, Self::Circle | Self::Rectangle)
    }

    /// Whether finishing an element with this tool switches back to `Select`.
    #[must_use]
    pub fn returns_to_select(self) -> bool {
        !matches!(self, Self::Select | Self::Pan | Self::Pen)
    }

    /// CSS cursor name the host should show for this tool.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Select => "default",
            Self::Pan => "grab",
            _ => "crosshair",
        }
    }
}

/// Keyboard/mouse modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    /// Middle button; always pans.
    Middle,
    /// Finishes polygons and opens element context menus.
    Secondary,
}

/// A keyboard key as reported by the host (e.g. `"Delete"`, `"Escape"`, `"z"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone)]
pub struct UiState {
    pub tool: Tool,
    pub selected_id: Option<ElementId>,
    pub projection_mode: ProjectionMode,
    /// Colour applied to newly drawn elements.
    pub color: String,
    pub pen_width: f64,
    pub show_graticule: bool,
    pub show_climate: bool,
    /// Climate zone names of the planet the map belongs to.
    pub climate_zones: Vec<String>,
    pub grid: GridSettings,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            selected_id: None,
            projection_mode: ProjectionMode::Flat,
            color: "#000000".to_owned(),
            pen_width: DEFAULT_PEN_WIDTH,
            show_graticule: false,
            show_climate: false,
            climate_zones: Vec::new(),
            grid: GridSettings::default(),
        }
    }
}

/// Internal state for the input state machine.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the view.
    Panning {
        /// Screen-space position of the previous pointer event, used to compute pan delta.
        last_screen: Point,
    },
    /// Collecting map-space samples for a terrain, border, freehand or pen stroke.
    DrawingStroke { tool: Tool, stroke: Stroke },
    /// Sizing a circle or rectangle from the press point.
    DrawingShape { tool: Tool, anchor: Point, current: Point },
    /// Vertices placed so far for a click-built polygon.
    PlacingPolygon { points: Vec<Point> },
}

impl InputState {
    /// Whether a stroke, shape drag or polygon is in progress.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::DrawingStroke { .. } | Self::DrawingShape { .. } | Self::PlacingPolygon { .. })
    }
}
