//! Shared numeric constants for the map canvas.

// ── Stroke classification ───────────────────────────────────────

/// Strokes shorter than this are treated as a click and become a default circle.
pub const MIN_CLASSIFY_POINTS: usize = 3;

/// Radius of the circle produced for degenerate strokes.
pub const DEGENERATE_CIRCLE_RADIUS: f64 = 20.0;

/// A stroke is closed when its endpoints are nearer than this fraction of the
/// smaller bounding-box side.
pub const CLOSURE_RATIO: f64 = 0.2;

/// Closed strokes scoring above this isoperimetric ratio become circles.
pub const CIRCULARITY_THRESHOLD: f64 = 0.7;

/// Closed, non-circular strokes with a normalized aspect ratio above this become rectangles.
pub const ASPECT_RATIO_THRESHOLD: f64 = 0.7;

/// RDP tolerance applied to open strokes.
pub const OPEN_STROKE_TOLERANCE: f64 = 10.0;

/// RDP tolerance applied to closed strokes that are neither circle nor rectangle.
pub const IRREGULAR_STROKE_TOLERANCE: f64 = 15.0;

// ── Projection ──────────────────────────────────────────────────

/// Latitude clamp applied before the forward Mercator conversion.
pub const MAX_MERCATOR_LAT: f64 = 85.0;

/// Above this absolute latitude, sphere-mode strokes have their longitude spread compressed.
pub const HIGH_LATITUDE: f64 = 60.0;

/// Map size substituted when a map is loaded with zero extent.
pub const DEFAULT_MAP_WIDTH: f64 = 2048.0;
pub const DEFAULT_MAP_HEIGHT: f64 = 1024.0;

// ── Overlays ────────────────────────────────────────────────────

/// Degrees between graticule lines.
pub const GRATICULE_SPACING_DEG: u32 = 30;

/// Latitude of the tropics of Cancer and Capricorn.
pub const TROPIC_LAT: f64 = 23.5;

/// Latitude of the arctic and antarctic circles.
pub const POLAR_CIRCLE_LAT: f64 = 66.5;

/// Alpha applied to climate band fills.
pub const CLIMATE_ALPHA: u8 = 40;

/// Row pitch of the hex grid as a fraction of the cell size (√3 / 2).
pub const HEX_ROW_RATIO: f64 = 0.866;

/// Default grid cell size in map pixels.
pub const DEFAULT_GRID_CELL: f64 = 50.0;

/// Default grid line opacity.
pub const DEFAULT_GRID_OPACITY: f64 = 0.3;

// ── Smoothing ───────────────────────────────────────────────────

/// Radius of the dot drawn for a single-point terrain or border stroke.
pub const DOT_RADIUS: f64 = 5.0;

// ── Camera ──────────────────────────────────────────────────────

/// Multiplicative zoom per wheel notch.
pub const ZOOM_STEP: f64 = 1.15;

// ── Editing ─────────────────────────────────────────────────────

/// Maximum undo depth.
pub const MAX_UNDO: usize = 20;

/// Freehand strokes with fewer points are discarded on release.
pub const MIN_FREEHAND_POINTS: usize = 3;

/// Pen strokes with fewer points are discarded on release.
pub const MIN_PEN_POINTS: usize = 2;

/// Click-built polygons need at least this many vertices.
pub const MIN_POLYGON_POINTS: usize = 3;

/// Stacking order for drawn elements.
pub const ELEMENT_Z: i64 = 3;

/// Default pen width in map pixels.
pub const DEFAULT_PEN_WIDTH: f64 = 3.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Screen-space hit slop in pixels for thin strokes.
pub const HIT_SLOP_PX: f64 = 8.0;
