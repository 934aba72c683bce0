//! Geometry for the map overlays: graticule, climate bands and the
//! square/hex placement grid.
//!
//! Everything here is produced in flat map pixels. The host decides how to
//! stroke and fill it.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CLIMATE_ALPHA, DEFAULT_GRID_CELL, DEFAULT_GRID_OPACITY, HEX_ROW_RATIO, MAX_MERCATOR_LAT, POLAR_CIRCLE_LAT,
    TROPIC_LAT,
};
use crate::geom::{Point, Rect};
use crate::projection::{GeoCoord, MapExtent};

// =============================================================================
// Graticule
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraticuleAxis {
    /// Line of constant latitude.
    Parallel,
    /// Line of constant longitude.
    Meridian,
}

/// One labelled graticule line in map pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraticuleLine {
    pub axis: GraticuleAxis,
    pub degrees: i32,
    pub from: Point,
    pub to: Point,
    pub label: String,
}

/// Parallels every `lat_spacing` degrees and meridians every `lon_spacing`.
///
/// The ±90° parallels land on the ±85° projection clamp. Returns nothing for
/// a zero spacing or an invalid extent.
#[must_use]
pub fn graticule(extent: MapExtent, lat_spacing: u32, lon_spacing: u32) -> Vec<GraticuleLine> {
    if !extent.is_valid() || lat_spacing == 0 || lon_spacing == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();

    for lat in degree_steps(90, lat_spacing) {
        let y = extent.to_flat(GeoCoord::new(f64::from(lat), -180.0)).y;
        lines.push(GraticuleLine {
            axis: GraticuleAxis::Parallel,
            degrees: lat,
            from: Point::new(0.0, y),
            to: Point::new(extent.width, y),
            label: degree_label(lat, 'N', 'S'),
        });
    }

    for lon in degree_steps(180, lon_spacing) {
        let south = extent.to_flat(GeoCoord::new(-MAX_MERCATOR_LAT, f64::from(lon)));
        let north = extent.to_flat(GeoCoord::new(MAX_MERCATOR_LAT, f64::from(lon)));
        lines.push(GraticuleLine {
            axis: GraticuleAxis::Meridian,
            degrees: lon,
            from: south,
            to: Point::new(south.x, north.y),
            label: degree_label(lon, 'E', 'W'),
        });
    }

    lines
}

/// `-limit, -limit + step, …` up to and including `limit` when it falls on a step.
fn degree_steps(limit: i32, step: u32) -> impl Iterator<Item = i32> {
    let step = i32::try_from(step).unwrap_or(i32::MAX);
    std::iter::successors(Some(-limit), move |&d| d.checked_add(step)).take_while(move |&d| d <= limit)
}

fn degree_label(deg: i32, positive: char, negative: char) -> String {
    let magnitude = deg.unsigned_abs();
    match deg.signum() {
        1 => format!("{magnitude}°{positive}"),
        -1 => format!("{magnitude}°{negative}"),
        _ => format!("{magnitude}°"),
    }
}

// =============================================================================
// Climate bands
// =============================================================================

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimateZone {
    Tropical,
    Subtropical,
    Temperate,
    Continental,
    Polar,
    Arctic,
    Desert,
    #[default]
    Other,
}

impl ClimateZone {
    /// Zone for a user-entered name, ignoring case and surrounding space.
    ///
    /// Only exact names pick a colour; "Tropical Rainforest" is `Other`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "tropical" => Self::Tropical,
            "subtropical" => Self::Subtropical,
            "temperate" => Self::Temperate,
            "continental" => Self::Continental,
            "polar" => Self::Polar,
            "arctic" => Self::Arctic,
            "desert" => Self::Desert,
            _ => Self::Other,
        }
    }

    /// Translucent overlay fill for this zone.
    #[must_use]
    pub fn fill(self) -> Rgba {
        let (r, g, b) = match self {
            Self::Tropical => (255, 0, 0),
            Self::Subtropical => (255, 165, 0),
            Self::Temperate => (0, 255, 0),
            Self::Continental => (255, 255, 0),
            Self::Polar => (0, 0, 255),
            Self::Arctic => (200, 200, 255),
            Self::Desert => (237, 201, 175),
            Self::Other => (128, 128, 128),
        };
        Rgba::new(r, g, b, CLIMATE_ALPHA)
    }
}

/// Full-width latitude bands shaded for a named climate zone.
///
/// Any name containing "tropical" (so "Subtropical" too) gets the band between
/// the tropics; otherwise a name containing "polar" or "arctic" gets both
/// polar caps. Other names get nothing.
#[must_use]
pub fn climate_bands(name: &str, extent: MapExtent) -> Vec<Rect> {
    if !extent.is_valid() {
        return Vec::new();
    }
    let name = name.to_lowercase();
    if name.contains("tropical") {
        vec![lat_band(extent, TROPIC_LAT, -TROPIC_LAT)]
    } else if name.contains("polar") || name.contains("arctic") {
        vec![lat_band(extent, 90.0, POLAR_CIRCLE_LAT), lat_band(extent, -POLAR_CIRCLE_LAT, -90.0)]
    } else {
        Vec::new()
    }
}

/// One zone's contribution to the climate overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClimateShade {
    pub name: String,
    pub fill: Rgba,
    pub bands: Vec<Rect>,
}

/// Shading for every climate zone of a planet, in the order given.
#[must_use]
pub fn climate_shading(names: &[String], extent: MapExtent) -> Vec<ClimateShade> {
    names
        .iter()
        .map(|name| ClimateShade {
            name: name.clone(),
            fill: ClimateZone::from_name(name).fill(),
            bands: climate_bands(name, extent),
        })
        .collect()
}

fn lat_band(extent: MapExtent, north: f64, south: f64) -> Rect {
    let top = extent.to_flat(GeoCoord::new(north, 0.0)).y;
    let bottom = extent.to_flat(GeoCoord::new(south, 0.0)).y;
    Rect::new(0.0, top, extent.width, bottom - top)
}

// =============================================================================
// Placement grid
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GridKind {
    #[default]
    Square,
    Hex,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub kind: GridKind,
    pub cell_size: f64,
    pub color: String,
    pub opacity: f64,
    pub enabled: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            kind: GridKind::Square,
            cell_size: DEFAULT_GRID_CELL,
            color: "#000000".into(),
            opacity: DEFAULT_GRID_OPACITY,
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// What the host draws for the current grid settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "items", rename_all = "lowercase")]
pub enum GridGeometry {
    Lines(Vec<Segment>),
    /// Hexagon centres; each hexagon has circumradius `cell_size / 2`.
    Centers(Vec<Point>),
}

impl GridSettings {
    #[must_use]
    pub fn geometry(&self, extent: MapExtent) -> GridGeometry {
        if !self.enabled {
            return GridGeometry::Lines(Vec::new());
        }
        match self.kind {
            GridKind::Square => GridGeometry::Lines(square_grid_lines(extent, self.cell_size)),
            GridKind::Hex => GridGeometry::Centers(hex_grid_centers(extent, self.cell_size)),
        }
    }
}

/// Vertical lines at `x = 0, cell, 2·cell …` then horizontal lines likewise.
#[must_use]
pub fn square_grid_lines(extent: MapExtent, cell: f64) -> Vec<Segment> {
    if !extent.is_valid() || !(cell.is_finite() && cell > 0.0) {
        return Vec::new();
    }
    let verticals = steps(extent.width, cell).map(|x| Segment {
        from: Point::new(x, 0.0),
        to: Point::new(x, extent.height),
    });
    let horizontals = steps(extent.height, cell).map(|y| Segment {
        from: Point::new(0.0, y),
        to: Point::new(extent.width, y),
    });
    verticals.chain(horizontals).collect()
}

/// Hex centres row by row; odd rows are shifted right by half a cell.
#[must_use]
pub fn hex_grid_centers(extent: MapExtent, cell: f64) -> Vec<Point> {
    if !extent.is_valid() || !(cell.is_finite() && cell > 0.0) {
        return Vec::new();
    }
    let mut centers = Vec::new();
    for (row, y) in steps(extent.height, cell * HEX_ROW_RATIO).enumerate() {
        let offset = if row % 2 == 1 { cell / 2.0 } else { 0.0 };
        centers.extend(steps(extent.width - offset, cell).map(|x| Point::new(x + offset, y)));
    }
    centers
}

/// `0, step, 2·step …` while `≤ limit`. Multiplied rather than accumulated.
fn steps(limit: f64, step: f64) -> impl Iterator<Item = f64> {
    (0_u32..)
        .map(move |i| f64::from(i) * step)
        .take_while(move |&v| v <= limit)
}
