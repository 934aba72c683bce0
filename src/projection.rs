//! Mercator-style mapping between flat map pixels and latitude/longitude.
//!
//! This is a pixel-space approximation used to draw graticules and to make
//! shapes drawn in sphere mode look plausible. It is not a geodetic
//! reference: there is no datum, no ellipsoid and no great-circle math.
//!
//! Every conversion takes the active [`MapExtent`]. An extent with a zero,
//! negative or non-finite side cannot be projected against; the public
//! functions return `None` (or the input unchanged) instead of dividing by
//! zero.

#[cfg(test)]
#[path = "projection_test.rs"]
mod projection_test;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, HIGH_LATITUDE, MAX_MERCATOR_LAT};
use crate::geom::{Point, Rect, centroid};

/// Logical pixel size of the current map.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MapExtent {
    pub width: f64,
    pub height: f64,
}

impl MapExtent {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether projections may be computed against this extent.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// This extent when valid, otherwise the default 2048×1024 blank map.
    #[must_use]
    pub fn or_default_size(self) -> Self {
        if self.is_valid() { self } else { Self::new(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT) }
    }

    /// The map rectangle anchored at the origin.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub(crate) fn to_geo(self, p: Point) -> GeoCoord {
        let lon = (p.x / self.width) * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * p.y / self.height)).sinh().atan().to_degrees();
        GeoCoord { lat, lon }
    }

    pub(crate) fn to_flat(self, geo: GeoCoord) -> Point {
        let lat = geo.lat.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT).to_radians();
        let x = ((geo.lon + 180.0) / 360.0) * self.width;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) * self.height / 2.0;
        Point::new(x, y)
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoord {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoord {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// How the map is presented. Stored geometry is always flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Flat,
    /// Globe-like presentation: elliptical clip plus distortion compensation for new strokes.
    Sphere,
}

/// Flat map pixel → latitude/longitude.
///
/// Coordinates outside the map are extrapolated, not clamped.
#[must_use]
pub fn flat_to_geo(p: Point, extent: MapExtent) -> Option<GeoCoord> {
    extent.is_valid().then(|| extent.to_geo(p))
}

/// Latitude/longitude → flat map pixel.
///
/// Latitude is clamped to ±85° first; the forward projection diverges at the poles.
#[must_use]
pub fn geo_to_flat(geo: GeoCoord, extent: MapExtent) -> Option<Point> {
    extent.is_valid().then(|| extent.to_flat(geo))
}

/// Compensate a stroke drawn in sphere mode for high-latitude stretching.
///
/// Each point whose latitude exceeds ±60° has its longitude offset from the
/// stroke's centroid longitude scaled by `cos(lat)`, pulling the stroke in
/// horizontally near the poles. Points at lower latitudes keep their
/// longitude. Every point is re-projected, so latitudes beyond ±85° come back
/// clamped.
///
/// A visual heuristic only. With an invalid extent the points are returned unchanged.
#[must_use]
pub fn adjust_for_sphere_distortion(points: &[Point], extent: MapExtent) -> Vec<Point> {
    if !extent.is_valid() {
        return points.to_vec();
    }
    let Some(center) = centroid(points) else {
        return Vec::new();
    };
    let center_lon = extent.to_geo(center).lon;

    points
        .iter()
        .map(|&p| {
            let geo = extent.to_geo(p);
            let lon = if geo.lat.abs() > HIGH_LATITUDE {
                center_lon + (geo.lon - center_lon) * geo.lat.to_radians().cos()
            } else {
                geo.lon
            };
            extent.to_flat(GeoCoord::new(geo.lat, lon))
        })
        .collect()
}

/// Bounds of the sphere-mode outline: the ellipse inscribed in the map.
#[must_use]
pub fn sphere_outline(extent: MapExtent) -> Option<Rect> {
    extent.is_valid().then(|| extent.rect())
}

/// Whether `p` lies inside the sphere-mode clip ellipse.
#[must_use]
pub fn sphere_contains(p: Point, extent: MapExtent) -> bool {
    if !extent.is_valid() {
        return false;
    }
    let rx = extent.width / 2.0;
    let ry = extent.height / 2.0;
    let nx = (p.x - rx) / rx;
    let ny = (p.y - ry) / ry;
    nx * nx + ny * ny <= 1.0
}
