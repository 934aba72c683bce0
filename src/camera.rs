#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::geom::Point;
use crate::projection::MapExtent;

/// Camera state for pan/zoom over the map.
///
/// `pan_x` / `pan_y` are in screen pixels.
/// `zoom` is a scale factor (1.0 = one map pixel per screen pixel).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point to map coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a map point to screen coordinates.
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.zoom + self.pan_x,
            y: world.y * self.zoom + self.pan_y,
        }
    }

    /// Convert a screen-space distance (pixels) to a map distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Apply one wheel event, keeping the map point under `screen` fixed.
    ///
    /// Scrolling up (`dy < 0`) multiplies zoom by `step`, scrolling down
    /// divides by it. Returns whether the camera changed.
    pub fn zoom_at(&mut self, screen: Point, dy: f64, step: f64) -> bool {
        if !dy.is_finite() || dy == 0.0 || !(step.is_finite() && step > 0.0) {
            return false;
        }
        let anchor = self.screen_to_world(screen);
        self.zoom = if dy < 0.0 { self.zoom * step } else { self.zoom / step };
        self.pan_x = screen.x - anchor.x * self.zoom;
        self.pan_y = screen.y - anchor.y * self.zoom;
        true
    }

    /// Show the whole map centred in a viewport, preserving aspect ratio.
    ///
    /// Leaves the camera untouched when either size is degenerate.
    pub fn fit(&mut self, map: MapExtent, viewport: MapExtent) -> bool {
        if !map.is_valid() || !viewport.is_valid() {
            return false;
        }
        let zoom = (viewport.width / map.width).min(viewport.height / map.height);
        self.zoom = zoom;
        self.pan_x = (viewport.width - map.width * zoom) / 2.0;
        self.pan_y = (viewport.height - map.height * zoom) / 2.0;
        true
    }
}
