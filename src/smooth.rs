//! Quadratic smoothing for terrain and faction-border strokes.
//!
//! Raw samples are stored on the element; this produces the curve the host
//! renders. Each interior sample becomes the control point of a quadratic
//! segment ending halfway to the next sample, which rounds off the jitter of
//! a hand-drawn line without moving its endpoints.

#[cfg(test)]
#[path = "smooth_test.rs"]
mod smooth_test;

use serde::{Deserialize, Serialize};

use crate::consts::DOT_RADIUS;
use crate::geom::Point;

/// One drawing command of a smoothed path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathSegment {
    MoveTo { to: Point },
    QuadTo { ctrl: Point, to: Point },
    LineTo { to: Point },
    /// Filled dot, used when the stroke is a single sample.
    Dot { center: Point, radius: f64 },
}

/// Smooth a raw stroke into drawing commands.
#[must_use]
pub fn smooth_stroke(points: &[Point]) -> Vec<PathSegment> {
    match points {
        [] => Vec::new(),
        [only] => vec![PathSegment::Dot { center: *only, radius: DOT_RADIUS }],
        [first, .., last] => {
            let mut path = Vec::with_capacity(points.len() + 1);
            path.push(PathSegment::MoveTo { to: *first });
            for pair in points[1..].windows(2) {
                path.push(PathSegment::QuadTo { ctrl: pair[0], to: pair[0].midpoint(pair[1]) });
            }
            path.push(PathSegment::LineTo { to: *last });
            path
        }
    }
}
