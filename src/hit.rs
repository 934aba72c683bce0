#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::Camera;
use crate::classify::ClassifiedShape;
use crate::consts::HIT_SLOP_PX;
use crate::doc::{ElementGeometry, ElementId, MapDoc, MapElement};
use crate::geom::{Point, polygon_contains, polyline_distance};

/// The topmost element under `world_pt`, if any.
///
/// Filled shapes are hit by containment. Paths and pen strokes are hit within
/// an 8 px screen-space slop, so they stay clickable at any zoom.
#[must_use]
pub fn hit_test(world_pt: Point, doc: &MapDoc, camera: &Camera) -> Option<ElementId> {
    let slop = camera.screen_dist_to_world(HIT_SLOP_PX);
    doc.sorted_elements()
        .into_iter()
        .rev()
        .find(|element| element_contains(element, world_pt, slop))
        .map(|element| element.id)
}

fn element_contains(element: &MapElement, p: Point, slop: f64) -> bool {
    match &element.geometry {
        ElementGeometry::Shape(shape) => shape_contains(shape, p, slop),
        ElementGeometry::Path { points } => within(points, p, slop),
        ElementGeometry::Stroke { points, width } => within(points, p, slop + width / 2.0),
    }
}

fn shape_contains(shape: &ClassifiedShape, p: Point, slop: f64) -> bool {
    match shape {
        ClassifiedShape::Circle { center, radius } => center.distance_to(p) <= *radius,
        ClassifiedShape::Rectangle(rect) => rect.contains(p),
        ClassifiedShape::Polygon { points } if points.len() >= 3 => polygon_contains(points, p),
        // Open chains left over from simplifying a straight stroke.
        ClassifiedShape::Polygon { points } => within(points, p, slop),
    }
}

fn within(chain: &[Point], p: Point, slop: f64) -> bool {
    polyline_distance(chain, p).is_some_and(|d| d <= slop)
}
