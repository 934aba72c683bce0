//! Freehand stroke classification.
//!
//! A stroke is the ordered list of pointer samples captured during one drag.
//! [`classify`] decides whether the user meant a circle, a rectangle or a
//! free polygon:
//!
//! 1. Fewer than three samples is a click: a small default circle at the first sample.
//! 2. A stroke whose endpoints are farther apart than 20% of the bounding
//!    box's smaller side is open, and becomes a simplified polygon.
//! 3. A closed stroke is scored by circularity (`4π·area / perimeter²`, with
//!    the bounding-box area standing in for the true area) and by the
//!    bounding box's normalized aspect ratio. High circularity yields a
//!    circle around the box center, a near-square box yields the box as a
//!    rectangle, anything else a simplified polygon.
//!
//! The thresholds are empirical. They live in [`ClassifierConfig`] so they
//! can be tuned; the defaults reproduce the editor's established behaviour.

#[cfg(test)]
#[path = "classify_test.rs"]
mod classify_test;

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{
    ASPECT_RATIO_THRESHOLD, CIRCULARITY_THRESHOLD, CLOSURE_RATIO, DEGENERATE_CIRCLE_RADIUS, IRREGULAR_STROKE_TOLERANCE,
    MIN_CLASSIFY_POINTS, OPEN_STROKE_TOLERANCE,
};
use crate::geom::{Point, Rect, closed_perimeter};
use crate::simplify::simplify;

/// The samples of a single pointer drag. Never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    points: Vec<Point>,
}

impl Stroke {
    /// Wrap sampled points. Returns `None` for an empty sample list.
    #[must_use]
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.is_empty() { None } else { Some(Self { points }) }
    }

    /// Begin a stroke at the pointer-down position.
    #[must_use]
    pub fn starting_at(p: Point) -> Self {
        Self { points: vec![p] }
    }

    /// Append a pointer-move sample.
    pub fn push(&mut self, p: Point) {
        self.points.push(p);
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub fn first(&self) -> Point {
        self.points[0]
    }

    #[must_use]
    pub fn last(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    /// Tight bounding box of all samples.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let first = self.first();
        Rect::bounding(&self.points).unwrap_or(Rect::new(first.x, first.y, 0.0, 0.0))
    }
}

/// Which kind of shape a stroke was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Circle,
    Rectangle,
    Polygon,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Circle => "Circle",
            Self::Rectangle => "Rectangle",
            Self::Polygon => "Polygon",
        };
        f.write_str(name)
    }
}

/// Result of classifying a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClassifiedShape {
    Circle { center: Point, radius: f64 },
    /// Axis-aligned rectangle; width and height are never negative.
    Rectangle(Rect),
    /// Ordered vertices, at least two.
    Polygon { points: Vec<Point> },
}

impl ClassifiedShape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Circle { .. } => ShapeKind::Circle,
            Self::Rectangle(_) => ShapeKind::Rectangle,
            Self::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    /// Axis-aligned bounds of the shape's geometry.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle { center, radius } => Rect::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0),
            Self::Rectangle(rect) => *rect,
            Self::Polygon { points } => Rect::bounding(points).unwrap_or_default(),
        }
    }
}

/// Tunable thresholds for [`classify_with`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Closed iff endpoint gap < `closure_ratio` × smaller bounding-box side.
    pub closure_ratio: f64,
    /// Closed strokes above this circularity become circles.
    pub circularity_threshold: f64,
    /// Closed, non-circular strokes above this normalized aspect ratio become rectangles.
    pub aspect_ratio_threshold: f64,
    /// Simplification tolerance for open strokes.
    pub open_tolerance: f64,
    /// Simplification tolerance for closed irregular strokes.
    pub irregular_tolerance: f64,
    /// Radius of the circle returned for strokes that are too short to classify.
    pub degenerate_radius: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            closure_ratio: CLOSURE_RATIO,
            circularity_threshold: CIRCULARITY_THRESHOLD,
            aspect_ratio_threshold: ASPECT_RATIO_THRESHOLD,
            open_tolerance: OPEN_STROKE_TOLERANCE,
            irregular_tolerance: IRREGULAR_STROKE_TOLERANCE,
            degenerate_radius: DEGENERATE_CIRCLE_RADIUS,
        }
    }
}

/// Shape measurements the classifier decides on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeMetrics {
    pub bounds: Rect,
    /// Distance between the first and last sample.
    pub closure_distance: f64,
    pub closed: bool,
    /// Perimeter with the last sample joined back to the first.
    pub perimeter: f64,
    /// `4π·(bounding-box area) / perimeter²`; 0 when the perimeter is 0.
    pub circularity: f64,
    /// `min(w/h, h/w)` of the bounding box; 0 when either side is 0.
    pub aspect_ratio: f64,
}

impl StrokeMetrics {
    #[must_use]
    pub fn measure(stroke: &Stroke, config: &ClassifierConfig) -> Self {
        let points = stroke.points();
        let bounds = stroke.bounds();
        let closure_distance = stroke.first().distance_to(stroke.last());
        let closed = closure_distance < bounds.width.min(bounds.height) * config.closure_ratio;

        let perimeter = closed_perimeter(points);
        let area = bounds.width * bounds.height;
        let circularity = if perimeter > 0.0 { (4.0 * PI * area) / (perimeter * perimeter) } else { 0.0 };

        let aspect_ratio = if bounds.width > 0.0 && bounds.height > 0.0 {
            let ratio = bounds.width / bounds.height;
            ratio.min(1.0 / ratio)
        } else {
            0.0
        };

        Self { bounds, closure_distance, closed, perimeter, circularity, aspect_ratio }
    }
}

/// Classify a stroke with the default thresholds.
#[must_use]
pub fn classify(stroke: &Stroke) -> ClassifiedShape {
    classify_with(stroke, &ClassifierConfig::default())
}

/// Classify a stroke with explicit thresholds.
#[must_use]
pub fn classify_with(stroke: &Stroke, config: &ClassifierConfig) -> ClassifiedShape {
    let points = stroke.points();
    if points.len() < MIN_CLASSIFY_POINTS {
        return ClassifiedShape::Circle { center: stroke.first(), radius: config.degenerate_radius };
    }

    let metrics = StrokeMetrics::measure(stroke, config);
    debug!(
        samples = points.len(),
        closed = metrics.closed,
        circularity = metrics.circularity,
        aspect_ratio = metrics.aspect_ratio,
        "classifying stroke"
    );

    if !metrics.closed {
        return ClassifiedShape::Polygon { points: simplify(points, config.open_tolerance) };
    }

    let bounds = metrics.bounds;
    if metrics.circularity > config.circularity_threshold {
        ClassifiedShape::Circle { center: bounds.center(), radius: bounds.width.max(bounds.height) / 2.0 }
    } else if metrics.aspect_ratio > config.aspect_ratio_threshold {
        ClassifiedShape::Rectangle(bounds)
    } else {
        ClassifiedShape::Polygon { points: simplify(points, config.irregular_tolerance) }
    }
}
