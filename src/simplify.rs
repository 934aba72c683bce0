//! Ramer–Douglas–Peucker polyline simplification.
//!
//! Implemented with an explicit work stack rather than recursion so that long
//! near-collinear strokes cannot exhaust the call stack. The result is the
//! same as the recursive formulation: split at the interior point farthest
//! from the anchor segment while that distance exceeds the tolerance,
//! otherwise keep only the anchors.

#[cfg(test)]
#[path = "simplify_test.rs"]
mod simplify_test;

use crate::geom::{Point, segment_distance};

/// Reduce `points` to the subsequence that stays within `tolerance` of the original.
///
/// The first and last points are always kept and the output is never longer
/// than the input. Inputs of two points or fewer are returned as-is. A
/// negative or NaN tolerance is treated as zero, which keeps every point that
/// deviates at all from its anchor segment.
#[must_use]
pub fn simplify(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }
    let tolerance = if tolerance > 0.0 { tolerance } else { 0.0 };

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end - start < 2 {
            continue;
        }
        let (a, b) = (points[start], points[end]);

        let mut max_distance = 0.0;
        let mut max_index = start;
        for (i, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = segment_distance(p, a, b);
            if d > max_distance {
                max_distance = d;
                max_index = i;
            }
        }

        if max_distance > tolerance {
            keep[max_index] = true;
            stack.push((max_index, end));
            stack.push((start, max_index));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, kept)| kept.then_some(p))
        .collect()
}
