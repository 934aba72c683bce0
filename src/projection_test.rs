#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rel_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * b.abs().max(1.0)
}

fn world() -> MapExtent {
    MapExtent::new(2048.0, 1024.0)
}

// =============================================================
// MapExtent
// =============================================================

#[test]
fn extent_validity() {
    assert!(world().is_valid());
    assert!(!MapExtent::new(0.0, 0.0).is_valid());
    assert!(!MapExtent::new(100.0, 0.0).is_valid());
    assert!(!MapExtent::new(-5.0, 10.0).is_valid());
    assert!(!MapExtent::new(f64::NAN, 10.0).is_valid());
    assert!(!MapExtent::new(f64::INFINITY, 10.0).is_valid());
}

#[test]
fn extent_or_default_size() {
    assert_eq!(MapExtent::default().or_default_size(), MapExtent::new(2048.0, 1024.0));
    assert_eq!(MapExtent::new(640.0, 480.0).or_default_size(), MapExtent::new(640.0, 480.0));
}

// =============================================================
// flat_to_geo
// =============================================================

#[test]
fn flat_to_geo_center_is_origin() {
    let geo = flat_to_geo(Point::new(1024.0, 512.0), world()).unwrap();
    assert!(approx_eq(geo.lat, 0.0));
    assert!(approx_eq(geo.lon, 0.0));
}

#[test]
fn flat_to_geo_left_and_right_edges() {
    let left = flat_to_geo(Point::new(0.0, 512.0), world()).unwrap();
    let right = flat_to_geo(Point::new(2048.0, 512.0), world()).unwrap();
    assert!(approx_eq(left.lon, -180.0));
    assert!(approx_eq(right.lon, 180.0));
}

#[test]
fn flat_to_geo_top_edge_is_mercator_limit() {
    let top = flat_to_geo(Point::new(0.0, 0.0), world()).unwrap();
    // atan(sinh(pi)) in degrees.
    assert!((top.lat - 85.051_128_78).abs() < 1e-6);
    let bottom = flat_to_geo(Point::new(0.0, 1024.0), world()).unwrap();
    assert!(approx_eq(bottom.lat, -top.lat));
}

#[test]
fn flat_to_geo_extrapolates_outside_map() {
    let geo = flat_to_geo(Point::new(-1024.0, 512.0), world()).unwrap();
    assert!(approx_eq(geo.lon, -360.0));
}

#[test]
fn flat_to_geo_invalid_extent_is_none() {
    assert!(flat_to_geo(Point::new(10.0, 10.0), MapExtent::new(0.0, 0.0)).is_none());
    assert!(flat_to_geo(Point::new(10.0, 10.0), MapExtent::new(100.0, 0.0)).is_none());
}

// =============================================================
// geo_to_flat
// =============================================================

#[test]
fn geo_to_flat_origin_is_center() {
    let p = geo_to_flat(GeoCoord::new(0.0, 0.0), world()).unwrap();
    assert!(approx_eq(p.x, 1024.0));
    assert!(approx_eq(p.y, 512.0));
}

#[test]
fn geo_to_flat_north_is_up() {
    let north = geo_to_flat(GeoCoord::new(45.0, 0.0), world()).unwrap();
    let south = geo_to_flat(GeoCoord::new(-45.0, 0.0), world()).unwrap();
    assert!(north.y < 512.0);
    assert!(south.y > 512.0);
    assert!(approx_eq(north.y - 512.0, 512.0 - south.y));
}

#[test]
fn geo_to_flat_clamps_poles() {
    let pole = geo_to_flat(GeoCoord::new(90.0, 10.0), world()).unwrap();
    let limit = geo_to_flat(GeoCoord::new(85.0, 10.0), world()).unwrap();
    assert_eq!(pole, limit);
    assert!(pole.y.is_finite());

    let south_pole = geo_to_flat(GeoCoord::new(-90.0, 10.0), world()).unwrap();
    let south_limit = geo_to_flat(GeoCoord::new(-85.0, 10.0), world()).unwrap();
    assert_eq!(south_pole, south_limit);
}

#[test]
fn geo_to_flat_invalid_extent_is_none() {
    assert!(geo_to_flat(GeoCoord::new(10.0, 10.0), MapExtent::default()).is_none());
}

// =============================================================
// Round trips
// =============================================================

#[test]
fn round_trip_geo_flat_geo() {
    let extents = [MapExtent::new(800.0, 600.0), world(), MapExtent::new(512.0, 512.0), MapExtent::new(4000.0, 3000.0)];
    for extent in extents {
        for lat in (-85..=85).step_by(5) {
            for lon in (-180..=180).step_by(30) {
                let geo = GeoCoord::new(f64::from(lat), f64::from(lon));
                let flat = geo_to_flat(geo, extent).unwrap();
                let back = flat_to_geo(flat, extent).unwrap();
                assert!(rel_eq(back.lat, geo.lat, 1e-6), "lat {lat} lon {lon} extent {extent:?}: got {back:?}");
                assert!(rel_eq(back.lon, geo.lon, 1e-6), "lat {lat} lon {lon} extent {extent:?}: got {back:?}");
            }
        }
    }
}

#[test]
fn round_trip_flat_geo_flat_inside_limits() {
    let extent = MapExtent::new(1000.0, 800.0);
    for (x, y) in [(0.0, 400.0), (250.0, 100.0), (999.0, 700.0), (500.0, 5.0)] {
        let geo = flat_to_geo(Point::new(x, y), extent).unwrap();
        let back = geo_to_flat(geo, extent).unwrap();
        assert!(rel_eq(back.x, x, 1e-6));
        assert!(rel_eq(back.y, y, 1e-6));
    }
}

// =============================================================
// adjust_for_sphere_distortion
// =============================================================

#[test]
fn adjust_zero_extent_is_noop() {
    let pts = vec![Point::new(5.0, 5.0), Point::new(123.0, -4.0), Point::new(1e9, 7.0)];
    assert_eq!(adjust_for_sphere_distortion(&pts, MapExtent::new(0.0, 0.0)), pts);
}

#[test]
fn adjust_empty_input_is_empty() {
    assert!(adjust_for_sphere_distortion(&[], world()).is_empty());
}

#[test]
fn adjust_low_latitude_points_unchanged() {
    let pts = vec![Point::new(900.0, 450.0), Point::new(1100.0, 520.0), Point::new(1000.0, 600.0)];
    let out = adjust_for_sphere_distortion(&pts, world());
    assert_eq!(out.len(), pts.len());
    for (a, b) in pts.iter().zip(&out) {
        assert!((a.x - b.x).abs() < 1e-6);
        assert!((a.y - b.y).abs() < 1e-6);
    }
}

#[test]
fn adjust_high_latitude_compresses_toward_center() {
    // y = 50 on a 1024-high map is ~83° north.
    let pts = vec![Point::new(924.0, 50.0), Point::new(1024.0, 50.0), Point::new(1124.0, 50.0)];
    let out = adjust_for_sphere_distortion(&pts, world());

    let before = pts[2].x - pts[0].x;
    let after = out[2].x - out[0].x;
    assert!(after < before * 0.2, "expected strong compression, got {after} from {before}");
    assert!((out[1].x - 1024.0).abs() < 1e-6);
    for (a, b) in pts.iter().zip(&out) {
        assert!((a.y - b.y).abs() < 1e-6);
    }
}

#[test]
fn adjust_only_moves_high_latitude_points() {
    let pts = vec![Point::new(800.0, 512.0), Point::new(1300.0, 40.0)];
    let out = adjust_for_sphere_distortion(&pts, world());
    assert!((out[0].x - 800.0).abs() < 1e-6);
    assert!((out[1].x - 1300.0).abs() > 1.0);
}

#[test]
fn adjust_single_point_keeps_longitude() {
    let pts = vec![Point::new(1500.0, 30.0)];
    let out = adjust_for_sphere_distortion(&pts, world());
    assert!((out[0].x - 1500.0).abs() < 1e-6);
}

// =============================================================
// Sphere outline
// =============================================================

#[test]
fn sphere_contains_center_not_corner() {
    let extent = MapExtent::new(200.0, 100.0);
    assert!(sphere_contains(Point::new(100.0, 50.0), extent));
    assert!(sphere_contains(Point::new(0.0, 50.0), extent));
    assert!(!sphere_contains(Point::new(5.0, 5.0), extent));
    assert!(!sphere_contains(Point::new(100.0, 50.0), MapExtent::default()));
}

#[test]
fn sphere_outline_matches_map() {
    assert_eq!(sphere_outline(world()), Some(Rect::new(0.0, 0.0, 2048.0, 1024.0)));
    assert!(sphere_outline(MapExtent::default()).is_none());
}

#[test]
fn projection_mode_default_and_serde() {
    assert_eq!(ProjectionMode::default(), ProjectionMode::Flat);
    assert_eq!(serde_json::to_string(&ProjectionMode::Sphere).unwrap(), "\"sphere\"");
}
