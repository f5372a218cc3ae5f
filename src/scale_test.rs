#![allow(clippy::float_cmp)]

use super::*;
use crate::model::{Component, Line};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn located(id: &str, lat: f64, lon: f64) -> Component {
    Component {
        id: id.to_owned(),
        component_type: "load".to_owned(),
        name: None,
        has_location: true,
        location: Location::new(lat, lon),
        extra: serde_json::Map::new(),
    }
}

fn dataset(components: Vec<Component>) -> GridDataset {
    GridDataset { feeder_id: "f".to_owned(), components, lines: Vec::new() }
}

// =============================================================
// LinearScale
// =============================================================

#[test]
fn linear_scale_maps_endpoints() {
    let s = LinearScale::new((10.0, 20.0), (0.0, 100.0));
    assert!(approx_eq(s.map(10.0), 0.0));
    assert!(approx_eq(s.map(20.0), 100.0));
    assert!(approx_eq(s.map(15.0), 50.0));
}

#[test]
fn linear_scale_supports_inverted_range() {
    let s = LinearScale::new((0.0, 1.0), (400.0, 0.0));
    assert!(approx_eq(s.map(0.0), 400.0));
    assert!(approx_eq(s.map(1.0), 0.0));
    assert!(approx_eq(s.map(0.25), 300.0));
}

#[test]
fn linear_scale_invert_undoes_map() {
    let s = LinearScale::new((-3.5, 7.25), (600.0, 0.0));
    for v in [-3.5, 0.0, 1.1, 7.25, 12.0] {
        assert!(approx_eq(s.invert(s.map(v)), v));
    }
}

#[test]
fn degenerate_domain_maps_to_range_midpoint() {
    let s = LinearScale::new((5.0, 5.0), (0.0, 800.0));
    assert!(approx_eq(s.map(5.0), 400.0));
    assert!(approx_eq(s.map(-100.0), 400.0));
}

// =============================================================
// compute_scales
// =============================================================

#[test]
fn no_located_components_yields_none() {
    let mut c = located("a", 1.0, 1.0);
    c.has_location = false;
    assert!(compute_scales(&dataset(vec![c]), 800.0, 600.0).is_none());
    assert!(compute_scales(&dataset(Vec::new()), 800.0, 600.0).is_none());
}

#[test]
fn padding_is_ten_percent_each_side() {
    let ds = dataset(vec![located("a", 0.0, 0.0), located("b", 10.0, 100.0)]);
    let s = compute_scales(&ds, 1200.0, 120.0).unwrap();
    assert!(approx_eq(s.x.domain.0, -10.0));
    assert!(approx_eq(s.x.domain.1, 110.0));
    assert!(approx_eq(s.y.domain.0, -1.0));
    assert!(approx_eq(s.y.domain.1, 11.0));
}

#[test]
fn x_maps_left_to_right_and_y_bottom_to_top() {
    let ds = dataset(vec![located("a", 0.0, 0.0), located("b", 10.0, 10.0)]);
    let s = compute_scales(&ds, 120.0, 120.0).unwrap();
    let low = s.project(Location::new(0.0, 0.0));
    let high = s.project(Location::new(10.0, 10.0));
    assert!(approx_eq(low.x, 10.0));
    assert!(approx_eq(high.x, 110.0));
    // Higher latitude is nearer the top of the canvas.
    assert!(approx_eq(low.y, 110.0));
    assert!(approx_eq(high.y, 10.0));
}

#[test]
fn lines_do_not_contribute_to_extents() {
    let mut ds = dataset(vec![located("a", 0.0, 0.0), located("b", 10.0, 10.0)]);
    ds.lines.push(Line { points: vec![Location::new(-500.0, -500.0), Location::new(500.0, 500.0)] });
    let s = compute_scales(&ds, 100.0, 100.0).unwrap();
    assert!(approx_eq(s.x.domain.0, -1.0));
    assert!(approx_eq(s.x.domain.1, 11.0));
}

#[test]
fn all_points_equal_does_not_crash() {
    let ds = dataset(vec![located("a", 3.0, 4.0), located("b", 3.0, 4.0)]);
    let s = compute_scales(&ds, 800.0, 600.0).unwrap();
    let p = s.project(Location::new(3.0, 4.0));
    assert!(approx_eq(p.x, 400.0));
    assert!(approx_eq(p.y, 300.0));
}

#[test]
fn recomputation_is_idempotent() {
    let ds = dataset(vec![located("a", 41.1, -81.2), located("b", 41.3, -81.0), located("c", 41.2, -81.5)]);
    let first = compute_scales(&ds, 640.0, 480.0);
    let second = compute_scales(&ds, 640.0, 480.0);
    assert_eq!(first, second);
}

#[test]
fn resize_changes_only_range() {
    let ds = dataset(vec![located("a", 0.0, 0.0), located("b", 10.0, 10.0)]);
    let small = compute_scales(&ds, 100.0, 100.0).unwrap();
    let large = compute_scales(&ds, 400.0, 300.0).unwrap();
    assert_eq!(small.x.domain, large.x.domain);
    assert_eq!(large.x.range, (0.0, 400.0));
    assert_eq!(large.y.range, (300.0, 0.0));
}

#[test]
fn unproject_undoes_project() {
    let ds = dataset(vec![located("a", 0.0, 0.0), located("b", 10.0, 20.0)]);
    let s = compute_scales(&ds, 500.0, 250.0).unwrap();
    let loc = Location::new(3.3, 17.7);
    let back = s.unproject(s.project(loc));
    assert!(approx_eq(back.latitude, loc.latitude));
    assert!(approx_eq(back.longitude, loc.longitude));
}
