use super::*;

fn component(id: &str, kind: &str, lat: f64, lon: f64) -> Component {
    Component {
        id: id.to_owned(),
        component_type: kind.to_owned(),
        name: None,
        has_location: true,
        location: Location::new(lat, lon),
        extra: serde_json::Map::new(),
    }
}

// =============================================================
// ComponentKind
// =============================================================

#[test]
fn kind_parse_canonical_tags() {
    for kind in ComponentKind::ALL {
        assert_eq!(ComponentKind::parse(kind.as_str()), kind);
    }
}

#[test]
fn kind_parse_is_case_and_separator_insensitive() {
    assert_eq!(ComponentKind::parse("Line-Segment"), ComponentKind::LineSegment);
    assert_eq!(ComponentKind::parse("  TRANSFORMER "), ComponentKind::Transformer);
    assert_eq!(ComponentKind::parse("line segment"), ComponentKind::LineSegment);
}

#[test]
fn kind_parse_unknown_falls_back() {
    assert_eq!(ComponentKind::parse("flux_capacitor"), ComponentKind::Unknown);
    assert_eq!(ComponentKind::parse(""), ComponentKind::Unknown);
}

// =============================================================
// Component
// =============================================================

#[test]
fn component_deserializes_camel_case_payload() {
    let json = serde_json::json!({
        "id": "sw-1",
        "type": "switch",
        "name": "Main tie",
        "hasLocation": true,
        "location": { "latitude": 41.5, "longitude": -81.7 },
        "phase": "ABC"
    });
    let c: Component = serde_json::from_value(json).unwrap();
    assert_eq!(c.id, "sw-1");
    assert_eq!(c.kind(), ComponentKind::Switch);
    assert!(c.has_location);
    assert_eq!(c.location, Location::new(41.5, -81.7));
    assert_eq!(c.extra.get("phase").and_then(|v| v.as_str()), Some("ABC"));
}

#[test]
fn component_missing_location_defaults_to_unlocated() {
    let json = serde_json::json!({ "id": "x", "type": "load" });
    let c: Component = serde_json::from_value(json).unwrap();
    assert!(!c.has_location);
    assert!(c.located().is_none());
}

#[test]
fn component_with_nan_coordinates_is_not_located() {
    let c = component("a", "load", f64::NAN, 0.0);
    assert!(c.located().is_none());
}

#[test]
fn display_name_prefers_name() {
    let mut c = component("id-1", "load", 0.0, 0.0);
    assert_eq!(c.display_name(), "id-1");
    c.name = Some("Customer 12".to_owned());
    assert_eq!(c.display_name(), "Customer 12");
    c.name = Some("   ".to_owned());
    assert_eq!(c.display_name(), "id-1");
}

// =============================================================
// Line
// =============================================================

#[test]
fn line_endpoints_requires_two_points() {
    let short = Line { points: vec![Location::new(0.0, 0.0)] };
    assert!(short.endpoints().is_none());

    let seg = Line { points: vec![Location::new(0.0, 0.0), Location::new(1.0, 2.0)] };
    assert_eq!(seg.endpoints(), Some((Location::new(0.0, 0.0), Location::new(1.0, 2.0))));
}

// =============================================================
// GridDataset
// =============================================================

#[test]
fn dataset_deserializes_feeder_payload() {
    let json = serde_json::json!({
        "feederId": "F-100",
        "components": [
            { "id": "a", "type": "bus", "hasLocation": true, "location": { "latitude": 1.0, "longitude": 2.0 } }
        ],
        "lines": [
            { "points": [ { "latitude": 1.0, "longitude": 2.0 }, { "latitude": 3.0, "longitude": 4.0 } ] }
        ]
    });
    let ds: GridDataset = serde_json::from_value(json).unwrap();
    assert_eq!(ds.feeder_id, "F-100");
    assert_eq!(ds.components.len(), 1);
    assert_eq!(ds.lines.len(), 1);
}

#[test]
fn located_components_skips_unlocated() {
    let mut hidden = component("b", "load", 5.0, 5.0);
    hidden.has_location = false;
    let ds = GridDataset {
        feeder_id: "f".to_owned(),
        components: vec![component("a", "load", 1.0, 1.0), hidden],
        lines: Vec::new(),
    };
    let ids: Vec<&str> = ds.located_components().map(|(c, _)| c.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
}

#[test]
fn all_points_lists_components_before_lines() {
    let ds = GridDataset {
        feeder_id: "f".to_owned(),
        components: vec![component("a", "load", 1.0, 1.0)],
        lines: vec![Line { points: vec![Location::new(2.0, 2.0), Location::new(3.0, 3.0)] }],
    };
    let pts: Vec<Location> = ds.all_points().collect();
    assert_eq!(pts, vec![Location::new(1.0, 1.0), Location::new(2.0, 2.0), Location::new(3.0, 3.0)]);
}

#[test]
fn is_large_is_strictly_over_threshold() {
    let ds = GridDataset {
        feeder_id: "f".to_owned(),
        components: (0..3).map(|i| component(&i.to_string(), "load", 0.0, 0.0)).collect(),
        lines: Vec::new(),
    };
    assert!(!ds.is_large(3));
    assert!(ds.is_large(2));
}

#[test]
fn component_lookup_by_id() {
    let ds = GridDataset {
        feeder_id: "f".to_owned(),
        components: vec![component("a", "load", 0.0, 0.0), component("b", "fuse", 0.0, 0.0)],
        lines: Vec::new(),
    };
    assert_eq!(ds.component("b").map(Component::kind), Some(ComponentKind::Fuse));
    assert!(ds.component("zz").is_none());
}
