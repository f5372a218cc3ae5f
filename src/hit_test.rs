use super::*;
use crate::camera::Viewport;
use crate::model::{Component, GridDataset, Location};

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

fn session(components: Vec<Component>) -> RenderSession {
    let ds = GridDataset { feeder_id: "f".to_owned(), components, lines: vec![] };
    RenderSession::load(ds, Viewport::new(800.0, 600.0, 1.0), &EngineOptions::default())
}

/// Where a component ends up on screen under `view`.
fn screen_pos(s: &RenderSession, id: &str, view: &ViewTransform) -> Point {
    let vp = s.viewport();
    let stack = ViewStack::compose(view, s.coords(), vp.width, vp.height);
    let resolved = s.placement_for(id).map_or(Point::new(f64::NAN, f64::NAN), |p| p.resolved);
    stack.to_screen(resolved)
}

fn ids(hits: &[Hit]) -> Vec<&str> {
    hits.iter().map(|h| h.id.as_str()).collect()
}

// =============================================================
// pointer_to_canvas
// =============================================================

#[test]
fn pointer_to_canvas_subtracts_rect_origin() {
    let p = pointer_to_canvas(Point::new(150.0, 90.0), 100.0, 40.0);
    assert_eq!(p, Point::new(50.0, 50.0));
}

// =============================================================
// hit_test
// =============================================================

#[test]
fn click_on_component_hits_it() {
    let s = session(vec![component("A", "load", 0.0, 0.0), component("B", "load", 1.0, 1.0)]);
    let view = ViewTransform::default();
    let hits = hit_test(&s, &view, &TypeFilter::default(), &EngineOptions::default(), screen_pos(&s, "A", &view));
    assert_eq!(ids(&hits), vec!["A"]);
    assert_eq!(hits[0].component_type, "load");
    assert_eq!(hits[0].kind, ComponentKind::Load);
}

#[test]
fn hit_radius_is_divided_by_zoom() {
    // At k = 2 the 20px base radius covers 10px of pre-zoom pixel space.
    let s = session(vec![component("A", "load", 0.0, 0.0), component("B", "load", 1.0, 1.0)]);
    let view = ViewTransform::new(30.0, -20.0, 2.0);
    let opts = EngineOptions::default();
    let vp = s.viewport();
    let stack = ViewStack::compose(&view, s.coords(), vp.width, vp.height);
    let a = s.placement_for("A").map_or(Point::new(f64::NAN, f64::NAN), |p| p.resolved);

    let near = stack.to_screen(Point::new(a.x + 9.5, a.y));
    assert_eq!(ids(&hit_test(&s, &view, &TypeFilter::default(), &opts, near)), vec!["A"]);

    let far = stack.to_screen(Point::new(a.x + 10.5, a.y));
    assert!(hit_test(&s, &view, &TypeFilter::default(), &opts, far).is_empty());
}

#[test]
fn stacked_components_are_all_returned() {
    let s = session(vec![
        component("A", "load", 0.0, 0.0),
        component("B", "switch", 0.0, 0.0),
        component("C", "load", 1.0, 1.0),
    ]);
    let view = ViewTransform::default();
    let hits = hit_test(&s, &view, &TypeFilter::default(), &EngineOptions::default(), screen_pos(&s, "A", &view));
    assert_eq!(ids(&hits), vec!["A", "B"]);
}

#[test]
fn filtered_out_components_are_not_hit() {
    let s = session(vec![
        component("A", "load", 0.0, 0.0),
        component("B", "switch", 0.0, 0.0),
        component("C", "load", 1.0, 1.0),
    ]);
    let view = ViewTransform::default();
    let filter = TypeFilter::from_tags(["switch"]);
    let hits = hit_test(&s, &view, &filter, &EngineOptions::default(), screen_pos(&s, "A", &view));
    assert_eq!(ids(&hits), vec!["B"]);
}

#[test]
fn rotated_and_flipped_layout_hits_where_drawn() {
    // 100 x 10 planar extent: rotated a quarter turn and Y-flipped.
    let s = session(vec![
        component("A", "load", 1000.0, 1000.0),
        component("B", "load", 1010.0, 1100.0),
        component("C", "load", 1005.0, 1020.0),
    ]);
    assert!(!s.coords().rotation.is_none());
    assert!(s.coords().needs_y_inversion);

    let view = ViewTransform::new(-15.0, 40.0, 1.7);
    for id in ["A", "B", "C"] {
        let hits = hit_test(&s, &view, &TypeFilter::default(), &EngineOptions::default(), screen_pos(&s, id, &view));
        assert_eq!(ids(&hits), vec![id]);
    }
}

#[test]
fn display_name_prefers_component_name() {
    let mut named = component("A", "load", 0.0, 0.0);
    named.name = Some("Main St load".to_owned());
    let s = session(vec![named, component("B", "load", 1.0, 1.0)]);
    let view = ViewTransform::default();
    let hits = hit_test(&s, &view, &TypeFilter::default(), &EngineOptions::default(), screen_pos(&s, "A", &view));
    assert_eq!(hits[0].name, "Main St load");
}

// =============================================================
// classify_click
// =============================================================

#[test]
fn bypass_modifier_skips_hit_testing() {
    let s = session(vec![component("A", "load", 0.0, 0.0), component("B", "load", 1.0, 1.0)]);
    let view = ViewTransform::default();
    let pt = screen_pos(&s, "A", &view);
    let mods = Modifiers { alt: true, ..Modifiers::default() };
    let outcome = classify_click(Some(&s), &view, &TypeFilter::default(), &EngineOptions::default(), mods, pt, pt);
    assert_eq!(outcome, ClickOutcome::Bypassed);
}

#[test]
fn empty_click_hides_popup() {
    let s = session(vec![component("A", "load", 0.0, 0.0), component("B", "load", 1.0, 1.0)]);
    let pt = Point::new(400.0, 300.0);
    let outcome = classify_click(
        Some(&s),
        &ViewTransform::default(),
        &TypeFilter::default(),
        &EngineOptions::default(),
        Modifiers::default(),
        pt,
        pt,
    );
    assert_eq!(outcome, ClickOutcome::Hide);
}

#[test]
fn click_without_session_hides_popup() {
    let pt = Point::new(1.0, 1.0);
    let outcome = classify_click(
        None,
        &ViewTransform::default(),
        &TypeFilter::default(),
        &EngineOptions::default(),
        Modifiers::default(),
        pt,
        pt,
    );
    assert_eq!(outcome, ClickOutcome::Hide);
}

#[test]
fn hit_popup_anchors_at_client_position() {
    let s = session(vec![component("A", "load", 0.0, 0.0), component("B", "load", 1.0, 1.0)]);
    let view = ViewTransform::default();
    let canvas_pt = screen_pos(&s, "B", &view);
    let client_pt = Point::new(canvas_pt.x + 100.0, canvas_pt.y + 50.0);
    let outcome = classify_click(
        Some(&s),
        &view,
        &TypeFilter::default(),
        &EngineOptions::default(),
        Modifiers::default(),
        canvas_pt,
        client_pt,
    );
    match outcome {
        ClickOutcome::Show { anchor, hits } => {
            assert_eq!(anchor, client_pt);
            assert_eq!(ids(&hits), vec!["B"]);
        }
        other => panic!("expected Show, got {other:?}"),
    }
}
