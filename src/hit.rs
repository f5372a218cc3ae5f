//! Hit testing: which components lie under a pointer.
//!
//! The pointer is mapped back to pre-transform pixel space by inverting the
//! same [`ViewStack`] the renderer replays, then compared against each
//! placement's resolved position. The radius is a fixed screen distance
//! divided by the zoom factor, so clickability does not change with zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, ViewStack, ViewTransform};
use crate::filter::TypeFilter;
use crate::input::Modifiers;
use crate::model::ComponentKind;
use crate::options::EngineOptions;
use crate::session::RenderSession;

/// One component under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub id: String,
    pub name: String,
    /// Raw type tag, kept for the detail lookup.
    pub component_type: String,
    pub kind: ComponentKind,
}

/// What a click resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// The bypass modifier was held; selection is skipped entirely.
    Bypassed,
    /// Nothing under the pointer; any open popup closes.
    Hide,
    /// Open a popup at `anchor` (client coordinates) listing `hits`.
    Show { anchor: Point, hits: Vec<Hit> },
}

/// Convert client coordinates to canvas CSS pixels given the canvas bounding rect origin.
#[must_use]
pub fn pointer_to_canvas(client: Point, rect_left: f64, rect_top: f64) -> Point {
    Point::new(client.x - rect_left, client.y - rect_top)
}

/// Every visible, located component within the hit radius of `screen_pt`.
///
/// `screen_pt` is in canvas CSS pixels. Results are in dataset order.
#[must_use]
pub fn hit_test(
    session: &RenderSession,
    view: &ViewTransform,
    filter: &TypeFilter,
    options: &EngineOptions,
    screen_pt: Point,
) -> Vec<Hit> {
    if session.scales().is_none() {
        return Vec::new();
    }
    let viewport = session.viewport();
    let stack = ViewStack::compose(view, session.coords(), viewport.width, viewport.height);
    let data_pt = stack.to_data(screen_pt);
    let radius = view.screen_dist_to_data(options.hit_radius_px);

    session
        .placements()
        .iter()
        .filter(|p| filter.allows(p.kind))
        .filter(|p| p.resolved.distance(data_pt) <= radius)
        .filter_map(|p| {
            let c = session.component(p)?;
            Some(Hit {
                id: c.id.clone(),
                name: c.display_name().to_owned(),
                component_type: c.component_type.clone(),
                kind: p.kind,
            })
        })
        .collect()
}

/// Resolve a click into a popup decision.
///
/// `canvas_pt` drives the hit test; `client_pt` is where the popup anchors.
#[must_use]
pub fn classify_click(
    session: Option<&RenderSession>,
    view: &ViewTransform,
    filter: &TypeFilter,
    options: &EngineOptions,
    modifiers: Modifiers,
    canvas_pt: Point,
    client_pt: Point,
) -> ClickOutcome {
    if modifiers.holds(options.bypass_modifier) {
        return ClickOutcome::Bypassed;
    }
    let hits = session.map_or_else(Vec::new, |s| hit_test(s, view, filter, options, canvas_pt));
    if hits.is_empty() {
        ClickOutcome::Hide
    } else {
        ClickOutcome::Show { anchor: client_pt, hits }
    }
}
