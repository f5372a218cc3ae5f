//! Rendering: draws the full feeder diagram onto a [`Surface`].
//!
//! Immediate mode. Every call clears the canvas and redraws lines, segment
//! highlights and markers from the current session, view transform and
//! filter. Nothing here mutates application state; all positions come from
//! the session's precomputed placements.
//!
//! Fallible surface calls propagate through `Result<(), S::Error>`. The
//! top-level caller ([`crate::engine::EngineCore::render`]) hands the result
//! to the host.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::TAU;

use crate::camera::{ViewStack, ViewTransform, Viewport};
use crate::consts::{MARKER_OUTLINE_PX, SEGMENT_HIGHLIGHT_COLOR, SEGMENT_HIGHLIGHT_WIDTH_PX};
use crate::filter::TypeFilter;
use crate::model::ComponentKind;
use crate::options::EngineOptions;
use crate::session::{Placement, RenderSession};
use crate::surface::Surface;

/// Marker outline color.
const MARKER_OUTLINE_COLOR: &str = "#ffffff";

/// Horizontal skew of the parallelogram marker, as a fraction of its radius.
const PARALLELOGRAM_SKEW: f64 = 0.5;

/// Marker outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Rect,
    Diamond,
    Parallelogram,
}

/// How one component kind is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    pub fill: &'static str,
}

/// Shape and fill for a component kind. Kinds without an entry of their own
/// share the default grey circle.
#[must_use]
pub const fn style_for(kind: ComponentKind) -> MarkerStyle {
    let (shape, fill) = match kind {
        ComponentKind::Bus => (MarkerShape::Rect, "#212121"),
        ComponentKind::Switch => (MarkerShape::Rect, "#1976d2"),
        ComponentKind::Breaker => (MarkerShape::Rect, "#0d47a1"),
        ComponentKind::Fuse => (MarkerShape::Diamond, "#f57c00"),
        ComponentKind::Recloser => (MarkerShape::Diamond, "#7b1fa2"),
        ComponentKind::Transformer => (MarkerShape::Parallelogram, "#388e3c"),
        ComponentKind::Regulator => (MarkerShape::Parallelogram, "#00796b"),
        ComponentKind::Capacitor => (MarkerShape::Circle, "#0097a7"),
        ComponentKind::Load => (MarkerShape::Circle, "#5d4037"),
        ComponentKind::Generator => (MarkerShape::Circle, "#d32f2f"),
        ComponentKind::Solar => (MarkerShape::Circle, "#fbc02d"),
        ComponentKind::Battery => (MarkerShape::Circle, "#689f38"),
        ComponentKind::Meter => (MarkerShape::Circle, "#455a64"),
        ComponentKind::LineSegment => (MarkerShape::Circle, SEGMENT_HIGHLIGHT_COLOR),
        ComponentKind::Unknown => (MarkerShape::Circle, "#9e9e9e"),
    };
    MarkerStyle { shape, fill }
}

/// Draw the full scene.
///
/// `session` is `None` until the first dataset arrives; the canvas is then
/// just cleared. A session without scales (no located components) draws
/// nothing either.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw<S: Surface>(
    surface: &mut S,
    session: Option<&RenderSession>,
    view: &ViewTransform,
    filter: &TypeFilter,
    options: &EngineOptions,
    viewport: Viewport,
) -> Result<(), S::Error> {
    // Layer 1: clear in device pixels.
    surface.set_transform(viewport.dpr, 0.0, 0.0, viewport.dpr, 0.0, 0.0)?;
    surface.clear_rect(0.0, 0.0, viewport.width, viewport.height);

    let Some(session) = session else {
        return Ok(());
    };
    if session.scales().is_none() {
        return Ok(());
    }

    // Layer 2: view stack, centered on the size the scales were built for so
    // drawing and hit testing agree while a resize is still debounced.
    let scaled = session.viewport();
    let stack = ViewStack::compose(view, session.coords(), scaled.width, scaled.height);
    for op in stack.ops() {
        surface.apply_op(op)?;
    }

    // Layer 3: lines in one batched stroke.
    draw_lines(surface, session, view.k, options);

    // Layer 4: highlighted line segments, then markers on top.
    let visible = || {
        session
            .placements()
            .iter()
            .filter(|p| filter.allows(p.kind))
    };
    draw_segment_highlights(surface, session, visible().filter(|p| p.kind == ComponentKind::LineSegment), view.k);

    let radius = options.marker_for(session.is_large()).radius(view.k);
    surface.set_stroke_style(MARKER_OUTLINE_COLOR);
    surface.set_line_width(MARKER_OUTLINE_PX / view.k);
    for kind in ComponentKind::ALL.into_iter().chain([ComponentKind::Unknown]) {
        if kind == ComponentKind::LineSegment || !filter.allows(kind) {
            continue;
        }
        draw_markers(surface, visible().filter(|p| p.kind == kind), style_for(kind), radius)?;
    }

    Ok(())
}

// =============================================================
// Lines
// =============================================================

fn draw_lines<S: Surface>(surface: &mut S, session: &RenderSession, k: f64, options: &EngineOptions) {
    if session.paths().is_empty() {
        return;
    }
    surface.set_stroke_style(&options.line_color);
    surface.set_line_width(options.line_width_px / k);
    surface.begin_path();
    for path in session.paths() {
        surface.move_to(path.from.x, path.from.y);
        surface.line_to(path.to.x, path.to.y);
    }
    surface.stroke();
}

fn draw_segment_highlights<'a, S: Surface>(
    surface: &mut S,
    session: &RenderSession,
    segments: impl Iterator<Item = &'a Placement>,
    k: f64,
) {
    let mut any = false;
    for placement in segments {
        // Segments with no matching line are skipped.
        let Some(path) = session.segment_path(placement) else {
            continue;
        };
        if !any {
            surface.set_stroke_style(SEGMENT_HIGHLIGHT_COLOR);
            surface.set_line_width(SEGMENT_HIGHLIGHT_WIDTH_PX / k);
            surface.begin_path();
            any = true;
        }
        surface.move_to(path.from.x, path.from.y);
        surface.line_to(path.to.x, path.to.y);
    }
    if any {
        surface.stroke();
    }
}

// =============================================================
// Markers
// =============================================================

fn draw_markers<'a, S: Surface>(
    surface: &mut S,
    placements: impl Iterator<Item = &'a Placement>,
    style: MarkerStyle,
    radius: f64,
) -> Result<(), S::Error> {
    let mut any = false;
    for placement in placements {
        if !any {
            surface.set_fill_style(style.fill);
            surface.begin_path();
            any = true;
        }
        let (x, y) = (placement.resolved.x, placement.resolved.y);
        trace_shape(surface, style.shape, x, y, radius)?;
    }
    if any {
        surface.fill();
        surface.stroke();
    }
    Ok(())
}

/// Append one closed marker outline centered at `(x, y)` to the current path.
fn trace_shape<S: Surface>(surface: &mut S, shape: MarkerShape, x: f64, y: f64, r: f64) -> Result<(), S::Error> {
    match shape {
        MarkerShape::Circle => {
            surface.move_to(x + r, y);
            surface.arc(x, y, r, 0.0, TAU)?;
        }
        MarkerShape::Rect => {
            surface.move_to(x - r, y - r);
            surface.line_to(x + r, y - r);
            surface.line_to(x + r, y + r);
            surface.line_to(x - r, y + r);
            surface.close_path();
        }
        MarkerShape::Diamond => {
            surface.move_to(x, y - r); // top
            surface.line_to(x + r, y); // right
            surface.line_to(x, y + r); // bottom
            surface.line_to(x - r, y); // left
            surface.close_path();
        }
        MarkerShape::Parallelogram => {
            let skew = r * PARALLELOGRAM_SKEW;
            surface.move_to(x - r + skew, y - r);
            surface.line_to(x + r + skew, y - r);
            surface.line_to(x + r - skew, y + r);
            surface.line_to(x - r - skew, y + r);
            surface.close_path();
        }
    }
    Ok(())
}
