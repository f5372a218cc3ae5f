//! Shared numeric constants for the grid view engine.

// ── Math ────────────────────────────────────────────────────────

/// π / 5 (36°): angular step between stacked components on the offset circle.
pub const FRAC_PI_5: f64 = std::f64::consts::PI / 5.0;

// ── Coordinate detection ────────────────────────────────────────

/// Maximum number of points sampled when classifying the coordinate system.
pub const COORD_SAMPLE_CAP: usize = 20;

/// Largest absolute longitude that still reads as geographic.
pub const MAX_GEO_LONGITUDE: f64 = 180.0;

/// Largest absolute latitude that still reads as geographic.
pub const MAX_GEO_LATITUDE: f64 = 90.0;

/// Width/height ratio above which the layout is rotated a quarter turn.
pub const ROTATE_ASPECT_HIGH: f64 = 3.0;

/// Width/height ratio below which the layout is rotated a quarter turn.
pub const ROTATE_ASPECT_LOW: f64 = 0.33;

// ── Scales ──────────────────────────────────────────────────────

/// Fraction of each extent added as padding on both ends.
pub const SCALE_PADDING_RATIO: f64 = 0.1;

// ── Collision resolution ────────────────────────────────────────

/// Radius in pixels of the circle stacked components are spread around.
pub const COLLISION_OFFSET_RADIUS_PX: f64 = 1.0;

// ── Rendering ───────────────────────────────────────────────────

/// Squared data-space distance under which a line-segment component matches a line endpoint.
pub const SEGMENT_MATCH_EPSILON_SQ: f64 = 1e-8;

/// Stroke width, in screen pixels, of a highlighted line-segment component.
pub const SEGMENT_HIGHLIGHT_WIDTH_PX: f64 = 3.0;

/// Stroke color of a highlighted line-segment component.
pub const SEGMENT_HIGHLIGHT_COLOR: &str = "#ff5722";

/// Marker outline width in screen pixels.
pub const MARKER_OUTLINE_PX: f64 = 0.5;

// ── Interaction ─────────────────────────────────────────────────

/// Wheel delta to zoom exponent factor (one notch of ~100px ≈ ×1.22).
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.002;

/// Pointer travel, in CSS pixels, beyond which a press becomes a drag rather than a click.
pub const DRAG_CLICK_TOLERANCE_PX: f64 = 3.0;

/// Pinch spans shorter than this, in CSS pixels, do not change the zoom.
pub const PINCH_MIN_SPAN_PX: f64 = 1.0;
