//! View transform stack: pan/zoom plus coordinate-system correction.
//!
//! Drawing and hit-testing share one ordered list of affine operations. The
//! renderer replays the list onto the surface in order; the hit tester walks
//! the same list with each operation inverted, so click positions always
//! agree with what is on screen.
//!
//! Operation order (as issued to the surface):
//!
//! 1. translate by the pan offset `(x, y)`
//! 2. scale by the zoom factor `k`
//! 3. translate to the canvas center
//! 4. rotate by the layout rotation (only when nonzero)
//! 5. scale by `(1, -1)` (only when the data needs Y inversion)
//! 6. translate back from the canvas center

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use crate::coords::CoordinateSystemInfo;

/// A point in either screen or data (pre-transform pixel) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(&self, other: Point) -> Point {
        Point::new(f64::midpoint(self.x, other.x), f64::midpoint(self.y, other.y))
    }
}

/// Canvas size in CSS pixels plus the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    #[must_use]
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width, height, dpr }
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width * 0.5, self.height * 0.5)
    }

    /// Returns `true` when either dimension is zero, negative or not finite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Pan/zoom state.
///
/// `x` / `y` are in CSS pixels. `k` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 1.0 }
    }
}

impl ViewTransform {
    #[must_use]
    pub fn new(x: f64, y: f64, k: f64) -> Self {
        Self { x, y, k }
    }

    /// Convert a screen-space distance (pixels) to a pre-zoom distance.
    #[must_use]
    pub fn screen_dist_to_data(&self, screen_dist: f64) -> f64 {
        screen_dist / self.k
    }

    /// Rescale to `k` while keeping the point under `anchor` (screen space) fixed.
    #[must_use]
    pub fn zoomed_about(&self, anchor: Point, k: f64) -> Self {
        let ratio = k / self.k;
        Self {
            x: anchor.x - (anchor.x - self.x) * ratio,
            y: anchor.y - (anchor.y - self.y) * ratio,
            k,
        }
    }

    /// Shift by a screen-space delta.
    #[must_use]
    pub fn panned(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, k: self.k }
    }
}

/// One affine step, with canvas `translate` / `rotate` / `scale` semantics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformOp {
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
    Scale { sx: f64, sy: f64 },
}

impl TransformOp {
    /// Map a point through this operation.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        match *self {
            Self::Translate { dx, dy } => Point::new(p.x + dx, p.y + dy),
            Self::Rotate { radians } => {
                let (sin, cos) = radians.sin_cos();
                Point::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
            }
            Self::Scale { sx, sy } => Point::new(p.x * sx, p.y * sy),
        }
    }

    /// The operation that undoes this one. A `(1, -1)` flip is its own inverse.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Translate { dx, dy } => Self::Translate { dx: -dx, dy: -dy },
            Self::Rotate { radians } => Self::Rotate { radians: -radians },
            Self::Scale { sx, sy } => Self::Scale { sx: 1.0 / sx, sy: 1.0 / sy },
        }
    }
}

/// The composed view transform for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewStack {
    ops: Vec<TransformOp>,
}

impl ViewStack {
    /// Compose pan/zoom with the coordinate-system correction about the canvas midpoint.
    #[must_use]
    pub fn compose(view: &ViewTransform, coords: &CoordinateSystemInfo, viewport_w: f64, viewport_h: f64) -> Self {
        let cx = viewport_w * 0.5;
        let cy = viewport_h * 0.5;
        let mut ops = Vec::with_capacity(6);
        ops.push(TransformOp::Translate { dx: view.x, dy: view.y });
        ops.push(TransformOp::Scale { sx: view.k, sy: view.k });
        ops.push(TransformOp::Translate { dx: cx, dy: cy });
        if !coords.rotation.is_none() {
            ops.push(TransformOp::Rotate { radians: coords.rotation.radians() });
        }
        if coords.needs_y_inversion {
            ops.push(TransformOp::Scale { sx: 1.0, sy: -1.0 });
        }
        ops.push(TransformOp::Translate { dx: -cx, dy: -cy });
        Self { ops }
    }

    /// Operations in the order they are issued to the surface.
    #[must_use]
    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    /// Map a data-space point to screen space.
    ///
    /// Surface calls post-multiply, so the last-issued operation acts first.
    #[must_use]
    pub fn to_screen(&self, p: Point) -> Point {
        self.ops.iter().rev().fold(p, |acc, op| op.apply(acc))
    }

    /// Map a screen-space point back to data space by inverting each operation in issue order.
    #[must_use]
    pub fn to_data(&self, p: Point) -> Point {
        self.ops.iter().fold(p, |acc, op| op.inverse().apply(acc))
    }
}
