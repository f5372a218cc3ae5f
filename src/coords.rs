//! Coordinate system detection.
//!
//! Grid data arrives either as geographic degrees or as planar/projected
//! units, and with no guarantee about which way the feeder runs. Detection
//! classifies a small sample of points, then looks at the overall bounding
//! box to decide whether a quarter-turn makes the layout fit a landscape
//! canvas better. The result is computed once per dataset and is read-only
//! for that dataset's lifetime.

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;

use crate::consts::{COORD_SAMPLE_CAP, MAX_GEO_LATITUDE, MAX_GEO_LONGITUDE, ROTATE_ASPECT_HIGH, ROTATE_ASPECT_LOW};
use crate::model::{GridDataset, Location};

/// Layout rotation applied before drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    /// A 90° turn about the canvas center.
    Quarter,
}

impl Rotation {
    #[must_use]
    pub fn degrees(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Quarter => 90.0,
        }
    }

    #[must_use]
    pub fn radians(self) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Quarter => std::f64::consts::FRAC_PI_2,
        }
    }

    #[must_use]
    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// Correction applied on top of the standard screen-Y-down mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateSystemInfo {
    pub is_cartesian: bool,
    pub rotation: Rotation,
    pub needs_y_inversion: bool,
}

/// Axis-aligned bounds over raw data coordinates (longitude = x, latitude = y).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl DataBounds {
    /// Bounds over `points`, or `None` when there are no finite points.
    pub fn from_points(points: impl IntoIterator<Item = Location>) -> Option<Self> {
        let mut bounds: Option<Self> = None;
        for p in points {
            if !p.longitude.is_finite() || !p.latitude.is_finite() {
                continue;
            }
            let b = bounds.get_or_insert(Self {
                min_x: p.longitude,
                max_x: p.longitude,
                min_y: p.latitude,
                max_y: p.latitude,
            });
            b.min_x = b.min_x.min(p.longitude);
            b.max_x = b.max_x.max(p.longitude);
            b.min_y = b.min_y.min(p.latitude);
            b.max_y = b.max_y.max(p.latitude);
        }
        bounds
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Whether a single point lies outside the geographic ranges.
#[must_use]
pub fn is_cartesian_point(p: Location) -> bool {
    p.longitude.abs() > MAX_GEO_LONGITUDE || p.latitude.abs() > MAX_GEO_LATITUDE
}

/// Classify the dataset's coordinate system and pick a layout rotation.
#[must_use]
pub fn detect(dataset: &GridDataset) -> CoordinateSystemInfo {
    let mut cartesian = 0_usize;
    let mut geographic = 0_usize;
    for p in dataset.all_points().take(COORD_SAMPLE_CAP) {
        if is_cartesian_point(p) {
            cartesian += 1;
        } else {
            geographic += 1;
        }
    }

    // Ties (including the empty dataset) read as geographic.
    let is_cartesian = cartesian > geographic;
    let rotation = DataBounds::from_points(dataset.all_points()).map_or(Rotation::None, rotation_for_bounds);

    CoordinateSystemInfo { is_cartesian, rotation, needs_y_inversion: is_cartesian }
}

/// Quarter-turn when the bounds are much wider than tall, or much taller than wide.
#[must_use]
pub fn rotation_for_bounds(bounds: DataBounds) -> Rotation {
    let (w, h) = (bounds.width(), bounds.height());
    if w <= 0.0 || h <= 0.0 {
        return Rotation::None;
    }
    let aspect = w / h;
    if !(ROTATE_ASPECT_LOW..=ROTATE_ASPECT_HIGH).contains(&aspect) {
        Rotation::Quarter
    } else {
        Rotation::None
    }
}
