//! Linear data-to-pixel scales.
//!
//! X (longitude) and Y (latitude) get independent linear mappings, each with
//! 10% padding on both ends of its extent. Y maps onto `[height, 0]` so that
//! increasing latitude moves up the screen. The `needs_y_inversion` flag
//! from coordinate detection is a separate flip applied by the view
//! transform stack; the two compose.

#[cfg(test)]
#[path = "scale_test.rs"]
mod scale_test;

use crate::camera::Point;
use crate::consts::SCALE_PADDING_RATIO;
use crate::coords::DataBounds;
use crate::model::{GridDataset, Location};

/// A one-dimensional linear mapping from `domain` onto `range`.
///
/// A degenerate domain (`d0 == d1`) maps every input to the range midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Map a domain value into the range.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span == 0.0 { 0.5 } else { (value - d0) / span };
        r0 + t * (r1 - r0)
    }

    /// Map a range value back into the domain.
    #[must_use]
    pub fn invert(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        let t = if span == 0.0 { 0.5 } else { (value - r0) / span };
        d0 + t * (d1 - d0)
    }
}

/// The pair of scales used to place data on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl Scales {
    /// Pixel position of a data location, before the view transform.
    #[must_use]
    pub fn project(&self, loc: Location) -> Point {
        Point::new(self.x.map(loc.longitude), self.y.map(loc.latitude))
    }

    /// Data location of a pixel position, before the view transform.
    #[must_use]
    pub fn unproject(&self, pt: Point) -> Location {
        Location::new(self.y.invert(pt.y), self.x.invert(pt.x))
    }
}

/// Pad `[min, max]` by `SCALE_PADDING_RATIO` of its span on both ends.
///
/// A zero span is left unpadded.
fn padded(min: f64, max: f64) -> (f64, f64) {
    let pad = (max - min) * SCALE_PADDING_RATIO;
    (min - pad, max + pad)
}

/// Build scales from the located components' extents and the canvas size.
///
/// Returns `None` when no component is located, so callers keep their prior
/// scales (or skip rendering). Pure: identical inputs give identical scales.
#[must_use]
pub fn compute_scales(dataset: &GridDataset, width: f64, height: f64) -> Option<Scales> {
    let bounds = DataBounds::from_points(dataset.located_components().map(|(_, loc)| loc))?;
    if !(width.is_finite() && height.is_finite()) {
        return None;
    }
    let x_domain = padded(bounds.min_x, bounds.max_x);
    let y_domain = padded(bounds.min_y, bounds.max_y);
    Some(Scales {
        x: LinearScale::new(x_domain, (0.0, width)),
        y: LinearScale::new(y_domain, (height, 0.0)),
    })
}
