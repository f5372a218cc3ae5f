//! Position collision resolution.
//!
//! Components that land on the same pixel are spread around a small circle
//! so each stays visible and clickable. The first id seen at a position keeps
//! it; the `n`th gets offset by angle `n * π/5` at a 1px radius. Indices are
//! assigned in first-seen order and stay stable across redraws until the
//! index is cleared.

#[cfg(test)]
#[path = "collision_test.rs"]
mod collision_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::consts::{COLLISION_OFFSET_RADIUS_PX, FRAC_PI_5};

/// Component ids seen at each pixel position, in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    slots: HashMap<String, Vec<String>>,
}

impl PositionIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the draw position for `id` at `base`, registering it if new.
    pub fn resolve(&mut self, base: Point, id: &str) -> Point {
        let ids = self.slots.entry(position_key(base)).or_default();
        let index = match ids.iter().position(|seen| seen == id) {
            Some(existing) => existing,
            None => {
                ids.push(id.to_owned());
                ids.len() - 1
            }
        };
        offset_for_index(base, index)
    }

    /// Ids registered at `base`, in first-seen order.
    #[must_use]
    pub fn ids_at(&self, base: Point) -> &[String] {
        self.slots
            .get(&position_key(base))
            .map_or(&[], Vec::as_slice)
    }

    /// Forget every registered position.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of distinct positions registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no position has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Exact `"x,y"` key for a pixel position.
fn position_key(p: Point) -> String {
    format!("{},{}", p.x, p.y)
}

/// Position on the offset circle for the `index`th component at `base`.
#[must_use]
pub fn offset_for_index(base: Point, index: usize) -> Point {
    if index == 0 {
        return base;
    }
    #[allow(clippy::cast_precision_loss)]
    let angle = index as f64 * FRAC_PI_5;
    Point::new(
        angle.cos().mul_add(COLLISION_OFFSET_RADIUS_PX, base.x),
        angle.sin().mul_add(COLLISION_OFFSET_RADIUS_PX, base.y),
    )
}
