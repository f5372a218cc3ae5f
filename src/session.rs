//! Per-dataset render session.
//!
//! Everything derived from a [`GridDataset`] lives here and nowhere else:
//! the detected coordinate system, the scales, the collision index, the
//! resolved component positions and the projected line paths. A new dataset
//! means a new session; nothing from the previous one survives.
//!
//! Loading runs in a fixed order: cache clear, coordinate-system detection,
//! scale computation, cache build. The caller redraws afterwards.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::camera::{Point, Viewport};
use crate::collision::PositionIndex;
use crate::consts::SEGMENT_MATCH_EPSILON_SQ;
use crate::coords::{self, CoordinateSystemInfo};
use crate::model::{Component, ComponentKind, GridDataset, Location};
use crate::options::EngineOptions;
use crate::scale::{self, Scales};

/// Where one located component is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Index into the dataset's component list.
    pub component: usize,
    pub kind: ComponentKind,
    /// Scaled position before collision resolution.
    pub base: Point,
    /// Final draw position.
    pub resolved: Point,
    /// For line-segment components, the index of the matched entry in the path cache.
    pub segment: Option<usize>,
}

/// A line projected into pre-transform pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePath {
    /// Index into the dataset's line list.
    pub line: usize,
    pub from: Point,
    pub to: Point,
}

/// Derived state for one loaded dataset.
#[derive(Debug, Clone)]
pub struct RenderSession {
    dataset: GridDataset,
    coords: CoordinateSystemInfo,
    scales: Option<Scales>,
    viewport: Viewport,
    large: bool,
    positions: PositionIndex,
    placements: Vec<Placement>,
    paths: Vec<LinePath>,
}

impl RenderSession {
    /// Build a session for `dataset` at the given canvas size.
    #[must_use]
    pub fn load(dataset: GridDataset, viewport: Viewport, options: &EngineOptions) -> Self {
        let coords = coords::detect(&dataset);
        let large = dataset.is_large(options.large_dataset_threshold);
        let mut session = Self {
            dataset,
            coords,
            scales: None,
            viewport,
            large,
            positions: PositionIndex::new(),
            placements: Vec::new(),
            paths: Vec::new(),
        };
        session.resize(viewport);
        log::debug!(
            "loaded feeder {} ({} components, {} lines, cartesian={}, rotation={}deg)",
            session.dataset.feeder_id,
            session.dataset.components.len(),
            session.dataset.lines.len(),
            coords.is_cartesian,
            coords.rotation.degrees(),
        );
        session
    }

    /// Recompute scales and rebuild the position caches for a new canvas size.
    ///
    /// The coordinate-system info is left untouched. When scales cannot be
    /// computed the previous scales and caches are kept.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let Some(scales) = scale::compute_scales(&self.dataset, viewport.width, viewport.height) else {
            log::debug!("feeder {}: no located components, keeping prior scales", self.dataset.feeder_id);
            return;
        };
        self.scales = Some(scales);
        self.positions.clear();
        self.paths = project_lines(&self.dataset, &scales);
        self.placements = self.place_components(&scales);
    }

    fn place_components(&mut self, scales: &Scales) -> Vec<Placement> {
        let mut placements = Vec::new();
        for (index, component) in self.dataset.components.iter().enumerate() {
            let Some(loc) = component.located() else {
                continue;
            };
            let kind = component.kind();
            let base = scales.project(loc);
            let (resolved, segment) = if kind == ComponentKind::LineSegment {
                (base, match_segment(&self.dataset, &self.paths, loc))
            } else {
                (self.positions.resolve(base, &component.id), None)
            };
            placements.push(Placement { component: index, kind, base, resolved, segment });
        }
        placements
    }

    #[must_use]
    pub fn dataset(&self) -> &GridDataset {
        &self.dataset
    }

    #[must_use]
    pub fn coords(&self) -> &CoordinateSystemInfo {
        &self.coords
    }

    #[must_use]
    pub fn scales(&self) -> Option<&Scales> {
        self.scales.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the dataset uses large-model marker sizing.
    #[must_use]
    pub fn is_large(&self) -> bool {
        self.large
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[must_use]
    pub fn paths(&self) -> &[LinePath] {
        &self.paths
    }

    #[must_use]
    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    /// The component a placement refers to.
    #[must_use]
    pub fn component(&self, placement: &Placement) -> Option<&Component> {
        self.dataset.components.get(placement.component)
    }

    /// The placement for a component id, if the component is located.
    #[must_use]
    pub fn placement_for(&self, id: &str) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| self.dataset.components.get(p.component).is_some_and(|c| c.id == id))
    }

    /// The matched line path for a line-segment placement.
    #[must_use]
    pub fn segment_path(&self, placement: &Placement) -> Option<&LinePath> {
        placement.segment.and_then(|i| self.paths.get(i))
    }
}

fn project_lines(dataset: &GridDataset, scales: &Scales) -> Vec<LinePath> {
    dataset
        .lines
        .iter()
        .enumerate()
        .filter_map(|(line, l)| {
            let (a, b) = l.endpoints()?;
            Some(LinePath { line, from: scales.project(a), to: scales.project(b) })
        })
        .collect()
}

/// First path whose source line has an endpoint within `SEGMENT_MATCH_EPSILON_SQ` of `loc`.
fn match_segment(dataset: &GridDataset, paths: &[LinePath], loc: Location) -> Option<usize> {
    paths.iter().position(|path| {
        dataset
            .lines
            .get(path.line)
            .and_then(crate::model::Line::endpoints)
            .is_some_and(|(a, b)| a.distance_sq(&loc) < SEGMENT_MATCH_EPSILON_SQ || b.distance_sq(&loc) < SEGMENT_MATCH_EPSILON_SQ)
    })
}
