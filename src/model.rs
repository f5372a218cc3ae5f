//! Dataset model: grid components, line segments, and the feeder snapshot.
//!
//! These types mirror the JSON payload returned by the grid data endpoint.
//! A [`GridDataset`] is the atomic unit of rendering: it is received whole,
//! never mutated, and replacing it invalidates every derived cache (see
//! [`crate::session::RenderSession`]).

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};

/// A single point in whatever coordinate system the source data uses.
///
/// Geographic data carries degrees; planar data carries projected units that
/// routinely fall outside the geographic ranges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Squared distance in raw data units.
    #[must_use]
    pub fn distance_sq(&self, other: &Location) -> f64 {
        let dx = self.longitude - other.longitude;
        let dy = self.latitude - other.latitude;
        dx * dx + dy * dy
    }
}

/// The kind of a grid component.
///
/// Closed set of equipment kinds with an explicit [`ComponentKind::Unknown`]
/// arm for types the engine has no shape or color for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Bus,
    Switch,
    Breaker,
    Fuse,
    Recloser,
    Transformer,
    Regulator,
    Capacitor,
    Load,
    Generator,
    Solar,
    Battery,
    Meter,
    /// A conductor segment; drawn by highlighting its line geometry.
    LineSegment,
    Unknown,
}

impl ComponentKind {
    /// Every known kind, in legend order.
    pub const ALL: [Self; 14] = [
        Self::Bus,
        Self::Switch,
        Self::Breaker,
        Self::Fuse,
        Self::Recloser,
        Self::Transformer,
        Self::Regulator,
        Self::Capacitor,
        Self::Load,
        Self::Generator,
        Self::Solar,
        Self::Battery,
        Self::Meter,
        Self::LineSegment,
    ];

    /// Parse a raw type tag. Case-insensitive; `-` and spaces are treated as `_`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "bus" | "node" => Self::Bus,
            "switch" => Self::Switch,
            "breaker" => Self::Breaker,
            "fuse" => Self::Fuse,
            "recloser" => Self::Recloser,
            "transformer" => Self::Transformer,
            "regulator" => Self::Regulator,
            "capacitor" => Self::Capacitor,
            "load" => Self::Load,
            "generator" => Self::Generator,
            "solar" | "pv" => Self::Solar,
            "battery" | "storage" => Self::Battery,
            "meter" => Self::Meter,
            "line_segment" | "line" | "segment" => Self::LineSegment,
            _ => Self::Unknown,
        }
    }

    /// Canonical wire tag for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Switch => "switch",
            Self::Breaker => "breaker",
            Self::Fuse => "fuse",
            Self::Recloser => "recloser",
            Self::Transformer => "transformer",
            Self::Regulator => "regulator",
            Self::Capacitor => "capacitor",
            Self::Load => "load",
            Self::Generator => "generator",
            Self::Solar => "solar",
            Self::Battery => "battery",
            Self::Meter => "meter",
            Self::LineSegment => "line_segment",
            Self::Unknown => "unknown",
        }
    }
}

/// A single piece of grid equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Unique within a feeder.
    pub id: String,
    /// Raw equipment type tag as sent by the data source.
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `false` excludes the component from all spatial operations.
    #[serde(default)]
    pub has_location: bool,
    #[serde(default)]
    pub location: Location,
    /// Opaque extra fields; carried through, never interpreted.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Component {
    /// Typed kind parsed from the raw type tag.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        ComponentKind::parse(&self.component_type)
    }

    /// Name when present and non-empty, otherwise the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.id,
        }
    }

    /// Location if the component is located and its coordinates are finite.
    #[must_use]
    pub fn located(&self) -> Option<Location> {
        if self.has_location && self.location.latitude.is_finite() && self.location.longitude.is_finite() {
            Some(self.location)
        } else {
            None
        }
    }
}

/// A polyline; in practice a two-point segment.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub points: Vec<Location>,
}

impl Line {
    /// The first and last points, if the line has at least two.
    #[must_use]
    pub fn endpoints(&self) -> Option<(Location, Location)> {
        if self.points.len() < 2 {
            return None;
        }
        Some((*self.points.first()?, *self.points.last()?))
    }
}

/// A feeder snapshot: the atomic unit of rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDataset {
    #[serde(default)]
    pub feeder_id: String,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl GridDataset {
    /// Components that take part in spatial operations.
    pub fn located_components(&self) -> impl Iterator<Item = (&Component, Location)> {
        self.components
            .iter()
            .filter_map(|c| c.located().map(|loc| (c, loc)))
    }

    /// Located component points followed by line points, in dataset order.
    pub fn all_points(&self) -> impl Iterator<Item = Location> + '_ {
        self.located_components()
            .map(|(_, loc)| loc)
            .chain(self.lines.iter().flat_map(|l| l.points.iter().copied()))
    }

    /// Whether the dataset should be drawn with the large-model marker sizing.
    #[must_use]
    pub fn is_large(&self, threshold: usize) -> bool {
        self.components.len() > threshold
    }

    /// Look up a component by id.
    #[must_use]
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Returns `true` if the dataset has neither components nor lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.lines.is_empty()
    }
}
