//! Hit-result popup state.
//!
//! The popup lists every component under the last click. Selecting a row
//! starts a detail lookup; its outcome lands in [`DetailState`]. Lookup
//! failures stay inside the popup and never touch the canvas view.

#[cfg(test)]
#[path = "popup_test.rs"]
mod popup_test;

use serde_json::json;

use crate::camera::Point;
use crate::controller::RequestId;
use crate::hit::Hit;

/// Progress of the detail lookup for the selected row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Idle,
    Loading(RequestId),
    Loaded(serde_json::Value),
    /// User-visible error message.
    Failed(String),
}

/// An open popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupState {
    /// Client-space position of the click that opened it.
    pub anchor: Point,
    pub hits: Vec<Hit>,
    /// Index into `hits` of the row whose details are shown.
    pub selected: Option<usize>,
    pub detail: DetailState,
}

impl PopupState {
    #[must_use]
    pub fn new(anchor: Point, hits: Vec<Hit>) -> Self {
        Self { anchor, hits, selected: None, detail: DetailState::Idle }
    }

    /// The selected hit, if any.
    #[must_use]
    pub fn selected_hit(&self) -> Option<&Hit> {
        self.selected.and_then(|i| self.hits.get(i))
    }

    /// Select a row and mark its lookup as in flight. Returns the hit, or
    /// `None` if `index` is out of range.
    pub fn begin_detail(&mut self, index: usize, request: RequestId) -> Option<&Hit> {
        let hit = self.hits.get(index)?;
        self.selected = Some(index);
        self.detail = DetailState::Loading(request);
        Some(hit)
    }

    /// Record a finished lookup. Results for any request other than the one
    /// in flight are dropped; returns whether the result was applied.
    pub fn finish_detail(&mut self, request: RequestId, outcome: Result<serde_json::Value, String>) -> bool {
        if self.detail != DetailState::Loading(request) {
            log::debug!("dropping detail result for superseded request {}", request.0);
            return false;
        }
        self.detail = match outcome {
            Ok(value) => DetailState::Loaded(value),
            Err(message) => DetailState::Failed(message),
        };
        true
    }

    /// JSON view handed to the page that draws the popup.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        let hits: Vec<serde_json::Value> = self
            .hits
            .iter()
            .map(|h| json!({ "id": h.id, "name": h.name, "type": h.component_type }))
            .collect();
        let detail = match &self.detail {
            DetailState::Idle => json!({ "status": "idle" }),
            DetailState::Loading(_) => json!({ "status": "loading" }),
            DetailState::Loaded(data) => json!({ "status": "loaded", "data": data }),
            DetailState::Failed(message) => json!({ "status": "error", "message": message }),
        };
        json!({
            "x": self.anchor.x,
            "y": self.anchor.y,
            "hits": hits,
            "selected": self.selected,
            "detail": detail,
        })
    }

    /// Fail the lookup without a network round trip (e.g. an unsupported type).
    pub fn fail_detail(&mut self, index: usize, message: String) {
        if index < self.hits.len() {
            self.selected = Some(index);
            self.detail = DetailState::Failed(message);
        }
    }
}
