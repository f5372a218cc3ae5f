//! REST helpers for the grid data source.
//!
//! Endpoint construction and the type-to-collection mapping are plain
//! functions compiled everywhere. The HTTP calls themselves go through
//! `gloo-net` and exist only with the `hydrate` feature.
//!
//! ERROR HANDLING
//! ==============
//! Every call returns `Result<_, ApiError>`. A component type with no detail
//! collection is reported as `UnsupportedType` before any request is made,
//! so callers can tell it apart from a network failure. Nothing is retried;
//! the next user action is the retry.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use crate::model::ComponentKind;
#[cfg(feature = "hydrate")]
use crate::model::GridDataset;

/// Failure of a data-source call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("could not decode response: {0}")]
    Decode(String),
    #[error("no detail lookup for component type `{0}`")]
    UnsupportedType(String),
}

impl ApiError {
    /// Short message shown inline in the detail popup.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the server.".to_owned(),
            Self::Status(404) => "No details found for this component.".to_owned(),
            Self::Status(status) => format!("Server returned {status}."),
            Self::Decode(_) => "Unexpected response from the server.".to_owned(),
            Self::UnsupportedType(tag) => format!("Details are not available for {tag} components."),
        }
    }
}

/// `GET` path for a feeder's grid dataset.
#[must_use]
pub fn grid_endpoint(feeder_id: &str) -> String {
    format!("/api/feeders/{feeder_id}/grid")
}

/// Detail collection for a component kind, if it has one.
#[must_use]
pub const fn detail_segment(kind: ComponentKind) -> Option<&'static str> {
    match kind {
        ComponentKind::Switch => Some("switches"),
        ComponentKind::Breaker => Some("breakers"),
        ComponentKind::Fuse => Some("fuses"),
        ComponentKind::Recloser => Some("reclosers"),
        ComponentKind::Transformer => Some("transformers"),
        ComponentKind::Regulator => Some("regulators"),
        ComponentKind::Capacitor => Some("capacitors"),
        ComponentKind::Load => Some("loads"),
        ComponentKind::Generator => Some("generators"),
        ComponentKind::Solar => Some("solar"),
        ComponentKind::Battery => Some("batteries"),
        ComponentKind::Meter => Some("meters"),
        ComponentKind::LineSegment => Some("line-segments"),
        ComponentKind::Bus | ComponentKind::Unknown => None,
    }
}

/// `GET` path for one component's details, keyed by its raw type tag.
///
/// # Errors
///
/// Returns `ApiError::UnsupportedType` when the tag has no detail collection.
pub fn detail_endpoint(component_type: &str, component_id: &str) -> Result<String, ApiError> {
    let segment = detail_segment(ComponentKind::parse(component_type))
        .ok_or_else(|| ApiError::UnsupportedType(component_type.to_owned()))?;
    Ok(format!("/api/components/{segment}/{component_id}"))
}

#[cfg(feature = "hydrate")]
async fn get_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    if !(200..300).contains(&resp.status()) {
        return Err(ApiError::Status(resp.status()));
    }
    resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Fetch the grid dataset for a feeder.
///
/// # Errors
///
/// Returns `ApiError` on transport failure, a non-2xx status, or a body that
/// is not a grid dataset.
#[cfg(feature = "hydrate")]
pub async fn fetch_grid_dataset(feeder_id: &str) -> Result<GridDataset, ApiError> {
    get_json(&grid_endpoint(feeder_id)).await
}

/// Fetch the opaque detail record for one component.
///
/// # Errors
///
/// Returns `ApiError::UnsupportedType` without a request when the type has no
/// detail collection, otherwise as for [`fetch_grid_dataset`].
#[cfg(feature = "hydrate")]
pub async fn fetch_component_details(component_id: &str, component_type: &str) -> Result<serde_json::Value, ApiError> {
    let url = detail_endpoint(component_type, component_id)?;
    get_json(&url).await
}
