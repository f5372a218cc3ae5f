//! Interactive single-line diagram of an electrical distribution feeder.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It fetches a
//! feeder's components and lines, projects them onto a canvas (geographic or
//! cartesian, detected per dataset), fans out components that share a
//! position, and draws the diagram. Pan, wheel and pinch zoom, animated
//! button zoom, type filtering and click-to-inspect popups are handled here;
//! the host page supplies the canvas and renders the popup from the JSON it is
//! handed.
//!
//! Everything except `host` and `logging` is plain Rust and runs under
//! native tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the [`engine::Action`]s it emits |
//! | [`model`] | Dataset, component and line types; component kinds |
//! | [`coords`] | Coordinate system detection and data-space projection |
//! | [`scale`] | Independent per-axis linear data-to-pixel scales |
//! | [`camera`] | View transform, viewport and the ordered transform stack |
//! | [`collision`] | Deterministic fan-out of co-located markers |
//! | [`session`] | Per-dataset placements and projected line paths |
//! | [`render`] | Scene drawing onto a [`surface::Surface`] |
//! | [`surface`] | Drawing backend seam |
//! | [`hit`] | Hit testing and click classification |
//! | [`input`] | Pointer, wheel and modifier types; pan and pinch gesture state |
//! | [`controller`] | Pan/zoom state, animation, debouncing, request ids |
//! | [`filter`] | Visible component kinds |
//! | [`popup`] | Popup rows and detail loading state |
//! | [`api`] | REST endpoints and fetch helpers |
//! | [`options`] | Embedder configuration |
//! | [`consts`] | Shared numeric constants (zoom limits, radii, delays) |
//! | `host` | `FeederView` browser binding (`hydrate` only) |
//! | `logging` | Console logger setup (`hydrate` only) |

pub mod api;
pub mod camera;
pub mod collision;
pub mod consts;
pub mod controller;
pub mod coords;
pub mod engine;
pub mod filter;
pub mod hit;
pub mod input;
pub mod model;
pub mod options;
pub mod popup;
pub mod render;
pub mod scale;
pub mod session;
pub mod surface;

#[cfg(feature = "hydrate")]
pub mod host;
#[cfg(feature = "hydrate")]
pub mod logging;

#[cfg(feature = "hydrate")]
pub use host::FeederView;
#[cfg(feature = "hydrate")]
pub use logging::init_logging;
