//! Engine core: every piece of viewer state and every interaction, with no
//! browser dependency.
//!
//! Input handlers return `Vec<Action>` describing what the host must do next
//! (arm a timer, start a fetch, request a frame, show a popup). The browser
//! host (`host` module, `hydrate` only) performs those actions and feeds results back in.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::api::{self, ApiError};
use crate::camera::{Point, ViewTransform, Viewport};
use crate::controller::{self, InteractionController, RequestId, Ticket};
use crate::filter::TypeFilter;
use crate::hit::{self, ClickOutcome};
use crate::input::{Button, Modifiers, PointerId, WheelDelta};
use crate::model::{ComponentKind, GridDataset};
use crate::options::{CanvasSizing, EngineOptions};
use crate::popup::PopupState;
use crate::render;
use crate::session::RenderSession;
use crate::surface::Surface;

/// Cursor shown while idle over the canvas.
pub const CURSOR_IDLE: &str = "grab";
/// Cursor shown while dragging.
pub const CURSOR_PANNING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Request an animation frame; the frame callback calls [`EngineCore::on_frame`].
    RenderNeeded,
    /// Arm the fetch debounce timer; when it fires call [`EngineCore::on_fetch_timer`].
    ScheduleFetch { ticket: Ticket, delay_ms: u32 },
    /// Arm the resize debounce timer; when it fires call [`EngineCore::on_resize_timer`].
    ScheduleResize { ticket: Ticket, delay_ms: u32 },
    /// Fetch a grid dataset and pass the result to [`EngineCore::on_dataset_loaded`].
    FetchDataset { request: RequestId, feeder_id: String },
    /// Fetch component details and pass the result to [`EngineCore::on_details_loaded`].
    FetchDetails { request: RequestId, component_id: String, component_type: String },
    /// Show (or refresh) the popup with this state.
    ShowPopup(PopupState),
    HidePopup,
    /// A dataset fetch failed; the previous view stays on screen.
    DatasetFailed(String),
    SetCursor(&'static str),
}

/// Core engine state: everything that does not depend on the canvas element.
///
/// Separated from the browser host so it can be tested natively.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    options: EngineOptions,
    viewport: Viewport,
    session: Option<RenderSession>,
    controller: InteractionController,
    filter: TypeFilter,
    popup: Option<PopupState>,
    feeder_id: Option<String>,
}

impl EngineCore {
    #[must_use]
    pub fn new(options: EngineOptions) -> Self {
        Self { options, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn view(&self) -> ViewTransform {
        self.controller.view()
    }

    #[must_use]
    pub fn session(&self) -> Option<&RenderSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    #[must_use]
    pub fn popup(&self) -> Option<&PopupState> {
        self.popup.as_ref()
    }

    #[must_use]
    pub fn feeder_id(&self) -> Option<&str> {
        self.feeder_id.as_deref()
    }

    /// Whether a redraw frame is outstanding.
    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.controller.frame.is_pending()
    }

    // --- Rendering ---

    /// Draw the current state.
    ///
    /// # Errors
    ///
    /// Propagates surface failures.
    pub fn render<S: Surface>(&self, surface: &mut S) -> Result<(), S::Error> {
        render::draw(
            surface,
            self.session.as_ref(),
            &self.controller.view(),
            &self.filter,
            &self.options,
            self.viewport,
        )
    }

    /// Frame callback. Advances any zoom animation and returns `true` when the
    /// host should draw. Keeps requesting frames while an animation runs.
    pub fn on_frame(&mut self, now_ms: f64) -> bool {
        if !self.controller.frame.take() {
            return false;
        }
        if self.controller.tick(now_ms) {
            self.controller.frame.request();
        }
        true
    }

    /// Ask for a redraw with the current state, e.g. after the backing store was cleared.
    pub fn request_redraw(&mut self) -> Vec<Action> {
        self.request_render()
    }

    fn request_render(&mut self) -> Vec<Action> {
        if self.controller.frame.request() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // --- Dataset ---

    /// Select a feeder. The fetch runs after the debounce delay; only the
    /// latest selection is fetched.
    pub fn set_feeder(&mut self, feeder_id: &str) -> Vec<Action> {
        self.feeder_id = Some(feeder_id.to_owned());
        let ticket = self.controller.fetch.schedule();
        vec![Action::ScheduleFetch { ticket, delay_ms: self.options.fetch_debounce_ms }]
    }

    /// Fetch debounce timer fired.
    pub fn on_fetch_timer(&mut self, ticket: Ticket) -> Vec<Action> {
        if !self.controller.fetch.fire(ticket) {
            return Vec::new();
        }
        let Some(feeder_id) = self.feeder_id.clone() else {
            return Vec::new();
        };
        let request = self.controller.dataset_requests.next_id();
        log::debug!("fetching grid for feeder {feeder_id} (request {})", request.0);
        vec![Action::FetchDataset { request, feeder_id }]
    }

    /// A dataset fetch finished. Results from superseded requests are dropped.
    pub fn on_dataset_loaded(&mut self, request: RequestId, result: Result<GridDataset, ApiError>) -> Vec<Action> {
        if !self.controller.dataset_requests.is_current(request) {
            log::debug!("discarding stale dataset response (request {})", request.0);
            return Vec::new();
        }
        match result {
            Ok(dataset) => self.load_dataset(dataset),
            Err(err) => {
                log::warn!("grid fetch failed: {err}");
                vec![Action::DatasetFailed(err.user_message())]
            }
        }
    }

    /// Replace the dataset. Every derived cache is rebuilt and the view resets.
    pub fn load_dataset(&mut self, dataset: GridDataset) -> Vec<Action> {
        self.session = Some(RenderSession::load(dataset, self.viewport, &self.options));
        self.controller.set_view(controller::home_view(&self.options));
        let mut actions = Vec::new();
        if self.popup.take().is_some() {
            actions.push(Action::HidePopup);
        }
        actions.extend(self.request_render());
        actions
    }

    // --- Viewport ---

    /// The container changed size. Scales are recomputed after the resize
    /// debounce; the first real size is applied immediately.
    pub fn resize_container(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        let (width, height) = match self.options.sizing {
            CanvasSizing::Fixed { width, height } => (width, height),
            CanvasSizing::Responsive => (width_css, height_css),
        };
        let next = Viewport::new(width, height, dpr);
        if next == self.viewport {
            return Vec::new();
        }
        let first = self.viewport.is_empty();
        self.viewport = next;
        if first {
            self.controller.resize.cancel();
            return self.apply_resize();
        }
        let ticket = self.controller.resize.schedule();
        vec![Action::ScheduleResize { ticket, delay_ms: self.options.resize_debounce_ms }]
    }

    /// Resize debounce timer fired.
    pub fn on_resize_timer(&mut self, ticket: Ticket) -> Vec<Action> {
        if !self.controller.resize.fire(ticket) {
            return Vec::new();
        }
        self.apply_resize()
    }

    fn apply_resize(&mut self) -> Vec<Action> {
        if let Some(session) = self.session.as_mut() {
            session.resize(self.viewport);
            log::debug!("rescaled to {}x{}", self.viewport.width, self.viewport.height);
        }
        self.request_render()
    }

    // --- Filter ---

    /// Replace the type filter with raw tags from the host UI. Ignored when
    /// the embedding has no filter UI.
    pub fn set_filter<S: AsRef<str>>(&mut self, tags: impl IntoIterator<Item = S>) -> Vec<Action> {
        if !self.options.show_filter {
            return Vec::new();
        }
        self.filter = TypeFilter::from_tags(tags);
        self.request_render()
    }

    pub fn toggle_kind(&mut self, kind: ComponentKind) -> Vec<Action> {
        if !self.options.show_filter {
            return Vec::new();
        }
        self.filter.toggle(kind);
        self.request_render()
    }

    // --- Zoom ---

    pub fn zoom_in(&mut self, now_ms: f64) -> Vec<Action> {
        self.controller.zoom_in(self.viewport, now_ms, &self.options);
        self.request_render()
    }

    pub fn zoom_out(&mut self, now_ms: f64) -> Vec<Action> {
        self.controller.zoom_out(self.viewport, now_ms, &self.options);
        self.request_render()
    }

    pub fn reset_zoom(&mut self, now_ms: f64) -> Vec<Action> {
        self.controller.reset_zoom(now_ms, &self.options);
        self.request_render()
    }

    // --- Pointer input ---

    pub fn on_wheel(&mut self, canvas_pt: Point, delta: WheelDelta) -> Vec<Action> {
        if self.controller.wheel(delta, canvas_pt, &self.options) {
            self.request_render()
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_down(&mut self, id: PointerId, canvas_pt: Point, button: Button) -> Vec<Action> {
        let was_active = self.controller.pointer().is_active();
        self.controller.pointer_down(id, canvas_pt, button);
        if !was_active && self.controller.pointer().is_active() {
            vec![Action::SetCursor(CURSOR_PANNING)]
        } else {
            Vec::new()
        }
    }

    pub fn on_pointer_move(&mut self, id: PointerId, canvas_pt: Point) -> Vec<Action> {
        if self.controller.pointer_move(id, canvas_pt, &self.options) {
            self.request_render()
        } else {
            Vec::new()
        }
    }

    /// Release a pointer. A single press that never became a drag is treated
    /// as a click; any gesture that involved a second pointer never is.
    pub fn on_pointer_up(&mut self, id: PointerId, canvas_pt: Point, client_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let was_active = self.controller.pointer().is_active();
        let was_click = self.controller.pointer_up(id);
        let mut actions = Vec::new();
        if was_active && !self.controller.pointer().is_active() {
            actions.push(Action::SetCursor(CURSOR_IDLE));
        }
        if was_click {
            actions.extend(self.click(canvas_pt, client_pt, modifiers));
        }
        actions
    }

    /// The browser cancelled a pointer or took its capture away. The gesture
    /// ends without a click.
    pub fn on_pointer_cancel(&mut self, id: PointerId) -> Vec<Action> {
        if self.controller.pointer_cancel(id) {
            vec![Action::SetCursor(CURSOR_IDLE)]
        } else {
            Vec::new()
        }
    }

    /// Hit-test a click and open or close the popup.
    pub fn click(&mut self, canvas_pt: Point, client_pt: Point, modifiers: Modifiers) -> Vec<Action> {
        let outcome = hit::classify_click(
            self.session.as_ref(),
            &self.controller.view(),
            &self.filter,
            &self.options,
            modifiers,
            canvas_pt,
            client_pt,
        );
        match outcome {
            ClickOutcome::Bypassed => Vec::new(),
            ClickOutcome::Hide => {
                self.popup = None;
                vec![Action::HidePopup]
            }
            ClickOutcome::Show { anchor, hits } => {
                let popup = PopupState::new(anchor, hits);
                self.popup = Some(popup.clone());
                vec![Action::ShowPopup(popup)]
            }
        }
    }

    // --- Popup ---

    pub fn close_popup(&mut self) -> Vec<Action> {
        self.controller.detail_requests.invalidate();
        if self.popup.take().is_some() { vec![Action::HidePopup] } else { Vec::new() }
    }

    /// Select a popup row and start its detail lookup.
    pub fn select_hit(&mut self, index: usize) -> Vec<Action> {
        let Some(popup) = self.popup.as_mut() else {
            return Vec::new();
        };
        let Some(hit) = popup.hits.get(index) else {
            return Vec::new();
        };
        if api::detail_segment(hit.kind).is_none() {
            let err = ApiError::UnsupportedType(hit.component_type.clone());
            log::debug!("{err}");
            popup.fail_detail(index, err.user_message());
            return vec![Action::ShowPopup(popup.clone())];
        }
        let request = self.controller.detail_requests.next_id();
        let Some(hit) = popup.begin_detail(index, request) else {
            return Vec::new();
        };
        let fetch = Action::FetchDetails {
            request,
            component_id: hit.id.clone(),
            component_type: hit.component_type.clone(),
        };
        vec![Action::ShowPopup(popup.clone()), fetch]
    }

    /// A detail lookup finished.
    pub fn on_details_loaded(&mut self, request: RequestId, result: Result<serde_json::Value, ApiError>) -> Vec<Action> {
        if !self.controller.detail_requests.is_current(request) {
            log::debug!("discarding stale detail response (request {})", request.0);
            return Vec::new();
        }
        let Some(popup) = self.popup.as_mut() else {
            return Vec::new();
        };
        let outcome = result.map_err(|err| {
            log::warn!("detail fetch failed: {err}");
            err.user_message()
        });
        if popup.finish_detail(request, outcome) {
            vec![Action::ShowPopup(popup.clone())]
        } else {
            Vec::new()
        }
    }

    // --- Teardown ---

    /// Cancel every pending timer, frame and fetch. Later callbacks become no-ops.
    pub fn teardown(&mut self) {
        self.controller.teardown();
        self.popup = None;
    }
}
