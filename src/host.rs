//! Browser host: binds an [`EngineCore`] to a canvas element.
//!
//! ARCHITECTURE
//! ============
//! `FeederView` is the JS-facing handle. It owns the canvas, its 2D context,
//! the DOM listeners, the debounce timers and the animation-frame callback.
//! Every event is forwarded to the core and the returned actions are carried
//! out here. Callbacks hold only a weak reference to the host, so nothing
//! keeps a destroyed view alive.
//!
//! TEARDOWN
//! ========
//! `destroy()` cancels the core's pending work, drops both timers, cancels
//! the outstanding animation frame and removes every listener. Fetches still
//! in flight complete into a core whose request ids are stale and are
//! discarded.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use crate::api;
use crate::camera::Point;
use crate::engine::{Action, CURSOR_IDLE, EngineCore};
use crate::hit::pointer_to_canvas;
use crate::input::{Button, Modifiers, WheelDelta};
use crate::options::EngineOptions;

/// `WheelEvent.deltaMode` for line-based deltas.
const DOM_DELTA_LINE: u32 = 1;
/// Pixels per wheel line.
const WHEEL_LINE_PX: f64 = 16.0;

type Listener = Closure<dyn FnMut(Event)>;

struct Host {
    canvas: HtmlCanvasElement,
    ctx: RefCell<CanvasRenderingContext2d>,
    core: RefCell<EngineCore>,
    fetch_timer: RefCell<Option<Timeout>>,
    resize_timer: RefCell<Option<Timeout>>,
    frame_id: Cell<Option<i32>>,
    frame_cb: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    listeners: RefCell<Vec<(EventTarget, &'static str, Listener)>>,
    popup_handler: RefCell<Option<js_sys::Function>>,
    error_handler: RefCell<Option<js_sys::Function>>,
}

/// Interactive single-line diagram bound to one canvas element.
#[wasm_bindgen]
pub struct FeederView {
    host: Rc<Host>,
}

#[wasm_bindgen]
impl FeederView {
    /// Attach to `canvas`. `options_json` overrides [`EngineOptions`] defaults.
    ///
    /// # Errors
    ///
    /// Fails if the options are invalid or the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, options_json: Option<String>) -> Result<FeederView, JsValue> {
        let options = match options_json.as_deref() {
            Some(raw) => EngineOptions::from_json(raw).map_err(|e| {
                log::warn!("rejected viewer options: {e}");
                JsValue::from_str(&e.to_string())
            })?,
            None => EngineOptions::default(),
        };
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let host = Rc::new(Host {
            canvas,
            ctx: RefCell::new(ctx),
            core: RefCell::new(EngineCore::new(options)),
            fetch_timer: RefCell::new(None),
            resize_timer: RefCell::new(None),
            frame_id: Cell::new(None),
            frame_cb: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            popup_handler: RefCell::new(None),
            error_handler: RefCell::new(None),
        });
        install_frame_callback(&host);
        install_listeners(&host)?;
        set_style(&host, "touch-action", "none");
        set_cursor(&host, CURSOR_IDLE);
        sync_size(&host);
        Ok(FeederView { host })
    }

    /// Called with the popup JSON on every popup change, or `null` when it closes.
    #[wasm_bindgen(js_name = onPopup)]
    pub fn on_popup(&self, handler: js_sys::Function) {
        *self.host.popup_handler.borrow_mut() = Some(handler);
    }

    /// Called with a message when a dataset fetch fails.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, handler: js_sys::Function) {
        *self.host.error_handler.borrow_mut() = Some(handler);
    }

    #[wasm_bindgen(js_name = setFeeder)]
    pub fn set_feeder(&self, feeder_id: &str) {
        let actions = self.host.core.borrow_mut().set_feeder(feeder_id);
        dispatch(&self.host, actions);
    }

    /// Replace the type filter. An empty list shows everything.
    #[wasm_bindgen(js_name = setFilter)]
    pub fn set_filter(&self, tags: Vec<String>) {
        let actions = self.host.core.borrow_mut().set_filter(tags);
        dispatch(&self.host, actions);
    }

    /// Whether the page should show the type filter legend.
    #[wasm_bindgen(getter, js_name = showFilter)]
    pub fn show_filter(&self) -> bool {
        self.host.core.borrow().options().show_filter
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        let actions = self.host.core.borrow_mut().zoom_in(now_ms());
        dispatch(&self.host, actions);
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        let actions = self.host.core.borrow_mut().zoom_out(now_ms());
        dispatch(&self.host, actions);
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        let actions = self.host.core.borrow_mut().reset_zoom(now_ms());
        dispatch(&self.host, actions);
    }

    /// Show details for row `index` of the open popup.
    #[wasm_bindgen(js_name = selectHit)]
    pub fn select_hit(&self, index: usize) {
        let actions = self.host.core.borrow_mut().select_hit(index);
        dispatch(&self.host, actions);
    }

    #[wasm_bindgen(js_name = closePopup)]
    pub fn close_popup(&self) {
        let actions = self.host.core.borrow_mut().close_popup();
        dispatch(&self.host, actions);
    }

    /// Re-read the canvas size after a layout change the window did not report.
    pub fn resize(&self) {
        sync_size(&self.host);
    }

    /// Cancel timers and frames and remove listeners. The view is inert afterwards.
    pub fn destroy(&self) {
        teardown(&self.host);
    }
}

// `free()` from JS without `destroy()` must still unhook the DOM before the
// closures go away. Teardown is idempotent.
impl Drop for FeederView {
    fn drop(&mut self) {
        teardown(&self.host);
    }
}

fn teardown(host: &Host) {
    host.core.borrow_mut().teardown();
    host.fetch_timer.borrow_mut().take();
    host.resize_timer.borrow_mut().take();
    if let Some(id) = host.frame_id.take() {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.cancel_animation_frame(id) {
                log::warn!("cancel_animation_frame failed: {err:?}");
            }
        }
    }
    for (target, name, listener) in host.listeners.borrow_mut().drain(..) {
        if let Err(err) = target.remove_event_listener_with_callback(name, listener.as_ref().unchecked_ref()) {
            log::warn!("failed to remove {name} listener: {err:?}");
        }
    }
    host.frame_cb.borrow_mut().take();
    host.popup_handler.borrow_mut().take();
    host.error_handler.borrow_mut().take();
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}

// =============================================================
// Action dispatch
// =============================================================

fn dispatch(host: &Rc<Host>, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::RenderNeeded => request_frame(host),
            Action::ScheduleFetch { ticket, delay_ms } => {
                let weak = Rc::downgrade(host);
                let timer = Timeout::new(delay_ms, move || {
                    with_host(&weak, |host| {
                        let actions = host.core.borrow_mut().on_fetch_timer(ticket);
                        dispatch(host, actions);
                    });
                });
                *host.fetch_timer.borrow_mut() = Some(timer);
            }
            Action::ScheduleResize { ticket, delay_ms } => {
                let weak = Rc::downgrade(host);
                let timer = Timeout::new(delay_ms, move || {
                    with_host(&weak, |host| {
                        let actions = host.core.borrow_mut().on_resize_timer(ticket);
                        dispatch(host, actions);
                    });
                });
                *host.resize_timer.borrow_mut() = Some(timer);
            }
            Action::FetchDataset { request, feeder_id } => {
                let weak = Rc::downgrade(host);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = api::fetch_grid_dataset(&feeder_id).await;
                    with_host(&weak, |host| {
                        let actions = host.core.borrow_mut().on_dataset_loaded(request, result);
                        dispatch(host, actions);
                    });
                });
            }
            Action::FetchDetails { request, component_id, component_type } => {
                let weak = Rc::downgrade(host);
                wasm_bindgen_futures::spawn_local(async move {
                    let result = api::fetch_component_details(&component_id, &component_type).await;
                    with_host(&weak, |host| {
                        let actions = host.core.borrow_mut().on_details_loaded(request, result);
                        dispatch(host, actions);
                    });
                });
            }
            Action::ShowPopup(popup) => {
                let payload = JsValue::from_str(&popup.to_json().to_string());
                call_handler(&host.popup_handler, &payload);
            }
            Action::HidePopup => call_handler(&host.popup_handler, &JsValue::NULL),
            Action::DatasetFailed(message) => call_handler(&host.error_handler, &JsValue::from_str(&message)),
            Action::SetCursor(cursor) => set_cursor(host, cursor),
        }
    }
}

fn with_host(weak: &Weak<Host>, f: impl FnOnce(&Rc<Host>)) {
    if let Some(host) = weak.upgrade() {
        f(&host);
    }
}

fn call_handler(slot: &RefCell<Option<js_sys::Function>>, arg: &JsValue) {
    let Some(handler) = slot.borrow().clone() else {
        return;
    };
    if let Err(err) = handler.call1(&JsValue::NULL, arg) {
        log::warn!("page handler threw: {err:?}");
    }
}

fn set_cursor(host: &Host, cursor: &str) {
    set_style(host, "cursor", cursor);
}

fn set_style(host: &Host, property: &str, value: &str) {
    if let Err(err) = host.canvas.style().set_property(property, value) {
        log::warn!("failed to set {property}: {err:?}");
    }
}

// =============================================================
// Frames
// =============================================================

fn install_frame_callback(host: &Rc<Host>) {
    let weak = Rc::downgrade(host);
    let cb = Closure::wrap(Box::new(move |ts: f64| {
        with_host(&weak, |host| {
            host.frame_id.set(None);
            let draw = host.core.borrow_mut().on_frame(ts);
            if draw {
                let core = host.core.borrow();
                let mut ctx = host.ctx.borrow_mut();
                if let Err(err) = core.render(&mut *ctx) {
                    log::warn!("render failed: {err:?}");
                }
            }
            if host.core.borrow().frame_pending() {
                request_frame(host);
            }
        });
    }) as Box<dyn FnMut(f64)>);
    *host.frame_cb.borrow_mut() = Some(cb);
}

/// Ask the browser for a frame unless one is already outstanding.
fn request_frame(host: &Rc<Host>) {
    if host.frame_id.get().is_some() {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    let frame_cb = host.frame_cb.borrow();
    let Some(cb) = frame_cb.as_ref() else {
        return;
    };
    match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
        Ok(id) => host.frame_id.set(Some(id)),
        Err(err) => log::warn!("request_animation_frame failed: {err:?}"),
    }
}

// =============================================================
// Sizing
// =============================================================

/// Read the canvas CSS size, resize the backing store and tell the core.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sync_size(host: &Rc<Host>) {
    let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio()).max(1.0);
    let width = f64::from(host.canvas.client_width()).max(1.0);
    let height = f64::from(host.canvas.client_height()).max(1.0);
    let actions = host.core.borrow_mut().resize_container(width, height, dpr);
    let vp = host.core.borrow().viewport();
    // Fixed sizing pins the CSS box too, so pointer coordinates match drawing coordinates.
    let fixed = host.core.borrow().options().fixed_css_size();
    if let Some((width, height)) = fixed {
        set_style(host, "width", &width);
        set_style(host, "height", &height);
    }
    host.canvas.set_width((vp.width * vp.dpr).round() as u32);
    host.canvas.set_height((vp.height * vp.dpr).round() as u32);
    dispatch(host, actions);
    // Resizing the backing store clears it; redraw with the current scales.
    let repaint = host.core.borrow_mut().request_redraw();
    dispatch(host, repaint);
}

// =============================================================
// Listeners
// =============================================================

fn listen(host: &Rc<Host>, target: EventTarget, name: &'static str, mut f: impl FnMut(&Rc<Host>, Event) + 'static) -> Result<(), JsValue> {
    let weak = Rc::downgrade(host);
    let listener = Closure::wrap(Box::new(move |ev: Event| {
        with_host(&weak, |host| f(host, ev));
    }) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref())?;
    host.listeners.borrow_mut().push((target, name, listener));
    Ok(())
}

fn modifiers(ev: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: ev.shift_key(),
        ctrl: ev.ctrl_key(),
        alt: ev.alt_key(),
        meta: ev.meta_key(),
    }
}

fn client_point(ev: &MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

fn canvas_point(host: &Host, client: Point) -> Point {
    let rect = host.canvas.get_bounding_client_rect();
    pointer_to_canvas(client, rect.left(), rect.top())
}

fn install_listeners(host: &Rc<Host>) -> Result<(), JsValue> {
    let canvas: EventTarget = host.canvas.clone().into();

    listen(host, canvas.clone(), "pointerdown", |host, ev| {
        let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
            return;
        };
        let Some(button) = Button::from_dom(ev.button()) else {
            return;
        };
        if let Err(err) = host.canvas.set_pointer_capture(ev.pointer_id()) {
            log::debug!("pointer capture refused: {err:?}");
        }
        let pt = canvas_point(host, client_point(ev));
        let actions = host.core.borrow_mut().on_pointer_down(ev.pointer_id(), pt, button);
        dispatch(host, actions);
    })?;

    listen(host, canvas.clone(), "pointermove", |host, ev| {
        let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
            return;
        };
        let pt = canvas_point(host, client_point(ev));
        let actions = host.core.borrow_mut().on_pointer_move(ev.pointer_id(), pt);
        dispatch(host, actions);
    })?;

    listen(host, canvas.clone(), "pointerup", |host, ev| {
        let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
            return;
        };
        if host.canvas.has_pointer_capture(ev.pointer_id()) {
            if let Err(err) = host.canvas.release_pointer_capture(ev.pointer_id()) {
                log::debug!("pointer release failed: {err:?}");
            }
        }
        let client = client_point(ev);
        let pt = canvas_point(host, client);
        let actions = host.core.borrow_mut().on_pointer_up(ev.pointer_id(), pt, client, modifiers(ev));
        dispatch(host, actions);
    })?;

    // The browser took the pointer away; end the gesture without a click.
    for name in ["pointercancel", "lostpointercapture"] {
        listen(host, canvas.clone(), name, |host, ev| {
            let Some(ev) = ev.dyn_ref::<PointerEvent>() else {
                return;
            };
            let actions = host.core.borrow_mut().on_pointer_cancel(ev.pointer_id());
            dispatch(host, actions);
        })?;
    }

    listen(host, canvas, "wheel", |host, ev| {
        let Some(ev) = ev.dyn_ref::<WheelEvent>() else {
            return;
        };
        ev.prevent_default();
        let scale = if ev.delta_mode() == DOM_DELTA_LINE { WHEEL_LINE_PX } else { 1.0 };
        let delta = WheelDelta { dx: ev.delta_x() * scale, dy: ev.delta_y() * scale };
        let pt = canvas_point(host, client_point(ev));
        let actions = host.core.borrow_mut().on_wheel(pt, delta);
        dispatch(host, actions);
    })?;

    if let Some(window) = web_sys::window() {
        listen(host, window.into(), "resize", |host, _| sync_size(host))?;
    }
    Ok(())
}
