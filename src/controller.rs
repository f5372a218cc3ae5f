//! Interaction controller: owns the live view transform and the timing state
//! around it.
//!
//! Nothing here touches the browser. Timers and animation frames are
//! represented as tickets and flags; the host arms the real timer, and when
//! it fires asks the controller whether that ticket is still the latest.
//! Superseded tickets are ignored, so only the most recent scheduled work
//! ever runs.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use crate::camera::{Point, ViewTransform, Viewport};
use crate::consts::{DRAG_CLICK_TOLERANCE_PX, PINCH_MIN_SPAN_PX, WHEEL_ZOOM_SENSITIVITY};
use crate::input::{Button, PointerId, PointerState, TrackedPointer, WheelDelta};
use crate::options::EngineOptions;

// =============================================================
// Debouncing
// =============================================================

/// Handle for one scheduled debounce firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Single-slot debouncer. Scheduling again supersedes the pending ticket.
#[derive(Debug, Clone, Default)]
pub struct Debouncer {
    generation: u64,
    pending: bool,
}

impl Debouncer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule (or reschedule) the work. Earlier tickets become stale.
    pub fn schedule(&mut self) -> Ticket {
        self.generation += 1;
        self.pending = true;
        Ticket(self.generation)
    }

    /// Called when a timer fires. Returns `true` only for the latest live ticket,
    /// and consumes it.
    pub fn fire(&mut self, ticket: Ticket) -> bool {
        if self.pending && ticket.0 == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Drop the pending ticket, if any.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Coalesces redraw requests: at most one animation frame pending at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameRequest {
    pending: bool,
}

impl FrameRequest {
    /// Mark a redraw as wanted. Returns `true` if the host must request a new frame.
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    /// Called from the frame callback. Returns `true` if a redraw was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

// =============================================================
// Request ids
// =============================================================

/// Identity of one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(pub u64);

/// Monotonic request-id allocator. Only the latest id is current.
#[derive(Debug, Clone, Default)]
pub struct RequestCounter {
    latest: u64,
}

impl RequestCounter {
    pub fn next_id(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    /// Whether `id` is the most recently issued request.
    #[must_use]
    pub fn is_current(&self, id: RequestId) -> bool {
        id.0 == self.latest && self.latest != 0
    }

    /// Make every outstanding request stale.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

// =============================================================
// Zoom animation
// =============================================================

/// Cubic ease-in-out on `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = (-2.0f64).mul_add(t, 2.0);
        1.0 - u * u * u / 2.0
    }
}

/// An in-flight animated zoom between two view transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomAnimation {
    pub from: ViewTransform,
    pub to: ViewTransform,
    pub start_ms: f64,
    pub duration_ms: f64,
}

impl ZoomAnimation {
    /// Interpolated transform at `now_ms`, and whether the animation has finished.
    #[must_use]
    pub fn sample(&self, now_ms: f64) -> (ViewTransform, bool) {
        if self.duration_ms <= 0.0 {
            return (self.to, true);
        }
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        if t >= 1.0 {
            return (self.to, true);
        }
        let e = ease_in_out_cubic(t);
        let lerp = |a: f64, b: f64| (b - a).mul_add(e, a);
        let view = ViewTransform::new(
            lerp(self.from.x, self.to.x),
            lerp(self.from.y, self.to.y),
            lerp(self.from.k, self.to.k),
        );
        (view, false)
    }
}

// =============================================================
// Controller
// =============================================================

/// The view a dataset opens at: no pan, zoom 1 clamped into the configured range.
#[must_use]
pub fn home_view(options: &EngineOptions) -> ViewTransform {
    ViewTransform::new(0.0, 0.0, options.clamp_zoom(1.0))
}

/// Live pan/zoom state plus the debounce and frame bookkeeping around it.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    view: ViewTransform,
    animation: Option<ZoomAnimation>,
    pointer: PointerState,
    pub fetch: Debouncer,
    pub resize: Debouncer,
    pub frame: FrameRequest,
    pub dataset_requests: RequestCounter,
    pub detail_requests: RequestCounter,
}

impl InteractionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current view transform.
    #[must_use]
    pub fn view(&self) -> ViewTransform {
        self.view
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Jump to `view` immediately, dropping any animation.
    pub fn set_view(&mut self, view: ViewTransform) {
        self.animation = None;
        self.view = view;
    }

    // --- Zoom buttons ---

    /// Animate a multiplicative zoom about the canvas center.
    pub fn zoom_by(&mut self, factor: f64, viewport: Viewport, now_ms: f64, options: &EngineOptions) {
        let target_k = options.clamp_zoom(self.view.k * factor);
        let to = self.view.zoomed_about(viewport.center(), target_k);
        self.animate_to(to, now_ms, options);
    }

    pub fn zoom_in(&mut self, viewport: Viewport, now_ms: f64, options: &EngineOptions) {
        self.zoom_by(options.zoom_in_factor, viewport, now_ms, options);
    }

    pub fn zoom_out(&mut self, viewport: Viewport, now_ms: f64, options: &EngineOptions) {
        self.zoom_by(options.zoom_out_factor, viewport, now_ms, options);
    }

    /// Animate back to the home view.
    pub fn reset_zoom(&mut self, now_ms: f64, options: &EngineOptions) {
        self.animate_to(home_view(options), now_ms, options);
    }

    /// Start an animation from the current (possibly mid-animation) view.
    /// A newer zoom supersedes the previous one.
    fn animate_to(&mut self, to: ViewTransform, now_ms: f64, options: &EngineOptions) {
        self.animation = Some(ZoomAnimation {
            from: self.view,
            to,
            start_ms: now_ms,
            duration_ms: options.zoom_animation_ms,
        });
        self.tick(now_ms);
    }

    /// Advance the animation. Returns `true` while more frames are needed.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let Some(anim) = self.animation else {
            return false;
        };
        let (view, done) = anim.sample(now_ms);
        self.view = view;
        if done {
            self.animation = None;
        }
        !done
    }

    // --- Wheel ---

    /// Zoom about `anchor` (canvas CSS pixels) by the wheel's vertical delta.
    /// Returns `true` if the view changed.
    pub fn wheel(&mut self, delta: WheelDelta, anchor: Point, options: &EngineOptions) -> bool {
        self.animation = None;
        let factor = (-delta.dy * WHEEL_ZOOM_SENSITIVITY).exp();
        let k = options.clamp_zoom(self.view.k * factor);
        if (k - self.view.k).abs() < f64::EPSILON {
            return false;
        }
        self.view = self.view.zoomed_about(anchor, k);
        true
    }

    // --- Pointer gestures ---

    /// Press pointer `id`. A primary press starts a pan; a second pointer
    /// while panning turns the gesture into a pinch. Further pointers are
    /// ignored.
    pub fn pointer_down(&mut self, id: PointerId, pt: Point, button: Button) {
        if button != Button::Primary {
            return;
        }
        match self.pointer {
            PointerState::Idle => {
                self.animation = None;
                self.pointer = PointerState::Panning { id, origin: pt, last_screen: pt, dragged: false };
            }
            PointerState::Panning { id: first, last_screen, .. } if first != id => {
                self.pointer = PointerState::Pinching {
                    a: TrackedPointer { id: first, pos: last_screen },
                    b: TrackedPointer { id, pos: pt },
                };
            }
            PointerState::Panning { .. } | PointerState::Pinching { .. } => {}
        }
    }

    /// Move pointer `id`. Pans or pinch-zooms as the gesture dictates.
    /// Returns `true` if the view moved.
    pub fn pointer_move(&mut self, id: PointerId, pt: Point, options: &EngineOptions) -> bool {
        match self.pointer {
            PointerState::Idle => false,
            PointerState::Panning { id: own, origin, last_screen, dragged } => {
                if own != id {
                    return false;
                }
                let dragged = dragged || origin.distance(pt) > DRAG_CLICK_TOLERANCE_PX;
                self.pointer = PointerState::Panning { id, origin, last_screen: pt, dragged };
                if !dragged {
                    return false;
                }
                self.view = self.view.panned(pt.x - last_screen.x, pt.y - last_screen.y);
                true
            }
            PointerState::Pinching { a, b } => {
                let (next_a, next_b) = if a.id == id {
                    (TrackedPointer { id, pos: pt }, b)
                } else if b.id == id {
                    (a, TrackedPointer { id, pos: pt })
                } else {
                    return false;
                };
                self.pointer = PointerState::Pinching { a: next_a, b: next_b };
                self.pinch(a.pos, b.pos, next_a.pos, next_b.pos, options)
            }
        }
    }

    /// Apply one pinch step: follow the midpoint, then scale about it by the
    /// change in span.
    fn pinch(&mut self, a0: Point, b0: Point, a1: Point, b1: Point, options: &EngineOptions) -> bool {
        let (d0, d1) = (a0.distance(b0), a1.distance(b1));
        if d0 < PINCH_MIN_SPAN_PX || d1 < PINCH_MIN_SPAN_PX {
            return false;
        }
        let (m0, m1) = (a0.midpoint(b0), a1.midpoint(b1));
        let k = options.clamp_zoom(self.view.k * d1 / d0);
        let next = self.view.panned(m1.x - m0.x, m1.y - m0.y).zoomed_about(m1, k);
        if next == self.view {
            return false;
        }
        self.view = next;
        true
    }

    /// Release pointer `id`. Returns `true` when the gesture was a single
    /// press that never became a drag, meaning the host should treat it as a
    /// click. Lifting one finger of a pinch continues as a pan with the other,
    /// and that pan never clicks.
    pub fn pointer_up(&mut self, id: PointerId) -> bool {
        match self.pointer {
            PointerState::Idle => false,
            PointerState::Panning { id: own, dragged, .. } => {
                if own != id {
                    return false;
                }
                self.pointer = PointerState::Idle;
                !dragged
            }
            PointerState::Pinching { a, b } => {
                let rest = if a.id == id {
                    b
                } else if b.id == id {
                    a
                } else {
                    return false;
                };
                self.pointer = PointerState::Panning { id: rest.id, origin: rest.pos, last_screen: rest.pos, dragged: true };
                false
            }
        }
    }

    /// The browser took pointer `id` away (cancel or lost capture). Ends the
    /// gesture it belongs to without a click. Returns `true` if a gesture ended.
    pub fn pointer_cancel(&mut self, id: PointerId) -> bool {
        if !self.pointer.tracks(id) {
            return false;
        }
        self.pointer = PointerState::Idle;
        true
    }

    /// Cancel every pending timer, frame and gesture, and make in-flight fetches stale.
    pub fn teardown(&mut self) {
        self.fetch.cancel();
        self.resize.cancel();
        self.frame.cancel();
        self.animation = None;
        self.pointer = PointerState::Idle;
        self.dataset_requests.invalidate();
        self.detail_requests.invalidate();
    }
}
