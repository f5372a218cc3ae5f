//! Input model: modifier keys, mouse buttons, wheel deltas and pointer gestures.
//!
//! These types carry what the host observed at the time of a pointer event.
//! `PointerState` tracks the gesture in progress between the first
//! pointer-down and the last pointer-up: a one-pointer drag-to-pan or a
//! two-pointer pinch. Only a one-pointer press that never moved past the
//! click tolerance counts as a click on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::options::BypassModifier;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether the configured selection-bypass key is held.
    #[must_use]
    pub fn holds(self, key: BypassModifier) -> bool {
        match key {
            BypassModifier::Shift => self.shift,
            BypassModifier::Ctrl => self.ctrl,
            BypassModifier::Alt => self.alt,
            BypassModifier::Meta => self.meta,
        }
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code. Back/forward buttons are ignored.
    #[must_use]
    pub fn from_dom(code: i16) -> Option<Self> {
        match code {
            0 => Some(Self::Primary),
            1 => Some(Self::Middle),
            2 => Some(Self::Secondary),
            _ => None,
        }
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// DOM `PointerEvent.pointerId`.
pub type PointerId = i32;

/// One pointer taking part in a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedPointer {
    pub id: PointerId,
    /// Position at the previous event, in canvas CSS pixels.
    pub pos: Point,
}

/// Gesture state between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PointerState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// One pointer is dragging the canvas.
    Panning {
        id: PointerId,
        /// Where the pointer went down, in canvas CSS pixels.
        origin: Point,
        /// Position at the previous event, used to compute the pan delta.
        last_screen: Point,
        /// Set once the pointer has strayed past the click tolerance, or the
        /// gesture was ever a pinch. A dragged gesture never clicks.
        dragged: bool,
    },
    /// Two pointers are pinching.
    Pinching { a: TrackedPointer, b: TrackedPointer },
}

impl PointerState {
    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        matches!(self, Self::Panning { .. })
    }

    #[must_use]
    pub fn is_pinching(&self) -> bool {
        matches!(self, Self::Pinching { .. })
    }

    /// Whether pointer `id` takes part in the current gesture.
    #[must_use]
    pub fn tracks(&self, id: PointerId) -> bool {
        match *self {
            Self::Idle => false,
            Self::Panning { id: own, .. } => own == id,
            Self::Pinching { a, b } => a.id == id || b.id == id,
        }
    }
}
