//! Gesture state machine gating transform mutation.
//!
//! The transition rules encode gesture priority: an active pinch or
//! animation is never interrupted by a drag, a release during a scroll may
//! promote to a fling, and a pinch may hand over to an animation for the
//! overpinch correction. Every state can fall back to idle.

/// Engine activity state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureState {
    /// No active gesture or animation; the transform is within bounds.
    Idle,
    /// A drag gesture is moving the content.
    Scrolling,
    /// A pinch gesture is changing the zoom about a focus point.
    Pinching,
    /// A fling trajectory is stepping the pan once per frame.
    Flinging,
    /// A programmatic transition is interpolating zoom and/or pan.
    Animating,
}

/// Result of a state transition request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StateChange {
    /// The machine moved into the requested state.
    Entered { from: GestureState },
    /// The machine was already in the requested state.
    AlreadyThere,
    /// The transition is not allowed from the current state.
    Denied,
}

/// Tracks the current [`GestureState`] and enforces the transition matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct StateMachine {
    current: GestureState,
}

impl Default for GestureState {
    fn default() -> Self {
        GestureState::Idle
    }
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            current: GestureState::Idle,
        }
    }

    pub fn current(&self) -> GestureState {
        self.current
    }

    /// Requests a transition into `next`. Side effects (cancelling motion,
    /// idle notification) are the caller's responsibility, driven by the
    /// returned [`StateChange`].
    pub fn try_enter(&mut self, next: GestureState) -> StateChange {
        use GestureState::*;

        if next == self.current {
            return StateChange::AlreadyThere;
        }
        let allowed = match (self.current, next) {
            (Idle, _) => true,
            (_, Idle) => true,
            (Scrolling, Flinging) => true,
            (Pinching, Animating) => true,
            _ => false,
        };
        if !allowed {
            return StateChange::Denied;
        }
        let from = self.current;
        self.current = next;
        StateChange::Entered { from }
    }
}
