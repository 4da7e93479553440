//! The engine: gesture ingestion, programmatic API, animation and fling
//! drivers, and listener dispatch.
//!
//! All state lives behind a single `Rc<RefCell<..>>` mutated only on the
//! host's control thread. Animations and flings are frame callbacks that
//! re-register themselves until they finish or a state transition bumps
//! the cancellation generation, at which point the next step is a no-op.
//! Listener notifications are collected during a mutation and dispatched
//! after the state borrow is released, in mutation order.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;
use zoomable_animation::{AxisScroller, Easing, FlingCalculator, Lerp, Scroller};
use zoomable_core::{FrameCallbackRegistration, FrameLoopHandle};
use zoomable_graphics::{Alignment, Matrix, Size};

use crate::{
    AbsolutePan, FitPolicy, GestureState, LimitError, ScaledPan, StateChange, StateMachine,
    TransformState, Zoom, ZoomKind, ZoomOptions,
};

/// Multiplicative step applied by [`ZoomEngine::zoom_in`].
const ZOOM_IN_FACTOR: f32 = 1.3;
/// Multiplicative step applied by [`ZoomEngine::zoom_out`].
const ZOOM_OUT_FACTOR: f32 = 0.7;

/// Receives engine output. Updates fire after every successful mutation
/// step; idle fires exactly once per transition into the idle state, never
/// ahead of the update it follows.
pub trait ZoomListener {
    /// The transform changed. The matrix is a snapshot and can be stored.
    fn on_update(&self, matrix: &Matrix);

    /// No gesture or animation is active and the transform is within
    /// bounds.
    fn on_idle(&self);
}

#[derive(Clone, Copy, Debug)]
enum Notification {
    Update(Matrix),
    Idle,
}

type Notifications = SmallVec<[Notification; 2]>;
type Listeners = SmallVec<[Rc<dyn ZoomListener>; 2]>;

fn dispatch_notifications(listeners: &Rc<RefCell<Listeners>>, notes: &Notifications) {
    if notes.is_empty() {
        return;
    }
    let listeners = listeners.borrow().clone();
    for note in notes {
        for listener in &listeners {
            match note {
                Notification::Update(matrix) => listener.on_update(matrix),
                Notification::Idle => listener.on_idle(),
            }
        }
    }
}

/// Everything a frame step needs to reach back into the engine.
#[derive(Clone)]
struct StepContext {
    state: Weak<RefCell<EngineState>>,
    listeners: Rc<RefCell<Listeners>>,
    frame_loop: FrameLoopHandle,
}

#[derive(Clone, Copy, Debug)]
enum AnimationTarget {
    Zoom {
        start: Zoom,
        end: Zoom,
        allow_over_pinch: bool,
    },
    ZoomPan {
        zoom_start: Zoom,
        zoom_end: Zoom,
        pan_start: AbsolutePan,
        pan_end: AbsolutePan,
        allow_over_scroll: bool,
    },
}

#[derive(Clone, Copy)]
struct AnimationRun {
    target: AnimationTarget,
    start_time_nanos: Option<u64>,
    duration_ms: u64,
    easing: Easing,
    generation: u64,
}

#[derive(Clone, Copy)]
struct FlingRun {
    scroller: Scroller,
    start_time_nanos: Option<u64>,
    generation: u64,
}

struct EngineState {
    transform: TransformState,
    options: ZoomOptions,
    machine: StateMachine,
    initialized: bool,
    /// Absolute anchor of the pinch in progress, captured on its first
    /// scale event.
    pinch_target: Option<AbsolutePan>,
    /// Cancellation flag for in-flight motion: steps capture the value at
    /// start and become no-ops once it moves on.
    motion_generation: u64,
    /// Registration of the next scheduled motion step; dropping it cancels
    /// the callback outright.
    pending_step: Option<FrameCallbackRegistration>,
    self_weak: Weak<RefCell<EngineState>>,
    listeners: Rc<RefCell<Listeners>>,
    frame_loop: FrameLoopHandle,
}

impl EngineState {
    fn step_context(&self) -> StepContext {
        StepContext {
            state: self.self_weak.clone(),
            listeners: self.listeners.clone(),
            frame_loop: self.frame_loop.clone(),
        }
    }

    fn cancel_motion(&mut self) {
        self.motion_generation += 1;
        self.pending_step = None;
    }

    fn emit_update(&self, notes: &mut Notifications) {
        notes.push(Notification::Update(self.transform.matrix()));
    }

    /// Requests a state transition, cancelling in-flight motion when
    /// leaving it and queueing the idle notification on entering idle.
    fn try_enter(&mut self, next: GestureState, notes: &mut Notifications) -> bool {
        if !self.initialized {
            return false;
        }
        match self.machine.try_enter(next) {
            StateChange::AlreadyThere => true,
            StateChange::Denied => {
                log::trace!("state: {:?} -> {next:?} denied", self.machine.current());
                false
            }
            StateChange::Entered { from } => {
                log::trace!("state: {from:?} -> {next:?}");
                if matches!(from, GestureState::Flinging | GestureState::Animating) {
                    self.cancel_motion();
                }
                if next == GestureState::Idle {
                    notes.push(Notification::Idle);
                }
                true
            }
        }
    }

    fn enter_idle(&mut self, notes: &mut Notifications) {
        self.try_enter(GestureState::Idle, notes);
    }

    //region Sizes and lifecycle

    fn set_viewport_size(&mut self, width: f32, height: f32, notes: &mut Notifications) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let viewport = Size::new(width, height);
        if viewport != self.transform.viewport() {
            self.init(viewport, self.transform.content_base_size(), notes);
        }
    }

    fn set_content_size(&mut self, width: f32, height: f32, notes: &mut Notifications) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let content = Size::new(width, height);
        if content != self.transform.content_base_size() {
            self.init(self.transform.viewport(), content, notes);
        }
    }

    fn init(&mut self, viewport: Size, content: Size, notes: &mut Notifications) {
        if !viewport.is_valid() || !content.is_valid() {
            // Remember the sizes; the engine stays dormant until both are
            // non-degenerate.
            self.transform.store_sizes(viewport, content);
            return;
        }
        let options = self.options;
        if self.initialized {
            log::info!(
                "size change: viewport {viewport:?}, content {content:?}, keeping real zoom {}",
                self.transform.real_zoom().0
            );
            self.enter_idle(notes);
            self.transform
                .reinit_preserving_real_zoom(viewport, content, &options);
        } else {
            log::info!("init: viewport {viewport:?}, content {content:?}");
            self.transform.init_from_scratch(viewport, content, &options);
            self.initialized = true;
        }
        self.emit_update(notes);
    }

    fn clear(&mut self) {
        self.cancel_motion();
        self.machine = StateMachine::new();
        self.transform.clear();
        self.pinch_target = None;
        self.initialized = false;
    }

    //endregion

    //region Gesture events

    fn on_gesture_begin(&mut self, notes: &mut Notifications) -> bool {
        if !self.initialized {
            return false;
        }
        if self.machine.current() == GestureState::Flinging {
            // A new pointer stops the fling in its tracks.
            self.enter_idle(notes);
        }
        true
    }

    fn on_drag(&mut self, dx: f32, dy: f32, notes: &mut Notifications) -> bool {
        if !self.initialized {
            return false;
        }
        if self.machine.current() == GestureState::Animating {
            // Claim but ignore: an animation is never interrupted by a drag.
            return true;
        }
        let delta = ScaledPan::new(
            if self.options.horizontal_pan_enabled {
                dx
            } else {
                0.0
            },
            if self.options.vertical_pan_enabled {
                dy
            } else {
                0.0
            },
        );
        if !self.try_enter(GestureState::Scrolling, notes) {
            return false;
        }
        let options = self.options;
        // Overscroll is allowed while the finger is down; the release path
        // corrects the excess.
        self.transform.apply_scaled_pan(delta, true, &options);
        self.emit_update(notes);
        true
    }

    fn on_scale(
        &mut self,
        factor: f32,
        focus_x: f32,
        focus_y: f32,
        notes: &mut Notifications,
    ) -> bool {
        if !self.initialized || !self.options.zoom_enabled {
            return false;
        }
        if self.machine.current() == GestureState::Animating {
            return true;
        }
        if !self.try_enter(GestureState::Pinching, notes) {
            return false;
        }
        let target = match self.pinch_target {
            Some(target) => target,
            None => {
                // Interpret the focus in scaled space, accounting for the
                // current pan, then freeze it as a scale-independent anchor
                // for the rest of the gesture.
                let pan = self.transform.scaled_pan();
                let scaled_focus = ScaledPan::new(-focus_x + pan.x, -focus_y + pan.y);
                let target = scaled_focus.to_absolute(self.transform.real_zoom());
                log::debug!("pinch anchor: {target:?}");
                self.pinch_target = Some(target);
                target
            }
        };
        let options = self.options;
        let new_zoom = self.transform.zoom().scaled_by(factor);
        self.transform.apply_pinch(new_zoom, target, true, &options);
        self.emit_update(notes);
        true
    }

    fn on_scale_end(&mut self, notes: &mut Notifications) -> bool {
        if !self.initialized {
            return false;
        }
        self.pinch_target = None;
        if self.machine.current() != GestureState::Pinching {
            return false;
        }
        self.end_pinch(notes);
        true
    }

    fn end_pinch(&mut self, notes: &mut Notifications) {
        if self.options.over_pinchable {
            // We might have over pinched; animate back to a legal value.
            let options = self.options;
            let zoom = self.transform.zoom();
            let min_zoom = self.transform.resolved_min_zoom(&options);
            let max_zoom = self.transform.resolved_max_zoom(&options);
            let mut correction = None;
            if zoom < min_zoom {
                correction = Some(min_zoom);
            }
            if zoom > max_zoom {
                correction = Some(max_zoom);
            }
            if let Some(end) = correction {
                self.animate_zoom(end, true, notes);
                return;
            }
        }
        self.enter_idle(notes);
    }

    fn on_fling_released(
        &mut self,
        velocity_x: f32,
        velocity_y: f32,
        notes: &mut Notifications,
    ) -> bool {
        if !self.initialized {
            return false;
        }
        if self.machine.current() == GestureState::Animating {
            return true;
        }
        let velocity_x = if self.options.horizontal_pan_enabled {
            velocity_x
        } else {
            0.0
        };
        let velocity_y = if self.options.vertical_pan_enabled {
            velocity_y
        } else {
            0.0
        };
        self.start_fling(velocity_x, velocity_y, notes)
    }

    fn on_gesture_end(&mut self, notes: &mut Notifications) -> bool {
        if !self.initialized {
            return false;
        }
        match self.machine.current() {
            GestureState::Scrolling => {
                self.end_scroll(notes);
                true
            }
            GestureState::Pinching => {
                self.pinch_target = None;
                self.end_pinch(notes);
                true
            }
            GestureState::Animating => true,
            _ => false,
        }
    }

    fn end_scroll(&mut self, notes: &mut Notifications) {
        if self.options.over_scroll_horizontal || self.options.over_scroll_vertical {
            let options = self.options;
            let fix_x = self
                .transform
                .ensure_translation_bounds(0.0, true, false, &options);
            let fix_y = self
                .transform
                .ensure_translation_bounds(0.0, false, false, &options);
            if fix_x != 0.0 || fix_y != 0.0 {
                // Out of bounds after the release: spring back through the
                // fling path, which is allowed to take over from a scroll.
                self.start_fling(0.0, 0.0, notes);
                return;
            }
        }
        self.enter_idle(notes);
    }

    //endregion

    //region Fling

    /// Per-axis scroller values. When the content fits the viewport the
    /// axis has no free travel and the only admissible position is the
    /// corrected one; otherwise the containment bounds apply.
    fn scroller_axis_values(&self, horizontal: bool) -> (f32, f32, f32, f32) {
        let options = self.options;
        let pan = self.transform.scaled_pan();
        let current = if horizontal { pan.x } else { pan.y };
        let viewport = self.transform.viewport();
        let view_dim = if horizontal {
            viewport.width
        } else {
            viewport.height
        };
        let rect = self.transform.content_rect();
        let content_dim = if horizontal { rect.width } else { rect.height };
        let fix = self
            .transform
            .ensure_translation_bounds(0.0, horizontal, false, &options);
        if view_dim >= content_dim {
            (current + fix, current, current + fix, fix)
        } else {
            (-(content_dim - view_dim), current, 0.0, fix)
        }
    }

    fn start_fling(&mut self, velocity_x: f32, velocity_y: f32, notes: &mut Notifications) -> bool {
        if !self.try_enter(GestureState::Flinging, notes) {
            return false;
        }
        let options = self.options;
        let (min_x, start_x, max_x, fix_x) = self.scroller_axis_values(true);
        let (min_y, start_y, max_y, fix_y) = self.scroller_axis_values(false);
        let over_scrolled = fix_x != 0.0 || fix_y != 0.0;
        let can_travel = min_x < max_x || min_y < max_y;
        if !(over_scrolled
            || options.over_scroll_horizontal
            || options.over_scroll_vertical
            || can_travel)
        {
            // Nowhere to go: immediately settle back to idle.
            self.enter_idle(notes);
            return false;
        }

        let tolerance =
            crate::bounds::over_scroll_tolerance(self.transform.viewport(), self.transform.zoom());
        let slack_x = if options.over_scroll_horizontal {
            tolerance
        } else {
            0.0
        };
        let slack_y = if options.over_scroll_vertical {
            tolerance
        } else {
            0.0
        };
        let calculator = FlingCalculator::with_density(1.0);
        let scroller = Scroller::new(
            AxisScroller::new(start_x, velocity_x, min_x, max_x, slack_x, &calculator),
            AxisScroller::new(start_y, velocity_y, min_y, max_y, slack_y, &calculator),
        );
        if scroller.is_settled() {
            // Nothing to move and nothing to correct.
            self.enter_idle(notes);
            return true;
        }
        log::debug!(
            "fling: velocity ({velocity_x}, {velocity_y}), x [{min_x}, {max_x}] from {start_x}, \
             y [{min_y}, {max_y}] from {start_y}"
        );
        self.cancel_motion();
        let run = FlingRun {
            scroller,
            start_time_nanos: None,
            generation: self.motion_generation,
        };
        self.pending_step = Some(schedule_fling_step(self.step_context(), run));
        true
    }

    //endregion

    //region Animation

    fn animate_zoom(&mut self, new_zoom: Zoom, allow_over_pinch: bool, notes: &mut Notifications) {
        let options = self.options;
        let end = self
            .transform
            .ensure_scale_bounds(new_zoom, allow_over_pinch, &options);
        self.start_animation(
            AnimationTarget::Zoom {
                start: self.transform.zoom(),
                end,
                allow_over_pinch,
            },
            notes,
        );
    }

    fn animate_zoom_and_absolute_pan(
        &mut self,
        new_zoom: Zoom,
        pan: AbsolutePan,
        allow_over_scroll: bool,
        notes: &mut Notifications,
    ) {
        let options = self.options;
        let zoom_end = self.transform.ensure_scale_bounds(new_zoom, false, &options);
        self.start_animation(
            AnimationTarget::ZoomPan {
                zoom_start: self.transform.zoom(),
                zoom_end,
                pan_start: self.transform.pan(),
                pan_end: pan,
                allow_over_scroll,
            },
            notes,
        );
    }

    fn start_animation(&mut self, target: AnimationTarget, notes: &mut Notifications) {
        if !self.try_enter(GestureState::Animating, notes) {
            return;
        }
        // Supersede whatever was running; the old steps see a stale
        // generation and stop.
        self.cancel_motion();
        let run = AnimationRun {
            target,
            start_time_nanos: None,
            duration_ms: self.options.animation_duration_ms,
            easing: Easing::EaseInOut,
            generation: self.motion_generation,
        };
        self.pending_step = Some(schedule_animation_step(self.step_context(), run));
    }

    //endregion

    //region Programmatic position API

    fn move_to(&mut self, zoom: Zoom, pan: AbsolutePan, animate: bool, notes: &mut Notifications) {
        if !self.initialized {
            return;
        }
        if animate {
            self.animate_zoom_and_absolute_pan(zoom, pan, false, notes);
        } else {
            let options = self.options;
            self.transform
                .apply_zoom_and_absolute_pan(zoom, pan, false, &options);
            self.emit_update(notes);
        }
    }

    fn pan_by(&mut self, delta: AbsolutePan, animate: bool, notes: &mut Notifications) {
        if !self.initialized {
            return;
        }
        let zoom = self.transform.zoom();
        let target = self.transform.pan() + delta;
        self.move_to(zoom, target, animate, notes);
    }

    fn zoom_to(&mut self, zoom: Zoom, animate: bool, notes: &mut Notifications) {
        if !self.initialized {
            return;
        }
        if animate {
            self.animate_zoom(zoom, false, notes);
        } else {
            let options = self.options;
            self.transform.apply_zoom(zoom, false, &options);
            self.emit_update(notes);
        }
    }

    fn set_min_zoom(
        &mut self,
        value: f32,
        kind: ZoomKind,
        notes: &mut Notifications,
    ) -> Result<(), LimitError> {
        if value < 0.0 {
            return Err(LimitError::NegativeMinZoom(value));
        }
        self.options.min_zoom = value;
        self.options.min_zoom_kind = kind;
        let options = self.options;
        let resolved = self.transform.resolved_min_zoom(&options);
        if self.transform.zoom() < resolved {
            self.zoom_to(resolved, true, notes);
        }
        Ok(())
    }

    fn set_max_zoom(
        &mut self,
        value: f32,
        kind: ZoomKind,
        notes: &mut Notifications,
    ) -> Result<(), LimitError> {
        if value < 0.0 {
            return Err(LimitError::NegativeMaxZoom(value));
        }
        self.options.max_zoom = value;
        self.options.max_zoom_kind = kind;
        let options = self.options;
        let resolved = self.transform.resolved_max_zoom(&options);
        if self.transform.zoom() > resolved {
            self.zoom_to(resolved, true, notes);
        }
        Ok(())
    }

    //endregion
}

fn schedule_animation_step(context: StepContext, run: AnimationRun) -> FrameCallbackRegistration {
    let step_context = context.clone();
    context.frame_loop.frame_callback(move |frame_time_nanos| {
        let Some(state) = step_context.state.upgrade() else {
            return;
        };
        let mut notes = Notifications::new();
        {
            let mut state = state.borrow_mut();
            if run.generation != state.motion_generation {
                return;
            }
            let mut run = run;
            let start = *run.start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_ms = frame_time_nanos.saturating_sub(start) / 1_000_000;
            let fraction = if run.duration_ms == 0 {
                1.0
            } else {
                (elapsed_ms as f32 / run.duration_ms as f32).min(1.0)
            };
            let eased = run.easing.transform(fraction);
            let options = state.options;
            match run.target {
                AnimationTarget::Zoom {
                    start,
                    end,
                    allow_over_pinch,
                } => {
                    let zoom = Zoom(start.0.lerp(&end.0, eased));
                    state.transform.apply_zoom(zoom, allow_over_pinch, &options);
                }
                AnimationTarget::ZoomPan {
                    zoom_start,
                    zoom_end,
                    pan_start,
                    pan_end,
                    allow_over_scroll,
                } => {
                    let zoom = Zoom(zoom_start.0.lerp(&zoom_end.0, eased));
                    let pan = AbsolutePan::new(
                        pan_start.x.lerp(&pan_end.x, eased),
                        pan_start.y.lerp(&pan_end.y, eased),
                    );
                    state
                        .transform
                        .apply_zoom_and_absolute_pan(zoom, pan, allow_over_scroll, &options);
                }
            }
            state.emit_update(&mut notes);
            if fraction >= 1.0 {
                state.enter_idle(&mut notes);
            } else {
                state.pending_step = Some(schedule_animation_step(step_context.clone(), run));
            }
        }
        dispatch_notifications(&step_context.listeners, &notes);
    })
}

fn schedule_fling_step(context: StepContext, run: FlingRun) -> FrameCallbackRegistration {
    let step_context = context.clone();
    context.frame_loop.frame_callback(move |frame_time_nanos| {
        let Some(state) = step_context.state.upgrade() else {
            return;
        };
        let mut notes = Notifications::new();
        {
            let mut state = state.borrow_mut();
            if run.generation != state.motion_generation {
                return;
            }
            let mut run = run;
            let start = *run.start_time_nanos.get_or_insert(frame_time_nanos);
            let elapsed_ms = (frame_time_nanos.saturating_sub(start) / 1_000_000) as i64;
            let offset = run.scroller.compute(elapsed_ms);
            let current = state.transform.scaled_pan();
            let delta = ScaledPan::new(offset.x - current.x, offset.y - current.y);
            let options = state.options;
            state.transform.apply_scaled_pan(delta, true, &options);
            state.emit_update(&mut notes);
            if offset.finished {
                state.enter_idle(&mut notes);
            } else {
                state.pending_step = Some(schedule_fling_step(step_context.clone(), run));
            }
        }
        dispatch_notifications(&step_context.listeners, &notes);
    })
}

/// Pan/zoom engine. See the crate docs for the hosting contract.
pub struct ZoomEngine {
    state: Rc<RefCell<EngineState>>,
    listeners: Rc<RefCell<Listeners>>,
}

impl ZoomEngine {
    /// Creates an engine with default options, stepping its animations
    /// through `frame_loop`.
    pub fn new(frame_loop: FrameLoopHandle) -> Self {
        Self::with_options(frame_loop, ZoomOptions::default())
    }

    pub fn with_options(frame_loop: FrameLoopHandle, options: ZoomOptions) -> Self {
        let listeners: Rc<RefCell<Listeners>> = Rc::new(RefCell::new(SmallVec::new()));
        let state = Rc::new(RefCell::new(EngineState {
            transform: TransformState::new(),
            options,
            machine: StateMachine::new(),
            initialized: false,
            pinch_target: None,
            motion_generation: 0,
            pending_step: None,
            self_weak: Weak::new(),
            listeners: listeners.clone(),
            frame_loop,
        }));
        state.borrow_mut().self_weak = Rc::downgrade(&state);
        Self { state, listeners }
    }

    /// Registers a listener for transform updates and idle notifications.
    pub fn add_listener(&self, listener: Rc<dyn ZoomListener>) {
        self.listeners.borrow_mut().push(listener);
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut EngineState, &mut Notifications) -> R) -> R {
        let mut notes = Notifications::new();
        let result = f(&mut self.state.borrow_mut(), &mut notes);
        dispatch_notifications(&self.listeners, &notes);
        result
    }

    //region Sizes and lifecycle

    /// Notifies the engine of the viewport size. Called on every layout
    /// pass; degenerate dimensions are ignored.
    pub fn set_viewport_size(&self, width: f32, height: f32) {
        self.with_state(|state, notes| state.set_viewport_size(width, height, notes));
    }

    /// Notifies the engine of the content's natural size. Degenerate and
    /// unchanged sizes are ignored.
    pub fn set_content_size(&self, width: f32, height: f32) {
        self.with_state(|state, notes| state.set_content_size(width, height, notes));
    }

    /// Resets all sizes, zoom and the transform, returning the engine to
    /// the uninitialized state. No events are dispatched until sizes are
    /// set again.
    pub fn clear(&self) {
        self.state.borrow_mut().clear();
    }

    //endregion

    //region Gesture events

    /// A pointer sequence started. Cancels a running fling and returns
    /// whether the engine is interested in the gesture stream.
    pub fn on_gesture_begin(&self) -> bool {
        self.with_state(|state, notes| state.on_gesture_begin(notes))
    }

    /// A classified drag moved by `(dx, dy)` view units. Returns whether
    /// the engine claimed the event.
    pub fn on_drag(&self, dx: f32, dy: f32) -> bool {
        self.with_state(|state, notes| state.on_drag(dx, dy, notes))
    }

    /// A classified pinch changed the scale by `factor` about the view
    /// position `(focus_x, focus_y)`.
    pub fn on_scale(&self, factor: f32, focus_x: f32, focus_y: f32) -> bool {
        self.with_state(|state, notes| state.on_scale(factor, focus_x, focus_y, notes))
    }

    /// The pinch ended. An overpinched zoom animates back into bounds.
    pub fn on_scale_end(&self) -> bool {
        self.with_state(|state, notes| state.on_scale_end(notes))
    }

    /// The pointer was released with the given velocity in view units per
    /// second. Starts a fling when there is room to move, or a spring-back
    /// when the content was overscrolled.
    pub fn on_fling_released(&self, velocity_x: f32, velocity_y: f32) -> bool {
        self.with_state(|state, notes| state.on_fling_released(velocity_x, velocity_y, notes))
    }

    /// The pointer sequence ended without a fling. Ends an active scroll,
    /// correcting any overscroll.
    pub fn on_gesture_end(&self) -> bool {
        self.with_state(|state, notes| state.on_gesture_end(notes))
    }

    //endregion

    //region Position API

    /// Moves both zoom and absolute pan at once.
    pub fn move_to(&self, zoom: f32, x: f32, y: f32, animate: bool) {
        self.with_state(|state, notes| {
            state.move_to(Zoom(zoom), AbsolutePan::new(x, y), animate, notes)
        });
    }

    /// Pans until the content's top-left coordinates match `(x, y)` in
    /// content coordinates.
    pub fn pan_to(&self, x: f32, y: f32, animate: bool) {
        self.with_state(|state, notes| {
            if !state.initialized {
                return;
            }
            let delta = AbsolutePan::new(x, y) - state.transform.pan();
            state.pan_by(delta, animate, notes);
        });
    }

    /// Pans by `(dx, dy)` content coordinates. A zoomed-in engine moves by
    /// more view units than requested.
    pub fn pan_by(&self, dx: f32, dy: f32, animate: bool) {
        self.with_state(|state, notes| state.pan_by(AbsolutePan::new(dx, dy), animate, notes));
    }

    /// Zooms to the given user-facing value.
    pub fn zoom_to(&self, zoom: f32, animate: bool) {
        self.with_state(|state, notes| state.zoom_to(Zoom(zoom), animate, notes));
    }

    /// Applies a multiplicative factor to the current zoom.
    pub fn zoom_by(&self, factor: f32, animate: bool) {
        self.with_state(|state, notes| {
            let zoom = state.transform.zoom().scaled_by(factor);
            state.zoom_to(zoom, animate, notes);
        });
    }

    /// Small animated zoom-in.
    pub fn zoom_in(&self) {
        self.zoom_by(ZOOM_IN_FACTOR, true);
    }

    /// Small animated zoom-out.
    pub fn zoom_out(&self) {
        self.zoom_by(ZOOM_OUT_FACTOR, true);
    }

    /// Zooms so the actual content scale reaches `real_zoom`.
    pub fn real_zoom_to(&self, real_zoom: f32, animate: bool) {
        self.with_state(|state, notes| {
            let zoom = crate::bounds::resolve_zoom(
                real_zoom,
                ZoomKind::Real,
                state.transform.base_zoom(),
            );
            state.zoom_to(zoom, animate, notes);
        });
    }

    //endregion

    //region Configuration

    /// Sets the lower zoom limit. A current zoom below the new limit
    /// animates up to it. Negative values are rejected without touching
    /// the engine.
    pub fn set_min_zoom(&self, value: f32, kind: ZoomKind) -> Result<(), LimitError> {
        self.with_state(|state, notes| state.set_min_zoom(value, kind, notes))
    }

    /// Sets the upper zoom limit. A current zoom above the new limit
    /// animates down to it. Negative values are rejected without touching
    /// the engine.
    pub fn set_max_zoom(&self, value: f32, kind: ZoomKind) -> Result<(), LimitError> {
        self.with_state(|state, notes| state.set_max_zoom(value, kind, notes))
    }

    /// Sets the base transformation applied when a size is next applied.
    pub fn set_transformation(&self, policy: FitPolicy, gravity: Alignment) {
        let mut state = self.state.borrow_mut();
        state.options.fit_policy = policy;
        state.options.gravity = gravity;
    }

    pub fn set_over_scroll_horizontal(&self, over_scroll: bool) {
        self.state.borrow_mut().options.over_scroll_horizontal = over_scroll;
    }

    pub fn set_over_scroll_vertical(&self, over_scroll: bool) {
        self.state.borrow_mut().options.over_scroll_vertical = over_scroll;
    }

    pub fn set_horizontal_pan_enabled(&self, enabled: bool) {
        self.state.borrow_mut().options.horizontal_pan_enabled = enabled;
    }

    pub fn set_vertical_pan_enabled(&self, enabled: bool) {
        self.state.borrow_mut().options.vertical_pan_enabled = enabled;
    }

    pub fn set_over_pinchable(&self, over_pinchable: bool) {
        self.state.borrow_mut().options.over_pinchable = over_pinchable;
    }

    pub fn set_zoom_enabled(&self, enabled: bool) {
        self.state.borrow_mut().options.zoom_enabled = enabled;
    }

    pub fn set_animation_duration(&self, duration_ms: u64) {
        self.state.borrow_mut().options.animation_duration_ms = duration_ms;
    }

    //endregion

    //region Getters

    /// Current user-facing zoom, `1.0` right after the initial fit.
    pub fn zoom(&self) -> f32 {
        self.state.borrow().transform.zoom().0
    }

    /// Actual content scale; matches the matrix scale components.
    pub fn real_zoom(&self) -> f32 {
        self.state.borrow().transform.real_zoom().0
    }

    /// Horizontal pan in content coordinates.
    pub fn pan_x(&self) -> f32 {
        self.state.borrow().transform.pan().x
    }

    /// Vertical pan in content coordinates.
    pub fn pan_y(&self) -> f32 {
        self.state.borrow().transform.pan().y
    }

    /// Horizontal translation in view coordinates.
    pub fn scaled_pan_x(&self) -> f32 {
        self.state.borrow().transform.scaled_pan().x
    }

    /// Vertical translation in view coordinates.
    pub fn scaled_pan_y(&self) -> f32 {
        self.state.borrow().transform.scaled_pan().y
    }

    /// Snapshot of the current transform.
    pub fn matrix(&self) -> Matrix {
        self.state.borrow().transform.matrix()
    }

    /// Current activity state.
    pub fn gesture_state(&self) -> GestureState {
        self.state.borrow().machine.current()
    }

    //endregion
}
