use std::rc::Rc;

use zoomable_graphics::{Alignment, Point};
use zoomable_testing::{FrameDriver, RecordedEvent, RecordingListener};

use zoomable::{FitPolicy, GestureState, ZoomEngine, ZoomKind};

const FRAME_MS: u64 = 16;
const MAX_FRAMES: usize = 2000;

/// Engine fitted to a 1000x1000 viewport showing 2000x1000 content with
/// the default center-inside policy: base zoom 0.5, content rect
/// (0, 250, 1000, 750) in view space.
fn fitted_engine() -> (FrameDriver, ZoomEngine, Rc<RecordingListener>) {
    let driver = FrameDriver::new();
    let engine = ZoomEngine::new(driver.handle());
    let listener = Rc::new(RecordingListener::new());
    engine.add_listener(listener.clone());
    engine.set_viewport_size(1000.0, 1000.0);
    engine.set_content_size(2000.0, 1000.0);
    (driver, engine, listener)
}

#[test]
fn initial_fit_centers_width_filling_content() {
    let (_driver, engine, listener) = fitted_engine();

    assert_eq!(engine.zoom(), 1.0);
    assert_eq!(engine.real_zoom(), 0.5);
    assert_eq!(engine.scaled_pan_x(), 0.0);
    assert_eq!(engine.scaled_pan_y(), 250.0);

    let matrix = engine.matrix();
    assert_eq!(matrix.scale_x(), 0.5);
    let top_left = matrix.map_point(Point::ZERO);
    let bottom_right = matrix.map_point(Point::new(2000.0, 1000.0));
    assert_eq!(top_left, Point::new(0.0, 250.0));
    assert_eq!(bottom_right, Point::new(1000.0, 750.0));

    // Exactly the initial fit update, no idle yet.
    assert_eq!(listener.update_count(), 1);
    assert_eq!(listener.idle_count(), 0);
}

#[test]
fn uninitialized_engine_ignores_everything() {
    let driver = FrameDriver::new();
    let engine = ZoomEngine::new(driver.handle());
    let listener = Rc::new(RecordingListener::new());
    engine.add_listener(listener.clone());

    engine.zoom_to(2.0, false);
    engine.pan_by(10.0, 10.0, false);
    assert!(!engine.on_gesture_begin());
    assert!(!engine.on_drag(10.0, 10.0));
    assert!(!engine.on_scale(1.5, 0.0, 0.0));
    assert!(!engine.on_fling_released(100.0, 0.0));

    assert_eq!(engine.zoom(), 1.0);
    assert_eq!(engine.real_zoom(), 0.0);
    assert_eq!(engine.pan_x(), 0.0);
    assert!(listener.events().is_empty());

    // Degenerate sizes keep the engine dormant too.
    engine.set_viewport_size(0.0, 500.0);
    engine.set_content_size(100.0, 0.0);
    assert!(listener.events().is_empty());
}

#[test]
fn raising_min_zoom_animates_up_to_the_new_limit() {
    let (mut driver, engine, listener) = fitted_engine();
    listener.clear();

    engine
        .set_min_zoom(2.0, ZoomKind::Logical)
        .expect("valid limit");
    assert_eq!(engine.gesture_state(), GestureState::Animating);

    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert_eq!(engine.zoom(), 2.0);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert_eq!(listener.idle_count(), 1);
    assert!(listener.ended_idle());
    assert!(listener.update_count() > 0);
}

#[test]
fn zoom_by_round_trips_when_unclamped() {
    let (_driver, engine, _listener) = fitted_engine();

    engine.zoom_by(1.5, false);
    assert!((engine.zoom() - 1.5).abs() < 1e-6);
    engine.zoom_by(1.0 / 1.5, false);
    assert!((engine.zoom() - 1.0).abs() < 1e-6);
}

#[test]
fn drag_on_a_disabled_axis_moves_only_the_other_one() {
    let (_driver, engine, _listener) = fitted_engine();
    engine.set_horizontal_pan_enabled(false);
    engine.zoom_to(2.4, false);
    let x_before = engine.scaled_pan_x();
    let y_before = engine.scaled_pan_y();

    assert!(engine.on_drag(50.0, -50.0));
    assert_eq!(engine.gesture_state(), GestureState::Scrolling);
    assert_eq!(engine.scaled_pan_x(), x_before);
    assert_eq!(engine.scaled_pan_y(), y_before - 50.0);
}

#[test]
fn zero_velocity_fling_in_bounds_goes_straight_to_idle() {
    let (_driver, engine, listener) = fitted_engine();
    listener.clear();
    let pan_before = (engine.scaled_pan_x(), engine.scaled_pan_y());

    assert!(engine.on_fling_released(0.0, 0.0));
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert_eq!(listener.update_count(), 0);
    assert_eq!(listener.idle_count(), 1);
    assert_eq!((engine.scaled_pan_x(), engine.scaled_pan_y()), pan_before);
}

#[test]
fn fling_travels_and_settles_within_bounds() {
    let (mut driver, engine, listener) = fitted_engine();
    engine.zoom_to(2.4, false);
    listener.clear();
    let x_before = engine.scaled_pan_x();
    let y_before = engine.scaled_pan_y();

    assert!(engine.on_fling_released(-3000.0, 0.0));
    assert_eq!(engine.gesture_state(), GestureState::Flinging);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));

    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert!(engine.scaled_pan_x() < x_before, "fling should move left");
    assert!(engine.scaled_pan_x() >= -1400.0 - 0.5);
    assert!(engine.scaled_pan_x() <= 0.5);
    // The vertical axis had no velocity and stays put.
    assert_eq!(engine.scaled_pan_y(), y_before);
    assert!(listener.update_count() > 0);
    assert!(listener.ended_idle());
}

#[test]
fn a_new_gesture_cancels_a_running_fling() {
    let (mut driver, engine, listener) = fitted_engine();
    engine.zoom_to(2.4, false);

    assert!(engine.on_fling_released(-3000.0, 0.0));
    driver.run_frames(3, FRAME_MS);
    assert_eq!(engine.gesture_state(), GestureState::Flinging);
    let x_at_cancel = engine.scaled_pan_x();
    listener.clear();

    assert!(engine.on_gesture_begin());
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert_eq!(listener.idle_count(), 1);

    // The cancelled trajectory must not step again; the pan stays where
    // cancellation caught it.
    driver.run_frames(10, FRAME_MS);
    assert_eq!(engine.scaled_pan_x(), x_at_cancel);
    assert_eq!(listener.update_count(), 0);
}

#[test]
fn overscrolled_drag_springs_back_after_release() {
    let (mut driver, engine, listener) = fitted_engine();
    listener.clear();

    // Content fits horizontally, so the only legal pan is centered at 0;
    // the drag is allowed out to the overscroll tolerance.
    assert!(engine.on_drag(30.0, 0.0));
    assert_eq!(engine.scaled_pan_x(), 30.0);

    assert!(engine.on_gesture_end());
    assert_eq!(engine.gesture_state(), GestureState::Flinging);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));

    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert!(engine.scaled_pan_x().abs() < 1e-3);
    assert_eq!(listener.idle_count(), 1);
}

#[test]
fn new_animation_supersedes_the_running_one() {
    let (mut driver, engine, listener) = fitted_engine();

    engine.zoom_to(2.5, true);
    driver.run_frames(3, FRAME_MS);
    let mid_flight = engine.zoom();
    assert!(mid_flight > 1.0 && mid_flight < 2.5);
    listener.clear();

    engine.zoom_to(1.2, true);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert!((engine.zoom() - 1.2).abs() < 1e-5);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert_eq!(listener.idle_count(), 1);
}

#[test]
fn idle_never_precedes_the_update_it_follows() {
    let (mut driver, engine, listener) = fitted_engine();
    listener.clear();

    engine.zoom_to(1.8, true);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));

    let events = listener.events();
    assert!(events.len() >= 2);
    assert_eq!(events.last(), Some(&RecordedEvent::Idle));
    assert!(matches!(
        events[events.len() - 2],
        RecordedEvent::Update(_)
    ));
    assert_eq!(listener.idle_count(), 1);
}

#[test]
fn content_size_change_keeps_the_real_zoom() {
    let (_driver, engine, listener) = fitted_engine();
    engine.zoom_to(1.8, false);
    assert!((engine.real_zoom() - 0.9).abs() < 1e-6);
    listener.clear();

    engine.set_content_size(1000.0, 1000.0);
    assert!((engine.real_zoom() - 0.9).abs() < 1e-5);
    assert!((engine.zoom() - 0.9).abs() < 1e-5);
    assert_eq!(listener.update_count(), 1);
}

#[test]
fn negative_limits_are_rejected_without_side_effects() {
    let (_driver, engine, listener) = fitted_engine();
    listener.clear();

    assert!(engine.set_min_zoom(-1.0, ZoomKind::Logical).is_err());
    assert!(engine.set_max_zoom(-0.1, ZoomKind::Real).is_err());
    assert_eq!(engine.zoom(), 1.0);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert!(listener.events().is_empty());
}

#[test]
fn clear_returns_the_engine_to_uninitialized() {
    let (_driver, engine, listener) = fitted_engine();
    engine.zoom_to(2.0, false);
    listener.clear();

    engine.clear();
    assert_eq!(engine.real_zoom(), 0.0);
    assert!(!engine.on_drag(10.0, 0.0));
    assert!(listener.events().is_empty());

    // Setting sizes again re-runs the initial fit.
    engine.set_viewport_size(1000.0, 1000.0);
    engine.set_content_size(2000.0, 1000.0);
    assert_eq!(engine.zoom(), 1.0);
    assert_eq!(engine.real_zoom(), 0.5);
    assert_eq!(listener.update_count(), 1);
}

#[test]
fn animated_move_to_lands_on_the_requested_position() {
    let (mut driver, engine, _listener) = fitted_engine();

    engine.move_to(2.4, -300.0, -100.0, true);
    assert_eq!(engine.gesture_state(), GestureState::Animating);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));

    assert!((engine.zoom() - 2.4).abs() < 1e-5);
    assert!((engine.pan_x() - -300.0).abs() < 1e-2);
    assert!((engine.pan_y() - -100.0).abs() < 1e-2);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
}

#[test]
fn pinch_keeps_the_focus_point_fixed() {
    let (_driver, engine, _listener) = fitted_engine();
    engine.zoom_to(2.2, false);

    // A focus point well inside the viewport, with content overflowing on
    // both axes so the clamp cannot interfere.
    let focus = Point::new(170.0, 280.0);
    let before = engine.matrix().map_point(Point::new(700.0, 300.0));
    assert!((before.x - focus.x).abs() < 1e-3);
    assert!((before.y - focus.y).abs() < 1e-3);

    assert!(engine.on_scale(2.3 / 2.2, focus.x, focus.y));
    assert_eq!(engine.gesture_state(), GestureState::Pinching);
    let after = engine.matrix().map_point(Point::new(700.0, 300.0));
    assert!((after.x - before.x).abs() < 1e-2);
    assert!((after.y - before.y).abs() < 1e-2);

    assert!(engine.on_scale_end());
    assert_eq!(engine.gesture_state(), GestureState::Idle);
}

#[test]
fn overpinched_zoom_animates_back_to_the_limit() {
    let (mut driver, engine, listener) = fitted_engine();
    listener.clear();

    // One huge pinch step: clamped to max + the 10% elastic margin.
    assert!(engine.on_scale(3.0, 500.0, 500.0));
    assert!((engine.zoom() - 2.67).abs() < 1e-4);

    assert!(engine.on_scale_end());
    assert_eq!(engine.gesture_state(), GestureState::Animating);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert!((engine.zoom() - 2.5).abs() < 1e-5);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert!(listener.ended_idle());
}

#[test]
fn fling_with_nowhere_to_go_is_rejected() {
    let (_driver, engine, listener) = fitted_engine();
    engine.set_over_scroll_horizontal(false);
    engine.set_over_scroll_vertical(false);
    listener.clear();
    let pan_before = (engine.scaled_pan_x(), engine.scaled_pan_y());

    // At the initial fit the content fits the viewport on both axes.
    assert!(!engine.on_fling_released(500.0, 500.0));
    assert_eq!(engine.gesture_state(), GestureState::Idle);
    assert_eq!(listener.idle_count(), 1);
    assert_eq!((engine.scaled_pan_x(), engine.scaled_pan_y()), pan_before);
}

#[test]
fn gestures_are_claimed_but_ignored_while_animating() {
    let (mut driver, engine, _listener) = fitted_engine();
    engine.zoom_to(2.0, true);
    driver.run_frames(2, FRAME_MS);
    assert_eq!(engine.gesture_state(), GestureState::Animating);

    assert!(engine.on_drag(50.0, 50.0));
    assert!(engine.on_scale(1.5, 500.0, 500.0));
    assert!(engine.on_fling_released(1000.0, 0.0));
    assert_eq!(engine.gesture_state(), GestureState::Animating);

    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert_eq!(engine.zoom(), 2.0);
}

#[test]
fn scale_events_are_ignored_when_zoom_is_disabled() {
    let (_driver, engine, _listener) = fitted_engine();
    engine.set_zoom_enabled(false);

    assert!(!engine.on_scale(1.5, 500.0, 500.0));
    assert_eq!(engine.zoom(), 1.0);
    assert_eq!(engine.gesture_state(), GestureState::Idle);
}

#[test]
fn transformation_policy_applies_at_initialization() {
    let driver = FrameDriver::new();
    let engine = ZoomEngine::new(driver.handle());
    engine.set_transformation(FitPolicy::CenterCrop, Alignment::TOP_START);
    engine.set_viewport_size(1000.0, 1000.0);
    engine.set_content_size(2000.0, 500.0);

    // Center crop scales the smaller side to fill: max(0.5, 2.0).
    assert_eq!(engine.real_zoom(), 2.0);
    assert_eq!(engine.zoom(), 1.0);
    // Top-start gravity pins the overflowing axis to its leading edge.
    assert_eq!(engine.scaled_pan_x(), 0.0);
    assert_eq!(engine.scaled_pan_y(), 0.0);
}

#[test]
fn zoom_in_and_out_are_animated_shorthands() {
    let (mut driver, engine, _listener) = fitted_engine();

    engine.zoom_in();
    assert_eq!(engine.gesture_state(), GestureState::Animating);
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert!((engine.zoom() - 1.3).abs() < 1e-5);

    engine.zoom_out();
    assert!(driver.run_until_settled(FRAME_MS, MAX_FRAMES));
    assert!((engine.zoom() - 0.91).abs() < 1e-4);
}

#[test]
fn pan_to_reaches_absolute_coordinates() {
    let (_driver, engine, _listener) = fitted_engine();
    engine.zoom_to(2.4, false);

    engine.pan_to(-200.0, -50.0, false);
    assert!((engine.pan_x() - -200.0).abs() < 1e-3);
    assert!((engine.pan_y() - -50.0).abs() < 1e-3);
}

#[test]
fn real_zoom_to_reaches_the_matrix_scale() {
    let (_driver, engine, _listener) = fitted_engine();

    engine.real_zoom_to(1.0, false);
    assert!((engine.real_zoom() - 1.0).abs() < 1e-6);
    assert!((engine.zoom() - 2.0).abs() < 1e-6);
}
