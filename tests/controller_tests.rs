use approx::assert_relative_eq;
use plotkit::core::{Axis, AxisId, AxisSet, Point, Rect, Size};
use plotkit::interaction::{
    AxisBounds, ControllerState, InertiaConfig, PanAxes, PanController, PlotController,
    PlotTarget, RotationController, VelocityCalculator, ViewSnapshot, ZoomController,
    ZoomHistory,
};

struct Fixture {
    axes: AxisSet,
    history: ZoomHistory,
    x: AxisId,
    y: AxisId,
}

impl Fixture {
    fn new() -> Self {
        let mut axes = AxisSet::new();
        let x = axes.insert(Axis::with_range(0.0, 100.0, 10.0).expect("x axis"));
        let y = axes.insert(Axis::with_range(0.0, 100.0, 10.0).expect("y axis"));
        Self {
            axes,
            history: ZoomHistory::new(),
            x,
            y,
        }
    }

    // 200x100 plot area centered at (100, 50).
    fn target(&mut self) -> PlotTarget<'_> {
        PlotTarget {
            axes: &mut self.axes,
            x_axis: Some(self.x),
            y_axis: Some(self.y),
            size: Size::new(200.0, 100.0),
            center: Point::new(100.0, 50.0),
            start_angle: 0.0,
            history: &mut self.history,
        }
    }
}

fn range(target: &PlotTarget<'_>, axis: AxisId) -> (f64, f64) {
    target.axis_range(Some(axis)).expect("axis present")
}

#[test]
fn pan_drag_shifts_range_against_pointer() {
    let mut fixture = Fixture::new();
    let (x, y) = (fixture.x, fixture.y);
    let mut target = fixture.target();
    let mut pan = PanController::new();

    assert!(!pan.on_mouse_down(Point::new(100.0, 50.0), 0.0, &mut target));
    assert_eq!(pan.state(), ControllerState::Dragging);
    assert!(pan.on_mouse_move(Point::new(150.0, 50.0), 0.5, &mut target));
    pan.on_mouse_up(Point::new(150.0, 50.0), 1.0, &mut target);

    // 50px of 200px over a span of 100.
    let (min, max) = range(&target, x);
    assert_relative_eq!(min, -25.0, epsilon = 1e-9);
    assert_relative_eq!(max, 75.0, epsilon = 1e-9);
    assert_eq!(range(&target, y), (0.0, 100.0));
    // The pointer rested before release.
    assert_eq!(pan.state(), ControllerState::Idle);
    assert_eq!(target.history.len(), 1);

    assert!(target.undo());
    assert_eq!(range(&target, x), (0.0, 100.0));
    assert!(target.history.is_empty());
}

#[test]
fn pan_down_moves_y_range_up() {
    let mut fixture = Fixture::new();
    let y = fixture.y;
    let mut target = fixture.target();
    let mut pan = PanController::new().with_inertia(InertiaConfig::disabled());

    pan.on_mouse_down(Point::new(100.0, 20.0), 0.0, &mut target);
    pan.on_mouse_up(Point::new(100.0, 40.0), 0.01, &mut target);

    let (min, max) = range(&target, y);
    assert_relative_eq!(min, 20.0, epsilon = 1e-9);
    assert_relative_eq!(max, 120.0, epsilon = 1e-9);
    assert_eq!(pan.state(), ControllerState::Idle);
}

#[test]
fn pan_respects_axis_selection_and_bounds() {
    let mut fixture = Fixture::new();
    let (x, y) = (fixture.x, fixture.y);
    let mut target = fixture.target();
    let mut pan = PanController::new()
        .with_pan_axes(PanAxes::X)
        .with_x_bounds(AxisBounds::new(-10.0, 100.0))
        .with_inertia(InertiaConfig::disabled());

    pan.on_mouse_down(Point::new(100.0, 50.0), 0.0, &mut target);
    pan.on_mouse_move(Point::new(200.0, 90.0), 0.1, &mut target);
    pan.on_mouse_up(Point::new(200.0, 90.0), 0.2, &mut target);

    assert_eq!(range(&target, x), (-10.0, 90.0));
    assert_eq!(range(&target, y), (0.0, 100.0));
}

#[test]
fn click_without_motion_leaves_view_and_history_alone() {
    let mut fixture = Fixture::new();
    let x = fixture.x;
    let mut target = fixture.target();
    let mut pan = PanController::new();

    pan.on_mouse_down(Point::new(40.0, 40.0), 0.0, &mut target);
    assert!(!pan.on_mouse_up(Point::new(40.0, 40.0), 0.1, &mut target));

    assert_eq!(range(&target, x), (0.0, 100.0));
    assert!(target.history.is_empty());
}

#[test]
fn leaving_mid_pan_restores_start_view() {
    let mut fixture = Fixture::new();
    let x = fixture.x;
    let mut target = fixture.target();
    let mut pan = PanController::new();

    pan.on_mouse_down(Point::new(100.0, 50.0), 0.0, &mut target);
    pan.on_mouse_move(Point::new(150.0, 50.0), 0.1, &mut target);
    assert_ne!(range(&target, x), (0.0, 100.0));

    assert!(pan.on_mouse_leave(&mut target));
    assert_eq!(range(&target, x), (0.0, 100.0));
    assert_eq!(pan.state(), ControllerState::Idle);
    assert!(target.history.is_empty());
    assert!(!pan.on_mouse_move(Point::new(10.0, 10.0), 0.2, &mut target));
}

#[test]
fn fast_release_glides_then_stops() {
    let mut fixture = Fixture::new();
    let x = fixture.x;
    let mut target = fixture.target();
    let mut pan = PanController::new();

    pan.on_mouse_down(Point::new(100.0, 50.0), 0.0, &mut target);
    pan.on_mouse_move(Point::new(110.0, 50.0), 0.02, &mut target);
    pan.on_mouse_move(Point::new(120.0, 50.0), 0.04, &mut target);
    pan.on_mouse_up(Point::new(130.0, 50.0), 0.06, &mut target);

    assert_eq!(pan.state(), ControllerState::Animating);
    assert_relative_eq!(pan.animation_velocity().x, 500.0, epsilon = 1e-6);
    let released = range(&target, x);
    assert_relative_eq!(released.0, -15.0, epsilon = 1e-9);

    let mut steps = 0;
    while pan.is_animating() && steps < 200 {
        pan.step_animation(0.1, &mut target);
        steps += 1;
    }
    assert_eq!(pan.state(), ControllerState::Idle);
    assert!(steps > 1);

    let (min, max) = range(&target, x);
    assert!(min < released.0);
    assert_relative_eq!(max - min, 100.0, epsilon = 1e-6);
    // Animation is not a new undo step.
    assert_eq!(target.history.len(), 1);
}

#[test]
fn pressing_stops_running_inertia() {
    let mut fixture = Fixture::new();
    let mut target = fixture.target();
    let mut pan = PanController::new();

    pan.on_mouse_down(Point::new(0.0, 50.0), 0.0, &mut target);
    pan.on_mouse_up(Point::new(60.0, 50.0), 0.05, &mut target);
    assert!(pan.is_animating());

    pan.on_mouse_down(Point::new(60.0, 50.0), 0.1, &mut target);
    assert_eq!(pan.state(), ControllerState::Dragging);
    assert_eq!(pan.animation_velocity(), Point::default());
}

#[test]
fn zoom_rectangle_commits_on_release_and_undoes() {
    let mut fixture = Fixture::new();
    let (x, y) = (fixture.x, fixture.y);
    let mut target = fixture.target();
    let mut zoom = ZoomController::new();

    zoom.on_mouse_down(Point::new(50.0, 25.0), 0.0, &mut target);
    assert!(zoom.on_mouse_move(Point::new(150.0, 75.0), 0.1, &mut target));
    assert_eq!(zoom.preview_rect(), Some(Rect::new(50.0, 25.0, 100.0, 50.0)));
    // Axes only change on release.
    assert_eq!(range(&target, x), (0.0, 100.0));

    assert!(zoom.on_mouse_up(Point::new(150.0, 75.0), 0.2, &mut target));
    assert_eq!(zoom.preview_rect(), None);
    let (x_min, x_max) = range(&target, x);
    assert_relative_eq!(x_min, 25.0, epsilon = 1e-9);
    assert_relative_eq!(x_max, 75.0, epsilon = 1e-9);
    let (y_min, y_max) = range(&target, y);
    assert_relative_eq!(y_min, 25.0, epsilon = 1e-9);
    assert_relative_eq!(y_max, 75.0, epsilon = 1e-9);

    assert!(zoom.undo(&mut target));
    assert_eq!(range(&target, x), (0.0, 100.0));
    assert_eq!(range(&target, y), (0.0, 100.0));
    assert!(!zoom.undo(&mut target));
}

#[test]
fn tiny_zoom_rectangle_is_ignored() {
    let mut fixture = Fixture::new();
    let x = fixture.x;
    let mut target = fixture.target();
    let mut zoom = ZoomController::new();

    zoom.on_mouse_down(Point::new(10.0, 10.0), 0.0, &mut target);
    zoom.on_mouse_up(Point::new(12.0, 12.0), 0.1, &mut target);

    assert_eq!(range(&target, x), (0.0, 100.0));
    assert!(target.history.is_empty());
}

#[test]
fn leaving_mid_zoom_drops_outline() {
    let mut fixture = Fixture::new();
    let x = fixture.x;
    let mut target = fixture.target();
    let mut zoom = ZoomController::new();

    zoom.on_mouse_down(Point::new(10.0, 10.0), 0.0, &mut target);
    zoom.on_mouse_move(Point::new(90.0, 90.0), 0.1, &mut target);
    assert!(zoom.on_mouse_leave(&mut target));
    assert_eq!(zoom.preview_rect(), None);
    assert_eq!(range(&target, x), (0.0, 100.0));
}

#[test]
fn wheel_zoom_keeps_point_under_cursor() {
    let mut fixture = Fixture::new();
    let (x, y) = (fixture.x, fixture.y);
    let mut target = fixture.target();
    let mut zoom = ZoomController::new();

    assert!(zoom.on_mouse_wheel(1.0, Point::new(100.0, 50.0), &mut target));
    let (min, max) = range(&target, x);
    assert_relative_eq!(min, 50.0 - 50.0 / 1.2, epsilon = 1e-9);
    assert_relative_eq!(max, 50.0 + 50.0 / 1.2, epsilon = 1e-9);
    assert_eq!(target.history.len(), 1);

    // Zooming back out by the same notch restores the span.
    assert!(zoom.on_mouse_wheel(-1.0, Point::new(100.0, 50.0), &mut target));
    let (min, max) = range(&target, y);
    assert_relative_eq!(min, 0.0, epsilon = 1e-9);
    assert_relative_eq!(max, 100.0, epsilon = 1e-9);

    assert!(!zoom.on_mouse_wheel(0.0, Point::new(100.0, 50.0), &mut target));
}

#[test]
fn rotation_follows_pointer_and_undoes() {
    let mut fixture = Fixture::new();
    let mut target = fixture.target();
    let mut rotation = RotationController::new();

    rotation.on_mouse_down(Point::new(150.0, 50.0), 0.0, &mut target);
    assert!(rotation.on_mouse_move(Point::new(100.0, 100.0), 1.0, &mut target));
    rotation.on_mouse_up(Point::new(100.0, 100.0), 2.0, &mut target);

    assert_relative_eq!(target.start_angle, 90.0, epsilon = 1e-9);
    assert_eq!(rotation.state(), ControllerState::Idle);
    assert_eq!(
        target.history.peek(),
        Some(&ViewSnapshot::angle(0.0))
    );

    assert!(target.undo());
    assert_relative_eq!(target.start_angle, 0.0);
}

#[test]
fn rotation_leave_restores_angle() {
    let mut fixture = Fixture::new();
    let mut target = fixture.target();
    target.start_angle = 30.0;
    let mut rotation = RotationController::new();

    rotation.on_mouse_down(Point::new(150.0, 50.0), 0.0, &mut target);
    rotation.on_mouse_move(Point::new(100.0, 100.0), 0.5, &mut target);
    assert_relative_eq!(target.start_angle, 120.0, epsilon = 1e-9);

    assert!(rotation.on_mouse_leave(&mut target));
    assert_relative_eq!(target.start_angle, 30.0);
    assert!(target.history.is_empty());
}

#[test]
fn rotation_spins_down_after_fast_release() {
    let mut fixture = Fixture::new();
    let mut target = fixture.target();
    let mut rotation = RotationController::new();

    rotation.on_mouse_down(Point::new(150.0, 50.0), 0.0, &mut target);
    rotation.on_mouse_move(Point::new(100.0, 100.0), 0.05, &mut target);
    rotation.on_mouse_up(Point::new(100.0, 100.0), 0.06, &mut target);

    assert_eq!(rotation.state(), ControllerState::Animating);
    assert_relative_eq!(rotation.angular_velocity(), 1800.0, epsilon = 1e-6);

    let mut steps = 0;
    while rotation.is_animating() && steps < 200 {
        assert!(rotation.step_animation(0.1, &mut target));
        assert!((0.0..360.0).contains(&target.start_angle));
        steps += 1;
    }
    assert_eq!(rotation.state(), ControllerState::Idle);
    assert_eq!(rotation.angular_velocity(), 0.0);
}

#[test]
fn velocity_uses_recent_window_only() {
    let mut velocity = VelocityCalculator::new();
    assert_eq!(velocity.velocity(), Point::default());

    velocity.add_sample(0.0, Point::new(0.0, 0.0));
    velocity.add_sample(0.05, Point::new(10.0, -5.0));
    velocity.add_sample(0.1, Point::new(20.0, -10.0));
    let speed = velocity.velocity();
    assert_relative_eq!(speed.x, 200.0, epsilon = 1e-9);
    assert_relative_eq!(speed.y, -100.0, epsilon = 1e-9);

    // Out of order and non-finite samples are dropped.
    velocity.add_sample(0.02, Point::new(500.0, 0.0));
    velocity.add_sample(f64::NAN, Point::new(500.0, 0.0));
    assert_eq!(velocity.len(), 3);

    // A pause before release leaves no motion in the window.
    velocity.add_sample(0.5, Point::new(20.0, -10.0));
    assert_eq!(velocity.velocity(), Point::default());
}

#[test]
fn history_drops_oldest_when_full() {
    let mut history = ZoomHistory::with_depth(2);
    history.push(ViewSnapshot::angle(1.0));
    history.push(ViewSnapshot::angle(2.0));
    history.push(ViewSnapshot::angle(3.0));
    history.push(ViewSnapshot::default());

    assert_eq!(history.len(), 2);
    assert_eq!(history.pop(), Some(ViewSnapshot::angle(3.0)));
    assert_eq!(history.pop(), Some(ViewSnapshot::angle(2.0)));
    assert!(!history.can_undo());
}
