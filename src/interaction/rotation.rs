use tracing::{debug, trace};

use crate::core::Point;
use crate::core::geometry::normalize_degrees;

use super::controller::{ControllerState, InertiaConfig, PlotController, PlotTarget};
use super::history::ViewSnapshot;
use super::velocity::VelocityCalculator;

/// Pointers closer than this to the center give no usable angle.
const MIN_RADIUS_PX: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
struct RotationDrag {
    start_angle: f64,
    last_pointer_angle: f64,
    turned: f64,
}

/// Spins a polar plot by dragging around its center.
///
/// Angles are in degrees, clockwise in screen space, matching the plot's
/// `start_angle`. Rotation keeps spinning after a fast release when inertia
/// is enabled.
#[derive(Debug, Clone)]
pub struct RotationController {
    inertia: InertiaConfig,
    state: ControllerState,
    drag: Option<RotationDrag>,
    velocity: VelocityCalculator,
    angular_velocity: f64,
}

impl Default for RotationController {
    fn default() -> Self {
        Self {
            inertia: InertiaConfig::angular(),
            state: ControllerState::Idle,
            drag: None,
            velocity: VelocityCalculator::new(),
            angular_velocity: 0.0,
        }
    }
}

/// Screen angle of `point` around `center`, `None` too close to the center.
fn pointer_angle(center: Point, point: Point) -> Option<f64> {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    (dx.hypot(dy) >= MIN_RADIUS_PX).then(|| dy.atan2(dx).to_degrees())
}

/// Shortest signed difference between two angles, in `(-180, 180]`.
fn angle_delta(from: f64, to: f64) -> f64 {
    let delta = normalize_degrees(to - from);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

impl RotationController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: InertiaConfig) -> Self {
        self.inertia = inertia;
        self
    }

    #[must_use]
    pub fn inertia(&self) -> InertiaConfig {
        self.inertia
    }

    /// Current spin in degrees per second.
    #[must_use]
    pub fn angular_velocity(&self) -> f64 {
        self.angular_velocity
    }
}

impl PlotController for RotationController {
    fn state(&self) -> ControllerState {
        self.state
    }

    fn on_mouse_down(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        self.stop();
        let Some(angle) = pointer_angle(target.center, point) else {
            return false;
        };
        self.drag = Some(RotationDrag {
            start_angle: target.start_angle,
            last_pointer_angle: angle,
            turned: 0.0,
        });
        self.velocity.reset();
        self.velocity.add_sample(time, Point::default());
        self.state = ControllerState::Dragging;
        trace!(angle, "rotation started");
        false
    }

    fn on_mouse_move(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        let Some(drag) = self.drag.as_mut() else {
            return false;
        };
        let Some(angle) = pointer_angle(target.center, point) else {
            return false;
        };
        let delta = angle_delta(drag.last_pointer_angle, angle);
        drag.last_pointer_angle = angle;
        if delta == 0.0 {
            return false;
        }
        drag.turned += delta;
        self.velocity.add_sample(time, Point::new(drag.turned, 0.0));
        target.start_angle = normalize_degrees(drag.start_angle + drag.turned);
        true
    }

    fn on_mouse_up(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        let changed = self.on_mouse_move(point, time, target);
        let Some(drag) = self.drag.take() else {
            self.state = ControllerState::Idle;
            return changed;
        };
        if drag.turned != 0.0 {
            target.history.push(ViewSnapshot::angle(drag.start_angle));
        }

        let velocity = self.velocity.velocity().x;
        if self.inertia.enable_animation && velocity.abs() >= self.inertia.start_velocity {
            self.angular_velocity = velocity;
            self.state = ControllerState::Animating;
            debug!(velocity, "rotation inertia started");
        } else {
            self.state = ControllerState::Idle;
        }
        changed
    }

    fn on_mouse_leave(&mut self, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        self.state = ControllerState::Idle;
        match self.drag.take() {
            Some(drag) => {
                trace!("rotation cancelled");
                let changed = target.start_angle != drag.start_angle;
                target.start_angle = drag.start_angle;
                changed
            }
            None => false,
        }
    }

    fn step_animation(&mut self, dt: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Animating || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        target.start_angle = normalize_degrees(target.start_angle + self.angular_velocity * dt);
        self.angular_velocity *= self.inertia.decay(dt);
        trace!(velocity = self.angular_velocity, dt, "rotation inertia step");
        if self.angular_velocity.abs() < self.inertia.stop_velocity {
            self.stop();
        }
        true
    }

    fn stop(&mut self) {
        if self.state == ControllerState::Animating {
            self.state = ControllerState::Idle;
        }
        self.angular_velocity = 0.0;
    }
}
