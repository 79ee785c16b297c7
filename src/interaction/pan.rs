use tracing::{debug, trace};

use crate::core::{AxisId, Point};

use super::controller::{
    AxisBounds, ControllerState, InertiaConfig, PanAxes, PlotController, PlotTarget,
};
use super::history::ViewSnapshot;
use super::velocity::VelocityCalculator;

#[derive(Debug, Clone, Copy)]
struct AxisDrag {
    axis: AxisId,
    min: f64,
    max: f64,
}

#[derive(Debug, Clone)]
struct PanDrag {
    start: Point,
    x: Option<AxisDrag>,
    y: Option<AxisDrag>,
    before: ViewSnapshot,
    moved: bool,
}

/// Drags the visible range with the pointer.
///
/// Moving the pointer right by `d` pixels moves the X range left by
/// `d / width * span`; moving it down moves the Y range up. With inertia
/// enabled a fast release keeps the view gliding with decaying speed.
#[derive(Debug, Clone, Default)]
pub struct PanController {
    pan_axes: PanAxes,
    x_bounds: AxisBounds,
    y_bounds: AxisBounds,
    inertia: InertiaConfig,
    state: ControllerState,
    drag: Option<PanDrag>,
    velocity: VelocityCalculator,
    animation_velocity: Point,
}

impl PanController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pan_axes(mut self, pan_axes: PanAxes) -> Self {
        self.pan_axes = pan_axes;
        self
    }

    #[must_use]
    pub fn with_x_bounds(mut self, bounds: AxisBounds) -> Self {
        self.x_bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_y_bounds(mut self, bounds: AxisBounds) -> Self {
        self.y_bounds = bounds;
        self
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: InertiaConfig) -> Self {
        self.inertia = inertia;
        self
    }

    #[must_use]
    pub fn pan_axes(&self) -> PanAxes {
        self.pan_axes
    }

    #[must_use]
    pub fn inertia(&self) -> InertiaConfig {
        self.inertia
    }

    pub fn set_inertia(&mut self, inertia: InertiaConfig) {
        self.inertia = inertia;
    }

    /// Current inertial velocity in pixels per second.
    #[must_use]
    pub fn animation_velocity(&self) -> Point {
        self.animation_velocity
    }

    fn axis_drag(target: &PlotTarget<'_>, axis: Option<AxisId>) -> Option<AxisDrag> {
        let id = axis?;
        let (min, max) = target.axis_range(Some(id))?;
        Some(AxisDrag { axis: id, min, max })
    }

    fn apply_offset(&self, drag: &PanDrag, offset: Point, target: &mut PlotTarget<'_>) -> bool {
        let mut changed = false;
        if let Some(x) = drag.x.filter(|_| target.size.width > 0.0) {
            let delta = -offset.x / target.size.width * (x.max - x.min);
            let (min, max) = self.x_bounds.clamp_shift(x.min + delta, x.max + delta);
            changed |= target.set_axis_range(x.axis, min, max);
        }
        if let Some(y) = drag.y.filter(|_| target.size.height > 0.0) {
            let delta = offset.y / target.size.height * (y.max - y.min);
            let (min, max) = self.y_bounds.clamp_shift(y.min + delta, y.max + delta);
            changed |= target.set_axis_range(y.axis, min, max);
        }
        changed
    }

    /// Shifts one axis by `pixels` of motion. Returns whether the view
    /// changed and whether a bound stopped it.
    fn glide_axis(
        target: &mut PlotTarget<'_>,
        axis: Option<AxisId>,
        view_size: f64,
        pixels: f64,
        bounds: AxisBounds,
    ) -> (bool, bool) {
        let (Some(id), Some((min, max))) = (axis, target.axis_range(axis)) else {
            return (false, true);
        };
        if view_size <= 0.0 {
            return (false, true);
        }
        let delta = pixels / view_size * (max - min);
        let (clamped_min, clamped_max) = bounds.clamp_shift(min + delta, max + delta);
        let blocked = (clamped_min - (min + delta)).abs() > f64::EPSILON * (max - min).abs();
        (target.set_axis_range(id, clamped_min, clamped_max), blocked)
    }
}

impl PlotController for PanController {
    fn state(&self) -> ControllerState {
        self.state
    }

    fn on_mouse_down(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        self.stop();
        let x_axis = target.x_axis.filter(|_| self.pan_axes.includes_x());
        let y_axis = target.y_axis.filter(|_| self.pan_axes.includes_y());
        let x = Self::axis_drag(target, x_axis);
        let y = Self::axis_drag(target, y_axis);
        if x.is_none() && y.is_none() {
            return false;
        }
        self.drag = Some(PanDrag {
            start: point,
            x,
            y,
            before: target.snapshot(self.pan_axes),
            moved: false,
        });
        self.velocity.reset();
        self.velocity.add_sample(time, point);
        self.state = ControllerState::Dragging;
        trace!(x = point.x, y = point.y, "pan started");
        false
    }

    fn on_mouse_move(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        self.velocity.add_sample(time, point);
        let offset = Point::new(point.x - drag.start.x, point.y - drag.start.y);
        // A click without motion must not pin measured axes.
        drag.moved |= offset != Point::default();
        let changed = drag.moved && self.apply_offset(&drag, offset, target);
        self.drag = Some(drag);
        changed
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
        if target.snapshot(self.pan_axes) != drag.before {
            target.history.push(drag.before);
        }

        let mut velocity = self.velocity.velocity();
        if drag.x.is_none() {
            velocity.x = 0.0;
        }
        if drag.y.is_none() {
            velocity.y = 0.0;
        }
        let speed = velocity.x.hypot(velocity.y);
        if self.inertia.enable_animation && speed >= self.inertia.start_velocity {
            self.animation_velocity = velocity;
            self.state = ControllerState::Animating;
            debug!(speed, "pan inertia started");
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
                trace!("pan cancelled");
                target.restore(&drag.before)
            }
            None => false,
        }
    }

    fn step_animation(&mut self, dt: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Animating || !dt.is_finite() || dt <= 0.0 {
            return false;
        }
        let motion = Point::new(
            self.animation_velocity.x * dt,
            self.animation_velocity.y * dt,
        );

        let mut changed = false;
        if self.animation_velocity.x != 0.0 {
            let (axis, width) = (target.x_axis, target.size.width);
            let (moved, blocked) =
                Self::glide_axis(target, axis, width, -motion.x, self.x_bounds);
            changed |= moved;
            if blocked {
                self.animation_velocity.x = 0.0;
            }
        }
        if self.animation_velocity.y != 0.0 {
            let (axis, height) = (target.y_axis, target.size.height);
            let (moved, blocked) =
                Self::glide_axis(target, axis, height, motion.y, self.y_bounds);
            changed |= moved;
            if blocked {
                self.animation_velocity.y = 0.0;
            }
        }

        let decay = self.inertia.decay(dt);
        self.animation_velocity.x *= decay;
        self.animation_velocity.y *= decay;
        let speed = self.animation_velocity.x.hypot(self.animation_velocity.y);
        trace!(speed, dt, "pan inertia step");
        if speed < self.inertia.stop_velocity {
            self.stop();
        }
        changed
    }

    fn stop(&mut self) {
        if self.state == ControllerState::Animating {
            self.state = ControllerState::Idle;
        }
        self.animation_velocity = Point::default();
    }
}
