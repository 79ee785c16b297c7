use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{AxisId, AxisSet, Point, Rect, Size};

use super::history::{ViewSnapshot, ZoomHistory};

/// Gesture state shared by every controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerState {
    #[default]
    Idle,
    Dragging,
    Animating,
}

/// Tuning for inertial motion after release.
///
/// Velocities are in pixels per second for pan and degrees per second for
/// rotation. Each animation step multiplies the velocity by
/// `decay_per_second.powf(dt)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InertiaConfig {
    pub enable_animation: bool,
    /// Release speed needed to start animating.
    pub start_velocity: f64,
    /// Animation stops once speed drops below this.
    pub stop_velocity: f64,
    pub decay_per_second: f64,
}

impl Default for InertiaConfig {
    fn default() -> Self {
        Self {
            enable_animation: true,
            start_velocity: 200.0,
            stop_velocity: 5.0,
            decay_per_second: 0.05,
        }
    }
}

impl InertiaConfig {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enable_animation: false,
            ..Self::default()
        }
    }

    /// Defaults for angular motion, in degrees per second.
    #[must_use]
    pub fn angular() -> Self {
        Self {
            start_velocity: 30.0,
            stop_velocity: 1.0,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_enable_animation(mut self, enable: bool) -> Self {
        self.enable_animation = enable;
        self
    }

    #[must_use]
    pub fn with_start_velocity(mut self, velocity: f64) -> Self {
        self.start_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_stop_velocity(mut self, velocity: f64) -> Self {
        self.stop_velocity = velocity;
        self
    }

    #[must_use]
    pub fn with_decay_per_second(mut self, decay: f64) -> Self {
        self.decay_per_second = decay;
        self
    }

    /// Velocity factor after `dt` seconds.
    #[must_use]
    pub fn decay(&self, dt: f64) -> f64 {
        self.decay_per_second.clamp(0.0, 1.0).powf(dt.max(0.0))
    }
}

/// Which axes a pan or zoom gesture moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PanAxes {
    X,
    Y,
    #[default]
    Both,
}

impl PanAxes {
    #[must_use]
    pub fn includes_x(self) -> bool {
        matches!(self, Self::X | Self::Both)
    }

    #[must_use]
    pub fn includes_y(self) -> bool {
        matches!(self, Self::Y | Self::Both)
    }
}

/// Scroll limits for one axis. Unset sides are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AxisBounds {
    pub const UNBOUNDED: Self = Self {
        min: None,
        max: None,
    };

    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Shifts `[min, max]` back inside the bounds, keeping its span. A span
    /// wider than the bounds collapses to the bounds.
    #[must_use]
    pub fn clamp_shift(&self, min: f64, max: f64) -> (f64, f64) {
        if let (Some(lower), Some(upper)) = (self.min, self.max) {
            if max - min >= upper - lower {
                return (lower, upper);
            }
        }
        let mut shift = 0.0;
        if let Some(lower) = self.min.filter(|lower| min < *lower) {
            shift = lower - min;
        }
        if let Some(upper) = self.max.filter(|upper| max > *upper) {
            shift = upper - max;
        }
        (min + shift, max + shift)
    }

    /// Cuts `[min, max]` to the bounds on each side independently.
    #[must_use]
    pub fn clamp_range(&self, min: f64, max: f64) -> (f64, f64) {
        (
            self.min.map_or(min, |lower| min.max(lower)),
            self.max.map_or(max, |upper| max.min(upper)),
        )
    }
}

/// Mutable view of the plot a controller drives.
///
/// Pointer coordinates handed to controllers are local to the plot area
/// described by `size`. `start_angle` is written back to the polar plot by
/// the caller once the event is handled.
#[derive(Debug)]
pub struct PlotTarget<'a> {
    pub axes: &'a mut AxisSet,
    pub x_axis: Option<AxisId>,
    pub y_axis: Option<AxisId>,
    pub size: Size,
    pub center: Point,
    pub start_angle: f64,
    pub history: &'a mut ZoomHistory,
}

impl PlotTarget<'_> {
    #[must_use]
    pub fn axis_range(&self, axis: Option<AxisId>) -> Option<(f64, f64)> {
        axis.and_then(|id| self.axes.get(id))
            .map(|axis| axis.effective_range())
    }

    /// Applies an explicit range, logging and skipping invalid ones.
    pub fn set_axis_range(&mut self, axis: AxisId, min: f64, max: f64) -> bool {
        let Some(state) = self.axes.get_mut(axis) else {
            warn!(?axis, "controller target axis is missing");
            return false;
        };
        if state.effective_range() == (min, max) && state.min_value().is_some() {
            return false;
        }
        match state.zoom_to(min, max) {
            Ok(()) => true,
            Err(err) => {
                warn!(?axis, min, max, %err, "controller range rejected");
                false
            }
        }
    }

    /// Captures the explicit bounds of the target axes selected by `axes`.
    #[must_use]
    pub fn snapshot(&self, axes: PanAxes) -> ViewSnapshot {
        let ids = [
            self.x_axis.filter(|_| axes.includes_x()),
            self.y_axis.filter(|_| axes.includes_y()),
        ];
        ViewSnapshot::capture_axes(&*self.axes, ids.into_iter().flatten())
    }

    /// Restores a snapshot, logging failures.
    pub fn restore(&mut self, snapshot: &ViewSnapshot) -> bool {
        match snapshot.restore(&mut *self.axes, &mut self.start_angle) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "failed to restore plot view");
                false
            }
        }
    }

    /// Pops the latest committed view and restores it.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(snapshot) => self.restore(&snapshot),
            None => false,
        }
    }
}

/// Turns pointer input into axis range or angle changes.
///
/// `time` is the host timestamp of the event in seconds. Every handler
/// returns whether the view changed and needs a redraw.
pub trait PlotController: fmt::Debug {
    fn state(&self) -> ControllerState;

    fn on_mouse_down(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool;

    fn on_mouse_move(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool;

    fn on_mouse_up(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool;

    /// Aborts a drag in progress, restoring the view captured on press.
    fn on_mouse_leave(&mut self, target: &mut PlotTarget<'_>) -> bool;

    /// Positive `delta` zooms in by that many wheel notches.
    fn on_mouse_wheel(&mut self, _delta: f64, _point: Point, _target: &mut PlotTarget<'_>) -> bool {
        false
    }

    /// Advances inertial motion by `dt` seconds.
    fn step_animation(&mut self, _dt: f64, _target: &mut PlotTarget<'_>) -> bool {
        false
    }

    /// Cancels any running animation.
    fn stop(&mut self);

    /// Rectangle to outline while a zoom drag is in progress.
    fn preview_rect(&self) -> Option<Rect> {
        None
    }

    fn is_animating(&self) -> bool {
        self.state() == ControllerState::Animating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_shift_keeps_span() {
        let bounds = AxisBounds::new(0.0, 100.0);
        assert_eq!(bounds.clamp_shift(-10.0, 40.0), (0.0, 50.0));
        assert_eq!(bounds.clamp_shift(70.0, 120.0), (50.0, 100.0));
        assert_eq!(bounds.clamp_shift(-10.0, 200.0), (0.0, 100.0));
        assert_eq!(AxisBounds::UNBOUNDED.clamp_shift(-10.0, 5.0), (-10.0, 5.0));
    }

    #[test]
    fn decay_is_identity_at_zero_dt() {
        let config = InertiaConfig::default();
        assert_eq!(config.decay(0.0), 1.0);
        assert!(config.decay(1.0) < 0.1);
    }
}
