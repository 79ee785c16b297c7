use tracing::{debug, trace};

use crate::core::{AxisId, Point, Rect};

use super::controller::{AxisBounds, ControllerState, PanAxes, PlotController, PlotTarget};

/// Smallest drag, in pixels along each zoomed axis, that commits a zoom.
pub const DEFAULT_MIN_DRAG_PX: f64 = 8.0;

/// Scale applied per wheel notch.
pub const DEFAULT_WHEEL_FACTOR: f64 = 1.2;

#[derive(Debug, Clone, Copy)]
struct ZoomDrag {
    start: Point,
    current: Point,
}

/// Rubber-band zoom with wheel zoom and undo.
///
/// Dragging outlines a rectangle (see [`PlotController::preview_rect`]);
/// releasing zooms both selected axes to it. The axes are only touched on
/// release, so leaving the plot mid-drag has nothing to restore.
#[derive(Debug, Clone)]
pub struct ZoomController {
    zoom_axes: PanAxes,
    x_bounds: AxisBounds,
    y_bounds: AxisBounds,
    min_drag_px: f64,
    min_span: f64,
    wheel_factor: f64,
    state: ControllerState,
    drag: Option<ZoomDrag>,
    view: Rect,
}

impl Default for ZoomController {
    fn default() -> Self {
        Self {
            zoom_axes: PanAxes::Both,
            x_bounds: AxisBounds::UNBOUNDED,
            y_bounds: AxisBounds::UNBOUNDED,
            min_drag_px: DEFAULT_MIN_DRAG_PX,
            min_span: 1e-9,
            wheel_factor: DEFAULT_WHEEL_FACTOR,
            state: ControllerState::Idle,
            drag: None,
            view: Rect::default(),
        }
    }
}

impl ZoomController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_zoom_axes(mut self, zoom_axes: PanAxes) -> Self {
        self.zoom_axes = zoom_axes;
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
    pub fn with_min_drag_px(mut self, pixels: f64) -> Self {
        self.min_drag_px = pixels.max(0.0);
        self
    }

    /// Narrowest range, in data units, a zoom may produce.
    #[must_use]
    pub fn with_min_span(mut self, span: f64) -> Self {
        if span.is_finite() && span > 0.0 {
            self.min_span = span;
        }
        self
    }

    /// Values at or below 1 are ignored.
    #[must_use]
    pub fn with_wheel_factor(mut self, factor: f64) -> Self {
        if factor.is_finite() && factor > 1.0 {
            self.wheel_factor = factor;
        }
        self
    }

    #[must_use]
    pub fn zoom_axes(&self) -> PanAxes {
        self.zoom_axes
    }

    #[must_use]
    pub fn min_span(&self) -> f64 {
        self.min_span
    }

    /// Restores the view before the last committed zoom or pan.
    pub fn undo(&mut self, target: &mut PlotTarget<'_>) -> bool {
        self.stop();
        target.undo()
    }

    /// Applies the span floor and the bounds to a candidate range.
    fn constrain(&self, min: f64, max: f64, bounds: AxisBounds) -> Option<(f64, f64)> {
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let (mut min, mut max) = (min.min(max), min.max(max));
        if max - min < self.min_span {
            let center = (min + max) / 2.0;
            min = center - self.min_span / 2.0;
            max = center + self.min_span / 2.0;
        }
        let (min, max) = bounds.clamp_range(min, max);
        (max - min >= self.min_span).then_some((min, max))
    }

    fn zoom_rect(&self, rect: Rect, target: &mut PlotTarget<'_>) -> bool {
        let size = target.size;
        let mut ranges = Vec::with_capacity(2);
        if self.zoom_axes.includes_x() {
            if let Some(id) = target.x_axis {
                let Some(axis) = target.axes.get(id) else {
                    return false;
                };
                let min = axis.map_pixel_to_value_x(rect.x, size.width);
                let max = axis.map_pixel_to_value_x(rect.right(), size.width);
                match self.constrain(min, max, self.x_bounds) {
                    Some((min, max)) => ranges.push((id, min, max)),
                    None => return false,
                }
            }
        }
        if self.zoom_axes.includes_y() {
            if let Some(id) = target.y_axis {
                let Some(axis) = target.axes.get(id) else {
                    return false;
                };
                let min = axis.map_pixel_to_value_y(rect.bottom(), size.height);
                let max = axis.map_pixel_to_value_y(rect.y, size.height);
                match self.constrain(min, max, self.y_bounds) {
                    Some((min, max)) => ranges.push((id, min, max)),
                    None => return false,
                }
            }
        }
        self.commit(ranges, target)
    }

    fn commit(&self, ranges: Vec<(AxisId, f64, f64)>, target: &mut PlotTarget<'_>) -> bool {
        if ranges.is_empty() {
            return false;
        }
        let before = target.snapshot(self.zoom_axes);
        let mut changed = false;
        for (id, min, max) in ranges {
            changed |= target.set_axis_range(id, min, max);
        }
        if changed {
            target.history.push(before);
        }
        changed
    }

    fn preview_for(&self, drag: ZoomDrag) -> Rect {
        let rect = Rect::from_corners(drag.start, drag.current);
        match self.zoom_axes {
            PanAxes::Both => rect,
            PanAxes::X => Rect::new(rect.x, self.view.y, rect.width, self.view.height),
            PanAxes::Y => Rect::new(self.view.x, rect.y, self.view.width, rect.height),
        }
    }

    fn is_large_enough(&self, rect: Rect) -> bool {
        let wide = !self.zoom_axes.includes_x() || rect.width >= self.min_drag_px;
        let tall = !self.zoom_axes.includes_y() || rect.height >= self.min_drag_px;
        wide && tall
    }
}

impl PlotController for ZoomController {
    fn state(&self) -> ControllerState {
        self.state
    }

    fn on_mouse_down(&mut self, point: Point, _time: f64, target: &mut PlotTarget<'_>) -> bool {
        self.view = Rect::from_size(target.size);
        self.drag = Some(ZoomDrag {
            start: point,
            current: point,
        });
        self.state = ControllerState::Dragging;
        trace!(x = point.x, y = point.y, "zoom rectangle started");
        false
    }

    fn on_mouse_move(&mut self, point: Point, _time: f64, _target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        match self.drag.as_mut() {
            Some(drag) if drag.current != point => {
                // Only the outline moves; axes change on release.
                drag.current = point;
                true
            }
            _ => false,
        }
    }

    fn on_mouse_up(&mut self, point: Point, time: f64, target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        let moved = self.on_mouse_move(point, time, target);
        self.state = ControllerState::Idle;
        let Some(drag) = self.drag.take() else {
            return moved;
        };
        let rect = self.preview_for(drag);
        if !self.is_large_enough(rect) {
            trace!(width = rect.width, height = rect.height, "zoom rectangle too small");
            return moved || drag.start != drag.current;
        }
        let zoomed = self.zoom_rect(rect, target);
        if zoomed {
            debug!(?rect, "zoomed to rectangle");
        }
        // The outline disappears either way.
        true
    }

    fn on_mouse_leave(&mut self, _target: &mut PlotTarget<'_>) -> bool {
        if self.state != ControllerState::Dragging {
            return false;
        }
        self.state = ControllerState::Idle;
        self.drag.take().is_some()
    }

    fn on_mouse_wheel(&mut self, delta: f64, point: Point, target: &mut PlotTarget<'_>) -> bool {
        if !delta.is_finite() || delta == 0.0 || self.state == ControllerState::Dragging {
            return false;
        }
        let factor = self.wheel_factor.powf(delta);
        let size = target.size;
        let mut ranges = Vec::with_capacity(2);
        if self.zoom_axes.includes_x() {
            if let Some((id, axis)) = target.x_axis.and_then(|id| Some((id, target.axes.get(id)?)))
            {
                let (min, max) = axis.effective_range();
                let pivot = axis.map_pixel_to_value_x(point.x, size.width);
                let candidate = (pivot - (pivot - min) / factor, pivot + (max - pivot) / factor);
                if let Some((min, max)) = self.constrain(candidate.0, candidate.1, self.x_bounds) {
                    ranges.push((id, min, max));
                }
            }
        }
        if self.zoom_axes.includes_y() {
            if let Some((id, axis)) = target.y_axis.and_then(|id| Some((id, target.axes.get(id)?)))
            {
                let (min, max) = axis.effective_range();
                let pivot = axis.map_pixel_to_value_y(point.y, size.height);
                let candidate = (pivot - (pivot - min) / factor, pivot + (max - pivot) / factor);
                if let Some((min, max)) = self.constrain(candidate.0, candidate.1, self.y_bounds) {
                    ranges.push((id, min, max));
                }
            }
        }
        trace!(delta, factor, "wheel zoom");
        self.commit(ranges, target)
    }

    fn stop(&mut self) {
        if self.state == ControllerState::Animating {
            self.state = ControllerState::Idle;
        }
    }

    fn preview_rect(&self) -> Option<Rect> {
        self.drag
            .filter(|_| self.state == ControllerState::Dragging)
            .map(|drag| self.preview_for(drag))
    }
}
