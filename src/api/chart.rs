use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{Axis, AxisId, AxisSet, LabelKind, NumberFormat, Point, Rect, Size, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    ControllerState, PlotController, PlotTarget, ViewSnapshot, ZoomController, ZoomHistory,
};
use crate::layout::Component;
use crate::plot::{ChartPanel, PlotKind, ZoomAction};
use crate::render::{
    ApproxTextMeasurer, RenderContext, RenderFrame, Renderer, Stroke, TextHAlign, TextMeasurer,
    TextVAlign,
};
use crate::renderers::HitResult;
use crate::style::{Theme, TooltipStyle};

/// Text shown next to the pointer for the hovered item.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Pointer position in chart pixels.
    pub position: Point,
}

/// Persistable view of a chart: the axes and the polar angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartViewState {
    pub viewport: Viewport,
    pub axes: Vec<(AxisId, Axis)>,
    #[serde(default)]
    pub start_angle: Option<f64>,
}

/// Host-facing chart: owns the axes, the component tree, the active
/// controller and the render backend.
///
/// All calls run synchronously; the host forwards pointer events and an
/// animation tick and calls [`Chart::render`] whenever a call returns `true`.
pub struct Chart<R: Renderer> {
    renderer: R,
    viewport: Viewport,
    theme: Theme,
    tooltip_style: TooltipStyle,
    measurer: Box<dyn TextMeasurer>,
    axes: AxisSet,
    panel: ChartPanel,
    controller: Option<Box<dyn PlotController>>,
    button_zoom: ZoomController,
    history: ZoomHistory,
    show_tooltips: bool,
    tooltip: Option<Tooltip>,
    laid_out: Option<Viewport>,
}

impl<R: Renderer> Chart<R> {
    pub fn new(
        renderer: R,
        viewport: Viewport,
        axes: AxisSet,
        panel: ChartPanel,
    ) -> ChartResult<Self> {
        let viewport = viewport.validate()?;
        Ok(Self {
            renderer,
            viewport,
            theme: Theme::default(),
            tooltip_style: TooltipStyle::default(),
            measurer: Box::new(ApproxTextMeasurer::default()),
            axes,
            panel,
            controller: None,
            button_zoom: ZoomController::new(),
            history: ZoomHistory::default(),
            show_tooltips: true,
            tooltip: None,
            laid_out: None,
        })
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.viewport = viewport.validate()?;
        self.panel.invalidate_layout();
        Ok(())
    }

    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) -> ChartResult<()> {
        theme.validate()?;
        self.theme = theme;
        self.panel.invalidate_layout();
        Ok(())
    }

    #[must_use]
    pub fn tooltip_style(&self) -> &TooltipStyle {
        &self.tooltip_style
    }

    pub fn set_tooltip_style(&mut self, style: TooltipStyle) {
        self.tooltip_style = style;
    }

    #[must_use]
    pub fn show_tooltips(&self) -> bool {
        self.show_tooltips
    }

    pub fn set_show_tooltips(&mut self, show: bool) {
        self.show_tooltips = show;
        if !show {
            self.tooltip = None;
        }
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn set_text_measurer(&mut self, measurer: impl TextMeasurer + 'static) {
        self.measurer = Box::new(measurer);
        self.panel.invalidate_layout();
    }

    #[must_use]
    pub fn axes(&self) -> &AxisSet {
        &self.axes
    }

    /// Mutable axes; the next pass re-lays out the chart.
    pub fn axes_mut(&mut self) -> &mut AxisSet {
        self.panel.invalidate_layout();
        &mut self.axes
    }

    #[must_use]
    pub fn panel(&self) -> &ChartPanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ChartPanel {
        &mut self.panel
    }

    #[must_use]
    pub fn plot(&self) -> &PlotKind {
        self.panel.plot()
    }

    pub fn plot_mut(&mut self) -> &mut PlotKind {
        self.panel.plot_mut()
    }

    #[must_use]
    pub fn controller(&self) -> Option<&dyn PlotController> {
        self.controller.as_deref()
    }

    pub fn set_controller(&mut self, controller: Option<Box<dyn PlotController>>) {
        if let Some(previous) = self.controller.as_deref_mut() {
            previous.stop();
        }
        self.controller = controller;
    }

    /// Zoom applied by the zoom widget buttons, independent of the
    /// pointer controller.
    pub fn set_button_zoom(&mut self, zoom: ZoomController) {
        self.button_zoom = zoom;
    }

    #[must_use]
    pub fn show_zoom_widgets(&self) -> bool {
        self.panel.zoom_widgets().is_some()
    }

    pub fn set_show_zoom_widgets(&mut self, show: bool) {
        self.panel.set_show_zoom_widgets(show);
    }

    #[must_use]
    pub fn controller_state(&self) -> ControllerState {
        self.controller
            .as_deref()
            .map_or(ControllerState::Idle, |controller| controller.state())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.controller_state() == ControllerState::Animating
    }

    #[must_use]
    pub fn history(&self) -> &ZoomHistory {
        &self.history
    }

    /// Plot area in chart pixels, valid after a layout pass.
    #[must_use]
    pub fn plot_rect(&self) -> Rect {
        let bounds = self.panel.plot_bounds();
        let origin = self.panel.to_parent(Point::new(bounds.x, bounds.y));
        Rect::new(origin.x, origin.y, bounds.width, bounds.height)
    }

    /// Syncs data ranges and runs measure and arrange when anything changed.
    pub fn update_layout(&mut self) {
        if self.panel.plot_mut().update_data_ranges(&mut self.axes) {
            self.panel.invalidate_layout();
        }
        if self.laid_out == Some(self.viewport) && !self.panel.needs_layout() {
            return;
        }
        let size = self.viewport.size();
        let ctx = RenderContext::new(
            self.viewport,
            &self.theme,
            &self.tooltip_style,
            &self.axes,
            self.measurer.as_ref(),
        );
        self.panel.measure(size.width, size.height, &ctx);
        self.panel.arrange(0.0, 0.0, size.width, size.height, &ctx);
        self.laid_out = Some(self.viewport);
        debug!(
            width = size.width,
            height = size.height,
            plot = ?self.panel.plot_bounds(),
            "chart layout updated"
        );
    }

    /// Topmost data item under `point`, in chart pixels.
    pub fn hit_test(&mut self, point: Point) -> Option<HitResult> {
        self.update_layout();
        let ctx = RenderContext::new(
            self.viewport,
            &self.theme,
            &self.tooltip_style,
            &self.axes,
            self.measurer.as_ref(),
        );
        self.panel.hit_test(point, &ctx)
    }

    /// Lays out and draws the chart into a fresh frame.
    pub fn build_frame(&mut self) -> ChartResult<RenderFrame> {
        self.update_layout();
        let plot_rect = self.plot_rect();
        let preview = self
            .controller
            .as_deref()
            .and_then(|controller| controller.preview_rect())
            .map(|rect| rect.translate(plot_rect.x, plot_rect.y));

        let mut ctx = RenderContext::new(
            self.viewport,
            &self.theme,
            &self.tooltip_style,
            &self.axes,
            self.measurer.as_ref(),
        );
        self.panel.draw(&mut ctx);
        if let Some(rect) = preview {
            ctx.draw_rect(rect, None, Some(self.theme.highlight()));
        }
        if let Some(tooltip) = &self.tooltip {
            draw_tooltip(&mut ctx, tooltip, self.viewport.size());
        }
        let frame = ctx.into_frame();
        frame.validate()?;
        Ok(frame)
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame()?;
        trace!(stats = ?frame.stats(), "rendering chart frame");
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, time: f64) -> bool {
        self.update_layout();
        let point = Point::new(x, y);
        if let Some(action) = self.panel.zoom_action_at(point) {
            trace!(x, y, ?action, "zoom widget pressed");
            self.apply_zoom_action(action);
            return true;
        }
        if !self.plot_rect().contains(point) {
            return false;
        }
        let local = self.panel.to_plot_local(point);
        trace!(x, y, "pointer down");
        self.with_controller(|controller, target| controller.on_mouse_down(local, time, target))
    }

    /// Drives an active drag, or updates the hovered item and its tooltip.
    pub fn pointer_move(&mut self, x: f64, y: f64, time: f64) -> bool {
        self.update_layout();
        let point = Point::new(x, y);
        if self.controller_state() == ControllerState::Dragging {
            let local = self.panel.to_plot_local(point);
            return self
                .with_controller(|controller, target| controller.on_mouse_move(local, time, target));
        }
        self.update_hover(point)
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, time: f64) -> bool {
        if self.controller_state() != ControllerState::Dragging {
            return false;
        }
        let local = self.panel.to_plot_local(Point::new(x, y));
        trace!(x, y, "pointer up");
        self.with_controller(|controller, target| controller.on_mouse_up(local, time, target))
    }

    /// Cancels a drag in progress and clears the hover state.
    pub fn pointer_leave(&mut self) -> bool {
        let cancelled = self.with_controller(|controller, target| controller.on_mouse_leave(target));
        let unhighlighted = self.panel.plot_mut().set_highlight(None);
        let had_tooltip = self.tooltip.take().is_some();
        cancelled || unhighlighted || had_tooltip
    }

    /// Positive `delta` zooms in by that many notches around the pointer.
    pub fn pointer_wheel(&mut self, delta: f64, x: f64, y: f64) -> bool {
        self.update_layout();
        let point = Point::new(x, y);
        if !self.plot_rect().contains(point) {
            return false;
        }
        let local = self.panel.to_plot_local(point);
        self.with_controller(|controller, target| controller.on_mouse_wheel(delta, local, target))
    }

    /// Advances inertial motion by `dt` seconds.
    pub fn step_animation(&mut self, dt: f64) -> bool {
        if !self.is_animating() {
            return false;
        }
        self.with_controller(|controller, target| controller.step_animation(dt, target))
    }

    /// Cancels inertial motion.
    pub fn stop_animation(&mut self) {
        if let Some(controller) = self.controller.as_deref_mut() {
            controller.stop();
        }
    }

    pub fn apply_zoom_action(&mut self, action: ZoomAction) -> bool {
        match action {
            ZoomAction::ZoomIn => self.zoom_by(1.0),
            ZoomAction::ZoomOut => self.zoom_by(-1.0),
            ZoomAction::Reset => self.reset_zoom(),
        }
    }

    /// Wheel zoom by `notches` around the plot center. Each step is undoable.
    pub fn zoom_by(&mut self, notches: f64) -> bool {
        self.update_layout();
        self.stop_animation();
        let mut target = plot_target(&self.panel, &mut self.axes, &mut self.history);
        let center = target.center;
        let changed = self.button_zoom.on_mouse_wheel(notches, center, &mut target);
        let start_angle = target.start_angle;
        if changed {
            self.apply_view_change(start_angle);
        }
        changed
    }

    /// Lets the plot axes follow their data again. Undo brings the zoomed
    /// view back.
    pub fn reset_zoom(&mut self) -> bool {
        self.stop_animation();
        let Some(plot) = self.plot().as_cartesian() else {
            return false;
        };
        let ids = [plot.x_axis(), plot.y_axis()];
        let before = ViewSnapshot::capture_axes(&self.axes, ids);
        let mut changed = false;
        for id in ids {
            if let Some(axis) = self.axes.get_mut(id) {
                changed |= axis.min_value().is_some() || axis.max_value().is_some();
                axis.reset_range();
            }
        }
        if changed {
            self.history.push(before);
            debug!("zoom reset to measured ranges");
            self.apply_view_change(0.0);
        }
        changed
    }

    /// Restores the view before the last committed gesture.
    pub fn undo(&mut self) -> bool {
        self.stop_animation();
        let mut target = plot_target(&self.panel, &mut self.axes, &mut self.history);
        let changed = target.undo();
        let start_angle = target.start_angle;
        if changed {
            self.apply_view_change(start_angle);
        }
        changed
    }

    #[must_use]
    pub fn view_state(&self) -> ChartViewState {
        ChartViewState {
            viewport: self.viewport,
            axes: self.axes.iter().map(|(id, axis)| (id, axis.clone())).collect(),
            start_angle: self.plot().as_polar().map(|plot| plot.start_angle()),
        }
    }

    /// Replaces known axes and the polar angle. Axes are re-measured from
    /// data on the next pass.
    pub fn restore_view_state(&mut self, state: &ChartViewState) -> ChartResult<()> {
        self.resize(state.viewport)?;
        for (id, axis) in &state.axes {
            let axis = axis.clone().validate()?;
            let slot = self.axes.get_mut(*id).ok_or_else(|| {
                ChartError::Persistence(format!("view state names unknown axis {}", id.raw()))
            })?;
            *slot = axis;
        }
        match self.panel.plot_mut() {
            PlotKind::Cartesian(plot) => plot.invalidate_data_ranges(),
            PlotKind::Polar(plot) => {
                if let Some(angle) = state.start_angle {
                    plot.set_start_angle(angle);
                }
            }
        }
        self.history.clear();
        self.panel.invalidate_layout();
        Ok(())
    }

    fn update_hover(&mut self, point: Point) -> bool {
        let hit = self.hit_test(point);
        let mut changed = self.panel.plot_mut().set_highlight(hit);
        let tooltip = hit.filter(|_| self.show_tooltips).map(|hit| Tooltip {
            text: self
                .plot()
                .label_for(&hit, LabelKind::ToolTip)
                .unwrap_or_else(|| NumberFormat::Auto.format(hit.value)),
            position: point,
        });
        if tooltip != self.tooltip {
            self.tooltip = tooltip;
            changed = true;
        }
        changed
    }

    fn with_controller(
        &mut self,
        handle: impl FnOnce(&mut dyn PlotController, &mut PlotTarget<'_>) -> bool,
    ) -> bool {
        let Some(controller) = self.controller.as_deref_mut() else {
            return false;
        };
        let mut target = plot_target(&self.panel, &mut self.axes, &mut self.history);
        let changed = handle(controller, &mut target);
        let start_angle = target.start_angle;
        if changed {
            self.apply_view_change(start_angle);
        }
        changed
    }

    fn apply_view_change(&mut self, start_angle: f64) {
        if let Some(plot) = self.panel.plot_mut().as_polar_mut() {
            if plot.start_angle() != start_angle {
                plot.set_start_angle(start_angle);
            }
        }
        self.panel.plot_mut().set_highlight(None);
        self.tooltip = None;
        self.panel.invalidate_layout();
    }
}

#[cfg(feature = "cairo-backend")]
impl<R: Renderer + crate::render::CairoContextRenderer> Chart<R> {
    /// Draws into a host-owned Cairo context, such as a toolkit draw callback.
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> ChartResult<()> {
        let frame = self.build_frame()?;
        trace!(stats = ?frame.stats(), "rendering chart frame on external context");
        self.renderer.render_on_cairo_context(context, &frame)
    }
}

fn plot_target<'a>(
    panel: &ChartPanel,
    axes: &'a mut AxisSet,
    history: &'a mut ZoomHistory,
) -> PlotTarget<'a> {
    let size = panel.plot_bounds().size();
    let (x_axis, y_axis, start_angle) = match panel.plot() {
        PlotKind::Cartesian(plot) => (Some(plot.x_axis()), Some(plot.y_axis()), 0.0),
        PlotKind::Polar(plot) => (None, None, plot.start_angle()),
    };
    PlotTarget {
        axes,
        x_axis,
        y_axis,
        size,
        center: Rect::from_size(size).center(),
        start_angle,
        history,
    }
}

/// Boxed tooltip beside the pointer, flipped to stay inside the viewport.
fn draw_tooltip(ctx: &mut RenderContext<'_>, tooltip: &Tooltip, viewport: Size) {
    let style = ctx.tooltip_style();
    let text = ctx.measure_text(&tooltip.text, style.font_size);
    let size = Size::new(
        text.width + 2.0 * style.horizontal_padding,
        text.height + 2.0 * style.vertical_padding,
    );
    let mut x = tooltip.position.x + style.offset;
    if x + size.width > viewport.width {
        x = tooltip.position.x - style.offset - size.width;
    }
    let mut y = tooltip.position.y + style.offset;
    if y + size.height > viewport.height {
        y = tooltip.position.y - style.offset - size.height;
    }
    let bounds = Rect::new(x.max(0.0), y.max(0.0), size.width, size.height);
    ctx.draw_rect(
        bounds,
        Some(style.background),
        Some(Stroke::solid(style.border, style.border_thickness)),
    );
    ctx.draw_text(
        &tooltip.text,
        Point::new(
            bounds.x + style.horizontal_padding,
            bounds.y + style.vertical_padding,
        ),
        style.font_size,
        style.text_color,
        TextHAlign::Left,
        TextVAlign::Top,
    );
}
