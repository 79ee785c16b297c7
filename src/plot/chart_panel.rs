use tracing::trace;

use crate::core::{AxisSet, LabelKind, Margins, Point, Rect, Size};
use crate::layout::{Component, GridLength, LayoutProps, TextComponent, resolve_tracks, shrink_extent};
use crate::render::RenderContext;
use crate::renderers::{HitResult, LegendItem};
use crate::style::Theme;

use super::axis_renderer::{AxisPosition, AxisRenderer};
use super::legend::LegendRenderer;
use super::plot2d::Plot2D;
use super::polar::PolarPlot;
use super::zoom_widgets::{ZoomAction, ZoomWidgets};

/// The plot hosted by a chart.
#[derive(Debug)]
pub enum PlotKind {
    Cartesian(Plot2D),
    Polar(PolarPlot),
}

impl PlotKind {
    #[must_use]
    pub fn as_component(&self) -> &dyn Component {
        match self {
            Self::Cartesian(plot) => plot,
            Self::Polar(plot) => plot,
        }
    }

    pub fn as_component_mut(&mut self) -> &mut dyn Component {
        match self {
            Self::Cartesian(plot) => plot,
            Self::Polar(plot) => plot,
        }
    }

    #[must_use]
    pub fn as_cartesian(&self) -> Option<&Plot2D> {
        match self {
            Self::Cartesian(plot) => Some(plot),
            Self::Polar(_) => None,
        }
    }

    pub fn as_cartesian_mut(&mut self) -> Option<&mut Plot2D> {
        match self {
            Self::Cartesian(plot) => Some(plot),
            Self::Polar(_) => None,
        }
    }

    #[must_use]
    pub fn as_polar(&self) -> Option<&PolarPlot> {
        match self {
            Self::Polar(plot) => Some(plot),
            Self::Cartesian(_) => None,
        }
    }

    pub fn as_polar_mut(&mut self) -> Option<&mut PolarPlot> {
        match self {
            Self::Polar(plot) => Some(plot),
            Self::Cartesian(_) => None,
        }
    }

    /// Syncs data changes; cartesian plots also re-measure their axes.
    pub fn update_data_ranges(&mut self, axes: &mut AxisSet) -> bool {
        match self {
            Self::Cartesian(plot) => plot.update_data_ranges(axes),
            Self::Polar(plot) => plot.sync_changes(),
        }
    }

    #[must_use]
    pub fn highlight(&self) -> Option<HitResult> {
        match self {
            Self::Cartesian(plot) => plot.highlight(),
            Self::Polar(plot) => plot.highlight(),
        }
    }

    pub fn set_highlight(&mut self, hit: Option<HitResult>) -> bool {
        match self {
            Self::Cartesian(plot) => plot.set_highlight(hit),
            Self::Polar(plot) => plot.set_highlight(hit),
        }
    }

    #[must_use]
    pub fn label_for(&self, hit: &HitResult, kind: LabelKind) -> Option<String> {
        match self {
            Self::Cartesian(plot) => plot.label_for(hit, kind),
            Self::Polar(plot) => plot.label_for(hit, kind),
        }
    }

    #[must_use]
    pub fn legend_items(
        &self,
        theme: &Theme,
        show_series_elements: bool,
        element_label_kind: LabelKind,
    ) -> Vec<LegendItem> {
        match self {
            Self::Cartesian(plot) => {
                plot.legend_items(theme, show_series_elements, element_label_kind)
            }
            Self::Polar(plot) => plot.legend_items(theme, show_series_elements, element_label_kind),
        }
    }
}

impl From<Plot2D> for PlotKind {
    fn from(plot: Plot2D) -> Self {
        Self::Cartesian(plot)
    }
}

impl From<PolarPlot> for PlotKind {
    fn from(plot: PolarPlot) -> Self {
        Self::Polar(plot)
    }
}

/// Title, plot, axes and legend on a 3x3 grid: the title spans the top
/// row, the body row holds `y axis | plot | legend`, and the x axis sits
/// under the plot. Optional zoom buttons float over the plot's top-right
/// corner.
#[derive(Debug)]
pub struct ChartPanel {
    props: LayoutProps,
    title: TextComponent,
    show_title: bool,
    plot: PlotKind,
    x_axis: Option<AxisRenderer>,
    y_axis: Option<AxisRenderer>,
    legend: Option<LegendRenderer>,
    zoom_widgets: Option<ZoomWidgets>,
}

impl ChartPanel {
    pub const DEFAULT_TITLE_MARGIN: f64 = 8.0;

    /// Cartesian plots get a bottom and a left axis renderer; polar plots
    /// get none.
    #[must_use]
    pub fn new(plot: impl Into<PlotKind>) -> Self {
        let plot = plot.into();
        let (x_axis, y_axis) = match &plot {
            PlotKind::Cartesian(plot) => (
                Some(AxisRenderer::new(plot.x_axis(), AxisPosition::Bottom)),
                Some(AxisRenderer::new(plot.y_axis(), AxisPosition::Left)),
            ),
            PlotKind::Polar(_) => (None, None),
        };
        let mut panel = Self {
            props: LayoutProps::default(),
            title: TextComponent::new(""),
            show_title: true,
            plot,
            x_axis,
            y_axis,
            legend: None,
            zoom_widgets: None,
        };
        panel.set_title_margin(Self::DEFAULT_TITLE_MARGIN);
        panel
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.title.text()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title.set_text(title);
        self.invalidate_layout();
    }

    #[must_use]
    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
        self.title.props_mut().visible = show;
        self.invalidate_layout();
    }

    /// Gap between the title and the chart body.
    pub fn set_title_margin(&mut self, margin: f64) {
        self.title.props_mut().margin = Margins::new(0.0, 0.0, 0.0, margin.max(0.0));
        self.invalidate_layout();
    }

    #[must_use]
    pub fn plot(&self) -> &PlotKind {
        &self.plot
    }

    pub fn plot_mut(&mut self) -> &mut PlotKind {
        &mut self.plot
    }

    #[must_use]
    pub fn x_axis_renderer(&self) -> Option<&AxisRenderer> {
        self.x_axis.as_ref()
    }

    pub fn x_axis_renderer_mut(&mut self) -> Option<&mut AxisRenderer> {
        self.x_axis.as_mut()
    }

    #[must_use]
    pub fn y_axis_renderer(&self) -> Option<&AxisRenderer> {
        self.y_axis.as_ref()
    }

    pub fn y_axis_renderer_mut(&mut self) -> Option<&mut AxisRenderer> {
        self.y_axis.as_mut()
    }

    #[must_use]
    pub fn legend(&self) -> Option<&LegendRenderer> {
        self.legend.as_ref()
    }

    pub fn legend_mut(&mut self) -> Option<&mut LegendRenderer> {
        self.legend.as_mut()
    }

    pub fn set_legend(&mut self, legend: Option<LegendRenderer>) {
        self.legend = legend;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn zoom_widgets(&self) -> Option<&ZoomWidgets> {
        self.zoom_widgets.as_ref()
    }

    /// Polar plots have no axes to zoom and never show the buttons.
    pub fn set_show_zoom_widgets(&mut self, show: bool) {
        let show = show && matches!(self.plot, PlotKind::Cartesian(_));
        if show != self.zoom_widgets.is_some() {
            self.zoom_widgets = show.then(ZoomWidgets::new);
            self.invalidate_layout();
        }
    }

    /// Zoom button under `point`, given in this panel's parent space.
    #[must_use]
    pub fn zoom_action_at(&self, point: Point) -> Option<ZoomAction> {
        self.zoom_widgets
            .as_ref()
            .and_then(|widgets| widgets.action_at(self.from_parent(point)))
    }

    /// Plot rectangle in this panel's local coordinates.
    #[must_use]
    pub fn plot_bounds(&self) -> Rect {
        self.plot.as_component().props().bounds_in_parent()
    }

    /// Converts a point in this panel's parent space into plot-local pixels.
    #[must_use]
    pub fn to_plot_local(&self, point: Point) -> Point {
        self.plot.as_component().from_parent(self.from_parent(point))
    }

    fn has_title(&self) -> bool {
        self.show_title && !self.title.text().is_empty()
    }

    fn refresh_derived(&mut self, ctx: &RenderContext<'_>) {
        if let Some(legend) = &mut self.legend {
            let items = self.plot.legend_items(
                ctx.theme(),
                legend.show_series_elements(),
                legend.element_label_kind(),
            );
            legend.set_items(items);
        }
        if let (Some(x_axis), PlotKind::Cartesian(plot)) = (&mut self.x_axis, &self.plot) {
            x_axis.set_label_series(plot.first_series_with(LabelKind::XAxisLabel));
        }
    }
}

fn desired(component: Option<&dyn Component>) -> Size {
    component.map_or(Size::ZERO, |component| component.props().desired_size())
}

impl Component for ChartPanel {
    fn props(&self) -> &LayoutProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.props
    }

    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size {
        self.refresh_derived(ctx);

        let title = if self.has_title() {
            self.title.measure(available.width, available.height, ctx)
        } else {
            self.title.measure(0.0, 0.0, ctx);
            Size::ZERO
        };
        let body_height = shrink_extent(available.height, title.height);
        let legend = self
            .legend
            .as_mut()
            .map_or(Size::ZERO, |legend| legend.measure(available.width, body_height, ctx));
        let y_axis = self
            .y_axis
            .as_mut()
            .map_or(Size::ZERO, |axis| axis.measure(available.width, body_height, ctx));
        let plot_width = shrink_extent(shrink_extent(available.width, legend.width), y_axis.width);
        let x_axis = self
            .x_axis
            .as_mut()
            .map_or(Size::ZERO, |axis| axis.measure(plot_width, body_height, ctx));
        let plot_height = shrink_extent(body_height, x_axis.height);
        let plot = self.plot.as_component_mut().measure(plot_width, plot_height, ctx);
        if let Some(widgets) = &mut self.zoom_widgets {
            widgets.measure(plot_width, plot_height, ctx);
        }

        let content = Size::new(
            y_axis.width + plot.width + legend.width,
            title.height + plot.height.max(legend.height) + x_axis.height,
        );
        Size::new(
            if available.width.is_finite() { available.width } else { content.width },
            if available.height.is_finite() { available.height } else { content.height },
        )
    }

    fn arrange_override(&mut self, size: Size, ctx: &RenderContext<'_>) {
        let title = if self.has_title() {
            desired(Some(&self.title as &dyn Component))
        } else {
            Size::ZERO
        };
        let x_axis = desired(self.x_axis.as_ref().map(|axis| axis as &dyn Component));
        let y_axis = desired(self.y_axis.as_ref().map(|axis| axis as &dyn Component));
        let legend = desired(self.legend.as_ref().map(|legend| legend as &dyn Component));

        let rows = resolve_tracks(
            &[GridLength::Auto, GridLength::Relative(1.0), GridLength::Auto],
            &[title.height, 0.0, x_axis.height],
            size.height,
        );
        let columns = resolve_tracks(
            &[GridLength::Auto, GridLength::Relative(1.0), GridLength::Auto],
            &[y_axis.width, 0.0, legend.width],
            size.width,
        );
        trace!(?rows, ?columns, "chart panel tracks resolved");
        let (title_h, body_h, x_axis_h) = (rows[0], rows[1], rows[2]);
        let (y_axis_w, plot_w, legend_w) = (columns[0], columns[1], columns[2]);

        self.title.arrange(0.0, 0.0, size.width, title_h, ctx);
        self.plot
            .as_component_mut()
            .arrange(y_axis_w, title_h, plot_w, body_h, ctx);
        if let Some(widgets) = &mut self.zoom_widgets {
            widgets.arrange(y_axis_w, title_h, plot_w, body_h, ctx);
        }
        if let Some(axis) = &mut self.y_axis {
            axis.arrange(0.0, title_h, y_axis_w, body_h, ctx);
        }
        if let Some(axis) = &mut self.x_axis {
            axis.arrange(y_axis_w, title_h + body_h, plot_w, x_axis_h, ctx);
        }
        if let Some(legend) = &mut self.legend {
            legend.arrange(y_axis_w + plot_w, title_h, legend_w, body_h, ctx);
        }
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        self.title.draw(ctx);
        self.plot.as_component_mut().draw(ctx);
        if let Some(axis) = &mut self.x_axis {
            axis.draw(ctx);
        }
        if let Some(axis) = &mut self.y_axis {
            axis.draw(ctx);
        }
        if let Some(legend) = &mut self.legend {
            legend.draw(ctx);
        }
        if let Some(widgets) = &mut self.zoom_widgets {
            widgets.draw(ctx);
        }
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.plot.as_component().hit_test(point, ctx)
    }

    fn needs_layout(&self) -> bool {
        self.props.is_layout_dirty()
            || self.title.props().is_layout_dirty()
            || self.plot.as_component().needs_layout()
            || self.x_axis.as_ref().is_some_and(|axis| axis.props().is_layout_dirty())
            || self.y_axis.as_ref().is_some_and(|axis| axis.props().is_layout_dirty())
            || self.legend.as_ref().is_some_and(|legend| legend.props().is_layout_dirty())
            || self.zoom_widgets.as_ref().is_some_and(|widgets| widgets.props().is_layout_dirty())
    }
}
