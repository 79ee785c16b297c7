use tracing::debug;

use crate::core::{Axis, AxisSet, SeriesRef};
use crate::error::{ChartError, ChartResult};
use crate::plot::{ChartPanel, LegendRenderer, Plot2D, PolarPlot};
use crate::render::Renderer;
use crate::renderers::{BarRenderer, LineRenderer, PieRenderer, ScatterRenderer, SeriesRenderer};
use crate::style::SeriesStyle;

use super::{Chart, ChartConfig, ChartKind};

impl<R: Renderer> Chart<R> {
    /// Builds the chart `config.kind` names.
    ///
    /// Pie charts use the first series. Combination charts draw the last
    /// series as a line over bars of the others.
    pub fn from_config(
        renderer: R,
        config: &ChartConfig,
        series: Vec<SeriesRef>,
    ) -> ChartResult<Self> {
        match config.kind {
            ChartKind::Bar => Self::bar_chart(renderer, config, series),
            ChartKind::Line => Self::line_chart(renderer, config, series),
            ChartKind::Scatter => Self::scatter_chart(renderer, config, series),
            ChartKind::Pie => {
                let series = series.into_iter().next().ok_or_else(|| {
                    ChartError::InvalidData("pie chart needs a series".to_owned())
                })?;
                Self::pie_chart(renderer, config, series)
            }
            ChartKind::Combination => {
                let mut bars = series;
                let line = bars.pop().ok_or_else(|| {
                    ChartError::InvalidData("combination chart needs a line series".to_owned())
                })?;
                Self::combination_chart(renderer, config, bars, vec![line], None)
            }
        }
    }

    pub fn bar_chart(
        renderer: R,
        config: &ChartConfig,
        series: Vec<SeriesRef>,
    ) -> ChartResult<Self> {
        let bars = configured_bars(config, series)?;
        Self::cartesian(renderer, config, vec![bars.into()])
    }

    pub fn line_chart(
        renderer: R,
        config: &ChartConfig,
        series: Vec<SeriesRef>,
    ) -> ChartResult<Self> {
        Self::cartesian(renderer, config, vec![LineRenderer::new(series).into()])
    }

    pub fn scatter_chart(
        renderer: R,
        config: &ChartConfig,
        series: Vec<SeriesRef>,
    ) -> ChartResult<Self> {
        Self::cartesian(renderer, config, vec![ScatterRenderer::new(series).into()])
    }

    /// Bars with lines drawn on top. `line_style` becomes the line
    /// renderer's own style, overriding the plot style for those series.
    pub fn combination_chart(
        renderer: R,
        config: &ChartConfig,
        bars: Vec<SeriesRef>,
        lines: Vec<SeriesRef>,
        line_style: Option<SeriesStyle>,
    ) -> ChartResult<Self> {
        let bars = configured_bars(config, bars)?;
        let mut line = LineRenderer::new(lines);
        if let Some(style) = line_style {
            style.validate()?;
            line.core_mut().set_style(Some(style));
        }
        Self::cartesian(renderer, config, vec![bars.into(), line.into()])
    }

    pub fn pie_chart(renderer: R, config: &ChartConfig, series: SeriesRef) -> ChartResult<Self> {
        config.validate()?;
        let mut pie = PieRenderer::new(series);
        pie.set_detached_slices(config.detached_slices.iter().copied());
        let mut plot = PolarPlot::new().with_start_angle(config.start_angle);
        plot.add_renderer(pie);
        Self::assemble(renderer, config, AxisSet::new(), ChartPanel::new(plot))
    }

    fn cartesian(
        renderer: R,
        config: &ChartConfig,
        renderers: Vec<SeriesRenderer>,
    ) -> ChartResult<Self> {
        config.validate()?;
        let mut axes = AxisSet::new();
        let mut x_axis = Axis::new().with_title(config.x_axis_title.as_str());
        x_axis.set_interval(config.x_axis_interval)?;
        let x_axis = axes.insert(x_axis);
        let y_axis = axes.insert(Axis::new().with_title(config.y_axis_title.as_str()));

        let mut plot = Plot2D::new(x_axis, y_axis).with_grid_type(config.grid_type);
        for renderer in renderers {
            plot.add_renderer(renderer);
        }

        let mut panel = ChartPanel::new(plot);
        if let Some(axis) = panel.x_axis_renderer_mut() {
            axis.set_show_coordinates(config.show_x_coordinates);
            axis.set_show_ticks(config.show_x_ticks);
        }
        if let Some(axis) = panel.y_axis_renderer_mut() {
            axis.set_show_coordinates(config.show_y_coordinates);
        }
        Self::assemble(renderer, config, axes, panel)
    }

    fn assemble(
        renderer: R,
        config: &ChartConfig,
        axes: AxisSet,
        mut panel: ChartPanel,
    ) -> ChartResult<Self> {
        panel.set_title(config.title.as_str());
        panel.set_title_margin(config.title_margin);
        if config.show_legend {
            let mut legend = LegendRenderer::new().with_title(config.legend_title.as_str());
            legend.set_show_series_elements(config.legend_shows_elements);
            panel.set_legend(Some(legend));
        }

        let mut chart = Self::new(renderer, config.viewport, axes, panel)?;
        chart.set_show_tooltips(config.show_tooltips);
        chart.set_button_zoom(config.build_button_zoom());
        chart.set_show_zoom_widgets(config.show_zoom_widgets);
        chart.set_controller(config.build_controller());
        debug!(kind = ?config.kind, controller = ?config.controller, "chart assembled");
        Ok(chart)
    }
}

fn configured_bars(config: &ChartConfig, series: Vec<SeriesRef>) -> ChartResult<BarRenderer> {
    let mut bars = BarRenderer::new(series);
    bars.set_bar_spacing_ratio(config.bar_spacing_ratio)?;
    bars.set_same_index_spacing_ratio(config.same_index_spacing_ratio)?;
    Ok(bars)
}
