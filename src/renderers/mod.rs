pub mod annotation;
pub mod bar;
pub mod line;
pub mod pie;
pub mod renderer2d;
pub mod scatter;

pub use annotation::AnnotationRenderer;
pub use bar::{BarLayout, BarRenderer, BarSpacing};
pub use line::{LINE_HIT_TOLERANCE_PX, LineRenderer};
pub use pie::{PieRenderer, PieSlice, slice_angles};
pub use renderer2d::{AxisPair, Renderer2D, VISIBILITY_MARGIN_PX, VisiblePoint, merge_range};
pub use scatter::{CIRCLE_SEGMENTS, MarkerStyle, ScatterRenderer, ScatterShape, shape_vertices};

use crate::core::{AxisId, LabelKind, Point, SeriesRef, Size};
use crate::render::{Color, RenderContext, Stroke};
use crate::style::{SeriesStyle, Theme};

/// What a renderer needs from its hosting plot for one pass.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea<'a> {
    /// Plot content size; renderer pixels are local to it.
    pub size: Size,
    pub x_axis: Option<AxisId>,
    pub y_axis: Option<AxisId>,
    pub style: Option<&'a SeriesStyle>,
    /// Polar start angle in degrees, clockwise from 3 o'clock.
    pub start_angle: f64,
    pub renderer_index: usize,
}

impl PlotArea<'_> {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            x_axis: None,
            y_axis: None,
            style: None,
            start_angle: 0.0,
            renderer_index: 0,
        }
    }
}

/// Data extents a renderer wants its axes to cover.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DataRanges {
    pub x: Option<(f64, f64)>,
    pub y: Option<(f64, f64)>,
}

/// Data element found under a pixel.
///
/// `x`/`y` is the anchor in plot-local pixels used for highlight and
/// tooltip placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitResult {
    pub renderer_index: usize,
    pub series_index: usize,
    pub data_index: usize,
    pub value: f64,
    pub x: f64,
    pub y: f64,
}

impl HitResult {
    #[must_use]
    pub fn from_visible(renderer_index: usize, visible: &VisiblePoint, anchor: Point) -> Self {
        Self {
            renderer_index,
            series_index: visible.series_index,
            data_index: visible.data_index,
            value: visible.y_value,
            x: anchor.x,
            y: anchor.y,
        }
    }

    #[must_use]
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Swatch and caption shown by the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub text: String,
    pub fill: Color,
    pub stroke: Stroke,
}

/// Visual encodings a plot can host.
#[derive(Debug)]
pub enum SeriesRenderer {
    Bar(BarRenderer),
    Line(LineRenderer),
    Scatter(ScatterRenderer),
    Pie(PieRenderer),
    Annotation(AnnotationRenderer),
}

impl From<BarRenderer> for SeriesRenderer {
    fn from(renderer: BarRenderer) -> Self {
        Self::Bar(renderer)
    }
}

impl From<LineRenderer> for SeriesRenderer {
    fn from(renderer: LineRenderer) -> Self {
        Self::Line(renderer)
    }
}

impl From<ScatterRenderer> for SeriesRenderer {
    fn from(renderer: ScatterRenderer) -> Self {
        Self::Scatter(renderer)
    }
}

impl From<PieRenderer> for SeriesRenderer {
    fn from(renderer: PieRenderer) -> Self {
        Self::Pie(renderer)
    }
}

impl From<AnnotationRenderer> for SeriesRenderer {
    fn from(renderer: AnnotationRenderer) -> Self {
        Self::Annotation(renderer)
    }
}

impl SeriesRenderer {
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bar(_) => "bar",
            Self::Line(_) => "line",
            Self::Scatter(_) => "scatter",
            Self::Pie(_) => "pie",
            Self::Annotation(_) => "annotation",
        }
    }

    /// Shared cartesian state; `None` for pies.
    #[must_use]
    pub fn core(&self) -> Option<&Renderer2D> {
        match self {
            Self::Bar(renderer) => Some(renderer.core()),
            Self::Line(renderer) => Some(renderer.core()),
            Self::Scatter(renderer) => Some(renderer.core()),
            Self::Annotation(renderer) => Some(renderer.core()),
            Self::Pie(_) => None,
        }
    }

    pub fn core_mut(&mut self) -> Option<&mut Renderer2D> {
        match self {
            Self::Bar(renderer) => Some(renderer.core_mut()),
            Self::Line(renderer) => Some(renderer.core_mut()),
            Self::Scatter(renderer) => Some(renderer.core_mut()),
            Self::Annotation(renderer) => Some(renderer.core_mut()),
            Self::Pie(_) => None,
        }
    }

    #[must_use]
    pub fn style(&self) -> Option<&SeriesStyle> {
        match self {
            Self::Pie(renderer) => renderer.style(),
            _ => self.core().and_then(Renderer2D::style),
        }
    }

    pub fn set_style(&mut self, style: Option<SeriesStyle>) {
        match self {
            Self::Pie(renderer) => renderer.set_style(style),
            _ => {
                if let Some(core) = self.core_mut() {
                    core.set_style(style);
                }
            }
        }
    }

    #[must_use]
    pub fn show_highlight(&self) -> bool {
        match self {
            Self::Pie(renderer) => renderer.show_highlight(),
            _ => self.core().is_some_and(Renderer2D::show_highlight),
        }
    }

    /// Series in drawing order.
    #[must_use]
    pub fn series(&self) -> Vec<SeriesRef> {
        match self {
            Self::Pie(renderer) => renderer.series().cloned().into_iter().collect(),
            _ => self
                .core()
                .map(|core| core.series().iter().cloned().collect())
                .unwrap_or_default(),
        }
    }

    /// Axis overrides; a pie never binds to axes.
    #[must_use]
    pub fn axis_overrides(&self) -> (Option<AxisId>, Option<AxisId>) {
        self.core()
            .map_or((None, None), |core| (core.x_axis(), core.y_axis()))
    }

    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        match self {
            Self::Bar(renderer) => renderer.data_ranges(),
            Self::Line(renderer) => renderer.data_ranges(),
            Self::Scatter(renderer) => renderer.data_ranges(),
            Self::Pie(renderer) => renderer.data_ranges(),
            Self::Annotation(renderer) => renderer.data_ranges(),
        }
    }

    /// Drains pending series and setting changes; true when the data
    /// ranges must be measured again.
    pub fn take_changes(&mut self) -> bool {
        match self {
            Self::Pie(renderer) => renderer.take_data_changed(),
            _ => self.core_mut().is_some_and(Renderer2D::take_changes),
        }
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        match self {
            Self::Bar(renderer) => renderer.draw(ctx, area),
            Self::Line(renderer) => renderer.draw(ctx, area),
            Self::Scatter(renderer) => renderer.draw(ctx, area),
            Self::Pie(renderer) => renderer.draw(ctx, area),
            Self::Annotation(renderer) => renderer.draw(ctx, area),
        }
    }

    #[must_use]
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        area: &PlotArea<'_>,
    ) -> Option<HitResult> {
        match self {
            Self::Bar(renderer) => renderer.hit_test(point, ctx, area),
            Self::Line(renderer) => renderer.hit_test(point, ctx, area),
            Self::Scatter(renderer) => renderer.hit_test(point, ctx, area),
            Self::Pie(renderer) => renderer.hit_test(point, area),
            Self::Annotation(renderer) => renderer.hit_test(point, ctx, area),
        }
    }

    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>, hit: &HitResult) {
        if !self.show_highlight() {
            return;
        }
        match self {
            Self::Bar(renderer) => renderer.draw_highlight(ctx, area, hit),
            Self::Line(renderer) => renderer.draw_highlight(ctx, hit),
            Self::Scatter(renderer) => renderer.draw_highlight(ctx, hit),
            Self::Pie(renderer) => renderer.draw_highlight(ctx, area, hit),
            Self::Annotation(renderer) => renderer.draw_highlight(ctx, area, hit),
        }
    }

    /// Label of the hit element, if the series provides one of `kind`.
    #[must_use]
    pub fn label_for(&self, hit: &HitResult, kind: LabelKind) -> Option<String> {
        let series = match self {
            Self::Pie(renderer) => renderer.series().cloned(),
            _ => self
                .core()
                .and_then(|core| core.series().get(hit.series_index).cloned()),
        }?;
        if hit.data_index >= series.size() {
            return None;
        }
        series.label(hit.data_index, kind)
    }

    /// Legend entries: one per series, or one per element for pies when
    /// `show_series_elements` is set.
    #[must_use]
    pub fn legend_items(
        &self,
        area: &PlotArea<'_>,
        theme: &Theme,
        show_series_elements: bool,
        element_label_kind: LabelKind,
    ) -> Vec<LegendItem> {
        if let Self::Pie(renderer) = self {
            if show_series_elements {
                return renderer.legend_items(area, theme, element_label_kind);
            }
        }
        let Some(core) = self.core() else {
            return match self {
                Self::Pie(renderer) => renderer
                    .series()
                    .map(|series| {
                        vec![LegendItem {
                            text: series.title().to_owned(),
                            fill: theme.palette_fill(0),
                            stroke: Stroke::solid(theme.palette_stroke(0), theme.series_stroke_thickness),
                        }]
                    })
                    .unwrap_or_default(),
                _ => Vec::new(),
            };
        };
        let chain = core.style_chain(area, theme);
        core.series()
            .iter()
            .enumerate()
            .map(|(series_index, series)| {
                let style = chain.resolve(series_index, 0);
                LegendItem {
                    text: series.title().to_owned(),
                    fill: style.fill,
                    stroke: style.stroke,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::core::Series;

    #[test]
    fn take_changes_reports_series_mutations_once() {
        let mut renderer = SeriesRenderer::from(LineRenderer::new(Vec::<SeriesRef>::new()));
        assert!(!renderer.take_changes());
        if let Some(core) = renderer.core_mut() {
            core.series_mut().push(Rc::new(Series::simple(vec![1.0])));
        }
        assert!(renderer.take_changes());
        assert!(!renderer.take_changes());
    }

    #[test]
    fn pie_has_no_axis_overrides() {
        let renderer = SeriesRenderer::from(PieRenderer::new(Rc::new(Series::simple(vec![1.0]))));
        assert_eq!(renderer.axis_overrides(), (None, None));
        assert_eq!(renderer.data_ranges(), DataRanges::default());
    }
}
