use crate::collections::ObservableCollection;
use crate::core::geometry::normalize_degrees;
use crate::core::{LabelKind, Point, Rect, Size};
use crate::layout::{Component, LayoutProps};
use crate::render::RenderContext;
use crate::renderers::{HitResult, LegendItem, SeriesRenderer};
use crate::style::{SeriesStyle, Theme};

use super::core::{AreaBinding, PlotCore};

/// Plot for angular renderers such as pies.
///
/// `start_angle` is in degrees clockwise from 3 o'clock and kept in
/// `[0, 360)`.
#[derive(Debug, Default)]
pub struct PolarPlot {
    core: PlotCore,
    start_angle: f64,
}

impl PolarPlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.set_start_angle(degrees);
        self
    }

    #[must_use]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Non-finite angles are ignored.
    pub fn set_start_angle(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.start_angle = normalize_degrees(degrees);
            self.invalidate(None);
        }
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        self.set_start_angle(self.start_angle + degrees);
    }

    #[must_use]
    pub fn style(&self) -> Option<&SeriesStyle> {
        self.core.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<SeriesStyle>) {
        self.core.style = style;
        self.invalidate(None);
    }

    #[must_use]
    pub fn renderers(&self) -> &ObservableCollection<SeriesRenderer> {
        &self.core.renderers
    }

    pub fn renderers_mut(&mut self) -> &mut ObservableCollection<SeriesRenderer> {
        &mut self.core.renderers
    }

    pub fn add_renderer(&mut self, renderer: impl Into<SeriesRenderer>) -> usize {
        self.core.add_renderer(renderer.into())
    }

    #[must_use]
    pub fn highlight(&self) -> Option<HitResult> {
        self.core.highlight
    }

    pub fn set_highlight(&mut self, hit: Option<HitResult>) -> bool {
        match self.core.set_highlight(hit) {
            Some(region) => {
                self.invalidate(Some(region));
                true
            }
            None => false,
        }
    }

    /// Drains pending data changes. Polar plots bind no axes, so nothing
    /// is measured.
    pub fn sync_changes(&mut self) -> bool {
        let changed = self.core.sync_changes();
        self.core.data_dirty = false;
        changed
    }

    fn binding(&self) -> AreaBinding {
        AreaBinding {
            x_axis: None,
            y_axis: None,
            start_angle: self.start_angle,
        }
    }

    /// Center of the plot in local pixels, the pivot for rotation.
    #[must_use]
    pub fn center(&self) -> Point {
        Rect::from_size(self.core.props.actual_size()).center()
    }

    #[must_use]
    pub fn legend_items(
        &self,
        theme: &Theme,
        show_series_elements: bool,
        element_label_kind: LabelKind,
    ) -> Vec<LegendItem> {
        self.core
            .legend_items(theme, self.binding(), show_series_elements, element_label_kind)
    }

    #[must_use]
    pub fn label_for(&self, hit: &HitResult, kind: LabelKind) -> Option<String> {
        self.core
            .renderers
            .get(hit.renderer_index)
            .and_then(|renderer| renderer.label_for(hit, kind))
    }
}

impl Component for PolarPlot {
    fn props(&self) -> &LayoutProps {
        &self.core.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.core.props
    }

    fn measure_override(&mut self, available: Size, _ctx: &RenderContext<'_>) -> Size {
        available.clamped()
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.core.props.actual_size();
        if let Some(background) = ctx.theme().plot_background {
            ctx.draw_rect(Rect::from_size(size), Some(background), None);
        }
        self.core.draw_renderers(ctx, self.binding());
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.core.hit_test(point, ctx, self.binding())
    }
}
