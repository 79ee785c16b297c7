use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::collections::ObservableCollection;
use crate::core::{AxisId, AxisSet, LabelKind, Point, Rect, SeriesRef, Size};
use crate::layout::{Component, LayoutProps};
use crate::render::RenderContext;
use crate::renderers::{AxisPair, HitResult, LegendItem, SeriesRenderer, merge_range};
use crate::style::{SeriesStyle, Theme};

use super::core::{AreaBinding, PlotCore};
use super::grid::{GridType, draw_grid};

/// Cartesian plot: background, grid and series renderers bound to an X and
/// a Y axis.
#[derive(Debug)]
pub struct Plot2D {
    core: PlotCore,
    x_axis: AxisId,
    y_axis: AxisId,
    grid_type: GridType,
}

impl Plot2D {
    #[must_use]
    pub fn new(x_axis: AxisId, y_axis: AxisId) -> Self {
        Self {
            core: PlotCore::default(),
            x_axis,
            y_axis,
            grid_type: GridType::None,
        }
    }

    #[must_use]
    pub fn with_grid_type(mut self, grid_type: GridType) -> Self {
        self.grid_type = grid_type;
        self
    }

    #[must_use]
    pub fn x_axis(&self) -> AxisId {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> AxisId {
        self.y_axis
    }

    #[must_use]
    pub fn grid_type(&self) -> GridType {
        self.grid_type
    }

    pub fn set_grid_type(&mut self, grid_type: GridType) {
        self.grid_type = grid_type;
        self.invalidate(None);
    }

    #[must_use]
    pub fn style(&self) -> Option<&SeriesStyle> {
        self.core.style.as_ref()
    }

    /// Plot-level style consulted when a renderer has no local entry.
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

    /// Appends a renderer on top of the existing ones.
    pub fn add_renderer(&mut self, renderer: impl Into<SeriesRenderer>) -> usize {
        self.core.add_renderer(renderer.into())
    }

    #[must_use]
    pub fn highlight(&self) -> Option<HitResult> {
        self.core.highlight
    }

    /// Returns true when the highlighted item changed.
    pub fn set_highlight(&mut self, hit: Option<HitResult>) -> bool {
        match self.core.set_highlight(hit) {
            Some(region) => {
                self.invalidate(Some(region));
                true
            }
            None => false,
        }
    }

    /// Forces the next `update_data_ranges` to measure again.
    pub fn invalidate_data_ranges(&mut self) {
        self.core.data_dirty = true;
    }

    fn binding(&self) -> AreaBinding {
        AreaBinding {
            x_axis: Some(self.x_axis),
            y_axis: Some(self.y_axis),
            start_angle: 0.0,
        }
    }

    /// Drains pending data changes and, when needed, stores the union of
    /// renderer data ranges as the measured range of each bound axis.
    ///
    /// Returns true when any axis was updated.
    pub fn update_data_ranges(&mut self, axes: &mut AxisSet) -> bool {
        if !self.core.sync_changes() {
            return false;
        }

        let mut ranges: IndexMap<AxisId, Option<(f64, f64)>> = IndexMap::new();
        ranges.insert(self.x_axis, None);
        ranges.insert(self.y_axis, None);
        for renderer in &self.core.renderers {
            if matches!(renderer, SeriesRenderer::Pie(_)) {
                continue;
            }
            let (x_override, y_override) = renderer.axis_overrides();
            let data = renderer.data_ranges();
            for (id, range) in [
                (x_override.unwrap_or(self.x_axis), data.x),
                (y_override.unwrap_or(self.y_axis), data.y),
            ] {
                let entry = ranges.entry(id).or_insert(None);
                *entry = merge_range(*entry, range);
            }
        }

        for (id, range) in &ranges {
            match axes.get_mut(*id) {
                Some(axis) => axis.set_measured_range(*range),
                None => warn!(axis = ?id, "plot bound to unknown axis; range not measured"),
            }
        }
        debug!(axes = ranges.len(), "plot data ranges measured");
        self.core.data_dirty = false;
        true
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
    pub fn first_series_with(&self, kind: LabelKind) -> Option<SeriesRef> {
        self.core.first_series_with(kind)
    }

    /// Label of `kind` for a hit produced by this plot.
    #[must_use]
    pub fn label_for(&self, hit: &HitResult, kind: LabelKind) -> Option<String> {
        self.core
            .renderers
            .get(hit.renderer_index)
            .and_then(|renderer| renderer.label_for(hit, kind))
    }
}

impl Component for Plot2D {
    fn props(&self) -> &LayoutProps {
        &self.core.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.core.props
    }

    /// Takes whatever finite space it is offered.
    fn measure_override(&mut self, available: Size, _ctx: &RenderContext<'_>) -> Size {
        available.clamped()
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.core.props.actual_size();
        if let Some(background) = ctx.theme().plot_background {
            ctx.draw_rect(Rect::from_size(size), Some(background), None);
        }

        if let (Some(x), Some(y)) = (ctx.axis(self.x_axis), ctx.axis(self.y_axis)) {
            draw_grid(ctx, self.grid_type, &AxisPair { x, y, size });
        }
        self.core.draw_renderers(ctx, self.binding());
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.core.hit_test(point, ctx, self.binding())
    }
}
