use tracing::debug;

use crate::collections::ObservableCollection;
use crate::core::{AxisId, LabelKind, Point, Rect, SeriesRef};
use crate::layout::LayoutProps;
use crate::render::RenderContext;
use crate::renderers::{HitResult, LegendItem, PlotArea, SeriesRenderer};
use crate::style::{SeriesStyle, Theme};

/// Axis and angle binding a plot hands to each of its renderers.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct AreaBinding {
    pub x_axis: Option<AxisId>,
    pub y_axis: Option<AxisId>,
    pub start_angle: f64,
}

/// Renderer collection, plot style and highlight shared by plot kinds.
#[derive(Debug)]
pub(crate) struct PlotCore {
    pub props: LayoutProps,
    pub renderers: ObservableCollection<SeriesRenderer>,
    pub style: Option<SeriesStyle>,
    pub highlight: Option<HitResult>,
    pub data_dirty: bool,
}

impl Default for PlotCore {
    fn default() -> Self {
        Self {
            props: LayoutProps::default(),
            renderers: ObservableCollection::new(),
            style: None,
            highlight: None,
            data_dirty: true,
        }
    }
}

impl PlotCore {
    pub fn add_renderer(&mut self, renderer: SeriesRenderer) -> usize {
        self.renderers.push(renderer);
        self.renderers.len() - 1
    }

    /// Drains the renderer collection and every renderer's series change
    /// log. Returns true when data ranges need measuring again.
    pub fn sync_changes(&mut self) -> bool {
        let mut changed = !self.renderers.take_changes().is_empty();
        for renderer in self.renderers.iter_mut() {
            changed |= renderer.take_changes();
        }
        if changed {
            debug!(renderers = self.renderers.len(), "plot data changed");
            self.data_dirty = true;
            self.highlight = None;
            self.props.mark_layout_dirty();
        }
        self.data_dirty
    }

    pub fn area(&self, binding: AreaBinding, renderer_index: usize) -> PlotArea<'_> {
        PlotArea {
            size: self.props.actual_size(),
            x_axis: binding.x_axis,
            y_axis: binding.y_axis,
            style: self.style.as_ref(),
            start_angle: binding.start_angle,
            renderer_index,
        }
    }

    /// Draws every renderer back-to-front, clipped to the plot, and the
    /// highlighted item last.
    pub fn draw_renderers(&self, ctx: &mut RenderContext<'_>, binding: AreaBinding) {
        ctx.push_clip(Rect::from_size(self.props.actual_size()));
        for (index, renderer) in self.renderers.iter().enumerate() {
            renderer.draw(ctx, &self.area(binding, index));
        }
        if let Some(hit) = self.highlight {
            if let Some(renderer) = self.renderers.get(hit.renderer_index) {
                renderer.draw_highlight(ctx, &self.area(binding, hit.renderer_index), &hit);
            }
        }
        ctx.pop_clip();
    }

    /// Topmost renderer wins.
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        binding: AreaBinding,
    ) -> Option<HitResult> {
        self.renderers
            .iter()
            .enumerate()
            .rev()
            .find_map(|(index, renderer)| renderer.hit_test(point, ctx, &self.area(binding, index)))
    }

    /// Replaces the highlighted item and returns the region to repaint,
    /// or `None` when nothing changed.
    pub fn set_highlight(&mut self, hit: Option<HitResult>) -> Option<Rect> {
        if self.highlight == hit {
            return None;
        }
        let previous = std::mem::replace(&mut self.highlight, hit);
        [previous, hit]
            .into_iter()
            .flatten()
            .map(|item| Rect::new(item.x - 16.0, item.y - 16.0, 32.0, 32.0))
            .reduce(Rect::union)
    }

    pub fn legend_items(
        &self,
        theme: &Theme,
        binding: AreaBinding,
        show_series_elements: bool,
        element_label_kind: LabelKind,
    ) -> Vec<LegendItem> {
        self.renderers
            .iter()
            .enumerate()
            .flat_map(|(index, renderer)| {
                renderer.legend_items(
                    &self.area(binding, index),
                    theme,
                    show_series_elements,
                    element_label_kind,
                )
            })
            .collect()
    }

    /// First series offering labels of `kind`, used for category axes.
    pub fn first_series_with(&self, kind: LabelKind) -> Option<SeriesRef> {
        self.renderers
            .iter()
            .flat_map(SeriesRenderer::series)
            .find(|series| series.supported_labels().contains(kind))
    }
}
