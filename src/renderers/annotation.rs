use std::ops::ControlFlow;

use crate::core::{LabelKind, Point, Rect, SeriesRef};
use crate::render::{RenderContext, TextHAlign, TextVAlign};

use super::renderer2d::{AxisPair, Renderer2D, VISIBILITY_MARGIN_PX, VisiblePoint};
use super::{DataRanges, HitResult, PlotArea};

const BOX_PADDING_PX: f64 = 3.0;

/// Text callouts attached to the points of a single series.
///
/// Each element gets a connector from its data point to a boxed label
/// displaced by `offset`. Elements without a label of `label_kind` show
/// their formatted Y value.
#[derive(Debug)]
pub struct AnnotationRenderer {
    core: Renderer2D,
    label_kind: LabelKind,
    offset: Point,
}

impl AnnotationRenderer {
    #[must_use]
    pub fn new(series: SeriesRef) -> Self {
        Self {
            core: Renderer2D::new([series]),
            label_kind: LabelKind::OuterLabel,
            offset: Point::new(0.0, -20.0),
        }
    }

    #[must_use]
    pub fn with_label_kind(mut self, kind: LabelKind) -> Self {
        self.label_kind = kind;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, dx: f64, dy: f64) -> Self {
        self.offset = Point::new(dx, dy);
        self
    }

    #[must_use]
    pub fn core(&self) -> &Renderer2D {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut Renderer2D {
        &mut self.core
    }

    #[must_use]
    pub fn series(&self) -> Option<&SeriesRef> {
        self.core.series().get(0)
    }

    /// Replaces the annotated series.
    pub fn set_series(&mut self, series: SeriesRef) {
        let collection = self.core.series_mut();
        collection.clear();
        collection.push(series);
    }

    #[must_use]
    pub fn label_kind(&self) -> LabelKind {
        self.label_kind
    }

    #[must_use]
    pub fn offset(&self) -> Point {
        self.offset
    }

    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        let (x, y) = self.core.data_ranges();
        DataRanges { x, y }
    }

    fn text(&self, visible: &VisiblePoint, axes: &AxisPair<'_>) -> String {
        self.series()
            .and_then(|series| series.label(visible.data_index, self.label_kind))
            .unwrap_or_else(|| axes.y.format_value(visible.y_value))
    }

    fn label_box(&self, ctx: &RenderContext<'_>, visible: &VisiblePoint, text: &str) -> Rect {
        let font_size = ctx.theme().data_labels_font_size;
        let size = ctx.measure_text(text, font_size);
        let anchor = visible.point.offset(self.offset.x, self.offset.y);
        let width = size.width + 2.0 * BOX_PADDING_PX;
        let height = size.height + 2.0 * BOX_PADDING_PX;
        // Boxes above their point grow upwards so the connector meets the bottom edge.
        let top = if self.offset.y <= 0.0 {
            anchor.y - height
        } else {
            anchor.y
        };
        Rect::new(anchor.x - width / 2.0, top, width, height)
    }

    fn margin_px(&self) -> f64 {
        VISIBILITY_MARGIN_PX.max(self.offset.x.abs())
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let theme = ctx.theme();
        let chain = self.core.style_chain(area, theme);

        let mut callouts = Vec::new();
        self.core
            .enum_visible_points::<()>(&axes, self.margin_px(), false, |visible| {
                let text = self.text(&visible, &axes);
                let rect = self.label_box(ctx, &visible, &text);
                callouts.push((visible, text, rect));
                ControlFlow::Continue(())
            });

        for (visible, text, rect) in &callouts {
            let style = chain.resolve(visible.series_index, visible.data_index);
            let attach = if self.offset.y <= 0.0 {
                Point::new(rect.center().x, rect.bottom())
            } else {
                Point::new(rect.center().x, rect.y)
            };
            ctx.draw_line(visible.point, attach, style.stroke);
            ctx.draw_rect(*rect, Some(style.fill), Some(style.stroke));
            ctx.draw_text(
                text,
                rect.center(),
                theme.data_labels_font_size,
                theme.data_labels_brush,
                TextHAlign::Center,
                TextVAlign::Middle,
            );
        }
    }

    /// Hits the label box, not the data point.
    #[must_use]
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        area: &PlotArea<'_>,
    ) -> Option<HitResult> {
        let axes = self.core.resolve_axes(ctx, area)?;
        self.core
            .enum_visible_points(&axes, self.margin_px(), true, |visible| {
                let text = self.text(&visible, &axes);
                let rect = self.label_box(ctx, &visible, &text);
                if rect.contains(point) {
                    ControlFlow::Break(HitResult::from_visible(
                        area.renderer_index,
                        &visible,
                        rect.center(),
                    ))
                } else {
                    ControlFlow::Continue(())
                }
            })
    }

    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>, hit: &HitResult) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let Some(series) = self.series().filter(|series| hit.data_index < series.size()) else {
            return;
        };
        let (Some(x_value), Some(y_value)) = (
            series.x_value(hit.data_index),
            series.y_value(hit.data_index),
        ) else {
            return;
        };
        let visible = VisiblePoint {
            series_index: 0,
            data_index: hit.data_index,
            x_value,
            y_value,
            point: axes.to_pixel(x_value, y_value),
        };
        let text = self.text(&visible, &axes);
        let rect = self.label_box(ctx, &visible, &text);
        let stroke = ctx.theme().highlight();
        ctx.draw_rect(rect, None, Some(stroke));
    }
}
