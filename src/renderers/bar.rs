use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LabelKind, Point, Rect, SeriesRef};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderContext, TextHAlign, TextVAlign};

use super::renderer2d::{AxisPair, Renderer2D, VisiblePoint, merge_range};
use super::{DataRanges, HitResult, PlotArea};

/// Bar width and gaps for one group slot, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSpacing {
    pub bar_width: f64,
    /// Gap between bars of the same group.
    pub padding: f64,
    /// Gap shared between neighbouring groups.
    pub external: f64,
}

impl BarSpacing {
    /// Splits a group slot into bars and gaps.
    ///
    /// The slot is `len_pixels / max(data_range, groups)`, so one group never
    /// takes more than `len_pixels / groups`. Inside the slot,
    /// `bars_per_group` bars are separated by `same_index_spacing_ratio`
    /// bar widths, and `bar_spacing_ratio` bar widths are left as the gap to
    /// the next group.
    pub fn compute(
        bars_per_group: usize,
        groups: usize,
        data_range: f64,
        len_pixels: f64,
        same_index_spacing_ratio: f64,
        bar_spacing_ratio: f64,
    ) -> ChartResult<Self> {
        validate_ratio(same_index_spacing_ratio, "same index spacing ratio")?;
        validate_ratio(bar_spacing_ratio, "bar spacing ratio")?;
        if bars_per_group == 0 || groups == 0 || !len_pixels.is_finite() || len_pixels <= 0.0 {
            return Ok(Self {
                bar_width: 0.0,
                padding: 0.0,
                external: 0.0,
            });
        }

        let groups = groups as f64;
        let data_range = if data_range.is_finite() && data_range > 0.0 {
            data_range
        } else {
            groups
        };
        let slot = len_pixels / data_range.max(groups);
        let bars = bars_per_group as f64;
        let units = bars + (bars - 1.0) * same_index_spacing_ratio + bar_spacing_ratio;
        let bar_width = slot / units;
        Ok(Self {
            bar_width,
            padding: bar_width * same_index_spacing_ratio,
            external: bar_width * bar_spacing_ratio,
        })
    }

    /// Width covered by the bars and inner paddings of one group.
    #[must_use]
    pub fn group_width(&self, bars_per_group: usize) -> f64 {
        let bars = bars_per_group as f64;
        bars * self.bar_width + (bars - 1.0).max(0.0) * self.padding
    }
}

fn validate_ratio(ratio: f64, what: &str) -> ChartResult<()> {
    if ratio.is_finite() && ratio >= 0.0 {
        Ok(())
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} must be finite and >= 0, got {ratio}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarLayout {
    /// Bars of the same index sit next to each other.
    #[default]
    SideBySide,
    /// Bars of the same index are stacked; positive and negative values grow
    /// in opposite directions from the origin.
    Stack,
}

/// Vertical bars grouped by data index.
#[derive(Debug)]
pub struct BarRenderer {
    core: Renderer2D,
    layout: BarLayout,
    bar_spacing_ratio: f64,
    same_index_spacing_ratio: f64,
}

impl BarRenderer {
    pub const DEFAULT_BAR_SPACING_RATIO: f64 = 0.5;

    #[must_use]
    pub fn new(series: impl IntoIterator<Item = SeriesRef>) -> Self {
        Self {
            core: Renderer2D::new(series),
            layout: BarLayout::SideBySide,
            bar_spacing_ratio: Self::DEFAULT_BAR_SPACING_RATIO,
            same_index_spacing_ratio: 0.0,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: BarLayout) -> Self {
        self.layout = layout;
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
    pub fn layout(&self) -> BarLayout {
        self.layout
    }

    /// Switching layouts changes the stacked value range, so the hosting
    /// plot measures again on its next layout pass.
    pub fn set_layout(&mut self, layout: BarLayout) {
        if self.layout != layout {
            self.layout = layout;
            self.core.mark_ranges_changed();
        }
    }

    #[must_use]
    pub fn bar_spacing_ratio(&self) -> f64 {
        self.bar_spacing_ratio
    }

    pub fn set_bar_spacing_ratio(&mut self, ratio: f64) -> ChartResult<()> {
        validate_ratio(ratio, "bar spacing ratio")?;
        self.bar_spacing_ratio = ratio;
        Ok(())
    }

    #[must_use]
    pub fn same_index_spacing_ratio(&self) -> f64 {
        self.same_index_spacing_ratio
    }

    pub fn set_same_index_spacing_ratio(&mut self, ratio: f64) -> ChartResult<()> {
        validate_ratio(ratio, "same index spacing ratio")?;
        self.same_index_spacing_ratio = ratio;
        Ok(())
    }

    fn bars_per_group(&self) -> usize {
        match self.layout {
            BarLayout::SideBySide => self.core.series().len(),
            BarLayout::Stack => 1,
        }
    }

    /// Spacing for the current X range of `axes`.
    #[must_use]
    pub fn spacing(&self, axes: &AxisPair<'_>) -> BarSpacing {
        let (min, max) = axes.x.effective_range();
        BarSpacing::compute(
            self.bars_per_group(),
            self.core.max_series_size(),
            max - min,
            axes.size.width,
            self.same_index_spacing_ratio,
            self.bar_spacing_ratio,
        )
        .unwrap_or(BarSpacing {
            bar_width: 0.0,
            padding: 0.0,
            external: 0.0,
        })
    }

    /// Domain range widened by half a group on each side, and a value range
    /// that always includes the origin.
    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        let (x, y) = match self.layout {
            BarLayout::SideBySide => self.core.data_ranges(),
            BarLayout::Stack => (self.core.data_ranges().0, self.stacked_range()),
        };
        DataRanges {
            x: x.map(|(min, max)| (min - 0.5, max + 0.5)),
            y: merge_range(y, Some((0.0, 0.0))),
        }
    }

    fn stacked_range(&self) -> Option<(f64, f64)> {
        let mut range = None;
        for index in 0..self.core.max_series_size() {
            let (mut positive, mut negative) = (0.0_f64, 0.0_f64);
            for series in self.core.series() {
                if index >= series.size() {
                    continue;
                }
                match series.y_value(index).filter(|v| v.is_finite()) {
                    Some(value) if value >= 0.0 => positive += value,
                    Some(value) => negative += value,
                    None => {}
                }
            }
            range = merge_range(range, Some((negative, positive)));
        }
        range
    }

    /// Value at which the bar of `series_index` at `data_index` starts.
    fn stack_base(&self, series_index: usize, data_index: usize, value: f64, origin: f64) -> f64 {
        let mut base = origin;
        for series in self.core.series().iter().take(series_index) {
            if data_index >= series.size() {
                continue;
            }
            if let Some(previous) = series.y_value(data_index).filter(|v| v.is_finite()) {
                if (previous >= 0.0) == (value >= 0.0) {
                    base += previous;
                }
            }
        }
        base
    }

    /// Pixel rectangle of one bar.
    fn bar_rect(&self, visible: &VisiblePoint, axes: &AxisPair<'_>, spacing: &BarSpacing) -> Rect {
        let center = visible.point.x;
        let origin = axes.y.effective_origin();
        let (left, from, to) = match self.layout {
            BarLayout::SideBySide => {
                let group = spacing.group_width(self.bars_per_group());
                let left = center - group / 2.0
                    + visible.series_index as f64 * (spacing.bar_width + spacing.padding);
                (left, origin, visible.y_value)
            }
            BarLayout::Stack => {
                let base =
                    self.stack_base(visible.series_index, visible.data_index, visible.y_value, origin);
                (center - spacing.bar_width / 2.0, base, base + visible.y_value)
            }
        };
        let from_px = axes.y.map_value_to_pixel_y(from, axes.size.height);
        let to_px = axes.y.map_value_to_pixel_y(to, axes.size.height);
        Rect::new(
            left,
            from_px.min(to_px),
            spacing.bar_width,
            (from_px - to_px).abs(),
        )
    }

    fn margin_px(spacing: &BarSpacing, bars_per_group: usize) -> f64 {
        spacing.group_width(bars_per_group) / 2.0 + spacing.external
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let spacing = self.spacing(&axes);
        if spacing.bar_width <= 0.0 {
            debug!("bar width collapsed to zero; nothing to draw");
            return;
        }
        let theme = ctx.theme();
        let chain = self.core.style_chain(area, theme);
        let margin = Self::margin_px(&spacing, self.bars_per_group());

        let mut bars = Vec::new();
        self.core
            .enum_visible_points::<()>(&axes, margin, false, |visible| {
                bars.push((visible, self.bar_rect(&visible, &axes, &spacing)));
                ControlFlow::Continue(())
            });

        for (visible, rect) in &bars {
            let style = chain.resolve(visible.series_index, visible.data_index);
            ctx.draw_rect(*rect, Some(style.fill), Some(style.stroke));
        }

        let labels = self.core.show_data_labels();
        if labels.is_none() {
            return;
        }
        for (visible, rect) in &bars {
            let Some(series) = self.core.series().get(visible.series_index) else {
                continue;
            };
            if labels.contains(LabelKind::InnerLabel) {
                if let Some(text) = series.label(visible.data_index, LabelKind::InnerLabel) {
                    ctx.draw_text(
                        &text,
                        rect.center(),
                        theme.data_labels_font_size,
                        theme.data_labels_brush,
                        TextHAlign::Center,
                        TextVAlign::Middle,
                    );
                }
            }
            if labels.contains(LabelKind::OuterLabel) {
                if let Some(text) = series.label(visible.data_index, LabelKind::OuterLabel) {
                    let above = visible.y_value >= axes.y.effective_origin();
                    let (y, v_align) = if above {
                        (rect.y - 2.0, TextVAlign::Bottom)
                    } else {
                        (rect.bottom() + 2.0, TextVAlign::Top)
                    };
                    ctx.draw_text(
                        &text,
                        Point::new(rect.center().x, y),
                        theme.data_labels_font_size,
                        theme.data_labels_brush,
                        TextHAlign::Center,
                        v_align,
                    );
                }
            }
        }
    }

    #[must_use]
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        area: &PlotArea<'_>,
    ) -> Option<HitResult> {
        let axes = self.core.resolve_axes(ctx, area)?;
        let spacing = self.spacing(&axes);
        if spacing.bar_width <= 0.0 {
            return None;
        }
        let margin = Self::margin_px(&spacing, self.bars_per_group());
        self.core.enum_visible_points(&axes, margin, true, |visible| {
            let rect = self.bar_rect(&visible, &axes, &spacing);
            if rect.contains(point) {
                ControlFlow::Break(HitResult::from_visible(area.renderer_index, &visible, rect.center()))
            } else {
                ControlFlow::Continue(())
            }
        })
    }

    /// Outlines the hit bar with the theme highlight stroke.
    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>, hit: &HitResult) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let Some(series) = self.core.series().get(hit.series_index) else {
            return;
        };
        if hit.data_index >= series.size() {
            return;
        }
        let (Some(x_value), Some(y_value)) =
            (series.x_value(hit.data_index), series.y_value(hit.data_index))
        else {
            return;
        };
        let spacing = self.spacing(&axes);
        let visible = VisiblePoint {
            series_index: hit.series_index,
            data_index: hit.data_index,
            x_value,
            y_value,
            point: axes.to_pixel(x_value, y_value),
        };
        let rect = self.bar_rect(&visible, &axes, &spacing);
        ctx.draw_rect(rect, None, Some(ctx.theme().highlight()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_splits_slot_into_bars_and_gaps() {
        let spacing = BarSpacing::compute(2, 4, 4.0, 400.0, 0.5, 1.0).expect("spacing");
        // slot 100 = 2w + 0.5w + 1w
        assert!((spacing.bar_width - 100.0 / 3.5).abs() <= 1e-9);
        assert!((spacing.padding - spacing.bar_width * 0.5).abs() <= 1e-9);
        assert!((spacing.external - spacing.bar_width).abs() <= 1e-9);
    }

    #[test]
    fn zero_ratios_give_edge_to_edge_bars() {
        let spacing = BarSpacing::compute(3, 2, 2.0, 300.0, 0.0, 0.0).expect("spacing");
        assert!((spacing.group_width(3) - 150.0).abs() <= 1e-9);
        assert_eq!(spacing.external, 0.0);
    }

    #[test]
    fn negative_ratio_is_rejected() {
        assert!(BarSpacing::compute(1, 1, 1.0, 100.0, -0.1, 0.0).is_err());
        assert!(BarSpacing::compute(1, 1, 1.0, 100.0, 0.0, -1.0).is_err());
    }
}
