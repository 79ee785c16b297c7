use std::ops::{ControlFlow, Range};

use tracing::debug;

use crate::collections::ObservableCollection;
use crate::core::{Axis, AxisId, LabelKinds, Point, SeriesRef, Size};
use crate::render::RenderContext;
use crate::style::{SeriesStyle, StyleChain, Theme};

use super::PlotArea;

/// Default extra pixels beyond the plot edges within which points still
/// count as visible.
pub const VISIBILITY_MARGIN_PX: f64 = 8.0;

/// One data element mapped to plot pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisiblePoint {
    pub series_index: usize,
    pub data_index: usize,
    pub x_value: f64,
    pub y_value: f64,
    pub point: Point,
}

/// Axis pair resolved for one pass.
#[derive(Debug, Clone, Copy)]
pub struct AxisPair<'a> {
    pub x: &'a Axis,
    pub y: &'a Axis,
    pub size: Size,
}

impl AxisPair<'_> {
    #[must_use]
    pub fn to_pixel(&self, x_value: f64, y_value: f64) -> Point {
        Point::new(
            self.x.map_value_to_pixel_x(x_value, self.size.width),
            self.y.map_value_to_pixel_y(y_value, self.size.height),
        )
    }

    #[must_use]
    pub fn to_value(&self, point: Point) -> (f64, f64) {
        (
            self.x.map_pixel_to_value_x(point.x, self.size.width),
            self.y.map_pixel_to_value_y(point.y, self.size.height),
        )
    }
}

/// Shared state and enumeration of the cartesian renderers.
///
/// Series are drawn back-to-front: index 0 first, the last-added series on
/// top. Hit tests walk front-to-back so the topmost item wins.
#[derive(Debug, Default)]
pub struct Renderer2D {
    series: ObservableCollection<SeriesRef>,
    style: Option<SeriesStyle>,
    x_axis: Option<AxisId>,
    y_axis: Option<AxisId>,
    show_data_labels: LabelKinds,
    show_highlight: bool,
    title: String,
    ranges_changed: bool,
}

impl Renderer2D {
    #[must_use]
    pub fn new(series: impl IntoIterator<Item = SeriesRef>) -> Self {
        Self {
            series: series.into_iter().collect(),
            show_highlight: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn series(&self) -> &ObservableCollection<SeriesRef> {
        &self.series
    }

    pub fn series_mut(&mut self) -> &mut ObservableCollection<SeriesRef> {
        &mut self.series
    }

    #[must_use]
    pub fn style(&self) -> Option<&SeriesStyle> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<SeriesStyle>) {
        self.style = style;
    }

    #[must_use]
    pub fn x_axis(&self) -> Option<AxisId> {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> Option<AxisId> {
        self.y_axis
    }

    /// Overrides the plot's default axes for this renderer.
    pub fn set_axes(&mut self, x_axis: Option<AxisId>, y_axis: Option<AxisId>) {
        if (self.x_axis, self.y_axis) != (x_axis, y_axis) {
            self.ranges_changed = true;
        }
        self.x_axis = x_axis;
        self.y_axis = y_axis;
    }

    /// Flags the data ranges as stale without touching the series, for
    /// settings that change how the same data is measured.
    pub fn mark_ranges_changed(&mut self) {
        self.ranges_changed = true;
    }

    /// Drains series changes and the stale-range flag; true when the
    /// hosting plot must measure again.
    pub fn take_changes(&mut self) -> bool {
        let series_changed = !self.series.take_changes().is_empty();
        std::mem::take(&mut self.ranges_changed) || series_changed
    }

    #[must_use]
    pub fn show_data_labels(&self) -> LabelKinds {
        self.show_data_labels
    }

    pub fn set_show_data_labels(&mut self, kinds: LabelKinds) {
        self.show_data_labels = kinds;
    }

    #[must_use]
    pub fn show_highlight(&self) -> bool {
        self.show_highlight
    }

    pub fn set_show_highlight(&mut self, show: bool) {
        self.show_highlight = show;
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Axis ids after applying the renderer override, then the plot default.
    #[must_use]
    pub fn axis_ids(&self, area: &PlotArea<'_>) -> (Option<AxisId>, Option<AxisId>) {
        (self.x_axis.or(area.x_axis), self.y_axis.or(area.y_axis))
    }

    #[must_use]
    pub fn resolve_axes<'c>(
        &self,
        ctx: &RenderContext<'c>,
        area: &PlotArea<'_>,
    ) -> Option<AxisPair<'c>> {
        let (x_id, y_id) = self.axis_ids(area);
        let x = x_id.and_then(|id| ctx.axis(id));
        let y = y_id.and_then(|id| ctx.axis(id));
        match (x, y) {
            (Some(x), Some(y)) => Some(AxisPair {
                x,
                y,
                size: area.size,
            }),
            _ => {
                debug!(?x_id, ?y_id, "renderer axes unresolved; skipping");
                None
            }
        }
    }

    #[must_use]
    pub fn style_chain<'s>(&'s self, area: &PlotArea<'s>, theme: &'s Theme) -> StyleChain<'s> {
        StyleChain::new(self.style.as_ref(), area.style, theme)
    }

    fn series_order(&self, front_to_back: bool) -> Box<dyn Iterator<Item = usize>> {
        let count = self.series.len();
        if front_to_back {
            Box::new((0..count).rev())
        } else {
            Box::new(0..count)
        }
    }

    /// Indices of `series` whose domain value falls inside the visible
    /// X range. Sorted series use binary search; others get the full range
    /// and are filtered per point.
    #[must_use]
    pub fn visible_range(series: &SeriesRef, axes: &AxisPair<'_>, margin_px: f64) -> Range<usize> {
        let size = series.size();
        if !series.is_domain_sorted() {
            return 0..size;
        }
        let first = first_in_range(series, axes.x, axes.size.width, margin_px);
        let last = last_in_range(series, axes.x, axes.size.width, margin_px);
        if first >= last {
            first..first
        } else {
            first..last
        }
    }

    fn map_point(
        series: &SeriesRef,
        series_index: usize,
        data_index: usize,
        axes: &AxisPair<'_>,
    ) -> Option<VisiblePoint> {
        let x_value = series.x_value(data_index)?;
        let y_value = series.y_value(data_index)?;
        if !x_value.is_finite() || !y_value.is_finite() {
            return None;
        }
        Some(VisiblePoint {
            series_index,
            data_index,
            x_value,
            y_value,
            point: axes.to_pixel(x_value, y_value),
        })
    }

    /// Calls `f` for every visible, finite data point.
    ///
    /// Returns `Some(value)` when `f` breaks early.
    pub fn enum_visible_points<B>(
        &self,
        axes: &AxisPair<'_>,
        margin_px: f64,
        front_to_back: bool,
        mut f: impl FnMut(VisiblePoint) -> ControlFlow<B>,
    ) -> Option<B> {
        for series_index in self.series_order(front_to_back) {
            let Some(series) = self.series.get(series_index) else {
                continue;
            };
            let range = Self::visible_range(series, axes, margin_px);
            let indices: Box<dyn Iterator<Item = usize>> = if front_to_back {
                Box::new(range.rev())
            } else {
                Box::new(range)
            };
            for data_index in indices {
                let Some(visible) = Self::map_point(series, series_index, data_index, axes) else {
                    continue;
                };
                if !axes
                    .x
                    .in_extended_range(visible.x_value, margin_px, axes.size.width)
                {
                    continue;
                }
                if let ControlFlow::Break(value) = f(visible) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Calls `f` for each pair of consecutive finite points whose segment
    /// can cross the visible area. A non-finite point breaks the line.
    pub fn enum_visible_point_pairs<B>(
        &self,
        axes: &AxisPair<'_>,
        margin_px: f64,
        front_to_back: bool,
        mut f: impl FnMut(VisiblePoint, VisiblePoint) -> ControlFlow<B>,
    ) -> Option<B> {
        for series_index in self.series_order(front_to_back) {
            let Some(series) = self.series.get(series_index) else {
                continue;
            };
            let range = Self::visible_range(series, axes, margin_px);
            // One neighbour on each side so segments reach the plot edges.
            let start = range.start.saturating_sub(1);
            let end = (range.end + 1).min(series.size());
            if end < start + 2 {
                continue;
            }
            let pairs: Box<dyn Iterator<Item = usize>> = if front_to_back {
                Box::new((start..end - 1).rev())
            } else {
                Box::new(start..end - 1)
            };
            for data_index in pairs {
                let a = Self::map_point(series, series_index, data_index, axes);
                let b = Self::map_point(series, series_index, data_index + 1, axes);
                let (Some(a), Some(b)) = (a, b) else {
                    continue;
                };
                if let ControlFlow::Break(value) = f(a, b) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Calls `f` once per series with the contiguous runs of finite visible
    /// points, as used by filled or connected shapes.
    pub fn enum_visible_ranges<B>(
        &self,
        axes: &AxisPair<'_>,
        margin_px: f64,
        front_to_back: bool,
        mut f: impl FnMut(usize, &[VisiblePoint]) -> ControlFlow<B>,
    ) -> Option<B> {
        let mut run = Vec::new();
        for series_index in self.series_order(front_to_back) {
            let Some(series) = self.series.get(series_index) else {
                continue;
            };
            let range = Self::visible_range(series, axes, margin_px);
            let start = range.start.saturating_sub(1);
            let end = (range.end + 1).min(series.size());
            run.clear();
            for data_index in start..end {
                match Self::map_point(series, series_index, data_index, axes) {
                    Some(point) => run.push(point),
                    None if !run.is_empty() => {
                        if let ControlFlow::Break(value) = f(series_index, &run) {
                            return Some(value);
                        }
                        run.clear();
                    }
                    None => {}
                }
            }
            if !run.is_empty() {
                if let ControlFlow::Break(value) = f(series_index, &run) {
                    return Some(value);
                }
            }
        }
        None
    }

    /// Finite min/max over the domain and value dimensions of all series.
    #[must_use]
    pub fn data_ranges(&self) -> (Option<(f64, f64)>, Option<(f64, f64)>) {
        let mut x: Option<(f64, f64)> = None;
        let mut y: Option<(f64, f64)> = None;
        for series in &self.series {
            x = merge_range(x, series.domain_range());
            y = merge_range(y, series.plotted_range());
        }
        (x, y)
    }

    /// Largest series size, which is the number of bar groups.
    #[must_use]
    pub fn max_series_size(&self) -> usize {
        self.series.iter().map(|series| series.size()).max().unwrap_or(0)
    }
}

#[must_use]
pub fn merge_range(a: Option<(f64, f64)>, b: Option<(f64, f64)>) -> Option<(f64, f64)> {
    match (a, b) {
        (Some((a_min, a_max)), Some((b_min, b_max))) => Some((a_min.min(b_min), a_max.max(b_max))),
        (Some(range), None) | (None, Some(range)) => Some(range),
        (None, None) => None,
    }
}

/// Number of leading indices in `0..len` for which `pred` holds, assuming
/// `pred` is true for a prefix and false afterwards.
fn partition_point(len: usize, mut pred: impl FnMut(usize) -> bool) -> usize {
    let (mut low, mut high) = (0, len);
    while low < high {
        let mid = low + (high - low) / 2;
        if pred(mid) {
            low = mid + 1;
        } else {
            high = mid;
        }
    }
    low
}

/// First index whose domain value is not left of the visible range.
#[must_use]
pub fn first_in_range(series: &SeriesRef, axis: &Axis, view_size: f64, margin_px: f64) -> usize {
    let (min, _) = axis.effective_range();
    let lower = min - axis.pixels_to_value_delta(margin_px, view_size);
    partition_point(series.size(), |index| {
        series.x_value(index).is_some_and(|x| x < lower)
    })
}

/// One past the last index whose domain value is not right of the visible
/// range.
#[must_use]
pub fn last_in_range(series: &SeriesRef, axis: &Axis, view_size: f64, margin_px: f64) -> usize {
    let (_, max) = axis.effective_range();
    let upper = max + axis.pixels_to_value_delta(margin_px, view_size);
    partition_point(series.size(), |index| {
        series.x_value(index).is_some_and(|x| x <= upper)
    })
}
