use tracing::debug;

use crate::core::geometry::polar_point;
use crate::core::{LabelKind, LabelKinds, Point, SeriesRef, point_in_pie};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderContext, TextHAlign, TextVAlign};
use crate::style::{PaletteKey, SeriesStyle, StyleChain, Theme};

use super::{DataRanges, HitResult, LegendItem, PlotArea};

/// Angular extent of one data element, in degrees clockwise from 3 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub data_index: usize,
    pub value: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl PieSlice {
    #[must_use]
    pub fn mid_angle(&self) -> f64 {
        self.start_angle + self.sweep_angle / 2.0
    }
}

/// Splits 360 degrees proportionally to the positive values of `series`.
///
/// Non-positive and non-finite values get a zero sweep but keep their slot so
/// data indices stay aligned. When nothing is positive every sweep is zero.
#[must_use]
pub fn slice_angles(series: &SeriesRef, start_angle: f64) -> Vec<PieSlice> {
    let values: Vec<f64> = (0..series.size())
        .map(|index| series.value(index, 0).unwrap_or(f64::NAN))
        .collect();
    let total: f64 = values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && *value > 0.0)
        .sum();

    let mut angle = start_angle;
    values
        .into_iter()
        .enumerate()
        .map(|(data_index, value)| {
            let sweep = if total > 0.0 && value.is_finite() && value > 0.0 {
                value / total * 360.0
            } else {
                0.0
            };
            let slice = PieSlice {
                data_index,
                value,
                start_angle: angle,
                sweep_angle: sweep,
            };
            angle += sweep;
            slice
        })
        .collect()
}

/// Pie or doughnut over a single series.
#[derive(Debug)]
pub struct PieRenderer {
    series: Option<SeriesRef>,
    style: Option<SeriesStyle>,
    detached_slices: Vec<usize>,
    detach_offset: f64,
    inner_radius_ratio: f64,
    radius_ratio: f64,
    show_data_labels: LabelKinds,
    show_highlight: bool,
    data_changed: bool,
}

impl Default for PieRenderer {
    fn default() -> Self {
        Self {
            series: None,
            style: None,
            detached_slices: Vec::new(),
            detach_offset: Self::DEFAULT_DETACH_OFFSET,
            inner_radius_ratio: 0.0,
            radius_ratio: Self::DEFAULT_RADIUS_RATIO,
            show_data_labels: LabelKinds::none(),
            show_highlight: true,
            data_changed: false,
        }
    }
}

impl PieRenderer {
    pub const DEFAULT_DETACH_OFFSET: f64 = 0.1;
    pub const DEFAULT_RADIUS_RATIO: f64 = 0.8;
    const OUTER_LABEL_GAP_PX: f64 = 6.0;

    #[must_use]
    pub fn new(series: SeriesRef) -> Self {
        Self {
            series: Some(series),
            data_changed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn series(&self) -> Option<&SeriesRef> {
        self.series.as_ref()
    }

    pub fn set_series(&mut self, series: Option<SeriesRef>) {
        self.series = series;
        self.data_changed = true;
    }

    /// Reports and clears the pending series replacement.
    pub fn take_data_changed(&mut self) -> bool {
        std::mem::take(&mut self.data_changed)
    }

    #[must_use]
    pub fn style(&self) -> Option<&SeriesStyle> {
        self.style.as_ref()
    }

    pub fn set_style(&mut self, style: Option<SeriesStyle>) {
        self.style = style;
    }

    #[must_use]
    pub fn detached_slices(&self) -> &[usize] {
        &self.detached_slices
    }

    pub fn set_detached_slices(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.detached_slices = indices.into_iter().collect();
        self.detached_slices.sort_unstable();
        self.detached_slices.dedup();
    }

    #[must_use]
    pub fn is_detached(&self, data_index: usize) -> bool {
        self.detached_slices.binary_search(&data_index).is_ok()
    }

    #[must_use]
    pub fn detach_offset(&self) -> f64 {
        self.detach_offset
    }

    /// Radial offset of detached slices as a fraction of the radius.
    pub fn set_detach_offset(&mut self, fraction: f64) -> ChartResult<()> {
        self.detach_offset = checked_fraction(fraction, "detach offset")?;
        Ok(())
    }

    #[must_use]
    pub fn inner_radius_ratio(&self) -> f64 {
        self.inner_radius_ratio
    }

    /// Hole size for doughnuts; `0` draws a full pie.
    pub fn set_inner_radius_ratio(&mut self, ratio: f64) -> ChartResult<()> {
        let ratio = checked_fraction(ratio, "inner radius ratio")?;
        if ratio >= 1.0 {
            return Err(ChartError::InvalidData(format!(
                "inner radius ratio must be < 1, got {ratio}"
            )));
        }
        self.inner_radius_ratio = ratio;
        Ok(())
    }

    #[must_use]
    pub fn radius_ratio(&self) -> f64 {
        self.radius_ratio
    }

    /// Outer radius as a fraction of half the shorter plot side.
    pub fn set_radius_ratio(&mut self, ratio: f64) -> ChartResult<()> {
        let ratio = checked_fraction(ratio, "radius ratio")?;
        if ratio == 0.0 {
            return Err(ChartError::InvalidData("radius ratio must be > 0".to_owned()));
        }
        self.radius_ratio = ratio;
        Ok(())
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
        self.series.as_ref().map_or("", |series| series.title())
    }

    /// Pies do not contribute to cartesian axes.
    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        DataRanges::default()
    }

    fn style_chain<'s>(&'s self, area: &PlotArea<'s>, theme: &'s Theme) -> StyleChain<'s> {
        StyleChain::new(self.style.as_ref(), area.style, theme).with_palette_key(PaletteKey::Element)
    }

    fn geometry(&self, area: &PlotArea<'_>) -> PieGeometry {
        let radius = area.size.width.min(area.size.height).max(0.0) / 2.0 * self.radius_ratio;
        PieGeometry {
            center: Point::new(area.size.width / 2.0, area.size.height / 2.0),
            outer_radius: radius,
            inner_radius: radius * self.inner_radius_ratio,
        }
    }

    fn slice_center(&self, geometry: &PieGeometry, slice: &PieSlice) -> Point {
        if self.is_detached(slice.data_index) {
            polar_point(
                geometry.center,
                geometry.outer_radius * self.detach_offset,
                slice.mid_angle(),
            )
        } else {
            geometry.center
        }
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        let Some(series) = &self.series else {
            return;
        };
        let geometry = self.geometry(area);
        if geometry.outer_radius <= 0.0 {
            debug!("pie radius collapsed to zero; nothing to draw");
            return;
        }
        let theme = ctx.theme();
        let chain = self.style_chain(area, theme);
        let slices = slice_angles(series, area.start_angle);

        for slice in slices.iter().filter(|slice| slice.sweep_angle > 0.0) {
            let style = chain.resolve(0, slice.data_index);
            ctx.draw_pie_slice(
                self.slice_center(&geometry, slice),
                geometry.outer_radius,
                geometry.inner_radius,
                slice.start_angle,
                slice.sweep_angle,
                Some(style.fill),
                Some(style.stroke),
            );
        }

        let labels = self.show_data_labels;
        for slice in slices.iter().filter(|slice| slice.sweep_angle > 0.0) {
            let center = self.slice_center(&geometry, slice);
            let mid = slice.mid_angle();
            if labels.contains(LabelKind::InnerLabel) {
                if let Some(text) = series.label(slice.data_index, LabelKind::InnerLabel) {
                    let radius = (geometry.outer_radius + geometry.inner_radius) / 2.0;
                    ctx.draw_text(
                        &text,
                        polar_point(center, radius, mid),
                        theme.data_labels_font_size,
                        theme.data_labels_brush,
                        TextHAlign::Center,
                        TextVAlign::Middle,
                    );
                }
            }
            if labels.contains(LabelKind::OuterLabel) {
                if let Some(text) = series.label(slice.data_index, LabelKind::OuterLabel) {
                    let at = polar_point(center, geometry.outer_radius + Self::OUTER_LABEL_GAP_PX, mid);
                    let h_align = if mid.to_radians().cos() >= 0.0 {
                        TextHAlign::Left
                    } else {
                        TextHAlign::Right
                    };
                    ctx.draw_text(
                        &text,
                        at,
                        theme.data_labels_font_size,
                        theme.data_labels_brush,
                        h_align,
                        TextVAlign::Middle,
                    );
                }
            }
        }
    }

    /// Finds the slice under `point`; detached slices are tested around
    /// their shifted centers.
    #[must_use]
    pub fn hit_test(&self, point: Point, area: &PlotArea<'_>) -> Option<HitResult> {
        let series = self.series.as_ref()?;
        let geometry = self.geometry(area);
        if geometry.outer_radius <= 0.0 {
            return None;
        }
        slice_angles(series, area.start_angle)
            .iter()
            .rev()
            .filter(|slice| slice.sweep_angle > 0.0)
            .find(|slice| {
                point_in_pie(
                    point,
                    self.slice_center(&geometry, slice),
                    geometry.outer_radius,
                    geometry.inner_radius,
                    slice.start_angle,
                    slice.sweep_angle,
                )
            })
            .map(|slice| {
                let radius = (geometry.outer_radius + geometry.inner_radius) / 2.0;
                let anchor = polar_point(self.slice_center(&geometry, slice), radius, slice.mid_angle());
                HitResult {
                    renderer_index: area.renderer_index,
                    series_index: 0,
                    data_index: slice.data_index,
                    value: slice.value,
                    x: anchor.x,
                    y: anchor.y,
                }
            })
    }

    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>, hit: &HitResult) {
        let Some(series) = &self.series else {
            return;
        };
        let geometry = self.geometry(area);
        let slices = slice_angles(series, area.start_angle);
        let Some(slice) = slices.get(hit.data_index) else {
            return;
        };
        let stroke = ctx.theme().highlight();
        ctx.draw_pie_slice(
            self.slice_center(&geometry, slice),
            geometry.outer_radius,
            geometry.inner_radius,
            slice.start_angle,
            slice.sweep_angle,
            None,
            Some(stroke),
        );
    }

    /// One legend entry per element, labelled with `kind`.
    #[must_use]
    pub fn legend_items(&self, area: &PlotArea<'_>, theme: &Theme, kind: LabelKind) -> Vec<LegendItem> {
        let Some(series) = &self.series else {
            return Vec::new();
        };
        let chain = self.style_chain(area, theme);
        (0..series.size())
            .map(|data_index| {
                let style = chain.resolve(0, data_index);
                LegendItem {
                    text: series
                        .label(data_index, kind)
                        .unwrap_or_else(|| format!("{}", data_index + 1)),
                    fill: style.fill,
                    stroke: style.stroke,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct PieGeometry {
    center: Point,
    outer_radius: f64,
    inner_radius: f64,
}

fn checked_fraction(value: f64, what: &str) -> ChartResult<f64> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ChartError::InvalidData(format!(
            "{what} must be within [0, 1], got {value}"
        )))
    }
}
