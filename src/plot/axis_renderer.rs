use serde::{Deserialize, Serialize};

use crate::core::{Axis, AxisId, LabelKind, Point, SeriesRef, Size};
use crate::layout::{Component, LayoutProps};
use crate::render::{RenderContext, TextHAlign, TextVAlign};

const LABEL_GAP_PX: f64 = 3.0;

/// Side of the plot an axis renderer sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisPosition {
    /// Horizontal axis below the plot.
    #[default]
    Bottom,
    /// Vertical axis left of the plot.
    Left,
}

/// Axis line, ticks, coordinate labels and title next to a plot.
///
/// The renderer spans the same extent as the plot it annotates, so its own
/// width (bottom) or height (left) is the mapping view size.
#[derive(Debug, Clone)]
pub struct AxisRenderer {
    props: LayoutProps,
    axis: AxisId,
    position: AxisPosition,
    show_coordinates: bool,
    show_ticks: bool,
    show_title: bool,
    label_series: Option<SeriesRef>,
}

/// Text and pixel offset along the axis of one label.
type AxisLabel = (String, f64);

impl AxisRenderer {
    #[must_use]
    pub fn new(axis: AxisId, position: AxisPosition) -> Self {
        Self {
            props: LayoutProps::default(),
            axis,
            position,
            show_coordinates: true,
            show_ticks: true,
            show_title: true,
            label_series: None,
        }
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.axis
    }

    #[must_use]
    pub fn position(&self) -> AxisPosition {
        self.position
    }

    #[must_use]
    pub fn show_coordinates(&self) -> bool {
        self.show_coordinates
    }

    pub fn set_show_coordinates(&mut self, show: bool) {
        self.show_coordinates = show;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn show_ticks(&self) -> bool {
        self.show_ticks
    }

    pub fn set_show_ticks(&mut self, show: bool) {
        self.show_ticks = show;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
        self.invalidate_layout();
    }

    /// Series whose `XAxisLabel` texts replace numeric coordinates on a
    /// category axis.
    pub fn set_label_series(&mut self, series: Option<SeriesRef>) {
        self.label_series = series.filter(|series| {
            self.position == AxisPosition::Bottom
                && series.supported_labels().contains(LabelKind::XAxisLabel)
        });
    }

    fn view_size(&self) -> f64 {
        match self.position {
            AxisPosition::Bottom => self.props.actual_width(),
            AxisPosition::Left => self.props.actual_height(),
        }
    }

    fn to_pixel(&self, axis: &Axis, value: f64) -> f64 {
        match self.position {
            AxisPosition::Bottom => axis.map_value_to_pixel_x(value, self.view_size()),
            AxisPosition::Left => axis.map_value_to_pixel_y(value, self.view_size()),
        }
    }

    fn labels(&self, axis: &Axis) -> Vec<AxisLabel> {
        if !self.show_coordinates {
            return Vec::new();
        }
        if let Some(series) = &self.label_series {
            return (0..series.size())
                .filter_map(|index| {
                    let value = series.x_value(index)?;
                    if !axis.in_range(value) {
                        return None;
                    }
                    let text = series.label(index, LabelKind::XAxisLabel)?;
                    Some((text, self.to_pixel(axis, value)))
                })
                .collect();
        }
        axis.enumerate_intervals(false, false)
            .map(|value| (axis.format_value(value), self.to_pixel(axis, value)))
            .collect()
    }

    fn tick_length(&self, ctx: &RenderContext<'_>) -> f64 {
        if self.show_ticks {
            ctx.theme().axis_tick_length
        } else {
            0.0
        }
    }

    fn title_size(&self, axis: &Axis, ctx: &RenderContext<'_>) -> Size {
        if !self.show_title || axis.title().is_empty() {
            return Size::ZERO;
        }
        ctx.measure_text(axis.title(), ctx.theme().axis_title_font_size)
    }
}

impl Component for AxisRenderer {
    fn props(&self) -> &LayoutProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.props
    }

    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size {
        let Some(axis) = ctx.axis(self.axis) else {
            return Size::ZERO;
        };
        let theme = ctx.theme();
        let tick = self.tick_length(ctx);
        let title = self.title_size(axis, ctx);
        let title_extent = |extent: f64| if extent > 0.0 { extent + LABEL_GAP_PX } else { 0.0 };

        match self.position {
            AxisPosition::Bottom => {
                let label_height = if self.show_coordinates {
                    ctx.measure_text("0", theme.axis_labels_font_size).height + LABEL_GAP_PX
                } else {
                    0.0
                };
                let width = if available.width.is_finite() { available.width } else { 0.0 };
                Size::new(width, tick + label_height + title_extent(title.height))
            }
            AxisPosition::Left => {
                let label_width = self
                    .labels(axis)
                    .iter()
                    .map(|(text, _)| ctx.measure_text(text, theme.axis_labels_font_size).width)
                    .fold(0.0_f64, f64::max);
                let label_width = if label_width > 0.0 { label_width + LABEL_GAP_PX } else { 0.0 };
                let height = if available.height.is_finite() { available.height } else { 0.0 };
                Size::new(tick + label_width + title_extent(title.width), height)
            }
        }
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let Some(axis) = ctx.axis(self.axis) else {
            return;
        };
        let theme = ctx.theme();
        let size = self.props.actual_size();
        let tick = self.tick_length(ctx);
        let stroke = theme.axis_line_stroke();
        let labels = self.labels(axis);

        match self.position {
            AxisPosition::Bottom => {
                ctx.draw_line(Point::new(0.0, 0.0), Point::new(size.width, 0.0), stroke);
                if self.show_ticks {
                    for value in axis.enumerate_intervals(false, false) {
                        let x = self.to_pixel(axis, value);
                        ctx.draw_line(Point::new(x, 0.0), Point::new(x, tick), stroke);
                    }
                }
                for (text, x) in &labels {
                    ctx.draw_text(
                        text,
                        Point::new(*x, tick + LABEL_GAP_PX),
                        theme.axis_labels_font_size,
                        theme.axis_labels_brush,
                        TextHAlign::Center,
                        TextVAlign::Top,
                    );
                }
                if self.show_title && !axis.title().is_empty() {
                    ctx.draw_text(
                        axis.title(),
                        Point::new(size.width / 2.0, size.height),
                        theme.axis_title_font_size,
                        theme.axis_title_brush,
                        TextHAlign::Center,
                        TextVAlign::Bottom,
                    );
                }
            }
            AxisPosition::Left => {
                let right = size.width;
                ctx.draw_line(Point::new(right, 0.0), Point::new(right, size.height), stroke);
                if self.show_ticks {
                    for value in axis.enumerate_intervals(false, false) {
                        let y = self.to_pixel(axis, value);
                        ctx.draw_line(Point::new(right - tick, y), Point::new(right, y), stroke);
                    }
                }
                for (text, y) in &labels {
                    ctx.draw_text(
                        text,
                        Point::new(right - tick - LABEL_GAP_PX, *y),
                        theme.axis_labels_font_size,
                        theme.axis_labels_brush,
                        TextHAlign::Right,
                        TextVAlign::Middle,
                    );
                }
                if self.show_title && !axis.title().is_empty() {
                    ctx.draw_text(
                        axis.title(),
                        Point::new(0.0, size.height / 2.0),
                        theme.axis_title_font_size,
                        theme.axis_title_brush,
                        TextHAlign::Left,
                        TextVAlign::Middle,
                    );
                }
            }
        }
    }
}
