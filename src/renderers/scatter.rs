use std::f64::consts::TAU;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{LabelKind, Point, SeriesRef, point_in_poly};
use crate::render::{RenderContext, TextHAlign, TextVAlign};

use super::renderer2d::{Renderer2D, VISIBILITY_MARGIN_PX};
use super::{DataRanges, HitResult, PlotArea};

/// Segments used to approximate a circle marker.
pub const CIRCLE_SEGMENTS: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScatterShape {
    #[default]
    Circle,
    Diamond,
    Square,
    Triangle,
}

pub type ShapeVertices = SmallVec<[Point; CIRCLE_SEGMENTS]>;

/// Polygon outline of a marker of `size` pixels centered on `center`.
///
/// Drawing and hit-testing share these vertices.
#[must_use]
pub fn shape_vertices(shape: ScatterShape, center: Point, size: f64) -> ShapeVertices {
    let half = size / 2.0;
    let Point { x, y } = center;
    match shape {
        ScatterShape::Circle => (0..CIRCLE_SEGMENTS)
            .map(|step| {
                let angle = TAU * step as f64 / CIRCLE_SEGMENTS as f64;
                Point::new(x + half * angle.cos(), y + half * angle.sin())
            })
            .collect(),
        ScatterShape::Diamond => SmallVec::from_slice(&[
            Point::new(x, y - half),
            Point::new(x + half, y),
            Point::new(x, y + half),
            Point::new(x - half, y),
        ]),
        ScatterShape::Square => SmallVec::from_slice(&[
            Point::new(x - half, y - half),
            Point::new(x + half, y - half),
            Point::new(x + half, y + half),
            Point::new(x - half, y + half),
        ]),
        ScatterShape::Triangle => SmallVec::from_slice(&[
            Point::new(x, y - half),
            Point::new(x + half, y + half),
            Point::new(x - half, y + half),
        ]),
    }
}

/// Marker shape and size shared by scatter plots and line markers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    pub shape: ScatterShape,
    pub size: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            shape: ScatterShape::Circle,
            size: 8.0,
        }
    }
}

/// Fixed-shape markers at each data point.
#[derive(Debug)]
pub struct ScatterRenderer {
    core: Renderer2D,
    marker: MarkerStyle,
}

impl ScatterRenderer {
    #[must_use]
    pub fn new(series: impl IntoIterator<Item = SeriesRef>) -> Self {
        Self {
            core: Renderer2D::new(series),
            marker: MarkerStyle::default(),
        }
    }

    #[must_use]
    pub fn with_marker(mut self, shape: ScatterShape, size: f64) -> Self {
        self.marker = MarkerStyle {
            shape,
            size: size.max(0.0),
        };
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
    pub fn marker(&self) -> MarkerStyle {
        self.marker
    }

    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        let (x, y) = self.core.data_ranges();
        DataRanges { x, y }
    }

    fn margin_px(&self) -> f64 {
        VISIBILITY_MARGIN_PX.max(self.marker.size)
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let theme = ctx.theme();
        let chain = self.core.style_chain(area, theme);
        let labels = self.core.show_data_labels();
        let marker = self.marker;
        self.core
            .enum_visible_points::<()>(&axes, self.margin_px(), false, |visible| {
                let style = chain.resolve(visible.series_index, visible.data_index);
                let vertices = shape_vertices(marker.shape, visible.point, marker.size);
                ctx.draw_polygon(&vertices, Some(style.fill), Some(style.stroke));

                if labels.contains(LabelKind::OuterLabel) {
                    let text = self
                        .core
                        .series()
                        .get(visible.series_index)
                        .and_then(|series| series.label(visible.data_index, LabelKind::OuterLabel));
                    if let Some(text) = text {
                        ctx.draw_text(
                            &text,
                            visible.point.offset(0.0, -marker.size / 2.0 - 2.0),
                            theme.data_labels_font_size,
                            theme.data_labels_brush,
                            TextHAlign::Center,
                            TextVAlign::Bottom,
                        );
                    }
                }
                ControlFlow::Continue(())
            });
    }

    #[must_use]
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        area: &PlotArea<'_>,
    ) -> Option<HitResult> {
        let axes = self.core.resolve_axes(ctx, area)?;
        let marker = self.marker;
        self.core
            .enum_visible_points(&axes, self.margin_px(), true, |visible| {
                let vertices = shape_vertices(marker.shape, visible.point, marker.size);
                if point_in_poly(point, &vertices) {
                    ControlFlow::Break(HitResult::from_visible(
                        area.renderer_index,
                        &visible,
                        visible.point,
                    ))
                } else {
                    ControlFlow::Continue(())
                }
            })
    }

    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, hit: &HitResult) {
        let vertices = shape_vertices(
            self.marker.shape,
            Point::new(hit.x, hit.y),
            self.marker.size,
        );
        let stroke = ctx.theme().highlight();
        ctx.draw_polygon(&vertices, None, Some(stroke));
    }
}
