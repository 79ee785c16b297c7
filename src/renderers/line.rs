use std::ops::ControlFlow;

use ordered_float::OrderedFloat;

use crate::core::geometry::distance_to_segment;
use crate::core::{Point, SeriesRef};
use crate::render::{RenderContext, Stroke};

use super::renderer2d::{Renderer2D, VISIBILITY_MARGIN_PX, VisiblePoint};
use super::scatter::{MarkerStyle, ScatterShape, shape_vertices};
use super::{DataRanges, HitResult, PlotArea};

/// Minimum hit distance from a line, in pixels, for thin strokes.
pub const LINE_HIT_TOLERANCE_PX: f64 = 4.0;

/// Intermediate points inserted per segment when curving.
const SPLINE_STEPS: usize = 8;

/// Connected polyline per series, optionally curved and with markers.
#[derive(Debug)]
pub struct LineRenderer {
    core: Renderer2D,
    spline: bool,
    markers: Option<MarkerStyle>,
}

impl LineRenderer {
    #[must_use]
    pub fn new(series: impl IntoIterator<Item = SeriesRef>) -> Self {
        Self {
            core: Renderer2D::new(series),
            spline: false,
            markers: None,
        }
    }

    #[must_use]
    pub fn with_spline(mut self, spline: bool) -> Self {
        self.spline = spline;
        self
    }

    #[must_use]
    pub fn with_markers(mut self, shape: ScatterShape, size: f64) -> Self {
        self.markers = Some(MarkerStyle {
            shape,
            size: size.max(0.0),
        });
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
    pub fn is_spline(&self) -> bool {
        self.spline
    }

    pub fn set_spline(&mut self, spline: bool) {
        self.spline = spline;
    }

    #[must_use]
    pub fn markers(&self) -> Option<MarkerStyle> {
        self.markers
    }

    pub fn set_markers(&mut self, markers: Option<MarkerStyle>) {
        self.markers = markers;
    }

    #[must_use]
    pub fn data_ranges(&self) -> DataRanges {
        let (x, y) = self.core.data_ranges();
        DataRanges { x, y }
    }

    pub fn draw(&self, ctx: &mut RenderContext<'_>, area: &PlotArea<'_>) {
        let Some(axes) = self.core.resolve_axes(ctx, area) else {
            return;
        };
        let theme = ctx.theme();
        let chain = self.core.style_chain(area, theme);
        let spline = self.spline;

        self.core
            .enum_visible_ranges::<()>(&axes, VISIBILITY_MARGIN_PX, false, |series_index, run| {
                let mut polyline: Vec<Point> = Vec::new();
                let mut current: Option<Stroke> = None;
                for (offset, pair) in run.windows(2).enumerate() {
                    let style = chain.resolve(series_index, pair[0].data_index);
                    if current.is_some_and(|stroke| stroke != style.stroke) {
                        if let Some(stroke) = current {
                            ctx.draw_polyline(&polyline, stroke);
                        }
                        polyline.clear();
                    }
                    if polyline.is_empty() {
                        polyline.push(pair[0].point);
                    }
                    if spline {
                        let before = offset.checked_sub(1).map_or(pair[0].point, |i| run[i].point);
                        let after = run.get(offset + 2).map_or(pair[1].point, |p| p.point);
                        polyline.extend(catmull_rom(before, pair[0].point, pair[1].point, after));
                    } else {
                        polyline.push(pair[1].point);
                    }
                    current = Some(style.stroke);
                }
                if let Some(stroke) = current {
                    ctx.draw_polyline(&polyline, stroke);
                }
                ControlFlow::Continue(())
            });

        if let Some(marker) = self.markers {
            self.core
                .enum_visible_points::<()>(&axes, VISIBILITY_MARGIN_PX, false, |visible| {
                    let style = chain.resolve(visible.series_index, visible.data_index);
                    let vertices = shape_vertices(marker.shape, visible.point, marker.size);
                    ctx.draw_polygon(&vertices, Some(style.fill), Some(style.stroke));
                    ControlFlow::Continue(())
                });
        }
    }

    /// Finds the topmost segment within reach of `point`. The reported
    /// element is the segment endpoint nearer to the pointer.
    #[must_use]
    pub fn hit_test(
        &self,
        point: Point,
        ctx: &RenderContext<'_>,
        area: &PlotArea<'_>,
    ) -> Option<HitResult> {
        let axes = self.core.resolve_axes(ctx, area)?;
        let chain = self.core.style_chain(area, ctx.theme());
        self.core
            .enum_visible_point_pairs(&axes, VISIBILITY_MARGIN_PX, true, |a, b| {
                let thickness = chain.stroke_thickness(a.series_index, a.data_index);
                let reach = (thickness / 2.0).max(LINE_HIT_TOLERANCE_PX);
                if distance_to_segment(point, a.point, b.point) > reach {
                    return ControlFlow::Continue(());
                }
                let nearer = nearer_endpoint(point, &a, &b);
                ControlFlow::Break(HitResult::from_visible(
                    area.renderer_index,
                    nearer,
                    nearer.point,
                ))
            })
    }

    pub fn draw_highlight(&self, ctx: &mut RenderContext<'_>, hit: &HitResult) {
        let size = self.markers.map_or(10.0, |marker| marker.size + 4.0);
        let vertices = shape_vertices(ScatterShape::Circle, Point::new(hit.x, hit.y), size);
        let stroke = ctx.theme().highlight();
        ctx.draw_polygon(&vertices, None, Some(stroke));
    }
}

fn nearer_endpoint<'p>(point: Point, a: &'p VisiblePoint, b: &'p VisiblePoint) -> &'p VisiblePoint {
    // Ties resolve to the first endpoint.
    [a, b]
        .into_iter()
        .min_by_key(|end| OrderedFloat(point.distance_to(end.point)))
        .unwrap_or(a)
}

/// Points of a uniform Catmull-Rom segment from `p1` to `p2`, excluding `p1`.
fn catmull_rom(p0: Point, p1: Point, p2: Point, p3: Point) -> impl Iterator<Item = Point> {
    (1..=SPLINE_STEPS).map(move |step| {
        let t = step as f64 / SPLINE_STEPS as f64;
        let t2 = t * t;
        let t3 = t2 * t;
        let blend = |a: f64, b: f64, c: f64, d: f64| {
            0.5 * (2.0 * b
                + (-a + c) * t
                + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2
                + (-a + 3.0 * b - 3.0 * c + d) * t3)
        };
        Point::new(
            blend(p0.x, p1.x, p2.x, p3.x),
            blend(p0.y, p1.y, p2.y, p3.y),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catmull_rom_ends_on_segment_end() {
        let points: Vec<Point> = catmull_rom(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 1.0),
        )
        .collect();
        assert_eq!(points.len(), SPLINE_STEPS);
        let last = points[SPLINE_STEPS - 1];
        assert!((last.x - 2.0).abs() <= 1e-9 && last.y.abs() <= 1e-9);
    }

    #[test]
    fn collinear_spline_stays_on_line() {
        let points: Vec<Point> = catmull_rom(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        )
        .collect();
        assert!(points.iter().all(|p| (p.x - p.y).abs() <= 1e-9));
    }
}
