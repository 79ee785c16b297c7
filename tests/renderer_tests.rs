use std::rc::Rc;

use approx::assert_relative_eq;
use plotkit::core::{Axis, AxisSet, Point, Rect, Series, SeriesRef, Size, Viewport};
use plotkit::render::{ApproxTextMeasurer, Color, RenderContext, RenderFrame};
use plotkit::renderers::{
    AnnotationRenderer, AxisPair, BarLayout, BarRenderer, BarSpacing, LineRenderer, PieRenderer,
    PlotArea, Renderer2D, ScatterRenderer, SeriesRenderer, slice_angles,
};
use plotkit::style::{Theme, TooltipStyle};
use proptest::prelude::*;

struct Scene {
    theme: Theme,
    tooltip: TooltipStyle,
    axes: AxisSet,
    measurer: ApproxTextMeasurer,
    size: Size,
}

impl Scene {
    fn cartesian(x: Axis, y: Axis, size: Size) -> (Self, PlotArea<'static>) {
        let mut axes = AxisSet::new();
        let x_id = axes.insert(x);
        let y_id = axes.insert(y);
        let area = PlotArea {
            x_axis: Some(x_id),
            y_axis: Some(y_id),
            ..PlotArea::new(size)
        };
        (Self::with_axes(axes, size), area)
    }

    fn with_axes(axes: AxisSet, size: Size) -> Self {
        Self {
            theme: Theme::default(),
            tooltip: TooltipStyle::default(),
            axes,
            measurer: ApproxTextMeasurer::default(),
            size,
        }
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(
            Viewport::new(self.size.width as u32, self.size.height as u32),
            &self.theme,
            &self.tooltip,
            &self.axes,
            &self.measurer,
        )
    }

    fn draw(&self, renderer: &SeriesRenderer, area: &PlotArea<'_>) -> RenderFrame {
        let mut ctx = self.ctx();
        renderer.draw(&mut ctx, area);
        ctx.into_frame()
    }
}

fn series(values: &[f64]) -> SeriesRef {
    Rc::new(Series::simple(values.to_vec()))
}

fn bar_scene() -> (Scene, PlotArea<'static>, SeriesRenderer) {
    let x = Axis::with_range(-0.5, 2.5, 1.0).expect("x axis");
    let y = Axis::with_range(0.0, 3.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x, y, Size::new(300.0, 300.0));
    let mut bars = BarRenderer::new([series(&[1.0, 2.0, 3.0])]);
    bars.set_bar_spacing_ratio(1.5).expect("ratio");
    (scene, area, bars.into())
}

#[test]
fn bar_spacing_example_places_third_bar() {
    let spacing = BarSpacing::compute(1, 3, 3.0, 300.0, 0.0, 1.5).expect("spacing");
    assert_relative_eq!(spacing.bar_width, 40.0, epsilon = 1e-9);
    assert_relative_eq!(spacing.external, 60.0, epsilon = 1e-9);

    let (scene, area, bars) = bar_scene();
    let frame = scene.draw(&bars, &area);
    let rects: Vec<Rect> = frame.rects().map(|rect| rect.rect).collect();
    assert_eq!(rects.len(), 3);
    assert_relative_eq!(rects[2].x, 230.0, epsilon = 1e-9);
    assert_relative_eq!(rects[2].right(), 270.0, epsilon = 1e-9);
    assert_relative_eq!(rects[0].y, 200.0, epsilon = 1e-9);
    assert_relative_eq!(rects[0].bottom(), 300.0, epsilon = 1e-9);
}

#[test]
fn bar_data_ranges_pad_domain_and_include_origin() {
    let bars = BarRenderer::new([series(&[4.0, 6.0])]);
    let ranges = bars.data_ranges();
    assert_eq!(ranges.x, Some((-0.5, 1.5)));
    assert_eq!(ranges.y, Some((0.0, 6.0)));
}

#[test]
fn bar_hit_test_finds_bar_and_misses_gap() {
    let (scene, area, bars) = bar_scene();
    let ctx = scene.ctx();

    let hit = bars
        .hit_test(Point::new(250.0, 150.0), &ctx, &area)
        .expect("third bar");
    assert_eq!((hit.series_index, hit.data_index), (0, 2));
    assert_relative_eq!(hit.value, 3.0);

    assert!(bars.hit_test(Point::new(225.0, 150.0), &ctx, &area).is_none());
    // Above the second bar's top.
    assert!(bars.hit_test(Point::new(150.0, 50.0), &ctx, &area).is_none());
}

#[test]
fn hit_test_is_repeatable() {
    let (scene, area, bars) = bar_scene();
    let ctx = scene.ctx();
    let point = Point::new(150.0, 250.0);

    let first = bars.hit_test(point, &ctx, &area);
    let second = bars.hit_test(point, &ctx, &area);
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn topmost_series_wins_hit_test() {
    let x = Axis::with_range(0.0, 2.0, 1.0).expect("x axis");
    let y = Axis::with_range(0.0, 2.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x, y, Size::new(200.0, 200.0));
    let scatter: SeriesRenderer = ScatterRenderer::new([series(&[1.0]), series(&[1.0])]).into();

    let frame = scene.draw(&scatter, &area);
    assert_eq!(frame.polygons().count(), 2);

    let ctx = scene.ctx();
    let hit = scatter
        .hit_test(Point::new(0.0, 100.0), &ctx, &area)
        .expect("marker under point");
    assert_eq!(hit.series_index, 1);
}

#[test]
fn line_hit_test_snaps_to_nearer_endpoint() {
    let x = Axis::with_range(0.0, 2.0, 1.0).expect("x axis");
    let y = Axis::with_range(0.0, 1.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x, y, Size::new(200.0, 100.0));
    let data = Series::xy(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0]).expect("xy series");
    let line: SeriesRenderer = LineRenderer::new([Rc::new(data)]).into();
    let ctx = scene.ctx();

    let hit = line
        .hit_test(Point::new(60.0, 40.0), &ctx, &area)
        .expect("near first segment");
    assert_eq!(hit.data_index, 1);
    assert_relative_eq!(hit.x, 100.0, epsilon = 1e-9);
    assert_relative_eq!(hit.y, 0.0, epsilon = 1e-9);

    assert!(line.hit_test(Point::new(50.0, 90.0), &ctx, &area).is_none());
}

#[test]
fn stacked_bars_grow_apart_from_origin() {
    let stack = BarRenderer::new([series(&[2.0]), series(&[-3.0]), series(&[2.0])])
        .with_layout(BarLayout::Stack);
    let ranges = stack.data_ranges();
    assert_eq!(ranges.x, Some((-0.5, 0.5)));
    assert_eq!(ranges.y, Some((-3.0, 4.0)));

    // 10 px per unit; value v sits at y = 40 - 10 v.
    let x = Axis::with_range(-0.5, 0.5, 1.0).expect("x axis");
    let y = Axis::with_range(-3.0, 4.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x, y, Size::new(100.0, 70.0));
    let stack: SeriesRenderer = stack.into();

    let frame = scene.draw(&stack, &area);
    let rects: Vec<Rect> = frame.rects().map(|rect| rect.rect).collect();
    assert_eq!(rects.len(), 3);
    assert_relative_eq!(rects[0].y, 20.0, epsilon = 1e-9);
    assert_relative_eq!(rects[0].bottom(), 40.0, epsilon = 1e-9);
    assert_relative_eq!(rects[1].y, 40.0, epsilon = 1e-9);
    assert_relative_eq!(rects[1].bottom(), 70.0, epsilon = 1e-9);
    assert_relative_eq!(rects[2].y, 0.0, epsilon = 1e-9);
    assert_relative_eq!(rects[2].bottom(), 20.0, epsilon = 1e-9);

    let ctx = scene.ctx();
    let hit_at = |value: f64| {
        stack
            .hit_test(Point::new(50.0, 40.0 - 10.0 * value), &ctx, &area)
            .map(|hit| hit.series_index)
    };
    assert_eq!(hit_at(3.0), Some(2));
    assert_eq!(hit_at(1.0), Some(0));
    assert_eq!(hit_at(-2.0), Some(1));
}

#[test]
fn unsorted_series_are_scanned_in_full() {
    let x = Axis::with_range(0.0, 2.0, 1.0).expect("x axis");
    let y = Axis::with_range(0.0, 2.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x.clone(), y.clone(), Size::new(200.0, 200.0));
    let axes = AxisPair {
        x: &x,
        y: &y,
        size: Size::new(200.0, 200.0),
    };

    let unsorted: SeriesRef = Rc::new(
        Series::xy(vec![5.0, 0.5, 9.0, 1.5], vec![1.0; 4]).expect("xy series"),
    );
    let sorted: SeriesRef = Rc::new(
        Series::xy(vec![0.5, 1.5, 5.0, 9.0], vec![1.0; 4]).expect("xy series"),
    );
    assert_eq!(Renderer2D::visible_range(&unsorted, &axes, 0.0), 0..4);
    assert_eq!(Renderer2D::visible_range(&sorted, &axes, 0.0), 0..2);

    let scatter: SeriesRenderer = ScatterRenderer::new([Rc::clone(&unsorted)]).into();
    let frame = scene.draw(&scatter, &area);
    assert_eq!(frame.polygons().count(), 2);
    let ctx = scene.ctx();
    let hit = scatter
        .hit_test(Point::new(150.0, 100.0), &ctx, &area)
        .expect("marker at x = 1.5");
    assert_eq!(hit.data_index, 3);

    let zigzag = Series::xy(vec![1.0, 0.0, 2.0], vec![1.0; 3]).expect("xy series");
    let line: SeriesRenderer = LineRenderer::new([Rc::new(zigzag)]).into();
    let hit = line
        .hit_test(Point::new(150.0, 100.0), &ctx, &area)
        .expect("second segment");
    assert_eq!(hit.data_index, 2);
}

#[test]
fn annotations_box_labels_above_points() {
    let x = Axis::with_range(-0.5, 1.5, 1.0).expect("x axis");
    let y = Axis::with_range(0.0, 4.0, 1.0).expect("y axis");
    let (scene, area) = Scene::cartesian(x, y, Size::new(200.0, 200.0));
    let data = Series::bar(vec![1.0, 2.0], Vec::new(), vec!["low".to_owned()], Vec::new());
    let notes = AnnotationRenderer::new(Rc::new(data));
    let ranges = notes.data_ranges();
    assert_eq!(ranges.x, Some((0.0, 1.0)));
    assert_eq!(ranges.y, Some((1.0, 2.0)));
    let notes: SeriesRenderer = notes.into();

    let frame = scene.draw(&notes, &area);
    let texts: Vec<&str> = frame.texts().map(|text| text.text.as_str()).collect();
    // The second point has no outer label and shows its value.
    assert_eq!(texts, vec!["low", "2"]);
    assert_eq!(frame.rects().count(), 2);
    assert_eq!(frame.lines().count(), 2);

    // First point at (50, 150); its box ends 20 px above it.
    let ctx = scene.ctx();
    let hit = notes
        .hit_test(Point::new(50.0, 125.0), &ctx, &area)
        .expect("label box");
    assert_eq!(hit.data_index, 0);
    assert!(notes.hit_test(Point::new(50.0, 150.0), &ctx, &area).is_none());
}

#[test]
fn renderer_without_axes_draws_nothing() {
    let scene = Scene::with_axes(AxisSet::new(), Size::new(100.0, 100.0));
    let area = PlotArea::new(scene.size);
    let bars: SeriesRenderer = BarRenderer::new([series(&[1.0, 2.0])]).into();

    let frame = scene.draw(&bars, &area);
    assert!(frame.is_empty());
}

#[test]
fn pie_slices_follow_start_angle_and_hit_test() {
    let scene = Scene::with_axes(AxisSet::new(), Size::new(300.0, 300.0));
    let area = PlotArea::new(scene.size);
    let pie: SeriesRenderer = PieRenderer::new(series(&[1.0, 1.0, 1.0, 1.0])).into();

    let frame = scene.draw(&pie, &area);
    let sweeps: Vec<f64> = frame.pie_slices().map(|slice| slice.sweep_angle).collect();
    assert_eq!(sweeps.len(), 4);
    for sweep in sweeps {
        assert_relative_eq!(sweep, 90.0, epsilon = 1e-9);
    }

    let ctx = scene.ctx();
    // Clockwise from 3 o'clock: bottom right is the first slice.
    let hit = pie
        .hit_test(Point::new(200.0, 200.0), &ctx, &area)
        .expect("first slice");
    assert_eq!(hit.data_index, 0);
    let hit = pie
        .hit_test(Point::new(100.0, 200.0), &ctx, &area)
        .expect("second slice");
    assert_eq!(hit.data_index, 1);

    let rotated = PlotArea {
        start_angle: 90.0,
        ..area
    };
    let hit = pie
        .hit_test(Point::new(200.0, 200.0), &ctx, &rotated)
        .expect("last slice after rotation");
    assert_eq!(hit.data_index, 3);

    // Outside the radius.
    assert!(pie.hit_test(Point::new(5.0, 5.0), &ctx, &area).is_none());
}

#[test]
fn detached_slice_moves_outwards() {
    let scene = Scene::with_axes(AxisSet::new(), Size::new(300.0, 300.0));
    let area = PlotArea::new(scene.size);
    let mut pie = PieRenderer::new(series(&[1.0, 1.0]));
    pie.set_detached_slices([1]);
    let pie: SeriesRenderer = pie.into();

    let frame = scene.draw(&pie, &area);
    let centers: Vec<Point> = frame.pie_slices().map(|slice| slice.center).collect();
    assert_eq!(centers[0], Point::new(150.0, 150.0));
    // Second slice spans the top half, so it moves up.
    assert!(centers[1].y < 150.0);
}

#[test]
fn style_chain_prefers_renderer_then_plot_then_theme() {
    use plotkit::style::{PerSeriesStyle, SeriesStyle, StyleChain, UniformSeriesStyle};

    let red = Color::rgb(1.0, 0.0, 0.0);
    let blue = Color::rgb(0.0, 0.0, 1.0);
    let local: SeriesStyle = PerSeriesStyle::new(vec![red], Vec::new()).into();
    let plot: SeriesStyle = UniformSeriesStyle {
        stroke: Some(blue),
        ..UniformSeriesStyle::default()
    }
    .into();
    let theme = Theme::default();
    let chain = StyleChain::new(Some(&local), Some(&plot), &theme);

    assert_eq!(chain.fill(0, 5), red);
    assert_eq!(chain.fill(1, 0), theme.palette_fill(1));
    assert_eq!(chain.stroke(0, 0), blue);
    assert_eq!(chain.stroke(3, 3), blue);
    assert_relative_eq!(chain.stroke_thickness(0, 0), theme.series_stroke_thickness);
}

#[test]
fn missing_element_fill_falls_back_to_plot_common_fill() {
    use plotkit::style::{MixedSeriesStyle, PerElementSeriesStyle, SeriesStyle, StyleChain};

    let red = Color::rgb(1.0, 0.0, 0.0);
    let green = Color::rgb(0.0, 1.0, 0.0);
    let local: SeriesStyle =
        PerElementSeriesStyle::new(vec![vec![red]], Vec::new(), Vec::new()).into();
    let plot: SeriesStyle = MixedSeriesStyle {
        common_fills: vec![green, green],
        ..MixedSeriesStyle::default()
    }
    .into();
    let theme = Theme::default();
    let chain = StyleChain::new(Some(&local), Some(&plot), &theme);

    assert_eq!(local.fill(0, 3), None);
    assert_eq!(chain.fill(0, 0), red);
    assert_eq!(chain.fill(0, 3), green);
    assert_eq!(chain.fill(1, 0), green);
}

proptest! {
    #[test]
    fn pie_sweeps_cover_full_circle(
        values in proptest::collection::vec(0.001f64..1_000.0, 1..24),
        start in -720.0f64..720.0
    ) {
        let slices = slice_angles(&series(&values), start);
        let total: f64 = slices.iter().map(|slice| slice.sweep_angle).sum();
        prop_assert!((total - 360.0).abs() <= 1e-9);
        prop_assert!((slices[0].start_angle - start).abs() <= 1e-12);
        for pair in slices.windows(2) {
            let end = pair[0].start_angle + pair[0].sweep_angle;
            prop_assert!((pair[1].start_angle - end).abs() <= 1e-9);
        }
    }

    #[test]
    fn bars_never_overflow_their_slot(
        bars in 1usize..6,
        groups in 1usize..50,
        len in 1.0f64..4000.0,
        same_index in 0.0f64..3.0,
        spacing in 0.0f64..3.0
    ) {
        let result = BarSpacing::compute(bars, groups, groups as f64, len, same_index, spacing)
            .expect("valid ratios");
        let slot = len / groups as f64;
        let used = result.group_width(bars) + result.external;
        prop_assert!(result.bar_width > 0.0);
        prop_assert!((used - slot).abs() <= slot * 1e-9);
    }
}
