use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use plotkit::core::{Axis, Point, Series, SeriesRef, Viewport};
use plotkit::render::NullRenderer;
use plotkit::renderers::{BarSpacing, slice_angles};
use plotkit::{Chart, ChartConfig, ChartKind};

fn wave(len: usize) -> SeriesRef {
    let values = (0..len).map(|i| (i as f64 * 0.01).sin() * 100.0).collect();
    Rc::new(Series::simple(values))
}

fn bench_axis_round_trip(c: &mut Criterion) {
    let axis = Axis::with_range(0.0, 10_000.0, 1_000.0).expect("valid axis");

    c.bench_function("axis_round_trip", |b| {
        b.iter(|| {
            let px = axis.map_value_to_pixel_y(black_box(4_321.123), 1080.0);
            axis.map_pixel_to_value_y(px, 1080.0)
        })
    });
}

fn bench_axis_intervals(c: &mut Criterion) {
    let axis = Axis::with_range(-3.7, 9_871.2, 12.5).expect("valid axis");

    c.bench_function("axis_intervals", |b| {
        b.iter(|| axis.enumerate_intervals(black_box(true), true).count())
    });
}

fn bench_pie_slices_1k(c: &mut Criterion) {
X, |b| {
        b.iter(|| slice_angles(black_box(&series), 90.0))
    });
}

fn bench_bar_spacing(c: &mut Criterion) {
    c.bench_function("bar_spacing", |b| {
        b.iter(|| BarSpacing::compute(black_box(4), 250, 250.0, 1920.0, 0.1, 0.8))
    });
}

fn bench_line_frame_10k(c: &mut Criterion) {
    let config = ChartConfig::new(Viewport::new(1920, 1080), ChartKind::Line);
    let mut chart = Chart::line_chart(NullRenderer::default(), &config, vec![wave(10_000)])
        .expect("line chart");

    c.bench_function("line_frame_10k", |b| {
        b.iter(|| chart.build_frame().expect("frame"))
    });
}

fn bench_bar_hit_test(c: &mut Criterion) {
    let config = ChartConfig::new(Viewport::new(1920, 1080), ChartKind::Bar);
    let mut chart = Chart::bar_chart(NullRenderer::default(), &config, vec![wave(500)])
        .expect("bar chart");
    chart.update_layout();
    let center = chart.plot_rect().center();

    c.bench_function("bar_hit_test_500", |b| {
        b.iter(|| chart.hit_test(black_box(Point::new(center.x, center.y))))
    });
}

criterion_group!(
    benches,
    bench_axis_round_trip,
    bench_axis_intervals,
    bench_pie_slices_1k,
    bench_bar_spacing,
    bench_line_frame_10k,
    bench_bar_hit_test
);
criterion_main!(benches);
