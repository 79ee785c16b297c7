#![cfg(feature = "cairo-backend")]

use std::rc::Rc;

use cairo::{Context, Format, ImageSurface};
use plotkit::core::{Series, Viewport};
use plotkit::render::CairoRenderer;
use plotkit::{Chart, ChartConfig, ChartError, ChartKind};

fn config(width: u32, height: u32, kind: ChartKind) -> ChartConfig {
    ChartConfig::new(Viewport::new(width, height), kind).with_title("Cairo")
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, ChartError::Render(_)));
}

#[test]
fn cairo_renderer_draws_bar_chart() {
    let renderer = CairoRenderer::new(600, 400).expect("renderer");
    let mut chart = Chart::bar_chart(
        renderer,
        &config(600, 400, ChartKind::Bar),
        vec![Rc::new(Series::simple(vec![3.0, 1.0, 2.0]))],
    )
    .expect("chart");

    chart.render().expect("render");
    let stats = chart.into_renderer().last_stats();
    assert!(stats.rects >= 3);
    assert!(stats.texts >= 1);
}

#[test]
fn cairo_renderer_can_draw_pie_on_external_context() {
    let renderer = CairoRenderer::new(320, 320).expect("renderer");
    let mut chart = Chart::pie_chart(
        renderer,
        &config(320, 320, ChartKind::Pie),
        Rc::new(Series::simple(vec![1.0, 2.0, 3.0])),
    )
    .expect("chart");

    let surface = ImageSurface::create(Format::ARgb32, 320, 320).expect("surface");
    let context = Context::new(&surface).expect("context");
    chart
        .render_on_cairo_context(&context)
        .expect("render on context");

    assert_eq!(chart.into_renderer().last_stats().pie_slices, 3);
}
