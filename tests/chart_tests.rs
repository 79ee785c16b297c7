use std::rc::Rc;

use approx::assert_relative_eq;
use plotkit::core::{AxisId, LabelFormatter, LabelKind, Point, Rect, Series, SeriesRef, Viewport};
use plotkit::interaction::{ControllerState, InertiaConfig};
use plotkit::layout::Component;
use plotkit::plot::ZoomAction;
use plotkit::render::{Color, NullRenderer};
use plotkit::style::Theme;
use plotkit::{Chart, ChartConfig, ChartError, ChartKind, ChartViewState, ControllerKind};

fn series(values: &[f64]) -> SeriesRef {
    Rc::new(Series::simple(values.to_vec()))
}

fn bar_config() -> ChartConfig {
    ChartConfig::new(Viewport::new(400, 300), ChartKind::Bar)
        .with_title("Sales")
        .with_controller(ControllerKind::Pan)
        .with_inertia(InertiaConfig::disabled())
}

fn bar_chart(config: &ChartConfig) -> Chart<NullRenderer> {
    Chart::bar_chart(NullRenderer::default(), config, vec![series(&[1.0, 2.0, 3.0])])
        .expect("bar chart")
}

fn x_axis(chart: &Chart<NullRenderer>) -> AxisId {
    chart.plot().as_cartesian().expect("cartesian plot").x_axis()
}

fn x_range(chart: &Chart<NullRenderer>) -> (f64, f64) {
    chart
        .axes()
        .get(x_axis(chart))
        .expect("x axis")
        .effective_range()
}

// Center of a zoom button in chart pixels, after a fresh layout pass.
fn button_point(chart: &mut Chart<NullRenderer>, action: ZoomAction) -> Point {
    chart.update_layout();
    let panel = chart.panel();
    let widgets = panel.zoom_widgets().expect("zoom widgets");
    panel.to_parent(widgets.button_bounds(action).center())
}

// Center of bar `index` of three, near the baseline.
fn bar_point(plot: Rect, index: usize) -> Point {
    let fraction = (index as f64 + 0.5) / 3.0;
    Point::new(plot.x + plot.width * fraction, plot.y + plot.height * 0.9)
}

#[test]
fn bar_chart_renders_title_and_bars() {
    let mut chart = bar_chart(&bar_config());
    chart.render().expect("render");

    let renderer = chart.renderer();
    assert_eq!(renderer.frames_rendered, 1);
    let frame = renderer.last_frame.as_ref().expect("frame");
    assert!(frame.texts().any(|text| text.text == "Sales"));
    assert!(frame.rects().count() >= 3);
    frame.validate().expect("valid frame");
}

#[test]
fn themed_plot_background_fills_plot_area() {
    let background = Color::rgb(0.9, 0.9, 0.8);
    let theme = Theme {
        plot_background: Some(background),
        ..Theme::default()
    };

    let mut chart = bar_chart(&bar_config());
    chart.set_theme(theme.clone()).expect("theme");
    chart.render().expect("render");
    let plot = chart.plot_rect();
    let frame = chart.renderer().last_frame.as_ref().expect("frame");
    let filled = frame
        .rects()
        .find(|rect| rect.fill == Some(background))
        .expect("background rect");
    assert_relative_eq!(filled.rect.width, plot.width);
    assert_relative_eq!(filled.rect.height, plot.height);

    let config = ChartConfig::new(Viewport::new(300, 300), ChartKind::Pie);
    let mut pie = Chart::pie_chart(NullRenderer::default(), &config, series(&[1.0, 2.0]))
        .expect("pie chart");
    pie.set_theme(theme).expect("theme");
    pie.render().expect("render");
    let frame = pie.renderer().last_frame.as_ref().expect("frame");
    assert!(frame.rects().any(|rect| rect.fill == Some(background)));
}

#[test]
fn data_ranges_drive_measured_axes() {
    let mut chart = bar_chart(&bar_config());
    chart.update_layout();

    assert_eq!(x_range(&chart), (-0.5, 2.5));
    let plot = chart.plot_rect();
    assert!(plot.width > 0.0 && plot.height > 0.0);
    assert!(Rect::new(0.0, 0.0, 400.0, 300.0).contains(Point::new(plot.x, plot.y)));
}

#[test]
fn hover_highlights_bar_and_shows_tooltip() {
    let formatted = Series::simple(vec![1.0, 2.0, 3.0]).with_label_formatter(LabelFormatter::new(
        |_, index, kind| matches!(kind, LabelKind::ToolTip).then(|| format!("bar {index}")),
    ));
    let mut chart = Chart::bar_chart(
        NullRenderer::default(),
        &bar_config(),
        vec![Rc::new(formatted)],
    )
    .expect("bar chart");
    chart.update_layout();
    let point = bar_point(chart.plot_rect(), 2);

    let hit = chart.hit_test(point).expect("third bar");
    assert_eq!(hit.data_index, 2);

    assert!(chart.pointer_move(point.x, point.y, 0.0));
    let tooltip = chart.tooltip().expect("tooltip");
    assert_eq!(tooltip.text, "bar 2");
    assert_eq!(tooltip.position, point);
    assert_eq!(chart.plot().highlight(), Some(hit));

    // Same item, nothing to redraw.
    assert!(!chart.pointer_move(point.x, point.y, 0.1));

    let frame = chart.build_frame().expect("frame");
    assert!(frame.texts().any(|text| text.text == "bar 2"));

    assert!(chart.pointer_leave());
    assert!(chart.tooltip().is_none());
    assert_eq!(chart.plot().highlight(), None);
}

#[test]
fn tooltip_falls_back_to_value_and_can_be_disabled() {
    let mut chart = bar_chart(&bar_config());
    chart.update_layout();
    let point = bar_point(chart.plot_rect(), 1);

    chart.pointer_move(point.x, point.y, 0.0);
    assert_eq!(chart.tooltip().map(|tooltip| tooltip.text.as_str()), Some("2"));

    let mut quiet = bar_chart(&bar_config().with_show_tooltips(false));
    quiet.update_layout();
    assert!(quiet.pointer_move(point.x, point.y, 0.0));
    assert!(quiet.tooltip().is_none());
    assert!(quiet.plot().highlight().is_some());
}

#[test]
fn pan_gesture_moves_axis_and_undo_restores_measured_range() {
    let mut chart = bar_chart(&bar_config());
    chart.update_layout();
    let plot = chart.plot_rect();
    let start = plot.center();

    assert!(!chart.pointer_down(start.x, start.y, 0.0));
    assert_eq!(chart.controller_state(), ControllerState::Dragging);
    assert!(chart.pointer_move(start.x + plot.width / 4.0, start.y, 0.5));
    chart.pointer_up(start.x + plot.width / 4.0, start.y, 1.0);
    assert_eq!(chart.controller_state(), ControllerState::Idle);

    let (min, max) = x_range(&chart);
    assert_relative_eq!(min, -1.25, epsilon = 1e-9);
    assert_relative_eq!(max, 1.75, epsilon = 1e-9);
    assert_eq!(chart.history().len(), 1);

    assert!(chart.undo());
    let axis = chart.axes().get(x_axis(&chart)).expect("x axis");
    assert_eq!(axis.min_value(), None);
    assert_eq!(x_range(&chart), (-0.5, 2.5));
    assert!(!chart.undo());
}

#[test]
fn pointer_outside_plot_is_ignored() {
    let mut chart = bar_chart(&bar_config());
    assert!(!chart.pointer_down(-10.0, -10.0, 0.0));
    assert_eq!(chart.controller_state(), ControllerState::Idle);
    assert!(!chart.pointer_up(-10.0, -10.0, 0.1));
    assert!(!chart.pointer_wheel(1.0, -10.0, -10.0));
}

#[test]
fn wheel_zoom_narrows_around_pointer() {
    let config = bar_config().with_controller(ControllerKind::Zoom);
    let mut chart = bar_chart(&config);
    chart.update_layout();
    let center = chart.plot_rect().center();

    assert!(chart.pointer_wheel(1.0, center.x, center.y));
    let (min, max) = x_range(&chart);
    assert_relative_eq!(max - min, 3.0 / 1.2, epsilon = 1e-9);
    assert_relative_eq!((min + max) / 2.0, 1.0, epsilon = 1e-9);

    let frame = chart.build_frame().expect("frame after zoom");
    assert!(frame.rects().count() >= 3);
}

#[test]
fn zoom_widgets_zoom_around_center_and_reset() {
    let mut chart = bar_chart(&bar_config().with_show_zoom_widgets(true));
    let frame = chart.build_frame().expect("frame");
    for caption in ["+", "-", "1:1"] {
        assert!(frame.texts().any(|text| text.text == caption));
    }
    let zoom_in = button_point(&mut chart, ZoomAction::ZoomIn);
    assert!(chart.plot_rect().contains(zoom_in));

    assert!(chart.pointer_down(zoom_in.x, zoom_in.y, 0.0));
    assert_eq!(chart.controller_state(), ControllerState::Idle);
    let (min, max) = x_range(&chart);
    assert_relative_eq!(max - min, 3.0 / 1.2, epsilon = 1e-9);
    assert_relative_eq!((min + max) / 2.0, 1.0, epsilon = 1e-9);

    let zoom_out = button_point(&mut chart, ZoomAction::ZoomOut);
    assert!(chart.pointer_down(zoom_out.x, zoom_out.y, 0.1));
    let (min, max) = x_range(&chart);
    assert_relative_eq!(max - min, 3.0, epsilon = 1e-9);
    assert_eq!(chart.history().len(), 2);

    let reset = button_point(&mut chart, ZoomAction::Reset);
    assert!(chart.pointer_down(reset.x, reset.y, 0.2));
    let axis = chart.axes().get(x_axis(&chart)).expect("x axis");
    assert_eq!(axis.min_value(), None);
    assert_eq!(x_range(&chart), (-0.5, 2.5));
    assert!(!chart.reset_zoom());

    assert!(chart.undo());
    let axis = chart.axes().get(x_axis(&chart)).expect("x axis");
    assert!(axis.min_value().is_some());
}

#[test]
fn zoom_widgets_are_off_by_default_and_never_on_pies() {
    let mut chart = bar_chart(&bar_config());
    assert!(!chart.show_zoom_widgets());
    let frame = chart.build_frame().expect("frame");
    assert!(!frame.texts().any(|text| text.text == "1:1"));

    let config = ChartConfig::new(Viewport::new(300, 300), ChartKind::Pie)
        .with_show_zoom_widgets(true);
    let pie = Chart::from_config(NullRenderer::default(), &config, vec![series(&[1.0, 2.0])])
        .expect("pie chart");
    assert!(!pie.show_zoom_widgets());
}

#[test]
fn zoom_drag_draws_preview_outline() {
    let config = bar_config().with_controller(ControllerKind::Zoom);
    let mut chart = bar_chart(&config);
    chart.update_layout();
    let plot = chart.plot_rect();
    let before = chart.build_frame().expect("frame").rects().count();

    chart.pointer_down(plot.x + 10.0, plot.y + 10.0, 0.0);
    chart.pointer_move(plot.x + 60.0, plot.y + 60.0, 0.1);
    let during = chart.build_frame().expect("frame").rects().count();
    assert_eq!(during, before + 1);

    assert!(chart.pointer_leave());
    assert_eq!(chart.controller_state(), ControllerState::Idle);
    assert_eq!(x_range(&chart), (-0.5, 2.5));
}

#[test]
fn pie_chart_rotates_with_drag() {
    let config = ChartConfig::new(Viewport::new(300, 300), ChartKind::Pie)
        .with_controller(ControllerKind::Rotation)
        .with_start_angle(0.0)
        .with_detached_slices([0]);
    let mut chart = Chart::from_config(
        NullRenderer::default(),
        &config,
        vec![series(&[1.0, 2.0, 3.0])],
    )
    .expect("pie chart");
    chart.update_layout();
    let center = chart.plot_rect().center();

    chart.pointer_down(center.x + 40.0, center.y, 0.0);
    assert!(chart.pointer_move(center.x, center.y + 40.0, 1.0));
    chart.pointer_up(center.x, center.y + 40.0, 2.0);

    let polar = chart.plot().as_polar().expect("polar plot");
    assert_relative_eq!(polar.start_angle(), 90.0, epsilon = 1e-9);
    assert_eq!(chart.view_state().start_angle, Some(polar.start_angle()));

    let frame = chart.build_frame().expect("frame");
    assert_eq!(frame.pie_slices().count(), 3);

    assert!(chart.undo());
    let polar = chart.plot().as_polar().expect("polar plot");
    assert_relative_eq!(polar.start_angle(), 0.0);
}

#[test]
fn from_config_rejects_missing_series_and_bad_ratios() {
    let pie = ChartConfig::new(Viewport::new(100, 100), ChartKind::Pie);
    let err = Chart::from_config(NullRenderer::default(), &pie, Vec::new())
        .err()
        .expect("no series");
    assert!(matches!(err, ChartError::InvalidData(_)));

    let bad = bar_config().with_bar_spacing_ratio(-1.0);
    assert!(Chart::bar_chart(NullRenderer::default(), &bad, Vec::new()).is_err());

    let empty = ChartConfig::new(Viewport::new(0, 100), ChartKind::Line);
    let err = Chart::line_chart(NullRenderer::default(), &empty, Vec::new())
        .err()
        .expect("zero width");
    assert!(matches!(err, ChartError::InvalidViewport { .. }));
}

#[test]
fn combination_chart_draws_bars_under_line() {
    let config = ChartConfig::new(Viewport::new(400, 300), ChartKind::Combination)
        .with_legend("Legend");
    let mut chart = Chart::from_config(
        NullRenderer::default(),
        &config,
        vec![series(&[1.0, 2.0, 3.0]), series(&[3.0, 1.0, 2.0])],
    )
    .expect("combination chart");

    let frame = chart.build_frame().expect("frame");
    assert!(frame.polylines().count() >= 1);
    assert!(frame.texts().any(|text| text.text == "Legend"));
    let plot = chart.plot().as_cartesian().expect("cartesian");
    assert_eq!(plot.renderers().len(), 2);
}

#[test]
fn view_state_survives_json_round_trip() {
    let mut chart = bar_chart(&bar_config());
    chart.update_layout();
    let x = x_axis(&chart);
    chart
        .axes_mut()
        .get_mut(x)
        .expect("x axis")
        .set_range(-1.0, 4.0)
        .expect("range");

    let json = chart
        .view_state()
        .to_json_contract_v1_pretty()
        .expect("serialize");
    assert!(json.contains("\"schema_version\": 1"));
    let state = ChartViewState::from_json_compat_str(&json).expect("parse");
    assert_eq!(state.viewport, Viewport::new(400, 300));
    let (_, saved_x) = state
        .axes
        .iter()
        .find(|(id, _)| *id == x)
        .expect("saved x axis");
    assert_eq!(saved_x.min_value(), Some(-1.0));
    assert_eq!(saved_x.max_value(), Some(4.0));

    let mut restored = bar_chart(&bar_config());
    restored.restore_view_state(&state).expect("restore");
    restored.update_layout();
    assert_eq!(x_range(&restored), (-1.0, 4.0));
    assert!(restored.history().is_empty());
}

#[test]
fn view_state_with_unknown_axis_is_rejected() {
    let mut bars = bar_chart(&bar_config());
    let state = bars.view_state();

    let pie_config = ChartConfig::new(Viewport::new(200, 200), ChartKind::Pie);
    let mut pie = Chart::pie_chart(NullRenderer::default(), &pie_config, series(&[1.0]))
        .expect("pie chart");
    let err = pie.restore_view_state(&state).expect_err("pie has no axes");
    assert!(matches!(err, ChartError::Persistence(_)));

    bars.restore_view_state(&state).expect("own state");
}

#[test]
fn config_persists_through_contract() {
    let config = bar_config()
        .with_legend("Regions")
        .with_axis_titles("Quarter", "Revenue")
        .with_x_axis_interval(1.0)
        .with_detached_slices([1, 2]);

    let json = config.to_json_contract_v1_pretty().expect("serialize");
    let loaded = ChartConfig::from_json_compat_str(&json).expect("parse");
    assert_eq!(loaded, config);

    let partial = r#"{"kind": "Line", "title": "Temps"}"#;
    let loaded = ChartConfig::from_json_compat_str(partial).expect("partial");
    assert_eq!(loaded.kind, ChartKind::Line);
    assert_eq!(loaded.title, "Temps");
    assert_eq!(loaded.viewport, ChartConfig::default().viewport);

    let invalid = r#"{"bar_spacing_ratio": -2.0}"#;
    assert!(ChartConfig::from_json_compat_str(invalid).is_err());
}
