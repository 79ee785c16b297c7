use plotkit::ChartError;
use plotkit::core::{AxisSet, Point, Rect, Viewport};
use plotkit::render::{
    ApproxTextMeasurer, Color, DrawCommand, LinePrimitive, RectPrimitive, RenderContext,
    RenderFrame, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};
use plotkit::style::{Theme, TooltipStyle};

#[test]
fn context_records_commands_in_paint_order_with_balanced_clips() {
    let (theme, tooltip, axes) = (Theme::default(), TooltipStyle::default(), AxisSet::new());
    let measurer = ApproxTextMeasurer::default();
    let mut ctx = RenderContext::new(Viewport::new(200, 100), &theme, &tooltip, &axes, &measurer);

    ctx.push_translation(10.0, 20.0);
    ctx.push_clip(Rect::new(0.0, 0.0, 50.0, 50.0));
    ctx.draw_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Some(Color::BLACK), None);
    ctx.draw_line(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Stroke::solid(Color::BLACK, 1.0),
    );
    // Invisible strokes and empty text record nothing.
    ctx.draw_line(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Stroke::solid(Color::TRANSPARENT, 1.0),
    );
    ctx.draw_text("", Point::default(), 10.0, Color::BLACK, TextHAlign::Left, TextVAlign::Top);
    ctx.pop_translation();
    ctx.draw_text("x", Point::new(1.0, 2.0), 10.0, Color::BLACK, TextHAlign::Left, TextVAlign::Top);

    // The open clip is closed on hand-off.
    let frame = ctx.into_frame();
    frame.validate().expect("valid frame");
    assert!(matches!(frame.commands[0], DrawCommand::PushClip(rect) if rect == Rect::new(10.0, 20.0, 50.0, 50.0)));
    assert!(matches!(frame.commands.last(), Some(DrawCommand::PopClip)));

    let stats = frame.stats();
    assert_eq!((stats.rects, stats.lines, stats.texts), (1, 1, 1));
    let rect = frame.rects().next().expect("rect");
    assert_eq!(rect.rect, Rect::new(10.0, 20.0, 5.0, 5.0));
    let text = frame.texts().next().expect("text");
    assert_eq!((text.x, text.y), (1.0, 2.0));
}

#[test]
fn validation_rejects_unbalanced_clips() {
    let mut frame = RenderFrame::new(Viewport::new(10, 10));
    frame.push(DrawCommand::PopClip);
    assert!(matches!(frame.validate(), Err(ChartError::Render(_))));

    let mut frame = RenderFrame::new(Viewport::new(10, 10));
    frame.push(DrawCommand::PushClip(Rect::new(0.0, 0.0, 5.0, 5.0)));
    assert!(frame.validate().is_err());
    assert!(frame.is_empty());
}

#[test]
fn validation_rejects_malformed_primitives() {
    let stroke = Stroke::solid(Color::BLACK, 1.0);

    let line = RenderFrame::new(Viewport::new(10, 10))
        .with_line(LinePrimitive::new(0.0, f64::NAN, 1.0, 1.0, stroke));
    assert!(line.validate().is_err());

    let rect = RenderFrame::new(Viewport::new(10, 10)).with_rect(RectPrimitive::filled(
        Rect::new(0.0, 0.0, -1.0, 2.0),
        Color::BLACK,
    ));
    assert!(rect.validate().is_err());

    let color = RenderFrame::new(Viewport::new(10, 10)).with_rect(RectPrimitive::filled(
        Rect::new(0.0, 0.0, 1.0, 1.0),
        Color::rgb(1.5, 0.0, 0.0),
    ));
    assert!(matches!(color.validate(), Err(ChartError::InvalidData(_))));

    let text = RenderFrame::new(Viewport::new(10, 10)).with_text(TextPrimitive::new(
        "label",
        0.0,
        0.0,
        0.0,
        Color::BLACK,
        TextHAlign::Center,
    ));
    assert!(text.validate().is_err());

    let viewport = RenderFrame::new(Viewport::new(0, 10));
    assert!(matches!(
        viewport.validate(),
        Err(ChartError::InvalidViewport { width: 0, height: 10 })
    ));
}

#[test]
fn hex_colors_parse_with_optional_alpha() {
    assert_eq!(Color::from_hex("#ffffff").expect("white"), Color::WHITE);
    let translucent = Color::from_hex("80000000").expect("argb");
    assert!((translucent.alpha - 128.0 / 255.0).abs() < 1e-12);
    assert!(Color::from_hex("#12345").is_err());
    assert!(Color::from_hex("#gg0000").is_err());
}
