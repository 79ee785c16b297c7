use cairo::{Context, Format, ImageSurface};
use pango::FontDescription;

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawCommand, FrameStats, PieSlicePrimitive, RenderFrame, Renderer, Stroke, TextHAlign,
    TextPrimitive, TextVAlign,
};

/// Optional extension trait for renderers that can draw into an external Cairo
/// context (for example a toolkit drawing callback).
pub trait CairoContextRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()>;
}

/// Cairo + Pango + PangoCairo renderer backend.
///
/// This renderer supports two modes:
/// - offscreen image-surface rendering through `Renderer::render`
/// - in-place rendering on an external Cairo context through
///   `CairoContextRenderer`
#[derive(Debug)]
pub struct CairoRenderer {
    surface: ImageSurface,
    clear_color: Color,
    font_family: String,
    last_stats: FrameStats,
}

impl CairoRenderer {
    pub fn new(width: i32, height: i32) -> ChartResult<Self> {
        if width <= 0 || height <= 0 {
            return Err(ChartError::Render(
                "cairo surface size must be > 0".to_owned(),
            ));
        }

        let surface = ImageSurface::create(Format::ARgb32, width, height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        Ok(Self {
            surface,
            clear_color: Color::WHITE,
            font_family: "Sans".to_owned(),
            last_stats: FrameStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo+pango+pangocairo"
    }

    #[must_use]
    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    #[must_use]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_clear_color(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.clear_color = color;
        Ok(())
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    #[must_use]
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    fn render_with_context(&mut self, context: &Context, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.clear_color.validate()?;

        apply_color(context, self.clear_color);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear surface", err))?;

        for command in &frame.commands {
            match command {
                DrawCommand::Line(line) => {
                    context.move_to(line.x1, line.y1);
                    context.line_to(line.x2, line.y2);
                    stroke_path(context, line.stroke)?;
                }
                DrawCommand::Polyline(polyline) => {
                    append_points(context, &polyline.points, false);
                    stroke_path(context, polyline.stroke)?;
                }
                DrawCommand::Polygon(polygon) => {
                    append_points(context, &polygon.points, true);
                    paint_path(context, polygon.fill, polygon.stroke)?;
                }
                DrawCommand::Rect(rect) => {
                    append_rect(context, rect.rect);
                    paint_path(context, rect.fill, rect.stroke)?;
                }
                DrawCommand::Ellipse(ellipse) => {
                    append_ellipse(context, ellipse.bounds);
                    paint_path(context, ellipse.fill, ellipse.stroke)?;
                }
                DrawCommand::PieSlice(slice) => {
                    append_pie_slice(context, slice);
                    paint_path(context, slice.fill, slice.stroke)?;
                }
                DrawCommand::Text(text) => self.draw_text(context, text),
                DrawCommand::PushClip(rect) => {
                    context
                        .save()
                        .map_err(|err| map_backend_error("failed to save state", err))?;
                    append_rect(context, *rect);
                    context.clip();
                }
                DrawCommand::PopClip => {
                    context
                        .restore()
                        .map_err(|err| map_backend_error("failed to restore state", err))?;
                }
            }
        }

        self.last_stats = frame.stats();
        Ok(())
    }

    fn draw_text(&self, context: &Context, text: &TextPrimitive) {
        let layout = pangocairo::functions::create_layout(context);
        let font_description =
            FontDescription::from_string(&format!("{} {}", self.font_family, text.font_size_px));
        layout.set_font_description(Some(&font_description));
        layout.set_text(&text.text);

        let (text_width, text_height) = layout.pixel_size();
        let x = match text.h_align {
            TextHAlign::Left => text.x,
            TextHAlign::Center => text.x - f64::from(text_width) / 2.0,
            TextHAlign::Right => text.x - f64::from(text_width),
        };
        let y = match text.v_align {
            TextVAlign::Top => text.y,
            TextVAlign::Middle => text.y - f64::from(text_height) / 2.0,
            TextVAlign::Bottom => text.y - f64::from(text_height),
        };

        apply_color(context, text.color);
        context.move_to(x, y);
        pangocairo::functions::show_layout(context, &layout);
    }
}

impl Renderer for CairoRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.render_with_context(&context, frame)
    }
}

impl CairoContextRenderer for CairoRenderer {
    fn render_on_cairo_context(
        &mut self,
        context: &Context,
        frame: &RenderFrame,
    ) -> ChartResult<()> {
        self.render_with_context(context, frame)
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn apply_stroke(context: &Context, stroke: Stroke) {
    apply_color(context, stroke.color);
    context.set_line_width(stroke.width);
    let dashes: Vec<f64> = stroke
        .dash
        .pattern()
        .iter()
        .map(|length| length * stroke.width)
        .collect();
    context.set_dash(&dashes, 0.0);
}

fn stroke_path(context: &Context, stroke: Stroke) -> ChartResult<()> {
    apply_stroke(context, stroke);
    context
        .stroke()
        .map_err(|err| map_backend_error("failed to stroke path", err))
}

fn paint_path(context: &Context, fill: Option<Color>, stroke: Option<Stroke>) -> ChartResult<()> {
    let stroke = stroke.filter(|stroke| stroke.is_visible());
    if let Some(fill) = fill {
        apply_color(context, fill);
        context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
    }
    match stroke {
        Some(stroke) => stroke_path(context, stroke),
        None => {
            context.new_path();
            Ok(())
        }
    }
}

fn append_points(context: &Context, points: &[Point], close: bool) {
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        context.move_to(first.x, first.y);
    }
    for point in iter {
        context.line_to(point.x, point.y);
    }
    if close {
        context.close_path();
    }
}

fn append_rect(context: &Context, rect: Rect) {
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
}

fn append_ellipse(context: &Context, bounds: Rect) {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return;
    }
    let center = bounds.center();
    context.save().ok();
    context.translate(center.x, center.y);
    context.scale(bounds.width / 2.0, bounds.height / 2.0);
    context.new_sub_path();
    context.arc(0.0, 0.0, 1.0, 0.0, std::f64::consts::TAU);
    context.restore().ok();
}

fn append_pie_slice(context: &Context, slice: &PieSlicePrimitive) {
    let start = slice.start_angle.to_radians();
    let end = (slice.start_angle + slice.sweep_angle).to_radians();
    let Point { x, y } = slice.center;

    context.new_sub_path();
    context.arc(x, y, slice.outer_radius, start, end);
    if slice.inner_radius > 0.0 {
        context.arc_negative(x, y, slice.inner_radius, end, start);
    } else if slice.sweep_angle < 360.0 {
        context.line_to(x, y);
    }
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Render(format!("{prefix}: {err}"))
}
