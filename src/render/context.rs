use crate::core::{Axis, AxisId, AxisSet, Point, Rect, Size, Viewport};
use crate::render::{
    Color, DrawCommand, EllipsePrimitive, LinePrimitive, PieSlicePrimitive, PolygonPrimitive,
    PolylinePrimitive, RectPrimitive, RenderFrame, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};
use crate::style::{Theme, TooltipStyle};

/// Measures text extents for layout.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size;
}

/// Monospace-style estimate used when no font backend is available.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxTextMeasurer {
    pub char_width_ratio: f64,
    pub line_height_ratio: f64,
}

impl Default for ApproxTextMeasurer {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height_ratio: 1.2,
        }
    }
}

impl TextMeasurer for ApproxTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> Size {
        let lines = text.lines().count().max(1);
        let widest = text
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        Size::new(
            widest as f64 * font_size * self.char_width_ratio,
            lines as f64 * font_size * self.line_height_ratio,
        )
    }
}

/// Per-pass state threaded through measure, arrange, draw and hit-test.
///
/// Drawing calls take coordinates local to the component currently being
/// drawn; the context applies the accumulated translation before recording
/// primitives into its frame.
pub struct RenderContext<'a> {
    theme: &'a Theme,
    tooltip: &'a TooltipStyle,
    axes: &'a AxisSet,
    measurer: &'a dyn TextMeasurer,
    frame: RenderFrame,
    origin: Point,
    translations: Vec<Point>,
    clip_depth: usize,
}

impl<'a> RenderContext<'a> {
    #[must_use]
    pub fn new(
        viewport: Viewport,
        theme: &'a Theme,
        tooltip: &'a TooltipStyle,
        axes: &'a AxisSet,
        measurer: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            theme,
            tooltip,
            axes,
            measurer,
            frame: RenderFrame::new(viewport),
            origin: Point::new(0.0, 0.0),
            translations: Vec::new(),
            clip_depth: 0,
        }
    }

    #[must_use]
    pub fn theme(&self) -> &'a Theme {
        self.theme
    }

    #[must_use]
    pub fn tooltip_style(&self) -> &'a TooltipStyle {
        self.tooltip
    }

    #[must_use]
    pub fn axes(&self) -> &'a AxisSet {
        self.axes
    }

    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&'a Axis> {
        self.axes.get(id)
    }

    #[must_use]
    pub fn measure_text(&self, text: &str, font_size: f64) -> Size {
        self.measurer.measure(text, font_size)
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.frame.viewport
    }

    /// Absolute position of the local origin.
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn push_translation(&mut self, dx: f64, dy: f64) {
        self.translations.push(self.origin);
        self.origin = self.origin.offset(dx, dy);
    }

    pub fn pop_translation(&mut self) {
        if let Some(previous) = self.translations.pop() {
            self.origin = previous;
        }
    }

    /// Clips subsequent drawing to `rect` in local coordinates.
    pub fn push_clip(&mut self, rect: Rect) {
        let absolute = rect.translate(self.origin.x, self.origin.y);
        self.frame.push(DrawCommand::PushClip(absolute));
        self.clip_depth += 1;
    }

    pub fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.clip_depth -= 1;
            self.frame.push(DrawCommand::PopClip);
        }
    }

    fn absolute(&self, point: Point) -> Point {
        point.offset(self.origin.x, self.origin.y)
    }

    pub fn draw_line(&mut self, from: Point, to: Point, stroke: Stroke) {
        if !stroke.is_visible() {
            return;
        }
        let from = self.absolute(from);
        let to = self.absolute(to);
        self.frame.push(DrawCommand::Line(LinePrimitive::new(
            from.x, from.y, to.x, to.y, stroke,
        )));
    }

    pub fn draw_polyline(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 || !stroke.is_visible() {
            return;
        }
        let points = points.iter().map(|point| self.absolute(*point)).collect();
        self.frame
            .push(DrawCommand::Polyline(PolylinePrimitive { points, stroke }));
    }

    pub fn draw_polygon(&mut self, points: &[Point], fill: Option<Color>, stroke: Option<Stroke>) {
        if points.len() < 3 {
            return;
        }
        let points = points.iter().map(|point| self.absolute(*point)).collect();
        self.frame.push(DrawCommand::Polygon(PolygonPrimitive {
            points,
            fill,
            stroke: stroke.filter(|stroke| stroke.is_visible()),
        }));
    }

    pub fn draw_rect(&mut self, rect: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        self.frame.push(DrawCommand::Rect(RectPrimitive {
            rect: rect.translate(self.origin.x, self.origin.y),
            fill,
            stroke: stroke.filter(|stroke| stroke.is_visible()),
        }));
    }

    pub fn draw_ellipse(&mut self, bounds: Rect, fill: Option<Color>, stroke: Option<Stroke>) {
        self.frame.push(DrawCommand::Ellipse(EllipsePrimitive {
            bounds: bounds.translate(self.origin.x, self.origin.y),
            fill,
            stroke: stroke.filter(|stroke| stroke.is_visible()),
        }));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_pie_slice(
        &mut self,
        center: Point,
        outer_radius: f64,
        inner_radius: f64,
        start_angle: f64,
        sweep_angle: f64,
        fill: Option<Color>,
        stroke: Option<Stroke>,
    ) {
        self.frame.push(DrawCommand::PieSlice(PieSlicePrimitive {
            center: self.absolute(center),
            outer_radius,
            inner_radius,
            start_angle,
            sweep_angle,
            fill,
            stroke: stroke.filter(|stroke| stroke.is_visible()),
        }));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        text: &str,
        at: Point,
        font_size: f64,
        color: Color,
        h_align: TextHAlign,
        v_align: TextVAlign,
    ) {
        if text.is_empty() {
            return;
        }
        let at = self.absolute(at);
        self.frame.push(DrawCommand::Text(
            TextPrimitive::new(text, at.x, at.y, font_size, color, h_align).with_v_align(v_align),
        ));
    }

    /// Closes any clip left open and hands back the recorded frame.
    #[must_use]
    pub fn into_frame(mut self) -> RenderFrame {
        while self.clip_depth > 0 {
            self.pop_clip();
        }
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_applies_to_recorded_primitives() {
        let theme = Theme::default();
        let tooltip = TooltipStyle::default();
        let axes = AxisSet::new();
        let measurer = ApproxTextMeasurer::default();
        let mut ctx = RenderContext::new(
            Viewport::new(100, 100),
            &theme,
            &tooltip,
            &axes,
            &measurer,
        );

        ctx.push_translation(10.0, 20.0);
        ctx.draw_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Some(Color::BLACK), None);
        ctx.pop_translation();
        ctx.draw_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Some(Color::BLACK), None);

        let frame = ctx.into_frame();
        let rects: Vec<_> = frame.rects().map(|r| r.rect).collect();
        assert_eq!(rects[0], Rect::new(11.0, 22.0, 3.0, 4.0));
        assert_eq!(rects[1], Rect::new(1.0, 2.0, 3.0, 4.0));
    }

    #[test]
    fn unbalanced_clip_is_closed_on_finish() {
        let theme = Theme::default();
        let tooltip = TooltipStyle::default();
        let axes = AxisSet::new();
        let measurer = ApproxTextMeasurer::default();
        let mut ctx = RenderContext::new(
            Viewport::new(10, 10),
            &theme,
            &tooltip,
            &axes,
            &measurer,
        );
        ctx.push_clip(Rect::new(0.0, 0.0, 5.0, 5.0));
        let frame = ctx.into_frame();
        assert!(frame.validate().is_ok());
    }
}
