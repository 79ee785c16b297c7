use crate::core::{Point, Size};
use crate::render::{Color, RenderContext, TextHAlign, TextVAlign};

use super::component::{Component, LayoutProps};

/// Single text block such as a chart title or an axis title.
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    props: LayoutProps,
    text: String,
    font_size: Option<f64>,
    color: Option<Color>,
    alignment: TextHAlign,
}

impl TextComponent {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            props: LayoutProps::default(),
            text: text.into(),
            font_size: None,
            color: None,
            alignment: TextHAlign::Center,
        }
    }

    #[must_use]
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: TextHAlign) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_props(mut self, props: LayoutProps) -> Self {
        self.props = props;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate_layout();
    }

    fn font_size(&self, ctx: &RenderContext<'_>) -> f64 {
        self.font_size.unwrap_or(ctx.theme().title_font_size)
    }
}

impl Component for TextComponent {
    fn props(&self) -> &LayoutProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.props
    }

    fn measure_override(&mut self, _available: Size, ctx: &RenderContext<'_>) -> Size {
        if self.text.is_empty() {
            return Size::ZERO;
        }
        ctx.measure_text(&self.text, self.font_size(ctx))
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.props.actual_size();
        let x = match self.alignment {
            TextHAlign::Left => 0.0,
            TextHAlign::Center => size.width / 2.0,
            TextHAlign::Right => size.width,
        };
        let color = self.color.unwrap_or(ctx.theme().title_brush);
        let font_size = self.font_size(ctx);
        ctx.draw_text(
            &self.text,
            Point::new(x, size.height / 2.0),
            font_size,
            color,
            self.alignment,
            TextVAlign::Middle,
        );
    }
}
