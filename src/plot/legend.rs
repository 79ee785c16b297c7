use crate::core::{LabelKind, Point, Rect, Size};
use crate::layout::{Component, LayoutProps, VerticalAlignment};
use crate::render::{RenderContext, Stroke, TextHAlign, TextVAlign};
use crate::renderers::LegendItem;

const PADDING_PX: f64 = 6.0;
const SWATCH_PX: f64 = 12.0;
const ROW_GAP_PX: f64 = 4.0;

/// Boxed list of swatches and captions.
///
/// Items are refreshed from the plot before each measure pass: one per
/// series, or one per pie element when `show_series_elements` is set.
#[derive(Debug, Clone)]
pub struct LegendRenderer {
    props: LayoutProps,
    items: Vec<LegendItem>,
    title: String,
    show_title: bool,
    show_series_elements: bool,
    element_label_kind: LabelKind,
}

impl Default for LegendRenderer {
    fn default() -> Self {
        let mut props = LayoutProps::default();
        props.vertical_alignment = VerticalAlignment::Center;
        Self {
            props,
            items: Vec::new(),
            title: String::new(),
            show_title: true,
            show_series_elements: false,
            element_label_kind: LabelKind::OuterLabel,
        }
    }
}

impl LegendRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn items(&self) -> &[LegendItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: Vec<LegendItem>) {
        if self.items != items {
            self.items = items;
            self.invalidate_layout();
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn show_title(&self) -> bool {
        self.show_title
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn show_series_elements(&self) -> bool {
        self.show_series_elements
    }

    pub fn set_show_series_elements(&mut self, show: bool) {
        self.show_series_elements = show;
        self.invalidate_layout();
    }

    #[must_use]
    pub fn element_label_kind(&self) -> LabelKind {
        self.element_label_kind
    }

    pub fn set_element_label_kind(&mut self, kind: LabelKind) {
        self.element_label_kind = kind;
        self.invalidate_layout();
    }

    fn has_title(&self) -> bool {
        self.show_title && !self.title.is_empty()
    }

    fn row_height(&self, ctx: &RenderContext<'_>) -> f64 {
        let text = ctx.measure_text("Ag", ctx.theme().legend_labels_font_size).height;
        text.max(SWATCH_PX)
    }

    fn title_height(&self, ctx: &RenderContext<'_>) -> f64 {
        if self.has_title() {
            ctx.measure_text(&self.title, ctx.theme().legend_title_font_size)
                .height
                + ROW_GAP_PX
        } else {
            0.0
        }
    }
}

impl Component for LegendRenderer {
    fn props(&self) -> &LayoutProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.props
    }

    fn measure_override(&mut self, _available: Size, ctx: &RenderContext<'_>) -> Size {
        if self.items.is_empty() && !self.has_title() {
            return Size::ZERO;
        }
        let theme = ctx.theme();
        let text_width = self
            .items
            .iter()
            .map(|item| ctx.measure_text(&item.text, theme.legend_labels_font_size).width)
            .fold(0.0_f64, f64::max);
        let title_width = if self.has_title() {
            ctx.measure_text(&self.title, theme.legend_title_font_size).width
        } else {
            0.0
        };
        let rows = self.items.len() as f64;
        let rows_height = if rows > 0.0 {
            rows * self.row_height(ctx) + (rows - 1.0) * ROW_GAP_PX
        } else {
            0.0
        };
        Size::new(
            2.0 * PADDING_PX + (SWATCH_PX + PADDING_PX + text_width).max(title_width),
            2.0 * PADDING_PX + self.title_height(ctx) + rows_height,
        )
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.props.actual_size();
        if size.width <= 0.0 || size.height <= 0.0 {
            return;
        }
        let theme = ctx.theme();
        ctx.draw_rect(
            Rect::from_size(size),
            Some(theme.legend_background),
            Some(Stroke::solid(
                theme.legend_border_stroke,
                theme.legend_border_thickness,
            )),
        );

        let mut y = PADDING_PX;
        if self.has_title() {
            ctx.draw_text(
                &self.title,
                Point::new(size.width / 2.0, y),
                theme.legend_title_font_size,
                theme.legend_labels_brush,
                TextHAlign::Center,
                TextVAlign::Top,
            );
            y += self.title_height(ctx);
        }

        let row_height = self.row_height(ctx);
        for item in &self.items {
            let swatch = Rect::new(
                PADDING_PX,
                y + (row_height - SWATCH_PX) / 2.0,
                SWATCH_PX,
                SWATCH_PX,
            );
            ctx.draw_rect(swatch, Some(item.fill), Some(item.stroke));
            ctx.draw_text(
                &item.text,
                Point::new(PADDING_PX + SWATCH_PX + PADDING_PX, y + row_height / 2.0),
                theme.legend_labels_font_size,
                theme.legend_labels_brush,
                TextHAlign::Left,
                TextVAlign::Middle,
            );
            y += row_height + ROW_GAP_PX;
        }
    }
}
