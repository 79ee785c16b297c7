use crate::core::{Margins, Point, Rect, Size};
use crate::layout::{Component, HorizontalAlignment, LayoutProps, VerticalAlignment};
use crate::render::{RenderContext, Stroke, TextHAlign, TextVAlign};

const BUTTON_PX: f64 = 22.0;
const GAP_PX: f64 = 4.0;
const INSET_PX: f64 = 6.0;

/// What a zoom widget button does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    ZoomIn,
    ZoomOut,
    /// Drops explicit axis bounds so the plot follows its data again.
    Reset,
}

impl ZoomAction {
    pub const ALL: [Self; 3] = [Self::ZoomIn, Self::ZoomOut, Self::Reset];

    #[must_use]
    pub fn caption(self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
            Self::Reset => "1:1",
        }
    }
}

/// Column of zoom buttons pinned to the top-right corner of the plot.
#[derive(Debug, Clone)]
pub struct ZoomWidgets {
    props: LayoutProps,
}

impl Default for ZoomWidgets {
    fn default() -> Self {
        Self {
            props: LayoutProps::default()
                .with_margin(Margins::uniform(INSET_PX))
                .with_alignment(HorizontalAlignment::Far, VerticalAlignment::Near),
        }
    }
}

impl ZoomWidgets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Button rectangle in this component's local coordinates.
    #[must_use]
    pub fn button_rect(action: ZoomAction) -> Rect {
        let index = ZoomAction::ALL
            .iter()
            .position(|candidate| *candidate == action)
            .unwrap_or_default();
        Rect::new(0.0, index as f64 * (BUTTON_PX + GAP_PX), BUTTON_PX, BUTTON_PX)
    }

    /// Button rectangle in the parent's coordinates, valid after arrange.
    #[must_use]
    pub fn button_bounds(&self, action: ZoomAction) -> Rect {
        let rect = Self::button_rect(action);
        rect.translate(self.props.x_in_parent(), self.props.y_in_parent())
    }

    /// Button under `point`, given in the parent's coordinates.
    #[must_use]
    pub fn action_at(&self, point: Point) -> Option<ZoomAction> {
        if !self.props.visible {
            return None;
        }
        let local = self.from_parent(point);
        ZoomAction::ALL
            .into_iter()
            .find(|action| Self::button_rect(*action).contains(local))
    }
}

impl Component for ZoomWidgets {
    fn props(&self) -> &LayoutProps {
        &self.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.props
    }

    fn measure_override(&mut self, _available: Size, _ctx: &RenderContext<'_>) -> Size {
        let count = ZoomAction::ALL.len() as f64;
        Size::new(BUTTON_PX, count * BUTTON_PX + (count - 1.0) * GAP_PX)
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        let theme = ctx.theme();
        let border = Stroke::solid(theme.legend_border_stroke, theme.legend_border_thickness);
        for action in ZoomAction::ALL {
            let rect = Self::button_rect(action);
            ctx.draw_rect(rect, Some(theme.legend_background), Some(border));
            ctx.draw_text(
                action.caption(),
                rect.center(),
                theme.legend_labels_font_size,
                theme.legend_labels_brush,
                TextHAlign::Center,
                TextVAlign::Middle,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_stack_downwards() {
        assert_eq!(
            ZoomWidgets::button_rect(ZoomAction::ZoomIn),
            Rect::new(0.0, 0.0, BUTTON_PX, BUTTON_PX)
        );
        assert_eq!(
            ZoomWidgets::button_rect(ZoomAction::Reset).y,
            2.0 * (BUTTON_PX + GAP_PX)
        );
    }

    #[test]
    fn gaps_between_buttons_hit_nothing() {
        let widgets = ZoomWidgets::new();
        assert_eq!(widgets.action_at(Point::new(5.0, 5.0)), Some(ZoomAction::ZoomIn));
        assert_eq!(widgets.action_at(Point::new(5.0, BUTTON_PX + 1.0)), None);
        assert_eq!(
            widgets.action_at(Point::new(5.0, BUTTON_PX + GAP_PX + 1.0)),
            Some(ZoomAction::ZoomOut)
        );
    }
}
