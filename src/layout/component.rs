use serde::{Deserialize, Serialize};

use crate::core::{Margins, Point, Rect, Size};
use crate::render::RenderContext;
use crate::renderers::HitResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    Near,
    Center,
    Far,
    #[default]
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VerticalAlignment {
    Near,
    Center,
    Far,
    #[default]
    Stretch,
}

/// Layout inputs and results shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutProps {
    pub margin: Margins,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub visible: bool,
    pub hit_test_visible: bool,
    pub grid_row: usize,
    pub grid_column: usize,
    desired_size: Size,
    actual_size: Size,
    x_in_parent: f64,
    y_in_parent: f64,
    layout_dirty: bool,
    invalid_region: Option<Rect>,
}

impl Default for LayoutProps {
    fn default() -> Self {
        Self {
            margin: Margins::default(),
            width: None,
            height: None,
            horizontal_alignment: HorizontalAlignment::Stretch,
            vertical_alignment: VerticalAlignment::Stretch,
            visible: true,
            hit_test_visible: true,
            grid_row: 0,
            grid_column: 0,
            desired_size: Size::ZERO,
            actual_size: Size::ZERO,
            x_in_parent: 0.0,
            y_in_parent: 0.0,
            layout_dirty: true,
            invalid_region: None,
        }
    }
}

impl LayoutProps {
    #[must_use]
    pub fn with_margin(mut self, margin: Margins) -> Self {
        self.margin = margin;
        self
    }

    /// Fixes the size; `None` lets the content decide.
    #[must_use]
    pub fn with_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_alignment(
        mut self,
        horizontal: HorizontalAlignment,
        vertical: VerticalAlignment,
    ) -> Self {
        self.horizontal_alignment = horizontal;
        self.vertical_alignment = vertical;
        self
    }

    #[must_use]
    pub fn with_grid_cell(mut self, row: usize, column: usize) -> Self {
        self.grid_row = row;
        self.grid_column = column;
        self
    }

    /// Size requested by the last measure pass, margin included.
    #[must_use]
    pub fn desired_size(&self) -> Size {
        self.desired_size
    }

    #[must_use]
    pub fn actual_width(&self) -> f64 {
        self.actual_size.width
    }

    #[must_use]
    pub fn actual_height(&self) -> f64 {
        self.actual_size.height
    }

    #[must_use]
    pub fn actual_size(&self) -> Size {
        self.actual_size
    }

    #[must_use]
    pub fn x_in_parent(&self) -> f64 {
        self.x_in_parent
    }

    #[must_use]
    pub fn y_in_parent(&self) -> f64 {
        self.y_in_parent
    }

    /// Bounds in the parent's coordinate space.
    #[must_use]
    pub fn bounds_in_parent(&self) -> Rect {
        Rect::new(
            self.x_in_parent,
            self.y_in_parent,
            self.actual_size.width,
            self.actual_size.height,
        )
    }

    #[must_use]
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    #[must_use]
    pub fn invalid_region(&self) -> Option<Rect> {
        self.invalid_region
    }

    pub fn mark_layout_dirty(&mut self) {
        self.layout_dirty = true;
    }
}

/// Subtracts `amount` from an available extent, keeping infinity and never
/// going below zero.
#[must_use]
pub fn shrink_extent(available: f64, amount: f64) -> f64 {
    let value = available - amount;
    if value.is_nan() { 0.0 } else { value.max(0.0) }
}

/// Node of the layout tree.
///
/// Implementors provide the `*_override` hooks; the provided methods wrap
/// them with margin, alignment, fixed size and visibility handling.
pub trait Component {
    fn props(&self) -> &LayoutProps;
    fn props_mut(&mut self) -> &mut LayoutProps;

    /// Content size for the given available space, margin excluded.
    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size;

    /// Positions children inside the final content size.
    fn arrange_override(&mut self, _size: Size, _ctx: &RenderContext<'_>) {}

    /// Draws in local coordinates; the origin is the component's top-left.
    fn draw_override(&mut self, ctx: &mut RenderContext<'_>);

    /// Hit test with `point` in local coordinates.
    fn hit_test_override(&self, _point: Point, _ctx: &RenderContext<'_>) -> Option<HitResult> {
        None
    }

    fn children(&self) -> &[Box<dyn Component>] {
        &[]
    }

    fn measure(&mut self, max_width: f64, max_height: f64, ctx: &RenderContext<'_>) -> Size {
        if !self.props().visible {
            self.props_mut().desired_size = Size::ZERO;
            return Size::ZERO;
        }

        let props = self.props();
        let margin = props.margin;
        let available = Size::new(
            props
                .width
                .unwrap_or_else(|| shrink_extent(max_width, margin.horizontal())),
            props
                .height
                .unwrap_or_else(|| shrink_extent(max_height, margin.vertical())),
        );
        let (fixed_width, fixed_height) = (props.width, props.height);

        let content = self.measure_override(available, ctx);
        let content = Size::new(
            fixed_width.unwrap_or(content.width),
            fixed_height.unwrap_or(content.height),
        )
        .clamped();
        let desired = Size::new(
            content.width + margin.horizontal(),
            content.height + margin.vertical(),
        );
        self.props_mut().desired_size = desired;
        desired
    }

    fn arrange(&mut self, x: f64, y: f64, width: f64, height: f64, ctx: &RenderContext<'_>) {
        let props = self.props();
        let slot = Rect::new(x, y, width, height).deflate(props.margin);
        let desired = Size::new(
            shrink_extent(props.desired_size.width, props.margin.horizontal()),
            shrink_extent(props.desired_size.height, props.margin.vertical()),
        );

        let (actual_width, offset_x) = align(
            slot.width,
            desired.width,
            props.width,
            match props.horizontal_alignment {
                HorizontalAlignment::Near => Alignment::Near,
                HorizontalAlignment::Center => Alignment::Center,
                HorizontalAlignment::Far => Alignment::Far,
                HorizontalAlignment::Stretch => Alignment::Stretch,
            },
        );
        let (actual_height, offset_y) = align(
            slot.height,
            desired.height,
            props.height,
            match props.vertical_alignment {
                VerticalAlignment::Near => Alignment::Near,
                VerticalAlignment::Center => Alignment::Center,
                VerticalAlignment::Far => Alignment::Far,
                VerticalAlignment::Stretch => Alignment::Stretch,
            },
        );

        let props = self.props_mut();
        props.actual_size = Size::new(actual_width, actual_height);
        props.x_in_parent = slot.x + offset_x;
        props.y_in_parent = slot.y + offset_y;
        props.layout_dirty = false;

        self.arrange_override(Size::new(actual_width, actual_height), ctx);
    }

    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        if !self.props().visible {
            return;
        }
        let (dx, dy) = (self.props().x_in_parent, self.props().y_in_parent);
        ctx.push_translation(dx, dy);
        self.draw_override(ctx);
        ctx.pop_translation();
        self.props_mut().invalid_region = None;
    }

    /// Hit test with `point` in the parent's coordinate space.
    fn hit_test(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        let props = self.props();
        if !props.visible || !props.hit_test_visible {
            return None;
        }
        let local = self.from_parent(point);
        if !Rect::from_size(props.actual_size).contains(local) {
            return None;
        }
        self.hit_test_override(local, ctx)
    }

    fn to_parent(&self, point: Point) -> Point {
        point.offset(self.props().x_in_parent, self.props().y_in_parent)
    }

    fn from_parent(&self, point: Point) -> Point {
        point.offset(-self.props().x_in_parent, -self.props().y_in_parent)
    }

    /// Marks the component for measure and arrange before the next draw.
    fn invalidate_layout(&mut self) {
        self.props_mut().mark_layout_dirty();
    }

    /// Accumulates a redraw region in local coordinates; `None` means the
    /// whole component.
    fn invalidate(&mut self, region: Option<Rect>) {
        let full = Rect::from_size(self.props().actual_size);
        let region = region.unwrap_or(full);
        let props = self.props_mut();
        props.invalid_region = Some(match props.invalid_region {
            Some(existing) => existing.union(region),
            None => region,
        });
    }

    /// True when this component or any descendant needs a layout pass.
    fn needs_layout(&self) -> bool {
        self.props().layout_dirty || self.children().iter().any(|child| child.needs_layout())
    }
}

#[derive(Clone, Copy)]
enum Alignment {
    Near,
    Center,
    Far,
    Stretch,
}

/// Returns the final extent and its offset inside the slot.
fn align(slot: f64, desired: f64, fixed: Option<f64>, alignment: Alignment) -> (f64, f64) {
    let extent = match (fixed, alignment) {
        (Some(fixed), _) => fixed.min(slot),
        (None, Alignment::Stretch) => slot,
        (None, _) => desired.min(slot),
    };
    let free = shrink_extent(slot, extent);
    let offset = match alignment {
        Alignment::Near | Alignment::Stretch => 0.0,
        Alignment::Center => free / 2.0,
        Alignment::Far => free,
    };
    (extent, offset)
}
