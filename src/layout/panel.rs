use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{Point, Rect, Size};
use crate::render::{Color, RenderContext, Stroke};
use crate::renderers::HitResult;

use super::component::{Component, LayoutProps, shrink_extent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Row or column sizing mode of a `GridPanel`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GridLength {
    /// Sized to the largest child in the track.
    Auto,
    /// Share of the space left after auto tracks, proportional to the weight.
    Relative(f64),
}

impl Default for GridLength {
    fn default() -> Self {
        Self::Relative(1.0)
    }
}

/// Children plus optional background shared by all panel kinds.
#[derive(Default)]
struct PanelCore {
    props: LayoutProps,
    children: Vec<Box<dyn Component>>,
    background: Option<Color>,
    border: Option<Stroke>,
}

impl PanelCore {
    fn add(&mut self, child: Box<dyn Component>) -> usize {
        self.children.push(child);
        self.props.mark_layout_dirty();
        self.children.len() - 1
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn Component>> {
        if index >= self.children.len() {
            return None;
        }
        self.props.mark_layout_dirty();
        Some(self.children.remove(index))
    }

    fn draw(&mut self, ctx: &mut RenderContext<'_>) {
        let size = self.props.actual_size();
        if self.background.is_some() || self.border.is_some() {
            ctx.draw_rect(Rect::from_size(size), self.background, self.border);
        }
        for child in &mut self.children {
            child.draw(ctx);
        }
    }

    fn hit_test(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.children
            .iter()
            .rev()
            .find_map(|child| child.hit_test(point, ctx))
    }
}

macro_rules! panel_common {
    ($panel:ident) => {
        impl $panel {
            /// Moves `child` into this panel and returns its index.
            pub fn add_child(&mut self, child: impl Component + 'static) -> usize {
                self.core.add(Box::new(child))
            }

            pub fn add_boxed(&mut self, child: Box<dyn Component>) -> usize {
                self.core.add(child)
            }

            pub fn remove_child(&mut self, index: usize) -> Option<Box<dyn Component>> {
                self.core.remove(index)
            }

            #[must_use]
            pub fn child(&self, index: usize) -> Option<&dyn Component> {
                self.core.children.get(index).map(|child| child.as_ref())
            }

            pub fn child_mut(&mut self, index: usize) -> Option<&mut (dyn Component + 'static)> {
                self.core.children.get_mut(index).map(|child| child.as_mut())
            }

            #[must_use]
            pub fn child_count(&self) -> usize {
                self.core.children.len()
            }

            pub fn set_background(&mut self, background: Option<Color>) {
                self.core.background = background;
            }

            pub fn set_border(&mut self, border: Option<Stroke>) {
                self.core.border = border;
            }
        }
    };
}

/// Overlays every child over the full panel area.
#[derive(Default)]
pub struct SimplePanel {
    core: PanelCore,
}

impl SimplePanel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

panel_common!(SimplePanel);

impl Component for SimplePanel {
    fn props(&self) -> &LayoutProps {
        &self.core.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.core.props
    }

    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size {
        let mut desired = Size::ZERO;
        for child in &mut self.core.children {
            let size = child.measure(available.width, available.height, ctx);
            desired.width = desired.width.max(size.width);
            desired.height = desired.height.max(size.height);
        }
        desired
    }

    fn arrange_override(&mut self, size: Size, ctx: &RenderContext<'_>) {
        for child in &mut self.core.children {
            child.arrange(0.0, 0.0, size.width, size.height, ctx);
        }
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        self.core.draw(ctx);
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.core.hit_test(point, ctx)
    }

    fn children(&self) -> &[Box<dyn Component>] {
        &self.core.children
    }
}

/// Lays children out one after another along `orientation`.
#[derive(Default)]
pub struct StackPanel {
    core: PanelCore,
    orientation: Orientation,
}

impl StackPanel {
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            core: PanelCore::default(),
            orientation,
        }
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
        self.invalidate_layout();
    }
}

panel_common!(StackPanel);

impl Component for StackPanel {
    fn props(&self) -> &LayoutProps {
        &self.core.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.core.props
    }

    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size {
        let mut along = 0.0_f64;
        let mut across = 0.0_f64;
        for child in &mut self.core.children {
            let size = match self.orientation {
                Orientation::Horizontal => {
                    let size = child.measure(
                        shrink_extent(available.width, along),
                        available.height,
                        ctx,
                    );
                    (size.width, size.height)
                }
                Orientation::Vertical => {
                    let size = child.measure(
                        available.width,
                        shrink_extent(available.height, along),
                        ctx,
                    );
                    (size.height, size.width)
                }
            };
            along += size.0;
            across = across.max(size.1);
        }
        match self.orientation {
            Orientation::Horizontal => Size::new(along, across),
            Orientation::Vertical => Size::new(across, along),
        }
    }

    fn arrange_override(&mut self, size: Size, ctx: &RenderContext<'_>) {
        let mut offset = 0.0;
        for child in &mut self.core.children {
            let desired = child.props().desired_size();
            match self.orientation {
                Orientation::Horizontal => {
                    let width = desired.width.min(shrink_extent(size.width, offset));
                    child.arrange(offset, 0.0, width, size.height, ctx);
                    offset += width;
                }
                Orientation::Vertical => {
                    let height = desired.height.min(shrink_extent(size.height, offset));
                    child.arrange(0.0, offset, size.width, height, ctx);
                    offset += height;
                }
            }
        }
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        self.core.draw(ctx);
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.core.hit_test(point, ctx)
    }

    fn children(&self) -> &[Box<dyn Component>] {
        &self.core.children
    }
}

/// Rows and columns with auto or relative sizing, resolved in a single pass.
#[derive(Default)]
pub struct GridPanel {
    core: PanelCore,
    rows: Vec<GridLength>,
    columns: Vec<GridLength>,
    row_sizes: Vec<f64>,
    column_sizes: Vec<f64>,
}

impl GridPanel {
    #[must_use]
    pub fn new(rows: Vec<GridLength>, columns: Vec<GridLength>) -> Self {
        Self {
            core: PanelCore::default(),
            rows,
            columns,
            row_sizes: Vec::new(),
            column_sizes: Vec::new(),
        }
    }

    #[must_use]
    pub fn rows(&self) -> &[GridLength] {
        &self.rows
    }

    #[must_use]
    pub fn columns(&self) -> &[GridLength] {
        &self.columns
    }

    /// Track sizes from the last arrange pass.
    #[must_use]
    pub fn row_sizes(&self) -> &[f64] {
        &self.row_sizes
    }

    #[must_use]
    pub fn column_sizes(&self) -> &[f64] {
        &self.column_sizes
    }

    fn effective(tracks: &[GridLength]) -> Vec<GridLength> {
        if tracks.is_empty() {
            vec![GridLength::default()]
        } else {
            tracks.to_vec()
        }
    }

    /// Largest desired extent per track among the children placed in it.
    fn content_extents(&self, track_count: usize, by_row: bool) -> Vec<f64> {
        let mut extents = vec![0.0_f64; track_count];
        for child in &self.core.children {
            let props = child.props();
            if !props.visible {
                continue;
            }
            let (index, extent) = if by_row {
                (props.grid_row, props.desired_size().height)
            } else {
                (props.grid_column, props.desired_size().width)
            };
            let slot = index.min(track_count - 1);
            extents[slot] = extents[slot].max(extent);
        }
        extents
    }
}

panel_common!(GridPanel);

/// Auto tracks take their content extent; relative tracks split what is left.
pub(crate) fn resolve_tracks(tracks: &[GridLength], content: &[f64], available: f64) -> Vec<f64> {
    let auto_total: f64 = tracks
        .iter()
        .zip(content)
        .filter(|(track, _)| matches!(track, GridLength::Auto))
        .map(|(_, extent)| *extent)
        .sum();
    let weight_total: f64 = tracks
        .iter()
        .map(|track| match track {
            GridLength::Relative(weight) if *weight > 0.0 => *weight,
            _ => 0.0,
        })
        .sum();
    let remaining = shrink_extent(available, auto_total);

    tracks
        .iter()
        .zip(content)
        .map(|(track, extent)| match track {
            GridLength::Auto => *extent,
            GridLength::Relative(weight) if *weight > 0.0 && weight_total > 0.0 => {
                remaining * weight / weight_total
            }
            GridLength::Relative(_) => 0.0,
        })
        .collect()
}

impl Component for GridPanel {
    fn props(&self) -> &LayoutProps {
        &self.core.props
    }

    fn props_mut(&mut self) -> &mut LayoutProps {
        &mut self.core.props
    }

    fn measure_override(&mut self, available: Size, ctx: &RenderContext<'_>) -> Size {
        for child in &mut self.core.children {
            child.measure(available.width, available.height, ctx);
        }
        let rows = Self::effective(&self.rows);
        let columns = Self::effective(&self.columns);
        let heights = self.content_extents(rows.len(), true);
        let widths = self.content_extents(columns.len(), false);
        Size::new(widths.iter().sum(), heights.iter().sum())
    }

    fn arrange_override(&mut self, size: Size, ctx: &RenderContext<'_>) {
        let rows = Self::effective(&self.rows);
        let columns = Self::effective(&self.columns);
        let heights = self.content_extents(rows.len(), true);
        let widths = self.content_extents(columns.len(), false);
        self.row_sizes = resolve_tracks(&rows, &heights, size.height);
        self.column_sizes = resolve_tracks(&columns, &widths, size.width);
        trace!(rows = ?self.row_sizes, columns = ?self.column_sizes, "grid tracks resolved");

        let row_offsets = offsets(&self.row_sizes);
        let column_offsets = offsets(&self.column_sizes);
        for child in &mut self.core.children {
            let row = child.props().grid_row.min(rows.len() - 1);
            let column = child.props().grid_column.min(columns.len() - 1);
            child.arrange(
                column_offsets[column],
                row_offsets[row],
                self.column_sizes[column],
                self.row_sizes[row],
                ctx,
            );
        }
    }

    fn draw_override(&mut self, ctx: &mut RenderContext<'_>) {
        self.core.draw(ctx);
    }

    fn hit_test_override(&self, point: Point, ctx: &RenderContext<'_>) -> Option<HitResult> {
        self.core.hit_test(point, ctx)
    }

    fn children(&self) -> &[Box<dyn Component>] {
        &self.core.children
    }
}

fn offsets(sizes: &[f64]) -> Vec<f64> {
    sizes
        .iter()
        .scan(0.0, |acc, size| {
            let start = *acc;
            *acc += size;
            Some(start)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_tracks_split_remaining_space() {
        let tracks = [GridLength::Auto, GridLength::Relative(1.0), GridLength::Relative(3.0)];
        let sizes = resolve_tracks(&tracks, &[20.0, 5.0, 5.0], 100.0);
        assert_eq!(sizes, vec![20.0, 20.0, 60.0]);
    }

    #[test]
    fn auto_overflow_leaves_relative_tracks_empty() {
        let tracks = [GridLength::Auto, GridLength::Relative(1.0)];
        let sizes = resolve_tracks(&tracks, &[150.0, 5.0], 100.0);
        assert_eq!(sizes, vec![150.0, 0.0]);
    }

    #[test]
    fn offsets_accumulate() {
        assert_eq!(offsets(&[10.0, 20.0, 5.0]), vec![0.0, 10.0, 30.0]);
    }
}
