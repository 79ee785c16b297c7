use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::render::RenderContext;
use crate::renderers::AxisPair;

/// Background grid drawn behind the series of a `Plot2D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridType {
    #[default]
    None,
    /// Bands and lines at Y ticks.
    Horizontal,
    /// Bands and lines at X ticks.
    Vertical,
    Crossed,
}

impl GridType {
    #[must_use]
    pub fn has_horizontal(self) -> bool {
        matches!(self, Self::Horizontal | Self::Crossed)
    }

    #[must_use]
    pub fn has_vertical(self) -> bool {
        matches!(self, Self::Vertical | Self::Crossed)
    }
}

/// Pixel positions of the ticks of the X axis, left to right.
fn x_tick_pixels(axes: &AxisPair<'_>) -> Vec<f64> {
    axes.x
        .enumerate_intervals(false, false)
        .map(|value| axes.x.map_value_to_pixel_x(value, axes.size.width))
        .collect()
}

/// Pixel positions of the ticks of the Y axis, bottom to top.
fn y_tick_pixels(axes: &AxisPair<'_>) -> Vec<f64> {
    axes.y
        .enumerate_intervals(false, false)
        .map(|value| axes.y.map_value_to_pixel_y(value, axes.size.height))
        .collect()
}

/// Alternating `grid_color1`/`grid_color2` bands between ticks, then the
/// grid lines on top.
pub fn draw_grid(ctx: &mut RenderContext<'_>, grid_type: GridType, axes: &AxisPair<'_>) {
    if grid_type == GridType::None {
        return;
    }
    let theme = ctx.theme();
    let size = axes.size;
    let bands = [theme.grid_color1, theme.grid_color2];
    let stroke = theme.grid_stroke();

    let rows = if grid_type.has_horizontal() {
        y_tick_pixels(axes)
    } else {
        Vec::new()
    };
    let columns = if grid_type.has_vertical() {
        x_tick_pixels(axes)
    } else {
        Vec::new()
    };

    for (index, pair) in rows.windows(2).enumerate() {
        let (bottom, top) = (pair[0], pair[1]);
        let band = Rect::from_corners(Point::new(0.0, top), Point::new(size.width, bottom));
        ctx.draw_rect(band, Some(bands[index % 2]), None);
    }
    // Crossed grids keep the horizontal bands and only add vertical lines.
    if !grid_type.has_horizontal() {
        for (index, pair) in columns.windows(2).enumerate() {
            let band =
                Rect::from_corners(Point::new(pair[0], 0.0), Point::new(pair[1], size.height));
            ctx.draw_rect(band, Some(bands[index % 2]), None);
        }
    }

    for y in rows {
        ctx.draw_line(Point::new(0.0, y), Point::new(size.width, y), stroke);
    }
    for x in columns {
        ctx.draw_line(Point::new(x, 0.0), Point::new(x, size.height), stroke);
    }
}
