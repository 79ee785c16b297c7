mod context;
mod frame;
mod null_renderer;
mod primitives;

pub use context::{ApproxTextMeasurer, RenderContext, TextMeasurer};
pub use frame::{DrawCommand, FrameStats, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, DashStyle, EllipsePrimitive, LinePrimitive, PieSlicePrimitive, PolygonPrimitive,
    PolylinePrimitive, RectPrimitive, Stroke, TextHAlign, TextPrimitive, TextVAlign,
};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code remains isolated from layout and interaction logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderer};
