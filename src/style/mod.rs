mod chain;
mod series_style;
mod theme;

pub use chain::{PaletteKey, ResolvedStyle, StyleChain};
pub use series_style::{
    MixedSeriesStyle, PerElementSeriesStyle, PerSeriesStyle, SeriesStyle, UniformSeriesStyle,
};
pub use theme::{Theme, TooltipStyle};

pub use crate::render::DashStyle;
