mod axis_renderer;
mod chart_panel;
mod core;
mod grid;
mod legend;
mod plot2d;
mod polar;
mod zoom_widgets;

pub use axis_renderer::{AxisPosition, AxisRenderer};
pub use chart_panel::{ChartPanel, PlotKind};
pub use grid::{GridType, draw_grid};
pub use legend::LegendRenderer;
pub use plot2d::Plot2D;
pub use polar::PolarPlot;
pub use zoom_widgets::{ZoomAction, ZoomWidgets};
