//! plotkit: a headless charting core.
//!
//! Components measure and arrange themselves into a tree, plots map data
//! through axes, series renderers emit backend-neutral draw commands and
//! controllers turn pointer input into pan, zoom and rotation of the view.

pub mod api;
pub mod collections;
pub mod core;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod plot;
pub mod render;
pub mod renderers;
pub mod style;
pub mod telemetry;

pub use api::{Chart, ChartConfig, ChartKind, ChartViewState, ControllerKind};
pub use error::{ChartError, ChartResult};
