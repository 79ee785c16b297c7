mod controller;
mod history;
mod pan;
mod rotation;
mod velocity;
mod zoom;

pub use controller::{
    AxisBounds, ControllerState, InertiaConfig, PanAxes, PlotController, PlotTarget,
};
pub use history::{AxisSnapshot, DEFAULT_HISTORY_DEPTH, ViewSnapshot, ZoomHistory};
pub use pan::PanController;
pub use rotation::RotationController;
pub use velocity::{VELOCITY_SAMPLES, VELOCITY_WINDOW_SECONDS, VelocityCalculator};
pub use zoom::{DEFAULT_MIN_DRAG_PX, DEFAULT_WHEEL_FACTOR, ZoomController};
