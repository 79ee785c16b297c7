use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::interaction::{
    InertiaConfig, PanAxes, PanController, PlotController, RotationController, ZoomController,
};
use crate::plot::GridType;
use crate::renderers::BarRenderer;

/// Preset layout a chart is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
    /// Bars with a line overlay.
    Combination,
}

/// Pointer gesture the chart reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControllerKind {
    #[default]
    None,
    Pan,
    Zoom,
    Rotation,
}

/// Serializable chart setup.
///
/// Missing fields fall back to their defaults when loading, so hosts can
/// persist only what they change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub viewport: Viewport,
    pub kind: ChartKind,
    pub title: String,
    pub title_margin: f64,
    pub show_legend: bool,
    pub legend_title: String,
    /// Legend lists pie slices instead of series.
    pub legend_shows_elements: bool,
    pub grid_type: GridType,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub x_axis_interval: Option<f64>,
    pub show_x_coordinates: bool,
    pub show_x_ticks: bool,
    pub show_y_coordinates: bool,
    pub bar_spacing_ratio: f64,
    pub same_index_spacing_ratio: f64,
    pub start_angle: f64,
    pub detached_slices: Vec<usize>,
    pub controller: ControllerKind,
    pub pan_axes: PanAxes,
    pub inertia: InertiaConfig,
    pub show_tooltips: bool,
    /// Zoom in, zoom out and reset buttons over cartesian plots.
    pub show_zoom_widgets: bool,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(640, 480),
            kind: ChartKind::Bar,
            title: String::new(),
            title_margin: 8.0,
            show_legend: false,
            legend_title: String::new(),
            legend_shows_elements: false,
            grid_type: GridType::None,
            x_axis_title: String::new(),
            y_axis_title: String::new(),
            x_axis_interval: None,
            show_x_coordinates: true,
            show_x_ticks: true,
            show_y_coordinates: true,
            bar_spacing_ratio: BarRenderer::DEFAULT_BAR_SPACING_RATIO,
            same_index_spacing_ratio: 0.0,
            start_angle: 0.0,
            detached_slices: Vec::new(),
            controller: ControllerKind::None,
            pan_axes: PanAxes::Both,
            inertia: InertiaConfig::default(),
            show_tooltips: true,
            show_zoom_widgets: false,
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport, kind: ChartKind) -> Self {
        Self {
            viewport,
            kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_title_margin(mut self, margin: f64) -> Self {
        self.title_margin = margin;
        self
    }

    /// Shows a legend with the given caption.
    #[must_use]
    pub fn with_legend(mut self, title: impl Into<String>) -> Self {
        self.show_legend = true;
        self.legend_title = title.into();
        self
    }

    #[must_use]
    pub fn with_legend_shows_elements(mut self, show: bool) -> Self {
        self.legend_shows_elements = show;
        self
    }

    #[must_use]
    pub fn with_grid_type(mut self, grid_type: GridType) -> Self {
        self.grid_type = grid_type;
        self
    }

    #[must_use]
    pub fn with_axis_titles(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_axis_title = x.into();
        self.y_axis_title = y.into();
        self
    }

    #[must_use]
    pub fn with_x_axis_interval(mut self, interval: f64) -> Self {
        self.x_axis_interval = Some(interval);
        self
    }

    #[must_use]
    pub fn with_x_coordinates(mut self, show_coordinates: bool, show_ticks: bool) -> Self {
        self.show_x_coordinates = show_coordinates;
        self.show_x_ticks = show_ticks;
        self
    }

    #[must_use]
    pub fn with_y_coordinates(mut self, show: bool) -> Self {
        self.show_y_coordinates = show;
        self
    }

    #[must_use]
    pub fn with_bar_spacing_ratio(mut self, ratio: f64) -> Self {
        self.bar_spacing_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_same_index_spacing_ratio(mut self, ratio: f64) -> Self {
        self.same_index_spacing_ratio = ratio;
        self
    }

    #[must_use]
    pub fn with_start_angle(mut self, degrees: f64) -> Self {
        self.start_angle = degrees;
        self
    }

    #[must_use]
    pub fn with_detached_slices(mut self, slices: impl IntoIterator<Item = usize>) -> Self {
        self.detached_slices = slices.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_controller(mut self, controller: ControllerKind) -> Self {
        self.controller = controller;
        self
    }

    #[must_use]
    pub fn with_pan_axes(mut self, pan_axes: PanAxes) -> Self {
        self.pan_axes = pan_axes;
        self
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: InertiaConfig) -> Self {
        self.inertia = inertia;
        self
    }

    #[must_use]
    pub fn with_show_tooltips(mut self, show: bool) -> Self {
        self.show_tooltips = show;
        self
    }

    #[must_use]
    pub fn with_show_zoom_widgets(mut self, show: bool) -> Self {
        self.show_zoom_widgets = show;
        self
    }

    /// Zoom the widget buttons apply, sharing the wheel factor and axes of
    /// the zoom controller.
    #[must_use]
    pub fn build_button_zoom(&self) -> ZoomController {
        ZoomController::new().with_zoom_axes(self.pan_axes)
    }

    /// Rejects values no chart could be built from.
    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.validate()?;
        if !self.bar_spacing_ratio.is_finite() || self.bar_spacing_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "bar spacing ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.same_index_spacing_ratio.is_finite() || self.same_index_spacing_ratio < 0.0 {
            return Err(ChartError::InvalidData(
                "same index spacing ratio must be finite and >= 0".to_owned(),
            ));
        }
        if !self.start_angle.is_finite() {
            return Err(ChartError::InvalidData(
                "start angle must be finite".to_owned(),
            ));
        }
        if let Some(interval) = self.x_axis_interval {
            if !interval.is_finite() || interval <= 0.0 {
                return Err(ChartError::InvalidAxis(
                    "x axis interval must be finite and > 0".to_owned(),
                ));
            }
        }
        let inertia = self.inertia;
        if !(0.0..=1.0).contains(&inertia.decay_per_second)
            || !inertia.start_velocity.is_finite()
            || !inertia.stop_velocity.is_finite()
            || inertia.stop_velocity < 0.0
        {
            return Err(ChartError::InvalidData(
                "inertia decay must be in [0, 1] and velocities finite".to_owned(),
            ));
        }
        Ok(())
    }

    /// Controller matching `controller`, `None` for [`ControllerKind::None`].
    #[must_use]
    pub fn build_controller(&self) -> Option<Box<dyn PlotController>> {
        match self.controller {
            ControllerKind::None => None,
            ControllerKind::Pan => Some(Box::new(
                PanController::new()
                    .with_pan_axes(self.pan_axes)
                    .with_inertia(self.inertia),
            )),
            ControllerKind::Zoom => {
                Some(Box::new(ZoomController::new().with_zoom_axes(self.pan_axes)))
            }
            ControllerKind::Rotation => Some(Box::new(
                RotationController::new().with_inertia(
                    InertiaConfig::angular()
                        .with_enable_animation(self.inertia.enable_animation)
                        .with_decay_per_second(self.inertia.decay_per_second),
                ),
            )),
        }
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::Persistence(format!("failed to serialize chart config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse chart config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
