use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DashStyle, Stroke};

fn hex(value: &str) -> Color {
    Color::from_hex(value).unwrap_or(Color::BLACK)
}

/// Default visual attributes consulted when components carry no local
/// override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub background: Color,
    pub plot_background: Option<Color>,

    pub series_fills: Vec<Color>,
    pub series_strokes: Vec<Color>,
    pub series_stroke_thickness: f64,
    pub series_stroke_dash_style: DashStyle,

    pub title_brush: Color,
    pub title_font_size: f64,

    pub axis_stroke: Color,
    pub axis_stroke_thickness: f64,
    pub axis_labels_brush: Color,
    pub axis_labels_font_size: f64,
    pub axis_title_brush: Color,
    pub axis_title_font_size: f64,
    pub axis_tick_length: f64,

    pub grid_color1: Color,
    pub grid_color2: Color,
    pub grid_line_color: Color,
    pub grid_line_thickness: f64,
    pub grid_line_style: DashStyle,

    pub highlight_stroke: Color,
    pub highlight_stroke_thickness: f64,
    pub highlight_stroke_dash_style: DashStyle,

    pub data_labels_brush: Color,
    pub data_labels_font_size: f64,

    pub legend_background: Color,
    pub legend_border_stroke: Color,
    pub legend_border_thickness: f64,
    pub legend_title_font_size: f64,
    pub legend_labels_brush: Color,
    pub legend_labels_font_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "Sans".to_owned(),
            background: Color::WHITE,
            plot_background: None,
            series_fills: ["#669acc", "#ce0000", "#003466", "#9caac6", "#5a79a5", "#ea684f"]
                .into_iter()
                .map(hex)
                .collect(),
            series_strokes: vec![hex("#3b415e")],
            series_stroke_thickness: 1.0,
            series_stroke_dash_style: DashStyle::Solid,
            title_brush: hex("#202020"),
            title_font_size: 16.0,
            axis_stroke: hex("#404040"),
            axis_stroke_thickness: 1.0,
            axis_labels_brush: hex("#404040"),
            axis_labels_font_size: 11.0,
            axis_title_brush: hex("#202020"),
            axis_title_font_size: 12.0,
            axis_tick_length: 4.0,
            grid_color1: Color::WHITE,
            grid_color2: hex("#f4f4f4"),
            grid_line_color: hex("#cecece"),
            grid_line_thickness: 1.0,
            grid_line_style: DashStyle::Solid,
            highlight_stroke: hex("#000063"),
            highlight_stroke_thickness: 2.0,
            highlight_stroke_dash_style: DashStyle::Solid,
            data_labels_brush: hex("#202020"),
            data_labels_font_size: 10.0,
            legend_background: Color::WHITE,
            legend_border_stroke: hex("#c0c0c0"),
            legend_border_thickness: 1.0,
            legend_title_font_size: 12.0,
            legend_labels_brush: hex("#202020"),
            legend_labels_font_size: 11.0,
        }
    }
}

impl Theme {
    /// Fill from the theme palette; the palette repeats when exhausted.
    #[must_use]
    pub fn palette_fill(&self, index: usize) -> Color {
        cycle(&self.series_fills, index).unwrap_or(Color::BLACK)
    }

    #[must_use]
    pub fn palette_stroke(&self, index: usize) -> Color {
        cycle(&self.series_strokes, index).unwrap_or(Color::BLACK)
    }

    #[must_use]
    pub fn grid_stroke(&self) -> Stroke {
        Stroke::new(
            self.grid_line_color,
            self.grid_line_thickness,
            self.grid_line_style,
        )
    }

    #[must_use]
    pub fn axis_line_stroke(&self) -> Stroke {
        Stroke::solid(self.axis_stroke, self.axis_stroke_thickness)
    }

    #[must_use]
    pub fn highlight(&self) -> Stroke {
        Stroke::new(
            self.highlight_stroke,
            self.highlight_stroke_thickness,
            self.highlight_stroke_dash_style,
        )
    }

    pub fn validate(&self) -> ChartResult<()> {
        for color in self.series_fills.iter().chain(&self.series_strokes) {
            color.validate()?;
        }
        for (name, size) in [
            ("title_font_size", self.title_font_size),
            ("axis_labels_font_size", self.axis_labels_font_size),
            ("axis_title_font_size", self.axis_title_font_size),
            ("data_labels_font_size", self.data_labels_font_size),
            ("legend_title_font_size", self.legend_title_font_size),
            ("legend_labels_font_size", self.legend_labels_font_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "theme `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, thickness) in [
            ("series_stroke_thickness", self.series_stroke_thickness),
            ("axis_stroke_thickness", self.axis_stroke_thickness),
            ("grid_line_thickness", self.grid_line_thickness),
            ("highlight_stroke_thickness", self.highlight_stroke_thickness),
            ("legend_border_thickness", self.legend_border_thickness),
        ] {
            if !thickness.is_finite() || thickness < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "theme `{name}` must be finite and >= 0"
                )));
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::Persistence(format!("failed to serialize theme: {e}")))
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let theme: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse theme: {e}")))?;
        theme.validate()?;
        Ok(theme)
    }
}

fn cycle(colors: &[Color], index: usize) -> Option<Color> {
    if colors.is_empty() {
        return None;
    }
    colors.get(index % colors.len()).copied()
}

/// Appearance of hover tooltips, passed explicitly through the render
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipStyle {
    pub horizontal_padding: f64,
    pub vertical_padding: f64,
    pub background: Color,
    pub border: Color,
    pub border_thickness: f64,
    pub text_color: Color,
    pub font_size: f64,
    /// Offset of the box from the pointer.
    pub offset: f64,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            horizontal_padding: 6.0,
            vertical_padding: 4.0,
            background: Color::rgba(1.0, 1.0, 0.88, 0.95),
            border: Color::rgb(0.45, 0.45, 0.45),
            border_thickness: 1.0,
            text_color: Color::BLACK,
            font_size: 11.0,
            offset: 12.0,
        }
    }
}

impl TooltipStyle {
    #[must_use]
    pub fn with_padding(mut self, horizontal: f64, vertical: f64) -> Self {
        self.horizontal_padding = horizontal.max(0.0);
        self.vertical_padding = vertical.max(0.0);
        self
    }
}
