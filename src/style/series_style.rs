use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DashStyle};

/// Same attributes for every series and element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformSeriesStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_thickness: Option<f64>,
    pub stroke_dash_style: Option<DashStyle>,
}

impl UniformSeriesStyle {
    #[must_use]
    pub fn new(fill: Color, stroke: Color, stroke_thickness: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some(stroke),
            stroke_thickness: Some(stroke_thickness),
            stroke_dash_style: None,
        }
    }

    #[must_use]
    pub fn with_dash_style(mut self, dash: DashStyle) -> Self {
        self.stroke_dash_style = Some(dash);
        self
    }
}

/// One entry per series, indexed by series position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerSeriesStyle {
    pub fills: Vec<Color>,
    pub strokes: Vec<Color>,
    pub stroke_thicknesses: Vec<f64>,
    pub stroke_dash_styles: Vec<DashStyle>,
}

impl PerSeriesStyle {
    #[must_use]
    pub fn new(fills: Vec<Color>, strokes: Vec<Color>) -> Self {
        Self {
            fills,
            strokes,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_stroke_thicknesses(mut self, thicknesses: Vec<f64>) -> Self {
        self.stroke_thicknesses = thicknesses;
        self
    }

    #[must_use]
    pub fn with_stroke_dash_styles(mut self, dashes: Vec<DashStyle>) -> Self {
        self.stroke_dash_styles = dashes;
        self
    }
}

/// Nested lists indexed by `[series][element]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PerElementSeriesStyle {
    pub fills: Vec<Vec<Color>>,
    pub strokes: Vec<Vec<Color>>,
    pub stroke_thicknesses: Vec<Vec<f64>>,
    pub stroke_dash_styles: Vec<Vec<DashStyle>>,
}

impl PerElementSeriesStyle {
    #[must_use]
    pub fn new(
        fills: Vec<Vec<Color>>,
        strokes: Vec<Vec<Color>>,
        stroke_thicknesses: Vec<Vec<f64>>,
    ) -> Self {
        Self {
            fills,
            strokes,
            stroke_thicknesses,
            stroke_dash_styles: Vec::new(),
        }
    }
}

/// Per-element lists backed by per-series ("common") lists and uniform
/// values. Every attribute falls back on its own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MixedSeriesStyle {
    pub fills: Vec<Vec<Color>>,
    pub strokes: Vec<Vec<Color>>,
    pub stroke_thicknesses: Vec<Vec<f64>>,
    pub stroke_dash_styles: Vec<Vec<DashStyle>>,
    pub common_fills: Vec<Color>,
    pub common_strokes: Vec<Color>,
    pub common_stroke_thicknesses: Vec<f64>,
    pub common_stroke_dash_styles: Vec<DashStyle>,
    pub uniform_fill: Option<Color>,
    pub uniform_stroke: Option<Color>,
    pub uniform_stroke_thickness: Option<f64>,
    pub uniform_stroke_dash_style: Option<DashStyle>,
}

/// Resolves fill, stroke, thickness and dash for a `(series, element)` pair.
///
/// Lookups past the end of any list return `None` so the caller can fall
/// back to the next style in its chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "style")]
pub enum SeriesStyle {
    Uniform(UniformSeriesStyle),
    PerSeries(PerSeriesStyle),
    PerElement(PerElementSeriesStyle),
    Mixed(MixedSeriesStyle),
}

fn nested<T: Copy>(lists: &[Vec<T>], series_index: usize, data_index: usize) -> Option<T> {
    lists
        .get(series_index)
        .and_then(|list| list.get(data_index))
        .copied()
}

fn flat<T: Copy>(list: &[T], index: usize) -> Option<T> {
    list.get(index).copied()
}

macro_rules! resolve_attribute {
    ($name:ident, $ty:ty, $per:ident, $common:ident, $uniform:ident, $single:ident) => {
        #[must_use]
        pub fn $name(&self, series_index: usize, data_index: usize) -> Option<$ty> {
            match self {
                Self::Uniform(style) => style.$single,
                Self::PerSeries(style) => flat(&style.$per, series_index),
                Self::PerElement(style) => nested(&style.$per, series_index, data_index),
                Self::Mixed(style) => nested(&style.$per, series_index, data_index)
                    .or_else(|| flat(&style.$common, series_index))
                    .or(style.$uniform),
            }
        }
    };
}

impl SeriesStyle {
    resolve_attribute!(fill, Color, fills, common_fills, uniform_fill, fill);
    resolve_attribute!(stroke, Color, strokes, common_strokes, uniform_stroke, stroke);
    resolve_attribute!(
        stroke_thickness,
        f64,
        stroke_thicknesses,
        common_stroke_thicknesses,
        uniform_stroke_thickness,
        stroke_thickness
    );
    resolve_attribute!(
        stroke_dash_style,
        DashStyle,
        stroke_dash_styles,
        common_stroke_dash_styles,
        uniform_stroke_dash_style,
        stroke_dash_style
    );

    /// Rejects negative or non-finite thicknesses and invalid colors.
    pub fn validate(&self) -> ChartResult<()> {
        let (colors, thicknesses): (Vec<Color>, Vec<f64>) = match self {
            Self::Uniform(style) => (
                style.fill.into_iter().chain(style.stroke).collect(),
                style.stroke_thickness.into_iter().collect(),
            ),
            Self::PerSeries(style) => (
                style.fills.iter().chain(&style.strokes).copied().collect(),
                style.stroke_thicknesses.clone(),
            ),
            Self::PerElement(style) => (
                style
                    .fills
                    .iter()
                    .chain(&style.strokes)
                    .flatten()
                    .copied()
                    .collect(),
                style.stroke_thicknesses.iter().flatten().copied().collect(),
            ),
            Self::Mixed(style) => (
                style
                    .fills
                    .iter()
                    .chain(&style.strokes)
                    .flatten()
                    .chain(&style.common_fills)
                    .chain(&style.common_strokes)
                    .copied()
                    .chain(style.uniform_fill)
                    .chain(style.uniform_stroke)
                    .collect(),
                style
                    .stroke_thicknesses
                    .iter()
                    .flatten()
                    .chain(&style.common_stroke_thicknesses)
                    .copied()
                    .chain(style.uniform_stroke_thickness)
                    .collect(),
            ),
        };
        for color in colors {
            color.validate()?;
        }
        if let Some(bad) = thicknesses
            .into_iter()
            .find(|thickness| !thickness.is_finite() || *thickness < 0.0)
        {
            return Err(ChartError::InvalidData(format!(
                "stroke thickness must be finite and >= 0, got {bad}"
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChartError::Persistence(format!("failed to serialize series style: {e}")))
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        let style: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse series style: {e}")))?;
        style.validate()?;
        Ok(style)
    }
}

impl From<UniformSeriesStyle> for SeriesStyle {
    fn from(style: UniformSeriesStyle) -> Self {
        Self::Uniform(style)
    }
}

impl From<PerSeriesStyle> for SeriesStyle {
    fn from(style: PerSeriesStyle) -> Self {
        Self::PerSeries(style)
    }
}

impl From<PerElementSeriesStyle> for SeriesStyle {
    fn from(style: PerElementSeriesStyle) -> Self {
        Self::PerElement(style)
    }
}

impl From<MixedSeriesStyle> for SeriesStyle {
    fn from(style: MixedSeriesStyle) -> Self {
        Self::Mixed(style)
    }
}
