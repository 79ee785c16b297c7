use serde::{Deserialize, Serialize};

use crate::core::{Point, Rect};
use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Builds a color from 8-bit channels.
    #[must_use]
    pub fn from_argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
            f64::from(alpha) / 255.0,
        )
    }

    /// Parses `#rrggbb` or `#aarrggbb`.
    pub fn from_hex(hex: &str) -> ChartResult<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let parse = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|part| u8::from_str_radix(part, 16).ok())
                .ok_or_else(|| ChartError::InvalidData(format!("invalid hex color `{hex}`")))
        };
        match digits.len() {
            6 => Ok(Self::from_argb(255, parse(0..2)?, parse(2..4)?, parse(4..6)?)),
            8 => Ok(Self::from_argb(
                parse(0..2)?,
                parse(2..4)?,
                parse(4..6)?,
                parse(6..8)?,
            )),
            _ => Err(ChartError::InvalidData(format!(
                "invalid hex color `{hex}`"
            ))),
        }
    }

    #[must_use]
    pub fn is_transparent(self) -> bool {
        self.alpha <= 0.0
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashStyle {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
    DashDotDot,
}

impl DashStyle {
    /// Dash lengths in multiples of the stroke width. Empty means solid.
    #[must_use]
    pub fn pattern(self) -> &'static [f64] {
        match self {
            Self::Solid => &[],
            Self::Dash => &[3.0, 1.0],
            Self::Dot => &[1.0, 1.0],
            Self::DashDot => &[3.0, 1.0, 1.0, 1.0],
            Self::DashDotDot => &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Stroke parameters shared by outline-capable primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: DashStyle,
}

impl Stroke {
    #[must_use]
    pub const fn new(color: Color, width: f64, dash: DashStyle) -> Self {
        Self { color, width, dash }
    }

    #[must_use]
    pub const fn solid(color: Color, width: f64) -> Self {
        Self::new(color, width, DashStyle::Solid)
    }

    /// Whether drawing this stroke would be visible at all.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.width > 0.0 && !self.color.is_transparent()
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(ChartError::InvalidData(
                "stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: Stroke,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke: Stroke) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if self.stroke.width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be > 0".to_owned(),
            ));
        }
        self.stroke.validate()
    }
}

/// Open polyline through consecutive points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylinePrimitive {
    pub points: Vec<Point>,
    pub stroke: Stroke,
}

/// Closed, optionally filled polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub points: Vec<Point>,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// Axis-aligned rectangle with optional fill and outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub rect: Rect,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl RectPrimitive {
    #[must_use]
    pub const fn filled(rect: Rect, fill: Color) -> Self {
        Self {
            rect,
            fill: Some(fill),
            stroke: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipsePrimitive {
    pub bounds: Rect,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// Pie or doughnut sector. Angles are degrees, clockwise in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlicePrimitive {
    pub center: Point,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Vertical text alignment relative to `TextPrimitive::y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextVAlign {
    Top,
    Middle,
    Bottom,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    pub v_align: TextVAlign,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            v_align: TextVAlign::Top,
        }
    }

    #[must_use]
    pub fn with_v_align(mut self, v_align: TextVAlign) -> Self {
        self.v_align = v_align;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

fn validate_points(points: &[Point], what: &str) -> ChartResult<()> {
    if points.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err(ChartError::InvalidData(format!(
            "{what} coordinates must be finite"
        )));
    }
    Ok(())
}

fn validate_paint(fill: Option<Color>, stroke: Option<Stroke>) -> ChartResult<()> {
    if let Some(fill) = fill {
        fill.validate()?;
    }
    if let Some(stroke) = stroke {
        stroke.validate()?;
    }
    Ok(())
}

fn validate_rect(rect: Rect, what: &str) -> ChartResult<()> {
    if !rect.x.is_finite()
        || !rect.y.is_finite()
        || !rect.width.is_finite()
        || !rect.height.is_finite()
        || rect.width < 0.0
        || rect.height < 0.0
    {
        return Err(ChartError::InvalidData(format!(
            "{what} bounds must be finite with non-negative size"
        )));
    }
    Ok(())
}

impl PolylinePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 2 {
            return Err(ChartError::InvalidData(
                "polyline needs at least two points".to_owned(),
            ));
        }
        validate_points(&self.points, "polyline")?;
        self.stroke.validate()
    }
}

impl PolygonPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 3 {
            return Err(ChartError::InvalidData(
                "polygon needs at least three points".to_owned(),
            ));
        }
        validate_points(&self.points, "polygon")?;
        validate_paint(self.fill, self.stroke)
    }
}

impl RectPrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        validate_rect(self.rect, "rect")?;
        validate_paint(self.fill, self.stroke)
    }
}

impl EllipsePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        validate_rect(self.bounds, "ellipse")?;
        validate_paint(self.fill, self.stroke)
    }
}

impl PieSlicePrimitive {
    pub fn validate(&self) -> ChartResult<()> {
        validate_points(&[self.center], "pie slice")?;
        if !self.outer_radius.is_finite()
            || !self.inner_radius.is_finite()
            || self.inner_radius < 0.0
            || self.inner_radius > self.outer_radius
        {
            return Err(ChartError::InvalidData(
                "pie slice radii must satisfy 0 <= inner <= outer".to_owned(),
            ));
        }
        if !self.start_angle.is_finite() || !self.sweep_angle.is_finite() || self.sweep_angle < 0.0
        {
            return Err(ChartError::InvalidData(
                "pie slice angles must be finite with sweep >= 0".to_owned(),
            ));
        }
        validate_paint(self.fill, self.stroke)
    }
}
