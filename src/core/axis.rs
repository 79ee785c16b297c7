use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::LinearScale;
use crate::error::{ChartError, ChartResult};

/// Upper bound on ticks produced by one interval enumeration.
pub const MAX_INTERVAL_TICKS: usize = 10_000;

const TICK_TOLERANCE_RATIO: f64 = 1e-9;

/// Label format used when an axis turns values into coordinate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumberFormat {
    /// Shortest decimal form, at most six fractional digits.
    #[default]
    Auto,
    Fixed(u8),
    Percent(u8),
    Scientific,
}

impl NumberFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        // Avoid printing "-0".
        let value = if value == 0.0 { 0.0 } else { value };
        match self {
            Self::Auto => Decimal::from_f64(value)
                .map(|d| d.round_dp(6).normalize().to_string())
                .unwrap_or_else(|| format!("{value}")),
            Self::Fixed(precision) => format!("{value:.prec$}", prec = usize::from(precision)),
            Self::Percent(precision) => {
                format!("{:.prec$}%", value * 100.0, prec = usize::from(precision))
            }
            Self::Scientific => format!("{value:e}"),
        }
    }
}

/// Stable handle of an axis inside an `AxisSet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(u32);

impl AxisId {
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Numeric range with a tick interval, mapped linearly onto a pixel span.
///
/// Explicit bounds win over bounds measured from data. When neither is known
/// the axis falls back to `[0, interval]`, and a degenerate range is widened by
/// one interval so mapping never divides by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Axis {
    min_value: Option<f64>,
    max_value: Option<f64>,
    interval: Option<f64>,
    number_format: NumberFormat,
    title: String,
    origin: Option<f64>,
    #[serde(skip)]
    measured_min_value: Option<f64>,
    #[serde(skip)]
    measured_max_value: Option<f64>,
}

impl Default for Axis {
    fn default() -> Self {
        Self {
            min_value: None,
            max_value: None,
            interval: None,
            number_format: NumberFormat::Auto,
            title: String::new(),
            origin: None,
            measured_min_value: None,
            measured_max_value: None,
        }
    }
}

impl Axis {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an axis with explicit bounds and interval.
    pub fn with_range(min_value: f64, max_value: f64, interval: f64) -> ChartResult<Self> {
        let mut axis = Self::default();
        axis.set_range(min_value, max_value)?;
        axis.set_interval(Some(interval))?;
        Ok(axis)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn min_value(&self) -> Option<f64> {
        self.min_value
    }

    #[must_use]
    pub fn max_value(&self) -> Option<f64> {
        self.max_value
    }

    #[must_use]
    pub fn interval(&self) -> Option<f64> {
        self.interval
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        self.number_format
    }

    pub fn set_number_format(&mut self, format: NumberFormat) {
        self.number_format = format;
    }

    /// Value bars grow from. `None` means zero clamped into the visible range.
    #[must_use]
    pub fn origin(&self) -> Option<f64> {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Option<f64>) -> ChartResult<()> {
        if let Some(value) = origin {
            ensure_finite(value, "axis origin")?;
        }
        self.origin = origin;
        Ok(())
    }

    pub fn set_min_value(&mut self, min_value: Option<f64>) -> ChartResult<()> {
        if let Some(min) = min_value {
            ensure_finite(min, "axis min value")?;
            if let Some(max) = self.max_value.filter(|max| min > *max) {
                return Err(ChartError::InvalidAxis(format!(
                    "min value {min} exceeds max value {max}"
                )));
            }
        }
        self.min_value = min_value;
        Ok(())
    }

    pub fn set_max_value(&mut self, max_value: Option<f64>) -> ChartResult<()> {
        if let Some(max) = max_value {
            ensure_finite(max, "axis max value")?;
            if let Some(min) = self.min_value.filter(|min| *min > max) {
                return Err(ChartError::InvalidAxis(format!(
                    "min value {min} exceeds max value {max}"
                )));
            }
        }
        self.max_value = max_value;
        Ok(())
    }

    /// Sets both explicit bounds at once.
    pub fn set_range(&mut self, min_value: f64, max_value: f64) -> ChartResult<()> {
        ensure_finite(min_value, "axis min value")?;
        ensure_finite(max_value, "axis max value")?;
        if min_value > max_value {
            return Err(ChartError::InvalidAxis(format!(
                "min value {min_value} exceeds max value {max_value}"
            )));
        }
        self.min_value = Some(min_value);
        self.max_value = Some(max_value);
        Ok(())
    }

    /// Narrows or widens the view to `[min_value, max_value]`.
    ///
    /// Unlike `set_range`, an empty span is rejected since it cannot be
    /// displayed.
    pub fn zoom_to(&mut self, min_value: f64, max_value: f64) -> ChartResult<()> {
        if max_value <= min_value {
            return Err(ChartError::InvalidAxis(format!(
                "zoom range [{min_value}, {max_value}] is empty"
            )));
        }
        self.set_range(min_value, max_value)
    }

    /// Drops explicit bounds so the axis follows measured data again.
    pub fn reset_range(&mut self) {
        self.min_value = None;
        self.max_value = None;
    }

    pub fn set_interval(&mut self, interval: Option<f64>) -> ChartResult<()> {
        if interval.is_some_and(|value| !value.is_finite() || value <= 0.0) {
            return Err(ChartError::InvalidAxis(
                "axis interval must be finite and > 0".to_owned(),
            ));
        }
        self.interval = interval;
        Ok(())
    }

    #[must_use]
    pub fn measured_min_value(&self) -> Option<f64> {
        self.measured_min_value
    }

    #[must_use]
    pub fn measured_max_value(&self) -> Option<f64> {
        self.measured_max_value
    }

    /// Stores the data range found by the owning plot. `None` clears it.
    pub fn set_measured_range(&mut self, range: Option<(f64, f64)>) {
        match range {
            Some((min, max)) if min.is_finite() && max.is_finite() && min <= max => {
                self.measured_min_value = Some(min);
                self.measured_max_value = Some(max);
            }
            Some((min, max)) => {
                warn!(min, max, "ignoring malformed measured axis range");
                self.measured_min_value = None;
                self.measured_max_value = None;
            }
            None => {
                self.measured_min_value = None;
                self.measured_max_value = None;
            }
        }
    }

    #[must_use]
    pub fn effective_interval(&self) -> f64 {
        if let Some(interval) = self.interval {
            return interval;
        }
        let min = self.min_value.or(self.measured_min_value).unwrap_or(0.0);
        let max = self.max_value.or(self.measured_max_value).unwrap_or(min);
        nice_interval(max - min)
    }

    #[must_use]
    pub fn effective_min_value(&self) -> f64 {
        self.effective_range().0
    }

    #[must_use]
    pub fn effective_max_value(&self) -> f64 {
        self.effective_range().1
    }

    #[must_use]
    pub fn effective_range(&self) -> (f64, f64) {
        let min = self.min_value.or(self.measured_min_value).unwrap_or(0.0);
        let max = self
            .max_value
            .or(self.measured_max_value)
            .unwrap_or(min + self.effective_interval());
        if max > min {
            (min, max)
        } else {
            (min, min + self.effective_interval())
        }
    }

    /// Origin used by bar renderers, clamped into the effective range.
    #[must_use]
    pub fn effective_origin(&self) -> f64 {
        let (min, max) = self.effective_range();
        self.origin.unwrap_or(0.0).clamp(min, max)
    }

    #[must_use]
    pub fn scale(&self) -> LinearScale {
        let (min, max) = self.effective_range();
        // Only fails when `min + interval` rounds back to `min`.
        LinearScale::new(min, max).unwrap_or(LinearScale::UNIT)
    }

    #[must_use]
    pub fn map_value_to_pixel_x(&self, value: f64, view_size: f64) -> f64 {
        self.scale().domain_to_pixel(value, view_size)
    }

    /// Same mapping as X but inverted: the minimum lands on the bottom edge.
    #[must_use]
    pub fn map_value_to_pixel_y(&self, value: f64, view_size: f64) -> f64 {
        view_size - self.scale().domain_to_pixel(value, view_size)
    }

    #[must_use]
    pub fn map_pixel_to_value_x(&self, pixel: f64, view_size: f64) -> f64 {
        self.scale().pixel_to_domain(pixel, view_size)
    }

    #[must_use]
    pub fn map_pixel_to_value_y(&self, pixel: f64, view_size: f64) -> f64 {
        self.scale().pixel_to_domain(view_size - pixel, view_size)
    }

    /// Converts a pixel distance into the matching distance in data units.
    #[must_use]
    pub fn pixels_to_value_delta(&self, pixels: f64, view_size: f64) -> f64 {
        self.scale().pixels_to_domain_delta(pixels, view_size)
    }

    #[must_use]
    pub fn in_range(&self, value: f64) -> bool {
        let (min, max) = self.effective_range();
        value >= min && value <= max
    }

    /// Like `in_range`, with both bounds relaxed by `margin_px` pixels.
    #[must_use]
    pub fn in_extended_range(&self, value: f64, margin_px: f64, view_size: f64) -> bool {
        let (min, max) = self.effective_range();
        let margin = self.pixels_to_value_delta(margin_px.max(0.0), view_size);
        value >= min - margin && value <= max + margin
    }

    /// Shifts explicit bounds by `delta` data units, pinning the current
    /// effective range first when bounds were measured.
    pub fn pan_by(&mut self, delta: f64) -> ChartResult<()> {
        ensure_finite(delta, "pan delta")?;
        let (min, max) = self.effective_range();
        self.set_range(min + delta, max + delta)
    }

    /// Tick positions across the effective range.
    ///
    /// Ticks start at the first multiple of the interval not below the minimum,
    /// or at the minimum itself when `align_to_view` is set. With `partial`, one
    /// extra tick past the maximum is produced when the last tick falls short.
    #[must_use]
    pub fn enumerate_intervals(&self, align_to_view: bool, partial: bool) -> IntervalIter {
        let (min, max) = self.effective_range();
        let interval = self.effective_interval();
        let first = if align_to_view {
            min
        } else {
            (min / interval - TICK_TOLERANCE_RATIO).ceil() * interval
        };
        IntervalIter {
            first,
            interval,
            max,
            partial,
            index: 0,
            last: None,
            finished: false,
        }
    }

    pub fn format_value(&self, value: f64) -> String {
        self.number_format.format(value)
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChartError::Persistence(format!("failed to serialize axis: {e}")))
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        let axis: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse axis: {e}")))?;
        axis.validate()
    }

    /// Rechecks invariants on a value built outside the setters.
    pub fn validate(self) -> ChartResult<Self> {
        let mut checked = Self {
            number_format: self.number_format,
            title: self.title,
            ..Self::default()
        };
        checked.set_min_value(self.min_value)?;
        checked.set_max_value(self.max_value)?;
        checked.set_interval(self.interval)?;
        checked.set_origin(self.origin)?;
        Ok(checked)
    }
}

/// Lazy, finite tick sequence produced by `Axis::enumerate_intervals`.
///
/// Calling `enumerate_intervals` again restarts from the first tick.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalIter {
    first: f64,
    interval: f64,
    max: f64,
    partial: bool,
    index: usize,
    last: Option<f64>,
    finished: bool,
}

impl Iterator for IntervalIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.finished || self.index >= MAX_INTERVAL_TICKS {
            return None;
        }

        let value = self.first + self.index as f64 * self.interval;
        self.index += 1;

        let tolerance = self.interval * TICK_TOLERANCE_RATIO;
        if value <= self.max + tolerance {
            self.last = Some(value);
            return Some(value);
        }

        self.finished = true;
        // A tick landing on the maximum already closes the range.
        let short = self.last.is_none_or(|last| last < self.max - tolerance);
        if self.partial && short { Some(value) } else { None }
    }
}

/// Picks a 1-2-5 step giving roughly ten ticks over `span`.
#[must_use]
pub fn nice_interval(span: f64) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / 10.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let step = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    step * magnitude
}

fn ensure_finite(value: f64, what: &str) -> ChartResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ChartError::InvalidAxis(format!("{what} must be finite")))
    }
}

/// Id-keyed registry of the axes a chart owns.
///
/// Renderers, axis renderers and controllers refer to axes by `AxisId`; the
/// set is lent to each pass through the render context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AxisSet {
    axes: IndexMap<AxisId, Axis>,
    next_id: u32,
}

impl AxisSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, axis: Axis) -> AxisId {
        let id = AxisId::new(self.next_id);
        self.next_id += 1;
        self.axes.insert(id, axis);
        id
    }

    #[must_use]
    pub fn get(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(&id)
    }

    #[must_use]
    pub fn get_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.get_mut(&id)
    }

    pub fn require(&self, id: AxisId) -> ChartResult<&Axis> {
        self.get(id)
            .ok_or_else(|| ChartError::InvalidAxis(format!("unknown axis id {}", id.raw())))
    }

    pub fn require_mut(&mut self, id: AxisId) -> ChartResult<&mut Axis> {
        self.get_mut(id)
            .ok_or_else(|| ChartError::InvalidAxis(format!("unknown axis id {}", id.raw())))
    }

    pub fn iter(&self) -> impl Iterator<Item = (AxisId, &Axis)> {
        self.axes.iter().map(|(id, axis)| (*id, axis))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.axes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Axis, NumberFormat, nice_interval};

    #[test]
    fn nice_interval_uses_one_two_five_steps() {
        assert_eq!(nice_interval(12.0), 2.0);
        assert_eq!(nice_interval(100.0), 10.0);
        assert_eq!(nice_interval(45_000.0), 5_000.0);
    }

    #[test]
    fn auto_format_trims_trailing_zeros() {
        assert_eq!(NumberFormat::Auto.format(2.5), "2.5");
        assert_eq!(NumberFormat::Auto.format(10.0), "10");
        assert_eq!(NumberFormat::Auto.format(-0.0), "0");
    }

    #[test]
    fn explicit_bounds_override_measured_range() {
        let mut axis = Axis::new();
        axis.set_measured_range(Some((5.0, 50.0)));
        axis.set_min_value(Some(0.0)).expect("min");
        assert_eq!(axis.effective_range(), (0.0, 50.0));
    }
}
