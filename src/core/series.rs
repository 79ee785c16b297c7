use std::fmt;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::core::DataPoint;
use crate::core::primitives::{datetime_to_unix_seconds, decimals_to_f64};
use crate::error::{ChartError, ChartResult};

/// One kind of text a series can provide for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelKind {
    InnerLabel,
    OuterLabel,
    XAxisLabel,
    YAxisLabel,
    ToolTip,
}

impl LabelKind {
    const fn bit(self) -> u8 {
        match self {
            Self::InnerLabel => 1 << 0,
            Self::OuterLabel => 1 << 1,
            Self::XAxisLabel => 1 << 2,
            Self::YAxisLabel => 1 << 3,
            Self::ToolTip => 1 << 4,
        }
    }
}

/// Bitmask of label kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct LabelKinds {
    bits: u8,
}

impl LabelKinds {
    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: LabelKind::InnerLabel.bit()
                | LabelKind::OuterLabel.bit()
                | LabelKind::XAxisLabel.bit()
                | LabelKind::YAxisLabel.bit()
                | LabelKind::ToolTip.bit(),
        }
    }

    #[must_use]
    pub const fn from_kind(kind: LabelKind) -> Self {
        Self { bits: kind.bit() }
    }

    #[must_use]
    pub const fn with(self, kind: LabelKind) -> Self {
        Self {
            bits: self.bits | kind.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains(self, kind: LabelKind) -> bool {
        (self.bits & kind.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

impl From<LabelKind> for LabelKinds {
    fn from(kind: LabelKind) -> Self {
        Self::from_kind(kind)
    }
}

/// Per-element label lists, one list per label kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesLabels {
    pub inner: Vec<String>,
    pub outer: Vec<String>,
    pub x_axis: Vec<String>,
    pub y_axis: Vec<String>,
    pub tooltips: Vec<String>,
}

impl SeriesLabels {
    #[must_use]
    pub fn get(&self, index: usize, kind: LabelKind) -> Option<&str> {
        let list = match kind {
            LabelKind::InnerLabel => &self.inner,
            LabelKind::OuterLabel => &self.outer,
            LabelKind::XAxisLabel => &self.x_axis,
            LabelKind::YAxisLabel => &self.y_axis,
            LabelKind::ToolTip => &self.tooltips,
        };
        list.get(index).map(String::as_str)
    }

    /// Kinds that have at least one entry.
    #[must_use]
    pub fn available_kinds(&self) -> LabelKinds {
        let mut kinds = LabelKinds::none();
        for (kind, list) in [
            (LabelKind::InnerLabel, &self.inner),
            (LabelKind::OuterLabel, &self.outer),
            (LabelKind::XAxisLabel, &self.x_axis),
            (LabelKind::YAxisLabel, &self.y_axis),
            (LabelKind::ToolTip, &self.tooltips),
        ] {
            if !list.is_empty() {
                kinds = kinds.with(kind);
            }
        }
        kinds
    }
}

/// Strategy that replaces the stored-label lookup of a series.
///
/// Receives the series, the element index and the requested kind.
#[derive(Clone)]
pub struct LabelFormatter(Rc<dyn Fn(&Series, usize, LabelKind) -> Option<String>>);

impl LabelFormatter {
    pub fn new(f: impl Fn(&Series, usize, LabelKind) -> Option<String> + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

/// Host-provided tabular data read by `DataBoundSeries`.
pub trait DataSource: fmt::Debug {
    fn row_count(&self) -> usize;
    fn number(&self, field: &str, row: usize) -> Option<f64>;
    fn text(&self, field: &str, row: usize) -> Option<String>;
}

/// `DataSource` over JSON objects, one object per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonRecords {
    rows: Vec<Map<String, Value>>,
}

impl JsonRecords {
    #[must_use]
    pub fn new(rows: Vec<Map<String, Value>>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of objects.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let rows: Vec<Map<String, Value>> = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse records: {e}")))?;
        Ok(Self { rows })
    }
}

impl DataSource for JsonRecords {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn number(&self, field: &str, row: usize) -> Option<f64> {
        match self.rows.get(row)?.get(field)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    fn text(&self, field: &str, row: usize) -> Option<String> {
        match self.rows.get(row)?.get(field)? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// One-dimensional values; the X coordinate of element `i` is `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimpleSeries {
    pub values: Vec<f64>,
    #[serde(default)]
    pub labels: SeriesLabels,
}

/// Paired X/Y values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct XySeries {
    pub x_values: Vec<f64>,
    pub y_values: Vec<f64>,
    #[serde(default)]
    pub labels: SeriesLabels,
}

/// Values keyed by UTC timestamps, mapped to unix seconds on the X axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DateTimeSeries {
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
    #[serde(default)]
    pub labels: SeriesLabels,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointSeries {
    pub points: Vec<DataPoint>,
    #[serde(default)]
    pub labels: SeriesLabels,
}

/// Slice values of a pie plus their inner/outer labels.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PieSeries {
    pub values: Vec<f64>,
    #[serde(default)]
    pub labels: SeriesLabels,
}

/// Series that reads named fields from an external `DataSource`.
#[derive(Debug, Clone)]
pub struct DataBoundSeries {
    pub source: Rc<dyn DataSource>,
    pub x_field: Option<String>,
    pub y_field: String,
    pub label_fields: Vec<(LabelKind, String)>,
}

impl DataBoundSeries {
    pub fn new(source: Rc<dyn DataSource>, y_field: impl Into<String>) -> Self {
        Self {
            source,
            x_field: None,
            y_field: y_field.into(),
            label_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_x_field(mut self, field: impl Into<String>) -> Self {
        self.x_field = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_label_field(mut self, kind: LabelKind, field: impl Into<String>) -> Self {
        self.label_fields.push((kind, field.into()));
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SeriesData {
    Simple(SimpleSeries),
    Xy(XySeries),
    DateTime(DateTimeSeries),
    Point(PointSeries),
    Pie(PieSeries),
    #[serde(skip)]
    DataBound(DataBoundSeries),
}

/// Ordered data provider consumed by renderers and legends.
///
/// Series are immutable once built and shared through `SeriesRef`; replacing
/// data means replacing the series in its owning collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    title: String,
    #[serde(default)]
    supported_labels: LabelKinds,
    #[serde(default)]
    emphasized: SmallVec<[usize; 4]>,
    #[serde(skip)]
    label_formatter: Option<LabelFormatter>,
    #[serde(skip)]
    sorted_domain: Option<bool>,
    data: SeriesData,
}

pub type SeriesRef = Rc<Series>;

impl Series {
    fn from_data(data: SeriesData) -> Self {
        let supported_labels = match &data {
            SeriesData::DataBound(bound) => bound
                .label_fields
                .iter()
                .fold(LabelKinds::none(), |kinds, (kind, _)| kinds.with(*kind)),
            other => labels_of(other)
                .map(SeriesLabels::available_kinds)
                .unwrap_or_default(),
        };
        let mut series = Self {
            title: String::new(),
            supported_labels,
            emphasized: SmallVec::new(),
            label_formatter: None,
            sorted_domain: None,
            data,
        };
        series.sorted_domain = Some(series.values_sorted(0));
        series
    }

    #[must_use]
    pub fn simple(values: Vec<f64>) -> Self {
        Self::from_data(SeriesData::Simple(SimpleSeries {
            values,
            labels: SeriesLabels::default(),
        }))
    }

    /// One-dimensional bar data with inner, outer and X-axis labels.
    #[must_use]
    pub fn bar(
        values: Vec<f64>,
        inner_labels: Vec<String>,
        outer_labels: Vec<String>,
        x_axis_labels: Vec<String>,
    ) -> Self {
        Self::from_data(SeriesData::Simple(SimpleSeries {
            values,
            labels: SeriesLabels {
                inner: inner_labels,
                outer: outer_labels,
                x_axis: x_axis_labels,
                ..SeriesLabels::default()
            },
        }))
    }

    /// Paired X/Y values. Lengths must match.
    pub fn xy(x_values: Vec<f64>, y_values: Vec<f64>) -> ChartResult<Self> {
        if x_values.len() != y_values.len() {
            return Err(ChartError::InvalidData(format!(
                "x/y length mismatch: {} vs {}",
                x_values.len(),
                y_values.len()
            )));
        }
        Ok(Self::from_data(SeriesData::Xy(XySeries {
            x_values,
            y_values,
            labels: SeriesLabels::default(),
        })))
    }

    pub fn date_time(times: Vec<DateTime<Utc>>, values: Vec<f64>) -> ChartResult<Self> {
        if times.len() != values.len() {
            return Err(ChartError::InvalidData(format!(
                "time/value length mismatch: {} vs {}",
                times.len(),
                values.len()
            )));
        }
        Ok(Self::from_data(SeriesData::DateTime(DateTimeSeries {
            times,
            values,
            labels: SeriesLabels::default(),
        })))
    }

    #[must_use]
    pub fn points(points: Vec<DataPoint>) -> Self {
        Self::from_data(SeriesData::Point(PointSeries {
            points,
            labels: SeriesLabels::default(),
        }))
    }

    #[must_use]
    pub fn pie(values: Vec<f64>, inner_labels: Vec<String>, outer_labels: Vec<String>) -> Self {
        Self::from_data(SeriesData::Pie(PieSeries {
            values,
            labels: SeriesLabels {
                inner: inner_labels,
                outer: outer_labels,
                ..SeriesLabels::default()
            },
        }))
    }

    /// Simple series from decimal amounts.
    pub fn from_decimals(values: &[Decimal]) -> ChartResult<Self> {
        Ok(Self::simple(decimals_to_f64(values, "series value")?))
    }

    #[must_use]
    pub fn data_bound(series: DataBoundSeries) -> Self {
        Self::from_data(SeriesData::DataBound(series))
    }

    /// Replaces stored labels; unavailable for data-bound series.
    pub fn with_labels(mut self, labels: SeriesLabels) -> ChartResult<Self> {
        let kinds = labels.available_kinds();
        match &mut self.data {
            SeriesData::Simple(s) => s.labels = labels,
            SeriesData::Xy(s) => s.labels = labels,
            SeriesData::DateTime(s) => s.labels = labels,
            SeriesData::Point(s) => s.labels = labels,
            SeriesData::Pie(s) => s.labels = labels,
            SeriesData::DataBound(_) => {
                return Err(ChartError::InvalidData(
                    "data-bound series read labels from their source".to_owned(),
                ));
            }
        }
        self.supported_labels = self.supported_labels.union(kinds);
        Ok(self)
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn with_supported_labels(mut self, kinds: LabelKinds) -> Self {
        self.supported_labels = kinds;
        self
    }

    #[must_use]
    pub fn with_label_formatter(mut self, formatter: LabelFormatter) -> Self {
        self.label_formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_emphasized(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.emphasized = indices.into_iter().collect();
        self
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn supported_labels(&self) -> LabelKinds {
        self.supported_labels
    }

    #[must_use]
    pub fn data(&self) -> &SeriesData {
        &self.data
    }

    #[must_use]
    pub fn size(&self) -> usize {
        match &self.data {
            SeriesData::Simple(s) => s.values.len(),
            SeriesData::Xy(s) => s.x_values.len().min(s.y_values.len()),
            SeriesData::DateTime(s) => s.times.len().min(s.values.len()),
            SeriesData::Point(s) => s.points.len(),
            SeriesData::Pie(s) => s.values.len(),
            SeriesData::DataBound(s) => s.source.row_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        match &self.data {
            SeriesData::Simple(_) | SeriesData::Pie(_) => 1,
            SeriesData::Xy(_) | SeriesData::DateTime(_) | SeriesData::Point(_) => 2,
            SeriesData::DataBound(s) => {
                if s.x_field.is_some() {
                    2
                } else {
                    1
                }
            }
        }
    }

    /// Value of element `index` in dimension `dimension`.
    ///
    /// Indexing past `size()` is a caller bug: it asserts in debug builds and
    /// yields `None` otherwise.
    #[must_use]
    pub fn value(&self, index: usize, dimension: usize) -> Option<f64> {
        debug_assert!(
            index < self.size(),
            "series index {index} out of range (size {})",
            self.size()
        );
        match (&self.data, dimension) {
            (SeriesData::Simple(s), 0) => s.values.get(index).copied(),
            (SeriesData::Pie(s), 0) => s.values.get(index).copied(),
            (SeriesData::Xy(s), 0) => s.x_values.get(index).copied(),
            (SeriesData::Xy(s), 1) => s.y_values.get(index).copied(),
            (SeriesData::DateTime(s), 0) => s.times.get(index).map(|t| datetime_to_unix_seconds(*t)),
            (SeriesData::DateTime(s), 1) => s.values.get(index).copied(),
            (SeriesData::Point(s), 0) => s.points.get(index).map(|p| p.x),
            (SeriesData::Point(s), 1) => s.points.get(index).map(|p| p.y),
            (SeriesData::DataBound(s), 0) => match &s.x_field {
                Some(field) => s.source.number(field, index),
                None => s.source.number(&s.y_field, index),
            },
            (SeriesData::DataBound(s), 1) if s.x_field.is_some() => {
                s.source.number(&s.y_field, index)
            }
            _ => None,
        }
    }

    /// Domain coordinate of element `index`: the index itself for 1-D data.
    #[must_use]
    pub fn x_value(&self, index: usize) -> Option<f64> {
        if self.dimensions() == 1 {
            Some(index as f64)
        } else {
            self.value(index, 0)
        }
    }

    /// Plotted value of element `index`.
    #[must_use]
    pub fn y_value(&self, index: usize) -> Option<f64> {
        if self.dimensions() == 1 {
            self.value(index, 0)
        } else {
            self.value(index, 1)
        }
    }

    /// Label of element `index`, or `None` when the kind is not supported.
    #[must_use]
    pub fn label(&self, index: usize, kind: LabelKind) -> Option<String> {
        debug_assert!(
            index < self.size(),
            "series label index {index} out of range (size {})",
            self.size()
        );
        if let Some(formatter) = &self.label_formatter {
            return (formatter.0)(self, index, kind);
        }
        if !self.supported_labels.contains(kind) {
            return None;
        }
        match &self.data {
            SeriesData::DataBound(bound) => bound
                .label_fields
                .iter()
                .find(|(field_kind, _)| *field_kind == kind)
                .and_then(|(_, field)| bound.source.text(field, index)),
            other => labels_of(other)
                .and_then(|labels| labels.get(index, kind))
                .map(str::to_owned),
        }
    }

    #[must_use]
    pub fn is_emphasized(&self, index: usize) -> bool {
        self.emphasized.contains(&index)
    }

    /// Whether dimension `dimension` is non-decreasing across the series.
    #[must_use]
    pub fn is_sorted(&self, dimension: usize) -> bool {
        match (dimension, self.sorted_domain) {
            (0, Some(sorted)) => sorted,
            _ => self.values_sorted(dimension),
        }
    }

    /// Whether the domain coordinates returned by `x_value` are non-decreasing.
    #[must_use]
    pub fn is_domain_sorted(&self) -> bool {
        self.dimensions() == 1 || self.is_sorted(0)
    }

    fn values_sorted(&self, dimension: usize) -> bool {
        let mut previous = f64::NEG_INFINITY;
        for index in 0..self.size() {
            let Some(value) = self.value(index, dimension) else {
                return false;
            };
            if value < previous {
                return false;
            }
            previous = value;
        }
        true
    }

    /// Min/max over finite values of `dimension`, `None` when there are none.
    #[must_use]
    pub fn value_range(&self, dimension: usize) -> Option<(f64, f64)> {
        let mut range: Option<(f64, f64)> = None;
        for index in 0..self.size() {
            let Some(value) = self.value(index, dimension).filter(|v| v.is_finite()) else {
                continue;
            };
            range = Some(match range {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }
        range
    }

    /// Min/max of the domain coordinates (`x_value`).
    #[must_use]
    pub fn domain_range(&self) -> Option<(f64, f64)> {
        if self.dimensions() == 1 {
            let size = self.size();
            return (size > 0).then(|| (0.0, (size - 1) as f64));
        }
        self.value_range(0)
    }

    /// Min/max of the plotted values (`y_value`).
    #[must_use]
    pub fn plotted_range(&self) -> Option<(f64, f64)> {
        if self.dimensions() == 1 {
            self.value_range(0)
        } else {
            self.value_range(1)
        }
    }

    pub fn to_json(&self) -> ChartResult<String> {
        serde_json::to_string(self)
            .map_err(|e| ChartError::Persistence(format!("failed to serialize series: {e}")))
    }

    pub fn from_json(input: &str) -> ChartResult<Self> {
        let parsed: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::Persistence(format!("failed to parse series: {e}")))?;
        let mut series = Self::from_data(parsed.data);
        series.title = parsed.title;
        series.supported_labels = parsed.supported_labels;
        series.emphasized = parsed.emphasized;
        Ok(series)
    }
}

fn labels_of(data: &SeriesData) -> Option<&SeriesLabels> {
    match data {
        SeriesData::Simple(s) => Some(&s.labels),
        SeriesData::Xy(s) => Some(&s.labels),
        SeriesData::DateTime(s) => Some(&s.labels),
        SeriesData::Point(s) => Some(&s.labels),
        SeriesData::Pie(s) => Some(&s.labels),
        SeriesData::DataBound(_) => None,
    }
}
