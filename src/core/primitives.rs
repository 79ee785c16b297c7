use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Converts a slice of decimals, failing on the first unrepresentable entry.
pub fn decimals_to_f64(values: &[Decimal], field_name: &str) -> ChartResult<Vec<f64>> {
    values
        .iter()
        .map(|value| decimal_to_f64(*value, field_name))
        .collect()
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}
