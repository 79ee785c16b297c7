use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::Axis;
use crate::error::{ChartError, ChartResult};
use crate::style::{SeriesStyle, Theme};

use super::{ChartConfig, ChartViewState};

pub const PERSISTENCE_SCHEMA_V1: u32 = 1;

/// Versioned wrapper written around every persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonContractV1<T> {
    pub schema_version: u32,
    pub payload: T,
}

fn to_contract_v1<T: Serialize>(value: &T, what: &str) -> ChartResult<String> {
    let contract = JsonContractV1 {
        schema_version: PERSISTENCE_SCHEMA_V1,
        payload: value,
    };
    serde_json::to_string_pretty(&contract).map_err(|e| {
        ChartError::Persistence(format!("failed to serialize {what} contract v1: {e}"))
    })
}

/// Accepts either the bare document or a v1 envelope around it.
///
/// Persisted types fill missing fields with defaults, so an envelope would
/// also parse as an empty bare document; the envelope is detected by its
/// `schema_version` key first.
fn from_compat<T: DeserializeOwned>(input: &str, what: &str) -> ChartResult<T> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| ChartError::Persistence(format!("failed to parse {what} json: {e}")))?;
    if value.get("schema_version").is_none() {
        return serde_json::from_value(value)
            .map_err(|e| ChartError::Persistence(format!("failed to parse {what} json: {e}")));
    }
    let contract: JsonContractV1<T> = serde_json::from_value(value).map_err(|e| {
        ChartError::Persistence(format!("failed to parse {what} json payload: {e}"))
    })?;
    if contract.schema_version != PERSISTENCE_SCHEMA_V1 {
        return Err(ChartError::Persistence(format!(
            "unsupported {what} schema version: {}",
            contract.schema_version
        )));
    }
    Ok(contract.payload)
}

impl ChartConfig {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        to_contract_v1(self, "chart config")
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let config: Self = from_compat(input, "chart config")?;
        config.validate()?;
        Ok(config)
    }
}

impl Theme {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        to_contract_v1(self, "theme")
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let theme: Self = from_compat(input, "theme")?;
        theme.validate()?;
        Ok(theme)
    }
}

impl SeriesStyle {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        to_contract_v1(self, "series style")
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let style: Self = from_compat(input, "series style")?;
        style.validate()?;
        Ok(style)
    }
}

impl Axis {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        to_contract_v1(self, "axis")
    }

    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        from_compat::<Self>(input, "axis")?.validate()
    }
}

impl ChartViewState {
    pub fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        to_contract_v1(self, "view state")
    }

    /// Parses and validates a view state; every axis must be consistent.
    pub fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        let mut state: Self = from_compat(input, "view state")?;
        state.viewport = state.viewport.validate()?;
        state.axes = state
            .axes
            .into_iter()
            .map(|(id, axis)| axis.validate().map(|axis| (id, axis)))
            .collect::<ChartResult<_>>()?;
        if let Some(angle) = state.start_angle {
            if !angle.is_finite() {
                return Err(ChartError::Persistence(
                    "view state start angle must be finite".to_owned(),
                ));
            }
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_schema_version_is_rejected() {
        let input = r#"{"schema_version": 7, "payload": {"min_value": 0.0}}"#;
        let err = Axis::from_json_compat_str(input).expect_err("version 7");
        assert!(matches!(err, ChartError::Persistence(_)));
    }

    #[test]
    fn bare_and_wrapped_documents_both_load() {
        let config = ChartConfig::default().with_title("Sales");
        let wrapped = config.to_json_contract_v1_pretty().expect("serialize");
        let bare = config.to_json_pretty().expect("serialize");
        assert_eq!(ChartConfig::from_json_compat_str(&wrapped).expect("wrapped"), config);
        assert_eq!(ChartConfig::from_json_compat_str(&bare).expect("bare"), config);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ChartConfig::from_json_compat_str(r#"{"show_zoom_widgets": true}"#)
            .expect("partial config");
        assert!(config.show_zoom_widgets);
        assert_eq!(config.title_margin, ChartConfig::default().title_margin);
    }
}
