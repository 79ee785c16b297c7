mod chart;
mod config;
mod json_contract;
mod presets;

pub use chart::{Chart, ChartViewState, Tooltip};
pub use config::{ChartConfig, ChartKind, ControllerKind};
pub use json_contract::{JsonContractV1, PERSISTENCE_SCHEMA_V1};
