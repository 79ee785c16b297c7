use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid axis: {0}")]
    InvalidAxis(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("render backend error: {0}")]
    Render(String),
}
