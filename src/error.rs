use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("invalid margins: top={top}, bottom={bottom} leave no graph height in {height}px")]
    InvalidMargins { top: f64, bottom: f64, height: f64 },

    #[error("invalid axis range: min={min}, max={max}")]
    InvalidRange { min: f64, max: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}
