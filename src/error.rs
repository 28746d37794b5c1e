use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Contract violation by the caller, e.g. statistics over an empty group.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("`{operation}` is not valid in lifecycle state {state}")]
    InvalidLifecycle {
        operation: &'static str,
        state: &'static str,
    },
}
