//! Error types for the hw-forecast engine.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building a series, fitting or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Timestamps are not strictly increasing on a single sampling interval.
    #[error("timestamps must be strictly increasing and evenly spaced (violated at index {index})")]
    NonMonotonicTimestamp { index: usize },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// NaN or infinite values detected in the input.
    #[error("missing values detected in data")]
    MissingValues,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Index out of bounds.
    #[error("index out of bounds: {index} (size: {size})")]
    IndexOutOfBounds { index: usize, size: usize },

    /// Optimizer could not find parameters with a finite SSE.
    #[error("fit did not converge: {0}")]
    FitConvergence(String),

    /// Requested forecast horizon is negative.
    #[error("invalid forecast horizon: {0}")]
    InvalidHorizon(i64),

    /// Fitting was cancelled through the optimizer's cancellation flag.
    #[error("fit cancelled")]
    Cancelled,

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    ComputationError(String),
}
