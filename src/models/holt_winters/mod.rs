//! Additive Holt-Winters (triple exponential smoothing).
//!
//! The engine is split along its data flow:
//! - [`SmoothingState`] seeds and updates level, trend and seasonal slots
//! - [`ParameterOptimizer`] searches `(alpha, beta, gamma)` minimizing SSE
//! - [`HoltWinters`] ties both together and yields a [`FittedModel`]
//! - [`Projections`] extends a fitted model past the training data
//!
//! # Example
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use hw_forecast::core::TimeSeries;
//! use hw_forecast::models::holt_winters::{fit, forecast};
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (0..48).map(|i| 20.0 + (i % 12) as f64).collect();
//! let series = TimeSeries::from_start(start, Duration::days(1), values).unwrap();
//!
//! let model = fit(&series, 12).unwrap();
//! let result = forecast(&model, 5).unwrap();
//! assert_eq!(result.horizon(), 5);
//! assert_eq!(result.dates()[0], start + Duration::days(48));
//! ```

mod forecaster;
mod model;
mod optimizer;
mod params;
mod state;

pub use forecaster::Projections;
pub use model::{FittedModel, HoltWinters, DEFAULT_SEASONAL_PERIOD};
pub use optimizer::{Estimate, FallbackReason, FitOutcome, OptimizerConfig, ParameterOptimizer};
pub use params::SmoothingParameters;
pub use state::{run_pass, RecurrencePass, SmoothingState};

use crate::core::{ForecastResult, TimeSeries};
use crate::error::Result;
use crate::models::Forecaster;

/// Fit an additive Holt-Winters model with estimated parameters.
pub fn fit(series: &TimeSeries, seasonal_period: usize) -> Result<FittedModel> {
    HoltWinters::auto(seasonal_period).fit(series)
}

/// Forecast `horizon` steps from a fitted model.
pub fn forecast(model: &FittedModel, horizon: i64) -> Result<ForecastResult> {
    model.forecast(horizon)
}
