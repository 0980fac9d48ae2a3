//! # hw-forecast
//!
//! Additive Holt-Winters forecasting with automatic parameter estimation.
//!
//! The engine fits level, trend and seasonal components to a regularly
//! spaced series, choosing alpha, beta and gamma by bounded Nelder-Mead
//! minimization of the one-step-ahead squared error. The [`service`] module
//! wraps it in a JSON request boundary with an axum adapter.
//!
//! ```
//! use hw_forecast::prelude::*;
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
//! let values: Vec<f64> = (0..36).map(|i| 50.0 + (i % 12) as f64).collect();
//! let series = TimeSeries::from_start(start, Duration::days(1), values).unwrap();
//!
//! let model = HoltWinters::auto(12).fit(&series).unwrap();
//! let forecast = model.forecast(6).unwrap();
//! assert_eq!(forecast.horizon(), 6);
//! ```

#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod service;
pub mod utils;

pub use error::{ForecastError, Result};
pub use models::holt_winters::{fit, forecast};

pub mod prelude {
    pub use crate::core::{ForecastResult, TimeSeries};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{FittedModel, Forecaster, HoltWinters};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
