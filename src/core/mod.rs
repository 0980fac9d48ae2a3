//! Core data structures for time series forecasting.

mod forecast;
mod time_series;

pub use forecast::ForecastResult;
pub use time_series::TimeSeries;
