//! Forecasting models.

mod traits;

pub mod holt_winters;

pub use holt_winters::{FittedModel, HoltWinters};
pub use traits::Forecaster;
