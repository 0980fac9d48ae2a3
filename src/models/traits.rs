//! Forecaster trait defining the interface of fitted models.

use crate::core::ForecastResult;
use crate::error::Result;

/// A fitted model that can project its series forward.
///
/// Implementations are immutable: forecasting twice with the same horizon
/// yields the same result. The trait is object-safe and can be used as
/// `&dyn Forecaster`.
pub trait Forecaster {
    /// Forecast `horizon` steps past the training data.
    ///
    /// A horizon of 0 yields an empty result; a negative horizon fails with
    /// `InvalidHorizon`.
    fn forecast(&self, horizon: i64) -> Result<ForecastResult>;

    /// Get the model name.
    fn name(&self) -> &str;
}
