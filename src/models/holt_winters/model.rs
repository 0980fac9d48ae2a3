//! Holt-Winters estimator and the fitted model it produces.

use super::optimizer::{Estimate, FitOutcome, OptimizerConfig, ParameterOptimizer};
use super::params::SmoothingParameters;
use super::state::{run_pass, SmoothingState};
use crate::core::TimeSeries;
use crate::error::{ForecastError, Result};
use crate::utils::metrics::{calculate_metrics, AccuracyMetrics};
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Seasonal period used when none is configured.
pub const DEFAULT_SEASONAL_PERIOD: usize = 12;

/// Additive-trend, additive-seasonal Holt-Winters estimator.
///
/// The model equations:
/// - Level: `l_t = α(y_t - s_{t-m}) + (1-α)(l_{t-1} + b_{t-1})`
/// - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
/// - Seasonal: `s_t = γ(y_t - l_t) + (1-γ)s_{t-m}`
/// - Forecast: `ŷ_{t+h} = l_t + h*b_t + s_{t+h-m}`
///
/// The estimator holds configuration only; [`HoltWinters::fit`] returns an
/// independent [`FittedModel`] and can be called any number of times.
#[derive(Debug, Clone)]
pub struct HoltWinters {
    seasonal_period: usize,
    /// Fixed parameters; `None` means they are estimated.
    parameters: Option<SmoothingParameters>,
    optimizer: ParameterOptimizer,
}

impl HoltWinters {
    /// Create an estimator that optimizes alpha, beta and gamma.
    pub fn auto(seasonal_period: usize) -> Self {
        Self {
            seasonal_period,
            parameters: None,
            optimizer: ParameterOptimizer::default(),
        }
    }

    /// Create an estimator with fixed smoothing parameters.
    pub fn additive(alpha: f64, beta: f64, gamma: f64, seasonal_period: usize) -> Result<Self> {
        Ok(Self {
            seasonal_period,
            parameters: Some(SmoothingParameters::new(alpha, beta, gamma)?),
            optimizer: ParameterOptimizer::default(),
        })
    }

    /// Replace the optimizer settings, keeping any cancellation flag.
    pub fn with_optimizer(mut self, config: OptimizerConfig) -> Self {
        let optimizer = ParameterOptimizer::new(config);
        self.optimizer = match self.optimizer.cancel_flag() {
            Some(flag) => optimizer.with_cancellation(flag),
            None => optimizer,
        };
        self
    }

    /// Poll `flag` once per optimizer iteration; fitting fails with
    /// `Cancelled` once it is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.optimizer = self.optimizer.with_cancellation(flag);
        self
    }

    pub fn seasonal_period(&self) -> usize {
        self.seasonal_period
    }

    /// Fixed parameters, if any.
    pub fn parameters(&self) -> Option<SmoothingParameters> {
        self.parameters
    }

    /// Fit the model to `series`.
    pub fn fit(&self, series: &TimeSeries) -> Result<FittedModel> {
        let period = self.seasonal_period;
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        series.ensure_seasonal_coverage(period)?;

        let values = series.values();
        let estimate = match self.parameters {
            Some(parameters) => Estimate {
                parameters,
                sse: f64::NAN,
                outcome: FitOutcome::Fixed,
            },
            None => self.optimizer.optimize(values, period)?,
        };

        let pass = run_pass(values, period, &estimate.parameters)?;

        tracing::debug!(
            n = values.len(),
            period,
            alpha = estimate.parameters.alpha(),
            beta = estimate.parameters.beta(),
            gamma = estimate.parameters.gamma(),
            sse = pass.sse,
            outcome = ?estimate.outcome,
            "holt-winters model fitted"
        );

        Ok(FittedModel {
            parameters: estimate.parameters,
            final_state: pass.state,
            sse: pass.sse,
            outcome: estimate.outcome,
            n_obs: values.len(),
            last_timestamp: series.last_timestamp(),
            interval: series.interval(),
            fitted: pass.fitted,
            residuals: pass.residuals,
        })
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self::auto(DEFAULT_SEASONAL_PERIOD)
    }
}

/// Result of fitting: parameters, the state after the last observation and
/// the in-sample error.
///
/// Immutable and self-contained; forecasting from it never changes it.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    parameters: SmoothingParameters,
    final_state: SmoothingState,
    sse: f64,
    outcome: FitOutcome,
    n_obs: usize,
    last_timestamp: DateTime<Utc>,
    interval: Duration,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

impl FittedModel {
    pub fn parameters(&self) -> SmoothingParameters {
        self.parameters
    }

    pub fn final_state(&self) -> &SmoothingState {
        &self.final_state
    }

    /// Sum of squared one-step-ahead errors after the first seasonal cycle.
    pub fn sse(&self) -> f64 {
        self.sse
    }

    pub fn outcome(&self) -> FitOutcome {
        self.outcome
    }

    pub fn seasonal_period(&self) -> usize {
        self.final_state.period()
    }

    /// Number of training observations.
    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.last_timestamp
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// In-sample one-step-ahead predictions, starting at the second cycle.
    pub fn fitted(&self) -> &[f64] {
        &self.fitted
    }

    /// In-sample residuals aligned with [`FittedModel::fitted`].
    pub fn residuals(&self) -> &[f64] {
        &self.residuals
    }

    /// Accuracy of the in-sample one-step-ahead predictions.
    pub fn accuracy(&self) -> Result<AccuracyMetrics> {
        let actual: Vec<f64> = self
            .fitted
            .iter()
            .zip(&self.residuals)
            .map(|(f, r)| f + r)
            .collect();
        calculate_metrics(&actual, &self.fitted)
    }
}
