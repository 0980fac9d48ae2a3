//! Level, trend and seasonal state with the additive update equations.
//!
//! For an observation `y_t` with seasonal slot `s = seasonal[t mod m]`:
//! - Level: `l_t = α(y_t - s) + (1-α)(l_{t-1} + b_{t-1})`
//! - Trend: `b_t = β(l_t - l_{t-1}) + (1-β)b_{t-1}`
//! - Seasonal: `s ← γ(y_t - l_t) + (1-γ)s`

use super::params::SmoothingParameters;
use crate::error::{ForecastError, Result};
use crate::utils::stats::mean;

/// Smoothing state: level, trend and one seasonal offset per slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingState {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
}

/// Outcome of running the recurrence once over a series.
#[derive(Debug, Clone)]
pub struct RecurrencePass {
    /// State after the last observation.
    pub state: SmoothingState,
    /// Sum of squared one-step-ahead errors for `t >= m`.
    pub sse: f64,
    /// One-step-ahead predictions for `t >= m`.
    pub fitted: Vec<f64>,
    /// `y_t - fitted_t` for `t >= m`.
    pub residuals: Vec<f64>,
}

impl SmoothingState {
    /// Seed the state from the first two seasonal cycles.
    ///
    /// Level is the mean of cycle one, trend the average per-step slope
    /// between the cycles, and each seasonal slot the cycle-one deviation
    /// from that level.
    pub fn initialize(values: &[f64], period: usize) -> Result<Self> {
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        let needed = 2 * period;
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }

        let first_cycle = &values[..period];
        let level = mean(first_cycle);

        let m = period as f64;
        let trend = (0..period)
            .map(|i| (values[period + i] - values[i]) / m)
            .sum::<f64>()
            / m;

        let seasonal = first_cycle.iter().map(|y| y - level).collect();

        Ok(Self {
            level,
            trend,
            seasonal,
        })
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn trend(&self) -> f64 {
        self.trend
    }

    pub fn seasonal(&self) -> &[f64] {
        &self.seasonal
    }

    /// Number of seasonal slots.
    pub fn period(&self) -> usize {
        self.seasonal.len()
    }

    pub fn is_finite(&self) -> bool {
        self.level.is_finite()
            && self.trend.is_finite()
            && self.seasonal.iter().all(|s| s.is_finite())
    }

    /// Prediction for step `t` made from the state after step `t - 1`.
    pub fn one_step_forecast(&self, t: usize) -> f64 {
        self.level + self.trend + self.seasonal[t % self.period()]
    }

    /// Apply the update equations for observation `y` at step `t`.
    pub fn update(&mut self, t: usize, y: f64, params: &SmoothingParameters) {
        let slot = t % self.period();
        let s = self.seasonal[slot];
        let (alpha, beta, gamma) = (params.alpha(), params.beta(), params.gamma());

        let level_prev = self.level;
        self.level = alpha * (y - s) + (1.0 - alpha) * (level_prev + self.trend);
        self.trend = beta * (self.level - level_prev) + (1.0 - beta) * self.trend;
        self.seasonal[slot] = gamma * (y - self.level) + (1.0 - gamma) * s;
    }

    /// Value `k >= 1` steps past the last of `n_obs` observations.
    pub fn project(&self, n_obs: usize, k: usize) -> f64 {
        let slot = (n_obs + k - 1) % self.period();
        self.level + k as f64 * self.trend + self.seasonal[slot]
    }
}

/// Run the recurrence over `values`, recording fitted values and residuals.
///
/// Fails with `FitConvergence` if the state diverges for these parameters.
pub fn run_pass(
    values: &[f64],
    period: usize,
    params: &SmoothingParameters,
) -> Result<RecurrencePass> {
    let capacity = values.len().saturating_sub(period);
    let mut fitted = Vec::with_capacity(capacity);
    let mut residuals = Vec::with_capacity(capacity);

    let (state, sse) = recur(values, period, params, |prediction, residual| {
        fitted.push(prediction);
        residuals.push(residual);
    })?;

    if !sse.is_finite() {
        return Err(ForecastError::FitConvergence(format!(
            "recurrence diverged for alpha={}, beta={}, gamma={}",
            params.alpha(),
            params.beta(),
            params.gamma()
        )));
    }

    Ok(RecurrencePass {
        state,
        sse,
        fitted,
        residuals,
    })
}

/// SSE objective for the optimizer; `+inf` when the state diverges.
pub(crate) fn pass_sse(values: &[f64], period: usize, params: &SmoothingParameters) -> f64 {
    match recur(values, period, params, |_, _| {}) {
        Ok((_, sse)) => sse,
        Err(_) => f64::INFINITY,
    }
}

fn recur<F>(
    values: &[f64],
    period: usize,
    params: &SmoothingParameters,
    mut on_step: F,
) -> Result<(SmoothingState, f64)>
where
    F: FnMut(f64, f64),
{
    let mut state = SmoothingState::initialize(values, period)?;
    let mut sse = 0.0;

    for (t, &y) in values.iter().enumerate().skip(period) {
        let prediction = state.one_step_forecast(t);
        let residual = y - prediction;
        sse += residual * residual;
        on_step(prediction, residual);

        state.update(t, y, params);
        if !state.is_finite() {
            return Ok((state, f64::INFINITY));
        }
    }

    Ok((state, sse))
}
