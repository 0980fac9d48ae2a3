//! Smoothing-parameter estimation by SSE minimization.

use super::params::{SmoothingParameters, PARAMETER_BOUNDS};
use super::state::pass_sse;
use crate::error::{ForecastError, Result};
use crate::utils::optimization::{nelder_mead_until, NelderMeadConfig};
use crate::utils::stats::is_constant;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Relative spread below which a series is treated as constant.
const CONSTANT_TOLERANCE: f64 = 1e-12;

/// Settings for the parameter search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Iteration cap for each Nelder-Mead run.
    pub max_iter: usize,
    /// Stop when the simplex SSE spread drops below this.
    pub tolerance: f64,
    /// `(alpha, beta, gamma)` points the search is started from, in order.
    pub starting_points: Vec<[f64; 3]>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            starting_points: vec![
                SmoothingParameters::INITIAL_GUESS,
                [0.5, 0.05, 0.3],
                [0.1, 0.01, 0.5],
            ],
        }
    }
}

/// Why parameter search was skipped or abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Every observation is the same value; the SSE surface is flat.
    ConstantSeries,
    /// No starting point produced a finite SSE.
    NonFiniteObjective,
}

/// How the parameters of a fitted model were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// Supplied by the caller.
    Fixed,
    /// Found by the optimizer.
    Optimized { iterations: usize, converged: bool },
    /// All weights set to zero.
    Fallback(FallbackReason),
}

/// Chosen parameters together with their in-sample SSE.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub parameters: SmoothingParameters,
    pub sse: f64,
    pub outcome: FitOutcome,
}

/// Bounded Nelder-Mead search over `[0, 1]^3`.
///
/// Each candidate is scored by one full recurrence pass. An optional
/// cancellation flag is polled once per iteration.
#[derive(Debug, Clone, Default)]
pub struct ParameterOptimizer {
    config: OptimizerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl ParameterOptimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            cancel: None,
        }
    }

    /// Abort the search with `Cancelled` once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub(crate) fn cancel_flag(&self) -> Option<Arc<AtomicBool>> {
        self.cancel.clone()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Estimate parameters minimizing one-step-ahead SSE over `values`.
    pub fn optimize(&self, values: &[f64], period: usize) -> Result<Estimate> {
        if is_constant(values, CONSTANT_TOLERANCE) {
            tracing::debug!(n = values.len(), "constant series, using zero smoothing weights");
            return self.fallback(values, period, FallbackReason::ConstantSeries);
        }

        let nm_config = NelderMeadConfig {
            max_iter: self.config.max_iter,
            tolerance: self.config.tolerance,
            ..Default::default()
        };

        let starts: &[[f64; 3]] = if self.config.starting_points.is_empty() {
            &[SmoothingParameters::INITIAL_GUESS]
        } else {
            &self.config.starting_points
        };

        let mut best: Option<Estimate> = None;
        for start in starts {
            if self.is_cancelled() {
                return Err(ForecastError::Cancelled);
            }

            let result = nelder_mead_until(
                |point| pass_sse(values, period, &SmoothingParameters::from_point(point)),
                start,
                Some(&PARAMETER_BOUNDS[..]),
                nm_config.clone(),
                || self.is_cancelled(),
            );
            if result.cancelled {
                return Err(ForecastError::Cancelled);
            }

            tracing::debug!(
                start = ?start,
                sse = result.optimal_value,
                iterations = result.iterations,
                converged = result.converged,
                "parameter search finished"
            );

            if !result.optimal_value.is_finite() {
                continue;
            }
            if best.is_some_and(|b| b.sse <= result.optimal_value) {
                continue;
            }
            best = Some(Estimate {
                parameters: SmoothingParameters::from_point(&result.optimal_point),
                sse: result.optimal_value,
                outcome: FitOutcome::Optimized {
                    iterations: result.iterations,
                    converged: result.converged,
                },
            });
        }

        match best {
            Some(estimate) => Ok(estimate),
            None => {
                tracing::warn!(
                    starts = starts.len(),
                    "no starting point produced a finite SSE, trying zero smoothing weights"
                );
                self.fallback(values, period, FallbackReason::NonFiniteObjective)
            }
        }
    }

    fn fallback(&self, values: &[f64], period: usize, reason: FallbackReason) -> Result<Estimate> {
        let parameters = SmoothingParameters::fallback();
        let sse = pass_sse(values, period, &parameters);
        if !sse.is_finite() {
            return Err(ForecastError::FitConvergence(
                "SSE is non-finite for every starting point and for the fallback parameters"
                    .to_string(),
            ));
        }
        Ok(Estimate {
            parameters,
            sse,
            outcome: FitOutcome::Fallback(reason),
        })
    }
}
