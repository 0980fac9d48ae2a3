//! Smoothing parameters for the additive Holt-Winters recurrence.

use crate::error::{ForecastError, Result};

/// Box constraints shared by alpha, beta and gamma.
pub(crate) const PARAMETER_BOUNDS: [(f64, f64); 3] = [(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)];

/// Level, trend and seasonal smoothing weights, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParameters {
    alpha: f64,
    beta: f64,
    gamma: f64,
}

impl SmoothingParameters {
    /// Starting point for parameter search.
    pub const INITIAL_GUESS: [f64; 3] = [0.3, 0.1, 0.1];

    /// Create validated parameters.
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        for (name, value) in [("alpha", alpha), ("beta", beta), ("gamma", gamma)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ForecastError::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(Self { alpha, beta, gamma })
    }

    /// Parameters that freeze every component: no smoothing at all.
    ///
    /// Used when the series carries no signal to fit or when no candidate
    /// produced a finite error.
    pub const fn fallback() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            gamma: 0.0,
        }
    }

    /// Build from an optimizer point, clamping into the unit box.
    pub(crate) fn from_point(point: &[f64]) -> Self {
        let get = |i: usize| point.get(i).copied().unwrap_or(0.0).clamp(0.0, 1.0);
        Self {
            alpha: get(0),
            beta: get(1),
            gamma: get(2),
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.alpha, self.beta, self.gamma]
    }
}

impl Default for SmoothingParameters {
    fn default() -> Self {
        let [alpha, beta, gamma] = Self::INITIAL_GUESS;
        Self { alpha, beta, gamma }
    }
}
