//! Projection of a fitted Holt-Winters model beyond the training data.

use super::model::FittedModel;
use crate::core::ForecastResult;
use crate::error::{ForecastError, Result};
use crate::models::Forecaster;
use chrono::{DateTime, Utc};
use std::iter::FusedIterator;

/// Lazy `(timestamp, value)` projections `k = 1..=horizon` from a fitted model.
///
/// Borrowing the model keeps it unchanged; calling
/// [`FittedModel::projections`] again restarts the sequence.
#[derive(Debug, Clone)]
pub struct Projections<'a> {
    model: &'a FittedModel,
    next_step: usize,
    horizon: usize,
}

impl Iterator for Projections<'_> {
    type Item = (DateTime<Utc>, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_step > self.horizon {
            return None;
        }
        let k = self.next_step;
        self.next_step += 1;

        // `projections` checked that the last step's timestamp is representable
        let offset = self.model.interval() * k as i32;
        let date = self.model.last_timestamp() + offset;
        let value = self.model.final_state().project(self.model.n_obs(), k);
        Some((date, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.horizon + 1).saturating_sub(self.next_step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Projections<'_> {}

impl FusedIterator for Projections<'_> {}

impl FittedModel {
    /// Lazily project `horizon` steps past the last training observation.
    ///
    /// Fails with `InvalidHorizon` if the final timestamp would not be
    /// representable.
    pub fn projections(&self, horizon: usize) -> Result<Projections<'_>> {
        let too_far = || ForecastError::InvalidHorizon(i64::try_from(horizon).unwrap_or(i64::MAX));
        let steps = i32::try_from(horizon).map_err(|_| too_far())?;
        self.interval()
            .checked_mul(steps)
            .and_then(|offset| self.last_timestamp().checked_add_signed(offset))
            .ok_or_else(too_far)?;

        Ok(Projections {
            model: self,
            next_step: 1,
            horizon,
        })
    }
}

impl Forecaster for FittedModel {
    fn forecast(&self, horizon: i64) -> Result<ForecastResult> {
        let steps = usize::try_from(horizon).map_err(|_| ForecastError::InvalidHorizon(horizon))?;
        Ok(ForecastResult::from_pairs(self.projections(steps)?))
    }

    fn name(&self) -> &str {
        "HoltWinters(additive)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use crate::models::holt_winters::HoltWinters;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn periodic_model(n: usize) -> (TimeSeries, FittedModel) {
        let pattern = [2.0, 4.0, 8.0, 6.0];
        let values: Vec<f64> = (0..n).map(|i| 10.0 + pattern[i % 4]).collect();
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let series = TimeSeries::from_start(start, Duration::days(1), values).unwrap();
        let model = HoltWinters::auto(4).fit(&series).unwrap();
        (series, model)
    }

    #[test]
    fn forecast_length_and_dates() {
        let (series, model) = periodic_model(18);
        let forecast = model.forecast(6).unwrap();

        assert_eq!(forecast.horizon(), 6);
        let expected: Vec<_> = (1..=6)
            .map(|k| series.last_timestamp() + Duration::days(k))
            .collect();
        assert_eq!(forecast.dates(), expected.as_slice());
    }

    #[test]
    fn forecast_continues_seasonal_phase() {
        // 18 observations: the next step is phase 18 % 4 = 2
        let (_, model) = periodic_model(18);
        let forecast = model.forecast(5).unwrap();

        let expected = [18.0, 16.0, 12.0, 14.0, 18.0];
        for (got, want) in forecast.values().iter().zip(expected) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_horizon_is_empty() {
        let (_, model) = periodic_model(16);
        let forecast = model.forecast(0).unwrap();
        assert!(forecast.is_empty());
        assert!(forecast.dates().is_empty());
    }

    #[test]
    fn negative_horizon_is_rejected() {
        let (_, model) = periodic_model(16);
        assert!(matches!(
            model.forecast(-1),
            Err(ForecastError::InvalidHorizon(-1))
        ));
    }

    #[test]
    fn unrepresentable_horizon_is_rejected() {
        let (_, model) = periodic_model(16);
        assert!(matches!(
            model.forecast(i64::MAX),
            Err(ForecastError::InvalidHorizon(_))
        ));
    }

    #[test]
    fn projections_are_lazy_and_restartable() {
        let (_, model) = periodic_model(16);
        let mut projections = model.projections(3).unwrap();
        assert_eq!(projections.len(), 3);

        let first = projections.next().unwrap();
        assert_eq!(projections.len(), 2);

        let again = model.projections(3).unwrap().next().unwrap();
        assert_eq!(first, again);

        let all: Vec<_> = model.projections(3).unwrap().collect();
        assert_eq!(all.len(), 3);
        let forecast = model.forecast(3).unwrap();
        assert_eq!(forecast.iter().collect::<Vec<_>>(), all);
    }

    #[test]
    fn forecasting_is_deterministic() {
        let (_, model) = periodic_model(20);
        let snapshot = model.clone();

        let a = model.forecast(9).unwrap();
        let b = model.forecast(9).unwrap();
        assert_eq!(a, b);
        assert_eq!(model, snapshot);
        assert_eq!(model.name(), "HoltWinters(additive)");
    }
}
