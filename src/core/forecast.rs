//! Forecast result structure for holding dated predictions.

use chrono::{DateTime, Utc};

/// Projected values paired with the timestamps they apply to.
///
/// `dates` and `values` always have the same length, which equals the
/// requested horizon.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastResult {
    dates: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl ForecastResult {
    /// Create an empty forecast.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a result from `(timestamp, value)` pairs.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let (dates, values) = pairs.into_iter().unzip();
        Self { dates, values }
    }

    /// Get the forecast horizon (number of steps).
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over `(timestamp, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Consume the result, returning dates and values.
    pub fn into_parts(self) -> (Vec<DateTime<Utc>>, Vec<f64>) {
        (self.dates, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn forecast_empty_state() {
        let forecast = ForecastResult::new();
        assert!(forecast.is_empty());
        assert_eq!(forecast.horizon(), 0);
        assert!(forecast.dates().is_empty());
    }

    #[test]
    fn forecast_from_pairs_keeps_order_and_length() {
        let base = Utc.with_ymd_and_hms(2023, 4, 10, 0, 0, 0).unwrap();
        let forecast = ForecastResult::from_pairs(
            (1..=3).map(|k| (base + Duration::days(k), k as f64 * 1.5)),
        );

        assert_eq!(forecast.horizon(), 3);
        assert_eq!(forecast.dates().len(), forecast.values().len());
        assert_eq!(forecast.values(), &[1.5, 3.0, 4.5]);
        assert_eq!(forecast.dates()[0], base + Duration::days(1));

        let pairs: Vec<_> = forecast.iter().collect();
        assert_eq!(pairs[2], (base + Duration::days(3), 4.5));

        let (dates, values) = forecast.into_parts();
        assert_eq!(dates.len(), 3);
        assert_eq!(values.len(), 3);
    }
}
