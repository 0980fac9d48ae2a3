//! TimeSeries data structure for representing evenly sampled observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// An immutable, evenly spaced, univariate time series.
///
/// Construction validates that timestamps are strictly increasing with a
/// single sampling interval and that every value is finite. Nothing can be
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
    interval: Duration,
}

impl TimeSeries {
    /// Create a new series from parallel timestamp and value vectors.
    ///
    /// Requires at least two observations so the sampling interval can be
    /// inferred.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        if timestamps.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if timestamps.len() < 2 {
            return Err(ForecastError::InsufficientData {
                needed: 2,
                got: timestamps.len(),
            });
        }

        // Strictly increasing on a single grid
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::NonMonotonicTimestamp { index: i });
            }
        }

        let interval = timestamps[1] - timestamps[0];
        for i in 2..timestamps.len() {
            if timestamps[i] - timestamps[i - 1] != interval {
                return Err(ForecastError::NonMonotonicTimestamp { index: i });
            }
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        Ok(Self {
            timestamps,
            values,
            interval,
        })
    }

    /// Create a series that covers at least two cycles of `period`.
    pub fn seasonal(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        period: usize,
    ) -> Result<Self> {
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "seasonal period must be positive".to_string(),
            ));
        }
        let series = Self::new(timestamps, values)?;
        series.ensure_seasonal_coverage(period)?;
        Ok(series)
    }

    /// Create a series starting at `start` with one observation per `interval`.
    pub fn from_start(start: DateTime<Utc>, interval: Duration, values: Vec<f64>) -> Result<Self> {
        if interval <= Duration::zero() {
            return Err(ForecastError::InvalidParameter(
                "sampling interval must be positive".to_string(),
            ));
        }

        let mut timestamps = Vec::with_capacity(values.len());
        let mut current = start;
        for i in 0..values.len() {
            if i > 0 {
                current = current.checked_add_signed(interval).ok_or_else(|| {
                    ForecastError::InvalidParameter("timestamp range overflows".to_string())
                })?;
            }
            timestamps.push(current);
        }

        Self::new(timestamps, values)
    }

    /// Fail with `InsufficientData` unless the series spans two full cycles.
    pub fn ensure_seasonal_coverage(&self, period: usize) -> Result<()> {
        let needed = period.saturating_mul(2);
        if self.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: self.len(),
            });
        }
        Ok(())
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value at `index`.
    pub fn value(&self, index: usize) -> Result<f64> {
        self.values
            .get(index)
            .copied()
            .ok_or(ForecastError::IndexOutOfBounds {
                index,
                size: self.len(),
            })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// The sampling interval inferred from the timestamps.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn first_timestamp(&self) -> DateTime<Utc> {
        self.timestamps[0]
    }

    pub fn last_timestamp(&self) -> DateTime<Utc> {
        self.timestamps[self.timestamps.len() - 1]
    }

    /// Iterate over `(timestamp, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }
}
