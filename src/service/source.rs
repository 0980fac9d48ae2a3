//! Where the service gets the series it forecasts from.

use crate::core::TimeSeries;
use crate::error::Result;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Supplies the training series for each request.
pub trait SeriesSource: Send + Sync {
    fn load(&self) -> Result<TimeSeries>;
}

/// A fixed series is its own source.
impl SeriesSource for TimeSeries {
    fn load(&self) -> Result<TimeSeries> {
        Ok(self.clone())
    }
}

/// Settings for [`RandomWalkSource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomWalkConfig {
    /// Date of the first observation.
    pub start: NaiveDate,
    /// Number of daily observations.
    pub periods: usize,
    pub seed: u64,
}

impl Default for RandomWalkConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            periods: 100,
            seed: 0,
        }
    }
}

/// Daily Gaussian random walk, reproducible for a given seed.
#[derive(Debug, Clone)]
pub struct RandomWalkSource {
    config: RandomWalkConfig,
}

impl RandomWalkSource {
    pub fn new(config: RandomWalkConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RandomWalkConfig {
        &self.config
    }
}

impl SeriesSource for RandomWalkSource {
    fn load(&self) -> Result<TimeSeries> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let values: Vec<f64> = (0..self.config.periods)
            .scan(0.0, |walk, _| {
                let step: f64 = rng.sample(StandardNormal);
                *walk += step;
                Some(*walk)
            })
            .collect();

        let start = Utc.from_utc_datetime(&self.config.start.and_time(NaiveTime::MIN));
        tracing::debug!(
            periods = values.len(),
            seed = self.config.seed,
            start = %self.config.start,
            "generated random-walk series"
        );
        TimeSeries::from_start(start, Duration::days(1), values)
    }
}
