//! Service configuration.
//!
//! Loaded from an optional `forecast.toml` in the working directory, then
//! overridden by `HWF__`-prefixed environment variables
//! (`HWF__PORT=8080`, `HWF__SOURCE__SEED=7`).

use super::source::RandomWalkConfig;
use crate::models::holt_winters::{OptimizerConfig, DEFAULT_SEASONAL_PERIOD};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Base name of the optional configuration file.
pub const CONFIG_FILE: &str = "forecast";

/// Prefix of the environment variables that override the file.
pub const ENV_PREFIX: &str = "HWF";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Horizon used when a request does not name one.
    #[serde(default = "default_forecast_length")]
    pub forecast_length: i64,
    /// Largest horizon a request may ask for.
    #[serde(default = "default_max_forecast_length")]
    pub max_forecast_length: i64,
    #[serde(default = "default_seasonal_period")]
    pub seasonal_period: usize,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub source: RandomWalkConfig,
}

fn default_forecast_length() -> i64 {
    10
}

fn default_max_forecast_length() -> i64 {
    10_000
}

fn default_seasonal_period() -> usize {
    DEFAULT_SEASONAL_PERIOD
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7071
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            forecast_length: default_forecast_length(),
            max_forecast_length: default_max_forecast_length(),
            seasonal_period: default_seasonal_period(),
            host: default_host(),
            port: default_port(),
            optimizer: OptimizerConfig::default(),
            source: RandomWalkConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Load from `forecast.toml` (if present) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load from the file `path` (extension optional, may be missing) and the
    /// environment.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Address the HTTP server binds to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<(), String> {
        if self.seasonal_period == 0 {
            return Err("seasonal_period must be positive".to_string());
        }
        if self.forecast_length < 0 {
            return Err(format!(
                "forecast_length must not be negative, got {}",
                self.forecast_length
            ));
        }
        if self.forecast_length > self.max_forecast_length {
            return Err(format!(
                "forecast_length {} exceeds max_forecast_length {}",
                self.forecast_length, self.max_forecast_length
            ));
        }
        let tolerance = self.optimizer.tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err("optimizer.tolerance must be non-negative".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use config::FileFormat;

    #[test]
    fn defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.forecast_length, 10);
        assert_eq!(config.max_forecast_length, 10_000);
        assert_eq!(config.seasonal_period, 12);
        assert_eq!(config.bind_address(), "0.0.0.0:7071");
        assert_eq!(config.source.periods, 100);
        assert_eq!(config.source.seed, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_json_is_default() {
        let config: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn toml_overrides_selected_fields() {
        let toml = r#"
            forecast_length = 5
            seasonal_period = 7
            port = 8080

            [optimizer]
            max_iter = 200

            [source]
            start = "2024-02-01"
            seed = 9
        "#;
        let config: ServiceConfig = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.forecast_length, 5);
        assert_eq!(config.seasonal_period, 7);
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.optimizer.max_iter, 200);
        assert_eq!(config.optimizer.starting_points.len(), 3);
        assert_eq!(
            config.source.start,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
        assert_eq!(config.source.seed, 9);
        assert_eq!(config.source.periods, 100);
    }

    #[test]
    fn validate_rejects_unusable_settings() {
        let config = ServiceConfig {
            seasonal_period: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            forecast_length: -3,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            forecast_length: 20,
            max_forecast_length: 12,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
