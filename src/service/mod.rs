//! Request boundary: turns a JSON body into a forecast response.
//!
//! [`ForecastService`] is transport-neutral; [`http::router`] mounts it on an
//! axum router. Every failure collapses into the same opaque
//! `500 Internal Server Error` response after being logged here.

pub mod config;
pub mod http;
pub mod source;
pub mod wire;

pub use config::ServiceConfig;
pub use source::{RandomWalkConfig, RandomWalkSource, SeriesSource};
pub use wire::{ForecastRequest, ForecastResponse};

use crate::error::ForecastError;
use crate::models::holt_winters::HoltWinters;
use crate::models::Forecaster;
use thiserror::Error;

/// Body of every failed response.
pub const INTERNAL_ERROR_BODY: &str = "Internal Server Error";

/// Failures inside the boundary. Never shown to clients.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("malformed request body: {0}")]
    BadRequest(#[source] serde_json::Error),

    #[error("forecast_length {requested} exceeds the limit of {max}")]
    HorizonTooLong { requested: i64, max: i64 },

    #[error("could not load series: {0}")]
    Source(#[source] ForecastError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error("could not encode response: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("invalid service configuration: {0}")]
    InvalidConfig(String),
}

/// Transport-neutral status of a [`ServiceResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Ok,
    InternalError,
}

impl ResponseStatus {
    pub fn code(self) -> u16 {
        match self {
            ResponseStatus::Ok => 200,
            ResponseStatus::InternalError => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: ResponseStatus,
    pub body: String,
}

impl ServiceResponse {
    fn ok(body: String) -> Self {
        Self {
            status: ResponseStatus::Ok,
            body,
        }
    }

    fn internal_error() -> Self {
        Self {
            status: ResponseStatus::InternalError,
            body: INTERNAL_ERROR_BODY.to_string(),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self.status {
            ResponseStatus::Ok => "application/json",
            ResponseStatus::InternalError => "text/plain; charset=utf-8",
        }
    }
}

/// Loads the series, fits Holt-Winters and forecasts, once per request.
///
/// Holds no per-request state, so one instance can serve concurrent
/// requests behind an `Arc`.
pub struct ForecastService {
    config: ServiceConfig,
    source: Box<dyn SeriesSource>,
}

impl std::fmt::Debug for ForecastService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ForecastService {
    pub fn new(config: ServiceConfig, source: impl SeriesSource + 'static) -> Result<Self, ServiceError> {
        config.validate().map_err(ServiceError::InvalidConfig)?;
        Ok(Self {
            config,
            source: Box::new(source),
        })
    }

    /// Service backed by the seeded random walk described in `config.source`.
    pub fn from_config(config: ServiceConfig) -> Result<Self, ServiceError> {
        let source = RandomWalkSource::new(config.source.clone());
        Self::new(config, source)
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Produce a forecast for a parsed request.
    pub fn forecast(&self, request: &ForecastRequest) -> Result<ForecastResponse, ServiceError> {
        let horizon = request.forecast_length.unwrap_or(self.config.forecast_length);
        if horizon > self.config.max_forecast_length {
            return Err(ServiceError::HorizonTooLong {
                requested: horizon,
                max: self.config.max_forecast_length,
            });
        }
        let series = self.source.load().map_err(ServiceError::Source)?;

        let model = HoltWinters::auto(self.config.seasonal_period)
            .with_optimizer(self.config.optimizer.clone())
            .fit(&series)?;
        let result = model.forecast(horizon)?;

        tracing::info!(
            horizon,
            n_obs = series.len(),
            sse = model.sse(),
            "forecast produced"
        );
        Ok(ForecastResponse::from(result))
    }

    /// Handle a raw request body. An empty body counts as `{}`.
    pub fn handle(&self, body: &[u8]) -> ServiceResponse {
        tracing::info!(bytes = body.len(), "forecast request received");
        match self.respond(body) {
            Ok(payload) => ServiceResponse::ok(payload),
            Err(err) => {
                tracing::error!(error = %err, "forecast request failed");
                ServiceResponse::internal_error()
            }
        }
    }

    fn respond(&self, body: &[u8]) -> Result<String, ServiceError> {
        let request = parse_request(body)?;
        let response = self.forecast(&request)?;
        serde_json::to_string(&response).map_err(ServiceError::Encode)
    }
}

fn parse_request(body: &[u8]) -> Result<ForecastRequest, ServiceError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ForecastRequest::default());
    }
    serde_json::from_slice(body).map_err(ServiceError::BadRequest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TimeSeries;
    use chrono::{Duration, TimeZone, Utc};

    fn seasonal_series(n: usize) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let values = (0..n)
            .map(|i| {
                let t = i as f64;
                100.0 + 0.5 * t + 5.0 * (2.0 * std::f64::consts::PI * t / 12.0).sin()
            })
            .collect();
        TimeSeries::from_start(start, Duration::days(1), values).unwrap()
    }

    fn service(n: usize) -> ForecastService {
        ForecastService::new(ServiceConfig::default(), seasonal_series(n)).unwrap()
    }

    #[test]
    fn explicit_length_is_honoured() {
        let response = service(60)
            .forecast(&ForecastRequest {
                forecast_length: Some(4),
            })
            .unwrap();
        assert_eq!(response.forecast_dates.len(), 4);
        assert_eq!(response.forecast_values.len(), 4);
        assert_eq!(response.forecast_dates[0], "2023-03-02");
    }

    #[test]
    fn missing_length_uses_configured_default() {
        let svc = service(60);
        let implicit = svc.forecast(&ForecastRequest::default()).unwrap();
        let explicit = svc
            .forecast(&ForecastRequest {
                forecast_length: Some(10),
            })
            .unwrap();
        assert_eq!(implicit, explicit);
    }

    #[test]
    fn handle_returns_json_on_success() {
        let response = service(60).handle(br#"{"forecast_length": 2}"#);
        assert_eq!(response.status, ResponseStatus::Ok);
        assert_eq!(response.status.code(), 200);
        assert_eq!(response.content_type(), "application/json");

        let payload: ForecastResponse = serde_json::from_str(&response.body).unwrap();
        assert_eq!(payload.forecast_dates, vec!["2023-03-02", "2023-03-03"]);
    }

    #[test]
    fn empty_body_counts_as_empty_object() {
        let response = service(60).handle(b"");
        assert_eq!(response.status, ResponseStatus::Ok);
        let payload: ForecastResponse = serde_json::from_str(&response.body).unwrap();
        assert_eq!(payload.forecast_values.len(), 10);
    }

    #[test]
    fn failures_are_opaque() {
        let svc = service(60);
        let bodies: [&[u8]; 4] = [
            b"not json",
            br#"{"forecast_length": -1}"#,
            br#"{"forecast_length": "5"}"#,
            b"null",
        ];
        for body in bodies {
            let response = svc.handle(body);
            assert_eq!(response.status, ResponseStatus::InternalError);
            assert_eq!(response.status.code(), 500);
            assert_eq!(response.body, INTERNAL_ERROR_BODY);
        }

        // Shorter than two seasonal cycles
        let response = service(20).handle(b"{}");
        assert_eq!(response.status, ResponseStatus::InternalError);
        assert_eq!(response.body, INTERNAL_ERROR_BODY);
    }

    #[test]
    fn errors_keep_their_cause() {
        let svc = service(20);
        assert!(matches!(
            svc.forecast(&ForecastRequest::default()),
            Err(ServiceError::Forecast(ForecastError::InsufficientData { .. }))
        ));
        assert!(matches!(
            parse_request(b"{"),
            Err(ServiceError::BadRequest(_))
        ));
    }

    #[test]
    fn horizon_above_limit_is_rejected() {
        let config = ServiceConfig {
            max_forecast_length: 30,
            ..Default::default()
        };
        let svc = ForecastService::new(config, seasonal_series(60)).unwrap();

        let at_limit = svc.forecast(&ForecastRequest {
            forecast_length: Some(30),
        });
        assert_eq!(at_limit.unwrap().forecast_values.len(), 30);

        assert!(matches!(
            svc.forecast(&ForecastRequest {
                forecast_length: Some(31),
            }),
            Err(ServiceError::HorizonTooLong {
                requested: 31,
                max: 30
            })
        ));

        let response = svc.handle(br#"{"forecast_length": 90000000}"#);
        assert_eq!(response.status, ResponseStatus::InternalError);
        assert_eq!(response.body, INTERNAL_ERROR_BODY);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = ServiceConfig {
            seasonal_period: 0,
            ..Default::default()
        };
        assert!(matches!(
            ForecastService::new(config, seasonal_series(30)),
            Err(ServiceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn from_config_uses_random_walk() {
        let svc = ForecastService::from_config(ServiceConfig::default()).unwrap();
        let response = svc.forecast(&ForecastRequest::default()).unwrap();
        assert_eq!(response.forecast_dates.first().map(String::as_str), Some("2023-04-11"));
        assert!(response.forecast_values.iter().all(|v| v.is_finite()));
    }
}
