//! JSON request and response payloads.

use crate::core::ForecastResult;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of a forecast request. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Number of steps to forecast; the service default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast_length: Option<i64>,
}

/// Successful forecast payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub forecast_dates: Vec<String>,
    pub forecast_values: Vec<f64>,
}

impl From<ForecastResult> for ForecastResponse {
    fn from(result: ForecastResult) -> Self {
        let (dates, values) = result.into_parts();
        Self {
            forecast_dates: dates.iter().map(format_timestamp).collect(),
            forecast_values: values,
        }
    }
}

/// Midnight timestamps render as `YYYY-MM-DD`, anything else as RFC 3339.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.time() == NaiveTime::MIN {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.to_rfc3339()
    }
}
