//! axum adapter for [`ForecastService`].

use super::{ForecastService, ResponseStatus, ServiceResponse, INTERNAL_ERROR_BODY};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use std::sync::Arc;

/// Path the forecast endpoint is mounted on.
pub const FORECAST_ROUTE: &str = "/api/forecast";

/// Build the route table for `service`.
pub fn router(service: Arc<ForecastService>) -> Router {
    Router::new()
        .route(FORECAST_ROUTE, post(forecast))
        .with_state(service)
}

async fn forecast(State(service): State<Arc<ForecastService>>, body: Bytes) -> Response {
    // Fitting is CPU-bound; keep it off the async workers
    match tokio::task::spawn_blocking(move || service.handle(&body)).await {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "forecast task panicked or was cancelled");
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
        }
    }
}

impl IntoResponse for ServiceResponse {
    fn into_response(self) -> Response {
        let status = match self.status {
            ResponseStatus::Ok => StatusCode::OK,
            ResponseStatus::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, [(header::CONTENT_TYPE, self.content_type())], self.body).into_response()
    }
}
