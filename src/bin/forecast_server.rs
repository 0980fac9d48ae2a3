//! HTTP server exposing `POST /api/forecast`.

use anyhow::Context;
use hw_forecast::service::{http, ForecastService, ServiceConfig};
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hw_forecast=info,forecast_server=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::load().context("failed to load configuration")?;
    let addr = config.bind_address();
    tracing::info!(
        seasonal_period = config.seasonal_period,
        forecast_length = config.forecast_length,
        "configuration loaded"
    );

    let service = ForecastService::from_config(config)?;
    let app = http::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, route = http::FORECAST_ROUTE, "forecast server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
