use anyhow::Context;
use axum::extract::State;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

mod api;
mod app_env;
mod domain;
mod dto;
mod external_connections;
mod logging;
mod persistence;
mod routing_utils;

/// Data every request handler can reach through the router's state
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Axum extractor for the router's [SharedData]
pub type AppState = State<Arc<SharedData>>;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let dotenv_loaded = dotenv().is_ok();

    let otel_exporters = match (
        env::var(app_env::OTEL_SPAN_EXPORT_URL),
        env::var(app_env::OTEL_METRIC_EXPORT_URL),
    ) {
        (Ok(span_url), Ok(metric_url)) => {
            Some(logging::init_exporters(&span_url, &metric_url)?)
        }
        _ => None,
    };
    let otel_enabled = otel_exporters.is_some();
    logging::setup_logging_and_tracing(logging::init_env_filter()?, otel_exporters);

    if !dotenv_loaded {
        info!("No .env file found, using the process environment only.");
    }
    if !otel_enabled {
        warn!("OpenTelemetry export URLs are not set, spans and metrics will not be exported.");
    }

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set to reach the database", app_env::DB_URL))?;
    let listen_addr =
        env::var(app_env::LISTEN_ADDR).unwrap_or_else(|_| app_env::DEFAULT_LISTEN_ADDR.to_owned());

    let db_pool = persistence::connect_sqlx(&db_url).await?;
    persistence::migrate(&db_pool).await?;

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db_pool.clone()),
    });
    let router = api::build_router(shared_data);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("Binding to {listen_addr}"))?;
    info!("Starting server on {listen_addr}.");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Serving HTTP requests")?;

    info!("Server stopped, closing database connections.");
    db_pool.close().await;
    opentelemetry::global::shutdown_tracer_provider();

    Ok(())
}

/// Resolves once the process is asked to stop with Ctrl+C
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Could not listen for the shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
