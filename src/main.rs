//! Kraken market-data recorder
//!
//! Records order book and trade data from the venue's v2 WebSocket
//! stream and publishes the decoded objects to downstream consumers
//! over a Unix socket.

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kraken_recorder::{AppState, Config, Metrics, Publisher, SessionManager};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("starting market-data recorder");

    let config = Arc::new(Config::load()?);
    info!(
        endpoint = %config.ws_endpoint,
        book_depth = ?config.book_depth,
        num_filtered = config.pair_filter.len(),
        "configuration loaded"
    );

    let metrics = Arc::new(Metrics::new()?);
    metrics.register(prometheus::default_registry())?;

    let state = Arc::new(AppState {
        config: config.clone(),
        metrics: metrics.clone(),
    });

    // Publisher task drains the record channel.
    let (publish_tx, publish_rx) = mpsc::unbounded_channel();
    let publisher = Publisher::new(&config.publish_socket_path);
    tokio::spawn(publisher.run(publish_rx));

    // Health/metrics server.
    let health_state = state.clone();
    tokio::spawn(async move {
        if let Err(e) = start_health_server(health_state).await {
            warn!(error = %e, "health server error");
        }
    });

    // Ctrl-C flips the shutdown flag; the session manager drains out.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let mut manager = SessionManager::new(config, metrics, publish_tx, shutdown_rx);
    manager.run().await?;

    info!("recorder stopped");
    Ok(())
}

/// HTTP server for health checks and Prometheus scraping
async fn start_health_server(state: Arc<AppState>) -> anyhow::Result<()> {
    use std::net::SocketAddr;

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics));

    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.health_port));
    info!(addr = %addr, "starting health server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "component": "kraken-recorder",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn metrics() -> String {
    use prometheus::{Encoder, TextEncoder};
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
