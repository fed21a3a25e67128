// SPDX-License-Identifier: BUSL-1.1
//! # metering-mock: Binary Entry Point
//!
//! Loads configuration from the environment, then serves the mock
//! metering API until Ctrl-C or SIGTERM. Exits non-zero if configuration
//! is invalid or the listener cannot bind.

use metering_mock::{AppState, StubConfig};
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();
    tracing::debug!("logger initialized");

    let config = StubConfig::from_env().map_err(|e| {
        tracing::error!("failed to load configuration from the environment: {e}");
        e
    })?;
    tracing::debug!(
        tokens = config.registration_tokens.len(),
        metering_mode = %config.metering_mode,
        "configured"
    );

    let addr = config.listen_addr();
    let app = metering_mock::app(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!("failed to bind {addr}: {e}");
        e
    })?;
    tracing::info!("metering-mock listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("metering-mock shut down");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C signal"),
        () = terminate => tracing::info!("received SIGTERM signal"),
    }
}
