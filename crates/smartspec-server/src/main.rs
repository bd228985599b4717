//! smartspec-server - HTTP analysis endpoint binary.

use std::sync::Arc;

use smartspec_geometry::Extractor;
use smartspec_server::{
    create_server, AnalysisService, AppState, DirectorySource, MemoryStore, ServerConfig,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr()?;
    info!(
        upload_dir = %config.upload_dir.display(),
        max_file_bytes = config.max_file_bytes,
        fill_fraction = config.estimator.fill_fraction,
        min_height_clamp = config.estimator.min_height_clamp,
        "loaded configuration"
    );

    let source = DirectorySource::new(config.upload_dir.clone(), config.max_file_bytes);
    let extractor = Extractor::with_config(config.estimator)?;
    let service = AnalysisService::new(Arc::new(source), Arc::new(MemoryStore::new()), extractor);
    let app = create_server(AppState::new(service));

    info!("Starting smartspec-server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            info!("Shutdown signal received");
        })
        .await?;

    info!("Server stopped cleanly");
    Ok(())
}
