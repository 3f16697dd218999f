//! Filebox Binary
//!
//! Starts the file-reading demo server.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p filebox
//! ```
//!
//! # Environment Variables
//!
//! - `FILEBOX_PORT`: HTTP server port (default: 4000)
//! - `FILEBOX_BASE_DIR`: Base directory for served files (default: ./files)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;

use filebox::{AppState, FileboxConfig, create_router};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!("Starting filebox");

    let config = FileboxConfig::from_env()?;
    tracing::info!(
        port = config.port,
        base_dir = %config.base_dir.display(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(config.base_dir));

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "HTTP server listening");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /read");
    tracing::info!("  POST /read-no-validate");
    tracing::info!("  POST /setup-sample");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Filebox stopped");
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "filebox=info"
                    .parse()
                    .expect("static directive 'filebox=info' is valid"),
            ),
        )
        .init();
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
