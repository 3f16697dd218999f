//! Fastbank Binary
//!
//! Starts the toy banking demo server.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p fastbank
//! ```
//!
//! # Environment Variables
//!
//! - `FASTBANK_PORT`: HTTP server port (default: 4000)
//! - `FASTBANK_VARIANT`: "insecure" | "hardened" (default: hardened)
//! - `RUST_LOG`: Log level (default: info)

use std::net::SocketAddr;

use fastbank::{AppState, FastbankConfig, create_router};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    init_tracing();

    tracing::info!("Starting fastbank");

    let config = FastbankConfig::from_env()?;
    tracing::info!(
        port = config.port,
        variant = config.variant.as_str(),
        "Configuration loaded"
    );
    if config.variant.is_insecure() {
        tracing::warn!("Running the INSECURE variant; this server is deliberately vulnerable");
    }

    let state = AppState::new(config.variant)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "HTTP server listening");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  POST /login");
    tracing::info!("  GET  /me");
    tracing::info!("  GET  /transactions");
    tracing::info!("  POST /feedback");
    tracing::info!("  GET  /feedback");
    tracing::info!("  POST /change-email");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Fastbank stopped");
    Ok(())
}

/// Initialize the tracing subscriber with environment filter.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "fastbank=info"
                    .parse()
                    .expect("static directive 'fastbank=info' is valid"),
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
