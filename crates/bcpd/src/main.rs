//! bcpd - HTTP server for the BCP wizard
//!
//! Serves the staged-write API the wizard saves into and the report
//! endpoints the report view reads from. Storage is a single SQLite
//! file opened once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use bcp_core::Database;

mod error;
mod routes;

/// BCP plan capture and reporting server
#[derive(Parser)]
#[command(name = "bcpd")]
#[command(about = "Continuity-plan capture and reporting server", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "BCPD_BIND", default_value = "127.0.0.1:3001")]
    bind: String,

    /// Path to the SQLite database file
    #[arg(long, env = "BCPD_DATABASE", default_value = "bcp_database.db")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr: SocketAddr = cli
        .bind
        .parse()
        .with_context(|| format!("invalid bind address: {}", cli.bind))?;

    let db = Arc::new(
        Database::new(&cli.database)
            .with_context(|| format!("failed to open database at {}", cli.database.display()))?,
    );
    info!(database = %cli.database.display(), "Connected to SQLite database");

    let app = routes::router(db);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
