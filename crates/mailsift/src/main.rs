//! `mailsift` - web utility for maintaining email address lists
//!
//! Serves the list operations of `mailsift-core` over HTTP, one namespace
//! directory per uploaded list.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod routes;
mod view;

use anyhow::{Context, Result};
use mailsift_core::Workspace;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailsift=info,mailsift_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting mailsift");

    let config = Config::load().await?;
    let default_namespace = config.default_namespace()?;
    let workspace = Workspace::new(&config.uploads_root);

    tokio::fs::create_dir_all(workspace.root())
        .await
        .with_context(|| {
            format!(
                "Failed to create uploads root {}",
                workspace.root().display()
            )
        })?;

    let app = routes::router(
        AppState::new(workspace, default_namespace),
        config.max_upload_bytes,
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    info!(
        addr = %config.listen_addr,
        uploads = %config.uploads_root.display(),
        "Listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
