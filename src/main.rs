use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use client_service::delivery::HttpDeliveryClient;
use client_service::{AppState, config, db, serve};

/// Client records service
#[derive(Parser, Debug)]
#[command(name = "client_service", version, about)]
struct Cli {
    /// Address to listen on, overrides BIND_ADDR
    #[arg(long)]
    bind: Option<String>,

    /// Do not apply database migrations on startup
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = config::init()?;
    tracing::info!("Initializing client service...");

    // Initialize database connection
    let db = db::init(&config, config.run_migrations && !cli.skip_migrations).await?;
    tracing::info!("Database connection established");

    let delivery = HttpDeliveryClient::new(config.delivery_base_url(), config.delivery_timeout())?;
    tracing::info!("Delivery service at {}", delivery.base_url());

    let state = AppState::new(Arc::new(db), Arc::new(delivery));
    let addr = cli.bind.unwrap_or_else(|| config.bind_addr.clone());

    serve(&addr, state, shutdown_signal()).await?;

    tracing::info!("Client service stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
