//! lease-pool: HTTP service handing out time-bounded worker leases.
//!
//! # Usage
//!
//! ```text
//! lease-pool [PORT] [--config pool.json] [--workers a,b,c] [--sweep-interval 30]
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use prometheus_lease_pool::builders::LeasePoolBuilder;
use prometheus_lease_pool::cli::{load_config, Cli};
use prometheus_lease_pool::core::AppResult;
use prometheus_lease_pool::runtime::{serve, spawn_sweeper};
use prometheus_lease_pool::util::init_tracing;

#[tokio::main]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let pool = Arc::new(LeasePoolBuilder::new(cfg.pool.clone()).build()?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = cfg
        .pool
        .sweep_interval_secs
        .map(|secs| spawn_sweeper(Arc::clone(&pool), Duration::from_secs(secs), shutdown_rx));

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    serve(listener, pool, async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    })
    .await?;

    if let Some(handle) = sweeper {
        let _ = handle.await;
    }
    Ok(())
}
