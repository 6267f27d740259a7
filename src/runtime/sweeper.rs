//! Optional periodic reclamation.
//!
//! Requests always reclaim before allocating; the sweeper only keeps `/health`
//! and the free set fresh while the service is idle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::core::LeasePool;

/// Spawn a task reclaiming expired leases every `interval` until `shutdown` changes.
pub fn spawn_sweeper(
    pool: Arc<LeasePool>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "lease sweeper started");
        loop {
            tokio::select! {
                () = tokio::time::sleep(interval) => {
                    let reclaimed = pool.reclaim_expired();
                    if !reclaimed.is_empty() {
                        debug!(count = reclaimed.len(), "sweeper reclaimed leases");
                    }
                }
                _ = shutdown.changed() => {
                    info!("lease sweeper shutting down");
                    break;
                }
            }
        }
    })
}
