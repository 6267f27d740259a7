//! Command-line surface of the `lease-pool` binary.
//!
//! Settings are layered: defaults, then either a JSON file or `LEASE_POOL_*`
//! variables, then command-line flags. Validation runs once on the merged result,
//! so a flag can repair a value that would be rejected on its own.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use crate::config::{split_workers, ServerConfig};
use crate::core::AppResult;

/// Parsed command line.
#[derive(Debug, Default, Parser)]
#[command(name = "lease-pool", about = "Lease a fixed pool of workers for bounded time")]
pub struct Cli {
    /// Port to listen on (overrides config and LEASE_POOL_PORT).
    pub port: Option<u16>,

    /// JSON configuration file; environment variables are ignored when given.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Comma-separated worker identities.
    #[arg(long, value_delimiter = ',')]
    pub workers: Option<Vec<String>>,

    /// Reclaim expired leases in the background every N seconds.
    #[arg(long)]
    pub sweep_interval: Option<u64>,
}

impl Cli {
    fn apply(&self, cfg: &mut ServerConfig) {
        if let Some(port) = self.port {
            cfg.port = port;
        }
        if let Some(workers) = &self.workers {
            cfg.pool.workers = split_workers(&workers.join(","));
        }
        if let Some(secs) = self.sweep_interval {
            cfg.pool.sweep_interval_secs = Some(secs);
        }
    }
}

/// Resolve the effective configuration from the process environment and `cli`.
///
/// # Errors
///
/// Fails when the config file cannot be read or parsed, a variable does not
/// parse, or the merged configuration is invalid.
pub fn load_config(cli: &Cli) -> AppResult<ServerConfig> {
    load_config_with(cli, |key| std::env::var(key).ok())
}

/// Same as [`load_config`] with an explicit variable source.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_config_with<F>(cli: &Cli, lookup: F) -> AppResult<ServerConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            ServerConfig::parse_json_str(&raw).map_err(anyhow::Error::msg)?
        }
        None => ServerConfig::parse_lookup(lookup).map_err(anyhow::Error::msg)?,
    };
    cli.apply(&mut cfg);
    cfg.validate().map_err(anyhow::Error::msg)?;
    Ok(cfg)
}
