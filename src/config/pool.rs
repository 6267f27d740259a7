//! Pool and server configuration structures.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::port`].
pub const ENV_PORT: &str = "LEASE_POOL_PORT";
/// Environment variable overriding [`PoolConfig::workers`] (comma-separated).
pub const ENV_WORKERS: &str = "LEASE_POOL_WORKERS";
/// Environment variable overriding [`PoolConfig::sweep_interval_secs`].
pub const ENV_SWEEP_SECS: &str = "LEASE_POOL_SWEEP_SECS";

/// Port used when none is configured.
pub const DEFAULT_PORT: u16 = 8080;

/// The stock universe: `192.168.0.101` through `192.168.0.110`.
pub fn default_workers() -> Vec<String> {
    (101..=110).map(|i| format!("192.168.0.{i}")).collect()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Worker identities making up the pool, in initial allocation order.
    #[serde(default = "default_workers")]
    pub workers: Vec<String>,
    /// Interval of the background sweep that reclaims expired leases.
    /// `None` keeps reclamation purely request-driven.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            sweep_interval_secs: None,
        }
    }
}

impl PoolConfig {
    /// Validate pool configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.workers.is_empty() {
            return Err("at least one worker must be defined".into());
        }
        let mut seen = HashSet::new();
        for worker in &self.workers {
            if worker.trim().is_empty() {
                return Err("worker identities must not be blank".into());
            }
            if !seen.insert(worker.as_str()) {
                return Err(format!("worker `{worker}` is listed more than once"));
            }
        }
        if self.sweep_interval_secs == Some(0) {
            return Err("sweep_interval_secs must be greater than 0".into());
        }
        Ok(())
    }
}

/// Root server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the HTTP listener binds on all interfaces.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Pool settings.
    #[serde(default)]
    pub pool: PoolConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            pool: PoolConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Validate the server and its pool.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.pool.validate().map_err(|e| format!("pool invalid: {e}"))
    }

    /// Parse server configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse or validation failure.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg = Self::parse_json_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse server configuration from a JSON string without validating it.
    ///
    /// Callers that layer further overrides on top must call [`ServerConfig::validate`]
    /// once they are done.
    ///
    /// # Errors
    ///
    /// Returns a description of the parse failure.
    pub fn parse_json_str(input: &str) -> Result<Self, String> {
        serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))
    }

    /// Defaults overridden by `LEASE_POOL_*` environment variables, then validated.
    ///
    /// # Errors
    ///
    /// Returns a description of an unparsable variable or a validation failure.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an explicit variable source.
    ///
    /// # Errors
    ///
    /// Returns a description of an unparsable variable or a validation failure.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cfg = Self::parse_lookup(lookup)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults overridden by `LEASE_POOL_*` variables from `lookup`, not validated.
    ///
    /// # Errors
    ///
    /// Returns a description of the first variable that does not parse.
    pub fn parse_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(port) = lookup(ENV_PORT) {
            cfg.port = port
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_PORT}: {e}"))?;
        }
        if let Some(workers) = lookup(ENV_WORKERS) {
            cfg.pool.workers = split_workers(&workers);
        }
        if let Some(secs) = lookup(ENV_SWEEP_SECS) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_SWEEP_SECS}: {e}"))?;
            cfg.pool.sweep_interval_secs = Some(secs);
        }
        Ok(cfg)
    }
}

/// Split a comma-separated worker list, dropping surrounding whitespace and empty items.
pub fn split_workers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
