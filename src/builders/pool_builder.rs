//! Builder to construct a lease pool from configuration.

use std::sync::Arc;

use crate::config::PoolConfig;
use crate::core::{AuditSink, LeaseError, LeasePool};
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::WorkerId;

/// Assembles a [`LeasePool`] from a [`PoolConfig`] plus optional collaborators.
pub struct LeasePoolBuilder {
    config: PoolConfig,
    clock: Arc<dyn Clock>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl LeasePoolBuilder {
    /// Start from `config` with the system clock and no audit sink.
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            audit: None,
        }
    }

    /// Borrow the configuration.
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Drive expiry from `clock` instead of the system clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Record grants, deferrals and reclamations to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Validate the configuration and build the pool.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::Config`] when the configuration is invalid.
    pub fn build(self) -> Result<LeasePool, LeaseError> {
        self.config
            .validate()
            .map_err(|e| LeaseError::Config(format!("config invalid: {e}")))?;

        let universe = self.config.workers.iter().map(|w| WorkerId::new(w.as_str()));
        let pool = LeasePool::with_clock(universe, self.clock)?;
        tracing::info!(capacity = pool.capacity(), "lease pool initialized");
        Ok(match self.audit {
            Some(audit) => pool.with_audit(audit),
            None => pool,
        })
    }
}
