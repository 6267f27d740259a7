//! Audit sink implementations.
//!
//! The pool records one event per grant, deferral and reclamation batch. Events
//! are recorded after the pool lock has been released, so sinks may receive them
//! out of order; `seq` is assigned under the lock and restores the real order.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;
use crate::util::serde::WorkerId;

/// What happened to the workers named in an [`AuditEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Workers were leased out.
    Grant,
    /// A request could not be satisfied and was told to come back later.
    Defer,
    /// Expired leases were returned to the free set.
    Reclaim,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Grant => "grant",
            Self::Defer => "defer",
            Self::Reclaim => "reclaim",
        })
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Position of the change in the pool's history, strictly increasing per pool.
    pub seq: u64,
    /// Action taken.
    pub action: AuditAction,
    /// Workers involved; empty for deferrals.
    pub workers: Vec<WorkerId>,
    /// Requested amount for grants and deferrals.
    pub amount: Option<usize>,
    /// Lease length in seconds for grants and deferrals.
    pub duration_secs: Option<u64>,
    /// Wall-clock timestamp in milliseconds.
    pub created_at_ms: u128,
}

/// Audit sink abstraction.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
///
/// Clones share the same buffer, so a test can keep one handle while the pool owns another.
#[derive(Clone)]
pub struct InMemoryAuditSink {
    events: Arc<Mutex<VecDeque<AuditEvent>>>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::with_capacity(max_events.min(1024)))),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

/// Helper to build an audit event stamped with a fresh id and the current wall-clock time.
pub fn build_audit_event(
    seq: u64,
    action: AuditAction,
    workers: Vec<WorkerId>,
    amount: Option<usize>,
    duration_secs: Option<u64>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        seq,
        action,
        workers,
        amount,
        duration_secs,
        created_at_ms: now_ms(),
    }
}
