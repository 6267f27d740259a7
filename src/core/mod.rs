//! Core lease accounting, admission control and audit.

pub mod audit;
pub mod error;
pub mod lease_pool;
pub mod request;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use error::{AppResult, LeaseError};
pub use lease_pool::{LeaseOutcome, LeasePool, PoolSnapshot, PoolState};
pub use request::{LeaseRequest, MAX_LEASE_AMOUNT, MAX_LEASE_SECS};
