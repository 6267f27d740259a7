//! # Prometheus Lease Pool
//!
//! A time-bounded lease allocator for a fixed pool of interchangeable workers.
//!
//! Clients ask for `N` workers for `D` seconds. The pool either hands out exactly
//! `N` identities at once or hands out nothing and estimates how long until `N`
//! leased workers will have come back. Leases are never renewed; they expire and
//! are reclaimed lazily at the start of the next request.
//!
//! ## Key Features
//!
//! - **All-or-nothing grants**: a request is satisfied in full or not at all
//! - **Admission cap**: no single request may claim more than ten workers
//! - **Lazy reclamation**: expired leases return to the pool on demand, with an optional sweep
//! - **Wait estimates**: deferred callers learn when to poll again
//! - **Single critical section**: reclaim, allocate and estimate run under one lock per request
//!
//! ## Example
//!
//! ```
//! use prometheus_lease_pool::core::{LeaseOutcome, LeasePool, LeaseRequest};
//! use prometheus_lease_pool::util::WorkerId;
//!
//! let pool = LeasePool::new(["a", "b", "c"].map(WorkerId::from)).unwrap();
//!
//! let outcome = pool.lease(&LeaseRequest::new(2, 30).unwrap());
//! assert_eq!(outcome, LeaseOutcome::Granted(vec!["a".into(), "b".into()]));
//!
//! let outcome = pool.lease(&LeaseRequest::new(2, 30).unwrap());
//! assert!(!outcome.is_granted());
//! ```
//!
//! ## Serving over HTTP
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_lease_pool::builders::LeasePoolBuilder;
//! use prometheus_lease_pool::config::PoolConfig;
//!
//! let pool = Arc::new(LeasePoolBuilder::new(PoolConfig::default()).build()?);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! prometheus_lease_pool::runtime::serve(listener, pool, async {
//!     let _ = tokio::signal::ctrl_c().await;
//! })
//! .await?;
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core lease accounting, admission control and audit.
pub mod core;
/// Configuration models for the pool and server.
pub mod config;
/// Builders to construct pools from configuration.
pub mod builders;
/// Runtime adapters: HTTP surface and background sweep.
pub mod runtime;
/// Shared utilities.
pub mod util;
/// Command-line parsing and layered configuration loading for the binary.
pub mod cli;
