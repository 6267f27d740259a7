//! Tests for builder modules

use std::sync::Arc;

use prometheus_lease_pool::builders::LeasePoolBuilder;
use prometheus_lease_pool::config::PoolConfig;
use prometheus_lease_pool::core::{AuditAction, InMemoryAuditSink, LeaseError, LeaseRequest};

#[test]
fn test_pool_builder_defaults() {
    let builder = LeasePoolBuilder::new(PoolConfig::default());
    assert_eq!(builder.config().workers.len(), 10);
    assert_eq!(builder.config().sweep_interval_secs, None);

    let pool = builder.build().unwrap();
    assert_eq!(pool.capacity(), 10);
    assert_eq!(pool.snapshot().free, 10);
}

#[test]
fn test_pool_builder_rejects_invalid_config() {
    let config = PoolConfig {
        workers: vec!["a".into(), "a".into()],
        sweep_interval_secs: None,
    };
    let err = LeasePoolBuilder::new(config).build().unwrap_err();
    assert!(matches!(err, LeaseError::Config(msg) if msg.contains("config invalid")));
}

#[test]
fn test_pool_builder_wires_audit() {
    let sink = InMemoryAuditSink::new(16);
    let config = PoolConfig {
        workers: vec!["a".into(), "b".into()],
        sweep_interval_secs: None,
    };
    let pool = LeasePoolBuilder::new(config)
        .with_audit(Arc::new(sink.clone()))
        .build()
        .unwrap();

    pool.lease(&LeaseRequest::new(1, 60).unwrap());
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action, AuditAction::Grant);
    assert_eq!(events[0].amount, Some(1));
    assert_eq!(events[0].duration_secs, Some(60));
}
