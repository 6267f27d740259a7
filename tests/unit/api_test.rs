//! Tests for API request/response models

use std::time::Duration;

use prometheus_lease_pool::core::{LeaseError, LeaseOutcome, LeasePool};
use prometheus_lease_pool::runtime::{health, submit_lease, LeaseQuery, LeaseResponse};
use prometheus_lease_pool::util::WorkerId;

fn query(amount: &str, duration: &str) -> LeaseQuery {
    LeaseQuery {
        amount: Some(amount.to_string()),
        duration: Some(duration.to_string()),
    }
}

fn pool(n: usize) -> LeasePool {
    LeasePool::new((0..n).map(|i| WorkerId::new(format!("w{i}")))).unwrap()
}

#[test]
fn test_granted_response_shape() {
    let resp = LeaseResponse::from(LeaseOutcome::Granted(vec!["a".into(), "b".into()]));
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json, serde_json::json!({ "slaves": ["a", "b"] }));
}

#[test]
fn test_deferred_response_truncates_seconds() {
    let resp = LeaseResponse::from(LeaseOutcome::Deferred {
        retry_after: Some(Duration::from_millis(4900)),
    });
    let json = serde_json::to_value(&resp).unwrap();
    assert_eq!(json, serde_json::json!({ "slaves": [], "come_back": 4 }));
}

#[test]
fn test_deferred_without_estimate_reports_zero() {
    let resp = LeaseResponse::from(LeaseOutcome::Deferred { retry_after: None });
    assert_eq!(resp.come_back_secs, Some(0));
    assert!(resp.workers.is_empty());
}

#[test]
fn test_submit_lease_validates_before_pool() {
    let pool = pool(3);
    for (amount, duration) in [("0", "5"), ("11", "5"), ("2", "0"), ("x", "5")] {
        assert!(submit_lease(&pool, &query(amount, duration)).is_err());
    }
    assert_eq!(pool.snapshot().free, 3);

    let err = submit_lease(&pool, &LeaseQuery::default()).unwrap_err();
    assert!(matches!(err, LeaseError::AmountOutOfRange { got: 0, .. }));
}

#[test]
fn test_submit_lease_grants_then_defers() {
    let pool = pool(3);

    let first = submit_lease(&pool, &query("2", "60")).unwrap();
    assert_eq!(first.workers, vec![WorkerId::from("w0"), WorkerId::from("w1")]);
    assert_eq!(first.come_back_secs, None);

    let second = submit_lease(&pool, &query("2", "60")).unwrap();
    assert!(second.workers.is_empty());
    let come_back = second.come_back_secs.unwrap();
    assert!((58..=60).contains(&come_back), "come_back = {come_back}");
}

#[test]
fn test_amount_beyond_capacity_without_leases() {
    let pool = pool(3);
    let resp = submit_lease(&pool, &query("5", "10")).unwrap();
    assert!(resp.workers.is_empty());
    assert_eq!(resp.come_back_secs, Some(0));
}

#[test]
fn test_health_reports_counts() {
    let pool = pool(4);
    submit_lease(&pool, &query("3", "60")).unwrap();

    let h = health(&pool);
    assert!(h.ok);
    assert_eq!(h.pool.capacity, 4);
    assert_eq!(h.pool.free, 1);
    assert_eq!(h.pool.leased, 3);

    let json = serde_json::to_value(&h).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "ok": true, "capacity": 4, "free": 1, "leased": 3 })
    );
}

#[test]
fn test_query_from_pairs_keeps_first_value() {
    let pairs = [("amount", "3"), ("extra", "y"), ("amount", "7"), ("duration", "20")]
        .map(|(k, v)| (k.to_string(), v.to_string()));
    let query = LeaseQuery::from_pairs(pairs);
    assert_eq!(query.amount.as_deref(), Some("3"));
    assert_eq!(query.duration.as_deref(), Some("20"));

    let empty = LeaseQuery::from_pairs(Vec::new());
    assert!(empty.amount.is_none() && empty.duration.is_none());
}
