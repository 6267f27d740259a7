//! Tests for utility functions

use std::time::Duration;

use prometheus_lease_pool::util::{Clock, ManualClock, WorkerId};

#[test]
fn test_worker_id_is_transparent() {
    let id = WorkerId::from("192.168.0.101");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"192.168.0.101\"");

    let back: WorkerId = serde_json::from_str("\"node-7\"").unwrap();
    assert_eq!(back.as_str(), "node-7");
    assert_eq!(back.to_string(), "node-7");
}

#[test]
fn test_worker_id_ordering() {
    let mut ids = vec![WorkerId::from("b"), WorkerId::from("a")];
    ids.sort();
    assert_eq!(ids, vec![WorkerId::from("a"), WorkerId::from("b")]);
}

#[test]
fn test_manual_clock_advance() {
    let clock = ManualClock::default();
    let start = clock.now();
    clock.advance(Duration::from_secs(3));
    clock.advance(Duration::from_millis(250));
    assert_eq!(clock.now().duration_since(start), Duration::from_millis(3250));
}
