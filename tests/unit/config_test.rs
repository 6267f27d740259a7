//! Tests for configuration validation

use std::collections::HashMap;

use prometheus_lease_pool::config::{default_workers, split_workers, PoolConfig, ServerConfig};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn test_default_universe() {
    let workers = default_workers();
    assert_eq!(workers.len(), 10);
    assert_eq!(workers[0], "192.168.0.101");
    assert_eq!(workers[9], "192.168.0.110");
    assert!(PoolConfig::default().validate().is_ok());
}

#[test]
fn test_pool_config_empty_workers() {
    let invalid = PoolConfig {
        workers: Vec::new(),
        sweep_interval_secs: None,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_duplicate_workers() {
    let invalid = PoolConfig {
        workers: vec!["a".into(), "b".into(), "a".into()],
        sweep_interval_secs: None,
    };
    let err = invalid.validate().unwrap_err();
    assert!(err.contains("`a`"));
}

#[test]
fn test_pool_config_blank_worker() {
    let invalid = PoolConfig {
        workers: vec!["a".into(), "  ".into()],
        sweep_interval_secs: None,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pool_config_zero_sweep_interval() {
    let invalid = PoolConfig {
        workers: default_workers(),
        sweep_interval_secs: Some(0),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_server_config_from_json() {
    let json = r#"{
        "port": 9000,
        "pool": {
            "workers": ["10.0.0.1", "10.0.0.2"],
            "sweep_interval_secs": 5
        }
    }"#;

    let config = ServerConfig::from_json_str(json).unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.pool.workers, vec!["10.0.0.1", "10.0.0.2"]);
    assert_eq!(config.pool.sweep_interval_secs, Some(5));
}

#[test]
fn test_server_config_from_json_defaults() {
    let config = ServerConfig::from_json_str("{}").unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.port, 8080);
}

#[test]
fn test_server_config_from_json_invalid() {
    assert!(ServerConfig::from_json_str(r#"{"pool": {"workers": []}}"#).is_err());
    assert!(ServerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_server_config_from_env() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("LEASE_POOL_PORT", "9100"),
        ("LEASE_POOL_WORKERS", " w1, w2 ,,w3 "),
        ("LEASE_POOL_SWEEP_SECS", "15"),
    ]))
    .unwrap();
    assert_eq!(config.port, 9100);
    assert_eq!(config.pool.workers, vec!["w1", "w2", "w3"]);
    assert_eq!(config.pool.sweep_interval_secs, Some(15));
}

#[test]
fn test_server_config_from_env_unset() {
    let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_server_config_from_env_bad_values() {
    let err = ServerConfig::from_lookup(lookup(&[("LEASE_POOL_PORT", "eighty")])).unwrap_err();
    assert!(err.starts_with("LEASE_POOL_PORT"));

    let err = ServerConfig::from_lookup(lookup(&[("LEASE_POOL_WORKERS", ",,")])).unwrap_err();
    assert!(err.contains("at least one worker"));
}

#[test]
fn test_parse_loaders_defer_validation() {
    let cfg = ServerConfig::parse_json_str(r#"{"pool": {"workers": []}}"#).unwrap();
    assert!(cfg.pool.workers.is_empty());
    assert!(cfg.validate().is_err());

    let cfg = ServerConfig::parse_lookup(lookup(&[("LEASE_POOL_SWEEP_SECS", "0")])).unwrap();
    assert_eq!(cfg.pool.sweep_interval_secs, Some(0));
    assert!(cfg.validate().is_err());

    assert!(ServerConfig::parse_lookup(lookup(&[("LEASE_POOL_PORT", "x")])).is_err());
    assert!(ServerConfig::parse_json_str("not json").is_err());
}

#[test]
fn test_split_workers() {
    assert_eq!(split_workers("a,b"), vec!["a", "b"]);
    assert!(split_workers("").is_empty());
}
