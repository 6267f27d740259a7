//! Tests for error types

use prometheus_lease_pool::core::LeaseError;

#[test]
fn test_not_an_integer_error() {
    let err = LeaseError::NotAnInteger;
    assert_eq!(
        format!("{}", err),
        "invalid parameters: 'amount' and 'duration' must be integers"
    );
}

#[test]
fn test_amount_out_of_range_error() {
    let err = LeaseError::AmountOutOfRange { got: 11, max: 10 };
    assert_eq!(
        format!("{}", err),
        "invalid parameters: 'amount' must be greater than 0 and at most 10, got 11"
    );
}

#[test]
fn test_invalid_duration_error() {
    let err = LeaseError::InvalidDuration;
    assert_eq!(
        format!("{}", err),
        "invalid parameters: 'duration' must be greater than zero"
    );
}

#[test]
fn test_config_error() {
    let err = LeaseError::Config("no workers".to_string());
    assert_eq!(format!("{}", err), "config error: no workers");
}

#[test]
fn test_errors_convert_into_anyhow() {
    let result: prometheus_lease_pool::core::AppResult<()> = Err(LeaseError::InvalidDuration.into());
    assert!(result.unwrap_err().to_string().contains("duration"));
}
