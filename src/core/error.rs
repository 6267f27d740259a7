//! Error types for admission control and configuration.

use thiserror::Error;

/// Errors produced before a request reaches the pool, or while building one.
///
/// Pool outcomes themselves (granted or deferred) are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaseError {
    /// `amount` or `duration` is missing its integer shape.
    #[error("invalid parameters: 'amount' and 'duration' must be integers")]
    NotAnInteger,
    /// `amount` falls outside the admission cap.
    #[error("invalid parameters: 'amount' must be greater than 0 and at most {max}, got {got}")]
    AmountOutOfRange {
        /// Requested amount.
        got: u64,
        /// Admission cap.
        max: u64,
    },
    /// `duration` is zero.
    #[error("invalid parameters: 'duration' must be greater than zero")]
    InvalidDuration,
    /// `duration` is too large to compute an expiry.
    #[error("invalid parameters: 'duration' must be at most {max} seconds, got {got}")]
    DurationTooLong {
        /// Requested duration in seconds.
        got: u64,
        /// Largest accepted duration in seconds.
        max: u64,
    },
    /// Pool or server configuration is unusable.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
