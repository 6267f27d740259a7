//! Admission control for lease requests.
//!
//! Requests are validated here, before they reach the pool. The pool assumes
//! every [`LeaseRequest`] it sees already satisfies these bounds.

use std::time::Duration;

use crate::core::LeaseError;

/// Largest number of workers a single request may claim, independent of pool size.
pub const MAX_LEASE_AMOUNT: u64 = 10;

/// Longest accepted lease, in seconds.
pub const MAX_LEASE_SECS: u64 = u32::MAX as u64;

/// A validated request for `amount` workers held for `duration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaseRequest {
    amount: usize,
    duration: Duration,
}

impl LeaseRequest {
    /// Validate raw integer parameters.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::AmountOutOfRange`] unless `1 <= amount <= 10`,
    /// [`LeaseError::InvalidDuration`] when `duration_secs` is zero and
    /// [`LeaseError::DurationTooLong`] above [`MAX_LEASE_SECS`].
    pub fn new(amount: u64, duration_secs: u64) -> Result<Self, LeaseError> {
        if amount == 0 || amount > MAX_LEASE_AMOUNT {
            return Err(LeaseError::AmountOutOfRange {
                got: amount,
                max: MAX_LEASE_AMOUNT,
            });
        }
        if duration_secs == 0 {
            return Err(LeaseError::InvalidDuration);
        }
        if duration_secs > MAX_LEASE_SECS {
            return Err(LeaseError::DurationTooLong {
                got: duration_secs,
                max: MAX_LEASE_SECS,
            });
        }
        let amount = usize::try_from(amount).map_err(|_| LeaseError::AmountOutOfRange {
            got: amount,
            max: MAX_LEASE_AMOUNT,
        })?;
        Ok(Self {
            amount,
            duration: Duration::from_secs(duration_secs),
        })
    }

    /// Parse raw query-string values.
    ///
    /// A missing value is treated as `"0"`. Both values must be non-empty runs of
    /// ASCII digits before any range check is applied.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::NotAnInteger`] for malformed values, otherwise the
    /// same errors as [`LeaseRequest::new`].
    pub fn from_query(amount: Option<&str>, duration: Option<&str>) -> Result<Self, LeaseError> {
        let amount = parse_digits(amount.unwrap_or("0"))?;
        let duration = parse_digits(duration.unwrap_or("0"))?;
        Self::new(amount, duration)
    }

    /// Number of workers requested.
    pub const fn amount(&self) -> usize {
        self.amount
    }

    /// Requested lease length.
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

fn parse_digits(raw: &str) -> Result<u64, LeaseError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LeaseError::NotAnInteger);
    }
    // Digit strings that overflow u64 are far beyond every cap, so report them as
    // out of range rather than malformed.
    Ok(raw.parse::<u64>().unwrap_or(u64::MAX))
}
