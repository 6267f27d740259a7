//! API-facing request/response models.
//!
//! Wire names (`slaves`, `come_back`) are kept stable for existing clients.

use serde::{Deserialize, Serialize};

use crate::core::{LeaseError, LeaseOutcome, LeasePool, LeaseRequest, PoolSnapshot};
use crate::util::serde::WorkerId;

/// Raw query parameters of a lease request, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeaseQuery {
    /// Number of workers wanted, as sent by the client.
    pub amount: Option<String>,
    /// Lease length in seconds, as sent by the client.
    pub duration: Option<String>,
}

impl LeaseQuery {
    /// Collect the parameters from decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "amount" => &mut query.amount,
                "duration" => &mut query.duration,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Lease response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseResponse {
    /// Granted workers; empty when the request was deferred.
    #[serde(rename = "slaves")]
    pub workers: Vec<WorkerId>,
    /// Whole seconds to wait before polling again; only present when deferred.
    #[serde(
        rename = "come_back",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub come_back_secs: Option<u64>,
}

impl From<LeaseOutcome> for LeaseResponse {
    fn from(outcome: LeaseOutcome) -> Self {
        match outcome {
            LeaseOutcome::Granted(workers) => Self {
                workers,
                come_back_secs: None,
            },
            // No leases in flight means no estimate; tell the client to retry now.
            LeaseOutcome::Deferred { retry_after } => Self {
                workers: Vec::new(),
                come_back_secs: Some(retry_after.map_or(0, |d| d.as_secs())),
            },
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
    /// Pool counts after reclaiming expired leases.
    #[serde(flatten)]
    pub pool: PoolSnapshot,
}

/// Validate `query` and run it against `pool`.
///
/// # Errors
///
/// Returns the admission error when the parameters are malformed or out of range;
/// the pool is not touched in that case.
pub fn submit_lease(pool: &LeasePool, query: &LeaseQuery) -> Result<LeaseResponse, LeaseError> {
    let request = LeaseRequest::from_query(query.amount.as_deref(), query.duration.as_deref())?;
    Ok(pool.lease(&request).into())
}

/// Reclaim expired leases and report pool counts.
pub fn health(pool: &LeasePool) -> Health {
    pool.reclaim_expired();
    Health {
        ok: true,
        pool: pool.snapshot(),
    }
}
