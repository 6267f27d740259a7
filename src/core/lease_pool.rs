//! Lease pool with time-bounded, all-or-nothing worker grants.
//!
//! The pool owns a fixed universe of [`WorkerId`]s and keeps each one in exactly
//! one of two sets: `free`, or `leased` with an absolute expiry. Expired leases
//! are reclaimed lazily, on demand, rather than by a timer.
//!
//! [`PoolState`] holds the data and implements the three operations against an
//! explicit `now`. [`LeasePool`] wraps it in a `parking_lot::Mutex`, reads the
//! clock once per critical section and exposes [`LeasePool::lease`], which runs
//! reclaim, allocate and (when deferred) the wait estimate under one lock.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::audit::{build_audit_event, AuditAction, AuditSink};
use crate::core::{LeaseError, LeaseRequest};
use crate::util::clock::{Clock, SystemClock};
use crate::util::serde::WorkerId;

/// A single outstanding lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Lease {
    expires_at: Instant,
    /// Allocation order, used to return expired workers deterministically.
    seq: u64,
}

/// Result of a lease request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaseOutcome {
    /// The full amount was leased; these are the workers handed out.
    Granted(Vec<WorkerId>),
    /// Not enough free workers. `retry_after` estimates when to poll again and is
    /// `None` when nothing is leased, so no estimate can be derived.
    Deferred {
        /// Estimated wait before enough workers return.
        retry_after: Option<Duration>,
    },
}

impl LeaseOutcome {
    /// Whether the request was granted.
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Point-in-time counts of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    /// Size of the worker universe.
    pub capacity: usize,
    /// Workers available for allocation.
    pub free: usize,
    /// Workers currently leased.
    pub leased: usize,
}

/// Unsynchronised pool data: the free queue and the lease table.
///
/// Invariant: every identity of the universe is in exactly one of `free` or
/// `leased`, so `free.len() + leased.len() == capacity` at all times.
#[derive(Debug)]
pub struct PoolState {
    free: VecDeque<WorkerId>,
    leased: HashMap<WorkerId, Lease>,
    capacity: usize,
    next_seq: u64,
    next_event: u64,
}

impl PoolState {
    /// Create a state with every identity of `universe` free, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::Config`] if the universe is empty or names a worker twice.
    pub fn new(universe: impl IntoIterator<Item = WorkerId>) -> Result<Self, LeaseError> {
        let mut seen = HashSet::new();
        let mut free = VecDeque::new();
        for id in universe {
            if !seen.insert(id.clone()) {
                return Err(LeaseError::Config(format!("duplicate worker `{id}`")));
            }
            free.push_back(id);
        }
        if free.is_empty() {
            return Err(LeaseError::Config("worker universe must not be empty".into()));
        }
        let capacity = free.len();
        Ok(Self {
            free,
            leased: HashMap::with_capacity(capacity),
            capacity,
            next_seq: 0,
            next_event: 0,
        })
    }

    /// Lease the first `amount` free workers until `now + duration`.
    ///
    /// All-or-nothing: returns `None` and leaves the state untouched when fewer
    /// than `amount` workers are free. Does not reclaim expired leases itself.
    pub fn allocate(
        &mut self,
        amount: usize,
        duration: Duration,
        now: Instant,
    ) -> Option<Vec<WorkerId>> {
        if self.free.len() < amount {
            return None;
        }
        let expires_at = now + duration;
        let granted: Vec<WorkerId> = self.free.drain(..amount).collect();
        for id in &granted {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.leased.insert(id.clone(), Lease { expires_at, seq });
        }
        Some(granted)
    }

    /// Return every lease with `expires_at <= now` to the back of the free queue.
    ///
    /// Workers are returned in the order they were originally allocated.
    pub fn reclaim_expired(&mut self, now: Instant) -> Vec<WorkerId> {
        let mut expired: Vec<(u64, WorkerId)> = self
            .leased
            .iter()
            .filter(|(_, lease)| lease.expires_at <= now)
            .map(|(id, lease)| (lease.seq, id.clone()))
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }
        expired.sort_unstable_by_key(|(seq, _)| *seq);

        let mut returned = Vec::with_capacity(expired.len());
        for (_, id) in expired {
            self.leased.remove(&id);
            self.free.push_back(id.clone());
            returned.push(id);
        }
        returned
    }

    /// Estimate how long until `amount` leased workers have expired.
    ///
    /// Takes the remaining times of all leases, sorted ascending, and returns the
    /// largest of the first `min(amount, leased)`. Workers already free are not
    /// counted. Returns `None` when nothing is leased or `amount` is zero.
    pub fn estimate_wait(&self, amount: usize, now: Instant) -> Option<Duration> {
        let mut remaining: Vec<Duration> = self
            .leased
            .values()
            .map(|lease| lease.expires_at.saturating_duration_since(now))
            .collect();
        let nth = amount.min(remaining.len()).checked_sub(1)?;
        let (_, wait, _) = remaining.select_nth_unstable(nth);
        Some(*wait)
    }

    /// Take the next audit sequence number.
    ///
    /// Numbers are handed out under the same lock as the state change they
    /// describe, so sorting events by sequence restores the order of changes.
    pub fn next_event_seq(&mut self) -> u64 {
        let seq = self.next_event;
        self.next_event += 1;
        seq
    }

    fn reclaim_with_seq(&mut self, now: Instant) -> Option<(u64, Vec<WorkerId>)> {
        let reclaimed = self.reclaim_expired(now);
        if reclaimed.is_empty() {
            return None;
        }
        Some((self.next_event_seq(), reclaimed))
    }

    /// Size of the worker universe.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free workers.
    pub fn free_len(&self) -> usize {
        self.free.len()
    }

    /// Number of leased workers.
    pub fn leased_len(&self) -> usize {
        self.leased.len()
    }

    /// Free workers in allocation order.
    pub fn free_workers(&self) -> impl Iterator<Item = &WorkerId> {
        self.free.iter()
    }

    /// Expiry of the lease held on `id`, if it is leased.
    pub fn expiry_of(&self, id: &WorkerId) -> Option<Instant> {
        self.leased.get(id).map(|lease| lease.expires_at)
    }

    /// Current counts.
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            capacity: self.capacity,
            free: self.free.len(),
            leased: self.leased.len(),
        }
    }
}

/// Thread-safe lease pool shared by all request handlers.
pub struct LeasePool {
    state: Mutex<PoolState>,
    clock: Arc<dyn Clock>,
    audit: Option<Arc<dyn AuditSink>>,
}

impl LeasePool {
    /// Create a pool over `universe` using the monotonic system clock.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::Config`] if the universe is empty or has duplicates.
    pub fn new(universe: impl IntoIterator<Item = WorkerId>) -> Result<Self, LeaseError> {
        Self::with_clock(universe, Arc::new(SystemClock))
    }

    /// Create a pool over `universe` driven by `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`LeaseError::Config`] if the universe is empty or has duplicates.
    pub fn with_clock(
        universe: impl IntoIterator<Item = WorkerId>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, LeaseError> {
        Ok(Self {
            state: Mutex::new(PoolState::new(universe)?),
            clock,
            audit: None,
        })
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Size of the worker universe.
    pub fn capacity(&self) -> usize {
        self.state.lock().capacity()
    }

    /// Serve one request: reclaim expired leases, then try to allocate, then
    /// estimate the wait if the allocation was deferred.
    ///
    /// All three steps share a single lock acquisition and a single clock read,
    /// so no other request can interleave between reclaiming and allocating.
    pub fn lease(&self, request: &LeaseRequest) -> LeaseOutcome {
        let amount = request.amount();
        let duration = request.duration();

        let (reclaimed, outcome, outcome_seq) = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            let reclaimed = state.reclaim_with_seq(now);
            let outcome = match state.allocate(amount, duration, now) {
                Some(granted) => LeaseOutcome::Granted(granted),
                None => LeaseOutcome::Deferred {
                    retry_after: state.estimate_wait(amount, now),
                },
            };
            (reclaimed, outcome, state.next_event_seq())
        };

        self.after_reclaim(reclaimed);
        match &outcome {
            LeaseOutcome::Granted(workers) => {
                self.after_grant(outcome_seq, workers.clone(), amount, duration);
            }
            LeaseOutcome::Deferred { retry_after } => {
                tracing::info!(
                    amount,
                    retry_after_secs = retry_after.map(|d| d.as_secs()),
                    "not enough workers available, asked to come back later"
                );
                self.record(outcome_seq, AuditAction::Defer, Vec::new(), amount, duration);
            }
        }
        outcome
    }

    /// Lease `amount` workers for `duration` without reclaiming first.
    ///
    /// Callers must run [`LeasePool::reclaim_expired`] beforehand to see capacity
    /// freed by expiry; [`LeasePool::lease`] does both atomically.
    pub fn allocate(&self, amount: usize, duration: Duration) -> Option<Vec<WorkerId>> {
        let (granted, seq) = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            let granted = state.allocate(amount, duration, now)?;
            (granted, state.next_event_seq())
        };
        self.after_grant(seq, granted.clone(), amount, duration);
        Some(granted)
    }

    /// Return expired leases to the free set. Idempotent when nothing has expired.
    pub fn reclaim_expired(&self) -> Vec<WorkerId> {
        let reclaimed = {
            let mut state = self.state.lock();
            let now = self.clock.now();
            state.reclaim_with_seq(now)
        };
        let workers = reclaimed.as_ref().map(|(_, w)| w.clone()).unwrap_or_default();
        self.after_reclaim(reclaimed);
        workers
    }

    /// Estimate the wait for `amount` workers from current leases. Read-only.
    pub fn estimate_wait(&self, amount: usize) -> Option<Duration> {
        let state = self.state.lock();
        let now = self.clock.now();
        state.estimate_wait(amount, now)
    }

    /// Current counts.
    pub fn snapshot(&self) -> PoolSnapshot {
        self.state.lock().snapshot()
    }

    fn after_grant(&self, seq: u64, workers: Vec<WorkerId>, amount: usize, duration: Duration) {
        tracing::info!(?workers, duration_secs = duration.as_secs(), "allocated workers");
        self.record(seq, AuditAction::Grant, workers, amount, duration);
    }

    fn after_reclaim(&self, reclaimed: Option<(u64, Vec<WorkerId>)>) {
        let Some((seq, workers)) = reclaimed else {
            return;
        };
        tracing::debug!(?workers, "reclaimed expired leases");
        if let Some(audit) = &self.audit {
            audit.record(build_audit_event(seq, AuditAction::Reclaim, workers, None, None));
        }
    }

    fn record(
        &self,
        seq: u64,
        action: AuditAction,
        workers: Vec<WorkerId>,
        amount: usize,
        duration: Duration,
    ) {
        if let Some(audit) = &self.audit {
            audit.record(build_audit_event(
                seq,
                action,
                workers,
                Some(amount),
                Some(duration.as_secs()),
            ));
        }
    }
}

impl std::fmt::Debug for LeasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeasePool")
            .field("snapshot", &self.snapshot())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
