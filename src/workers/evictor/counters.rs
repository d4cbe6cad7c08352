//! Counters for eviction statistics.
//

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Counters for eviction statistics.
///
/// Written by the worker thread only, except `dropped_samples` which the
/// sampling buffer bumps from caller threads; read from anywhere.
pub struct Counters {
    pub admitted: AtomicI64,
    pub rejected: AtomicI64,
    pub evicted: AtomicI64,
    pub deleted: AtomicI64,
    pub tracked_keys: AtomicI64,
    pub used_cost: AtomicI64,
    pub dropped_samples: Arc<AtomicI64>,
}

impl Counters {
    /// Creates a new counters instance.
    pub fn new() -> Self {
        Self {
            admitted: AtomicI64::new(0),
            rejected: AtomicI64::new(0),
            evicted: AtomicI64::new(0),
            deleted: AtomicI64::new(0),
            tracked_keys: AtomicI64::new(0),
            used_cost: AtomicI64::new(0),
            dropped_samples: Arc::new(AtomicI64::new(0)),
        }
    }

    pub(crate) fn inc(counter: &AtomicI64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Publishes the policy gauges.
    pub(crate) fn set_policy_size(&self, tracked_keys: usize, used_cost: i64) {
        self.tracked_keys.store(tracked_keys as i64, Ordering::Relaxed);
        self.used_cost.store(used_cost, Ordering::Relaxed);
    }

    /// Takes a point-in-time copy.
    pub fn snapshot(&self) -> Stats {
        Stats {
            admitted: self.admitted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            dropped_samples: self.dropped_samples.load(Ordering::Relaxed),
            tracked_keys: self.tracked_keys.load(Ordering::Relaxed),
            used_cost: self.used_cost.load(Ordering::Relaxed),
        }
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of the evictor counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Keys the policy let in.
    pub admitted: i64,
    /// New keys the policy turned away (reported through on_evict).
    pub rejected: i64,
    /// Previously admitted keys pushed out (reported through on_evict).
    pub evicted: i64,
    /// Delete requests applied.
    pub deleted: i64,
    /// Read samples lost before reaching the policy.
    pub dropped_samples: i64,
    /// Keys currently tracked by the policy.
    pub tracked_keys: i64,
    /// Cost currently tracked by the policy.
    pub used_cost: i64,
}

impl Stats {
    /// Activity since `prev`; gauges are taken as-is.
    pub fn since(&self, prev: &Stats) -> Stats {
        Stats {
            admitted: self.admitted - prev.admitted,
            rejected: self.rejected - prev.rejected,
            evicted: self.evicted - prev.evicted,
            deleted: self.deleted - prev.deleted,
            dropped_samples: self.dropped_samples - prev.dropped_samples,
            tracked_keys: self.tracked_keys,
            used_cost: self.used_cost,
        }
    }

    pub fn has_activity(&self) -> bool {
        self.admitted > 0
            || self.rejected > 0
            || self.evicted > 0
            || self.deleted > 0
            || self.dropped_samples > 0
    }
}
