//! Admission/eviction policy interface.

/// Key chosen by a policy for eviction, with the cost it released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victim {
    pub key: u64,
    pub cost: i64,
}

/// Policy decides which keys are admitted and which ones are evicted.
///
/// Implementations are not required to be internally synchronized: the
/// evictor guarantees that a policy is only ever driven by its single worker
/// thread.
pub trait Policy: Send {
    /// Offers `key` with `cost`. Returns the keys evicted to make room and
    /// whether `key` itself was admitted. Victims may be returned even when
    /// the key is rejected.
    fn add(&mut self, key: u64, cost: i64) -> (Vec<Victim>, bool);

    /// Removes `key` from eviction bookkeeping.
    fn del(&mut self, key: u64);

    /// Feeds a batch of sampled reads into frequency tracking.
    fn record(&mut self, keys: &[u64]);

    /// Drops all bookkeeping.
    fn clear(&mut self);

    /// Releases held resources. The policy is not used afterwards.
    fn close(&mut self) {
        self.clear();
    }

    /// Number of tracked keys.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of the costs of tracked keys.
    fn used_cost(&self) -> i64;
}
