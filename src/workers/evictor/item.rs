/// Request consumed exactly once by the evictor worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Item {
    /// Offer a new key to the policy.
    New { key: u64, cost: i64 },
    /// Drop a key from eviction bookkeeping.
    Delete { key: u64 },
}
