// Periodic eviction statistics.

use super::counters::Stats;

/// Logs eviction statistics for one interval.
pub fn log_stats(name: &str, delta: &Stats) {
    // Log if there's activity
    if delta.has_activity() {
        tracing::info!(
            name = %name,
            component = "evictor",
            admitted = delta.admitted,
            rejected = delta.rejected,
            evicted = delta.evicted,
            deleted = delta.deleted,
            dropped_samples = delta.dropped_samples,
            tracked_keys = delta.tracked_keys,
            used_cost = delta.used_cost,
            "eviction statistics"
        );
    }
}
