//! Eviction coordinator: a single worker owning the policy.

pub mod counters;
pub mod evictor;
mod item;
pub mod telemetry;
mod worker;


use std::sync::Arc;

/// Callback invoked on the worker thread for every key leaving the cache.
pub type OnEvict = Arc<dyn Fn(u64) + Send + Sync + 'static>;

// Re-export main types
pub use counters::{Counters, Stats};
pub use evictor::{AccessSink, Evictor, EvictorError};
