// Background machinery feeding and running the eviction policy.

pub mod evictor;
pub mod sampler;

// Re-export main types
pub use evictor::{Evictor, EvictorError, OnEvict, Stats};
pub use sampler::{RingBuffer, RingConsumer};
