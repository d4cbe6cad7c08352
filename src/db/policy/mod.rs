//! Admission and eviction policies.

pub mod lfu;
pub mod policy;


// Re-export main types
pub use lfu::LfuPolicy;
pub use policy::{Policy, Victim};
