//! Cache storage, admission and eviction policy.

pub mod admission;
pub mod policy;
pub mod storage;

// Re-export main types
pub use admission::TinyLfu;
pub use policy::{LfuPolicy, Policy, Victim};
pub use storage::{new_store, Map, Store};
