//! Sharded, lock-protected key/value store.

pub mod map;
pub mod shard;
pub mod storage;


// Re-export main types
pub use map::Map;
pub use shard::Shard;
pub use storage::{new_store, Store};
