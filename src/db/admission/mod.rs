//! LFU (Least Frequently Used) admission estimation.

pub mod count_min_sketch;
pub mod door_keeper;
pub mod helper;
pub mod tiny_lfu;


// Re-export main types
pub use tiny_lfu::TinyLfu;
