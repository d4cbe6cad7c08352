#[path = "shared/logger/mod.rs"]
pub mod logger;
#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod config;
pub mod db;
pub mod workers;

pub use config::{Config, ConfigTrait};
pub use db::{new_store, LfuPolicy, Map, Policy, Store, TinyLfu, Victim};
pub use workers::{Evictor, EvictorError, RingBuffer, RingConsumer, Stats};
