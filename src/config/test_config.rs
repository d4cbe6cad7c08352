use super::{Admission, CacheBox, Config, Eviction, Logs, Sampling, Storage};
use std::time::Duration;

/// Creates a new test configuration.
///
/// Small shard count and queue so tests exercise routing and back-pressure
/// quickly; statistics logging is disabled.
pub fn new_test_config() -> Config {
    let mut cfg = Config {
        cache: CacheBox {
            env: super::TEST.to_string(),
            logs: Some(Logs {
                level: Some("debug".to_string()),
            }),
            storage: Some(Storage { shards: Some(16) }),
            eviction: Eviction {
                num_items_hint: Some(100),
                max_cost: 100,
                buffer_items: Some(64),
                sample_size: Some(5),
                stats_interval: Some(Duration::ZERO),
                num_counters: 0,
            },
            admission: Some(Admission {
                sample_multiplier: Some(1),
                door_bits_per_counter: Some(8),
            }),
            sampling: Some(Sampling {
                stripes: Some(4),
                batch_size: Some(8),
                queue: Some(64),
            }),
        },
    };
    cfg.resolve();
    cfg
}
