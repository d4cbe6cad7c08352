// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
#[allow(dead_code)]
pub const DEV: &str = "dev";
#[allow(dead_code)]
pub const DEBUG: &str = "debug";
#[allow(dead_code)]
pub const TEST: &str = "test";

/// Default number of shards in the store.
pub const DEFAULT_SHARDS: usize = 256;
/// Default capacity of the coordinator request queue.
pub const DEFAULT_BUFFER_ITEMS: usize = 32 * 1024;
/// Default number of keys sampled per eviction round.
pub const DEFAULT_SAMPLE_SIZE: usize = 5;
/// Default number of access keys collected per sampling batch.
pub const DEFAULT_BATCH_SIZE: usize = 64;
/// Default capacity of the access-batch channel.
pub const DEFAULT_ACCESS_QUEUE: usize = 1024;
/// Policy counters allocated per expected item.
pub const COUNTERS_PER_ITEM: i64 = 10;

const DEFAULT_ITEMS_HINT: i64 = 1000;
const DEFAULT_STATS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cache {
    #[serde(rename = "cache")]
    pub cache: CacheBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheBox {
    pub env: String,
    pub logs: Option<Logs>,
    pub storage: Option<Storage>,
    pub eviction: Eviction,
    pub admission: Option<Admission>,
    pub sampling: Option<Sampling>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Storage {
    pub shards: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Eviction {
    #[serde(rename = "num_items_hint")]
    pub num_items_hint: Option<i64>,
    #[serde(rename = "max_cost")]
    pub max_cost: i64,
    #[serde(rename = "buffer_items")]
    pub buffer_items: Option<usize>,
    #[serde(rename = "sample_size")]
    pub sample_size: Option<usize>,
    #[serde(rename = "stats_interval", default, with = "humantime_serde")]
    pub stats_interval: Option<Duration>,
    #[serde(skip)]
    pub num_counters: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Admission {
    #[serde(rename = "sample_multiplier")]
    pub sample_multiplier: Option<usize>,
    #[serde(rename = "door_bits_per_counter")]
    pub door_bits_per_counter: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Sampling {
    pub stripes: Option<usize>,
    #[serde(rename = "batch_size")]
    pub batch_size: Option<usize>,
    pub queue: Option<usize>,
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    #[allow(dead_code)]
    fn is_debug(&self) -> bool;
    #[allow(dead_code)]
    fn is_dev(&self) -> bool;
    #[allow(dead_code)]
    fn is_test(&self) -> bool;
    fn storage(&self) -> Option<&Storage>;
    fn eviction(&self) -> &Eviction;
    fn admission(&self) -> Option<&Admission>;
    fn sampling(&self) -> Option<&Sampling>;

    /// Number of store shards, never zero.
    fn shards(&self) -> usize {
        self.storage()
            .and_then(|s| s.shards)
            .unwrap_or(DEFAULT_SHARDS)
            .max(1)
    }

    /// Capacity of the coordinator request queue, never zero.
    fn buffer_items(&self) -> usize {
        self.eviction()
            .buffer_items
            .unwrap_or(DEFAULT_BUFFER_ITEMS)
            .max(1)
    }

    /// Period of the worker statistics log; zero disables it.
    fn stats_interval(&self) -> Duration {
        self.eviction()
            .stats_interval
            .unwrap_or(DEFAULT_STATS_INTERVAL)
    }
}

// Config type alias for convenience
pub type Config = Cache;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.cache.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.cache.env == PROD
    }

    fn is_debug(&self) -> bool {
        self.cache.env == DEBUG
    }

    fn is_dev(&self) -> bool {
        self.cache.env == DEV
    }

    fn is_test(&self) -> bool {
        self.cache.env == TEST
    }

    fn storage(&self) -> Option<&Storage> {
        self.cache.storage.as_ref()
    }

    fn eviction(&self) -> &Eviction {
        &self.cache.eviction
    }

    fn admission(&self) -> Option<&Admission> {
        self.cache.admission.as_ref()
    }

    fn sampling(&self) -> Option<&Sampling> {
        self.cache.sampling.as_ref()
    }
}

impl Config {
    /// Builds a defaulted configuration sized for `num_items_hint` items
    /// with a total cost budget of `max_cost`.
    pub fn new(num_items_hint: i64, max_cost: i64) -> Self {
        let mut cfg = Cache {
            cache: CacheBox {
                env: DEV.to_string(),
                logs: None,
                storage: None,
                eviction: Eviction {
                    num_items_hint: Some(num_items_hint),
                    max_cost,
                    buffer_items: None,
                    sample_size: None,
                    stats_interval: None,
                    num_counters: 0,
                },
                admission: None,
                sampling: None,
            },
        };
        cfg.resolve();
        cfg
    }

    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::parse(&data).with_context(|| format!("unmarshal yaml from {:?}", abs_path))
    }

    /// Parses configuration from a YAML document.
    pub fn parse(data: &str) -> Result<Self> {
        let mut cfg: Cache = serde_yaml::from_str(data)?;
        cfg.resolve();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Fills derived fields.
    pub(crate) fn resolve(&mut self) {
        let eviction = &mut self.cache.eviction;
        let hint = eviction.num_items_hint.unwrap_or(DEFAULT_ITEMS_HINT).max(1);
        eviction.num_counters = hint.saturating_mul(COUNTERS_PER_ITEM);
    }

    fn validate(&self) -> Result<()> {
        if let Some(shards) = self.storage().and_then(|s| s.shards) {
            if shards == 0 {
                anyhow::bail!("storage.shards must be greater than zero");
            }
        }

        let eviction = self.eviction();
        if eviction.max_cost <= 0 {
            anyhow::bail!("eviction.max_cost must be greater than zero");
        }
        if matches!(eviction.num_items_hint, Some(n) if n <= 0) {
            anyhow::bail!("eviction.num_items_hint must be greater than zero");
        }
        if eviction.buffer_items == Some(0) {
            anyhow::bail!("eviction.buffer_items must be greater than zero");
        }
        if eviction.sample_size == Some(0) {
            anyhow::bail!("eviction.sample_size must be greater than zero");
        }

        if let Some(sampling) = self.sampling() {
            if sampling.batch_size == Some(0) {
                anyhow::bail!("sampling.batch_size must be greater than zero");
            }
            if sampling.queue == Some(0) {
                anyhow::bail!("sampling.queue must be greater than zero");
            }
        }

        Ok(())
    }
}

// Test config is always available for integration tests
mod test_config;
#[allow(dead_code)]
pub use test_config::new_test_config;
