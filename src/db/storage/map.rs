//! Sharded concurrent map backing the cache store.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::config::{Config, ConfigTrait, DEFAULT_SHARDS};

use super::shard::Shard;
use super::storage::Store;

/// Map is a sharded concurrent map with a global item counter.
///
/// A key always lives in shard `key % shards`. Operations spanning shards
/// (only [`Map::clear`]) are not atomic.
pub struct Map<V> {
    len: AtomicI64,
    shards: Vec<Shard<V>>,
}

impl<V> Map<V> {
    /// Creates a new sharded map with the configured shard count.
    pub fn new(cfg: &Config) -> Self {
        Self::with_shards(cfg.shards())
    }

    /// Creates a map with exactly `num` shards (at least one).
    pub fn with_shards(num: usize) -> Self {
        let num = num.max(1);
        let mut shards = Vec::with_capacity(num);
        for id in 0..num {
            shards.push(Shard::new(id as u64));
        }

        Self {
            len: AtomicI64::new(0),
            shards,
        }
    }

    /// Gets the shard for a given key.
    pub fn shard(&self, key: u64) -> &Shard<V> {
        &self.shards[self.shard_index(key)]
    }

    /// Index of the shard that owns `key`.
    pub fn shard_index(&self, key: u64) -> usize {
        (key % self.shards.len() as u64) as usize
    }

    /// Number of shards.
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// Walks over all shards in order.
    pub fn walk_shards<F>(&self, mut f: F)
    where
        F: FnMut(&Shard<V>),
    {
        for shard in &self.shards {
            f(shard);
        }
    }
}

impl<V> Default for Map<V> {
    fn default() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }
}

impl<V: Clone + Send + Sync> Store<V> for Map<V> {
    fn get(&self, key: u64) -> Option<V> {
        self.shard(key).get(key)
    }

    fn set(&self, key: u64, value: V) {
        if self.shard(key).set(key, value) {
            self.len.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn del(&self, key: u64) -> Option<V> {
        let old = self.shard(key).remove(key);
        if old.is_some() {
            self.len.fetch_sub(1, Ordering::Relaxed);
        }
        old
    }

    fn update(&self, key: u64, value: V) -> bool {
        self.shard(key).update(key, value)
    }

    fn clear(&self) {
        self.walk_shards(|shard| {
            let items = shard.clear();
            if items != 0 {
                self.len.fetch_sub(items, Ordering::Relaxed);
            }
        });
    }

    fn len(&self) -> usize {
        self.len.load(Ordering::Relaxed).max(0) as usize
    }
}
