//! Shard implementation.
//

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Shard is an independently lockable segment of the sharded map.
///
/// Reads take the shared lock, every mutation takes the exclusive one. The
/// lock is never held across calls into other components.
pub struct Shard<V> {
    data: RwLock<HashMap<u64, V>>,
    id: u64,
    len: AtomicI64,
}

impl<V> Shard<V> {
    /// Creates a new shard.
    pub fn new(id: u64) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            id,
            len: AtomicI64::new(0),
        }
    }

    /// Gets the shard ID.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Gets the number of items.
    pub fn len(&self) -> i64 {
        self.len.load(Ordering::Relaxed)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gets a value by key.
    pub fn get(&self, key: u64) -> Option<V>
    where
        V: Clone,
    {
        self.data.read().get(&key).cloned()
    }

    /// Inserts or overwrites a value.
    /// Returns true if the key was not present before.
    pub fn set(&self, key: u64, value: V) -> bool {
        let mut data = self.data.write();
        let inserted = data.insert(key, value).is_none();
        if inserted {
            self.len.fetch_add(1, Ordering::Relaxed);
        }
        inserted
    }

    /// Removes a key and returns its value, if any.
    pub fn remove(&self, key: u64) -> Option<V> {
        let mut data = self.data.write();
        let old = data.remove(&key);
        if old.is_some() {
            self.len.fetch_sub(1, Ordering::Relaxed);
        }
        old
    }

    /// Overwrites the value only if the key is already present.
    pub fn update(&self, key: u64, value: V) -> bool {
        let mut data = self.data.write();
        match data.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Clears all entries.
    /// Returns the number of items removed.
    pub fn clear(&self) -> i64 {
        let old = {
            let mut data = self.data.write();
            self.len.store(0, Ordering::Relaxed);
            std::mem::take(&mut *data)
        };
        // Values are dropped outside of the lock.
        old.len() as i64
    }
}
