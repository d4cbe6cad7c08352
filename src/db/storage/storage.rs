//! Store interface.

use super::map::Map;

/// Store is the interface fulfilled by every key/value table the cache can
/// sit on. Implementations must be safe for unsynchronized concurrent use.
///
/// Absence is always reported through `Option`/`bool`, never by panicking.
pub trait Store<V>: Send + Sync {
    /// Returns the value associated with the key.
    fn get(&self, key: u64) -> Option<V>;

    /// Adds the key-value pair or overwrites the existing value.
    fn set(&self, key: u64, value: V);

    /// Deletes the key and returns the removed value, if it was present.
    fn del(&self, key: u64) -> Option<V>;

    /// Overwrites the value only if the key already exists.
    /// Returns true if the update took effect.
    fn update(&self, key: u64, value: V) -> bool;

    /// Clears all contents of the store.
    fn clear(&self);

    /// Approximate number of stored items.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the default store implementation.
pub fn new_store<V: Clone + Send + Sync + 'static>() -> Box<dyn Store<V>> {
    Box::new(Map::default())
}
