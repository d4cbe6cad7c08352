//! Integration tests for the cache core.
//!
//! These wire the store and the evictor together the way a cache front end
//! would: the eviction callback removes keys from the store.

mod cases_concurrent_test;

pub mod support;
