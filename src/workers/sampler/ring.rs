//! Striped, lossy buffer for read-access samples.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::{Sampling, DEFAULT_BATCH_SIZE};

/// Receives full batches of sampled keys.
///
/// A consumer either takes the batch or hands it back so the stripe can
/// reuse the allocation. It must never block.
pub trait RingConsumer: Send + Sync {
    fn push(&self, keys: Vec<u64>) -> Result<(), Vec<u64>>;
}

/// RingBuffer collects keys into per-stripe batches and forwards each full
/// batch to its consumer.
///
/// Pushing never blocks: a contended stripe drops the key and a refused
/// batch is discarded. Losing samples only degrades eviction quality.
pub struct RingBuffer<C: RingConsumer> {
    consumer: C,
    stripes: Vec<Mutex<Vec<u64>>>,
    batch_size: usize,
    iter: AtomicUsize,
    dropped: Arc<AtomicI64>,
}

impl<C: RingConsumer> RingBuffer<C> {
    /// Creates a buffer with the configured stripe count and batch size.
    pub fn new(consumer: C, cfg: Option<&Sampling>) -> Self {
        Self::with_dropped(consumer, cfg, Arc::new(AtomicI64::new(0)))
    }

    /// Like [`RingBuffer::new`], counting lost samples into `dropped`.
    pub fn with_dropped(consumer: C, cfg: Option<&Sampling>, dropped: Arc<AtomicI64>) -> Self {
        let stripes = cfg
            .and_then(|s| s.stripes)
            .filter(|&n| n > 0)
            .unwrap_or_else(num_cpus::get)
            .max(1);
        let batch_size = cfg
            .and_then(|s| s.batch_size)
            .unwrap_or(DEFAULT_BATCH_SIZE)
            .max(1);

        Self {
            consumer,
            stripes: (0..stripes)
                .map(|_| Mutex::new(Vec::with_capacity(batch_size)))
                .collect(),
            batch_size,
            iter: AtomicUsize::new(0),
            dropped,
        }
    }

    /// Records one access of `key`.
    pub fn push(&self, key: u64) {
        let idx = self.iter.fetch_add(1, Ordering::Relaxed) % self.stripes.len();
        let Some(mut stripe) = self.stripes[idx].try_lock() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return;
        };

        stripe.push(key);
        if stripe.len() < self.batch_size {
            return;
        }

        let batch = std::mem::replace(&mut *stripe, Vec::with_capacity(self.batch_size));
        if let Err(mut batch) = self.consumer.push(batch) {
            self.dropped.fetch_add(batch.len() as i64, Ordering::Relaxed);
            batch.clear();
            *stripe = batch;
        }
    }

    /// Number of samples lost to contention or a refusing consumer.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed).max(0) as u64
    }

    /// Discards every partially filled batch.
    pub fn reset(&self) {
        for stripe in &self.stripes {
            stripe.lock().clear();
        }
    }

    pub fn consumer(&self) -> &C {
        &self.consumer
    }
}
