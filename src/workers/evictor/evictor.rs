//! Eviction coordinator.

use crossbeam::channel::{self, Sender, TrySendError};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait, DEFAULT_ACCESS_QUEUE};
use crate::db::policy::{LfuPolicy, Policy};
use crate::workers::sampler::{RingBuffer, RingConsumer};

use super::counters::{Counters, Stats};
use super::item::Item;
use super::worker::Worker;
use super::OnEvict;

const NAME: &str = "evictor";

#[derive(Debug, thiserror::Error)]
pub enum EvictorError {
    #[error("evictor is closed")]
    Closed,
    #[error("evictor worker is gone")]
    Disconnected,
    #[error("evictor worker panicked")]
    WorkerPanicked,
    #[error("failed to spawn evictor worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Channels and thread of one worker incarnation. Replaced as a whole on
/// clear; absent once the evictor is closed.
struct Generation {
    items_tx: Sender<Item>,
    access_tx: Sender<Vec<u64>>,
    stop_tx: Sender<()>,
    handle: JoinHandle<Option<Box<dyn Policy>>>,
}

impl Generation {
    /// Signals the worker and waits for it to hand the policy back.
    fn stop(self) -> Result<Box<dyn Policy>, EvictorError> {
        // Fails only if the worker already died; join reports that.
        let _ = self.stop_tx.send(());
        match self.handle.join() {
            Ok(Some(policy)) => Ok(policy),
            Ok(None) => Err(EvictorError::Disconnected),
            Err(_) => Err(EvictorError::WorkerPanicked),
        }
    }
}

type SharedGeneration = Arc<RwLock<Option<Generation>>>;

/// Hands the policy to a worker thread; still full if the thread never ran.
type PolicySlot = Mutex<Option<Box<dyn Policy>>>;

/// Closes a policy whose worker thread never started.
/// Returns false if the worker already took it.
pub(super) fn release_unstarted(slot: &PolicySlot) -> bool {
    match slot.lock().take() {
        Some(mut policy) => {
            policy.close();
            info!(name = NAME, component = "evictor", "closed");
            true
        }
        None => false,
    }
}

/// Forwards sampled reads to the current worker without ever blocking.
pub struct AccessSink {
    generation: SharedGeneration,
}

impl RingConsumer for AccessSink {
    fn push(&self, keys: Vec<u64>) -> Result<(), Vec<u64>> {
        // A clear or close in progress holds the write lock: skip the batch.
        let Some(guard) = self.generation.try_read() else {
            return Err(keys);
        };
        match guard.as_ref() {
            Some(gen) => gen.access_tx.try_send(keys).map_err(TrySendError::into_inner),
            None => Err(keys),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Settings {
    buffer_items: usize,
    access_queue: usize,
    stats_interval: Duration,
}

/// Evictor serializes every admission decision onto a single worker thread.
///
/// Callers enqueue `add`/`del` requests on a bounded queue (blocking when it
/// is full) and report reads through `touch`, which never blocks. The worker
/// owns the policy and calls `on_evict` for every key that must leave the
/// cache: a rejected newcomer first, then each victim.
///
/// `on_evict` runs on the worker thread. It must be fast and must not call
/// back into this evictor.
pub struct Evictor {
    settings: Settings,
    on_evict: OnEvict,
    generation: SharedGeneration,
    sampler: RingBuffer<AccessSink>,
    counters: Arc<Counters>,
}

impl Evictor {
    /// Creates an evictor driving the default LFU policy.
    pub fn new<F>(cfg: &Config, on_evict: F) -> Result<Self, EvictorError>
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        Self::with_policy(cfg, Box::new(LfuPolicy::new(cfg)), on_evict)
    }

    /// Creates an evictor driving `policy`, and starts its worker.
    pub fn with_policy<F>(
        cfg: &Config,
        policy: Box<dyn Policy>,
        on_evict: F,
    ) -> Result<Self, EvictorError>
    where
        F: Fn(u64) + Send + Sync + 'static,
    {
        let settings = Settings {
            buffer_items: cfg.buffer_items(),
            access_queue: cfg
                .sampling()
                .and_then(|s| s.queue)
                .unwrap_or(DEFAULT_ACCESS_QUEUE)
                .max(1),
            stats_interval: cfg.stats_interval(),
        };

        let counters = Arc::new(Counters::new());
        let generation: SharedGeneration = Arc::new(RwLock::new(None));
        let sampler = RingBuffer::with_dropped(
            AccessSink {
                generation: Arc::clone(&generation),
            },
            cfg.sampling(),
            Arc::clone(&counters.dropped_samples),
        );

        let evictor = Self {
            settings,
            on_evict: Arc::new(on_evict),
            generation,
            sampler,
            counters,
        };

        let gen = evictor.spawn(policy)?;
        *evictor.generation.write() = Some(gen);

        info!(
            name = NAME,
            component = "evictor",
            buffer_items = settings.buffer_items,
            "started"
        );
        Ok(evictor)
    }

    /// Reports a read of `key`. Best effort: may be dropped under contention.
    pub fn touch(&self, key: u64) {
        self.sampler.push(key);
    }

    /// Offers `key` with `cost` for admission. Blocks while the queue is full.
    pub fn add(&self, key: u64, cost: i64) -> Result<(), EvictorError> {
        self.send(Item::New { key, cost })
    }

    /// Removes `key` from eviction bookkeeping. Blocks while the queue is full.
    pub fn del(&self, key: u64) -> Result<(), EvictorError> {
        self.send(Item::Delete { key })
    }

    /// Stops the worker, abandons queued requests, wipes the policy and
    /// starts a new worker on fresh queues.
    ///
    /// New requests wait for the handover to finish.
    pub fn clear(&self) -> Result<(), EvictorError> {
        let mut guard = self.generation.write();
        let gen = guard.take().ok_or(EvictorError::Closed)?;

        let mut policy = gen.stop().map_err(|err| {
            error!(name = NAME, component = "evictor", error = %err, "clear failed, evictor closed");
            err
        })?;
        policy.clear();
        self.counters.set_policy_size(policy.len(), policy.used_cost());
        self.sampler.reset();

        *guard = Some(self.spawn(policy)?);
        info!(name = NAME, component = "evictor", "cleared");
        Ok(())
    }

    /// Stops the worker for good and releases the policy.
    /// Any later call returns [`EvictorError::Closed`].
    pub fn close(&self) -> Result<(), EvictorError> {
        let gen = self
            .generation
            .write()
            .take()
            .ok_or(EvictorError::Closed)?;

        let mut policy = gen.stop()?;
        policy.close();
        info!(name = NAME, component = "evictor", "closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.generation.read().is_none()
    }

    /// Current counters.
    pub fn stats(&self) -> Stats {
        self.counters.snapshot()
    }

    fn send(&self, item: Item) -> Result<(), EvictorError> {
        // The read lock is held across a blocking send so a clear or close
        // cannot swap the queue out from under it.
        let guard = self.generation.read();
        let gen = guard.as_ref().ok_or(EvictorError::Closed)?;
        gen.items_tx
            .send(item)
            .map_err(|_| EvictorError::Disconnected)
    }

    fn spawn(&self, policy: Box<dyn Policy>) -> Result<Generation, EvictorError> {
        let (items_tx, items_rx) = channel::bounded(self.settings.buffer_items);
        let (access_tx, access_rx) = channel::bounded(self.settings.access_queue);
        let (stop_tx, stop_rx) = channel::bounded(1);

        let worker = Worker {
            name: NAME.to_string(),
            items_rx,
            access_rx,
            stop_rx,
            on_evict: Arc::clone(&self.on_evict),
            counters: Arc::clone(&self.counters),
            stats_interval: self.settings.stats_interval,
        };

        let slot: Arc<PolicySlot> = Arc::new(Mutex::new(Some(policy)));
        let boot = Arc::clone(&slot);

        let handle = thread::Builder::new()
            .name(format!("{}-worker", NAME))
            .spawn(move || {
                let policy = boot.lock().take();
                policy.map(|policy| worker.run(policy))
            })
            .map_err(|err| {
                error!(name = NAME, component = "evictor", error = %err, "worker spawn failed");
                release_unstarted(&slot);
                EvictorError::Spawn(err)
            })?;

        Ok(Generation {
            items_tx,
            access_tx,
            stop_tx,
            handle,
        })
    }
}

impl Drop for Evictor {
    fn drop(&mut self) {
        if self.is_closed() {
            return;
        }
        if let Err(err) = self.close() {
            error!(name = NAME, component = "evictor", error = %err, "close on drop failed");
        }
    }
}
