//! Evictor worker loop: the only code that ever touches the policy.

use crossbeam::channel::{self, select, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace};

use crate::db::policy::Policy;

use super::counters::{Counters, Stats};
use super::item::Item;
use super::telemetry;
use super::OnEvict;

pub(crate) struct Worker {
    pub(crate) name: String,
    pub(crate) items_rx: Receiver<Item>,
    pub(crate) access_rx: Receiver<Vec<u64>>,
    pub(crate) stop_rx: Receiver<()>,
    pub(crate) on_evict: OnEvict,
    pub(crate) counters: Arc<Counters>,
    pub(crate) stats_interval: Duration,
}

impl Worker {
    /// Drains requests into `policy` until stopped and hands it back.
    pub(crate) fn run(self, mut policy: Box<dyn Policy>) -> Box<dyn Policy> {
        let Worker {
            name,
            items_rx,
            access_rx,
            stop_rx,
            on_evict,
            counters,
            stats_interval,
        } = self;

        let ticker = if stats_interval.is_zero() {
            channel::never()
        } else {
            channel::tick(stats_interval)
        };
        let mut last = Stats::default();

        info!(name = %name, component = "evictor", "worker upped");

        loop {
            // A pending stop wins over anything still queued.
            if stop_rx.try_recv().is_ok() {
                break;
            }

            select! {
                recv(stop_rx) -> _ => break,
                recv(items_rx) -> msg => match msg {
                    Ok(item) => process(policy.as_mut(), item, &on_evict, &counters),
                    Err(_) => break,
                },
                recv(access_rx) -> msg => {
                    if let Ok(keys) = msg {
                        policy.record(&keys);
                    }
                },
                recv(ticker) -> _ => {
                    let now = counters.snapshot();
                    telemetry::log_stats(&name, &now.since(&last));
                    last = now;
                },
            }
        }

        info!(name = %name, component = "evictor", "worker is gone");
        policy
    }
}

/// Applies one request to the policy and reports every key that must leave
/// the cache.
pub(crate) fn process(policy: &mut dyn Policy, item: Item, on_evict: &OnEvict, counters: &Counters) {
    match item {
        Item::New { key, cost } => {
            let (victims, added) = policy.add(key, cost);
            if added {
                Counters::inc(&counters.admitted);
            } else {
                Counters::inc(&counters.rejected);
                trace!(key, cost, "rejected");
                on_evict(key);
            }
            for victim in victims {
                Counters::inc(&counters.evicted);
                trace!(key = victim.key, cost = victim.cost, "evicted");
                on_evict(victim.key);
            }
        }
        Item::Delete { key } => {
            policy.del(key);
            Counters::inc(&counters.deleted);
        }
    }
    counters.set_policy_size(policy.len(), policy.used_cost());
}
