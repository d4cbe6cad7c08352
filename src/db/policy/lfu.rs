//! Sampled LFU eviction with TinyLFU admission.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

use crate::config::{Config, ConfigTrait, DEFAULT_SAMPLE_SIZE};
use crate::db::admission::TinyLfu;

use super::policy::{Policy, Victim};

/// Default policy: admits a new key only if TinyLFU estimates it to be at
/// least as popular as every victim picked from a small random sample of
/// tracked keys.
pub struct LfuPolicy {
    admit: TinyLfu,
    evict: SampledLfu,
    sample_size: usize,
    rng: StdRng,
}

impl LfuPolicy {
    /// Creates a policy sized from the eviction section of `cfg`.
    pub fn new(cfg: &Config) -> Self {
        let eviction = cfg.eviction();
        Self::with_rng(
            eviction.num_counters.max(1) as usize,
            eviction.max_cost,
            eviction.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            cfg,
            StdRng::from_entropy(),
        )
    }

    /// Creates a policy with a deterministic sampling sequence.
    pub fn with_seed(cfg: &Config, seed: u64) -> Self {
        let eviction = cfg.eviction();
        Self::with_rng(
            eviction.num_counters.max(1) as usize,
            eviction.max_cost,
            eviction.sample_size.unwrap_or(DEFAULT_SAMPLE_SIZE),
            cfg,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(
        num_counters: usize,
        max_cost: i64,
        sample_size: usize,
        cfg: &Config,
        rng: StdRng,
    ) -> Self {
        Self {
            admit: TinyLfu::new(num_counters, cfg.admission()),
            evict: SampledLfu::new(max_cost),
            sample_size: sample_size.max(1),
            rng,
        }
    }

    /// Returns the tracked cost of `key`.
    pub fn cost_of(&self, key: u64) -> Option<i64> {
        self.evict.cost_of(key)
    }
}

impl Policy for LfuPolicy {
    fn add(&mut self, key: u64, cost: i64) -> (Vec<Victim>, bool) {
        let cost = cost.max(0);

        // Can't add an item bigger than the entire cache.
        if cost > self.evict.max_cost {
            return (Vec::new(), false);
        }

        // A tracked key keeps its place when the new cost still fits,
        // otherwise it competes for room like a newcomer.
        if let Some(old) = self.evict.cost_of(key) {
            if self.evict.room_left(cost - old) >= 0 {
                self.evict.update(key, cost);
                return (Vec::new(), true);
            }
            self.evict.del(key);
        }

        let mut room = self.evict.room_left(cost);
        if room >= 0 {
            self.evict.add(key, cost);
            return (Vec::new(), true);
        }

        let inc_hits = self.admit.estimate(key);
        let mut sample: Vec<Victim> = Vec::with_capacity(self.sample_size);
        let mut victims = Vec::new();

        while room < 0 {
            self.evict
                .fill_sample(&mut sample, &mut self.rng, self.sample_size);

            let admit = &self.admit;
            let min = sample
                .iter()
                .enumerate()
                .map(|(idx, v)| (idx, admit.estimate(v.key)))
                .min_by_key(|&(_, hits)| hits);

            let Some((min_idx, min_hits)) = min else {
                // Nothing left to evict.
                return (victims, false);
            };

            if inc_hits < min_hits {
                return (victims, false);
            }

            let victim = sample.swap_remove(min_idx);
            self.evict.del(victim.key);
            victims.push(victim);
            room = self.evict.room_left(cost);
        }

        self.evict.add(key, cost);
        (victims, true)
    }

    fn del(&mut self, key: u64) {
        self.evict.del(key);
    }

    fn record(&mut self, keys: &[u64]) {
        for &key in keys {
            self.admit.increment(key);
        }
    }

    fn clear(&mut self) {
        self.evict.clear();
        self.admit.clear();
    }

    fn close(&mut self) {
        self.clear();
        self.evict.keys.shrink_to_fit();
        self.evict.costs.shrink_to_fit();
    }

    fn len(&self) -> usize {
        self.evict.keys.len()
    }

    fn used_cost(&self) -> i64 {
        self.evict.used
    }
}

/// Cost bookkeeping with O(1) uniform random sampling.
///
/// `keys` is a dense array of tracked keys; `costs` maps a key to its index
/// in `keys` and its cost.
struct SampledLfu {
    max_cost: i64,
    used: i64,
    keys: Vec<u64>,
    costs: HashMap<u64, (usize, i64)>,
}

impl SampledLfu {
    fn new(max_cost: i64) -> Self {
        Self {
            max_cost,
            used: 0,
            keys: Vec::new(),
            costs: HashMap::new(),
        }
    }

    /// Budget left after taking `cost`. `used` never exceeds `max_cost`, so
    /// only the final subtraction can leave the i64 range.
    fn room_left(&self, cost: i64) -> i64 {
        (self.max_cost - self.used).saturating_sub(cost)
    }

    fn add(&mut self, key: u64, cost: i64) {
        self.costs.insert(key, (self.keys.len(), cost));
        self.keys.push(key);
        self.used += cost;
    }

    fn cost_of(&self, key: u64) -> Option<i64> {
        self.costs.get(&key).map(|&(_, cost)| cost)
    }

    fn update(&mut self, key: u64, cost: i64) {
        if let Some((_, old)) = self.costs.get_mut(&key) {
            self.used += cost - *old;
            *old = cost;
        }
    }

    fn del(&mut self, key: u64) -> Option<i64> {
        let (idx, cost) = self.costs.remove(&key)?;
        self.keys.swap_remove(idx);
        if let Some(&moved) = self.keys.get(idx) {
            if let Some(slot) = self.costs.get_mut(&moved) {
                slot.0 = idx;
            }
        }
        self.used -= cost;
        Some(cost)
    }

    /// Tops `sample` up to `want` distinct tracked keys.
    fn fill_sample(&self, sample: &mut Vec<Victim>, rng: &mut StdRng, want: usize) {
        let want = want.min(self.keys.len());
        while sample.len() < want {
            let key = self.keys[rng.gen_range(0..self.keys.len())];
            if sample.iter().any(|v| v.key == key) {
                continue;
            }
            if let Some(&(_, cost)) = self.costs.get(&key) {
                sample.push(Victim { key, cost });
            }
        }
    }

    fn clear(&mut self) {
        self.used = 0;
        self.keys.clear();
        self.costs.clear();
    }
}
