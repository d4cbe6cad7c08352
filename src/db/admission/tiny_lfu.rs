// TinyLFU frequency estimator.

use crate::config::Admission as AdmissionConfig;

use super::count_min_sketch::Sketch;
use super::door_keeper::Doorkeeper;

const DEFAULT_SAMPLE_MULTIPLIER: usize = 1;
const DEFAULT_DOOR_BITS_PER_COUNTER: usize = 8;

/// TinyLFU approximates access frequency with a doorkeeper in front of a
/// count-min sketch. Every `reset_at` increments all counters are halved so
/// old popularity fades.
pub struct TinyLfu {
    sketch: Sketch,
    door: Doorkeeper,
    incrs: u64,
    reset_at: u64,
}

impl TinyLfu {
    /// Creates an estimator with `num_counters` sketch counters.
    pub fn new(num_counters: usize, cfg: Option<&AdmissionConfig>) -> Self {
        let sample_multiplier = cfg
            .and_then(|c| c.sample_multiplier)
            .unwrap_or(DEFAULT_SAMPLE_MULTIPLIER)
            .max(1);
        let door_bits_per_counter = cfg
            .and_then(|c| c.door_bits_per_counter)
            .unwrap_or(DEFAULT_DOOR_BITS_PER_COUNTER)
            .max(1);

        let sketch = Sketch::new(num_counters);
        let door = Doorkeeper::new(sketch.num_counters().saturating_mul(door_bits_per_counter));
        let reset_at = (sketch.num_counters() as u64).saturating_mul(sample_multiplier as u64);

        Self {
            sketch,
            door,
            incrs: 0,
            reset_at,
        }
    }

    /// Records one access of `key`.
    pub fn increment(&mut self, key: u64) {
        if self.door.seen_or_add(key) {
            self.sketch.increment(key);
        }
        self.incrs += 1;
        if self.incrs >= self.reset_at {
            self.reset();
        }
    }

    /// Estimated access count of `key`.
    pub fn estimate(&self, key: u64) -> i64 {
        let mut hits = self.sketch.estimate(key) as i64;
        if self.door.probably_seen(key) {
            hits += 1;
        }
        hits
    }

    /// Ages the estimator: halves the sketch and empties the doorkeeper.
    pub fn reset(&mut self) {
        self.incrs = 0;
        self.door.reset();
        self.sketch.reset();
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        self.incrs = 0;
        self.door.reset();
        self.sketch.clear();
    }
}
