// Count-Min Sketch with 4-bit counters.

use super::helper::{next_pow2, probes};

const NIBBLE_MASK: u64 = 0xF;
const MASK_NIBBLES_64: u64 = 0x7777777777777777;
const PROBES: usize = 4;

/// Sketch is a TinyLFU-style Count-Min Sketch using 4-bit (nibble) counters.
///
/// Not synchronized: owned and mutated by a single thread.
pub struct Sketch {
    /// Packed 4-bit counters: 16 counters per u64.
    words: Vec<u64>,
    /// numCounters-1; numCounters is a power of two.
    mask: u64,
}

impl Sketch {
    /// Creates a sketch with at least `num_counters` counters.
    pub fn new(num_counters: usize) -> Self {
        let num_counters = next_pow2(num_counters.max(16));
        Self {
            words: vec![0; num_counters / 16],
            mask: (num_counters - 1) as u64,
        }
    }

    /// Increments the 4 counters chosen for `h`, saturating at 15.
    pub fn increment(&mut self, h: u64) {
        for idx in probes::<PROBES>(h, self.mask) {
            let (w, sh) = word_shift(idx);
            if (self.words[w] >> sh) & NIBBLE_MASK != NIBBLE_MASK {
                self.words[w] += 1 << sh;
            }
        }
    }

    /// Returns the min of the 4 counters for `h`.
    pub fn estimate(&self, h: u64) -> u8 {
        probes::<PROBES>(h, self.mask)
            .into_iter()
            .map(|idx| {
                let (w, sh) = word_shift(idx);
                ((self.words[w] >> sh) & NIBBLE_MASK) as u8
            })
            .min()
            .unwrap_or(0)
    }

    /// Halves all 4-bit lanes: new = (old >> 1) & maskNibbles64.
    pub fn reset(&mut self) {
        for word in self.words.iter_mut() {
            *word = (*word >> 1) & MASK_NIBBLES_64;
        }
    }

    /// Zeroes every counter.
    pub fn clear(&mut self) {
        self.words.iter_mut().for_each(|w| *w = 0);
    }

    /// Number of counters.
    pub fn num_counters(&self) -> usize {
        self.words.len() * 16
    }
}

/// Maps a counter index to (word index, bit shift) inside words[].
fn word_shift(idx: usize) -> (usize, u32) {
    // 16 nibbles per word => word = idx / 16, shift = (idx % 16) * 4
    (idx >> 4, ((idx & 0xF) << 2) as u32)
}
