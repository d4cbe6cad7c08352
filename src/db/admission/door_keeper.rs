//! Doorkeeper (Bloom-like admission filter).
//

use super::helper::{next_pow2, probes};

const PROBES: usize = 3;

/// Doorkeeper is a lightweight, Bloom-like filter that absorbs the first
/// sighting of a key so one-hit wonders never reach the sketch.
pub struct Doorkeeper {
    /// Packed bit-array (64 bits per word).
    bits: Vec<u64>,
    /// Index mask: (numBitsRoundedToPow2 - 1).
    mask: u64,
}

impl Doorkeeper {
    /// Initializes the doorkeeper.
    pub fn new(total_bits: usize) -> Self {
        let n = next_pow2(total_bits.max(64));
        Self {
            bits: vec![0; n / 64],
            mask: (n - 1) as u64,
        }
    }

    /// Clears all bits.
    pub fn reset(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = 0);
    }

    /// Returns true if all probed bits are set.
    pub fn probably_seen(&self, h: u64) -> bool {
        probes::<PROBES>(h, self.mask)
            .into_iter()
            .all(|i| self.get(i))
    }

    /// Returns true if the key was probably seen already. Otherwise, sets the
    /// probed bits and returns false.
    pub fn seen_or_add(&mut self, h: u64) -> bool {
        let idx = probes::<PROBES>(h, self.mask);
        if idx.iter().all(|&i| self.get(i)) {
            return true;
        }
        for i in idx {
            let (w, b) = word_bit(i);
            self.bits[w] |= b;
        }
        false
    }

    fn get(&self, i: usize) -> bool {
        let (w, b) = word_bit(i);
        self.bits[w] & b != 0
    }
}

/// Maps a flat bit index to (wordIndex, bitMask) within bits.
fn word_bit(i: usize) -> (usize, u64) {
    (i >> 6, 1u64 << (i & 63))
}
