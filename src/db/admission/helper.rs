// Hashing and sizing helpers shared by the admission filters.

/// Returns the smallest power-of-two >= x.
pub fn next_pow2(x: usize) -> usize {
    if x <= 1 {
        return 1;
    }
    x.checked_next_power_of_two().unwrap_or(1 << (usize::BITS - 1))
}

/// Produces well-diffused pseudo-independent values from a single 64-bit seed.
/// This is the SplitMix64 mixing function (public-domain; Steele et al.).
pub fn mix64(x: u64) -> u64 {
    const SPLITMIX64_INCREMENT: u64 = 0x9E3779B97F4A7C15;
    const SPLITMIX64_MUL1: u64 = 0xBF58476D1CE4E5B9;
    const SPLITMIX64_MUL2: u64 = 0x94D049BB133111EB;

    let mut x = x.wrapping_add(SPLITMIX64_INCREMENT);
    x = (x ^ (x >> 30)).wrapping_mul(SPLITMIX64_MUL1);
    x = (x ^ (x >> 27)).wrapping_mul(SPLITMIX64_MUL2);
    x ^ (x >> 31)
}

/// Derives `N` table indices for `h` by repeated mixing.
pub fn probes<const N: usize>(h: u64, mask: u64) -> [usize; N] {
    let mut out = [0usize; N];
    let mut hash = h;
    for slot in out.iter_mut() {
        *slot = (hash & mask) as usize;
        hash = mix64(hash);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_pow2() {
        assert_eq!(next_pow2(0), 1);
        assert_eq!(next_pow2(1), 1);
        assert_eq!(next_pow2(3), 4);
        assert_eq!(next_pow2(1024), 1024);
        assert_eq!(next_pow2(1025), 2048);
    }

    #[test]
    fn test_probes_stay_within_mask() {
        for h in [0u64, 1, 42, u64::MAX] {
            let idx: [usize; 4] = probes(h, 255);
            assert!(idx.iter().all(|&i| i < 256));
        }
        assert_eq!(probes::<3>(7, 1023), probes::<3>(7, 1023));
    }
}
