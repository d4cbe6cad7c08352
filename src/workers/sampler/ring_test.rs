//! Tests for the sampling ring buffer.

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    use crate::config::Sampling;
    use crate::workers::sampler::{RingBuffer, RingConsumer};

    /// Collects every accepted batch; can be told to refuse.
    #[derive(Default)]
    struct Collector {
        batches: Mutex<Vec<Vec<u64>>>,
        refuse: AtomicBool,
    }

    impl RingConsumer for Collector {
        fn push(&self, keys: Vec<u64>) -> Result<(), Vec<u64>> {
            if self.refuse.load(Ordering::Relaxed) {
                return Err(keys);
            }
            self.batches.lock().push(keys);
            Ok(())
        }
    }

    fn cfg(stripes: usize, batch_size: usize) -> Sampling {
        Sampling {
            stripes: Some(stripes),
            batch_size: Some(batch_size),
            queue: None,
        }
    }

    #[test]
    fn test_full_batch_is_forwarded() {
        let ring = RingBuffer::new(Collector::default(), Some(&cfg(1, 4)));
        for key in 1..=3 {
            ring.push(key);
        }
        assert!(ring.consumer().batches.lock().is_empty(), "batch not full yet");

        ring.push(4);
        let batches = ring.consumer().batches.lock();
        assert_eq!(batches.as_slice(), &[vec![1, 2, 3, 4]]);
    }

    #[test]
    fn test_refused_batch_is_dropped_and_stripe_reused() {
        let ring = RingBuffer::new(Collector::default(), Some(&cfg(1, 2)));
        ring.consumer().refuse.store(true, Ordering::Relaxed);
        ring.push(1);
        ring.push(2);
        assert_eq!(ring.dropped(), 2);

        ring.consumer().refuse.store(false, Ordering::Relaxed);
        ring.push(3);
        ring.push(4);
        assert_eq!(ring.consumer().batches.lock().as_slice(), &[vec![3, 4]]);
    }

    #[test]
    fn test_stripes_are_round_robin() {
        let ring = RingBuffer::new(Collector::default(), Some(&cfg(2, 2)));
        for key in 1..=4 {
            ring.push(key);
        }
        let mut batches = ring.consumer().batches.lock().clone();
        batches.sort();
        assert_eq!(batches, vec![vec![1, 3], vec![2, 4]]);
    }

    #[test]
    fn test_reset_discards_partial_batches() {
        let ring = RingBuffer::new(Collector::default(), Some(&cfg(1, 3)));
        ring.push(1);
        ring.push(2);
        ring.reset();
        ring.push(3);
        ring.push(4);
        ring.push(5);
        assert_eq!(ring.consumer().batches.lock().as_slice(), &[vec![3, 4, 5]]);
    }

    #[test]
    fn test_concurrent_push_accounts_for_every_key() {
        let ring = Arc::new(RingBuffer::new(Collector::default(), Some(&cfg(4, 8))));
        let threads = 8u64;
        let per_thread = 10_000u64;

        let handles: Vec<_> = (0..threads)
            .map(|t| {
                let ring = Arc::clone(&ring);
                thread::spawn(move || {
                    for i in 0..per_thread {
                        ring.push(t * per_thread + i);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().expect("pusher panicked");
        }

        let forwarded: u64 = ring
            .consumer()
            .batches
            .lock()
            .iter()
            .map(|b| b.len() as u64)
            .sum();
        // Whatever was not forwarded is either dropped or still buffered
        // (at most one partial batch per stripe).
        let total = threads * per_thread;
        assert!(forwarded + ring.dropped() <= total);
        assert!(forwarded + ring.dropped() + 4 * 8 >= total);
    }
}
