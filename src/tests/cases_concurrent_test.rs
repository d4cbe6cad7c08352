// Concurrent writers against one store and evictor.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use crate::db::storage::{Map, Store};
use crate::support::{config_with, wait_until, LONG};
use crate::workers::evictor::Evictor;

#[test]
fn test_concurrent_writers_respect_budget() {
    const WRITERS: u64 = 8;
    const PER_WRITER: u64 = 500;
    const BUDGET: i64 = 64;

    let cfg = config_with(BUDGET, 32);
    let store: Arc<Map<u64>> = Arc::new(Map::new(&cfg));
    let reported: Arc<Mutex<HashMap<u64, usize>>> = Arc::new(Mutex::new(HashMap::new()));

    let sink = Arc::clone(&store);
    let seen = Arc::clone(&reported);
    let evictor = Evictor::new(&cfg, move |key| {
        sink.del(key);
        *seen.lock().entry(key).or_default() += 1;
    })
    .unwrap();

    thread::scope(|s| {
        for w in 0..WRITERS {
            let store = &store;
            let evictor = &evictor;
            s.spawn(move || {
                for i in 0..PER_WRITER {
                    let key = w * 10_000 + i;
                    store.set(key, key);
                    evictor.add(key, 1).unwrap();
                    if i % 4 == 0 {
                        evictor.touch(key);
                        let _ = store.get(key);
                    }
                }
            });
        }
    });

    let total = (WRITERS * PER_WRITER) as i64;
    assert!(wait_until(LONG, || {
        let stats = evictor.stats();
        stats.admitted + stats.rejected == total
    }));

    // Joining the worker flushes the callbacks of the last request.
    evictor.close().unwrap();

    let stats = evictor.stats();
    assert!(stats.used_cost <= BUDGET);
    assert_eq!(store.len() as i64, stats.tracked_keys);
    assert!(reported.lock().values().all(|&n| n == 1));
    assert_eq!(reported.lock().len() as i64, total - stats.tracked_keys);
}
