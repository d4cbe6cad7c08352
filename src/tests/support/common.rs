// Common test utilities.

use crossbeam::channel::{self, Receiver, Sender};
use std::sync::OnceLock;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::{new_test_config, Config};
use crate::logger;

pub const SHORT: Duration = Duration::from_millis(150);
pub const LONG: Duration = Duration::from_secs(5);

static LOGGER: OnceLock<()> = OnceLock::new();

/// Installs the tracing subscriber once per test binary.
pub fn init_test_logger() {
    LOGGER.get_or_init(|| {
        // Another test framework may already own the global subscriber.
        let _ = logger::init(&new_test_config());
    });
}

/// Test config with the given cost budget and request queue capacity.
pub fn config_with(max_cost: i64, buffer_items: usize) -> Config {
    let mut cfg = new_test_config();
    cfg.cache.eviction.max_cost = max_cost;
    cfg.cache.eviction.buffer_items = Some(buffer_items);
    cfg
}

/// Polls `f` until it holds or `timeout` elapses.
pub fn wait_until<F: FnMut() -> bool>(timeout: Duration, mut f: F) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if f() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(2));
    }
}

/// Eviction callback that forwards every key to a channel.
pub fn recorder() -> (impl Fn(u64) + Send + Sync + 'static, Receiver<u64>) {
    let (tx, rx): (Sender<u64>, Receiver<u64>) = channel::unbounded();
    let on_evict = move |key: u64| {
        let _ = tx.send(key);
    };
    (on_evict, rx)
}

/// Collects everything that arrives on `rx` within `window`.
pub fn drain_for(rx: &Receiver<u64>, window: Duration) -> Vec<u64> {
    let deadline = Instant::now() + window;
    let mut out = Vec::new();
    while let Ok(key) = rx.recv_deadline(deadline) {
        out.push(key);
    }
    out
}
