// Policy double that journals every call and follows a scripted decision.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::db::policy::{Policy, Victim};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(u64, i64),
    Del(u64),
    Record(Vec<u64>),
    Clear,
    Close,
}

pub type Journal = Arc<Mutex<Vec<Call>>>;

type Decide = Box<dyn FnMut(u64, i64) -> (Vec<Victim>, bool) + Send>;

pub struct ScriptedPolicy {
    journal: Journal,
    decide: Decide,
    len: usize,
}

impl ScriptedPolicy {
    /// Admits everything, evicts nothing.
    pub fn admit_all() -> (Self, Journal) {
        Self::with(|_, _| (Vec::new(), true))
    }

    pub fn with<F>(decide: F) -> (Self, Journal)
    where
        F: FnMut(u64, i64) -> (Vec<Victim>, bool) + Send + 'static,
    {
        let journal: Journal = Arc::new(Mutex::new(Vec::new()));
        let policy = Self {
            journal: Arc::clone(&journal),
            decide: Box::new(decide),
            len: 0,
        };
        (policy, journal)
    }
}

impl Policy for ScriptedPolicy {
    fn add(&mut self, key: u64, cost: i64) -> (Vec<Victim>, bool) {
        self.journal.lock().push(Call::Add(key, cost));
        let (victims, added) = (self.decide)(key, cost);
        if added {
            self.len += 1;
        }
        self.len = self.len.saturating_sub(victims.len());
        (victims, added)
    }

    fn del(&mut self, key: u64) {
        self.journal.lock().push(Call::Del(key));
        self.len = self.len.saturating_sub(1);
    }

    fn record(&mut self, keys: &[u64]) {
        self.journal.lock().push(Call::Record(keys.to_vec()));
    }

    fn clear(&mut self) {
        self.journal.lock().push(Call::Clear);
        self.len = 0;
    }

    fn close(&mut self) {
        self.journal.lock().push(Call::Close);
        self.len = 0;
    }

    fn len(&self) -> usize {
        self.len
    }

    fn used_cost(&self) -> i64 {
        self.len as i64
    }
}
