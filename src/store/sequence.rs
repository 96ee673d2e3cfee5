//! Sequence numbers for detecting superseded responses.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

/// Identifies one issued request for a logical key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    pub key: K,
    pub seq: u64,
}

/// Issues monotonically increasing tickets per key.
///
/// Only the most recently issued ticket for a key is current; a response
/// carrying any older ticket must be dropped.
#[derive(Debug)]
pub struct RequestTracker<K> {
    latest: Mutex<HashMap<K, u64>>,
}

impl<K: Eq + Hash + Clone> RequestTracker<K> {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(HashMap::new()),
        }
    }

    pub fn issue(&self, key: K) -> Ticket<K> {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let seq = latest.entry(key.clone()).or_insert(0);
        *seq += 1;
        Ticket { key, seq: *seq }
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.key) == Some(&ticket.seq)
    }
}

impl<K: Eq + Hash + Clone> Default for RequestTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
