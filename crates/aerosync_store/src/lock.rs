//! Per-session-key mutual exclusion.

use crate::state::SessionKey;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Table size at which idle entries are first swept.
const SWEEP_MIN: usize = 1024;

#[derive(Debug, Default)]
struct LockTable {
    locks: HashMap<SessionKey, Arc<Mutex<()>>>,
    sweep_at: usize,
}

/// A lock table handing out one mutex per session key.
///
/// The coordinator holds the key's mutex for the whole of one exchange,
/// so the four state-machine branches execute as a single atomic unit
/// against the state store. Distinct keys get distinct mutexes and never
/// block each other.
///
/// Entries whose mutex is no longer held anywhere are swept out once
/// the table grows past a threshold, so a stream of never-repeating
/// device ids cannot grow the table without bound.
#[derive(Debug, Default)]
pub struct SessionLocks {
    table: Mutex<LockTable>,
}

impl SessionLocks {
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mutex for a key, creating it on first use.
    ///
    /// The returned handle stays valid even if another key is acquired
    /// concurrently; callers lock it for the duration of their exchange.
    /// An entry is only evicted while no handle to it is outstanding, so
    /// a key in active use always resolves to the same mutex.
    pub fn acquire(&self, key: &SessionKey) -> Arc<Mutex<()>> {
        let mut table = self.table.lock();
        if table.locks.len() >= table.sweep_at.max(SWEEP_MIN) {
            // Strong count 1 means the table holds the only reference.
            table.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            table.sweep_at = table.locks.len() * 2;
        }
        Arc::clone(table.locks.entry(key.clone()).or_default())
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.table.lock().locks.len()
    }

    /// True if no keys are tracked.
    pub fn is_empty(&self) -> bool {
        self.table.lock().locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn same_key_yields_same_mutex() {
        let locks = SessionLocks::new();
        let a = locks.acquire(&SessionKey::new("dev", "inbox"));
        let b = locks.acquire(&SessionKey::new("dev", "inbox"));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn different_keys_yield_different_mutexes() {
        let locks = SessionLocks::new();
        let a = locks.acquire(&SessionKey::new("dev", "inbox"));
        let b = locks.acquire(&SessionKey::new("dev", "sent"));
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn holding_one_key_does_not_block_another() {
        let locks = SessionLocks::new();
        let inbox = locks.acquire(&SessionKey::new("dev", "inbox"));
        let _held = inbox.lock();

        let sent = locks.acquire(&SessionKey::new("dev", "sent"));
        let handle = thread::spawn(move || {
            let _guard = sent.lock();
        });
        handle.join().unwrap();
    }

    #[test]
    fn idle_entries_are_evicted() {
        let locks = SessionLocks::new();
        // Each handle is dropped immediately, as a client that never
        // returns would leave it. Crossing the sweep threshold must
        // reclaim all of them.
        for i in 0..SWEEP_MIN + 10 {
            drop(locks.acquire(&SessionKey::new(format!("dev{i}"), "inbox")));
        }
        assert_eq!(locks.len(), 10);
    }

    #[test]
    fn held_locks_survive_eviction() {
        let locks = SessionLocks::new();
        let held = locks.acquire(&SessionKey::new("dev-held", "inbox"));
        let _guard = held.lock();

        for i in 0..SWEEP_MIN * 2 {
            drop(locks.acquire(&SessionKey::new(format!("dev{i}"), "inbox")));
        }

        // The held key still resolves to the same mutex.
        let again = locks.acquire(&SessionKey::new("dev-held", "inbox"));
        assert!(Arc::ptr_eq(&held, &again));
    }

    #[test]
    fn serializes_same_key_across_threads() {
        let locks = Arc::new(SessionLocks::new());
        let counter = Arc::new(Mutex::new(0u32));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = Arc::clone(&locks);
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                let key = SessionKey::new("dev", "inbox");
                let lock = locks.acquire(&key);
                let _guard = lock.lock();
                // Non-atomic read-modify-write; only safe under the lock.
                let value = *counter.lock();
                thread::yield_now();
                *counter.lock() = value + 1;
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(*counter.lock(), 8);
    }
}
