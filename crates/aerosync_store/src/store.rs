//! State store trait and the in-memory implementation.

use crate::error::StoreResult;
use crate::state::{SessionKey, SyncState};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Durable storage for per-session sync state.
///
/// Storage engine agnostic; this trait is the seam for persistent
/// implementations. Implementors only need point reads and
/// whole-record writes keyed by [`SessionKey`]; serialization across
/// concurrent writers for one key is the coordinator's job, via
/// [`crate::SessionLocks`].
pub trait SyncStateStore: Send + Sync {
    /// Loads the state row for a key, if one exists.
    fn load(&self, key: &SessionKey) -> StoreResult<Option<SyncState>>;

    /// Writes the state row for a key, replacing any previous row.
    fn commit(&self, key: &SessionKey, state: SyncState) -> StoreResult<()>;

    /// Deletes the state row for a key, if present.
    fn remove(&self, key: &SessionKey) -> StoreResult<()>;
}

/// An in-memory state store.
///
/// Suitable for tests and for deployments that accept clients falling
/// back to a full resync after a restart.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    states: RwLock<HashMap<SessionKey, SyncState>>,
}

impl MemoryStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of state rows held.
    pub fn len(&self) -> usize {
        self.states.read().len()
    }

    /// True if no state rows are held.
    pub fn is_empty(&self) -> bool {
        self.states.read().is_empty()
    }
}

impl SyncStateStore for MemoryStateStore {
    fn load(&self, key: &SessionKey) -> StoreResult<Option<SyncState>> {
        Ok(self.states.read().get(key).cloned())
    }

    fn commit(&self, key: &SessionKey, state: SyncState) -> StoreResult<()> {
        self.states.write().insert(key.clone(), state);
        Ok(())
    }

    fn remove(&self, key: &SessionKey) -> StoreResult<()> {
        self.states.write().remove(key);
        Ok(())
    }
}
