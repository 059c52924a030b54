//! The mailbox collaborator seam.
//!
//! Item storage and retrieval are external to the engine; this trait is
//! the narrow interface the coordinator consumes. [`MemoryMailStore`]
//! backs the tests.

use crate::error::EngineResult;
use aerosync_protocol::Folder;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// A stored mailbox item as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredItem {
    /// Server-assigned item reference.
    pub server_id: String,
    /// Message subject.
    pub subject: String,
    /// Sender address.
    pub from: String,
    /// Recipient addresses.
    pub to: String,
    /// Receipt timestamp, preformatted for the wire.
    pub date_received: String,
    /// Read flag.
    pub read: bool,
    /// Plain-text body.
    pub body: String,
}

/// What happened to an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    /// The item is new to the client.
    Add(StoredItem),
    /// The item's fields changed.
    Change(StoredItem),
    /// The item was removed.
    Delete {
        /// Server id of the removed item.
        server_id: String,
    },
}

/// One pending change in a collection, positioned by a monotonic
/// change sequence. The sequence doubles as the drain cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemChange {
    /// Monotonic position of this change within the collection.
    pub sequence: u64,
    /// The change itself.
    pub kind: ChangeKind,
}

impl ItemChange {
    /// Server id of the item this change refers to.
    pub fn server_id(&self) -> &str {
        match &self.kind {
            ChangeKind::Add(item) | ChangeKind::Change(item) => &item.server_id,
            ChangeKind::Delete { server_id } => server_id,
        }
    }
}

/// Item retrieval interface the engine consumes.
///
/// Implementations may block (they typically sit in front of a real
/// mailbox); the engine calls them before any state is committed, so a
/// failure here aborts the exchange without mutating sync state.
pub trait MailStore: Send + Sync {
    /// Returns up to `limit` changes with sequence greater than `cursor`,
    /// in ascending sequence order (oldest pending change first).
    fn changes_since(
        &self,
        collection_id: &str,
        cursor: u64,
        limit: usize,
    ) -> EngineResult<Vec<ItemChange>>;

    /// Counts changes with sequence greater than `cursor`.
    fn pending_count(&self, collection_id: &str, cursor: u64) -> EngineResult<usize>;

    /// Lists the synchronizable folders.
    fn folders(&self) -> EngineResult<Vec<Folder>>;
}

/// An in-memory mail store for tests and examples.
#[derive(Debug, Default)]
pub struct MemoryMailStore {
    changes: RwLock<HashMap<String, Vec<ItemChange>>>,
    folders: RwLock<Vec<Folder>>,
    sequence: AtomicU64,
}

impl MemoryMailStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a folder.
    pub fn add_folder(&self, folder: Folder) {
        self.folders.write().push(folder);
    }

    /// Records an Add change and returns its sequence.
    pub fn deliver(&self, collection_id: &str, item: StoredItem) -> u64 {
        self.record(collection_id, ChangeKind::Add(item))
    }

    /// Records a Change change and returns its sequence.
    pub fn update(&self, collection_id: &str, item: StoredItem) -> u64 {
        self.record(collection_id, ChangeKind::Change(item))
    }

    /// Records a Delete change and returns its sequence.
    pub fn remove(&self, collection_id: &str, server_id: impl Into<String>) -> u64 {
        self.record(
            collection_id,
            ChangeKind::Delete {
                server_id: server_id.into(),
            },
        )
    }

    fn record(&self, collection_id: &str, kind: ChangeKind) -> u64 {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.changes
            .write()
            .entry(collection_id.to_string())
            .or_default()
            .push(ItemChange { sequence, kind });
        sequence
    }
}

impl MailStore for MemoryMailStore {
    fn changes_since(
        &self,
        collection_id: &str,
        cursor: u64,
        limit: usize,
    ) -> EngineResult<Vec<ItemChange>> {
        let changes = self.changes.read();
        Ok(changes
            .get(collection_id)
            .map(|list| {
                list.iter()
                    .filter(|c| c.sequence > cursor)
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn pending_count(&self, collection_id: &str, cursor: u64) -> EngineResult<usize> {
        let changes = self.changes.read();
        Ok(changes
            .get(collection_id)
            .map(|list| list.iter().filter(|c| c.sequence > cursor).count())
            .unwrap_or(0))
    }

    fn folders(&self) -> EngineResult<Vec<Folder>> {
        Ok(self.folders.read().clone())
    }
}
