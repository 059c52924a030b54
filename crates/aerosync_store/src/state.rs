//! The per-(device, collection) synchronization state record.

/// Identifies one synchronization lineage: a device paired with one
/// collection. The key is the unit of serialization; requests for
/// different keys never block each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// Client device identifier.
    pub device_id: String,
    /// Collection (folder) identifier.
    pub collection_id: String,
}

impl SessionKey {
    /// Creates a session key.
    pub fn new(device_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.device_id, self.collection_id)
    }
}

/// Durable synchronization state for one session key.
///
/// Mutated only by the sync coordinator under the per-key lock, and only
/// committed after a response has been fully computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncState {
    /// Last token the client has acknowledged.
    pub current_token: String,
    /// Token issued with the most recent response, awaiting acknowledgment.
    pub next_token: String,
    /// The exact serialized response sent with `next_token`, kept for
    /// byte-identical replay on retransmission.
    pub pending_response: Vec<u8>,
    /// How far the collection has been drained (last included change
    /// sequence).
    pub cursor: u64,
    /// Current adapted window size.
    pub window_size: u32,
    /// Consecutive zero-progress observations for the loop detector.
    pub zero_progress_count: u32,
    /// Monotonic counter backing token issuance within this lineage.
    pub sequence: u64,
}

impl SyncState {
    /// A fresh state row as created on the first request of a lineage.
    pub fn initial(window_size: u32) -> Self {
        Self {
            current_token: String::new(),
            next_token: String::new(),
            pending_response: Vec::new(),
            cursor: 0,
            window_size,
            zero_progress_count: 0,
            sequence: 0,
        }
    }
}
