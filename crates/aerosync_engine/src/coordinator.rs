//! The sync coordinator: the per-session state machine.

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::loopdetect::LoopDetector;
use crate::mailstore::{ChangeKind, ItemChange, MailStore};
use crate::planner::{PendingOperation, WindowPlanner};
use crate::projector::ItemProjector;
use crate::token::{SyncKey, BOOTSTRAP_KEY};
use aerosync_protocol::{
    BodyOptions, ChangeBatch, CollectionRequest, CollectionResponse, FolderSyncRequest,
    FolderSyncResponse, ItemOperation, Status, SyncRequest, SyncResponse,
};
use aerosync_store::{SessionKey, SessionLocks, SyncState, SyncStateStore};
use aerosync_wbxml::{decode, encode, Element};
use std::sync::Arc;

/// Folder-hierarchy key issued once the client has the full list.
const FOLDER_HIERARCHY_KEY: &str = "1";

/// Drives synchronization exchanges against the state and mail stores.
///
/// One coordinator serves all devices. Each (device, collection) exchange
/// runs under that key's mutex from [`SessionLocks`], so the token
/// branches below observe and commit state atomically per lineage while
/// unrelated lineages proceed in parallel.
///
/// The client's token selects one of four branches:
///
/// 1. token == acknowledged token: the previous response was lost;
///    replay the cached bytes without touching state.
/// 2. token == issued-but-unacknowledged token: the client received the
///    previous response; acknowledge it and compute the next batch.
/// 3. bootstrap token on an advanced lineage: the client lost its state;
///    reset the lineage and start over from the beginning.
/// 4. anything else: reject, instructing the client to bootstrap.
///
/// State is committed only after the response has been fully computed
/// and serialized, so a crash or cancellation mid-exchange leaves the
/// previous state intact and the client's retry replays or recomputes
/// cleanly.
pub struct SyncCoordinator<S, M> {
    config: EngineConfig,
    store: Arc<S>,
    mail: Arc<M>,
    locks: SessionLocks,
    detector: LoopDetector,
    projector: ItemProjector,
}

impl<S: SyncStateStore, M: MailStore> SyncCoordinator<S, M> {
    /// Creates a coordinator over the given stores.
    pub fn new(config: EngineConfig, store: Arc<S>, mail: Arc<M>) -> Self {
        let detector = LoopDetector::new(config.zero_progress_threshold, config.window_shrink_step);
        let projector = ItemProjector::new(config.preview_max_chars);
        Self {
            config,
            store,
            mail,
            locks: SessionLocks::new(),
            detector,
            projector,
        }
    }

    /// Runs a full Sync exchange for one device and builds the response
    /// tree.
    ///
    /// Collections are processed independently: a bad token in one
    /// yields a per-collection reset status without disturbing its
    /// siblings. Transient store failures abort the whole exchange
    /// instead, leaving every lineage unchanged.
    pub fn handle_sync(&self, device_id: &str, request: &SyncRequest) -> EngineResult<Element> {
        let mut collections = Vec::with_capacity(request.collections.len());
        for collection in &request.collections {
            let key = SessionKey::new(device_id, &collection.collection_id);
            let lock = self.locks.acquire(&key);
            let _guard = lock.lock();

            match self.sync_collection(&key, collection) {
                Ok(element) => collections.push(element),
                Err(error) if error.is_session_reset() => {
                    tracing::warn!(session = %key, client_key = %collection.sync_key,
                        "unknown sync key, instructing client to restart");
                    collections.push(
                        CollectionResponse {
                            collection_id: collection.collection_id.clone(),
                            sync_key: BOOTSTRAP_KEY.to_string(),
                            status: Status::InvalidSyncKey,
                            batch: ChangeBatch::empty(),
                        }
                        .to_element(),
                    );
                }
                Err(error) => return Err(error),
            }
        }
        Ok(SyncResponse::envelope(collections))
    }

    /// One collection's exchange; the caller holds the key's lock.
    fn sync_collection(
        &self,
        key: &SessionKey,
        request: &CollectionRequest,
    ) -> EngineResult<Element> {
        let client_key = SyncKey::from_wire(request.sync_key.clone());

        let mut state = match self.store.load(key)? {
            Some(state) => state,
            None => {
                if !client_key.is_bootstrap() {
                    return Err(self.invalid_key(key, client_key.as_str()));
                }
                let mut fresh = SyncState::initial(self.config.default_window_size);
                fresh.current_token = SyncKey::bootstrap().to_string();
                fresh
            }
        };

        // Retransmission of the acknowledged token replays the cached
        // response byte for byte, with no state mutation at all.
        if client_key.as_str() == state.current_token && !state.pending_response.is_empty() {
            tracing::debug!(session = %key, token = %client_key, "replaying cached response");
            return Ok(decode(&state.pending_response)?);
        }

        if !state.next_token.is_empty() && client_key.as_str() == state.next_token {
            // The client saw the previous response; the pending token
            // becomes the acknowledged one and the batch it carried is
            // considered delivered.
            state.current_token = state.next_token.clone();
        } else if client_key.is_bootstrap() {
            if state.current_token != BOOTSTRAP_KEY {
                tracing::info!(session = %key, "bootstrap key on advanced lineage, resetting");
                state = SyncState::initial(self.config.default_window_size);
                state.current_token = SyncKey::bootstrap().to_string();
            }
            // A fresh lineage falls through to compute its first batch.
        } else {
            return Err(self.invalid_key(key, client_key.as_str()));
        }

        self.compute_and_commit(key, request, state)
    }

    /// Computes the next batch, serializes the response, and commits the
    /// advanced state. Nothing is persisted until the serialized bytes
    /// exist, so every failure before the final commit is invisible.
    fn compute_and_commit(
        &self,
        key: &SessionKey,
        request: &CollectionRequest,
        mut state: SyncState,
    ) -> EngineResult<Element> {
        state.sequence += 1;
        let issued = SyncKey::issue(state.sequence);

        let window = request
            .window_size
            .unwrap_or(self.config.default_window_size)
            .min(state.window_size)
            .max(1);

        let batch = if request.get_changes {
            // One extra candidate past the window distinguishes "drained"
            // from "more remain" without a second store round trip.
            let changes =
                self.mail
                    .changes_since(&key.collection_id, state.cursor, window as usize + 1)?;
            let available = changes.len();
            let candidates = changes
                .into_iter()
                .map(|change| self.to_pending(change, &request.options))
                .collect();

            let plan = WindowPlanner::plan(candidates, window, self.config.byte_budget)?;
            let natural = if plan.forced { 0 } else { plan.selected.len() };
            self.detector.observe(&mut state, available, natural);

            if let Some(last) = plan.selected.last() {
                state.cursor = last.sequence;
            }
            tracing::debug!(session = %key, token = %issued, sent = plan.selected.len(),
                has_more = plan.has_more, "computed change batch");
            ChangeBatch {
                operations: plan.selected.into_iter().map(|p| p.operation).collect(),
                has_more: plan.has_more,
            }
        } else {
            ChangeBatch::empty()
        };

        state.next_token = issued.as_str().to_string();
        let response = CollectionResponse {
            collection_id: key.collection_id.clone(),
            sync_key: issued.as_str().to_string(),
            status: Status::Ok,
            batch,
        };
        let element = response.to_element();
        state.pending_response = encode(&element)?;

        self.store.commit(key, state)?;
        Ok(element)
    }

    fn to_pending(&self, change: ItemChange, options: &BodyOptions) -> PendingOperation {
        let operation = match change.kind {
            ChangeKind::Add(item) => ItemOperation::Add {
                fields: self.projector.project(&item, options),
            },
            ChangeKind::Change(item) => ItemOperation::Change {
                fields: self.projector.project(&item, options),
            },
            ChangeKind::Delete { server_id } => ItemOperation::Delete { server_id },
        };
        PendingOperation {
            sequence: change.sequence,
            operation,
        }
    }

    fn invalid_key(&self, key: &SessionKey, client_key: &str) -> EngineError {
        EngineError::InvalidSyncKey {
            device_id: key.device_id.clone(),
            collection_id: key.collection_id.clone(),
            client_key: client_key.to_string(),
        }
    }

    /// Runs a FolderSync exchange.
    ///
    /// The folder hierarchy is static per mail store: the bootstrap key
    /// yields the full list and the issued key, the issued key yields an
    /// empty delta, and anything else is rejected.
    pub fn handle_folder_sync(&self, request: &FolderSyncRequest) -> EngineResult<Element> {
        let response = match request.sync_key.as_str() {
            BOOTSTRAP_KEY => FolderSyncResponse {
                status: Status::Ok,
                sync_key: FOLDER_HIERARCHY_KEY.to_string(),
                added: self.mail.folders()?,
            },
            FOLDER_HIERARCHY_KEY => FolderSyncResponse {
                status: Status::Ok,
                sync_key: FOLDER_HIERARCHY_KEY.to_string(),
                added: Vec::new(),
            },
            other => {
                tracing::warn!(client_key = other, "unknown folder hierarchy key");
                FolderSyncResponse {
                    status: Status::InvalidSyncKey,
                    sync_key: BOOTSTRAP_KEY.to_string(),
                    added: Vec::new(),
                }
            }
        };
        Ok(response.to_element())
    }

    /// True if any change is pending past the acknowledged cursor for
    /// one of the device's collections. Drives change notification.
    pub fn has_pending_changes(
        &self,
        device_id: &str,
        collection_ids: &[String],
    ) -> EngineResult<bool> {
        for collection_id in collection_ids {
            let key = SessionKey::new(device_id, collection_id.as_str());
            let cursor = self
                .store
                .load(&key)?
                .map(|state| state.cursor)
                .unwrap_or(0);
            if self.mail.pending_count(collection_id, cursor)? > 0 {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
