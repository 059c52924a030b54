//! Command dispatch.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::session::SessionInfo;
use crate::signal::ChangeSignal;
use aerosync_engine::{MailStore, SyncCoordinator};
use aerosync_protocol::{Command, PingRequest, PingResponse, PingStatus};
use aerosync_store::SyncStateStore;
use aerosync_wbxml::Element;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Dispatches parsed commands to their handlers.
pub struct RequestHandler<S, M> {
    config: ServerConfig,
    coordinator: Arc<SyncCoordinator<S, M>>,
    signal: Arc<ChangeSignal>,
}

impl<S: SyncStateStore, M: MailStore> RequestHandler<S, M> {
    /// Creates a handler over the coordinator and change signal.
    pub fn new(
        config: ServerConfig,
        coordinator: Arc<SyncCoordinator<S, M>>,
        signal: Arc<ChangeSignal>,
    ) -> Self {
        Self {
            config,
            coordinator,
            signal,
        }
    }

    /// Handles one parsed command and builds the response tree.
    pub async fn handle(&self, session: &SessionInfo, command: Command) -> ServerResult<Element> {
        match command {
            Command::Sync(request) => Ok(self
                .coordinator
                .handle_sync(&session.device_id, &request)?),
            Command::FolderSync(request) => Ok(self.coordinator.handle_folder_sync(&request)?),
            Command::Ping(request) => self.handle_ping(session, request).await,
        }
    }

    /// Long-poll wait for changes in the watched folders.
    ///
    /// Parks on the change signal until either a watched folder has
    /// pending changes past the device's acknowledged cursor or the
    /// heartbeat elapses. Reads only; dropping the future mid-wait
    /// (client disconnect) mutates nothing.
    async fn handle_ping(
        &self,
        session: &SessionInfo,
        request: PingRequest,
    ) -> ServerResult<Element> {
        if request.folder_ids.is_empty() {
            return Ok(PingResponse {
                status: PingStatus::MissingParameters,
                changed_folders: Vec::new(),
            }
            .to_element());
        }

        let heartbeat = match request.heartbeat_interval {
            Some(seconds) => {
                let requested = Duration::from_secs(u64::from(seconds));
                if requested < self.config.heartbeat_min || requested > self.config.heartbeat_max {
                    tracing::debug!(device = %session.device_id, seconds,
                        "heartbeat outside allowed range");
                    return Ok(PingResponse {
                        status: PingStatus::HeartbeatOutOfRange,
                        changed_folders: Vec::new(),
                    }
                    .to_element());
                }
                requested
            }
            None => self.config.default_heartbeat,
        };

        let deadline = Instant::now() + heartbeat;
        loop {
            let changed = self.changed_folders(session, &request.folder_ids)?;
            if !changed.is_empty() {
                tracing::debug!(device = %session.device_id, folders = changed.len(),
                    "ping returning with changes");
                return Ok(PingResponse::changes(changed).to_element());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !self.signal.wait(remaining).await {
                return Ok(PingResponse::expired().to_element());
            }
            // Woken by a change somewhere; re-check the watched set.
        }
    }

    fn changed_folders(
        &self,
        session: &SessionInfo,
        folder_ids: &[String],
    ) -> ServerResult<Vec<String>> {
        let mut changed = Vec::new();
        for folder_id in folder_ids {
            let watched = std::slice::from_ref(folder_id);
            if self
                .coordinator
                .has_pending_changes(&session.device_id, watched)?
            {
                changed.push(folder_id.clone());
            }
        }
        Ok(changed)
    }
}
