//! The top-level sync server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::RequestHandler;
use crate::session::SessionInfo;
use crate::signal::ChangeSignal;
use aerosync_engine::{MailStore, SyncCoordinator};
use aerosync_protocol::{Command, PingStatus, Status};
use aerosync_store::SyncStateStore;
use aerosync_wbxml::{decode, encode, pages, Element};
use std::sync::Arc;

/// The sync server.
///
/// Owns the coordinator and the change signal and exposes a single
/// transport-agnostic entry point: a command name plus a WBXML body in,
/// WBXML bytes out. An HTTP front end maps request targets and headers
/// onto [`SessionInfo`] and the command name; nothing in this crate
/// touches sockets.
pub struct SyncServer<S, M> {
    config: ServerConfig,
    handler: RequestHandler<S, M>,
    signal: Arc<ChangeSignal>,
}

impl<S: SyncStateStore, M: MailStore> SyncServer<S, M> {
    /// Creates a server over the given state and mail stores.
    pub fn new(config: ServerConfig, store: Arc<S>, mail: Arc<M>) -> Self {
        let coordinator = Arc::new(SyncCoordinator::new(
            config.engine.clone(),
            store,
            Arc::clone(&mail),
        ));
        let signal = Arc::new(ChangeSignal::new());
        let handler = RequestHandler::new(config.clone(), coordinator, Arc::clone(&signal));
        Self {
            config,
            handler,
            signal,
        }
    }

    /// The server's configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Handle for waking long-poll waiters after a mail store change.
    pub fn change_signal(&self) -> Arc<ChangeSignal> {
        Arc::clone(&self.signal)
    }

    /// Builds a session for a device, negotiating the protocol version.
    pub fn session(&self, device_id: impl Into<String>, requested_version: &str) -> SessionInfo {
        SessionInfo::new(&self.config, device_id, requested_version)
    }

    /// Serves one request end to end.
    ///
    /// Decodes the body, dispatches the command, and encodes the
    /// response. Client faults (malformed WBXML, bad command shapes)
    /// become a status-only response body for the named command rather
    /// than an error; only commands this server does not recognize and
    /// failures to encode a response surface as `Err`.
    pub async fn handle_request(
        &self,
        session: &SessionInfo,
        command_name: &str,
        body: &[u8],
    ) -> ServerResult<Vec<u8>> {
        match self.process(session, command_name, body).await {
            Ok(response) => Ok(encode(&response)?),
            Err(error) => {
                if error.is_client_error() {
                    tracing::warn!(device = %session.device_id, command = command_name,
                        %error, "rejecting request");
                } else {
                    tracing::error!(device = %session.device_id, command = command_name,
                        %error, "request failed");
                }
                match error_response(command_name, error.response_status()) {
                    Some(response) => Ok(encode(&response)?),
                    None => Err(error),
                }
            }
        }
    }

    async fn process(
        &self,
        session: &SessionInfo,
        command_name: &str,
        body: &[u8],
    ) -> ServerResult<Element> {
        let root = decode(body)?;
        let command = Command::parse(command_name, &root)?;
        tracing::debug!(device = %session.device_id, version = session.protocol_version,
            command = command.name(), "dispatching");
        self.handler.handle(session, command).await
    }
}

/// Status-only response tree for a failed command, if the command is
/// one this server serves.
fn error_response(command_name: &str, status: Status) -> Option<Element> {
    let element = match command_name {
        "Sync" => Element::container(
            pages::AIRSYNC,
            "Sync",
            vec![Element::text(pages::AIRSYNC, "Status", status.as_wire())],
        ),
        "FolderSync" => Element::container(
            pages::FOLDER_HIERARCHY,
            "FolderSync",
            vec![Element::text(
                pages::FOLDER_HIERARCHY,
                "Status",
                status.as_wire(),
            )],
        ),
        // Ping has its own status namespace; any fault in the request
        // maps onto its missing-parameters code.
        "Ping" => Element::container(
            pages::PING,
            "Ping",
            vec![Element::text(
                pages::PING,
                "Status",
                PingStatus::MissingParameters.code().to_string(),
            )],
        ),
        _ => return None,
    };
    Some(element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerosync_engine::MemoryMailStore;
    use aerosync_store::MemoryStateStore;

    fn server() -> SyncServer<MemoryStateStore, MemoryMailStore> {
        SyncServer::new(
            ServerConfig::default(),
            Arc::new(MemoryStateStore::new()),
            Arc::new(MemoryMailStore::new()),
        )
    }

    #[tokio::test]
    async fn malformed_body_yields_status_response() {
        let server = server();
        let session = server.session("dev1", "14.1");

        let bytes = server
            .handle_request(&session, "Sync", &[0xFF, 0x00, 0x01])
            .await
            .unwrap();
        let response = decode(&bytes).unwrap();
        assert_eq!(response.tag, "Sync");
        assert_eq!(response.child_value("Status"), Some("4"));
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let server = server();
        let session = server.session("dev1", "14.1");
        let body = encode(&Element::container(
            pages::AIRSYNC,
            "Sync",
            vec![Element::container(pages::AIRSYNC, "Collections", vec![])],
        ))
        .unwrap();

        let error = server
            .handle_request(&session, "SmartForward", &body)
            .await
            .unwrap_err();
        assert!(error.is_client_error());
    }

    #[tokio::test]
    async fn command_body_mismatch_reports_per_command_status() {
        let server = server();
        let session = server.session("dev1", "14.1");
        // A Ping body posted to the FolderSync command.
        let body = encode(&Element::container(
            pages::PING,
            "Ping",
            vec![Element::text(pages::PING, "HeartbeatInterval", "60")],
        ))
        .unwrap();

        let bytes = server
            .handle_request(&session, "FolderSync", &body)
            .await
            .unwrap();
        let response = decode(&bytes).unwrap();
        assert_eq!(response.tag, "FolderSync");
        assert_eq!(response.child_value("Status"), Some("4"));
    }
}
