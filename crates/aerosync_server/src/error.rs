//! Error types for the sync server.

use aerosync_engine::EngineError;
use aerosync_protocol::{ProtocolError, Status};
use aerosync_wbxml::WbxmlError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a request.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The request body was not valid WBXML.
    #[error(transparent)]
    Codec(#[from] WbxmlError),

    /// The decoded body did not form a valid command.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The sync engine rejected or failed the exchange.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl ServerError {
    /// Returns true if the fault lies with the request.
    pub fn is_client_error(&self) -> bool {
        match self {
            ServerError::Codec(_) | ServerError::Protocol(_) => true,
            ServerError::Engine(engine) => engine.is_session_reset(),
        }
    }

    /// Returns true if the fault lies with the server or a backend.
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// The wire status reported for this error.
    pub fn response_status(&self) -> Status {
        match self {
            ServerError::Codec(_) | ServerError::Protocol(_) => Status::ProtocolError,
            ServerError::Engine(engine) if engine.is_session_reset() => Status::InvalidSyncKey,
            ServerError::Engine(_) => Status::ServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_and_status() {
        let malformed = ServerError::Codec(WbxmlError::UnexpectedEof { offset: 2 });
        assert!(malformed.is_client_error());
        assert_eq!(malformed.response_status(), Status::ProtocolError);

        let transient = ServerError::Engine(EngineError::Mail("backend down".into()));
        assert!(transient.is_server_error());
        assert_eq!(transient.response_status(), Status::ServerError);

        let reset = ServerError::Engine(EngineError::InvalidSyncKey {
            device_id: "dev".into(),
            collection_id: "inbox".into(),
            client_key: "9".into(),
        });
        assert!(reset.is_client_error());
        assert_eq!(reset.response_status(), Status::InvalidSyncKey);
    }
}
