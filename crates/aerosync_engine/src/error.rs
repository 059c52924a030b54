//! Error types for the sync engine.

use aerosync_store::StoreError;
use aerosync_wbxml::WbxmlError;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a synchronization exchange.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The client's token is not in {current, next, bootstrap}; the
    /// session must restart from the bootstrap token.
    #[error("invalid sync key '{client_key}' for {device_id}/{collection_id}")]
    InvalidSyncKey {
        /// Device whose request carried the bad key.
        device_id: String,
        /// Collection the request addressed.
        collection_id: String,
        /// The rejected key value.
        client_key: String,
    },

    /// State store failure; transient, safe to retry.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Codec failure while serializing or replaying a response.
    #[error(transparent)]
    Codec(#[from] WbxmlError),

    /// Mail store (item retrieval) failure; transient, safe to retry.
    #[error("mail store error: {0}")]
    Mail(String),
}

impl EngineError {
    /// True if the correct client response is a session reset.
    pub fn is_session_reset(&self) -> bool {
        matches!(self, EngineError::InvalidSyncKey { .. })
    }

    /// True if the failure is transient and the request may be retried.
    ///
    /// Retries are the client's responsibility; replay-on-repeat is what
    /// makes them safe.
    pub fn is_transient(&self) -> bool {
        matches!(self, EngineError::Store(_) | EngineError::Mail(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let reset = EngineError::InvalidSyncKey {
            device_id: "dev".into(),
            collection_id: "inbox".into(),
            client_key: "99".into(),
        };
        assert!(reset.is_session_reset());
        assert!(!reset.is_transient());

        let mail = EngineError::Mail("backend down".into());
        assert!(mail.is_transient());
        assert!(!mail.is_session_reset());
    }
}
