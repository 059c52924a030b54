//! Protocol status codes.

/// Numeric status reported per collection (and per command) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The exchange succeeded.
    Ok,
    /// The client's sync key is not valid for this lineage; the client
    /// must restart from the bootstrap key.
    InvalidSyncKey,
    /// The request was malformed or violated the protocol.
    ProtocolError,
    /// A transient backend failure; safe for the client to retry.
    ServerError,
}

impl Status {
    /// Numeric wire code.
    pub fn code(self) -> u8 {
        match self {
            Status::Ok => 1,
            Status::InvalidSyncKey => 3,
            Status::ProtocolError => 4,
            Status::ServerError => 5,
        }
    }

    /// Wire representation as decimal text.
    pub fn as_wire(self) -> String {
        self.code().to_string()
    }
}
