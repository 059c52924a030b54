//! The closed command set.
//!
//! Command identity arrives out-of-band (in the request target); the body
//! is a decoded element tree. Mapping the pair onto a closed enum makes
//! "unhandled command" a compile-time-checked case downstream: handlers
//! match exhaustively instead of dispatching on strings.

use crate::error::{ProtocolError, ProtocolResult};
use crate::folder::FolderSyncRequest;
use crate::ping::PingRequest;
use crate::sync::SyncRequest;
use aerosync_wbxml::Element;

/// A fully parsed protocol command with its typed request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Collection synchronization exchange.
    Sync(SyncRequest),
    /// Folder hierarchy listing.
    FolderSync(FolderSyncRequest),
    /// Long-poll wait for changes.
    Ping(PingRequest),
}

impl Command {
    /// Parses a command from its out-of-band name and decoded body.
    pub fn parse(name: &str, body: &Element) -> ProtocolResult<Self> {
        match name {
            "Sync" => SyncRequest::from_element(body).map(Command::Sync),
            "FolderSync" => FolderSyncRequest::from_element(body).map(Command::FolderSync),
            "Ping" => PingRequest::from_element(body).map(Command::Ping),
            other => Err(ProtocolError::UnknownCommand {
                name: other.to_string(),
            }),
        }
    }

    /// The command's wire name.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Sync(_) => "Sync",
            Command::FolderSync(_) => "FolderSync",
            Command::Ping(_) => "Ping",
        }
    }
}
