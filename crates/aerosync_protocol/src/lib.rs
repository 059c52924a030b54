//! # AeroSync Protocol
//!
//! Typed command set and message shapes for the AeroSync server.
//!
//! This crate maps decoded WBXML element trees onto typed requests and
//! builds response trees from typed results. It is a pure protocol crate
//! with no I/O and no state; the sync semantics live in `aerosync_engine`.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod command;
mod error;
mod folder;
mod ping;
mod status;
mod sync;

pub use command::Command;
pub use error::{ProtocolError, ProtocolResult};
pub use folder::{folder_type, Folder, FolderSyncRequest, FolderSyncResponse};
pub use ping::{PingRequest, PingResponse, PingStatus};
pub use status::Status;
pub use sync::{
    BodyOptions, BodyPayload, BodyType, ChangeBatch, CollectionRequest, CollectionResponse,
    ItemFields, ItemOperation, SyncRequest, SyncResponse, MAX_WINDOW_SIZE,
};
