//! # AeroSync Server
//!
//! Transport-agnostic mobile mail sync server.
//!
//! The [`SyncServer`] turns a command name plus a WBXML request body
//! into WBXML response bytes. It dispatches the closed command set onto
//! the sync coordinator (Sync, FolderSync) and runs the Ping long-poll
//! against a [`ChangeSignal`]. Sessions arrive pre-parsed as
//! [`SessionInfo`]; an HTTP front end owns sockets, headers, and
//! authentication.
//!
//! # Example
//!
//! ```
//! use aerosync_engine::MemoryMailStore;
//! use aerosync_server::{ServerConfig, SyncServer};
//! use aerosync_store::MemoryStateStore;
//! use std::sync::Arc;
//!
//! let server = SyncServer::new(
//!     ServerConfig::default(),
//!     Arc::new(MemoryStateStore::new()),
//!     Arc::new(MemoryMailStore::new()),
//! );
//! let session = server.session("device-1", "16.1");
//! // server.handle_request(&session, "Sync", &body).await
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod handler;
mod server;
mod session;
mod signal;

pub use config::{ServerConfig, SUPPORTED_VERSIONS};
pub use error::{ServerError, ServerResult};
pub use handler::RequestHandler;
pub use server::SyncServer;
pub use session::SessionInfo;
pub use signal::ChangeSignal;
