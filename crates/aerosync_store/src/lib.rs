//! # AeroSync State Store
//!
//! Durable per-(device, collection) synchronization state.
//!
//! Each session key owns one [`SyncState`] row: the acknowledged and
//! pending progression tokens, the cached pending response for replay,
//! the drain cursor, and the loop-recovery counters. The store trait is
//! the persistence seam; [`MemoryStateStore`] is the in-process
//! implementation. [`SessionLocks`] provides the single-writer-per-key
//! discipline the coordinator relies on.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod lock;
mod state;
mod store;

pub use error::{StoreError, StoreResult};
pub use lock::SessionLocks;
pub use state::{SessionKey, SyncState};
pub use store::{MemoryStateStore, SyncStateStore};
