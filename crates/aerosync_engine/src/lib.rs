//! # AeroSync Engine
//!
//! Synchronization semantics for the AeroSync server.
//!
//! The [`SyncCoordinator`] drives each (device, collection) lineage
//! through the progression-token state machine: replay on
//! retransmission, advance on acknowledgment, reset on bootstrap, and
//! reject everything else. Batches are cut by the [`WindowPlanner`]
//! under a window count and a byte budget, the [`LoopDetector`] shrinks
//! the window when the budget stalls natural progress, and the
//! [`ItemProjector`] maps stored items to wire fields under the client's
//! body preferences. Item storage sits behind the [`MailStore`] trait.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod loopdetect;
mod mailstore;
mod planner;
mod projector;
mod token;

pub use config::EngineConfig;
pub use coordinator::SyncCoordinator;
pub use error::{EngineError, EngineResult};
pub use loopdetect::{LoopDetector, WINDOW_FLOOR};
pub use mailstore::{ChangeKind, ItemChange, MailStore, MemoryMailStore, StoredItem};
pub use planner::{PendingOperation, PlannedBatch, WindowPlanner};
pub use projector::ItemProjector;
pub use token::{SyncKey, BOOTSTRAP_KEY};
