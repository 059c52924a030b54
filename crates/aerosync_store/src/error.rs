//! Error types for the state store.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a state store backend.
///
/// All store failures are transient from the protocol's point of view:
/// the coordinator commits state only after a response is fully computed,
/// so a failed load or commit leaves the prior state intact and the
/// client may safely retry.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store reported a failure.
    ///
    /// Persistent backends map their native errors (I/O, connection
    /// loss) into this variant.
    #[error("state backend error: {0}")]
    Backend(String),
}
