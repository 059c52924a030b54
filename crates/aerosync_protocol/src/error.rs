//! Error types for protocol parsing.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while mapping element trees onto typed requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The command name is not part of the implemented command set.
    #[error("unknown command: {name}")]
    UnknownCommand {
        /// The command name received out-of-band.
        name: String,
    },

    /// The document root does not match the command.
    #[error("expected root element '{expected}', found '{found}'")]
    UnexpectedRoot {
        /// Root element the command requires.
        expected: &'static str,
        /// Root element actually present.
        found: String,
    },

    /// A required element is absent.
    #[error("missing required element: {element}")]
    MissingElement {
        /// Name of the absent element.
        element: &'static str,
    },

    /// An element's text value could not be interpreted.
    #[error("invalid value for {element}: '{value}'")]
    InvalidValue {
        /// Element whose value was rejected.
        element: &'static str,
        /// The offending text.
        value: String,
    },
}
