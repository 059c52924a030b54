//! Error types for the WBXML codec.

use thiserror::Error;

/// Result type for codec operations.
pub type WbxmlResult<T> = Result<T, WbxmlError>;

/// Errors that can occur during WBXML encoding or decoding.
///
/// Decode errors fail only the current exchange; they are never fatal to
/// the process. A malformed body is reported to the caller, which maps it
/// to a protocol-level error status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WbxmlError {
    /// Input ended before the current element or string was complete.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof {
        /// Byte offset where more input was expected.
        offset: usize,
    },

    /// The document version byte is not one we implement.
    #[error("unsupported WBXML version: 0x{version:02x}")]
    UnsupportedVersion {
        /// The version byte from the preamble.
        version: u8,
    },

    /// The charset identifier is not UTF-8.
    #[error("unsupported charset identifier: 0x{charset:02x}")]
    UnsupportedCharset {
        /// The charset byte from the preamble.
        charset: u8,
    },

    /// The document declares a string table, which this protocol never uses.
    #[error("non-empty string table (length {length}) is not supported")]
    NonEmptyStringTable {
        /// Declared string table length.
        length: u8,
    },

    /// A page switch selected a code page we have no table for.
    #[error("unknown code page: {page}")]
    UnknownPage {
        /// The requested page index.
        page: u8,
    },

    /// A tag token has no entry in the active code page.
    #[error("unknown token 0x{token:02x} on code page {page}")]
    UnknownToken {
        /// Active code page when the token was read.
        page: u8,
        /// The offending token with the content flag stripped.
        token: u8,
    },

    /// An element name has no token in its code page (encode side).
    #[error("tag '{tag}' is not defined on code page {page}")]
    UnknownTag {
        /// Code page the element claimed.
        page: u8,
        /// The element name.
        tag: String,
    },

    /// An inline string ran to the end of input without a terminator.
    #[error("unterminated inline string")]
    UnterminatedString,

    /// An inline string was not valid UTF-8.
    #[error("inline string is not valid UTF-8")]
    InvalidUtf8,

    /// Text handed to the encoder contains an embedded NUL byte.
    #[error("text value contains an embedded NUL byte")]
    EmbeddedNul,

    /// An END token appeared with no open element to close.
    #[error("END token with no open element")]
    UnmatchedEnd,

    /// Element nesting exceeded the decoder's depth limit.
    #[error("element nesting deeper than {limit} levels")]
    NestingTooDeep {
        /// Maximum number of open elements allowed.
        limit: usize,
    },

    /// An element carried both text and child elements.
    #[error("element '{tag}' mixes text and child elements")]
    MixedContent {
        /// The element that mixed content kinds.
        tag: String,
    },

    /// Bytes remained after the root element was closed.
    #[error("{remaining} trailing bytes after document end")]
    TrailingBytes {
        /// Number of unconsumed bytes.
        remaining: usize,
    },
}
