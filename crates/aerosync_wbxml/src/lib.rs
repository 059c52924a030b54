//! # AeroSync WBXML Codec
//!
//! Tokenized binary encoding/decoding for the AeroSync protocol.
//!
//! The wire format multiplexes several element namespaces over one byte
//! stream: each element is a single token on the active code page, a
//! 2-byte SWITCH_PAGE instruction changes the active page, and inline
//! strings are NUL-terminated UTF-8 runs. Encoding is deterministic, so
//! an identical element tree always serializes to identical bytes.
//!
//! ## Usage
//!
//! ```
//! use aerosync_wbxml::{decode, encode, pages, Element};
//!
//! let tree = Element::container(
//!     pages::AIRSYNC,
//!     "Sync",
//!     vec![Element::text(pages::AIRSYNC, "SyncKey", "1")],
//! );
//! let bytes = encode(&tree).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), tree);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod element;
mod encoder;
mod error;
pub mod pages;

pub use decoder::{decode, WbxmlDecoder};
pub use element::{Content, Element};
pub use encoder::{encode, WbxmlEncoder};
pub use error::{WbxmlError, WbxmlResult};

/// WBXML document version emitted by the encoder (1.3).
pub const VERSION: u8 = 0x03;
/// "Unknown" public document identifier.
pub const PUBLIC_ID_UNKNOWN: u8 = 0x01;
/// IANA MIBenum for UTF-8.
pub const CHARSET_UTF8: u8 = 0x6A;
/// Switches the active code page; followed by the page index.
pub const SWITCH_PAGE: u8 = 0x00;
/// Closes the nearest open content-bearing element.
pub const END: u8 = 0x01;
/// Marks an inline NUL-terminated string.
pub const STR_I: u8 = 0x03;
/// Set on a tag token when the element carries text or children.
pub const CONTENT_FLAG: u8 = 0x40;

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Every (name, token) pair on every page must survive a trip through
    /// the full codec, both as an empty marker and as a text element.
    #[test]
    fn every_table_entry_roundtrips() {
        for page in pages::PAGES {
            for (_, tag) in page.entries() {
                let marker = Element::empty(page.index, tag);
                assert_eq!(decode(&encode(&marker).unwrap()).unwrap(), marker);

                let text = Element::text(page.index, tag, "value");
                assert_eq!(decode(&encode(&text).unwrap()).unwrap(), text);
            }
        }
    }

    fn arb_tag() -> impl Strategy<Value = (u8, &'static str)> {
        let all: Vec<(u8, &'static str)> = pages::PAGES
            .iter()
            .flat_map(|p| p.entries().map(move |(_, tag)| (p.index, tag)))
            .collect();
        proptest::sample::select(all)
    }

    fn arb_element() -> impl Strategy<Value = Element> {
        let leaf = (arb_tag(), proptest::option::of("[a-zA-Z0-9 .@-]{0,40}")).prop_map(
            |((page, tag), text)| match text {
                Some(value) => Element::text(page, tag, value),
                None => Element::empty(page, tag),
            },
        );
        leaf.prop_recursive(4, 48, 6, |inner| {
            (arb_tag(), proptest::collection::vec(inner, 1..6))
                .prop_map(|((page, tag), children)| Element::container(page, tag, children))
        })
    }

    proptest! {
        #[test]
        fn arbitrary_trees_roundtrip(tree in arb_element()) {
            let bytes = encode(&tree).unwrap();
            prop_assert_eq!(decode(&bytes).unwrap(), tree);
        }

        #[test]
        fn decode_never_panics_on_garbage(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode(&bytes);
        }
    }
}
