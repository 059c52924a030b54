//! WBXML encoder.

use crate::element::{Content, Element};
use crate::error::{WbxmlError, WbxmlResult};
use crate::pages;
use crate::{CHARSET_UTF8, CONTENT_FLAG, END, PUBLIC_ID_UNKNOWN, STR_I, SWITCH_PAGE, VERSION};

/// Encode an element tree to WBXML bytes.
///
/// Output starts with the fixed 4-byte preamble and contains one page
/// switch per namespace crossing. Encoding a fixed tree is deterministic:
/// identical trees produce identical bytes, which the coordinator relies
/// on for byte-exact replay.
///
/// # Errors
///
/// Returns an error if an element names a tag not present in its code
/// page, or a text value contains an embedded NUL byte.
pub fn encode(root: &Element) -> WbxmlResult<Vec<u8>> {
    let mut encoder = WbxmlEncoder::new();
    encoder.encode(root)?;
    Ok(encoder.into_bytes())
}

/// A WBXML encoder.
///
/// Tracks the active code page so that SWITCH_PAGE instructions are only
/// emitted when a subtree actually crosses into a different namespace.
pub struct WbxmlEncoder {
    buffer: Vec<u8>,
    page: u8,
}

impl WbxmlEncoder {
    /// Creates a new encoder.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            page: 0,
        }
    }

    /// Encodes a complete document: preamble followed by the root element.
    pub fn encode(&mut self, root: &Element) -> WbxmlResult<()> {
        self.buffer
            .extend_from_slice(&[VERSION, PUBLIC_ID_UNKNOWN, CHARSET_UTF8, 0x00]);
        self.page = 0;
        self.write_element(root)
    }

    /// Consumes the encoder and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn write_element(&mut self, element: &Element) -> WbxmlResult<()> {
        let page = pages::by_index(element.page).ok_or(WbxmlError::UnknownPage {
            page: element.page,
        })?;
        let token = page.token(element.tag).ok_or_else(|| WbxmlError::UnknownTag {
            page: element.page,
            tag: element.tag.to_string(),
        })?;

        if self.page != element.page {
            self.buffer.push(SWITCH_PAGE);
            self.buffer.push(element.page);
            self.page = element.page;
        }

        match &element.content {
            Content::Empty => {
                // Empty elements are self-terminating: no content flag, no END.
                self.buffer.push(token);
            }
            Content::Text(text) => {
                self.buffer.push(token | CONTENT_FLAG);
                self.write_inline_string(text)?;
                self.buffer.push(END);
            }
            Content::Children(children) => {
                self.buffer.push(token | CONTENT_FLAG);
                for child in children {
                    self.write_element(child)?;
                }
                self.buffer.push(END);
            }
        }
        Ok(())
    }

    fn write_inline_string(&mut self, text: &str) -> WbxmlResult<()> {
        if text.as_bytes().contains(&0) {
            return Err(WbxmlError::EmbeddedNul);
        }
        self.buffer.push(STR_I);
        self.buffer.extend_from_slice(text.as_bytes());
        self.buffer.push(0x00);
        Ok(())
    }
}

impl Default for WbxmlEncoder {
    fn default() -> Self {
        Self::new()
    }
}
