//! WBXML decoder.

use crate::element::{Content, Element};
use crate::error::{WbxmlError, WbxmlResult};
use crate::pages;
use crate::{CHARSET_UTF8, CONTENT_FLAG, END, STR_I, SWITCH_PAGE};

/// Decode WBXML bytes into an element tree.
///
/// The decoder tracks the active code page across switch instructions and
/// reconstructs the exact tree that was encoded. All malformed inputs are
/// rejected with a specific error; nothing is silently skipped.
///
/// # Errors
///
/// Returns an error for truncated input, unknown tokens or pages,
/// unterminated or non-UTF-8 strings, unmatched END tokens, mixed
/// text/child content, and trailing bytes after the root element.
pub fn decode(bytes: &[u8]) -> WbxmlResult<Element> {
    let mut decoder = WbxmlDecoder::new(bytes);
    decoder.decode_document()
}

/// Hard cap on open elements. Protocol documents are a handful of levels
/// deep; the recursive reader must not be driven arbitrarily deep by
/// hostile input.
const MAX_DEPTH: usize = 64;

/// A WBXML decoder over a byte slice.
pub struct WbxmlDecoder<'a> {
    data: &'a [u8],
    pos: usize,
    page: u8,
    depth: usize,
}

impl<'a> WbxmlDecoder<'a> {
    /// Creates a decoder for the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            page: 0,
            depth: 0,
        }
    }

    /// Decodes the preamble and the single root element.
    pub fn decode_document(&mut self) -> WbxmlResult<Element> {
        self.read_preamble()?;

        self.consume_page_switches()?;
        let token = self.read_byte()?;
        if token == END {
            return Err(WbxmlError::UnmatchedEnd);
        }
        let root = self.read_element(token)?;

        if self.pos < self.data.len() {
            return Err(WbxmlError::TrailingBytes {
                remaining: self.data.len() - self.pos,
            });
        }
        Ok(root)
    }

    fn read_preamble(&mut self) -> WbxmlResult<()> {
        let version = self.read_byte()?;
        if !(0x01..=0x03).contains(&version) {
            return Err(WbxmlError::UnsupportedVersion { version });
        }
        let _public_id = self.read_byte()?;
        let charset = self.read_byte()?;
        if charset != CHARSET_UTF8 {
            return Err(WbxmlError::UnsupportedCharset { charset });
        }
        let table_length = self.read_byte()?;
        if table_length != 0 {
            return Err(WbxmlError::NonEmptyStringTable {
                length: table_length,
            });
        }
        Ok(())
    }

    /// Reads one element whose tag token has already been consumed.
    fn read_element(&mut self, token: u8) -> WbxmlResult<Element> {
        if self.depth == MAX_DEPTH {
            return Err(WbxmlError::NestingTooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let element = self.read_element_body(token);
        self.depth -= 1;
        element
    }

    fn read_element_body(&mut self, token: u8) -> WbxmlResult<Element> {
        let has_content = token & CONTENT_FLAG != 0;
        let bare = token & !CONTENT_FLAG;

        let page = pages::by_index(self.page).ok_or(WbxmlError::UnknownPage { page: self.page })?;
        let tag = page.tag(bare).ok_or(WbxmlError::UnknownToken {
            page: self.page,
            token: bare,
        })?;
        let page_index = self.page;

        if !has_content {
            return Ok(Element::empty(page_index, tag));
        }

        let mut text: Option<String> = None;
        let mut children: Vec<Element> = Vec::new();

        loop {
            match self.read_byte()? {
                SWITCH_PAGE => {
                    let target = self.read_byte()?;
                    if pages::by_index(target).is_none() {
                        return Err(WbxmlError::UnknownPage { page: target });
                    }
                    self.page = target;
                }
                END => break,
                STR_I => {
                    if !children.is_empty() {
                        return Err(WbxmlError::MixedContent {
                            tag: tag.to_string(),
                        });
                    }
                    let segment = self.read_inline_string()?;
                    // Adjacent inline strings concatenate.
                    text.get_or_insert_with(String::new).push_str(&segment);
                }
                child_token => {
                    if text.is_some() {
                        return Err(WbxmlError::MixedContent {
                            tag: tag.to_string(),
                        });
                    }
                    children.push(self.read_element(child_token)?);
                }
            }
        }

        let content = match (text, children) {
            (Some(value), _) => Content::Text(value),
            (None, c) if !c.is_empty() => Content::Children(c),
            // Content flag set but nothing inside; treat as a marker.
            _ => Content::Empty,
        };
        Ok(Element {
            page: page_index,
            tag,
            content,
        })
    }

    fn consume_page_switches(&mut self) -> WbxmlResult<()> {
        while self.peek() == Some(SWITCH_PAGE) {
            self.pos += 1;
            let target = self.read_byte()?;
            if pages::by_index(target).is_none() {
                return Err(WbxmlError::UnknownPage { page: target });
            }
            self.page = target;
        }
        Ok(())
    }

    fn read_inline_string(&mut self) -> WbxmlResult<String> {
        let start = self.pos;
        let terminator = self.data[start..]
            .iter()
            .position(|b| *b == 0)
            .ok_or(WbxmlError::UnterminatedString)?;
        let bytes = &self.data[start..start + terminator];
        self.pos = start + terminator + 1;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| WbxmlError::InvalidUtf8)
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    #[inline]
    fn read_byte(&mut self) -> WbxmlResult<u8> {
        let byte = self
            .data
            .get(self.pos)
            .copied()
            .ok_or(WbxmlError::UnexpectedEof { offset: self.pos })?;
        self.pos += 1;
        Ok(byte)
    }
}
