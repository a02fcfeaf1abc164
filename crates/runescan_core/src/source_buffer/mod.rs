//! Immutable, fully-loaded input buffer.
//!
//! The whole input is read up front. Unlimited look-ahead and look-behind
//! are what make arbitrary backtracking possible, so there is no streaming
//! mode: a reader is drained completely at construction.
//!
//! The bytes are held behind an `Arc`, so cloning a buffer (or a scanner
//! built on it) shares the input instead of copying it.

use std::borrow::Cow;
use std::io::Read;
use std::sync::Arc;

use crate::ScanError;

/// Immutable input bytes shared by every scanner built from them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceBuffer {
    bytes: Arc<[u8]>,
}

/// Byte range of one line, excluding its terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineBounds {
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset one past the last byte of the line (before `\r\n` or `\n`).
    pub end: usize,
}

impl SourceBuffer {
    /// Wrap `bytes` as a source buffer.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        SourceBuffer {
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Drain `reader` completely and wrap the result.
    pub fn from_reader(mut reader: impl Read) -> Result<Self, ScanError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(SourceBuffer::new(bytes))
    }

    /// Returns the raw input bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length of the input in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the input is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of bytes in the UTF-8 sequence led by `byte`.
    ///
    /// Continuation and invalid leading bytes report 1; decoding rejects
    /// them afterwards.
    #[inline]
    pub fn utf8_char_width(byte: u8) -> usize {
        match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Decode the point starting at `offset`.
    ///
    /// Returns `Ok(None)` when `offset` is at or past the end of the input,
    /// and `ScanError::Decode` when the bytes there are not valid UTF-8.
    pub fn decode_at(&self, offset: usize) -> Result<Option<(char, u8)>, ScanError> {
        let Some(&lead) = self.bytes.get(offset) else {
            return Ok(None);
        };
        if lead.is_ascii() {
            return Ok(Some((char::from(lead), 1)));
        }
        let width = Self::utf8_char_width(lead);
        let bytes = self
            .bytes
            .get(offset..offset + width)
            .ok_or(ScanError::Decode { offset })?;
        let ch = std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or(ScanError::Decode { offset })?;
        // width is 2..=4 here
        let width = u8::try_from(width).map_err(|_| ScanError::Decode { offset })?;
        Ok(Some((ch, width)))
    }

    /// Text of the bytes in `from..to`, clamped to the input.
    ///
    /// Cursors always sit on point boundaries, so ranges taken between two
    /// cursors borrow directly; anything else is decoded lossily.
    pub fn text(&self, from: usize, to: usize) -> Cow<'_, str> {
        let to = to.min(self.bytes.len());
        let from = from.min(to);
        String::from_utf8_lossy(&self.bytes[from..to])
    }

    /// Bounds of the line containing the byte at `offset`.
    ///
    /// An `offset` past the end reports the last line.
    pub fn line_bounds(&self, offset: usize) -> LineBounds {
        let offset = offset.min(self.bytes.len());
        let start = memchr::memrchr(b'\n', &self.bytes[..offset]).map_or(0, |i| i + 1);
        let mut end =
            memchr::memchr(b'\n', &self.bytes[offset..]).map_or(self.bytes.len(), |i| offset + i);
        if end > start && self.bytes[end - 1] == b'\r' {
            end -= 1;
        }
        LineBounds { start, end }
    }
}

impl From<&str> for SourceBuffer {
    fn from(source: &str) -> Self {
        SourceBuffer::new(source)
    }
}

impl From<String> for SourceBuffer {
    fn from(source: String) -> Self {
        SourceBuffer::new(source)
    }
}

impl From<&[u8]> for SourceBuffer {
    fn from(source: &[u8]) -> Self {
        SourceBuffer::new(source)
    }
}

impl From<Vec<u8>> for SourceBuffer {
    fn from(source: Vec<u8>) -> Self {
        SourceBuffer::new(source)
    }
}
