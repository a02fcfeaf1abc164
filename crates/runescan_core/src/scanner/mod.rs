//! Backtracking scanner over a [`SourceBuffer`].
//!
//! The scanner is the only mutable piece of the engine. It owns the buffer
//! and the current [`Cursor`]; everything it hands out is a copy. Grammar
//! code backtracks either by holding a cursor from [`Scanner::mark()`] and
//! passing it back to [`Scanner::jump()`], or through the single bookmark
//! slot ([`Scanner::snapshot()`] / [`Scanner::restore()`]).

use std::borrow::Cow;
use std::fmt;
use std::io::Read;

use tracing::trace;

use crate::{Cursor, Position, ScanError, SourceBuffer};

/// Code-point scanner with value-type bookmarks.
///
/// Cloning a scanner shares the underlying bytes and copies only the
/// cursor state, giving an independent scanner over the same input.
#[derive(Clone, Debug)]
pub struct Scanner {
    buffer: SourceBuffer,
    current: Cursor,
    /// Cursor before the most recent advance, cleared by `jump`.
    previous: Option<Cursor>,
    bookmark: Option<Cursor>,
}

impl Scanner {
    /// Create a scanner over `source`, positioned at its first point.
    pub fn new(source: impl Into<SourceBuffer>) -> Result<Self, ScanError> {
        Self::from_buffer(source.into())
    }

    /// Create a scanner over raw bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, ScanError> {
        Self::from_buffer(SourceBuffer::new(bytes))
    }

    /// Drain `reader` and create a scanner over everything it produced.
    pub fn from_reader(reader: impl Read) -> Result<Self, ScanError> {
        Self::from_buffer(SourceBuffer::from_reader(reader)?)
    }

    /// Create a scanner over an existing (possibly shared) buffer.
    pub fn from_buffer(buffer: SourceBuffer) -> Result<Self, ScanError> {
        if buffer.is_empty() {
            return Err(ScanError::EmptyInput);
        }
        let (ch, len) = buffer.decode_at(0)?.ok_or(ScanError::EmptyInput)?;
        let current = Cursor::decoded(Position::START, ch, 0, len);
        trace!(len = buffer.len(), "scanner created");
        Ok(Scanner {
            buffer,
            current,
            previous: None,
            bookmark: None,
        })
    }

    /// The input this scanner reads.
    #[inline]
    pub fn buffer(&self) -> &SourceBuffer {
        &self.buffer
    }

    /// Copy of the cursor at the next unconsumed point.
    #[inline]
    pub fn current(&self) -> Cursor {
        self.current
    }

    /// Cursor before the most recent [`advance()`](Self::advance).
    ///
    /// `None` right after construction or a [`jump()`](Self::jump).
    #[inline]
    pub fn previous(&self) -> Option<Cursor> {
        self.previous
    }

    /// Returns `true` once every point has been consumed.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.current.is_end_of_data()
    }

    /// Accept the current point and decode the next one.
    ///
    /// At the end of the input the cursor becomes the end-of-data cursor;
    /// advancing further is a no-op. A malformed sequence leaves the
    /// cursor where it was.
    pub fn advance(&mut self) -> Result<(), ScanError> {
        if self.current.is_end_of_data() {
            return Ok(());
        }
        let at = self.current.next_byte_offset();
        let next = match self.buffer.decode_at(at)? {
            Some((ch, len)) => {
                let width = u32::try_from(self.current.len()).unwrap_or(u32::MAX);
                let position = self.current.position().step(width, self.current.is('\n'));
                Cursor::decoded(position, ch, at, len)
            }
            None => self.current.end_of_data(),
        };
        trace!(byte = at, point = next.raw_point(), "advance");
        self.previous = Some(self.current);
        self.current = next;
        Ok(())
    }

    /// Advance `n` times, stopping at the first decode failure.
    pub fn advance_n(&mut self, n: usize) -> Result<(), ScanError> {
        for _ in 0..n {
            self.advance()?;
        }
        Ok(())
    }

    /// Bookmark the current cursor.
    #[inline]
    pub fn mark(&self) -> Cursor {
        self.current
    }

    /// Move back (or forward) to a bookmarked cursor.
    ///
    /// # Contract
    ///
    /// `cursor` must come from a scanner over this same buffer. Cursors
    /// from another input produce meaningless positions; this is only
    /// checked in debug builds.
    pub fn jump(&mut self, cursor: Cursor) {
        debug_assert!(
            cursor.next_byte_offset() <= self.buffer.len(),
            "cursor at byte {} is outside a buffer of {} bytes",
            cursor.next_byte_offset(),
            self.buffer.len()
        );
        self.current = cursor;
        self.previous = None;
    }

    /// Save the current cursor in the bookmark slot, replacing any earlier one.
    pub fn snapshot(&mut self) {
        self.bookmark = Some(self.current);
    }

    /// Jump to the saved bookmark and clear the slot.
    ///
    /// Returns `false` (and does nothing) if no snapshot was taken.
    pub fn restore(&mut self) -> bool {
        match self.bookmark.take() {
            Some(cursor) => {
                self.jump(cursor);
                true
            }
            None => false,
        }
    }

    /// The next `n` points as text, without moving.
    ///
    /// Stops early at end of data or at a malformed sequence.
    pub fn peek(&self, n: usize) -> Cow<'_, str> {
        let start = self.current.byte_offset();
        let mut end = start;
        for _ in 0..n {
            match self.buffer.decode_at(end) {
                Ok(Some((_, len))) => end += usize::from(len),
                Ok(None) | Err(_) => break,
            }
        }
        self.buffer.text(start, end)
    }

    /// Text between the current cursor and `to`, both points included.
    ///
    /// `to` may lie before or after the current cursor.
    pub fn look(&self, to: Cursor) -> Cow<'_, str> {
        if to.byte_offset() < self.current.byte_offset() {
            self.look_slice(to, self.current)
        } else {
            self.look_slice(self.current, to)
        }
    }

    /// Text from `from` through `to`, both points included.
    pub fn look_slice(&self, from: Cursor, to: Cursor) -> Cow<'_, str> {
        self.buffer.text(from.byte_offset(), to.next_byte_offset())
    }

    /// Everything from the current point to the end of the input.
    pub fn remaining(&self) -> Cow<'_, str> {
        self.buffer.text(self.current.byte_offset(), self.buffer.len())
    }
}

impl fmt::Display for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.current, f)
    }
}
