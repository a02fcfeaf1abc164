//! Decoded code-point snapshot.
//!
//! A [`Cursor`] is a plain value: the decoded point, where its bytes live
//! in the source buffer, and the [`Position`] counters at that point. The
//! scanner produces a fresh cursor on every advance, so any cursor a
//! caller holds stays valid as a bookmark regardless of later scanning.

use std::fmt;

use crate::Position;

/// Point value carried by a cursor once the input is exhausted.
///
/// `i32::MAX` lies outside the Unicode scalar range, so it can never be
/// confused with a decoded point.
#[allow(
    clippy::cast_sign_loss,
    reason = "i32::MAX is positive and fits in u32"
)]
pub const END_OF_DATA: u32 = i32::MAX as u32;

/// Snapshot of the scanning position at one decoded point.
///
/// # Invariant
///
/// `next == byte_offset + len`. At end of data `len == 0` and the point is
/// [`END_OF_DATA`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cursor {
    position: Position,
    point: u32,
    byte_offset: usize,
    len: u8,
    next: usize,
}

/// Size assertion: cursors are copied on every advance and every bookmark.
const _: () = assert!(std::mem::size_of::<Cursor>() <= 40);

impl Cursor {
    /// Cursor for a decoded `point` of `len` bytes at `byte_offset`.
    pub(crate) fn decoded(position: Position, point: char, byte_offset: usize, len: u8) -> Self {
        Cursor {
            position,
            point: u32::from(point),
            byte_offset,
            len,
            next: byte_offset + usize::from(len),
        }
    }

    /// End-of-data cursor following `self`.
    ///
    /// Position counters are carried over unchanged so the absolute point
    /// count still reports how many points the input holds.
    pub(crate) fn end_of_data(self) -> Self {
        Cursor {
            position: self.position,
            point: END_OF_DATA,
            byte_offset: self.next,
            len: 0,
            next: self.next,
        }
    }

    /// The decoded point, or `None` at end of data.
    #[inline]
    pub fn point(&self) -> Option<char> {
        char::from_u32(self.point)
    }

    /// The raw point value, [`END_OF_DATA`] once the input is exhausted.
    #[inline]
    pub fn raw_point(&self) -> u32 {
        self.point
    }

    /// Returns `true` if this cursor is past the last point of the input.
    #[inline]
    pub fn is_end_of_data(&self) -> bool {
        self.point == END_OF_DATA && self.len == 0
    }

    /// Line and point counters at this cursor.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Byte offset of the point in the source buffer.
    #[inline]
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// Byte length of the point (`0..=4`, zero at end of data).
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.len)
    }

    /// Returns `true` if the point occupies no bytes (end of data).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Byte offset of the point following this one.
    #[inline]
    pub fn next_byte_offset(&self) -> usize {
        self.next
    }

    /// Returns `true` if this cursor holds exactly `ch`.
    #[inline]
    pub fn is(&self, ch: char) -> bool {
        self.point == u32::from(ch)
    }
}

impl fmt::Display for Cursor {
    /// `U+0061 'a' 1,1-1 (1-1)`: code, quoted point, line, line point,
    /// line byte, then absolute point and 1-based byte offset.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(ch) = self.point().filter(|_| !self.is_end_of_data()) else {
            return f.write_str("<EOD>");
        };
        write!(
            f,
            "U+{:04X} {:?} {} ({}-{})",
            self.point,
            ch,
            self.position,
            self.position.point,
            self.byte_offset + 1
        )
    }
}
