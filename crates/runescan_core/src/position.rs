//! Line, column, and absolute point counters.

use std::fmt;

/// Location of a point in the input, all counters 1-based.
///
/// `line_point` and `line_byte` are relative to the start of the current
/// line; `point` counts decoded points from the start of the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    /// Line number.
    pub line: u32,
    /// Point offset within the line.
    pub line_point: u32,
    /// Byte offset within the line.
    pub line_byte: u32,
    /// Absolute point offset.
    pub point: u32,
}

impl Position {
    /// Position of the first point of an input.
    pub const START: Position = Position {
        line: 1,
        line_point: 1,
        line_byte: 1,
        point: 1,
    };

    /// Position of the point following one of `width` bytes at `self`.
    ///
    /// `newline` tells whether the point being left is `\n`, in which case
    /// the line advances and both line-relative counters restart at 1.
    #[must_use]
    pub fn step(self, width: u32, newline: bool) -> Position {
        if newline {
            Position {
                line: self.line + 1,
                line_point: 1,
                line_byte: 1,
                point: self.point + 1,
            }
        } else {
            Position {
                line: self.line,
                line_point: self.line_point + 1,
                line_byte: self.line_byte + width,
                point: self.point + 1,
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}-{}", self.line, self.line_point, self.line_byte)
    }
}
