//! Scanner construction and decoding errors.

use thiserror::Error;

/// Error raised while loading or decoding input.
///
/// All variants are fatal for the scanner that produced them: the buffer
/// is immutable, so the caller must build a new scanner from valid input.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanError {
    /// The input holds no bytes.
    #[error("empty input")]
    EmptyInput,
    /// Malformed UTF-8 sequence starting at `offset`.
    #[error("invalid UTF-8 sequence at byte {offset}")]
    Decode { offset: usize },
    /// The source reader failed before the input was fully buffered.
    #[error("failed to read input: {0}")]
    Io(String),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::Io(err.to_string())
    }
}
