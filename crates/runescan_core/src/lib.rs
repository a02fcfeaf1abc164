//! Low-level code-point scanning for `runescan`.
//!
//! This crate owns the input bytes and the moving [`Cursor`]. It knows
//! nothing about grammars: the matcher in the `runescan` crate drives a
//! [`Scanner`] through its public navigation and bookmark methods.
//!
//! # Model
//!
//! The cursor always points at the *next unconsumed* point. Advancing
//! accepts the current point and decodes the following one. Reaching the
//! end of the buffer is not an error; the cursor simply carries the
//! [`END_OF_DATA`] point with zero length.
//!
//! # Example
//!
//! ```
//! use runescan_core::Scanner;
//!
//! let mut s = Scanner::new("ab").unwrap();
//! assert_eq!(s.current().point(), Some('a'));
//! s.advance().unwrap();
//! assert_eq!(s.current().point(), Some('b'));
//! s.advance().unwrap();
//! assert!(s.is_done());
//! ```

mod cursor;
mod error;
mod position;
mod scanner;
mod source_buffer;

pub use cursor::{Cursor, END_OF_DATA};
pub use error::ScanError;
pub use position::Position;
pub use scanner::Scanner;
pub use source_buffer::{LineBounds, SourceBuffer};
