//! Backtracking code-point matcher.
//!
//! Build a grammar from [`Expr`] values, then run it against a [`Scanner`]
//! with [`expect`] (or the [`Expect`] method form). A successful match
//! leaves the scanner just past the matched text and returns the last
//! consumed [`Cursor`]; a failed match leaves the scanner untouched and
//! returns a [`MatchError`].
//!
//! ```
//! use runescan::{Expect, Expr, Scanner};
//!
//! let mut s = Scanner::new("some thing").unwrap();
//! let end = s.expect(&[Expr::lit("some")]).unwrap();
//! assert_eq!(end.point(), Some('e'));
//! assert_eq!(s.current().point(), Some(' '));
//!
//! let err = s.expect(&[Expr::Point('x')]).unwrap_err();
//! assert_eq!(err.to_string(), "expected rune 'x' at U+0020 ' ' 1,5-5 (5-5)");
//! ```

mod error;
mod expr;
mod matcher;

use std::sync::Once;

pub use error::{describe_failure, MatchError};
pub use expr::{Expr, ExprKind, Hook, HookFn};
pub use matcher::{expect, Expect};
pub use runescan_core::{
    Cursor, LineBounds, Position, ScanError, Scanner, SourceBuffer, END_OF_DATA,
};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=runescan=trace` to follow every match attempt and backtrack.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
