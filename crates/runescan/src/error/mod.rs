//! Match failures and their human-readable descriptions.
//!
//! Failures are plain values. The engine never logs or prints them; the
//! caller decides whether to try another grammar, report, or give up.
//! [`describe_failure`] produces the one-line message used by `Display`,
//! and [`MatchError::render`] adds the offending source line.

use std::fmt::Write as _;

use runescan_core::{Cursor, ScanError, SourceBuffer};
use thiserror::Error;

use crate::expr::{Expr, ExprKind, Members};

/// Why an `expect` call failed.
#[derive(Clone, Debug, Error)]
pub enum MatchError {
    /// The input did not match `expr` at `cursor`.
    #[error("{}", describe_failure(.expr, .cursor))]
    Expected { expr: Expr, cursor: Cursor },
    /// A hook returned `false`.
    #[error("hook {name:?} failed{}", location(.cursor))]
    HookFailed { name: String, cursor: Cursor },
    /// The expression cannot be evaluated as written (a grammar bug).
    #[error("unsupported {kind} expression: {reason}")]
    Unsupported {
        kind: ExprKind,
        reason: &'static str,
    },
    /// The input could not be decoded.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl MatchError {
    pub(crate) fn expected(expr: &Expr, cursor: Cursor) -> Self {
        MatchError::Expected {
            expr: expr.clone(),
            cursor,
        }
    }

    /// Returns `true` for input mismatches.
    ///
    /// Alternation, repetition, and lookahead treat these as "did not
    /// match" and carry on; every other error aborts the whole match.
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            MatchError::Expected { .. } | MatchError::HookFailed { .. }
        )
    }

    /// Cursor where matching stopped, if the error has one.
    pub fn cursor(&self) -> Option<Cursor> {
        match self {
            MatchError::Expected { cursor, .. } | MatchError::HookFailed { cursor, .. } => {
                Some(*cursor)
            }
            MatchError::Unsupported { .. } | MatchError::Scan(_) => None,
        }
    }

    /// The message followed by the failing line and a caret under the
    /// failing point.
    ///
    /// ```text
    /// expected rune ':' at U+0020 ' ' 2,3-3 (14-14)
    ///  2 | ab cd
    ///    |   ^
    /// ```
    pub fn render(&self, buffer: &SourceBuffer) -> String {
        let mut out = self.to_string();
        let Some(cursor) = self.cursor() else {
            return out;
        };
        let offset = cursor.byte_offset();
        // End of data sits past the last point; show the line that point is on.
        let lookup = if cursor.is_end_of_data() {
            offset.saturating_sub(1)
        } else {
            offset
        };
        let bounds = buffer.line_bounds(lookup);
        let line = buffer.text(bounds.start, bounds.end);
        let column = buffer
            .text(bounds.start, offset.min(bounds.end))
            .chars()
            .count();
        let number = cursor.position().line.to_string();
        let gutter = " ".repeat(number.len());
        let _ = write!(
            out,
            "\n {number} | {line}\n {gutter} | {}^",
            " ".repeat(column)
        );
        out
    }
}

/// `" at <cursor>"`, or the data-length note once the input is exhausted.
fn location(cursor: &Cursor) -> String {
    if cursor.is_end_of_data() {
        let points = cursor.position().point;
        format!(
            ", exceeded data length ({points} rune{})",
            plural_s(points)
        )
    } else {
        format!(" at {cursor}")
    }
}

/// Returns "s" for plural counts, "" for singular.
#[inline]
fn plural_s(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

/// One-line description of `expr` failing at `cursor`.
pub fn describe_failure(expr: &Expr, cursor: &Cursor) -> String {
    let what = match expr {
        Expr::Literal(text) => format!("expected {text:?}"),
        Expr::Point(ch) => format!("expected rune {ch:?}"),
        Expr::Any => "expected any rune".to_owned(),
        Expr::Not(m) => format!("expected none of [{}]", Members(m)),
        Expr::Lookahead(m) => format!("expected one of [{}] ahead", Members(m)),
        Expr::OneOf(m) => format!("expected one of [{}]", Members(m)),
        Expr::Seq(m) => format!("expected sequence [{}]", Members(m)),
        Expr::Optional(m) => format!("expected optional [{}]", Members(m)),
        Expr::MinMax { min, max, expr } => format!("expected min {min}, max {max} of {expr}"),
        Expr::Min { min, expr } => format!("expected min {min} of {expr}"),
        Expr::Count { n, expr } => format!("expected exactly {n} of {expr}"),
        Expr::Range { first, last } => format!("expected range [{first}-{last}]"),
        Expr::Until { exprs, .. } => format!("expected to reach one of [{}]", Members(exprs)),
        Expr::Hook(hook) => format!("expected hook {}", hook.name()),
    };
    what + &location(cursor)
}
