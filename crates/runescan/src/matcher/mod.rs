//! The `expect` evaluator.
//!
//! Evaluation is a recursive walk over the expression tree against the
//! live scanner. Every evaluation step bookmarks the cursor first and jumps
//! back to it on any failure, so no expression, at any depth, leaves the
//! scanner partially advanced after failing.
//!
//! Success returns the *boundary*: the last point consumed. Zero-width
//! successes (lookahead, empty repetition) return the cursor current when
//! the attempt started.
//!
//! # Tie-breaks
//!
//! - Alternation is first-match, not longest-match.
//! - Repetition is greedy with no backoff. `seq(min(0, 'a'), "aa")` fails
//!   on `"aa"`: the repetition takes both points and is never asked to
//!   give one back.
//! - Repetition runs until the inner expression fails, then checks the
//!   bounds. `count(2, 'a')` fails on `"aaa"`.
//! - A repetition whose inner expression succeeds without consuming stops
//!   after that iteration instead of spinning.

use runescan_core::{Cursor, ScanError, Scanner};
use runescan_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::expr::Expr;
use crate::MatchError;

/// Match `exprs` in order against `scanner`.
///
/// Several expressions are an implicit [`Expr::Seq`]; an empty slice is a
/// zero-width success. On failure the scanner is back where it started.
#[tracing::instrument(level = "trace", skip_all, fields(count = exprs.len()))]
pub fn expect(scanner: &mut Scanner, exprs: &[Expr]) -> Result<Cursor, MatchError> {
    let result = match exprs {
        [single] => eval(scanner, single),
        _ => {
            let start = scanner.mark();
            let result = seq(scanner, exprs, start);
            if result.is_err() {
                scanner.jump(start);
            }
            result
        }
    };
    result.map_err(Failure::into_error)
}

/// Method form of [`expect`].
pub trait Expect {
    /// See [`expect`].
    fn expect(&mut self, exprs: &[Expr]) -> Result<Cursor, MatchError>;
}

impl Expect for Scanner {
    fn expect(&mut self, exprs: &[Expr]) -> Result<Cursor, MatchError> {
        expect(self, exprs)
    }
}

/// A failure while evaluating, borrowing the grammar.
///
/// Most mismatches are discarded by an enclosing alternation, repetition,
/// lookahead or `until`, so the owned [`MatchError`] is only built once a
/// failure leaves [`expect`].
enum Failure<'g> {
    Expected { expr: &'g Expr, cursor: Cursor },
    Hook { name: &'g str, cursor: Cursor },
    Fatal(MatchError),
}

impl Failure<'_> {
    /// Mirrors [`MatchError::is_mismatch`].
    fn is_mismatch(&self) -> bool {
        !matches!(self, Failure::Fatal(_))
    }

    fn byte(&self) -> Option<usize> {
        match self {
            Failure::Expected { cursor, .. } | Failure::Hook { cursor, .. } => {
                Some(cursor.byte_offset())
            }
            Failure::Fatal(_) => None,
        }
    }

    fn into_error(self) -> MatchError {
        match self {
            Failure::Expected { expr, cursor } => MatchError::expected(expr, cursor),
            Failure::Hook { name, cursor } => MatchError::HookFailed {
                name: name.to_owned(),
                cursor,
            },
            Failure::Fatal(err) => err,
        }
    }
}

impl From<ScanError> for Failure<'_> {
    fn from(err: ScanError) -> Self {
        Failure::Fatal(MatchError::Scan(err))
    }
}

type Eval<'g> = Result<Cursor, Failure<'g>>;

/// Evaluate one expression, restoring the cursor if it fails.
fn eval<'g>(s: &mut Scanner, expr: &'g Expr) -> Eval<'g> {
    ensure_sufficient_stack(|| {
        let start = s.mark();
        let result = dispatch(s, expr, start);
        match &result {
            Ok(boundary) => {
                trace!(kind = %expr.kind(), byte = boundary.byte_offset(), "matched");
            }
            Err(failure) => {
                trace!(
                    kind = %expr.kind(),
                    byte = start.byte_offset(),
                    failed_at = ?failure.byte(),
                    mismatch = failure.is_mismatch(),
                    "backtrack"
                );
                s.jump(start);
            }
        }
        result
    })
}

fn dispatch<'g>(s: &mut Scanner, expr: &'g Expr, start: Cursor) -> Eval<'g> {
    match expr {
        Expr::Literal(text) => {
            if text.is_empty() {
                return Err(unsupported(expr, "empty literal"));
            }
            let mut last = start;
            for ch in text.chars() {
                last = point_if(s, expr, |c| c == ch)?;
            }
            Ok(last)
        }
        Expr::Point(ch) => point_if(s, expr, |c| c == *ch),
        Expr::Any => point_if(s, expr, |_| true),
        Expr::Range { first, last } => {
            if first > last {
                return Err(unsupported(expr, "range start is after range end"));
            }
            point_if(s, expr, |c| (*first..=*last).contains(&c))
        }
        Expr::Not(members) => {
            if any_matches(s, members, start)? {
                Err(Failure::Expected { expr, cursor: start })
            } else {
                Ok(start)
            }
        }
        Expr::Lookahead(members) => {
            if any_matches(s, members, start)? {
                Ok(start)
            } else {
                Err(Failure::Expected { expr, cursor: start })
            }
        }
        Expr::OneOf(members) => {
            for member in members {
                match eval(s, member) {
                    Ok(boundary) => return Ok(boundary),
                    Err(failure) if failure.is_mismatch() => {}
                    Err(failure) => return Err(failure),
                }
            }
            Err(Failure::Expected { expr, cursor: start })
        }
        Expr::Seq(members) => seq(s, members, start),
        Expr::Optional(members) => {
            let mut last = start;
            for member in members {
                match repeat(s, expr, member, 0, Some(1)) {
                    Ok((0, _)) => {}
                    Ok((_, boundary)) => last = boundary,
                    Err(failure) if failure.is_mismatch() => {}
                    Err(failure) => return Err(failure),
                }
            }
            Ok(last)
        }
        Expr::MinMax { min, max, expr: inner } => {
            if *max != 0 && min > max {
                return Err(unsupported(expr, "min is greater than max"));
            }
            let max = (*max != 0).then_some(*max);
            repeat(s, expr, inner, *min, max).map(|(_, boundary)| boundary)
        }
        Expr::Min { min, expr: inner } => {
            repeat(s, expr, inner, *min, None).map(|(_, boundary)| boundary)
        }
        Expr::Count { n, expr: inner } => {
            repeat(s, expr, inner, *n, Some(*n)).map(|(_, boundary)| boundary)
        }
        Expr::Until { exprs, inclusive } => until(s, expr, exprs, *inclusive, start),
        Expr::Hook(hook) => {
            if !hook.call(s) {
                return Err(Failure::Hook {
                    name: hook.name(),
                    cursor: s.current(),
                });
            }
            Ok(consumed_boundary(s, start))
        }
    }
}

/// Consume the current point if it satisfies `pred`.
fn point_if<'g>(s: &mut Scanner, expr: &'g Expr, pred: impl Fn(char) -> bool) -> Eval<'g> {
    let cursor = s.current();
    match cursor.point() {
        Some(ch) if pred(ch) => {
            s.advance()?;
            Ok(cursor)
        }
        _ => Err(Failure::Expected { expr, cursor }),
    }
}

fn seq<'g>(s: &mut Scanner, members: &'g [Expr], start: Cursor) -> Eval<'g> {
    let mut last = start;
    for member in members {
        last = eval(s, member)?;
    }
    Ok(last)
}

/// Probe each member at `start` without consuming anything.
fn any_matches<'g>(
    s: &mut Scanner,
    members: &'g [Expr],
    start: Cursor,
) -> Result<bool, Failure<'g>> {
    for member in members {
        let outcome = eval(s, member);
        s.jump(start);
        match outcome {
            Ok(_) => return Ok(true),
            Err(failure) if failure.is_mismatch() => {}
            Err(failure) => return Err(failure),
        }
    }
    Ok(false)
}

/// Greedily match `inner` until it fails, then check `min..=max`
/// (no upper bound if `max` is `None`).
///
/// Returns the number of matches and the last boundary (the start cursor
/// when nothing matched). Out of bounds, the scanner is restored to where
/// the loop began.
fn repeat<'g>(
    s: &mut Scanner,
    outer: &'g Expr,
    inner: &'g Expr,
    min: u32,
    max: Option<u32>,
) -> Result<(u32, Cursor), Failure<'g>> {
    let start = s.mark();
    let mut count: u32 = 0;
    let mut last = start;
    loop {
        let before = s.current();
        match eval(s, inner) {
            Ok(boundary) => {
                count = count.saturating_add(1);
                last = boundary;
                if s.current() == before {
                    break;
                }
            }
            Err(failure) if failure.is_mismatch() => break,
            Err(failure) => {
                s.jump(start);
                return Err(failure);
            }
        }
    }
    if count < min || max.is_some_and(|max| count > max) {
        let cursor = s.current();
        s.jump(start);
        return Err(Failure::Expected {
            expr: outer,
            cursor,
        });
    }
    Ok((count, last))
}

fn until<'g>(
    s: &mut Scanner,
    expr: &'g Expr,
    members: &'g [Expr],
    inclusive: bool,
    start: Cursor,
) -> Eval<'g> {
    let mut last = start;
    loop {
        let here = s.current();
        for member in members {
            match eval(s, member) {
                Ok(boundary) if inclusive => return Ok(boundary),
                Ok(_) => {
                    s.jump(here);
                    return Ok(last);
                }
                Err(failure) if failure.is_mismatch() => {}
                Err(failure) => return Err(failure),
            }
        }
        if here.is_end_of_data() {
            return Err(Failure::Expected { expr, cursor: here });
        }
        last = here;
        s.advance()?;
    }
}

/// Last point a successful hook consumed, or `start` if it did not move.
///
/// A hook that repositioned with [`Scanner::jump`] leaves no previous
/// cursor, so the boundary is found by walking forward from `start` to the
/// point that ends where the live cursor begins.
fn consumed_boundary(s: &Scanner, start: Cursor) -> Cursor {
    let now = s.current();
    if now == start {
        return start;
    }
    if let Some(previous) = s.previous() {
        return previous;
    }
    let mut walk = s.clone();
    walk.jump(start);
    while walk.current().next_byte_offset() < now.byte_offset() {
        if walk.advance().is_err() || walk.is_done() {
            return now;
        }
    }
    if walk.current().next_byte_offset() == now.byte_offset() {
        walk.current()
    } else {
        now
    }
}

fn unsupported<'g>(expr: &Expr, reason: &'static str) -> Failure<'g> {
    Failure::Fatal(MatchError::Unsupported {
        kind: expr.kind(),
        reason,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests use unwrap for brevity")]
mod tests;
