//! Grammar expressions.
//!
//! An [`Expr`] is inert data describing what to match. Building one never
//! touches a scanner, so grammars are assembled once and reused across any
//! number of inputs (expressions are `Send + Sync`).
//!
//! ```
//! use runescan::Expr;
//!
//! // One or more ASCII digits, optionally followed by a unit.
//! let number = Expr::seq([
//!     Expr::min(1, Expr::range('0', '9')),
//!     Expr::opt([Expr::one_of(["ms", "s"])]),
//! ]);
//! assert_eq!(number.to_string(), r#"seq(min(1, range('0', '9')), opt(one_of("ms", "s")))"#);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use runescan_core::Scanner;

/// Signature of caller-supplied matching logic.
pub type HookFn = dyn Fn(&mut Scanner) -> bool + Send + Sync;

/// Named escape hatch for matching the grammar cannot express.
///
/// The function receives the live scanner and must do its own advancing.
/// Returning `false` fails the hook; the matcher then restores the cursor
/// regardless of how far the hook moved it.
///
/// On success the boundary is the last point the hook consumed, whether it
/// got there with `advance` or with a forward `jump`. A hook that leaves the
/// cursor where it found it is a zero-width match.
#[derive(Clone)]
pub struct Hook {
    name: Cow<'static, str>,
    func: Arc<HookFn>,
}

impl Hook {
    /// Create a hook named `name`.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&mut Scanner) -> bool + Send + Sync + 'static,
    ) -> Self {
        Hook {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn call(&self, scanner: &mut Scanner) -> bool {
        (self.func)(scanner)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.name).finish()
    }
}

/// A grammar expression.
#[derive(Clone, Debug)]
pub enum Expr {
    /// Exact sequence of points.
    Literal(String),
    /// Exact single point.
    Point(char),
    /// Any single point (never end of data).
    Any,
    /// Negative lookahead: fails if any member matches here. Never consumes.
    Not(Vec<Expr>),
    /// Positive lookahead: succeeds if any member matches here. Never consumes.
    Lookahead(Vec<Expr>),
    /// First member that matches wins.
    OneOf(Vec<Expr>),
    /// All members in order.
    Seq(Vec<Expr>),
    /// Each member zero or one time, in order.
    Optional(Vec<Expr>),
    /// Greedy repetition until `expr` fails, accepted if it matched
    /// `min..=max` times; `max == 0` is unbounded.
    MinMax { min: u32, max: u32, expr: Box<Expr> },
    /// Greedy repetition, at least `min` times.
    Min { min: u32, expr: Box<Expr> },
    /// Exactly `n` repetitions; a further match fails the expression.
    Count { n: u32, expr: Box<Expr> },
    /// Single point in `first..=last`.
    Range { first: char, last: char },
    /// Everything up to the first position where a member matches.
    Until { exprs: Vec<Expr>, inclusive: bool },
    /// Caller-supplied logic.
    Hook(Hook),
}

/// Discriminant of an [`Expr`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Literal,
    Point,
    Any,
    Not,
    Lookahead,
    OneOf,
    Seq,
    Optional,
    MinMax,
    Min,
    Count,
    Range,
    Until,
    Hook,
}

impl ExprKind {
    /// Lowercase name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            ExprKind::Literal => "literal",
            ExprKind::Point => "point",
            ExprKind::Any => "any",
            ExprKind::Not => "not",
            ExprKind::Lookahead => "lookahead",
            ExprKind::OneOf => "one_of",
            ExprKind::Seq => "seq",
            ExprKind::Optional => "optional",
            ExprKind::MinMax => "min_max",
            ExprKind::Min => "min",
            ExprKind::Count => "count",
            ExprKind::Range => "range",
            ExprKind::Until => "until",
            ExprKind::Hook => "hook",
        }
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn collect<I, E>(members: I) -> Vec<Expr>
where
    I: IntoIterator<Item = E>,
    E: Into<Expr>,
{
    members.into_iter().map(Into::into).collect()
}

impl Expr {
    /// Exact text.
    pub fn lit(text: impl Into<String>) -> Expr {
        Expr::Literal(text.into())
    }

    #[allow(
        clippy::should_implement_trait,
        reason = "grammar constructor, not boolean negation"
    )]
    pub fn not<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Not(collect(members))
    }

    pub fn ahead<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Lookahead(collect(members))
    }

    pub fn one_of<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::OneOf(collect(members))
    }

    pub fn seq<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Seq(collect(members))
    }

    pub fn opt<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Optional(collect(members))
    }

    pub fn min_max(min: u32, max: u32, expr: impl Into<Expr>) -> Expr {
        Expr::MinMax {
            min,
            max,
            expr: Box::new(expr.into()),
        }
    }

    pub fn min(min: u32, expr: impl Into<Expr>) -> Expr {
        Expr::Min {
            min,
            expr: Box::new(expr.into()),
        }
    }

    /// One or more.
    pub fn min1(expr: impl Into<Expr>) -> Expr {
        Expr::min(1, expr)
    }

    pub fn count(n: u32, expr: impl Into<Expr>) -> Expr {
        Expr::Count {
            n,
            expr: Box::new(expr.into()),
        }
    }

    pub fn range(first: char, last: char) -> Expr {
        Expr::Range { first, last }
    }

    /// Up to, not including, the first match of any member.
    pub fn until<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Until {
            exprs: collect(members),
            inclusive: false,
        }
    }

    /// Up to and including the first match of any member.
    pub fn until_incl<I, E>(members: I) -> Expr
    where
        I: IntoIterator<Item = E>,
        E: Into<Expr>,
    {
        Expr::Until {
            exprs: collect(members),
            inclusive: true,
        }
    }

    pub fn hook(
        name: impl Into<Cow<'static, str>>,
        func: impl Fn(&mut Scanner) -> bool + Send + Sync + 'static,
    ) -> Expr {
        Expr::Hook(Hook::new(name, func))
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Literal(_) => ExprKind::Literal,
            Expr::Point(_) => ExprKind::Point,
            Expr::Any => ExprKind::Any,
            Expr::Not(_) => ExprKind::Not,
            Expr::Lookahead(_) => ExprKind::Lookahead,
            Expr::OneOf(_) => ExprKind::OneOf,
            Expr::Seq(_) => ExprKind::Seq,
            Expr::Optional(_) => ExprKind::Optional,
            Expr::MinMax { .. } => ExprKind::MinMax,
            Expr::Min { .. } => ExprKind::Min,
            Expr::Count { .. } => ExprKind::Count,
            Expr::Range { .. } => ExprKind::Range,
            Expr::Until { .. } => ExprKind::Until,
            Expr::Hook(_) => ExprKind::Hook,
        }
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Expr::Literal(text.to_owned())
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Expr::Literal(text)
    }
}

impl From<char> for Expr {
    fn from(ch: char) -> Self {
        Expr::Point(ch)
    }
}

impl From<Hook> for Expr {
    fn from(hook: Hook) -> Self {
        Expr::Hook(hook)
    }
}

/// Members separated by `", "`.
pub(crate) struct Members<'a>(pub(crate) &'a [Expr]);

impl fmt::Display for Members<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, expr) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(expr, f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) => write!(f, "{text:?}"),
            Expr::Point(ch) => write!(f, "{ch:?}"),
            Expr::Any => f.write_str("any"),
            Expr::Not(m) => write!(f, "not({})", Members(m)),
            Expr::Lookahead(m) => write!(f, "ahead({})", Members(m)),
            Expr::OneOf(m) => write!(f, "one_of({})", Members(m)),
            Expr::Seq(m) => write!(f, "seq({})", Members(m)),
            Expr::Optional(m) => write!(f, "opt({})", Members(m)),
            Expr::MinMax { min, max, expr } => write!(f, "min_max({min}, {max}, {expr})"),
            Expr::Min { min, expr } => write!(f, "min({min}, {expr})"),
            Expr::Count { n, expr } => write!(f, "count({n}, {expr})"),
            Expr::Range { first, last } => write!(f, "range({first:?}, {last:?})"),
            Expr::Until { exprs, inclusive } => {
                let name = if *inclusive { "until_incl" } else { "until" };
                write!(f, "{name}({})", Members(exprs))
            }
            Expr::Hook(hook) => write!(f, "hook({})", hook.name()),
        }
    }
}
