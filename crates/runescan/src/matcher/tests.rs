use pretty_assertions::assert_eq;
use proptest::prelude::*;
use runescan_core::ScanError;

use super::*;

fn scanner(source: &str) -> Scanner {
    Scanner::new(source).unwrap()
}

/// Run `exprs` and assert the scanner is untouched after a failure.
fn run(s: &mut Scanner, exprs: &[Expr]) -> Result<Cursor, MatchError> {
    let before = s.current();
    let result = expect(s, exprs);
    if result.is_err() {
        assert_eq!(s.current(), before, "scanner moved after failed match");
    }
    result
}

// === Literals and points ===

#[test]
fn literal_boundary_is_last_point() {
    let mut s = scanner("some thing");
    let end = run(&mut s, &[Expr::lit("some")]).unwrap();
    assert_eq!(end.point(), Some('e'));
    assert_eq!(end.byte_offset(), 3);
    assert_eq!(s.current().point(), Some(' '));
}

#[test]
fn literal_mismatch_reports_failing_point() {
    let mut s = scanner("somber");
    let err = run(&mut s, &[Expr::lit("some")]).unwrap_err();
    let cursor = err.cursor().unwrap();
    assert_eq!(cursor.point(), Some('b'));
    assert_eq!(s.current().point(), Some('s'));
}

#[test]
fn literal_past_end_fails() {
    let mut s = scanner("so");
    assert!(run(&mut s, &[Expr::lit("some")]).is_err());
}

#[test]
fn point_and_any() {
    let mut s = scanner("ab");
    assert_eq!(run(&mut s, &[Expr::Point('a')]).unwrap().point(), Some('a'));
    assert!(run(&mut s, &[Expr::Point('a')]).is_err());
    assert_eq!(run(&mut s, &[Expr::Any]).unwrap().point(), Some('b'));
    assert!(s.is_done());
    assert!(run(&mut s, &[Expr::Any]).is_err());
}

#[test]
fn end_of_data_message() {
    let mut s = scanner("ab");
    s.advance_n(2).unwrap();
    let err = run(&mut s, &[Expr::Point('c')]).unwrap_err();
    assert!(
        err.to_string().ends_with(", exceeded data length (2 runes)"),
        "got: {err}"
    );
}

#[test]
fn range_is_inclusive() {
    for (source, ok) in [("m", true), ("a", true), ("z", true), ("M", false), ("0", false)] {
        let mut s = scanner(source);
        assert_eq!(
            run(&mut s, &[Expr::range('a', 'z')]).is_ok(),
            ok,
            "range('a', 'z') on {source:?}"
        );
    }
}

#[test]
fn multibyte_points() {
    let mut s = scanner("héllo");
    let end = run(&mut s, &[Expr::lit("hé")]).unwrap();
    assert_eq!(end.point(), Some('é'));
    assert_eq!(end.len(), 2);
    assert_eq!(s.current().byte_offset(), 3);
}

// === Lookahead ===

#[test]
fn not_fails_without_consuming() {
    let mut s = scanner("some thing");
    let err = run(&mut s, &[Expr::not(["some"])]).unwrap_err();
    assert!(err.is_mismatch());
    assert_eq!(s.current().point(), Some('s'));
}

#[test]
fn not_succeeds_zero_width() {
    let mut s = scanner("other");
    let end = run(&mut s, &[Expr::not(["some", "thing"])]).unwrap();
    assert_eq!(end, s.current());
    assert_eq!(s.current().point(), Some('o'));
}

#[test]
fn lookahead_never_consumes() {
    let mut s = scanner("some thing");
    let end = run(&mut s, &[Expr::ahead(["x", "so"])]).unwrap();
    assert_eq!(end.point(), Some('s'));
    assert_eq!(s.current().point(), Some('s'));
    assert!(run(&mut s, &[Expr::ahead(["x"])]).is_err());
}

// === Alternation and sequences ===

#[test]
fn one_of_is_first_match() {
    let mut s = scanner("some thing");
    let end = run(&mut s, &[Expr::one_of(["so", "some"])]).unwrap();
    assert_eq!(end.point(), Some('o'));
    assert_eq!(s.current().point(), Some('m'));
}

#[test]
fn one_of_restores_between_attempts() {
    let mut s = scanner("sample");
    let end = run(&mut s, &[Expr::one_of(["sat", "sam"])]).unwrap();
    assert_eq!(end.point(), Some('m'));
}

#[test]
fn one_of_all_fail() {
    let mut s = scanner("xyz");
    let err = run(&mut s, &[Expr::one_of(['a', 'b'])]).unwrap_err();
    assert!(matches!(err, MatchError::Expected { expr: Expr::OneOf(_), .. }));
}

#[test]
fn seq_fails_fast_and_restores_before_first_member() {
    let mut s = scanner("some thing");
    let err = run(&mut s, &[Expr::seq(["some", "x"])]).unwrap_err();
    // The inner failure is propagated.
    assert!(matches!(err, MatchError::Expected { expr: Expr::Literal(ref t), .. } if t == "x"));
    assert_eq!(s.current().byte_offset(), 0);
}

#[test]
fn several_expressions_are_a_sequence() {
    let mut s = scanner("some thing");
    let end = run(&mut s, &[Expr::lit("some"), Expr::Point(' ')]).unwrap();
    assert_eq!(end.point(), Some(' '));
    assert_eq!(s.current().point(), Some('t'));

    let mut s = scanner("some thing");
    assert!(run(&mut s, &[Expr::lit("some"), Expr::Point('x')]).is_err());
}

#[test]
fn empty_expect_is_zero_width() {
    let mut s = scanner("a");
    assert_eq!(run(&mut s, &[]).unwrap(), s.current());
}

#[test]
fn optional_never_fails() {
    let mut s = scanner("-42");
    let end = run(&mut s, &[Expr::opt(['+', '-'])]).unwrap();
    assert_eq!(end.point(), Some('-'));
    assert_eq!(s.current().point(), Some('4'));

    let mut s = scanner("42");
    let end = run(&mut s, &[Expr::opt(['+', '-'])]).unwrap();
    assert_eq!(end, s.current());
    assert_eq!(s.current().point(), Some('4'));
}

#[test]
fn optional_takes_each_member_once() {
    let mut s = scanner("abc");
    let end = run(&mut s, &[Expr::opt(['a', 'b'])]).unwrap();
    assert_eq!(end.point(), Some('b'));
    assert_eq!(s.current().point(), Some('c'));
}

#[test]
fn optional_member_repeated_is_no_match() {
    let mut s = scanner("aa");
    let end = run(&mut s, &[Expr::opt(['a'])]).unwrap();
    assert_eq!(end, s.current());
    assert_eq!(s.current().byte_offset(), 0);

    // Later members still run from where the earlier ones left off.
    let mut s = scanner("aab");
    let end = run(&mut s, &[Expr::opt([Expr::Point('a'), Expr::lit("aa")])]).unwrap();
    assert_eq!(end.byte_offset(), 1);
    assert_eq!(s.current().point(), Some('b'));
}

// === Quantifiers ===

#[test]
fn min_max_bounds() {
    let mut s = scanner("sssoo");
    let end = run(&mut s, &[Expr::min_max(2, 3, 's')]).unwrap();
    assert_eq!(end.byte_offset(), 2);
    assert_eq!(s.current().point(), Some('o'));
}

#[test]
fn min_max_above_max_fails() {
    let mut s = scanner("sssss");
    let err = run(&mut s, &[Expr::min_max(2, 3, 's')]).unwrap_err();
    assert!(matches!(err, MatchError::Expected { expr: Expr::MinMax { .. }, .. }));
    assert!(err.is_mismatch());
    // Reported where the loop stopped, past the extra points.
    assert_eq!(err.cursor().map(|c| c.is_end_of_data()), Some(true));
    assert_eq!(s.current().byte_offset(), 0);
}

#[test]
fn min_max_below_min_fails() {
    let mut s = scanner("soo");
    let err = run(&mut s, &[Expr::min_max(2, 3, 's')]).unwrap_err();
    assert_eq!(err.cursor().map(|c| c.point()), Some(Some('o')));
}

#[test]
fn min_max_zero_matches_is_pre_loop_cursor() {
    let mut s = scanner("oo");
    let end = run(&mut s, &[Expr::min_max(0, 3, 's')]).unwrap();
    assert_eq!(end, s.current());
    assert_eq!(end.byte_offset(), 0);
}

#[test]
fn min_max_zero_max_is_unbounded() {
    let mut s = scanner("aaaaab");
    run(&mut s, &[Expr::min_max(1, 0, 'a')]).unwrap();
    assert_eq!(s.current().point(), Some('b'));
}

#[test]
fn min_needs_lower_bound() {
    let mut s = scanner("aab");
    assert!(run(&mut s, &[Expr::min(3, 'a')]).is_err());
    let end = run(&mut s, &[Expr::min1('a')]).unwrap();
    assert_eq!(end.byte_offset(), 1);
}

#[test]
fn count_is_exact() {
    let mut s = scanner("aaab");
    let end = run(&mut s, &[Expr::count(3, 'a')]).unwrap();
    assert_eq!(end.byte_offset(), 2);
    assert_eq!(s.current().point(), Some('b'));

    let mut s = scanner("aaaa");
    assert!(run(&mut s, &[Expr::count(3, 'a')]).is_err());
    assert!(run(&mut s, &[Expr::count(5, 'a')]).is_err());
    run(&mut s, &[Expr::count(4, 'a')]).unwrap();
    assert!(s.is_done());
}

#[test]
fn count_zero_needs_no_match() {
    let mut s = scanner("b");
    let end = run(&mut s, &[Expr::count(0, 'a')]).unwrap();
    assert_eq!(end, s.current());
    assert!(run(&mut s, &[Expr::count(0, 'b')]).is_err());
}

#[test]
fn quantifiers_do_not_back_off() {
    let mut s = scanner("aa");
    let grammar = Expr::seq([Expr::min_max(0, 0, 'a'), Expr::lit("aa")]);
    assert!(run(&mut s, &[grammar]).is_err());
    assert_eq!(s.current().byte_offset(), 0);
}

#[test]
fn zero_width_repetition_terminates() {
    let mut s = scanner("abc");
    let end = run(&mut s, &[Expr::min(0, Expr::not(['x']))]).unwrap();
    assert_eq!(end.byte_offset(), 0);
}

// === Until ===

#[test]
fn until_stops_before_boundary() {
    let mut s = scanner("key: value");
    let end = run(&mut s, &[Expr::until([':'])]).unwrap();
    assert_eq!(end.point(), Some('y'));
    assert_eq!(s.current().point(), Some(':'));
}

#[test]
fn until_inclusive_consumes_boundary() {
    let mut s = scanner("a /* b */ c");
    let end = run(&mut s, &[Expr::until_incl(["*/"])]).unwrap();
    assert_eq!(end.point(), Some('/'));
    assert_eq!(end.byte_offset(), 8);
    assert_eq!(s.current().point(), Some(' '));
}

#[test]
fn until_first_of_several() {
    let mut s = scanner("abc;def,");
    run(&mut s, &[Expr::until([',', ';'])]).unwrap();
    assert_eq!(s.current().point(), Some(';'));
}

#[test]
fn until_without_boundary_fails() {
    let mut s = scanner("no colon here");
    let err = run(&mut s, &[Expr::until([':'])]).unwrap_err();
    assert!(err.to_string().ends_with("exceeded data length (13 runes)"));
}

#[test]
fn until_over_long_input_keeps_outer_failure() {
    let source = "ab".repeat(25_000);
    let mut s = scanner(&source);
    let grammar = Expr::until([Expr::seq(['b', ':']), Expr::lit("::")]);
    let err = run(&mut s, &[grammar]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "expected to reach one of [seq('b', ':'), \"::\"], exceeded data length (50000 runes)"
    );
    assert!(matches!(err, MatchError::Expected { expr: Expr::Until { .. }, .. }));
}

#[test]
fn until_at_boundary_is_zero_width() {
    let mut s = scanner(":x");
    let end = run(&mut s, &[Expr::until([':'])]).unwrap();
    assert_eq!(end, s.current());
    assert_eq!(end.point(), Some(':'));
}

// === Hooks ===

#[test]
fn hook_advances_itself() {
    let digits = Expr::hook("digits", |s: &mut Scanner| {
        let mut any = false;
        while s.current().point().is_some_and(|c| c.is_ascii_digit()) {
            any = true;
            if s.advance().is_err() {
                return false;
            }
        }
        any
    });
    let mut s = scanner("123x");
    let end = run(&mut s, &[digits.clone()]).unwrap();
    assert_eq!(end.point(), Some('3'));
    assert_eq!(s.current().point(), Some('x'));

    let err = run(&mut s, &[digits]).unwrap_err();
    assert!(matches!(err, MatchError::HookFailed { ref name, .. } if name == "digits"));
}

#[test]
fn failed_hook_is_rolled_back() {
    let greedy = Expr::hook("greedy", |s: &mut Scanner| {
        let _ = s.advance_n(2);
        false
    });
    let mut s = scanner("abc");
    assert!(run(&mut s, &[greedy]).is_err());
    assert_eq!(s.current().point(), Some('a'));
}

#[test]
fn hook_can_nest_expect() {
    let word = Expr::hook("word", |s: &mut Scanner| {
        s.expect(&[Expr::min1(Expr::range('a', 'z'))]).is_ok()
    });
    let mut s = scanner("abc1");
    run(&mut s, &[word, Expr::Point('1')]).unwrap();
    assert!(s.is_done());
}

#[test]
fn hook_that_jumps_reports_last_consumed_point() {
    let skip = Expr::hook("skip3", |s: &mut Scanner| {
        let mut ahead = s.clone();
        if ahead.advance_n(3).is_err() {
            return false;
        }
        s.jump(ahead.current());
        true
    });
    let mut s = scanner("abcd");
    let end = run(&mut s, &[skip.clone()]).unwrap();
    assert_eq!(end.point(), Some('c'));
    assert_eq!(end.position().point, 3);
    assert_eq!(s.current().point(), Some('d'));

    let mut s = scanner("a\nb");
    let end = run(&mut s, &[skip]).unwrap();
    assert_eq!(end.point(), Some('b'));
    assert_eq!(end.position().line, 2);
    assert!(s.is_done());
}

#[test]
fn zero_width_hook_returns_start() {
    let mut s = scanner("a");
    let end = run(&mut s, &[Expr::hook("noop", |_| true)]).unwrap();
    assert_eq!(end, s.current());
}

// === Invalid grammars ===

#[test]
fn invalid_expressions_are_unsupported() {
    let cases = [
        Expr::range('z', 'a'),
        Expr::min_max(3, 2, 'a'),
        Expr::lit(""),
    ];
    for expr in cases {
        let mut s = scanner("abc");
        let err = run(&mut s, &[expr]).unwrap_err();
        assert!(matches!(err, MatchError::Unsupported { .. }), "got: {err}");
    }
}

#[test]
fn unsupported_escapes_alternation() {
    let mut s = scanner("abc");
    let err = run(&mut s, &[Expr::one_of([Expr::lit(""), Expr::Point('a')])]).unwrap_err();
    assert!(!err.is_mismatch());
}

// === Decode errors ===

#[test]
fn decode_failure_mid_match() {
    let mut s = Scanner::from_bytes(vec![b'a', 0xFF]).unwrap();
    let err = run(&mut s, &[Expr::lit("ab")]).unwrap_err();
    assert!(matches!(err, MatchError::Scan(ScanError::Decode { offset: 1 })));
}

// === Deep nesting ===

#[test]
fn deeply_nested_grammar() {
    let mut expr = Expr::Point('a');
    for _ in 0..2_000 {
        expr = Expr::seq([expr]);
    }
    let mut s = scanner("a");
    run(&mut s, &[expr]).unwrap();
    assert!(s.is_done());
}

proptest! {
    #[test]
    fn min_max_accepts_only_counts_in_bounds(
        min in 0u32..5,
        spread in 0u32..4,
        k in 0u32..9,
    ) {
        // spread 0 is unbounded, otherwise max = min + spread - 1.
        let max = if spread == 0 { 0 } else { min + spread - 1 };
        let source = format!("{}b", "a".repeat(usize::try_from(k).unwrap()));
        let mut s = scanner(&source);
        let result = run(&mut s, &[Expr::min_max(min, max, 'a')]);
        let in_bounds = min <= k && (max == 0 || k <= max);
        prop_assert_eq!(result.is_ok(), in_bounds, "min_max({}, {}, 'a') on {:?}", min, max, source);
        if in_bounds {
            prop_assert_eq!(s.current().point(), Some('b'));
        }
    }
}
