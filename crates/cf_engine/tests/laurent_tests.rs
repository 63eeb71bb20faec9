//! Delta-expansion and classifier tests.
//!
//! The verdict rule is an opaque domain heuristic; these tests pin its
//! behavior on the canonical corpus, they do not argue it is correct.

use cf_engine::{classify_convergence, expand_delta, EngineError, LaurentExpansion};
use std::rc::Rc;

fn parse(text: &str) -> Rc<cf_ast::Expr> {
    cf_parser::parse(&cf_parser::normalize(text)).unwrap()
}

fn expand(a: &str, b: &str, terms: usize) -> LaurentExpansion {
    expand_delta(&parse(a), &parse(b), Some("n"), terms).unwrap()
}

#[test]
fn expansion_corpus() {
    let cases = [
        ("2", "n", "n + 1"),
        ("2*n + 1", "-n^2", "-1/(4*n^2) - 1/(16*n^4) + o(1/n^4)"),
        ("2*n + 5", "-n", "1 - 1/n + o(1/n)"),
        ("4*n + 2", "-n^2", "3/4 - 1/(16*n^2) + o(1/n^2)"),
        ("1", "1", "5"),
        ("2", "-1", "0"),
        ("1", "-(n^2)", "-4*n^2 + 1"),
        ("1", "n^3", "4*n^3 + 1"),
    ];
    for (a, b, expected) in cases {
        assert_eq!(expand(a, b, 2).to_string(), expected, "a={}, b={}", a, b);
    }
}

#[test]
fn finite_expansions_are_exact() {
    assert!(expand("1", "n^3", 2).is_exact());
    assert!(expand("2", "n", 2).is_exact());
    assert!(expand("2", "-1", 2).is_exact());
    assert!(!expand("2*n + 1", "-n^2", 2).is_exact());
}

#[test]
fn truncated_remainder_tracks_last_term() {
    let e = expand("2*n + 1", "-n^2", 3);
    // third non-zero term sits at n^-6
    assert_eq!(e.terms.last().unwrap().power, -6);
    assert_eq!(e.remainder, Some(-6));
}

#[test]
fn zero_term_count_reports_only_the_leading_order() {
    let e = expand("2*n + 1", "-n^2", 0);
    assert!(e.terms.is_empty());
    assert_eq!(e.remainder, Some(0));
    assert_eq!(e.to_string(), "o(1)");
}

#[test]
fn expansion_is_idempotent() {
    let first = expand("2*n + 1", "-n^2", 2);
    let second = expand("2*n + 1", "-n^2", 2);
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn constant_coefficients_without_variable() {
    let e = expand_delta(&parse("1"), &parse("1"), None, 2).unwrap();
    assert!(e.is_exact());
    assert_eq!(e.to_string(), "5");
    let zero = expand_delta(&parse("2"), &parse("-1"), None, 2).unwrap();
    assert_eq!(zero.to_string(), "0");
}

#[test]
fn classifier_corpus() {
    // negative leading power converges
    assert!(classify_convergence(&expand("2*n + 1", "-n^2", 2)));
    // constant leading term with positive coefficient converges
    assert!(classify_convergence(&expand("2*n + 5", "-n", 2)));
    assert!(classify_convergence(&expand("4*n + 2", "-n^2", 2)));
    assert!(classify_convergence(&expand("1", "1", 2)));
    // cubic growth does not
    assert!(!classify_convergence(&expand("1", "n^3", 2)));
    // delta identically zero does not
    assert!(!classify_convergence(&expand("2", "-1", 2)));
}

#[test]
fn pathological_growth_fails_the_leading_order_search() {
    let a = parse("1");
    let b = parse("n^70");
    assert!(matches!(
        expand_delta(&a, &b, Some("n"), 2),
        Err(EngineError::AsymptoticSearchDiverged(_))
    ));
}

#[test]
fn zero_partial_denominator_is_rejected() {
    assert!(matches!(
        expand_delta(&parse("0"), &parse("1"), Some("n"), 2),
        Err(EngineError::NonRational(_))
    ));
}
