//! Diagnostic series generator tests: stop/skip rules and derived values.

use cf_engine::{
    diagnostic_series, evaluate_generalized, gcd_rational, limit_estimate, DiagnosticPoint,
    EngineError, Precision, SeriesKind,
};
use num_bigint::BigInt;
use num_rational::BigRational;
use std::rc::Rc;

fn parse(text: &str) -> Rc<cf_ast::Expr> {
    cf_parser::parse(&cf_parser::normalize(text)).unwrap()
}

fn golden_setup(
    depth: i64,
    precision: Precision,
) -> (cf_engine::ConvergentSequence, BigRational) {
    // a == 1, b == 1 converges to the golden ratio
    let a = parse("1");
    let b = parse("1");
    let seq = evaluate_generalized(&a, &b, "n", depth, precision).unwrap();
    let limit = limit_estimate(&a, &b, "n", depth, precision).unwrap().unwrap();
    (seq, limit)
}

fn xs(points: &[DiagnosticPoint]) -> Vec<i64> {
    points.iter().map(|p| p.x).collect()
}

#[test]
fn error_series_is_non_negative_and_ordered() {
    let precision = Precision::default();
    let (seq, limit) = golden_setup(30, precision);
    let error =
        diagnostic_series(SeriesKind::Error, &seq, Some(&limit), 30, precision).unwrap();
    assert!(!error.is_empty());
    for p in &error {
        assert!(!p.y.starts_with('-'), "error({}) = {}", p.x, p.y);
    }
    let indices = xs(&error);
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);
    assert_eq!(indices[0], 1);
}

#[test]
fn error_series_stops_when_precision_is_exhausted() {
    // at 10 significant digits the golden-ratio fraction converges long
    // before n = 200; the error series must stop, not run to the bound
    let precision = Precision::new(10);
    let (seq, limit) = golden_setup(200, precision);
    let error =
        diagnostic_series(SeriesKind::Error, &seq, Some(&limit), 200, precision).unwrap();
    let last = error.last().unwrap().x;
    assert!(last < 200, "series ran to the bound, last = {}", last);

    // log_error omits the terminal point and anything non-finite
    let log_error =
        diagnostic_series(SeriesKind::LogError, &seq, Some(&limit), 200, precision).unwrap();
    assert!(log_error.last().unwrap().x < last);
}

#[test]
fn log_error_defined_iff_error_positive() {
    let precision = Precision::default();
    let (seq, limit) = golden_setup(25, precision);
    let error =
        diagnostic_series(SeriesKind::Error, &seq, Some(&limit), 25, precision).unwrap();
    let log_error =
        diagnostic_series(SeriesKind::LogError, &seq, Some(&limit), 25, precision).unwrap();
    let log_xs = xs(&log_error);
    for p in &error {
        let positive_below_tolerance = p.y != "0";
        if log_xs.contains(&p.x) {
            assert!(positive_below_tolerance);
        }
    }
    // every log_error index is also an error index
    let err_xs = xs(&error);
    assert!(log_xs.iter().all(|x| err_xs.contains(x)));
}

#[test]
fn slope_spans_consecutive_defined_points() {
    let precision = Precision::default();
    let (seq, limit) = golden_setup(25, precision);
    let log_error =
        diagnostic_series(SeriesKind::LogError, &seq, Some(&limit), 25, precision).unwrap();
    let slope =
        diagnostic_series(SeriesKind::Slope, &seq, Some(&limit), 25, precision).unwrap();
    assert_eq!(slope.len(), log_error.len().saturating_sub(1));
    for p in &slope {
        let v: f64 = p.y.parse().unwrap();
        assert!(v >= 0.0 && v.is_finite());
    }
}

#[test]
fn delta_skips_unit_denominators() {
    let precision = Precision::default();
    let (seq, limit) = golden_setup(25, precision);
    // q[1] = 1 for this fraction, so delta starts later
    assert_eq!(seq.get(1).unwrap().denominator, BigRational::from_integer(BigInt::from(1)));
    let delta =
        diagnostic_series(SeriesKind::Delta, &seq, Some(&limit), 25, precision).unwrap();
    assert!(!delta.is_empty());
    assert!(xs(&delta).iter().all(|&x| x > 1));
    for p in &delta {
        let v: f64 = p.y.parse().unwrap();
        assert!(v.is_finite());
    }
}

#[test]
fn reduced_delta_matches_delta_for_coprime_convergents() {
    // Fibonacci-style numerators and denominators are coprime, so reducing
    // by the gcd changes nothing
    let precision = Precision::default();
    let (seq, limit) = golden_setup(25, precision);
    let delta =
        diagnostic_series(SeriesKind::Delta, &seq, Some(&limit), 25, precision).unwrap();
    let reduced =
        diagnostic_series(SeriesKind::ReducedDelta, &seq, Some(&limit), 25, precision).unwrap();
    assert_eq!(delta, reduced);
}

#[test]
fn growth_divides_out_the_gcd() {
    let a = parse("(1 + 2 n) (5 + 17 n (1 + n))");
    let b = parse("-n^6");
    let precision = Precision::default();
    let seq = evaluate_generalized(&a, &b, "n", 10, precision).unwrap();
    let growth = diagnostic_series(SeriesKind::Growth, &seq, None, 10, precision).unwrap();
    assert_eq!(growth.len(), 9); // indices 1..=9
    for p in &growth {
        let c = seq.get(p.x).unwrap();
        let g = gcd_rational(&c.numerator, &c.denominator);
        let expected = &c.denominator / &g;
        assert!(expected.is_integer());
        assert_eq!(p.y, expected.to_integer().to_string());
    }
}

#[test]
fn limit_dependent_series_require_a_limit() {
    let precision = Precision::default();
    let (seq, _) = golden_setup(10, precision);
    for kind in [
        SeriesKind::Error,
        SeriesKind::LogError,
        SeriesKind::Slope,
        SeriesKind::Delta,
        SeriesKind::ReducedDelta,
    ] {
        assert!(matches!(
            diagnostic_series(kind, &seq, None, 10, precision),
            Err(EngineError::MissingLimit)
        ));
    }
    assert!(diagnostic_series(SeriesKind::Growth, &seq, None, 10, precision).is_ok());
}

#[test]
fn undefined_ratios_are_omitted_from_error() {
    // a == 0, b == 1 has an undefined convergent at n = 1
    let a = parse("0");
    let b = parse("1");
    let precision = Precision::default();
    let seq = evaluate_generalized(&a, &b, "n", 6, precision).unwrap();
    let limit = BigRational::from_integer(BigInt::from(7)); // arbitrary, far away
    let error =
        diagnostic_series(SeriesKind::Error, &seq, Some(&limit), 6, precision).unwrap();
    assert!(!xs(&error).contains(&1));
}
