//! Diagnostic series derived from the convergent sequence.
//!
//! Each generator is a single stateless pass over the sequence. The error
//! series *stops* at the first index whose ratio is indistinguishable from
//! the limit at working precision (no further digits are representable);
//! every other degenerate point is *skipped* silently, so gaps in a series
//! are expected and carry no error state.

use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use tracing::debug;

use crate::error::EngineError;
use crate::precision::{almost_eq, log10_abs, to_decimal_string, Precision};
use crate::recurrence::ConvergentSequence;

/// Chunk size for incremental delivery at the transport boundary.
pub const BATCH_SIZE: usize = 500;

/// A denominator whose log10 magnitude is below this is treated as +-1.
const Q_LOG_EPS: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Error,
    LogError,
    Slope,
    Delta,
    ReducedDelta,
    Growth,
}

/// One chartable coordinate pair; `y` is decimal text so arbitrary
/// magnitudes survive JSON intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticPoint {
    pub x: i64,
    pub y: String,
}

/// gcd over rationals: `gcd(a/b, c/d) = gcd(a, c) / lcm(b, d)`.
///
/// Coincides with the integer gcd on integers and divides both arguments
/// exactly in all cases; zero only when both arguments are zero.
pub fn gcd_rational(a: &BigRational, b: &BigRational) -> BigRational {
    if a.is_zero() && b.is_zero() {
        return BigRational::zero();
    }
    let num = a.numer().gcd(b.numer());
    let den = a.denom().lcm(b.denom());
    BigRational::new(num, den)
}

struct ErrorPoint {
    x: i64,
    error: BigRational,
    log_error: Option<f64>,
}

/// Walk indices 1..=bound with defined ratios, carrying |ratio - limit| and
/// its log10. Stops after the precision-exhausted terminal point.
fn error_scaffold(
    seq: &ConvergentSequence,
    limit: &BigRational,
    bound: i64,
    precision: Precision,
) -> Vec<ErrorPoint> {
    let mut out = Vec::new();
    for c in seq.iter() {
        if c.index < 1 || c.index > bound {
            continue;
        }
        let Some(ratio) = &c.ratio else { continue };
        let error = (ratio - limit).abs();
        let exhausted = almost_eq(ratio, limit, precision);
        let log_error = if exhausted || error.is_zero() {
            None
        } else {
            log10_abs(&error)
        };
        out.push(ErrorPoint {
            x: c.index,
            error,
            log_error,
        });
        if exhausted {
            debug!(n = c.index, "precision exhausted, value indistinguishable from limit");
            break;
        }
    }
    out
}

fn format_f64(v: f64) -> String {
    format!("{}", v)
}

fn error_series(scaffold: &[ErrorPoint], precision: Precision) -> Vec<DiagnosticPoint> {
    scaffold
        .iter()
        .map(|p| DiagnosticPoint {
            x: p.x,
            y: to_decimal_string(&p.error, precision),
        })
        .collect()
}

fn log_error_series(scaffold: &[ErrorPoint]) -> Vec<DiagnosticPoint> {
    scaffold
        .iter()
        .filter_map(|p| {
            p.log_error.map(|le| DiagnosticPoint {
                x: p.x,
                y: format_f64(le),
            })
        })
        .collect()
}

fn slope_series(scaffold: &[ErrorPoint]) -> Vec<DiagnosticPoint> {
    let defined: Vec<(i64, f64)> = scaffold
        .iter()
        .filter_map(|p| p.log_error.map(|le| (p.x, le)))
        .collect();
    defined
        .windows(2)
        .map(|w| DiagnosticPoint {
            x: w[1].0,
            y: format_f64((w[1].1 - w[0].1).abs()),
        })
        .collect()
}

/// delta(n) = -1 - log_error(n) / log10(|q[n]|), optionally with q first
/// reduced by gcd(p[n], q[n]).
fn delta_series(
    seq: &ConvergentSequence,
    scaffold: &[ErrorPoint],
    reduced: bool,
) -> Vec<DiagnosticPoint> {
    let mut out = Vec::new();
    for p in scaffold {
        let Some(le) = p.log_error else { continue };
        let Some(c) = seq.get(p.x) else { continue };
        if c.denominator.is_zero() {
            continue;
        }
        let q_mag = if reduced {
            let g = gcd_rational(&c.numerator, &c.denominator);
            if g.is_zero() {
                continue;
            }
            (&c.denominator / &g).abs()
        } else {
            c.denominator.abs()
        };
        let Some(q_log) = log10_abs(&q_mag) else { continue };
        if q_log.abs() < Q_LOG_EPS {
            // denominator is (effectively) +-1
            continue;
        }
        let v = -1.0 - le / q_log;
        if !v.is_finite() {
            continue;
        }
        out.push(DiagnosticPoint {
            x: p.x,
            y: format_f64(v),
        });
    }
    out
}

/// growth(n) = q[n] / gcd(p[n], q[n]), independent of any limit.
fn growth_series(
    seq: &ConvergentSequence,
    bound: i64,
    precision: Precision,
) -> Vec<DiagnosticPoint> {
    let mut out = Vec::new();
    for c in seq.iter() {
        if c.index < 1 || c.index > bound {
            continue;
        }
        if c.denominator.is_zero() {
            continue;
        }
        let g = gcd_rational(&c.numerator, &c.denominator);
        if g.is_zero() {
            continue;
        }
        let v = &c.denominator / &g;
        let y = if v.is_integer() {
            v.to_integer().to_string()
        } else {
            to_decimal_string(&v, precision)
        };
        out.push(DiagnosticPoint { x: c.index, y });
    }
    out
}

/// Produce one diagnostic series over indices 1..=bound.
///
/// `limit` may be `None` only for [`SeriesKind::Growth`]; every other kind
/// is limit-dependent and reports [`EngineError::MissingLimit`] without it.
pub fn diagnostic_series(
    kind: SeriesKind,
    seq: &ConvergentSequence,
    limit: Option<&BigRational>,
    bound: i64,
    precision: Precision,
) -> Result<Vec<DiagnosticPoint>, EngineError> {
    if bound <= 0 {
        return Err(EngineError::InvalidDepth(bound));
    }
    if kind == SeriesKind::Growth {
        return Ok(growth_series(seq, bound, precision));
    }
    let limit = limit.ok_or(EngineError::MissingLimit)?;
    let scaffold = error_scaffold(seq, limit, bound, precision);
    Ok(match kind {
        SeriesKind::Error => error_series(&scaffold, precision),
        SeriesKind::LogError => log_error_series(&scaffold),
        SeriesKind::Slope => slope_series(&scaffold),
        SeriesKind::Delta => delta_series(seq, &scaffold, false),
        SeriesKind::ReducedDelta => delta_series(seq, &scaffold, true),
        SeriesKind::Growth => unreachable!(),
    })
}

/// Split a series into transport-sized batches.
pub fn chunked(
    points: &[DiagnosticPoint],
    batch_size: usize,
) -> impl Iterator<Item = &[DiagnosticPoint]> {
    points.chunks(batch_size.max(1))
}
