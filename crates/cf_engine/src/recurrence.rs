//! Three-term recurrence evaluation of continued-fraction convergents.
//!
//! Generalized form, for n >= 1 with bootstrap p[-1]=1, q[-1]=0, p[0]=a(0),
//! q[0]=1:
//!
//! ```text
//! p[n] = a[n]*p[n-1] + b[n]*p[n-2]
//! q[n] = a[n]*q[n-1] + b[n]*q[n-2]
//! ```
//!
//! Simple form (b == 1) uses bootstrap p[-2]=0, p[-1]=1, q[-2]=1, q[-1]=0
//! and steps from n = 0. Both expose convergents at logical indices
//! 0..depth-1 and keep only the last two terms as working state.

use cf_ast::Expr;
use num_rational::BigRational;
use num_traits::{One, Zero};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::precision::{to_decimal_string, Precision};

/// Indices below this bound get per-step trace output.
pub const DEBUG_LINES: i64 = 20;

/// One convergent: numerator, denominator and their ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Convergent {
    pub index: i64,
    pub numerator: BigRational,
    pub denominator: BigRational,
    /// `None` when the denominator at this index is exactly zero. Such
    /// points are isolated; later convergents can recover.
    pub ratio: Option<BigRational>,
}

/// The convergent sequence in recurrence order, read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvergentSequence {
    terms: Vec<Convergent>,
}

impl ConvergentSequence {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Convergent> {
        self.terms.iter()
    }

    /// Convergent at logical index n (n is also the position).
    pub fn get(&self, index: i64) -> Option<&Convergent> {
        self.terms.get(usize::try_from(index).ok()?)
    }

    /// Tail ratio: the practical stand-in for the limit when no external
    /// limit is supplied.
    pub fn last_defined_ratio(&self) -> Option<&BigRational> {
        self.terms.iter().rev().find_map(|c| c.ratio.as_ref())
    }

    fn push(&mut self, index: i64, numerator: BigRational, denominator: BigRational, precision: Precision) {
        let ratio = if denominator.is_zero() {
            warn!(n = index, "denominator is zero, ratio undefined at this index");
            None
        } else {
            let r = &numerator / &denominator;
            if index <= DEBUG_LINES {
                debug!(n = index, ratio = %to_decimal_string(&r, precision), "convergent");
            }
            Some(r)
        };
        self.terms.push(Convergent {
            index,
            numerator,
            denominator,
            ratio,
        });
    }
}

/// Build a coefficient callable: exact evaluation of `expr` at an integer
/// index. A failure at any index is fatal for the whole request.
pub fn coefficient_fn<'a>(
    expr: &'a Expr,
    var: &'a str,
) -> impl Fn(i64) -> Result<BigRational, EngineError> + 'a {
    move |n| {
        expr.eval(var, &BigRational::from_integer(n.into()))
            .map_err(EngineError::from)
    }
}

/// Generalized recurrence from coefficient callables, to `depth` terms.
pub fn evaluate_generalized_with<A, B>(
    a: A,
    b: B,
    depth: i64,
    precision: Precision,
) -> Result<ConvergentSequence, EngineError>
where
    A: Fn(i64) -> Result<BigRational, EngineError>,
    B: Fn(i64) -> Result<BigRational, EngineError>,
{
    if depth <= 0 {
        return Err(EngineError::InvalidDepth(depth));
    }
    let mut seq = ConvergentSequence::default();
    let mut p_prev = BigRational::one(); // p[-1]
    let mut q_prev = BigRational::zero(); // q[-1]
    let mut p = a(0)?; // p[0]
    let mut q = BigRational::one(); // q[0]
    seq.push(0, p.clone(), q.clone(), precision);
    for n in 1..depth {
        let an = a(n)?;
        let bn = b(n)?;
        if n <= DEBUG_LINES {
            debug!(
                n,
                a = %to_decimal_string(&an, precision),
                b = %to_decimal_string(&bn, precision),
                "coefficients"
            );
        }
        let p_next = &an * &p + &bn * &p_prev;
        let q_next = &an * &q + &bn * &q_prev;
        p_prev = std::mem::replace(&mut p, p_next);
        q_prev = std::mem::replace(&mut q, q_next);
        seq.push(n, p.clone(), q.clone(), precision);
    }
    Ok(seq)
}

/// Simple recurrence (b == 1) from a coefficient callable.
pub fn evaluate_simple_with<A>(
    a: A,
    depth: i64,
    precision: Precision,
) -> Result<ConvergentSequence, EngineError>
where
    A: Fn(i64) -> Result<BigRational, EngineError>,
{
    if depth <= 0 {
        return Err(EngineError::InvalidDepth(depth));
    }
    let mut seq = ConvergentSequence::default();
    let mut p_prev2 = BigRational::zero(); // p[-2]
    let mut p_prev = BigRational::one(); // p[-1]
    let mut q_prev2 = BigRational::one(); // q[-2]
    let mut q_prev = BigRational::zero(); // q[-1]
    for n in 0..depth {
        let an = a(n)?;
        if n <= DEBUG_LINES {
            debug!(n, a = %to_decimal_string(&an, precision), "coefficient");
        }
        let p = &an * &p_prev + &p_prev2;
        let q = &an * &q_prev + &q_prev2;
        p_prev2 = std::mem::replace(&mut p_prev, p.clone());
        q_prev2 = std::mem::replace(&mut q_prev, q.clone());
        seq.push(n, p, q, precision);
    }
    Ok(seq)
}

/// Generalized recurrence from symbolic coefficients.
pub fn evaluate_generalized(
    a: &Expr,
    b: &Expr,
    var: &str,
    depth: i64,
    precision: Precision,
) -> Result<ConvergentSequence, EngineError> {
    evaluate_generalized_with(coefficient_fn(a, var), coefficient_fn(b, var), depth, precision)
}

/// Simple recurrence from a symbolic coefficient.
pub fn evaluate_simple(
    a: &Expr,
    var: &str,
    depth: i64,
    precision: Precision,
) -> Result<ConvergentSequence, EngineError> {
    evaluate_simple_with(coefficient_fn(a, var), depth, precision)
}

/// Estimate the limit by evaluating to twice the requested depth and taking
/// the tail convergent; `None` when every denominator past the bootstrap
/// happens to vanish.
pub fn limit_estimate(
    a: &Expr,
    b: &Expr,
    var: &str,
    depth: i64,
    precision: Precision,
) -> Result<Option<BigRational>, EngineError> {
    if depth <= 0 {
        return Err(EngineError::InvalidDepth(depth));
    }
    let seq = evaluate_generalized(a, b, var, depth.saturating_mul(2), precision)?;
    Ok(seq.last_defined_ratio().cloned())
}
