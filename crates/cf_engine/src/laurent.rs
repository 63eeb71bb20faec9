//! Asymptotic (Laurent-type) expansion of the delta expression.
//!
//! The delta expression `1 + 4b/(a * a(x-1))` characterizes the growth of a
//! continued fraction's convergents; its truncated expansion in descending
//! powers of the free variable feeds the convergence classifier.

use std::fmt;

use cf_ast::Expr;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::error::EngineError;
use crate::poly::{Poly, RatFn};

/// Bound on the leading-order search; coefficients whose delta grows faster
/// than x^64 are treated as pathological.
pub const LEADING_ORDER_SEARCH_CAP: i64 = 64;

/// One additive term `coeff * x^power`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub coeff: BigRational,
    pub power: i64,
}

/// Truncated expansion in descending powers, plus a little-o remainder bound.
///
/// `remainder` is `None` exactly when the expansion is finite (the delta
/// expression was exhausted); otherwise it holds the power of the last
/// included term, so the tail is `o(x^remainder)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LaurentExpansion {
    pub terms: Vec<Term>,
    pub remainder: Option<i64>,
    variable: Option<String>,
}

impl LaurentExpansion {
    pub fn is_exact(&self) -> bool {
        self.remainder.is_none()
    }

    /// The first additive term, in descending-power order.
    pub fn leading(&self) -> Option<&Term> {
        self.terms.first()
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }
}

/// Expand the delta expression of coefficients `a`, `b` to at most
/// `term_count` non-zero terms.
///
/// With a free variable the delta is `1 + 4b/(a * a(x-1))`; without one it
/// is the exact constant `1 + 4b/a^2` and no expansion is performed. The
/// search for the leading order increments the candidate power from zero
/// and fails after [`LEADING_ORDER_SEARCH_CAP`] steps.
pub fn expand_delta(
    a: &Expr,
    b: &Expr,
    variable: Option<&str>,
    term_count: usize,
) -> Result<LaurentExpansion, EngineError> {
    let Some(var) = variable else {
        return expand_constant(a, b);
    };

    let af = RatFn::from_expr(a, var)?;
    let bf = RatFn::from_expr(b, var)?;
    if af.is_zero() {
        return Err(EngineError::NonRational(
            "partial denominator `a` is identically zero".into(),
        ));
    }
    let shifted = af.shift_down();
    let four = RatFn::from_poly(Poly::constant(BigRational::from_integer(4.into())));
    let mut delta = RatFn::one().add(&four.mul(&bf).div(&af.mul(&shifted))?);

    if delta.is_zero() {
        return Ok(LaurentExpansion {
            terms: vec![],
            remainder: None,
            variable: Some(var.to_string()),
        });
    }

    // leading order: smallest k (from 0 upward) with lim delta/x^k finite
    let mut k: i64 = 0;
    loop {
        let finite = match delta.degree_offset() {
            None => true,
            Some(d) => d <= k,
        };
        if finite {
            break;
        }
        k += 1;
        if k > LEADING_ORDER_SEARCH_CAP {
            return Err(EngineError::AsymptoticSearchDiverged(
                LEADING_ORDER_SEARCH_CAP,
            ));
        }
    }
    let leading_power = k;

    let mut terms = Vec::new();
    while terms.len() < term_count {
        if let Some(c) = coefficient_at(&delta, k) {
            delta = delta.sub(&RatFn::monomial(c.clone(), k));
            terms.push(Term { coeff: c, power: k });
            if delta.is_zero() {
                return Ok(LaurentExpansion {
                    terms,
                    remainder: None,
                    variable: Some(var.to_string()),
                });
            }
        }
        k -= 1;
    }

    let remainder = Some(terms.last().map_or(leading_power, |t| t.power));
    Ok(LaurentExpansion {
        terms,
        remainder,
        variable: Some(var.to_string()),
    })
}

/// No free variable: the delta expression is an exact rational constant.
fn expand_constant(a: &Expr, b: &Expr) -> Result<LaurentExpansion, EngineError> {
    let a0 = a
        .as_constant()
        .ok_or_else(|| EngineError::NonRational("expected a constant coefficient".into()))?;
    let b0 = b
        .as_constant()
        .ok_or_else(|| EngineError::NonRational("expected a constant coefficient".into()))?;
    if a0.is_zero() {
        return Err(EngineError::NonRational(
            "partial denominator `a` is zero".into(),
        ));
    }
    let c = BigRational::one() + BigRational::from_integer(4.into()) * b0 / (&a0 * &a0);
    let terms = if c.is_zero() {
        vec![]
    } else {
        vec![Term { coeff: c, power: 0 }]
    };
    Ok(LaurentExpansion {
        terms,
        remainder: None,
        variable: None,
    })
}

/// The limit of `f / x^k` toward infinity: the leading-coefficient ratio
/// when the growth degree equals k, zero (reported as `None`) when smaller.
fn coefficient_at(f: &RatFn, k: i64) -> Option<BigRational> {
    match f.degree_offset() {
        Some(d) if d == k => f.leading_ratio(),
        _ => None,
    }
}

fn var_pow(var: &str, m: i64) -> String {
    if m == 1 {
        var.to_string()
    } else {
        format!("{}^{}", var, m)
    }
}

fn magnitude_text(c: &BigRational, power: i64, var: &str) -> String {
    if power == 0 {
        return c.to_string();
    }
    if power > 0 {
        let vp = var_pow(var, power);
        if c.is_one() {
            vp
        } else if c.is_integer() {
            format!("{}*{}", c, vp)
        } else {
            format!("{}*{}/{}", c.numer(), vp, c.denom())
        }
    } else {
        let vp = var_pow(var, -power);
        if c.denom().is_one() {
            format!("{}/{}", c.numer(), vp)
        } else {
            format!("{}/({}*{})", c.numer(), c.denom(), vp)
        }
    }
}

fn order_text(power: i64, var: &str) -> String {
    match power {
        0 => "o(1)".to_string(),
        p if p > 0 => format!("o({})", var_pow(var, p)),
        p => format!("o(1/{})", var_pow(var, -p)),
    }
}

impl fmt::Display for LaurentExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() && self.remainder.is_none() {
            return write!(f, "0");
        }
        let var = self.variable.as_deref().unwrap_or("n");
        let mut first = true;
        for t in &self.terms {
            let mag = magnitude_text(&t.coeff.abs(), t.power, var);
            if first {
                if t.coeff.is_negative() {
                    write!(f, "-{}", mag)?;
                } else {
                    write!(f, "{}", mag)?;
                }
                first = false;
            } else if t.coeff.is_negative() {
                write!(f, " - {}", mag)?;
            } else {
                write!(f, " + {}", mag)?;
            }
        }
        if let Some(r) = self.remainder {
            if first {
                write!(f, "{}", order_text(r, var))?;
            } else {
                write!(f, " + {}", order_text(r, var))?;
            }
        }
        Ok(())
    }
}
