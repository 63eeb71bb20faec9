//! Dense univariate polynomials and rational functions over exact rationals.
//!
//! Just enough algebra for the delta expression: the coefficient expressions
//! are single-variable polynomials or quotients of them, so the asymptotic
//! engine works on `P(x)/Q(x)` pairs with exact `BigRational` coefficients.

use cf_ast::Expr;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use crate::error::EngineError;

/// Dense polynomial, ascending powers, no trailing zero coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct Poly {
    coeffs: Vec<BigRational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly { coeffs: vec![] }
    }

    pub fn constant(c: BigRational) -> Self {
        Poly { coeffs: vec![c] }.normalized()
    }

    pub fn x() -> Self {
        Poly {
            coeffs: vec![BigRational::zero(), BigRational::one()],
        }
    }

    fn normalized(mut self) -> Self {
        while self.coeffs.last().map_or(false, |c| c.is_zero()) {
            self.coeffs.pop();
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> Option<usize> {
        if self.is_zero() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn leading(&self) -> Option<&BigRational> {
        self.coeffs.last()
    }

    pub fn add(&self, other: &Poly) -> Poly {
        let n = self.coeffs.len().max(other.coeffs.len());
        let mut coeffs = Vec::with_capacity(n);
        for i in 0..n {
            let a = self.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero);
            let b = other.coeffs.get(i).cloned().unwrap_or_else(BigRational::zero);
            coeffs.push(a + b);
        }
        Poly { coeffs }.normalized()
    }

    pub fn sub(&self, other: &Poly) -> Poly {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> Poly {
        Poly {
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }

    pub fn mul(&self, other: &Poly) -> Poly {
        if self.is_zero() || other.is_zero() {
            return Poly::zero();
        }
        let mut coeffs = vec![BigRational::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Poly { coeffs }.normalized()
    }

    /// Multiply by `c * x^k`.
    pub fn mul_monomial(&self, c: &BigRational, k: usize) -> Poly {
        if self.is_zero() || c.is_zero() {
            return Poly::zero();
        }
        let mut coeffs = vec![BigRational::zero(); k];
        coeffs.extend(self.coeffs.iter().map(|a| a * c));
        Poly { coeffs }.normalized()
    }

    pub fn pow(&self, k: u32) -> Poly {
        let mut acc = Poly::constant(BigRational::one());
        for _ in 0..k {
            acc = acc.mul(self);
        }
        acc
    }

    /// Substitute `x - 1` for `x` (Horner fold from the top coefficient).
    pub fn shift_down(&self) -> Poly {
        let shift = Poly {
            coeffs: vec![-BigRational::one(), BigRational::one()],
        };
        let mut acc = Poly::zero();
        for c in self.coeffs.iter().rev() {
            acc = acc.mul(&shift).add(&Poly::constant(c.clone()));
        }
        acc
    }

    /// Number of leading zero coefficients, i.e. the largest j with x^j | self.
    fn low_zero_count(&self) -> usize {
        self.coeffs.iter().take_while(|c| c.is_zero()).count()
    }

    fn shr_powers(&self, j: usize) -> Poly {
        Poly {
            coeffs: self.coeffs[j.min(self.coeffs.len())..].to_vec(),
        }
    }
}

/// Quotient of two polynomials; the denominator is never the zero polynomial.
#[derive(Debug, Clone, PartialEq)]
pub struct RatFn {
    num: Poly,
    den: Poly,
}

impl RatFn {
    pub fn new(num: Poly, den: Poly) -> Result<Self, EngineError> {
        if den.is_zero() {
            return Err(EngineError::NonRational("division by zero".into()));
        }
        let mut f = RatFn { num, den };
        f.cancel_powers();
        Ok(f)
    }

    pub fn from_poly(p: Poly) -> Self {
        RatFn {
            num: p,
            den: Poly::constant(BigRational::one()),
        }
    }

    pub fn one() -> Self {
        RatFn::from_poly(Poly::constant(BigRational::one()))
    }

    /// `c * x^k`, with negative k becoming a denominator power.
    pub fn monomial(c: BigRational, k: i64) -> Self {
        if k >= 0 {
            RatFn::from_poly(Poly::constant(c).mul_monomial(&BigRational::one(), k as usize))
        } else {
            RatFn {
                num: Poly::constant(c),
                den: Poly::x().pow((-k) as u32),
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        self.num.is_zero()
    }

    /// Degree of growth toward infinity: deg(num) - deg(den).
    pub fn degree_offset(&self) -> Option<i64> {
        Some(self.num.degree()? as i64 - self.den.degree().unwrap_or(0) as i64)
    }

    /// Ratio of leading coefficients (the limit of `self / x^degree_offset`).
    pub fn leading_ratio(&self) -> Option<BigRational> {
        Some(self.num.leading()? / self.den.leading()?)
    }

    pub fn add(&self, other: &RatFn) -> RatFn {
        let num = self
            .num
            .mul(&other.den)
            .add(&other.num.mul(&self.den));
        let mut f = RatFn {
            num,
            den: self.den.mul(&other.den),
        };
        f.cancel_powers();
        f
    }

    pub fn sub(&self, other: &RatFn) -> RatFn {
        self.add(&other.neg())
    }

    pub fn neg(&self) -> RatFn {
        RatFn {
            num: self.num.neg(),
            den: self.den.clone(),
        }
    }

    pub fn mul(&self, other: &RatFn) -> RatFn {
        let mut f = RatFn {
            num: self.num.mul(&other.num),
            den: self.den.mul(&other.den),
        };
        f.cancel_powers();
        f
    }

    pub fn div(&self, other: &RatFn) -> Result<RatFn, EngineError> {
        if other.is_zero() {
            return Err(EngineError::NonRational("division by zero".into()));
        }
        let mut f = RatFn {
            num: self.num.mul(&other.den),
            den: self.den.mul(&other.num),
        };
        f.cancel_powers();
        Ok(f)
    }

    /// Substitute `x - 1` for `x` in both numerator and denominator.
    pub fn shift_down(&self) -> RatFn {
        RatFn {
            num: self.num.shift_down(),
            den: self.den.shift_down(),
        }
    }

    /// Cancel common powers of x between numerator and denominator to keep
    /// degrees small across repeated term subtraction.
    fn cancel_powers(&mut self) {
        if self.num.is_zero() {
            self.den = Poly::constant(BigRational::one());
            return;
        }
        let j = self.num.low_zero_count().min(self.den.low_zero_count());
        if j > 0 {
            self.num = self.num.shr_powers(j);
            self.den = self.den.shr_powers(j);
        }
    }

    /// Lower a parsed coefficient expression to a rational function of `var`.
    ///
    /// Anything beyond field operations and constant integer exponents is
    /// rejected as non-rational.
    pub fn from_expr(expr: &Expr, var: &str) -> Result<RatFn, EngineError> {
        match expr {
            Expr::Number(n) => Ok(RatFn::from_poly(Poly::constant(n.clone()))),
            Expr::Variable(v) => {
                if v == var {
                    Ok(RatFn::from_poly(Poly::x()))
                } else {
                    Err(EngineError::NonRational(format!(
                        "unexpected variable '{}'",
                        v
                    )))
                }
            }
            Expr::Add(l, r) => Ok(RatFn::from_expr(l, var)?.add(&RatFn::from_expr(r, var)?)),
            Expr::Sub(l, r) => Ok(RatFn::from_expr(l, var)?.sub(&RatFn::from_expr(r, var)?)),
            Expr::Mul(l, r) => Ok(RatFn::from_expr(l, var)?.mul(&RatFn::from_expr(r, var)?)),
            Expr::Div(l, r) => RatFn::from_expr(l, var)?.div(&RatFn::from_expr(r, var)?),
            Expr::Neg(e) => Ok(RatFn::from_expr(e, var)?.neg()),
            Expr::Pow(b, e) => {
                let exp = e
                    .as_constant()
                    .filter(|c| c.is_integer())
                    .and_then(|c| c.to_integer().to_i64())
                    .ok_or_else(|| {
                        EngineError::NonRational("exponent must be a constant integer".into())
                    })?;
                let base = RatFn::from_expr(b, var)?;
                let k = exp.unsigned_abs() as u32;
                let powered = RatFn {
                    num: base.num.pow(k),
                    den: base.den.pow(k),
                };
                if exp < 0 {
                    RatFn::one().div(&powered)
                } else {
                    Ok(powered)
                }
            }
        }
    }
}
