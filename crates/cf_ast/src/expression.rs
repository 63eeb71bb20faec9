use std::fmt;
use std::rc::Rc;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::error::AstError;

/// A symbolic coefficient expression in at most one free variable.
///
/// Immutable once built; the parser and the engine share subtrees via `Rc`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(BigRational),
    Variable(String),
    Add(Rc<Expr>, Rc<Expr>),
    Sub(Rc<Expr>, Rc<Expr>),
    Mul(Rc<Expr>, Rc<Expr>),
    Div(Rc<Expr>, Rc<Expr>),
    Pow(Rc<Expr>, Rc<Expr>),
    Neg(Rc<Expr>),
}

impl Expr {
    // Helper constructors for cleaner code
    pub fn int(n: i64) -> Rc<Self> {
        Rc::new(Expr::Number(BigRational::from_integer(BigInt::from(n))))
    }

    pub fn rational(n: BigRational) -> Rc<Self> {
        Rc::new(Expr::Number(n))
    }

    pub fn var(name: &str) -> Rc<Self> {
        Rc::new(Expr::Variable(name.to_string()))
    }

    pub fn add(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Add(lhs, rhs))
    }

    pub fn sub(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Sub(lhs, rhs))
    }

    pub fn mul(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Mul(lhs, rhs))
    }

    pub fn div(lhs: Rc<Expr>, rhs: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Div(lhs, rhs))
    }

    pub fn pow(base: Rc<Expr>, exp: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Pow(base, exp))
    }

    pub fn neg(expr: Rc<Expr>) -> Rc<Self> {
        Rc::new(Expr::Neg(expr))
    }
}

impl Expr {
    /// True if the expression mentions `var` anywhere.
    pub fn depends_on(&self, var: &str) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Variable(v) => v == var,
            Expr::Add(l, r)
            | Expr::Sub(l, r)
            | Expr::Mul(l, r)
            | Expr::Div(l, r)
            | Expr::Pow(l, r) => l.depends_on(var) || r.depends_on(var),
            Expr::Neg(e) => e.depends_on(var),
        }
    }

    /// Exact evaluation with `var` bound to `value`.
    ///
    /// Any other variable is an error; so is a zero divisor or a
    /// non-integer exponent.
    pub fn eval(&self, var: &str, value: &BigRational) -> Result<BigRational, AstError> {
        match self {
            Expr::Number(n) => Ok(n.clone()),
            Expr::Variable(v) => {
                if v == var {
                    Ok(value.clone())
                } else {
                    Err(AstError::UnknownVariable(v.clone()))
                }
            }
            Expr::Add(l, r) => Ok(l.eval(var, value)? + r.eval(var, value)?),
            Expr::Sub(l, r) => Ok(l.eval(var, value)? - r.eval(var, value)?),
            Expr::Mul(l, r) => Ok(l.eval(var, value)? * r.eval(var, value)?),
            Expr::Div(l, r) => {
                let denom = r.eval(var, value)?;
                if denom.is_zero() {
                    return Err(AstError::DivisionByZero);
                }
                Ok(l.eval(var, value)? / denom)
            }
            Expr::Pow(b, e) => {
                let base = b.eval(var, value)?;
                let exp = e.eval(var, value)?;
                pow_rational(&base, &exp)
            }
            Expr::Neg(e) => Ok(-e.eval(var, value)?),
        }
    }

    /// Evaluate an expression that contains no variables at all.
    ///
    /// Returns `None` when a variable occurs or evaluation is undefined.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self {
            Expr::Number(n) => Some(n.clone()),
            Expr::Variable(_) => None,
            Expr::Add(l, r) => Some(l.as_constant()? + r.as_constant()?),
            Expr::Sub(l, r) => Some(l.as_constant()? - r.as_constant()?),
            Expr::Mul(l, r) => Some(l.as_constant()? * r.as_constant()?),
            Expr::Div(l, r) => {
                let denom = r.as_constant()?;
                if denom.is_zero() {
                    return None;
                }
                Some(l.as_constant()? / denom)
            }
            Expr::Pow(b, e) => pow_rational(&b.as_constant()?, &e.as_constant()?).ok(),
            Expr::Neg(e) => Some(-e.as_constant()?),
        }
    }
}

/// Exact integer power of a rational, by squaring.
fn pow_rational(base: &BigRational, exp: &BigRational) -> Result<BigRational, AstError> {
    if !exp.is_integer() {
        return Err(AstError::NonIntegerExponent);
    }
    let e = exp
        .to_integer()
        .to_i64()
        .ok_or(AstError::ExponentOverflow)?;
    if e < 0 && base.is_zero() {
        return Err(AstError::DivisionByZero);
    }
    let mut result = BigRational::one();
    let mut b = base.clone();
    let mut n = e.unsigned_abs();
    while n > 0 {
        if n & 1 == 1 {
            result *= &b;
        }
        b = &b * &b;
        n >>= 1;
    }
    if e < 0 {
        result = result.recip();
    }
    Ok(result)
}

impl Expr {
    fn precedence(&self) -> u8 {
        match self {
            Expr::Add(_, _) | Expr::Sub(_, _) => 1,
            Expr::Mul(_, _) | Expr::Div(_, _) => 2,
            Expr::Pow(_, _) => 3,
            Expr::Neg(_) => 4,
            Expr::Number(_) | Expr::Variable(_) => 5,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let my_prec = self.precedence();
        let side = |f: &mut fmt::Formatter<'_>, e: &Expr, needs_parens: bool| {
            if needs_parens {
                write!(f, "({})", e)
            } else {
                write!(f, "{}", e)
            }
        };
        match self {
            Expr::Number(n) => {
                // negative and fractional literals are atoms; parenthesize so
                // the output re-parses under the same grammar
                if n.is_negative() || !n.is_integer() {
                    write!(f, "({})", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Expr::Variable(s) => write!(f, "{}", s),
            Expr::Add(l, r) => {
                side(f, l, l.precedence() < my_prec)?;
                write!(f, " + ")?;
                side(f, r, r.precedence() < my_prec)
            }
            Expr::Sub(l, r) => {
                side(f, l, l.precedence() < my_prec)?;
                write!(f, " - ")?;
                // subtraction is left-associative, RHS at equal precedence needs parens
                side(f, r, r.precedence() <= my_prec)
            }
            Expr::Mul(l, r) => {
                side(f, l, l.precedence() < my_prec)?;
                write!(f, " * ")?;
                side(f, r, r.precedence() < my_prec)
            }
            Expr::Div(l, r) => {
                side(f, l, l.precedence() < my_prec)?;
                write!(f, " / ")?;
                side(f, r, r.precedence() <= my_prec)
            }
            Expr::Pow(b, e) => {
                side(f, b, b.precedence() <= my_prec)?;
                write!(f, "^")?;
                side(f, e, e.precedence() <= my_prec)
            }
            Expr::Neg(e) => {
                write!(f, "-")?;
                side(f, e, e.precedence() < my_prec)
            }
        }
    }
}
