//! Working precision: significant decimal digits scoped to one request.
//!
//! Arithmetic in this engine is exact rational end-to-end; precision governs
//! only how values are rendered as decimal text and how close two values
//! must be to count as indistinguishable. It is an explicit value passed
//! through every call, never ambient process state.

use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

pub const DEFAULT_PRECISION: u32 = 30;
pub const MAX_PRECISION: u32 = 100;

/// Number of significant decimal digits for one request.
///
/// Out-of-range values fall back to the default rather than erroring, the
/// same forgiving behavior the web form relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision(u32);

impl Precision {
    pub fn new(digits: u32) -> Self {
        if (1..=MAX_PRECISION).contains(&digits) {
            Self(digits)
        } else {
            Self(DEFAULT_PRECISION)
        }
    }

    pub fn digits(self) -> u32 {
        self.0
    }

    /// One unit in the last significant digit.
    fn epsilon(self) -> BigRational {
        BigRational::new(BigInt::one(), BigInt::from(10u32).pow(self.0 - 1))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(DEFAULT_PRECISION)
    }
}

/// True when `a` and `b` agree to the working precision (relative for
/// values above one, absolute below).
pub fn almost_eq(a: &BigRational, b: &BigRational, precision: Precision) -> bool {
    let diff = (a - b).abs();
    let eps = precision.epsilon();
    let scale = std::cmp::max(a.abs(), b.abs());
    if scale > BigRational::one() {
        diff <= eps * scale
    } else {
        diff <= eps
    }
}

fn log10_biguint(n: &BigUint) -> f64 {
    let bits = n.bits();
    if bits <= 64 {
        return n.to_f64().unwrap_or(0.0).log10();
    }
    // take the top 64 bits as a float mantissa, account for the shift
    let shift = bits - 64;
    let top: BigUint = n >> (shift as usize);
    top.to_f64().unwrap_or(f64::MAX).log10() + shift as f64 * std::f64::consts::LOG10_2
}

/// `log10(|x|)` as a finite float, or `None` when x is zero.
pub fn log10_abs(x: &BigRational) -> Option<f64> {
    if x.is_zero() {
        return None;
    }
    let v = log10_biguint(x.numer().magnitude()) - log10_biguint(x.denom().magnitude());
    v.is_finite().then_some(v)
}

fn pow10(e: i64) -> BigRational {
    let p = BigInt::from(10u32).pow(e.unsigned_abs() as u32);
    if e >= 0 {
        BigRational::from_integer(p)
    } else {
        BigRational::new(BigInt::one(), p)
    }
}

/// Render a rational as decimal text with the working number of significant
/// digits: positional for moderate magnitudes, scientific otherwise.
pub fn to_decimal_string(x: &BigRational, precision: Precision) -> String {
    if x.is_zero() {
        return "0".to_string();
    }
    let digits = precision.digits() as i64;
    let neg = x.is_negative();
    let abs = x.abs();

    // decimal exponent: largest e with 10^e <= |x|; the float estimate can
    // be off by one near powers of ten, so correct it exactly
    let mut e = log10_abs(&abs).unwrap_or(0.0).floor() as i64;
    while pow10(e + 1) <= abs {
        e += 1;
    }
    while pow10(e) > abs {
        e -= 1;
    }

    // round to `digits` significant digits
    let scaled = &abs * pow10(digits - 1 - e);
    let mut mantissa = scaled.round().to_integer().to_string();
    if mantissa.len() as i64 > digits {
        // rounding carried into an extra digit (e.g. 999.. -> 1000..)
        e += 1;
        mantissa.truncate(digits as usize);
    }

    let body = if (0..digits).contains(&e) {
        let point = (e + 1) as usize;
        let (ip, fp) = mantissa.split_at(point);
        let fp = fp.trim_end_matches('0');
        if fp.is_empty() {
            ip.to_string()
        } else {
            format!("{}.{}", ip, fp)
        }
    } else if (-4..0).contains(&e) {
        let frac = format!("{}{}", "0".repeat((-e - 1) as usize), mantissa);
        format!("0.{}", frac.trim_end_matches('0'))
    } else {
        let (first, rest) = mantissa.split_at(1);
        let rest = rest.trim_end_matches('0');
        if rest.is_empty() {
            format!("{}e{}", first, e)
        } else {
            format!("{}.{}e{}", first, rest, e)
        }
    };
    if neg {
        format!("-{}", body)
    } else {
        body
    }
}
