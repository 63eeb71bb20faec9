//! Convergence verdict from the leading expansion term.
//!
//! The decision rule comes from continued-fraction growth analysis and is
//! carried over unchanged as an opaque heuristic: it classifies *probable*
//! convergence, it is not a proof of convergence.

use num_traits::Signed;

use crate::laurent::LaurentExpansion;

/// Probable-convergence verdict from the leading term of the expansion.
///
/// True when the leading power is at most -1, or at most 2 with a positive
/// coefficient. An empty expansion (delta identically zero) has neither a
/// negative leading power nor a positive coefficient and classifies false.
pub fn classify_convergence(expansion: &LaurentExpansion) -> bool {
    match expansion.leading() {
        Some(term) => term.power <= -1 || (term.power <= 2 && term.coeff.is_positive()),
        None => false,
    }
}
