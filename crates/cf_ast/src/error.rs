//! Error types for cf_ast crate.

use thiserror::Error;

/// Errors raised while evaluating a coefficient expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("unknown variable '{0}'")]
    UnknownVariable(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("exponent must be an integer")]
    NonIntegerExponent,
    #[error("exponent does not fit in a machine word")]
    ExponentOverflow,
}
