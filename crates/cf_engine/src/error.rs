//! Engine error taxonomy.
//!
//! Fatal conditions abort the whole request; per-index degeneracies (zero
//! denominators, non-finite derived values) are handled in-band by the
//! recurrence and the series generators and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("malformed coefficient expression: {0}")]
    Parse(#[from] cf_parser::ParseError),
    #[error("coefficient evaluation failed: {0}")]
    Eval(#[from] cf_ast::AstError),
    #[error("iteration depth must be positive, got {0}")]
    InvalidDepth(i64),
    #[error("coefficient is not a polynomial or rational function: {0}")]
    NonRational(String),
    #[error("leading-order search exceeded {0} powers; coefficient growth is pathological")]
    AsymptoticSearchDiverged(i64),
    #[error("no limit available for a limit-dependent series")]
    MissingLimit,
}
