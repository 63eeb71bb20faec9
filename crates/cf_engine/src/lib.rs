//! Computational core for continued-fraction analysis.
//!
//! Evaluates convergents of generalized and simple continued fractions over
//! exact rationals, expands the delta expression as a truncated asymptotic
//! series, classifies probable convergence from the leading term, and derives
//! the diagnostic series the frontend charts.

pub mod analysis;
pub mod classify;
pub mod diagnostics;
pub mod error;
pub mod laurent;
pub mod poly;
pub mod precision;
pub mod recurrence;

pub use analysis::{
    analyze, AnalysisOutcome, AnalysisRequest, LimitSeries, DEFAULT_EXPANSION_TERMS,
};
pub use classify::classify_convergence;
pub use diagnostics::{
    chunked, diagnostic_series, gcd_rational, DiagnosticPoint, SeriesKind, BATCH_SIZE,
};
pub use error::EngineError;
pub use laurent::{expand_delta, LaurentExpansion, Term, LEADING_ORDER_SEARCH_CAP};
pub use precision::{
    almost_eq, log10_abs, to_decimal_string, Precision, DEFAULT_PRECISION, MAX_PRECISION,
};
pub use recurrence::{
    coefficient_fn, evaluate_generalized, evaluate_generalized_with, evaluate_simple,
    evaluate_simple_with, limit_estimate, Convergent, ConvergentSequence, DEBUG_LINES,
};
