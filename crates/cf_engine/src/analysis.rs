//! One-request orchestration: parse, classify, evaluate, derive series.
//!
//! Mirrors the computation order of the transport layer's request handler
//! without any of its I/O: classification short-circuits a non-convergent
//! fraction before the (much more expensive) recurrence runs.

use num_rational::BigRational;
use tracing::debug;

use crate::classify::classify_convergence;
use crate::diagnostics::{diagnostic_series, DiagnosticPoint, SeriesKind};
use crate::error::EngineError;
use crate::laurent::{expand_delta, LaurentExpansion};
use crate::precision::Precision;
use crate::recurrence::{evaluate_generalized, limit_estimate, ConvergentSequence};

/// Default number of explicit expansion terms.
pub const DEFAULT_EXPANSION_TERMS: usize = 2;

/// One analysis request. Coefficients arrive as user-entered strings; the
/// variable is `None` when the continued fraction is constant-coefficient.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub a: String,
    pub b: String,
    pub variable: Option<String>,
    pub depth: i64,
    pub precision: Precision,
    pub expansion_terms: usize,
    /// Limit identified by an external service, when available; otherwise
    /// the recurrence tail stands in.
    pub external_limit: Option<BigRational>,
}

/// The limit-dependent series, present only when a limit was available.
#[derive(Debug, Clone, Default)]
pub struct LimitSeries {
    pub error: Vec<DiagnosticPoint>,
    pub log_error: Vec<DiagnosticPoint>,
    pub slope: Vec<DiagnosticPoint>,
    pub delta: Vec<DiagnosticPoint>,
    pub reduced_delta: Vec<DiagnosticPoint>,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// `None` when there is no free variable to expand in.
    pub verdict: Option<bool>,
    pub expansion: Option<LaurentExpansion>,
    pub limit: Option<BigRational>,
    pub convergents: ConvergentSequence,
    pub growth: Vec<DiagnosticPoint>,
    /// `None` when no limit was available (the series are unavailable, not
    /// empty).
    pub limit_series: Option<LimitSeries>,
}

/// Run one full analysis request.
pub fn analyze(req: &AnalysisRequest) -> Result<AnalysisOutcome, EngineError> {
    if req.depth <= 0 {
        return Err(EngineError::InvalidDepth(req.depth));
    }
    let a = cf_parser::parse(&cf_parser::normalize(&req.a))?;
    let b = cf_parser::parse(&cf_parser::normalize(&req.b))?;

    let (verdict, expansion) = match req.variable.as_deref() {
        Some(var) => {
            let exp = expand_delta(&a, &b, Some(var), req.expansion_terms)?;
            debug!(expansion = %exp, "delta expansion");
            let v = classify_convergence(&exp);
            (Some(v), Some(exp))
        }
        None => (None, None),
    };

    if verdict == Some(false) {
        debug!("expansion classifies as non-convergent, skipping recurrence");
        return Ok(AnalysisOutcome {
            verdict,
            expansion,
            limit: None,
            convergents: ConvergentSequence::default(),
            growth: vec![],
            limit_series: None,
        });
    }

    // constants evaluate under any variable name
    let var = req.variable.as_deref().unwrap_or("n");
    let convergents = evaluate_generalized(&a, &b, var, req.depth, req.precision)?;
    let limit = match &req.external_limit {
        Some(l) => Some(l.clone()),
        None => limit_estimate(&a, &b, var, req.depth, req.precision)?,
    };

    let growth = diagnostic_series(SeriesKind::Growth, &convergents, None, req.depth, req.precision)?;
    let limit_series = match &limit {
        Some(l) => {
            let series = |kind| {
                diagnostic_series(kind, &convergents, Some(l), req.depth, req.precision)
            };
            Some(LimitSeries {
                error: series(SeriesKind::Error)?,
                log_error: series(SeriesKind::LogError)?,
                slope: series(SeriesKind::Slope)?,
                delta: series(SeriesKind::Delta)?,
                reduced_delta: series(SeriesKind::ReducedDelta)?,
            })
        }
        None => None,
    };

    Ok(AnalysisOutcome {
        verdict,
        expansion,
        limit,
        convergents,
        growth,
        limit_series,
    })
}
