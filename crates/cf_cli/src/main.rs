//! Single-shot CLI: runs one analysis request and streams the wire messages
//! as JSON lines, the same shapes the websocket transport sends.

use std::process::ExitCode;

use cf_api_models::{PointJson, ReplyMsg, SeriesName};
use cf_engine::{
    analyze, chunked, to_decimal_string, AnalysisRequest, DiagnosticPoint, Precision, BATCH_SIZE,
    DEFAULT_EXPANSION_TERMS,
};

fn emit(msg: &ReplyMsg) {
    match serde_json::to_string(msg) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("serialization failed: {}", e),
    }
}

fn emit_series(name: SeriesName, points: &[DiagnosticPoint]) {
    for batch in chunked(points, BATCH_SIZE) {
        emit(&ReplyMsg::SeriesChunk {
            series: name,
            points: batch
                .iter()
                .map(|p| PointJson {
                    x: p.x,
                    y: p.y.clone(),
                })
                .collect(),
        });
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let [a, b, symbol, depth, rest @ ..] = args else {
        return Err("usage: cf_cli <a> <b> <symbol> <depth> [precision]".into());
    };
    let depth: i64 = depth
        .parse()
        .map_err(|_| format!("invalid depth '{}'", depth))?;
    let precision = match rest {
        [] => Precision::default(),
        [p] => Precision::new(p.parse().map_err(|_| format!("invalid precision '{}'", p))?),
        _ => return Err("usage: cf_cli <a> <b> <symbol> <depth> [precision]".into()),
    };

    let req = AnalysisRequest {
        a: a.clone(),
        b: b.clone(),
        variable: (!symbol.is_empty()).then(|| symbol.clone()),
        depth,
        precision,
        expansion_terms: DEFAULT_EXPANSION_TERMS,
        external_limit: None,
    };

    let outcome = analyze(&req).map_err(|e| e.to_string())?;

    if let Some(expansion) = &outcome.expansion {
        emit(&ReplyMsg::Expansion {
            text: expansion.to_string(),
        });
    }
    if let Some(is_convergent) = outcome.verdict {
        emit(&ReplyMsg::Convergence { is_convergent });
    }
    if let Some(limit) = &outcome.limit {
        emit(&ReplyMsg::Limit {
            limit: to_decimal_string(limit, precision),
        });
    }
    emit_series(SeriesName::Growth, &outcome.growth);
    if let Some(series) = &outcome.limit_series {
        emit_series(SeriesName::Error, &series.error);
        emit_series(SeriesName::LogError, &series.log_error);
        emit_series(SeriesName::Slope, &series.slope);
        emit_series(SeriesName::Delta, &series.delta);
        emit_series(SeriesName::ReducedDelta, &series.reduced_delta);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            emit(&ReplyMsg::Error {
                message: message.clone(),
            });
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}
