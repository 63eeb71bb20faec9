//! Wire models for serializable analysis output.
//!
//! Transport models stay independent from engine internals: the transport
//! layer maps engine values into these DTOs and streams them to the client
//! in fixed-size batches. All consumers share this one schema.

use serde::{Deserialize, Serialize};

/// Current schema version for the wire format.
pub const SCHEMA_VERSION: u32 = 1;

/// User form input as posted by the frontend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AnalysisInput {
    /// Partial numerator expression.
    pub a: String,
    /// Partial denominator expression.
    pub b: String,
    /// Free variable name; empty for constant coefficients.
    pub symbol: String,
    /// Iteration depth.
    pub i: i64,
    /// Working precision in significant digits, when the form supplies one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

/// Which diagnostic series a chunk belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesName {
    Error,
    LogError,
    Slope,
    Delta,
    ReducedDelta,
    Growth,
}

/// One chartable coordinate pair; `y` carries decimal text so arbitrary
/// magnitudes survive JSON intact.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PointJson {
    pub x: i64,
    pub y: String,
}

/// One streamed message, in emission order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ReplyMsg {
    /// Probable-convergence verdict from the asymptotic classifier.
    Convergence { is_convergent: bool },
    /// Canonical text of the delta expansion.
    Expansion { text: String },
    /// Resolved limit as decimal text, or absent upstream.
    Limit { limit: String },
    /// One fixed-size batch of a diagnostic series.
    SeriesChunk {
        series: SeriesName,
        points: Vec<PointJson>,
    },
    /// Fatal failure; the request produced no partial results.
    Error { message: String },
}

/// Envelope for consumers that want a single document instead of a stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reply {
    pub schema_version: u32,
    pub messages: Vec<ReplyMsg>,
}

impl Reply {
    pub fn new(messages: Vec<ReplyMsg>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            messages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_kinds_serialize_snake_case() {
        let msg = ReplyMsg::Convergence {
            is_convergent: true,
        };
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"kind":"convergence","is_convergent":true}"#
        );
        let chunk = ReplyMsg::SeriesChunk {
            series: SeriesName::ReducedDelta,
            points: vec![PointJson {
                x: 1,
                y: "0.5".into(),
            }],
        };
        let text = serde_json::to_string(&chunk).unwrap();
        assert!(text.contains(r#""series":"reduced_delta""#));
    }

    #[test]
    fn input_roundtrips() {
        let input = AnalysisInput {
            a: "(1 + 2 n) (5 + 17 n (1 + n))".into(),
            b: "-n^6".into(),
            symbol: "n".into(),
            i: 100,
            precision: None,
        };
        let text = serde_json::to_string(&input).unwrap();
        assert!(!text.contains("precision"));
        let back: AnalysisInput = serde_json::from_str(&text).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn reply_envelope_carries_schema_version() {
        let reply = Reply::new(vec![ReplyMsg::Limit {
            limit: "4.99128".into(),
        }]);
        let text = serde_json::to_string(&reply).unwrap();
        assert!(text.contains(r#""schema_version":1"#));
        let back: Reply = serde_json::from_str(&text).unwrap();
        assert_eq!(back, reply);
    }
}
