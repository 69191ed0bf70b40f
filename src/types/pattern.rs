//! DetectedPattern — a structural or statistical failure signature observed
//! over the current window.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    IssuerDegradation,
    RetryStorm,
    MethodFatigue,
    LatencySpike,
    SystemicFailure,
    LocalizedFailure,
}

/// A single piece of supporting evidence for a pattern or hypothesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evidence {
    pub kind: String,
    pub description: String,
    pub value: f64,
    pub source: String,
    pub timestamp: i64,
}

/// A structural pattern detected over the current observation window.
///
/// `severity` is "detection strength," not necessarily a raw Z-score — see
/// the affected `Evidence` entries for the underlying statistic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub kind: PatternKind,
    pub affected_dimension: String,
    pub severity: f64,
    pub evidence: Vec<Evidence>,
    pub detected_at: i64,
}

/// Split a dimension string into `(kind, value)`, tolerating both `:` and
/// `=` delimiters on input, and always producing canonical `"<kind>:<value>"`
/// on output via `Display`.
pub fn parse_dimension(s: &str) -> (String, String) {
    if let Some((k, v)) = s.split_once(':') {
        return (k.to_string(), v.to_string());
    }
    if let Some((k, v)) = s.split_once('=') {
        return (k.to_string(), v.to_string());
    }
    (s.to_string(), String::new())
}

pub fn canonical_dimension(kind: &str, value: &str) -> String {
    format!("{kind}:{value}")
}
