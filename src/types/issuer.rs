//! IssuerState — per-issuer drift parameters, owned exclusively by the Drift Engine.

use serde::{Deserialize, Serialize};

/// Clamp range for `IssuerState::success_rate`.
pub const SUCCESS_RATE_RANGE: (f64, f64) = (0.0, 1.0);
/// Clamp range for `IssuerState::latency_ms`, in milliseconds.
pub const LATENCY_RANGE_MS: (f64, f64) = (50.0, 2000.0);
/// Clamp range for `IssuerState::retry_probability`.
pub const RETRY_PROBABILITY_RANGE: (f64, f64) = (0.0, 0.5);

/// Mutable per-issuer simulation state. Only the Drift Engine writes this;
/// every other component is a read-only observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerState {
    pub issuer: String,
    pub success_rate: f64,
    pub latency_ms: f64,
    pub retry_probability: f64,
    pub last_updated: i64,
}

impl IssuerState {
    pub fn new(issuer: impl Into<String>, success_rate: f64, latency_ms: f64, retry_probability: f64, now: i64) -> Self {
        Self {
            issuer: issuer.into(),
            success_rate: success_rate.clamp(SUCCESS_RATE_RANGE.0, SUCCESS_RATE_RANGE.1),
            latency_ms: latency_ms.clamp(LATENCY_RANGE_MS.0, LATENCY_RANGE_MS.1),
            retry_probability: retry_probability.clamp(RETRY_PROBABILITY_RANGE.0, RETRY_PROBABILITY_RANGE.1),
            last_updated: now,
        }
    }

    /// True iff all three parameters are within their documented clamp ranges.
    pub fn within_ranges(&self) -> bool {
        (SUCCESS_RATE_RANGE.0..=SUCCESS_RATE_RANGE.1).contains(&self.success_rate)
            && (LATENCY_RANGE_MS.0..=LATENCY_RANGE_MS.1).contains(&self.latency_ms)
            && (RETRY_PROBABILITY_RANGE.0..=RETRY_PROBABILITY_RANGE.1).contains(&self.retry_probability)
    }
}
