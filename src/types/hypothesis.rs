//! Hypothesis — a candidate root-cause explanation for a detected pattern.

use super::pattern::Evidence;
use serde::{Deserialize, Serialize};

/// Expected impact of a root cause (or the intervention addressing it)
/// across four axes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct ImpactEstimate {
    pub success_rate_impact: f64,
    pub latency_impact: f64,
    pub cost_impact: f64,
    pub risk_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypothesis {
    pub id: String,
    pub description: String,
    pub root_cause: String,
    pub confidence: f64,
    pub supporting_evidence: Vec<Evidence>,
    pub contradicting_evidence: Vec<Evidence>,
    pub expected_impact: ImpactEstimate,
}
