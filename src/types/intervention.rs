//! InterventionOption / InterventionDecision — candidate and chosen actions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InterventionKind {
    AdjustRetry,
    SuppressPath,
    RerouteTraffic,
    ReduceRetryAttempts,
    AlertOps,
    NoAction,
}

impl InterventionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InterventionKind::AdjustRetry => "adjust_retry",
            InterventionKind::SuppressPath => "suppress_path",
            InterventionKind::RerouteTraffic => "reroute_traffic",
            InterventionKind::ReduceRetryAttempts => "reduce_retry_attempts",
            InterventionKind::AlertOps => "alert_ops",
            InterventionKind::NoAction => "no_action",
        }
    }
}

/// An opaque, JSON-friendly parameter value for an intervention.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Bool(bool),
}

pub type ParamMap = HashMap<String, ParamValue>;

/// Expected effect of an intervention, independent of cost.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct OutcomeEstimate {
    pub delta_success: f64,
    pub delta_latency: f64,
    pub delta_cost: f64,
    pub confidence: f64,
}

/// Signed axes used by the Safety Constraints and Pre-Mortem stages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct Tradeoffs {
    pub success_rate_impact: f64,
    pub latency_impact: f64,
    pub cost_impact: f64,
    pub risk_impact: f64,
    pub user_friction_impact: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionOption {
    pub kind: InterventionKind,
    pub target: String,
    pub parameters: ParamMap,
    pub outcome: OutcomeEstimate,
    pub tradeoffs: Tradeoffs,
    pub reversible: bool,
    pub blast_radius: f64,
}

impl InterventionOption {
    pub fn no_action(target: impl Into<String>) -> Self {
        Self {
            kind: InterventionKind::NoAction,
            target: target.into(),
            parameters: ParamMap::new(),
            outcome: OutcomeEstimate::default(),
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius: 0.0,
        }
    }

    /// Optional `duration_ms` parameter, if present and numeric.
    pub fn duration_ms(&self) -> Option<f64> {
        match self.parameters.get("duration_ms") {
            Some(ParamValue::Number(n)) => Some(*n),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterventionDecision {
    pub should_act: bool,
    pub selected: Option<InterventionOption>,
    pub rationale: String,
    pub alternatives: Vec<InterventionOption>,
    pub requires_human_approval: bool,
}

impl InterventionDecision {
    pub fn no_action(rationale: impl Into<String>, alternatives: Vec<InterventionOption>) -> Self {
        Self {
            should_act: false,
            selected: None,
            rationale: rationale.into(),
            alternatives,
            requires_human_approval: false,
        }
    }
}
