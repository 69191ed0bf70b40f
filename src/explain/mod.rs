//! Explanation Generator — a two-sentence human summary plus the
//! machine-readable action record (§4.17).

use serde::{Deserialize, Serialize};

use crate::action::premortem::PreMortemResult;
use crate::types::{InterventionDecision, InterventionKind};

/// Machine-readable action record. Field set and `risk_acknowledged`
/// default match the original debrief action-JSON exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub should_act: bool,
    pub action_type: String,
    pub target: String,
    pub parameters: serde_json::Value,
    pub confidence: f64,
    pub nrv: f64,
    pub z_score: f64,
    pub blast_radius: f64,
    pub requires_approval: bool,
    pub risk_score: f64,
    pub risk_acknowledged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub summary: String,
    pub action_record: ActionRecord,
}

/// Build the dual-output explanation for one decided cycle.
pub fn explain(decision: &InterventionDecision, nrv: f64, z_score: f64, premortem: Option<&PreMortemResult>) -> Explanation {
    let risk_score = premortem.map_or(0.0, |p| p.risk_score);

    let summary = match &decision.selected {
        Some(option) if decision.should_act => format!(
            "Detected a condition warranting intervention on {}; the agent selected {} with an expected net recovery value of {:.2}.",
            option.target,
            describe_kind(option.kind),
            nrv,
        ),
        _ => format!("No anomalous condition required intervention this cycle; the agent took no action. {}", decision.rationale),
    };

    let action_record = match &decision.selected {
        Some(option) => ActionRecord {
            should_act: decision.should_act,
            action_type: option.kind.as_str().to_string(),
            target: option.target.clone(),
            parameters: params_to_json(&option.parameters),
            confidence: option.outcome.confidence,
            nrv,
            z_score,
            blast_radius: option.blast_radius,
            requires_approval: decision.requires_human_approval,
            risk_score,
            risk_acknowledged: false,
        },
        None => ActionRecord {
            should_act: false,
            action_type: InterventionKind::NoAction.as_str().to_string(),
            target: "global".to_string(),
            parameters: serde_json::json!({}),
            confidence: 0.0,
            nrv,
            z_score,
            blast_radius: 0.0,
            requires_approval: false,
            risk_score,
            risk_acknowledged: false,
        },
    };

    Explanation { summary, action_record }
}

fn describe_kind(kind: InterventionKind) -> &'static str {
    match kind {
        InterventionKind::AdjustRetry => "an adjustment to retry behavior",
        InterventionKind::SuppressPath => "suppression of the affected path",
        InterventionKind::RerouteTraffic => "a traffic reroute",
        InterventionKind::ReduceRetryAttempts => "a reduction in retry attempts",
        InterventionKind::AlertOps => "an ops alert",
        InterventionKind::NoAction => "no action",
    }
}

fn params_to_json(parameters: &crate::types::ParamMap) -> serde_json::Value {
    serde_json::to_value(parameters).unwrap_or_else(|_| serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterventionOption, OutcomeEstimate, Tradeoffs};

    fn make_option(kind: InterventionKind, target: &str) -> InterventionOption {
        InterventionOption {
            kind,
            target: target.to_string(),
            parameters: Default::default(),
            outcome: OutcomeEstimate { confidence: 0.9, ..Default::default() },
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius: 0.2,
        }
    }

    #[test]
    fn no_action_summary_includes_rationale() {
        let decision = InterventionDecision::no_action("nothing anomalous detected", Vec::new());
        let explanation = explain(&decision, 0.0, 0.0, None);
        assert!(explanation.summary.contains("no action"));
        assert!(!explanation.action_record.should_act);
        assert_eq!(explanation.action_record.action_type, "no_action");
    }

    #[test]
    fn action_record_carries_risk_score_and_never_preacknowledges() {
        let option = make_option(InterventionKind::SuppressPath, "issuer:HDFC");
        let decision = InterventionDecision {
            should_act: true,
            selected: Some(option),
            rationale: "z-score exceeded threshold".to_string(),
            alternatives: Vec::new(),
            requires_human_approval: true,
        };
        let premortem = PreMortemResult { risk_score: 0.42, acceptable: true, worst_case: "x".to_string(), requires_acknowledgement: false };
        let explanation = explain(&decision, 12.5, 2.4, Some(&premortem));
        assert_eq!(explanation.action_record.risk_score, 0.42);
        assert!(!explanation.action_record.risk_acknowledged);
        assert_eq!(explanation.action_record.target, "issuer:HDFC");
        assert!(explanation.action_record.requires_approval);
    }
}
