//! Pre-Mortem Analyzer — adversarial risk scoring before execution.

use crate::config::defaults::RISK_ACCEPTABLE_THRESHOLD;
use crate::types::{InterventionKind, InterventionOption};

fn worst_case_scenario(kind: InterventionKind) -> &'static str {
    match kind {
        InterventionKind::SuppressPath => "issuer path suppressed while healthy, causing unnecessary failover cost",
        InterventionKind::ReduceRetryAttempts => "legitimate transient failures are no longer retried, lowering overall success rate",
        InterventionKind::RerouteTraffic => "rerouted traffic overloads the alternate path, causing a cascading failure",
        InterventionKind::AlertOps => "alert goes unacknowledged and the underlying condition worsens",
        InterventionKind::AdjustRetry => "retry tuning increases load on an already-degraded path",
        InterventionKind::NoAction => "condition worsens undetected while the agent takes no action",
    }
}

#[derive(Debug, Clone)]
pub struct PreMortemResult {
    pub risk_score: f64,
    pub acceptable: bool,
    pub worst_case: String,
    pub requires_acknowledgement: bool,
}

/// risk_score = 0.3*blast + 0.2*(0 if reversible else 0.3)
///            + 0.3*(0.4*|Δrisk| + 0.3*user_friction_impact) + 0.2*(1 - outcome.confidence)
/// capped at 1. Acceptable iff score < 0.7.
pub fn analyze(option: &InterventionOption) -> PreMortemResult {
    let reversibility_term = if option.reversible { 0.0 } else { 0.3 };
    let risk_friction_term = 0.4 * option.tradeoffs.risk_impact.abs() + 0.3 * option.tradeoffs.user_friction_impact;
    let confidence_term = 1.0 - option.outcome.confidence;

    let risk_score = (0.3 * option.blast_radius + 0.2 * reversibility_term + 0.3 * risk_friction_term + 0.2 * confidence_term).min(1.0);
    let acceptable = risk_score < RISK_ACCEPTABLE_THRESHOLD;

    PreMortemResult {
        risk_score,
        acceptable,
        worst_case: worst_case_scenario(option.kind).to_string(),
        requires_acknowledgement: !acceptable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OutcomeEstimate, Tradeoffs};

    fn make_option(blast_radius: f64, reversible: bool, confidence: f64) -> InterventionOption {
        InterventionOption {
            kind: InterventionKind::SuppressPath,
            target: "issuer:HDFC".to_string(),
            parameters: Default::default(),
            outcome: OutcomeEstimate { delta_success: 0.1, delta_latency: 0.0, delta_cost: 0.0, confidence },
            tradeoffs: Tradeoffs::default(),
            reversible,
            blast_radius,
        }
    }

    #[test]
    fn low_blast_reversible_high_confidence_is_acceptable() {
        let result = analyze(&make_option(0.1, true, 0.9));
        assert!(result.acceptable);
        assert!(!result.requires_acknowledgement);
    }

    #[test]
    fn high_blast_irreversible_low_confidence_is_not_acceptable() {
        let result = analyze(&make_option(0.9, false, 0.1));
        assert!(!result.acceptable);
        assert!(result.requires_acknowledgement);
    }

    #[test]
    fn risk_score_never_exceeds_one() {
        let result = analyze(&make_option(1.0, false, 0.0));
        assert!(result.risk_score <= 1.0);
    }
}
