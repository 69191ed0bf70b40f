//! Hypothesis Generator & Belief Manager.
//!
//! For each detected pattern, emits 1-2 candidate hypotheses from a static
//! catalog, then folds them into a running `BeliefState` that is never
//! pruned automatically.

use crate::types::{BeliefState, DetectedPattern, Hypothesis, ImpactEstimate, PatternKind};

/// Generate the catalog hypotheses for a single detected pattern.
pub fn generate_hypotheses(pattern: &DetectedPattern) -> Vec<Hypothesis> {
    match pattern.kind {
        PatternKind::IssuerDegradation => vec![
            hypothesis(
                pattern,
                "issuer_downtime",
                "issuer experiencing a downtime event",
                0.7,
                ImpactEstimate { success_rate_impact: -0.2, latency_impact: 100.0, cost_impact: 0.0, risk_impact: 0.1 },
            ),
            hypothesis(
                pattern,
                "network_issues",
                "network path to issuer is degraded",
                0.5,
                ImpactEstimate { success_rate_impact: -0.15, latency_impact: 200.0, cost_impact: 0.0, risk_impact: 0.05 },
            ),
        ],
        PatternKind::RetryStorm => vec![hypothesis(
            pattern,
            "retry_storm_amplifying_load",
            "client retries are amplifying load on an already-stressed path",
            0.8,
            ImpactEstimate { success_rate_impact: -0.1, latency_impact: 150.0, cost_impact: 0.2, risk_impact: 0.15 },
        )],
        PatternKind::MethodFatigue => vec![hypothesis(
            pattern,
            "method_high_failure_rate",
            "payment method is experiencing a high failure rate",
            0.6,
            ImpactEstimate { success_rate_impact: -0.25, latency_impact: 50.0, cost_impact: 0.0, risk_impact: 0.1 },
        )],
        PatternKind::LatencySpike => vec![hypothesis(
            pattern,
            "system_overload",
            "downstream system is overloaded",
            0.6,
            ImpactEstimate { success_rate_impact: -0.05, latency_impact: 300.0, cost_impact: 0.1, risk_impact: 0.2 },
        )],
        PatternKind::SystemicFailure | PatternKind::LocalizedFailure => Vec::new(),
    }
}

fn hypothesis(pattern: &DetectedPattern, id: &str, root_cause: &str, confidence: f64, expected_impact: ImpactEstimate) -> Hypothesis {
    Hypothesis {
        id: format!("{id}:{}", pattern.affected_dimension),
        description: format!("{root_cause} on {}", pattern.affected_dimension),
        root_cause: root_cause.to_string(),
        confidence,
        supporting_evidence: pattern.evidence.clone(),
        contradicting_evidence: Vec::new(),
        expected_impact,
    }
}

/// Fold newly generated hypotheses into the running belief state and
/// recompute derived health/uncertainty. Never prunes existing hypotheses;
/// callers reset explicitly via `BeliefState::empty`.
pub fn update_belief(belief: &mut BeliefState, patterns: &[DetectedPattern], now: i64) {
    for pattern in patterns {
        belief.active_hypotheses.extend(generate_hypotheses(pattern));
    }
    belief.recompute(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Evidence;

    fn make_pattern(kind: PatternKind) -> DetectedPattern {
        DetectedPattern {
            kind,
            affected_dimension: "issuer:HDFC".to_string(),
            severity: 0.5,
            evidence: vec![Evidence {
                kind: "test".to_string(),
                description: "test evidence".to_string(),
                value: 1.0,
                source: "test".to_string(),
                timestamp: 0,
            }],
            detected_at: 0,
        }
    }

    #[test]
    fn issuer_degradation_yields_two_hypotheses() {
        let hyps = generate_hypotheses(&make_pattern(PatternKind::IssuerDegradation));
        assert_eq!(hyps.len(), 2);
        assert!(hyps.iter().any(|h| h.root_cause == "issuer_downtime"));
        assert!(hyps.iter().any(|h| h.root_cause == "network_issues"));
    }

    #[test]
    fn retry_storm_yields_one_hypothesis() {
        let hyps = generate_hypotheses(&make_pattern(PatternKind::RetryStorm));
        assert_eq!(hyps.len(), 1);
        assert_eq!(hyps[0].confidence, 0.8);
    }

    #[test]
    fn belief_never_prunes_across_updates() {
        let mut belief = BeliefState::empty(0);
        update_belief(&mut belief, &[make_pattern(PatternKind::RetryStorm)], 1);
        update_belief(&mut belief, &[make_pattern(PatternKind::MethodFatigue)], 2);
        assert_eq!(belief.active_hypotheses.len(), 2);
    }

    #[test]
    fn empty_patterns_keeps_health_at_one() {
        let mut belief = BeliefState::empty(0);
        update_belief(&mut belief, &[], 1);
        assert_eq!(belief.system_health_score, 1.0);
    }
}
