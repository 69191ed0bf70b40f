//! Intervention Planner — turns detected patterns into candidate options.

use crate::types::{
    DetectedPattern, InterventionKind, InterventionOption, OutcomeEstimate, ParamValue, PatternKind, Tradeoffs,
};

const SUPPRESS_PATH_DURATION_MS: f64 = 5.0 * 60_000.0;
const REDUCE_RETRY_DURATION_MS: f64 = 10.0 * 60_000.0;
const REROUTE_TRAFFIC_DURATION_MS: f64 = 5.0 * 60_000.0;

/// Always includes a `NO_ACTION` candidate, plus exactly one candidate per
/// detected pattern whose kind has a mapped intervention.
pub fn plan_candidates(patterns: &[DetectedPattern]) -> Vec<InterventionOption> {
    let mut candidates = vec![InterventionOption::no_action("global")];
    for pattern in patterns {
        if let Some(option) = candidate_for(pattern) {
            candidates.push(option);
        }
    }
    candidates
}

fn candidate_for(pattern: &DetectedPattern) -> Option<InterventionOption> {
    match pattern.kind {
        PatternKind::IssuerDegradation => Some(InterventionOption {
            kind: InterventionKind::SuppressPath,
            target: pattern.affected_dimension.clone(),
            parameters: [("duration_ms".to_string(), ParamValue::Number(SUPPRESS_PATH_DURATION_MS))].into(),
            outcome: OutcomeEstimate { delta_success: 0.15, delta_latency: -50.0, delta_cost: 0.5, confidence: 0.7 },
            tradeoffs: Tradeoffs {
                success_rate_impact: 0.15,
                latency_impact: -50.0,
                cost_impact: 0.5,
                risk_impact: 0.1,
                user_friction_impact: 0.2,
            },
            reversible: true,
            blast_radius: 0.2,
        }),
        PatternKind::RetryStorm => Some(InterventionOption {
            kind: InterventionKind::ReduceRetryAttempts,
            target: "global".to_string(),
            parameters: [("duration_ms".to_string(), ParamValue::Number(REDUCE_RETRY_DURATION_MS))].into(),
            outcome: OutcomeEstimate { delta_success: 0.05, delta_latency: -100.0, delta_cost: 0.1, confidence: 0.6 },
            tradeoffs: Tradeoffs {
                success_rate_impact: 0.05,
                latency_impact: -100.0,
                cost_impact: 0.1,
                risk_impact: 0.05,
                user_friction_impact: 0.1,
            },
            reversible: true,
            blast_radius: 0.5,
        }),
        PatternKind::MethodFatigue => Some(InterventionOption {
            kind: InterventionKind::RerouteTraffic,
            target: pattern.affected_dimension.clone(),
            parameters: [("duration_ms".to_string(), ParamValue::Number(REROUTE_TRAFFIC_DURATION_MS))].into(),
            outcome: OutcomeEstimate { delta_success: 0.1, delta_latency: 0.0, delta_cost: 0.2, confidence: 0.6 },
            tradeoffs: Tradeoffs {
                success_rate_impact: 0.1,
                latency_impact: 0.0,
                cost_impact: 0.2,
                risk_impact: 0.15,
                user_friction_impact: 0.15,
            },
            reversible: true,
            blast_radius: 0.3,
        }),
        PatternKind::LatencySpike => Some(InterventionOption {
            kind: InterventionKind::AlertOps,
            target: pattern.affected_dimension.clone(),
            parameters: [("reason".to_string(), ParamValue::Text("latency_spike".to_string()))].into(),
            outcome: OutcomeEstimate { delta_success: 0.0, delta_latency: 0.0, delta_cost: 0.0, confidence: 0.9 },
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius: 0.0,
        }),
        PatternKind::SystemicFailure | PatternKind::LocalizedFailure => None,
    }
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
            evidence: Vec::<Evidence>::new(),
            detected_at: 0,
        }
    }

    #[test]
    fn always_includes_no_action() {
        let candidates = plan_candidates(&[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].kind, InterventionKind::NoAction);
    }

    #[test]
    fn issuer_degradation_adds_suppress_path() {
        let candidates = plan_candidates(&[make_pattern(PatternKind::IssuerDegradation)]);
        assert!(candidates.iter().any(|c| c.kind == InterventionKind::SuppressPath));
    }

    #[test]
    fn retry_storm_adds_reduce_retry_attempts() {
        let candidates = plan_candidates(&[make_pattern(PatternKind::RetryStorm)]);
        assert!(candidates.iter().any(|c| c.kind == InterventionKind::ReduceRetryAttempts));
    }

    #[test]
    fn exactly_one_candidate_per_pattern() {
        let candidates = plan_candidates(&[make_pattern(PatternKind::MethodFatigue)]);
        assert_eq!(candidates.len(), 2); // NO_ACTION + REROUTE_TRAFFIC
    }
}
