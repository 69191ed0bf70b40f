//! Safety Constraints — pre-ranking filters applied before the NRV pass.

use crate::types::InterventionOption;

#[derive(Debug, Clone, Copy)]
pub struct SafetyPreferences {
    pub minimal_intervention: bool,
    pub reversibility: bool,
}

impl Default for SafetyPreferences {
    fn default() -> Self {
        Self { minimal_intervention: true, reversibility: true }
    }
}

/// A candidate that was blocked, with the reason.
pub struct Blocked {
    pub option: InterventionOption,
    pub reason: String,
}

/// Filter and reorder candidates, returning (allowed, blocked).
///
/// `fraud_risk`/`compliance_risk` are the caller's current system-wide risk
/// levels (0-1), not per-option fields — an option's own risk exposure
/// lives in its `Tradeoffs.risk_impact`.
pub fn apply_constraints(
    candidates: Vec<InterventionOption>,
    preferences: &SafetyPreferences,
    fraud_risk: f64,
    compliance_risk: f64,
) -> (Vec<InterventionOption>, Vec<Blocked>) {
    let mut allowed = Vec::new();
    let mut blocked = Vec::new();

    for option in candidates {
        if let Some(reason) = fraud_compliance_block_reason(&option, fraud_risk, compliance_risk) {
            blocked.push(Blocked { option, reason });
            continue;
        }
        allowed.push(option);
    }

    if preferences.minimal_intervention {
        allowed.sort_by(|a, b| magnitude(a).partial_cmp(&magnitude(b)).unwrap_or(std::cmp::Ordering::Equal));
    }
    if preferences.reversibility {
        let (reversible, irreversible): (Vec<_>, Vec<_>) = allowed.into_iter().partition(|c| c.reversible);
        allowed = reversible.into_iter().chain(irreversible).collect();
    }

    (allowed, blocked)
}

/// Rule (a): block anything that would increase risk exposure while fraud
/// or compliance risk is already elevated (> 0.3). Rule (b): fraud risk
/// above 0.1 overrides any candidate whose success-rate impact is revenue-
/// positive (> 0.1), regardless of its other merits.
fn fraud_compliance_block_reason(option: &InterventionOption, fraud_risk: f64, compliance_risk: f64) -> Option<String> {
    if option.tradeoffs.risk_impact > 0.0 && fraud_risk > 0.3 {
        return Some(format!("fraud risk {fraud_risk:.2} too high, cannot increase risk further"));
    }
    if option.tradeoffs.risk_impact > 0.0 && compliance_risk > 0.3 {
        return Some(format!("compliance risk {compliance_risk:.2} too high, cannot increase risk further"));
    }
    if fraud_risk > 0.1 && option.tradeoffs.success_rate_impact > 0.1 {
        return Some("fraud/compliance takes priority over revenue optimization".to_string());
    }
    None
}

fn magnitude(option: &InterventionOption) -> f64 {
    0.5 * option.blast_radius
        + 0.2 * option.tradeoffs.success_rate_impact.abs()
        + 0.1 * option.tradeoffs.latency_impact.abs() / 1000.0
        + 0.2 * option.tradeoffs.user_friction_impact
}
