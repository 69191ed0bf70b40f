//! NRV Calculator — economic scoring of intervention candidates.

use crate::types::InterventionOption;

#[derive(Debug, Clone, Copy)]
pub struct NrvParams {
    pub avg_ticket_value: f64,
    pub cost_per_intervention: f64,
    pub latency_penalty_per_ms: f64,
}

impl Default for NrvParams {
    fn default() -> Self {
        Self {
            avg_ticket_value: crate::config::defaults::DEFAULT_AVG_TICKET_VALUE,
            cost_per_intervention: crate::config::defaults::DEFAULT_COST_PER_INTERVENTION,
            latency_penalty_per_ms: crate::config::defaults::DEFAULT_LATENCY_PENALTY_PER_MS,
        }
    }
}

/// NRV = Δsuccess · ⌊volume · blast_radius⌋ · avg_ticket
///       − (cost_per_intervention + |Δcost|) − |Δlatency| · latency_penalty_per_ms
pub fn compute_nrv(option: &InterventionOption, volume: f64, params: &NrvParams) -> f64 {
    let affected_volume = (volume * option.blast_radius).floor();
    let revenue_term = option.outcome.delta_success * affected_volume * params.avg_ticket_value;
    let cost_term = params.cost_per_intervention + option.outcome.delta_cost.abs();
    let latency_term = option.outcome.delta_latency.abs() * params.latency_penalty_per_ms;
    revenue_term - cost_term - latency_term
}

pub fn should_act(nrv: f64) -> bool {
    nrv > 0.0
}

/// Sort candidates descending by NRV (unstable by NRV alone; callers that
/// need tie-break stability should sort_by_key on a composite beforehand).
pub fn rank_by_nrv<'a>(candidates: &'a [InterventionOption], volume: f64, params: &NrvParams) -> Vec<(&'a InterventionOption, f64)> {
    let mut scored: Vec<(&InterventionOption, f64)> =
        candidates.iter().map(|c| (c, compute_nrv(c, volume, params))).collect();
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterventionKind, OutcomeEstimate, Tradeoffs};

    fn make_option(delta_success: f64, blast_radius: f64) -> InterventionOption {
        InterventionOption {
            kind: InterventionKind::SuppressPath,
            target: "issuer:HDFC".to_string(),
            parameters: Default::default(),
            outcome: OutcomeEstimate { delta_success, delta_latency: 0.0, delta_cost: 0.0, confidence: 0.7 },
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius,
        }
    }

    #[test]
    fn positive_delta_success_can_yield_positive_nrv() {
        let option = make_option(0.2, 0.5);
        let nrv = compute_nrv(&option, 1000.0, &NrvParams::default());
        assert!(should_act(nrv));
    }

    #[test]
    fn zero_delta_success_is_never_worth_acting_on() {
        let option = make_option(0.0, 0.5);
        let nrv = compute_nrv(&option, 1000.0, &NrvParams::default());
        assert!(!should_act(nrv));
    }

    #[test]
    fn rank_by_nrv_sorts_descending() {
        let options = vec![make_option(0.05, 0.5), make_option(0.3, 0.5)];
        let ranked = rank_by_nrv(&options, 1000.0, &NrvParams::default());
        assert!(ranked[0].1 >= ranked[1].1);
    }
}
