//! Decision Policy — picks a single intervention, honoring a hard minimum
//! action-frequency guarantee.
//!
//! Evaluation order is preserved faithfully from the original `policy.py`,
//! quirk included: the min-frequency check runs *before* the
//! emptiness/NRV check, so a cycle that both qualifies for the min-frequency
//! rule and would otherwise fall through to NO_ACTION still forces an
//! action. Min-frequency takes priority.

use crate::config::defaults::MIN_FREQUENCY_RATIONALE_PREFIX;
use crate::decision::nrv::{rank_by_nrv, NrvParams};
use crate::types::{InterventionDecision, InterventionKind, InterventionOption, OutcomeEstimate, ParamValue, Tradeoffs};

pub struct DecisionPolicy {
    min_action_frequency_cycles: u32,
    max_blast_radius: f64,
    cycles_since_last_action: u32,
}

impl DecisionPolicy {
    pub fn new(min_action_frequency_cycles: u32, max_blast_radius: f64) -> Self {
        Self { min_action_frequency_cycles, max_blast_radius, cycles_since_last_action: 0 }
    }

    pub fn cycles_since_last_action(&self) -> u32 {
        self.cycles_since_last_action
    }

    /// Choose among `candidates` (which must include the `NO_ACTION`
    /// sentinel), given the current traffic volume and belief uncertainty.
    pub fn decide(
        &mut self,
        candidates: &[InterventionOption],
        volume: f64,
        nrv_params: &NrvParams,
        belief_uncertainty: f64,
    ) -> InterventionDecision {
        let actions: Vec<&InterventionOption> =
            candidates.iter().filter(|c| c.kind != InterventionKind::NoAction).collect();
        let ranked = rank_by_nrv(&actions.iter().map(|c| (*c).clone()).collect::<Vec<_>>(), volume, nrv_params);

        // Step 2 runs before step 3: min-frequency forces an action even if
        // the best candidate would otherwise fail the NRV/emptiness check.
        if self.cycles_since_last_action >= self.min_action_frequency_cycles.saturating_sub(1) {
            let (selected, best_nrv) = if let Some((best, nrv)) = ranked.first() {
                ((*best).clone(), *nrv)
            } else {
                (synthesize_low_severity_alert(), 0.0)
            };
            self.cycles_since_last_action = 0;
            return self.finalize(
                true,
                selected.clone(),
                format!("{MIN_FREQUENCY_RATIONALE_PREFIX} forced action after {} idle cycles (best NRV {best_nrv:.2})", self.min_action_frequency_cycles),
                candidates.to_vec(),
                belief_uncertainty,
            );
        }

        let best = ranked.first();
        let clears_bar = matches!(best, Some((_, nrv)) if *nrv > 0.0);
        if !clears_bar {
            self.cycles_since_last_action += 1;
            return InterventionDecision::no_action("no candidate clears the NRV bar this cycle", candidates.to_vec());
        }

        let (selected, nrv) = best.expect("clears_bar confirmed a candidate exists");
        self.cycles_since_last_action = 0;
        self.finalize(
            true,
            (*selected).clone(),
            format!("selected {} with NRV {nrv:.2}", selected.kind.as_str()),
            candidates.to_vec(),
            belief_uncertainty,
        )
    }

    fn finalize(
        &self,
        should_act: bool,
        selected: InterventionOption,
        rationale: String,
        alternatives: Vec<InterventionOption>,
        belief_uncertainty: f64,
    ) -> InterventionDecision {
        let requires_human_approval = selected.blast_radius > self.max_blast_radius || belief_uncertainty > 0.5;
        InterventionDecision { should_act, selected: Some(selected), rationale, alternatives, requires_human_approval }
    }
}

fn synthesize_low_severity_alert() -> InterventionOption {
    InterventionOption {
        kind: InterventionKind::AlertOps,
        target: "global".to_string(),
        parameters: [("reason".to_string(), ParamValue::Text("minimum action frequency".to_string()))].into(),
        outcome: OutcomeEstimate { delta_success: 0.0, delta_latency: 0.0, delta_cost: 0.0, confidence: 0.5 },
        tradeoffs: Tradeoffs::default(),
        reversible: true,
        blast_radius: 0.0,
    }
}
