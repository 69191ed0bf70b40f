//! Feedback Controller — keeps the set of active interventions and
//! re-derives the generator's multipliers from scratch on every change, so
//! overlapping effects always compose deterministically.

use std::collections::HashMap;

use tracing::debug;

use crate::generator::IssuerMultipliers;
use crate::types::{ActiveIntervention, InterventionKind, InterventionOption};

const SUPPRESS_VOLUME_MULTIPLIER: f64 = 0.1;
const SUPPRESS_SUCCESS_MULTIPLIER: f64 = 0.1;
const REROUTE_VOLUME_MULTIPLIER: f64 = 0.3;
const REDUCE_RETRY_MULTIPLIER: f64 = 0.5;
const ADJUST_RETRY_MULTIPLIER: f64 = 1.5;

/// Per-issuer volume/success multipliers plus the single global retry
/// multiplier, re-derived together from the active-intervention list.
pub struct DerivedMultipliers {
    pub per_issuer: HashMap<String, IssuerMultipliers>,
    pub retry_multiplier: f64,
}

pub struct FeedbackController {
    active: Vec<ActiveIntervention>,
}

impl FeedbackController {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    pub fn active(&self) -> &[ActiveIntervention] {
        &self.active
    }

    /// Append a newly executed intervention and recompute multipliers.
    pub fn apply_intervention(&mut self, active: ActiveIntervention) -> DerivedMultipliers {
        self.active.push(active);
        self.derive_multipliers()
    }

    /// Drop entries whose end-time has passed, then recompute multipliers.
    pub fn update(&mut self, now: i64) -> DerivedMultipliers {
        self.active.retain(|a| !a.is_expired(now));
        self.derive_multipliers()
    }

    pub fn clear_all(&mut self) -> DerivedMultipliers {
        self.active.clear();
        self.derive_multipliers()
    }

    /// Retry is tracked as a single global scalar rather than a per-issuer
    /// map entry: `ReduceRetryAttempts`/`AdjustRetry` always target
    /// `"global"`, so gating it on a per-issuer map entry existing (as
    /// `SuppressPath`/`RerouteTraffic` do) would silently drop the effect
    /// whenever no other issuer-scoped intervention is also active.
    fn derive_multipliers(&self) -> DerivedMultipliers {
        let mut per_issuer: HashMap<String, IssuerMultipliers> = HashMap::new();
        let mut retry_multiplier = 1.0;

        for active in &self.active {
            let option = &active.option;
            match option.kind {
                InterventionKind::SuppressPath => {
                    if let Some(issuer) = issuer_from_target(&option.target) {
                        let entry = per_issuer.entry(issuer.to_string()).or_default();
                        entry.volume = SUPPRESS_VOLUME_MULTIPLIER;
                        entry.success = SUPPRESS_SUCCESS_MULTIPLIER;
                    }
                }
                InterventionKind::RerouteTraffic => {
                    if let Some(issuer) = issuer_from_target(&option.target) {
                        let entry = per_issuer.entry(issuer.to_string()).or_default();
                        entry.volume = REROUTE_VOLUME_MULTIPLIER;
                    }
                }
                InterventionKind::ReduceRetryAttempts => {
                    retry_multiplier = REDUCE_RETRY_MULTIPLIER;
                }
                InterventionKind::AdjustRetry => {
                    retry_multiplier = ADJUST_RETRY_MULTIPLIER;
                }
                InterventionKind::AlertOps | InterventionKind::NoAction => {}
            }
        }

        debug!(active = self.active.len(), dimensions = per_issuer.len(), retry_multiplier, "multipliers re-derived");
        DerivedMultipliers { per_issuer, retry_multiplier }
    }
}

impl Default for FeedbackController {
    fn default() -> Self {
        Self::new()
    }
}

fn issuer_from_target(target: &str) -> Option<&str> {
    target.strip_prefix("issuer:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExecutionResult, InterventionStatus, OutcomeEstimate, Tradeoffs};
    use uuid::Uuid;

    fn make_active(kind: InterventionKind, target: &str, end_time: Option<i64>) -> ActiveIntervention {
        let option = InterventionOption {
            kind,
            target: target.to_string(),
            parameters: Default::default(),
            outcome: OutcomeEstimate::default(),
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius: 0.2,
        };
        ActiveIntervention {
            result: ExecutionResult {
                success: true,
                intervention_id: Uuid::new_v4(),
                executed_at: 0,
                expires_at: end_time,
                rollback_conditions: Vec::new(),
                applied_parameters: Default::default(),
                error: None,
            },
            option,
            start_time: 0,
            end_time,
            status: InterventionStatus::Executed,
        }
    }

    #[test]
    fn suppress_path_sets_volume_and_success_multipliers() {
        let mut controller = FeedbackController::new();
        let m = controller.apply_intervention(make_active(InterventionKind::SuppressPath, "issuer:HDFC", Some(1000)));
        assert_eq!(m.per_issuer["HDFC"].volume, 0.1);
        assert_eq!(m.per_issuer["HDFC"].success, 0.1);
        assert_eq!(m.retry_multiplier, 1.0);
    }

    #[test]
    fn update_drops_expired_entries() {
        let mut controller = FeedbackController::new();
        controller.apply_intervention(make_active(InterventionKind::SuppressPath, "issuer:HDFC", Some(500)));
        let m = controller.update(1000);
        assert!(!m.per_issuer.contains_key("HDFC"));
    }

    #[test]
    fn clear_all_resets_everything() {
        let mut controller = FeedbackController::new();
        controller.apply_intervention(make_active(InterventionKind::SuppressPath, "issuer:HDFC", Some(1000)));
        let m = controller.clear_all();
        assert!(m.per_issuer.is_empty());
        assert_eq!(m.retry_multiplier, 1.0);
        assert!(controller.active().is_empty());
    }

    #[test]
    fn reduce_retry_attempts_applies_as_the_sole_active_intervention() {
        let mut controller = FeedbackController::new();
        let m = controller.apply_intervention(make_active(InterventionKind::ReduceRetryAttempts, "global", Some(1000)));
        assert!(m.per_issuer.is_empty());
        assert_eq!(m.retry_multiplier, 0.5);
    }

    #[test]
    fn reduce_retry_attempts_applies_alongside_issuer_scoped_interventions() {
        let mut controller = FeedbackController::new();
        controller.apply_intervention(make_active(InterventionKind::SuppressPath, "issuer:HDFC", Some(1000)));
        let m = controller.apply_intervention(make_active(InterventionKind::ReduceRetryAttempts, "global", Some(1000)));
        assert_eq!(m.per_issuer["HDFC"].volume, 0.1);
        assert_eq!(m.retry_multiplier, 0.5);
    }
}
