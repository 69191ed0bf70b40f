//! Action Executor — guardrails, lifecycle state machine, and pluggable
//! side-effect execution via the `Effector` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::types::{
    ActiveIntervention, ExecutionResult, InterventionOption, InterventionStatus, RollbackCondition, RollbackConditionKind,
};

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("blast radius {0:.2} exceeds approval threshold {1:.2}")]
    BlastRadiusExceeded(f64, f64),
    #[error("duration {0:.0}ms exceeds maximum suppression duration {1:.0}ms")]
    DurationExceeded(f64, f64),
}

/// Side-effect backend for an executed intervention. `Simulated` and `Null`
/// are provided; production wiring supplies its own implementation of the
/// same trait rather than a boolean "simulation mode" flag.
#[async_trait]
pub trait Effector: Send + Sync {
    async fn apply(&self, option: &InterventionOption, intervention_id: Uuid);
    async fn revert(&self, intervention_id: Uuid);
}

/// Logs the would-be side effect without touching any real system.
pub struct SimulatedEffector;

#[async_trait]
impl Effector for SimulatedEffector {
    async fn apply(&self, option: &InterventionOption, intervention_id: Uuid) {
        info!(intervention_id = %intervention_id, kind = option.kind.as_str(), target = %option.target, "simulated apply");
    }

    async fn revert(&self, intervention_id: Uuid) {
        info!(intervention_id = %intervention_id, "simulated revert");
    }
}

/// Does nothing. Used in tests where even logging is undesired noise.
pub struct NullEffector;

#[async_trait]
impl Effector for NullEffector {
    async fn apply(&self, _option: &InterventionOption, _intervention_id: Uuid) {}
    async fn revert(&self, _intervention_id: Uuid) {}
}

pub struct Guardrails {
    pub approval_threshold: f64,
    pub max_suppression_duration_ms: f64,
}

pub struct ActionExecutor {
    guardrails: Guardrails,
    effector: Box<dyn Effector>,
    active: HashMap<Uuid, ActiveIntervention>,
}

impl ActionExecutor {
    pub fn new(guardrails: Guardrails, effector: Box<dyn Effector>) -> Self {
        Self { guardrails, effector, active: HashMap::new() }
    }

    pub fn active_interventions(&self) -> &HashMap<Uuid, ActiveIntervention> {
        &self.active
    }

    /// Validate guardrails, mint a UUID, and transition the option from
    /// proposed to executed. On guardrail failure, returns a non-success
    /// `ExecutionResult` without mutating the active-intervention map.
    pub async fn execute(&mut self, option: InterventionOption, now: i64) -> ExecutionResult {
        if option.blast_radius > self.guardrails.approval_threshold {
            let err = ExecutorError::BlastRadiusExceeded(option.blast_radius, self.guardrails.approval_threshold);
            warn!(error = %err, "guardrail rejected intervention");
            return self.failure_result(&option, err.to_string());
        }
        if let Some(duration) = option.duration_ms() {
            if duration > self.guardrails.max_suppression_duration_ms {
                let err = ExecutorError::DurationExceeded(duration, self.guardrails.max_suppression_duration_ms);
                warn!(error = %err, "guardrail rejected intervention");
                return self.failure_result(&option, err.to_string());
            }
        }

        let intervention_id = Uuid::new_v4();
        let expires_at = option.duration_ms().map(|d| now + d as i64);
        self.effector.apply(&option, intervention_id).await;

        let result = ExecutionResult {
            success: true,
            intervention_id,
            executed_at: now,
            expires_at,
            rollback_conditions: vec![RollbackCondition {
                kind: RollbackConditionKind::TimeBased,
                threshold: None,
                metric: None,
                description: "expires at end_time".to_string(),
            }],
            applied_parameters: option.parameters.clone(),
            error: None,
        };

        self.active.insert(
            intervention_id,
            ActiveIntervention { result: result.clone(), option, start_time: now, end_time: expires_at, status: InterventionStatus::Executed },
        );

        result
    }

    fn failure_result(&self, option: &InterventionOption, error: String) -> ExecutionResult {
        ExecutionResult {
            success: false,
            intervention_id: Uuid::nil(),
            executed_at: 0,
            expires_at: None,
            rollback_conditions: Vec::new(),
            applied_parameters: option.parameters.clone(),
            error: Some(error),
        }
    }

    /// Remove and revert an active intervention. Returns true if present.
    pub async fn rollback(&mut self, intervention_id: Uuid) -> bool {
        if let Some(mut active) = self.active.remove(&intervention_id) {
            active.status = InterventionStatus::RolledBack;
            self.effector.revert(intervention_id).await;
            true
        } else {
            false
        }
    }

    /// Transition every intervention whose end_time has passed to Expired
    /// and remove it from the active map.
    pub fn expire_due(&mut self, now: i64) -> Vec<ActiveIntervention> {
        let due: Vec<Uuid> = self.active.iter().filter(|(_, a)| a.is_expired(now)).map(|(id, _)| *id).collect();
        due.into_iter()
            .filter_map(|id| {
                self.active.remove(&id).map(|mut a| {
                    a.status = InterventionStatus::Expired;
                    a
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterventionKind, OutcomeEstimate, ParamValue, Tradeoffs};

    fn make_option(blast_radius: f64, duration_ms: Option<f64>) -> InterventionOption {
        let mut parameters = crate::types::ParamMap::new();
        if let Some(d) = duration_ms {
            parameters.insert("duration_ms".to_string(), ParamValue::Number(d));
        }
        InterventionOption {
            kind: InterventionKind::SuppressPath,
            target: "issuer:HDFC".to_string(),
            parameters,
            outcome: OutcomeEstimate::default(),
            tradeoffs: Tradeoffs::default(),
            reversible: true,
            blast_radius,
        }
    }

    fn make_executor() -> ActionExecutor {
        ActionExecutor::new(
            Guardrails { approval_threshold: 0.5, max_suppression_duration_ms: 600_000.0 },
            Box::new(NullEffector),
        )
    }

    #[tokio::test]
    async fn executes_when_within_guardrails() {
        let mut executor = make_executor();
        let result = executor.execute(make_option(0.2, Some(60_000.0)), 0).await;
        assert!(result.success);
        assert_eq!(executor.active_interventions().len(), 1);
    }

    #[tokio::test]
    async fn rejects_blast_radius_over_threshold() {
        let mut executor = make_executor();
        let result = executor.execute(make_option(0.9, Some(60_000.0)), 0).await;
        assert!(!result.success);
        assert!(executor.active_interventions().is_empty());
    }

    #[tokio::test]
    async fn rejects_duration_over_max() {
        let mut executor = make_executor();
        let result = executor.execute(make_option(0.2, Some(10_000_000.0)), 0).await;
        assert!(!result.success);
    }

    #[tokio::test]
    async fn rollback_removes_active_entry() {
        let mut executor = make_executor();
        let result = executor.execute(make_option(0.2, Some(60_000.0)), 0).await;
        assert!(executor.rollback(result.intervention_id).await);
        assert!(executor.active_interventions().is_empty());
    }

    #[tokio::test]
    async fn expire_due_removes_past_end_time_entries() {
        let mut executor = make_executor();
        executor.execute(make_option(0.2, Some(1_000.0)), 0).await;
        let expired = executor.expire_due(2_000);
        assert_eq!(expired.len(), 1);
        assert!(executor.active_interventions().is_empty());
    }
}
