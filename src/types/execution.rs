//! ExecutionResult / ActiveIntervention — the lifecycle of an executed action.

use super::intervention::InterventionOption;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RollbackConditionKind {
    TimeBased,
    MetricBased,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollbackCondition {
    pub kind: RollbackConditionKind,
    pub threshold: Option<f64>,
    pub metric: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    pub intervention_id: uuid::Uuid,
    pub executed_at: i64,
    pub expires_at: Option<i64>,
    pub rollback_conditions: Vec<RollbackCondition>,
    pub applied_parameters: super::intervention::ParamMap,
    pub error: Option<String>,
}

/// Lifecycle state machine: proposed (implicit, pre-execution) → executed →
/// (expired | rolled_back).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterventionStatus {
    Executed,
    Expired,
    RolledBack,
}

/// An executed intervention still applying its effects, owned exclusively
/// by the Feedback Controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveIntervention {
    pub result: ExecutionResult,
    pub option: InterventionOption,
    pub start_time: i64,
    pub end_time: Option<i64>,
    pub status: InterventionStatus,
}

impl ActiveIntervention {
    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.end_time, Some(end) if now >= end)
    }
}
