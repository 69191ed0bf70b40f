//! AgentState — the persisted blob round-tripped through the state snapshot file.

use super::belief::BeliefState;
use super::execution::ActiveIntervention;
use super::transaction::Transaction;
use serde::{Deserialize, Serialize};

/// Scalar model parameters tuned over the agent's lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModelParameters {
    pub anomaly_threshold: f64,
    pub min_confidence: f64,
    pub max_blast_radius: f64,
    pub learning_rate: f64,
    pub conservativeness: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            anomaly_threshold: 2.0,
            min_confidence: 0.5,
            max_blast_radius: 0.3,
            learning_rate: 0.1,
            conservativeness: 0.5,
        }
    }
}

/// The full persisted agent state. JSON round-trip must preserve every
/// scalar and enum field bit-for-bit / enum-for-enum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub belief: BeliefState,
    pub active_interventions: Vec<ActiveIntervention>,
    pub recent_observations: Vec<Transaction>,
    pub parameters: ModelParameters,
    pub last_updated: i64,
    pub last_nrv: f64,
    pub last_z_score: f64,
    pub risk_acknowledged: bool,
}

impl AgentState {
    pub fn new(now: i64) -> Self {
        Self {
            belief: BeliefState::empty(now),
            active_interventions: Vec::new(),
            recent_observations: Vec::new(),
            parameters: ModelParameters::default(),
            last_updated: now,
            last_nrv: 0.0,
            last_z_score: 0.0,
            risk_acknowledged: false,
        }
    }
}
