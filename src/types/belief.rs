//! BeliefState — the agent's running view of system health and uncertainty.

use super::hypothesis::Hypothesis;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefState {
    pub active_hypotheses: Vec<Hypothesis>,
    pub system_health_score: f64,
    pub uncertainty_level: f64,
    pub last_updated: i64,
}

impl BeliefState {
    pub fn empty(now: i64) -> Self {
        Self {
            active_hypotheses: Vec::new(),
            system_health_score: 1.0,
            uncertainty_level: 0.0,
            last_updated: now,
        }
    }

    /// Recompute `system_health_score` and `uncertainty_level` from
    /// `active_hypotheses` (§3): health = 1 − 0.5·mean(confidence);
    /// uncertainty = min(1, 2·variance(confidence − 0.5)).
    pub fn recompute(&mut self, now: i64) {
        if self.active_hypotheses.is_empty() {
            self.system_health_score = 1.0;
            self.uncertainty_level = 0.0;
            self.last_updated = now;
            return;
        }
        let n = self.active_hypotheses.len() as f64;
        let avg_confidence: f64 = self.active_hypotheses.iter().map(|h| h.confidence).sum::<f64>() / n;
        self.system_health_score = 1.0 - avg_confidence * 0.5;

        let confidence_variance: f64 = self
            .active_hypotheses
            .iter()
            .map(|h| (h.confidence - 0.5).powi(2))
            .sum::<f64>()
            / n;
        self.uncertainty_level = (confidence_variance * 2.0).min(1.0);
        self.last_updated = now;
    }
}
