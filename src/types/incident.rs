//! Historical-incident and playbook-retrieval data shapes (§3.1, §6).
//!
//! These back the `IncidentStore` / `PlaybookProvider` traits in
//! `crate::knowledge`; the store itself is an external collaborator per the
//! purpose-and-scope Non-goals, but its read contract is part of the data
//! model so the default in-memory implementation has something to return.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentSignature {
    pub error_code: String,
    pub issuer: String,
    pub payment_method: String,
    pub failure_rate: f64,
    pub time_of_day: String,
    pub day_of_week: String,
    pub season: String,
}

impl IncidentSignature {
    /// Weighted similarity against another signature, matching the
    /// original `IncidentSignature.similarity` weights.
    pub fn similarity(&self, other: &IncidentSignature) -> f64 {
        let mut score = 0.0;
        if self.error_code == other.error_code {
            score += 0.3;
        }
        if self.issuer == other.issuer {
            score += 0.2;
        }
        if self.payment_method == other.payment_method {
            score += 0.15;
        }
        if self.time_of_day == other.time_of_day {
            score += 0.1;
        }
        if self.day_of_week == other.day_of_week {
            score += 0.05;
        }
        if self.season == other.season {
            score += 0.05;
        }
        if (self.failure_rate - other.failure_rate).abs() < 0.1 {
            score += 0.15;
        }
        score
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalIncident {
    pub incident_id: String,
    pub signature: IncidentSignature,
    pub timestamp: i64,
    pub description: String,
    pub intervention_taken: String,
    pub outcome: String,
    pub success: bool,
    pub resolution_time_minutes: u32,
    pub lessons_learned: Vec<String>,
    pub telemetry: HashMap<String, f64>,
}

/// Request to the playbook-retrieval contract (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookRequest {
    pub signature: IncidentSignature,
    pub similar_incidents: Vec<HistoricalIncident>,
    pub current_telemetry: HashMap<String, f64>,
}

/// Response from the playbook-retrieval contract (§6). Non-fatal to fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybookResponse {
    pub recommended_action: String,
    pub confidence: f64,
    pub reasoning: String,
    pub expected_outcome: String,
    pub estimated_resolution_minutes: u32,
    pub key_learnings_applied: Vec<String>,
    pub risk_factors: Vec<String>,
    pub rollback_plan: String,
    pub monitoring_metrics: Vec<String>,
}
