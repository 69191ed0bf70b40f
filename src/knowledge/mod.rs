//! Historical-incident store and playbook-retrieval contracts (§6, §3.1).
//!
//! Both are modeled as small traits so a remote-backed implementation can
//! be swapped in later; the crate ships local, dependency-free defaults.

use async_trait::async_trait;

use crate::types::{HistoricalIncident, IncidentSignature, PlaybookRequest, PlaybookResponse};

#[async_trait]
pub trait IncidentStore: Send + Sync {
    async fn find_similar(&self, signature: &IncidentSignature, top_k: usize) -> Vec<(HistoricalIncident, f64)>;
}

#[async_trait]
pub trait PlaybookProvider: Send + Sync {
    async fn recommend(&self, request: &PlaybookRequest) -> Option<PlaybookResponse>;
}

/// In-memory `IncidentStore` seeded with three illustrative historical
/// incidents, matching the original example-incident bootstrap.
pub struct InMemoryIncidentStore {
    incidents: Vec<HistoricalIncident>,
}

impl InMemoryIncidentStore {
    pub fn seeded() -> Self {
        Self { incidents: seed_incidents() }
    }
}

#[async_trait]
impl IncidentStore for InMemoryIncidentStore {
    async fn find_similar(&self, signature: &IncidentSignature, top_k: usize) -> Vec<(HistoricalIncident, f64)> {
        let mut scored: Vec<(HistoricalIncident, f64)> = self
            .incidents
            .iter()
            .map(|incident| (incident.clone(), signature.similarity(&incident.signature)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

/// Local rule-table playbook provider: picks the highest-similarity
/// historical incident above a minimum bar and adapts its recorded
/// intervention into a recommendation. Never calls out to a network; never
/// fails hard (`recommend` returns `None` when nothing is similar enough).
pub struct RuleTablePlaybookProvider {
    store: InMemoryIncidentStore,
    min_similarity: f64,
}

impl RuleTablePlaybookProvider {
    pub fn new(min_similarity: f64) -> Self {
        Self { store: InMemoryIncidentStore::seeded(), min_similarity }
    }
}

#[async_trait]
impl PlaybookProvider for RuleTablePlaybookProvider {
    async fn recommend(&self, request: &PlaybookRequest) -> Option<PlaybookResponse> {
        let candidates = self.store.find_similar(&request.signature, 1).await;
        let (incident, score) = candidates.into_iter().next()?;
        if score < self.min_similarity {
            return None;
        }

        Some(PlaybookResponse {
            recommended_action: incident.intervention_taken.clone(),
            confidence: score,
            reasoning: format!("closest historical match ({:.0}% similar): {}", score * 100.0, incident.description),
            expected_outcome: incident.outcome.clone(),
            estimated_resolution_minutes: incident.resolution_time_minutes,
            key_learnings_applied: incident.lessons_learned.clone(),
            risk_factors: Vec::new(),
            rollback_plan: "revert to pre-intervention multipliers via Feedback Controller".to_string(),
            monitoring_metrics: vec!["success_rate".to_string(), "p95_latency_ms".to_string()],
        })
    }
}

fn seed_incidents() -> Vec<HistoricalIncident> {
    use std::collections::HashMap;

    vec![
        HistoricalIncident {
            incident_id: "INC-HDFC-BLACKFRIDAY".to_string(),
            signature: IncidentSignature {
                error_code: "E_503".to_string(),
                issuer: "HDFC".to_string(),
                payment_method: "card".to_string(),
                failure_rate: 0.45,
                time_of_day: "afternoon".to_string(),
                day_of_week: "friday".to_string(),
                season: "winter".to_string(),
            },
            timestamp: 1_700_000_000,
            description: "HDFC gateway outage during Black Friday peak traffic".to_string(),
            intervention_taken: "suppress_path".to_string(),
            outcome: "traffic rerouted, success rate recovered within 4 minutes".to_string(),
            success: true,
            resolution_time_minutes: 4,
            lessons_learned: vec!["pre-emptively reduce HDFC volume share during known peak windows".to_string()],
            telemetry: HashMap::new(),
        },
        HistoricalIncident {
            incident_id: "INC-ICICI-UPI-RETRY".to_string(),
            signature: IncidentSignature {
                error_code: "E_TIMEOUT".to_string(),
                issuer: "ICICI".to_string(),
                payment_method: "upi".to_string(),
                failure_rate: 0.3,
                time_of_day: "morning".to_string(),
                day_of_week: "monday".to_string(),
                season: "summer".to_string(),
            },
            timestamp: 1_705_000_000,
            description: "ICICI Monday-morning UPI retry storm from queued weekend transactions".to_string(),
            intervention_taken: "reduce_retry_attempts".to_string(),
            outcome: "retry volume dropped 60%, success rate stabilized in 8 minutes".to_string(),
            success: true,
            resolution_time_minutes: 8,
            lessons_learned: vec!["cap client-side retry backoff more aggressively on Monday mornings".to_string()],
            telemetry: HashMap::new(),
        },
        HistoricalIncident {
            incident_id: "INC-SBI-WALLET-FATIGUE".to_string(),
            signature: IncidentSignature {
                error_code: "E_DECLINE".to_string(),
                issuer: "SBI".to_string(),
                payment_method: "wallet".to_string(),
                failure_rate: 0.42,
                time_of_day: "evening".to_string(),
                day_of_week: "sunday".to_string(),
                season: "holiday".to_string(),
            },
            timestamp: 1_703_000_000,
            description: "SBI wallet method fatigue during holiday shopping surge".to_string(),
            intervention_taken: "reroute_traffic".to_string(),
            outcome: "method share shifted to card/UPI, overall success rate recovered in 6 minutes".to_string(),
            success: true,
            resolution_time_minutes: 6,
            lessons_learned: vec!["pre-register an alternate-method reroute target before holiday peaks".to_string()],
            telemetry: HashMap::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_signature(issuer: &str, error_code: &str) -> IncidentSignature {
        IncidentSignature {
            error_code: error_code.to_string(),
            issuer: issuer.to_string(),
            payment_method: "card".to_string(),
            failure_rate: 0.4,
            time_of_day: "afternoon".to_string(),
            day_of_week: "friday".to_string(),
            season: "winter".to_string(),
        }
    }

    #[tokio::test]
    async fn finds_exact_match_as_top_result() {
        let store = InMemoryIncidentStore::seeded();
        let results = store.find_similar(&make_signature("HDFC", "E_503"), 1).await;
        assert_eq!(results[0].0.incident_id, "INC-HDFC-BLACKFRIDAY");
    }

    #[tokio::test]
    async fn top_k_limits_result_count() {
        let store = InMemoryIncidentStore::seeded();
        let results = store.find_similar(&make_signature("HDFC", "E_503"), 2).await;
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn playbook_falls_back_to_none_below_similarity_bar() {
        let provider = RuleTablePlaybookProvider::new(0.99);
        let request = PlaybookRequest {
            signature: make_signature("UNKNOWN_ISSUER", "E_WEIRD"),
            similar_incidents: Vec::new(),
            current_telemetry: Default::default(),
        };
        assert!(provider.recommend(&request).await.is_none());
    }

    #[tokio::test]
    async fn playbook_recommends_closest_match_above_bar() {
        let provider = RuleTablePlaybookProvider::new(0.2);
        let request = PlaybookRequest {
            signature: make_signature("HDFC", "E_503"),
            similar_incidents: Vec::new(),
            current_telemetry: Default::default(),
        };
        let response = provider.recommend(&request).await.unwrap();
        assert_eq!(response.recommended_action, "suppress_path");
    }
}
