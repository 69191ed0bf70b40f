//! Anomaly Detector — Z-score based pattern emission over baselines.

use crate::baseline::BaselineManager;
use crate::confidence;
use crate::types::{AggregateStats, DetectedPattern, Evidence, Metric, PatternKind, Transaction};

const MIN_TRANSACTIONS_TO_FIRE: usize = 10;
const LATENCY_SPIKE_MULTIPLIER: f64 = 1.5;

/// Detect success-rate and latency anomalies for a single dimension.
///
/// `dimension` determines the emitted pattern kind: dimensions starting
/// with `"issuer"` emit `IssuerDegradation`, everything else
/// `LocalizedFailure`.
pub fn detect_anomalies(
    baselines: &BaselineManager,
    dimension: &str,
    current: &AggregateStats,
    baseline_p95: f64,
    failed: &[&Transaction],
    anomaly_threshold: f64,
    now: i64,
) -> Vec<DetectedPattern> {
    if current.total < MIN_TRANSACTIONS_TO_FIRE {
        return Vec::new();
    }
    if !baselines.is_ready(dimension) {
        return Vec::new();
    }

    let mut patterns = Vec::new();

    let z = baselines.z(dimension, Metric::SuccessRate, current.success_rate);
    if z >= anomaly_threshold {
        let severity = if failed.is_empty() {
            (z / (2.0 * anomaly_threshold)).min(1.0)
        } else {
            confidence::score_confidence(failed, z, crate::config::defaults::DEFAULT_MIN_SAMPLE_SIZE)
        };
        let kind = if dimension.starts_with("issuer") {
            PatternKind::IssuerDegradation
        } else {
            PatternKind::LocalizedFailure
        };
        patterns.push(DetectedPattern {
            kind,
            affected_dimension: dimension.to_string(),
            severity,
            evidence: vec![Evidence {
                kind: "z_score".to_string(),
                description: format!("success-rate z-score {z:.2} on {dimension}"),
                value: z,
                source: "anomaly_detector".to_string(),
                timestamp: now,
            }],
            detected_at: now,
        });
    }

    if baseline_p95 > 0.0 && current.p95_latency_ms > LATENCY_SPIKE_MULTIPLIER * baseline_p95 {
        let severity = ((current.p95_latency_ms / baseline_p95 - 1.0) / 2.0).min(1.0);
        patterns.push(DetectedPattern {
            kind: PatternKind::LatencySpike,
            affected_dimension: dimension.to_string(),
            severity,
            evidence: vec![Evidence {
                kind: "latency_spike".to_string(),
                description: format!("p95 latency {:.0}ms vs baseline {baseline_p95:.0}ms", current.p95_latency_ms),
                value: current.p95_latency_ms,
                source: "anomaly_detector".to_string(),
                timestamp: now,
            }],
            detected_at: now,
        });
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, PaymentMethod, Transaction};

    fn make_txn(issuer: &str, outcome: Outcome) -> Transaction {
        Transaction {
            id: "t".to_string(),
            timestamp: 0,
            outcome,
            error_code: if outcome.is_success() { None } else { Some("E_FAIL".to_string()) },
            latency_ms: 100.0,
            retry_count: 0,
            payment_method: PaymentMethod::Card,
            issuer: issuer.to_string(),
            merchant_id: "m".to_string(),
            amount: 10.0,
            geography: None,
        }
    }

    fn make_ready_baseline() -> BaselineManager {
        let mut manager = BaselineManager::new(0.2);
        for i in 0..5 {
            let txns: Vec<Transaction> = (0..10).map(|_| make_txn("HDFC", Outcome::Success)).collect();
            manager.update_rolling_baselines(&txns, i);
        }
        manager
    }

    #[test]
    fn requires_ten_transactions_to_fire() {
        let manager = make_ready_baseline();
        let few: Vec<Transaction> = (0..5).map(|_| make_txn("HDFC", Outcome::HardFail)).collect();
        let stats = AggregateStats::compute(&few);
        let patterns = detect_anomalies(&manager, "issuer:HDFC", &stats, 100.0, &[], 2.0, 10);
        assert!(patterns.is_empty());
    }

    #[test]
    fn requires_ready_baseline() {
        let manager = BaselineManager::new(0.2);
        let txns: Vec<Transaction> = (0..15).map(|_| make_txn("HDFC", Outcome::HardFail)).collect();
        let stats = AggregateStats::compute(&txns);
        let patterns = detect_anomalies(&manager, "issuer:HDFC", &stats, 100.0, &[], 2.0, 10);
        assert!(patterns.is_empty());
    }

    #[test]
    fn emits_issuer_degradation_for_issuer_dimension() {
        let manager = make_ready_baseline();
        let txns: Vec<Transaction> = (0..15).map(|_| make_txn("HDFC", Outcome::HardFail)).collect();
        let stats = AggregateStats::compute(&txns);
        let failed: Vec<&Transaction> = txns.iter().collect();
        let patterns = detect_anomalies(&manager, "issuer:HDFC", &stats, 100.0, &failed, 2.0, 10);
        assert!(patterns.iter().any(|p| p.kind == PatternKind::IssuerDegradation));
    }
}
