//! Pattern Detector — structural checks run over the windowed transactions.

use std::collections::HashMap;

use crate::types::{DetectedPattern, Evidence, Outcome, PatternKind, Transaction};

const RETRY_STORM_MIN_TRANSACTIONS: usize = 5;
const RETRY_STORM_AVG_THRESHOLD: f64 = 2.0;
const RETRY_STORM_HIGH_RETRY_PCT_THRESHOLD: f64 = 0.2;
const RETRY_STORM_HIGH_RETRY_MIN: u32 = 3;

const ISSUER_DEGRADATION_MIN_TRANSACTIONS: usize = 5;
const ISSUER_DEGRADATION_FAILURE_RATE_THRESHOLD: f64 = 0.20;

const METHOD_FATIGUE_MIN_TRANSACTIONS: usize = 10;
const METHOD_FATIGUE_FAILURE_RATE_THRESHOLD: f64 = 0.40;

/// Run all three structural checks against the current window.
pub fn detect_patterns(transactions: &[Transaction], now: i64) -> Vec<DetectedPattern> {
    let mut patterns = Vec::new();
    if let Some(p) = detect_retry_storm(transactions, now) {
        patterns.push(p);
    }
    patterns.extend(detect_issuer_degradation(transactions, now));
    patterns.extend(detect_method_fatigue(transactions, now));
    patterns
}

fn failure_rate(transactions: &[&Transaction]) -> f64 {
    if transactions.is_empty() {
        return 0.0;
    }
    let failed = transactions.iter().filter(|t| !t.outcome.is_success()).count();
    failed as f64 / transactions.len() as f64
}

fn detect_retry_storm(transactions: &[Transaction], now: i64) -> Option<DetectedPattern> {
    if transactions.len() < RETRY_STORM_MIN_TRANSACTIONS {
        return None;
    }
    let avg_retry: f64 =
        transactions.iter().map(|t| f64::from(t.retry_count)).sum::<f64>() / transactions.len() as f64;
    let high_retry_count = transactions.iter().filter(|t| t.retry_count >= RETRY_STORM_HIGH_RETRY_MIN).count();
    let high_retry_pct = high_retry_count as f64 / transactions.len() as f64;

    if avg_retry <= RETRY_STORM_AVG_THRESHOLD && high_retry_pct <= RETRY_STORM_HIGH_RETRY_PCT_THRESHOLD {
        return None;
    }

    let severity = (avg_retry / (2.0 * RETRY_STORM_AVG_THRESHOLD)).max(high_retry_pct).min(1.0);
    Some(DetectedPattern {
        kind: PatternKind::RetryStorm,
        affected_dimension: "global".to_string(),
        severity,
        evidence: vec![Evidence {
            kind: "retry_storm".to_string(),
            description: format!("avg retry count {avg_retry:.2}, {high_retry_pct:.0%} with retry >= {RETRY_STORM_HIGH_RETRY_MIN}"),
            value: avg_retry,
            source: "pattern_detector".to_string(),
            timestamp: now,
        }],
        detected_at: now,
    })
}

fn detect_issuer_degradation(transactions: &[Transaction], now: i64) -> Vec<DetectedPattern> {
    let mut by_issuer: HashMap<&str, Vec<&Transaction>> = HashMap::new();
    for txn in transactions {
        by_issuer.entry(txn.issuer.as_str()).or_default().push(txn);
    }

    by_issuer
        .into_iter()
        .filter(|(_, group)| group.len() >= ISSUER_DEGRADATION_MIN_TRANSACTIONS)
        .filter_map(|(issuer, group)| {
            let rate = failure_rate(&group);
            if rate <= ISSUER_DEGRADATION_FAILURE_RATE_THRESHOLD {
                return None;
            }
            Some(DetectedPattern {
                kind: PatternKind::IssuerDegradation,
                affected_dimension: format!("issuer:{issuer}"),
                severity: rate,
                evidence: vec![Evidence {
                    kind: "issuer_degradation".to_string(),
                    description: format!("issuer {issuer} failure rate {rate:.2} over {} txns", group.len()),
                    value: rate,
                    source: "pattern_detector".to_string(),
                    timestamp: now,
                }],
                detected_at: now,
            })
        })
        .collect()
}

fn detect_method_fatigue(transactions: &[Transaction], now: i64) -> Vec<DetectedPattern> {
    let mut by_method: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for txn in transactions {
        by_method.entry(txn.payment_method.to_string()).or_default().push(txn);
    }

    by_method
        .into_iter()
        .filter(|(_, group)| group.len() >= METHOD_FATIGUE_MIN_TRANSACTIONS)
        .filter_map(|(method, group)| {
            let rate = failure_rate(&group);
            if rate <= METHOD_FATIGUE_FAILURE_RATE_THRESHOLD {
                return None;
            }
            Some(DetectedPattern {
                kind: PatternKind::MethodFatigue,
                affected_dimension: format!("method:{method}"),
                severity: rate,
                evidence: vec![Evidence {
                    kind: "method_fatigue".to_string(),
                    description: format!("method {method} failure rate {rate:.2} over {} txns", group.len()),
                    value: rate,
                    source: "pattern_detector".to_string(),
                    timestamp: now,
                }],
                detected_at: now,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PaymentMethod;

    fn make_txn(issuer: &str, method: PaymentMethod, outcome: Outcome, retry_count: u32) -> Transaction {
        Transaction {
            id: "t".to_string(),
            timestamp: 0,
            outcome,
            error_code: if outcome.is_success() { None } else { Some("E_FAIL".to_string()) },
            latency_ms: 100.0,
            retry_count,
            payment_method: method,
            issuer: issuer.to_string(),
            merchant_id: "m".to_string(),
            amount: 10.0,
            geography: None,
        }
    }

    #[test]
    fn no_patterns_under_thresholds() {
        let txns: Vec<Transaction> = (0..5).map(|_| make_txn("HDFC", PaymentMethod::Card, Outcome::Success, 0)).collect();
        assert!(detect_patterns(&txns, 0).is_empty());
    }

    #[test]
    fn retry_storm_fires_on_high_average_retries() {
        let txns: Vec<Transaction> = (0..5).map(|_| make_txn("HDFC", PaymentMethod::Card, Outcome::Success, 4)).collect();
        let patterns = detect_patterns(&txns, 0);
        assert!(patterns.iter().any(|p| p.kind == PatternKind::RetryStorm));
    }

    #[test]
    fn issuer_degradation_requires_five_transactions() {
        let mut txns: Vec<Transaction> = (0..4).map(|_| make_txn("HDFC", PaymentMethod::Card, Outcome::HardFail, 0)).collect();
        assert!(detect_issuer_degradation(&txns, 0).is_empty());
        txns.push(make_txn("HDFC", PaymentMethod::Card, Outcome::HardFail, 0));
        assert!(!detect_issuer_degradation(&txns, 0).is_empty());
    }

    #[test]
    fn method_fatigue_requires_ten_transactions_and_forty_percent_failure() {
        let mut txns: Vec<Transaction> = (0..8).map(|_| make_txn("HDFC", PaymentMethod::Upi, Outcome::HardFail, 0)).collect();
        txns.extend((0..2).map(|_| make_txn("HDFC", PaymentMethod::Upi, Outcome::Success, 0)));
        let patterns = detect_method_fatigue(&txns, 0);
        assert!(patterns.iter().any(|p| p.kind == PatternKind::MethodFatigue));
    }

    #[test]
    fn exactly_one_pattern_per_deviating_dimension() {
        let txns: Vec<Transaction> = (0..6).map(|_| make_txn("HDFC", PaymentMethod::Card, Outcome::HardFail, 0)).collect();
        let patterns = detect_issuer_degradation(&txns, 0);
        assert_eq!(patterns.iter().filter(|p| p.affected_dimension == "issuer:HDFC").count(), 1);
    }
}
