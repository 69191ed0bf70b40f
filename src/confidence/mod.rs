//! Confidence scoring for detected anomalies.
//!
//! Weights: sample-size 30%, consistency 40%, baseline-deviation 30%.

use std::collections::HashMap;

use crate::types::Transaction;

/// Score confidence for a set of failed transactions against a Z-score.
///
/// `min_sample_size` defaults to 50 per the original scorer.
pub fn score_confidence(failed: &[&Transaction], z_score: f64, min_sample_size: usize) -> f64 {
    let s = score_sample_size(failed.len(), min_sample_size);
    let c = score_consistency(failed);
    let b = score_baseline_deviation(z_score);
    0.3 * s + 0.4 * c + 0.3 * b
}

/// S: min(1, failed_count / min_sample_size).
fn score_sample_size(failed_count: usize, min_sample_size: usize) -> f64 {
    if min_sample_size == 0 {
        return 1.0;
    }
    (failed_count as f64 / min_sample_size as f64).min(1.0)
}

/// C: share of failed transactions whose error_code equals the modal value.
/// 0 if there are no failures.
fn score_consistency(failed: &[&Transaction]) -> f64 {
    if failed.is_empty() {
        return 0.0;
    }
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for txn in failed {
        let key = txn.error_code.as_deref().unwrap_or("unknown");
        *counts.entry(key).or_insert(0) += 1;
    }
    let modal_count = counts.values().copied().max().unwrap_or(0);
    modal_count as f64 / failed.len() as f64
}

/// B: piecewise in Z. Z <= 1 => 0, Z >= 3 => 1, otherwise (Z-1)/2.
fn score_baseline_deviation(z_score: f64) -> f64 {
    if z_score <= 1.0 {
        0.0
    } else if z_score >= 3.0 {
        1.0
    } else {
        (z_score - 1.0) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, PaymentMethod};

    fn make_failed(error_code: &str) -> Transaction {
        Transaction {
            id: "t".to_string(),
            timestamp: 0,
            outcome: Outcome::HardFail,
            error_code: Some(error_code.to_string()),
            latency_ms: 500.0,
            retry_count: 1,
            payment_method: PaymentMethod::Card,
            issuer: "HDFC".to_string(),
            merchant_id: "m".to_string(),
            amount: 10.0,
            geography: None,
        }
    }

    #[test]
    fn no_failures_has_zero_consistency() {
        assert_eq!(score_consistency(&[]), 0.0);
    }

    #[test]
    fn uniform_error_code_is_fully_consistent() {
        let a = make_failed("E_503");
        let b = make_failed("E_503");
        let failed = vec![&a, &b];
        assert_eq!(score_consistency(&failed), 1.0);
    }

    #[test]
    fn baseline_deviation_is_zero_at_or_below_one() {
        assert_eq!(score_baseline_deviation(0.5), 0.0);
        assert_eq!(score_baseline_deviation(1.0), 0.0);
    }

    #[test]
    fn baseline_deviation_saturates_at_three() {
        assert_eq!(score_baseline_deviation(3.0), 1.0);
        assert_eq!(score_baseline_deviation(5.0), 1.0);
    }

    #[test]
    fn baseline_deviation_is_linear_between_one_and_three() {
        assert_eq!(score_baseline_deviation(2.0), 0.5);
    }

    #[test]
    fn sample_size_saturates_at_min_sample_size() {
        assert_eq!(score_sample_size(100, 50), 1.0);
        assert_eq!(score_sample_size(25, 50), 0.5);
    }

    #[test]
    fn overall_score_is_weighted_combination() {
        let a = make_failed("E_503");
        let failed = vec![&a];
        let score = score_confidence(&failed, 3.0, 50);
        // S = 1/50 = 0.02, C = 1.0, B = 1.0
        let expected = 0.3 * 0.02 + 0.4 * 1.0 + 0.3 * 1.0;
        assert!((score - expected).abs() < 1e-9);
    }
}
