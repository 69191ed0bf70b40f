//! AggregateStats — summary statistics derivable purely from a transaction slice.

use super::transaction::{Outcome, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregateStats {
    pub total: usize,
    pub success_count: usize,
    pub soft_fail_count: usize,
    pub hard_fail_count: usize,
    pub success_rate: f64,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub p99_latency_ms: f64,
    pub avg_retry_count: f64,
    pub unique_issuers: usize,
    pub unique_methods: usize,
}

impl AggregateStats {
    /// Compute aggregate statistics from a slice of transactions.
    ///
    /// Percentiles use nearest-rank on the sorted latency vector.
    pub fn compute(transactions: &[Transaction]) -> Self {
        if transactions.is_empty() {
            return Self::default();
        }

        let total = transactions.len();
        let mut success_count = 0usize;
        let mut soft_fail_count = 0usize;
        let mut hard_fail_count = 0usize;
        let mut latency_sum = 0.0;
        let mut retry_sum = 0u64;
        let mut issuers = HashSet::new();
        let mut methods = HashSet::new();
        let mut latencies = Vec::with_capacity(total);

        for txn in transactions {
            match txn.outcome {
                Outcome::Success => success_count += 1,
                Outcome::SoftFail => soft_fail_count += 1,
                Outcome::HardFail => hard_fail_count += 1,
            }
            latency_sum += txn.latency_ms;
            retry_sum += u64::from(txn.retry_count);
            issuers.insert(txn.issuer.clone());
            methods.insert(txn.payment_method);
            latencies.push(txn.latency_ms);
        }

        latencies.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        Self {
            total,
            success_count,
            soft_fail_count,
            hard_fail_count,
            success_rate: success_count as f64 / total as f64,
            avg_latency_ms: latency_sum / total as f64,
            p95_latency_ms: nearest_rank_percentile(&latencies, 0.95),
            p99_latency_ms: nearest_rank_percentile(&latencies, 0.99),
            avg_retry_count: retry_sum as f64 / total as f64,
            unique_issuers: issuers.len(),
            unique_methods: methods.len(),
        }
    }
}

/// Nearest-rank percentile over an already-sorted slice.
pub fn nearest_rank_percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p * sorted.len() as f64).ceil() as usize;
    let idx = rank.clamp(1, sorted.len()) - 1;
    sorted[idx]
}
