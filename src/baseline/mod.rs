//! Baseline Manager - Rolling Baselines & Z-Score Anomaly Support
//!
//! Keeps a `RollingBaseline` per dimension string (`issuer:<X>`,
//! `method:<Y>`, `global`) and folds each observation window's grouped
//! statistics into it via EWMA.
//!
//! ## Architecture
//!
//! - `RollingBaseline` (in `crate::types`): per-dimension EWMA mean/variance.
//! - `BaselineManager`: owns the dimension → RollingBaseline map.
//!
//! ## Usage
//!
//! ```ignore
//! let mut manager = BaselineManager::new(0.2);
//! manager.update_rolling_baselines(&transactions, now);
//! let z = manager.z("issuer:HDFC", Metric::SuccessRate, 0.80);
//! ```

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::types::{AggregateStats, Metric, RollingBaseline, Transaction};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("no baseline for dimension: {0}")]
    UnknownDimension(String),

    #[error("baseline for dimension {0} is not ready: have {1} samples, need {2}")]
    NotReady(String, u64, u64),
}

// ============================================================================
// Baseline Manager
// ============================================================================

pub struct BaselineManager {
    alpha: f64,
    baselines: HashMap<String, RollingBaseline>,
}

impl BaselineManager {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, baselines: HashMap::new() }
    }

    pub fn get(&self, dimension: &str) -> Option<&RollingBaseline> {
        self.baselines.get(dimension)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.baselines.keys().map(String::as_str)
    }

    /// Group `transactions` by `issuer:<X>`, `method:<Y>`, and `global`, and
    /// fold each non-empty group's (success_rate, avg_latency, avg_retry)
    /// into its `RollingBaseline`.
    pub fn update_rolling_baselines(&mut self, transactions: &[Transaction], now: i64) {
        if transactions.is_empty() {
            return;
        }

        let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
        groups.entry("global".to_string()).or_default().extend(transactions.iter());
        for txn in transactions {
            groups.entry(txn.issuer_dimension()).or_default().push(txn);
            groups.entry(txn.method_dimension()).or_default().push(txn);
        }

        for (dimension, group) in groups {
            if group.is_empty() {
                continue;
            }
            let owned: Vec<Transaction> = group.into_iter().cloned().collect();
            let stats = AggregateStats::compute(&owned);
            let baseline = self
                .baselines
                .entry(dimension.clone())
                .or_insert_with(|| RollingBaseline::new(dimension.clone(), self.alpha));
            baseline.observe(stats.success_rate, stats.avg_latency_ms, stats.avg_retry_count, now);
            debug!(dimension = %dimension, samples = baseline.sample_count, "baseline updated");
        }
    }

    /// `Z(value, metric)` for the given dimension. Returns 0.0 if the
    /// dimension has never been observed.
    pub fn z(&self, dimension: &str, metric: Metric, value: f64) -> f64 {
        self.baselines.get(dimension).map_or(0.0, |b| b.z(metric, value))
    }

    pub fn is_ready(&self, dimension: &str) -> bool {
        self.baselines.get(dimension).is_some_and(RollingBaseline::is_ready)
    }

    pub fn require_ready(&self, dimension: &str) -> Result<&RollingBaseline, BaselineError> {
        let baseline = self
            .baselines
            .get(dimension)
            .ok_or_else(|| BaselineError::UnknownDimension(dimension.to_string()))?;
        if !baseline.is_ready() {
            return Err(BaselineError::NotReady(dimension.to_string(), baseline.sample_count, crate::types::READY_SAMPLE_COUNT));
        }
        Ok(baseline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, PaymentMethod};

    fn make_txn(issuer: &str, outcome: Outcome, latency: f64) -> Transaction {
        Transaction {
            id: "t".to_string(),
            timestamp: 0,
            outcome,
            error_code: None,
            latency_ms: latency,
            retry_count: 0,
            payment_method: PaymentMethod::Upi,
            issuer: issuer.to_string(),
            merchant_id: "m".to_string(),
            amount: 10.0,
            geography: None,
        }
    }

    #[test]
    fn first_observation_initializes_mean_with_zero_variance() {
        let mut manager = BaselineManager::new(0.2);
        let txns = vec![make_txn("HDFC", Outcome::Success, 100.0)];
        manager.update_rolling_baselines(&txns, 1);
        let baseline = manager.get("issuer:HDFC").unwrap();
        assert_eq!(baseline.success_rate.mean, 1.0);
        assert_eq!(baseline.success_rate.variance, 0.0);
    }

    #[test]
    fn creates_global_and_method_groups_too() {
        let mut manager = BaselineManager::new(0.2);
        let txns = vec![make_txn("HDFC", Outcome::Success, 100.0)];
        manager.update_rolling_baselines(&txns, 1);
        assert!(manager.get("global").is_some());
        assert!(manager.get("method:upi").is_some());
    }

    #[test]
    fn becomes_ready_after_three_samples() {
        let mut manager = BaselineManager::new(0.2);
        for i in 0..3 {
            let txns = vec![make_txn("HDFC", Outcome::Success, 100.0)];
            manager.update_rolling_baselines(&txns, i);
        }
        assert!(manager.is_ready("issuer:HDFC"));
    }

    #[test]
    fn not_ready_returns_error_before_three_samples() {
        let mut manager = BaselineManager::new(0.2);
        let txns = vec![make_txn("HDFC", Outcome::Success, 100.0)];
        manager.update_rolling_baselines(&txns, 0);
        assert!(manager.require_ready("issuer:HDFC").is_err());
    }

    #[test]
    fn unknown_dimension_has_zero_z_score() {
        let manager = BaselineManager::new(0.2);
        assert_eq!(manager.z("issuer:NOPE", Metric::SuccessRate, 0.5), 0.0);
    }

    #[test]
    fn empty_transaction_slice_is_a_no_op() {
        let mut manager = BaselineManager::new(0.2);
        manager.update_rolling_baselines(&[], 0);
        assert!(manager.dimensions().next().is_none());
    }
}
