//! Observation Window — a time-bounded slice of the transaction stream with
//! cached aggregate statistics.

use crate::config::defaults::MIN_WINDOW_SAMPLE_SIZE;
use crate::types::{AggregateStats, Transaction};

pub struct ObservationWindow {
    duration_ms: i64,
    transactions: Vec<Transaction>,
    cached_stats: AggregateStats,
}

impl ObservationWindow {
    pub fn new(duration_ms: i64) -> Self {
        Self {
            duration_ms,
            transactions: Vec::new(),
            cached_stats: AggregateStats::default(),
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn stats(&self) -> &AggregateStats {
        &self.cached_stats
    }

    /// Recompute the window's contents from the full upstream buffer and
    /// cache fresh aggregate stats.
    ///
    /// Degeneracy rule: if fewer than `MIN_WINDOW_SAMPLE_SIZE` transactions
    /// fall inside `[now - duration_ms, now]` but the upstream buffer holds
    /// at least that many, fall back to the most recent
    /// `MIN_WINDOW_SAMPLE_SIZE` transactions regardless of time, to
    /// guarantee statistical sample size during warm-up.
    pub fn update<'a>(&mut self, upstream: impl Iterator<Item = &'a Transaction>, now: i64) {
        let all: Vec<&Transaction> = upstream.collect();
        let cutoff = now - self.duration_ms;
        let windowed: Vec<&Transaction> = all.iter().filter(|t| t.timestamp >= cutoff && t.timestamp <= now).copied().collect();

        let selected: Vec<Transaction> = if windowed.len() < MIN_WINDOW_SAMPLE_SIZE && all.len() >= MIN_WINDOW_SAMPLE_SIZE {
            all[all.len() - MIN_WINDOW_SAMPLE_SIZE..].iter().map(|t| (*t).clone()).collect()
        } else {
            windowed.into_iter().cloned().collect()
        };

        self.cached_stats = AggregateStats::compute(&selected);
        self.transactions = selected;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Outcome, PaymentMethod};

    fn make_txn(id: &str, timestamp: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            timestamp,
            outcome: Outcome::Success,
            error_code: None,
            latency_ms: 100.0,
            retry_count: 0,
            payment_method: PaymentMethod::Card,
            issuer: "HDFC".to_string(),
            merchant_id: "m".to_string(),
            amount: 10.0,
            geography: None,
        }
    }

    #[test]
    fn filters_by_time_window() {
        let mut window = ObservationWindow::new(1000);
        let txns: Vec<Transaction> = (0..60).map(|i| make_txn(&i.to_string(), i * 10)).collect();
        window.update(txns.iter(), 590);
        assert!(window.transactions().iter().all(|t| t.timestamp >= -410 && t.timestamp <= 590));
    }

    #[test]
    fn falls_back_to_last_n_when_window_is_sparse() {
        let mut window = ObservationWindow::new(1);
        let txns: Vec<Transaction> = (0..60).map(|i| make_txn(&i.to_string(), i * 1000)).collect();
        window.update(txns.iter(), 59_000);
        assert_eq!(window.transactions().len(), MIN_WINDOW_SAMPLE_SIZE);
    }

    #[test]
    fn caches_stats_until_next_update() {
        let mut window = ObservationWindow::new(100_000);
        let txns: Vec<Transaction> = (0..10).map(|i| make_txn(&i.to_string(), i * 10)).collect();
        window.update(txns.iter(), 100);
        assert_eq!(window.stats().total, 10);
    }
}
