//! Continuous Generator — synthesizes a transaction stream from drift state.
//!
//! Owns a capacity-bounded ring buffer (drop-oldest on overflow) and a
//! volume/success/retry multiplier table that only the Feedback Controller
//! is allowed to mutate.

use std::collections::{HashMap, VecDeque};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use uuid::Uuid;

use crate::config::defaults::{LATENCY_NOISE_FRACTION, MAX_RETRY_COUNT, RETRY_EXPONENTIAL_MEAN, SOFT_FAIL_PROBABILITY};
use crate::types::{IssuerState, Outcome, PaymentMethod, Transaction};

/// Per-issuer multipliers applied on top of drifted state. Neutral values
/// leave the underlying drift untouched. Retry is not tracked here: it is a
/// single global scalar (`Generator::retry_multiplier`), since every retry-
/// tuning intervention targets `"global"` rather than a specific issuer.
#[derive(Debug, Clone, Copy)]
pub struct IssuerMultipliers {
    pub volume: f64,
    pub success: f64,
}

impl Default for IssuerMultipliers {
    fn default() -> Self {
        Self { volume: 1.0, success: 1.0 }
    }
}

pub struct Generator {
    buffer: VecDeque<Transaction>,
    capacity: usize,
    rate_per_sec: f64,
    methods: Vec<PaymentMethod>,
    multipliers: HashMap<String, IssuerMultipliers>,
    retry_multiplier: f64,
    rng: StdRng,
}

impl Generator {
    pub fn new(capacity: usize, rate_per_sec: f64, seed: u64) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            rate_per_sec,
            methods: vec![
                PaymentMethod::Card,
                PaymentMethod::Upi,
                PaymentMethod::Wallet,
                PaymentMethod::NetBanking,
            ],
            multipliers: HashMap::new(),
            retry_multiplier: 1.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn buffer(&self) -> &VecDeque<Transaction> {
        &self.buffer
    }

    /// Mutate an issuer's volume/success multipliers. Only the Feedback
    /// Controller should call this in practice; the generator itself never
    /// calls it.
    pub fn set_multipliers(&mut self, issuer: &str, multipliers: IssuerMultipliers) {
        self.multipliers.insert(issuer.to_string(), multipliers);
    }

    /// Set the global retry multiplier applied uniformly to every issuer,
    /// independent of whether that issuer has a per-issuer entry.
    pub fn set_retry_multiplier(&mut self, multiplier: f64) {
        self.retry_multiplier = multiplier;
    }

    /// Reset every tracked issuer's multipliers, and the global retry
    /// multiplier, to neutral.
    pub fn clear_multipliers(&mut self) {
        self.multipliers.clear();
        self.retry_multiplier = 1.0;
    }

    fn multipliers_for(&self, issuer: &str) -> IssuerMultipliers {
        self.multipliers.get(issuer).copied().unwrap_or_default()
    }

    /// Emit ⌈rate · dt⌉ transactions (at least 1 if dt > 0) spread evenly
    /// across the `dt` window, appending each to the ring buffer.
    pub fn generate_next_batch(
        &mut self,
        states: &HashMap<String, IssuerState>,
        dt: f64,
        window_start: i64,
    ) -> Vec<Transaction> {
        if dt <= 0.0 || states.is_empty() {
            return Vec::new();
        }
        let count = ((self.rate_per_sec * dt).ceil() as usize).max(1);
        let issuers: Vec<&String> = states.keys().collect();
        let mut emitted = Vec::with_capacity(count);

        for i in 0..count {
            let issuer = self.pick_issuer(&issuers, states);
            let state = &states[issuer];
            let mult = self.multipliers_for(issuer);
            let txn = self.synthesize(issuer, state, &mult, window_start, dt, i, count);
            self.push(txn.clone());
            emitted.push(txn);
        }
        emitted
    }

    fn pick_issuer<'a>(&mut self, issuers: &[&'a String], states: &HashMap<String, IssuerState>) -> &'a str {
        let weights: Vec<f64> = issuers
            .iter()
            .map(|i| self.multipliers_for(i).volume.max(0.0))
            .collect();
        let total: f64 = weights.iter().sum();

        let idx = if total <= 0.0 {
            self.rng.gen_range(0..issuers.len())
        } else {
            let mut roll = self.rng.gen_range(0.0..total);
            let mut chosen = issuers.len() - 1;
            for (i, w) in weights.iter().enumerate() {
                if roll < *w {
                    chosen = i;
                    break;
                }
                roll -= w;
            }
            chosen
        };
        let _ = states;
        issuers[idx].as_str()
    }

    fn synthesize(
        &mut self,
        issuer: &str,
        state: &IssuerState,
        mult: &IssuerMultipliers,
        window_start: i64,
        dt: f64,
        index: usize,
        count: usize,
    ) -> Transaction {
        let effective_success = (state.success_rate * mult.success).clamp(0.0, 1.0);
        let outcome_roll: f64 = self.rng.gen_range(0.0..1.0);
        let outcome = if outcome_roll < effective_success {
            Outcome::Success
        } else if self.rng.gen_range(0.0..1.0) < SOFT_FAIL_PROBABILITY {
            Outcome::SoftFail
        } else {
            Outcome::HardFail
        };

        let noise = self.rng.gen_range(-LATENCY_NOISE_FRACTION..LATENCY_NOISE_FRACTION);
        let latency_ms = (state.latency_ms * (1.0 + noise)).clamp(50.0, 2000.0);

        let effective_retry_prob = (state.retry_probability * self.retry_multiplier).clamp(0.0, 1.0);
        let retry_count = if self.rng.gen_range(0.0..1.0) < effective_retry_prob {
            let exp = Exp::new(1.0 / RETRY_EXPONENTIAL_MEAN).expect("positive rate");
            let draw: f64 = exp.sample(&mut self.rng);
            (draw.round() as u32).min(MAX_RETRY_COUNT)
        } else {
            0
        };

        let method = self.methods[self.rng.gen_range(0..self.methods.len())];
        let offset_ms = if count > 1 {
            ((index as f64) / (count as f64) * dt * 1000.0) as i64
        } else {
            0
        };
        let error_code = if outcome.is_success() { None } else { Some("E_DECLINE".to_string()) };

        Transaction {
            id: Uuid::new_v4().to_string(),
            timestamp: window_start + offset_ms,
            outcome,
            error_code,
            latency_ms,
            retry_count,
            payment_method: method,
            issuer: issuer.to_string(),
            merchant_id: "m-sim".to_string(),
            amount: 100.0,
            geography: None,
        }
    }

    fn push(&mut self, txn: Transaction) {
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(txn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_states() -> HashMap<String, IssuerState> {
        let mut m = HashMap::new();
        m.insert("HDFC".to_string(), IssuerState::new("HDFC", 0.95, 150.0, 0.05, 0));
        m
    }

    #[test]
    fn generates_at_least_one_transaction_for_positive_dt() {
        let mut gen = Generator::new(100, 1.0, 1);
        let batch = gen.generate_next_batch(&make_states(), 0.5, 0);
        assert!(!batch.is_empty());
    }

    #[test]
    fn zero_dt_yields_nothing() {
        let mut gen = Generator::new(100, 1.0, 1);
        let batch = gen.generate_next_batch(&make_states(), 0.0, 0);
        assert!(batch.is_empty());
    }

    #[test]
    fn buffer_drops_oldest_on_overflow() {
        let mut gen = Generator::new(3, 10.0, 2);
        for _ in 0..5 {
            gen.generate_next_batch(&make_states(), 1.0, 0);
        }
        assert!(gen.buffer().len() <= 3);
    }

    #[test]
    fn clear_multipliers_resets_to_neutral() {
        let mut gen = Generator::new(10, 1.0, 1);
        gen.set_multipliers("HDFC", IssuerMultipliers { volume: 2.0, success: 0.5 });
        gen.set_retry_multiplier(3.0);
        gen.clear_multipliers();
        assert_eq!(gen.multipliers_for("HDFC").volume, 1.0);
        assert_eq!(gen.retry_multiplier, 1.0);
    }

    #[test]
    fn retry_multiplier_applies_independent_of_per_issuer_map() {
        let mut gen = Generator::new(10, 1.0, 1);
        gen.set_retry_multiplier(0.5);
        assert!(gen.multipliers.is_empty());
        assert_eq!(gen.retry_multiplier, 0.5);
    }

    #[test]
    fn latency_stays_within_clamp_range() {
        let mut gen = Generator::new(200, 50.0, 9);
        let batch = gen.generate_next_batch(&make_states(), 2.0, 0);
        for txn in &batch {
            assert!(txn.latency_ms >= 50.0 && txn.latency_ms <= 2000.0);
        }
    }
}
