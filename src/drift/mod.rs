//! Drift Engine — mean-reverting stochastic simulation of per-issuer health.
//!
//! Advances each tracked issuer's success rate, latency, and retry
//! probability with a discretized Ornstein-Uhlenbeck process. The engine is
//! the sole mutator of `IssuerState`; every other component only reads it.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;

use crate::config::{DriftConfig, DriftParams};
use crate::types::IssuerState;

#[derive(Debug, Error)]
pub enum DriftError {
    #[error("unknown issuer: {0}")]
    UnknownIssuer(String),
}

/// Advances issuer drift state under the configured OU parameters.
pub struct DriftEngine {
    config: DriftConfig,
    states: HashMap<String, IssuerState>,
    rng: StdRng,
}

impl DriftEngine {
    /// Build an engine seeded with the given issuers at their configured
    /// mean values, using a deterministic RNG seed for reproducible tests.
    pub fn new(config: DriftConfig, issuers: &[String], seed: u64, now: i64) -> Self {
        let mut states = HashMap::with_capacity(issuers.len());
        for issuer in issuers {
            states.insert(
                issuer.clone(),
                IssuerState::new(
                    issuer.clone(),
                    config.success_rate.mean,
                    config.latency.mean,
                    config.retry_probability.mean,
                    now,
                ),
            );
        }
        Self {
            config,
            states,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn states(&self) -> &HashMap<String, IssuerState> {
        &self.states
    }

    pub fn state(&self, issuer: &str) -> Option<&IssuerState> {
        self.states.get(issuer)
    }

    /// Demo-only: force-overwrite one issuer's success rate and retry
    /// probability to simulate an outage, bypassing the OU process for one
    /// tick. Never called outside `demo_mode` (§4.16).
    pub fn force_degrade(&mut self, issuer: &str, now: i64) {
        if let Some(state) = self.states.get_mut(issuer) {
            state.success_rate = 0.3;
            state.retry_probability = crate::types::RETRY_PROBABILITY_RANGE.1;
            state.last_updated = now;
        }
    }

    /// Advance every tracked issuer by `dt` seconds (scaled by `time_scale`).
    pub fn update(&mut self, dt: f64, now: i64) {
        let scaled_dt = dt * self.config.time_scale.max(0.0);
        if scaled_dt <= 0.0 {
            return;
        }
        let drift = self.config.clone();
        for state in self.states.values_mut() {
            Self::step_dimension_success(state, &drift.success_rate, scaled_dt, &mut self.rng);
            Self::step_dimension_latency(state, &drift.latency, scaled_dt, &mut self.rng);
            Self::step_retry_probability(state, &drift, scaled_dt, &mut self.rng);
            state.last_updated = now;
        }
    }

    fn ou_step(x: f64, params: &DriftParams, dt: f64, rng: &mut StdRng) -> f64 {
        let normal = Normal::new(0.0, 1.0).expect("unit normal is always valid");
        let noise: f64 = normal.sample(rng);
        x + params.theta * (params.mean - x) * dt + params.sigma * dt.sqrt() * noise
    }

    fn step_dimension_success(state: &mut IssuerState, params: &DriftParams, dt: f64, rng: &mut StdRng) {
        let next = Self::ou_step(state.success_rate, params, dt, rng);
        state.success_rate = next.clamp(crate::types::SUCCESS_RATE_RANGE.0, crate::types::SUCCESS_RATE_RANGE.1);
    }

    fn step_dimension_latency(state: &mut IssuerState, params: &DriftParams, dt: f64, rng: &mut StdRng) {
        let next = Self::ou_step(state.latency_ms, params, dt, rng);
        state.latency_ms = next.clamp(crate::types::LATENCY_RANGE_MS.0, crate::types::LATENCY_RANGE_MS.1);
    }

    /// Retry probability follows the OU drift plus a Poisson-like spike: with
    /// probability `retry_spike_prob * dt` per tick, jump up by
    /// `retry_spike_magnitude`; otherwise decay multiplicatively toward 0 in
    /// addition to the OU term.
    fn step_retry_probability(state: &mut IssuerState, config: &DriftConfig, dt: f64, rng: &mut StdRng) {
        let drifted = Self::ou_step(state.retry_probability, &config.retry_probability, dt, rng);
        let spike_roll: f64 = rng.gen_range(0.0..1.0);
        let next = if spike_roll < config.retry_spike_prob * dt {
            drifted + config.retry_spike_magnitude
        } else {
            drifted * (1.0 - config.retry_decay_rate * dt)
        };
        state.retry_probability = next.clamp(
            crate::types::RETRY_PROBABILITY_RANGE.0,
            crate::types::RETRY_PROBABILITY_RANGE.1,
        );
    }
}
