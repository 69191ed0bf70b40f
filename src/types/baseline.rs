//! RollingBaseline — per-dimension EWMA mean/variance tracker.

use serde::{Deserialize, Serialize};

/// Minimum standard-deviation floor for the success-rate metric.
pub const SUCCESS_RATE_STD_FLOOR: f64 = 0.01;
/// Minimum standard-deviation floor for the latency metric, in milliseconds.
pub const LATENCY_STD_FLOOR_MS: f64 = 10.0;
/// Minimum standard-deviation floor for the retry-count metric.
pub const RETRY_STD_FLOOR: f64 = 0.1;

/// Sample count at which a baseline is considered statistically usable.
pub const READY_SAMPLE_COUNT: u64 = 3;

/// Which metric a Z-score or EWMA update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    SuccessRate,
    Latency,
    RetryCount,
}

impl Metric {
    pub fn std_floor(self) -> f64 {
        match self {
            Metric::SuccessRate => SUCCESS_RATE_STD_FLOOR,
            Metric::Latency => LATENCY_STD_FLOOR_MS,
            Metric::RetryCount => RETRY_STD_FLOOR,
        }
    }
}

/// A single EWMA-tracked (mean, variance) pair for one metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct EwmaStat {
    pub mean: f64,
    pub variance: f64,
}

impl EwmaStat {
    /// Fold a new observation in using the standard one-pass EWMA scheme.
    ///
    /// The first sample initializes `mean` to the observation and `variance`
    /// to zero. Subsequent samples update `mean` first, then read the *old*
    /// mean when updating `variance` — this ordering is load-bearing and
    /// must not be reversed.
    pub fn update(&mut self, value: f64, alpha: f64, is_first: bool) {
        if is_first {
            self.mean = value;
            self.variance = 0.0;
            return;
        }
        let old_mean = self.mean;
        self.mean += alpha * (value - old_mean);
        self.variance = (1.0 - alpha) * (self.variance + alpha * (value - old_mean).powi(2));
    }

    pub fn std(&self, floor: f64) -> f64 {
        self.variance.max(0.0).sqrt().max(floor)
    }

    pub fn z_score(&self, value: f64, floor: f64) -> f64 {
        (value - self.mean).abs() / self.std(floor)
    }
}

/// Rolling per-dimension baseline over success rate, latency, and retry count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingBaseline {
    pub dimension: String,
    pub success_rate: EwmaStat,
    pub latency: EwmaStat,
    pub retry_count: EwmaStat,
    pub sample_count: u64,
    pub last_updated: i64,
    pub alpha: f64,
}

impl RollingBaseline {
    pub fn new(dimension: impl Into<String>, alpha: f64) -> Self {
        Self {
            dimension: dimension.into(),
            success_rate: EwmaStat::default(),
            latency: EwmaStat::default(),
            retry_count: EwmaStat::default(),
            sample_count: 0,
            last_updated: 0,
            alpha,
        }
    }

    /// Whether this baseline has enough samples to be trusted for anomaly
    /// detection (`sample_count >= READY_SAMPLE_COUNT`).
    pub fn is_ready(&self) -> bool {
        self.sample_count >= READY_SAMPLE_COUNT
    }

    /// Fold one observation (group-level success rate, average latency,
    /// average retry count) into this baseline.
    pub fn observe(&mut self, success_rate: f64, avg_latency_ms: f64, avg_retry_count: f64, now: i64) {
        let is_first = self.sample_count == 0;
        self.success_rate.update(success_rate, self.alpha, is_first);
        self.latency.update(avg_latency_ms, self.alpha, is_first);
        self.retry_count.update(avg_retry_count, self.alpha, is_first);
        self.sample_count += 1;
        self.last_updated = now;
    }

    pub fn z(&self, metric: Metric, value: f64) -> f64 {
        let floor = metric.std_floor();
        match metric {
            Metric::SuccessRate => self.success_rate.z_score(value, floor),
            Metric::Latency => self.latency.z_score(value, floor),
            Metric::RetryCount => self.retry_count.z_score(value, floor),
        }
    }
}
