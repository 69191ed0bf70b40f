//! System-wide default constants, grouped by subsystem.

// ============================================================================
// Observation Window
// ============================================================================

/// Fallback sample size used by the degeneracy rule during warm-up (§4.3).
pub const MIN_WINDOW_SAMPLE_SIZE: usize = 50;

/// Default observation window duration (ms).
pub const DEFAULT_WINDOW_DURATION_MS: i64 = 60_000;

// ============================================================================
// Baseline Manager
// ============================================================================

/// Default EWMA smoothing factor.
pub const DEFAULT_BASELINE_ALPHA: f64 = 0.2;

// ============================================================================
// Confidence Scorer
// ============================================================================

pub const DEFAULT_MIN_SAMPLE_SIZE: usize = 50;

// ============================================================================
// Drift Engine
// ============================================================================

pub const DEFAULT_RETRY_SPIKE_PROB: f64 = 0.01;
pub const DEFAULT_RETRY_SPIKE_MAGNITUDE: f64 = 0.1;
pub const DEFAULT_RETRY_DECAY_RATE: f64 = 0.05;

// ============================================================================
// Continuous Generator
// ============================================================================

pub const DEFAULT_GENERATOR_RATE_PER_SEC: f64 = 1.0;
pub const DEFAULT_BUFFER_CAPACITY: usize = 10_000;
pub const MAX_RETRY_COUNT: u32 = 10;
pub const RETRY_EXPONENTIAL_MEAN: f64 = 2.0;
pub const SOFT_FAIL_PROBABILITY: f64 = 0.7;
pub const LATENCY_NOISE_FRACTION: f64 = 0.20;

// ============================================================================
// Decision Policy / NRV Calculator
// ============================================================================

pub const DEFAULT_ANOMALY_THRESHOLD: f64 = 2.0;
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MAX_BLAST_RADIUS: f64 = 0.3;
pub const DEFAULT_MIN_ACTION_FREQUENCY_CYCLES: u32 = 6;
pub const DEFAULT_AVG_TICKET_VALUE: f64 = 100.0;
pub const DEFAULT_COST_PER_INTERVENTION: f64 = 5.0;
pub const DEFAULT_LATENCY_PENALTY_PER_MS: f64 = 0.01;
pub const MIN_FREQUENCY_RATIONALE_PREFIX: &str = "[MIN FREQUENCY RULE]";

// ============================================================================
// Pre-Mortem Analyzer
// ============================================================================

pub const RISK_ACCEPTABLE_THRESHOLD: f64 = 0.7;

// ============================================================================
// Action Executor
// ============================================================================

/// Ceiling on any intervention's `duration_ms`, covering the longest
/// planner-issued duration (REDUCE_RETRY_ATTEMPTS, 10 minutes) with margin.
pub const DEFAULT_MAX_SUPPRESSION_DURATION_MS: f64 = 900_000.0;

// ============================================================================
// Continuous Loop
// ============================================================================

pub const DEFAULT_LOOP_RATE_HZ: f64 = 1.0;
pub const DEFAULT_CYCLE_INTERVAL_MS: i64 = 5_000;
pub const TELEMETRY_MIN_INTERVAL_MS: i64 = 1_000;
pub const EXTERNAL_STREAM_POLL_TIMEOUT_SECS: u64 = 10;

/// Every Nth cycle the demo-only forced-failure branch fires, when
/// `demo_mode` is enabled (§4.16, §9).
pub const DEMO_FORCED_FAILURE_CYCLE_INTERVAL: u64 = 5;

// ============================================================================
// Storage
// ============================================================================

pub const MAX_STATE_BACKUPS: usize = 10;
pub const TELEMETRY_HISTORY_LEN: usize = 40;
pub const MAX_INTERVENTION_HISTORY: usize = 10;
