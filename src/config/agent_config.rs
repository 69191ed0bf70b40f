//! AgentConfig — TOML-backed configuration for the control agent (§6).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use super::defaults::*;
use super::validation::{validate_known_keys, ValidationWarning};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(String, std::io::Error),
    #[error("failed to parse TOML config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Ornstein-Uhlenbeck drift parameters for a single metric dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DriftParams {
    pub theta: f64,
    pub mean: f64,
    pub sigma: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftConfig {
    pub success_rate: DriftParams,
    pub latency: DriftParams,
    pub retry_probability: DriftParams,
    pub retry_spike_prob: f64,
    pub retry_spike_magnitude: f64,
    pub retry_decay_rate: f64,
    pub time_scale: f64,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            success_rate: DriftParams { theta: 0.1, mean: 0.95, sigma: 0.02 },
            latency: DriftParams { theta: 0.1, mean: 150.0, sigma: 10.0 },
            retry_probability: DriftParams { theta: 0.1, mean: 0.05, sigma: 0.01 },
            retry_spike_prob: DEFAULT_RETRY_SPIKE_PROB,
            retry_spike_magnitude: DEFAULT_RETRY_SPIKE_MAGNITUDE,
            retry_decay_rate: DEFAULT_RETRY_DECAY_RATE,
            time_scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub rate_per_sec: f64,
    pub buffer_capacity: usize,
    pub issuers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rate_per_sec: DEFAULT_GENERATOR_RATE_PER_SEC,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            issuers: vec!["HDFC".into(), "ICICI".into(), "SBI".into(), "AXIS".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopConfig {
    pub loop_rate_hz: f64,
    pub cycle_interval_ms: i64,
    pub max_duration_secs: Option<u64>,
    pub demo_mode: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            loop_rate_hz: DEFAULT_LOOP_RATE_HZ,
            cycle_interval_ms: DEFAULT_CYCLE_INTERVAL_MS,
            max_duration_secs: None,
            demo_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionConfig {
    pub anomaly_threshold: f64,
    pub min_confidence: f64,
    pub max_blast_radius: f64,
    pub min_action_frequency_cycles: u32,
    pub avg_ticket_value: f64,
    pub cost_per_intervention: f64,
    pub latency_penalty_per_ms: f64,
}

impl Default for DecisionConfig {
    fn default() -> Self {
        Self {
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_blast_radius: DEFAULT_MAX_BLAST_RADIUS,
            min_action_frequency_cycles: DEFAULT_MIN_ACTION_FREQUENCY_CYCLES,
            avg_ticket_value: DEFAULT_AVG_TICKET_VALUE,
            cost_per_intervention: DEFAULT_COST_PER_INTERVENTION,
            latency_penalty_per_ms: DEFAULT_LATENCY_PENALTY_PER_MS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub drift: DriftConfig,
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub loop_config: LoopConfig,
    #[serde(default)]
    pub decision: DecisionConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            drift: DriftConfig::default(),
            generator: GeneratorConfig::default(),
            loop_config: LoopConfig::default(),
            decision: DecisionConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl AgentConfig {
    /// Load from `path`, falling back to built-in defaults for any field
    /// not present. Unknown keys are logged as warnings, never rejected.
    pub fn load(path: &Path) -> Result<(Self, Vec<ValidationWarning>), ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.display().to_string(), e))?;
        let value: toml::Value = raw.parse()?;
        let warnings = validate_known_keys(&value);
        let config: Self = value.try_into()?;
        Ok((config, warnings))
    }
}

/// Per-issuer initial state overrides, keyed by issuer name, loaded from the
/// optional `[issuers.<name>]` tables.
pub type IssuerOverrides = HashMap<String, DriftParams>;
