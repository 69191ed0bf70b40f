//! Agent configuration module.
//!
//! Provides TOML-backed configuration for the control agent, replacing all
//! hardcoded economic and statistical constants with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `--config` CLI flag (path to TOML file)
//! 2. `agent.toml` in the current working directory
//! 3. Built-in defaults (`AgentConfig::default()`)
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! let (cfg, warnings) = AgentConfig::load(path)?;
//! config::init(cfg);
//!
//! // Anywhere in the codebase:
//! let threshold = config::get().decision.anomaly_threshold;
//! ```

mod agent_config;
pub mod defaults;
mod validation;

pub use agent_config::*;
pub use validation::ValidationWarning;

use std::sync::OnceLock;

/// Global agent configuration, initialized once at startup.
static AGENT_CONFIG: OnceLock<AgentConfig> = OnceLock::new();

/// Initialize the global agent configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: AgentConfig) {
    if AGENT_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global agent configuration.
///
/// Panics if `init()` has not been called. This is by design — a missing
/// config is a fatal startup error, not a recoverable condition.
pub fn get() -> &'static AgentConfig {
    AGENT_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    AGENT_CONFIG.get().is_some()
}
