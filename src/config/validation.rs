//! Config validation: unknown-key detection with Levenshtein suggestions.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

/// A non-fatal config warning (typo, unrecognized key).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " — did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `AgentConfig`.
///
/// Maintained manually to match the struct hierarchy in `agent_config.rs`.
/// Any new field added there must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "log_level",
        // [drift]
        "drift",
        "drift.success_rate",
        "drift.success_rate.theta",
        "drift.success_rate.mean",
        "drift.success_rate.sigma",
        "drift.latency",
        "drift.latency.theta",
        "drift.latency.mean",
        "drift.latency.sigma",
        "drift.retry_probability",
        "drift.retry_probability.theta",
        "drift.retry_probability.mean",
        "drift.retry_probability.sigma",
        "drift.retry_spike_prob",
        "drift.retry_spike_magnitude",
        "drift.retry_decay_rate",
        "drift.time_scale",
        // [generator]
        "generator",
        "generator.rate_per_sec",
        "generator.buffer_capacity",
        "generator.issuers",
        // [loop_config]
        "loop_config",
        "loop_config.loop_rate_hz",
        "loop_config.cycle_interval_ms",
        "loop_config.max_duration_secs",
        "loop_config.demo_mode",
        // [decision]
        "decision",
        "decision.anomaly_threshold",
        "decision.min_confidence",
        "decision.max_blast_radius",
        "decision.min_action_frequency_cycles",
        "decision.avg_ticket_value",
        "decision.cost_per_intervention",
        "decision.latency_penalty_per_ms",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a_len = a.len();
    let b_len = b.len();
    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1)
                .min(curr[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist <= 3 {
            if let Some((_, best_dist)) = best {
                if dist < best_dist {
                    best = Some((k, dist));
                }
            } else {
                best = Some((k, dist));
            }
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Walk a parsed `toml::Value` and return warnings for any key path that
/// does not match the known `AgentConfig` schema.
///
/// This does NOT fail on unknown keys — it only warns. Existing configs
/// always continue to load.
pub fn validate_known_keys(value: &toml::Value) -> Vec<ValidationWarning> {
    let known = known_config_keys();
    let found = walk_toml_keys(value, "");
    let mut warnings = Vec::new();

    for key in &found {
        if !known.contains(key.as_str()) {
            let suggestion = suggest_correction(key, &known);
            let message = format!("Unknown config key '{key}'");
            warnings.push(ValidationWarning {
                field: key.clone(),
                message,
                suggestion,
            });
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("retr_spike_prob", "retry_spike_prob"), 1);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [drift.success_rate]
            theta = 0.1
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"drift".to_string()));
        assert!(keys.contains(&"drift.success_rate".to_string()));
        assert!(keys.contains(&"drift.success_rate.theta".to_string()));
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[drift]
retr_spike_prob = 0.02
"#;
        let value: toml::Value = toml_str.parse().unwrap();
        let warnings = validate_known_keys(&value);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("retr_spike_prob"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("drift.retry_spike_prob")
        );
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let toml_str = r#"
log_level = "debug"

[generator]
rate_per_sec = 2.0
issuers = ["HDFC", "ICICI"]

[decision]
min_confidence = 0.6
"#;
        let value: toml::Value = toml_str.parse().unwrap();
        let warnings = validate_known_keys(&value);
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {:?}", warnings);
    }

    #[test]
    fn test_unknown_section_produces_warning() {
        let toml_str = r#"
[nonexistent_section]
some_field = 42
"#;
        let value: toml::Value = toml_str.parse().unwrap();
        let warnings = validate_known_keys(&value);
        assert!(!warnings.is_empty());
        assert!(warnings.iter().any(|w| w.field.contains("nonexistent_section")));
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        let suggestion = suggest_correction("completely_unrelated_garbage_key_xyz", &known);
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_known_keys_covers_all_sections() {
        let known = known_config_keys();
        assert!(known.contains("drift"));
        assert!(known.contains("generator"));
        assert!(known.contains("loop_config"));
        assert!(known.contains("decision"));
        assert!(known.contains("decision.min_action_frequency_cycles"));
    }
}
