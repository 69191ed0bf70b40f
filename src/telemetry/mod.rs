//! Telemetry snapshot: a JSON document pushed to subscribers at ≥ 1 Hz (§6).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::config::defaults::TELEMETRY_HISTORY_LEN;
use crate::types::ActiveIntervention;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyMetrics {
    pub false_positive_rate: f64,
    pub avg_response_time_s: f64,
    pub rollback_rate: f64,
    pub human_escalations: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub timestamp: i64,
    pub total_volume: u64,
    pub fail_rate: f64,
    pub active_gateway: String,
    pub success_series: Vec<f64>,
    pub latency_series: Vec<f64>,
    pub thinking_log: Vec<String>,
    pub nrv: f64,
    pub confidence: f64,
    pub safety_metrics: SafetyMetrics,
    pub intervention_history: Vec<ActiveIntervention>,
}

/// Rolling buffers feeding the fixed-length series in each snapshot, plus the
/// bounded broadcast channel subscribers attach to. Drops the oldest sample
/// on overflow, same as the generator's ring buffer.
pub struct TelemetryHub {
    success_series: VecDeque<f64>,
    latency_series: VecDeque<f64>,
    thinking_log: VecDeque<String>,
    sender: broadcast::Sender<TelemetrySnapshot>,
}

impl TelemetryHub {
    pub fn new(channel_capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(channel_capacity);
        Self {
            success_series: VecDeque::with_capacity(TELEMETRY_HISTORY_LEN),
            latency_series: VecDeque::with_capacity(TELEMETRY_HISTORY_LEN),
            thinking_log: VecDeque::with_capacity(TELEMETRY_HISTORY_LEN),
            sender,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TelemetrySnapshot> {
        self.sender.subscribe()
    }

    pub fn record_point(&mut self, success_rate: f64, avg_latency_ms: f64) {
        push_bounded(&mut self.success_series, success_rate);
        push_bounded(&mut self.latency_series, avg_latency_ms);
    }

    pub fn log_thought(&mut self, entry: impl Into<String>) {
        push_bounded(&mut self.thinking_log, entry.into());
    }

    /// Build and broadcast a snapshot. Send errors (no subscribers) are
    /// swallowed; telemetry delivery is best-effort per §7.
    pub fn publish(
        &self,
        timestamp: i64,
        total_volume: u64,
        fail_rate: f64,
        active_gateway: &str,
        nrv: f64,
        confidence: f64,
        safety_metrics: SafetyMetrics,
        intervention_history: Vec<ActiveIntervention>,
    ) -> TelemetrySnapshot {
        let mut history = intervention_history;
        history.truncate(10);

        let snapshot = TelemetrySnapshot {
            timestamp,
            total_volume,
            fail_rate,
            active_gateway: active_gateway.to_string(),
            success_series: self.success_series.iter().copied().collect(),
            latency_series: self.latency_series.iter().copied().collect(),
            thinking_log: self.thinking_log.iter().cloned().collect(),
            nrv,
            confidence,
            safety_metrics,
            intervention_history: history,
        };

        let _ = self.sender.send(snapshot.clone());
        snapshot
    }
}

fn push_bounded<T>(buffer: &mut VecDeque<T>, value: T) {
    if buffer.len() >= TELEMETRY_HISTORY_LEN {
        buffer.pop_front();
    }
    buffer.push_back(value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_caps_at_history_length() {
        let mut hub = TelemetryHub::new(16);
        for i in 0..(TELEMETRY_HISTORY_LEN + 10) {
            hub.record_point(i as f64, i as f64);
        }
        assert_eq!(hub.success_series.len(), TELEMETRY_HISTORY_LEN);
        assert_eq!(hub.latency_series.len(), TELEMETRY_HISTORY_LEN);
    }

    #[test]
    fn publish_truncates_intervention_history_to_ten() {
        let hub = TelemetryHub::new(16);
        let snapshot = hub.publish(0, 0, 0.0, "none", 0.0, 0.0, SafetyMetrics::default(), Vec::new());
        assert!(snapshot.intervention_history.is_empty());
    }

    #[tokio::test]
    async fn subscriber_receives_published_snapshot() {
        let hub = TelemetryHub::new(16);
        let mut receiver = hub.subscribe();
        hub.publish(1, 5, 0.1, "HDFC", 10.0, 0.8, SafetyMetrics::default(), Vec::new());
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.timestamp, 1);
        assert_eq!(received.total_volume, 5);
    }
}
