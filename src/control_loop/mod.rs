//! Continuous Loop — drives every phase on a fixed cadence, emits telemetry,
//! and shuts down cleanly on signal or elapsed duration (§4.16).
//!
//! Mirrors the teacher's `ProcessingLoop`: one long-lived task driven by
//! `tokio::select!` against a `CancellationToken`, with per-iteration work
//! that never lets a single bad cycle kill the loop.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::action::{analyze, ActionExecutor, Effector, Guardrails, SimulatedEffector};
use crate::anomaly::detect_anomalies;
use crate::baseline::BaselineManager;
use crate::config::defaults::{
    DEFAULT_BASELINE_ALPHA, DEFAULT_MAX_SUPPRESSION_DURATION_MS, DEFAULT_WINDOW_DURATION_MS, DEMO_FORCED_FAILURE_CYCLE_INTERVAL,
    TELEMETRY_MIN_INTERVAL_MS,
};
use crate::config::AgentConfig;
use crate::decision::{nrv::NrvParams, plan_candidates, DecisionPolicy};
use crate::drift::DriftEngine;
use crate::explain::explain;
use crate::feedback::FeedbackController;
use crate::generator::Generator;
use crate::observation::ObservationWindow;
use crate::pattern::detect_patterns;
use crate::reasoning::update_belief;
use crate::safety::{apply_constraints, SafetyPreferences};
use crate::storage::{AuditEvent, AuditEventKind, AuditLog, StateStore, StorageError};
use crate::telemetry::{SafetyMetrics, TelemetryHub};
use crate::types::{AggregateStats, AgentState, BeliefState, InterventionKind, Transaction};

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("persistence failure: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Default)]
pub struct CycleOutcome {
    pub batch_emitted: bool,
    pub full_cycle_ran: bool,
    pub intervention_executed: bool,
}

#[derive(Debug, Default)]
pub struct LoopStats {
    pub cycles_run: u64,
    pub full_cycles_run: u64,
    pub interventions_executed: u64,
}

/// Owns every component and drives them through the fixed-cadence loop
/// described in §2's control-flow diagram.
pub struct ControlLoop {
    config: AgentConfig,
    issuers: Vec<String>,
    drift: DriftEngine,
    generator: Generator,
    window: ObservationWindow,
    baselines: BaselineManager,
    belief: BeliefState,
    policy: DecisionPolicy,
    executor: ActionExecutor,
    feedback: FeedbackController,
    telemetry: TelemetryHub,
    state_store: StateStore,
    audit_log: AuditLog,
    cancel_token: CancellationToken,
    last_cycle_at_ms: i64,
    last_telemetry_at_ms: i64,
    last_nrv: f64,
    last_z_score: f64,
    tick_count: u64,
}

impl ControlLoop {
    pub fn new(config: AgentConfig, state_dir: impl Into<PathBuf>, audit_dir: impl Into<PathBuf>, seed: u64, now: i64) -> Self {
        let issuers = config.generator.issuers.clone();
        let drift = DriftEngine::new(config.drift.clone(), &issuers, seed, now);
        let generator = Generator::new(config.generator.buffer_capacity, config.generator.rate_per_sec, seed.wrapping_add(1));
        let window = ObservationWindow::new(DEFAULT_WINDOW_DURATION_MS);
        let baselines = BaselineManager::new(DEFAULT_BASELINE_ALPHA);
        let belief = BeliefState::empty(now);
        let policy = DecisionPolicy::new(config.decision.min_action_frequency_cycles, config.decision.max_blast_radius);
        let executor = ActionExecutor::new(
            Guardrails {
                approval_threshold: config.decision.max_blast_radius,
                max_suppression_duration_ms: DEFAULT_MAX_SUPPRESSION_DURATION_MS,
            },
            Box::new(SimulatedEffector) as Box<dyn Effector>,
        );

        Self {
            config,
            issuers,
            drift,
            generator,
            window,
            baselines,
            belief,
            policy,
            executor,
            feedback: FeedbackController::new(),
            telemetry: TelemetryHub::new(32),
            state_store: StateStore::new(state_dir),
            audit_log: AuditLog::new(audit_dir),
            cancel_token: CancellationToken::new(),
            last_cycle_at_ms: i64::MIN,
            last_telemetry_at_ms: i64::MIN,
            last_nrv: 0.0,
            last_z_score: 0.0,
            tick_count: 0,
        }
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn telemetry(&self) -> &TelemetryHub {
        &self.telemetry
    }

    /// Run until cancellation or `max_duration` elapses. A ticker at
    /// `loop_rate_hz` stands in for the arrival of the next external event;
    /// a real `TransactionSource` would replace it without changing the
    /// cycle logic below.
    pub async fn run(mut self, max_duration: Option<Duration>) -> LoopStats {
        let tick_period = Duration::from_secs_f64(1.0 / self.config.loop_config.loop_rate_hz.max(0.01));
        let mut ticker = interval(tick_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let start = Instant::now();
        let mut last_iter_ms: i64 = 0;
        let mut stats = LoopStats::default();

        info!(rate_hz = self.config.loop_config.loop_rate_hz, cycle_interval_ms = self.config.loop_config.cycle_interval_ms, "control loop starting");

        loop {
            if let Some(max) = max_duration {
                if start.elapsed() >= max {
                    info!("max duration elapsed, stopping cleanly");
                    break;
                }
            }

            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    info!("shutdown signal received");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let now_ms = start.elapsed().as_millis() as i64;
            let dt = ((now_ms - last_iter_ms) as f64 / 1000.0).max(0.0);
            last_iter_ms = now_ms;
            self.tick_count += 1;

            match self.run_iteration(dt, now_ms).await {
                Ok(outcome) => {
                    stats.cycles_run += 1;
                    if outcome.full_cycle_ran {
                        stats.full_cycles_run += 1;
                    }
                    if outcome.intervention_executed {
                        stats.interventions_executed += 1;
                    }
                }
                Err(e) => {
                    error!(error = %e, "cycle body failed, continuing to next tick");
                }
            }
        }

        info!(cycles = stats.cycles_run, full_cycles = stats.full_cycles_run, interventions = stats.interventions_executed, "control loop stopped");
        stats
    }

    /// One loop iteration: drift advance, batch emission, feedback expiry
    /// every tick, and — once per `cycle_interval_ms` — the full
    /// observe-through-explain pipeline (§2).
    async fn run_iteration(&mut self, dt: f64, now_ms: i64) -> Result<CycleOutcome, LoopError> {
        let mut outcome = CycleOutcome::default();

        self.drift.update(dt, now_ms);
        self.maybe_inject_demo_failure(now_ms);

        let batch = self.generator.generate_next_batch(self.drift.states(), dt, now_ms);
        outcome.batch_emitted = !batch.is_empty();

        let expired = self.executor.expire_due(now_ms);
        for intervention in &expired {
            self.audit_log.append(&rollback_event(intervention.result.intervention_id.to_string(), now_ms))?;
        }

        let multipliers = self.feedback.update(now_ms);
        self.generator.clear_multipliers();
        for (issuer, mult) in &multipliers.per_issuer {
            self.generator.set_multipliers(issuer, *mult);
        }
        self.generator.set_retry_multiplier(multipliers.retry_multiplier);

        if now_ms - self.last_cycle_at_ms >= self.config.loop_config.cycle_interval_ms {
            self.last_cycle_at_ms = now_ms;
            outcome.full_cycle_ran = true;
            outcome.intervention_executed = self.run_full_cycle(now_ms).await?;
        }

        if now_ms - self.last_telemetry_at_ms >= TELEMETRY_MIN_INTERVAL_MS {
            self.last_telemetry_at_ms = now_ms;
            self.publish_telemetry(now_ms);
        }

        Ok(outcome)
    }

    fn maybe_inject_demo_failure(&mut self, now_ms: i64) {
        if !self.config.loop_config.demo_mode {
            return;
        }
        if self.tick_count == 0 || self.tick_count % DEMO_FORCED_FAILURE_CYCLE_INTERVAL != 0 {
            return;
        }
        if let Some(issuer) = self.issuers.first() {
            warn!(issuer = %issuer, "demo_mode: forcing issuer degradation for demonstration");
            self.drift.force_degrade(issuer, now_ms);
        }
    }

    /// Observe → Baseline → Anomaly/Pattern → Hypothesis/Belief → Planning
    /// → Safety → NRV → Decision → Pre-mortem → Execute → Feedback.Apply →
    /// Explain, in that order (§2). Returns whether an intervention executed.
    async fn run_full_cycle(&mut self, now_ms: i64) -> Result<bool, LoopError> {
        let buffer: Vec<Transaction> = self.generator.buffer().iter().cloned().collect();
        self.window.update(buffer.iter(), now_ms);
        let transactions = self.window.transactions().to_vec();

        self.baselines.update_rolling_baselines(&transactions, now_ms);

        let mut patterns = detect_patterns(&transactions, now_ms);
        for dimension in self.baselines.dimensions().map(str::to_string).collect::<Vec<_>>() {
            let scoped: Vec<Transaction> = transactions
                .iter()
                .filter(|t| dimension == "global" || t.issuer_dimension() == dimension || t.method_dimension() == dimension)
                .cloned()
                .collect();
            if scoped.is_empty() {
                continue;
            }
            let stats = AggregateStats::compute(&scoped);
            let failed: Vec<&Transaction> = scoped.iter().filter(|t| !t.outcome.is_success()).collect();
            let baseline_p95 = self.baselines.get(&dimension).map_or(0.0, |b| b.latency.mean);
            patterns.extend(detect_anomalies(&self.baselines, &dimension, &stats, baseline_p95, &failed, self.config.decision.anomaly_threshold, now_ms));
        }

        update_belief(&mut self.belief, &patterns, now_ms);

        let candidates = plan_candidates(&patterns);
        // No fraud/compliance signal feeds this loop yet (no fraud-detection
        // component is in scope); mirrors the original orchestrator's own
        // placeholder values pending a real system-risk source.
        let (fraud_risk, compliance_risk) = (0.0, 0.0);
        let (allowed, blocked) = apply_constraints(candidates, &SafetyPreferences::default(), fraud_risk, compliance_risk);
        for blocked_candidate in &blocked {
            info!(kind = blocked_candidate.option.kind.as_str(), reason = %blocked_candidate.reason, "safety constraint blocked candidate");
        }

        let window_stats = self.window.stats();
        let nrv_params = NrvParams {
            avg_ticket_value: self.config.decision.avg_ticket_value,
            cost_per_intervention: self.config.decision.cost_per_intervention,
            latency_penalty_per_ms: self.config.decision.latency_penalty_per_ms,
        };
        let volume = window_stats.total as f64;

        let decision = self.policy.decide(&allowed, volume, &nrv_params, self.belief.uncertainty_level);
        self.last_nrv = decision
            .selected
            .as_ref()
            .map_or(0.0, |s| crate::decision::compute_nrv(s, volume, &nrv_params));
        self.last_z_score = patterns.iter().map(|p| p.severity).fold(0.0, f64::max);

        let mut executed = false;
        let premortem = decision.selected.as_ref().map(analyze);

        if decision.should_act {
            if let Some(option) = decision.selected.clone() {
                if premortem.as_ref().is_some_and(|p| p.acceptable) || option.kind == InterventionKind::AlertOps {
                    let result = self.executor.execute(option.clone(), now_ms).await;
                    self.audit_log.append(&decision_event(&decision, now_ms))?;
                    if result.success {
                        executed = true;
                        self.audit_log.append(&action_event(&result, now_ms))?;
                        self.feedback.apply_intervention(crate::types::ActiveIntervention {
                            result,
                            option,
                            start_time: now_ms,
                            end_time: None,
                            status: crate::types::InterventionStatus::Executed,
                        });
                    }
                } else {
                    warn!(risk_score = premortem.as_ref().map_or(0.0, |p| p.risk_score), "pre-mortem risk unacceptable, withholding autonomous execution");
                }
            }
        } else {
            self.audit_log.append(&decision_event(&decision, now_ms))?;
        }

        let explanation = explain(&decision, self.last_nrv, self.last_z_score, premortem.as_ref());
        self.telemetry.log_thought(explanation.summary.clone());
        self.audit_log.append(&learning_event(&self.belief, now_ms))?;

        let state = AgentState {
            belief: self.belief.clone(),
            active_interventions: self.feedback.active().to_vec(),
            recent_observations: transactions,
            parameters: crate::types::ModelParameters {
                anomaly_threshold: self.config.decision.anomaly_threshold,
                min_confidence: self.config.decision.min_confidence,
                max_blast_radius: self.config.decision.max_blast_radius,
                learning_rate: 0.1,
                conservativeness: 0.5,
            },
            last_updated: now_ms,
            last_nrv: self.last_nrv,
            last_z_score: self.last_z_score,
            risk_acknowledged: false,
        };
        self.state_store.save(&state)?;

        Ok(executed)
    }

    fn publish_telemetry(&mut self, now_ms: i64) {
        let stats = self.window.stats();
        self.telemetry.record_point(stats.success_rate, stats.avg_latency_ms);
        let active_gateway = self.issuers.first().cloned().unwrap_or_else(|| "none".to_string());
        self.telemetry.publish(
            now_ms / 1000,
            stats.total as u64,
            1.0 - stats.success_rate,
            &active_gateway,
            self.last_nrv,
            1.0 - self.belief.uncertainty_level,
            SafetyMetrics::default(),
            self.feedback.active().to_vec(),
        );
    }
}

fn decision_event(decision: &crate::types::InterventionDecision, now_ms: i64) -> AuditEvent {
    AuditEvent {
        id: uuid::Uuid::new_v4().to_string(),
        kind: AuditEventKind::Decision,
        timestamp: now_ms,
        datetime: chrono::Utc::now(),
        payload: serde_json::json!({ "should_act": decision.should_act, "rationale": decision.rationale }),
    }
}

fn action_event(result: &crate::types::ExecutionResult, now_ms: i64) -> AuditEvent {
    AuditEvent {
        id: result.intervention_id.to_string(),
        kind: AuditEventKind::Action,
        timestamp: now_ms,
        datetime: chrono::Utc::now(),
        payload: serde_json::json!({ "success": result.success, "executed_at": result.executed_at }),
    }
}

fn learning_event(belief: &BeliefState, now_ms: i64) -> AuditEvent {
    AuditEvent {
        id: uuid::Uuid::new_v4().to_string(),
        kind: AuditEventKind::Learning,
        timestamp: now_ms,
        datetime: chrono::Utc::now(),
        payload: serde_json::json!({
            "system_health_score": belief.system_health_score,
            "uncertainty_level": belief.uncertainty_level,
            "active_hypotheses": belief.active_hypotheses.len(),
        }),
    }
}

fn rollback_event(intervention_id: String, now_ms: i64) -> AuditEvent {
    AuditEvent {
        id: intervention_id,
        kind: AuditEventKind::Rollback,
        timestamp: now_ms,
        datetime: chrono::Utc::now(),
        payload: serde_json::json!({ "reason": "expired" }),
    }
}
