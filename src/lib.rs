//! Closed-loop autonomous control agent for payment infrastructure.
//!
//! Simulates issuer/gateway drift, detects anomalous patterns against
//! rolling baselines, forms and tests hypotheses, scores candidate
//! interventions by net recovery value, filters them through safety and
//! pre-mortem analysis, executes and rolls them back, and explains every
//! decision it makes.

pub mod types;
pub mod config;

pub mod drift;
pub mod generator;
pub mod observation;
pub mod baseline;
pub mod confidence;
pub mod pattern;
pub mod anomaly;
pub mod reasoning;
pub mod decision;
pub mod safety;
pub mod action;
pub mod feedback;
pub mod control_loop;
pub mod explain;

pub mod storage;
pub mod knowledge;
pub mod telemetry;

pub use config::{AgentConfig, ValidationWarning};
pub use control_loop::{ControlLoop, CycleOutcome, LoopError, LoopStats};
pub use drift::DriftEngine;
pub use explain::{ActionRecord, Explanation};
pub use generator::Generator;
pub use knowledge::{InMemoryIncidentStore, IncidentStore, PlaybookProvider, RuleTablePlaybookProvider};
pub use storage::{AuditEvent, AuditEventKind, AuditLog, StateStore, StorageError};
pub use telemetry::{SafetyMetrics, TelemetryHub, TelemetrySnapshot};

pub use types::{
    AggregateStats, BeliefState, DetectedPattern, ExecutionResult, Hypothesis,
    HistoricalIncident, IncidentSignature, InterventionDecision, InterventionKind,
    InterventionOption, IssuerState, ParamMap, PlaybookRequest, PlaybookResponse,
    RollingBaseline, Transaction,
};
