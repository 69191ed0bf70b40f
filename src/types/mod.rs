//! Shared data structures for the payment-ops control agent.
//!
//! - §3 Transaction, IssuerState, RollingBaseline, AggregateStats
//! - §3 DetectedPattern, Hypothesis, BeliefState
//! - §3 InterventionOption/Decision, ExecutionResult, ActiveIntervention
//! - §3 AgentState (persisted blob)
//! - §3.1 IncidentSignature/HistoricalIncident, Playbook request/response

mod aggregate;
mod baseline;
mod belief;
mod execution;
mod hypothesis;
mod incident;
mod intervention;
mod issuer;
mod pattern;
mod state;
mod transaction;

pub use aggregate::*;
pub use baseline::*;
pub use belief::*;
pub use execution::*;
pub use hypothesis::*;
pub use incident::*;
pub use intervention::*;
pub use issuer::*;
pub use pattern::*;
pub use state::*;
pub use transaction::*;
