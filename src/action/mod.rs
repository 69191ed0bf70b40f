//! Action subsystem: Pre-Mortem Analyzer and Action Executor.

pub mod executor;
pub mod premortem;

pub use executor::{ActionExecutor, Effector, ExecutorError, Guardrails, NullEffector, SimulatedEffector};
pub use premortem::{analyze, PreMortemResult};
