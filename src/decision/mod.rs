//! Decision subsystem: Intervention Planner, NRV Calculator, Decision Policy.

pub mod nrv;
pub mod planner;
pub mod policy;

pub use nrv::{compute_nrv, rank_by_nrv, should_act, NrvParams};
pub use planner::plan_candidates;
pub use policy::DecisionPolicy;
