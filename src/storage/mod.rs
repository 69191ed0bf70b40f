//! Persistence: the state snapshot file and the append-only audit log (§6).

mod audit;
mod state_store;

pub use audit::{AuditEvent, AuditEventKind, AuditLog};
pub use state_store::{StateStore, StorageError};
