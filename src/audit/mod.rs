//! Append-only audit trail
//!
//! Every write made through the services (transaction add/delete, budget
//! upsert, preference change) is recorded as one JSON line in `audit.log`,
//! with the entity state before and after the change.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
