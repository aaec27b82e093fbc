//! Audit ledger adapters.

mod file_ledger;
mod in_memory;

pub use file_ledger::FileAuditLedger;
pub use in_memory::InMemoryAuditLedger;
