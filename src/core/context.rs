//! Shared state handed to every ledger operation.
use crate::core::{calendar::LedgerClock, lock::CustomerLocks};
use sea_orm::DatabaseConnection;

/// Database handle, calendar and per-customer locks, passed explicitly to mutations.
#[derive(Debug, Clone)]
pub struct LedgerContext {
    /// Database connection for all event storage
    pub db: DatabaseConnection,
    /// Converts instants to local calendar days
    pub clock: LedgerClock,
    /// Serializes mutations per customer
    pub locks: CustomerLocks,
}

impl LedgerContext {
    /// Creates a context with a fresh lock registry.
    #[must_use]
    pub fn new(db: DatabaseConnection, clock: LedgerClock) -> Self {
        Self {
            db,
            clock,
            locks: CustomerLocks::new(),
        }
    }
}
