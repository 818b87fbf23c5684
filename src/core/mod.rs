//! Ledger engine - framework-agnostic event storage, projection and mutation logic.

/// Local calendar-day conversion
pub mod calendar;
/// Category value type and partitioning
pub mod category;
/// Database handle, clock and locks shared by operations
pub mod context;
/// Acting-user secrets for delete re-authentication
pub mod credential;
/// Customer lookups at the engine boundary
pub mod customer;
/// Unified debt/repayment event view
pub mod event;
/// Validated mutations: create debt, reassign category, delete
pub mod gateway;
/// Per-customer mutation locks
pub mod lock;
/// Fixed-point money parsing and formatting
pub mod money;
/// Product catalog used for line-item snapshots
pub mod product;
/// Running balances and as-of projections
pub mod projector;
/// Refresh tokens and the insertion sequence
pub mod refresh;
/// Repayment posting
pub mod repayment;
/// Event store reads and writes
pub mod store;
