//! Shared test utilities for `CreditBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test customers and events with sensible defaults.

use crate::{
    core::{
        calendar::LedgerClock,
        category::Category,
        context::LedgerContext,
        customer::{self, Role},
        event::LedgerEvent,
        store::{self, DebtRecord},
    },
    entities,
    errors::Result,
};
use chrono::{DateTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness; safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// A UTC instant; panics on impossible dates, which is fine in tests.
#[allow(clippy::unwrap_used)]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap()
}

/// Creates a test customer with sensible defaults.
///
/// # Defaults
/// * `phone`: `"0800000000"`
/// * `role`: customer
pub async fn create_test_customer(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::customer::Model> {
    customer::create_customer(db, name, "0800000000", Role::Customer).await
}

/// Appends a manual debt straight to the store, bypassing the gateway.
#[allow(clippy::unwrap_used)]
pub async fn append_test_debt(
    db: &DatabaseConnection,
    customer_id: i64,
    amount: i64,
    category: &str,
    occurred_at: DateTime<Utc>,
) -> Result<LedgerEvent> {
    store::append_debt(
        db,
        DebtRecord {
            customer_id,
            amount,
            category: Category::new(category).unwrap(),
            occurred_at,
            note: None,
            line_items: Vec::new(),
        },
    )
    .await
}

/// Sets up a database with one customer.
/// Returns (db, customer) for common test scenarios.
pub async fn setup_with_customer() -> Result<(DatabaseConnection, entities::customer::Model)> {
    let db = setup_test_db().await?;
    let customer = create_test_customer(&db, "Test Customer").await?;
    Ok((db, customer))
}

/// A ledger context on a fresh database, projecting in UTC.
#[allow(clippy::unwrap_used)]
pub async fn setup_ledger() -> Result<LedgerContext> {
    let db = setup_test_db().await?;
    Ok(LedgerContext::new(
        db,
        LedgerClock::from_offset("+00:00").unwrap(),
    ))
}

/// A ledger context with one customer.
pub async fn setup_ledger_with_customer() -> Result<(LedgerContext, entities::customer::Model)> {
    let ctx = setup_ledger().await?;
    let customer = create_test_customer(&ctx.db, "Test Customer").await?;
    Ok((ctx, customer))
}
