//! Repayment allocator - Posts a payment as a flat credit against one category.
//!
//! A repayment is never matched against individual debts. Once it is in the event
//! stream the projector nets it against the category's cumulative debt, so the only
//! work here is validating the request before the append.

use crate::{
    core::{
        category::Category,
        context::LedgerContext,
        event::LedgerEvent,
        refresh,
        store::{self, RepaymentRecord},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use tracing::instrument;

/// Records a payment from `customer_id` into `category`.
///
/// # Errors
/// Returns a validation error for a blank category, a non-positive amount or an
/// unknown customer. Nothing is written on failure.
#[instrument(skip(ctx))]
pub async fn create_repayment(
    ctx: &LedgerContext,
    customer_id: i64,
    category: &str,
    amount: i64,
    occurred_at: DateTime<Utc>,
) -> Result<LedgerEvent> {
    let category = Category::new(category)?;
    if amount <= 0 {
        return Err(Error::validation(
            "amount",
            format!("repayment must be positive, got {amount}"),
        ));
    }

    let _guard = ctx.locks.acquire(customer_id).await;
    let txn = ctx.db.begin().await?;
    let event = store::append_repayment(
        &txn,
        RepaymentRecord {
            customer_id,
            amount,
            category,
            occurred_at,
        },
    )
    .await?;
    refresh::signal(&txn, customer_id).await?;
    txn.commit().await?;

    tracing::info!(
        "Recorded repayment {} of {} in '{}' for customer {customer_id}",
        event.id,
        event.amount,
        event.category
    );
    Ok(event)
}
