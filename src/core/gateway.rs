//! Mutation gateway - Validates and applies every change to the event store.
//!
//! Each mutation goes through the same steps: validate the request without touching
//! the database, take the customer's lock, apply the write and bump the refresh token
//! inside one database transaction, then commit. Any failure before the commit drops
//! the transaction, so a rejected mutation leaves the store exactly as it was.
//!
//! Deletion adds a re-authentication step. The acting user's secret is read fresh and
//! checked before the target is even looked up, so a wrong secret reveals nothing
//! about whether the id exists.

use crate::{
    core::{
        category::Category,
        context::LedgerContext,
        credential,
        event::{EventKind, LedgerEvent},
        money, refresh,
        store::{self, DebtRecord, NewLineItem},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::TransactionTrait;
use tracing::instrument;

/// A debt as requested by the caller, before validation.
#[derive(Debug, Clone)]
pub struct NewDebt {
    /// Customer taking the credit
    pub customer_id: i64,
    /// Caller-supplied total; required when there are no line items
    pub amount: Option<i64>,
    /// Product snapshots; when present they define the amount
    pub line_items: Vec<NewLineItem>,
    /// Raw category label
    pub category: String,
    /// When the debt was incurred
    pub occurred_at: DateTime<Utc>,
    /// Optional note
    pub note: Option<String>,
}

impl NewDebt {
    /// A manual entry with an explicit amount and no line items.
    #[must_use]
    pub fn manual(
        customer_id: i64,
        amount: i64,
        category: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            amount: Some(amount),
            line_items: Vec::new(),
            category: category.to_string(),
            occurred_at,
            note: None,
        }
    }

    /// A sale made of product snapshots; the amount is their total.
    #[must_use]
    pub fn from_items(
        customer_id: i64,
        line_items: Vec<NewLineItem>,
        category: &str,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            customer_id,
            amount: None,
            line_items,
            category: category.to_string(),
            occurred_at,
            note: None,
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        self.note = Some(note.to_string());
        self
    }
}

/// Checks a debt request and turns it into a storable record.
///
/// # Errors
/// - [`Error::Validation`] for a blank category, a malformed line item, a missing or
///   non-positive amount
/// - [`Error::InvariantViolation`] when a supplied amount disagrees with the line items
pub fn validate_debt(request: NewDebt) -> Result<DebtRecord> {
    let category = Category::new(&request.category)?;

    let mut total = 0i64;
    for item in &request.line_items {
        if item.product_name.trim().is_empty() {
            return Err(Error::validation("line_items", "product name cannot be empty"));
        }
        if item.quantity <= 0 {
            return Err(Error::validation(
                "line_items",
                format!("quantity of '{}' must be positive", item.product_name),
            ));
        }
        if item.unit_price < 0 {
            return Err(Error::validation(
                "line_items",
                format!("price of '{}' cannot be negative", item.product_name),
            ));
        }
        total = total
            .checked_add(money::line_total(item.unit_price, item.quantity)?)
            .ok_or_else(|| Error::validation("line_items", "debt total overflows"))?;
    }

    let amount = if request.line_items.is_empty() {
        request
            .amount
            .ok_or_else(|| Error::validation("amount", "an amount or line items are required"))?
    } else {
        if let Some(supplied) = request.amount.filter(|s| *s != total) {
            let message = format!("debt amount {supplied} does not equal line item total {total}");
            tracing::error!("{message}");
            return Err(Error::InvariantViolation { message });
        }
        total
    };

    if amount <= 0 {
        return Err(Error::validation(
            "amount",
            format!("debt must be positive, got {amount}"),
        ));
    }

    let note = request
        .note
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(DebtRecord {
        customer_id: request.customer_id,
        amount,
        category,
        occurred_at: request.occurred_at,
        note,
        line_items: request.line_items,
    })
}

/// Records a new debt.
///
/// # Errors
/// Any error from [`validate_debt`], or a validation error for an unknown customer.
#[instrument(skip(ctx, request), fields(customer_id = request.customer_id))]
pub async fn create_debt(ctx: &LedgerContext, request: NewDebt) -> Result<LedgerEvent> {
    let record = validate_debt(request)?;
    let customer_id = record.customer_id;

    let _guard = ctx.locks.acquire(customer_id).await;
    let txn = ctx.db.begin().await?;
    let event = store::append_debt(&txn, record).await?;
    refresh::signal(&txn, customer_id).await?;
    txn.commit().await?;

    tracing::info!(
        "Recorded debt {} of {} in '{}' for customer {customer_id}",
        event.id,
        event.amount,
        event.category
    );
    Ok(event)
}

/// Moves one event to another category.
///
/// `authorized` is the verdict of the caller's role check. The event moves as a whole;
/// line-item category hints are left as they were recorded.
///
/// # Errors
/// - [`Error::Unauthorized`] when `authorized` is false
/// - [`Error::Validation`] when the new category is blank
/// - [`Error::NotFound`] when the event does not exist
#[instrument(skip(ctx))]
pub async fn reassign_category(
    ctx: &LedgerContext,
    kind: EventKind,
    event_id: i64,
    new_category: &str,
    authorized: bool,
) -> Result<LedgerEvent> {
    if !authorized {
        return Err(Error::Unauthorized {
            action: "reassign categories",
        });
    }
    let category = Category::new(new_category)?;

    let target = store::require_event(&ctx.db, kind, event_id).await?;
    let customer_id = target.customer_id;

    let _guard = ctx.locks.acquire(customer_id).await;
    let txn = ctx.db.begin().await?;
    let updated = store::reassign_category(&txn, kind, event_id, &category).await?;
    refresh::signal(&txn, customer_id).await?;
    txn.commit().await?;

    tracing::info!(
        "Moved {kind} {event_id} of customer {customer_id} to '{}'",
        updated.category
    );
    Ok(updated)
}

/// Deletes one event after re-checking the acting user's secret.
///
/// The secret is verified on every call; there is no remembered approval.
///
/// # Errors
/// - [`Error::Auth`] when the secret does not match, whether or not the event exists
/// - [`Error::NotFound`] when the secret matches but the event does not exist
#[instrument(skip(ctx, supplied_secret))]
pub async fn delete_event(
    ctx: &LedgerContext,
    kind: EventKind,
    event_id: i64,
    acting_user: &str,
    supplied_secret: &str,
) -> Result<LedgerEvent> {
    if let Err(e) = credential::verify_secret(&ctx.db, acting_user, supplied_secret).await {
        tracing::warn!("Rejected delete of {kind} {event_id} by {acting_user}: {e}");
        return Err(e);
    }

    let target = store::require_event(&ctx.db, kind, event_id).await?;
    let customer_id = target.customer_id;

    let _guard = ctx.locks.acquire(customer_id).await;
    let txn = ctx.db.begin().await?;
    let removed = store::delete_event(&txn, kind, event_id).await?;
    refresh::signal(&txn, customer_id).await?;
    txn.commit().await?;

    tracing::info!(
        "Deleted {kind} {event_id} ({} in '{}') for customer {customer_id} by {acting_user}",
        removed.amount,
        removed.category
    );
    Ok(removed)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        product,
        projector::{self, ProjectionQuery},
        repayment,
    };
    use crate::entities::{DebtLineItem, debt_line_item};
    use crate::test_utils::*;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

    fn sugar(quantity: i64) -> NewLineItem {
        NewLineItem {
            product_id: None,
            product_name: "Sugar 1kg".to_string(),
            quantity,
            unit_price: 300,
            category: None,
        }
    }

    async fn closing(ctx: &LedgerContext, customer_id: i64, category: Option<&str>) -> Result<i64> {
        let query = ProjectionQuery {
            category: category.map(Category::new).transpose()?,
            ..ProjectionQuery::default()
        };
        Ok(projector::project_balance(&ctx.db, &ctx.clock, customer_id, &query)
            .await?
            .closing)
    }

    #[test]
    fn test_validate_debt_rules() {
        let when = at(2024, 3, 1, 10, 0);

        let record = validate_debt(NewDebt::from_items(1, vec![sugar(3)], "Grocery", when)).unwrap();
        assert_eq!(record.amount, 900);

        let record = validate_debt(NewDebt::manual(1, 500, " Cash ", when).with_note("  ")).unwrap();
        assert_eq!(record.category.as_str(), "Cash");
        assert_eq!(record.note, None);

        let mismatch = NewDebt {
            amount: Some(1000),
            ..NewDebt::from_items(1, vec![sugar(3)], "Grocery", when)
        };
        assert!(matches!(
            validate_debt(mismatch).unwrap_err(),
            Error::InvariantViolation { .. }
        ));

        let matching = NewDebt {
            amount: Some(900),
            ..NewDebt::from_items(1, vec![sugar(3)], "Grocery", when)
        };
        assert_eq!(validate_debt(matching).unwrap().amount, 900);

        for bad in [
            NewDebt::manual(1, 0, "Cash", when),
            NewDebt::manual(1, -5, "Cash", when),
            NewDebt {
                amount: None,
                ..NewDebt::manual(1, 1, "Cash", when)
            },
        ] {
            assert!(matches!(
                validate_debt(bad).unwrap_err(),
                Error::Validation { field: "amount", .. }
            ));
        }

        assert!(matches!(
            validate_debt(NewDebt::from_items(1, vec![sugar(0)], "Grocery", when)).unwrap_err(),
            Error::Validation {
                field: "line_items",
                ..
            }
        ));
        assert!(matches!(
            validate_debt(NewDebt::manual(1, 100, "", when)).unwrap_err(),
            Error::Validation {
                field: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_free_line_items_alone_are_rejected() {
        let free = NewLineItem {
            unit_price: 0,
            ..sugar(2)
        };
        let request = NewDebt::from_items(1, vec![free], "Grocery", at(2024, 3, 1, 10, 0));
        assert!(matches!(
            validate_debt(request).unwrap_err(),
            Error::Validation { field: "amount", .. }
        ));
    }

    #[tokio::test]
    async fn test_create_debt_signals_refresh() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        let before = refresh::current_token(&ctx.db, customer.id).await?;

        let debt = create_debt(
            &ctx,
            NewDebt::from_items(customer.id, vec![sugar(2)], "Grocery", at(2024, 3, 1, 10, 0)),
        )
        .await?;

        assert_eq!(debt.amount, 600);
        assert_eq!(debt.item_names, vec!["Sugar 1kg".to_string()]);
        assert_eq!(refresh::current_token(&ctx.db, customer.id).await?, before + 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_debt_for_unknown_customer_writes_nothing() -> Result<()> {
        let ctx = setup_ledger().await?;
        let result = create_debt(&ctx, NewDebt::manual(77, 100, "Cash", at(2024, 3, 1, 10, 0))).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "customer_id",
                ..
            }
        ));
        assert_eq!(store::count_by_customer(&ctx.db, 77).await?, 0);
        assert_eq!(refresh::current_token(&ctx.db, 77).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_rice_to_grocery() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;

        let d1 = create_debt(
            &ctx,
            NewDebt::manual(customer.id, 500, "Rice", at(2024, 3, 1, 10, 0)),
        )
        .await?;
        repayment::create_repayment(&ctx, customer.id, "Rice", 200, at(2024, 3, 2, 9, 0)).await?;
        reassign_category(&ctx, EventKind::Debt, d1.id, "Grocery", true).await?;

        assert_eq!(closing(&ctx, customer.id, Some("Rice")).await?, -200);
        assert_eq!(closing(&ctx, customer.id, Some("Grocery")).await?, 500);
        assert_eq!(closing(&ctx, customer.id, None).await?, 300);

        let categories = projector::list_categories(&ctx.db, customer.id).await?;
        let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
        assert_eq!(names, vec!["Grocery", "Rice"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_reassignment_moves_exact_amount() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        create_debt(&ctx, NewDebt::manual(customer.id, 700, "Oil", at(2024, 3, 1, 8, 0))).await?;
        let moved = create_debt(
            &ctx,
            NewDebt::from_items(customer.id, vec![sugar(1), sugar(4)], "Oil", at(2024, 3, 1, 9, 0)),
        )
        .await?;
        create_debt(&ctx, NewDebt::manual(customer.id, 100, "Sugar", at(2024, 3, 1, 10, 0))).await?;

        let oil_before = closing(&ctx, customer.id, Some("Oil")).await?;
        let sugar_before = closing(&ctx, customer.id, Some("Sugar")).await?;
        let total_before = closing(&ctx, customer.id, None).await?;

        let updated = reassign_category(&ctx, EventKind::Debt, moved.id, "Sugar", true).await?;
        assert_eq!(updated.item_names.len(), 2);

        assert_eq!(closing(&ctx, customer.id, Some("Oil")).await?, oil_before - moved.amount);
        assert_eq!(closing(&ctx, customer.id, Some("Sugar")).await?, sugar_before + moved.amount);
        assert_eq!(closing(&ctx, customer.id, None).await?, total_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_reassign_rejections_leave_store_unchanged() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        let debt = create_debt(&ctx, NewDebt::manual(customer.id, 500, "Rice", at(2024, 3, 1, 10, 0))).await?;
        let token = refresh::current_token(&ctx.db, customer.id).await?;

        assert!(matches!(
            reassign_category(&ctx, EventKind::Debt, debt.id, "Grocery", false).await.unwrap_err(),
            Error::Unauthorized { .. }
        ));
        assert!(matches!(
            reassign_category(&ctx, EventKind::Debt, debt.id, "   ", true).await.unwrap_err(),
            Error::Validation {
                field: "category",
                ..
            }
        ));
        assert!(matches!(
            reassign_category(&ctx, EventKind::Repayment, debt.id, "Grocery", true)
                .await
                .unwrap_err(),
            Error::NotFound {
                kind: EventKind::Repayment,
                ..
            }
        ));

        let stored = store::require_event(&ctx.db, EventKind::Debt, debt.id).await?;
        assert_eq!(stored.category.as_str(), "Rice");
        assert_eq!(refresh::current_token(&ctx.db, customer.id).await?, token);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_with_wrong_secret_changes_nothing() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        credential::set_secret(&ctx.db, "admin-1", "correct horse").await?;
        let debt = create_debt(&ctx, NewDebt::manual(customer.id, 500, "Rice", at(2024, 3, 1, 10, 0))).await?;
        repayment::create_repayment(&ctx, customer.id, "Oil", 50, at(2024, 3, 2, 10, 0)).await?;

        let categories_before = projector::list_categories(&ctx.db, customer.id).await?;
        let projection_before =
            projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all()).await?;
        let count_before = store::count_by_customer(&ctx.db, customer.id).await?;

        let result = delete_event(&ctx, EventKind::Debt, debt.id, "admin-1", "wrong").await;
        assert!(matches!(result.unwrap_err(), Error::Auth));

        assert_eq!(projector::list_categories(&ctx.db, customer.id).await?, categories_before);
        assert_eq!(
            projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all()).await?,
            projection_before
        );
        assert_eq!(store::count_by_customer(&ctx.db, customer.id).await?, count_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_does_not_reveal_missing_ids() -> Result<()> {
        let ctx = setup_ledger().await?;
        credential::set_secret(&ctx.db, "admin-1", "correct horse").await?;

        let wrong = delete_event(&ctx, EventKind::Debt, 999, "admin-1", "nope").await;
        assert!(matches!(wrong.unwrap_err(), Error::Auth));

        let unknown_user = delete_event(&ctx, EventKind::Debt, 999, "stranger", "correct horse").await;
        assert!(matches!(unknown_user.unwrap_err(), Error::Auth));

        let right = delete_event(&ctx, EventKind::Debt, 999, "admin-1", "correct horse").await;
        assert!(matches!(
            right.unwrap_err(),
            Error::NotFound {
                kind: EventKind::Debt,
                id: 999
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_with_secret_removes_event() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        credential::set_secret(&ctx.db, "admin-1", "correct horse").await?;
        let debt = create_debt(
            &ctx,
            NewDebt::from_items(customer.id, vec![sugar(2)], "Grocery", at(2024, 3, 1, 10, 0)),
        )
        .await?;
        let payment =
            repayment::create_repayment(&ctx, customer.id, "Grocery", 100, at(2024, 3, 2, 10, 0)).await?;
        let token = refresh::current_token(&ctx.db, customer.id).await?;

        let removed = delete_event(&ctx, EventKind::Debt, debt.id, "admin-1", "correct horse").await?;
        assert_eq!(removed.id, debt.id);
        assert_eq!(refresh::current_token(&ctx.db, customer.id).await?, token + 1);
        assert_eq!(closing(&ctx, customer.id, Some("Grocery")).await?, -100);

        // Every delete asks again
        assert!(delete_event(&ctx, EventKind::Repayment, payment.id, "admin-1", "").await.is_err());
        delete_event(&ctx, EventKind::Repayment, payment.id, "admin-1", "correct horse").await?;
        assert!(projector::list_categories(&ctx.db, customer.id).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_projection_token_tracks_mutations() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        let first = projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all()).await?;
        let again = projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all()).await?;
        assert_eq!(first, again);

        create_debt(&ctx, NewDebt::manual(customer.id, 100, "Cash", at(2024, 3, 1, 10, 0))).await?;
        let after = projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all()).await?;
        assert!(after.refresh_token > first.refresh_token);
        assert_eq!(after.closing, 100);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_debts_for_one_customer_all_land() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;

        let customer_id = customer.id;
        let mut handles = Vec::new();
        for n in 0..8u32 {
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                create_debt(&ctx, NewDebt::manual(customer_id, 10, "Cash", at(2024, 3, 1, 10, n))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap()?;
        }

        assert_eq!(store::count_by_customer(&ctx.db, customer.id).await?, 8);
        assert_eq!(closing(&ctx, customer.id, None).await?, 80);
        assert_eq!(refresh::current_token(&ctx.db, customer.id).await?, 8);
        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_price_change_leaves_recorded_sale_alone() -> Result<()> {
        let (ctx, customer) = setup_ledger_with_customer().await?;
        let rice = product::create_product(&ctx.db, "Rice 5kg", 2500, Some("Rice")).await?;

        let sale = create_debt(
            &ctx,
            NewDebt::from_items(
                customer.id,
                vec![NewLineItem::from_product(&rice, 2)],
                "Rice",
                at(2024, 3, 1, 10, 0),
            ),
        )
        .await?;
        assert_eq!(sale.amount, 5000);
        let before = projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all())
            .await?
            .closing;

        product::update_product_price(&ctx.db, rice.id, 3100).await?;

        let stored = store::require_event(&ctx.db, EventKind::Debt, sale.id).await?;
        assert_eq!(stored.amount, 5000);
        let after = projector::project_balance(&ctx.db, &ctx.clock, customer.id, &ProjectionQuery::all())
            .await?
            .closing;
        assert_eq!(after, before);

        let items = DebtLineItem::find()
            .filter(debt_line_item::Column::DebtId.eq(sale.id))
            .all(&ctx.db)
            .await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].unit_price, 2500);
        assert_eq!(items[0].product_id, Some(rice.id));
        Ok(())
    }
}
