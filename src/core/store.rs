//! Event store - Appending, listing, re-categorizing and deleting ledger events.
//!
//! These functions are the only code that writes the `debts`, `debt_line_items` and
//! `repayments` tables. They never open their own database transaction: callers pass
//! a transaction when several writes must land together (see `core::gateway`).
//! Reads return events in `(occurred_at, sequence)` order.

use crate::{
    core::{
        category::Category,
        customer,
        event::{EventKind, LedgerEvent},
        refresh,
    },
    entities::{Debt, DebtLineItem, Repayment, debt, debt_line_item, repayment},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Set, prelude::*};
use std::collections::{BTreeSet, HashMap};

/// A product snapshot to attach to a new debt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLineItem {
    /// Catalog product this line was copied from
    pub product_id: Option<i64>,
    /// Product name at the time of sale
    pub product_name: String,
    /// Units sold, at least one
    pub quantity: i64,
    /// Unit price in minor units
    pub unit_price: i64,
    /// Creation-time category hint
    pub category: Option<Category>,
}

impl NewLineItem {
    /// Freezes a catalog product into a line item.
    #[must_use]
    pub fn from_product(product: &crate::entities::product::Model, quantity: i64) -> Self {
        Self {
            product_id: Some(product.id),
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            category: product.category.as_deref().and_then(|c| Category::new(c).ok()),
        }
    }
}

/// A fully validated debt ready to be written.
#[derive(Debug, Clone)]
pub struct DebtRecord {
    /// Owning customer
    pub customer_id: i64,
    /// Positive amount in minor units
    pub amount: i64,
    /// Sub-ledger key
    pub category: Category,
    /// When the debt was incurred
    pub occurred_at: DateTime<Utc>,
    /// Optional free-text note
    pub note: Option<String>,
    /// Product snapshots, possibly empty for manual entries
    pub line_items: Vec<NewLineItem>,
}

/// A fully validated repayment ready to be written.
#[derive(Debug, Clone)]
pub struct RepaymentRecord {
    /// Owning customer
    pub customer_id: i64,
    /// Positive amount in minor units
    pub amount: i64,
    /// Sub-ledger the credit applies to
    pub category: Category,
    /// When the payment was received
    pub occurred_at: DateTime<Utc>,
}

async fn check_append<C>(db: &C, customer_id: i64, amount: i64) -> Result<()>
where
    C: ConnectionTrait,
{
    if amount <= 0 {
        return Err(Error::validation(
            "amount",
            format!("amount must be positive, got {amount}"),
        ));
    }
    customer::require_customer(db, customer_id).await?;
    Ok(())
}

/// Writes a debt and its line items.
///
/// # Errors
/// Returns a validation error if the amount is not positive or the customer is unknown.
pub async fn append_debt<C>(db: &C, record: DebtRecord) -> Result<LedgerEvent>
where
    C: ConnectionTrait,
{
    check_append(db, record.customer_id, record.amount).await?;
    let sequence = refresh::next_event_sequence(db).await?;

    let model = debt::ActiveModel {
        customer_id: Set(record.customer_id),
        amount: Set(record.amount),
        category: Set(record.category.as_str().to_string()),
        occurred_at: Set(record.occurred_at),
        sequence: Set(sequence),
        note: Set(record.note),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let mut items = Vec::with_capacity(record.line_items.len());
    for item in record.line_items {
        let row = debt_line_item::ActiveModel {
            debt_id: Set(model.id),
            product_id: Set(item.product_id),
            product_name: Set(item.product_name),
            quantity: Set(item.quantity),
            unit_price: Set(item.unit_price),
            category: Set(item.category.map(String::from)),
            ..Default::default()
        }
        .insert(db)
        .await?;
        items.push(row);
    }

    LedgerEvent::from_debt(model, &items)
}

/// Writes a repayment.
///
/// # Errors
/// Returns a validation error if the amount is not positive or the customer is unknown.
pub async fn append_repayment<C>(db: &C, record: RepaymentRecord) -> Result<LedgerEvent>
where
    C: ConnectionTrait,
{
    check_append(db, record.customer_id, record.amount).await?;
    let sequence = refresh::next_event_sequence(db).await?;

    let model = repayment::ActiveModel {
        customer_id: Set(record.customer_id),
        amount: Set(record.amount),
        category: Set(record.category.as_str().to_string()),
        occurred_at: Set(record.occurred_at),
        sequence: Set(sequence),
        ..Default::default()
    }
    .insert(db)
    .await?;

    LedgerEvent::from_repayment(model)
}

/// Every event of a customer, oldest first.
pub async fn list_by_customer<C>(db: &C, customer_id: i64) -> Result<Vec<LedgerEvent>>
where
    C: ConnectionTrait,
{
    let debts = Debt::find()
        .filter(debt::Column::CustomerId.eq(customer_id))
        .order_by_asc(debt::Column::Sequence)
        .all(db)
        .await?;
    let repayments = Repayment::find()
        .filter(repayment::Column::CustomerId.eq(customer_id))
        .order_by_asc(repayment::Column::Sequence)
        .all(db)
        .await?;

    let debt_ids: Vec<i64> = debts.iter().map(|d| d.id).collect();
    let mut items_by_debt: HashMap<i64, Vec<debt_line_item::Model>> = HashMap::new();
    if !debt_ids.is_empty() {
        for item in DebtLineItem::find()
            .filter(debt_line_item::Column::DebtId.is_in(debt_ids))
            .order_by_asc(debt_line_item::Column::Id)
            .all(db)
            .await?
        {
            items_by_debt.entry(item.debt_id).or_default().push(item);
        }
    }

    let mut events = Vec::with_capacity(debts.len() + repayments.len());
    for model in debts {
        let items = items_by_debt.remove(&model.id).unwrap_or_default();
        events.push(LedgerEvent::from_debt(model, &items)?);
    }
    for model in repayments {
        events.push(LedgerEvent::from_repayment(model)?);
    }
    events.sort_by(LedgerEvent::chronological_cmp);

    tracing::trace!("Loaded {} events for customer {customer_id}", events.len());
    Ok(events)
}

/// Looks up a single event.
pub async fn find_event<C>(db: &C, kind: EventKind, id: i64) -> Result<Option<LedgerEvent>>
where
    C: ConnectionTrait,
{
    match kind {
        EventKind::Debt => {
            let Some(model) = Debt::find_by_id(id).one(db).await? else {
                return Ok(None);
            };
            let items = DebtLineItem::find()
                .filter(debt_line_item::Column::DebtId.eq(id))
                .order_by_asc(debt_line_item::Column::Id)
                .all(db)
                .await?;
            LedgerEvent::from_debt(model, &items).map(Some)
        }
        EventKind::Repayment => match Repayment::find_by_id(id).one(db).await? {
            Some(model) => LedgerEvent::from_repayment(model).map(Some),
            None => Ok(None),
        },
    }
}

/// Looks up a single event, failing with [`Error::NotFound`] when it is missing.
pub async fn require_event<C>(db: &C, kind: EventKind, id: i64) -> Result<LedgerEvent>
where
    C: ConnectionTrait,
{
    find_event(db, kind, id)
        .await?
        .ok_or(Error::NotFound { kind, id })
}

/// Rewrites the category of one event. Line items and sibling events are untouched.
///
/// # Errors
/// Returns [`Error::NotFound`] if the event does not exist.
pub async fn reassign_category<C>(
    db: &C,
    kind: EventKind,
    id: i64,
    category: &Category,
) -> Result<LedgerEvent>
where
    C: ConnectionTrait,
{
    match kind {
        EventKind::Debt => {
            let existing = Debt::find_by_id(id)
                .one(db)
                .await?
                .ok_or(Error::NotFound { kind, id })?;
            let mut active_model: debt::ActiveModel = existing.into();
            active_model.category = Set(category.as_str().to_string());
            active_model.update(db).await?;
        }
        EventKind::Repayment => {
            let existing = Repayment::find_by_id(id)
                .one(db)
                .await?
                .ok_or(Error::NotFound { kind, id })?;
            let mut active_model: repayment::ActiveModel = existing.into();
            active_model.category = Set(category.as_str().to_string());
            active_model.update(db).await?;
        }
    }
    require_event(db, kind, id).await
}

/// Removes one event, and for debts its line items, returning what was removed.
///
/// # Errors
/// Returns [`Error::NotFound`] if the event does not exist.
pub async fn delete_event<C>(db: &C, kind: EventKind, id: i64) -> Result<LedgerEvent>
where
    C: ConnectionTrait,
{
    let removed = require_event(db, kind, id).await?;
    match kind {
        EventKind::Debt => {
            DebtLineItem::delete_many()
                .filter(debt_line_item::Column::DebtId.eq(id))
                .exec(db)
                .await?;
            Debt::delete_by_id(id).exec(db).await?;
        }
        EventKind::Repayment => {
            Repayment::delete_by_id(id).exec(db).await?;
        }
    }
    Ok(removed)
}

/// Number of stored events for a customer.
pub async fn count_by_customer<C>(db: &C, customer_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let debts = Debt::find()
        .filter(debt::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;
    let repayments = Repayment::find()
        .filter(repayment::Column::CustomerId.eq(customer_id))
        .count(db)
        .await?;
    Ok(debts + repayments)
}

/// Every category referenced by any stored event, sorted.
///
/// Used for suggestions; a category exists only while some event names it.
pub async fn known_categories<C>(db: &C) -> Result<Vec<Category>>
where
    C: ConnectionTrait,
{
    let debt_labels: Vec<String> = Debt::find()
        .select_only()
        .column(debt::Column::Category)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;
    let repayment_labels: Vec<String> = Repayment::find()
        .select_only()
        .column(repayment::Column::Category)
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    let unique: BTreeSet<Category> = debt_labels
        .iter()
        .chain(&repayment_labels)
        .filter_map(|label| Category::new(label).ok())
        .collect();
    Ok(unique.into_iter().collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn repayment_record(customer_id: i64, amount: i64, category: &str, day: u32) -> RepaymentRecord {
        RepaymentRecord {
            customer_id,
            amount,
            category: Category::new(category).unwrap(),
            occurred_at: at(2024, 3, day, 9, 0),
        }
    }

    #[tokio::test]
    async fn test_append_rejects_non_positive_amount() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        for amount in [0, -100] {
            let result = append_repayment(&db, repayment_record(customer.id, amount, "Rice", 1)).await;
            assert!(matches!(
                result.unwrap_err(),
                Error::Validation { field: "amount", .. }
            ));
        }
        assert_eq!(count_by_customer(&db, customer.id).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_rejects_unknown_customer() -> Result<()> {
        let db = setup_test_db().await?;
        let result = append_repayment(&db, repayment_record(42, 100, "Rice", 1)).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation {
                field: "customer_id",
                ..
            }
        ));
        assert_eq!(count_by_customer(&db, 42).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_by_time_then_insertion() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let same_instant = at(2024, 3, 2, 9, 0);

        // Inserted out of chronological order, plus a tie at `same_instant`
        let late = append_test_debt(&db, customer.id, 500, "Rice", at(2024, 3, 5, 8, 0)).await?;
        let tie_first = append_test_debt(&db, customer.id, 100, "Rice", same_instant).await?;
        let tie_second = append_repayment(
            &db,
            RepaymentRecord {
                customer_id: customer.id,
                amount: 50,
                category: Category::new("Rice").unwrap(),
                occurred_at: same_instant,
            },
        )
        .await?;
        let early = append_test_debt(&db, customer.id, 70, "Oil", at(2024, 3, 1, 8, 0)).await?;

        let events = list_by_customer(&db, customer.id).await?;
        let order: Vec<(EventKind, i64)> = events.iter().map(|e| (e.kind, e.id)).collect();
        assert_eq!(
            order,
            vec![
                (EventKind::Debt, early.id),
                (EventKind::Debt, tie_first.id),
                (EventKind::Repayment, tie_second.id),
                (EventKind::Debt, late.id),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_line_items_round_trip_through_listing() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let record = DebtRecord {
            customer_id: customer.id,
            amount: 900,
            category: Category::new("Grocery").unwrap(),
            occurred_at: at(2024, 3, 1, 10, 0),
            note: None,
            line_items: vec![NewLineItem {
                product_id: None,
                product_name: "Sugar 1kg".to_string(),
                quantity: 3,
                unit_price: 300,
                category: Some(Category::new("Sweets").unwrap()),
            }],
        };
        append_debt(&db, record).await?;

        let events = list_by_customer(&db, customer.id).await?;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].item_names, vec!["Sugar 1kg".to_string()]);
        assert_eq!(events[0].category.as_str(), "Grocery");
        Ok(())
    }

    #[tokio::test]
    async fn test_reassign_and_delete_missing_event() -> Result<()> {
        let db = setup_test_db().await?;
        let category = Category::new("Rice").unwrap();

        assert!(matches!(
            reassign_category(&db, EventKind::Debt, 9, &category).await.unwrap_err(),
            Error::NotFound {
                kind: EventKind::Debt,
                id: 9
            }
        ));
        assert!(matches!(
            delete_event(&db, EventKind::Repayment, 9).await.unwrap_err(),
            Error::NotFound {
                kind: EventKind::Repayment,
                id: 9
            }
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_debt_removes_line_items() -> Result<()> {
        let (db, customer) = setup_with_customer().await?;
        let record = DebtRecord {
            customer_id: customer.id,
            amount: 600,
            category: Category::new("Grocery").unwrap(),
            occurred_at: at(2024, 3, 1, 10, 0),
            note: None,
            line_items: vec![NewLineItem {
                product_id: None,
                product_name: "Sugar 1kg".to_string(),
                quantity: 2,
                unit_price: 300,
                category: None,
            }],
        };
        let debt = append_debt(&db, record).await?;

        delete_event(&db, EventKind::Debt, debt.id).await?;
        assert_eq!(count_by_customer(&db, customer.id).await?, 0);
        assert_eq!(DebtLineItem::find().count(&db).await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_known_categories_spans_customers_and_kinds() -> Result<()> {
        let (db, first) = setup_with_customer().await?;
        let second = create_test_customer(&db, "Second").await?;
        append_test_debt(&db, first.id, 100, "Rice", at(2024, 3, 1, 9, 0)).await?;
        append_test_debt(&db, second.id, 100, "Rice", at(2024, 3, 1, 9, 0)).await?;
        append_repayment(&db, repayment_record(second.id, 50, "Oil", 2)).await?;

        let names: Vec<String> = known_categories(&db)
            .await?
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(names, vec!["Oil", "Rice"]);
        Ok(())
    }
}
