//! Balance projector - Derives balances from the event stream.
//!
//! Nothing here is stored. Every projection starts from the customer's full event
//! list, walks it in `(occurred_at, sequence)` order and adds `+amount` for a debt
//! and `-amount` for a repayment. Per-category balances may go negative when a
//! repayment has no matching debt; only the whole-customer display figure is clamped.
//!
//! The pure functions take an already fetched slice of events and never touch the
//! database. The async entry points fetch one consistent snapshot (events plus the
//! refresh token) inside a single read transaction and then call the pure code.

use crate::{
    core::{
        calendar::LedgerClock,
        category::{self, Category},
        customer,
        event::LedgerEvent,
        refresh, store,
    },
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::collections::BTreeMap;

/// What to project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionQuery {
    /// Restrict to one category, or `None` for the whole customer
    pub category: Option<Category>,
    /// Local calendar day to project, or `None` for the full ledger
    pub as_of: Option<NaiveDate>,
    /// Only list events whose note or item names contain this text
    pub search: Option<String>,
    /// List entries newest first
    pub newest_first: bool,
}

impl ProjectionQuery {
    /// Whole-customer ledger with no filters.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// One category, full ledger.
    #[must_use]
    pub fn for_category(category: Category) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    /// Sets the as-of day.
    #[must_use]
    pub fn as_of(mut self, date: NaiveDate) -> Self {
        self.as_of = Some(date);
        self
    }
}

/// An event annotated with the running balance including it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerLine {
    /// The event
    pub event: LedgerEvent,
    /// Balance after applying this event
    pub running_balance: i64,
}

/// Opening balance, the listed events and the closing balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    /// Balance before the as-of day; zero for an undated ledger
    pub opening: i64,
    /// Events on the as-of day, or every event for an undated ledger
    pub entries: Vec<LedgerLine>,
    /// Balance after the last event on or before the as-of day
    pub closing: i64,
    /// Refresh token the projection was computed under
    pub refresh_token: u64,
}

/// One category's slice of a customer overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRow {
    /// Sub-ledger key
    pub category: Category,
    /// Balance before the as-of day
    pub opening: i64,
    /// Matching events of the day (or of the whole ledger)
    pub entries: Vec<LedgerLine>,
    /// Balance at the end of the day
    pub closing: i64,
}

impl CategoryRow {
    /// A row is worth showing when it carries a balance into the day or has matching activity.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.opening != 0 || !self.entries.is_empty()
    }
}

/// A customer's projection split by category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOverview {
    /// Visible category rows in lexicographic order
    pub rows: Vec<CategoryRow>,
    /// Closing balance of every category at the end of the day, hidden rows included
    pub balances: BTreeMap<Category, i64>,
    /// Whole-customer projection
    pub total: Projection,
}

impl CustomerOverview {
    /// The whole-customer closing balance for "good standing" displays; never negative.
    #[must_use]
    pub fn display_total(&self) -> i64 {
        self.total.closing.max(0)
    }
}

fn add(balance: i64, event: &LedgerEvent) -> Result<i64> {
    balance.checked_add(event.signed_amount()).ok_or_else(|| {
        let message = format!(
            "running balance overflow at {} {} for customer {}",
            event.kind, event.id, event.customer_id
        );
        tracing::error!("{message}");
        Error::InvariantViolation { message }
    })
}

/// Running balances over `events`, which must already be in chronological order.
fn running_balances(events: &[LedgerEvent]) -> Result<Vec<LedgerLine>> {
    let mut balance = 0i64;
    events
        .iter()
        .map(|event| {
            balance = add(balance, event)?;
            Ok(LedgerLine {
                event: event.clone(),
                running_balance: balance,
            })
        })
        .collect()
}

/// Projects an already fetched event list.
///
/// # Errors
/// Returns [`Error::InvariantViolation`] if a running balance overflows.
pub fn project(
    events: &[LedgerEvent],
    clock: &LedgerClock,
    query: &ProjectionQuery,
) -> Result<Projection> {
    let mut selected: Vec<LedgerEvent> = events
        .iter()
        .filter(|e| query.category.as_ref().is_none_or(|c| &e.category == c))
        .cloned()
        .collect();
    selected.sort_by(LedgerEvent::chronological_cmp);

    let (opening, mut entries, closing) = match query.as_of {
        Some(day) => {
            let mut opening = 0i64;
            let mut balance = 0i64;
            let mut entries = Vec::new();
            for event in &selected {
                let event_day = event.local_date(clock);
                if event_day > day {
                    break;
                }
                balance = add(balance, event)?;
                if event_day < day {
                    opening = balance;
                } else {
                    entries.push(LedgerLine {
                        event: event.clone(),
                        running_balance: balance,
                    });
                }
            }
            (opening, entries, balance)
        }
        None => {
            let entries = running_balances(&selected)?;
            let closing = entries.last().map_or(0, |line| line.running_balance);
            (0, entries, closing)
        }
    };

    if let Some(needle) = query.search.as_deref() {
        entries.retain(|line| line.event.matches_search(needle));
    }
    if query.newest_first {
        entries.reverse();
    }

    tracing::trace!(
        "Projected {:?}: opening={opening}, closing={closing}, {} entries",
        query.category,
        entries.len()
    );

    Ok(Projection {
        opening,
        entries,
        closing,
        refresh_token: 0,
    })
}

/// Closing balance of every category, including categories that net to zero.
fn category_balances(events: &[LedgerEvent]) -> Result<BTreeMap<Category, i64>> {
    category::partition(events)
        .into_iter()
        .map(|(category, group)| {
            let closing = group.iter().try_fold(0i64, add)?;
            Ok((category, closing))
        })
        .collect()
}

/// Splits a customer's projection into per-category rows.
///
/// Rows with no opening balance and no matching entries are left out; rows that net
/// to zero during the day are kept.
pub fn overview(
    events: &[LedgerEvent],
    clock: &LedgerClock,
    as_of: Option<NaiveDate>,
    search: Option<&str>,
) -> Result<CustomerOverview> {
    let base = ProjectionQuery {
        category: None,
        as_of,
        search: search.map(ToString::to_string),
        newest_first: false,
    };

    let mut rows = Vec::new();
    for category in category::categories_of(events) {
        let query = ProjectionQuery {
            category: Some(category.clone()),
            ..base.clone()
        };
        let projection = project(events, clock, &query)?;
        let row = CategoryRow {
            category,
            opening: projection.opening,
            entries: projection.entries,
            closing: projection.closing,
        };
        if row.is_visible() {
            rows.push(row);
        }
    }

    let through_day: Vec<LedgerEvent> = events
        .iter()
        .filter(|event| as_of.is_none_or(|day| event.local_date(clock) <= day))
        .cloned()
        .collect();
    let balances = category_balances(&through_day)?;

    let total = project(events, clock, &base)?;
    Ok(CustomerOverview {
        rows,
        balances,
        total,
    })
}

/// Reads a customer's events and refresh token as one snapshot.
async fn snapshot(db: &DatabaseConnection, customer_id: i64) -> Result<(Vec<LedgerEvent>, u64)> {
    let txn = db.begin().await?;
    customer::require_customer(&txn, customer_id).await?;
    let events = store::list_by_customer(&txn, customer_id).await?;
    let token = refresh::current_token(&txn, customer_id).await?;
    txn.commit().await?;
    Ok((events, token))
}

/// Projects a customer's balance from a fresh snapshot of the event store.
///
/// # Errors
/// Returns a validation error for an unknown customer, or a database error.
pub async fn project_balance(
    db: &DatabaseConnection,
    clock: &LedgerClock,
    customer_id: i64,
    query: &ProjectionQuery,
) -> Result<Projection> {
    let (events, refresh_token) = snapshot(db, customer_id).await?;
    let projection = project(&events, clock, query)?;
    Ok(Projection {
        refresh_token,
        ..projection
    })
}

/// Per-category overview of a customer from a fresh snapshot.
///
/// # Errors
/// Returns a validation error for an unknown customer, or a database error.
pub async fn customer_overview(
    db: &DatabaseConnection,
    clock: &LedgerClock,
    customer_id: i64,
    as_of: Option<NaiveDate>,
    search: Option<&str>,
) -> Result<CustomerOverview> {
    let (events, refresh_token) = snapshot(db, customer_id).await?;
    let mut result = overview(&events, clock, as_of, search)?;
    result.total.refresh_token = refresh_token;
    Ok(result)
}

/// The categories a customer's events reference, sorted lexicographically.
///
/// # Errors
/// Returns a validation error for an unknown customer, or a database error.
pub async fn list_categories(db: &DatabaseConnection, customer_id: i64) -> Result<Vec<Category>> {
    let (events, _) = snapshot(db, customer_id).await?;
    Ok(category::categories_of(&events))
}
