//! The unified view of ledger events.
//!
//! Debts and repayments are stored in separate tables but projected as one stream.
//! `LedgerEvent` is that stream's element: a kind, a positive amount and the
//! category and instant it belongs to.

use crate::{
    core::{calendar::LedgerClock, category::Category},
    entities::{debt, debt_line_item, repayment},
    errors::{Error, Result},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Which table an event lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A charge; increases what the customer owes
    Debt,
    /// A credit; decreases what the customer owes
    Repayment,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debt => f.write_str("debt"),
            Self::Repayment => f.write_str("repayment"),
        }
    }
}

impl FromStr for EventKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debt" => Ok(Self::Debt),
            "repayment" | "payment" => Ok(Self::Repayment),
            other => Err(Error::validation(
                "event_type",
                format!("unknown event type '{other}'"),
            )),
        }
    }
}

/// One debt or repayment, as the projector sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Row id within the kind's table
    pub id: i64,
    /// Debt or repayment
    pub kind: EventKind,
    /// Owning customer
    pub customer_id: i64,
    /// Positive amount in minor units
    pub amount: i64,
    /// Sub-ledger key
    pub category: Category,
    /// Authoritative instant for ordering
    pub occurred_at: DateTime<Utc>,
    /// Insertion counter shared by both tables
    pub sequence: i64,
    /// Free-text note, debts only
    pub note: Option<String>,
    /// Product names from the debt's line items
    pub item_names: Vec<String>,
}

impl LedgerEvent {
    /// The event's effect on a running balance: `+amount` for debts, `-amount` for repayments.
    #[must_use]
    pub const fn signed_amount(&self) -> i64 {
        match self.kind {
            EventKind::Debt => self.amount,
            EventKind::Repayment => -self.amount,
        }
    }

    /// The local calendar day this event falls on.
    #[must_use]
    pub fn local_date(&self, clock: &LedgerClock) -> NaiveDate {
        clock.local_date(self.occurred_at)
    }

    /// Chronological order with insertion order as the tie-break.
    #[must_use]
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.occurred_at
            .cmp(&other.occurred_at)
            .then(self.sequence.cmp(&other.sequence))
    }

    /// Case-insensitive match against the note and line-item names.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.note
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&needle))
            || self
                .item_names
                .iter()
                .any(|n| n.to_lowercase().contains(&needle))
    }

    /// Builds the event view of a stored debt and its line items.
    pub fn from_debt(model: debt::Model, items: &[debt_line_item::Model]) -> Result<Self> {
        let category = stored_category(&model.category, EventKind::Debt, model.id)?;
        Ok(Self {
            id: model.id,
            kind: EventKind::Debt,
            customer_id: model.customer_id,
            amount: model.amount,
            category,
            occurred_at: model.occurred_at,
            sequence: model.sequence,
            note: model.note,
            item_names: items.iter().map(|i| i.product_name.clone()).collect(),
        })
    }

    /// Builds the event view of a stored repayment.
    pub fn from_repayment(model: repayment::Model) -> Result<Self> {
        let category = stored_category(&model.category, EventKind::Repayment, model.id)?;
        Ok(Self {
            id: model.id,
            kind: EventKind::Repayment,
            customer_id: model.customer_id,
            amount: model.amount,
            category,
            occurred_at: model.occurred_at,
            sequence: model.sequence,
            note: None,
            item_names: Vec::new(),
        })
    }
}

fn stored_category(raw: &str, kind: EventKind, id: i64) -> Result<Category> {
    Category::new(raw).map_err(|_| {
        let message = format!("{kind} {id} is stored with an empty category");
        tracing::error!("{message}");
        Error::InvariantViolation { message }
    })
}
