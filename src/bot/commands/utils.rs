//! Parsing helpers shared by the commands.

use crate::{
    core::{customer, event::EventKind},
    entities::customer as customer_entity,
    errors::{Error, Result},
};
use chrono::NaiveDate;
use sea_orm::ConnectionTrait;

/// Entry kind as offered in a slash-command choice list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum EntryKind {
    /// A debt entry
    #[name = "debt"]
    Debt,
    /// A repayment entry
    #[name = "repayment"]
    Repayment,
}

impl From<EntryKind> for EventKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Debt => Self::Debt,
            EntryKind::Repayment => Self::Repayment,
        }
    }
}

/// Parses a `YYYY-MM-DD` date argument.
///
/// # Errors
/// Returns a validation error on `date` if the text is not a calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| Error::validation("date", format!("'{input}' is not a YYYY-MM-DD date")))
}

/// Resolves a customer by display name, case-insensitively.
///
/// # Errors
/// Returns a validation error on `customer` if nobody has that name.
pub async fn resolve_customer<C>(db: &C, name: &str) -> Result<customer_entity::Model>
where
    C: ConnectionTrait,
{
    customer::find_customer_by_name(db, name)
        .await?
        .ok_or_else(|| Error::validation("customer", format!("no customer named '{}'", name.trim())))
}
