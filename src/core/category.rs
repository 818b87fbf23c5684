//! Categories are implicit sub-ledger keys.
//!
//! A category exists exactly while at least one event references it. The only rule
//! the type enforces is that the label is non-empty after trimming; case is kept
//! as entered, so "Rice" and "rice" are different sub-ledgers.

use crate::{
    core::event::LedgerEvent,
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// A trimmed, non-empty category label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Category(String);

impl Category {
    /// Validates and normalizes a raw label.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::validation("category", "category must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The normalized label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Category {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.0
    }
}

/// Groups events by category.
///
/// The map iterates categories in lexicographic order. Events keep their relative
/// order from the input slice.
#[must_use]
pub fn partition(events: &[LedgerEvent]) -> BTreeMap<Category, Vec<LedgerEvent>> {
    let mut groups: BTreeMap<Category, Vec<LedgerEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry(event.category.clone())
            .or_default()
            .push(event.clone());
    }
    groups
}

/// The sorted, de-duplicated set of categories referenced by `events`.
#[must_use]
pub fn categories_of(events: &[LedgerEvent]) -> Vec<Category> {
    partition(events).into_keys().collect()
}
