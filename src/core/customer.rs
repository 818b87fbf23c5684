//! Customer business logic - Creating and looking up the identities that own ledgers.
//!
//! Customer management is an admin concern outside the ledger engine. The engine only
//! needs to know whether a customer id exists before it appends an event; the
//! remaining functions exist so the adapter can resolve names to ids.

use crate::{
    entities::{Customer, customer},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// What a customer record is allowed to do. Enforced by the adapter, not the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Ordinary credit customer
    Customer,
    /// Shop staff with mutation rights
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => f.write_str("customer"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            other => Err(Error::validation("role", format!("unknown role '{other}'"))),
        }
    }
}

/// Creates a customer after trimming and validating the name.
///
/// # Errors
/// Returns a validation error if the name is empty, or a database error if the insert fails.
pub async fn create_customer<C>(db: &C, name: &str, phone: &str, role: Role) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::validation("name", "customer name cannot be empty"));
    }

    let model = customer::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(phone.trim().to_string()),
        role: Set(role.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let created = model.insert(db).await?;
    tracing::info!("Created {role} '{}' with id {}", created.name, created.id);
    Ok(created)
}

/// Looks a customer up by id.
pub async fn get_customer_by_id<C>(db: &C, customer_id: i64) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find_by_id(customer_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Fails with a validation error on `customer_id` unless the customer exists.
pub async fn require_customer<C>(db: &C, customer_id: i64) -> Result<customer::Model>
where
    C: ConnectionTrait,
{
    get_customer_by_id(db, customer_id)
        .await?
        .ok_or_else(|| Error::validation("customer_id", format!("unknown customer {customer_id}")))
}

/// All customers, ordered alphabetically by name.
pub async fn list_customers<C>(db: &C) -> Result<Vec<customer::Model>>
where
    C: ConnectionTrait,
{
    Customer::find()
        .order_by_asc(customer::Column::Name)
        .order_by_asc(customer::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a customer by name, ignoring case and surrounding whitespace.
///
/// When several customers share a name the oldest record wins.
pub async fn find_customer_by_name<C>(db: &C, name: &str) -> Result<Option<customer::Model>>
where
    C: ConnectionTrait,
{
    let wanted = name.trim().to_lowercase();
    let mut matches: Vec<customer::Model> = list_customers(db)
        .await?
        .into_iter()
        .filter(|c| c.name.to_lowercase() == wanted)
        .collect();
    matches.sort_by_key(|c| c.id);
    Ok(matches.into_iter().next())
}
