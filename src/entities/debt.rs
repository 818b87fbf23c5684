//! Debt entity - An immutable charge against a customer in one category.
//!
//! Only `category` may change after creation. Amounts are stored in minor units
//! (cents) and a debt never records how much of it has been repaid; balances are
//! always replayed from the full event stream.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Debt database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    /// Unique identifier for the debt
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who owes the amount
    pub customer_id: i64,
    /// Amount in minor units, always positive
    pub amount: i64,
    /// Sub-ledger this debt belongs to
    pub category: String,
    /// When the debt was incurred; authoritative for ordering and day bucketing
    pub occurred_at: DateTimeUtc,
    /// Ledger-wide insertion counter used to break timestamp ties
    pub sequence: i64,
    /// Optional free-text note
    pub note: Option<String>,
}

/// Defines relationships between Debt and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each debt belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
    /// One debt has many line items
    #[sea_orm(has_many = "super::debt_line_item::Entity")]
    LineItems,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl Related<super::debt_line_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LineItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
