//! Repayment entity - An immutable credit posted against exactly one category.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Repayment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "repayments")]
pub struct Model {
    /// Unique identifier for the repayment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer who paid
    pub customer_id: i64,
    /// Amount in minor units, always positive
    pub amount: i64,
    /// Sub-ledger the payment is credited to
    pub category: String,
    /// When the payment was received
    pub occurred_at: DateTimeUtc,
    /// Ledger-wide insertion counter used to break timestamp ties
    pub sequence: i64,
}

/// Defines relationships between Repayment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each repayment belongs to one customer
    #[sea_orm(
        belongs_to = "super::customer::Entity",
        from = "Column::CustomerId",
        to = "super::customer::Column::Id"
    )]
    Customer,
}

impl Related<super::customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
