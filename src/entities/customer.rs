//! Customer entity - The identity anchor for all ledger data.
//!
//! A customer owns debts and repayments. The `role` is stored for the external
//! authorization layer; the ledger engine itself never branches on it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Customer database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Unique identifier for the customer
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name (e.g., "Amina Yusuf")
    pub name: String,
    /// Phone number, used only as an external messaging key
    pub phone: String,
    /// `"customer"` or `"admin"`
    pub role: String,
    /// When the customer was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Customer and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One customer has many debts
    #[sea_orm(has_many = "super::debt::Entity")]
    Debts,
    /// One customer has many repayments
    #[sea_orm(has_many = "super::repayment::Entity")]
    Repayments,
}

impl Related<super::debt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl Related<super::repayment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Repayments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
