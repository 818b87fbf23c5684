//! Debt line item entity - A frozen product snapshot attached to a debt.
//!
//! Name and unit price are copied from the catalog when the debt is created, so
//! later catalog edits never change a historical debt.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Debt line item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "debt_line_items")]
pub struct Model {
    /// Unique identifier for the line item
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Debt this line belongs to
    pub debt_id: i64,
    /// Catalog product the snapshot was taken from, if any
    pub product_id: Option<i64>,
    /// Product name at the time of sale
    pub product_name: String,
    /// Number of units sold
    pub quantity: i64,
    /// Unit price in minor units at the time of sale
    pub unit_price: i64,
    /// Creation-time category hint; the debt's own category is authoritative
    pub category: Option<String>,
}

/// Defines relationships between line items and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each line item belongs to one debt
    #[sea_orm(
        belongs_to = "super::debt::Entity",
        from = "Column::DebtId",
        to = "super::debt::Column::Id"
    )]
    Debt,
}

impl Related<super::debt::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debt.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
