//! Product entity - Catalog items whose name and price are snapshotted into debts.
//!
//! Products are templates only. The projector never reads this table; a sale copies
//! the product into a debt line item at creation time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Rice 5kg", "Cooking Oil")
    pub name: String,
    /// Unit price in minor units
    pub price: i64,
    /// Category suggested for debts created from this product
    pub category: Option<String>,
    /// When the product was created
    pub created_at: DateTime,
    /// When the product was last modified
    pub updated_at: DateTime,
}

/// Products have no foreign keys; line items keep a loose `product_id` reference
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
