//! Product business logic - The catalog that debt line items are snapshotted from.
//!
//! Products are read only at the moment a sale is recorded. Their name and price are
//! copied into the debt's line items, so editing or deleting a product never touches
//! a historical debt.

use crate::{
    entities::{Product, product},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Retrieves all products, ordered alphabetically by name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_products<C>(db: &C) -> Result<Vec<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .order_by_asc(product::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a product by exact name.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name.trim()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Creates a new product, trimming the name and category.
///
/// # Errors
/// Returns an error if:
/// - The product name is empty or whitespace-only
/// - The price is negative
/// - The database insert operation fails
pub async fn create_product<C>(
    db: &C,
    name: &str,
    price: i64,
    category: Option<&str>,
) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::validation("name", "product name cannot be empty"));
    }
    if price < 0 {
        return Err(Error::validation("price", "price cannot be negative"));
    }

    let now = chrono::Utc::now().naive_utc();
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string);

    let product = product::ActiveModel {
        name: Set(name.trim().to_string()),
        price: Set(price),
        category: Set(category),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    product.insert(db).await.map_err(Into::into)
}

/// Changes a product's catalog price. Existing debts keep the price they were sold at.
///
/// # Errors
/// Returns an error if the price is negative, the product is missing or deleted,
/// or the update fails.
pub async fn update_product_price<C>(db: &C, product_id: i64, new_price: i64) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if new_price < 0 {
        return Err(Error::validation("price", "price cannot be negative"));
    }

    let existing = Product::find_by_id(product_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::validation("product", format!("unknown product {product_id}")))?;

    let mut product: product::ActiveModel = existing.into();
    product.price = Set(new_price);
    product.updated_at = Set(chrono::Utc::now().naive_utc());
    product.update(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_product_validation() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(&db, "  ", 100, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "name", .. }
        ));

        let result = create_product(&db, "Rice", -1, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::Validation { field: "price", .. }
        ));
        assert!(list_products(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_products_are_listed_alphabetically() -> Result<()> {
        let db = setup_test_db().await?;
        create_product(&db, "Sugar 1kg", 300, Some("Grocery")).await?;
        create_product(&db, "Cooking Oil", 1200, Some("  ")).await?;

        let products = list_products(&db).await?;
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cooking Oil", "Sugar 1kg"]);
        assert_eq!(products[0].category, None);
        assert_eq!(products[1].category.as_deref(), Some("Grocery"));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_product_price() -> Result<()> {
        let db = setup_test_db().await?;
        let rice = create_product(&db, "Rice 5kg", 2500, None).await?;

        let updated = update_product_price(&db, rice.id, 2700).await?;
        assert_eq!(updated.price, 2700);
        assert_eq!(
            get_product_by_name(&db, "Rice 5kg").await?.unwrap().price,
            2700
        );
        assert!(update_product_price(&db, 999, 1).await.is_err());
        Ok(())
    }
}
