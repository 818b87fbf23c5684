//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are best-effort: a failed query yields no suggestions rather than
//! an error, since Discord has nowhere to show one.

use crate::{
    bot::BotData,
    core::{customer, product, store},
    errors::Error,
};

/// Discord shows at most this many suggestions.
const AUTOCOMPLETE_LIMIT: usize = 25;

fn filter_sorted(candidates: impl IntoIterator<Item = String>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(AUTOCOMPLETE_LIMIT);
    matching
}

/// Provides autocomplete suggestions for customer names.
pub async fn autocomplete_customer_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(customers) = customer::list_customers(&ctx.data().ledger.db).await else {
        return Vec::new();
    };
    filter_sorted(customers.into_iter().map(|c| c.name), partial)
}

/// Provides autocomplete suggestions for product names.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(products) = product::list_products(&ctx.data().ledger.db).await else {
        return Vec::new();
    };
    filter_sorted(products.into_iter().map(|p| p.name), partial)
}

/// Provides autocomplete suggestions for category names.
///
/// Offers every category already used in the ledger plus the catalog's default
/// categories, so a new sub-ledger can still be typed freely.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().ledger.db;
    let mut names: Vec<String> = store::known_categories(db)
        .await
        .map(|found| found.into_iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    if let Ok(products) = product::list_products(db).await {
        names.extend(products.into_iter().filter_map(|p| p.category));
    }
    filter_sorted(names, partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_sorted_matches_case_insensitively() {
        let names = ["Rice", "rice bran", "Oil", "Rice"].map(String::from);
        assert_eq!(filter_sorted(names, "RIC"), vec!["Rice", "rice bran"]);
    }

    #[test]
    fn test_filter_sorted_caps_suggestions() {
        let names = (0..40).map(|i| format!("Item {i:02}"));
        assert_eq!(filter_sorted(names, "item").len(), AUTOCOMPLETE_LIMIT);
    }
}
