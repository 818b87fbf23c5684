//! Ledger entry Discord commands - `debt`, `sale` and `repay`.
//!
//! Each command resolves the customer, converts the decimal amount to minor units
//! and hands the request to the engine. The event is timestamped with the moment
//! the command was received.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::utils, format, handlers::autocomplete},
        core::{
            gateway::{self, NewDebt},
            money, product, repayment,
            store::NewLineItem,
        },
        errors::{Error, Result},
    };
    use chrono::Utc;

    /// Records credit taken by a customer.
    #[poise::command(slash_command, prefix_command)]
    pub async fn debt(
        ctx: Context<'_>,
        #[description = "Customer taking the credit"]
        #[autocomplete = "autocomplete::autocomplete_customer_name"]
        customer: String,
        #[description = "Amount, e.g. 12.50"] amount: String,
        #[description = "Category, e.g. Rice"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Optional note"] note: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let customer = utils::resolve_customer(&data.ledger.db, &customer).await?;
        let amount = money::parse_amount(&amount)?;

        let mut request = NewDebt::manual(customer.id, amount, &category, Utc::now());
        if let Some(note) = note.as_deref() {
            request = request.with_note(note);
        }
        let event = gateway::create_debt(&data.ledger, request).await?;

        ctx.say(format!(
            "✅ {} for {}",
            format::event_summary(&event, &data.ledger.clock, &data.currency_symbol),
            customer.name
        ))
        .await?;
        Ok(())
    }

    /// Records a debt for a catalog product.
    ///
    /// The product's name and price are copied into the entry, so later catalog
    /// changes do not alter it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn sale(
        ctx: Context<'_>,
        #[description = "Customer taking the credit"]
        #[autocomplete = "autocomplete::autocomplete_customer_name"]
        customer: String,
        #[description = "Product sold"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product_name: String,
        #[description = "Units sold. Defaults to 1."]
        #[min = 1]
        quantity: Option<i64>,
        #[description = "Category. Defaults to the product's category."]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.ledger.db;
        let customer = utils::resolve_customer(db, &customer).await?;

        let Some(item) = product::get_product_by_name(db, &product_name).await? else {
            ctx.say(format!(
                "❌ Product '{product_name}' not found. Pick one from the suggestions.",
            ))
            .await?;
            return Ok(());
        };

        let category = category
            .or_else(|| item.category.clone())
            .ok_or_else(|| {
                Error::validation(
                    "category",
                    format!("'{}' has no default category; please pick one", item.name),
                )
            })?;

        let line = NewLineItem::from_product(&item, quantity.unwrap_or(1));
        let request = NewDebt::from_items(customer.id, vec![line], &category, Utc::now());
        let event = gateway::create_debt(&data.ledger, request).await?;

        ctx.say(format!(
            "✅ {} for {}",
            format::event_summary(&event, &data.ledger.clock, &data.currency_symbol),
            customer.name
        ))
        .await?;
        Ok(())
    }

    /// Records a payment into one of the customer's categories.
    #[poise::command(slash_command, prefix_command)]
    pub async fn repay(
        ctx: Context<'_>,
        #[description = "Customer paying"]
        #[autocomplete = "autocomplete::autocomplete_customer_name"]
        customer: String,
        #[description = "Amount, e.g. 12.50"] amount: String,
        #[description = "Category the payment settles"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
    ) -> Result<()> {
        let data = ctx.data();
        let customer = utils::resolve_customer(&data.ledger.db, &customer).await?;
        let amount = money::parse_amount(&amount)?;

        let event =
            repayment::create_repayment(&data.ledger, customer.id, &category, amount, Utc::now())
                .await?;

        ctx.say(format!(
            "✅ {} from {}",
            format::event_summary(&event, &data.ledger.clock, &data.currency_symbol),
            customer.name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
