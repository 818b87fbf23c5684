//! Balance Discord commands - `balance` and `categories`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, commands::utils, format, handlers::autocomplete},
        core::{
            category::Category,
            projector::{self, ProjectionQuery},
        },
        errors::Result,
    };

    /// Shows a customer's ledger.
    ///
    /// Without a category the reply is split per category with a clamped total.
    /// With a date only that day's entries are listed, opening with the balance
    /// carried into it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(
        ctx: Context<'_>,
        #[description = "Customer to show"]
        #[autocomplete = "autocomplete::autocomplete_customer_name"]
        customer: String,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Day to show, YYYY-MM-DD"] date: Option<String>,
        #[description = "Only entries whose note or items contain this text"] search: Option<
            String,
        >,
        #[description = "List newest entries first"] newest_first: Option<bool>,
    ) -> Result<()> {
        let data = ctx.data();
        let ledger = &data.ledger;
        let customer = utils::resolve_customer(&ledger.db, &customer).await?;
        let as_of = date.as_deref().map(utils::parse_date).transpose()?;

        let reply = if let Some(category) = category {
            let query = ProjectionQuery {
                category: Some(Category::new(&category)?),
                as_of,
                search,
                newest_first: newest_first.unwrap_or(false),
            };
            let projection =
                projector::project_balance(&ledger.db, &ledger.clock, customer.id, &query).await?;
            let title = as_of.map_or_else(
                || format!("{} - {}", customer.name, category.trim()),
                |day| format!("{} - {} on {day}", customer.name, category.trim()),
            );
            format::projection(&title, &projection, &ledger.clock, &data.currency_symbol)?
        } else {
            let overview = projector::customer_overview(
                &ledger.db,
                &ledger.clock,
                customer.id,
                as_of,
                search.as_deref(),
            )
            .await?;
            format::overview(&customer.name, &overview, &ledger.clock, &data.currency_symbol)?
        };

        ctx.say(reply).await?;
        Ok(())
    }

    /// Lists the categories a customer has entries in.
    #[poise::command(slash_command, prefix_command)]
    pub async fn categories(
        ctx: Context<'_>,
        #[description = "Customer to show"]
        #[autocomplete = "autocomplete::autocomplete_customer_name"]
        customer: String,
    ) -> Result<()> {
        let db = &ctx.data().ledger.db;
        let customer = utils::resolve_customer(db, &customer).await?;
        let categories = projector::list_categories(db, customer.id).await?;

        if categories.is_empty() {
            ctx.say(format!("{} has no entries yet.", customer.name))
                .await?;
            return Ok(());
        }

        let names: Vec<&str> = categories.iter().map(Category::as_str).collect();
        ctx.say(format!("**{}**: {}", customer.name, names.join(", ")))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
