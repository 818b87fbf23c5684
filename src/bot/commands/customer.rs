//! Customer Discord commands - `customer add` and `customer list`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        core::customer::{self, Role},
        errors::Result,
    };
    use std::fmt::Write;

    /// Parent command for managing credit customers.
    #[poise::command(slash_command, subcommands("customer_add", "customer_list"))]
    pub async fn customer(ctx: Context<'_>) -> Result<()> {
        let help_text = "Customer management command. Available subcommands:\n\
            `/customer add` - Register a new customer\n\
            `/customer list` - List all customers";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new customer.
    #[poise::command(slash_command, rename = "add")]
    pub async fn customer_add(
        ctx: Context<'_>,
        #[description = "Display name"] name: String,
        #[description = "Phone number used for reminders"] phone: String,
        #[description = "Role: customer (default) or admin"] role: Option<String>,
    ) -> Result<()> {
        let role = role.as_deref().unwrap_or("customer").parse::<Role>()?;
        let db = &ctx.data().ledger.db;

        if customer::find_customer_by_name(db, &name).await?.is_some() {
            ctx.say(format!("⚠️ A customer named '{}' already exists.", name.trim()))
                .await?;
            return Ok(());
        }

        let created = customer::create_customer(db, &name, &phone, role).await?;
        ctx.say(format!(
            "✅ Added {} '{}' (ID: {})",
            created.role, created.name, created.id
        ))
        .await?;
        Ok(())
    }

    /// Lists every customer.
    #[poise::command(slash_command, rename = "list")]
    pub async fn customer_list(ctx: Context<'_>) -> Result<()> {
        let customers = customer::list_customers(&ctx.data().ledger.db).await?;
        if customers.is_empty() {
            ctx.say("No customers yet. Use `/customer add` to register one.")
                .await?;
            return Ok(());
        }

        let mut reply = String::from("**Customers**\n");
        for c in &customers {
            writeln!(reply, "• {} ({}, {}) - ID {}", c.name, c.phone, c.role, c.id)?;
        }
        ctx.say(crate::bot::format::truncate(reply)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
