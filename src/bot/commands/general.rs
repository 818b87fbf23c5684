//! General Discord commands - ping and help.
//! These commands don't touch the ledger.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::Context,
        errors::Result,
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**CreditBuddy Help**\n\
        Store credit ledger. Amounts are decimals like `12.50`; dates are `YYYY-MM-DD`.\n\n\
        **Entries**\n\
        • `/debt <customer> <amount> <category> [note]` - Records credit taken by a customer.\n\
        • `/sale <customer> <product> [quantity] [category]` - Records a debt from a catalog product.\n\
        • `/repay <customer> <amount> <category>` - Records a payment into one category.\n\n\
        **Views**\n\
        • `/balance <customer> [category] [date] [search] [newest_first]` - Shows a ledger.\n\
        • `/categories <customer>` - Lists the customer's categories.\n\n\
        **Management**\n\
        • `/customer add|list` - Manage customers.\n\
        • `/recategorize <kind> <id> <category>` - Moves an entry (admins only).\n\
        • `/delete_entry <kind> <id> <password>` - Deletes an entry after re-checking your password.\n\
        • `/set_password <password>` - Sets your deletion password.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
