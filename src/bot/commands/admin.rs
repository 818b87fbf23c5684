//! Admin Discord commands - `recategorize`, `delete_entry` and `set_password`.
//!
//! Replies that involve a password are ephemeral so the secret never shows in the
//! channel history.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::utils::EntryKind,
            format,
            handlers::autocomplete,
        },
        core::{credential, event::EventKind, gateway},
        errors::{Error, Result},
    };

    async fn reply_private(ctx: Context<'_>, content: String) -> Result<()> {
        ctx.send(
            poise::CreateReply::default()
                .content(content)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }

    /// Moves one entry to another category. Admins only.
    #[poise::command(slash_command)]
    pub async fn recategorize(
        ctx: Context<'_>,
        #[description = "Entry kind"] kind: EntryKind,
        #[description = "Entry ID"] id: i64,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
    ) -> Result<()> {
        let data = ctx.data();
        let authorized = data.is_admin(&ctx.author().id.to_string());
        let event =
            gateway::reassign_category(&data.ledger, kind.into(), id, &category, authorized)
                .await?;

        ctx.say(format!(
            "✅ Moved {}",
            format::event_summary(&event, &data.ledger.clock, &data.currency_symbol)
        ))
        .await?;
        Ok(())
    }

    /// Deletes one entry after re-checking your password.
    #[poise::command(slash_command)]
    pub async fn delete_entry(
        ctx: Context<'_>,
        #[description = "Entry kind"] kind: EntryKind,
        #[description = "Entry ID"] id: i64,
        #[description = "Your deletion password"] password: String,
    ) -> Result<()> {
        let data = ctx.data();
        let acting_user = ctx.author().id.to_string();
        let kind = EventKind::from(kind);

        match gateway::delete_event(&data.ledger, kind, id, &acting_user, &password).await {
            Ok(event) => {
                reply_private(
                    ctx,
                    format!(
                        "🗑️ Deleted {}",
                        format::event_summary(&event, &data.ledger.clock, &data.currency_symbol)
                    ),
                )
                .await
            }
            Err(Error::Auth) => {
                reply_private(ctx, "❌ Password check failed. Nothing was deleted.".into()).await
            }
            Err(e @ Error::NotFound { .. }) => reply_private(ctx, format!("❌ {e}")).await,
            Err(e) => Err(e),
        }
    }

    /// Sets or changes your deletion password.
    #[poise::command(slash_command)]
    pub async fn set_password(
        ctx: Context<'_>,
        #[description = "New password"] password: String,
    ) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();
        if !data.is_admin(&user_id) {
            return Err(Error::Unauthorized {
                action: "set a deletion password",
            });
        }

        credential::set_secret(&data.ledger.db, &user_id, &password).await?;
        reply_private(ctx, "✅ Password updated.".into()).await
    }
}

// Re-export all commands
pub use inner::*;
