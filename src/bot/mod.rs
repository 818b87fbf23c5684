//! Bot layer - Discord-specific interface and command handlers
//!
//! This module is the adapter in front of the ledger engine. Commands parse user
//! input, call the engine and format what it returns. No balance arithmetic happens
//! here.

/// Discord command implementations (customers, ledger entries, balances, admin)
pub mod commands;
/// Reply formatting for projections and events
pub mod format;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::users,
    core::context::LedgerContext,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use std::collections::HashSet;
use tracing::{info, instrument};

/// Shared data available to all bot commands.
#[derive(Debug)]
pub struct BotData {
    /// Ledger engine: database, calendar and per-customer locks
    pub ledger: LedgerContext,
    /// Symbol placed before amounts in replies
    pub currency_symbol: String,
    /// Discord user ids allowed to reassign categories
    pub admin_ids: HashSet<String>,
}

impl BotData {
    /// Creates a new `BotData` instance, reading the admin list from the environment.
    #[must_use]
    pub fn new(ledger: LedgerContext, currency_symbol: String) -> Self {
        Self {
            ledger,
            currency_symbol,
            admin_ids: users::get_admin_ids(),
        }
    }

    /// Whether `user_id` is on the admin list.
    #[must_use]
    pub fn is_admin(&self, user_id: &str) -> bool {
        self.admin_ids.contains(user_id)
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                tracing::error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                tracing::error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework and runs the Discord client until it stops.
///
/// # Errors
/// Returns an error if the client cannot be created or the gateway connection fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::ping(),
                commands::help(),
                commands::customer(),
                commands::debt(),
                commands::sale(),
                commands::repay(),
                commands::balance(),
                commands::categories(),
                commands::recategorize(),
                commands::delete_entry(),
                commands::set_password(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered commands globally");
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Starting bot client...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;
    client.start().await?;
    Ok(())
}
