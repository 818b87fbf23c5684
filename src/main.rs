use credit_buddy::{
    bot::{self, BotData},
    config::{database, ledger},
    core::context::LedgerContext,
    errors::{Error, Result},
};
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Ledger settings and catalog
    let config = ledger::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {e}"))?;
    let clock = config.ledger.clock()?;
    info!("Projecting balances with {clock:?}");

    // 4. Database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    ledger::seed_products(&db, &config).await?;
    info!("Database initialized successfully.");

    // 5. Run the bot
    let token = std::env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(
        LedgerContext::new(db, clock),
        config.ledger.currency_symbol.clone(),
    );
    bot::run_bot(token, data).await
}
