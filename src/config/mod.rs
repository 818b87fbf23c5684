/// Database configuration and connection management
pub mod database;

/// Ledger settings and product catalog loading from config.toml
pub mod ledger;

/// Admin user configuration from environment variables
pub mod users;
