//! Ledger settings and catalog seeding from config.toml
//!
//! The file is optional. It sets the merchant's UTC offset (used to decide which
//! calendar day an event belongs to), the currency symbol for display, and a list
//! of products to seed the catalog with on first run.

use crate::{
    core::{calendar::LedgerClock, money, product},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// General ledger settings
    #[serde(default)]
    pub ledger: LedgerSettings,
    /// Catalog products to seed
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// `[ledger]` table
#[derive(Debug, Deserialize)]
pub struct LedgerSettings {
    /// Offset such as `"+05:30"`; absent means the host's local zone
    pub utc_offset: Option<String>,
    /// Symbol placed before amounts in replies
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            utc_offset: None,
            currency_symbol: default_currency_symbol(),
        }
    }
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl LedgerSettings {
    /// The calendar these settings describe.
    pub fn clock(&self) -> Result<LedgerClock> {
        self.utc_offset
            .as_deref()
            .map_or(Ok(LedgerClock::Local), LedgerClock::from_offset)
    }
}

/// Configuration for a single catalog product
#[derive(Debug, Deserialize, Clone)]
pub struct ProductConfig {
    /// Product name
    pub name: String,
    /// Unit price as a decimal string, e.g. `"25.00"`
    pub price: String,
    /// Category suggested for sales of this product
    pub category: Option<String>,
}

/// Loads configuration from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads configuration from `CREDIT_BUDDY_CONFIG` (default `./config.toml`).
///
/// A missing file yields the defaults; an unreadable or invalid one is an error.
pub fn load_default_config() -> Result<Config> {
    let path = std::env::var("CREDIT_BUDDY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No config file at {path}, using defaults");
        return Ok(Config::default());
    }
    load_config(&path)
}

/// Inserts configured products that are not in the catalog yet.
///
/// Returns the number of products created.
pub async fn seed_products(db: &DatabaseConnection, config: &Config) -> Result<usize> {
    let mut created = 0;
    for entry in &config.products {
        if product::get_product_by_name(db, &entry.name).await?.is_some() {
            continue;
        }
        let price = money::parse_amount(&entry.price)?;
        product::create_product(db, &entry.name, price, entry.category.as_deref()).await?;
        created += 1;
    }
    tracing::info!("Seeded {created} products from config");
    Ok(created)
}
