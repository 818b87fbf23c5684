//! Unified error types for the ledger engine and its adapters.
//!
//! The first group of variants is the ledger taxonomy surfaced to callers
//! (validation, not-found, authentication, invariant violations). The rest wrap
//! infrastructure failures from the database, configuration and Discord layers.

use crate::core::event::EventKind;
use thiserror::Error;

/// All errors produced by `CreditBuddy`.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: non-positive amount, empty category, unknown customer.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// The targeted debt or repayment does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Which event table was searched
        kind: EventKind,
        /// The id that was requested
        id: i64,
    },

    /// Re-authentication failed. Deliberately carries no detail.
    #[error("Authentication failed")]
    Auth,

    /// The caller did not present the authorization the action requires.
    #[error("Not authorized to {action}")]
    Unauthorized {
        /// The refused action
        action: &'static str,
    },

    /// Internal consistency failure, e.g. a debt total that does not match its line items.
    #[error("Invariant violation: {message}")]
    InvariantViolation {
        /// Description of the broken invariant
        message: String,
    },

    /// Configuration loading or parsing failed.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// Database error from `SeaORM`.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Formatting error while building a reply.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Serenity/Poise framework error.
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
