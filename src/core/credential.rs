//! Acting-user secrets for the delete re-authentication step.
//!
//! Secrets are stored as hex SHA-256 digests of `user_id:secret`. Verification
//! always reads the row again, so a secret changed a moment ago is honoured on
//! the very next delete attempt.

use crate::{
    entities::{Credential, credential},
    errors::{Error, Result},
};
use sea_orm::{Set, prelude::*};
use sha2::{Digest, Sha256};

fn digest(user_id: &str, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update(b":");
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compares two digests without stopping at the first differing byte.
fn digests_match(a: &str, b: &str) -> bool {
    a.len() == b.len()
        && a
            .bytes()
            .zip(b.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}

/// Creates or replaces the secret for `user_id`.
///
/// # Errors
/// Returns a validation error for an empty secret, or a database error.
pub async fn set_secret<C>(db: &C, user_id: &str, secret: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    if secret.is_empty() {
        return Err(Error::validation("secret", "secret cannot be empty"));
    }

    let digest = digest(user_id, secret);
    let now = chrono::Utc::now();

    if let Some(existing) = Credential::find_by_id(user_id.to_string()).one(db).await? {
        let mut active_model: credential::ActiveModel = existing.into();
        active_model.secret_digest = Set(digest);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let model = credential::ActiveModel {
            user_id: Set(user_id.to_string()),
            secret_digest: Set(digest),
            updated_at: Set(now),
        };
        model.insert(db).await?;
    }

    tracing::info!("Secret updated for user {user_id}");
    Ok(())
}

/// Checks `supplied` against the stored secret of `user_id`.
///
/// A user without a stored secret fails exactly like a wrong secret.
///
/// # Errors
/// Returns [`Error::Auth`] on mismatch, or a database error.
pub async fn verify_secret<C>(db: &C, user_id: &str, supplied: &str) -> Result<()>
where
    C: ConnectionTrait,
{
    let stored = Credential::find_by_id(user_id.to_string()).one(db).await?;
    let candidate = digest(user_id, supplied);

    match stored {
        Some(row) if digests_match(&row.secret_digest, &candidate) => Ok(()),
        _ => Err(Error::Auth),
    }
}
