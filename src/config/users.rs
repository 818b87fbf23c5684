//! Admin configuration loaded from environment variables.
//!
//! The ledger engine does not know about roles. The Discord adapter decides whether
//! the invoking user may reassign categories by checking this list and passes the
//! verdict down as a plain flag.

use std::collections::HashSet;

/// Parses a comma-separated list of user ids, ignoring blanks.
#[must_use]
pub fn parse_admin_ids(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Reads `ADMIN_USER_IDS` from the environment. Missing means nobody is an admin.
#[must_use]
pub fn get_admin_ids() -> HashSet<String> {
    std::env::var("ADMIN_USER_IDS")
        .map(|raw| parse_admin_ids(&raw))
        .unwrap_or_default()
}
