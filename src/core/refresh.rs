//! Counters kept in the `system_state` table.
//!
//! Two kinds of counter live here. `event_sequence` numbers every appended debt and
//! repayment so timestamp ties resolve in insertion order across both tables. Each
//! customer also has a `refresh:<id>` counter that every successful mutation bumps;
//! a projection records the value it was computed under, which is how a view knows
//! its numbers are stale. The counter is an invalidation token only, never a cache.

use crate::{
    entities::{SystemState, system_state},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};

const EVENT_SEQUENCE_KEY: &str = "event_sequence";

fn refresh_key(customer_id: i64) -> String {
    format!("refresh:{customer_id}")
}

async fn read_counter<C>(db: &C, key: &str) -> Result<Option<(system_state::Model, u64)>>
where
    C: ConnectionTrait,
{
    let Some(state) = SystemState::find()
        .filter(system_state::Column::Key.eq(key))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    let value = state.value.parse::<u64>().map_err(|e| {
        let message = format!("counter '{key}' holds non-numeric value '{}': {e}", state.value);
        tracing::error!("{message}");
        Error::InvariantViolation { message }
    })?;
    Ok(Some((state, value)))
}

/// Increments the counter stored under `key` and returns the new value.
async fn bump_counter<C>(db: &C, key: &str) -> Result<u64>
where
    C: ConnectionTrait,
{
    let now = Utc::now().naive_utc();

    if let Some((state, value)) = read_counter(db, key).await? {
        let next = value + 1;
        let mut active_model: system_state::ActiveModel = state.into();
        active_model.value = Set(next.to_string());
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
        Ok(next)
    } else {
        let new_state = system_state::ActiveModel {
            key: Set(key.to_string()),
            value: Set("1".to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        new_state.insert(db).await?;
        Ok(1)
    }
}

/// Allocates the next insertion sequence number. Call inside the inserting transaction.
pub async fn next_event_sequence<C>(db: &C) -> Result<i64>
where
    C: ConnectionTrait,
{
    let next = bump_counter(db, EVENT_SEQUENCE_KEY).await?;
    i64::try_from(next).map_err(|_| Error::InvariantViolation {
        message: "event sequence exhausted".to_string(),
    })
}

/// Current refresh token for a customer; `0` before the first mutation.
pub async fn current_token<C>(db: &C, customer_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    Ok(read_counter(db, &refresh_key(customer_id))
        .await?
        .map_or(0, |(_, value)| value))
}

/// Signals that a customer's projections must be recomputed.
pub async fn signal<C>(db: &C, customer_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    let token = bump_counter(db, &refresh_key(customer_id)).await?;
    tracing::debug!("Refresh token for customer {customer_id} is now {token}");
    Ok(token)
}
