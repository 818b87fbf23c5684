//! Credential entity - Digest of the secret an acting user re-enters to delete records.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Credential database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credentials")]
pub struct Model {
    /// External user id of the acting user (e.g., a Discord user id)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Hex-encoded SHA-256 of `user_id:secret`
    pub secret_digest: String,
    /// When the secret was last changed
    pub updated_at: DateTimeUtc,
}

/// Credentials have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
