use super::target_kind_to_i16;
use crate::{InteractionRepository, RepositoryError};
use async_trait::async_trait;
use reputation_shared::types::InteractionRecord;

/// PostgreSQL-backed interaction log.
pub struct PostgresInteractionRepository {
    pool: sqlx::PgPool,
}

impl PostgresInteractionRepository {
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }
}

#[async_trait]
impl InteractionRepository for PostgresInteractionRepository {
    async fn append(&self, record: &InteractionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO interactions (actor_id, verb, target_id, target_kind, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.actor.as_uuid())
        .bind(record.verb.as_str())
        .bind(record.target.id.as_uuid())
        .bind(target_kind_to_i16(record.target.kind))
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
