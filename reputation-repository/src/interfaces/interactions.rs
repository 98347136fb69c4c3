use crate::errors::RepositoryError;
use reputation_shared::types::InteractionRecord;

/// Append-only sink for the interaction log.
///
/// Records are never updated or deleted.
#[async_trait::async_trait]
pub trait InteractionRepository: Send + Sync {
    async fn append(&self, record: &InteractionRecord) -> Result<(), RepositoryError>;
}
