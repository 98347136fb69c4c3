//! Error types for the reputation service binary.
//! Consolidates failures raised while reading settings, wiring the stores
//! and shutting the service down.
use reputation_repository::RepositoryError;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    #[error("Tracing error: {0}")]
    Telemetry(String),
    #[error("Interaction worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl ServiceError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
