//! Error types for the reputation repository.
//! Defines specific errors that can occur during storage operations and
//! classifies which of them are safe to retry.
use thiserror::Error;

/// PostgreSQL error codes that indicate a lost race rather than a bad request.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
const UNIQUE_VIOLATION: &str = "23505";

/// Represents errors that can occur within the reputation repository.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflicting concurrent write: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Counter underflow on {0}")]
    CounterUnderflow(String),

    #[error("Invalid vote type: {0}")]
    InvalidVoteType(i16),

    #[error("Invalid target kind: {0}")]
    InvalidTargetKind(i16),
}

impl RepositoryError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Whether the failed unit of work can be replayed from scratch.
    ///
    /// Covers serialization failures, deadlocks, lost insert races on the
    /// ledger keys, pool exhaustion and broken connections.
    pub fn is_transient(&self) -> bool {
        match self {
            RepositoryError::Conflict(_) | RepositoryError::Unavailable(_) => true,
            RepositoryError::DatabaseError(error) => match error {
                sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
                sqlx::Error::Database(db) => matches!(
                    db.code().as_deref(),
                    Some(SERIALIZATION_FAILURE | DEADLOCK_DETECTED | UNIQUE_VIOLATION)
                ),
                _ => false,
            },
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_is_transient() {
        assert!(RepositoryError::Conflict("vote".into()).is_transient());
        assert!(RepositoryError::Unavailable("pool".into()).is_transient());
        assert!(RepositoryError::DatabaseError(sqlx::Error::PoolTimedOut).is_transient());
    }

    #[test]
    fn test_not_found_is_permanent() {
        let error = RepositoryError::not_found("Question");
        assert!(!error.is_transient());
        assert_eq!(error.to_string(), "Question not found");
        assert!(!RepositoryError::DatabaseError(sqlx::Error::RowNotFound).is_transient());
        assert!(!RepositoryError::CounterUnderflow("answer".into()).is_transient());
    }
}
