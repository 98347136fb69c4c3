//! Error types for the reputation engine.
//! Every failure of a reputation-bearing operation surfaces as an
//! `EngineError`, after the unit of work it happened in has been rolled back.
use reputation_repository::RepositoryError;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Per-field validation messages, keyed by input field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Represents errors that can occur within the reputation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{message}")]
    Validation {
        message: String,
        details: FieldErrors,
    },

    #[error("Transaction timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transient store error: {0}")]
    Transient(#[source] RepositoryError),

    #[error("Repository error: {0}")]
    Repository(#[source] RepositoryError),
}

impl EngineError {
    /// Builds a validation error whose message summarizes every field.
    ///
    /// Messages of one field are joined with " and ", fields with ", ".
    pub fn validation(details: FieldErrors) -> Self {
        let message = details
            .values()
            .map(|messages| messages.join(" and "))
            .collect::<Vec<_>>()
            .join(", ");
        Self::Validation { message, details }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Whether a fresh attempt of the whole unit of work may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Timeout(_) | EngineError::Transient(_))
    }

    /// HTTP-style status code of the error; 5xx marks failures on our side.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::Validation { .. } => 400,
            EngineError::Unauthorized => 401,
            EngineError::Forbidden(_) => 403,
            EngineError::NotFound(_) => 404,
            EngineError::Timeout(_) | EngineError::Transient(_) => 503,
            EngineError::Repository(_) => 500,
        }
    }

    /// Message safe to hand to an end user.
    ///
    /// Store failures are reported generically; their detail only goes to
    /// the logs.
    pub fn public_message(&self) -> String {
        match self {
            EngineError::Timeout(_) | EngineError::Transient(_) => {
                "The request could not be completed, please try again".to_string()
            }
            EngineError::Repository(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<RepositoryError> for EngineError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(what) => EngineError::NotFound(what),
            error if error.is_transient() => EngineError::Transient(error),
            error => EngineError::Repository(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_fields() {
        let mut details = FieldErrors::new();
        details.insert("actionId".into(), vec!["Action ID is required.".into()]);
        details.insert("voteType".into(), vec!["Invalid vote type.".into()]);
        let error = EngineError::validation(details);
        assert_eq!(error.to_string(), "Action ID is required., Invalid vote type.");
        assert_eq!(error.status_code(), 400);
    }

    #[test]
    fn test_repository_errors_are_classified() {
        let not_found: EngineError = RepositoryError::not_found("Answer").into();
        assert!(matches!(not_found, EngineError::NotFound(ref what) if what == "Answer"));
        assert_eq!(not_found.to_string(), "Answer not found");

        let conflict: EngineError = RepositoryError::Conflict("vote".into()).into();
        assert!(conflict.is_retryable());

        let underflow: EngineError = RepositoryError::CounterUnderflow("q".into()).into();
        assert!(!underflow.is_retryable());
        assert_eq!(underflow.public_message(), "An unexpected error occurred");
    }

    #[test]
    fn test_timeout_is_retryable() {
        let error = EngineError::Timeout(Duration::from_secs(5));
        assert!(error.is_retryable());
        assert_eq!(error.status_code(), 503);
    }
}
