//! PostgreSQL implementation of the reputation repository.
//!
//! Tables (see `migrations/`):
//!
//! - `users`: reputation totals
//! - `questions` / `answers`: votable content with cached vote counters
//! - `votes`: the ledger, one row per (voter, target)
//! - `bookmarks`: saved questions
//! - `interactions`: append-only interaction log
mod interactions_repository;
mod reputation_store;

pub use interactions_repository::PostgresInteractionRepository;
pub use reputation_store::{PostgresReputationStore, PostgresUnitOfWork};

use crate::errors::RepositoryError;
use reputation_shared::types::{TargetKind, VoteKind};

/// Applies the bundled schema migrations to `pool`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!("src/postgres/migrations").run(pool).await?;
    Ok(())
}

pub(crate) fn target_kind_to_i16(kind: TargetKind) -> i16 {
    match kind {
        TargetKind::Question => 0,
        TargetKind::Answer => 1,
    }
}

pub(crate) fn target_kind_from_i16(value: i16) -> Result<TargetKind, RepositoryError> {
    match value {
        0 => Ok(TargetKind::Question),
        1 => Ok(TargetKind::Answer),
        other => Err(RepositoryError::InvalidTargetKind(other)),
    }
}

pub(crate) fn vote_kind_to_i16(kind: VoteKind) -> i16 {
    match kind {
        VoteKind::Up => 0,
        VoteKind::Down => 1,
    }
}

pub(crate) fn vote_kind_from_i16(value: i16) -> Result<VoteKind, RepositoryError> {
    match value {
        0 => Ok(VoteKind::Up),
        1 => Ok(VoteKind::Down),
        other => Err(RepositoryError::InvalidVoteType(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codes() {
        for kind in [TargetKind::Question, TargetKind::Answer] {
            assert_eq!(target_kind_from_i16(target_kind_to_i16(kind)).unwrap(), kind);
        }
        for kind in [VoteKind::Up, VoteKind::Down] {
            assert_eq!(vote_kind_from_i16(vote_kind_to_i16(kind)).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert!(matches!(
            vote_kind_from_i16(2),
            Err(RepositoryError::InvalidVoteType(2))
        ));
        assert!(matches!(
            target_kind_from_i16(-1),
            Err(RepositoryError::InvalidTargetKind(-1))
        ));
    }
}
