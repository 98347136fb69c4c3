//! In-memory implementation of the reputation repository.
//!
//! Units of work are serialized: `begin` takes an exclusive lock on the whole
//! state and works on a private copy that replaces the shared state on
//! commit. Used by the engine tests and for local runs without PostgreSQL.
//! Faults can be injected per operation to exercise rollback and retry paths.
mod interactions;
mod store;

pub use interactions::InMemoryInteractionRepository;
pub use store::InMemoryReputationStore;

use crate::errors::RepositoryError;
use std::time::Duration;

/// Operations of a unit of work at which a fault can be injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
    FindContent,
    FindVote,
    InsertVote,
    UpdateVote,
    DeleteVote,
    AdjustCounter,
    ApplyReputation,
    Commit,
}

/// A one-shot fault, consumed by the first matching operation.
#[derive(Debug)]
pub enum Fault {
    /// The operation fails with the given error.
    Fail(RepositoryError),
    /// The operation sleeps before proceeding normally. At
    /// [`FaultPoint::Commit`] the writes land first and only the
    /// acknowledgement is late.
    Stall(Duration),
}
