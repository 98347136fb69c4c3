//! # Reputation Repository
//! This crate provides traits and implementations for persisting the vote
//! ledger, content counters, user reputation, bookmarks and the interaction
//! log. It includes definitions for errors, interfaces, a PostgreSQL
//! implementation and an in-memory implementation.
pub mod errors;
pub mod interfaces;
pub mod memory;
pub mod postgres;

pub use errors::RepositoryError;
pub use interfaces::{InteractionRepository, ReputationStore, UnitOfWork};
pub use memory::{Fault, FaultPoint, InMemoryInteractionRepository, InMemoryReputationStore};
pub use postgres::{PostgresInteractionRepository, PostgresReputationStore, run_migrations};
