//! This module defines and re-exports the interfaces for the reputation repository.
//! It serves as a central point for accessing traits related to data interaction.
mod interactions;
mod store;

pub use interactions::InteractionRepository;
pub use store::{ReputationStore, UnitOfWork};
