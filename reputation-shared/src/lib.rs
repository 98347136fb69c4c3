//! # Reputation Shared
//! This crate defines the data structures shared across the reputation workspace.
//! It includes identifiers, vote targets, votes, votable content, interaction
//! records and the fixed reputation point schedule.
pub mod paths;
pub mod types;
