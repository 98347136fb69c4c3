//! Reputation Service Library
//!
//! Wires the reputation engine to PostgreSQL: settings, logging, dependency
//! setup and the startup counter audit.

pub mod audit;
pub mod config;
pub mod errors;
pub mod telemetry;

pub use config::{Dependencies, LogFormat, ServiceSettings};
pub use errors::ServiceError;
