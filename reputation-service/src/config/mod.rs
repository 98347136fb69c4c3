//! Configuration module for the reputation service.
//! Reads settings from the environment and wires the engine around PostgreSQL.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{LogFormat, ServiceSettings};
