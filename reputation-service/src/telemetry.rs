//! Log subscriber setup.
use crate::config::LogFormat;
use crate::errors::ServiceError;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str =
    "reputation_service=info,reputation_engine=info,reputation_repository=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing(format: LogFormat) -> Result<(), ServiceError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true).pretty())
            .try_init(),
    }
    .map_err(|e| ServiceError::Telemetry(e.to_string()))?;

    info!(
        service_name = "reputation-service",
        service_version = env!("CARGO_PKG_VERSION"),
        format = ?format,
        "Tracing initialized"
    );
    Ok(())
}
