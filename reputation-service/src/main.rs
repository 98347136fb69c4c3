use dotenv::dotenv;
use reputation_service::audit::run_audit;
use reputation_service::telemetry::init_tracing;
use reputation_service::{Dependencies, ServiceError, ServiceSettings};
use tracing::{error, info};

/// Main entry point for the reputation service.
///
/// Loads settings, initializes logging, wires the engine around PostgreSQL,
/// audits the vote counters and then serves until interrupted.
#[tokio::main]
async fn main() -> Result<(), ServiceError> {
    dotenv().ok();

    let settings = ServiceSettings::from_env()?;
    init_tracing(settings.log_format)?;

    info!("Starting reputation service");

    let dependencies = match Dependencies::new(&settings).await {
        Ok(deps) => {
            info!("Dependencies initialized successfully");
            deps
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return Err(e);
        }
    };

    let drifts = run_audit(dependencies.store.as_ref()).await?;
    info!(drifted = drifts.len(), "Counter audit finished");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutting down");

    dependencies.shutdown().await
}
