//! This module defines the `TransactionCoordinator`, which runs every
//! reputation-bearing operation as one atomic unit of work against the
//! `ReputationStore`.
use crate::config::EngineConfig;
use crate::errors::EngineError;
use futures::future::BoxFuture;
use reputation_repository::{ReputationStore, UnitOfWork};
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

/// Upper bound for a single backoff delay between two attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Runs units of work with all-or-nothing semantics.
///
/// Each attempt opens a unit, hands it to the caller's work, and commits when
/// the work succeeds. Any error rolls the unit back before it is surfaced.
///
/// The transaction timeout bounds opening the unit and running the work. An
/// attempt that outlives it is dropped, which discards the unit, and reported
/// as retryable. Retryable failures are replayed from scratch with
/// exponential backoff, up to the configured number of retries.
///
/// Commit is awaited outside the timeout and a failed commit is never
/// replayed: its writes may have landed, and replaying a toggle would undo it.
pub struct TransactionCoordinator {
    store: Arc<dyn ReputationStore>,
    timeout: Duration,
    max_retries: usize,
    base_delay: Duration,
}

impl TransactionCoordinator {
    /// Creates a new `TransactionCoordinator`.
    ///
    /// # Arguments
    ///
    /// * `store` - The store units of work are opened on
    /// * `config` - Timeout and retry limits
    ///
    /// # Returns
    ///
    /// A new `TransactionCoordinator` instance.
    pub fn new(store: Arc<dyn ReputationStore>, config: &EngineConfig) -> Self {
        Self {
            store,
            timeout: config.transaction_timeout,
            max_retries: config.max_transient_retries,
            base_delay: config.retry_base_delay,
        }
    }

    /// Runs `work` inside a unit of work and commits it.
    ///
    /// `work` may be invoked more than once, each time on a fresh unit, so it
    /// must derive everything it writes from what it reads through the unit.
    ///
    /// # Arguments
    ///
    /// * `operation` - Name of the operation, used in logs
    /// * `work` - The reads and writes of the operation
    ///
    /// # Returns
    ///
    /// * `Ok(T)` - The value produced by the committed attempt
    /// * `Err(EngineError)` - The error of the last attempt; nothing was written
    ///   unless the commit itself failed, in which case the outcome is unknown
    pub async fn run_atomic<T, F>(
        &self,
        operation: &'static str,
        mut work: F,
    ) -> Result<T, EngineError>
    where
        T: Send,
        F: for<'u> FnMut(&'u mut dyn UnitOfWork) -> BoxFuture<'u, Result<T, EngineError>> + Send,
    {
        let base_millis = u64::try_from(self.base_delay.as_millis())
            .unwrap_or(u64::MAX)
            .max(1);
        let mut backoff = ExponentialBackoff::from_millis(2)
            .factor(base_millis)
            .max_delay(MAX_RETRY_DELAY)
            .map(jitter)
            .take(self.max_retries);
        let mut attempt = 1;

        loop {
            match self.attempt(&mut work).await {
                Ok(value) => {
                    debug!(operation, attempt, "Unit of work committed");
                    return Ok(value);
                }
                Err(error) if error.is_retryable() => match backoff.next() {
                    Some(delay) => {
                        warn!(
                            operation,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            error = %error,
                            "Retrying unit of work after transient failure"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => {
                        warn!(
                            operation,
                            attempt,
                            error = %error,
                            "Unit of work failed after retries"
                        );
                        return Err(error);
                    }
                },
                Err(error) => return Err(error),
            }
        }
    }

    async fn attempt<T, F>(&self, work: &mut F) -> Result<T, EngineError>
    where
        T: Send,
        F: for<'u> FnMut(&'u mut dyn UnitOfWork) -> BoxFuture<'u, Result<T, EngineError>> + Send,
    {
        let (value, uow) = match tokio::time::timeout(self.timeout, self.prepare(work)).await {
            Ok(prepared) => prepared?,
            Err(_) => return Err(EngineError::Timeout(self.timeout)),
        };

        if let Err(error) = uow.commit().await {
            warn!(error = %error, "Commit failed, outcome unknown");
            return Err(EngineError::Repository(error));
        }
        Ok(value)
    }

    /// Opens a unit and runs `work` on it, handing back the uncommitted unit.
    async fn prepare<T, F>(
        &self,
        work: &mut F,
    ) -> Result<(T, Box<dyn UnitOfWork>), EngineError>
    where
        T: Send,
        F: for<'u> FnMut(&'u mut dyn UnitOfWork) -> BoxFuture<'u, Result<T, EngineError>> + Send,
    {
        let mut uow = self.store.begin().await?;
        match work(&mut *uow).await {
            Ok(value) => Ok((value, uow)),
            Err(error) => {
                if let Err(rollback_error) = uow.rollback().await {
                    warn!(error = %rollback_error, "Failed to roll back unit of work");
                }
                Err(error)
            }
        }
    }
}
