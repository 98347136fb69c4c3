//! Service settings read from the environment.
use crate::errors::ServiceError;
use reputation_engine::EngineConfig;
use std::str::FromStr;
use std::time::Duration;

/// Default size of the PostgreSQL pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ServiceError::config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{other}'"
            ))),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub database_url: String,
    pub max_connections: u32,
    pub log_format: LogFormat,
    pub engine: EngineConfig,
}

impl ServiceSettings {
    /// Reads settings from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: PostgreSQL connection string (required)
    /// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
    /// - `TRANSACTION_TIMEOUT_MS`: Per-attempt bound of a unit of work (default: 5000)
    /// - `TRANSACTION_RETRIES`: Extra attempts after a transient failure (default: 1)
    /// - `TRANSACTION_RETRY_BASE_MS`: Backoff unit between attempts (default: 50)
    /// - `RECORDER_TIMEOUT_MS`: Bound of a single interaction write (default: 2000)
    /// - `RECORDER_CAPACITY`: Pending interaction records kept in memory (default: 1024)
    /// - `LOG_FORMAT`: `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, ServiceError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServiceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| ServiceError::config("DATABASE_URL must be set"))?;

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            transaction_timeout: millis(&lookup, "TRANSACTION_TIMEOUT_MS")?
                .unwrap_or(defaults.transaction_timeout),
            max_transient_retries: parsed(&lookup, "TRANSACTION_RETRIES")?
                .unwrap_or(defaults.max_transient_retries),
            retry_base_delay: millis(&lookup, "TRANSACTION_RETRY_BASE_MS")?
                .unwrap_or(defaults.retry_base_delay),
            recorder_timeout: millis(&lookup, "RECORDER_TIMEOUT_MS")?
                .unwrap_or(defaults.recorder_timeout),
            recorder_capacity: parsed(&lookup, "RECORDER_CAPACITY")?
                .unwrap_or(defaults.recorder_capacity),
        };
        if engine.transaction_timeout.is_zero() {
            return Err(ServiceError::config("TRANSACTION_TIMEOUT_MS must be positive"));
        }

        Ok(Self {
            database_url,
            max_connections: parsed(&lookup, "DATABASE_MAX_CONNECTIONS")?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            log_format: parsed(&lookup, "LOG_FORMAT")?.unwrap_or_default(),
            engine,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ServiceError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ServiceError::config(format!("{key} has an invalid value: '{raw}'"))),
    }
}

fn millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ServiceError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parsed::<F, u64>(lookup, key)?.map(Duration::from_millis))
}
