use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::CoreError;

/// Advisory-lock tuning for file-backed stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// A lock file older than this is considered abandoned and removed
    pub stale_after: Duration,
    /// Attempts after the first before giving up with a write conflict
    pub max_retries: u32,
    /// Base delay; attempt `n` waits `n × retry_delay`
    pub retry_delay: Duration,
}

impl Default for LockOptions {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(10),
            max_retries: 10,
            retry_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_path: PathBuf,
    pub lock: LockOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/finances.json"),
            lock: LockOptions::default(),
        }
    }
}

impl StoreConfig {
    /// Load from the process environment, reading a `.env` file first if
    /// one exists. Unset variables keep their defaults.
    ///
    /// - `FINANCES_DATA_PATH`
    /// - `FINANCES_LOCK_STALE_SECS`
    /// - `FINANCES_LOCK_RETRIES`
    /// - `FINANCES_LOCK_RETRY_DELAY_MS`
    pub fn from_env() -> Result<Self, CoreError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let data_path = lookup("FINANCES_DATA_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let stale_after = parse_number(&lookup, "FINANCES_LOCK_STALE_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.lock.stale_after);
        let max_retries = parse_number(&lookup, "FINANCES_LOCK_RETRIES")?
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(defaults.lock.max_retries);
        let retry_delay = parse_number(&lookup, "FINANCES_LOCK_RETRY_DELAY_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.lock.retry_delay);

        Ok(Self {
            data_path,
            lock: LockOptions {
                stale_after,
                max_retries,
                retry_delay,
            },
        })
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<u64>().map(Some).map_err(|_| CoreError::Config {
            key: key.to_string(),
            message: format!("expected a non-negative integer, got '{raw}'"),
        }),
    }
}
