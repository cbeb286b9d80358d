use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::LockOptions;
use crate::errors::CoreError;

/// Exclusive advisory lock on a data file, held as a sibling `<file>.lock`.
///
/// The lock file is removed when the guard is dropped, so every exit path
/// (success, error, early return) releases it.
#[derive(Debug)]
pub struct LockGuard {
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(lock = %self.path.display(), "Released lock"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(lock = %self.path.display(), error = %e, "Failed to release lock"),
        }
    }
}

/// Path of the lock file guarding `target`.
pub fn lock_path_for(target: &Path) -> PathBuf {
    let mut name: OsString = target.as_os_str().to_owned();
    name.push(".lock");
    PathBuf::from(name)
}

/// Path of the claim file a waiter holds while breaking a stale `lock`.
pub fn breaker_path_for(lock: &Path) -> PathBuf {
    let mut name: OsString = lock.as_os_str().to_owned();
    name.push(".break");
    PathBuf::from(name)
}

/// Acquire the lock for `target`.
///
/// On contention retries up to `max_retries` times, waiting
/// `attempt × retry_delay` between attempts. A lock file older than
/// `stale_after` is treated as abandoned and removed. Running out of
/// attempts yields [`CoreError::WriteConflict`].
pub async fn acquire(target: &Path, options: &LockOptions) -> Result<LockGuard, CoreError> {
    let path = lock_path_for(target);
    let attempts = options.max_retries.saturating_add(1);
    let mut attempt: u32 = 1;

    loop {
        match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                let guard = LockGuard { path };
                file.write_all(format!("{}\n", std::process::id()).as_bytes())
                    .await?;
                file.flush().await?;
                debug!(lock = %guard.path.display(), attempt, "Acquired lock");
                return Ok(guard);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                // Breaking a stale lock does not use up an attempt.
                if break_if_stale(&path, options).await? {
                    continue;
                }
                if attempt >= attempts {
                    break;
                }
                debug!(lock = %path.display(), attempt, "Lock busy, retrying");
                tokio::time::sleep(options.retry_delay * attempt).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    warn!(lock = %path.display(), attempts, "Gave up waiting for lock");
    Err(CoreError::WriteConflict {
        path: target.display().to_string(),
        attempts,
    })
}

/// Remove `lock` if it has gone stale. Returns `true` when the caller should
/// retry immediately.
///
/// Waiters serialize on the `<lock>.break` claim and re-check staleness
/// while holding it, so a lock recreated by another waiter after the first
/// check is never removed.
async fn break_if_stale(lock: &Path, options: &LockOptions) -> Result<bool, CoreError> {
    if !is_stale(lock, options).await {
        return Ok(false);
    }

    let breaker = breaker_path_for(lock);
    let _claim = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&breaker)
        .await
    {
        Ok(_) => LockGuard {
            path: breaker.clone(),
        },
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            // A breaker that died mid-break leaves its claim behind.
            if is_stale(&breaker, options).await {
                warn!(claim = %breaker.display(), "Removing abandoned stale-lock claim");
                remove_if_present(&breaker).await?;
            }
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    match tokio::fs::metadata(lock).await {
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(e.into()),
        Ok(_) => {}
    }
    if !is_stale(lock, options).await {
        return Ok(false);
    }

    warn!(lock = %lock.display(), "Removing stale lock");
    remove_if_present(lock).await?;
    Ok(true)
}

async fn remove_if_present(path: &Path) -> Result<(), CoreError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

async fn is_stale(path: &Path, options: &LockOptions) -> bool {
    let Ok(metadata) = tokio::fs::metadata(path).await else {
        return false;
    };
    metadata
        .modified()
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .is_some_and(|age| age > options.stale_after)
}
