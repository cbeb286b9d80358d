use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::finances::FinancesData;

/// Persistence contract for the finances document (Dependency Inversion).
///
/// The core never reaches for a global store: whoever builds a
/// [`crate::FinanceDashboard`] hands it one of these. Implementations must
/// guarantee that readers only ever observe complete documents and that at
/// most one writer completes at a time.
#[async_trait]
pub trait FinancesStore: Send + Sync {
    /// Human-readable description of the backing resource (for logs).
    fn describe(&self) -> String;

    /// Load the full document, creating an empty one on first access.
    /// The returned document satisfies every [`FinancesData::validate`] rule.
    async fn read(&self) -> Result<FinancesData, CoreError>;

    /// Replace the full document. On success `data` is sorted and carries
    /// the refreshed `last_updated` that was persisted.
    async fn write(&self, data: &mut FinancesData) -> Result<(), CoreError>;

    /// Read-modify-write under one exclusive lock. If `mutate` fails, nothing
    /// is written and its error is returned.
    async fn update<F, R>(&self, mutate: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut FinancesData) -> Result<R, CoreError> + Send,
        R: Send;
}

/// Normalize and check a document right before it is persisted.
pub(crate) fn prepare_for_write(data: &mut FinancesData) -> Result<(), CoreError> {
    data.sort_history();
    data.validate()?;
    data.touch();
    Ok(())
}
