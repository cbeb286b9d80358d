use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::CoreError;
use crate::models::finances::FinancesData;

use super::traits::{prepare_for_write, FinancesStore};

/// In-process store. Useful when the embedding application owns
/// persistence itself, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<FinancesData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an existing document, which must be valid.
    pub fn with_data(mut data: FinancesData) -> Result<Self, CoreError> {
        data.sort_history();
        data.validate()?;
        Ok(Self {
            data: Mutex::new(data),
        })
    }
}

#[async_trait]
impl FinancesStore for MemoryStore {
    fn describe(&self) -> String {
        "memory".to_string()
    }

    async fn read(&self) -> Result<FinancesData, CoreError> {
        Ok(self.data.lock().await.clone())
    }

    async fn write(&self, data: &mut FinancesData) -> Result<(), CoreError> {
        let mut staged = data.clone();
        prepare_for_write(&mut staged)?;
        *self.data.lock().await = staged.clone();
        *data = staged;
        Ok(())
    }

    async fn update<F, R>(&self, mutate: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut FinancesData) -> Result<R, CoreError> + Send,
        R: Send,
    {
        let mut current = self.data.lock().await;
        let mut working = current.clone();
        let outcome = mutate(&mut working)?;
        prepare_for_write(&mut working)?;
        *current = working;
        Ok(outcome)
    }
}
