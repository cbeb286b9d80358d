use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::config::{LockOptions, StoreConfig};
use crate::errors::CoreError;
use crate::models::finances::FinancesData;

use super::lock;
use super::traits::{prepare_for_write, FinancesStore};

/// Finances document stored as pretty-printed JSON on disk.
///
/// Writes take an exclusive advisory lock (`<file>.lock`), write a
/// uniquely-named temp file in the same directory, and `rename` it over the
/// target. Reads take no lock: a rename is atomic, so a reader sees either
/// the previous or the new document, never a partial one.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: LockOptions,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: LockOptions::default(),
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            path: config.data_path.clone(),
            lock: config.lock,
        }
    }

    #[must_use]
    pub fn with_lock_options(mut self, lock: LockOptions) -> Self {
        self.lock = lock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse and validate raw document bytes.
    ///
    /// Flow: bytes → serde_json → FinancesData → validate
    pub fn parse(bytes: &[u8]) -> Result<FinancesData, CoreError> {
        let data: FinancesData = serde_json::from_slice(bytes).map_err(|e| {
            CoreError::Deserialization(format!("Failed to parse finances document: {e}"))
        })?;
        data.validate()?;
        Ok(data)
    }

    async fn read_existing(&self) -> Result<Option<FinancesData>, CoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Self::parse(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write `data` to a temp file and atomically move it into place.
    /// The caller must hold the lock.
    async fn persist(&self, data: &FinancesData) -> Result<(), CoreError> {
        let json = serde_json::to_vec_pretty(data).map_err(|e| {
            CoreError::Serialization(format!("Failed to serialize finances document: {e}"))
        })?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "finances.json".to_string());
        let tmp_path = dir.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4()));

        let result = async {
            let mut file = tokio::fs::File::create(&tmp_path).await?;
            file.write_all(&json).await?;
            file.sync_all().await?;
            drop(file);
            tokio::fs::rename(&tmp_path, &self.path).await
        }
        .await;

        if let Err(e) = result {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(tmp = %tmp_path.display(), error = %cleanup, "Failed to remove temp file");
                }
            }
            return Err(e.into());
        }

        debug!(
            path = %self.path.display(),
            bytes = json.len(),
            categories = data.categories.len(),
            history = data.history.len(),
            "Wrote finances document"
        );
        Ok(())
    }
}

#[async_trait]
impl FinancesStore for JsonFileStore {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    async fn read(&self) -> Result<FinancesData, CoreError> {
        if let Some(data) = self.read_existing().await? {
            return Ok(data);
        }

        let _guard = lock::acquire(&self.path, &self.lock).await?;
        // Another writer may have created it while we waited.
        if let Some(data) = self.read_existing().await? {
            return Ok(data);
        }

        let data = FinancesData::new();
        self.persist(&data).await?;
        info!(path = %self.path.display(), "Created empty finances document");
        Ok(data)
    }

    async fn write(&self, data: &mut FinancesData) -> Result<(), CoreError> {
        let mut staged = data.clone();
        prepare_for_write(&mut staged)?;

        let _guard = lock::acquire(&self.path, &self.lock).await?;
        self.persist(&staged).await?;
        *data = staged;
        Ok(())
    }

    async fn update<F, R>(&self, mutate: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut FinancesData) -> Result<R, CoreError> + Send,
        R: Send,
    {
        let _guard = lock::acquire(&self.path, &self.lock).await?;

        let mut data = self.read_existing().await?.unwrap_or_default();
        let outcome = mutate(&mut data)?;
        prepare_for_write(&mut data)?;
        self.persist(&data).await?;
        Ok(outcome)
    }
}
