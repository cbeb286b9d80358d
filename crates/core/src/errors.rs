use chrono::NaiveDate;
use thiserror::Error;

/// Unified error type for the entire finance-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Validation ──────────────────────────────────────────────────
    #[error("Validation failed for {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("History point not found for date {0}")]
    HistoryPointNotFound(NaiveDate),

    // ── Data availability ───────────────────────────────────────────
    #[error("No history data available — add a balance snapshot first")]
    NoData,

    #[error("Insufficient data: {available} history point(s) in the selected period, at least {required} required")]
    InsufficientData { available: usize, required: usize },

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Write conflict: {path} is locked by another writer (gave up after {attempts} attempts)")]
    WriteConflict { path: String, attempts: u32 },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Configuration ───────────────────────────────────────────────
    #[error("Invalid configuration value for {key}: {message}")]
    Config { key: String, message: String },
}

/// Coarse classification of a [`CoreError`], for callers that render
/// different prompts per failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NoData,
    InsufficientData,
    WriteConflict,
    Io,
    Config,
}

impl CoreError {
    /// Shorthand for a field-level validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::ValidationError { .. }
            | CoreError::CategoryNotFound(_)
            | CoreError::HistoryPointNotFound(_)
            | CoreError::Serialization(_)
            | CoreError::Deserialization(_) => ErrorKind::Validation,
            CoreError::NoData => ErrorKind::NoData,
            CoreError::InsufficientData { .. } => ErrorKind::InsufficientData,
            CoreError::WriteConflict { .. } => ErrorKind::WriteConflict,
            CoreError::FileIO(_) => ErrorKind::Io,
            CoreError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Transient failures that may succeed if the caller simply tries again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::WriteConflict { .. })
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CoreError::FileIO(e.to_string())
        } else {
            CoreError::Deserialization(e.to_string())
        }
    }
}
