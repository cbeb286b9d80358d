use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::CoreError;

use super::category::Category;
use super::history::HistoryPoint;

/// The whole persisted document: categories, balance history, and the
/// time of the last successful write.
///
/// Callers never patch individual fields in storage. They read the full
/// document, change it in memory, and write the full document back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancesData {
    /// Categories in insertion order
    #[serde(default)]
    pub categories: Vec<Category>,

    /// Snapshots, ascending by date after every mutation
    #[serde(default)]
    pub history: Vec<HistoryPoint>,

    /// Refreshed on every successful write
    pub last_updated: DateTime<Utc>,
}

impl Default for FinancesData {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

impl FinancesData {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name.as_str() == name)
    }

    #[must_use]
    pub fn history_point(&self, date: NaiveDate) -> Option<&HistoryPoint> {
        self.history.iter().find(|p| p.date == date)
    }

    /// Restore ascending date order. Stable, so equal dates (which
    /// `validate` rejects anyway) keep their relative order.
    pub fn sort_history(&mut self) {
        self.history.sort_by_key(|p| p.date);
    }

    /// Mark the document as written now.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Check every document invariant:
    /// - category names are unique
    /// - history dates are unique
    /// - every balance is a finite number ≥ 0
    ///
    /// Name and color shape are enforced by their types at construction and
    /// deserialization time.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut names = HashSet::new();
        for (idx, category) in self.categories.iter().enumerate() {
            if !names.insert(category.name.as_str()) {
                return Err(CoreError::validation(
                    format!("categories[{idx}].name"),
                    format!("Duplicate category name '{}'", category.name),
                ));
            }
        }

        let mut dates = HashSet::new();
        for (idx, point) in self.history.iter().enumerate() {
            if !dates.insert(point.date) {
                return Err(CoreError::validation(
                    format!("history[{idx}].date"),
                    format!("Duplicate history date {}", point.date),
                ));
            }
            point.validate()?;
        }

        Ok(())
    }
}
