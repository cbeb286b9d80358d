use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::category::Category;
use crate::models::finances::FinancesData;
use crate::models::history::HistoryPoint;

/// Applies category and history mutations to an in-memory document.
///
/// Pure business logic with no I/O. Every method validates before touching
/// `data`, so a failed call leaves the document unchanged.
pub struct FinancesService;

impl FinancesService {
    pub fn new() -> Self {
        Self
    }

    // ── Categories ──────────────────────────────────────────────────

    /// Append a category. Names must be unique.
    pub fn add_category(&self, data: &mut FinancesData, category: Category) -> Result<(), CoreError> {
        if data.category(category.name.as_str()).is_some() {
            return Err(CoreError::validation(
                "name",
                format!("Category '{}' already exists", category.name),
            ));
        }
        data.categories.push(category);
        Ok(())
    }

    /// Replace the category called `name` with `updated`, keeping its
    /// position. A rename moves the balance key in every history point and
    /// drops any unowned balance already recorded under the new name.
    pub fn update_category(
        &self,
        data: &mut FinancesData,
        name: &str,
        updated: Category,
    ) -> Result<(), CoreError> {
        let idx = self.category_index(data, name)?;

        let renamed = updated.name.as_str() != name;
        if renamed && data.category(updated.name.as_str()).is_some() {
            return Err(CoreError::validation(
                "name",
                format!("Category '{}' already exists", updated.name),
            ));
        }

        if renamed {
            for point in &mut data.history {
                // Balances already stored under the new name belong to no
                // category and must not survive as the renamed one's value.
                point.data.remove(updated.name.as_str());
                if let Some(value) = point.data.remove(name) {
                    point.data.insert(updated.name.clone(), value);
                }
            }
        }

        data.categories[idx] = updated;
        Ok(())
    }

    /// Remove a category and drop its balance from every history point.
    pub fn remove_category(&self, data: &mut FinancesData, name: &str) -> Result<Category, CoreError> {
        let idx = self.category_index(data, name)?;
        let removed = data.categories.remove(idx);
        for point in &mut data.history {
            point.data.remove(name);
        }
        Ok(removed)
    }

    // ── History ─────────────────────────────────────────────────────

    /// Insert a snapshot, or replace the one already recorded for its date.
    pub fn upsert_history_point(
        &self,
        data: &mut FinancesData,
        point: HistoryPoint,
    ) -> Result<(), CoreError> {
        point.validate()?;
        match data.history.iter_mut().find(|p| p.date == point.date) {
            Some(existing) => *existing = point,
            None => data.history.push(point),
        }
        data.sort_history();
        Ok(())
    }

    /// Replace the snapshot at `original_date`, possibly moving it to a new
    /// date. Moving onto another snapshot's date is rejected.
    pub fn update_history_point(
        &self,
        data: &mut FinancesData,
        original_date: NaiveDate,
        point: HistoryPoint,
    ) -> Result<(), CoreError> {
        point.validate()?;
        let idx = self.history_index(data, original_date)?;

        if point.date != original_date && data.history_point(point.date).is_some() {
            return Err(CoreError::validation(
                "date",
                format!("A history point for {} already exists", point.date),
            ));
        }

        data.history[idx] = point;
        data.sort_history();
        Ok(())
    }

    pub fn delete_history_point(
        &self,
        data: &mut FinancesData,
        date: NaiveDate,
    ) -> Result<HistoryPoint, CoreError> {
        let idx = self.history_index(data, date)?;
        Ok(data.history.remove(idx))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn category_index(&self, data: &FinancesData, name: &str) -> Result<usize, CoreError> {
        data.categories
            .iter()
            .position(|c| c.name.as_str() == name)
            .ok_or_else(|| CoreError::CategoryNotFound(name.to_string()))
    }

    fn history_index(&self, data: &FinancesData, date: NaiveDate) -> Result<usize, CoreError> {
        data.history
            .iter()
            .position(|p| p.date == date)
            .ok_or(CoreError::HistoryPointNotFound(date))
    }
}

impl Default for FinancesService {
    fn default() -> Self {
        Self::new()
    }
}
