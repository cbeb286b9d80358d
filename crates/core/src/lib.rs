pub mod config;
pub mod date_utils;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    category::Category,
    chart::{Breakdown, ChartDataPoint},
    filter::FilterParams,
    finances::FinancesData,
    history::HistoryPoint,
    projection::{ProjectionConfig, ProjectionResult},
};
use services::{
    chart_service::ChartService,
    finances_service::FinancesService,
    history_filter::filter_history_on,
    projection_service::ProjectionService,
};
use storage::traits::FinancesStore;
use tracing::info;

use errors::CoreError;

/// Main entry point for the Finance Dashboard core library.
///
/// Owns an injected [`FinancesStore`] and all services needed to operate on
/// the document it holds. Every mutation is one read-modify-write cycle on
/// the store; every query reads categories and history from the same
/// document, so they are never out of step with each other.
#[must_use]
pub struct FinanceDashboard<S: FinancesStore> {
    store: S,
    finances_service: FinancesService,
    chart_service: ChartService,
    projection_service: ProjectionService,
}

impl<S: FinancesStore> std::fmt::Debug for FinanceDashboard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinanceDashboard")
            .field("store", &self.store.describe())
            .finish()
    }
}

impl<S: FinancesStore> FinanceDashboard<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            finances_service: FinancesService::new(),
            chart_service: ChartService::new(),
            projection_service: ProjectionService::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The full document (created empty on first access).
    pub async fn data(&self) -> Result<FinancesData, CoreError> {
        self.store.read().await
    }

    // ── Category Management ─────────────────────────────────────────

    /// Add a category from raw name/color input.
    pub async fn add_category(&self, name: &str, color: &str) -> Result<Category, CoreError> {
        let category = Category::new(name, color)?;
        let added = category.clone();
        self.store
            .update(|data| self.finances_service.add_category(data, category))
            .await?;
        info!(category = %added.name, "Added category");
        Ok(added)
    }

    /// Rename and/or recolor a category. A rename migrates every history
    /// point's balance to the new name.
    pub async fn update_category(
        &self,
        name: &str,
        new_name: &str,
        new_color: &str,
    ) -> Result<Category, CoreError> {
        let updated = Category::new(new_name, new_color)?;
        let result = updated.clone();
        self.store
            .update(|data| self.finances_service.update_category(data, name, updated))
            .await?;
        info!(from = name, to = %result.name, "Updated category");
        Ok(result)
    }

    /// Remove a category along with its balances in every history point.
    pub async fn remove_category(&self, name: &str) -> Result<Category, CoreError> {
        let removed = self
            .store
            .update(|data| self.finances_service.remove_category(data, name))
            .await?;
        info!(category = %removed.name, "Removed category");
        Ok(removed)
    }

    // ── History Management ──────────────────────────────────────────

    /// Record the balances for a date, replacing any existing snapshot.
    pub async fn upsert_history_point(&self, point: HistoryPoint) -> Result<(), CoreError> {
        let date = point.date;
        self.store
            .update(|data| self.finances_service.upsert_history_point(data, point))
            .await?;
        info!(%date, "Saved history point");
        Ok(())
    }

    /// Replace the snapshot at `original_date`, possibly under a new date.
    pub async fn update_history_point(
        &self,
        original_date: NaiveDate,
        point: HistoryPoint,
    ) -> Result<(), CoreError> {
        let date = point.date;
        self.store
            .update(|data| {
                self.finances_service
                    .update_history_point(data, original_date, point)
            })
            .await?;
        info!(from = %original_date, to = %date, "Updated history point");
        Ok(())
    }

    pub async fn delete_history_point(&self, date: NaiveDate) -> Result<HistoryPoint, CoreError> {
        let removed = self
            .store
            .update(|data| self.finances_service.delete_history_point(data, date))
            .await?;
        info!(%date, "Deleted history point");
        Ok(removed)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// History points inside the requested window, in document order.
    pub async fn filter_history(&self, params: &FilterParams) -> Result<Vec<HistoryPoint>, CoreError> {
        let data = self.store.read().await?;
        filter_history_on(&data.history, params, today())
    }

    /// Category balances at the latest snapshot inside the window.
    pub async fn breakdown(&self, params: &FilterParams) -> Result<Breakdown, CoreError> {
        let data = self.store.read().await?;
        if data.history.is_empty() {
            return Err(CoreError::NoData);
        }
        let filtered = filter_history_on(&data.history, params, today())?;
        let latest = self
            .chart_service
            .latest_point(&filtered)
            .ok_or(CoreError::InsufficientData {
                available: 0,
                required: 1,
            })?;
        Ok(self.chart_service.compute_breakdown(&data.categories, latest))
    }

    /// Per-date category balances inside the window, for line/area charts.
    pub async fn history_chart(&self, params: &FilterParams) -> Result<Vec<ChartDataPoint>, CoreError> {
        let data = self.store.read().await?;
        let filtered = filter_history_on(&data.history, params, today())?;
        Ok(self.chart_service.history_series(&data.categories, &filtered))
    }

    /// Growth rates and projected balances for every category.
    pub async fn projections(&self, config: ProjectionConfig) -> Result<ProjectionResult, CoreError> {
        self.projections_at(config, Utc::now()).await
    }

    /// Same as [`Self::projections`] evaluated as of `now`.
    pub async fn projections_at(
        &self,
        config: ProjectionConfig,
        now: DateTime<Utc>,
    ) -> Result<ProjectionResult, CoreError> {
        let data = self.store.read().await?;
        self.projection_service
            .compute_projections_at(&data, config, now)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
