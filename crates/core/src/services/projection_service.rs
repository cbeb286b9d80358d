use chrono::{DateTime, Utc};

use crate::date_utils::months_before;
use crate::errors::CoreError;
use crate::models::finances::FinancesData;
use crate::models::history::HistoryPoint;
use crate::models::projection::{
    CategoryGrowth, ProjectionConfig, ProjectionResult, ProjectionSeries, SeriesPoint,
};
use crate::services::growth_estimator::estimate_growth;
use crate::services::projection_generator::project;

/// Minimum number of snapshots inside the calculation window.
pub const MIN_PROJECTION_POINTS: usize = 2;

/// Turns a document's history into per-category growth rates and
/// forward projections.
///
/// Pure business logic, no I/O. Categories are processed independently, in
/// document order.
pub struct ProjectionService;

impl ProjectionService {
    pub fn new() -> Self {
        Self
    }

    /// Compute projections as of now.
    pub fn compute_projections(
        &self,
        data: &FinancesData,
        config: ProjectionConfig,
    ) -> Result<ProjectionResult, CoreError> {
        self.compute_projections_at(data, config, Utc::now())
    }

    /// Compute projections as of `now`. The calculation window is
    /// `[now - calculation_period_months, ∞)` in calendar months.
    pub fn compute_projections_at(
        &self,
        data: &FinancesData,
        config: ProjectionConfig,
        now: DateTime<Utc>,
    ) -> Result<ProjectionResult, CoreError> {
        let config = config.clamped();
        if data.history.is_empty() {
            return Err(CoreError::NoData);
        }

        let window = self.calculation_window(&data.history, config, now);
        if window.len() < MIN_PROJECTION_POINTS {
            return Err(CoreError::InsufficientData {
                available: window.len(),
                required: MIN_PROJECTION_POINTS,
            });
        }

        let dates: Vec<_> = window.iter().map(|p| p.date).collect();
        let mut series = Vec::with_capacity(data.categories.len());
        let mut growth_rates = Vec::with_capacity(data.categories.len());

        for category in &data.categories {
            let values: Vec<f64> = window
                .iter()
                .map(|p| p.value_of(category.name.as_str()))
                .collect();

            let growth = estimate_growth(&values, &dates);

            let mut points: Vec<SeriesPoint> = dates
                .iter()
                .zip(&values)
                .map(|(&date, &value)| SeriesPoint {
                    date,
                    value,
                    is_projected: false,
                })
                .collect();

            // Window has at least two points, so both anchors exist.
            if let (Some(&last_value), Some(&last_date)) = (values.last(), dates.last()) {
                points.extend(
                    project(
                        last_value,
                        last_date,
                        growth.monthly_rate,
                        config.projection_period_months,
                    )
                    .into_iter()
                    .map(|p| SeriesPoint {
                        date: p.date,
                        value: p.value,
                        is_projected: true,
                    }),
                );
            }

            series.push(ProjectionSeries {
                category: category.name.clone(),
                color: category.color.clone(),
                data: points,
                annual_rate: growth.annual_rate,
            });
            growth_rates.push(CategoryGrowth {
                category: category.name.clone(),
                monthly_rate: growth.monthly_rate,
                annual_rate: growth.annual_rate,
            });
        }

        Ok(ProjectionResult {
            series,
            growth_rates,
            config,
            generated_at: now,
        })
    }

    /// Points on or after the window start, sorted ascending regardless of
    /// input order.
    fn calculation_window<'a>(
        &self,
        history: &'a [HistoryPoint],
        config: ProjectionConfig,
        now: DateTime<Utc>,
    ) -> Vec<&'a HistoryPoint> {
        let start = months_before(now.date_naive(), config.calculation_period_months);
        let mut window: Vec<&HistoryPoint> =
            history.iter().filter(|p| p.date >= start).collect();
        window.sort_by_key(|p| p.date);
        window
    }
}

impl Default for ProjectionService {
    fn default() -> Self {
        Self::new()
    }
}
