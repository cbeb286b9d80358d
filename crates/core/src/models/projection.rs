use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::category::{CategoryName, HexColor};

pub const DEFAULT_CALCULATION_PERIOD_MONTHS: u32 = 12;
pub const MIN_CALCULATION_PERIOD_MONTHS: u32 = 3;
pub const MAX_CALCULATION_PERIOD_MONTHS: u32 = 24;

pub const DEFAULT_PROJECTION_PERIOD_MONTHS: u32 = 12;
pub const MIN_PROJECTION_PERIOD_MONTHS: u32 = 3;
pub const MAX_PROJECTION_PERIOD_MONTHS: u32 = 60;

/// How far back growth is measured and how far forward it is extended.
///
/// Constructors and deserialization clamp both fields into range. The fields
/// stay public, so consumers re-clamp with [`ProjectionConfig::clamped`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawProjectionConfig")]
pub struct ProjectionConfig {
    pub calculation_period_months: u32,
    pub projection_period_months: u32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            calculation_period_months: DEFAULT_CALCULATION_PERIOD_MONTHS,
            projection_period_months: DEFAULT_PROJECTION_PERIOD_MONTHS,
        }
    }
}

impl ProjectionConfig {
    /// Clamp both periods into range.
    pub fn new(calculation_period_months: u32, projection_period_months: u32) -> Self {
        Self {
            calculation_period_months: calculation_period_months
                .clamp(MIN_CALCULATION_PERIOD_MONTHS, MAX_CALCULATION_PERIOD_MONTHS),
            projection_period_months: projection_period_months
                .clamp(MIN_PROJECTION_PERIOD_MONTHS, MAX_PROJECTION_PERIOD_MONTHS),
        }
    }

    /// The same config with both periods forced into range.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.calculation_period_months, self.projection_period_months)
    }

    /// Coerce raw query-string values. Missing or non-numeric values fall
    /// back to the default; numeric values are clamped.
    pub fn from_query(calculation: Option<&str>, projection: Option<&str>) -> Self {
        let calculation = coerce_months(calculation, DEFAULT_CALCULATION_PERIOD_MONTHS);
        let projection = coerce_months(projection, DEFAULT_PROJECTION_PERIOD_MONTHS);
        Self::new(calculation, projection)
    }
}

/// Wire form of [`ProjectionConfig`] before clamping.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProjectionConfig {
    #[serde(default = "default_calculation_period")]
    calculation_period_months: u32,
    #[serde(default = "default_projection_period")]
    projection_period_months: u32,
}

fn default_calculation_period() -> u32 {
    DEFAULT_CALCULATION_PERIOD_MONTHS
}

fn default_projection_period() -> u32 {
    DEFAULT_PROJECTION_PERIOD_MONTHS
}

impl From<RawProjectionConfig> for ProjectionConfig {
    fn from(raw: RawProjectionConfig) -> Self {
        Self::new(raw.calculation_period_months, raw.projection_period_months)
    }
}

fn coerce_months(raw: Option<&str>, default: u32) -> u32 {
    match raw.map(str::trim).map(str::parse::<i64>) {
        // Negative values clamp to the lower bound via 0.
        Some(Ok(value)) => value.clamp(0, i64::from(u32::MAX)) as u32,
        _ => default,
    }
}

/// Which estimation strategy produced a growth rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EstimationMethod {
    /// Fewer than two samples, or no usable signal
    Insufficient,
    /// Median of clamped month-over-month growth
    Robust,
    /// First/last two-point rate
    Fallback,
}

/// Result of the growth estimator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthEstimate {
    pub monthly_rate: f64,
    pub annual_rate: f64,
    pub method: EstimationMethod,
}

impl GrowthEstimate {
    pub fn zero() -> Self {
        Self {
            monthly_rate: 0.0,
            annual_rate: 0.0,
            method: EstimationMethod::Insufficient,
        }
    }

    pub fn from_monthly(monthly_rate: f64, method: EstimationMethod) -> Self {
        Self {
            monthly_rate,
            annual_rate: monthly_rate * 12.0,
            method,
        }
    }
}

/// A generated future value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One point of a projection series, historical or generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub is_projected: bool,
}

/// Historical points followed by projected points for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSeries {
    pub category: CategoryName,
    pub color: HexColor,
    pub data: Vec<SeriesPoint>,
    pub annual_rate: f64,
}

impl ProjectionSeries {
    pub fn historical(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.data.iter().filter(|p| !p.is_projected)
    }

    pub fn projected(&self) -> impl Iterator<Item = &SeriesPoint> {
        self.data.iter().filter(|p| p.is_projected)
    }
}

/// Summary growth for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGrowth {
    pub category: CategoryName,
    pub monthly_rate: f64,
    pub annual_rate: f64,
}

/// Full output of a projection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub series: Vec<ProjectionSeries>,
    pub growth_rates: Vec<CategoryGrowth>,
    pub config: ProjectionConfig,
    pub generated_at: DateTime<Utc>,
}
