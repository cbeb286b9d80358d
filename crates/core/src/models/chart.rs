use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::{CategoryName, HexColor};

/// One slice of the balance breakdown (pie chart).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownItem {
    pub category: CategoryName,
    pub value: f64,
    pub color: HexColor,
}

/// Balances of every category at one date, plus their sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Date of the snapshot the breakdown was taken from, if any
    pub date: Option<NaiveDate>,
    pub items: Vec<BreakdownItem>,
    pub total: f64,
}

/// Value of a single category inside a [`ChartDataPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryValue {
    pub category: CategoryName,
    pub value: f64,
}

/// A single date on the line / stacked-area charts.
///
/// The core computes the numbers; the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub date: NaiveDate,

    /// One entry per category, in category order; absent balances are 0
    pub values: Vec<CategoryValue>,

    /// Sum of `values`
    pub total: f64,
}
