use crate::models::category::Category;
use crate::models::chart::{Breakdown, BreakdownItem, CategoryValue, ChartDataPoint};
use crate::models::history::HistoryPoint;

/// Generates chart-ready data sets from categories and history.
///
/// The core computes all the numbers; the frontend only renders.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// The snapshot with the greatest date, independent of slice order.
    #[must_use]
    pub fn latest_point<'a>(&self, history: &'a [HistoryPoint]) -> Option<&'a HistoryPoint> {
        history.iter().max_by_key(|p| p.date)
    }

    /// Pair every category with its balance in `point` (missing = 0) and
    /// sum them. Keys in `point` that match no category are ignored.
    #[must_use]
    pub fn compute_breakdown(&self, categories: &[Category], point: &HistoryPoint) -> Breakdown {
        let items: Vec<BreakdownItem> = categories
            .iter()
            .map(|c| BreakdownItem {
                category: c.name.clone(),
                value: point.value_of(c.name.as_str()),
                color: c.color.clone(),
            })
            .collect();
        let total = items.iter().map(|i| i.value).sum();

        Breakdown {
            date: Some(point.date),
            items,
            total,
        }
    }

    /// One chart point per snapshot, in the order given, with a value for
    /// every category. Feeds the line and stacked-area charts.
    #[must_use]
    pub fn history_series(
        &self,
        categories: &[Category],
        history: &[HistoryPoint],
    ) -> Vec<ChartDataPoint> {
        history
            .iter()
            .map(|point| {
                let values: Vec<CategoryValue> = categories
                    .iter()
                    .map(|c| CategoryValue {
                        category: c.name.clone(),
                        value: point.value_of(c.name.as_str()),
                    })
                    .collect();
                let total = values.iter().map(|v| v.value).sum();
                ChartDataPoint {
                    date: point.date,
                    values,
                    total,
                }
            })
            .collect()
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
