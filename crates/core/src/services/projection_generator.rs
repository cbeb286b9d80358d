use chrono::NaiveDate;

use crate::date_utils::months_after;
use crate::models::projection::ProjectedPoint;

/// Extend a series `months` steps past its last observation.
///
/// Step `i` (1-based) lands `i` calendar months after `last_date` and is
/// valued `last_value × (1 + monthly_rate × i)`, floored at 0. Every step is
/// computed from the anchor, never from the previous projected point, so
/// growth is linear in time rather than compounding.
pub fn project(
    last_value: f64,
    last_date: NaiveDate,
    monthly_rate: f64,
    months: u32,
) -> Vec<ProjectedPoint> {
    (1..=months)
        .map(|step| ProjectedPoint {
            date: months_after(last_date, step),
            value: (last_value * (1.0 + monthly_rate * f64::from(step))).max(0.0),
        })
        .collect()
}
