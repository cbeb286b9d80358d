use chrono::{Months, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

use crate::errors::CoreError;

/// Average length of a calendar month in days (365.25 / 12, rounded).
pub const AVG_DAYS_PER_MONTH: f64 = 30.44;

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex is valid"))
}

/// Parse a strict `YYYY-MM-DD` date. Both the shape and the calendar date
/// are checked, so `2024-2-01` and `2023-02-29` are rejected.
pub fn parse_iso_date(field: &str, raw: &str) -> Result<NaiveDate, CoreError> {
    if !iso_date_pattern().is_match(raw) {
        return Err(CoreError::validation(
            field,
            format!("'{raw}' does not match YYYY-MM-DD"),
        ));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        CoreError::validation(field, format!("'{raw}' is not a valid calendar date"))
    })
}

/// `date` minus `months` calendar months. Days past the end of the target
/// month clamp to its last day (Mar 31 - 1 month = Feb 28/29).
pub fn months_before(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// `date` plus `months` calendar months, clamping like [`months_before`].
pub fn months_after(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Fractional months between two dates using the average month length.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> f64 {
    (to - from).num_days() as f64 / AVG_DAYS_PER_MONTH
}
