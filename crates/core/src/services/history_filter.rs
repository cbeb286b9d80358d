use chrono::{NaiveDate, Utc};

use crate::date_utils::{months_before, parse_iso_date};
use crate::errors::CoreError;
use crate::models::filter::{FilterParams, Period};
use crate::models::history::HistoryPoint;

/// Inclusive date bounds; `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Turn query parameters into concrete bounds relative to `today`.
///
/// `period` wins over `from`/`to`. Explicit dates are parsed strictly and a
/// malformed one is an error, never a missing bound.
pub fn resolve_bounds(params: &FilterParams, today: NaiveDate) -> Result<DateBounds, CoreError> {
    if let Some(period) = params.period {
        return Ok(match period {
            Period::All => DateBounds::default(),
            Period::ThreeMonths => DateBounds {
                from: Some(months_before(today, 3)),
                to: Some(today),
            },
            Period::OneYear => DateBounds {
                from: Some(months_before(today, 12)),
                to: None,
            },
        });
    }

    let from = params
        .from
        .as_deref()
        .map(|raw| parse_iso_date("from", raw))
        .transpose()?;
    let to = params
        .to
        .as_deref()
        .map(|raw| parse_iso_date("to", raw))
        .transpose()?;

    Ok(DateBounds { from, to })
}

/// Select the history points inside the requested window, relative to
/// today's date (UTC).
pub fn filter_history(
    history: &[HistoryPoint],
    params: &FilterParams,
) -> Result<Vec<HistoryPoint>, CoreError> {
    filter_history_on(history, params, Utc::now().date_naive())
}

/// Same as [`filter_history`] with an explicit "today".
///
/// Input order is preserved; this function never sorts.
pub fn filter_history_on(
    history: &[HistoryPoint],
    params: &FilterParams,
    today: NaiveDate,
) -> Result<Vec<HistoryPoint>, CoreError> {
    if params.is_empty() {
        return Ok(history.to_vec());
    }

    let bounds = resolve_bounds(params, today)?;
    Ok(history
        .iter()
        .filter(|point| bounds.contains(point.date))
        .cloned()
        .collect())
}
