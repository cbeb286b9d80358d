//! Robust growth-rate estimation for noisy monthly balance series.
//!
//! Balances move in lumps: a bonus lands, a car gets paid for. Two
//! strategies are used depending on how many samples are available.
//!
//! - **Robust** (≥ 6 samples): month-over-month growth for every step whose
//!   previous value is positive, each clamped to ±50%, then the median.
//! - **Fallback** (2..6 samples, or no usable steps): a single rate from the
//!   first and last samples, spread over the elapsed months and clamped to
//!   ±10%.
//!
//! The annual rate is always `monthly × 12` (simple, not compounded).

use chrono::NaiveDate;

use crate::date_utils::months_between;
use crate::models::projection::{EstimationMethod, GrowthEstimate};

/// Minimum number of samples for the median-based estimate.
pub const ROBUST_MIN_SAMPLES: usize = 6;

/// Per-step clamp for the median-based estimate.
pub const ROBUST_STEP_CLAMP: f64 = 0.5;

/// Clamp for the two-point estimate.
pub const FALLBACK_RATE_CLAMP: f64 = 0.1;

/// Estimate the monthly and annual growth of a series.
///
/// `values` and `dates` are parallel and ascending by date. Extra entries
/// in the longer slice are ignored.
pub fn estimate_growth(values: &[f64], dates: &[NaiveDate]) -> GrowthEstimate {
    let n = values.len().min(dates.len());
    let (values, dates) = (&values[..n], &dates[..n]);

    if n < 2 {
        return GrowthEstimate::zero();
    }

    if n >= ROBUST_MIN_SAMPLES {
        if let Some(rate) = median_step_growth(values) {
            return GrowthEstimate::from_monthly(rate, EstimationMethod::Robust);
        }
    }

    two_point_growth(values, dates)
}

/// Median of clamped step growth, or `None` when no step has a positive
/// previous value.
fn median_step_growth(values: &[f64]) -> Option<f64> {
    let mut steps: Vec<f64> = values
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| ((pair[1] - pair[0]) / pair[0]).clamp(-ROBUST_STEP_CLAMP, ROBUST_STEP_CLAMP))
        .collect();

    median(&mut steps)
}

fn median(samples: &mut [f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(f64::total_cmp);
    let mid = samples.len() / 2;
    if samples.len() % 2 == 0 {
        Some((samples[mid - 1] + samples[mid]) / 2.0)
    } else {
        Some(samples[mid])
    }
}

fn two_point_growth(values: &[f64], dates: &[NaiveDate]) -> GrowthEstimate {
    let (first_value, last_value) = (values[0], values[values.len() - 1]);
    let months = months_between(dates[0], dates[dates.len() - 1]);

    if months <= 0.0 || first_value <= 0.0 {
        return GrowthEstimate::zero();
    }

    let raw = (last_value - first_value) / (first_value * months);
    GrowthEstimate::from_monthly(
        raw.clamp(-FALLBACK_RATE_CLAMP, FALLBACK_RATE_CLAMP),
        EstimationMethod::Fallback,
    )
}
