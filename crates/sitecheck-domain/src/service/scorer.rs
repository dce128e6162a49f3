//! Inspection scoring and fleet metrics
//!
//! Pure functions: no I/O, no clock access except in [`metrics`].
//! All averages round half away from zero (`f64::round`).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use sitecheck_types::{Area, Error, Inspection, InspectionStatus, Metrics};

/// Window counted by `Metrics::last_7_days`
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Score and status derived from an inspection's areas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionScore {
    pub score: u8,
    pub status: InspectionStatus,
}

fn rounded_mean(sum: u64, count: usize) -> u8 {
    (sum as f64 / count as f64).round() as u8
}

/// Score an inspection from its areas
///
/// `score` is the rounded mean of the area scores; the inspection passes when
/// that rounded score is at least 80. An empty area list is a caller bug and
/// is reported as [`Error::NoAreas`].
pub fn score_inspection(areas: &[Area]) -> Result<InspectionScore, Error> {
    if areas.is_empty() {
        return Err(Error::NoAreas);
    }

    let sum: u64 = areas.iter().map(|a| a.score as u64).sum();
    let score = rounded_mean(sum, areas.len());

    Ok(InspectionScore {
        score,
        status: InspectionStatus::from_score(score),
    })
}

/// Aggregate metrics over a collection, relative to `now`
///
/// An inspection counts towards `last_7_days` when at most 7 x 24 hours have
/// elapsed since its submission (boundary inclusive). Inspections dated after
/// `now` count as recent.
pub fn compute_metrics(inspections: &[Inspection], now: DateTime<Utc>) -> Metrics {
    let total = inspections.len();
    if total == 0 {
        return Metrics::default();
    }

    let score_sum: u64 = inspections.iter().map(|i| i.score as u64).sum();
    let passed = inspections.iter().filter(|i| i.is_passed()).count();
    let window = Duration::days(RECENT_WINDOW_DAYS);
    let last_7_days = inspections
        .iter()
        .filter(|i| now.signed_duration_since(i.date) <= window)
        .count();

    Metrics {
        total,
        avg_score: rounded_mean(score_sum, total),
        pass_rate: ((passed as f64 / total as f64) * 100.0).round() as u8,
        last_7_days,
    }
}

/// Aggregate metrics relative to the current time
pub fn metrics(inspections: &[Inspection]) -> Metrics {
    compute_metrics(inspections, Utc::now())
}
