//! Analysis-window resolution
//!
//! Decides which slice of history a report covers: an explicit calendar
//! year, an in-progress current year, or (the default outside December) a
//! trailing 365-day window. All boundaries are calendar dates in the
//! configured timezone.

use crate::error::{Result, WrappedError};
use crate::timezone::TimezoneConfig;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label used for the rolling trailing window
pub const ROLLING_LABEL: &str = "Last 365 Days";

/// A resolved analysis window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Year the period is reported under (the end year for rolling windows)
    pub year: i32,
    /// Human label ("2024" or "Last 365 Days")
    pub label: String,
    /// First calendar date in the window (inclusive)
    pub start_date: NaiveDate,
    /// Last calendar date in the window (inclusive)
    pub end_date: NaiveDate,
    /// Whether this is a rolling trailing window rather than a calendar year
    pub is_rolling: bool,
}

impl Period {
    /// Resolve the analysis window for an optional requested year
    ///
    /// "Today" is taken in the configured timezone.
    pub fn resolve(requested_year: Option<i32>, config: &TimezoneConfig) -> Self {
        Self::resolve_at(requested_year, config.date_of(&Utc::now()))
    }

    /// Resolve the analysis window against an explicit "today"
    pub fn resolve_at(requested_year: Option<i32>, today: NaiveDate) -> Self {
        match requested_year {
            Some(year) if year < today.year() => Self {
                year,
                label: year.to_string(),
                start_date: jan1(year),
                end_date: dec31(year),
                is_rolling: false,
            },
            // Current (or not-yet-rejected future) year: in-progress window
            Some(year) => Self {
                year,
                label: year.to_string(),
                start_date: jan1(year),
                end_date: today,
                is_rolling: false,
            },
            // December is wrapped season: default to the current year to date
            None if today.month() == 12 => Self {
                year: today.year(),
                label: today.year().to_string(),
                start_date: jan1(today.year()),
                end_date: today,
                is_rolling: false,
            },
            None => Self {
                year: today.year(),
                label: ROLLING_LABEL.to_string(),
                start_date: today - Duration::days(364),
                end_date: today,
                is_rolling: true,
            },
        }
    }

    /// Whether a calendar date falls inside this window
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// Reject years whose January 1st is still in the future
///
/// Signals "not started yet" instead of silently resolving to an empty
/// window.
pub fn check_availability(year: i32, today: NaiveDate) -> Result<()> {
    if jan1(year) > today {
        return Err(WrappedError::YearNotStarted(year));
    }
    Ok(())
}

fn jan1(year: i32) -> NaiveDate {
    // Jan 1 / Dec 31 exist for every year chrono can represent
    NaiveDate::from_ymd_opt(year, 1, 1).expect("valid date")
}

fn dec31(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date")
}
