//! Timezone handling for calendar bucketing
//!
//! Every calendar derivation in this crate — daily-activity keys, weekday
//! buckets, streak walking, period boundaries, and "today" — goes through a
//! single [`TimezoneConfig`], so a message can never land in a different day
//! than its weekday bucket near midnight.

use crate::error::{Result, WrappedError};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Configuration for timezone handling
#[derive(Debug, Clone, Copy)]
pub struct TimezoneConfig {
    /// The timezone used for all date operations
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        let tz = local_timezone();
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }
}

impl TimezoneConfig {
    /// Build a timezone configuration from CLI arguments
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self {
                tz: Tz::UTC,
                is_utc: true,
            });
        }

        match timezone_str {
            Some(tz_str) => {
                let tz = Tz::from_str(tz_str).map_err(|_| {
                    WrappedError::InvalidTimezone(format!(
                        "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                    ))
                })?;
                Ok(Self {
                    is_utc: tz == Tz::UTC,
                    tz,
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Calendar date of an instant in this timezone
    pub fn date_of(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// Display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }
}

/// Detect the system's local timezone, falling back to UTC
pub fn local_timezone() -> Tz {
    // TZ env var takes precedence over the platform lookup
    #[allow(clippy::collapsible_if)]
    if let Ok(tz_str) = std::env::var("TZ") {
        if let Ok(tz) = Tz::from_str(&tz_str) {
            debug!("Using timezone from TZ environment variable: {tz_str}");
            return tz;
        }
    }

    match iana_time_zone::get_timezone() {
        Ok(tz_str) => Tz::from_str(&tz_str).unwrap_or_else(|_| {
            debug!("Could not parse system timezone '{tz_str}', falling back to UTC");
            Tz::UTC
        }),
        Err(e) => {
            debug!("Could not detect local timezone: {e:?}, falling back to UTC");
            Tz::UTC
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_utc_flag() {
        let config = TimezoneConfig::from_cli(None, true).unwrap();
        assert!(config.is_utc);
        assert_eq!(config.tz, Tz::UTC);
        assert_eq!(config.display_name(), "UTC");
    }

    #[test]
    fn test_explicit_timezone() {
        let config = TimezoneConfig::from_cli(Some("Asia/Tokyo"), false).unwrap();
        assert!(!config.is_utc);
        assert_eq!(config.tz.name(), "Asia/Tokyo");
    }

    #[test]
    fn test_utc_via_timezone_string() {
        let config = TimezoneConfig::from_cli(Some("UTC"), false).unwrap();
        assert!(config.is_utc);
    }

    #[test]
    fn test_invalid_timezone() {
        let result = TimezoneConfig::from_cli(Some("Not/AZone"), false);
        assert!(matches!(result, Err(WrappedError::InvalidTimezone(_))));
    }

    #[test]
    fn test_date_of_crosses_midnight() {
        let config = TimezoneConfig::from_cli(Some("America/New_York"), false).unwrap();
        // 04:00 UTC on Jan 2 is still Jan 1 in New York
        let instant = Utc.with_ymd_and_hms(2025, 1, 2, 4, 0, 0).unwrap();
        assert_eq!(
            config.date_of(&instant),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }
}
