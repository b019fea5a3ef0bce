//! CLI interface for gemini-wrapped
//!
//! # Example
//!
//! ```bash
//! # Wrapped for the trailing 365 days (or the current year in December)
//! gemini-wrapped
//!
//! # Wrapped for a specific year, as JSON
//! gemini-wrapped --year 2025 --json
//!
//! # Pin date bucketing to a timezone
//! gemini-wrapped --timezone Asia/Tokyo
//! ```

use crate::error::{Result, WrappedError};
use clap::Parser;

/// Generate your Gemini CLI year-in-review stats from local session logs
#[derive(Parser, Debug, Clone)]
#[command(name = "gemini-wrapped")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Generate wrapped for a specific year (default: trailing 365 days)
    #[arg(long, short = 'y')]
    pub year: Option<i32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Timezone for date grouping (e.g. "America/New_York", "Asia/Tokyo", "UTC")
    /// If not specified, uses the system's local timezone
    #[arg(long, short = 'z')]
    pub timezone: Option<String>,

    /// Use UTC for date grouping (overrides --timezone)
    #[arg(long)]
    pub utc: bool,

    /// Show full model names instead of shortened versions
    #[arg(long)]
    pub full_model_names: bool,

    /// Show informational output (default is quiet mode with only warnings and errors)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

/// Reject obviously nonsensical year values before resolving a period
pub fn validate_year(year: Option<i32>) -> Result<()> {
    if let Some(year) = year {
        if !(2000..=9999).contains(&year) {
            return Err(WrappedError::InvalidArgument(format!(
                "year must be between 2000 and 9999, got {year}"
            )));
        }
    }
    Ok(())
}
