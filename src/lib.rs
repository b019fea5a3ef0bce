//! gemini-wrapped - Generate your Gemini CLI year-in-review stats
//!
//! This library reconstructs a user's activity history from the overlapping
//! session snapshots Gemini CLI leaves under `~/.gemini/tmp`, then derives
//! the usage analytics behind the wrapped card:
//! - Merge redundant snapshots into canonical sessions with message-level
//!   deduplication
//! - Count messages, sessions, projects, and tool calls
//! - Account tokens and cost with tiered Gemini pricing
//! - Build the daily activity calendar, weekday histogram, and streaks
//! - Rank top models and inferred programming languages
//!
//! # Examples
//!
//! ```no_run
//! use gemini_wrapped::{
//!     aggregation::Aggregator,
//!     collector::SnapshotCollector,
//!     period::Period,
//!     pricing::CostCalculator,
//!     reconciler::reconcile,
//!     timezone::TimezoneConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> gemini_wrapped::Result<()> {
//!     let timezone = TimezoneConfig::default();
//!     let period = Period::resolve(None, &timezone);
//!
//!     let collector = SnapshotCollector::new()?;
//!     let outcome = collector.collect_in_period(&period, &timezone).await;
//!
//!     let sessions = reconcile(outcome.snapshots);
//!     let aggregator = Aggregator::new(CostCalculator::new(), timezone);
//!     let stats = aggregator.aggregate(&sessions, &period, outcome.first_session_start);
//!
//!     println!("{} sessions", stats.total_sessions);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod collector;
pub mod error;
pub mod model_formatter;
pub mod output;
pub mod period;
pub mod pricing;
pub mod reconciler;
pub mod timezone;
pub mod types;

// Re-export commonly used types
pub use error::{Result, WrappedError};
pub use types::{
    CanonicalSession, DailyDate, ISOTimestamp, Message, MessageId, MessageRole, ModelName,
    ProjectHash, RawSessionSnapshot, SessionId, TokenUsage, ToolCall,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
