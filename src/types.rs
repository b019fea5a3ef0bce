//! Core domain types for gemini-wrapped
//!
//! This module contains the fundamental types used throughout the library:
//! strongly-typed identifiers, timestamps, token usage blocks, and the raw
//! and canonical session records that the reconciler and aggregator operate
//! on. The on-disk schema mirrors the JSON written by Gemini CLI under
//! `~/.gemini/tmp/<project-hash>/chats/session-*.json`.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Strongly-typed model name wrapper
///
/// # Examples
/// ```
/// use gemini_wrapped::types::ModelName;
///
/// let model = ModelName::new("gemini-2.5-pro");
/// assert_eq!(model.as_str(), "gemini-2.5-pro");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelName(String);

impl ModelName {
    /// Create a new ModelName from any string-like type
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed session ID
///
/// Stable across all snapshots of the same logical session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    /// Create a new SessionId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque project hash as written by Gemini CLI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectHash(String);

impl ProjectHash {
    /// Create a new ProjectHash
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier, unique within a session's logical lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new MessageId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO timestamp wrapper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ISOTimestamp(DateTime<Utc>);

impl ISOTimestamp {
    /// Create a new ISOTimestamp
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner DateTime
    pub fn inner(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Calendar date of this instant in the given timezone
    pub fn to_daily_date(&self, tz: &Tz) -> DailyDate {
        DailyDate::new(self.0.with_timezone(tz).date_naive())
    }
}

impl AsRef<DateTime<Utc>> for ISOTimestamp {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

/// Daily date used as the activity-calendar key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DailyDate(NaiveDate);

impl DailyDate {
    /// Create a new DailyDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }

    /// Format with a chrono format string
    pub fn format(&self, fmt: &str) -> String {
        self.0.format(fmt).to_string()
    }
}

impl fmt::Display for DailyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Token usage block attached to an assistant message
///
/// `cached` is a subset of `input`, not additive; `total` is the precomputed
/// sum written by Gemini CLI and is carried through rather than re-derived.
///
/// # Examples
/// ```
/// use gemini_wrapped::types::TokenUsage;
///
/// let a = TokenUsage::new(100, 50, 20, 10);
/// let b = TokenUsage::new(10, 5, 0, 0);
/// assert_eq!((a + b).input, 110);
/// ```
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    /// Prompt tokens (includes cached tokens)
    #[serde(default)]
    pub input: u64,
    /// Response tokens
    #[serde(default)]
    pub output: u64,
    /// Cached prompt tokens
    #[serde(default)]
    pub cached: u64,
    /// Thinking tokens, billed at the output rate
    #[serde(default)]
    pub thoughts: u64,
    /// Precomputed total as written to the log
    #[serde(default)]
    pub total: u64,
}

impl TokenUsage {
    /// Create a new TokenUsage with `total` derived from the parts
    pub fn new(input: u64, output: u64, cached: u64, thoughts: u64) -> Self {
        Self {
            input,
            output,
            cached,
            thoughts,
            total: input + output + thoughts,
        }
    }
}

impl Add for TokenUsage {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            input: self.input + other.input,
            output: self.output + other.output,
            cached: self.cached + other.cached,
            thoughts: self.thoughts + other.thoughts,
            total: self.total + other.total,
        }
    }
}

impl AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.input += other.input;
        self.output += other.output;
        self.cached += other.cached;
        self.thoughts += other.thoughts;
        self.total += other.total;
    }
}

/// Role of a message within a session
///
/// Gemini CLI logs write `"user"` and `"gemini"`; anything else deserializes
/// to [`MessageRole::Unknown`] and is skipped by the aggregator rather than
/// rejected at parse time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Human prompt
    User,
    /// Model response
    #[serde(rename = "gemini")]
    Assistant,
    /// Unrecognized role
    #[default]
    Unknown,
}

impl<'de> Deserialize<'de> for MessageRole {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let role = String::deserialize(deserializer)?;
        Ok(match role.as_str() {
            "user" => Self::User,
            "gemini" | "assistant" => Self::Assistant,
            _ => Self::Unknown,
        })
    }
}

impl MessageRole {
    /// Whether this role counts toward message totals
    pub fn is_countable(&self) -> bool {
        matches!(self, Self::User | Self::Assistant)
    }
}

/// Argument keys probed, in order, for a file or directory path
const PATH_ARG_KEYS: [&str; 3] = ["file_path", "path", "dir_path"];

/// A tool invocation recorded on an assistant message
///
/// The argument bag is schemaless; only a bounded set of path-like keys is
/// ever inspected.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    /// Tool name, when recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Loosely-typed argument bag
    #[serde(default)]
    pub args: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    /// Extract a file/directory path argument, if the call has one
    pub fn path_argument(&self) -> Option<&str> {
        PATH_ARG_KEYS
            .iter()
            .find_map(|key| self.args.get(*key).and_then(|v| v.as_str()))
    }
}

/// A single message as recorded in a session snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Stable message identifier
    pub id: MessageId,
    /// When the message was produced; absent in malformed records
    #[serde(default)]
    pub timestamp: Option<ISOTimestamp>,
    /// Message role ("user" or "gemini" in the logs)
    #[serde(rename = "type", default)]
    pub role: MessageRole,
    /// Free-text content
    #[serde(default)]
    pub content: String,
    /// Model that produced the message (assistant messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelName>,
    /// Token usage, attached once the response completes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<TokenUsage>,
    /// Tool invocations made by this message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl Message {
    /// Whether this copy of the message carries usage metadata
    ///
    /// A session can be logged once before a response completes (no token
    /// block yet) and again afterward; the copy carrying metadata must win
    /// during reconciliation regardless of snapshot order.
    pub fn has_usage_metadata(&self) -> bool {
        self.tokens.is_some() || self.tool_calls.as_ref().is_some_and(|calls| !calls.is_empty())
    }
}

/// One on-disk record of a session at some point in time
///
/// Multiple snapshots may exist for the same session id: incremental writes,
/// or segments produced by a context-compression event that drops earlier
/// messages from the live log while their ids stay immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSessionSnapshot {
    /// Session identifier, stable across snapshots
    pub session_id: SessionId,
    /// Opaque project hash; identical across all snapshots of one session
    pub project_hash: ProjectHash,
    /// Session start as recorded in this snapshot
    pub start_time: ISOTimestamp,
    /// Last-updated timestamp of this snapshot
    pub last_updated: ISOTimestamp,
    /// Ordered message list as of this snapshot
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// The merge result for one session identifier
///
/// Earliest start and latest update across all contributing snapshots, and a
/// message list where every message id appears exactly once, ordered by
/// timestamp ascending.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalSession {
    /// Session identifier
    pub session_id: SessionId,
    /// Project hash shared by all contributing snapshots
    pub project_hash: ProjectHash,
    /// Earliest start across snapshots
    pub start_time: ISOTimestamp,
    /// Latest update across snapshots
    pub last_updated: ISOTimestamp,
    /// Deduplicated messages, timestamp ascending
    pub messages: Vec<Message>,
}
