//! Snapshot discovery and loading
//!
//! Gemini CLI writes one JSON file per session segment under
//! `~/.gemini/tmp/<project-hash>/chats/session-*.json`. This module finds
//! those files, parses them, and hands the raw snapshots to the reconciler.
//! Malformed files are skipped with a warning; the reconciliation and
//! aggregation core only ever sees well-formed records.

use crate::error::{Result, WrappedError};
use crate::period::Period;
use crate::timezone::TimezoneConfig;
use crate::types::{ISOTimestamp, RawSessionSnapshot};
use async_stream::stream;
use futures::stream::Stream;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Environment variable overriding the Gemini data directory
pub const GEMINI_DATA_PATH_ENV: &str = "GEMINI_DATA_PATH";

/// Everything a scan produces
#[derive(Debug)]
pub struct ScanOutcome {
    /// Snapshots whose session start falls inside the analysis window
    pub snapshots: Vec<RawSessionSnapshot>,
    /// Earliest session start across *all* snapshots, window-independent
    pub first_session_start: Option<ISOTimestamp>,
    /// Session files successfully parsed
    pub parsed_files: usize,
}

/// Discovers and parses Gemini CLI session snapshot files
pub struct SnapshotCollector {
    /// Root of the snapshot tree (the `tmp` directory)
    root: PathBuf,
}

impl SnapshotCollector {
    /// Create a collector for the default Gemini data directory
    ///
    /// Honors the `GEMINI_DATA_PATH` override; errors when no data
    /// directory exists so the CLI can tell "never used Gemini CLI" apart
    /// from "no activity in period".
    pub fn new() -> Result<Self> {
        let root = default_data_dir().ok_or(WrappedError::NoGeminiDirectory)?;
        if !root.is_dir() {
            return Err(WrappedError::NoGeminiDirectory);
        }
        Ok(Self { root })
    }

    /// Create a collector rooted at an explicit directory
    pub fn from_path(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether the default Gemini data directory exists at all
    pub fn data_exists() -> bool {
        default_data_dir().is_some_and(|dir| dir.is_dir())
    }

    /// Find all session snapshot files under the root
    ///
    /// Matches `<root>/**/chats/session-*.json`, sorted for deterministic
    /// processing order.
    pub fn find_session_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_session_file(path))
            .collect();
        files.sort();

        debug!("Found {} session files under {}", files.len(), self.root.display());
        files
    }

    /// Stream parsed snapshots from all discovered session files
    ///
    /// Unreadable or malformed files are logged and skipped, matching the
    /// upstream-validation contract of the reconciliation core.
    pub fn load_snapshots(&self) -> impl Stream<Item = RawSessionSnapshot> + '_ {
        let files = self.find_session_files();

        stream! {
            for path in files {
                let content = match tokio::fs::read_to_string(&path).await {
                    Ok(content) => content,
                    Err(e) => {
                        warn!("Skipping unreadable session file {}: {e}", path.display());
                        continue;
                    }
                };

                match serde_json::from_str::<RawSessionSnapshot>(&content) {
                    Ok(snapshot) => yield snapshot,
                    Err(e) => {
                        warn!("Skipping malformed session file {}: {e}", path.display());
                    }
                }
            }
        }
    }

    /// Scan all snapshots, keeping those inside the analysis window
    ///
    /// The earliest session start is tracked across every parsed snapshot,
    /// not just the in-window ones, so a short window's report can still
    /// state when the user first used Gemini CLI.
    pub async fn collect_in_period(
        &self,
        period: &Period,
        timezone: &TimezoneConfig,
    ) -> ScanOutcome {
        let mut snapshots = Vec::new();
        let mut first_session_start: Option<ISOTimestamp> = None;
        let mut parsed_files = 0usize;

        let stream = self.load_snapshots();
        tokio::pin!(stream);

        while let Some(snapshot) = stream.next().await {
            parsed_files += 1;

            first_session_start = Some(match first_session_start {
                Some(first) => first.min(snapshot.start_time),
                None => snapshot.start_time,
            });

            let start_date = timezone.date_of(snapshot.start_time.inner());
            if period.contains(start_date) {
                snapshots.push(snapshot);
            }
        }

        debug!(
            "Parsed {parsed_files} session files, {} in period {}",
            snapshots.len(),
            period.label
        );

        ScanOutcome {
            snapshots,
            first_session_start,
            parsed_files,
        }
    }
}

fn default_data_dir() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var(GEMINI_DATA_PATH_ENV) {
        return Some(PathBuf::from(custom));
    }
    dirs::home_dir().map(|home| home.join(".gemini").join("tmp"))
}

fn is_session_file(path: &Path) -> bool {
    let in_chats_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|name| name.to_str())
        .is_some_and(|name| name == "chats");

    let name_matches = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with("session-") && name.ends_with(".json"));

    in_chats_dir && name_matches
}
