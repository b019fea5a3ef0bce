//! Session reconciliation
//!
//! Gemini CLI rewrites a session file on every turn and starts a fresh file
//! after a context compression, so one logical session is usually present as
//! several overlapping snapshots. This module folds all snapshots of a
//! session id into one [`CanonicalSession`] with each message id appearing
//! exactly once.
//!
//! The merge accumulates across every provided snapshot rather than trusting
//! the newest one: messages that vanished from the live log at a compression
//! boundary keep their ids from earlier snapshots and must still be counted.

use crate::types::{
    CanonicalSession, ISOTimestamp, Message, MessageId, ProjectHash, RawSessionSnapshot, SessionId,
};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Accumulator for one session id
struct SessionDraft {
    project_hash: ProjectHash,
    start_time: ISOTimestamp,
    last_updated: ISOTimestamp,
    /// Messages in encounter order; the stable sort at the end keeps this
    /// order for equal timestamps
    messages: Vec<Message>,
    index: HashMap<MessageId, usize>,
}

impl SessionDraft {
    fn new(snapshot: &RawSessionSnapshot) -> Self {
        Self {
            project_hash: snapshot.project_hash.clone(),
            start_time: snapshot.start_time,
            last_updated: snapshot.last_updated,
            messages: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn absorb(&mut self, snapshot: RawSessionSnapshot) {
        self.start_time = self.start_time.min(snapshot.start_time);
        self.last_updated = self.last_updated.max(snapshot.last_updated);

        for message in snapshot.messages {
            match self.index.get(&message.id) {
                Some(&slot) => {
                    // The copy carrying usage metadata wins regardless of
                    // snapshot order; otherwise the first-seen copy stays
                    let existing = &self.messages[slot];
                    if message.has_usage_metadata() && !existing.has_usage_metadata() {
                        self.messages[slot] = message;
                    }
                }
                None => {
                    self.index.insert(message.id.clone(), self.messages.len());
                    self.messages.push(message);
                }
            }
        }
    }

    fn finish(self, session_id: SessionId) -> CanonicalSession {
        let mut messages = self.messages;
        // Stable: encounter order breaks timestamp ties
        messages.sort_by_key(|m| m.timestamp);

        CanonicalSession {
            session_id,
            project_hash: self.project_hash,
            start_time: self.start_time,
            last_updated: self.last_updated,
            messages,
        }
    }
}

/// Merge raw snapshots into one canonical session per session id
///
/// The merge is commutative and idempotent: any snapshot order yields the
/// same canonical sessions, and re-merging a subset of inputs changes
/// nothing.
pub fn reconcile(snapshots: impl IntoIterator<Item = RawSessionSnapshot>) -> Vec<CanonicalSession> {
    let mut drafts: BTreeMap<SessionId, SessionDraft> = BTreeMap::new();
    let mut snapshot_count = 0usize;

    for snapshot in snapshots {
        snapshot_count += 1;
        drafts
            .entry(snapshot.session_id.clone())
            .or_insert_with(|| SessionDraft::new(&snapshot))
            .absorb(snapshot);
    }

    debug!(
        "Reconciled {snapshot_count} snapshots into {} sessions",
        drafts.len()
    );

    drafts
        .into_iter()
        .map(|(session_id, draft)| draft.finish(session_id))
        .collect()
}
