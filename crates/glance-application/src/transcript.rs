//! Visible transcript of a panel.
//!
//! The transcript is what the user sees; the [`ConversationSession`] is
//! what the model sees. They diverge on purpose: error messages and the
//! configuration notice appear only here, scratch turns appear in neither.
//!
//! [`ConversationSession`]: glance_core::session::ConversationSession

use chrono::{DateTime, Utc};
use glance_core::session::Role;
use serde::Serialize;

/// One rendered entry of the transcript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    /// Output of the renderer, safe to insert into the panel.
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl TranscriptEntry {
    pub fn new(role: Role, body: impl Into<String>) -> Self {
        Self {
            role,
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries appended after the first `seen` ones.
    pub fn since(&self, seen: usize) -> &[TranscriptEntry] {
        self.entries.get(seen..).unwrap_or_default()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.entries.iter().filter(|entry| entry.role == role).count()
    }
}
