//! Draft sessions: the single owner of a growing raw document.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use studio_content::{Document, ExportFile, render};

use crate::events::StreamEvent;

/// Identifies one generation within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenerationId(u64);

impl fmt::Display for GenerationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Nothing requested yet, or cleared.
    #[default]
    Idle,
    /// Text is arriving.
    Generating,
    /// The stream closed cleanly.
    Complete,
    /// The stream broke. The text kept so far is incomplete.
    Failed {
        /// What went wrong.
        reason: String,
    },
}

impl SessionStatus {
    /// Whether text may still arrive.
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// Whether the draft must be presented as unfinished.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Generating | Self::Failed { .. })
    }
}

/// Result of applying an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The event changed the session.
    Applied,
    /// The event belongs to a generation that is no longer current.
    Stale,
}

/// Holds the raw document of one drafting session.
#[derive(Debug, Default)]
pub struct DraftSession {
    raw: String,
    status: SessionStatus,
    current: Option<GenerationId>,
    last_id: u64,
}

/// A session shared between the orchestrator and its consumer task.
pub type SharedSession = Arc<Mutex<DraftSession>>;

impl DraftSession {
    /// An idle, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a new session for sharing.
    pub fn shared() -> SharedSession {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Start a new generation.
    ///
    /// Empties the buffer and makes every earlier generation stale, in one
    /// step.
    pub fn begin(&mut self) -> GenerationId {
        self.last_id += 1;
        let id = GenerationId(self.last_id);
        self.raw.clear();
        self.status = SessionStatus::Generating;
        self.current = Some(id);
        tracing::debug!(%id, "Generation started");
        id
    }

    /// Apply one event of generation `id`.
    pub fn apply(&mut self, id: GenerationId, event: StreamEvent) -> Applied {
        if self.current != Some(id) {
            tracing::trace!(%id, "Dropping stale event");
            return Applied::Stale;
        }
        match event {
            StreamEvent::Chunk(text) => self.raw.push_str(&text),
            StreamEvent::Done => {
                self.status = SessionStatus::Complete;
                self.current = None;
                tracing::debug!(%id, bytes = self.raw.len(), "Generation complete");
            }
            StreamEvent::Failed(reason) => {
                tracing::warn!(%id, %reason, bytes = self.raw.len(), "Generation failed");
                self.status = SessionStatus::Failed { reason };
                self.current = None;
            }
        }
        Applied::Applied
    }

    /// Discard the draft and invalidate any generation in flight.
    pub fn clear(&mut self) {
        self.raw.clear();
        self.status = SessionStatus::Idle;
        self.current = None;
    }

    /// The raw document.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Current status.
    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// The generation accepting events, if any.
    pub fn current(&self) -> Option<GenerationId> {
        self.current
    }

    /// Render the current snapshot.
    pub fn document(&self) -> Document {
        render(&self.raw)
    }

    /// The draft as an export file.
    pub fn export(&self) -> ExportFile {
        ExportFile::from_raw(&self.raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn chunk(s: &str) -> StreamEvent {
        StreamEvent::Chunk(s.to_string())
    }

    #[test]
    fn test_chunks_append_in_order() {
        let mut session = DraftSession::new();
        let id = session.begin();
        for c in ["---\ntitle: 'X'\n---\n", "## Section\n", "Some para."] {
            assert_eq!(session.apply(id, chunk(c)), Applied::Applied);
        }
        session.apply(id, StreamEvent::Done);

        assert_eq!(session.raw(), "---\ntitle: 'X'\n---\n## Section\nSome para.");
        assert_eq!(session.status(), &SessionStatus::Complete);
        let doc = session.document();
        assert_eq!(doc.title(), Some("X"));
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_begin_clears_previous_text() {
        let mut session = DraftSession::new();
        let first = session.begin();
        session.apply(first, chunk("old draft"));
        let second = session.begin();
        assert_ne!(first, second);
        assert_eq!(session.raw(), "");

        assert_eq!(session.apply(first, chunk(" late")), Applied::Stale);
        session.apply(second, chunk("new"));
        assert_eq!(session.raw(), "new");
    }

    #[test]
    fn test_failure_keeps_partial_text() {
        let mut session = DraftSession::new();
        let id = session.begin();
        session.apply(id, chunk("## Half"));
        session.apply(id, StreamEvent::Failed("connection reset".into()));

        assert_eq!(session.raw(), "## Half");
        assert!(session.status().is_incomplete());
        assert!(!session.status().is_generating());
        assert_eq!(
            session.status(),
            &SessionStatus::Failed {
                reason: "connection reset".into()
            }
        );
        // Nothing from the finished generation is accepted afterwards.
        assert_eq!(session.apply(id, chunk("more")), Applied::Stale);
    }

    #[test]
    fn test_clear_invalidates_in_flight() {
        let mut session = DraftSession::new();
        let id = session.begin();
        session.apply(id, chunk("text"));
        session.clear();
        assert_eq!(session.apply(id, chunk("late")), Applied::Stale);
        assert_eq!(session.raw(), "");
        assert_eq!(session.status(), &SessionStatus::Idle);
        assert_eq!(session.current(), None);
    }

    #[test]
    fn test_export_uses_title() {
        let mut session = DraftSession::new();
        let id = session.begin();
        session.apply(id, chunk("---\ntitle: 'Brand Story'\n---\nBody"));
        assert_eq!(session.export().filename, "brand-story.mdx");
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SessionStatus::Failed { reason: "x".into() }).unwrap();
        assert_eq!(json, r#"{"state":"failed","reason":"x"}"#);
        assert_eq!(GenerationId(3).to_string(), "gen-3");
    }
}
