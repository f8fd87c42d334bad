//! Copy and download actions on a draft.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use studio_core::{Error, Result};

use crate::session::SharedSession;

/// How long the "copied" confirmation stays visible.
pub const COPY_FEEDBACK_WINDOW: Duration = Duration::from_secs(2);

/// Somewhere text can be copied to.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Replace the clipboard contents.
    async fn write_text(&self, text: &str) -> Result<()>;
}

/// The desktop clipboard.
///
/// Each copy opens a fresh `arboard` handle on a blocking thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    /// A handle on the desktop clipboard.
    pub fn new() -> Self {
        Self
    }
}

fn clipboard_error(error: arboard::Error) -> Error {
    Error::clipboard(error.to_string())
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || {
            arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text))
        })
        .await
        .map_err(|e| Error::clipboard(format!("clipboard task failed: {e}")))?
        .map_err(clipboard_error)
    }
}

/// In-memory clipboard for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    /// An empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last copied text.
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().await = Some(text.to_string());
        Ok(())
    }
}

/// Tracks the transient "copied" confirmation.
#[derive(Debug, Clone, Copy)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
    window: Duration,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self {
            copied_at: None,
            window: COPY_FEEDBACK_WINDOW,
        }
    }
}

impl CopyFeedback {
    /// Record a successful copy at `now`.
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    /// Whether the confirmation is showing at `now`.
    pub fn is_showing_at(&self, now: Instant) -> bool {
        self.copied_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.window)
    }

    /// Whether the confirmation is showing right now.
    pub fn is_showing(&self) -> bool {
        self.is_showing_at(Instant::now())
    }
}

/// Copy the raw draft verbatim.
///
/// The session is only read; a failed copy leaves it and the feedback as
/// they were.
pub async fn copy_draft(
    session: &SharedSession,
    clipboard: &dyn Clipboard,
    feedback: &mut CopyFeedback,
) -> Result<()> {
    let raw = session.lock().await.raw().to_string();
    match clipboard.write_text(&raw).await {
        Ok(()) => {
            feedback.mark(Instant::now());
            tracing::info!(bytes = raw.len(), "Copied draft to clipboard");
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "Copy failed");
            Err(e)
        }
    }
}

/// Write the draft into `dir` as `<slug>.mdx`.
pub async fn download_draft(session: &SharedSession, dir: &Path) -> Result<PathBuf> {
    let export = session.lock().await.export();
    export.write_to(dir).await.inspect_err(|e| {
        tracing::warn!(error = %e, dir = %dir.display(), "Download failed");
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::events::StreamEvent;
    use crate::session::DraftSession;
    use tempfile::TempDir;

    struct BrokenClipboard;

    #[async_trait]
    impl Clipboard for BrokenClipboard {
        async fn write_text(&self, _text: &str) -> Result<()> {
            Err(Error::clipboard("no display"))
        }
    }

    async fn session_with(raw: &str) -> SharedSession {
        let session = DraftSession::shared();
        {
            let mut guard = session.lock().await;
            let id = guard.begin();
            guard.apply(id, StreamEvent::Chunk(raw.to_string()));
            guard.apply(id, StreamEvent::Done);
        }
        session
    }

    #[test]
    fn test_feedback_window() {
        let start = Instant::now();
        let mut feedback = CopyFeedback::default();
        assert!(!feedback.is_showing_at(start));

        feedback.mark(start);
        assert!(feedback.is_showing_at(start));
        assert!(feedback.is_showing_at(start + Duration::from_millis(1999)));
        assert!(!feedback.is_showing_at(start + Duration::from_secs(2)));
    }

    #[tokio::test]
    async fn test_copy_is_verbatim() {
        let raw = "---\ntitle: 'X'\n---\r\n## A\n";
        let session = session_with(raw).await;
        let clipboard = MemoryClipboard::new();
        let mut feedback = CopyFeedback::default();

        copy_draft(&session, &clipboard, &mut feedback).await.unwrap();
        assert_eq!(clipboard.contents().await.as_deref(), Some(raw));
        assert!(feedback.is_showing());
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_state() {
        let session = session_with("draft").await;
        let mut feedback = CopyFeedback::default();

        let err = copy_draft(&session, &BrokenClipboard, &mut feedback)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
        assert!(!feedback.is_showing());
        assert_eq!(session.lock().await.raw(), "draft");
    }

    #[test]
    fn test_clipboard_errors_map_to_clipboard_variant() {
        let err = clipboard_error(arboard::Error::ClipboardNotSupported);
        assert!(matches!(err, Error::Clipboard(_)));
        assert!(err.to_string().starts_with("Clipboard error:"));
    }

    #[tokio::test]
    async fn test_download_writes_slugged_file() {
        let temp = TempDir::new().unwrap();
        let raw = "---\ntitle: 'Growth Loops 101'\n---\nBody";
        let session = session_with(raw).await;

        let path = download_draft(&session, temp.path()).await.unwrap();
        assert_eq!(path, temp.path().join("growth-loops-101.mdx"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_download_without_title() {
        let temp = TempDir::new().unwrap();
        let session = session_with("just text").await;
        let path = download_draft(&session, temp.path()).await.unwrap();
        assert!(path.ends_with("generated-post.mdx"));
    }
}
