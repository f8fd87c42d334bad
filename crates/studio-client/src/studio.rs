//! The drafting workflow: brief in, live preview out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use studio_core::Result;
use studio_generate::{BriefRequest, ContentBrief};

use crate::actions::{Clipboard, CopyFeedback, copy_draft, download_draft};
use crate::consumer::{ConsumeOutcome, DraftUpdate, consume};
use crate::events::StreamEvent;
use crate::session::{DraftSession, GenerationId, SharedSession};
use crate::source::DraftSource;

/// Drives one drafting session against a [`DraftSource`].
///
/// At most one generation runs at a time. Starting another aborts the
/// running one and empties the draft before any new text arrives.
pub struct Studio {
    source: Arc<dyn DraftSource>,
    session: SharedSession,
    task: Option<JoinHandle<ConsumeOutcome>>,
    updates: watch::Sender<DraftUpdate>,
    feedback: CopyFeedback,
}

impl Studio {
    /// A studio with an empty session.
    pub fn new(source: Arc<dyn DraftSource>) -> Self {
        let (updates, _) = watch::channel(DraftUpdate::default());
        Self {
            source,
            session: DraftSession::shared(),
            task: None,
            updates,
            feedback: CopyFeedback::default(),
        }
    }

    /// Observe renders as they happen.
    pub fn subscribe(&self) -> watch::Receiver<DraftUpdate> {
        self.updates.subscribe()
    }

    /// The underlying session.
    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Copy confirmation state.
    pub fn copy_feedback(&self) -> &CopyFeedback {
        &self.feedback
    }

    /// Start generating a draft for `request`.
    ///
    /// The brief is validated first; an invalid one leaves the session
    /// untouched and never reaches the source. If the source cannot be
    /// opened the session is marked failed and the error returned.
    pub async fn generate(&mut self, request: BriefRequest) -> Result<GenerationId> {
        let brief = ContentBrief::try_from(request)?;
        self.stop();

        let id = self.session.lock().await.begin();
        self.publish().await;

        let events = match self.source.open(&brief).await {
            Ok(events) => events,
            Err(e) => {
                self.session.lock().await.apply(id, StreamEvent::Failed(e.to_string()));
                self.publish().await;
                return Err(e);
            }
        };

        let session = self.session.clone();
        let updates = self.updates.clone();
        self.task = Some(tokio::spawn(async move {
            consume(&session, id, events, |update| {
                updates.send_replace(update);
            })
            .await
        }));
        tracing::info!(%id, topic = brief.topic(), "Generating draft");
        Ok(id)
    }

    /// Wait for the running generation, if any, to finish.
    pub async fn wait(&mut self) -> Option<ConsumeOutcome> {
        let handle = self.task.take()?;
        handle.await.ok()
    }

    /// Discard the draft and stop any generation.
    pub async fn clear(&mut self) {
        self.stop();
        self.session.lock().await.clear();
        self.publish().await;
    }

    /// Latest render of the session.
    pub async fn snapshot(&self) -> DraftUpdate {
        let session = self.session.lock().await;
        DraftUpdate {
            id: session.current(),
            document: session.document(),
            status: session.status().clone(),
            bytes: session.raw().len(),
        }
    }

    /// Copy the raw draft to `clipboard`.
    pub async fn copy(&mut self, clipboard: &dyn Clipboard) -> Result<()> {
        copy_draft(&self.session, clipboard, &mut self.feedback).await
    }

    /// Save the draft into `dir`.
    pub async fn download(&self, dir: &Path) -> Result<PathBuf> {
        download_draft(&self.session, dir).await
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    async fn publish(&self) {
        let session = self.session.lock().await;
        self.updates.send_replace(DraftUpdate {
            id: session.current(),
            document: session.document(),
            status: session.status().clone(),
            bytes: session.raw().len(),
        });
    }
}

impl Drop for Studio {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::actions::MemoryClipboard;
    use crate::session::SessionStatus;
    use crate::source::LocalSource;
    use studio_core::Error;
    use studio_generate::GenerationService;
    use studio_llm::{MockLlmProvider, MockScript};
    use tempfile::TempDir;

    fn studio(mock: &MockLlmProvider) -> Studio {
        let service = GenerationService::new(Arc::new(mock.clone()));
        Studio::new(Arc::new(LocalSource::new(service)))
    }

    fn request(topic: &str) -> BriefRequest {
        BriefRequest {
            topic: Some(topic.into()),
            category: Some("Sales".into()),
            tone: Some("Authoritative".into()),
            keywords: None,
        }
    }

    const DRAFT: [&str; 3] = ["---\ntitle: 'Closing Deals'\n---\n", "## Step one\n", "Call **today**."];

    #[tokio::test]
    async fn test_generate_streams_into_session() {
        let mock = MockLlmProvider::with_chunks(DRAFT);
        let mut studio = studio(&mock);
        let rx = studio.subscribe();

        studio.generate(request("closing deals")).await.unwrap();
        let outcome = studio.wait().await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::Finished(SessionStatus::Complete));
        assert_eq!(studio.session().lock().await.raw(), DRAFT.concat());
        let last = rx.borrow().clone();
        assert_eq!(last.status, SessionStatus::Complete);
        assert_eq!(last.document.title(), Some("Closing Deals"));
        assert_eq!(last.document.blocks.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_brief_never_calls_provider() {
        let mock = MockLlmProvider::with_chunks(DRAFT);
        let mut studio = studio(&mock);

        let err = studio.generate(request("   ")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let mut bad_tone = request("ok");
        bad_tone.tone = Some("Sarcastic".into());
        assert!(studio.generate(bad_tone).await.unwrap_err().is_input());

        assert_eq!(mock.calls().await, 0);
        assert_eq!(studio.snapshot().await.status, SessionStatus::Idle);
    }

    #[tokio::test]
    async fn test_regenerate_discards_previous_text() {
        let mock = MockLlmProvider::new(vec![
            MockScript::chunks(["OLD-1 ", "OLD-2 "]).then_hang(),
            MockScript::chunks(["fresh draft"]),
        ]);
        let mut studio = studio(&mock);
        let mut rx = studio.subscribe();

        studio.generate(request("first")).await.unwrap();
        rx.wait_for(|u| u.bytes >= "OLD-1 OLD-2 ".len()).await.unwrap();

        studio.generate(request("second")).await.unwrap();
        let outcome = studio.wait().await.unwrap();

        assert_eq!(outcome, ConsumeOutcome::Finished(SessionStatus::Complete));
        let raw = studio.session().lock().await.raw().to_string();
        assert_eq!(raw, "fresh draft");
        assert!(!raw.contains("OLD"));
        assert_eq!(mock.calls().await, 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_superseded_generation_never_overwrites_preview() {
        let mock = MockLlmProvider::new(vec![
            MockScript::chunks(vec!["OLD"; 100_000]).then_hang(),
            MockScript::fail(Some(503), "overloaded"),
        ]);
        let mut studio = studio(&mock);
        let mut rx = studio.subscribe();

        studio.generate(request("first")).await.unwrap();
        rx.wait_for(|u| u.bytes >= 30).await.unwrap();
        assert!(studio.generate(request("second")).await.is_err());

        for _ in 0..300 {
            let current = rx.borrow().clone();
            assert!(matches!(current.status, SessionStatus::Failed { .. }));
            assert_eq!(current.bytes, 0);
            tokio::task::yield_now().await;
        }
        assert_eq!(studio.session().lock().await.raw(), "");
    }

    #[tokio::test]
    async fn test_upstream_failure_before_output() {
        let mock = MockLlmProvider::new(vec![MockScript::fail(Some(503), "overloaded")]);
        let mut studio = studio(&mock);

        let err = studio.generate(request("topic")).await.unwrap_err();
        assert!(matches!(err, Error::Upstream { status: Some(503), .. }));

        let snapshot = studio.snapshot().await;
        assert!(matches!(snapshot.status, SessionStatus::Failed { .. }));
        assert_eq!(snapshot.bytes, 0);
    }

    #[tokio::test]
    async fn test_mid_stream_failure_keeps_partial_draft() {
        let mock = MockLlmProvider::new(vec![MockScript::chunks(["## Half"]).then_fail("reset")]);
        let mut studio = studio(&mock);

        studio.generate(request("topic")).await.unwrap();
        let outcome = studio.wait().await.unwrap();

        assert!(matches!(outcome, ConsumeOutcome::Finished(SessionStatus::Failed { .. })));
        let snapshot = studio.snapshot().await;
        assert!(snapshot.status.is_incomplete());
        assert_eq!(studio.session().lock().await.raw(), "## Half");
    }

    #[tokio::test]
    async fn test_clear_stops_generation() {
        let mock = MockLlmProvider::new(vec![MockScript::chunks(["partial"]).then_hang()]);
        let mut studio = studio(&mock);
        let mut rx = studio.subscribe();

        studio.generate(request("topic")).await.unwrap();
        rx.wait_for(|u| u.bytes > 0).await.unwrap();
        studio.clear().await;

        let snapshot = studio.snapshot().await;
        assert_eq!(snapshot.status, SessionStatus::Idle);
        assert_eq!(snapshot.bytes, 0);
        assert!(studio.wait().await.is_none());
    }

    #[tokio::test]
    async fn test_copy_and_download() {
        let mock = MockLlmProvider::with_chunks(DRAFT);
        let mut studio = studio(&mock);
        studio.generate(request("closing deals")).await.unwrap();
        studio.wait().await;

        let clipboard = MemoryClipboard::new();
        studio.copy(&clipboard).await.unwrap();
        assert_eq!(clipboard.contents().await.unwrap(), DRAFT.concat());
        assert!(studio.copy_feedback().is_showing());

        let dir = TempDir::new().unwrap();
        let path = studio.download(dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "closing-deals.mdx");
    }
}
