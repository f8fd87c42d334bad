//! Driving an event stream into a session.

use futures::StreamExt;
use serde::Serialize;

use studio_content::Document;

use crate::events::{EventStream, StreamEvent};
use crate::session::{Applied, DraftSession, GenerationId, SessionStatus, SharedSession};

/// Snapshot handed to observers after each applied event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DraftUpdate {
    /// Generation the update belongs to; `None` before the first one.
    pub id: Option<GenerationId>,
    /// Rendered document.
    pub document: Document,
    /// Status after the event.
    pub status: SessionStatus,
    /// Size of the raw document in bytes.
    pub bytes: usize,
}

/// How a consume run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// The stream reached `Done` or `Failed`; carries the final status.
    Finished(SessionStatus),
    /// A newer generation took over; the rest of the stream was dropped.
    Superseded,
}

/// Feed `events` for generation `id` into `session`.
///
/// `on_update` runs after every applied event with a fresh render, while
/// the session is still locked, so it must not block. The run
/// stops at the first stale event. A stream that ends without a terminal
/// event is recorded as a failure.
pub async fn consume<F>(
    session: &SharedSession,
    id: GenerationId,
    mut events: EventStream,
    mut on_update: F,
) -> ConsumeOutcome
where
    F: FnMut(DraftUpdate) + Send,
{
    while let Some(event) = events.next().await {
        let terminal = event.is_terminal();
        // Held until the observer has this render; no newer generation can
        // begin in between.
        let mut guard = session.lock().await;
        if guard.apply(id, event) == Applied::Stale {
            return ConsumeOutcome::Superseded;
        }
        let update = snapshot(id, &guard);
        let status = update.status.clone();
        on_update(update);
        drop(guard);
        if terminal {
            return ConsumeOutcome::Finished(status);
        }
    }

    let mut guard = session.lock().await;
    match guard.apply(id, StreamEvent::Failed("stream ended without completing".into())) {
        Applied::Stale => ConsumeOutcome::Superseded,
        Applied::Applied => {
            let update = snapshot(id, &guard);
            let status = update.status.clone();
            on_update(update);
            ConsumeOutcome::Finished(status)
        }
    }
}

fn snapshot(id: GenerationId, session: &DraftSession) -> DraftUpdate {
    DraftUpdate {
        id: Some(id),
        document: session.document(),
        status: session.status().clone(),
        bytes: session.raw().len(),
    }
}
