//! Stream events delivered to a draft session.

use std::fmt::Display;
use std::pin::Pin;

use bytes::Bytes;
use futures::future::ready;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};

use studio_llm::CompletionStream;

use crate::decode::Utf8Decoder;

/// One step of a generation stream.
///
/// Failures travel next to text, never inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum StreamEvent {
    /// More text, in order.
    Chunk(String),
    /// The stream closed cleanly.
    Done,
    /// The stream broke; the text so far is incomplete.
    Failed(String),
}

impl StreamEvent {
    /// Whether no further events follow.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Chunk(_))
    }
}

/// Events for one generation, ending with `Done` or `Failed`.
pub type EventStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

struct Decoding {
    bytes: BoxStream<'static, Result<Bytes, String>>,
    decoder: Utf8Decoder,
    finished: bool,
}

/// Decode a raw body stream into events.
///
/// Text is decoded incrementally. A transport error yields `Failed`; a clean
/// end yields `Done`, or `Failed` if it cut a character in half.
pub fn events_from_bytes<S, E>(body: S) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + 'static,
{
    let state = Decoding {
        bytes: body.map(|r| r.map_err(|e| e.to_string())).boxed(),
        decoder: Utf8Decoder::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }
        loop {
            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let text = st.decoder.decode(&chunk);
                    if !text.is_empty() {
                        return Some((StreamEvent::Chunk(text), st));
                    }
                }
                Some(Err(reason)) => {
                    tracing::warn!(%reason, "Generation stream broke");
                    st.finished = true;
                    return Some((StreamEvent::Failed(reason), st));
                }
                None => {
                    st.finished = true;
                    let event = match st.decoder.finish() {
                        Ok(()) => StreamEvent::Done,
                        Err(e) => StreamEvent::Failed(e.to_string()),
                    };
                    return Some((event, st));
                }
            }
        }
    }))
}

/// Adapt an in-process completion stream into events.
pub fn events_from_completion(stream: CompletionStream) -> EventStream {
    let events = stream
        .map(|item| match item {
            Ok(text) => StreamEvent::Chunk(text),
            Err(e) => StreamEvent::Failed(e.to_string()),
        })
        .chain(stream::once(async { StreamEvent::Done }));
    Box::pin(events.scan(false, |ended, event| {
        if *ended {
            return ready(None);
        }
        *ended = event.is_terminal();
        ready(Some(event))
    }))
}
