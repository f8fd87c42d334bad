//! Helpers for handling completion streams.
//!
//! A completion can fail in two distinguishable ways. Before any text has
//! arrived the failure is an [`Error::Upstream`] and nothing has been
//! committed. After text has arrived it is an [`Error::StreamInterrupted`],
//! and whatever was already relayed stays relayed.

use futures::future::ready;
use futures::stream::{self, StreamExt};

use studio_core::{Error, Result};

use crate::provider::CompletionStream;

/// Wait for the first non-empty chunk of a stream.
///
/// A failure before that chunk is returned as an error, so callers can
/// reject a request without having started a response. On success the
/// chunk is put back in front of the remaining stream. A stream that ends
/// without text primes to an empty stream.
pub async fn prime(mut stream: CompletionStream) -> Result<CompletionStream> {
    loop {
        match stream.next().await {
            Some(Ok(chunk)) if chunk.is_empty() => continue,
            Some(Ok(chunk)) => {
                let head = stream::once(ready(Ok(chunk)));
                return Ok(Box::pin(head.chain(stream)));
            }
            Some(Err(e @ Error::Upstream { .. })) => return Err(e),
            Some(Err(e)) => return Err(Error::upstream(e.to_string())),
            None => return Ok(Box::pin(stream::empty::<Result<String>>())),
        }
    }
}

/// Relay a primed stream: empty chunks are dropped, any error becomes
/// [`Error::StreamInterrupted`], and nothing is yielded after an error.
pub fn relay(stream: CompletionStream) -> CompletionStream {
    let relayed = stream
        .filter(|item| ready(!matches!(item, Ok(chunk) if chunk.is_empty())))
        .map(|item| {
            item.map_err(|e| match e {
                Error::StreamInterrupted(_) => e,
                other => Error::stream_interrupted(other.to_string()),
            })
        })
        .scan(false, |failed, item| {
            if *failed {
                return ready(None);
            }
            *failed = item.is_err();
            ready(Some(item))
        });
    Box::pin(relayed)
}

/// A stream over fixed chunks.
pub fn from_chunks<I, S>(chunks: I) -> CompletionStream
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let items: Vec<Result<String>> = chunks.into_iter().map(|c| Ok(c.into())).collect();
    Box::pin(stream::iter(items))
}
