//! Server-sent event transport shared by the HTTP providers.

use futures::future::ready;
use futures::StreamExt;
use reqwest_eventsource::{Event, EventSource};

use studio_core::{Error, Result};

use crate::provider::CompletionStream;

/// Open an event source for a prepared request, with reconnects disabled.
///
/// A reconnect would replay the completion from the start, so a dropped
/// connection must end the stream instead.
pub(crate) fn open(request: reqwest::RequestBuilder) -> Result<EventSource> {
    let mut source = EventSource::new(request)
        .map_err(|e| Error::upstream_with_source("Failed to build event source", e))?;
    source.set_retry_policy(Box::new(reqwest_eventsource::retry::Never));
    Ok(source)
}

/// Turn an event source into a text stream.
///
/// `extract` parses one event payload and returns the text it carries, if
/// any. Events without text are skipped.
pub(crate) fn text_stream<F>(provider: &'static str, source: EventSource, extract: F) -> CompletionStream
where
    F: Fn(&str) -> Result<Option<String>> + Send + Sync + 'static,
{
    let stream = source
        .take_while(|event| {
            ready(!matches!(
                event,
                Err(reqwest_eventsource::Error::StreamEnded)
            ))
        })
        .then(move |event| {
            let extracted: std::result::Result<Option<String>, SourceError> = match event {
                Ok(Event::Open) => {
                    tracing::debug!(provider, "Upstream stream opened");
                    Ok(None)
                }
                Ok(Event::Message(message)) if message.data == "[DONE]" => Ok(None),
                Ok(Event::Message(message)) => extract(&message.data).map_err(SourceError::from),
                Err(error) => Err(SourceError::from(error)),
            };
            async move {
                match extracted {
                    Ok(text) => text.map(Ok),
                    Err(error) => Some(Err(map_error(provider, error).await)),
                }
            }
        })
        .filter_map(ready);
    Box::pin(stream)
}

/// Errors raised while reading events. Parsing errors from `extract` are
/// already Studio errors and pass through unchanged.
enum SourceError {
    Transport(reqwest_eventsource::Error),
    Studio(Error),
}

impl From<reqwest_eventsource::Error> for SourceError {
    fn from(error: reqwest_eventsource::Error) -> Self {
        Self::Transport(error)
    }
}

impl From<Error> for SourceError {
    fn from(error: Error) -> Self {
        Self::Studio(error)
    }
}

async fn map_error(provider: &'static str, error: SourceError) -> Error {
    match error {
        SourceError::Studio(error) => error,
        SourceError::Transport(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(provider, status = status.as_u16(), "Upstream rejected request");
            Error::upstream_status(status.as_u16(), format!("{provider} API error {status}: {body}"))
        }
        SourceError::Transport(error) => {
            tracing::warn!(provider, error = %error, "Upstream stream failed");
            Error::upstream_with_source(format!("{provider} stream failed"), error)
        }
    }
}
