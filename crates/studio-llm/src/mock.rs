//! Mock LLM provider for testing.

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::sync::Mutex;

use studio_core::{Error, Result};

use crate::provider::{CompletionRequest, CompletionStream, LlmProvider};

/// How a scripted stream ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ending {
    /// The stream closes normally.
    Complete,
    /// The stream yields an upstream error, optionally with a status.
    Fail {
        /// HTTP status to report.
        status: Option<u16>,
        /// Error message.
        message: String,
    },
    /// The stream never ends.
    Hang,
}

/// One scripted completion: chunks followed by an ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockScript {
    /// Chunks yielded in order.
    pub chunks: Vec<String>,
    /// What happens after the last chunk.
    pub ending: Ending,
}

impl MockScript {
    /// A stream that yields `chunks` and closes.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chunks: chunks.into_iter().map(Into::into).collect(),
            ending: Ending::Complete,
        }
    }

    /// A stream that fails before producing anything.
    pub fn fail(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            chunks: Vec::new(),
            ending: Ending::Fail {
                status,
                message: message.into(),
            },
        }
    }

    /// Replace the ending with a failure after the chunks.
    pub fn then_fail(mut self, message: impl Into<String>) -> Self {
        self.ending = Ending::Fail {
            status: None,
            message: message.into(),
        };
        self
    }

    /// Replace the ending with a stream that stays open forever.
    pub fn then_hang(mut self) -> Self {
        self.ending = Ending::Hang;
        self
    }

    fn into_stream(self) -> CompletionStream {
        let chunks = stream::iter(self.chunks.into_iter().map(Ok::<String, Error>));
        match self.ending {
            Ending::Complete => Box::pin(chunks),
            Ending::Fail { status, message } => {
                let error = match status {
                    Some(code) => Error::upstream_status(code, message),
                    None => Error::upstream(message),
                };
                Box::pin(chunks.chain(stream::once(async move { Err(error) })))
            }
            Ending::Hang => Box::pin(chunks.chain(stream::pending())),
        }
    }
}

/// Mock LLM provider that plays back scripted streams.
///
/// Scripts are used in order; after the last one the provider cycles back
/// to the first. Every request is recorded.
#[derive(Clone)]
pub struct MockLlmProvider {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    scripts: Vec<MockScript>,
    index: usize,
    requests: Vec<CompletionRequest>,
}

impl MockLlmProvider {
    /// Creates a new mock provider with scripted streams.
    ///
    /// # Examples
    ///
    /// ```
    /// use studio_llm::{MockLlmProvider, MockScript};
    ///
    /// let provider = MockLlmProvider::new(vec![
    ///     MockScript::chunks(["---\n", "title: 'X'\n", "---\n"]),
    ///     MockScript::fail(Some(503), "overloaded"),
    /// ]);
    /// ```
    pub fn new(scripts: Vec<MockScript>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                scripts,
                index: 0,
                requests: Vec::new(),
            })),
        }
    }

    /// Creates a mock provider that always streams the same chunks.
    pub fn with_chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(vec![MockScript::chunks(chunks)])
    }

    /// Creates a mock provider with a single one-chunk response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::with_chunks([response.into()])
    }

    /// Number of streams opened so far.
    pub async fn calls(&self) -> usize {
        self.state.lock().await.requests.len()
    }

    /// Every request received, in order.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.state.lock().await.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete_streaming(&self, request: CompletionRequest) -> Result<CompletionStream> {
        let mut state = self.state.lock().await;
        state.requests.push(request);

        if state.scripts.is_empty() {
            return Ok(Box::pin(stream::empty::<Result<String>>()));
        }
        let script = state.scripts[state.index].clone();
        state.index = (state.index + 1) % state.scripts.len();
        Ok(script.into_stream())
    }
}
