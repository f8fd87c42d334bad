//! Retry wrapper for LLM providers.
//!
//! Only opening a stream is retried. The wrapped stream is primed inside the
//! retry loop, so a retry can only happen before the first chunk and never
//! splices two partial outputs together.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;

use studio_core::{Error, Result};

use crate::provider::{CompletionRequest, CompletionStream, LlmProvider};
use crate::stream::prime;

/// Wraps an LLM provider with retry logic.
pub struct RetryWrapper {
    inner: Arc<dyn LlmProvider>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryWrapper {
    /// Creates a new retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max attempts: 3
    /// - Initial delay: 1 second
    /// - Max delay: 10 seconds
    /// - Multiplier: 2.0 (exponential backoff)
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner: provider,
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Sets the maximum number of attempts.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Determines if an error should be retried.
    fn should_retry(error: &Error) -> bool {
        error.is_retryable()
    }
}

#[async_trait]
impl LlmProvider for RetryWrapper {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete_streaming(&self, request: CompletionRequest) -> Result<CompletionStream> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize);

        let provider = self.inner.clone();
        let name = self.inner.name().to_string();

        (|| async {
            let stream = provider.complete_streaming(request.clone()).await?;
            prime(stream).await
        })
        .retry(backoff)
        .when(Self::should_retry)
        .notify(|err: &Error, delay: Duration| {
            tracing::warn!(provider = %name, error = %err, ?delay, "Retrying upstream stream");
        })
        .await
    }
}
