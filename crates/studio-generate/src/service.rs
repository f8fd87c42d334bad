//! The generation service: brief in, relayed text stream out.

use std::sync::Arc;

use studio_core::Result;
use studio_llm::stream::{prime, relay};
use studio_llm::{CompletionRequest, CompletionStream, LlmProvider};

use crate::brief::{BriefRequest, ContentBrief};
use crate::prompt::{build_prompt, Clock, SystemClock};

/// Default output budget for a draft.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Turns briefs into streamed drafts.
///
/// Output is relayed exactly as the model produces it; nothing is buffered,
/// reordered or validated.
#[derive(Clone)]
pub struct GenerationService {
    provider: Arc<dyn LlmProvider>,
    clock: Arc<dyn Clock>,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl GenerationService {
    /// A service using the system clock.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }

    /// Replace the clock used for the prompt date.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the output token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Name of the backing provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// The completion request a brief turns into.
    pub fn request_for(&self, brief: &ContentBrief) -> CompletionRequest {
        let mut request = CompletionRequest::prompt(build_prompt(brief, self.clock.today()))
            .with_max_tokens(self.max_tokens);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        request
    }

    /// Start generating a draft.
    ///
    /// Returns once the model has produced its first chunk. A failure before
    /// that is returned as [`studio_core::Error::Upstream`] and no stream is
    /// handed out. A failure afterwards ends the returned stream with
    /// [`studio_core::Error::StreamInterrupted`].
    pub async fn generate(&self, brief: &ContentBrief) -> Result<CompletionStream> {
        tracing::info!(
            provider = self.provider.name(),
            topic = brief.topic(),
            category = %brief.category(),
            tone = %brief.tone(),
            "Starting generation"
        );

        let stream = self
            .provider
            .complete_streaming(self.request_for(brief))
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Upstream unavailable"))?;
        let primed = prime(stream)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Upstream failed before output"))?;

        tracing::debug!("Upstream produced first chunk, relaying");
        Ok(relay(primed))
    }

    /// Validate a wire request and start generating.
    ///
    /// Validation happens before the provider is touched.
    pub async fn generate_request(&self, request: BriefRequest) -> Result<CompletionStream> {
        let brief = ContentBrief::try_from(request)?;
        self.generate(&brief).await
    }
}
