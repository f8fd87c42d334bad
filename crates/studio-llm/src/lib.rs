//! Studio LLM — text generation backends.
//!
//! Every backend implements [`LlmProvider`] and streams its output as
//! [`CompletionStream`] chunks. [`stream::prime`] and [`stream::relay`]
//! separate failures that happen before any text from failures that cut a
//! stream short.

mod claude;
mod factory;
mod gemini;
mod mock;
mod provider;
mod retry;
mod sse;
pub mod stream;

pub use claude::ClaudeProvider;
pub use factory::{ProviderKind, ProviderSettings, SAMPLE_DRAFT, build_provider};
pub use gemini::GeminiProvider;
pub use mock::{Ending, MockLlmProvider, MockScript};
pub use provider::{CompletionRequest, CompletionResponse, CompletionStream, LlmProvider, Message, Role};
pub use retry::RetryWrapper;
