//! LLM provider abstraction.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use studio_core::Result;

/// Text chunks from a model, in arrival order.
///
/// An `Err` item ends the stream; nothing follows it.
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Abstraction over text generation backends (Claude, Gemini, mocks).
///
/// Generation code holds an `Arc<dyn LlmProvider>` and never needs to know
/// which backend is behind it.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short backend name for logs, e.g. `"claude"`.
    fn name(&self) -> &str;

    /// Open a streamed completion.
    ///
    /// Implementations may return before any network traffic happens; a
    /// failure to connect can then surface as the stream's first item. Use
    /// [`crate::stream::prime`] to force it out.
    async fn complete_streaming(&self, request: CompletionRequest) -> Result<CompletionStream>;

    /// Complete a prompt and wait for the whole response.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut stream = self.complete_streaming(request).await?;
        let mut content = String::new();
        let mut chunks = 0;
        while let Some(chunk) = stream.next().await {
            content.push_str(&chunk?);
            chunks += 1;
        }
        Ok(CompletionResponse { content, chunks })
    }
}

/// A request to complete a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// System prompt (context/instructions)
    pub system_prompt: Option<String>,

    /// Conversation messages
    pub messages: Vec<Message>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Creates a new completion request with default settings.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            system_prompt: None,
            messages,
            max_tokens: 4096,
            temperature: None,
        }
    }

    /// A request with a single user message.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self::new(vec![Message::user(text)])
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the maximum tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Text of the first user message, if any.
    pub fn user_text(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: Role,

    /// Message content
    pub content: String,
}

impl Message {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant message
    Assistant,
}

/// A fully collected completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated content
    pub content: String,

    /// Number of chunks the backend streamed
    pub chunks: usize,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let user_msg = Message::user("Hello");
        assert_eq!(user_msg.role, Role::User);
        assert_eq!(user_msg.content, "Hello");

        let asst_msg = Message::assistant("Hi there");
        assert_eq!(asst_msg.role, Role::Assistant);
        assert_eq!(asst_msg.content, "Hi there");
    }

    #[test]
    fn test_completion_request_builder() {
        let request = CompletionRequest::prompt("Write a post")
            .with_system_prompt("You are a copywriter")
            .with_max_tokens(2048)
            .with_temperature(0.7);

        assert_eq!(request.system_prompt.as_deref(), Some("You are a copywriter"));
        assert_eq!(request.max_tokens, 2048);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.user_text(), Some("Write a post"));
    }

    #[test]
    fn test_user_text_skips_assistant() {
        let request = CompletionRequest::new(vec![
            Message::assistant("earlier"),
            Message::user("now"),
        ]);
        assert_eq!(request.user_text(), Some("now"));
        assert_eq!(CompletionRequest::new(Vec::new()).user_text(), None);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("test content");
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"test content"}"#);
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, deserialized);
    }
}
