//! Provider construction from settings.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use studio_core::{Error, Result};

use crate::claude::{self, ClaudeProvider};
use crate::gemini::{self, GeminiProvider};
use crate::mock::MockLlmProvider;
use crate::provider::LlmProvider;
use crate::retry::RetryWrapper;

/// Draft played back by the offline `mock` backend.
pub const SAMPLE_DRAFT: &str = "---
title: 'Five Follow-Up Emails That Close Deals'
date: 2025-01-01
excerpt: 'A practical sequence for turning warm leads into signed contracts.'
category: Sales
tags: [email, follow-up, pipeline]
author: 'BenEl Team'
readTime: '6 min read'
---

## Why follow-ups matter

Most deals are won in the **follow-up**, not the first touch.

> The fortune is in the follow-up.

## The sequence

1. Recap the call within a day
2. Share a *relevant* case study
3. Send a short `calendar` link

## Next steps

- Pick one template
- Schedule it today

Ready to close more deals? **Start your sequence now.**
";

/// Which backend serves completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Google Gemini.
    #[default]
    Gemini,
    /// Anthropic Claude.
    #[serde(alias = "anthropic")]
    Claude,
    /// Offline playback of [`SAMPLE_DRAFT`].
    Mock,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Gemini => "gemini",
            Self::Claude => "claude",
            Self::Mock => "mock",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "claude" | "anthropic" => Ok(Self::Claude),
            "mock" => Ok(Self::Mock),
            other => Err(Error::config(format!("Unknown LLM provider: {other}"))),
        }
    }
}

/// Everything needed to build a provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderSettings {
    /// Backend to use.
    pub kind: ProviderKind,
    /// Model override; each backend has its own default.
    pub model: Option<String>,
    /// API key for the real backends.
    pub api_key: Option<String>,
    /// Endpoint override.
    pub base_url: Option<String>,
    /// Attempts to open a stream; 1 disables retries.
    pub max_attempts: u32,
    /// First retry delay in milliseconds.
    pub retry_delay_ms: u64,
}

impl ProviderSettings {
    /// The model that will be used.
    pub fn effective_model(&self) -> &str {
        match (&self.model, self.kind) {
            (Some(model), _) if !model.trim().is_empty() => model,
            (_, ProviderKind::Gemini) => gemini::DEFAULT_MODEL,
            (_, ProviderKind::Claude) => claude::DEFAULT_MODEL,
            (_, ProviderKind::Mock) => "sample",
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::config(format!("No API key configured for the {} provider", self.kind)))
    }
}

/// Build the configured provider, wrapped for retries when enabled.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn LlmProvider>> {
    let model = settings.effective_model().to_string();
    let provider: Arc<dyn LlmProvider> = match settings.kind {
        ProviderKind::Gemini => {
            let mut p = GeminiProvider::new(settings.api_key()?, model);
            if let Some(url) = &settings.base_url {
                p = p.with_base_url(url.clone());
            }
            Arc::new(p)
        }
        ProviderKind::Claude => {
            let mut p = ClaudeProvider::new(settings.api_key()?, model);
            if let Some(url) = &settings.base_url {
                p = p.with_base_url(url.clone());
            }
            Arc::new(p)
        }
        ProviderKind::Mock => Arc::new(MockLlmProvider::with_chunks(SAMPLE_DRAFT.split_inclusive('\n'))),
    };

    tracing::info!(
        provider = %settings.kind,
        model = %settings.effective_model(),
        max_attempts = settings.max_attempts,
        "Configured LLM provider"
    );

    if settings.max_attempts > 1 {
        Ok(Arc::new(
            RetryWrapper::new(provider)
                .with_max_attempts(settings.max_attempts)
                .with_initial_delay(Duration::from_millis(settings.retry_delay_ms.max(1))),
        ))
    } else {
        Ok(provider)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::provider::CompletionRequest;

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!("anthropic".parse::<ProviderKind>().unwrap(), ProviderKind::Claude);
        assert_eq!(" mock ".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert!("gpt".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Claude.to_string(), "claude");
    }

    #[test]
    fn test_effective_model() {
        let mut settings = ProviderSettings::default();
        assert_eq!(settings.effective_model(), "gemini-2.0-flash");
        settings.kind = ProviderKind::Claude;
        assert_eq!(settings.effective_model(), claude::DEFAULT_MODEL);
        settings.model = Some("claude-opus".into());
        assert_eq!(settings.effective_model(), "claude-opus");
    }

    #[test]
    fn test_missing_api_key() {
        let settings = ProviderSettings {
            kind: ProviderKind::Claude,
            api_key: Some("  ".into()),
            ..Default::default()
        };
        let err = build_provider(&settings).err().unwrap();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_build_real_providers() {
        for kind in [ProviderKind::Gemini, ProviderKind::Claude] {
            let settings = ProviderSettings {
                kind,
                api_key: Some("key".into()),
                max_attempts: 3,
                ..Default::default()
            };
            let provider = build_provider(&settings).unwrap();
            assert_eq!(provider.name(), kind.to_string());
        }
    }

    #[tokio::test]
    async fn test_mock_plays_sample() {
        let settings = ProviderSettings {
            kind: ProviderKind::Mock,
            ..Default::default()
        };
        let provider = build_provider(&settings).unwrap();
        let response = provider
            .complete(CompletionRequest::prompt("anything"))
            .await
            .unwrap();
        assert_eq!(response.content, SAMPLE_DRAFT);
        assert!(response.chunks > 10);
    }
}
