//! HTTP client for a Studio server.

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use studio_content::{Post, PostMeta, Preview};
use studio_core::{Error, Result};
use studio_generate::{BriefRequest, ContentBrief};

use crate::events::{EventStream, events_from_bytes};

/// Server health report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Health {
    /// `"ok"` when serving.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// A contact form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactRequest {
    /// Sender name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Subject line.
    pub subject: String,
    /// Message text.
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Talks to the Studio HTTP API.
#[derive(Debug, Clone)]
pub struct StudioClient {
    base_url: String,
    http: reqwest::Client,
}

impl StudioClient {
    /// Client for a server such as `http://127.0.0.1:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// The server address.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Request a draft and stream it back as events.
    ///
    /// A rejected request comes back as an error before any event:
    /// [`Error::InvalidInput`] for 4xx, [`Error::Upstream`] for 5xx. A
    /// connection dropped after the server accepted the request is
    /// [`Error::StreamInterrupted`].
    pub async fn generate(&self, brief: &ContentBrief) -> Result<EventStream> {
        let response = self
            .http
            .post(self.url("/api/generate"))
            .json(&BriefRequest::from(brief))
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Error::upstream_with_source("Failed to reach Studio server", e)
                } else {
                    Error::stream_interrupted(format!("Studio server dropped the draft stream: {e}"))
                }
            })?;
        let response = check(response).await?;
        tracing::debug!(status = %response.status(), "Generation stream accepted");
        Ok(events_from_bytes(response.bytes_stream()))
    }

    /// Render raw markdown on the server.
    pub async fn preview(&self, raw: &str) -> Result<Preview> {
        let response = self
            .http
            .post(self.url("/api/preview"))
            .header("content-type", "text/plain; charset=utf-8")
            .body(raw.to_string())
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        json(check(response).await?).await
    }

    /// Published posts, optionally filtered.
    pub async fn posts(&self, category: Option<&str>, query: Option<&str>) -> Result<Vec<PostMeta>> {
        let mut params = Vec::new();
        if let Some(category) = category {
            params.push(("category", category));
        }
        if let Some(query) = query {
            params.push(("q", query));
        }
        let response = self
            .http
            .get(self.url("/api/posts"))
            .query(&params)
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        json(check(response).await?).await
    }

    /// One published post.
    pub async fn post(&self, slug: &str) -> Result<Post> {
        let response = self
            .http
            .get(self.url(&format!("/api/posts/{slug}")))
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        json(check(response).await?).await
    }

    /// Send a contact message; returns the server's acknowledgement.
    pub async fn contact(&self, request: &ContactRequest) -> Result<String> {
        let response = self
            .http
            .post(self.url("/api/contact"))
            .json(request)
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        let body: MessageBody = json(check(response).await?).await?;
        Ok(body.message)
    }

    /// Subscribe `email` to the newsletter.
    ///
    /// An address already on the list is [`Error::Conflict`].
    pub async fn subscribe(&self, email: &str) -> Result<String> {
        let response = self
            .http
            .post(self.url("/api/newsletter"))
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        let body: MessageBody = json(check(response).await?).await?;
        Ok(body.message)
    }

    /// Server health.
    pub async fn health(&self) -> Result<Health> {
        let response = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| Error::upstream_with_source("Failed to reach Studio server", e))?;
        json(check(response).await?).await
    }
}

/// Map a non-success response onto the error taxonomy.
async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or_else(|_| if text.is_empty() { status.to_string() } else { text });

    Err(match status.as_u16() {
        404 => Error::not_found(message),
        409 => Error::conflict(message),
        code @ 400..=499 => {
            tracing::debug!(code, "Request rejected");
            Error::invalid_input(message)
        }
        code => Error::upstream_status(code, message),
    })
}

async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    response
        .json()
        .await
        .map_err(|e| Error::serialization(format!("Invalid response body: {e}")))
}
