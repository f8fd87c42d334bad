//! Route handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

use studio_content::{Post, PostMeta, Preview};
use studio_core::Error;
use studio_generate::BriefRequest;

use crate::error::{ApiResult, ErrorBody};
use crate::forms::{ContactForm, NewsletterForm};
use crate::state::AppState;

/// Reply for a stored contact message.
pub const CONTACT_SENT: &str = "Message sent successfully!";
/// Reply for a new subscriber.
pub const SUBSCRIBED: &str = "Successfully subscribed!";
/// Reply for an address that is already on the list.
pub const ALREADY_SUBSCRIBED: &str = "You're already subscribed. Thank you for your support!";

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// User-facing text.
    pub message: String,
}

impl MessageBody {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Health report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always `"ok"`.
    pub status: String,
    /// Server version.
    pub version: String,
}

/// Filters for the post list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostsQuery {
    /// Category name, matched case-insensitively.
    pub category: Option<String>,
    /// Free-text search.
    pub q: Option<String>,
}

/// `POST /api/generate`: stream a draft as plain text.
///
/// Input errors and upstream failures before the first chunk are answered
/// with a JSON error. Once the body has started, an upstream failure aborts
/// it instead of writing anything more.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<BriefRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(request) = payload?;
    let stream = state.service.generate_request(request).await?;

    // An error aborts the connection, so yield first to let hyper flush the
    // response head and any text already written.
    let body = Body::from_stream(stream.then(|item| async move {
        if let Err(e) = &item {
            tracing::warn!(error = %e, "Aborting draft stream");
            tokio::task::yield_now().await;
        }
        item
    }));
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response())
}

/// `POST /api/preview`: render raw text.
pub async fn preview(State(state): State<AppState>, raw: String) -> Json<Preview> {
    Json(Preview::of(&raw, &state.palette))
}

/// `GET /api/posts`
pub async fn posts(State(state): State<AppState>, Query(query): Query<PostsQuery>) -> Json<Vec<PostMeta>> {
    Json(state.catalog.filter(query.category.as_deref(), query.q.as_deref()))
}

/// `GET /api/posts/{slug}`
pub async fn post(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<Json<Post>> {
    state
        .catalog
        .get(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| Error::not_found(format!("Post not found: {slug}")).into())
}

/// `GET /api/categories`
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.catalog.categories())
}

/// `POST /api/contact`
pub async fn contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<MessageBody>)> {
    let Json(form) = payload?;
    let message = form.validate()?;
    tracing::info!(id = %message.id, subject = %message.subject, "Contact message received");
    state.store.save_contact(message).await?;
    Ok((StatusCode::CREATED, MessageBody::new(CONTACT_SENT)))
}

/// `POST /api/newsletter`
pub async fn newsletter(
    State(state): State<AppState>,
    payload: Result<Json<NewsletterForm>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(form) = payload?;
    let subscriber = form.validate()?;
    match state.store.subscribe(subscriber).await {
        Ok(()) => {
            tracing::info!("New newsletter subscriber");
            Ok((StatusCode::CREATED, MessageBody::new(SUBSCRIBED)).into_response())
        }
        Err(Error::Conflict(_)) => {
            let body = ErrorBody {
                error: "already_subscribed".to_string(),
                message: Some(ALREADY_SUBSCRIBED.to_string()),
            };
            Ok((StatusCode::CONFLICT, Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /health`
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
