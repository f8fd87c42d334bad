//! Client side of Content Studio.
//!
//! A [`Studio`] sends a brief to a [`DraftSource`] (a remote server through
//! [`StudioClient`], or an in-process [`LocalSource`]) and folds the
//! streamed text into a [`DraftSession`], re-rendering after every chunk.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use studio_client::{Studio, StudioClient};
//! use studio_generate::BriefRequest;
//!
//! # async fn run() -> studio_core::Result<()> {
//! let mut studio = Studio::new(Arc::new(StudioClient::new("http://127.0.0.1:3000")));
//! studio
//!     .generate(BriefRequest {
//!         topic: Some("Cold email that gets replies".into()),
//!         ..Default::default()
//!     })
//!     .await?;
//! studio.wait().await;
//! println!("{}", studio.session().lock().await.raw());
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod api;
pub mod consumer;
pub mod decode;
pub mod events;
pub mod session;
pub mod source;
pub mod studio;

pub use actions::{
    COPY_FEEDBACK_WINDOW, Clipboard, CopyFeedback, MemoryClipboard, SystemClipboard, copy_draft,
    download_draft,
};
pub use api::{ContactRequest, Health, StudioClient};
pub use consumer::{ConsumeOutcome, DraftUpdate, consume};
pub use decode::Utf8Decoder;
pub use events::{EventStream, StreamEvent, events_from_bytes, events_from_completion};
pub use session::{Applied, DraftSession, GenerationId, SessionStatus, SharedSession};
pub use source::{DraftSource, LocalSource};
pub use studio::Studio;
