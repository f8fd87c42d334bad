//! HTTP server for Content Studio.
//!
//! Routes:
//!
//! | Method | Path                | Purpose                         |
//! |--------|---------------------|---------------------------------|
//! | POST   | `/api/generate`     | stream a draft as plain text    |
//! | POST   | `/api/preview`      | render raw markdown             |
//! | GET    | `/api/posts`        | list published posts            |
//! | GET    | `/api/posts/{slug}` | one published post              |
//! | GET    | `/api/categories`   | post categories                 |
//! | POST   | `/api/contact`      | contact form                    |
//! | POST   | `/api/newsletter`   | newsletter signup               |
//! | GET    | `/health`           | liveness                        |
//!
//! Errors are JSON objects with an `error` field.

pub mod error;
pub mod forms;
pub mod handlers;
pub mod router;
pub mod state;
pub mod store;

pub use error::{ApiError, ApiResult, ErrorBody};
pub use forms::{ContactForm, ContactMessage, NewsletterForm, Subscriber};
pub use router::{router, serve, serve_listener};
pub use state::AppState;
pub use store::{FileStore, MemoryStore, SubmissionStore};
