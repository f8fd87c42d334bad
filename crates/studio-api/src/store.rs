//! Where form submissions end up.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use studio_core::util::files::{append_line, exists, read_file};
use studio_core::{Error, Result};

use crate::forms::{ContactMessage, Subscriber};

/// File holding contact messages, one JSON object per line.
pub const CONTACT_FILE: &str = "contact_messages.jsonl";
/// File holding newsletter subscribers, one JSON object per line.
pub const SUBSCRIBERS_FILE: &str = "subscribers.jsonl";

/// Persists contact messages and newsletter subscribers.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Store a contact message.
    async fn save_contact(&self, message: ContactMessage) -> Result<()>;

    /// Add a subscriber. Returns [`Error::Conflict`] if the address is
    /// already subscribed.
    async fn subscribe(&self, subscriber: Subscriber) -> Result<()>;
}

/// Keeps submissions in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Default)]
struct MemoryInner {
    contacts: Vec<ContactMessage>,
    subscribers: Vec<Subscriber>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored contact messages, oldest first.
    pub async fn contacts(&self) -> Vec<ContactMessage> {
        self.inner.lock().await.contacts.clone()
    }

    /// Stored subscribers, oldest first.
    pub async fn subscribers(&self) -> Vec<Subscriber> {
        self.inner.lock().await.subscribers.clone()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn save_contact(&self, message: ContactMessage) -> Result<()> {
        self.inner.lock().await.contacts.push(message);
        Ok(())
    }

    async fn subscribe(&self, subscriber: Subscriber) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(Error::conflict(subscriber.email));
        }
        inner.subscribers.push(subscriber);
        Ok(())
    }
}

/// Appends submissions to JSON-lines files in a directory.
pub struct FileStore {
    dir: PathBuf,
    subscribers: Mutex<Option<HashSet<String>>>,
}

impl FileStore {
    /// Store files under `dir`; created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            subscribers: Mutex::new(None),
        }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn known_subscribers(&self) -> Result<HashSet<String>> {
        let path = self.dir.join(SUBSCRIBERS_FILE);
        if !exists(&path).await {
            return Ok(HashSet::new());
        }
        let text = read_file(&path).await?;
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str::<Subscriber>(line)
                    .map(|s| s.email)
                    .map_err(|e| Error::invalid_data(format!("{}: {e}", path.display())))
            })
            .collect()
    }
}

fn to_line<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| Error::serialization(e.to_string()))
}

#[async_trait]
impl SubmissionStore for FileStore {
    async fn save_contact(&self, message: ContactMessage) -> Result<()> {
        append_line(&self.dir.join(CONTACT_FILE), &to_line(&message)?).await?;
        tracing::debug!(id = %message.id, "Stored contact message");
        Ok(())
    }

    async fn subscribe(&self, subscriber: Subscriber) -> Result<()> {
        let mut cache = self.subscribers.lock().await;
        if cache.is_none() {
            *cache = Some(self.known_subscribers().await?);
        }
        let known = cache.get_or_insert_with(HashSet::new);
        if known.contains(&subscriber.email) {
            return Err(Error::conflict(subscriber.email));
        }
        append_line(&self.dir.join(SUBSCRIBERS_FILE), &to_line(&subscriber)?).await?;
        known.insert(subscriber.email);
        Ok(())
    }
}
