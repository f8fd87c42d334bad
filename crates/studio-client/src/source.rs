//! Where draft events come from.

use async_trait::async_trait;

use studio_core::Result;
use studio_generate::{ContentBrief, GenerationService};

use crate::api::StudioClient;
use crate::events::{EventStream, events_from_completion};

/// Opens a generation stream for a brief.
#[async_trait]
pub trait DraftSource: Send + Sync {
    /// Open the stream. Errors mean generation never started.
    async fn open(&self, brief: &ContentBrief) -> Result<EventStream>;
}

#[async_trait]
impl DraftSource for StudioClient {
    async fn open(&self, brief: &ContentBrief) -> Result<EventStream> {
        self.generate(brief).await
    }
}

/// Generates in-process, without a server.
#[derive(Clone)]
pub struct LocalSource {
    service: GenerationService,
}

impl LocalSource {
    /// Wrap a generation service.
    pub fn new(service: GenerationService) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DraftSource for LocalSource {
    async fn open(&self, brief: &ContentBrief) -> Result<EventStream> {
        let stream = self.service.generate(brief).await?;
        Ok(events_from_completion(stream))
    }
}
