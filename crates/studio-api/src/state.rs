//! Shared server state.

use std::sync::Arc;

use studio_content::{CategoryPalette, PostCatalog};
use studio_generate::GenerationService;

use crate::store::{MemoryStore, SubmissionStore};

/// Everything the handlers need. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Relays briefs to the model.
    pub service: GenerationService,
    /// Published posts.
    pub catalog: Arc<PostCatalog>,
    /// Colours for category badges in previews.
    pub palette: Arc<CategoryPalette>,
    /// Contact and newsletter storage.
    pub store: Arc<dyn SubmissionStore>,
}

impl AppState {
    /// State with no posts, the default palette and in-memory storage.
    pub fn new(service: GenerationService) -> Self {
        Self {
            service,
            catalog: Arc::new(PostCatalog::from_posts(Vec::new())),
            palette: Arc::new(CategoryPalette::default()),
            store: Arc::new(MemoryStore::new()),
        }
    }

    /// Serve `catalog`.
    pub fn with_catalog(mut self, catalog: PostCatalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    /// Use `palette` for previews.
    pub fn with_palette(mut self, palette: CategoryPalette) -> Self {
        self.palette = Arc::new(palette);
        self
    }

    /// Store submissions in `store`.
    pub fn with_store(mut self, store: Arc<dyn SubmissionStore>) -> Self {
        self.store = store;
        self
    }
}
