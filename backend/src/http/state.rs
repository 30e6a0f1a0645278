//! Application state for the HTTP server.

use std::sync::Arc;

use crate::client::{BackendClient, CourseProvider, DocumentLookup, GenerationRunner};
use crate::services::{DocumentNotifier, GenerationService, GenerationTracker};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Source of course hour budgets
    pub courses: Arc<dyn CourseProvider>,
    /// Existing course documents, for overwrite checks
    pub documents: Arc<dyn DocumentLookup>,
    /// Background generation jobs
    pub generation: GenerationService,
}

impl AppState {
    pub fn new(
        courses: Arc<dyn CourseProvider>,
        documents: Arc<dyn DocumentLookup>,
        runner: Arc<dyn GenerationRunner>,
    ) -> Self {
        Self {
            courses,
            documents,
            generation: GenerationService::new(
                runner,
                GenerationTracker::new(),
                DocumentNotifier::new(),
            ),
        }
    }

    /// State backed by a single course backend client.
    pub fn with_client(client: BackendClient) -> Self {
        let client = Arc::new(client);
        Self::new(client.clone(), client.clone(), client)
    }
}
