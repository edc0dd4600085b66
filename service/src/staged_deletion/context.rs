use std::sync::Arc;

use core_types::{PhotoId, events::DeletionEvent};
use photo_catalog::PhotoCatalogOps;

use crate::staging_store::SharedStagingStore;

/// Context object that flows through the pipeline, accumulating state
pub struct DeletionContext {
    pub requested_ids: Vec<PhotoId>,
    pub staging_store: SharedStagingStore,
    pub catalog: Arc<dyn PhotoCatalogOps>,
    pub progress_tx: Option<flume::Sender<DeletionEvent>>,

    // Accumulated state as pipeline progresses
    /// Requested ids that are staged and still exist in the catalog
    pub resolved_ids: Vec<PhotoId>,
    /// Staged ids the catalog no longer knows about
    pub stale_ids: Vec<PhotoId>,
    pub deleted_ids: Vec<PhotoId>,
}

impl DeletionContext {
    pub fn new(
        requested_ids: Vec<PhotoId>,
        staging_store: SharedStagingStore,
        catalog: Arc<dyn PhotoCatalogOps>,
        progress_tx: Option<flume::Sender<DeletionEvent>>,
    ) -> Self {
        Self {
            requested_ids,
            staging_store,
            catalog,
            progress_tx,
            resolved_ids: Vec::new(),
            stale_ids: Vec::new(),
            deleted_ids: Vec::new(),
        }
    }

    pub fn send_event(&self, event: DeletionEvent) {
        if let Some(tx) = &self.progress_tx {
            // Receiver may be gone, progress is best effort.
            tx.send(event).ok();
        }
    }
}
