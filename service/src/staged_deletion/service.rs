use std::sync::Arc;

use core_types::{PhotoId, events::DeletionEvent};
use photo_catalog::PhotoCatalogOps;

use crate::{
    error::Error,
    pipeline::{Pipeline, PipelineStep},
    staged_deletion::{
        context::DeletionContext,
        steps::{
            DeletePermanentlyStep, DropStaleReferencesStep, ReconcileStagingStep,
            ResolveStagedIdsStep,
        },
    },
    staging_store::SharedStagingStore,
};

fn deletion_pipeline() -> Pipeline<DeletionContext> {
    let steps: Vec<Box<dyn PipelineStep<DeletionContext>>> = vec![
        Box::new(ResolveStagedIdsStep),
        Box::new(DropStaleReferencesStep),
        Box::new(DeletePermanentlyStep),
        Box::new(ReconcileStagingStep),
    ];
    Pipeline::with_steps("staged_deletion", steps)
}

/// Commits staged photos to permanent deletion in one catalog request.
#[derive(Clone)]
pub struct DeletionCommitter {
    catalog: Arc<dyn PhotoCatalogOps>,
}

impl std::fmt::Debug for DeletionCommitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeletionCommitter").finish_non_exhaustive()
    }
}

impl DeletionCommitter {
    pub fn new(catalog: Arc<dyn PhotoCatalogOps>) -> Self {
        Self { catalog }
    }

    /// Permanently delete `ids` and drop them from the staging store.
    ///
    /// Returns how many photos the catalog deleted. On failure the store is
    /// left exactly as it was.
    pub async fn commit(
        &self,
        staging_store: &SharedStagingStore,
        ids: &[PhotoId],
    ) -> Result<usize, Error> {
        self.commit_with_progress(staging_store, ids, None).await
    }

    pub async fn commit_with_progress(
        &self,
        staging_store: &SharedStagingStore,
        ids: &[PhotoId],
        progress_tx: Option<flume::Sender<DeletionEvent>>,
    ) -> Result<usize, Error> {
        let mut context = DeletionContext::new(
            ids.to_vec(),
            staging_store.clone(),
            self.catalog.clone(),
            progress_tx,
        );

        deletion_pipeline().execute(&mut context).await?;

        tracing::info!(
            deleted = context.deleted_ids.len(),
            stale = context.stale_ids.len(),
            "Staged deletion complete"
        );
        Ok(context.deleted_ids.len())
    }
}
