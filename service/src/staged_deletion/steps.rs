use std::collections::HashSet;

use core_types::events::DeletionEvent;

use crate::{
    error::Error,
    pipeline::{PipelineStep, StepAction},
    staged_deletion::context::DeletionContext,
};

/// Step 1: Keep only ids that are currently staged, dropping duplicates
pub struct ResolveStagedIdsStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for ResolveStagedIdsStep {
    fn name(&self) -> &'static str {
        "resolve_staged_ids"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let store = context.staging_store.read().await;
        let mut seen = HashSet::new();
        context.resolved_ids = context
            .requested_ids
            .iter()
            .filter(|id| store.contains(id) && seen.insert((*id).clone()))
            .cloned()
            .collect();
        drop(store);

        let dropped = context.requested_ids.len() - context.resolved_ids.len();
        if dropped > 0 {
            tracing::info!("Ignoring {} requested ids that are not staged", dropped);
        }

        if context.resolved_ids.is_empty() {
            tracing::info!("Nothing staged to delete, skipping remaining steps");
            StepAction::Skip
        } else {
            StepAction::Continue
        }
    }
}

/// Step 2: Drop ids that no longer exist in the catalog.
/// Those photos are already gone, so they count as satisfied rather than failed.
pub struct DropStaleReferencesStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DropStaleReferencesStep {
    fn name(&self) -> &'static str {
        "drop_stale_references"
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        match context.catalog.existing_ids(&context.resolved_ids).await {
            Ok(existing) => {
                let existing_set: HashSet<_> = existing.iter().cloned().collect();
                context.stale_ids = context
                    .resolved_ids
                    .iter()
                    .filter(|id| !existing_set.contains(*id))
                    .cloned()
                    .collect();
                context.resolved_ids = existing;

                if !context.stale_ids.is_empty() {
                    tracing::warn!(
                        "{} staged photos no longer exist in the library",
                        context.stale_ids.len()
                    );
                }
                StepAction::Continue
            }
            Err(e) => {
                tracing::error!("Failed resolving staged photos in the library: {}", e);
                let reason = e.to_string();
                context.send_event(DeletionEvent::Failed {
                    error: reason.clone(),
                });
                StepAction::Abort(Error::DeletionFailed(reason))
            }
        }
    }
}

/// Step 3: Ask the catalog to delete the whole batch in one request
pub struct DeletePermanentlyStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for DeletePermanentlyStep {
    fn name(&self) -> &'static str {
        "delete_permanently"
    }

    fn should_execute(&self, context: &DeletionContext) -> bool {
        !context.resolved_ids.is_empty()
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        tracing::info!(
            "Requesting permanent deletion of {} photos",
            context.resolved_ids.len()
        );
        context.send_event(DeletionEvent::Started {
            total_photos: context.resolved_ids.len(),
        });

        match context
            .catalog
            .delete_permanently(&context.resolved_ids)
            .await
        {
            Ok(()) => {
                context.deleted_ids = std::mem::take(&mut context.resolved_ids);
                StepAction::Continue
            }
            Err(e) => {
                let reason = e.to_string();
                context.send_event(DeletionEvent::Failed {
                    error: reason.clone(),
                });
                StepAction::Abort(Error::DeletionFailed(reason))
            }
        }
    }
}

/// Step 4: Drop deleted and stale photos from the staging area
pub struct ReconcileStagingStep;

#[async_trait::async_trait]
impl PipelineStep<DeletionContext> for ReconcileStagingStep {
    fn name(&self) -> &'static str {
        "reconcile_staging"
    }

    fn should_execute(&self, context: &DeletionContext) -> bool {
        !context.deleted_ids.is_empty() || !context.stale_ids.is_empty()
    }

    async fn execute(&self, context: &mut DeletionContext) -> StepAction {
        let removed = {
            let mut store = context.staging_store.write().await;
            store.unstage_many(context.deleted_ids.iter().chain(context.stale_ids.iter()))
        };
        tracing::info!("Removed {} photos from the staging area", removed);

        context.send_event(DeletionEvent::Completed {
            deleted_photos: context.deleted_ids.len(),
        });
        StepAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use core_types::{PhotoId, PhotoRef};
    use photo_catalog::mock::MockPhotoCatalog;

    use super::*;
    use crate::staging_store::StagingStore;

    fn photo(id: &str) -> PhotoRef {
        PhotoRef::new(id, Utc.with_ymd_and_hms(2025, 4, 13, 9, 0, 0).unwrap())
    }

    async fn context_with(
        staged: &[&str],
        in_catalog: &[&str],
        requested: &[&str],
    ) -> (DeletionContext, MockPhotoCatalog) {
        let catalog = MockPhotoCatalog::new(in_catalog.iter().map(|id| photo(id)).collect());
        let store = StagingStore::shared();
        {
            let mut store = store.write().await;
            for id in staged {
                store.stage(&photo(id), None);
            }
        }
        let context = DeletionContext::new(
            requested.iter().map(|id| PhotoId::from(*id)).collect(),
            store,
            Arc::new(catalog.clone()),
            None,
        );
        (context, catalog)
    }

    #[async_std::test]
    async fn test_resolve_drops_unstaged_and_duplicate_ids() {
        let (mut context, _) = context_with(&["a", "b"], &["a", "b"], &["b", "x", "b", "a"]).await;
        let action = ResolveStagedIdsStep.execute(&mut context).await;
        assert_eq!(action, StepAction::Continue);
        assert_eq!(
            context.resolved_ids,
            vec![PhotoId::from("b"), PhotoId::from("a")]
        );
    }

    #[async_std::test]
    async fn test_resolve_skips_when_nothing_staged() {
        let (mut context, _) = context_with(&["a"], &["a"], &["x"]).await;
        assert_eq!(
            ResolveStagedIdsStep.execute(&mut context).await,
            StepAction::Skip
        );
    }

    #[async_std::test]
    async fn test_stale_references_are_split_off() {
        let (mut context, _) = context_with(&["a", "b"], &["a"], &["a", "b"]).await;
        context.resolved_ids = vec![PhotoId::from("a"), PhotoId::from("b")];

        let action = DropStaleReferencesStep.execute(&mut context).await;
        assert_eq!(action, StepAction::Continue);
        assert_eq!(context.resolved_ids, vec![PhotoId::from("a")]);
        assert_eq!(context.stale_ids, vec![PhotoId::from("b")]);
    }

    #[async_std::test]
    async fn test_lookup_failure_aborts_as_deletion_failure() {
        let (mut context, catalog) = context_with(&["a"], &["a"], &["a"]).await;
        catalog.fail_lookup_with("library offline");
        context.resolved_ids = vec![PhotoId::from("a")];

        match DropStaleReferencesStep.execute(&mut context).await {
            StepAction::Abort(Error::DeletionFailed(reason)) => {
                assert!(reason.contains("library offline"))
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(context.stale_ids.is_empty());
    }

    #[async_std::test]
    async fn test_delete_failure_aborts_with_reason() {
        let (mut context, catalog) = context_with(&["a"], &["a"], &["a"]).await;
        catalog.fail_delete_with("User cancelled");
        context.resolved_ids = vec![PhotoId::from("a")];

        let action = DeletePermanentlyStep.execute(&mut context).await;
        match action {
            StepAction::Abort(Error::DeletionFailed(reason)) => {
                assert!(reason.contains("User cancelled"))
            }
            other => panic!("unexpected action {:?}", other),
        }
        assert!(context.deleted_ids.is_empty());
    }

    #[async_std::test]
    async fn test_reconcile_removes_deleted_and_stale() {
        let (mut context, _) = context_with(&["a", "b", "c"], &["c"], &[]).await;
        context.staging_store.write().await.select_all();
        context.deleted_ids = vec![PhotoId::from("a")];
        context.stale_ids = vec![PhotoId::from("b")];

        assert!(ReconcileStagingStep.should_execute(&context));
        ReconcileStagingStep.execute(&mut context).await;

        let store = context.staging_store.read().await;
        assert_eq!(store.count(), 1);
        assert_eq!(store.selected_ids(), vec![PhotoId::from("c")]);
    }
}
