use std::sync::Arc;

use core_types::{
    Access, AuthorizationStatus, Feature, PhotoId, PhotoRef, Preview, PreviewSize,
    events::{DeletionEvent, TriageEvent},
};
use photo_catalog::PhotoCatalogOps;

use crate::{
    entitlement::EntitlementGate,
    error::Error,
    photo_groups::{PhotoGroup, group_by_month},
    settings_service::AppSettings,
    staged_deletion::service::DeletionCommitter,
    staging_store::{SharedStagingStore, StagingStore},
    triage_session::{SessionState, SwipeOutcome, TriageSession},
};

/// Collaborators a review session needs, passed in explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn PhotoCatalogOps>,
    pub entitlement_gate: Arc<dyn EntitlementGate>,
    pub settings: AppSettings,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub reviewed: usize,
    pub remaining: usize,
    pub total: usize,
    pub staged: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Number of photos the catalog deleted
    Committed(usize),
    Blocked,
}

/// Drives one review session: the queue, the shared staging area and the
/// gated actions on top of them.
pub struct TriageService {
    context: AppContext,
    session: TriageSession,
    staging_store: SharedStagingStore,
    committer: DeletionCommitter,
    authorization: AuthorizationStatus,
    events_tx: Option<flume::Sender<TriageEvent>>,
    deletion_events_tx: Option<flume::Sender<DeletionEvent>>,
}

impl TriageService {
    pub fn new(context: AppContext) -> Self {
        Self::with_staging_store(context, StagingStore::shared())
    }

    /// Use an existing staging area, e.g. one also shown by another view.
    pub fn with_staging_store(context: AppContext, staging_store: SharedStagingStore) -> Self {
        let committer = DeletionCommitter::new(context.catalog.clone());
        Self {
            context,
            session: TriageSession::new(),
            staging_store,
            committer,
            authorization: AuthorizationStatus::NotDetermined,
            events_tx: None,
            deletion_events_tx: None,
        }
    }

    pub fn with_events(mut self, events_tx: flume::Sender<TriageEvent>) -> Self {
        self.events_tx = Some(events_tx);
        self
    }

    pub fn with_deletion_events(mut self, deletion_events_tx: flume::Sender<DeletionEvent>) -> Self {
        self.deletion_events_tx = Some(deletion_events_tx);
        self
    }

    pub fn staging_store(&self) -> SharedStagingStore {
        self.staging_store.clone()
    }

    pub fn settings(&self) -> &AppSettings {
        &self.context.settings
    }

    pub fn set_swipe_threshold(&mut self, threshold: f64) -> Result<(), Error> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Swipe threshold must be positive, got {}",
                threshold
            )));
        }
        self.context.settings.swipe_threshold = threshold;
        Ok(())
    }

    fn send_event(&self, event: TriageEvent) {
        if let Some(tx) = &self.events_tx {
            tx.send(event).ok();
        }
    }

    /// Ask for library access if needed and load every photo into the queue.
    pub async fn start_session(&mut self) -> Result<SessionState, Error> {
        self.authorization = self.context.catalog.authorization_status().await;
        if self.authorization == AuthorizationStatus::NotDetermined {
            tracing::info!("Requesting photo library access");
            self.authorization = self.context.catalog.request_authorization().await;
        }

        if !self.authorization.allows_access() {
            tracing::warn!("Photo library access not granted: {:?}", self.authorization);
            return Err(Error::PermissionDenied);
        }

        self.start_over().await
    }

    /// Reload the whole catalog and review it from the beginning.
    pub async fn start_over(&mut self) -> Result<SessionState, Error> {
        let photos = self.list_photos().await?;
        self.load_photos(photos);
        Ok(self.state())
    }

    async fn list_photos(&self) -> Result<Vec<PhotoRef>, Error> {
        self.context
            .catalog
            .list_photos(self.context.settings.sort_order)
            .await
            .map_err(Error::from)
    }

    /// Catalog photos grouped by month, most recent first.
    pub async fn photo_groups(&self) -> Result<Vec<PhotoGroup>, Error> {
        let photos = self.list_photos().await?;
        Ok(group_by_month(&photos))
    }

    pub fn load_group(&mut self, group: &PhotoGroup) {
        tracing::info!("Reviewing photo group {}", group.label());
        self.load_photos(group.photos.clone());
    }

    pub fn load_photos(&mut self, photos: Vec<PhotoRef>) {
        let total_photos = photos.len();
        self.session.load_new_queue(photos);
        self.send_event(TriageEvent::QueueLoaded { total_photos });
    }

    /// Review the current queue again. Staged photos stay staged.
    pub fn reset(&mut self) {
        self.session.reset();
    }

    pub fn current_photo(&self) -> Option<&PhotoRef> {
        self.session.current_photo()
    }

    /// Resolve a finished drag and apply it. Returns the outcome that took effect.
    pub async fn swipe(&mut self, horizontal_distance: f64) -> SwipeOutcome {
        let outcome = self
            .session
            .resolve_swipe(horizontal_distance, self.context.settings.swipe_threshold);
        self.apply(outcome).await
    }

    /// Apply an outcome to the current photo. A blocked delete turns into `Cancel`.
    pub async fn apply(&mut self, outcome: SwipeOutcome) -> SwipeOutcome {
        let Some(photo) = self.session.current_photo().cloned() else {
            return SwipeOutcome::Cancel;
        };

        match outcome {
            SwipeOutcome::Cancel => SwipeOutcome::Cancel,
            SwipeOutcome::Keep => {
                let mut staging = self.staging_store.write().await;
                self.session.apply_outcome(SwipeOutcome::Keep, &mut staging);
                drop(staging);
                self.send_event(TriageEvent::PhotoKept { id: photo.id });
                self.after_apply();
                SwipeOutcome::Keep
            }
            SwipeOutcome::Delete => {
                if self
                    .context
                    .entitlement_gate
                    .check_access(Feature::SwipeDelete)
                    .await
                    == Access::Blocked
                {
                    tracing::info!("Swipe delete of {} blocked by entitlement gate", photo.id);
                    self.send_event(TriageEvent::SwipeBlocked { id: photo.id });
                    return SwipeOutcome::Cancel;
                }

                let preview = self.fetch_preview(&photo.id).await;
                let mut staging = self.staging_store.write().await;
                self.session
                    .apply_outcome_with_preview(SwipeOutcome::Delete, &mut staging, preview);
                drop(staging);
                self.send_event(TriageEvent::PhotoStaged { id: photo.id });
                self.after_apply();
                SwipeOutcome::Delete
            }
        }
    }

    async fn fetch_preview(&self, id: &PhotoId) -> Option<Preview> {
        match self
            .context
            .catalog
            .fetch_preview(id, PreviewSize::GRID)
            .await
        {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!("Staging {} without preview: {}", id, e);
                None
            }
        }
    }

    fn after_apply(&self) {
        if self.session.is_complete() {
            tracing::info!(
                "Review complete: {} photos reviewed",
                self.session.reviewed_count()
            );
            self.send_event(TriageEvent::SessionCompleted);
        }
    }

    /// Put a staged photo back. Returns `false` if it was not staged.
    pub async fn restore(&self, id: &PhotoId) -> bool {
        let restored = self.staging_store.write().await.unstage(id);
        if restored {
            self.send_event(TriageEvent::PhotoRestored { id: id.clone() });
        }
        restored
    }

    pub async fn restore_selected(&self) -> usize {
        let mut staging = self.staging_store.write().await;
        let selected = staging.selected_ids();
        let restored = staging.unstage_many(selected.iter());
        drop(staging);
        for id in selected {
            self.send_event(TriageEvent::PhotoRestored { id });
        }
        restored
    }

    pub async fn toggle_selection(&self, id: &PhotoId) {
        self.staging_store.write().await.toggle_selection(id);
    }

    pub async fn select_all(&self) {
        self.staging_store.write().await.select_all();
    }

    pub async fn clear_selection(&self) {
        self.staging_store.write().await.clear_selection();
    }

    /// Permanently delete every selected staged photo.
    pub async fn commit_selected(&self) -> Result<CommitOutcome, Error> {
        let selected = self.staging_store.read().await.selected_ids();
        self.commit(&selected).await
    }

    pub async fn commit(&self, ids: &[PhotoId]) -> Result<CommitOutcome, Error> {
        if self
            .context
            .entitlement_gate
            .check_access(Feature::BulkDelete)
            .await
            == Access::Blocked
        {
            tracing::info!("Bulk delete blocked by entitlement gate");
            return Ok(CommitOutcome::Blocked);
        }

        let deleted = self
            .committer
            .commit_with_progress(&self.staging_store, ids, self.deletion_events_tx.clone())
            .await?;
        Ok(CommitOutcome::Committed(deleted))
    }

    pub fn state(&self) -> SessionState {
        self.session.state(self.authorization)
    }

    pub async fn progress(&self) -> Progress {
        Progress {
            reviewed: self.session.reviewed_count(),
            remaining: self.session.remaining_count(),
            total: self.session.total_count(),
            staged: self.staging_store.read().await.count(),
        }
    }
}
