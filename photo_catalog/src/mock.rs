use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use core_types::{AuthorizationStatus, PhotoId, PhotoRef, Preview, PreviewSize, SortOrder};

use crate::{CatalogError, PhotoCatalogOps, sort_photos};

/// Internal state for MockPhotoCatalog.
///
/// Groups all mutable state into a single struct for simplified locking.
struct MockState {
    photos: Vec<PhotoRef>,
    authorization: AuthorizationStatus,
    /// Status the catalog switches to when authorization is requested
    authorization_on_request: AuthorizationStatus,
    /// Reason returned by every delete call while set
    fail_delete: Option<String>,
    /// Reason returned by every existence lookup while set
    fail_lookup: Option<String>,
    /// Ids whose preview rendering fails
    fail_preview_ids: HashSet<PhotoId>,
    /// Every batch passed to `delete_permanently`, including failed ones
    delete_calls: Vec<Vec<PhotoId>>,
}

/// Mock implementation of PhotoCatalogOps for testing
///
/// This mock allows you to:
/// - Serve a fixed set of photos
/// - Simulate authorization prompts and denials
/// - Simulate deletion and preview failures
/// - Verify which deletion batches were requested
#[derive(Clone)]
pub struct MockPhotoCatalog {
    state: Arc<Mutex<MockState>>,
}

impl Default for MockPhotoCatalog {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MockPhotoCatalog {
    /// Create an authorized mock catalog holding `photos`
    pub fn new(photos: Vec<PhotoRef>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                photos,
                authorization: AuthorizationStatus::Authorized,
                authorization_on_request: AuthorizationStatus::Authorized,
                fail_delete: None,
                fail_lookup: None,
                fail_preview_ids: HashSet::new(),
                delete_calls: Vec::new(),
            })),
        }
    }

    pub fn set_authorization(&self, status: AuthorizationStatus) {
        self.state.lock().unwrap().authorization = status;
    }

    /// Status granted when `request_authorization` is called
    pub fn answer_authorization_with(&self, status: AuthorizationStatus) {
        self.state.lock().unwrap().authorization_on_request = status;
    }

    /// Make every deletion fail with the given reason
    pub fn fail_delete_with(&self, reason: impl Into<String>) {
        self.state.lock().unwrap().fail_delete = Some(reason.into());
    }

    /// Let deletions succeed again
    pub fn allow_delete(&self) {
        self.state.lock().unwrap().fail_delete = None;
    }

    /// Make `existing_ids` fail, e.g. the library went offline
    pub fn fail_lookup_with(&self, reason: impl Into<String>) {
        self.state.lock().unwrap().fail_lookup = Some(reason.into());
    }

    pub fn fail_preview_for(&self, id: impl Into<PhotoId>) {
        self.state
            .lock()
            .unwrap()
            .fail_preview_ids
            .insert(id.into());
    }

    /// Remove a photo behind the application's back, e.g. deleted in another app
    pub fn remove_externally(&self, id: &PhotoId) {
        self.state.lock().unwrap().photos.retain(|p| &p.id != id);
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.state.lock().unwrap().photos.iter().any(|p| &p.id == id)
    }

    pub fn photo_count(&self) -> usize {
        self.state.lock().unwrap().photos.len()
    }

    /// Get all deletion batches in call order
    pub fn delete_calls(&self) -> Vec<Vec<PhotoId>> {
        self.state.lock().unwrap().delete_calls.clone()
    }
}

#[async_trait]
impl PhotoCatalogOps for MockPhotoCatalog {
    async fn authorization_status(&self) -> AuthorizationStatus {
        self.state.lock().unwrap().authorization
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        let mut state = self.state.lock().unwrap();
        if state.authorization == AuthorizationStatus::NotDetermined {
            state.authorization = state.authorization_on_request;
        }
        state.authorization
    }

    async fn list_photos(&self, sort_order: SortOrder) -> Result<Vec<PhotoRef>, CatalogError> {
        let state = self.state.lock().unwrap();
        if !state.authorization.allows_access() {
            return Err(CatalogError::AccessDenied);
        }
        let mut photos = state.photos.clone();
        sort_photos(&mut photos, sort_order);
        Ok(photos)
    }

    async fn fetch_preview(
        &self,
        id: &PhotoId,
        target_size: PreviewSize,
    ) -> Result<Preview, CatalogError> {
        let state = self.state.lock().unwrap();
        if state.fail_preview_ids.contains(id) {
            return Err(CatalogError::Preview(format!(
                "Mock preview failure for {}",
                id
            )));
        }
        if !state.photos.iter().any(|p| &p.id == id) {
            return Err(CatalogError::NotFound(id.clone()));
        }
        Ok(Preview::new(
            format!("mock-preview-for-{}", id).into_bytes(),
            target_size.width,
            target_size.height,
        ))
    }

    async fn existing_ids(&self, ids: &[PhotoId]) -> Result<Vec<PhotoId>, CatalogError> {
        let state = self.state.lock().unwrap();
        if let Some(reason) = state.fail_lookup.clone() {
            return Err(CatalogError::Io(std::io::Error::other(reason)));
        }
        Ok(ids
            .iter()
            .filter(|id| state.photos.iter().any(|p| &p.id == *id))
            .cloned()
            .collect())
    }

    async fn delete_permanently(&self, ids: &[PhotoId]) -> Result<(), CatalogError> {
        let mut state = self.state.lock().unwrap();
        state.delete_calls.push(ids.to_vec());

        if let Some(reason) = state.fail_delete.clone() {
            return Err(CatalogError::DeletionFailed(reason));
        }

        if let Some(missing) = ids
            .iter()
            .find(|id| !state.photos.iter().any(|p| &p.id == *id))
        {
            return Err(CatalogError::NotFound(missing.clone()));
        }

        state.photos.retain(|p| !ids.contains(&p.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn photo(id: &str, day: u32) -> PhotoRef {
        PhotoRef::new(id, Utc.with_ymd_and_hms(2025, 4, day, 12, 0, 0).unwrap())
    }

    #[async_std::test]
    async fn test_mock_photo_catalog() {
        let catalog = MockPhotoCatalog::new(vec![photo("a", 1), photo("b", 3), photo("c", 2)]);

        let listed = catalog.list_photos(SortOrder::NewestFirst).await.unwrap();
        let listed: Vec<_> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(listed, vec!["b", "c", "a"]);

        catalog.fail_delete_with("User declined");
        let result = catalog.delete_permanently(&[PhotoId::from("a")]).await;
        assert!(matches!(result, Err(CatalogError::DeletionFailed(_))));
        assert!(catalog.contains(&PhotoId::from("a")));

        catalog.allow_delete();
        catalog
            .delete_permanently(&[PhotoId::from("a")])
            .await
            .unwrap();
        assert!(!catalog.contains(&PhotoId::from("a")));
        assert_eq!(catalog.delete_calls().len(), 2);
    }

    #[async_std::test]
    async fn test_mock_authorization_request() {
        let catalog = MockPhotoCatalog::new(vec![photo("a", 1)]);
        catalog.set_authorization(AuthorizationStatus::NotDetermined);
        catalog.answer_authorization_with(AuthorizationStatus::Denied);

        assert!(catalog.list_photos(SortOrder::NewestFirst).await.is_err());
        assert_eq!(
            catalog.request_authorization().await,
            AuthorizationStatus::Denied
        );
        // Once answered the prompt is not shown again.
        catalog.answer_authorization_with(AuthorizationStatus::Authorized);
        assert_eq!(
            catalog.request_authorization().await,
            AuthorizationStatus::Denied
        );
    }
}
