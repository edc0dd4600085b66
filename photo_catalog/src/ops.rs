use async_trait::async_trait;
use core_types::{AuthorizationStatus, PhotoId, PhotoRef, Preview, PreviewSize, SortOrder};

use crate::CatalogError;

/// Trait for photo library operations to enable testing
#[async_trait]
pub trait PhotoCatalogOps: Send + Sync {
    /// Current access level granted to the application
    async fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask for access. Returns the status after the request has been answered.
    async fn request_authorization(&self) -> AuthorizationStatus;

    /// List every photo in the library in the requested order
    async fn list_photos(&self, sort_order: SortOrder) -> Result<Vec<PhotoRef>, CatalogError>;

    /// Render a preview that fits inside `target_size`
    async fn fetch_preview(
        &self,
        id: &PhotoId,
        target_size: PreviewSize,
    ) -> Result<Preview, CatalogError>;

    /// Returns the subset of `ids` that still resolve to a photo, in input order
    async fn existing_ids(&self, ids: &[PhotoId]) -> Result<Vec<PhotoId>, CatalogError>;

    /// Permanently remove a batch of photos.
    ///
    /// The batch is all-or-nothing from the caller's point of view: an error
    /// means the caller must assume nothing was removed.
    async fn delete_permanently(&self, ids: &[PhotoId]) -> Result<(), CatalogError>;
}
