//! Photo catalog access.
//!
//! The catalog is the single source of truth for which photos exist. Services
//! reach it through [`PhotoCatalogOps`] so they can be tested against
//! [`mock::MockPhotoCatalog`] instead of a real photo library.

mod directory;
pub mod mock;
mod ops;

use core_types::PhotoId;

pub use directory::DirectoryPhotoCatalog;
pub use ops::PhotoCatalogOps;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Photo library access has not been granted")]
    AccessDenied,

    #[error("Photo not found: {0}")]
    NotFound(PhotoId),

    #[error("Invalid photo id: {0}")]
    InvalidId(PhotoId),

    #[error("Preview error: {0}")]
    Preview(String),

    #[error("Deletion failed: {0}")]
    DeletionFailed(String),
}

/// Orders photos by capture time; ties are broken by id so listings are stable.
pub fn sort_photos(photos: &mut [core_types::PhotoRef], sort_order: core_types::SortOrder) {
    use core_types::SortOrder;
    match sort_order {
        SortOrder::NewestFirst => photos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
        SortOrder::OldestFirst => photos.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        }),
    }
}
