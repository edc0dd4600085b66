use std::{
    io,
    path::{Component, Path, PathBuf},
    time::SystemTime,
};

use async_std::task;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use core_types::{AuthorizationStatus, PhotoId, PhotoRef, Preview, PreviewSize, SortOrder};

use crate::{CatalogError, PhotoCatalogOps, sort_photos};

/// Prefix of the holding directory a deletion batch is moved into.
const DELETION_DIR_PREFIX: &str = ".swipely-deleting-";

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic",
];

/// Photo catalog backed by a directory tree of image files.
///
/// A photo id is the file path relative to the root, with `/` separators.
/// The capture time is the file modification time (most copy tools preserve
/// it), falling back to the creation time.
#[derive(Debug, Clone)]
pub struct DirectoryPhotoCatalog {
    root: PathBuf,
}

impl DirectoryPhotoCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, id: &PhotoId) -> Result<PathBuf, CatalogError> {
        let relative = Path::new(id.as_str());
        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if id.as_str().is_empty() || !is_plain {
            return Err(CatalogError::InvalidId(id.clone()));
        }
        Ok(self.root.join(relative))
    }

    fn check_access(&self) -> AuthorizationStatus {
        match std::fs::read_dir(&self.root) {
            Ok(_) => AuthorizationStatus::Authorized,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => AuthorizationStatus::Denied,
            Err(_) => AuthorizationStatus::Restricted,
        }
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| IMAGE_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn photo_id_for(relative: &Path) -> PhotoId {
    let parts: Vec<String> = relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().to_string())
        .collect();
    PhotoId::new(parts.join("/"))
}

fn collect_photos(root: &Path, dir: &Path, photos: &mut Vec<PhotoRef>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_photos(root, &path, photos)?;
        } else if file_type.is_file() && is_image_file(&path) {
            let metadata = entry.metadata()?;
            let timestamp = metadata
                .modified()
                .or_else(|_| metadata.created())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            photos.push(PhotoRef::new(
                photo_id_for(relative),
                DateTime::<Utc>::from(timestamp),
            ));
        }
    }
    Ok(())
}

/// Move every path into `holding_dir` with `rename`. If one move fails the
/// earlier ones are moved back, so either all files left their place or none.
fn move_batch<F>(paths: &[PathBuf], holding_dir: &Path, mut rename: F) -> io::Result<()>
where
    F: FnMut(&Path, &Path) -> io::Result<()>,
{
    let mut moved: Vec<(&Path, PathBuf)> = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        let target = holding_dir.join(index.to_string());
        if let Err(e) = rename(path, &target) {
            for (original, held) in moved.iter().rev() {
                if let Err(restore_error) = rename(held, original) {
                    tracing::error!(
                        "Failed restoring {} after aborted deletion: {}",
                        original.display(),
                        restore_error
                    );
                }
            }
            return Err(e);
        }
        moved.push((path, target));
    }
    Ok(())
}

fn delete_batch(root: &Path, paths: &[PathBuf]) -> Result<(), CatalogError> {
    let holding_dir = tempfile::Builder::new()
        .prefix(DELETION_DIR_PREFIX)
        .tempdir_in(root)
        .map_err(|e| CatalogError::DeletionFailed(format!("Failed preparing deletion: {}", e)))?;

    move_batch(paths, holding_dir.path(), |from, to| std::fs::rename(from, to))
        .map_err(|e| CatalogError::DeletionFailed(format!("Failed removing photos: {}", e)))?;

    // Every photo is out of the library now, a leftover holding dir is only clutter.
    if let Err(e) = holding_dir.close() {
        tracing::warn!("Failed cleaning up deleted photos: {}", e);
    }
    Ok(())
}

#[async_trait]
impl PhotoCatalogOps for DirectoryPhotoCatalog {
    async fn authorization_status(&self) -> AuthorizationStatus {
        self.check_access()
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        // Directory access cannot be granted interactively.
        self.check_access()
    }

    async fn list_photos(&self, sort_order: SortOrder) -> Result<Vec<PhotoRef>, CatalogError> {
        if !self.check_access().allows_access() {
            return Err(CatalogError::AccessDenied);
        }

        let root = self.root.clone();
        let mut photos = task::spawn_blocking(move || {
            let mut photos = Vec::new();
            collect_photos(&root, &root, &mut photos).map(|_| photos)
        })
        .await?;

        sort_photos(&mut photos, sort_order);
        tracing::debug!(
            "Listed {} photos from {}",
            photos.len(),
            self.root.display()
        );
        Ok(photos)
    }

    async fn fetch_preview(
        &self,
        id: &PhotoId,
        target_size: PreviewSize,
    ) -> Result<Preview, CatalogError> {
        let path = self.resolve(id)?;
        if !path.is_file() {
            return Err(CatalogError::NotFound(id.clone()));
        }

        task::spawn_blocking(move || thumbnails::render_preview(&path, target_size))
            .await
            .map_err(|e| CatalogError::Preview(e.to_string()))
    }

    async fn existing_ids(&self, ids: &[PhotoId]) -> Result<Vec<PhotoId>, CatalogError> {
        Ok(ids
            .iter()
            .filter(|id| {
                self.resolve(id)
                    .map(|path| path.is_file())
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn delete_permanently(&self, ids: &[PhotoId]) -> Result<(), CatalogError> {
        // Validate the whole batch before touching anything.
        let mut paths = Vec::with_capacity(ids.len());
        for id in ids {
            let path = self.resolve(id)?;
            if !path.is_file() {
                tracing::warn!("Refusing deletion batch, photo {} does not exist", id);
                return Err(CatalogError::NotFound(id.clone()));
            }
            paths.push(path);
        }

        tracing::info!("Permanently deleting {} photos", paths.len());
        let root = self.root.clone();
        task::spawn_blocking(move || delete_batch(&root, &paths)).await
    }
}
