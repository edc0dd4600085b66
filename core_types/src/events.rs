use crate::PhotoId;

#[derive(Debug, Clone, PartialEq)]
pub enum DeletionEvent {
    Started { total_photos: usize },
    Completed { deleted_photos: usize },
    Failed { error: String },
}

/// Emitted by the session controller whenever the review state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum TriageEvent {
    QueueLoaded { total_photos: usize },
    PhotoKept { id: PhotoId },
    PhotoStaged { id: PhotoId },
    PhotoRestored { id: PhotoId },
    SwipeBlocked { id: PhotoId },
    SessionCompleted,
}
