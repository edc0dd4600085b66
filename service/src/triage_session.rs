//! One-photo-at-a-time review queue.
//!
//! The queue is a stable review log: deleting a photo stages it and moves the
//! cursor forward, the photo itself stays in `items`. The number of reviewed
//! photos is therefore always the cursor position.

use core_types::{AuthorizationStatus, PhotoRef, Preview};

use crate::staging_store::StagingStore;

pub const DEFAULT_SWIPE_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Keep,
    Delete,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    NotAuthorized,
    EmptyCatalog,
    InProgress,
    Complete,
}

/// Maps a horizontal drag distance to an outcome.
///
/// Negative distances are swipes to the left. A drag that does not travel
/// further than `threshold` either way springs back and is a `Cancel`.
pub fn resolve_swipe(horizontal_distance: f64, threshold: f64) -> SwipeOutcome {
    let threshold = threshold.abs();
    if horizontal_distance < -threshold {
        SwipeOutcome::Delete
    } else if horizontal_distance > threshold {
        SwipeOutcome::Keep
    } else {
        SwipeOutcome::Cancel
    }
}

#[derive(Debug, Default)]
pub struct TriageSession {
    items: Vec<PhotoRef>,
    position: usize,
    loaded: bool,
}

impl TriageSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue and start from its first photo.
    pub fn load_new_queue(&mut self, photos: Vec<PhotoRef>) {
        tracing::info!("Loaded review queue with {} photos", photos.len());
        self.items = photos;
        self.position = 0;
        self.loaded = true;
    }

    /// Start the current queue over. Staged photos are not touched.
    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn current_photo(&self) -> Option<&PhotoRef> {
        self.items.get(self.position)
    }

    /// Like [`resolve_swipe`], but always `Cancel` once there is nothing left to review.
    pub fn resolve_swipe(&self, horizontal_distance: f64, threshold: f64) -> SwipeOutcome {
        if self.current_photo().is_none() {
            return SwipeOutcome::Cancel;
        }
        resolve_swipe(horizontal_distance, threshold)
    }

    pub fn apply_outcome(
        &mut self,
        outcome: SwipeOutcome,
        staging: &mut StagingStore,
    ) -> Option<PhotoRef> {
        self.apply_outcome_with_preview(outcome, staging, None)
    }

    /// Apply `outcome` to the current photo and return the photo it applied to.
    ///
    /// `Cancel`, or any outcome with no current photo, changes nothing and
    /// returns `None`.
    pub fn apply_outcome_with_preview(
        &mut self,
        outcome: SwipeOutcome,
        staging: &mut StagingStore,
        preview: Option<Preview>,
    ) -> Option<PhotoRef> {
        if outcome == SwipeOutcome::Cancel {
            return None;
        }
        let photo = self.current_photo()?.clone();
        if outcome == SwipeOutcome::Delete {
            staging.stage(&photo, preview);
        }
        self.position += 1;
        Some(photo)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_count(&self) -> usize {
        self.items.len()
    }

    pub fn reviewed_count(&self) -> usize {
        self.position
    }

    pub fn remaining_count(&self) -> usize {
        self.items.len() - self.position
    }

    pub fn is_complete(&self) -> bool {
        self.loaded && !self.items.is_empty() && self.position == self.items.len()
    }

    /// `NotDetermined` means access has not been asked for yet, which is
    /// reported as `NotStarted` rather than as a refusal.
    pub fn state(&self, authorization: AuthorizationStatus) -> SessionState {
        if matches!(
            authorization,
            AuthorizationStatus::Denied | AuthorizationStatus::Restricted
        ) {
            SessionState::NotAuthorized
        } else if !self.loaded || authorization == AuthorizationStatus::NotDetermined {
            SessionState::NotStarted
        } else if self.items.is_empty() {
            SessionState::EmptyCatalog
        } else if self.position == self.items.len() {
            SessionState::Complete
        } else {
            SessionState::InProgress
        }
    }
}
