//! Holding area for photos the user marked for deletion.
//!
//! Nothing here is irreversible: staged photos stay in the catalog until the
//! deletion committer removes them. The store keeps its selection a subset of
//! its entries after every operation.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use async_std::sync::RwLock;
use chrono::{DateTime, Utc};
use core_types::{PhotoId, PhotoRef, Preview};

/// Handle shared by every surface that shows or changes the staging area.
pub type SharedStagingStore = Arc<RwLock<StagingStore>>;

#[derive(Debug, Clone, PartialEq)]
pub struct StagedPhoto {
    pub id: PhotoId,
    /// When the photo was staged, or its capture time when that is unknown.
    pub captured_at: DateTime<Utc>,
    pub payload: Option<Preview>,
}

#[derive(Debug, Default)]
pub struct StagingStore {
    entries: HashMap<PhotoId, StagedPhoto>,
    selected: HashSet<PhotoId>,
}

impl StagingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStagingStore {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Stage `photo`, stamping it with the current time.
    pub fn stage(&mut self, photo: &PhotoRef, payload: Option<Preview>) {
        self.stage_at(photo, payload, Some(Utc::now()));
    }

    /// Stage `photo`. Staging an id that is already present replaces the
    /// earlier entry; the selection is left as it was.
    pub fn stage_at(
        &mut self,
        photo: &PhotoRef,
        payload: Option<Preview>,
        staged_at: Option<DateTime<Utc>>,
    ) {
        let staged = StagedPhoto {
            id: photo.id.clone(),
            captured_at: staged_at.unwrap_or(photo.created_at),
            payload,
        };
        self.entries.insert(photo.id.clone(), staged);
    }

    /// Restore a photo, dropping it from the entries and the selection.
    ///
    /// Returns `false` when the id was not staged.
    pub fn unstage(&mut self, id: &PhotoId) -> bool {
        self.selected.remove(id);
        self.entries.remove(id).is_some()
    }

    /// Returns the number of entries actually removed.
    pub fn unstage_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a PhotoId>) -> usize {
        ids.into_iter().filter(|id| self.unstage(id)).count()
    }

    pub fn toggle_selection(&mut self, id: &PhotoId) {
        if !self.entries.contains_key(id) {
            return;
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.entries.keys().cloned().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &PhotoId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &PhotoId) -> Option<&StagedPhoto> {
        self.entries.get(id)
    }

    /// Entries in the order they were staged.
    pub fn entries(&self) -> Vec<&StagedPhoto> {
        let mut entries: Vec<&StagedPhoto> = self.entries.values().collect();
        entries.sort_by(|a, b| {
            a.captured_at
                .cmp(&b.captured_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        entries
    }

    pub fn is_selected(&self, id: &PhotoId) -> bool {
        self.selected.contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Selected ids in staging order.
    pub fn selected_ids(&self) -> Vec<PhotoId> {
        self.entries()
            .into_iter()
            .filter(|entry| self.selected.contains(&entry.id))
            .map(|entry| entry.id.clone())
            .collect()
    }

    /// True when there is at least one entry and every entry is selected.
    pub fn is_all_selected(&self) -> bool {
        !self.entries.is_empty() && self.selected.len() == self.entries.len()
    }

    #[cfg(test)]
    fn selection_is_consistent(&self) -> bool {
        self.selected.iter().all(|id| self.entries.contains_key(id))
    }
}
