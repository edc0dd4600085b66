use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use core_types::PhotoRef;

/// Photos taken in the same calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoGroup {
    pub year: i32,
    pub month: u32,
    /// Photos in catalog order
    pub photos: Vec<PhotoRef>,
}

impl PhotoGroup {
    /// Stable key in `YYYY-MM` form.
    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Human readable name, e.g. "April 2025".
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|date| date.format("%B %Y").to_string())
            .unwrap_or_else(|| self.key())
    }

    /// Photo shown on the group card.
    pub fn cover(&self) -> Option<&PhotoRef> {
        self.photos.first()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }
}

/// Buckets photos by month, most recent month first.
pub fn group_by_month(photos: &[PhotoRef]) -> Vec<PhotoGroup> {
    let mut buckets: BTreeMap<(i32, u32), Vec<PhotoRef>> = BTreeMap::new();
    for photo in photos {
        let key = (photo.created_at.year(), photo.created_at.month());
        buckets.entry(key).or_default().push(photo.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), photos)| PhotoGroup {
            year,
            month,
            photos,
        })
        .collect()
}

pub fn find_group<'a>(groups: &'a [PhotoGroup], key: &str) -> Option<&'a PhotoGroup> {
    groups.iter().find(|group| group.key() == key)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn photo(id: &str, year: i32, month: u32, day: u32) -> PhotoRef {
        PhotoRef::new(id, Utc.with_ymd_and_hms(year, month, day, 10, 0, 0).unwrap())
    }

    #[test]
    fn test_group_by_month() {
        let photos = vec![
            photo("may-2", 2025, 5, 20),
            photo("apr-2", 2025, 4, 28),
            photo("may-1", 2025, 5, 2),
            photo("dec", 2024, 12, 31),
            photo("apr-1", 2025, 4, 1),
        ];

        let groups = group_by_month(&photos);
        let keys: Vec<_> = groups.iter().map(|g| g.key()).collect();
        assert_eq!(keys, vec!["2025-05", "2025-04", "2024-12"]);

        let may: Vec<_> = groups[0].photos.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(may, vec!["may-2", "may-1"]);
        assert_eq!(groups[0].cover().unwrap().id.as_str(), "may-2");
        assert_eq!(groups[1].label(), "April 2025");
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn test_group_by_month_empty_and_lookup() {
        assert!(group_by_month(&[]).is_empty());

        let groups = group_by_month(&[photo("a", 2023, 1, 1)]);
        assert!(find_group(&groups, "2023-01").is_some());
        assert!(find_group(&groups, "2023-02").is_none());
    }
}
