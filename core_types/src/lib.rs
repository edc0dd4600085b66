pub mod events;

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone)]
pub enum CoreTypeError {
    ConversionError(String),
}

impl std::fmt::Display for CoreTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreTypeError::ConversionError(msg) => write!(f, "Conversion Error: {}", msg),
        }
    }
}

/// Opaque photo handle issued by the photo catalog.
///
/// The value is never interpreted; two ids are the same photo only when the
/// strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(String);

impl PhotoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRef {
    pub id: PhotoId,
    pub created_at: DateTime<Utc>,
}

impl PhotoRef {
    pub fn new(id: impl Into<PhotoId>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
        }
    }
}

/// Cached preview image kept alongside a staged photo.
///
/// Bytes are shared so cloning a staged entry never copies the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub bytes: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

impl Preview {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes: bytes.into(),
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl PreviewSize {
    /// Size used for the staging area grid.
    pub const GRID: PreviewSize = PreviewSize {
        width: 200,
        height: 200,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
pub enum SortOrder {
    #[default]
    #[strum(serialize = "newest")]
    NewestFirst,
    #[strum(serialize = "oldest")]
    OldestFirst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AuthorizationStatus {
    #[strum(serialize = "Not Determined")]
    NotDetermined,
    Authorized,
    Limited,
    Denied,
    Restricted,
}

impl AuthorizationStatus {
    pub fn allows_access(&self) -> bool {
        matches!(
            self,
            AuthorizationStatus::Authorized | AuthorizationStatus::Limited
        )
    }
}

/// Actions that can be held back behind the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Feature {
    #[strum(serialize = "swipe_delete")]
    SwipeDelete,
    #[strum(serialize = "bulk_delete")]
    BulkDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Access {
    Granted,
    Blocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
pub enum SettingName {
    OnboardingComplete,
    ProEnabled,
    PhotoDeletionCount,
    SwipeThreshold,
    SortOrder,
    HasSelectedPhotoGroup,
    DeveloperMode,
}

impl SettingName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingName::OnboardingComplete => "has_completed_onboarding",
            SettingName::ProEnabled => "pro_enabled",
            SettingName::PhotoDeletionCount => "photo_deletion_count",
            SettingName::SwipeThreshold => "swipe_threshold",
            SettingName::SortOrder => "sort_order",
            SettingName::HasSelectedPhotoGroup => "has_selected_photo_group",
            SettingName::DeveloperMode => "developer_mode",
        }
    }
}

impl TryFrom<&str> for SettingName {
    type Error = CoreTypeError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        use strum::IntoEnumIterator;
        SettingName::iter()
            .find(|name| name.as_str() == value)
            .ok_or_else(|| CoreTypeError::ConversionError(format!("Unknown setting: {}", value)))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_setting_name_round_trips_through_key() {
        for name in SettingName::iter() {
            assert_eq!(SettingName::try_from(name.as_str()).unwrap(), name);
        }
        assert!(SettingName::try_from("unknown").is_err());
    }

    #[test]
    fn test_sort_order_parses_cli_names() {
        assert_eq!(SortOrder::from_str("newest").unwrap(), SortOrder::NewestFirst);
        assert_eq!(SortOrder::from_str("oldest").unwrap(), SortOrder::OldestFirst);
        assert_eq!(SortOrder::OldestFirst.to_string(), "oldest");
    }

    #[test]
    fn test_authorization_status_access() {
        assert!(AuthorizationStatus::Authorized.allows_access());
        assert!(AuthorizationStatus::Limited.allows_access());
        assert!(!AuthorizationStatus::Denied.allows_access());
        assert!(!AuthorizationStatus::Restricted.allows_access());
        assert!(!AuthorizationStatus::NotDetermined.allows_access());
    }
}
