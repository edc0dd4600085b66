use std::{collections::HashMap, str::FromStr, sync::Arc};

use core_types::{SettingName, SortOrder};
use database::repository_manager::RepositoryManager;

use crate::{error::Error, triage_session::DEFAULT_SWIPE_THRESHOLD};

/// Persisted flags and preferences read at session start.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub onboarding_complete: bool,
    pub pro_enabled: bool,
    pub photo_deletion_count: u32,
    pub swipe_threshold: f64,
    pub sort_order: SortOrder,
    pub has_selected_photo_group: bool,
    pub developer_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            onboarding_complete: false,
            pro_enabled: false,
            photo_deletion_count: 0,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            sort_order: SortOrder::NewestFirst,
            has_selected_photo_group: false,
            developer_mode: false,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(value.trim(), "true" | "1")
}

fn bool_value(value: bool) -> String {
    if value {
        "true".to_string()
    } else {
        "false".to_string()
    }
}

impl From<HashMap<String, String>> for AppSettings {
    fn from(map: HashMap<String, String>) -> Self {
        let defaults = AppSettings::default();
        let get = |name: SettingName| map.get(name.as_str()).map(String::as_str);

        Self {
            onboarding_complete: get(SettingName::OnboardingComplete)
                .map(parse_bool)
                .unwrap_or(defaults.onboarding_complete),
            pro_enabled: get(SettingName::ProEnabled)
                .map(parse_bool)
                .unwrap_or(defaults.pro_enabled),
            photo_deletion_count: get(SettingName::PhotoDeletionCount)
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.photo_deletion_count),
            swipe_threshold: get(SettingName::SwipeThreshold)
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(defaults.swipe_threshold),
            sort_order: get(SettingName::SortOrder)
                .and_then(|v| SortOrder::from_str(v).ok())
                .unwrap_or(defaults.sort_order),
            has_selected_photo_group: get(SettingName::HasSelectedPhotoGroup)
                .map(parse_bool)
                .unwrap_or(defaults.has_selected_photo_group),
            developer_mode: get(SettingName::DeveloperMode)
                .map(parse_bool)
                .unwrap_or(defaults.developer_mode),
        }
    }
}

/// Service for reading and changing persisted application settings.
#[derive(Debug)]
pub struct SettingsService {
    repository_manager: Arc<RepositoryManager>,
}

impl SettingsService {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self { repository_manager }
    }

    /// Load settings from database. Missing or unparsable values fall back to defaults.
    pub async fn load_settings(&self) -> Result<AppSettings, Error> {
        let settings_map = self
            .repository_manager
            .get_settings_repository()
            .get_settings()
            .await
            .map_err(|e| Error::DbError(format!("Failed to load settings: {}", e)))?;

        Ok(AppSettings::from(settings_map))
    }

    pub async fn complete_onboarding(&self) -> Result<(), Error> {
        self.store(SettingName::OnboardingComplete, bool_value(true))
            .await
    }

    /// Show onboarding and photo group selection again on next start.
    pub async fn reset_onboarding(&self) -> Result<(), Error> {
        let settings_map = HashMap::from([
            (SettingName::OnboardingComplete, bool_value(false)),
            (SettingName::HasSelectedPhotoGroup, bool_value(false)),
        ]);
        self.repository_manager
            .get_settings_repository()
            .add_or_update_settings(&settings_map)
            .await
            .map_err(|e| Error::DbError(format!("Failed to reset onboarding: {}", e)))
    }

    pub async fn set_swipe_threshold(&self, threshold: f64) -> Result<(), Error> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "Swipe threshold must be a positive number, got {}",
                threshold
            )));
        }
        self.store(SettingName::SwipeThreshold, threshold.to_string())
            .await
    }

    pub async fn set_sort_order(&self, sort_order: SortOrder) -> Result<(), Error> {
        self.store(SettingName::SortOrder, sort_order.to_string())
            .await
    }

    pub async fn set_has_selected_photo_group(&self, selected: bool) -> Result<(), Error> {
        self.store(SettingName::HasSelectedPhotoGroup, bool_value(selected))
            .await
    }

    pub async fn set_developer_mode(&self, enabled: bool) -> Result<(), Error> {
        self.store(SettingName::DeveloperMode, bool_value(enabled))
            .await
    }

    async fn store(&self, name: SettingName, value: String) -> Result<(), Error> {
        self.repository_manager
            .get_settings_repository()
            .add_or_update_setting(&name, &value)
            .await
            .map_err(|e| Error::SettingsError(format!("Failed to save {}: {}", name.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::setup_test_db;

    async fn service() -> SettingsService {
        let pool = Arc::new(setup_test_db().await);
        let repo_manager = Arc::new(RepositoryManager::new(pool));
        SettingsService::new(repo_manager)
    }

    #[async_std::test]
    async fn test_load_settings_empty() {
        let service = service().await;
        let settings = service.load_settings().await.unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[async_std::test]
    async fn test_save_and_load_settings() {
        let service = service().await;
        service.complete_onboarding().await.unwrap();
        service.set_swipe_threshold(80.0).await.unwrap();
        service.set_sort_order(SortOrder::OldestFirst).await.unwrap();
        service.set_has_selected_photo_group(true).await.unwrap();
        service.set_developer_mode(true).await.unwrap();

        let settings = service.load_settings().await.unwrap();
        assert!(settings.onboarding_complete);
        assert_eq!(settings.swipe_threshold, 80.0);
        assert_eq!(settings.sort_order, SortOrder::OldestFirst);
        assert!(settings.has_selected_photo_group);
        assert!(settings.developer_mode);

        service.reset_onboarding().await.unwrap();
        let settings = service.load_settings().await.unwrap();
        assert!(!settings.onboarding_complete);
        assert!(!settings.has_selected_photo_group);
    }

    #[async_std::test]
    async fn test_invalid_threshold_rejected() {
        let service = service().await;
        assert!(matches!(
            service.set_swipe_threshold(-5.0).await,
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            service.set_swipe_threshold(f64::NAN).await,
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_settings_from_map_ignores_garbage() {
        let map = HashMap::from([
            (SettingName::SwipeThreshold.as_str().to_string(), "-3".to_string()),
            (SettingName::SortOrder.as_str().to_string(), "sideways".to_string()),
            (SettingName::PhotoDeletionCount.as_str().to_string(), "7".to_string()),
            (SettingName::ProEnabled.as_str().to_string(), "1".to_string()),
        ]);
        let settings = AppSettings::from(map);
        assert_eq!(settings.swipe_threshold, DEFAULT_SWIPE_THRESHOLD);
        assert_eq!(settings.sort_order, SortOrder::NewestFirst);
        assert_eq!(settings.photo_deletion_count, 7);
        assert!(settings.pro_enabled);
    }
}
