use std::sync::{Arc, OnceLock};

use database::{get_db_pool, repository_manager::RepositoryManager};
use photo_catalog::PhotoCatalogOps;

use crate::{
    entitlement::pro_access_gate::ProAccessGate,
    error::Error,
    settings_service::{AppSettings, SettingsService},
    triage_service::AppContext,
};

pub async fn create_app_services() -> Result<Arc<AppServices>, Error> {
    let pool = get_db_pool().await?;
    let repository_manager = Arc::new(RepositoryManager::new(pool));
    Ok(Arc::new(AppServices::new(repository_manager)))
}

#[derive(Debug)]
pub struct AppServices {
    settings: OnceLock<Arc<SettingsService>>,
    pro_access: OnceLock<Arc<ProAccessGate>>,
    repository_manager: Arc<RepositoryManager>,
}

impl AppServices {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self {
            settings: OnceLock::new(),
            pro_access: OnceLock::new(),
            repository_manager,
        }
    }

    pub fn settings(&self) -> Arc<SettingsService> {
        self.settings
            .get_or_init(|| Arc::new(SettingsService::new(Arc::clone(&self.repository_manager))))
            .clone()
    }

    pub fn pro_access(&self) -> Arc<ProAccessGate> {
        self.pro_access
            .get_or_init(|| Arc::new(ProAccessGate::new(Arc::clone(&self.repository_manager))))
            .clone()
    }

    /// Build the context for a review session over `catalog` with the
    /// currently persisted settings.
    pub async fn app_context(&self, catalog: Arc<dyn PhotoCatalogOps>) -> Result<AppContext, Error> {
        let settings: AppSettings = self.settings().load_settings().await?;
        Ok(AppContext {
            catalog,
            entitlement_gate: self.pro_access(),
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use core_types::{PhotoRef, SortOrder};
    use database::setup_test_db;
    use photo_catalog::mock::MockPhotoCatalog;

    use super::*;
    use crate::triage_service::TriageService;

    #[async_std::test]
    async fn test_app_context_uses_persisted_settings() {
        let pool = Arc::new(setup_test_db().await);
        let services = AppServices::new(Arc::new(RepositoryManager::new(pool)));
        services
            .settings()
            .set_sort_order(SortOrder::OldestFirst)
            .await
            .unwrap();

        let catalog = MockPhotoCatalog::new(vec![
            PhotoRef::new("new", Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap()),
            PhotoRef::new("old", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
        ]);
        let context = services.app_context(Arc::new(catalog)).await.unwrap();
        assert_eq!(context.settings.sort_order, SortOrder::OldestFirst);

        let mut service = TriageService::new(context);
        service.start_session().await.unwrap();
        assert_eq!(service.current_photo().unwrap().id.as_str(), "old");
    }

    #[async_std::test]
    async fn test_services_are_created_once() {
        let pool = Arc::new(setup_test_db().await);
        let services = AppServices::new(Arc::new(RepositoryManager::new(pool)));
        assert!(Arc::ptr_eq(&services.pro_access(), &services.pro_access()));
    }
}
