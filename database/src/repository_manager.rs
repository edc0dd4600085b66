use std::sync::Arc;

use sqlx::{Pool, Sqlite};

use crate::repository::setting_repository::SettingRepository;

#[derive(Debug)]
pub struct RepositoryManager {
    setting_repository: SettingRepository,
}

impl RepositoryManager {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        let setting_repository = SettingRepository::new(pool);

        Self { setting_repository }
    }

    pub fn get_settings_repository(&self) -> &SettingRepository {
        &self.setting_repository
    }
}
