use std::{collections::HashMap, sync::Arc};

use core_types::SettingName;
use sqlx::{Pool, Sqlite};

use crate::database_error::DatabaseError;

#[derive(Debug)]
pub struct SettingRepository {
    pool: Arc<Pool<Sqlite>>,
}

impl SettingRepository {
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        Self { pool }
    }

    pub async fn get_settings(&self) -> Result<HashMap<String, String>, DatabaseError> {
        let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM setting")
            .fetch_all(&*self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    pub async fn get_setting(&self, key: &SettingName) -> Result<Option<String>, DatabaseError> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM setting WHERE key = ?")
            .bind(key.as_str())
            .fetch_optional(&*self.pool)
            .await?;
        Ok(row.map(|(value,)| value))
    }

    pub async fn add_or_update_setting(
        &self,
        key: &SettingName,
        value: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO setting (key, value)
             VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key.as_str())
        .bind(value)
        .execute(&*self.pool)
        .await?;
        tracing::debug!("Stored setting {}", key.as_str());
        Ok(())
    }

    pub async fn add_or_update_settings(
        &self,
        settings: &HashMap<SettingName, String>,
    ) -> Result<(), DatabaseError> {
        let mut transaction = self.pool.begin().await?;
        for (key, value) in settings {
            sqlx::query(
                "INSERT INTO setting (key, value)
                 VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key.as_str())
            .bind(value)
            .execute(&mut *transaction)
            .await?;
        }
        transaction.commit().await?;
        Ok(())
    }

    pub async fn delete_setting(&self, key: &SettingName) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM setting WHERE key = ?")
            .bind(key.as_str())
            .execute(&*self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use core_types::SettingName;

    use crate::setup_test_db;

    use super::SettingRepository;

    #[async_std::test]
    async fn test_get_settings() {
        let pool = Arc::new(setup_test_db().await);
        let repository = SettingRepository::new(pool.clone());
        repository
            .add_or_update_setting(&SettingName::SwipeThreshold, "120")
            .await
            .unwrap();

        let settings = repository.get_settings().await.unwrap();
        assert_eq!(
            settings.get(SettingName::SwipeThreshold.as_str()).unwrap(),
            "120"
        );

        repository
            .add_or_update_setting(&SettingName::SwipeThreshold, "80")
            .await
            .unwrap();

        let setting = repository
            .get_setting(&SettingName::SwipeThreshold)
            .await
            .unwrap();
        assert_eq!(setting.as_deref(), Some("80"));
    }

    #[async_std::test]
    async fn test_missing_setting_is_none() {
        let pool = Arc::new(setup_test_db().await);
        let repository = SettingRepository::new(pool);
        let setting = repository
            .get_setting(&SettingName::ProEnabled)
            .await
            .unwrap();
        assert!(setting.is_none());
    }

    #[async_std::test]
    async fn test_add_or_update_settings_and_delete() {
        let pool = Arc::new(setup_test_db().await);
        let repository = SettingRepository::new(pool);
        let settings = HashMap::from([
            (SettingName::OnboardingComplete, "true".to_string()),
            (SettingName::ProEnabled, "false".to_string()),
        ]);
        repository.add_or_update_settings(&settings).await.unwrap();
        assert_eq!(repository.get_settings().await.unwrap().len(), 2);

        repository
            .delete_setting(&SettingName::ProEnabled)
            .await
            .unwrap();
        let stored = repository.get_settings().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored.get(SettingName::OnboardingComplete.as_str()).unwrap(),
            "true"
        );
    }
}
