use std::sync::Arc;

use async_trait::async_trait;
use core_types::{Access, Feature, SettingName};
use database::repository_manager::RepositoryManager;

use crate::{entitlement::EntitlementGate, error::Error, settings_service::parse_bool};

/// Number of swipe deletions a free user gets before the paywall shows.
pub const FREE_PHOTO_DELETION_LIMIT: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanPeriod {
    Monthly,
    Annual,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionPlan {
    pub identifier: &'static str,
    pub product_id: &'static str,
    pub title: &'static str,
    pub price: &'static str,
    pub period: PlanPeriod,
}

/// Plans offered by the built-in purchase stand-in.
pub const OFFERINGS: &[SubscriptionPlan] = &[
    SubscriptionPlan {
        identifier: "monthly",
        product_id: "com.swipely.monthly",
        title: "Monthly Plan",
        price: "$2.99",
        period: PlanPeriod::Monthly,
    },
    SubscriptionPlan {
        identifier: "yearly",
        product_id: "com.swipely.yearly",
        title: "Yearly Plan",
        price: "$19.99",
        period: PlanPeriod::Annual,
    },
];

/// Free tier policy backed by persisted settings.
///
/// Free users get [`FREE_PHOTO_DELETION_LIMIT`] swipe deletions; each granted
/// deletion is counted. Pro users are never blocked. Purchases go through a
/// local stand-in that always succeeds, standing in for a store SDK.
#[derive(Debug)]
pub struct ProAccessGate {
    repository_manager: Arc<RepositoryManager>,
    free_deletion_limit: u32,
}

impl ProAccessGate {
    pub fn new(repository_manager: Arc<RepositoryManager>) -> Self {
        Self::with_limit(repository_manager, FREE_PHOTO_DELETION_LIMIT)
    }

    pub fn with_limit(repository_manager: Arc<RepositoryManager>, free_deletion_limit: u32) -> Self {
        Self {
            repository_manager,
            free_deletion_limit,
        }
    }

    pub async fn is_pro(&self) -> Result<bool, Error> {
        let value = self
            .repository_manager
            .get_settings_repository()
            .get_setting(&SettingName::ProEnabled)
            .await?;
        Ok(value.as_deref().map(parse_bool).unwrap_or(false))
    }

    pub async fn deletion_count(&self) -> Result<u32, Error> {
        let value = self
            .repository_manager
            .get_settings_repository()
            .get_setting(&SettingName::PhotoDeletionCount)
            .await?;
        Ok(value.and_then(|v| v.parse().ok()).unwrap_or(0))
    }

    pub async fn remaining_free_deletions(&self) -> Result<Option<u32>, Error> {
        if self.is_pro().await? {
            return Ok(None);
        }
        let used = self.deletion_count().await?;
        Ok(Some(self.free_deletion_limit.saturating_sub(used)))
    }

    pub fn offerings(&self) -> &'static [SubscriptionPlan] {
        OFFERINGS
    }

    /// Buy the plan named `plan_identifier`. The stand-in store accepts every known plan.
    pub async fn purchase(&self, plan_identifier: &str) -> Result<bool, Error> {
        let plan = OFFERINGS
            .iter()
            .find(|plan| plan.identifier == plan_identifier)
            .ok_or_else(|| {
                Error::InvalidInput(format!("Unknown subscription plan: {}", plan_identifier))
            })?;
        tracing::info!("Purchasing subscription plan {}", plan.product_id);
        self.enable_pro().await?;
        Ok(true)
    }

    /// Returns true when a previous purchase was found and pro is active again.
    pub async fn restore_purchases(&self) -> Result<bool, Error> {
        let restored = self.is_pro().await?;
        tracing::info!("Restore purchases: pro status found = {}", restored);
        Ok(restored)
    }

    pub async fn reset_deletion_count(&self) -> Result<(), Error> {
        self.store_deletion_count(0).await
    }

    /// Forget the pro flag entirely, as if nothing was ever bought.
    pub async fn reset_pro_status(&self) -> Result<(), Error> {
        self.repository_manager
            .get_settings_repository()
            .delete_setting(&SettingName::ProEnabled)
            .await?;
        Ok(())
    }

    async fn enable_pro(&self) -> Result<(), Error> {
        self.repository_manager
            .get_settings_repository()
            .add_or_update_setting(&SettingName::ProEnabled, "true")
            .await?;
        Ok(())
    }

    async fn store_deletion_count(&self, count: u32) -> Result<(), Error> {
        self.repository_manager
            .get_settings_repository()
            .add_or_update_setting(&SettingName::PhotoDeletionCount, &count.to_string())
            .await?;
        Ok(())
    }

    async fn try_check_access(&self, feature: Feature) -> Result<Access, Error> {
        if self.is_pro().await? {
            return Ok(Access::Granted);
        }

        match feature {
            // Emptying the staging area is always allowed so nothing gets stuck there.
            Feature::BulkDelete => Ok(Access::Granted),
            Feature::SwipeDelete => {
                let used = self.deletion_count().await?;
                if used >= self.free_deletion_limit {
                    return Ok(Access::Blocked);
                }
                self.store_deletion_count(used + 1).await?;
                Ok(Access::Granted)
            }
        }
    }
}

#[async_trait]
impl EntitlementGate for ProAccessGate {
    async fn check_access(&self, feature: Feature) -> Access {
        match self.try_check_access(feature).await {
            Ok(access) => {
                if access == Access::Blocked {
                    tracing::info!("Access to {} blocked, free allowance used up", feature);
                }
                access
            }
            Err(e) => {
                tracing::error!("Failed checking access to {}: {}", feature, e);
                Access::Blocked
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use database::setup_test_db;

    use super::*;

    async fn gate(limit: u32) -> ProAccessGate {
        let pool = Arc::new(setup_test_db().await);
        let repository_manager = Arc::new(RepositoryManager::new(pool));
        ProAccessGate::with_limit(repository_manager, limit)
    }

    #[async_std::test]
    async fn test_free_user_blocked_after_limit() {
        let gate = gate(2).await;
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Granted);
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Granted);
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Blocked);
        // Blocked checks do not consume anything.
        assert_eq!(gate.deletion_count().await.unwrap(), 2);
        assert_eq!(gate.remaining_free_deletions().await.unwrap(), Some(0));
        assert_eq!(gate.check_access(Feature::BulkDelete).await, Access::Granted);
    }

    #[async_std::test]
    async fn test_purchase_lifts_limit_and_can_be_restored() {
        let gate = gate(0).await;
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Blocked);
        assert!(!gate.restore_purchases().await.unwrap());

        assert!(gate.purchase("yearly").await.unwrap());
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Granted);
        assert!(gate.restore_purchases().await.unwrap());
        assert_eq!(gate.remaining_free_deletions().await.unwrap(), None);
        // Pro checks are not counted.
        assert_eq!(gate.deletion_count().await.unwrap(), 0);

        gate.reset_pro_status().await.unwrap();
        assert!(!gate.is_pro().await.unwrap());
        assert!(!gate.restore_purchases().await.unwrap());
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Blocked);
    }

    #[async_std::test]
    async fn test_unknown_plan_is_rejected() {
        let gate = gate(1).await;
        let result = gate.purchase("lifetime").await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert!(!gate.is_pro().await.unwrap());
        assert_eq!(gate.offerings().len(), 2);
    }

    #[async_std::test]
    async fn test_reset_deletion_count() {
        let gate = gate(1).await;
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Granted);
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Blocked);
        gate.reset_deletion_count().await.unwrap();
        assert_eq!(gate.check_access(Feature::SwipeDelete).await, Access::Granted);
    }
}
