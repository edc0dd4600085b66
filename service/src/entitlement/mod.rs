//! Access checks for actions that can be held behind the paywall.

pub mod pro_access_gate;

use async_trait::async_trait;
use core_types::{Access, Feature};

/// Decides whether a gated action may run.
///
/// A `Blocked` answer must leave every piece of review state untouched; the
/// caller treats it like a cancelled gesture.
#[async_trait]
pub trait EntitlementGate: Send + Sync {
    async fn check_access(&self, feature: Feature) -> Access;
}

/// Gate that never blocks, for builds without a paywall.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysGranted;

#[async_trait]
impl EntitlementGate for AlwaysGranted {
    async fn check_access(&self, _feature: Feature) -> Access {
        Access::Granted
    }
}
