//! Per-request state threaded through every access-layer call.
//!
//! A `RequestContext` is cheap to clone: clones share the account slot, the
//! entity caches and the feature slots. Builders (`with_*`) return a new
//! context and leave the receiver untouched.

pub mod device;
pub mod features;

use arc_swap::ArcSwapOption;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cache::EntityGroupCache;
use crate::services::auth::Account;

pub use device::{DeviceHeaders, Platform};
pub use features::{Feature, FeatureEvaluator};
use features::FeatureSlot;

#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Arc<str>,
    account: Arc<ArcSwapOption<Account>>,
    auth_token: Option<Arc<str>>,
    client_encryption_key: Option<Arc<str>>,
    query: Option<Arc<str>>,
    device: Option<Arc<DeviceHeaders>>,
    account_entities: EntityGroupCache,
    entities: EntityGroupCache,
    features: Arc<HashMap<Feature, Arc<FeatureSlot>>>,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Arc::from(request_id.into()),
            account: Arc::new(ArcSwapOption::empty()),
            auth_token: None,
            client_encryption_key: None,
            query: None,
            device: None,
            account_entities: EntityGroupCache::new(),
            entities: EntityGroupCache::new(),
            features: Arc::new(HashMap::new()),
            deadline: None,
        }
    }

    /// Context for work not tied to an inbound request
    pub fn background() -> Self {
        Self::new(uuid::Uuid::new_v4().to_string())
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    /// The authenticated account, if any. An account with an empty id counts
    /// as no account.
    pub fn account(&self) -> Option<Arc<Account>> {
        self.account
            .load_full()
            .filter(|account| !account.id.is_empty())
    }

    /// New context with its own account slot
    pub fn with_account(&self, account: Option<Account>) -> Self {
        Self {
            account: Arc::new(ArcSwapOption::new(account.map(Arc::new))),
            ..self.clone()
        }
    }

    /// Replace the account in place. Every clone sharing this slot observes
    /// the new account.
    pub fn swap_account(&self, account: Option<Account>) {
        self.account.store(account.map(Arc::new));
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn with_auth_token(&self, token: impl Into<String>) -> Self {
        Self {
            auth_token: Some(Arc::from(token.into())),
            ..self.clone()
        }
    }

    pub fn client_encryption_key(&self) -> Option<&str> {
        self.client_encryption_key.as_deref()
    }

    pub fn with_client_encryption_key(&self, key: impl Into<String>) -> Self {
        Self {
            client_encryption_key: Some(Arc::from(key.into())),
            ..self.clone()
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn with_query(&self, query: impl Into<String>) -> Self {
        Self {
            query: Some(Arc::from(query.into())),
            ..self.clone()
        }
    }

    pub fn device(&self) -> Option<&DeviceHeaders> {
        self.device.as_deref()
    }

    pub fn with_device(&self, device: DeviceHeaders) -> Self {
        Self {
            device: Some(Arc::new(device)),
            ..self.clone()
        }
    }

    /// Entities belonging to the authenticated account
    pub fn account_entities(&self) -> &EntityGroupCache {
        &self.account_entities
    }

    /// Entities looked up while serving this request
    pub fn entities(&self) -> &EntityGroupCache {
        &self.entities
    }

    pub fn with_feature(&self, feature: Feature, enabled: bool) -> Self {
        self.with_feature_slot(feature, FeatureSlot::Fixed(enabled))
    }

    pub fn with_lazy_feature<F>(&self, feature: Feature, evaluate: F) -> Self
    where
        F: Fn(RequestContext) -> BoxFuture<'static, bool> + Send + Sync + 'static,
    {
        self.with_feature_slot(feature, FeatureSlot::lazy(Arc::new(evaluate)))
    }

    fn with_feature_slot(&self, feature: Feature, slot: FeatureSlot) -> Self {
        let mut features = (*self.features).clone();
        features.insert(feature, Arc::new(slot));
        Self {
            features: Arc::new(features),
            ..self.clone()
        }
    }

    /// Unset features are disabled
    pub async fn feature_enabled(&self, feature: Feature) -> bool {
        match self.features.get(&feature) {
            Some(slot) => slot.resolve(self).await,
            None => false,
        }
    }

    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..self.clone()
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Same values, no deadline. Used for work that must outlive the request.
    pub fn detached(&self) -> Self {
        Self {
            deadline: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::AccountType;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn account(id: &str) -> Account {
        Account {
            id: id.to_string(),
            account_type: AccountType::Provider,
            ..Default::default()
        }
    }

    #[test]
    fn test_swap_account_is_seen_by_clones() {
        let ctx = RequestContext::new("r").with_account(None);
        let clone = ctx.clone();
        assert!(clone.account().is_none());

        ctx.swap_account(Some(account("a_1")));
        assert_eq!(clone.account().map(|a| a.id.clone()), Some("a_1".to_string()));
    }

    #[test]
    fn test_with_account_gets_new_slot() {
        let ctx = RequestContext::new("r").with_account(Some(account("a_1")));
        let other = ctx.with_account(Some(account("a_2")));
        ctx.swap_account(Some(account("a_3")));

        assert_eq!(other.account().map(|a| a.id.clone()), Some("a_2".to_string()));
    }

    #[test]
    fn test_empty_account_id_is_no_account() {
        let ctx = RequestContext::new("r").with_account(Some(Account::default()));
        assert!(ctx.account().is_none());
    }

    #[test]
    fn test_detached_drops_deadline_keeps_values() {
        let ctx = RequestContext::new("r")
            .with_auth_token("tok")
            .with_timeout(Duration::from_secs(5));
        assert!(ctx.deadline().is_some());

        let detached = ctx.detached();
        assert!(detached.deadline().is_none());
        assert_eq!(detached.auth_token(), Some("tok"));
        assert_eq!(detached.request_id(), "r");
    }

    #[tokio::test]
    async fn test_unset_feature_is_disabled() {
        let ctx = RequestContext::new("r").with_feature(Feature::Payments, true);
        assert!(ctx.feature_enabled(Feature::Payments).await);
        assert!(!ctx.feature_enabled(Feature::VideoCalling).await);
    }

    #[tokio::test]
    async fn test_lazy_feature_evaluates_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let ctx = RequestContext::new("r").with_lazy_feature(Feature::VideoCalling, move |_| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                true
            }
            .boxed()
        });

        let results = futures::future::join_all(
            (0..8).map(|_| {
                let ctx = ctx.clone();
                async move { ctx.feature_enabled(Feature::VideoCalling).await }
            }),
        )
        .await;

        assert!(results.into_iter().all(|enabled| enabled));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_feature_builders_do_not_mutate_parent() {
        let parent = RequestContext::new("r");
        let child = parent.with_feature(Feature::CarePlans, true);
        assert!(child.feature_enabled(Feature::CarePlans).await);
        assert!(!parent.feature_enabled(Feature::CarePlans).await);
    }
}
