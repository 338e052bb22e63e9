//! Boundary traits for the modern streaming SDK.

use super::{ConnectDetails, TransportFailure};
use crate::subscription::SubscriptionDescriptor;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Session status callbacks from the unified SDK.
#[async_trait]
pub trait UnifiedStatusListener: Send + Sync {
    /// Raw wire status string (`CONNECTING`, `CONNECTED:WS-STREAMING`, ...).
    async fn on_status_change(&self, status: &str);

    /// The server refused or tore down the session.
    async fn on_server_error(&self, code: i32, message: &str);
}

/// Per-subscription callbacks from the unified SDK.
#[async_trait]
pub trait UnifiedSubscriptionListener: Send + Sync {
    /// The subscription is established server-side; updates may follow.
    async fn on_subscription(&self);

    /// The subscription was fully torn down. The listener registration is
    /// spent after this call and must not be reused.
    async fn on_unsubscription(&self);

    async fn on_item_update(&self, update: UnifiedItemUpdate);

    async fn on_subscription_error(&self, code: i32, message: &str);
}

/// Native subscription object of the unified SDK.
#[async_trait]
pub trait UnifiedSubscriptionHandle: Send + Sync {
    fn descriptor(&self) -> &SubscriptionDescriptor;

    async fn attach_listener(&self, listener: Arc<dyn UnifiedSubscriptionListener>);

    async fn clear_listeners(&self);
}

/// Native client object of the unified SDK.
///
/// `connect` and `disconnect` never fail synchronously; their outcome is
/// reported through the status listener. Subscribe calls can be rejected
/// inline.
#[async_trait]
pub trait UnifiedTransport: Send + Sync {
    async fn connect(&self, details: &ConnectDetails);

    async fn disconnect(&self);

    async fn add_status_listener(&self, listener: Arc<dyn UnifiedStatusListener>);

    async fn clear_status_listeners(&self);

    async fn build_subscription(
        &self,
        descriptor: &SubscriptionDescriptor,
    ) -> Arc<dyn UnifiedSubscriptionHandle>;

    async fn subscribe(
        &self,
        handle: &Arc<dyn UnifiedSubscriptionHandle>,
    ) -> Result<(), TransportFailure>;

    async fn unsubscribe(
        &self,
        handle: &Arc<dyn UnifiedSubscriptionHandle>,
    ) -> Result<(), TransportFailure>;
}

/// One push from the unified SDK: the full current value of every schema
/// field, plus the set of fields this push changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedItemUpdate {
    pub item: String,
    values: HashMap<String, Option<String>>,
    changed: HashSet<String>,
}

impl UnifiedItemUpdate {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Option<&str>, changed: bool) -> Self {
        let name = name.into();
        if changed {
            self.changed.insert(name.clone());
        }
        self.values.insert(name, value.map(str::to_owned));
        self
    }

    /// Every field of the push with its current value.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> + '_ {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn is_changed(&self, name: &str) -> bool {
        self.changed.contains(name)
    }
}
