//! Subscription lifecycle manager for the legacy transport.

use super::{FeedSubscription, SubscriptionDescriptor};
use crate::error::SubscriptionError;
use crate::mapping::{FieldChange, RawFieldUpdate};
use crate::stream::{SubscriptionFeed, SubscriptionStream, DEFAULT_EVENT_QUEUE_SIZE};
use crate::transport::{LegacyItemUpdate, LegacyTableListener, TableKey};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const LEGACY_SUBSCRIPTION_TAG: &str = "LegacySubscription:";

/// One logical subscription against the legacy SDK.
///
/// The legacy stack addresses a live subscription by the table key its
/// subscribe call returned, so the key is held here between subscribe and
/// unsubscribe. The object survives unsubscribe and can be subscribed
/// again.
pub struct LegacySubscription {
    descriptor: SubscriptionDescriptor,
    feed: Arc<SubscriptionFeed>,
    table: Mutex<Option<TableKey>>,
}

impl LegacySubscription {
    pub fn new(descriptor: SubscriptionDescriptor) -> Self {
        Self::with_queue_size(descriptor, DEFAULT_EVENT_QUEUE_SIZE)
    }

    /// `event_queue_size` bounds the per-cycle event buffer.
    pub fn with_queue_size(descriptor: SubscriptionDescriptor, event_queue_size: usize) -> Self {
        Self {
            descriptor,
            feed: Arc::new(SubscriptionFeed::new(event_queue_size)),
            table: Mutex::new(None),
        }
    }

    pub(crate) async fn begin_listening(&self) -> bool {
        self.feed.begin_listening().await
    }

    /// Fresh native table listener bound to this subscription's feed.
    pub(crate) fn relay(&self) -> Arc<dyn LegacyTableListener> {
        Arc::new(LegacyTableRelay {
            feed: Arc::clone(&self.feed),
        })
    }

    pub(crate) async fn store_table_key(&self, key: TableKey) {
        debug!("{LEGACY_SUBSCRIPTION_TAG} bound to {key}");
        *self.table.lock().await = Some(key);
    }

    pub(crate) async fn take_table_key(&self) -> Option<TableKey> {
        self.table.lock().await.take()
    }

    /// Synthetic entered-subscribed event. The legacy SDK has no
    /// "subscription established" callback, so the managing client emits
    /// this as soon as the table subscribe succeeds.
    pub(crate) async fn mark_subscribed(&self) {
        self.feed.emit_lifecycle(true).await;
    }

    pub(crate) async fn fail(&self, error: SubscriptionError) {
        self.feed.fail(error).await;
    }
}

#[async_trait]
impl FeedSubscription for LegacySubscription {
    fn descriptor(&self) -> &SubscriptionDescriptor {
        &self.descriptor
    }

    async fn events(&self) -> SubscriptionStream {
        self.feed.subscribe().await
    }
}

/// Native listener glue: legacy table callbacks onto the feed.
struct LegacyTableRelay {
    feed: Arc<SubscriptionFeed>,
}

#[async_trait]
impl LegacyTableListener for LegacyTableRelay {
    async fn on_update(&self, key: TableKey, update: LegacyItemUpdate) {
        debug!(
            "{LEGACY_SUBSCRIPTION_TAG} update from {key} for item {}",
            update.item
        );
        self.feed
            .emit_update(Arc::new(normalize_legacy(&update)))
            .await;
    }

    async fn on_unsubscribed_all(&self, key: TableKey) {
        debug!("{LEGACY_SUBSCRIPTION_TAG} {key} fully unsubscribed");
        self.feed.end().await;
    }
}

/// Direct copy of the legacy per-field wire state. Unchanged entries carry
/// only the old value, exactly as delivered; the substitution rule reads
/// them back out.
fn normalize_legacy(update: &LegacyItemUpdate) -> RawFieldUpdate {
    let mut raw = RawFieldUpdate::new(update.item.as_str());
    for (name, state) in update.fields() {
        raw.set_field(
            name,
            FieldChange {
                changed: state.changed,
                old_value: state.old_value.clone(),
                new_value: state.new_value.clone(),
            },
        );
    }
    raw
}
