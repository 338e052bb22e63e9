//! Subscription lifecycle manager for the unified transport.

use super::{FeedSubscription, SubscriptionDescriptor};
use crate::error::SubscriptionError;
use crate::mapping::{FieldChange, RawFieldUpdate};
use crate::stream::{SubscriptionFeed, SubscriptionStream, DEFAULT_EVENT_QUEUE_SIZE};
use crate::transport::{
    UnifiedItemUpdate, UnifiedSubscriptionHandle, UnifiedSubscriptionListener, UnifiedTransport,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One logical subscription against the unified SDK.
///
/// Holds the immutable descriptor, the resettable event feed, and the
/// native subscription handle once the managing client has built it. The
/// object survives unsubscribe: a later subscribe starts a fresh event
/// cycle on the same instance.
pub struct UnifiedSubscription {
    descriptor: SubscriptionDescriptor,
    feed: Arc<SubscriptionFeed>,
    native: Mutex<Option<Arc<dyn UnifiedSubscriptionHandle>>>,
}

impl UnifiedSubscription {
    pub fn new(descriptor: SubscriptionDescriptor) -> Self {
        Self::with_queue_size(descriptor, DEFAULT_EVENT_QUEUE_SIZE)
    }

    /// `event_queue_size` bounds the per-cycle event buffer.
    pub fn with_queue_size(descriptor: SubscriptionDescriptor, event_queue_size: usize) -> Self {
        Self {
            descriptor,
            feed: Arc::new(SubscriptionFeed::new(event_queue_size)),
            native: Mutex::new(None),
        }
    }

    pub(crate) async fn begin_listening(&self) -> bool {
        self.feed.begin_listening().await
    }

    /// Fresh native listener bound to this subscription's feed.
    pub(crate) fn relay(&self) -> Arc<dyn UnifiedSubscriptionListener> {
        Arc::new(UnifiedSubscriptionRelay {
            feed: Arc::clone(&self.feed),
        })
    }

    /// The native handle, built through `transport` on first use and cached
    /// for the object's lifetime.
    pub(crate) async fn native_handle(
        &self,
        transport: &dyn UnifiedTransport,
    ) -> Arc<dyn UnifiedSubscriptionHandle> {
        let mut native = self.native.lock().await;
        if let Some(handle) = native.as_ref() {
            return Arc::clone(handle);
        }
        let handle = transport.build_subscription(&self.descriptor).await;
        *native = Some(Arc::clone(&handle));
        handle
    }

    pub(crate) async fn fail(&self, error: SubscriptionError) {
        self.feed.fail(error).await;
    }
}

#[async_trait]
impl FeedSubscription for UnifiedSubscription {
    fn descriptor(&self) -> &SubscriptionDescriptor {
        &self.descriptor
    }

    async fn events(&self) -> SubscriptionStream {
        self.feed.subscribe().await
    }
}

/// Native listener glue: unified subscription callbacks onto the feed.
struct UnifiedSubscriptionRelay {
    feed: Arc<SubscriptionFeed>,
}

#[async_trait]
impl UnifiedSubscriptionListener for UnifiedSubscriptionRelay {
    async fn on_subscription(&self) {
        self.feed.emit_lifecycle(true).await;
    }

    async fn on_unsubscription(&self) {
        self.feed.end().await;
    }

    async fn on_item_update(&self, update: UnifiedItemUpdate) {
        self.feed
            .emit_update(Arc::new(normalize_unified(&update)))
            .await;
    }

    async fn on_subscription_error(&self, code: i32, message: &str) {
        self.feed
            .fail(SubscriptionError::classified(code, message))
            .await;
    }
}

/// The unified SDK resends the full field state with changed flags. A
/// changed entry carries the current value on both sides so the
/// substitution rule lands on it either way.
fn normalize_unified(update: &UnifiedItemUpdate) -> RawFieldUpdate {
    let mut raw = RawFieldUpdate::new(update.item.as_str());
    for (name, value) in update.fields() {
        let change = if update.is_changed(name) {
            FieldChange::changed(value, value)
        } else {
            FieldChange::unchanged(value)
        };
        raw.set_field(name, change);
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::{normalize_unified, UnifiedSubscription};
    use crate::subscription::{FeedSubscription, SubscriptionDescriptor};
    use crate::taxonomy::{SubscriptionErrorKind, SubscriptionMode};
    use crate::transport::{
        ConnectDetails, TransportFailure, UnifiedItemUpdate, UnifiedStatusListener,
        UnifiedSubscriptionHandle, UnifiedSubscriptionListener, UnifiedTransport,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn descriptor() -> SubscriptionDescriptor {
        SubscriptionDescriptor::new(
            SubscriptionMode::Merge,
            "QUOTE_ADAPTER",
            ["item1"],
            ["stock_name", "last_price"],
            true,
        )
    }

    struct StubHandle {
        descriptor: SubscriptionDescriptor,
    }

    #[async_trait]
    impl UnifiedSubscriptionHandle for StubHandle {
        fn descriptor(&self) -> &SubscriptionDescriptor {
            &self.descriptor
        }

        async fn attach_listener(&self, _listener: Arc<dyn UnifiedSubscriptionListener>) {}

        async fn clear_listeners(&self) {}
    }

    struct StubTransport {
        builds: AtomicUsize,
    }

    #[async_trait]
    impl UnifiedTransport for StubTransport {
        async fn connect(&self, _details: &ConnectDetails) {}

        async fn disconnect(&self) {}

        async fn add_status_listener(&self, _listener: Arc<dyn UnifiedStatusListener>) {}

        async fn clear_status_listeners(&self) {}

        async fn build_subscription(
            &self,
            descriptor: &SubscriptionDescriptor,
        ) -> Arc<dyn UnifiedSubscriptionHandle> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            Arc::new(StubHandle {
                descriptor: descriptor.clone(),
            })
        }

        async fn subscribe(
            &self,
            _handle: &Arc<dyn UnifiedSubscriptionHandle>,
        ) -> Result<(), TransportFailure> {
            Ok(())
        }

        async fn unsubscribe(
            &self,
            _handle: &Arc<dyn UnifiedSubscriptionHandle>,
        ) -> Result<(), TransportFailure> {
            Ok(())
        }
    }

    #[test]
    fn normalization_honors_the_changed_flags() {
        let update = UnifiedItemUpdate::new("item1")
            .with_field("last_price", Some("0.05"), true)
            .with_field("stock_name", Some("Test stock"), false)
            .with_field("ref_price", None, false);

        let raw = normalize_unified(&update);

        assert_eq!(raw.item, "item1");
        assert_eq!(raw.field_count(), 3);
        let price = raw.field("last_price").unwrap();
        assert!(price.changed);
        assert_eq!(price.new_value.as_deref(), Some("0.05"));
        assert_eq!(price.old_value.as_deref(), Some("0.05"));
        let name = raw.field("stock_name").unwrap();
        assert!(!name.changed);
        assert_eq!(name.old_value.as_deref(), Some("Test stock"));
        assert_eq!(name.new_value, None);
        assert_eq!(raw.effective_value("ref_price"), None);
    }

    #[tokio::test]
    async fn relay_drives_one_full_event_cycle() {
        let subscription = UnifiedSubscription::new(descriptor());
        subscription.begin_listening().await;
        let mut stream = subscription.events().await;
        let relay = subscription.relay();

        relay.on_subscription().await;
        relay
            .on_item_update(UnifiedItemUpdate::new("item1").with_field(
                "last_price",
                Some("3.04"),
                true,
            ))
            .await;
        relay.on_unsubscription().await;

        let entered = stream.next().await.unwrap().unwrap();
        assert!(entered.is_lifecycle());
        assert!(entered.subscribed());

        let data = stream.next().await.unwrap().unwrap();
        let raw = data.item().unwrap();
        assert_eq!(raw.effective_value("last_price"), Some("3.04"));

        let left = stream.next().await.unwrap().unwrap();
        assert!(left.is_lifecycle());
        assert!(!left.subscribed());
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn relay_classifies_native_subscription_errors() {
        let subscription = UnifiedSubscription::new(descriptor());
        subscription.begin_listening().await;
        let mut stream = subscription.events().await;

        subscription.relay().on_subscription_error(21, "no such group").await;

        let error = stream.next().await.unwrap().unwrap_err();
        assert_eq!(error.kind, Some(SubscriptionErrorKind::UnknownGroup));
        assert_eq!(error.code, 21);
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn native_handle_is_built_once_and_cached() {
        let subscription = UnifiedSubscription::new(descriptor());
        let transport = StubTransport {
            builds: AtomicUsize::new(0),
        };

        let first = subscription.native_handle(&transport).await;
        let second = subscription.native_handle(&transport).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.builds.load(Ordering::SeqCst), 1);
        assert_eq!(first.descriptor().data_adapter(), "QUOTE_ADAPTER");
    }
}
