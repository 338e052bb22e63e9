//! Connection manager for the unified transport.

use super::{FeedConnection, SubscriptionRegistry};
use crate::error::{ConnectionError, SubscriptionError};
use crate::stream::{StatusFeed, StatusStream, DEFAULT_EVENT_QUEUE_SIZE};
use crate::subscription::UnifiedSubscription;
use crate::taxonomy::ConnectionState;
use crate::transport::{ConnectDetails, UnifiedStatusListener, UnifiedTransport};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

const UNIFIED_CLIENT_TAG: &str = "UnifiedFeedClient:";

/// Client over the unified SDK.
///
/// Owns the native transport and the canonical status feed. All commands
/// are fire-and-forget; connection and subscription outcomes surface on
/// the respective streams only.
pub struct UnifiedFeedClient {
    transport: Arc<dyn UnifiedTransport>,
    status: Arc<StatusFeed>,
    registry: SubscriptionRegistry<UnifiedSubscription>,
}

impl UnifiedFeedClient {
    pub fn new(transport: Arc<dyn UnifiedTransport>) -> Self {
        Self::with_queue_size(transport, DEFAULT_EVENT_QUEUE_SIZE)
    }

    /// `event_queue_size` bounds the status broadcast buffer.
    pub fn with_queue_size(transport: Arc<dyn UnifiedTransport>, event_queue_size: usize) -> Self {
        Self {
            transport,
            status: Arc::new(StatusFeed::new(event_queue_size)),
            registry: SubscriptionRegistry::new(),
        }
    }
}

#[async_trait]
impl FeedConnection for UnifiedFeedClient {
    type Subscription = UnifiedSubscription;

    async fn connect(&self, details: ConnectDetails) {
        debug!("{UNIFIED_CLIENT_TAG} connecting to {}", details.host);
        // Old listeners would double-report once the fresh one is added.
        self.transport.clear_status_listeners().await;
        self.status.rearm().await;
        self.transport.connect(&details).await;
        let relay = Arc::new(UnifiedStatusRelay {
            status: Arc::clone(&self.status),
        });
        self.transport.add_status_listener(relay).await;
        self.status.relay(ConnectionState::Connecting).await;
    }

    async fn disconnect(&self) {
        debug!("{UNIFIED_CLIENT_TAG} disconnect requested");
        self.transport.disconnect().await;
    }

    async fn status_stream(&self) -> StatusStream {
        self.status.subscribe().await
    }

    async fn current_state(&self) -> ConnectionState {
        self.status.current().await
    }

    async fn subscribe(&self, subscription: Arc<UnifiedSubscription>) {
        if !subscription.begin_listening().await {
            debug!("{UNIFIED_CLIENT_TAG} subscription already listening, nothing to do");
            return;
        }
        let handle = subscription.native_handle(self.transport.as_ref()).await;
        handle.clear_listeners().await;
        handle.attach_listener(subscription.relay()).await;
        match self.transport.subscribe(&handle).await {
            Ok(()) => self.registry.insert(subscription).await,
            Err(failure) => {
                warn!("{UNIFIED_CLIENT_TAG} native subscribe rejected: {failure}");
                subscription
                    .fail(SubscriptionError::classified(failure.code, failure.message))
                    .await;
            }
        }
    }

    async fn unsubscribe(&self, subscription: &Arc<UnifiedSubscription>) {
        if !self.registry.remove(subscription).await {
            debug!("{UNIFIED_CLIENT_TAG} unsubscribe for an unregistered subscription, nothing to do");
            return;
        }
        let handle = subscription.native_handle(self.transport.as_ref()).await;
        if let Err(failure) = self.transport.unsubscribe(&handle).await {
            warn!("{UNIFIED_CLIENT_TAG} native unsubscribe failed: {failure}");
        }
    }

    async fn subscription_count(&self) -> usize {
        self.registry.count().await
    }

    async fn subscription_at(&self, index: usize) -> Option<Arc<UnifiedSubscription>> {
        self.registry.get(index).await
    }
}

/// Status listener glue: wire statuses and server errors onto the
/// canonical feed.
struct UnifiedStatusRelay {
    status: Arc<StatusFeed>,
}

#[async_trait]
impl UnifiedStatusListener for UnifiedStatusRelay {
    async fn on_status_change(&self, status: &str) {
        let Some(state) = ConnectionState::from_wire_status(status) else {
            warn!("{UNIFIED_CLIENT_TAG} ignoring unknown wire status {status:?}");
            return;
        };
        self.status.relay(state).await;
    }

    async fn on_server_error(&self, code: i32, message: &str) {
        self.status
            .fail(ConnectionError::classified(code, message))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::UnifiedFeedClient;
    use crate::connection::FeedConnection;
    use crate::subscription::{FeedSubscription, SubscriptionDescriptor, UnifiedSubscription};
    use crate::taxonomy::{
        ConnectionState, ServerErrorKind, SubscriptionErrorKind, SubscriptionMode,
    };
    use crate::transport::{
        ConnectDetails, TransportFailure, UnifiedStatusListener, UnifiedSubscriptionHandle,
        UnifiedSubscriptionListener, UnifiedTransport,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    fn details() -> ConnectDetails {
        ConnectDetails::new("http://push.example.com", "DEMO")
    }

    fn descriptor() -> SubscriptionDescriptor {
        SubscriptionDescriptor::new(
            SubscriptionMode::Merge,
            "QUOTE_ADAPTER",
            ["item1"],
            ["stock_name", "last_price"],
            true,
        )
    }

    struct RecordingHandle {
        descriptor: SubscriptionDescriptor,
        listeners: Mutex<Vec<Arc<dyn UnifiedSubscriptionListener>>>,
        listener_clears: AtomicUsize,
    }

    #[async_trait]
    impl UnifiedSubscriptionHandle for RecordingHandle {
        fn descriptor(&self) -> &SubscriptionDescriptor {
            &self.descriptor
        }

        async fn attach_listener(&self, listener: Arc<dyn UnifiedSubscriptionListener>) {
            self.listeners.lock().await.push(listener);
        }

        async fn clear_listeners(&self) {
            self.listener_clears.fetch_add(1, Ordering::SeqCst);
            self.listeners.lock().await.clear();
        }
    }

    #[derive(Default)]
    struct RecordingTransport {
        connects: AtomicUsize,
        disconnects: AtomicUsize,
        listener_clears: AtomicUsize,
        subscribe_calls: AtomicUsize,
        unsubscribe_calls: AtomicUsize,
        status_listeners: Mutex<Vec<Arc<dyn UnifiedStatusListener>>>,
        handles: Mutex<Vec<Arc<RecordingHandle>>>,
        subscribe_failure: Mutex<Option<TransportFailure>>,
    }

    impl RecordingTransport {
        async fn status_listener(&self) -> Arc<dyn UnifiedStatusListener> {
            self.status_listeners.lock().await.last().cloned().unwrap()
        }

        async fn handle(&self, index: usize) -> Arc<RecordingHandle> {
            Arc::clone(&self.handles.lock().await[index])
        }
    }

    #[async_trait]
    impl UnifiedTransport for RecordingTransport {
        async fn connect(&self, _details: &ConnectDetails) {
            self.connects.fetch_add(1, Ordering::SeqCst);
        }

        async fn disconnect(&self) {
            self.disconnects.fetch_add(1, Ordering::SeqCst);
        }

        async fn add_status_listener(&self, listener: Arc<dyn UnifiedStatusListener>) {
            self.status_listeners.lock().await.push(listener);
        }

        async fn clear_status_listeners(&self) {
            self.listener_clears.fetch_add(1, Ordering::SeqCst);
            self.status_listeners.lock().await.clear();
        }

        async fn build_subscription(
            &self,
            descriptor: &SubscriptionDescriptor,
        ) -> Arc<dyn UnifiedSubscriptionHandle> {
            let handle = Arc::new(RecordingHandle {
                descriptor: descriptor.clone(),
                listeners: Mutex::default(),
                listener_clears: AtomicUsize::new(0),
            });
            self.handles.lock().await.push(Arc::clone(&handle));
            handle
        }

        async fn subscribe(
            &self,
            _handle: &Arc<dyn UnifiedSubscriptionHandle>,
        ) -> Result<(), TransportFailure> {
            self.subscribe_calls.fetch_add(1, Ordering::SeqCst);
            match self.subscribe_failure.lock().await.take() {
                Some(failure) => Err(failure),
                None => Ok(()),
            }
        }

        async fn unsubscribe(
            &self,
            _handle: &Arc<dyn UnifiedSubscriptionHandle>,
        ) -> Result<(), TransportFailure> {
            self.unsubscribe_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn connect_emits_connecting_and_relays_wire_statuses() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let mut status = client.status_stream().await;

        client.connect(details()).await;
        assert_eq!(transport.connects.load(Ordering::SeqCst), 1);
        assert_eq!(transport.listener_clears.load(Ordering::SeqCst), 1);

        let listener = transport.status_listener().await;
        // The native ack of the synthetic state must not duplicate it.
        listener.on_status_change("CONNECTING").await;
        listener.on_status_change("CONNECTED:STREAM-SENSING").await;
        listener.on_status_change("CONNECTED:HTTP-STREAMING").await;

        assert_eq!(status.next().await, Some(Ok(ConnectionState::Disconnected)));
        assert_eq!(status.next().await, Some(Ok(ConnectionState::Connecting)));
        assert_eq!(
            status.next().await,
            Some(Ok(ConnectionState::StreamSensing))
        );
        assert_eq!(
            status.next().await,
            Some(Ok(ConnectionState::HttpStreaming))
        );
        assert_eq!(client.current_state().await, ConnectionState::HttpStreaming);
    }

    #[tokio::test]
    async fn unknown_wire_statuses_are_ignored() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let mut status = client.status_stream().await;

        client.connect(details()).await;
        let listener = transport.status_listener().await;
        listener.on_status_change("CONNECTED:TELEPATHY").await;
        listener.on_status_change("CONNECTED:WS-STREAMING").await;

        assert_eq!(status.next().await, Some(Ok(ConnectionState::Disconnected)));
        assert_eq!(status.next().await, Some(Ok(ConnectionState::Connecting)));
        assert_eq!(status.next().await, Some(Ok(ConnectionState::WsStreaming)));
    }

    #[tokio::test]
    async fn repeated_connect_replaces_the_status_listener() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());

        client.connect(details()).await;
        client.connect(details()).await;

        assert_eq!(transport.listener_clears.load(Ordering::SeqCst), 2);
        assert_eq!(transport.status_listeners.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn disconnect_is_a_passthrough_without_a_synthetic_state() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());

        client.connect(details()).await;
        client.disconnect().await;

        assert_eq!(transport.disconnects.load(Ordering::SeqCst), 1);
        assert_eq!(client.current_state().await, ConnectionState::Connecting);

        // Only the native close callback moves the canonical state.
        let listener = transport.status_listener().await;
        listener.on_status_change("DISCONNECTED").await;
        assert_eq!(client.current_state().await, ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn server_errors_are_terminal_until_the_next_connect() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let mut status = client.status_stream().await;

        client.connect(details()).await;
        transport
            .status_listener()
            .await
            .on_server_error(7, "seat limit reached")
            .await;

        assert_eq!(status.next().await, Some(Ok(ConnectionState::Disconnected)));
        assert_eq!(status.next().await, Some(Ok(ConnectionState::Connecting)));
        let error = status.next().await.unwrap().unwrap_err();
        assert_eq!(error.kind, Some(ServerErrorKind::LicensedSessionLimitReached));
        assert_eq!(error.code, 7);
        assert_eq!(status.next().await, None);

        // A consumer attaching after the failure replays the error.
        let mut late = client.status_stream().await;
        assert!(matches!(late.next().await, Some(Err(e)) if e.code == 7));
        assert_eq!(late.next().await, None);

        // Reconnecting rearms the feed.
        client.connect(details()).await;
        let mut fresh = client.status_stream().await;
        assert_eq!(fresh.next().await, Some(Ok(ConnectionState::Connecting)));
        transport
            .status_listener()
            .await
            .on_status_change("CONNECTED:WS-STREAMING")
            .await;
        assert_eq!(fresh.next().await, Some(Ok(ConnectionState::WsStreaming)));
    }

    #[tokio::test]
    async fn subscribe_binds_the_native_listener_and_registers() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let subscription = Arc::new(UnifiedSubscription::new(descriptor()));

        client.subscribe(Arc::clone(&subscription)).await;

        assert_eq!(transport.subscribe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.subscription_count().await, 1);
        assert!(Arc::ptr_eq(
            &client.subscription_at(0).await.unwrap(),
            &subscription
        ));

        let handle = transport.handle(0).await;
        assert_eq!(handle.listener_clears.load(Ordering::SeqCst), 1);
        assert_eq!(handle.listeners.lock().await.len(), 1);

        // Native events reach consumers through the bound listener.
        let mut events = subscription.events().await;
        let native = handle.listeners.lock().await.last().cloned().unwrap();
        native.on_subscription().await;
        let entered = events.next().await.unwrap().unwrap();
        assert!(entered.is_lifecycle());
        assert!(entered.subscribed());
    }

    #[tokio::test]
    async fn duplicate_subscribe_does_not_touch_the_native_layer_again() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let subscription = Arc::new(UnifiedSubscription::new(descriptor()));

        client.subscribe(Arc::clone(&subscription)).await;
        client.subscribe(Arc::clone(&subscription)).await;

        assert_eq!(transport.subscribe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.subscription_count().await, 1);
        assert_eq!(transport.handle(0).await.listeners.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn rejected_subscribe_terminates_the_event_stream_and_skips_the_registry() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let subscription = Arc::new(UnifiedSubscription::new(descriptor()));

        *transport.subscribe_failure.lock().await =
            Some(TransportFailure::new(17, "unknown adapter"));
        let mut events = subscription.events().await;

        client.subscribe(Arc::clone(&subscription)).await;

        let error = events.next().await.unwrap().unwrap_err();
        assert_eq!(error.kind, Some(SubscriptionErrorKind::UnknownDataAdapter));
        assert_eq!(events.next().await, None);
        assert_eq!(client.subscription_count().await, 0);

        // The feed re-armed, so the same object can subscribe again.
        client.subscribe(Arc::clone(&subscription)).await;
        assert_eq!(client.subscription_count().await, 1);
        assert_eq!(transport.subscribe_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unsubscribing_an_unregistered_subscription_is_a_noop() {
        let transport = Arc::new(RecordingTransport::default());
        let client = UnifiedFeedClient::new(transport.clone());
        let subscription = Arc::new(UnifiedSubscription::new(descriptor()));

        client.subscribe(Arc::clone(&subscription)).await;
        client.unsubscribe(&subscription).await;
        assert_eq!(transport.unsubscribe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.subscription_count().await, 0);

        client.unsubscribe(&subscription).await;
        let never_subscribed = Arc::new(UnifiedSubscription::new(descriptor()));
        client.unsubscribe(&never_subscribed).await;

        assert_eq!(transport.unsubscribe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.subscription_count().await, 0);
    }
}
