//! Connection manager for the legacy transport.

use super::{FeedConnection, SubscriptionRegistry};
use crate::error::{ConnectionError, SubscriptionError};
use crate::stream::{StatusFeed, StatusStream, DEFAULT_EVENT_QUEUE_SIZE};
use crate::subscription::{FeedSubscription, LegacySubscription};
use crate::taxonomy::ConnectionState;
use crate::transport::{ConnectDetails, LegacyConnectionListener, LegacyTransport};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

const LEGACY_CLIENT_TAG: &str = "LegacyFeedClient:";

/// Client over the legacy HTTP SDK.
///
/// The legacy stack has no wire-status strings; its discrete connection
/// callbacks are mapped onto the same canonical states the unified client
/// produces, so consumers cannot tell the variants apart.
pub struct LegacyFeedClient {
    transport: Arc<dyn LegacyTransport>,
    status: Arc<StatusFeed>,
    registry: SubscriptionRegistry<LegacySubscription>,
}

impl LegacyFeedClient {
    pub fn new(transport: Arc<dyn LegacyTransport>) -> Self {
        Self::with_queue_size(transport, DEFAULT_EVENT_QUEUE_SIZE)
    }

    /// `event_queue_size` bounds the status broadcast buffer.
    pub fn with_queue_size(transport: Arc<dyn LegacyTransport>, event_queue_size: usize) -> Self {
        Self {
            transport,
            status: Arc::new(StatusFeed::new(event_queue_size)),
            registry: SubscriptionRegistry::new(),
        }
    }
}

#[async_trait]
impl FeedConnection for LegacyFeedClient {
    type Subscription = LegacySubscription;

    async fn connect(&self, details: ConnectDetails) {
        debug!("{LEGACY_CLIENT_TAG} opening connection to {}", details.host);
        self.status.rearm().await;
        let relay = Arc::new(LegacyStatusRelay {
            status: Arc::clone(&self.status),
            stalled_from: Mutex::new(None),
        });
        match self.transport.open_connection(&details, relay).await {
            Ok(()) => {
                self.status.relay(ConnectionState::Connecting).await;
            }
            Err(failure) => {
                warn!("{LEGACY_CLIENT_TAG} connection refused: {failure}");
                self.status
                    .fail(ConnectionError::classified(failure.code, failure.message))
                    .await;
            }
        }
    }

    async fn disconnect(&self) {
        debug!("{LEGACY_CLIENT_TAG} close requested");
        self.transport.close_connection().await;
    }

    async fn status_stream(&self) -> StatusStream {
        self.status.subscribe().await
    }

    async fn current_state(&self) -> ConnectionState {
        self.status.current().await
    }

    async fn subscribe(&self, subscription: Arc<LegacySubscription>) {
        if !subscription.begin_listening().await {
            debug!("{LEGACY_CLIENT_TAG} subscription already listening, nothing to do");
            return;
        }
        match self
            .transport
            .subscribe_table(subscription.descriptor(), subscription.relay())
            .await
        {
            Ok(key) => {
                subscription.store_table_key(key).await;
                self.registry.insert(Arc::clone(&subscription)).await;
                // No established callback exists on this stack; entering
                // the subscribed state is reported right here.
                subscription.mark_subscribed().await;
            }
            Err(failure) => {
                warn!("{LEGACY_CLIENT_TAG} table subscribe rejected: {failure}");
                subscription
                    .fail(SubscriptionError::classified(failure.code, failure.message))
                    .await;
            }
        }
    }

    async fn unsubscribe(&self, subscription: &Arc<LegacySubscription>) {
        if !self.registry.remove(subscription).await {
            debug!("{LEGACY_CLIENT_TAG} unsubscribe for an unregistered subscription, nothing to do");
            return;
        }
        match subscription.take_table_key().await {
            Some(key) => {
                if let Err(failure) = self.transport.unsubscribe_table(key).await {
                    warn!("{LEGACY_CLIENT_TAG} native unsubscribe for {key} failed: {failure}");
                }
            }
            None => warn!("{LEGACY_CLIENT_TAG} registered subscription carried no table key"),
        }
    }

    async fn subscription_count(&self) -> usize {
        self.registry.count().await
    }

    async fn subscription_at(&self, index: usize) -> Option<Arc<LegacySubscription>> {
        self.registry.get(index).await
    }
}

/// Connection listener glue: discrete legacy callbacks onto the canonical
/// feed. One relay lives per connect call, so the stall memory resets with
/// the session.
struct LegacyStatusRelay {
    status: Arc<StatusFeed>,
    /// State interrupted by the active stall, when one is in progress.
    stalled_from: Mutex<Option<ConnectionState>>,
}

#[async_trait]
impl LegacyConnectionListener for LegacyStatusRelay {
    async fn on_connection_established(&self) {
        self.status.relay(ConnectionState::StreamSensing).await;
    }

    async fn on_session_started(&self, polling: bool) {
        *self.stalled_from.lock().await = None;
        let state = if polling {
            ConnectionState::HttpPolling
        } else {
            ConnectionState::HttpStreaming
        };
        self.status.relay(state).await;
    }

    async fn on_activity_warning(&self, stalled: bool) {
        let mut stalled_from = self.stalled_from.lock().await;
        if stalled {
            if stalled_from.is_none() {
                *stalled_from = Some(self.status.current().await);
                self.status.relay(ConnectionState::Stalled).await;
            }
        } else if let Some(state) = stalled_from.take() {
            self.status.relay(state).await;
        }
    }

    async fn on_close(&self) {
        self.status.relay(ConnectionState::Disconnected).await;
    }

    async fn on_end(&self, cause: i32) {
        debug!("{LEGACY_CLIENT_TAG} session ended by the server (cause {cause})");
        self.status.relay(ConnectionState::WillRetry).await;
    }

    async fn on_failure(&self, code: i32, message: &str) {
        self.status
            .fail(ConnectionError::classified(code, message))
            .await;
    }

    async fn on_data_error(&self, code: i32, message: &str) {
        self.status
            .fail(ConnectionError::classified(code, message))
            .await;
    }
}
