//! Scripted double for the unified transport boundary.

use async_trait::async_trait;
use feedlink::transport::{
    ConnectDetails, TransportFailure, UnifiedItemUpdate, UnifiedStatusListener,
    UnifiedSubscriptionHandle, UnifiedSubscriptionListener, UnifiedTransport,
};
use feedlink::SubscriptionDescriptor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const TAG: &str = "ScriptedUnifiedTransport:";

/// Recording stand-in for the unified SDK client.
///
/// Commands are recorded and succeed unless a failure was scripted.
/// Subscription handles are handed out in build order and addressed by
/// that index from the `emit_*` drivers.
#[derive(Default)]
pub struct ScriptedUnifiedTransport {
    connects: AtomicUsize,
    disconnects: AtomicUsize,
    status_listener_clears: AtomicUsize,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
    last_details: Mutex<Option<ConnectDetails>>,
    status_listeners: Mutex<Vec<Arc<dyn UnifiedStatusListener>>>,
    handles: Mutex<Vec<Arc<ScriptedUnifiedHandle>>>,
    subscribe_failure: Mutex<Option<TransportFailure>>,
}

impl ScriptedUnifiedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a failure for the next `subscribe` call; later calls
    /// succeed again.
    pub async fn fail_next_subscribe(&self, failure: TransportFailure) {
        *self.subscribe_failure.lock().await = Some(failure);
    }

    pub fn connect_calls(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnects.load(Ordering::SeqCst)
    }

    pub fn status_listener_clears(&self) -> usize {
        self.status_listener_clears.load(Ordering::SeqCst)
    }

    pub fn subscribe_calls(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    pub async fn last_details(&self) -> Option<ConnectDetails> {
        self.last_details.lock().await.clone()
    }

    pub async fn status_listener_count(&self) -> usize {
        self.status_listeners.lock().await.len()
    }

    pub async fn handle_count(&self) -> usize {
        self.handles.lock().await.len()
    }

    /// The handle built by the `index`-th `build_subscription` call.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` handles were built.
    pub async fn handle(&self, index: usize) -> Arc<ScriptedUnifiedHandle> {
        Arc::clone(&self.handles.lock().await[index])
    }

    /// Drives `on_status_change` on every registered status listener.
    pub async fn emit_status(&self, status: &str) {
        let listeners = self.status_listeners.lock().await.clone();
        for listener in listeners {
            listener.on_status_change(status).await;
        }
    }

    /// Drives `on_server_error` on every registered status listener.
    pub async fn emit_server_error(&self, code: i32, message: &str) {
        let listeners = self.status_listeners.lock().await.clone();
        for listener in listeners {
            listener.on_server_error(code, message).await;
        }
    }

    /// Drives `on_subscription` on handle `index`.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` handles were built.
    pub async fn emit_subscribed(&self, index: usize) {
        self.handle(index).await.emit_subscribed().await;
    }

    /// Drives `on_unsubscription` on handle `index`.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` handles were built.
    pub async fn emit_unsubscribed(&self, index: usize) {
        self.handle(index).await.emit_unsubscribed().await;
    }

    /// Drives `on_item_update` on handle `index`.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` handles were built.
    pub async fn emit_update(&self, index: usize, update: UnifiedItemUpdate) {
        self.handle(index).await.emit_update(update).await;
    }

    /// Drives `on_subscription_error` on handle `index`.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` handles were built.
    pub async fn emit_subscription_error(&self, index: usize, code: i32, message: &str) {
        self.handle(index)
            .await
            .emit_subscription_error(code, message)
            .await;
    }
}

#[async_trait]
impl UnifiedTransport for ScriptedUnifiedTransport {
    async fn connect(&self, details: &ConnectDetails) {
        debug!("{TAG} connect to {}", details.host);
        self.connects.fetch_add(1, Ordering::SeqCst);
        *self.last_details.lock().await = Some(details.clone());
    }

    async fn disconnect(&self) {
        debug!("{TAG} disconnect");
        self.disconnects.fetch_add(1, Ordering::SeqCst);
    }

    async fn add_status_listener(&self, listener: Arc<dyn UnifiedStatusListener>) {
        self.status_listeners.lock().await.push(listener);
    }

    async fn clear_status_listeners(&self) {
        self.status_listener_clears.fetch_add(1, Ordering::SeqCst);
        self.status_listeners.lock().await.clear();
    }

    async fn build_subscription(
        &self,
        descriptor: &SubscriptionDescriptor,
    ) -> Arc<dyn UnifiedSubscriptionHandle> {
        let handle = Arc::new(ScriptedUnifiedHandle {
            descriptor: descriptor.clone(),
            listeners: Mutex::new(Vec::new()),
            listener_clears: AtomicUsize::new(0),
        });
        self.handles.lock().await.push(Arc::clone(&handle));
        handle
    }

    async fn subscribe(
        &self,
        handle: &Arc<dyn UnifiedSubscriptionHandle>,
    ) -> Result<(), TransportFailure> {
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        debug!(
            "{TAG} subscribe for adapter {}",
            handle.descriptor().data_adapter()
        );
        match self.subscribe_failure.lock().await.take() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    async fn unsubscribe(
        &self,
        _handle: &Arc<dyn UnifiedSubscriptionHandle>,
    ) -> Result<(), TransportFailure> {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Scripted native subscription handed out by [`ScriptedUnifiedTransport`].
pub struct ScriptedUnifiedHandle {
    descriptor: SubscriptionDescriptor,
    listeners: Mutex<Vec<Arc<dyn UnifiedSubscriptionListener>>>,
    listener_clears: AtomicUsize,
}

impl ScriptedUnifiedHandle {
    pub fn listener_clears(&self) -> usize {
        self.listener_clears.load(Ordering::SeqCst)
    }

    pub async fn listener_count(&self) -> usize {
        self.listeners.lock().await.len()
    }

    pub async fn emit_subscribed(&self) {
        let listeners = self.listeners.lock().await.clone();
        for listener in listeners {
            listener.on_subscription().await;
        }
    }

    pub async fn emit_unsubscribed(&self) {
        let listeners = self.listeners.lock().await.clone();
        for listener in listeners {
            listener.on_unsubscription().await;
        }
    }

    pub async fn emit_update(&self, update: UnifiedItemUpdate) {
        let listeners = self.listeners.lock().await.clone();
        for listener in listeners {
            listener.on_item_update(update.clone()).await;
        }
    }

    pub async fn emit_subscription_error(&self, code: i32, message: &str) {
        let listeners = self.listeners.lock().await.clone();
        for listener in listeners {
            listener.on_subscription_error(code, message).await;
        }
    }
}

#[async_trait]
impl UnifiedSubscriptionHandle for ScriptedUnifiedHandle {
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
