//! Scripted double for the legacy transport boundary.

use async_trait::async_trait;
use feedlink::transport::{
    ConnectDetails, LegacyConnectionListener, LegacyItemUpdate, LegacyTableListener,
    LegacyTransport, TableKey, TransportFailure,
};
use feedlink::SubscriptionDescriptor;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const TAG: &str = "ScriptedLegacyTransport:";

struct ScriptedTable {
    key: TableKey,
    descriptor: SubscriptionDescriptor,
    listener: Arc<dyn LegacyTableListener>,
}

/// Recording stand-in for the legacy SDK client.
///
/// Connection drivers target the listener of the most recent
/// `open_connection`; table drivers address tables by subscribe order.
/// Table keys are handed out sequentially starting at `table#1`.
pub struct ScriptedLegacyTransport {
    opens: AtomicUsize,
    closes: AtomicUsize,
    next_key: AtomicU64,
    last_details: Mutex<Option<ConnectDetails>>,
    connection_listeners: Mutex<Vec<Arc<dyn LegacyConnectionListener>>>,
    tables: Mutex<Vec<ScriptedTable>>,
    unsubscribed: Mutex<Vec<TableKey>>,
    open_failure: Mutex<Option<TransportFailure>>,
    subscribe_failure: Mutex<Option<TransportFailure>>,
}

impl Default for ScriptedLegacyTransport {
    fn default() -> Self {
        Self {
            opens: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            next_key: AtomicU64::new(1),
            last_details: Mutex::new(None),
            connection_listeners: Mutex::new(Vec::new()),
            tables: Mutex::new(Vec::new()),
            unsubscribed: Mutex::new(Vec::new()),
            open_failure: Mutex::new(None),
            subscribe_failure: Mutex::new(None),
        }
    }
}

impl ScriptedLegacyTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a failure for the next `open_connection` call.
    pub async fn fail_next_open(&self, failure: TransportFailure) {
        *self.open_failure.lock().await = Some(failure);
    }

    /// Scripts a failure for the next `subscribe_table` call.
    pub async fn fail_next_subscribe(&self, failure: TransportFailure) {
        *self.subscribe_failure.lock().await = Some(failure);
    }

    pub fn open_calls(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub async fn last_details(&self) -> Option<ConnectDetails> {
        self.last_details.lock().await.clone()
    }

    pub async fn table_count(&self) -> usize {
        self.tables.lock().await.len()
    }

    /// Descriptor the `index`-th `subscribe_table` call carried.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` tables were subscribed.
    pub async fn table_descriptor(&self, index: usize) -> SubscriptionDescriptor {
        self.tables.lock().await[index].descriptor.clone()
    }

    /// Keys passed to `unsubscribe_table`, in call order.
    pub async fn unsubscribed_keys(&self) -> Vec<TableKey> {
        self.unsubscribed.lock().await.clone()
    }

    async fn connection_listener(&self) -> Arc<dyn LegacyConnectionListener> {
        self.connection_listeners
            .lock()
            .await
            .last()
            .cloned()
            .expect("no connection was opened")
    }

    async fn table(&self, index: usize) -> (TableKey, Arc<dyn LegacyTableListener>) {
        let tables = self.tables.lock().await;
        let table = &tables[index];
        (table.key, Arc::clone(&table.listener))
    }

    /// Drives `on_connection_established` on the current session listener.
    ///
    /// # Panics
    ///
    /// Panics when no connection was opened. The remaining connection
    /// drivers share this contract.
    pub async fn emit_connection_established(&self) {
        self.connection_listener().await.on_connection_established().await;
    }

    pub async fn emit_session_started(&self, polling: bool) {
        self.connection_listener().await.on_session_started(polling).await;
    }

    pub async fn emit_activity_warning(&self, stalled: bool) {
        self.connection_listener().await.on_activity_warning(stalled).await;
    }

    pub async fn emit_close(&self) {
        self.connection_listener().await.on_close().await;
    }

    pub async fn emit_end(&self, cause: i32) {
        self.connection_listener().await.on_end(cause).await;
    }

    pub async fn emit_failure(&self, code: i32, message: &str) {
        self.connection_listener().await.on_failure(code, message).await;
    }

    pub async fn emit_data_error(&self, code: i32, message: &str) {
        self.connection_listener().await.on_data_error(code, message).await;
    }

    /// Drives `on_update` on the `index`-th subscribed table.
    ///
    /// # Panics
    ///
    /// Panics when fewer than `index + 1` tables were subscribed. The
    /// remaining table drivers share this contract.
    pub async fn emit_table_update(&self, index: usize, update: LegacyItemUpdate) {
        let (key, listener) = self.table(index).await;
        listener.on_update(key, update).await;
    }

    pub async fn emit_table_unsubscribed(&self, index: usize) {
        let (key, listener) = self.table(index).await;
        listener.on_unsubscribed_all(key).await;
    }
}

#[async_trait]
impl LegacyTransport for ScriptedLegacyTransport {
    async fn open_connection(
        &self,
        details: &ConnectDetails,
        listener: Arc<dyn LegacyConnectionListener>,
    ) -> Result<(), TransportFailure> {
        if let Some(failure) = self.open_failure.lock().await.take() {
            return Err(failure);
        }
        debug!("{TAG} open connection to {}", details.host);
        self.opens.fetch_add(1, Ordering::SeqCst);
        *self.last_details.lock().await = Some(details.clone());
        self.connection_listeners.lock().await.push(listener);
        Ok(())
    }

    async fn close_connection(&self) {
        debug!("{TAG} close connection");
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    async fn subscribe_table(
        &self,
        descriptor: &SubscriptionDescriptor,
        listener: Arc<dyn LegacyTableListener>,
    ) -> Result<TableKey, TransportFailure> {
        if let Some(failure) = self.subscribe_failure.lock().await.take() {
            return Err(failure);
        }
        let key = TableKey(self.next_key.fetch_add(1, Ordering::SeqCst));
        debug!(
            "{TAG} table {key} subscribed for adapter {}",
            descriptor.data_adapter()
        );
        self.tables.lock().await.push(ScriptedTable {
            key,
            descriptor: descriptor.clone(),
            listener,
        });
        Ok(key)
    }

    async fn unsubscribe_table(&self, key: TableKey) -> Result<(), TransportFailure> {
        debug!("{TAG} table {key} unsubscribed");
        self.unsubscribed.lock().await.push(key);
        Ok(())
    }
}
