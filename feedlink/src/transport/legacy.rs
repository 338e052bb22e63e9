//! Boundary traits for the legacy HTTP-polling SDK.

use super::{ConnectDetails, TransportFailure};
use crate::subscription::SubscriptionDescriptor;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifier the legacy SDK assigns to a subscribed table. Opaque to the
/// adaptation layer; needed to address the table on unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey(pub u64);

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Connection callbacks from the legacy SDK.
///
/// The legacy stack reports one event at a time on its own thread; the
/// byte-count progress callback is noise for most listeners and defaults to
/// a no-op.
#[async_trait]
pub trait LegacyConnectionListener: Send + Sync {
    /// Transport-level connection is up, session handshake still pending.
    async fn on_connection_established(&self);

    /// Session is live. `polling` distinguishes polling from streaming mode.
    async fn on_session_started(&self, polling: bool);

    /// `true` when data stops flowing on a live session, `false` once it
    /// resumes.
    async fn on_activity_warning(&self, stalled: bool);

    /// Clean close, initiated by either side.
    async fn on_close(&self);

    /// The server ended the session and expects the client to retry.
    async fn on_end(&self, cause: i32);

    /// Connection-level failure; the session is gone.
    async fn on_failure(&self, code: i32, message: &str);

    /// Protocol or data-consistency failure; the session is gone.
    async fn on_data_error(&self, code: i32, message: &str);

    async fn on_new_bytes(&self, _bytes: u64) {}
}

/// Per-table callbacks from the legacy SDK.
#[async_trait]
pub trait LegacyTableListener: Send + Sync {
    async fn on_update(&self, key: TableKey, update: LegacyItemUpdate);

    /// Every item of the table is unsubscribed. The listener registration
    /// is spent after this call and must not be reused.
    async fn on_unsubscribed_all(&self, key: TableKey);

    async fn on_unsubscribed_item(&self, _key: TableKey, _item: &str) {}

    async fn on_snapshot_end(&self, _key: TableKey, _item: &str) {}

    async fn on_raw_updates_lost(&self, _key: TableKey, _item: &str, _lost: u32) {}
}

/// Native client object of the legacy SDK.
///
/// Unlike the unified stack, connection and subscribe calls here validate
/// inline and can fail synchronously.
#[async_trait]
pub trait LegacyTransport: Send + Sync {
    async fn open_connection(
        &self,
        details: &ConnectDetails,
        listener: Arc<dyn LegacyConnectionListener>,
    ) -> Result<(), TransportFailure>;

    async fn close_connection(&self);

    async fn subscribe_table(
        &self,
        descriptor: &SubscriptionDescriptor,
        listener: Arc<dyn LegacyTableListener>,
    ) -> Result<TableKey, TransportFailure>;

    async fn unsubscribe_table(&self, key: TableKey) -> Result<(), TransportFailure>;
}

/// One push from the legacy SDK. Only changed fields carry a new value;
/// unchanged fields repeat the previously delivered one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyItemUpdate {
    pub item: String,
    fields: HashMap<String, LegacyFieldState>,
}

impl LegacyItemUpdate {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            fields: HashMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, state: LegacyFieldState) -> Self {
        self.fields.insert(name.into(), state);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &LegacyFieldState)> + '_ {
        self.fields
            .iter()
            .map(|(name, state)| (name.as_str(), state))
    }
}

/// Wire state of one field within a legacy push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFieldState {
    pub changed: bool,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

impl LegacyFieldState {
    pub fn changed(old_value: Option<&str>, new_value: Option<&str>) -> Self {
        Self {
            changed: true,
            old_value: old_value.map(str::to_owned),
            new_value: new_value.map(str::to_owned),
        }
    }

    pub fn unchanged(old_value: Option<&str>) -> Self {
        Self {
            changed: false,
            old_value: old_value.map(str::to_owned),
            new_value: None,
        }
    }
}
